//! Garagem: colección de vehículos indexada por clave (placa o id)
//!
//! Es la unidad de persistencia: se serializa entera a un único blob JSON
//! y se recarga entera desde él.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::vehicle::{Vehicle, VehicleData, VehicleKind};
use crate::utils::errors::GarageError;

/// Resultado de `Garage::load_all`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    pub loaded: usize,
    /// Entradas descartadas, con el motivo
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Garage {
    vehicles: HashMap<String, Vehicle>,
}

impl Garage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Garagem de demostración usada cuando no hay nada persistido
    pub fn with_defaults() -> Self {
        let mut garage = Self::new();
        let defaults = [
            Vehicle::new(VehicleKind::Car, "Fusca", "Azul").with_id("carro_fusca_padrao"),
            Vehicle::new(VehicleKind::sports_car(), "Ferrari F40", "Vermelho")
                .with_id("carroesportivo_ferrari-f40_padrao"),
            Vehicle::new(
                VehicleKind::Truck {
                    cargo_capacity: 10000.0,
                    current_cargo: 0.0,
                },
                "Scania R450",
                "Branco",
            )
            .with_id("caminhao_scania-r450_padrao"),
            Vehicle::new(VehicleKind::Motorcycle, "Honda CB 500", "Preta")
                .with_id("moto_honda-cb-500_padrao"),
            Vehicle::new(VehicleKind::Bicycle, "Caloi Elite", "Verde")
                .with_id("bicicleta_caloi-elite_padrao"),
        ];
        for vehicle in defaults {
            garage.vehicles.insert(vehicle.key().to_string(), vehicle);
        }
        garage
    }

    /// Falla si la clave del vehículo ya existe
    pub fn add(&mut self, vehicle: Vehicle) -> Result<&Vehicle, GarageError> {
        let key = vehicle.key().to_string();
        if self.vehicles.contains_key(&key) {
            return Err(GarageError::DuplicateKey(key));
        }

        log::info!("🚗 Veículo '{}' adicionado à garagem", key);
        Ok(self.vehicles.entry(key).or_insert(vehicle))
    }

    /// `false` si la clave no existía
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.vehicles.remove(key).is_some();
        if removed {
            log::info!("🗑️ Veículo '{}' removido da garagem", key);
        }
        removed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vehicles.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Vehicle> {
        self.vehicles.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Orden estable para la UI: por modelo y, en empate, por clave
    pub fn sorted_by_model(&self) -> Vec<&Vehicle> {
        let mut vehicles: Vec<&Vehicle> = self.vehicles.values().collect();
        vehicles.sort_by(|a, b| {
            a.model()
                .to_lowercase()
                .cmp(&b.model().to_lowercase())
                .then_with(|| a.key().cmp(b.key()))
        });
        vehicles
    }

    /// Array JSON de todos los vehículos, ordenado por clave
    pub fn serialize_all(&self) -> Result<String, GarageError> {
        let mut keys: Vec<&String> = self.vehicles.keys().collect();
        keys.sort();

        let data: Vec<VehicleData> = keys
            .into_iter()
            .filter_map(|key| self.vehicles.get(key))
            .map(Vehicle::serialize)
            .collect();

        Ok(serde_json::to_string(&data)?)
    }

    /// Reemplaza el contenido con el blob persistido (array u objeto de vehículos).
    ///
    /// Las entradas con tipo desconocido, malformadas o con clave repetida se
    /// descartan con un aviso. Si el blob entero no se puede interpretar, la
    /// garagem queda vacía y se devuelve `GarageError::CorruptData`.
    pub fn load_all(&mut self, data: &str) -> Result<LoadSummary, GarageError> {
        let entries = match serde_json::from_str::<Value>(data) {
            Ok(Value::Array(entries)) => entries,
            Ok(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
            Ok(other) => {
                self.vehicles.clear();
                return Err(GarageError::CorruptData(format!(
                    "esperado array ou objeto, recebido {}",
                    json_kind(&other)
                )));
            }
            Err(e) => {
                self.vehicles.clear();
                log::error!("❌ Blob da garagem ilegível: {}", e);
                return Err(GarageError::CorruptData(e.to_string()));
            }
        };

        let mut vehicles = HashMap::with_capacity(entries.len());
        let mut summary = LoadSummary::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let vehicle = serde_json::from_value::<VehicleData>(entry)
                .map_err(GarageError::from)
                .and_then(Vehicle::from_data);

            match vehicle {
                Ok(vehicle) => {
                    let key = vehicle.key().to_string();
                    if vehicles.contains_key(&key) {
                        log::warn!("⚠️ Chave duplicada '{}' ignorada ao carregar", key);
                        summary.skipped.push(format!("#{}: chave duplicada '{}'", index, key));
                        continue;
                    }
                    vehicles.insert(key, vehicle);
                }
                Err(e) => {
                    log::warn!("⚠️ Entrada #{} ignorada ao carregar: {}", index, e);
                    summary.skipped.push(format!("#{}: {}", index, e));
                }
            }
        }

        summary.loaded = vehicles.len();
        self.vehicles = vehicles;
        log::info!(
            "📦 Garagem carregada: {} veículos, {} ignorados",
            summary.loaded,
            summary.skipped.len()
        );
        Ok(summary)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "número",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "objeto",
    }
}
