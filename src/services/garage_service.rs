//! Servicio de garagem
//!
//! Une la `Garage` en memoria con el almacén key-value: carga una vez al
//! arrancar y escribe el blob completo después de cada mutación aceptada.
//! Los fallos de escritura se registran y se informan, nunca se reintentan.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::models::{Feedback, Garage, MaintenanceRecord, Vehicle, VehicleAction};
use crate::storage::KeyValueStore;
use crate::utils::errors::GarageError;

/// Estado de carga y persistencia expuesto a la UI
#[derive(Debug, Clone, Default, Serialize)]
pub struct GarageStatus {
    pub vehicles: usize,
    pub load_warnings: Vec<String>,
    pub last_persist_error: Option<String>,
}

pub struct GarageService {
    garage: Garage,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    load_warnings: Vec<String>,
    last_persist_error: Option<String>,
}

impl GarageService {
    /// Carga la garagem persistida. Nunca falla: sin datos usa la garagem de
    /// demostración; con datos ilegibles arranca vacía y deja un aviso.
    pub async fn load(store: Arc<dyn KeyValueStore>, storage_key: &str) -> Self {
        let mut garage = Garage::new();
        let mut load_warnings = Vec::new();

        match store.get(storage_key).await {
            Ok(Some(blob)) => match garage.load_all(&blob) {
                Ok(summary) => {
                    info!("📦 Garagem restaurada: {} veículos", summary.loaded);
                    load_warnings.extend(summary.skipped);
                }
                Err(e) => {
                    warn!("⚠️ Garagem persistida ilegível, iniciando vazia: {}", e);
                    load_warnings.push(e.to_string());
                }
            },
            Ok(None) => {
                info!("🆕 Nenhuma garagem persistida, usando veículos padrão");
                garage = Garage::with_defaults();
            }
            Err(e) => {
                error!("❌ Erro lendo a garagem persistida: {}", e);
                load_warnings.push(format!("Falha ao ler a garagem: {}", e));
            }
        }

        Self {
            garage,
            store,
            storage_key: storage_key.to_string(),
            load_warnings,
            last_persist_error: None,
        }
    }

    pub fn garage(&self) -> &Garage {
        &self.garage
    }

    pub fn vehicle(&self, key: &str) -> Result<&Vehicle, GarageError> {
        self.garage
            .get(key)
            .ok_or_else(|| GarageError::VehicleNotFound(key.to_string()))
    }

    pub fn status(&self) -> GarageStatus {
        GarageStatus {
            vehicles: self.garage.len(),
            load_warnings: self.load_warnings.clone(),
            last_persist_error: self.last_persist_error.clone(),
        }
    }

    /// Devuelve la clave asignada al vehículo
    pub async fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<String, GarageError> {
        let key = self.garage.add(vehicle)?.key().to_string();
        self.persist().await?;
        Ok(key)
    }

    pub async fn remove_vehicle(&mut self, key: &str) -> Result<(), GarageError> {
        if !self.garage.remove(key) {
            return Err(GarageError::VehicleNotFound(key.to_string()));
        }
        self.persist().await
    }

    pub async fn apply_action(
        &mut self,
        key: &str,
        action: VehicleAction,
    ) -> Result<Feedback, GarageError> {
        let feedback = self.vehicle_mut(key)?.apply(action)?;
        self.persist().await?;
        Ok(feedback)
    }

    pub async fn add_maintenance(
        &mut self,
        key: &str,
        record: MaintenanceRecord,
    ) -> Result<MaintenanceRecord, GarageError> {
        let accepted = record.clone();
        self.vehicle_mut(key)?.add_maintenance_record(record)?;
        self.persist().await?;
        Ok(accepted)
    }

    pub async fn remove_maintenance(&mut self, key: &str, id: &str) -> Result<(), GarageError> {
        self.vehicle_mut(key)?.remove_maintenance_record(id)?;
        self.persist().await
    }

    /// Escribe el blob completo bajo la clave configurada
    pub async fn persist(&mut self) -> Result<(), GarageError> {
        let blob = self.garage.serialize_all()?;

        match self.store.set(&self.storage_key, &blob).await {
            Ok(()) => {
                self.last_persist_error = None;
                Ok(())
            }
            Err(e) => {
                error!("❌ Falha ao salvar a garagem: {}", e);
                self.last_persist_error = Some(e.to_string());
                Err(GarageError::Persistence(e.to_string()))
            }
        }
    }

    fn vehicle_mut(&mut self, key: &str) -> Result<&mut Vehicle, GarageError> {
        self.garage
            .get_mut(key)
            .ok_or_else(|| GarageError::VehicleNotFound(key.to_string()))
    }
}
