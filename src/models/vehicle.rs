//! Modelo de Vehicle
//!
//! Un vehículo es un registro de campos comunes más una carga específica de
//! la variante (`VehicleKind`). Toda diferencia de comportamiento entre
//! variantes (deltas de aceleración/frenado, turbo, carga) se resuelve con
//! un `match` exhaustivo sobre el tipo.
//!
//! Máquina de estados de las variantes motorizadas:
//! `Desligado` (speed = 0) -> `Ligado parado` (speed = 0) -> `Em movimento` (speed > 0).
//! La bicicleta no tiene motor: sólo `Parada` y `Pedalando`.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use super::maintenance::{cmp_recent_first, MaintenanceRecord, MaintenanceRecordData};
use crate::utils::errors::{GarageError, VehicleError};
use crate::utils::validation::validate_positive_amount;

const CAR_ACCELERATION: f64 = 10.0;
const CAR_BRAKING: f64 = 10.0;
const SPORTS_ACCELERATION: f64 = 15.0;
const TURBO_BOOST: f64 = 35.0;
const SPORTS_BRAKING: f64 = 20.0;
const TRUCK_BASE_ACCELERATION: f64 = 5.0;
const TRUCK_MIN_ACCELERATION: f64 = 1.0;
const TRUCK_BASE_BRAKING: f64 = 7.0;
const TRUCK_MIN_BRAKING: f64 = 2.0;
const MOTORCYCLE_ACCELERATION: f64 = 18.0;
const MOTORCYCLE_BRAKING: f64 = 15.0;
const BICYCLE_PEDAL: f64 = 2.5;
const BICYCLE_BRAKING: f64 = 2.0;

/// Etiqueta explícita del tipo de vehículo, fijada en la construcción
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "carro")]
    Car,
    #[serde(rename = "carroesportivo")]
    SportsCar,
    #[serde(rename = "caminhao")]
    Truck,
    #[serde(rename = "moto")]
    Motorcycle,
    #[serde(rename = "bicicleta")]
    Bicycle,
}

impl VehicleType {
    pub const ALL: [VehicleType; 5] = [
        VehicleType::Car,
        VehicleType::SportsCar,
        VehicleType::Truck,
        VehicleType::Motorcycle,
        VehicleType::Bicycle,
    ];

    /// Etiqueta persistida en `tipo`
    pub fn tag(&self) -> &'static str {
        match self {
            VehicleType::Car => "carro",
            VehicleType::SportsCar => "carroesportivo",
            VehicleType::Truck => "caminhao",
            VehicleType::Motorcycle => "moto",
            VehicleType::Bicycle => "bicicleta",
        }
    }

    /// Acepta la etiqueta sin importar mayúsculas ni separadores (`CarroEsportivo`, `carro_esportivo`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        let normalized = normalized.replace('ã', "a");

        Self::ALL.into_iter().find(|t| t.tag() == normalized)
    }

    /// Nombre para mensajes de la UI
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Car => "Carro",
            VehicleType::SportsCar => "Carro esportivo",
            VehicleType::Truck => "Caminhão",
            VehicleType::Motorcycle => "Moto",
            VehicleType::Bicycle => "Bicicleta",
        }
    }

    pub fn is_powered(&self) -> bool {
        !matches!(self, VehicleType::Bicycle)
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estado específico de cada variante
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleKind {
    Car,
    SportsCar { turbo_engaged: bool },
    Truck { cargo_capacity: f64, current_cargo: f64 },
    Motorcycle,
    Bicycle,
}

impl VehicleKind {
    /// Caminhão vacío; la capacidad debe ser positiva y finita
    pub fn truck(cargo_capacity: f64) -> Result<Self, VehicleError> {
        let cargo_capacity = validate_positive_amount(cargo_capacity)
            .map_err(|_| VehicleError::InvalidAmount(cargo_capacity.to_string()))?;
        Ok(VehicleKind::Truck {
            cargo_capacity,
            current_cargo: 0.0,
        })
    }

    pub fn sports_car() -> Self {
        VehicleKind::SportsCar { turbo_engaged: false }
    }

    pub fn vehicle_type(&self) -> VehicleType {
        match self {
            VehicleKind::Car => VehicleType::Car,
            VehicleKind::SportsCar { .. } => VehicleType::SportsCar,
            VehicleKind::Truck { .. } => VehicleType::Truck,
            VehicleKind::Motorcycle => VehicleType::Motorcycle,
            VehicleKind::Bicycle => VehicleType::Bicycle,
        }
    }
}

/// Sonido que la UI debe reproducir tras una acción
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    EngineStart,
    EngineStop,
    Accelerate,
    Brake,
    Turbo,
    CarHorn,
    SportsHorn,
    TruckHorn,
    MotorcycleHorn,
    BicycleBell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLevel {
    Success,
    Info,
}

/// Mensaje para la UI tras una acción aceptada
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue: Option<SoundCue>,
}

impl Feedback {
    fn success(message: String, cue: Option<SoundCue>) -> Self {
        Self {
            level: FeedbackLevel::Success,
            message,
            cue,
        }
    }

    fn info(message: String) -> Self {
        Self {
            level: FeedbackLevel::Info,
            message,
            cue: None,
        }
    }
}

/// Acciones que la UI puede despachar sobre un vehículo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VehicleAction {
    PowerOn,
    PowerOff,
    Accelerate,
    Brake,
    Honk,
    Pedal,
    LoadCargo { amount: f64 },
    UnloadCargo { amount: f64 },
    EngageTurbo,
    DisengageTurbo,
}

/// Particiones del historial respecto a un instante
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenancePartition<'a> {
    /// `timestamp <= now`, más recientes primero
    pub past: Vec<&'a MaintenanceRecord>,
    /// `timestamp > now`, más próximos primero
    pub future: Vec<&'a MaintenanceRecord>,
}

/// Forma persistida de un vehículo. `poweredOn` y `speed` no se guardan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleData {
    pub id: String,
    pub tipo: String,
    pub modelo: String,
    pub cor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placa: Option<String>,
    #[serde(rename = "capacidadeCarga", default, skip_serializing_if = "Option::is_none")]
    pub capacidade_carga: Option<f64>,
    #[serde(rename = "cargaAtual", default, skip_serializing_if = "Option::is_none")]
    pub carga_atual: Option<f64>,
    #[serde(rename = "turboAtivado", default, skip_serializing_if = "Option::is_none")]
    pub turbo_ativado: Option<bool>,
    #[serde(rename = "historicoManutencao", default)]
    pub historico_manutencao: Vec<MaintenanceRecordData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: String,
    plate: Option<String>,
    model: String,
    color: String,
    powered_on: bool,
    speed: f64,
    kind: VehicleKind,
    maintenance_records: Vec<MaintenanceRecord>,
}

impl Vehicle {
    /// Vehículo nuevo, apagado y parado, con id `<tipo>_<modelo>_<sufijo>`
    pub fn new(kind: VehicleKind, model: &str, color: &str) -> Self {
        let model = model.trim().to_string();
        let id = generate_vehicle_id(kind.vehicle_type(), &model);
        Self {
            id,
            plate: None,
            model,
            color: color.trim().to_string(),
            powered_on: false,
            speed: 0.0,
            kind,
            maintenance_records: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.trim().to_string();
        self
    }

    pub fn with_plate(mut self, plate: Option<String>) -> Self {
        self.plate = plate.filter(|p| !p.trim().is_empty());
        self
    }

    /// Clave en la garagem: la placa si existe, si no el id
    pub fn key(&self) -> &str {
        self.plate.as_deref().unwrap_or(&self.id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn plate(&self) -> Option<&str> {
        self.plate.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn kind(&self) -> &VehicleKind {
        &self.kind
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.kind.vehicle_type()
    }

    /// La bicicleta está siempre "pronta"
    pub fn is_powered_on(&self) -> bool {
        match self.kind {
            VehicleKind::Bicycle => true,
            _ => self.powered_on,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn turbo_engaged(&self) -> Option<bool> {
        match self.kind {
            VehicleKind::SportsCar { turbo_engaged } => Some(turbo_engaged),
            _ => None,
        }
    }

    pub fn cargo_capacity(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::Truck { cargo_capacity, .. } => Some(cargo_capacity),
            _ => None,
        }
    }

    pub fn current_cargo(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::Truck { current_cargo, .. } => Some(current_cargo),
            _ => None,
        }
    }

    pub fn maintenance_records(&self) -> &[MaintenanceRecord] {
        &self.maintenance_records
    }

    fn label(&self) -> String {
        format!("{} {}", self.vehicle_type().label(), self.model)
    }

    // ---------------------------------------------------------------------
    // Acciones
    // ---------------------------------------------------------------------

    /// Despacha una acción de la UI
    pub fn apply(&mut self, action: VehicleAction) -> Result<Feedback, VehicleError> {
        match action {
            VehicleAction::PowerOn => self.power_on(),
            VehicleAction::PowerOff => self.power_off(),
            VehicleAction::Accelerate => self.accelerate(),
            VehicleAction::Brake => self.brake(),
            VehicleAction::Honk => Ok(self.honk()),
            VehicleAction::Pedal => self.pedal(),
            VehicleAction::LoadCargo { amount } => self.load_cargo(amount),
            VehicleAction::UnloadCargo { amount } => self.unload_cargo(amount),
            VehicleAction::EngageTurbo => self.engage_turbo(),
            VehicleAction::DisengageTurbo => self.disengage_turbo(),
        }
    }

    pub fn power_on(&mut self) -> Result<Feedback, VehicleError> {
        if let VehicleKind::Bicycle = self.kind {
            return Ok(Feedback::info("Bicicletas não têm motor, é só pedalar!".to_string()));
        }
        if self.powered_on {
            return Err(VehicleError::AlreadyOn(self.label()));
        }

        self.powered_on = true;
        log::debug!("🔑 {} ligado", self.id);
        Ok(Feedback::success(
            format!("{} ligado!", self.label()),
            Some(SoundCue::EngineStart),
        ))
    }

    pub fn power_off(&mut self) -> Result<Feedback, VehicleError> {
        if let VehicleKind::Bicycle = self.kind {
            return Ok(Feedback::info("Bicicletas não têm motor para desligar.".to_string()));
        }
        if !self.powered_on {
            return Err(VehicleError::AlreadyOff(self.label()));
        }
        if self.speed > 0.0 {
            return Err(VehicleError::MustStopFirst(self.label()));
        }

        self.powered_on = false;
        self.speed = 0.0;
        if let VehicleKind::SportsCar { turbo_engaged } = &mut self.kind {
            *turbo_engaged = false;
        }
        log::debug!("🔑 {} desligado", self.id);
        Ok(Feedback::success(
            format!("{} desligado.", self.label()),
            Some(SoundCue::EngineStop),
        ))
    }

    /// En la bicicleta equivale a `pedal`
    pub fn accelerate(&mut self) -> Result<Feedback, VehicleError> {
        if let VehicleKind::Bicycle = self.kind {
            return self.pedal();
        }
        if !self.powered_on {
            return Err(VehicleError::PoweredOff(self.label()));
        }

        self.speed += self.acceleration_delta();
        Ok(Feedback::success(
            format!("{} acelerou: {} km/h", self.label(), display_number(self.speed)),
            Some(SoundCue::Accelerate),
        ))
    }

    pub fn pedal(&mut self) -> Result<Feedback, VehicleError> {
        if !matches!(self.kind, VehicleKind::Bicycle) {
            return Err(unsupported("pedalar", self.vehicle_type()));
        }

        self.speed += BICYCLE_PEDAL;
        Ok(Feedback::success(
            format!("{} pedalando: {} km/h", self.label(), display_number(self.speed)),
            None,
        ))
    }

    pub fn brake(&mut self) -> Result<Feedback, VehicleError> {
        if self.speed <= 0.0 {
            return Err(VehicleError::AlreadyStopped(self.label()));
        }

        self.speed = (self.speed - self.braking_delta()).max(0.0);
        Ok(Feedback::success(
            format!("{} freou: {} km/h", self.label(), display_number(self.speed)),
            Some(SoundCue::Brake),
        ))
    }

    /// Sólo elige el sonido; no altera el estado
    pub fn honk(&self) -> Feedback {
        let (message, cue) = match self.kind {
            VehicleKind::Car => ("Bi bi!", SoundCue::CarHorn),
            VehicleKind::SportsCar { .. } => ("Vrum vrum! Bi bi!", SoundCue::SportsHorn),
            VehicleKind::Truck { .. } => ("Fom fom!", SoundCue::TruckHorn),
            VehicleKind::Motorcycle => ("Bip bip!", SoundCue::MotorcycleHorn),
            VehicleKind::Bicycle => ("Trim trim!", SoundCue::BicycleBell),
        };
        Feedback::success(format!("{}: {}", self.label(), message), Some(cue))
    }

    pub fn load_cargo(&mut self, amount: f64) -> Result<Feedback, VehicleError> {
        let label = self.label();
        let vehicle_type = self.vehicle_type();
        let powered_on = self.powered_on;
        let VehicleKind::Truck { cargo_capacity, current_cargo } = &mut self.kind else {
            return Err(unsupported("carregar", vehicle_type));
        };

        let amount = validate_positive_amount(amount)
            .map_err(|_| VehicleError::InvalidAmount(amount.to_string()))?;
        if !powered_on {
            return Err(VehicleError::PoweredOff(label));
        }
        if *current_cargo + amount > *cargo_capacity {
            return Err(VehicleError::OverCapacity {
                requested: amount,
                current: *current_cargo,
                capacity: *cargo_capacity,
            });
        }

        *current_cargo += amount;
        Ok(Feedback::success(
            format!(
                "{} carregado. Carga atual: {}/{} kg",
                label,
                display_number(*current_cargo),
                display_number(*cargo_capacity)
            ),
            None,
        ))
    }

    pub fn unload_cargo(&mut self, amount: f64) -> Result<Feedback, VehicleError> {
        let label = self.label();
        let vehicle_type = self.vehicle_type();
        let powered_on = self.powered_on;
        let VehicleKind::Truck { cargo_capacity, current_cargo } = &mut self.kind else {
            return Err(unsupported("descarregar", vehicle_type));
        };

        let amount = validate_positive_amount(amount)
            .map_err(|_| VehicleError::InvalidAmount(amount.to_string()))?;
        if !powered_on {
            return Err(VehicleError::PoweredOff(label));
        }
        if amount > *current_cargo {
            return Err(VehicleError::NotEnoughCargo {
                requested: amount,
                current: *current_cargo,
            });
        }

        *current_cargo = (*current_cargo - amount).max(0.0);
        Ok(Feedback::success(
            format!(
                "{} descarregado. Carga atual: {}/{} kg",
                label,
                display_number(*current_cargo),
                display_number(*cargo_capacity)
            ),
            None,
        ))
    }

    pub fn engage_turbo(&mut self) -> Result<Feedback, VehicleError> {
        let label = self.label();
        let vehicle_type = self.vehicle_type();
        let powered_on = self.powered_on;
        let VehicleKind::SportsCar { turbo_engaged } = &mut self.kind else {
            return Err(unsupported("ativar turbo", vehicle_type));
        };

        if !powered_on {
            return Err(VehicleError::PoweredOff(label));
        }
        if *turbo_engaged {
            return Err(VehicleError::TurboAlreadyEngaged);
        }

        *turbo_engaged = true;
        Ok(Feedback::success(
            format!("Turbo do {} ativado!", label),
            Some(SoundCue::Turbo),
        ))
    }

    pub fn disengage_turbo(&mut self) -> Result<Feedback, VehicleError> {
        let label = self.label();
        let vehicle_type = self.vehicle_type();
        let VehicleKind::SportsCar { turbo_engaged } = &mut self.kind else {
            return Err(unsupported("desativar turbo", vehicle_type));
        };

        if !*turbo_engaged {
            return Err(VehicleError::TurboAlreadyDisengaged);
        }

        *turbo_engaged = false;
        Ok(Feedback::success(format!("Turbo do {} desativado.", label), None))
    }

    fn acceleration_delta(&self) -> f64 {
        match self.kind {
            VehicleKind::Car => CAR_ACCELERATION,
            VehicleKind::SportsCar { turbo_engaged } => {
                if turbo_engaged {
                    SPORTS_ACCELERATION + TURBO_BOOST
                } else {
                    SPORTS_ACCELERATION
                }
            }
            VehicleKind::Truck { cargo_capacity, current_cargo } => {
                let load = load_ratio(current_cargo, cargo_capacity);
                (TRUCK_BASE_ACCELERATION * (1.0 - load)).max(TRUCK_MIN_ACCELERATION)
            }
            VehicleKind::Motorcycle => MOTORCYCLE_ACCELERATION,
            VehicleKind::Bicycle => BICYCLE_PEDAL,
        }
    }

    fn braking_delta(&self) -> f64 {
        match self.kind {
            VehicleKind::Car => CAR_BRAKING,
            VehicleKind::SportsCar { .. } => SPORTS_BRAKING,
            VehicleKind::Truck { cargo_capacity, current_cargo } => {
                let load = load_ratio(current_cargo, cargo_capacity);
                (TRUCK_BASE_BRAKING / (1.0 + load)).max(TRUCK_MIN_BRAKING)
            }
            VehicleKind::Motorcycle => MOTORCYCLE_BRAKING,
            VehicleKind::Bicycle => BICYCLE_BRAKING,
        }
    }

    // ---------------------------------------------------------------------
    // Manutenção
    // ---------------------------------------------------------------------

    /// Rechaza registros inválidos o con id repetido sin tocar el historial
    pub fn add_maintenance_record(&mut self, record: MaintenanceRecord) -> Result<(), VehicleError> {
        let validation = record.validate();
        if !validation.is_valid {
            return Err(VehicleError::InvalidMaintenance(validation.errors));
        }
        if self.maintenance_records.iter().any(|r| r.id() == record.id()) {
            return Err(VehicleError::InvalidMaintenance(vec![format!(
                "Registro '{}' já existe",
                record.id()
            )]));
        }

        log::info!("🔧 Manutenção '{}' adicionada a {}", record.service_type(), self.id);
        self.maintenance_records.push(record);
        self.maintenance_records.sort_by(cmp_recent_first);
        Ok(())
    }

    pub fn remove_maintenance_record(&mut self, id: &str) -> Result<MaintenanceRecord, VehicleError> {
        let position = self
            .maintenance_records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| VehicleError::RecordNotFound(id.to_string()))?;

        log::info!("🗑️ Manutenção '{}' removida de {}", id, self.id);
        Ok(self.maintenance_records.remove(position))
    }

    /// Registros con fecha inválida no aparecen en ninguna partición
    pub fn partition_maintenance_records(&self, now: &DateTime<Utc>) -> MaintenancePartition<'_> {
        let mut past = Vec::new();
        let mut future = Vec::new();

        for record in &self.maintenance_records {
            match record.timestamp().as_datetime() {
                Some(dt) if dt <= now => past.push(record),
                Some(_) => future.push(record),
                None => {}
            }
        }

        past.sort_by(|a, b| cmp_recent_first(a, b));
        future.sort_by(|a, b| cmp_recent_first(b, a));

        MaintenancePartition { past, future }
    }

    // ---------------------------------------------------------------------
    // Persistencia
    // ---------------------------------------------------------------------

    pub fn serialize(&self) -> VehicleData {
        let (capacidade_carga, carga_atual, turbo_ativado) = match self.kind {
            VehicleKind::Truck { cargo_capacity, current_cargo } => {
                (Some(cargo_capacity), Some(current_cargo), None)
            }
            VehicleKind::SportsCar { turbo_engaged } => (None, None, Some(turbo_engaged)),
            _ => (None, None, None),
        };

        VehicleData {
            id: self.id.clone(),
            tipo: self.vehicle_type().tag().to_string(),
            modelo: self.model.clone(),
            cor: self.color.clone(),
            placa: self.plate.clone(),
            capacidade_carga,
            carga_atual,
            turbo_ativado,
            historico_manutencao: self
                .maintenance_records
                .iter()
                .map(MaintenanceRecord::serialize)
                .collect(),
        }
    }

    /// Reconstruye un vehículo apagado y parado a partir de su forma persistida
    pub fn from_data(data: VehicleData) -> Result<Self, GarageError> {
        let vehicle_type = VehicleType::from_tag(&data.tipo)
            .ok_or_else(|| GarageError::UnknownVehicleType(data.tipo.clone()))?;

        let kind = match vehicle_type {
            VehicleType::Car => VehicleKind::Car,
            // El turbo exige motor ligado; al recargar el vehículo está desligado.
            VehicleType::SportsCar => VehicleKind::sports_car(),
            VehicleType::Truck => {
                let cargo_capacity = data
                    .capacidade_carga
                    .filter(|c| c.is_finite() && *c > 0.0)
                    .ok_or_else(|| {
                        GarageError::CorruptData(format!(
                            "capacidade inválida para {}: {:?}",
                            data.id, data.capacidade_carga
                        ))
                    })?;
                let current_cargo = data
                    .carga_atual
                    .filter(|c| c.is_finite())
                    .unwrap_or_default()
                    .clamp(0.0, cargo_capacity);
                VehicleKind::Truck { cargo_capacity, current_cargo }
            }
            VehicleType::Motorcycle => VehicleKind::Motorcycle,
            VehicleType::Bicycle => VehicleKind::Bicycle,
        };

        // Ids únicos por vehículo: se queda el primero de cada id repetido
        let mut seen_ids = HashSet::new();
        let mut maintenance_records: Vec<MaintenanceRecord> = data
            .historico_manutencao
            .iter()
            .filter_map(MaintenanceRecord::deserialize)
            .filter(|record| {
                let fresh = seen_ids.insert(record.id().to_string());
                if !fresh {
                    log::warn!(
                        "⚠️ Registro de manutenção '{}' repetido em {}, descartado",
                        record.id(),
                        data.id
                    );
                }
                fresh
            })
            .collect();
        maintenance_records.sort_by(cmp_recent_first);

        Ok(Self {
            id: data.id,
            plate: data.placa.filter(|p| !p.trim().is_empty()),
            model: data.modelo,
            color: data.cor,
            powered_on: false,
            speed: 0.0,
            kind,
            maintenance_records,
        })
    }
}

fn unsupported(operation: &'static str, vehicle_type: VehicleType) -> VehicleError {
    VehicleError::Unsupported {
        operation,
        vehicle_type: vehicle_type.label(),
    }
}

fn load_ratio(current_cargo: f64, cargo_capacity: f64) -> f64 {
    if cargo_capacity <= 0.0 {
        return 0.0;
    }
    current_cargo / (2.0 * cargo_capacity)
}

fn display_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn generate_vehicle_id(vehicle_type: VehicleType, model: &str) -> String {
    let slug: String = model
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();

    if slug.is_empty() {
        format!("{}_{}", vehicle_type.tag(), suffix)
    } else {
        format!("{}_{}_{}", vehicle_type.tag(), slug, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn car() -> Vehicle {
        Vehicle::new(VehicleKind::Car, "Fusca", "Azul")
    }

    fn truck(capacity: f64) -> Vehicle {
        Vehicle::new(VehicleKind::truck(capacity).unwrap(), "Scania R450", "Branco")
    }

    fn sports_car() -> Vehicle {
        Vehicle::new(VehicleKind::sports_car(), "Ferrari", "Vermelho")
    }

    fn assert_powered_invariants(vehicle: &Vehicle) {
        assert!(vehicle.speed() >= 0.0);
        if vehicle.vehicle_type().is_powered() && !vehicle.is_powered_on() {
            assert_eq!(vehicle.speed(), 0.0);
        }
        if vehicle.turbo_engaged() == Some(true) {
            assert!(vehicle.is_powered_on());
        }
        if let (Some(cargo), Some(capacity)) = (vehicle.current_cargo(), vehicle.cargo_capacity()) {
            assert!(cargo >= 0.0 && cargo <= capacity);
        }
    }

    #[test]
    fn test_vehicle_type_tags() {
        assert_eq!(VehicleType::from_tag("CarroEsportivo"), Some(VehicleType::SportsCar));
        assert_eq!(VehicleType::from_tag("caminhão"), Some(VehicleType::Truck));
        assert_eq!(VehicleType::from_tag(" moto "), Some(VehicleType::Motorcycle));
        assert_eq!(VehicleType::from_tag("avião"), None);
        for t in VehicleType::ALL {
            assert_eq!(VehicleType::from_tag(t.tag()), Some(t));
        }
    }

    #[test]
    fn test_generated_id_uses_type_and_model() {
        let vehicle = Vehicle::new(VehicleKind::Motorcycle, "CB 500", "Preta");
        assert!(vehicle.id().starts_with("moto_cb-500_"));
        assert_eq!(vehicle.key(), vehicle.id());

        let plated = vehicle.with_plate(Some("ABC1234".to_string()));
        assert_eq!(plated.key(), "ABC1234");
    }

    #[test]
    fn test_car_scenario() {
        let mut vehicle = car();

        assert!(vehicle.power_on().is_ok());
        assert!(vehicle.is_powered_on());
        vehicle.accelerate().unwrap();
        assert_eq!(vehicle.speed(), 10.0);
        vehicle.brake().unwrap();
        assert_eq!(vehicle.speed(), 0.0);
        assert!(vehicle.power_off().is_ok());
        assert!(!vehicle.is_powered_on());
    }

    #[test]
    fn test_power_transitions_reject_without_changes() {
        let mut vehicle = car();

        assert_eq!(vehicle.power_off(), Err(VehicleError::AlreadyOff("Carro Fusca".into())));
        assert_eq!(vehicle.accelerate(), Err(VehicleError::PoweredOff("Carro Fusca".into())));
        assert_eq!(vehicle.speed(), 0.0);

        vehicle.power_on().unwrap();
        assert_eq!(vehicle.power_on(), Err(VehicleError::AlreadyOn("Carro Fusca".into())));

        vehicle.accelerate().unwrap();
        assert_eq!(vehicle.power_off(), Err(VehicleError::MustStopFirst("Carro Fusca".into())));
        assert!(vehicle.is_powered_on());
        assert_eq!(vehicle.speed(), 10.0);
    }

    #[test]
    fn test_brake_never_goes_negative() {
        let mut vehicle = Vehicle::new(VehicleKind::Motorcycle, "CB 500", "Preta");
        vehicle.power_on().unwrap();
        vehicle.accelerate().unwrap();
        assert_eq!(vehicle.speed(), 18.0);

        vehicle.brake().unwrap();
        assert_eq!(vehicle.speed(), 3.0);
        vehicle.brake().unwrap();
        assert_eq!(vehicle.speed(), 0.0);
        assert!(matches!(vehicle.brake(), Err(VehicleError::AlreadyStopped(_))));
        assert_eq!(vehicle.speed(), 0.0);
    }

    #[test]
    fn test_random_action_sequences_keep_invariants() {
        let mut rng = rand::thread_rng();
        let actions = [
            VehicleAction::PowerOn,
            VehicleAction::PowerOff,
            VehicleAction::Accelerate,
            VehicleAction::Brake,
            VehicleAction::Honk,
            VehicleAction::Pedal,
            VehicleAction::LoadCargo { amount: 700.0 },
            VehicleAction::UnloadCargo { amount: 300.0 },
            VehicleAction::EngageTurbo,
            VehicleAction::DisengageTurbo,
        ];

        let mut fleet = vec![
            car(),
            sports_car(),
            truck(2000.0),
            Vehicle::new(VehicleKind::Motorcycle, "CB 500", "Preta"),
            Vehicle::new(VehicleKind::Bicycle, "Caloi", "Verde"),
        ];

        for vehicle in fleet.iter_mut() {
            for _ in 0..500 {
                let action = actions[rng.gen_range(0..actions.len())];
                let before = vehicle.clone();
                if vehicle.apply(action).is_err() {
                    assert_eq!(*vehicle, before, "rejected {:?} changed state", action);
                }
                assert_powered_invariants(vehicle);
            }
        }
    }

    #[test]
    fn test_truck_cargo_scenario() {
        let mut vehicle = truck(5000.0);
        vehicle.power_on().unwrap();

        assert!(matches!(vehicle.load_cargo(6000.0), Err(VehicleError::OverCapacity { .. })));
        assert_eq!(vehicle.current_cargo(), Some(0.0));

        vehicle.load_cargo(4000.0).unwrap();
        assert_eq!(vehicle.current_cargo(), Some(4000.0));

        assert!(matches!(vehicle.unload_cargo(5000.0), Err(VehicleError::NotEnoughCargo { .. })));
        assert_eq!(vehicle.current_cargo(), Some(4000.0));
    }

    #[test]
    fn test_truck_cargo_requires_power_and_valid_amount() {
        let mut vehicle = truck(1000.0);

        assert!(matches!(vehicle.load_cargo(100.0), Err(VehicleError::PoweredOff(_))));
        vehicle.power_on().unwrap();
        assert!(matches!(vehicle.load_cargo(-5.0), Err(VehicleError::InvalidAmount(_))));
        assert!(matches!(vehicle.load_cargo(f64::NAN), Err(VehicleError::InvalidAmount(_))));
        assert!(matches!(vehicle.unload_cargo(0.0), Err(VehicleError::InvalidAmount(_))));
        assert_eq!(vehicle.current_cargo(), Some(0.0));

        assert!(matches!(
            car().load_cargo(10.0),
            Err(VehicleError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_truck_deltas_depend_on_load() {
        let mut vehicle = truck(1000.0);
        vehicle.power_on().unwrap();
        vehicle.accelerate().unwrap();
        assert_eq!(vehicle.speed(), 5.0);

        vehicle.load_cargo(1000.0).unwrap();
        // carga/(2*capacidade) = 0.5 -> 5 * 0.5 = 2.5
        vehicle.accelerate().unwrap();
        assert_eq!(vehicle.speed(), 7.5);
        // 7 / 1.5 ≈ 4.67
        vehicle.brake().unwrap();
        assert!((vehicle.speed() - (7.5 - 7.0 / 1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_sports_car_turbo_scenario() {
        let mut vehicle = sports_car();

        assert!(matches!(vehicle.engage_turbo(), Err(VehicleError::PoweredOff(_))));
        vehicle.power_on().unwrap();
        vehicle.engage_turbo().unwrap();
        assert_eq!(vehicle.turbo_engaged(), Some(true));
        assert_eq!(vehicle.engage_turbo(), Err(VehicleError::TurboAlreadyEngaged));

        vehicle.accelerate().unwrap();
        assert_eq!(vehicle.speed(), 50.0);
        assert!(matches!(vehicle.power_off(), Err(VehicleError::MustStopFirst(_))));

        while vehicle.speed() > 0.0 {
            vehicle.brake().unwrap();
        }
        vehicle.power_off().unwrap();
        assert_eq!(vehicle.turbo_engaged(), Some(false));
        assert_eq!(vehicle.disengage_turbo(), Err(VehicleError::TurboAlreadyDisengaged));
    }

    #[test]
    fn test_bicycle_has_no_engine() {
        let mut bike = Vehicle::new(VehicleKind::Bicycle, "Caloi", "Verde");

        assert_eq!(bike.power_on().unwrap().level, FeedbackLevel::Info);
        assert!(bike.is_powered_on());
        bike.pedal().unwrap();
        bike.accelerate().unwrap();
        assert_eq!(bike.speed(), 5.0);
        assert_eq!(bike.power_off().unwrap().level, FeedbackLevel::Info);
        assert_eq!(bike.speed(), 5.0);
        bike.brake().unwrap();
        assert_eq!(bike.speed(), 3.0);

        assert!(matches!(car().pedal(), Err(VehicleError::Unsupported { .. })));
    }

    #[test]
    fn test_honk_picks_cue_without_mutation() {
        let vehicle = truck(100.0);
        let before = vehicle.clone();
        assert_eq!(vehicle.honk().cue, Some(SoundCue::TruckHorn));
        assert_eq!(vehicle, before);

        let bike = Vehicle::new(VehicleKind::Bicycle, "Caloi", "Verde");
        assert_eq!(bike.honk().cue, Some(SoundCue::BicycleBell));
    }

    #[test]
    fn test_rejects_negative_cost_record() {
        let mut vehicle = car();
        let record = MaintenanceRecord::create("2024-01-10", "Revisão", "-50", "");

        assert!(matches!(
            vehicle.add_maintenance_record(record),
            Err(VehicleError::InvalidMaintenance(_))
        ));
        assert!(vehicle.maintenance_records().is_empty());
    }

    #[test]
    fn test_records_kept_most_recent_first() {
        let mut vehicle = car();
        vehicle
            .add_maintenance_record(MaintenanceRecord::create("2023-01-01", "A", "10", ""))
            .unwrap();
        vehicle
            .add_maintenance_record(MaintenanceRecord::create("2024-06-01", "B", "20", ""))
            .unwrap();
        vehicle
            .add_maintenance_record(MaintenanceRecord::create("2023-09-01", "C", "30", ""))
            .unwrap();

        let order: Vec<&str> = vehicle.maintenance_records().iter().map(|r| r.service_type()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_remove_maintenance_record() {
        let mut vehicle = car();
        let record = MaintenanceRecord::create("2024-01-10", "Revisão", "100", "");
        let id = record.id().to_string();
        vehicle.add_maintenance_record(record).unwrap();

        assert_eq!(
            vehicle.remove_maintenance_record("missing"),
            Err(VehicleError::RecordNotFound("missing".into()))
        );
        assert_eq!(vehicle.maintenance_records().len(), 1);

        assert_eq!(vehicle.remove_maintenance_record(&id).unwrap().id(), id);
        assert!(vehicle.maintenance_records().is_empty());
    }

    #[test]
    fn test_partition_maintenance_records() {
        let now = Utc::now();
        let mut vehicle = car();
        for (offset, name) in [(-30, "old"), (-1, "recent"), (2, "soon"), (40, "later")] {
            vehicle
                .add_maintenance_record(MaintenanceRecord::new(
                    now + Duration::days(offset),
                    name,
                    Decimal::ZERO,
                    "",
                ))
                .unwrap();
        }
        // Fecha inválida: sólo se puede cargar desde datos persistidos
        let mut data = vehicle.serialize();
        data.historico_manutencao.push(MaintenanceRecordData {
            data: Some("???".into()),
            tipo: Some("broken".into()),
            custo: None,
            descricao: None,
            id: Some("x".into()),
        });
        let vehicle = Vehicle::from_data(data).unwrap();

        let partition = vehicle.partition_maintenance_records(&now);
        let past: Vec<&str> = partition.past.iter().map(|r| r.service_type()).collect();
        let future: Vec<&str> = partition.future.iter().map(|r| r.service_type()).collect();

        assert_eq!(past, vec!["recent", "old"]);
        assert_eq!(future, vec!["soon", "later"]);
        assert_eq!(vehicle.maintenance_records().len(), 5);
    }

    #[test]
    fn test_serialize_excludes_volatile_state() {
        let mut vehicle = truck(3000.0).with_plate(Some("ABC1234".into()));
        vehicle.power_on().unwrap();
        vehicle.load_cargo(1200.0).unwrap();
        vehicle.accelerate().unwrap();

        let json = serde_json::to_value(vehicle.serialize()).unwrap();
        assert_eq!(json["tipo"], "caminhao");
        assert_eq!(json["capacidadeCarga"], 3000.0);
        assert_eq!(json["cargaAtual"], 1200.0);
        assert_eq!(json["placa"], "ABC1234");
        assert!(json.get("speed").is_none());
        assert!(json.get("turboAtivado").is_none());

        let restored = Vehicle::from_data(serde_json::from_value(json).unwrap()).unwrap();
        assert_eq!(restored.speed(), 0.0);
        assert!(!restored.is_powered_on());
        assert_eq!(restored.current_cargo(), Some(1200.0));
        assert_eq!(restored.key(), "ABC1234");
    }

    #[test]
    fn test_from_data_rejects_unknown_type_and_clamps_cargo() {
        let data: VehicleData = serde_json::from_value(serde_json::json!({
            "id": "x", "tipo": "aviao", "modelo": "747", "cor": "branco"
        }))
        .unwrap();
        assert!(matches!(Vehicle::from_data(data), Err(GarageError::UnknownVehicleType(_))));

        let data: VehicleData = serde_json::from_value(serde_json::json!({
            "id": "t", "tipo": "caminhao", "modelo": "Volvo", "cor": "azul",
            "capacidadeCarga": 100.0, "cargaAtual": 250.0
        }))
        .unwrap();
        assert_eq!(Vehicle::from_data(data).unwrap().current_cargo(), Some(100.0));

        let data: VehicleData = serde_json::from_value(serde_json::json!({
            "id": "s", "tipo": "carroesportivo", "modelo": "Porsche", "cor": "prata",
            "turboAtivado": true
        }))
        .unwrap();
        assert_eq!(Vehicle::from_data(data).unwrap().turbo_engaged(), Some(false));
    }

    #[test]
    fn test_from_data_neutralizes_negative_stored_cost() {
        let data: VehicleData = serde_json::from_value(serde_json::json!({
            "id": "a", "tipo": "carro", "modelo": "Uno", "cor": "branco",
            "historicoManutencao": [
                {"data": "2024-01-01", "tipo": "Pneus", "custo": -80, "id": "r1"}
            ]
        }))
        .unwrap();
        let vehicle = Vehicle::from_data(data).unwrap();

        let records = vehicle.maintenance_records();
        assert_eq!(records.len(), 1);
        assert!(records[0].cost().is_defaulted());
        assert_eq!(records[0].cost().amount(), Decimal::ZERO);
        assert!(!records[0].format_for_history().contains("-R$"));
    }

    #[test]
    fn test_from_data_drops_repeated_record_ids() {
        let data: VehicleData = serde_json::from_value(serde_json::json!({
            "id": "a", "tipo": "carro", "modelo": "Uno", "cor": "branco",
            "historicoManutencao": [
                {"data": "2024-02-01", "tipo": "Óleo", "custo": 100, "id": "dup"},
                {"data": "2024-03-01", "tipo": "Freios", "custo": 300, "id": "dup"},
                {"data": "2024-01-01", "tipo": "Pneus", "custo": 50, "id": "other"}
            ]
        }))
        .unwrap();
        let mut vehicle = Vehicle::from_data(data).unwrap();

        let ids: Vec<&str> = vehicle.maintenance_records().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["dup", "other"]);
        assert_eq!(vehicle.maintenance_records()[0].service_type(), "Óleo");

        vehicle.remove_maintenance_record("dup").unwrap();
        assert!(vehicle.maintenance_records().iter().all(|r| r.id() != "dup"));
    }
}
