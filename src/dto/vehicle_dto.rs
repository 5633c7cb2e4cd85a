use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Feedback, Vehicle, VehicleKind, VehicleType};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{normalize_plate, validate_not_empty, validate_plate};

fn validate_vehicle_type(value: &str) -> Result<(), ValidationError> {
    if VehicleType::from_tag(value).is_none() {
        let mut error = ValidationError::new("vehicle_type");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_vehicle_type")]
    pub vehicle_type: String,

    #[validate(length(max = 100), custom = "validate_not_empty")]
    pub model: String,

    #[validate(length(max = 50), custom = "validate_not_empty")]
    pub color: String,

    #[validate(custom = "validate_plate")]
    pub plate: Option<String>,

    pub cargo_capacity: Option<f64>,

    /// Id explícito; si falta se genera
    pub id: Option<String>,
}

impl CreateVehicleRequest {
    /// Construir el vehículo ya validado
    pub fn into_vehicle(self) -> AppResult<Vehicle> {
        let vehicle_type = VehicleType::from_tag(&self.vehicle_type)
            .ok_or_else(|| AppError::BadRequest(format!("Tipo desconhecido: {}", self.vehicle_type)))?;

        let kind = match vehicle_type {
            VehicleType::Car => VehicleKind::Car,
            VehicleType::SportsCar => VehicleKind::sports_car(),
            VehicleType::Truck => {
                let capacity = self.cargo_capacity.ok_or_else(|| {
                    AppError::BadRequest("cargo_capacity é obrigatório para caminhões".to_string())
                })?;
                VehicleKind::truck(capacity).map_err(AppError::Rejected)?
            }
            VehicleType::Motorcycle => VehicleKind::Motorcycle,
            VehicleType::Bicycle => VehicleKind::Bicycle,
        };

        let mut vehicle = Vehicle::new(kind, &self.model, &self.color)
            .with_plate(self.plate.as_deref().map(normalize_plate));
        if let Some(id) = self.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            vehicle = vehicle.with_id(id);
        }
        Ok(vehicle)
    }
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub key: String,
    pub id: String,
    pub vehicle_type: VehicleType,
    pub label: String,
    pub model: String,
    pub color: String,
    pub plate: Option<String>,
    pub powered_on: bool,
    pub speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turbo_engaged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_cargo: Option<f64>,
    pub maintenance_count: usize,
}

impl From<&Vehicle> for VehicleResponse {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            key: vehicle.key().to_string(),
            id: vehicle.id().to_string(),
            vehicle_type: vehicle.vehicle_type(),
            label: vehicle.vehicle_type().label().to_string(),
            model: vehicle.model().to_string(),
            color: vehicle.color().to_string(),
            plate: vehicle.plate().map(str::to_string),
            powered_on: vehicle.is_powered_on(),
            speed: vehicle.speed(),
            turbo_engaged: vehicle.turbo_engaged(),
            cargo_capacity: vehicle.cargo_capacity(),
            current_cargo: vehicle.current_cargo(),
            maintenance_count: vehicle.maintenance_records().len(),
        }
    }
}

// Response de una acción aceptada
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub feedback: Feedback,
    pub vehicle: VehicleResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(vehicle_type: &str) -> CreateVehicleRequest {
        CreateVehicleRequest {
            vehicle_type: vehicle_type.to_string(),
            model: "Actros".to_string(),
            color: "Prata".to_string(),
            plate: Some("abc-1234".to_string()),
            cargo_capacity: Some(12000.0),
            id: None,
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(request("caminhao").validate().is_ok());
        assert!(request("submarino").validate().is_err());

        let mut bad_plate = request("carro");
        bad_plate.plate = Some("12".to_string());
        assert!(bad_plate.validate().is_err());

        let mut blank_model = request("carro");
        blank_model.model = "  ".to_string();
        assert!(blank_model.validate().is_err());
    }

    #[test]
    fn test_into_vehicle_normalizes_plate() {
        let vehicle = request("caminhao").into_vehicle().unwrap();
        assert_eq!(vehicle.key(), "ABC1234");
        assert_eq!(vehicle.cargo_capacity(), Some(12000.0));
        assert_eq!(vehicle.current_cargo(), Some(0.0));
    }

    #[test]
    fn test_truck_requires_capacity() {
        let mut missing = request("caminhao");
        missing.cargo_capacity = None;
        assert!(matches!(missing.into_vehicle(), Err(AppError::BadRequest(_))));

        let mut negative = request("caminhao");
        negative.cargo_capacity = Some(-1.0);
        assert!(matches!(negative.into_vehicle(), Err(AppError::Rejected(_))));
    }
}
