use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{MaintenancePartition, MaintenanceRecord};

// Request para agregar una manutenção. Fecha y costo llegan tal cual del
// formulario; la validación de fondo la hace el modelo.
#[derive(Debug, Deserialize, Validate)]
pub struct AddMaintenanceRequest {
    #[serde(default)]
    pub date: String,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub service_type: String,

    /// Número o texto; vacío equivale a 0
    #[serde(default)]
    pub cost: Value,

    #[validate(length(max = 500))]
    #[serde(default)]
    pub description: String,
}

impl AddMaintenanceRequest {
    pub fn into_record(self) -> MaintenanceRecord {
        let cost = match &self.cost {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        MaintenanceRecord::create(&self.date, &self.service_type, &cost, &self.description)
    }
}

// Response de un registro de manutenção
#[derive(Debug, Serialize)]
pub struct MaintenanceRecordResponse {
    pub id: String,
    pub date: Option<String>,
    pub service_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    pub description: String,
    pub display: String,
}

impl MaintenanceRecordResponse {
    pub fn history(record: &MaintenanceRecord) -> Self {
        Self::with_display(record, record.format_for_history())
    }

    pub fn schedule(record: &MaintenanceRecord) -> Self {
        Self::with_display(record, record.format_for_schedule())
    }

    fn with_display(record: &MaintenanceRecord, display: String) -> Self {
        Self {
            id: record.id().to_string(),
            date: record.timestamp().as_datetime().map(|dt| dt.to_rfc3339()),
            service_type: record.service_type().to_string(),
            cost: record.cost().amount(),
            description: record.description().to_string(),
            display,
        }
    }
}

// Historial particionado para la UI
#[derive(Debug, Serialize)]
pub struct MaintenanceListResponse {
    pub past: Vec<MaintenanceRecordResponse>,
    pub future: Vec<MaintenanceRecordResponse>,
}

impl From<MaintenancePartition<'_>> for MaintenanceListResponse {
    fn from(partition: MaintenancePartition<'_>) -> Self {
        Self {
            past: partition
                .past
                .into_iter()
                .map(MaintenanceRecordResponse::history)
                .collect(),
            future: partition
                .future
                .into_iter()
                .map(MaintenanceRecordResponse::schedule)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_record_accepts_number_or_text_cost() {
        let request: AddMaintenanceRequest = serde_json::from_value(json!({
            "date": "2024-06-01", "service_type": "Óleo", "cost": 120.5
        }))
        .unwrap();
        let record = request.into_record();
        assert_eq!(record.cost().amount(), Decimal::new(1205, 1));
        assert!(record.validate().is_valid);

        let request: AddMaintenanceRequest = serde_json::from_value(json!({
            "date": "2024-06-01", "service_type": "Óleo", "cost": "89,90"
        }))
        .unwrap();
        assert_eq!(request.into_record().cost().amount(), Decimal::new(8990, 2));

        let request: AddMaintenanceRequest = serde_json::from_value(json!({
            "date": "2024-06-01", "service_type": "Óleo"
        }))
        .unwrap();
        assert_eq!(request.into_record().cost().amount(), Decimal::ZERO);
    }
}
