//! Modelos del sistema
//!
//! Este módulo contiene el núcleo del simulador: vehículos, su historial
//! de manutenção y la garagem que los agrupa. No hace I/O.

pub mod garage;
pub mod maintenance;
pub mod vehicle;

pub use garage::{Garage, LoadSummary};
pub use maintenance::{MaintenanceRecord, MaintenanceRecordData, RecordCost, RecordDate, RecordValidation};
pub use vehicle::{
    Feedback, FeedbackLevel, MaintenancePartition, SoundCue, Vehicle, VehicleAction, VehicleData,
    VehicleKind, VehicleType,
};
