//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Gravedad con la que la UI debe mostrar un rechazo
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Rechazos de acciones sobre un vehículo. Nunca alteran el estado.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VehicleError {
    #[error("{0} já está ligado")]
    AlreadyOn(String),

    #[error("{0} já está desligado")]
    AlreadyOff(String),

    #[error("Pare o {0} antes de desligar")]
    MustStopFirst(String),

    #[error("Ligue o {0} primeiro")]
    PoweredOff(String),

    #[error("{0} já está parado")]
    AlreadyStopped(String),

    #[error("Turbo já está ativado")]
    TurboAlreadyEngaged,

    #[error("Turbo já está desativado")]
    TurboAlreadyDisengaged,

    #[error("Quantidade inválida: {0}")]
    InvalidAmount(String),

    #[error("Carga excede a capacidade: {requested} + {current} > {capacity}")]
    OverCapacity {
        requested: f64,
        current: f64,
        capacity: f64,
    },

    #[error("Não há carga suficiente para descarregar: {requested} > {current}")]
    NotEnoughCargo { requested: f64, current: f64 },

    #[error("Operação '{operation}' não suportada por {vehicle_type}")]
    Unsupported {
        operation: &'static str,
        vehicle_type: &'static str,
    },

    #[error("Registro de manutenção inválido: {}", .0.join("; "))]
    InvalidMaintenance(Vec<String>),

    #[error("Registro de manutenção '{0}' não encontrado")]
    RecordNotFound(String),
}

impl VehicleError {
    /// Los errores de validación son `Error`; las precondiciones de estado, `Warning`
    pub fn severity(&self) -> Severity {
        match self {
            VehicleError::InvalidAmount(_)
            | VehicleError::InvalidMaintenance(_)
            | VehicleError::Unsupported { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// Errores del almacén de la garagem
#[derive(Error, Debug)]
pub enum GarageError {
    #[error("Já existe um veículo com a chave '{0}'")]
    DuplicateKey(String),

    #[error("Veículo '{0}' não encontrado")]
    VehicleNotFound(String),

    #[error("Tipo de veículo desconhecido: '{0}'")]
    UnknownVehicleType(String),

    #[error("Dados da garagem corrompidos: {0}")]
    CorruptData(String),

    #[error("Falha ao serializar a garagem: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Falha ao salvar a garagem: {0}")]
    Persistence(String),

    #[error(transparent)]
    Vehicle(#[from] VehicleError),
}

/// Errores del proxy del clima. `status` refleja el del proveedor.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct WeatherError {
    pub status: u16,
    pub message: String,
}

impl WeatherError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Errores leyendo la configuración del entorno
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Variable {name} inválida: '{value}'")]
    InvalidVar { name: &'static str, value: String },
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rejected: {0}")]
    Rejected(VehicleError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl From<GarageError> for AppError {
    fn from(err: GarageError) -> Self {
        match err {
            GarageError::DuplicateKey(_) => AppError::Conflict(err.to_string()),
            GarageError::VehicleNotFound(_) => AppError::NotFound(err.to_string()),
            GarageError::Vehicle(VehicleError::RecordNotFound(_)) => {
                AppError::NotFound(err.to_string())
            }
            GarageError::Vehicle(e) => AppError::Rejected(e),
            GarageError::UnknownVehicleType(_) => AppError::BadRequest(err.to_string()),
            GarageError::CorruptData(_)
            | GarageError::Serialization(_)
            | GarageError::Persistence(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Rejected(e) => {
                let severity = e.severity();
                tracing::info!("Action rejected ({:?}): {}", severity, e);
                let status = match severity {
                    Severity::Error => StatusCode::UNPROCESSABLE_ENTITY,
                    Severity::Warning => StatusCode::CONFLICT,
                };
                let details = match &e {
                    VehicleError::InvalidMaintenance(errors) => {
                        json!({ "severity": severity, "errors": errors })
                    }
                    _ => json!({ "severity": severity }),
                };
                (
                    status,
                    ErrorResponse {
                        error: "Action Rejected".to_string(),
                        message: e.to_string(),
                        details: Some(details),
                        code: Some("ACTION_REJECTED".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
