//! Modelo de MaintenanceRecord
//!
//! Un registro de manutenção representa un servicio ya realizado (pasado)
//! o una cita agendada (futuro). La creación es tolerante: una fecha o un
//! costo que no se pueden interpretar quedan marcados explícitamente
//! (`RecordDate::Invalid`, `RecordCost::Defaulted`) y es `validate()` quien
//! decide si el registro se acepta.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::format::{format_brl, format_date, format_time};

/// Texto mostrado en lugar de una fecha inválida
pub const INVALID_DATE_LABEL: &str = "Data inválida";

const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Costos con más decimales o mayores que esto no sobreviven al `custo` numérico
const MAX_COST_DECIMALS: u32 = 2;
const MAX_COST_INTEGER: i64 = 10_000_000_000_000;

/// Fecha de un registro; `Invalid` guarda el texto original
#[derive(Debug, Clone, PartialEq)]
pub enum RecordDate {
    Valid(DateTime<Utc>),
    Invalid(String),
}

impl RecordDate {
    /// Interpreta RFC3339, `datetime-local` (UTC), `YYYY-MM-DD` o `DD/MM/YYYY`
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return RecordDate::Valid(dt.with_timezone(&Utc));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return RecordDate::Valid(Utc.from_utc_datetime(&naive));
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                    return RecordDate::Valid(Utc.from_utc_datetime(&naive));
                }
            }
        }

        RecordDate::Invalid(value.to_string())
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            RecordDate::Valid(dt) => Some(dt),
            RecordDate::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, RecordDate::Valid(_))
    }

    /// Forma persistida: RFC3339, o el texto original si era inválida
    pub fn to_persisted(&self) -> String {
        match self {
            RecordDate::Valid(dt) => dt.to_rfc3339(),
            RecordDate::Invalid(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for RecordDate {
    fn from(value: DateTime<Utc>) -> Self {
        RecordDate::Valid(value)
    }
}

/// Costo de un registro. `Defaulted` vale 0 y guarda el texto rechazado.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordCost {
    AsGiven(Decimal),
    Defaulted(String),
}

impl RecordCost {
    /// Un costo vacío es 0; acepta coma decimal (`150,50`)
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() {
            return RecordCost::AsGiven(Decimal::ZERO);
        }

        match parse_decimal(value) {
            Ok(amount) => RecordCost::AsGiven(amount),
            Err(_) => {
                log::warn!("⚠️ Custo inválido '{}', usando 0", value);
                RecordCost::Defaulted(value.to_string())
            }
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            RecordCost::AsGiven(amount) => *amount,
            RecordCost::Defaulted(_) => Decimal::ZERO,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, RecordCost::Defaulted(_))
    }
}

impl From<Decimal> for RecordCost {
    fn from(value: Decimal) -> Self {
        RecordCost::AsGiven(value)
    }
}

/// Resultado de `MaintenanceRecord::validate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Forma plana persistida de un registro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecordData {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default, with = "persisted_cost")]
    pub custo: Option<Decimal>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Un servicio realizado o agendado
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceRecord {
    id: String,
    timestamp: RecordDate,
    service_type: String,
    cost: RecordCost,
    description: String,
}

impl MaintenanceRecord {
    /// Construye un registro a partir de los campos del formulario. No falla nunca.
    pub fn create(timestamp: &str, service_type: &str, cost: &str, description: &str) -> Self {
        Self {
            id: generate_record_id(),
            timestamp: RecordDate::parse(timestamp),
            service_type: service_type.trim().to_string(),
            cost: RecordCost::parse(cost),
            description: description.trim().to_string(),
        }
    }

    /// Variante tipada de `create`, usada por la API y los tests
    pub fn new(
        timestamp: impl Into<RecordDate>,
        service_type: &str,
        cost: impl Into<RecordCost>,
        description: &str,
    ) -> Self {
        Self {
            id: generate_record_id(),
            timestamp: timestamp.into(),
            service_type: service_type.trim().to_string(),
            cost: cost.into(),
            description: description.trim().to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> &RecordDate {
        &self.timestamp
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn cost(&self) -> &RecordCost {
        &self.cost
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn validate(&self) -> RecordValidation {
        let mut errors = Vec::new();

        if let RecordDate::Invalid(raw) = &self.timestamp {
            errors.push(format!("Data inválida: '{}'", raw));
        }
        if self.service_type.is_empty() {
            errors.push("Tipo de serviço é obrigatório".to_string());
        }
        match &self.cost {
            RecordCost::AsGiven(amount) => errors.extend(cost_problem(amount)),
            RecordCost::Defaulted(raw) => {
                errors.push(format!("Custo inválido: '{}'", raw));
            }
        }

        RecordValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// `Troca de óleo em 15/03/2024 - R$ 150,00 (Óleo sintético)`
    pub fn format_for_history(&self) -> String {
        let date = match &self.timestamp {
            RecordDate::Valid(dt) => format_date(dt),
            RecordDate::Invalid(_) => INVALID_DATE_LABEL.to_string(),
        };
        let mut text = format!(
            "{} em {} - {}",
            self.service_type,
            date,
            format_brl(self.cost.amount())
        );
        self.push_description(&mut text);
        text
    }

    /// `Revisão agendado para 20/12/2026 às 09:30 (Verificar freios)`
    pub fn format_for_schedule(&self) -> String {
        let when = match &self.timestamp {
            RecordDate::Valid(dt) => format!("{} às {}", format_date(dt), format_time(dt)),
            RecordDate::Invalid(_) => INVALID_DATE_LABEL.to_string(),
        };
        let mut text = format!("{} agendado para {}", self.service_type, when);
        self.push_description(&mut text);
        text
    }

    fn push_description(&self, text: &mut String) {
        if !self.description.is_empty() {
            text.push_str(&format!(" ({})", self.description));
        }
    }

    /// `true` si la fecha es válida y no posterior a `now`
    pub fn is_past(&self, now: &DateTime<Utc>) -> bool {
        matches!(&self.timestamp, RecordDate::Valid(dt) if dt <= now)
    }

    pub fn serialize(&self) -> MaintenanceRecordData {
        MaintenanceRecordData {
            data: Some(self.timestamp.to_persisted()),
            tipo: Some(self.service_type.clone()),
            custo: Some(self.cost.amount()),
            descricao: Some(self.description.clone()),
            id: Some(self.id.clone()),
        }
    }

    /// `None` si falta el tipo de serviço; conserva el id persistido o genera uno
    pub fn deserialize(data: &MaintenanceRecordData) -> Option<Self> {
        let service_type = data.tipo.as_deref().map(str::trim).unwrap_or_default();
        if service_type.is_empty() {
            log::warn!("⚠️ Registro de manutenção sem tipo descartado: {:?}", data.id);
            return None;
        }

        let id = data
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_record_id);

        // Un costo persistido fuera de rango se conserva marcado y vale 0
        let cost = match data.custo {
            Some(amount) => match cost_problem(&amount) {
                Some(problem) => {
                    log::warn!("⚠️ Registro {}: {}, usando 0", id, problem);
                    RecordCost::Defaulted(amount.to_string())
                }
                None => RecordCost::AsGiven(amount),
            },
            None => RecordCost::AsGiven(Decimal::ZERO),
        };

        Some(Self {
            id,
            timestamp: RecordDate::parse(data.data.as_deref().unwrap_or_default()),
            service_type: service_type.to_string(),
            cost,
            description: data.descricao.as_deref().unwrap_or_default().trim().to_string(),
        })
    }
}

fn cost_problem(amount: &Decimal) -> Option<String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Some("Custo não pode ser negativo".to_string());
    }
    if amount.normalize().scale() > MAX_COST_DECIMALS {
        return Some(format!("Custo com mais de {} casas decimais: '{}'", MAX_COST_DECIMALS, amount));
    }
    if amount.abs() >= Decimal::from(MAX_COST_INTEGER) {
        return Some(format!("Custo acima do limite: '{}'", amount));
    }
    None
}

/// Acepta coma decimal cuando no hay punto (`150,50`)
fn parse_decimal(value: &str) -> Result<Decimal, rust_decimal::Error> {
    if value.contains(',') && !value.contains('.') {
        Decimal::from_str(&value.replace(',', "."))
    } else {
        Decimal::from_str(value)
    }
}

/// `custo` se guarda como número JSON. Con a lo sumo 15 dígitos significativos
/// el paso por `f64` devuelve exactamente el mismo decimal.
mod persisted_cost {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCost {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(amount) => {
                let number = f64::from_str(&amount.to_string()).map_err(ser::Error::custom)?;
                serializer.serialize_f64(number)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
        let Some(raw) = Option::<RawCost>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let parsed = match raw {
            RawCost::Number(number) => Decimal::from_str(&number.to_string()),
            RawCost::Text(text) if text.trim().is_empty() => return Ok(None),
            RawCost::Text(text) => super::parse_decimal(text.trim()),
        };
        parsed.map(Some).map_err(de::Error::custom)
    }
}

/// Orden del historial: más recientes primero, fechas inválidas al final
pub(crate) fn cmp_recent_first(a: &MaintenanceRecord, b: &MaintenanceRecord) -> Ordering {
    match (a.timestamp.as_datetime(), b.timestamp.as_datetime()) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn generate_record_id() -> String {
    format!("manut_{}", Uuid::new_v4().simple())
}
