use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::utils::errors::WeatherError;

/// Número máximo de días devueltos
pub const FORECAST_DAYS: usize = 5;

const RAIN_CONDITIONS: [&str; 3] = ["Rain", "Drizzle", "Thunderstorm"];

/// Configuración del proveedor del clima
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Previsión de un día
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub data: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub descricao: String,
    pub icone: String,
    pub vai_chover: bool,
}

/// Respuesta de `GET /api/previsao/:cidade`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityForecast {
    pub cidade: String,
    pub previsao: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
pub struct OwmForecastResponse {
    #[serde(default)]
    pub list: Vec<OwmEntry>,
    pub city: Option<OwmCity>,
}

#[derive(Debug, Deserialize)]
pub struct OwmCity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmEntry {
    pub dt_txt: String,
    pub main: OwmMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    pub rain: Option<OwmRain>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmMain {
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmRain {
    #[serde(rename = "3h", default)]
    pub three_hours: f64,
}

#[derive(Debug, Deserialize)]
struct OwmErrorBody {
    message: Option<String>,
}

/// Proxy hacia la previsión de 5 días / 3 horas de OpenWeatherMap
#[derive(Clone)]
pub struct WeatherService {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn forecast(&self, city: &str) -> Result<CityForecast, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::new(400, "Nome da cidade é obrigatório"));
        }
        let Some(api_key) = self.api_key.as_deref() else {
            log::error!("❌ OPENWEATHER_API_KEY não configurada");
            return Err(WeatherError::internal("Chave da API de clima não configurada no servidor"));
        };

        log::info!("🌦️ Buscando previsão para: {}", city);
        let url = format!(
            "{}/forecast?q={}&appid={}&units=metric&lang=pt_br",
            self.base_url,
            urlencoding::encode(city),
            api_key
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "GaragemVirtual/1.0")
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Falha na requisição de clima: {}", e);
                WeatherError::internal(format!("Erro ao contatar o serviço de clima: {}", e))
            })?;

        let status = response.status();
        log::info!("📡 Response status: {}", status);
        let body = response.text().await.map_err(|e| {
            log::error!("❌ Falha lendo a resposta de clima: {}", e);
            WeatherError::internal(format!("Erro ao ler a resposta do serviço de clima: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwmErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "Erro ao buscar previsão do tempo".to_string());
            log::warn!("⚠️ Clima falhou com status {}: {}", status, message);
            return Err(WeatherError::new(status.as_u16(), message));
        }

        let parsed: OwmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("❌ Resposta de clima ilegível: {}", e);
            WeatherError::new(502, format!("Resposta inválida do serviço de clima: {}", e))
        })?;

        let cidade = parsed
            .city
            .map(|c| c.name)
            .unwrap_or_else(|| city.to_string());
        let previsao = aggregate_daily(&parsed.list, FORECAST_DAYS);

        log::info!("✅ Previsão para {}: {} dias", cidade, previsao.len());
        Ok(CityForecast { cidade, previsao })
    }
}

/// Agrupa las entradas de 3 horas por día: mínima de mínimas, máxima de
/// máximas, descripción/icono de la entrada más cercana a las 12:00 y
/// lluvia si alguna entrada del día la reporta.
pub fn aggregate_daily(entries: &[OwmEntry], max_days: usize) -> Vec<DailyForecast> {
    let mut days: BTreeMap<&str, Vec<&OwmEntry>> = BTreeMap::new();
    for entry in entries {
        if let Some(date) = entry.dt_txt.get(..10) {
            days.entry(date).or_default().push(entry);
        }
    }

    days.into_iter()
        .take(max_days)
        .map(|(date, slots)| {
            let temp_min = slots
                .iter()
                .map(|s| s.main.temp_min)
                .fold(f64::INFINITY, f64::min);
            let temp_max = slots
                .iter()
                .map(|s| s.main.temp_max)
                .fold(f64::NEG_INFINITY, f64::max);

            let midday = slots
                .iter()
                .min_by_key(|s| (slot_hour(s) - 12).abs())
                .and_then(|s| s.weather.first());

            let vai_chover = slots.iter().any(|s| {
                s.rain.as_ref().map_or(false, |r| r.three_hours > 0.0)
                    || s.weather.iter().any(|w| RAIN_CONDITIONS.contains(&w.main.as_str()))
            });

            DailyForecast {
                data: date.to_string(),
                temp_min: round_one(temp_min),
                temp_max: round_one(temp_max),
                descricao: midday.map(|w| w.description.clone()).unwrap_or_default(),
                icone: midday.map(|w| w.icon.clone()).unwrap_or_default(),
                vai_chover,
            }
        })
        .collect()
}

fn slot_hour(entry: &OwmEntry) -> i32 {
    entry
        .dt_txt
        .get(11..13)
        .and_then(|h| h.parse().ok())
        .unwrap_or(12)
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
