use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::services::CityForecast;
use crate::state::AppState;
use crate::utils::errors::WeatherError;

pub fn create_weather_router() -> Router<AppState> {
    Router::new().route("/previsao/:cidade", get(get_forecast))
}

/// Errores con cuerpo `{error}` y el status del proveedor
async fn get_forecast(
    State(state): State<AppState>,
    Path(cidade): Path<String>,
) -> Result<Json<CityForecast>, WeatherError> {
    let forecast = state.weather.forecast(&cidade).await?;
    Ok(Json(forecast))
}
