use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::dto::maintenance_dto::{AddMaintenanceRequest, MaintenanceListResponse, MaintenanceRecordResponse};
use crate::dto::vehicle_dto::{ActionResponse, CreateVehicleRequest, VehicleResponse};
use crate::dto::ApiResponse;
use crate::models::VehicleAction;
use crate::services::GarageStatus;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_garage_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(garage_status))
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/vehicles/:key", get(get_vehicle).delete(delete_vehicle))
        .route("/vehicles/:key/actions", post(apply_action))
        .route("/vehicles/:key/maintenance", get(list_maintenance).post(add_maintenance))
        .route("/vehicles/:key/maintenance/:id", delete(delete_maintenance))
}

async fn garage_status(State(state): State<AppState>) -> Json<GarageStatus> {
    let service = state.garage.lock().await;
    Json(service.status())
}

async fn list_vehicles(State(state): State<AppState>) -> Json<Vec<VehicleResponse>> {
    let service = state.garage.lock().await;
    Json(
        service
            .garage()
            .sorted_by_model()
            .into_iter()
            .map(VehicleResponse::from)
            .collect(),
    )
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<VehicleResponse>>)> {
    request.validate()?;
    let vehicle = request.into_vehicle()?;

    let mut service = state.garage.lock().await;
    let key = service.add_vehicle(vehicle).await?;
    let response = VehicleResponse::from(service.vehicle(&key)?);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            response,
            "Veículo adicionado à garagem".to_string(),
        )),
    ))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<VehicleResponse>> {
    let service = state.garage.lock().await;
    Ok(Json(VehicleResponse::from(service.vehicle(&key)?)))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut service = state.garage.lock().await;
    service.remove_vehicle(&key).await?;
    Ok(Json(ApiResponse::message("Veículo removido da garagem".to_string())))
}

async fn apply_action(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(action): Json<VehicleAction>,
) -> AppResult<Json<ActionResponse>> {
    let mut service = state.garage.lock().await;
    let feedback = service.apply_action(&key, action).await?;
    let vehicle = VehicleResponse::from(service.vehicle(&key)?);
    Ok(Json(ActionResponse { feedback, vehicle }))
}

async fn list_maintenance(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<MaintenanceListResponse>> {
    let service = state.garage.lock().await;
    let now = Utc::now();
    let partition = service.vehicle(&key)?.partition_maintenance_records(&now);
    Ok(Json(MaintenanceListResponse::from(partition)))
}

async fn add_maintenance(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<AddMaintenanceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MaintenanceRecordResponse>>)> {
    request.validate()?;
    let record = request.into_record();

    let mut service = state.garage.lock().await;
    let accepted = service.add_maintenance(&key, record).await?;
    let response = if accepted.is_past(&Utc::now()) {
        MaintenanceRecordResponse::history(&accepted)
    } else {
        MaintenanceRecordResponse::schedule(&accepted)
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            response,
            "Manutenção registrada".to_string(),
        )),
    ))
}

async fn delete_maintenance(
    State(state): State<AppState>,
    Path((key, id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut service = state.garage.lock().await;
    service.remove_maintenance(&key, &id).await?;
    Ok(Json(ApiResponse::message("Manutenção removida".to_string())))
}
