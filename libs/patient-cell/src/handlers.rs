// libs/patient-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::UpsertPatientRequest;
use crate::state::PatientState;

#[axum::debug_handler]
pub async fn upsert_profile(
    State(state): State<PatientState>,
    Extension(user): Extension<User>,
    Json(request): Json<UpsertPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Principal id is not a valid patient id".to_string()))?;

    let patient = state.directory.upsert(patient_id, request).await;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Profile updated",
    })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<PatientState>,
    Path(patient_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    // Patients can read their own profile; doctors and admins can read any.
    let is_self = user.id == patient_id.to_string();
    if !is_self && !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view this profile".to_string()));
    }

    let patient = state
        .directory
        .get(patient_id)
        .await
        .ok_or_else(|| AppError::NotFound("Patient profile not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
    })))
}
