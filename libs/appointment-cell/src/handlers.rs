// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest, RequesterRole};
use crate::state::AppointmentState;

fn principal_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Principal id is not a valid uuid".to_string()))
}

fn requester_role(user: &User) -> RequesterRole {
    if user.is_doctor() {
        RequesterRole::Doctor
    } else {
        RequesterRole::Patient
    }
}

fn map_booking_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::SlotUnavailable => {
            AppError::SlotUnavailable("Appointment slot no longer available".to_string())
        }
        AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AppointmentError::DoctorUnavailable => {
            AppError::DoctorUnavailable("Doctor is not taking appointments".to_string())
        }
        AppointmentError::PatientNotFound => {
            AppError::NotFound("Patient profile not found".to_string())
        }
        AppointmentError::AlreadyCancelled => {
            AppError::AlreadyCancelled("Appointment is already cancelled".to_string())
        }
        AppointmentError::Unauthorized => {
            AppError::Auth("Not authorized for this appointment".to_string())
        }
        AppointmentError::StorageError(msg) => AppError::Storage(msg),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppointmentState>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    // The patient identity comes from the verified principal, never the body.
    let patient_id = principal_id(&user)?;

    let appointment = state
        .booking
        .book(patient_id, request)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked",
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let requester_id = principal_id(&user)?;

    let appointment = state
        .booking
        .cancel(appointment_id, requester_id, requester_role(&user))
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled",
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Auth("Only doctors can complete appointments".to_string()));
    }
    let doctor_id = principal_id(&user)?;

    let appointment = state
        .booking
        .mark_completed(appointment_id, doctor_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment completed",
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let requester_id = principal_id(&user)?;

    let appointment = state
        .booking
        .get(appointment_id, requester_id, requester_role(&user))
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<AppointmentState>,
    Path(patient_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_self = user.id == patient_id.to_string();
    if !is_self && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to list these appointments".to_string()));
    }

    let appointments = state.booking.list_for_patient(patient_id).await;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<AppointmentState>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_self = user.id == doctor_id.to_string();
    if !is_self && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to list these appointments".to_string()));
    }

    let appointments = state.booking.list_for_doctor(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
    })))
}
