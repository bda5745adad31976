// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use patient_cell::models::Patient;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A booking record. Never physically deleted: every lifecycle change is a
/// flag flip, preserving the audit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    /// Opaque date token supplied by the caller, e.g. "2024_1_15".
    pub slot_date: String,
    /// Opaque time token supplied by the caller, e.g. "10:00".
    pub slot_time: String,
    pub patient_snapshot: PatientSnapshot,
    pub doctor_snapshot: DoctorSnapshot,
    /// Fee in whole currency units, copied from the doctor at booking time.
    pub amount: i64,
    pub cancelled: bool,
    pub paid: bool,
    pub completed: bool,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Display data copied from the patient profile when the appointment is
/// created. Immutable afterwards, independent of later profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
}

impl PatientSnapshot {
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            name: patient.full_name(),
            email: patient.email.clone(),
            profile_image_url: patient.profile_image_url.clone(),
        }
    }
}

/// Display data copied from the doctor profile when the appointment is
/// created. Immutable afterwards, independent of later profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSnapshot {
    pub name: String,
    pub specialty: String,
    pub consultation_fee: i64,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
}

impl DoctorSnapshot {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            name: doctor.full_name(),
            specialty: doctor.specialty.clone(),
            consultation_fee: doctor.consultation_fee,
            address: doctor.address.clone(),
            profile_image_url: doctor.profile_image_url.clone(),
        }
    }
}

/// Partial update applied to an appointment record. Unset fields leave the
/// stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub cancelled: Option<bool>,
    pub paid: Option<bool>,
    pub completed: Option<bool>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
}

impl AppointmentPatch {
    pub fn cancelled() -> Self {
        Self {
            cancelled: Some(true),
            ..Self::default()
        }
    }

    pub fn completed() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequesterRole {
    Patient,
    Doctor,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment slot not available")]
    SlotUnavailable,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctor not available")]
    DoctorUnavailable,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Appointment already cancelled")]
    AlreadyCancelled,

    #[error("Unauthorized access to appointment")]
    Unauthorized,

    #[error("Storage error: {0}")]
    StorageError(String),
}
