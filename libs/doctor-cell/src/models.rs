// libs/doctor-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// DOCTOR PROFILE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty: String,
    pub degree: Option<String>,
    pub about: Option<String>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
    /// Consultation fee in whole currency units. Converted to minor units
    /// only when a payment order is created.
    pub consultation_fee: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty: String,
    pub degree: Option<String>,
    pub about: Option<String>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
    pub consultation_fee: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub is_available: bool,
}

// ==============================================================================
// SLOT LEDGER MODELS
// ==============================================================================

/// Booked time tokens for a single doctor, keyed by opaque date token.
/// Set semantics: a date never holds the same time token twice.
pub type BookedSlots = std::collections::HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("Time slot already booked")]
    SlotTaken,
}
