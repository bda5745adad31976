// libs/appointment-cell/src/services/store.rs
use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentPatch};

/// Durable record store for appointments, with a secondary index from the
/// payment gateway order id to the appointment id. Records are only ever
/// patched, never removed.
pub struct AppointmentStore {
    records: RwLock<HashMap<Uuid, Appointment>>,
    order_index: RwLock<HashMap<String, Uuid>>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            order_index: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, appointment: Appointment) -> Result<Uuid, AppointmentError> {
        let id = appointment.id;
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(AppointmentError::StorageError(format!(
                "Appointment {} already exists",
                id
            )));
        }
        records.insert(id, appointment);
        debug!("Appointment {} created", id);
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> Option<Appointment> {
        self.records.read().await.get(&id).cloned()
    }

    /// Apply a partial update, leaving unspecified fields untouched, and
    /// return the updated record.
    pub async fn update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, AppointmentError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(AppointmentError::NotFound)?;

        if let Some(cancelled) = patch.cancelled {
            record.cancelled = cancelled;
        }
        if let Some(paid) = patch.paid {
            record.paid = paid;
        }
        if let Some(completed) = patch.completed {
            record.completed = completed;
        }
        if let Some(order_id) = patch.gateway_order_id {
            self.order_index.write().await.insert(order_id.clone(), id);
            record.gateway_order_id = Some(order_id);
        }
        if let Some(payment_id) = patch.gateway_payment_id {
            record.gateway_payment_id = Some(payment_id);
        }
        if let Some(signature) = patch.gateway_signature {
            record.gateway_signature = Some(signature);
        }

        debug!("Appointment {} updated", id);
        Ok(record.clone())
    }

    pub async fn find_by_order_id(&self, order_id: &str) -> Option<Appointment> {
        let id = *self.order_index.read().await.get(order_id)?;
        self.records.read().await.get(&id).cloned()
    }

    pub async fn list_by_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let mut appointments: Vec<Appointment> = self
            .records
            .read()
            .await
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        appointments
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        let mut appointments: Vec<Appointment> = self
            .records
            .read()
            .await
            .values()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        appointments
    }
}

impl Default for AppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{DoctorSnapshot, PatientSnapshot};

    fn sample_appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            slot_date: "2024_1_15".to_string(),
            slot_time: "10:00".to_string(),
            patient_snapshot: PatientSnapshot {
                name: "Test Patient".to_string(),
                email: "patient@example.com".to_string(),
                profile_image_url: None,
            },
            doctor_snapshot: DoctorSnapshot {
                name: "Dr. Test".to_string(),
                specialty: "General Practice".to_string(),
                consultation_fee: 500,
                address: None,
                profile_image_url: None,
            },
            amount: 500,
            cancelled: false,
            paid: false,
            completed: false,
            gateway_order_id: None,
            gateway_payment_id: None,
            gateway_signature: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn patch_leaves_unspecified_fields_untouched() {
        let store = AppointmentStore::new();
        let appointment = sample_appointment();
        let id = store.create(appointment.clone()).await.unwrap();

        let updated = store
            .update(id, AppointmentPatch::cancelled())
            .await
            .unwrap();

        assert!(updated.cancelled);
        assert!(!updated.paid);
        assert!(!updated.completed);
        assert_eq!(updated.amount, appointment.amount);
        assert_eq!(updated.patient_snapshot, appointment.patient_snapshot);
    }

    #[tokio::test]
    async fn order_id_patch_maintains_secondary_index() {
        let store = AppointmentStore::new();
        let id = store.create(sample_appointment()).await.unwrap();

        assert!(store.find_by_order_id("order_abc").await.is_none());

        store
            .update(
                id,
                AppointmentPatch {
                    gateway_order_id: Some("order_abc".to_string()),
                    ..AppointmentPatch::default()
                },
            )
            .await
            .unwrap();

        let found = store.find_by_order_id("order_abc").await.unwrap();
        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn update_of_unknown_record_is_not_found() {
        let store = AppointmentStore::new();
        let err = store
            .update(Uuid::new_v4(), AppointmentPatch::completed())
            .await
            .unwrap_err();
        assert!(matches!(err, AppointmentError::NotFound));
    }

    #[tokio::test]
    async fn listings_are_scoped_to_the_owner() {
        let store = AppointmentStore::new();
        let first = sample_appointment();
        let second = sample_appointment();
        store.create(first.clone()).await.unwrap();
        store.create(second.clone()).await.unwrap();

        let for_patient = store.list_by_patient(first.patient_id).await;
        assert_eq!(for_patient.len(), 1);
        assert_eq!(for_patient[0].id, first.id);

        let for_doctor = store.list_by_doctor(second.doctor_id).await;
        assert_eq!(for_doctor.len(), 1);
        assert_eq!(for_doctor[0].id, second.id);
    }
}
