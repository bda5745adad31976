// libs/appointment-cell/src/services/booking.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::services::directory::DoctorDirectory;
use doctor_cell::services::slots::SlotLedger;
use patient_cell::services::profile::PatientDirectory;

use crate::models::{
    Appointment, AppointmentError, AppointmentPatch, BookAppointmentRequest, DoctorSnapshot,
    PatientSnapshot, RequesterRole,
};
use crate::services::store::AppointmentStore;

/// Orchestrates slot reservation and appointment record creation as one
/// logical unit.
///
/// All booking and cancellation sequences for one doctor run under that
/// doctor's entry in a keyed lock table, so two requests can never race on
/// the same doctor's availability while unrelated doctors proceed in
/// parallel. A global lock would serialize every doctor and is deliberately
/// not used.
pub struct BookingService {
    doctors: Arc<DoctorDirectory>,
    patients: Arc<PatientDirectory>,
    ledger: Arc<SlotLedger>,
    store: Arc<AppointmentStore>,
    doctor_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BookingService {
    pub fn new(
        doctors: Arc<DoctorDirectory>,
        patients: Arc<PatientDirectory>,
        ledger: Arc<SlotLedger>,
        store: Arc<AppointmentStore>,
    ) -> Self {
        Self {
            doctors,
            patients,
            ledger,
            store,
            doctor_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<AppointmentStore> {
        &self.store
    }

    pub fn ledger(&self) -> &Arc<SlotLedger> {
        &self.ledger
    }

    async fn lock_for(&self, doctor_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.doctor_locks.lock().await;
        Arc::clone(locks.entry(doctor_id).or_default())
    }

    /// Book a slot with a doctor for a patient.
    pub async fn book(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} at {} {}",
            patient_id, request.doctor_id, request.slot_date, request.slot_time
        );

        let lock = self.lock_for(request.doctor_id).await;
        let _guard = lock.lock().await;

        let doctor = self
            .doctors
            .get(request.doctor_id)
            .await
            .ok_or(AppointmentError::DoctorNotFound)?;

        if !doctor.is_available {
            return Err(AppointmentError::DoctorUnavailable);
        }

        // Reserve before any record write: on SlotUnavailable nothing has
        // been mutated.
        self.ledger
            .reserve(request.doctor_id, &request.slot_date, &request.slot_time)
            .await
            .map_err(|_| {
                warn!(
                    "Slot {} {} already booked for doctor {}",
                    request.slot_date, request.slot_time, request.doctor_id
                );
                AppointmentError::SlotUnavailable
            })?;

        let patient = match self.patients.get(patient_id).await {
            Some(patient) => patient,
            None => {
                // Roll the reservation back so ledger and records stay in step.
                self.ledger
                    .release(request.doctor_id, &request.slot_date, &request.slot_time)
                    .await;
                return Err(AppointmentError::PatientNotFound);
            }
        };

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id: doctor.id,
            slot_date: request.slot_date.clone(),
            slot_time: request.slot_time.clone(),
            patient_snapshot: PatientSnapshot::from_patient(&patient),
            doctor_snapshot: DoctorSnapshot::from_doctor(&doctor),
            amount: doctor.consultation_fee,
            cancelled: false,
            paid: false,
            completed: false,
            gateway_order_id: None,
            gateway_payment_id: None,
            gateway_signature: None,
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.create(appointment.clone()).await {
            self.ledger
                .release(request.doctor_id, &request.slot_date, &request.slot_time)
                .await;
            return Err(e);
        }

        info!(
            "Appointment {} booked with doctor {}",
            appointment.id, doctor.id
        );
        Ok(appointment)
    }

    /// Cancel an appointment on behalf of its patient or its doctor.
    ///
    /// The cancelled flag is flipped before the slot is released: if the
    /// release were ever to fail, the record is still correctly cancelled
    /// and only availability is stale.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        requester_id: Uuid,
        requester_role: RequesterRole,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment {}", appointment_id);

        let appointment = self
            .store
            .get(appointment_id)
            .await
            .ok_or(AppointmentError::NotFound)?;

        self.authorize(&appointment, requester_id, requester_role)?;

        let lock = self.lock_for(appointment.doctor_id).await;
        let _guard = lock.lock().await;

        // Re-read under the doctor lock: a concurrent cancel may have won.
        let appointment = self
            .store
            .get(appointment_id)
            .await
            .ok_or(AppointmentError::NotFound)?;

        if appointment.cancelled {
            return Err(AppointmentError::AlreadyCancelled);
        }

        let cancelled = self
            .store
            .update(appointment_id, AppointmentPatch::cancelled())
            .await?;

        self.ledger
            .release(
                appointment.doctor_id,
                &appointment.slot_date,
                &appointment.slot_time,
            )
            .await;

        info!("Appointment {} cancelled", appointment_id);
        Ok(cancelled)
    }

    /// Mark an appointment completed after the consultation. Doctor-only;
    /// no slot interaction.
    pub async fn mark_completed(
        &self,
        appointment_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Completing appointment {}", appointment_id);

        let appointment = self
            .store
            .get(appointment_id)
            .await
            .ok_or(AppointmentError::NotFound)?;

        if appointment.doctor_id != doctor_id {
            return Err(AppointmentError::Unauthorized);
        }

        if appointment.cancelled {
            return Err(AppointmentError::AlreadyCancelled);
        }

        let completed = self
            .store
            .update(appointment_id, AppointmentPatch::completed())
            .await?;

        info!("Appointment {} completed", appointment_id);
        Ok(completed)
    }

    pub async fn get(
        &self,
        appointment_id: Uuid,
        requester_id: Uuid,
        requester_role: RequesterRole,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .store
            .get(appointment_id)
            .await
            .ok_or(AppointmentError::NotFound)?;

        self.authorize(&appointment, requester_id, requester_role)?;
        Ok(appointment)
    }

    pub async fn list_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        self.store.list_by_patient(patient_id).await
    }

    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        self.store.list_by_doctor(doctor_id).await
    }

    fn authorize(
        &self,
        appointment: &Appointment,
        requester_id: Uuid,
        requester_role: RequesterRole,
    ) -> Result<(), AppointmentError> {
        let authorized = match requester_role {
            RequesterRole::Patient => appointment.patient_id == requester_id,
            RequesterRole::Doctor => appointment.doctor_id == requester_id,
        };

        if !authorized {
            warn!(
                "Requester {} denied access to appointment {}",
                requester_id, appointment.id
            );
            return Err(AppointmentError::Unauthorized);
        }
        Ok(())
    }
}
