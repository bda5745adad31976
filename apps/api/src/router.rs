use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::booking::BookingService;
use appointment_cell::services::store::AppointmentStore;
use appointment_cell::state::AppointmentState;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::directory::DoctorDirectory;
use doctor_cell::services::slots::SlotLedger;
use doctor_cell::state::DoctorState;
use patient_cell::router::patient_routes;
use patient_cell::services::profile::PatientDirectory;
use patient_cell::state::PatientState;
use payment_cell::router::payment_routes;
use payment_cell::services::gateway::HttpPaymentGateway;
use payment_cell::services::reconcile::PaymentService;
use payment_cell::state::PaymentState;
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    // Single shared instances: the ledger and stores are the source of
    // truth every cell works against.
    let doctors = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientDirectory::new());
    let ledger = Arc::new(SlotLedger::new());
    let store = Arc::new(AppointmentStore::new());

    let booking = Arc::new(BookingService::new(
        Arc::clone(&doctors),
        Arc::clone(&patients),
        Arc::clone(&ledger),
        Arc::clone(&store),
    ));

    let gateway = Arc::new(HttpPaymentGateway::new(&config));
    let payments = Arc::new(PaymentService::new(
        Arc::clone(&store),
        gateway,
        config.gateway_key_secret.clone(),
        config.payment_currency.clone(),
    ));

    let doctor_state = DoctorState {
        config: Arc::clone(&config),
        directory: doctors,
        ledger,
    };
    let patient_state = PatientState {
        config: Arc::clone(&config),
        directory: patients,
    };
    let appointment_state = AppointmentState {
        config: Arc::clone(&config),
        booking,
    };
    let payment_state = PaymentState {
        config: Arc::clone(&config),
        store,
        payments,
    };

    Router::new()
        .route("/", get(|| async { "MediBook API is running!" }))
        .nest("/doctors", doctor_routes(doctor_state))
        .nest("/patients", patient_routes(patient_state))
        .nest("/appointments", appointment_routes(appointment_state))
        .nest("/payments", payment_routes(payment_state))
}
