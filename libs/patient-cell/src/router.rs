// libs/patient-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::PatientState;

pub fn patient_routes(state: PatientState) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::upsert_profile))
        .route("/{patient_id}", get(handlers::get_profile))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
