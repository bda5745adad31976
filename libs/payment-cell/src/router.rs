// libs/payment-cell/src/router.rs
use axum::{middleware, routing::post, Router};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::PaymentState;

pub fn payment_routes(state: PaymentState) -> Router {
    let protected_routes = Router::new()
        .route("/order", post(handlers::create_payment_order))
        .route("/verify", post(handlers::verify_payment))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
