pub mod gateway;
pub mod reconcile;
pub mod signature;
