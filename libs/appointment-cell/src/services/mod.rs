pub mod booking;
pub mod store;
