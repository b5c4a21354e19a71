pub mod auth;
pub mod health;
pub mod markets;
pub mod metrics;
pub mod ton;
