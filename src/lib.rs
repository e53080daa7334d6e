//! src/lib.rs

pub mod configurations;
pub mod cors;
pub mod domain;
pub mod email_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
