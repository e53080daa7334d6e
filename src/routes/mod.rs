//! src/routes/mod.rs

mod contact;
mod health_check;

pub use contact::*;
pub use health_check::*;
