//! API endpoint handlers.

pub mod execute;
pub mod health;
pub mod histogram;
