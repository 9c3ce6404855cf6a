//! Request handlers

pub mod claims;
pub mod assessment;
pub mod assistant;
pub mod health;
