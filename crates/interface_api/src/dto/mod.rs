//! Request and response bodies

pub mod claims;
pub mod assessment;
pub mod assistant;
