pub mod health;
pub mod job;
pub mod saved;
pub mod validation;
