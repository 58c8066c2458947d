pub mod aggregate;
pub mod lot;
pub mod pin;
