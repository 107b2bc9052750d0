//! Application domain services.

pub mod orders;
pub mod products;
pub mod settings;
pub mod stock;
