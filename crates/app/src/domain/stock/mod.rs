//! Stock adjustment

pub mod errors;
pub mod service;

pub use errors::StockError;
pub use service::*;
