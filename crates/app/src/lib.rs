//! Storefront application: document persistence, order services and wiring for the CLI.

pub mod config;
pub mod context;
pub mod documents;
pub mod domain;
pub mod observability;

#[cfg(test)]
mod test;
