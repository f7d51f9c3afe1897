// src/services/mod.rs
pub mod error;
pub mod provider;
pub mod yahoo;
pub mod identifiers;
pub mod registry;
pub mod quote;
pub mod fundamentals;

pub use error::{FetchError, FetchResult};
