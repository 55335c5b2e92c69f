//! glimpse-core
//!
//! Shared types, the error taxonomy, capability traits for each pipeline
//! component, layered configuration and the screenshot directory scanner.

#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod scanner;
pub mod stopwords;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
