//! Shared types and pure logic for the greenery report pipeline
//!
//! Everything in this crate is free of I/O: the backend feeds it model
//! output and weather data and gets typed records back.

pub mod extraction;
pub mod models;
pub mod parser;
pub mod season;
pub mod types;
pub mod validation;

pub use extraction::*;
pub use models::*;
pub use parser::*;
pub use season::*;
pub use types::*;
pub use validation::*;
