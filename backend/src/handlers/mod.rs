//! HTTP request handlers

pub mod analysis;
pub mod health;
pub mod images;

pub use analysis::*;
pub use health::*;
pub use images::*;
