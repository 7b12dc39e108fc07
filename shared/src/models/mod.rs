//! Domain models for the greenery report pipeline

mod coverage;
mod recommendation;
mod report;
mod season;
mod weather;

pub use coverage::*;
pub use recommendation::*;
pub use report::*;
pub use season::*;
pub use weather::*;
