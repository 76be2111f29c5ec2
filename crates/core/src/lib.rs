pub mod error;
pub mod logging;

pub mod admission;
pub mod batch;
pub mod discovery;
pub mod flatten;
pub mod model;
pub mod parser;
pub mod single;

pub use error::Result;
