mod config;
mod cost;
mod error;
mod problem;

pub use config::*;
pub use cost::*;
pub use error::*;
pub use problem::*;
