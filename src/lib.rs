pub mod analysis;
pub mod backup;
pub mod config;
pub mod deletion;
pub mod engine;
pub mod error;
pub mod profiles;
pub mod registry;

pub use config::AppConfig;
pub use engine::{SweepEngine, SweepResult};
pub use error::Error;
