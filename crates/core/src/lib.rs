pub mod clock;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::*;
pub use errors::*;
pub use logging::{init_logging, LogFormat, LogLevel};
pub use models::*;
