//! Infrastructure - Shared utilities and types
//! Foundation layer for all other modules

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod math;

// Re-export commonly used items
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{parse_principal, RelayConfig};
pub use constants::*;
pub use errors::{
    BookError, CallerError, ConfigError, IdentityError, InterpretError, OracleError, RelayError, Result,
    ValidationError,
};
pub use math::{from_minor_units, to_minor_units};
