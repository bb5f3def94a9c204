//! geo3d - 3D geometry math core
//!
//! Re-exports the value types from [`geo3d_math`] and adds configuration
//! loading and logging setup for applications embedding the library.

pub mod config;

pub use geo3d_math::{utils, MathError, MathResult, Matrix, Plane, Quaternion, Vector};

use config::LoggingConfig;

/// Install an `env_logger` backend.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies.
/// Returns false if a logger was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let installed = env_logger::Builder::from_env(env).try_init().is_ok();
    if installed {
        log::debug!("Logging initialised at level '{}'", config.level);
    }
    installed
}
