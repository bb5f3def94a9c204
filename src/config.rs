//! Library configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`G3D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use geo3d_math::utils::{self, EPSILON};
use geo3d_math::{MathResult, Matrix};

/// Main library configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geo3dConfig {
    /// Float comparison configuration
    #[serde(default)]
    pub comparison: ComparisonConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Geo3dConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`G3D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // G3D_COMPARISON__EPSILON=1e-4 -> comparison.epsilon = 1e-4
        figment = figment.merge(Env::prefixed("G3D_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let epsilon = self.comparison.epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ConfigError {
                message: format!("comparison.epsilon must be a non-negative number, got {}", epsilon),
            });
        }
        Ok(())
    }
}

/// Float comparison configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Largest absolute difference still treated as equal
    pub epsilon: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self { epsilon: EPSILON }
    }
}

/// The `==` operators and the plain `Matrix` checks always use the built-in
/// `EPSILON`; these methods are how the configured value reaches them.
impl ComparisonConfig {
    /// Compare two scalars with the configured tolerance
    pub fn float_cmp(&self, a: f64, b: f64) -> bool {
        utils::float_cmp_with(a, b, self.epsilon)
    }

    pub fn matrices_equal(&self, a: &Matrix, b: &Matrix) -> bool {
        a.approx_eq_with(b, self.epsilon)
    }

    pub fn is_identity(&self, m: &Matrix) -> bool {
        m.is_identity_with(self.epsilon)
    }

    pub fn is_rotation_transform(&self, m: &Matrix) -> bool {
        m.is_rotation_transform_with(self.epsilon)
    }

    /// Invert `m`, treating a determinant within epsilon of zero as singular
    pub fn invert(&self, m: &Matrix) -> MathResult<Matrix> {
        m.inverse_with(self.epsilon)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace). `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Geo3dConfig::default();
        assert_eq!(config.comparison.epsilon, EPSILON);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_serialization() {
        let config = Geo3dConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("epsilon"));
        assert!(toml.contains("level"));
    }

    #[test]
    fn test_comparison_uses_configured_epsilon() {
        let loose = ComparisonConfig { epsilon: 0.1 };
        assert!(loose.float_cmp(1.0, 1.05));
        assert!(!ComparisonConfig::default().float_cmp(1.0, 1.05));
    }

    #[test]
    fn test_matrix_checks_use_configured_epsilon() {
        let tight = ComparisonConfig { epsilon: 1e-12 };
        let small = Matrix::scaling(0.01, 0.01, 0.01);
        assert!(ComparisonConfig::default().invert(&small).is_err());
        let inv = tight.invert(&small).unwrap();
        assert!(ComparisonConfig::default().matrices_equal(&inv, &Matrix::scaling(100.0, 100.0, 100.0)));

        let mut nudged = Matrix::identity();
        nudged[(3, 3)] = 1.0 + 1e-3;
        let loose = ComparisonConfig { epsilon: 1e-2 };
        assert!(!ComparisonConfig::default().is_identity(&nudged));
        assert!(loose.is_identity(&nudged));
        assert!(loose.is_rotation_transform(&nudged));
        assert!(!tight.is_rotation_transform(&nudged));
    }

    #[test]
    fn test_negative_epsilon_rejected() {
        let mut config = Geo3dConfig::default();
        config.comparison.epsilon = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("epsilon"));
    }
}
