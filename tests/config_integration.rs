//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use geo3d::config::Geo3dConfig;
use geo3d::{init_logging, Matrix};
use serial_test::serial;

#[test]
#[serial]
fn test_default_file_loads() {
    std::env::remove_var("G3D_COMPARISON__EPSILON");
    let config = Geo3dConfig::load().unwrap();
    assert_eq!(config.comparison.epsilon, 1e-5);
    assert_eq!(config.logging.level, "warn");
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("G3D_COMPARISON__EPSILON", "0.01");
    let config = Geo3dConfig::load().unwrap();
    std::env::remove_var("G3D_COMPARISON__EPSILON");
    assert_eq!(config.comparison.epsilon, 0.01);
}

#[test]
#[serial]
fn test_env_override_rejects_negative_epsilon() {
    std::env::set_var("G3D_COMPARISON__EPSILON", "-0.5");
    let result = Geo3dConfig::load();
    std::env::remove_var("G3D_COMPARISON__EPSILON");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_missing_config_dir_uses_defaults() {
    std::env::remove_var("G3D_COMPARISON__EPSILON");
    let config = Geo3dConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.comparison.epsilon, geo3d::utils::EPSILON);
}

#[test]
#[serial]
fn test_configured_epsilon_drives_matrix_comparison() {
    std::env::set_var("G3D_COMPARISON__EPSILON", "0.01");
    let config = Geo3dConfig::load().unwrap();
    std::env::remove_var("G3D_COMPARISON__EPSILON");

    let a = Matrix::identity();
    let mut b = a;
    b[(3, 3)] = 1.005;
    assert_ne!(a, b);
    assert!(a.approx_eq_with(&b, config.comparison.epsilon));
    assert!(config.comparison.float_cmp(a[(3, 3)], b[(3, 3)]));
    assert!(!b.is_identity());
    assert!(config.comparison.is_identity(&b));
}

#[test]
fn test_init_logging_is_idempotent() {
    let config = Geo3dConfig::default();
    init_logging(&config.logging);
    assert!(!init_logging(&config.logging));
}
