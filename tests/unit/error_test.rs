//! Tests for error types

use doorwarden::core::{ConfigError, ControllerError};

#[test]
fn test_usage_error_display() {
    let err = ConfigError::usage("auto-close-interval", "auto-close-interval:<milliseconds > 0>");
    assert_eq!(
        format!("{}", err),
        "invalid value for `auto-close-interval`: auto-close-interval:<milliseconds > 0>"
    );
}

#[test]
fn test_missing_parameter_display() {
    let err = ConfigError::missing("manage-interval", "manage-interval:<ms>");
    assert_eq!(
        format!("{}", err),
        "missing parameter for `manage-interval`: manage-interval:<ms>"
    );
}

#[test]
fn test_malformed_display() {
    let err = ConfigError::Malformed("nocolon".to_string());
    assert_eq!(format!("{}", err), "malformed line: nocolon");
}

#[test]
fn test_invalid_config_display() {
    let err = ControllerError::InvalidConfig("tag must not be empty".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: tag must not be empty");
}

#[test]
fn test_invalid_argument_display() {
    let err = ControllerError::InvalidArgument("explode".to_string());
    assert_eq!(format!("{}", err), "invalid argument: explode");
}

#[test]
fn test_env_error_display() {
    let err = ControllerError::Env("DOORWARDEN_LOG_CAPACITY: invalid digit".to_string());
    assert_eq!(
        format!("{}", err),
        "environment error: DOORWARDEN_LOG_CAPACITY: invalid digit"
    );
}
