//! Tests for bootstrap configuration and the configuration pipeline

use std::time::Duration;

use doorwarden::config::{
    ConfigHandler, ConfigLine, ConfigPipeline, ControllerConfig, LineClaim, ScheduleHandler,
};
use doorwarden::core::{ConfigError, LogBuffer};
use doorwarden::policy::{DoorDefaultsHandler, DoorSettingsHandler};

#[test]
fn test_controller_config_defaults_are_valid() {
    let cfg = ControllerConfig::default();
    assert_eq!(cfg.tag, "doorwarden");
    assert_eq!(cfg.log_capacity, 64);
    assert_eq!(cfg.steps_per_tick, 200);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_controller_config_invalid_values() {
    let empty_tag = ControllerConfig {
        tag: "  ".into(),
        ..ControllerConfig::default()
    };
    assert!(empty_tag.validate().is_err());

    let separator = ControllerConfig {
        tag: "a:b".into(),
        ..ControllerConfig::default()
    };
    assert!(separator.validate().is_err());

    let no_log = ControllerConfig {
        log_capacity: 0,
        ..ControllerConfig::default()
    };
    assert!(no_log.validate().is_err());
}

#[test]
fn test_controller_config_from_json() {
    let cfg = ControllerConfig::from_json_str(r#"{ "tag": "Hangar", "steps_per_tick": 50 }"#).unwrap();
    assert_eq!(cfg.tag, "Hangar");
    assert_eq!(cfg.steps_per_tick, 50);
    assert_eq!(cfg.log_capacity, 64);

    assert!(ControllerConfig::from_json_str(r#"{ "steps_per_tick": 0 }"#).is_err());
    assert!(ControllerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_round_trips_through_json() {
    let cfg = ControllerConfig {
        tag: "Bay".into(),
        log_capacity: 8,
        steps_per_tick: 12,
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn test_line_parsing() {
    let line = ConfigLine::parse("  Warden : Auto-Close-Interval : 2500 ").unwrap().unwrap();
    assert!(line.in_scope("warden"));
    assert!(line.is_option("auto-close-interval"));
    assert_eq!(line.param(0), Some("2500"));

    assert_eq!(ConfigLine::parse("# comment").unwrap(), None);
    assert_eq!(ConfigLine::parse("   ").unwrap(), None);
    assert!(matches!(ConfigLine::parse("nocolon"), Err(ConfigError::Malformed(_))));
}

#[test]
fn test_pipeline_shared_text_feeds_independent_handlers() {
    let text = "\
# controller-wide settings
warden:auto-close-interval:4000
warden:manage-interval:250
other:manage-interval:1
warden:maintenance-interval:0
warden:teleport
";
    let mut doors = DoorDefaultsHandler::default();
    let mut schedule = ScheduleHandler::default();
    let mut log = LogBuffer::new(16);
    let report = ConfigPipeline::new(&["Warden"]).run(text, &mut [&mut doors, &mut schedule], &mut log, 7);

    assert_eq!(report.accepted, 2);
    assert_eq!(report.errors, 1);
    assert_eq!(report.unrecognized, 1);
    assert_eq!(report.out_of_scope, 1);
    assert_eq!(doors.settings().auto_close, Duration::from_millis(4000));
    assert_eq!(schedule.settings().manage_interval, Duration::from_millis(250));
    assert_eq!(schedule.settings().maintenance_interval, Duration::from_millis(10_000));

    let texts: Vec<_> = log.texts().collect();
    assert_eq!(
        texts,
        vec![
            "Invalid 'warden:maintenance-interval:0': usage maintenance-interval:<milliseconds > 0>",
            "Unrecognized option 'warden:teleport'",
        ]
    );
}

#[test]
fn test_rerun_restores_defaults_before_applying() {
    let mut doors = DoorDefaultsHandler::default();
    let mut log = LogBuffer::new(4);
    let pipeline = ConfigPipeline::new(&["warden"]);
    pipeline.run("warden:auto-close-interval:900", &mut [&mut doors], &mut log, 0);
    assert_eq!(doors.settings().auto_close, Duration::from_millis(900));
    pipeline.run("", &mut [&mut doors], &mut log, 0);
    assert_eq!(doors.settings().auto_close, Duration::from_millis(5000));
}

#[test]
fn test_device_handler_claims_ignore() {
    let mut handler = DoorSettingsHandler::default();
    handler.on_starting();
    let line = ConfigLine::parse("Vault:ignore").unwrap().unwrap();
    assert_eq!(handler.on_parsing(&line), Ok(LineClaim::Accepted));
    assert!(handler.is_ignored());
}
