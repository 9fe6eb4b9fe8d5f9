//! Tests for command parsing

use doorwarden::core::ControllerError;
use doorwarden::runtime::Command;

#[test]
fn test_all_commands_parse() {
    for (raw, expected) in [
        ("run", Command::Run),
        ("", Command::Run),
        ("Reload", Command::Reload),
        ("LOCKDOWN", Command::Lockdown),
        ("release", Command::Release),
        (" stats\n", Command::Stats),
        ("Stop", Command::Stop),
    ] {
        assert_eq!(raw.parse::<Command>().unwrap(), expected, "{raw:?}");
    }
}

#[test]
fn test_command_display_is_canonical() {
    assert_eq!(Command::Lockdown.to_string(), "lockdown");
    assert_eq!("STATS".parse::<Command>().unwrap().to_string(), "stats");
}

#[test]
fn test_unknown_command_rejected() {
    assert!(matches!(
        "open sesame".parse::<Command>(),
        Err(ControllerError::InvalidArgument(_))
    ));
}
