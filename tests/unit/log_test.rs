//! Tests for the controller log buffer

use doorwarden::core::{LogBuffer, LogSink};

#[test]
fn test_log_drops_oldest_when_full() {
    let mut log = LogBuffer::new(2);
    log.record(1, "one".into());
    log.record(2, "two".into());
    log.record(3, "three".into());

    let lines = log.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "two");
    assert_eq!(lines[0].seq, 1);
    assert_eq!(lines[1].at_ms, 3);
}

#[test]
fn test_log_clear_keeps_sequence() {
    let mut log = LogBuffer::new(4);
    log.record(0, "a".into());
    log.clear();
    assert!(log.is_empty());
    log.record(0, "b".into());
    assert_eq!(log.lines()[0].seq, 1);
}

#[test]
fn test_log_count_matches_exact_text() {
    let mut log = LogBuffer::new(8);
    log.record(0, "Closing A".into());
    log.record(0, "Closing AB".into());
    log.record(0, "Closing A".into());
    assert_eq!(log.count("Closing A"), 2);
    assert_eq!(log.len(), 3);
}
