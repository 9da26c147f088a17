//! Integration tests for error types.

use warren::foundation::{Error, ErrorKind};

#[test]
fn invalid_slot_reports_slot_and_length() {
    let err = Error::invalid_slot(7, 3);

    assert!(matches!(
        err.kind,
        ErrorKind::InvalidSlot { slot: 7, len: 3 }
    ));
    let msg = format!("{err}");
    assert!(msg.contains('7'));
    assert!(msg.contains('3'));
}

#[test]
fn stale_handle_reports_both_stamps() {
    let err = Error::stale_handle(0, 4, 11);

    let msg = format!("{err}");
    assert!(msg.contains('4'));
    assert!(msg.contains("11"));
}

#[test]
fn still_referenced_reports_owner_count() {
    let err = Error::still_referenced(2, 3);

    assert!(matches!(
        err.kind,
        ErrorKind::StillReferenced { owners: 3, .. }
    ));
}

#[test]
fn error_kinds_are_matchable() {
    let errors = [
        Error::invalid_slot(0, 0),
        Error::handle_not_found(0, 0),
        Error::stale_handle(0, 0, 1),
        Error::still_referenced(0, 1),
    ];

    // Each failure mode stays distinguishable for callers that match.
    assert!(matches!(errors[0].kind, ErrorKind::InvalidSlot { .. }));
    assert!(matches!(errors[1].kind, ErrorKind::HandleNotFound { .. }));
    assert!(matches!(errors[2].kind, ErrorKind::StaleHandle { .. }));
    assert!(matches!(errors[3].kind, ErrorKind::StillReferenced { .. }));
}
