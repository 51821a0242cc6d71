//! Integration tests for error kinds and context

use worldsmith_foundation::{EntityId, Error, ErrorContext, ErrorKind};

#[test]
fn not_found_kinds() {
    let id = EntityId::from(7u64);
    assert!(Error::entity_not_found(id).is_not_found());
    assert!(Error::component_not_found(id, "Area").is_not_found());
    assert!(!Error::invalid_operation("nope").is_not_found());
}

#[test]
fn invariant_violations_are_flagged() {
    let err = Error::invariant("parent does not list child");
    assert!(err.is_invariant_violation());
    assert_eq!(
        err.to_string(),
        "invariant violation: parent does not list child"
    );
}

#[test]
fn dispatch_error_message() {
    let err = Error::dispatch("create_entity", "reverted");
    assert!(matches!(err.kind, ErrorKind::Dispatch { .. }));
    assert_eq!(err.to_string(), "call create_entity failed: reverted");
}

#[test]
fn context_names_operation_and_entity() {
    let context = ErrorContext::new()
        .with_operation("remove_entity")
        .with_entity(EntityId::from(7u64));
    assert_eq!(context.to_string(), "in remove_entity on Entity(0x7)");

    let err = Error::invalid_operation("no Entity component").with_context(context);
    assert!(err.context.is_some());
}
