//! Integration tests for entity id generation

use std::collections::HashSet;

use worldsmith_foundation::{EntityId, EntityIdGenerator, entity::ENTITY_ID_BITS};

#[test]
fn generated_ids_fit_the_field() {
    let mut ids = EntityIdGenerator::seeded(1);
    for _ in 0..100 {
        assert!(ids.next_id().felt().bits() <= ENTITY_ID_BITS);
    }
}

#[test]
fn seeded_generators_repeat() {
    let mut a = EntityIdGenerator::seeded(99);
    let mut b = EntityIdGenerator::seeded(99);
    for _ in 0..10 {
        assert_eq!(a.next_id(), b.next_id());
    }
}

#[test]
fn generated_ids_are_distinct() {
    let mut ids = EntityIdGenerator::seeded(5);
    let seen: HashSet<EntityId> = (0..1_000).map(|_| ids.next_id()).collect();
    assert_eq!(seen.len(), 1_000);
}

#[test]
fn seed_digits_hash_deterministically() {
    let a = EntityId::from_seed_digits(1_234_567_890_123_456);
    let b = EntityId::from_seed_digits(1_234_567_890_123_456);
    let c = EntityId::from_seed_digits(1_234_567_890_123_457);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn display_and_debug() {
    let id = EntityId::from(42u64);
    assert_eq!(id.to_string(), "Entity(0x2a)");
    assert_eq!(format!("{id:?}"), "EntityId(0x2a)");
    assert_eq!("0x2a".parse::<EntityId>().unwrap(), id);
}
