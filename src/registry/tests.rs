use alloc::boxed::Box;
use std::vec::Vec;

use super::*;
use crate::config::ButtonOptions;
use crate::input::FnSource;
use crate::types::GestureMask;

fn button(id: u32) -> Button<'static> {
    Button::new(
        Box::new(FnSource::new(SourceId(id), || false)),
        ButtonOptions::new(GestureMask::CLICK),
    )
}

#[test]
fn handles_are_distinct_and_resolve() {
    let mut registry: Registry<'static, 4> = Registry::new();
    let a = registry.insert(button(1)).expect("a");
    let b = registry.insert(button(2)).expect("b");
    assert_ne!(a, b);
    assert_eq!(registry.len(), 2);
    assert!(registry.contains(a));
    assert_eq!(registry.snapshot(b).map(|s| s.source_id), Some(SourceId(2)));
    assert_eq!(registry.handles().collect::<Vec<_>>(), [a, b]);
}

#[test]
fn duplicate_source_is_rejected_and_first_handle_survives() {
    let mut registry: Registry<'static, 4> = Registry::new();
    let first = registry.insert(button(7)).expect("first");
    assert_eq!(
        registry.insert(button(7)).err(),
        Some(RegistryError::Duplicate(SourceId(7)))
    );
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(first));
}

#[test]
fn full_table_is_reported() {
    let mut registry: Registry<'static, 2> = Registry::new();
    registry.insert(button(1)).expect("1");
    registry.insert(button(2)).expect("2");
    assert_eq!(registry.insert(button(3)).err(), Some(RegistryError::Full));
    assert_eq!(registry.capacity(), 2);
}

#[test]
fn unregister_twice_fails_the_second_time() {
    let mut registry: Registry<'static, 4> = Registry::new();
    let handle = registry.insert(button(1)).expect("insert");
    assert!(registry.remove(handle).is_ok());
    assert_eq!(
        registry.remove(handle).err(),
        Some(RegistryError::UnknownHandle(handle))
    );
    assert!(registry.is_empty());
}

#[test]
fn stale_handle_does_not_reach_the_slot_reuser() {
    let mut registry: Registry<'static, 1> = Registry::new();
    let old = registry.insert(button(1)).expect("old");
    registry.remove(old).expect("remove");

    let new = registry.insert(button(2)).expect("new");
    assert_eq!(new.index(), old.index());
    assert_ne!(new.generation(), old.generation());

    assert!(!registry.contains(old));
    assert_eq!(registry.snapshot(old), None);
    assert_eq!(
        registry.remove(old).err(),
        Some(RegistryError::UnknownHandle(old))
    );
    assert!(registry.contains(new));
}

#[test]
fn removed_source_can_register_again() {
    let mut registry: Registry<'static, 2> = Registry::new();
    let handle = registry.insert(button(5)).expect("insert");
    registry.remove(handle).expect("remove");
    assert!(registry.insert(button(5)).is_ok());
}

#[test]
fn out_of_range_handle_is_unknown() {
    let mut registry: Registry<'static, 2> = Registry::new();
    let bogus = ButtonHandle {
        index: 9,
        generation: 0,
    };
    assert_eq!(
        registry.remove(bogus).err(),
        Some(RegistryError::UnknownHandle(bogus))
    );
}

#[test]
fn errors_render_readably() {
    assert_eq!(
        std::format!("{}", RegistryError::Duplicate(SourceId(3))),
        "input source src3 is already registered"
    );
    let handle = ButtonHandle {
        index: 1,
        generation: 2,
    };
    assert_eq!(
        std::format!("{}", RegistryError::UnknownHandle(handle)),
        "no live button for handle #1.2"
    );
}

/// Registers and unregisters on slot 0 until its next registration would get
/// the last generation. Returns the slot's very first handle.
fn cycle_slot_to_last_generation<const N: usize>(
    registry: &mut Registry<'static, N>,
) -> ButtonHandle {
    let first = registry.insert(button(1)).expect("first");
    registry.remove(first).expect("remove first");
    for _ in 1..u16::MAX {
        let handle = registry.insert(button(1)).expect("reinsert");
        assert_eq!(handle.index(), first.index());
        registry.remove(handle).expect("remove");
    }
    first
}

#[test]
fn exhausted_slot_is_retired_instead_of_wrapping() {
    let mut registry: Registry<'static, 1> = Registry::new();
    let first = cycle_slot_to_last_generation(&mut registry);

    let last = registry.insert(button(1)).expect("last generation");
    assert_eq!(last.generation(), u16::MAX);
    registry.remove(last).expect("remove last");

    assert_eq!(registry.insert(button(2)).err(), Some(RegistryError::Full));
    assert!(!registry.contains(first));
    assert!(!registry.contains(last));
    assert_eq!(
        registry.remove(first).err(),
        Some(RegistryError::UnknownHandle(first))
    );
    assert_eq!(
        registry.remove(last).err(),
        Some(RegistryError::UnknownHandle(last))
    );
}

#[test]
fn retired_slot_is_skipped_for_a_fresh_one() {
    let mut registry: Registry<'static, 2> = Registry::new();
    let first = cycle_slot_to_last_generation(&mut registry);
    let last = registry.insert(button(1)).expect("last generation");
    registry.remove(last).expect("remove last");

    let fresh = registry.insert(button(2)).expect("fresh slot");
    assert_ne!(fresh.index(), first.index());
    assert_eq!(fresh.generation(), 0);
    assert!(!registry.contains(first));
    assert_eq!(registry.snapshot(first), None);
    assert_eq!(
        registry.snapshot(fresh).map(|s| s.source_id),
        Some(SourceId(2))
    );
}
