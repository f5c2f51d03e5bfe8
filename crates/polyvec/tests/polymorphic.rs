//! Integration tests for variant occupancy and element-lifetime accounting.
//!
//! `Event` is the declared element type; it carries a dispatch function
//! pointer installed at construction, so behavior (and teardown, via the
//! `Drop` impl) follows the occupant even though every slot is accessed at
//! the declared type.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use polyvec::{layout_compatible, PolyVec, VariantOf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Base,
    Derived,
}

#[repr(C)]
struct Event {
    kind_fn: fn() -> Kind,
    drops: Arc<AtomicUsize>,
    payload: u64,
}

impl Event {
    fn new(counters: &Counters, payload: u64) -> Self {
        counters.constructions.fetch_add(1, Ordering::Relaxed);
        Self {
            kind_fn: || Kind::Base,
            drops: Arc::clone(&counters.destructions),
            payload,
        }
    }

    fn kind(&self) -> Kind {
        (self.kind_fn)()
    }
}

impl Drop for Event {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::Relaxed);
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

/// A variant occupant: same layout as `Event`, derived dispatch installed
/// at construction. Owns nothing beyond the `Event` prefix, so teardown
/// through `Event` is exact.
#[repr(C)]
struct AlarmEvent {
    base: Event,
}

impl AlarmEvent {
    fn new(counters: &Counters, payload: u64) -> Self {
        let mut base = Event::new(counters, payload);
        base.kind_fn = || Kind::Derived;
        Self { base }
    }
}

// SAFETY: repr(C) with `Event` as the first and only field - identical
// layout, readable as `Event`, and `Event`'s drop releases everything an
// `AlarmEvent` owns.
unsafe impl VariantOf<Event> for AlarmEvent {}

#[derive(Default)]
struct Counters {
    constructions: AtomicUsize,
    destructions: Arc<AtomicUsize>,
}

impl Counters {
    fn constructed(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }

    fn destroyed(&self) -> usize {
        self.destructions.load(Ordering::Relaxed)
    }
}

#[test]
fn layout_predicate_holds_for_the_variant_pair() {
    assert!(layout_compatible::<AlarmEvent, Event>());
    assert!(layout_compatible::<Event, Event>());
    assert!(!layout_compatible::<u8, Event>());
}

#[test]
fn variant_occupants_dispatch_through_declared_type() {
    let counters = Counters::default();
    let mut events: PolyVec<Event> = PolyVec::new();
    events.push_variant(Event::new(&counters, 1));
    events.push_variant(AlarmEvent::new(&counters, 2));

    assert_eq!(events[0].kind(), Kind::Base);
    assert_eq!(events[1].kind(), Kind::Derived);
    assert_eq!(events[0].payload, 1);
    assert_eq!(events[1].payload, 2);
    assert_eq!(counters.constructed(), 2);
    assert_eq!(counters.destroyed(), 0);
}

#[test]
fn pop_destroys_exactly_the_last_occupant() {
    let counters = Counters::default();
    let mut events: PolyVec<Event> = PolyVec::new();
    events.push_variant(Event::new(&counters, 1));
    events.push_variant(AlarmEvent::new(&counters, 2));

    events.pop();
    assert_eq!(counters.destroyed(), 1);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), Kind::Base);
}

#[test]
fn teardown_destroys_each_live_element_once() {
    let counters = Counters::default();
    {
        let mut events: PolyVec<Event> = PolyVec::new();
        for i in 0..10 {
            if i % 2 == 0 {
                events.push(Event::new(&counters, i));
            } else {
                events.push_variant(AlarmEvent::new(&counters, i));
            }
        }
        // Growth relocated elements several times; no destruction yet.
        assert_eq!(counters.destroyed(), 0);
    }
    assert_eq!(counters.constructed(), 10);
    assert_eq!(counters.destroyed(), 10);
}

#[test]
fn clear_destroys_each_live_element_once_and_keeps_capacity() {
    let counters = Counters::default();
    let mut events: PolyVec<Event> = PolyVec::new();
    for i in 0..4 {
        events.push(Event::new(&counters, i));
    }
    let cap = events.capacity();

    events.clear();
    assert_eq!(events.len(), 0);
    assert_eq!(events.capacity(), cap);
    assert_eq!(counters.destroyed(), 4);

    // Reusing the cleared buffer constructs fresh occupants.
    events.push_variant(AlarmEvent::new(&counters, 9));
    assert_eq!(events[0].kind(), Kind::Derived);
}

#[test]
fn erase_value_destroys_removed_and_relocates_survivors() {
    let counters = Counters::default();
    let mut events: PolyVec<Event> = PolyVec::new();
    for payload in [0, 0, 1, 0, 2, 0, 3, 0] {
        events.push(Event::new(&counters, payload));
    }

    let probe_counters = Counters::default();
    let probe = Event::new(&probe_counters, 0);
    events.erase_value(&probe);

    assert_eq!(events.len(), 3);
    let payloads: Vec<u64> = events.iter().map(|e| e.payload).collect();
    assert_eq!(payloads, [1, 2, 3]);
    // Five matches destroyed, survivors moved bytewise without teardown.
    assert_eq!(counters.destroyed(), 5);

    drop(events);
    assert_eq!(counters.destroyed(), 8);
    assert_eq!(counters.constructed(), 8);
}

#[test]
fn insert_relocation_never_destroys() {
    let counters = Counters::default();
    let mut events: PolyVec<Event> = PolyVec::new();
    events.push(Event::new(&counters, 1));
    events.push(Event::new(&counters, 2));
    // Buffer is full: this insert takes the fused grow-and-shift path.
    assert_eq!(events.len(), events.capacity());
    events.insert(1, Event::new(&counters, 5));

    let payloads: Vec<u64> = events.iter().map(|e| e.payload).collect();
    assert_eq!(payloads, [1, 5, 2]);
    assert_eq!(counters.destroyed(), 0);

    drop(events);
    assert_eq!(counters.destroyed(), 3);
}

#[test]
fn reserve_relocates_variant_occupants_intact() {
    let counters = Counters::default();
    let mut events: PolyVec<Event> = PolyVec::new();
    events.push_variant(AlarmEvent::new(&counters, 7));
    events.reserve(64);

    assert_eq!(events.capacity(), 64);
    assert_eq!(events[0].kind(), Kind::Derived);
    assert_eq!(events[0].payload, 7);
    assert_eq!(counters.destroyed(), 0);
}
