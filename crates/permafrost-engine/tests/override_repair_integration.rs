//! Integration tests for the override-compatibility repair: the guarantees
//! a delegating object keeps after its base is repaired and frozen.

use permafrost_engine::{
    IntrinsicRoots, ObjectError, ObjectHandle, ObjectHeap, PropertyDescriptor, PropertyKey,
    RootSlot, Value, freeze_graph, repair_all_fields, repair_field, repair_roots,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn str_key(s: &str) -> PropertyKey {
    PropertyKey::String(s.to_string())
}

fn int_val(n: i64) -> Value {
    Value::Int(n)
}

/// A repaired, frozen base with `foo = 4`.
fn frozen_parent(heap: &mut ObjectHeap) -> ObjectHandle {
    let parent = heap.alloc_plain();
    heap.set_property(parent, str_key("foo"), int_val(4)).unwrap();
    repair_all_fields(heap, &Value::Object(parent)).unwrap();
    freeze_graph(heap, Value::Object(parent)).unwrap();
    parent
}

// ===========================================================================
// 1. Override preservation
// ===========================================================================

#[test]
fn child_overrides_frozen_parent_by_assignment() {
    let mut heap = ObjectHeap::new();
    let parent = frozen_parent(&mut heap);
    let child = heap.alloc(Some(parent));

    heap.set_property(child, str_key("foo"), int_val(5)).unwrap();

    assert_eq!(heap.get_property(child, &str_key("foo")).unwrap(), int_val(5));
    assert_eq!(heap.get_property(parent, &str_key("foo")).unwrap(), int_val(4));
    assert_eq!(
        heap.get_own_property_descriptor(child, &str_key("foo"))
            .unwrap()
            .unwrap(),
        PropertyDescriptor::Data {
            value: int_val(5),
            writable: true,
            enumerable: true,
            configurable: true,
        }
    );
}

#[test]
fn without_repair_the_frozen_parent_blocks_the_override() {
    // The defect the repair exists for, reproduced as a control case.
    let mut heap = ObjectHeap::new();
    let parent = heap.alloc_plain();
    heap.set_property(parent, str_key("foo"), int_val(4)).unwrap();
    freeze_graph(&mut heap, Value::Object(parent)).unwrap();
    let child = heap.alloc(Some(parent));

    let err = heap
        .set_property(child, str_key("foo"), int_val(5))
        .unwrap_err();
    assert_eq!(
        err,
        ObjectError::ReadOnlyAssignment {
            key: str_key("foo"),
            target: parent,
        }
    );
}

#[test]
fn two_children_override_independently() {
    let mut heap = ObjectHeap::new();
    let parent = frozen_parent(&mut heap);
    let a = heap.alloc(Some(parent));
    let b = heap.alloc(Some(parent));

    heap.set_property(a, str_key("foo"), int_val(10)).unwrap();

    assert_eq!(heap.get_property(a, &str_key("foo")).unwrap(), int_val(10));
    assert_eq!(heap.get_property(b, &str_key("foo")).unwrap(), int_val(4));
}

// ===========================================================================
// 2. Self-assignment rejected
// ===========================================================================

#[test]
fn frozen_parent_rejects_direct_assignment() {
    let mut heap = ObjectHeap::new();
    let parent = frozen_parent(&mut heap);

    let err = heap
        .set_property(parent, str_key("foo"), int_val(5))
        .unwrap_err();
    assert_eq!(
        err,
        ObjectError::ReadOnlyAssignment {
            key: str_key("foo"),
            target: parent,
        }
    );
    assert_eq!(heap.get_property(parent, &str_key("foo")).unwrap(), int_val(4));
}

// ===========================================================================
// 3. Setter portability
// ===========================================================================

#[test]
fn extracted_setter_works_on_an_unrelated_receiver() {
    let mut heap = ObjectHeap::new();
    let parent = frozen_parent(&mut heap);
    let child = heap.alloc(Some(parent));
    let other = heap.alloc_plain();
    heap.set_property(other, str_key("foo"), int_val(6)).unwrap();

    let desc = heap
        .get_own_property_descriptor(parent, &str_key("foo"))
        .unwrap()
        .unwrap();
    let PropertyDescriptor::Accessor { set: Some(setter), .. } = desc else {
        panic!("expected repaired accessor with setter");
    };

    heap.invoke_setter(setter, other, int_val(7)).unwrap();

    assert_eq!(heap.get_property(other, &str_key("foo")).unwrap(), int_val(7));
    // A separate delegator still reads the captured base value.
    assert_eq!(heap.get_property(child, &str_key("foo")).unwrap(), int_val(4));
}

#[test]
fn extracted_setter_still_rejects_its_home_object() {
    let mut heap = ObjectHeap::new();
    let parent = frozen_parent(&mut heap);

    let desc = heap
        .get_own_property_descriptor(parent, &str_key("foo"))
        .unwrap()
        .unwrap();
    let PropertyDescriptor::Accessor { set: Some(setter), .. } = desc else {
        panic!("expected repaired accessor with setter");
    };

    let err = heap.invoke_setter(setter, parent, int_val(7)).unwrap_err();
    assert!(matches!(err, ObjectError::ReadOnlyAssignment { .. }));
}

#[test]
fn extracted_setter_creates_a_fresh_field_on_a_stranger() {
    let mut heap = ObjectHeap::new();
    let parent = frozen_parent(&mut heap);
    let stranger = heap.alloc_plain();

    let desc = heap
        .get_own_property_descriptor(parent, &str_key("foo"))
        .unwrap()
        .unwrap();
    let PropertyDescriptor::Accessor { set: Some(setter), .. } = desc else {
        panic!("expected repaired accessor with setter");
    };

    heap.invoke_setter(setter, stranger, int_val(8)).unwrap();
    assert_eq!(
        heap.get_own_property_descriptor(stranger, &str_key("foo"))
            .unwrap()
            .unwrap(),
        PropertyDescriptor::data(int_val(8))
    );
}

// ===========================================================================
// 4. Repair idempotence and scope
// ===========================================================================

#[test]
fn repairing_twice_changes_nothing() {
    let mut heap = ObjectHeap::new();
    let parent = heap.alloc_plain();
    heap.set_property(parent, str_key("foo"), int_val(4)).unwrap();

    assert!(repair_field(&mut heap, parent, &str_key("foo")).unwrap());
    let first = heap
        .get_own_property_descriptor(parent, &str_key("foo"))
        .unwrap();
    let heap_len = heap.len();

    assert!(!repair_field(&mut heap, parent, &str_key("foo")).unwrap());
    assert_eq!(
        heap.get_own_property_descriptor(parent, &str_key("foo"))
            .unwrap(),
        first
    );
    // No stray accessor objects allocated by the no-op.
    assert_eq!(heap.len(), heap_len);
}

#[test]
fn repair_after_freeze_is_too_late() {
    // Frozen fields are non-configurable, so they no longer qualify.
    let mut heap = ObjectHeap::new();
    let parent = heap.alloc_plain();
    heap.set_property(parent, str_key("foo"), int_val(4)).unwrap();
    freeze_graph(&mut heap, Value::Object(parent)).unwrap();

    assert!(!repair_field(&mut heap, parent, &str_key("foo")).unwrap());
    assert!(
        heap.get_own_property_descriptor(parent, &str_key("foo"))
            .unwrap()
            .unwrap()
            .is_data()
    );
}

#[test]
fn symbol_keyed_fields_are_repaired_too() {
    let mut heap = ObjectHeap::new();
    let parent = heap.alloc_plain();
    let sym = heap.alloc_symbol();
    heap.set_property(parent, PropertyKey::Symbol(sym), int_val(4))
        .unwrap();
    repair_all_fields(&mut heap, &Value::Object(parent)).unwrap();
    freeze_graph(&mut heap, Value::Object(parent)).unwrap();

    let child = heap.alloc(Some(parent));
    heap.set_property(child, PropertyKey::Symbol(sym), int_val(5))
        .unwrap();
    assert_eq!(
        heap.get_property(child, &PropertyKey::Symbol(sym)).unwrap(),
        int_val(5)
    );
    assert_eq!(
        heap.get_property(parent, &PropertyKey::Symbol(sym)).unwrap(),
        int_val(4)
    );
}

// ===========================================================================
// 5. Root coordination
// ===========================================================================

#[test]
fn repair_roots_then_freeze_keeps_every_chain_overridable() {
    let mut heap = ObjectHeap::new();
    let object_proto = heap.alloc_plain();
    heap.set_property(object_proto, str_key("toString"), int_val(1))
        .unwrap();
    let array_proto = heap.alloc(Some(object_proto));
    heap.set_property(array_proto, str_key("push"), int_val(2))
        .unwrap();

    let mut roots = IntrinsicRoots::new();
    roots.set(RootSlot::ObjectPrototype, object_proto);
    roots.set(RootSlot::ArrayPrototype, array_proto);

    let report = repair_roots(&mut heap, &roots).unwrap();
    assert_eq!(report.roots_repaired, 2);
    assert_eq!(report.fields_repaired, 2);

    for (_, handle) in roots.roots() {
        freeze_graph(&mut heap, Value::Object(handle)).unwrap();
    }

    // An "array instance" overrides both an array method and an object
    // method by plain assignment.
    let arr = heap.alloc(Some(array_proto));
    heap.set_property(arr, str_key("push"), int_val(20)).unwrap();
    heap.set_property(arr, str_key("toString"), int_val(10)).unwrap();
    assert_eq!(heap.get_property(arr, &str_key("push")).unwrap(), int_val(20));
    assert_eq!(heap.get_property(arr, &str_key("toString")).unwrap(), int_val(10));
    assert_eq!(
        heap.get_property(array_proto, &str_key("push")).unwrap(),
        int_val(2)
    );
}
