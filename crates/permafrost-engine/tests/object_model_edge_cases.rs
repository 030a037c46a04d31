//! Edge cases and cross-cutting concerns: exact error formats, descriptor
//! compatibility corners, and serde round-trips of hardened heaps.

use permafrost_engine::{
    NativeFn, ObjectError, ObjectHandle, ObjectHeap, PropertyDescriptor, PropertyKey, Value,
    freeze_graph, repair_all_fields, verify_frozen,
};

fn str_key(s: &str) -> PropertyKey {
    PropertyKey::String(s.to_string())
}

fn int_val(n: i64) -> Value {
    Value::Int(n)
}

// ===========================================================================
// 1. Error display — exact format verification
// ===========================================================================

#[test]
fn error_messages_exact_format() {
    assert_eq!(
        ObjectError::ReadOnlyAssignment {
            key: str_key("foo"),
            target: ObjectHandle(3),
        }
        .to_string(),
        "TypeError: Cannot assign to read only property 'foo' of object#3"
    );
    assert_eq!(
        ObjectError::NotExtensible {
            key: str_key("bar"),
            target: ObjectHandle(1),
        }
        .to_string(),
        "TypeError: Cannot add property 'bar', object#1 is not extensible"
    );
    assert_eq!(
        ObjectError::NotCallable {
            handle: ObjectHandle(9)
        }
        .to_string(),
        "TypeError: object#9 is not callable as an accessor"
    );
    assert_eq!(
        ObjectError::MutableReachable {
            handle: ObjectHandle(2),
            path: "<root>.bar".to_string(),
        }
        .to_string(),
        "hardening incomplete: object#2 at <root>.bar is still mutable"
    );
}

#[test]
fn symbol_keys_render_in_error_messages() {
    let mut heap = ObjectHeap::new();
    let obj = heap.alloc_plain();
    let sym = heap.alloc_symbol();
    heap.set_property(obj, PropertyKey::Symbol(sym), int_val(1))
        .unwrap();
    freeze_graph(&mut heap, Value::Object(obj)).unwrap();

    let err = heap
        .set_property(obj, PropertyKey::Symbol(sym), int_val(2))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("TypeError: Cannot assign to read only property 'Symbol({})' of object#0", sym.0)
    );
}

// ===========================================================================
// 2. Descriptor compatibility corners
// ===========================================================================

#[test]
fn frozen_accessor_keeps_its_functions() {
    let mut heap = ObjectHeap::new();
    let obj = heap.alloc_plain();
    heap.set_property(obj, str_key("x"), int_val(1)).unwrap();
    repair_all_fields(&mut heap, &Value::Object(obj)).unwrap();
    let before = heap
        .get_own_property_descriptor(obj, &str_key("x"))
        .unwrap()
        .unwrap();

    freeze_graph(&mut heap, Value::Object(obj)).unwrap();

    // Freezing flips no flags the repair had not already pinned, and the
    // accessor pair is untouched.
    let after = heap
        .get_own_property_descriptor(obj, &str_key("x"))
        .unwrap()
        .unwrap();
    assert_eq!(before, after);

    // Swapping the accessor out is rejected now.
    let other_getter = heap.alloc_native(NativeFn::FrozenValueGetter { value: int_val(2) });
    assert!(
        !heap
            .define_property(
                obj,
                str_key("x"),
                PropertyDescriptor::Accessor {
                    get: Some(other_getter),
                    set: None,
                    enumerable: true,
                    configurable: false,
                },
            )
            .unwrap()
    );
}

#[test]
fn frozen_object_refuses_new_definitions_and_relinks() {
    let mut heap = ObjectHeap::new();
    let obj = heap.alloc_plain();
    let elsewhere = heap.alloc_plain();
    freeze_graph(&mut heap, Value::Object(obj)).unwrap();

    assert!(
        !heap
            .define_property(obj, str_key("new"), PropertyDescriptor::data(int_val(1)))
            .unwrap()
    );
    assert!(!heap.set_prototype_of(obj, Some(elsewhere)).unwrap());
    assert_eq!(heap.get_prototype_of(obj).unwrap(), None);
}

// ===========================================================================
// 3. Serde round-trips of hardened heaps
// ===========================================================================

#[test]
fn hardened_heap_behaves_identically_after_round_trip() {
    let mut heap = ObjectHeap::new();
    let parent = heap.alloc_plain();
    heap.set_property(parent, str_key("foo"), int_val(4)).unwrap();
    repair_all_fields(&mut heap, &Value::Object(parent)).unwrap();
    freeze_graph(&mut heap, Value::Object(parent)).unwrap();

    let json = serde_json::to_string(&heap).expect("serialize");
    let mut restored: ObjectHeap = serde_json::from_str(&json).expect("deserialize");

    // Still verifiably frozen, still override-safe.
    verify_frozen(&restored, &Value::Object(parent)).unwrap();
    let child = restored.alloc(Some(parent));
    restored
        .set_property(child, str_key("foo"), int_val(5))
        .unwrap();
    assert_eq!(
        restored.get_property(child, &str_key("foo")).unwrap(),
        int_val(5)
    );
    assert_eq!(
        restored.get_property(parent, &str_key("foo")).unwrap(),
        int_val(4)
    );
    assert!(matches!(
        restored.set_property(parent, str_key("foo"), int_val(6)),
        Err(ObjectError::ReadOnlyAssignment { .. })
    ));
}

#[test]
fn symbol_allocation_stays_unique_after_round_trip() {
    let mut heap = ObjectHeap::new();
    let a = heap.alloc_symbol();

    let json = serde_json::to_string(&heap).expect("serialize");
    let mut restored: ObjectHeap = serde_json::from_str(&json).expect("deserialize");
    let b = restored.alloc_symbol();
    assert_ne!(a, b);
}

// ===========================================================================
// 4. Structural no-ops
// ===========================================================================

#[test]
fn primitive_roots_are_no_ops_everywhere() {
    let mut heap = ObjectHeap::new();
    for value in [
        Value::Undefined,
        Value::Null,
        Value::Bool(true),
        int_val(0),
        Value::Str("s".to_string()),
    ] {
        assert_eq!(repair_all_fields(&mut heap, &value).unwrap(), 0);
        assert_eq!(freeze_graph(&mut heap, value.clone()).unwrap(), value);
        verify_frozen(&heap, &value).unwrap();
    }
    assert!(heap.is_empty());
}
