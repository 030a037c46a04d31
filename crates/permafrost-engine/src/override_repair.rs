//! Override-compatibility repair.
//!
//! Freezing a shared base object turns its data fields into non-writable
//! data fields, and assignment through a delegation chain is specified to
//! fail when the inherited field is a non-writable data field. Code that
//! overrides an inherited field by plain assignment — the common idiom in
//! delegation object models — breaks the moment the base is frozen.
//!
//! The repair runs *before* freezing and rewrites each vulnerable field as
//! an accessor pair that keeps the old behavior alive:
//!
//! - the getter always returns the value captured at repair time;
//! - the setter rejects assignment on the repaired object itself, and
//!   creates (or overwrites) an own field on any delegating receiver, which
//!   is exactly what plain assignment would have done had the base never
//!   been frozen.
//!
//! Repair requires rewriting a configurable field, so it is a no-op after
//! freezing; order is enforced by the caller (see [`crate::lockdown`]).

use crate::object_model::{
    NativeFn, ObjectError, ObjectHandle, ObjectHeap, PropertyDescriptor, PropertyKey, Value,
};

/// Rewrite one field of `obj` as an override-safe accessor pair.
///
/// Only an own, configurable *data* field qualifies. Accessor fields already
/// define their own get/set behavior, non-configurable fields cannot be
/// rewritten, and a previously repaired field is no longer a data field —
/// so re-repairing is automatically a no-op.
///
/// Returns whether a rewrite happened.
pub fn repair_field(
    heap: &mut ObjectHeap,
    obj: ObjectHandle,
    key: &PropertyKey,
) -> Result<bool, ObjectError> {
    let (value, enumerable) = match heap.get(obj)?.get_own_property(key) {
        Some(PropertyDescriptor::Data {
            value,
            enumerable,
            configurable: true,
            ..
        }) => (value.clone(), *enumerable),
        _ => return Ok(false),
    };

    let getter = heap.alloc_native(NativeFn::FrozenValueGetter {
        value: value.clone(),
    });
    // Re-attach the captured value as an own field of the getter so graph
    // traversals and reflection reach it without invoking anything.
    heap.get_mut(getter)?
        .define_own_property(PropertyKey::from("value"), PropertyDescriptor::data(value));

    let setter = heap.alloc_native(NativeFn::OverrideSetter {
        home: obj,
        key: key.clone(),
    });

    // The field is a configurable own property, so this redefinition cannot
    // be rejected.
    heap.get_mut(obj)?.properties.insert(
        key.clone(),
        PropertyDescriptor::Accessor {
            get: Some(getter),
            set: Some(setter),
            enumerable,
            // The rewritten field must survive freezing without further
            // mutation.
            configurable: false,
        },
    );
    Ok(true)
}

/// Apply [`repair_field`] to every own field (string- and symbol-keyed) of
/// the target. A non-object target is a structural no-op.
///
/// Returns the number of fields rewritten.
pub fn repair_all_fields(heap: &mut ObjectHeap, target: &Value) -> Result<u64, ObjectError> {
    let Value::Object(obj) = target else {
        return Ok(0);
    };
    let mut repaired = 0;
    for key in heap.own_property_keys(*obj)? {
        if repair_field(heap, *obj, &key)? {
            repaired += 1;
        }
    }
    Ok(repaired)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
