//! The curated set of shared base objects that must stay overridable.
//!
//! Every delegation chain in the runtime passes through a handful of
//! well-known base objects (the plain-object base, the array base, the
//! wrapper bases, the callable bases, the iterator/promise protocol bases,
//! the typed-buffer bases, and the error-kind family). Freezing those
//! without repair would break field overriding for every object in the
//! runtime at once, so they are enumerated here explicitly and repaired
//! before anything is frozen.
//!
//! The set is injectable configuration, not a hardcoded global: the host
//! that assembles the runtime's base objects fills in the slots it actually
//! has, and hosts lacking optional built-ins simply leave slots empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::object_model::{ObjectError, ObjectHandle, ObjectHeap, Value};
use crate::override_repair::repair_all_fields;

// ---------------------------------------------------------------------------
// RootSlot — names for the well-known bases
// ---------------------------------------------------------------------------

/// A well-known shared base object, by role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RootSlot {
    ObjectPrototype,
    ArrayPrototype,
    BooleanPrototype,
    DatePrototype,
    NumberPrototype,
    StringPrototype,
    FunctionPrototype,
    GeneratorPrototype,
    AsyncFunctionPrototype,
    AsyncGeneratorPrototype,
    IteratorPrototype,
    ArrayIteratorPrototype,
    PromisePrototype,
    DataViewPrototype,
    TypedArrayPrototype,
    Int8ArrayPrototype,
    Int16ArrayPrototype,
    Int32ArrayPrototype,
    Uint8ArrayPrototype,
    Uint16ArrayPrototype,
    Uint32ArrayPrototype,
    ErrorPrototype,
    EvalErrorPrototype,
    RangeErrorPrototype,
    ReferenceErrorPrototype,
    SyntaxErrorPrototype,
    TypeErrorPrototype,
    UriErrorPrototype,
}

impl RootSlot {
    /// Every slot, in declaration order.
    pub const ALL: [RootSlot; 28] = [
        Self::ObjectPrototype,
        Self::ArrayPrototype,
        Self::BooleanPrototype,
        Self::DatePrototype,
        Self::NumberPrototype,
        Self::StringPrototype,
        Self::FunctionPrototype,
        Self::GeneratorPrototype,
        Self::AsyncFunctionPrototype,
        Self::AsyncGeneratorPrototype,
        Self::IteratorPrototype,
        Self::ArrayIteratorPrototype,
        Self::PromisePrototype,
        Self::DataViewPrototype,
        Self::TypedArrayPrototype,
        Self::Int8ArrayPrototype,
        Self::Int16ArrayPrototype,
        Self::Int32ArrayPrototype,
        Self::Uint8ArrayPrototype,
        Self::Uint16ArrayPrototype,
        Self::Uint32ArrayPrototype,
        Self::ErrorPrototype,
        Self::EvalErrorPrototype,
        Self::RangeErrorPrototype,
        Self::ReferenceErrorPrototype,
        Self::SyntaxErrorPrototype,
        Self::TypeErrorPrototype,
        Self::UriErrorPrototype,
    ];

    /// Host-facing name (e.g. `Object.prototype`).
    pub fn name(self) -> &'static str {
        match self {
            Self::ObjectPrototype => "Object.prototype",
            Self::ArrayPrototype => "Array.prototype",
            Self::BooleanPrototype => "Boolean.prototype",
            Self::DatePrototype => "Date.prototype",
            Self::NumberPrototype => "Number.prototype",
            Self::StringPrototype => "String.prototype",
            Self::FunctionPrototype => "Function.prototype",
            Self::GeneratorPrototype => "Generator.prototype",
            Self::AsyncFunctionPrototype => "AsyncFunction.prototype",
            Self::AsyncGeneratorPrototype => "AsyncGenerator.prototype",
            Self::IteratorPrototype => "Iterator.prototype",
            Self::ArrayIteratorPrototype => "ArrayIterator.prototype",
            Self::PromisePrototype => "Promise.prototype",
            Self::DataViewPrototype => "DataView.prototype",
            Self::TypedArrayPrototype => "TypedArray.prototype",
            Self::Int8ArrayPrototype => "Int8Array.prototype",
            Self::Int16ArrayPrototype => "Int16Array.prototype",
            Self::Int32ArrayPrototype => "Int32Array.prototype",
            Self::Uint8ArrayPrototype => "Uint8Array.prototype",
            Self::Uint16ArrayPrototype => "Uint16Array.prototype",
            Self::Uint32ArrayPrototype => "Uint32Array.prototype",
            Self::ErrorPrototype => "Error.prototype",
            Self::EvalErrorPrototype => "EvalError.prototype",
            Self::RangeErrorPrototype => "RangeError.prototype",
            Self::ReferenceErrorPrototype => "ReferenceError.prototype",
            Self::SyntaxErrorPrototype => "SyntaxError.prototype",
            Self::TypeErrorPrototype => "TypeError.prototype",
            Self::UriErrorPrototype => "URIError.prototype",
        }
    }
}

// ---------------------------------------------------------------------------
// IntrinsicRoots — the injectable root set
// ---------------------------------------------------------------------------

/// The root set: a mapping from slot to the host's base object for that
/// role. Slots the host never fills are skipped by the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrinsicRoots {
    slots: BTreeMap<RootSlot, ObjectHandle>,
}

impl IntrinsicRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a slot. Later fills replace earlier ones.
    pub fn set(&mut self, slot: RootSlot, handle: ObjectHandle) -> &mut Self {
        self.slots.insert(slot, handle);
        self
    }

    pub fn get(&self, slot: RootSlot) -> Option<ObjectHandle> {
        self.slots.get(&slot).copied()
    }

    /// Populated slots in deterministic order.
    pub fn roots(&self) -> impl Iterator<Item = (RootSlot, ObjectHandle)> + '_ {
        self.slots.iter().map(|(slot, handle)| (*slot, *handle))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ---------------------------------------------------------------------------
// repair_roots
// ---------------------------------------------------------------------------

/// What [`repair_roots`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    /// Populated slots processed.
    pub roots_repaired: u64,
    /// Fields rewritten across all of them.
    pub fields_repaired: u64,
}

/// Repair every own field of every populated root. Empty slots are skipped
/// silently; order among roots is irrelevant (no root's repair reads another
/// root's state).
///
/// Must run strictly before any of these roots is frozen: repair rewrites a
/// configurable field, and frozen fields are non-configurable.
pub fn repair_roots(
    heap: &mut ObjectHeap,
    roots: &IntrinsicRoots,
) -> Result<RepairReport, ObjectError> {
    let mut report = RepairReport::default();
    for (_, handle) in roots.roots() {
        report.fields_repaired += repair_all_fields(heap, &Value::Object(handle))?;
        report.roots_repaired += 1;
    }
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
