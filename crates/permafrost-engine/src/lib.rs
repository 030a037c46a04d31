//! Permafrost: tamper-hardening for a dynamic object runtime.
//!
//! Makes an entire reachable object graph permanently immutable while
//! keeping one guarantee naive freezing breaks: an object that delegates to
//! a frozen base can still override the base's fields by plain assignment.
//!
//! The two cooperating pieces:
//!
//! - [`override_repair`] rewrites vulnerable fields on designated base
//!   objects as override-safe accessor pairs, *before* freezing;
//! - [`graph_freeze`] walks everything reachable from a root — field
//!   values, accessor functions, delegation links — exactly once and
//!   freezes each object, cycle-safe.
//!
//! [`intrinsic_roots`] names the curated "must stay overridable" base
//! objects, [`graph_walk`] is the observational traversal used to verify
//! and diagnose, and [`lockdown`] runs the whole sequence in the one order
//! that works.

#![forbid(unsafe_code)]

pub mod graph_freeze;
pub mod graph_walk;
pub mod intrinsic_roots;
pub mod lockdown;
pub mod object_model;
pub mod override_repair;

pub use graph_freeze::{FreezeStats, freeze_graph, freeze_graph_with_stats};
pub use graph_walk::{PathMap, verify_frozen, walk};
pub use intrinsic_roots::{IntrinsicRoots, RepairReport, RootSlot, repair_roots};
pub use lockdown::{LockdownStats, lockdown};
pub use object_model::{
    NativeFn, ObjectError, ObjectHandle, ObjectHeap, ObjectNode, PropertyDescriptor, PropertyKey,
    SymbolId, Value,
};
pub use override_repair::{repair_all_fields, repair_field};
