//! One-call hardening of the runtime's shared base objects.
//!
//! Runs the full sequence in the only order that works: repair every
//! curated root first (repair rewrites configurable fields, which freezing
//! would make impossible), then freeze each root's reachable graph, then
//! verify that nothing reachable was left mutable.

use serde::{Deserialize, Serialize};

use crate::graph_freeze::freeze_graph_with_stats;
use crate::graph_walk::verify_frozen;
use crate::intrinsic_roots::{IntrinsicRoots, repair_roots};
use crate::object_model::{ObjectError, ObjectHeap, Value};

/// What a lockdown did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockdownStats {
    /// Populated root slots repaired.
    pub roots_repaired: u64,
    /// Fields rewritten as override-safe accessor pairs.
    pub fields_repaired: u64,
    /// Objects newly frozen across all root graphs.
    pub objects_frozen: u64,
}

/// Repair, freeze, and verify every populated root.
///
/// Roots may share sub-objects or delegate to one another; each object is
/// still frozen exactly once, since later traversals treat anything an
/// earlier one froze as a boundary.
pub fn lockdown(
    heap: &mut ObjectHeap,
    roots: &IntrinsicRoots,
) -> Result<LockdownStats, ObjectError> {
    let report = repair_roots(heap, roots)?;
    let mut stats = LockdownStats {
        roots_repaired: report.roots_repaired,
        fields_repaired: report.fields_repaired,
        objects_frozen: 0,
    };

    for (_, handle) in roots.roots() {
        let (_, freeze) = freeze_graph_with_stats(heap, Value::Object(handle))?;
        stats.objects_frozen += freeze.objects_frozen;
    }
    for (_, handle) in roots.roots() {
        verify_frozen(heap, &Value::Object(handle))?;
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
