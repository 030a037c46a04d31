//! Whole-graph freezing.
//!
//! Walks every object reachable from a root — through own field values,
//! accessor function objects, native-behavior captures, and the delegation
//! link — exactly once, and sets each node's immutability mark. A worklist
//! plus a visited set keeps the walk cycle-safe; recursion alone would not
//! be, since both field values and delegation links may form cycles.
//!
//! A node that is already frozen when the walk reaches it is a graph
//! boundary from an earlier freeze, not an error: the walk does not expand
//! beneath it. A caller that shallow-froze a node over mutable children
//! keeps that responsibility; [`crate::graph_walk::verify_frozen`] pinpoints
//! such leftovers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::object_model::{ObjectError, ObjectHandle, ObjectHeap, PropertyDescriptor, Value};

/// What a freeze traversal did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeStats {
    /// Distinct reachable objects processed.
    pub objects_visited: u64,
    /// Objects newly frozen (already-frozen boundaries excluded).
    pub objects_frozen: u64,
}

/// Freeze every object reachable from `root` and return the same root.
///
/// A non-object root is a structural no-op. Idempotent: re-freezing an
/// already-frozen graph changes nothing observable.
pub fn freeze_graph(heap: &mut ObjectHeap, root: Value) -> Result<Value, ObjectError> {
    let (root, _) = freeze_graph_with_stats(heap, root)?;
    Ok(root)
}

/// [`freeze_graph`], also reporting traversal counts.
pub fn freeze_graph_with_stats(
    heap: &mut ObjectHeap,
    root: Value,
) -> Result<(Value, FreezeStats), ObjectError> {
    let mut stats = FreezeStats::default();
    let Some(start) = root.as_object() else {
        return Ok((root, stats));
    };

    let mut visited: BTreeSet<ObjectHandle> = BTreeSet::new();
    let mut worklist: Vec<ObjectHandle> = vec![start];

    while let Some(handle) = worklist.pop() {
        // Insert before expanding children: a self-referencing field must
        // find its owner already visited.
        if !visited.insert(handle) {
            continue;
        }
        stats.objects_visited += 1;

        let node = heap.get(handle)?;
        if node.is_frozen() {
            // Boundary from an earlier freeze.
            continue;
        }

        for desc in node.properties.values() {
            match desc {
                PropertyDescriptor::Data { value, .. } => {
                    enqueue_value(&mut worklist, &visited, value);
                }
                PropertyDescriptor::Accessor { get, set, .. } => {
                    // The accessor functions are objects in their own right;
                    // they are traversed, never invoked.
                    for accessor in [get, set].into_iter().flatten() {
                        enqueue(&mut worklist, &visited, *accessor);
                    }
                }
            }
        }
        if let Some(native) = &node.native {
            for value in native.referenced_values() {
                enqueue_value(&mut worklist, &visited, &value);
            }
        }
        if let Some(proto) = node.prototype {
            enqueue(&mut worklist, &visited, proto);
        }

        heap.get_mut(handle)?.freeze();
        stats.objects_frozen += 1;
    }

    Ok((root, stats))
}

fn enqueue_value(worklist: &mut Vec<ObjectHandle>, visited: &BTreeSet<ObjectHandle>, value: &Value) {
    if let Value::Object(h) = value {
        enqueue(worklist, visited, *h);
    }
}

fn enqueue(worklist: &mut Vec<ObjectHandle>, visited: &BTreeSet<ObjectHandle>, handle: ObjectHandle) {
    if !visited.contains(&handle) {
        worklist.push(handle);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
