//! Observational graph walking with access-path diagnostics.
//!
//! [`walk`] reaches the same objects as [`crate::graph_freeze::freeze_graph`]
//! — own field values, accessor function objects, native-behavior captures,
//! and the delegation link — but never mutates anything. While it walks it
//! records a human-readable access path for every object it discovers, so a
//! caller can say *where* in the graph a given object sits.
//!
//! Unlike the freeze traversal, the walk does not stop at frozen nodes: its
//! main job is checking what freezing left behind ([`verify_frozen`]), and a
//! mutable child under a shallow-frozen parent must not stay hidden.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::object_model::{ObjectError, ObjectHandle, ObjectHeap, PropertyDescriptor, Value};

/// Path label of the walk's starting object.
pub const ROOT_PATH: &str = "<root>";

/// Placeholder returned for objects the current walk has not discovered.
pub const UNREACHABLE: &str = "<unreachable>";

// ---------------------------------------------------------------------------
// PathMap
// ---------------------------------------------------------------------------

/// Access paths discovered so far, by object identity. The first path found
/// for an object wins; later discoveries through other routes are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMap {
    paths: BTreeMap<ObjectHandle, String>,
}

impl PathMap {
    /// The access path of `handle`, or [`UNREACHABLE`] if the walk has not
    /// discovered it.
    pub fn path_of(&self, handle: ObjectHandle) -> &str {
        self.paths
            .get(&handle)
            .map(String::as_str)
            .unwrap_or(UNREACHABLE)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.paths.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn record(&mut self, handle: ObjectHandle, path: String) {
        self.paths.entry(handle).or_insert(path);
    }
}

// ---------------------------------------------------------------------------
// walk
// ---------------------------------------------------------------------------

/// Visit every object reachable from `root` exactly once.
///
/// The visitor receives each object's handle and the paths discovered so
/// far; its own path is always recorded by then. A visitor error aborts the
/// walk immediately and propagates unmodified; visits already made are not
/// undone (there is nothing to undo — the walk never mutates).
///
/// A non-object root is a structural no-op.
pub fn walk<F>(heap: &ObjectHeap, root: &Value, mut visit: F) -> Result<(), ObjectError>
where
    F: FnMut(ObjectHandle, &PathMap) -> Result<(), ObjectError>,
{
    let Some(start) = root.as_object() else {
        return Ok(());
    };

    let mut paths = PathMap::default();
    paths.record(start, ROOT_PATH.to_string());

    let mut visited: BTreeSet<ObjectHandle> = BTreeSet::new();
    let mut worklist: Vec<ObjectHandle> = vec![start];

    while let Some(handle) = worklist.pop() {
        if !visited.insert(handle) {
            continue;
        }
        visit(handle, &paths)?;

        let node = heap.get(handle)?;
        let base = paths.path_of(handle).to_string();

        for (key, desc) in &node.properties {
            match desc {
                PropertyDescriptor::Data { value, .. } => {
                    if let Value::Object(child) = value {
                        discover(&mut worklist, &mut paths, &visited, *child, || {
                            format!("{base}.{key}")
                        });
                    }
                }
                PropertyDescriptor::Accessor { get, set, .. } => {
                    if let Some(g) = get {
                        discover(&mut worklist, &mut paths, &visited, *g, || {
                            format!("{base}.{key}[get]")
                        });
                    }
                    if let Some(s) = set {
                        discover(&mut worklist, &mut paths, &visited, *s, || {
                            format!("{base}.{key}[set]")
                        });
                    }
                }
            }
        }
        if let Some(native) = &node.native {
            for value in native.referenced_values() {
                if let Value::Object(captured) = value {
                    discover(&mut worklist, &mut paths, &visited, captured, || {
                        format!("{base}[[captured]]")
                    });
                }
            }
        }
        if let Some(proto) = node.prototype {
            discover(&mut worklist, &mut paths, &visited, proto, || {
                format!("{base}.[[prototype]]")
            });
        }
    }
    Ok(())
}

fn discover(
    worklist: &mut Vec<ObjectHandle>,
    paths: &mut PathMap,
    visited: &BTreeSet<ObjectHandle>,
    handle: ObjectHandle,
    path: impl FnOnce() -> String,
) {
    paths.record(handle, path());
    if !visited.contains(&handle) {
        worklist.push(handle);
    }
}

// ---------------------------------------------------------------------------
// verify_frozen
// ---------------------------------------------------------------------------

/// Confirm that everything reachable from `root` is frozen.
///
/// Fails with [`ObjectError::MutableReachable`] naming the first mutable
/// object found and its access path.
pub fn verify_frozen(heap: &ObjectHeap, root: &Value) -> Result<(), ObjectError> {
    walk(heap, root, |handle, paths| {
        if heap.get(handle)?.is_frozen() {
            Ok(())
        } else {
            Err(ObjectError::MutableReachable {
                handle,
                path: paths.path_of(handle).to_string(),
            })
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
