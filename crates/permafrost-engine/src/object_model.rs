//! Dynamic object model: property descriptors, delegation chains, and the
//! arena heap the hardening passes operate on.
//!
//! Key features:
//!
//! - **Property descriptors**: data vs accessor, configurable/enumerable/writable
//! - **Delegation chains**: `[[Prototype]]` internal slot with guarded chain walks
//! - **Receiver-aware assignment**: `set_property` implements the full
//!   own-then-inherited semantics, including the rejection of assignments that
//!   would shadow an inherited non-writable data field
//! - **Native accessors**: getter/setter behaviors are first-class heap objects
//!   and may carry own fields of their own
//! - **Symbol keys**: property keys are either strings or symbols
//!
//! `BTreeMap`/`BTreeSet` for deterministic ordering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Serialize/deserialize `BTreeMap<PropertyKey, PropertyDescriptor>` as a
/// sorted sequence of `[key, descriptor]` pairs. JSON maps need string keys
/// but `PropertyKey` is an enum, so the property table round-trips through a
/// vec-of-pairs representation.
mod properties_as_seq {
    use super::{BTreeMap, PropertyDescriptor, PropertyKey};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<PropertyKey, PropertyDescriptor>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(&PropertyKey, &PropertyDescriptor)> = map.iter().collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<PropertyKey, PropertyDescriptor>, D::Error> {
        let pairs: Vec<(PropertyKey, PropertyDescriptor)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// PropertyKey — string or symbol
// ---------------------------------------------------------------------------

/// Unique symbol identifier, allocated by the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// A property key: either a string or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    String(String),
    Symbol(SymbolId),
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "Symbol({})", id.0),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

// ---------------------------------------------------------------------------
// ObjectHandle — identity of a heap object
// ---------------------------------------------------------------------------

/// Opaque handle referencing an object on the heap. Reference identity is
/// handle equality; two handles are the same object exactly when they are
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub u32);

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Value — runtime value
// ---------------------------------------------------------------------------

/// Runtime value. Callables are heap objects carrying a [`NativeFn`]
/// behavior, so `Object` covers functions as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Symbol(SymbolId),
    Object(ObjectHandle),
}

impl Value {
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// The object handle, if this value is an object.
    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            Self::Object(h) => Some(*h),
            _ => None,
        }
    }

    /// SameValue comparison: strict identity for objects and symbols,
    /// structural equality for primitives.
    pub fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "Symbol({})", id.0),
            Self::Object(h) => write!(f, "[{h}]"),
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyDescriptor
// ---------------------------------------------------------------------------

/// A property descriptor: exactly one of two shapes at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyDescriptor {
    /// Data descriptor: a stored value plus flags.
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    /// Accessor descriptor: getter and/or setter function objects plus flags.
    Accessor {
        get: Option<ObjectHandle>,
        set: Option<ObjectHandle>,
        enumerable: bool,
        configurable: bool,
    },
}

impl PropertyDescriptor {
    /// Data descriptor with the flags plain assignment produces:
    /// writable, enumerable, configurable.
    pub fn data(value: Value) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }

    pub fn is_configurable(&self) -> bool {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => *configurable,
        }
    }

    pub fn is_enumerable(&self) -> bool {
        match self {
            Self::Data { enumerable, .. } | Self::Accessor { enumerable, .. } => *enumerable,
        }
    }

    /// Writable data descriptor? Accessors are never writable in this sense.
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { writable, .. } => *writable,
            Self::Accessor { .. } => false,
        }
    }

    /// The stored value, if this is a data descriptor.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    fn set_non_configurable(&mut self) {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => {
                *configurable = false;
            }
        }
    }

    fn set_non_writable(&mut self) {
        if let Self::Data { writable, .. } = self {
            *writable = false;
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectError
// ---------------------------------------------------------------------------

/// Errors from object model and hardening operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ObjectError {
    /// Assignment rejected: the target field is effectively read-only.
    #[error("TypeError: Cannot assign to read only property '{key}' of {target}")]
    ReadOnlyAssignment { key: PropertyKey, target: ObjectHandle },

    /// A new field cannot be created on a non-extensible object.
    #[error("TypeError: Cannot add property '{key}', {target} is not extensible")]
    NotExtensible { key: PropertyKey, target: ObjectHandle },

    /// Get/set was routed through an object with no usable call behavior.
    #[error("TypeError: {handle} is not callable as an accessor")]
    NotCallable { handle: ObjectHandle },

    /// Dangling handle.
    #[error("{handle} not found")]
    ObjectNotFound { handle: ObjectHandle },

    /// Delegation chain loops back on itself.
    #[error("TypeError: prototype chain cycle detected")]
    PrototypeCycle,

    /// Delegation chain walk exceeded the depth bound.
    #[error("TypeError: prototype chain depth {depth} exceeds max {max}")]
    PrototypeChainTooDeep { depth: u32, max: u32 },

    /// Accessor invocation re-entered assignment past the depth bound.
    #[error("TypeError: accessor chain depth {depth} exceeds max {max}")]
    AccessorChainTooDeep { depth: u32, max: u32 },

    /// Post-hardening verification found a reachable mutable object.
    #[error("hardening incomplete: {handle} at {path} is still mutable")]
    MutableReachable { handle: ObjectHandle, path: String },
}

// ---------------------------------------------------------------------------
// NativeFn — built-in call behaviors
// ---------------------------------------------------------------------------

/// Built-in behavior of a callable heap object. The override repair installs
/// accessor pairs whose behavior closes over repair-time state; that state
/// lives here so it survives serialization and is visible to graph walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NativeFn {
    /// Getter that returns the captured value regardless of receiver.
    FrozenValueGetter { value: Value },
    /// Setter that re-creates assignment-through-delegation semantics for a
    /// field of the repaired object `home`.
    OverrideSetter { home: ObjectHandle, key: PropertyKey },
}

impl NativeFn {
    /// Values this behavior keeps alive, for graph traversals.
    pub fn referenced_values(&self) -> Vec<Value> {
        match self {
            Self::FrozenValueGetter { value } => vec![value.clone()],
            Self::OverrideSetter { home, .. } => vec![Value::Object(*home)],
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectNode — one object
// ---------------------------------------------------------------------------

/// Delegation chain walks give up past this depth.
pub const MAX_PROTOTYPE_CHAIN_DEPTH: u32 = 1024;

/// Nested accessor invocations during assignment give up past this depth.
/// A pair of hand-crafted setters that forward to each other would otherwise
/// recurse without bound.
pub const MAX_ACCESSOR_CHAIN_DEPTH: u32 = 64;

/// One object: an own-property table, an optional delegation link, and an
/// optional native call behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectNode {
    /// `[[Prototype]]` — the delegation link; `None` ends the chain.
    pub prototype: Option<ObjectHandle>,
    /// `[[Extensible]]` — whether new own properties may be added.
    pub extensible: bool,
    /// Own properties with descriptors.
    #[serde(with = "properties_as_seq")]
    pub properties: BTreeMap<PropertyKey, PropertyDescriptor>,
    /// Call behavior, for native function objects.
    pub native: Option<NativeFn>,
}

impl Default for ObjectNode {
    fn default() -> Self {
        Self::with_prototype(None)
    }
}

impl ObjectNode {
    pub fn with_prototype(proto: Option<ObjectHandle>) -> Self {
        Self {
            prototype: proto,
            extensible: true,
            properties: BTreeMap::new(),
            native: None,
        }
    }

    pub fn is_callable(&self) -> bool {
        self.native.is_some()
    }

    pub fn get_own_property(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    pub fn has_own_property(&self, key: &PropertyKey) -> bool {
        self.properties.contains_key(key)
    }

    /// Define or update an own property, enforcing descriptor compatibility.
    ///
    /// Returns `true` on success, `false` when the existing descriptor is
    /// non-configurable and the change would alter it, or when the object is
    /// non-extensible and the property is new.
    pub fn define_own_property(&mut self, key: PropertyKey, desc: PropertyDescriptor) -> bool {
        match self.properties.get(&key) {
            Some(current) => {
                if !current.is_configurable() && !non_configurable_compatible(current, &desc) {
                    return false;
                }
                self.properties.insert(key, desc);
                true
            }
            None => {
                if !self.extensible {
                    return false;
                }
                self.properties.insert(key, desc);
                true
            }
        }
    }

    /// Delete an own property. Returns `false` if it exists and is
    /// non-configurable; deleting a missing property is vacuously true.
    pub fn delete(&mut self, key: &PropertyKey) -> bool {
        match self.properties.get(key) {
            Some(desc) if !desc.is_configurable() => false,
            Some(_) => {
                self.properties.remove(key);
                true
            }
            None => true,
        }
    }

    /// Own keys in canonical order: integer-like string keys numerically,
    /// then remaining string keys, then symbol keys.
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        let mut int_keys: Vec<(u64, PropertyKey)> = Vec::new();
        let mut str_keys: Vec<PropertyKey> = Vec::new();
        let mut sym_keys: Vec<PropertyKey> = Vec::new();

        for key in self.properties.keys() {
            match key {
                PropertyKey::String(s) => match s.parse::<u64>() {
                    Ok(n) => int_keys.push((n, key.clone())),
                    Err(_) => str_keys.push(key.clone()),
                },
                PropertyKey::Symbol(_) => sym_keys.push(key.clone()),
            }
        }

        int_keys.sort_by_key(|(n, _)| *n);
        let mut result: Vec<PropertyKey> = int_keys.into_iter().map(|(_, k)| k).collect();
        result.extend(str_keys);
        result.extend(sym_keys);
        result
    }

    pub fn prevent_extensions(&mut self) {
        self.extensible = false;
    }

    /// Set the immutability mark: non-extensible, every own property
    /// non-configurable, every data property non-writable. Monotonic —
    /// nothing un-freezes a node.
    pub fn freeze(&mut self) {
        self.extensible = false;
        for desc in self.properties.values_mut() {
            desc.set_non_configurable();
            desc.set_non_writable();
        }
    }

    /// Query the immutability mark.
    pub fn is_frozen(&self) -> bool {
        !self.extensible
            && self
                .properties
                .values()
                .all(|d| !d.is_configurable() && !d.is_writable())
    }
}

/// Changes a non-configurable descriptor tolerates: a byte-identical
/// redefinition, or (for writable data fields) a value overwrite or a
/// writable→non-writable transition.
fn non_configurable_compatible(current: &PropertyDescriptor, desc: &PropertyDescriptor) -> bool {
    if desc.is_configurable() || desc.is_enumerable() != current.is_enumerable() {
        return false;
    }
    match (current, desc) {
        (
            PropertyDescriptor::Data {
                value: cur_v,
                writable: cur_w,
                ..
            },
            PropertyDescriptor::Data {
                value: new_v,
                writable: new_w,
                ..
            },
        ) => {
            if *cur_w {
                true
            } else {
                !*new_w && cur_v.same_value(new_v)
            }
        }
        (
            PropertyDescriptor::Accessor {
                get: cur_get,
                set: cur_set,
                ..
            },
            PropertyDescriptor::Accessor {
                get: new_get,
                set: new_set,
                ..
            },
        ) => cur_get == new_get && cur_set == new_set,
        // Cannot flip data ↔ accessor on a non-configurable property.
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// ObjectHeap — the arena
// ---------------------------------------------------------------------------

/// Where `set_property` routes an assignment, decided by a read-only chain
/// walk before any mutation.
enum AssignRoute {
    OwnDataWritable,
    ReadOnly { holder: ObjectHandle },
    Setter { setter: ObjectHandle },
    CreateOwn,
}

/// The object heap: arena of nodes keyed by handle index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectHeap {
    objects: Vec<ObjectNode>,
    next_symbol: u32,
}

impl Default for ObjectHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectHeap {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_symbol: 1,
        }
    }

    /// Allocate an ordinary object with the given delegation link.
    pub fn alloc(&mut self, proto: Option<ObjectHandle>) -> ObjectHandle {
        let handle = ObjectHandle(self.objects.len() as u32);
        self.objects.push(ObjectNode::with_prototype(proto));
        handle
    }

    /// Allocate an ordinary object with no delegation link.
    pub fn alloc_plain(&mut self) -> ObjectHandle {
        self.alloc(None)
    }

    /// Allocate a native function object.
    pub fn alloc_native(&mut self, native: NativeFn) -> ObjectHandle {
        let handle = ObjectHandle(self.objects.len() as u32);
        self.objects.push(ObjectNode {
            native: Some(native),
            ..ObjectNode::with_prototype(None)
        });
        handle
    }

    /// Allocate a fresh, globally unique symbol id.
    pub fn alloc_symbol(&mut self) -> SymbolId {
        let id = SymbolId(self.next_symbol);
        self.next_symbol += 1;
        id
    }

    pub fn get(&self, handle: ObjectHandle) -> Result<&ObjectNode, ObjectError> {
        self.objects
            .get(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound { handle })
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Result<&mut ObjectNode, ObjectError> {
        self.objects
            .get_mut(handle.0 as usize)
            .ok_or(ObjectError::ObjectNotFound { handle })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // -- Field read ----------------------------------------------------------

    /// Read a field: own properties first, then along the delegation chain.
    /// Data fields yield their value; accessor fields invoke the getter with
    /// the original receiver; a missing field reads as `Undefined`.
    pub fn get_property(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<Value, ObjectError> {
        let mut current = Some(handle);
        let mut depth: u32 = 0;
        let mut seen = BTreeSet::new();

        while let Some(h) = current {
            if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
                return Err(ObjectError::PrototypeChainTooDeep {
                    depth,
                    max: MAX_PROTOTYPE_CHAIN_DEPTH,
                });
            }
            if !seen.insert(h) {
                return Err(ObjectError::PrototypeCycle);
            }

            let node = self.get(h)?;
            if let Some(desc) = node.properties.get(key) {
                return match desc {
                    PropertyDescriptor::Data { value, .. } => Ok(value.clone()),
                    PropertyDescriptor::Accessor { get: Some(g), .. } => {
                        self.invoke_getter(*g, handle)
                    }
                    PropertyDescriptor::Accessor { get: None, .. } => Ok(Value::Undefined),
                };
            }
            current = node.prototype;
            depth += 1;
        }
        Ok(Value::Undefined)
    }

    /// Invoke a getter function object with the given receiver.
    pub fn invoke_getter(
        &self,
        getter: ObjectHandle,
        _receiver: ObjectHandle,
    ) -> Result<Value, ObjectError> {
        match &self.get(getter)?.native {
            Some(NativeFn::FrozenValueGetter { value }) => Ok(value.clone()),
            _ => Err(ObjectError::NotCallable { handle: getter }),
        }
    }

    // -- Field write ---------------------------------------------------------

    /// Assign a field with full receiver semantics: overwrite a writable own
    /// data field in place, reject a read-only own or inherited data field,
    /// route through the controlling setter, or create a fresh own field on
    /// an extensible receiver.
    ///
    /// An inherited *non-writable* data field rejects the assignment even
    /// though the receiver has no own field of that name; the override repair
    /// exists to rewrite exactly the fields where freezing would surface this.
    pub fn set_property(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        value: Value,
    ) -> Result<(), ObjectError> {
        self.set_property_at_depth(handle, key, value, 0)
    }

    fn set_property_at_depth(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        value: Value,
        accessor_depth: u32,
    ) -> Result<(), ObjectError> {
        let route = self.assign_route(handle, &key)?;
        match route {
            AssignRoute::OwnDataWritable => {
                let node = self.get_mut(handle)?;
                if let Some(PropertyDescriptor::Data { value: slot, .. }) =
                    node.properties.get_mut(&key)
                {
                    *slot = value;
                }
                Ok(())
            }
            AssignRoute::ReadOnly { holder } => {
                Err(ObjectError::ReadOnlyAssignment { key, target: holder })
            }
            AssignRoute::Setter { setter } => {
                self.invoke_setter_at_depth(setter, handle, value, accessor_depth)
            }
            AssignRoute::CreateOwn => self.create_own_data(handle, key, value),
        }
    }

    /// Read-only chain walk deciding where an assignment goes.
    fn assign_route(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<AssignRoute, ObjectError> {
        let mut current = Some(handle);
        let mut depth: u32 = 0;
        let mut seen = BTreeSet::new();

        while let Some(h) = current {
            if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
                return Err(ObjectError::PrototypeChainTooDeep {
                    depth,
                    max: MAX_PROTOTYPE_CHAIN_DEPTH,
                });
            }
            if !seen.insert(h) {
                return Err(ObjectError::PrototypeCycle);
            }

            let node = self.get(h)?;
            if let Some(desc) = node.properties.get(key) {
                return Ok(match desc {
                    PropertyDescriptor::Data { writable: true, .. } if h == handle => {
                        AssignRoute::OwnDataWritable
                    }
                    // Writable inherited data: assignment shadows it on the
                    // receiver.
                    PropertyDescriptor::Data { writable: true, .. } => AssignRoute::CreateOwn,
                    PropertyDescriptor::Data { writable: false, .. } => {
                        AssignRoute::ReadOnly { holder: h }
                    }
                    PropertyDescriptor::Accessor { set: Some(s), .. } => {
                        AssignRoute::Setter { setter: *s }
                    }
                    PropertyDescriptor::Accessor { set: None, .. } => {
                        AssignRoute::ReadOnly { holder: h }
                    }
                });
            }
            current = node.prototype;
            depth += 1;
        }
        Ok(AssignRoute::CreateOwn)
    }

    fn create_own_data(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        value: Value,
    ) -> Result<(), ObjectError> {
        let node = self.get_mut(handle)?;
        if !node.extensible {
            return Err(ObjectError::NotExtensible { key, target: handle });
        }
        node.properties.insert(key, PropertyDescriptor::data(value));
        Ok(())
    }

    /// Invoke a setter function object with an explicit receiver, as a caller
    /// that extracted the setter from a descriptor would.
    pub fn invoke_setter(
        &mut self,
        setter: ObjectHandle,
        receiver: ObjectHandle,
        value: Value,
    ) -> Result<(), ObjectError> {
        self.invoke_setter_at_depth(setter, receiver, value, 0)
    }

    fn invoke_setter_at_depth(
        &mut self,
        setter: ObjectHandle,
        receiver: ObjectHandle,
        value: Value,
        depth: u32,
    ) -> Result<(), ObjectError> {
        if depth > MAX_ACCESSOR_CHAIN_DEPTH {
            return Err(ObjectError::AccessorChainTooDeep {
                depth,
                max: MAX_ACCESSOR_CHAIN_DEPTH,
            });
        }
        let Some(native) = self.get(setter)?.native.clone() else {
            return Err(ObjectError::NotCallable { handle: setter });
        };
        match native {
            NativeFn::OverrideSetter { home, key } => {
                if receiver == home {
                    // The repaired object itself stays exactly as assignable
                    // as a read-only field would be.
                    return Err(ObjectError::ReadOnlyAssignment { key, target: home });
                }
                if self.get(receiver)?.has_own_property(&key) {
                    // Receiver already carries its own copy: ordinary
                    // assignment on that copy.
                    self.set_property_at_depth(receiver, key, value, depth + 1)
                } else {
                    // Emulate creating a property by assignment.
                    self.create_own_data(receiver, key, value)
                }
            }
            NativeFn::FrozenValueGetter { .. } => Err(ObjectError::NotCallable { handle: setter }),
        }
    }

    // -- Descriptor-level reflection ----------------------------------------

    /// Define or update an own property on `handle`.
    pub fn define_property(
        &mut self,
        handle: ObjectHandle,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool, ObjectError> {
        Ok(self.get_mut(handle)?.define_own_property(key, desc))
    }

    /// Clone of the own descriptor for `key`, if present.
    pub fn get_own_property_descriptor(
        &self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<Option<PropertyDescriptor>, ObjectError> {
        Ok(self.get(handle)?.get_own_property(key).cloned())
    }

    /// Own keys of `handle` in canonical order.
    pub fn own_property_keys(&self, handle: ObjectHandle) -> Result<Vec<PropertyKey>, ObjectError> {
        Ok(self.get(handle)?.own_property_keys())
    }

    /// Delete an own property. `Ok(false)` if it is non-configurable.
    pub fn delete_property(
        &mut self,
        handle: ObjectHandle,
        key: &PropertyKey,
    ) -> Result<bool, ObjectError> {
        Ok(self.get_mut(handle)?.delete(key))
    }

    pub fn get_prototype_of(
        &self,
        handle: ObjectHandle,
    ) -> Result<Option<ObjectHandle>, ObjectError> {
        Ok(self.get(handle)?.prototype)
    }

    /// Re-link the delegation chain. Rejects cycles; a non-extensible object
    /// only accepts its current link.
    pub fn set_prototype_of(
        &mut self,
        handle: ObjectHandle,
        proto: Option<ObjectHandle>,
    ) -> Result<bool, ObjectError> {
        if let Some(p) = proto {
            let mut current = Some(p);
            let mut seen = BTreeSet::new();
            seen.insert(handle);
            while let Some(h) = current {
                if !seen.insert(h) {
                    return Err(ObjectError::PrototypeCycle);
                }
                current = self.get(h)?.prototype;
            }
        }

        let node = self.get_mut(handle)?;
        if !node.extensible {
            return Ok(node.prototype == proto);
        }
        node.prototype = proto;
        Ok(true)
    }

    pub fn is_extensible(&self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        Ok(self.get(handle)?.extensible)
    }

    pub fn prevent_extensions(&mut self, handle: ObjectHandle) -> Result<(), ObjectError> {
        self.get_mut(handle)?.prevent_extensions();
        Ok(())
    }

    /// Set one node's immutability mark. Whole-graph freezing lives in
    /// [`crate::graph_freeze`].
    pub fn freeze_object(&mut self, handle: ObjectHandle) -> Result<(), ObjectError> {
        self.get_mut(handle)?.freeze();
        Ok(())
    }

    pub fn is_frozen(&self, handle: ObjectHandle) -> Result<bool, ObjectError> {
        Ok(self.get(handle)?.is_frozen())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
