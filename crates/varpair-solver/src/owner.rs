//! Resolution state of inference variables.
//!
//! An [`UnboundRef`] carries only a handle. Whether that handle has been
//! resolved, and to what, is owned by a [`ReferenceOwner`]. The pair walker
//! asks the owner and never resolves anything itself.
//!
//! [`InferenceTable`] is the stock owner: a union-find over handles where each
//! equivalence class holds at most one resolved reference.

use crate::error::ModelError;
use crate::types::{InferenceHandle, TypeParamId, TypeRef, UnboundRef};
use ena::unify::{InPlaceUnificationTable, UnifyKey, UnifyValue};
use std::cell::RefCell;
use tracing::trace;

/// Authority over inference-variable resolution.
pub trait ReferenceOwner {
    /// Whether `handle` currently has a resolved value.
    fn is_resolved(&self, handle: InferenceHandle) -> bool;

    /// The resolved value of `handle`, if any.
    fn resolved_reference(&self, handle: InferenceHandle) -> Option<TypeRef>;

    /// Whether two handles denote the same inference variable.
    fn equal_handles(&self, a: InferenceHandle, b: InferenceHandle) -> bool {
        a == b
    }
}

/// An owner that never resolves anything. Useful when the declared side has
/// no inference variables, or when they must all stay open.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unresolved;

impl ReferenceOwner for Unresolved {
    fn is_resolved(&self, _handle: InferenceHandle) -> bool {
        false
    }

    fn resolved_reference(&self, _handle: InferenceHandle) -> Option<TypeRef> {
        None
    }
}

impl UnboundRef {
    pub fn is_resolved(&self, owner: &dyn ReferenceOwner) -> bool {
        owner.is_resolved(self.handle)
    }

    /// Ask the owner for this variable's value.
    pub fn try_resolve(&self, owner: &dyn ReferenceOwner) -> Option<TypeRef> {
        owner.resolved_reference(self.handle)
    }
}

// =============================================================================
// InferenceTable
// =============================================================================

/// Union-find value: the resolution of an equivalence class.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct HandleValue(pub Option<TypeRef>);

/// Two different resolutions met while unifying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandleConflict {
    pub existing: TypeRef,
    pub incoming: TypeRef,
}

impl UnifyKey for InferenceHandle {
    type Value = HandleValue;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        InferenceHandle(u)
    }

    fn tag() -> &'static str {
        "InferenceHandle"
    }
}

impl UnifyValue for HandleValue {
    type Error = HandleConflict;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, Self::Error> {
        match (&a.0, &b.0) {
            (None, None) => Ok(HandleValue(None)),
            (Some(t), None) | (None, Some(t)) => Ok(HandleValue(Some(t.clone()))),
            (Some(x), Some(y)) if x == y => Ok(HandleValue(Some(x.clone()))),
            (Some(x), Some(y)) => Err(HandleConflict {
                existing: x.clone(),
                incoming: y.clone(),
            }),
        }
    }
}

/// Union-find backed [`ReferenceOwner`].
///
/// Queries take `&self` (the walker only reads), but union-find lookups
/// compress paths, so the table sits behind a `RefCell`.
#[derive(Default)]
pub struct InferenceTable {
    table: RefCell<InPlaceUnificationTable<InferenceHandle>>,
}

impl InferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an unresolved handle.
    pub fn new_handle(&self) -> InferenceHandle {
        self.table.borrow_mut().new_key(HandleValue(None))
    }

    /// Allocate an unresolved handle standing in for `param`.
    pub fn fresh_unbound(&self, param: TypeParamId) -> TypeRef {
        TypeRef::unbound(param, self.new_handle())
    }

    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `handle` was allocated by this table.
    pub fn contains(&self, handle: InferenceHandle) -> bool {
        (handle.index() as usize) < self.len()
    }

    /// Representative handle of `handle`'s equivalence class. A handle from
    /// another table is its own representative.
    pub fn root(&self, handle: InferenceHandle) -> InferenceHandle {
        if !self.contains(handle) {
            return handle;
        }
        self.table.borrow_mut().find(handle)
    }

    /// Resolved value of `handle`. Foreign handles are never resolved.
    pub fn probe(&self, handle: InferenceHandle) -> Option<TypeRef> {
        if !self.contains(handle) {
            trace!(handle = handle.index(), "probe of a handle this table does not own");
            return None;
        }
        self.table.borrow_mut().probe_value(handle).0
    }

    fn check_owned(&self, handle: InferenceHandle) -> Result<(), ModelError> {
        if self.contains(handle) {
            Ok(())
        } else {
            Err(ModelError::UnknownInferenceHandle(handle))
        }
    }

    /// Resolve `handle` (and everything unified with it) to `reference`.
    /// Resolving again to an equal reference is a no-op.
    pub fn resolve(&self, handle: InferenceHandle, reference: TypeRef) -> Result<(), ModelError> {
        trace!(handle = handle.index(), ?reference, "InferenceTable::resolve");
        self.check_owned(handle)?;
        self.table
            .borrow_mut()
            .unify_var_value(handle, HandleValue(Some(reference)))
            .map_err(|conflict| ModelError::ConflictingResolution {
                handle,
                existing: conflict.existing,
                incoming: conflict.incoming,
            })
    }

    /// Merge two handles into one inference variable.
    pub fn unify(&self, a: InferenceHandle, b: InferenceHandle) -> Result<(), ModelError> {
        trace!(a = a.index(), b = b.index(), "InferenceTable::unify");
        self.check_owned(a)?;
        self.check_owned(b)?;
        self.table
            .borrow_mut()
            .unify_var_var(a, b)
            .map_err(|conflict| ModelError::ConflictingResolution {
                handle: a,
                existing: conflict.existing,
                incoming: conflict.incoming,
            })
    }
}

impl ReferenceOwner for InferenceTable {
    fn is_resolved(&self, handle: InferenceHandle) -> bool {
        self.probe(handle).is_some()
    }

    fn resolved_reference(&self, handle: InferenceHandle) -> Option<TypeRef> {
        self.probe(handle)
    }

    fn equal_handles(&self, a: InferenceHandle, b: InferenceHandle) -> bool {
        a == b || self.root(a) == self.root(b)
    }
}

#[cfg(test)]
#[path = "tests/owner_tests.rs"]
mod tests;
