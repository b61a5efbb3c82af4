//! Declarator and type-parameter storage.
//!
//! `DeclaratorStore` is a small host type model: it allocates declarator and
//! type-parameter identities, remembers each declarator's own parameter list
//! and declared supertypes, and each parameter's upper bounds. It implements
//! [`TypeModel`] (and, in `hierarchy`, [`TypeLattice`](crate::TypeLattice))
//! so the engine can run without any external type system.
//!
//! ```ignore
//! let store = DeclaratorStore::new();
//! let list = store.interface("List", &["E"]);
//! let array_list = store.class("ArrayList", &["E"]);
//! let e = store.type_param(array_list, 0).expect("ArrayList.E");
//! store.add_supertype(array_list, TypeRef::declared(list, vec![TypeRef::param(e)]))?;
//! ```

use crate::config::SolverOptions;
use crate::error::ModelError;
use crate::lattice::TypeModel;
use crate::types::{DeclaratorId, TypeParamId, TypeParamList, TypeRef};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;
use varpair_common::{Atom, Interner};

// =============================================================================
// Stored data
// =============================================================================

/// Kind of generic declarator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Class,
    Interface,
    /// A generic operation (method or function). Has type parameters but no
    /// supertypes.
    Operation,
}

#[derive(Clone, Debug)]
pub struct DeclaratorInfo {
    pub kind: DeclKind,
    pub name: Atom,
    pub type_params: TypeParamList,
    /// Written in terms of `type_params`.
    pub supertypes: Vec<TypeRef>,
}

#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    pub name: Atom,
    pub declarator: DeclaratorId,
    pub index: u32,
    /// Upper bounds (`T extends B1 & B2`). May mention the parameter itself.
    pub bounds: Vec<TypeRef>,
}

// =============================================================================
// DeclaratorStore
// =============================================================================

pub struct DeclaratorStore {
    interner: Interner,
    declarators: DashMap<DeclaratorId, DeclaratorInfo, FxBuildHasher>,
    params: DashMap<TypeParamId, TypeParamInfo, FxBuildHasher>,
    next_declarator: AtomicU32,
    next_param: AtomicU32,
    options: SolverOptions,
}

impl Default for DeclaratorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclaratorStore {
    pub fn new() -> Self {
        Self::with_options(SolverOptions::default())
    }

    pub fn with_options(options: SolverOptions) -> Self {
        Self {
            interner: Interner::new(),
            declarators: DashMap::with_hasher(FxBuildHasher),
            params: DashMap::with_hasher(FxBuildHasher),
            next_declarator: AtomicU32::new(1),
            next_param: AtomicU32::new(1),
            options,
        }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a declarator together with its own type parameters.
    pub fn declare(&self, kind: DeclKind, name: &str, param_names: &[&str]) -> DeclaratorId {
        let id = DeclaratorId(self.next_declarator.fetch_add(1, Ordering::Relaxed));
        let type_params: TypeParamList = param_names
            .iter()
            .enumerate()
            .map(|(index, param_name)| {
                let param = TypeParamId(self.next_param.fetch_add(1, Ordering::Relaxed));
                self.params.insert(
                    param,
                    TypeParamInfo {
                        name: self.interner.intern(param_name),
                        declarator: id,
                        index: index as u32,
                        bounds: Vec::new(),
                    },
                );
                param
            })
            .collect();
        trace!(declarator = id.0, name, ?kind, params = type_params.len(), "DeclaratorStore::declare");
        self.declarators.insert(
            id,
            DeclaratorInfo {
                kind,
                name: self.interner.intern(name),
                type_params,
                supertypes: Vec::new(),
            },
        );
        id
    }

    pub fn class(&self, name: &str, param_names: &[&str]) -> DeclaratorId {
        self.declare(DeclKind::Class, name, param_names)
    }

    pub fn interface(&self, name: &str, param_names: &[&str]) -> DeclaratorId {
        self.declare(DeclKind::Interface, name, param_names)
    }

    pub fn operation(&self, name: &str, param_names: &[&str]) -> DeclaratorId {
        self.declare(DeclKind::Operation, name, param_names)
    }

    /// Add a declared supertype, written in terms of `declarator`'s own
    /// parameters.
    pub fn add_supertype(&self, declarator: DeclaratorId, supertype: TypeRef) -> Result<(), ModelError> {
        let mut entry = self
            .declarators
            .get_mut(&declarator)
            .ok_or(ModelError::UnknownDeclarator(declarator))?;
        entry.supertypes.push(supertype);
        Ok(())
    }

    /// Replace the upper bounds of `param`.
    pub fn set_bounds(&self, param: TypeParamId, bounds: Vec<TypeRef>) -> Result<(), ModelError> {
        let mut entry = self
            .params
            .get_mut(&param)
            .ok_or(ModelError::UnknownTypeParameter(param))?;
        entry.bounds = bounds;
        Ok(())
    }

    /// Checked `Decl<args...>`: the argument count must match the
    /// declarator's parameter count (zero arguments is allowed as a raw use).
    pub fn instantiate(&self, declarator: DeclaratorId, arguments: Vec<TypeRef>) -> Result<TypeRef, ModelError> {
        let info = self
            .declarators
            .get(&declarator)
            .ok_or(ModelError::UnknownDeclarator(declarator))?;
        let expected = info.type_params.len();
        if !arguments.is_empty() && arguments.len() != expected {
            return Err(ModelError::ArityMismatch {
                declarator,
                name: self.interner.resolve(info.name).to_string(),
                expected,
                found: arguments.len(),
            });
        }
        Ok(TypeRef::declared(declarator, arguments))
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    pub fn get(&self, declarator: DeclaratorId) -> Option<DeclaratorInfo> {
        self.declarators.get(&declarator).map(|r| r.clone())
    }

    pub fn param_info(&self, param: TypeParamId) -> Option<TypeParamInfo> {
        self.params.get(&param).map(|r| r.clone())
    }

    /// The `index`-th own type parameter of `declarator`.
    pub fn type_param(&self, declarator: DeclaratorId, index: usize) -> Option<TypeParamId> {
        self.declarators
            .get(&declarator)
            .and_then(|r| r.type_params.get(index).copied())
    }

    pub fn bounds(&self, param: TypeParamId) -> Vec<TypeRef> {
        self.params
            .get(&param)
            .map(|r| r.bounds.clone())
            .unwrap_or_default()
    }

    pub fn declarator_name(&self, declarator: DeclaratorId) -> Arc<str> {
        self.declarators
            .get(&declarator)
            .map(|r| self.interner.resolve(r.name))
            .unwrap_or_else(|| Arc::from("?"))
    }

    pub fn param_name(&self, param: TypeParamId) -> Arc<str> {
        self.params
            .get(&param)
            .map(|r| self.interner.resolve(r.name))
            .unwrap_or_else(|| Arc::from("?"))
    }

    pub fn len(&self) -> usize {
        self.declarators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarators.is_empty()
    }
}

impl TypeModel for DeclaratorStore {
    fn type_parameters(&self, declarator: DeclaratorId) -> TypeParamList {
        self.declarators
            .get(&declarator)
            .map(|r| r.type_params.clone())
            .unwrap_or_default()
    }

    fn declared_supertypes(&self, declarator: DeclaratorId) -> Vec<TypeRef> {
        self.declarators
            .get(&declarator)
            .map(|r| r.supertypes.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "tests/declarator_tests.rs"]
mod tests;
