//! Type reference model.
//!
//! A [`TypeRef`] is a light-weight, owned tree describing a use of a type:
//! an instantiation of a generic declarator, a bare reference to a type
//! parameter, an array, a wildcard, an unresolved inference variable, or the
//! `Any` sentinel.
//!
//! Identities (`DeclaratorId`, `TypeParamId`, `InferenceHandle`) are opaque
//! indices allocated by the host model (see `DeclaratorStore` and
//! `InferenceTable`). The solver compares them, never allocates them.

use smallvec::SmallVec;

// =============================================================================
// Identities
// =============================================================================

/// Identity of a generic declarator (class, interface, or generic operation).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclaratorId(pub u32);

/// Identity of a declared type parameter.
///
/// Equality is identity: two parameters that happen to share a name are still
/// distinct when declared by different declarators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

/// Identity of an inference variable. Resolution state lives in the owner
/// context (`ReferenceOwner`), never in the handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InferenceHandle(pub u32);

impl InferenceHandle {
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Type parameter lists are short; keep them inline.
pub type TypeParamList = SmallVec<[TypeParamId; 4]>;

// =============================================================================
// TypeRef
// =============================================================================

/// What a [`ParameterizedRef`] points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTarget {
    /// A declarator, instantiated with the reference's arguments
    /// (zero arguments for a plain type).
    Declarator(DeclaratorId),
    /// A bare occurrence of a type parameter. Carries no arguments.
    Parameter(TypeParamId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterizedRef {
    pub target: TypeTarget,
    pub arguments: Vec<TypeRef>,
}

impl ParameterizedRef {
    /// The parameter if this is a bare type-parameter reference.
    pub fn type_parameter(&self) -> Option<TypeParamId> {
        match self.target {
            TypeTarget::Parameter(param) => Some(param),
            TypeTarget::Declarator(_) => None,
        }
    }

    pub fn declarator(&self) -> Option<DeclaratorId> {
        match self.target {
            TypeTarget::Declarator(decl) => Some(decl),
            TypeTarget::Parameter(_) => None,
        }
    }
}

/// `? extends U1 & U2` or `? super L`. Both empty means unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct WildcardRef {
    pub lower_bound: Option<Box<TypeRef>>,
    pub upper_bounds: Vec<TypeRef>,
}

impl WildcardRef {
    pub fn lower_bound(&self) -> Option<&TypeRef> {
        self.lower_bound.as_deref()
    }

    pub fn upper_bounds(&self) -> &[TypeRef] {
        &self.upper_bounds
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower_bound.is_none() && self.upper_bounds.is_empty()
    }
}

/// An inference variable standing in for a not-yet-known type.
///
/// `param` is the declared parameter the variable was created for; the
/// variable itself is identified by `handle`. Equality and hashing consider
/// the handle only.
#[derive(Copy, Clone, Debug)]
pub struct UnboundRef {
    pub param: TypeParamId,
    pub handle: InferenceHandle,
}

impl PartialEq for UnboundRef {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for UnboundRef {}

impl std::hash::Hash for UnboundRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

/// Kind discriminator of a [`TypeRef`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRefKind {
    Parameterized,
    Array,
    Wildcard,
    Unbound,
    Any,
}

/// A reference to a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Parameterized(ParameterizedRef),
    Array(Box<TypeRef>),
    Wildcard(WildcardRef),
    Unbound(UnboundRef),
    /// No structural information. Matches anything, constrains nothing.
    Any,
}

impl TypeRef {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// `Decl<args...>`. Arity is not checked here; use
    /// `DeclaratorStore::instantiate` for a checked constructor.
    pub fn declared(declarator: DeclaratorId, arguments: Vec<TypeRef>) -> Self {
        Self::Parameterized(ParameterizedRef {
            target: TypeTarget::Declarator(declarator),
            arguments,
        })
    }

    /// A plain (non-generic or raw) use of `declarator`.
    pub fn plain(declarator: DeclaratorId) -> Self {
        Self::declared(declarator, Vec::new())
    }

    /// A bare occurrence of `param`.
    pub fn param(param: TypeParamId) -> Self {
        Self::Parameterized(ParameterizedRef {
            target: TypeTarget::Parameter(param),
            arguments: Vec::new(),
        })
    }

    pub fn array(component: TypeRef) -> Self {
        Self::Array(Box::new(component))
    }

    /// `? extends upper_bounds...`
    pub fn extends(upper_bounds: Vec<TypeRef>) -> Self {
        Self::Wildcard(WildcardRef {
            lower_bound: None,
            upper_bounds,
        })
    }

    /// `? super lower_bound`
    pub fn super_of(lower_bound: TypeRef) -> Self {
        Self::Wildcard(WildcardRef {
            lower_bound: Some(Box::new(lower_bound)),
            upper_bounds: Vec::new(),
        })
    }

    /// `?`
    pub fn unbounded_wildcard() -> Self {
        Self::Wildcard(WildcardRef::default())
    }

    pub fn unbound(param: TypeParamId, handle: InferenceHandle) -> Self {
        Self::Unbound(UnboundRef { param, handle })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn kind(&self) -> TypeRefKind {
        match self {
            Self::Parameterized(_) => TypeRefKind::Parameterized,
            Self::Array(_) => TypeRefKind::Array,
            Self::Wildcard(_) => TypeRefKind::Wildcard,
            Self::Unbound(_) => TypeRefKind::Unbound,
            Self::Any => TypeRefKind::Any,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedRef> {
        match self {
            Self::Parameterized(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&WildcardRef> {
        match self {
            Self::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_unbound(&self) -> Option<&UnboundRef> {
        match self {
            Self::Unbound(u) => Some(u),
            _ => None,
        }
    }

    pub fn component_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Array(component) => Some(component),
            _ => None,
        }
    }

    /// The declarator of a `Parameterized` reference (not of a bare parameter).
    pub fn declarator(&self) -> Option<DeclaratorId> {
        self.as_parameterized().and_then(ParameterizedRef::declarator)
    }

    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            Self::Parameterized(p) => &p.arguments,
            _ => &[],
        }
    }

    /// The parameter if this is a bare `Parameterized` parameter reference.
    pub fn bare_parameter(&self) -> Option<TypeParamId> {
        self.as_parameterized()
            .and_then(ParameterizedRef::type_parameter)
    }

    /// The type parameter this reference stands for, if any: a bare parameter
    /// reference, or the parameter an inference variable was created for.
    pub fn referenced_parameter(&self) -> Option<TypeParamId> {
        match self {
            Self::Parameterized(p) => p.type_parameter(),
            Self::Unbound(u) => Some(u.param),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
