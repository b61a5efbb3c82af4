//! Host-model seams.
//!
//! The engine never inspects classes or members itself. Everything it needs
//! from the host type system goes through two traits:
//!
//! - [`TypeLattice`]: subtype test and common super/subtype computation, used
//!   when merging several occurrences of the same parameter.
//! - [`TypeModel`]: the structure of generic declarators (their own type
//!   parameters and declared supertypes), used when aligning two
//!   parameterizations.
//!
//! `DeclaratorStore` is the in-crate implementation; hosts with their own
//! type model implement these traits directly.

use crate::types::{DeclaratorId, TypeParamList, TypeRef};

/// Order primitives over type references.
///
/// Implementations must be commutative in their two arguments and must return
/// a common supertype (resp. subtype) of both inputs.
pub trait TypeLattice {
    /// Whether `sub` may be used where `sup` is expected.
    fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool;

    /// Least common supertype, or `None` when the model knows of none.
    fn common_supertype(&self, a: &TypeRef, b: &TypeRef) -> Option<TypeRef>;

    /// Greatest common subtype, or `None` when the model knows of none.
    fn common_subtype(&self, a: &TypeRef, b: &TypeRef) -> Option<TypeRef>;
}

/// Declarator structure needed to align parameterizations.
pub trait TypeModel: TypeLattice {
    /// The declarator's own type parameters in declaration order.
    fn type_parameters(&self, declarator: DeclaratorId) -> TypeParamList;

    /// Declared supertypes of `declarator`, written in terms of its own type
    /// parameters (e.g. `ArrayList<E>` declares `List<E>`).
    fn declared_supertypes(&self, declarator: DeclaratorId) -> Vec<TypeRef>;

    fn has_type_parameters(&self, declarator: DeclaratorId) -> bool {
        !self.type_parameters(declarator).is_empty()
    }
}
