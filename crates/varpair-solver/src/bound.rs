//! Bound type arguments and the rule for merging several of them.
//!
//! A walk reports every occurrence of a parameter separately as a
//! [`BoundTypeArgument`]. Consumers fold those occurrences into one
//! [`MergedBoundTypeArgument`] per parameter:
//!
//! | existing | incoming | result |
//! |----------|----------|--------|
//! | `Out A` | `Out B` | `Out lub(A, B)` |
//! | `In A` | `In B` | `In glb(A, B)` |
//! | `Invariant A` | `Invariant B` | `Invariant A`, inconsistent unless `A == B` |
//! | `Invariant A` | `Out B` | `Invariant A`, inconsistent unless `B <: A` |
//! | `Invariant A` | `In B` | `Invariant A`, inconsistent unless `A <: B` |
//! | `Out A` | `In B` | `Invariant A`, inconsistent unless `A <: B` |
//!
//! Inconsistency is sticky and never aborts: the entry keeps a representative
//! reference so partial results stay usable.

use crate::lattice::TypeLattice;
use crate::types::{TypeParamId, TypeRef};
use crate::variance::VarianceInfo;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

/// Parameter to merged argument, in discovery order.
pub type TypeParameterMapping = IndexMap<TypeParamId, MergedBoundTypeArgument, FxBuildHasher>;

/// One occurrence of a type parameter found by a pair walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundTypeArgument {
    /// The actual-side reference the parameter was paired with.
    pub reference: TypeRef,
    pub declared_variance: VarianceInfo,
    pub actual_variance: VarianceInfo,
    /// The declared node whose traversal produced this occurrence.
    pub origin: Option<TypeRef>,
}

impl BoundTypeArgument {
    pub fn new(
        reference: TypeRef,
        declared_variance: VarianceInfo,
        actual_variance: VarianceInfo,
        origin: Option<TypeRef>,
    ) -> Self {
        Self {
            reference,
            declared_variance,
            actual_variance,
            origin,
        }
    }

    /// Effective variance of the occurrence.
    pub fn variance(&self) -> VarianceInfo {
        self.declared_variance.combine(self.actual_variance)
    }
}

/// Accumulated binding for one parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedBoundTypeArgument {
    type_reference: TypeRef,
    variance: VarianceInfo,
    inconsistent: bool,
}

impl MergedBoundTypeArgument {
    pub fn new(type_reference: TypeRef, variance: VarianceInfo) -> Self {
        Self {
            type_reference,
            variance,
            inconsistent: false,
        }
    }

    pub fn type_reference(&self) -> &TypeRef {
        &self.type_reference
    }

    pub fn into_type_reference(self) -> TypeRef {
        self.type_reference
    }

    pub fn variance(&self) -> VarianceInfo {
        self.variance
    }

    /// Conflicting constraints were merged into this entry. Callers decide
    /// whether that is a type error or a degrade-to-unknown.
    pub fn is_inconsistent(&self) -> bool {
        self.inconsistent
    }

    /// Fold a list of occurrences. Returns `None` for an empty list.
    pub fn merge_all<'a, L>(
        occurrences: impl IntoIterator<Item = &'a BoundTypeArgument>,
        lattice: &L,
    ) -> Option<Self>
    where
        L: TypeLattice + ?Sized,
    {
        let mut iter = occurrences.into_iter();
        let first = iter.next()?;
        let mut merged = Self::new(first.reference.clone(), first.variance());
        for next in iter {
            merged.merge(&next.reference, next.variance(), lattice);
        }
        Some(merged)
    }

    /// Merge another occurrence into this entry.
    pub fn merge<L>(&mut self, reference: &TypeRef, variance: VarianceInfo, lattice: &L)
    where
        L: TypeLattice + ?Sized,
    {
        use VarianceInfo::{In, Invariant, Out};

        if self.type_reference == *reference {
            self.variance = self.variance.merge(variance);
            return;
        }

        let consistent = match (self.variance, variance) {
            (Out, Out) => match lattice.common_supertype(&self.type_reference, reference) {
                Some(lub) => {
                    self.type_reference = lub;
                    true
                }
                None => false,
            },
            (In, In) => match lattice.common_subtype(&self.type_reference, reference) {
                Some(glb) => {
                    self.type_reference = glb;
                    true
                }
                None => false,
            },
            (Invariant, Invariant) => false,
            (Invariant, Out) => lattice.is_subtype(reference, &self.type_reference),
            (Invariant, In) | (Out, In) => lattice.is_subtype(&self.type_reference, reference),
            (Out, Invariant) => {
                let lower = std::mem::replace(&mut self.type_reference, reference.clone());
                lattice.is_subtype(&lower, reference)
            }
            (In, Invariant) | (In, Out) => {
                let upper = std::mem::replace(&mut self.type_reference, reference.clone());
                lattice.is_subtype(reference, &upper)
            }
        };

        self.variance = self.variance.merge(variance);
        if !consistent {
            debug!(
                existing = ?self.type_reference,
                incoming = ?reference,
                ?variance,
                "conflicting bound arguments; marking binding inconsistent"
            );
            self.inconsistent = true;
        }
    }
}

#[cfg(test)]
#[path = "tests/bound_tests.rs"]
mod tests;
