//! Nominal subtyping over the declarator store.
//!
//! Subtyping follows declared supertypes with arguments substituted:
//! `ArrayList<Str>` is a subtype of `List<Str>` because `ArrayList<E>`
//! declares `List<E>`. Generic arguments are compared invariantly unless the
//! supertype's argument is a wildcard, in which case containment applies.
//! Arrays are covariant. A bare type parameter is a subtype of anything one
//! of its bounds is a subtype of.
//!
//! The common supertype of two unrelated references is the first supertype of
//! the left operand (in breadth-first order) that the right operand is a
//! subtype of.

use crate::bound::{MergedBoundTypeArgument, TypeParameterMapping};
use crate::declarator::DeclaratorStore;
use crate::lattice::{TypeLattice, TypeModel};
use crate::substitute::TypeParameterSubstitutor;
use crate::types::{TypeRef, TypeTarget};
use crate::variance::VarianceInfo;
use rustc_hash::FxHashSet;
use tracing::trace;

impl DeclaratorStore {
    /// Direct supertypes of `reference`, expressed in the reference's own
    /// arguments. Raw uses substitute `Any` for every parameter.
    pub fn direct_supertypes(&self, reference: &TypeRef) -> Vec<TypeRef> {
        let TypeRef::Parameterized(p) = reference else {
            return Vec::new();
        };
        match p.target {
            TypeTarget::Parameter(param) => self.bounds(param),
            TypeTarget::Declarator(declarator) => {
                let declared = self.declared_supertypes(declarator);
                if declared.is_empty() {
                    return declared;
                }
                let mapping: TypeParameterMapping = self
                    .type_parameters(declarator)
                    .into_iter()
                    .enumerate()
                    .map(|(index, param)| {
                        let argument = p.arguments.get(index).cloned().unwrap_or(TypeRef::Any);
                        (param, MergedBoundTypeArgument::new(argument, VarianceInfo::Invariant))
                    })
                    .collect();
                let substitutor =
                    TypeParameterSubstitutor::with_profile(&mapping, self.options().substitution_profile());
                declared
                    .iter()
                    .map(|supertype| substitutor.substitute(supertype))
                    .collect()
            }
        }
    }

    /// `reference` followed by all of its transitive supertypes, breadth
    /// first, without duplicates.
    pub fn supertype_closure(&self, reference: &TypeRef) -> Vec<TypeRef> {
        let mut seen: FxHashSet<TypeRef> = FxHashSet::default();
        let mut closure = vec![reference.clone()];
        seen.insert(reference.clone());

        let max_levels = self.options().max_hierarchy_depth;
        let mut level_start = 0;
        let mut level = 0;
        while level_start < closure.len() {
            if level >= max_levels {
                trace!(?reference, level, "supertype closure truncated at depth limit");
                break;
            }
            level += 1;
            let level_end = closure.len();
            for index in level_start..level_end {
                for supertype in self.direct_supertypes(&closure[index]) {
                    if seen.insert(supertype.clone()) {
                        closure.push(supertype);
                    }
                }
            }
            level_start = level_end;
        }
        closure
    }

    /// Whether `sup_arg`, as a generic argument, admits `sub_arg`.
    fn contains_argument(&self, sub_arg: &TypeRef, sup_arg: &TypeRef) -> bool {
        if sub_arg == sup_arg {
            return true;
        }
        match sup_arg {
            TypeRef::Any => true,
            TypeRef::Wildcard(w) => {
                let (sub_lower, sub_uppers): (Option<&TypeRef>, &[TypeRef]) = match sub_arg {
                    TypeRef::Wildcard(sw) => (sw.lower_bound(), sw.upper_bounds()),
                    other => (Some(other), std::slice::from_ref(other)),
                };
                let lower_ok = match w.lower_bound() {
                    Some(lower) => sub_lower.is_some_and(|sl| self.is_subtype(lower, sl)),
                    None => true,
                };
                let upper_ok = w.upper_bounds().iter().all(|upper| {
                    !sub_uppers.is_empty() && sub_uppers.iter().any(|su| self.is_subtype(su, upper))
                });
                lower_ok && upper_ok
            }
            _ => false,
        }
    }

    fn same_declarator_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool {
        match (sub, sup) {
            (TypeRef::Parameterized(a), TypeRef::Parameterized(b)) if a.target == b.target => {
                // A raw use on either side admits any instantiation.
                a.arguments.is_empty()
                    || b.arguments.is_empty()
                    || (a.arguments.len() == b.arguments.len()
                        && a
                            .arguments
                            .iter()
                            .zip(&b.arguments)
                            .all(|(x, y)| self.contains_argument(x, y)))
            }
            _ => sub == sup,
        }
    }
}

impl TypeLattice for DeclaratorStore {
    fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool {
        if sub == sup {
            return true;
        }
        match (sub, sup) {
            (TypeRef::Any, _) | (_, TypeRef::Any) => true,
            (TypeRef::Array(a), TypeRef::Array(b)) => self.is_subtype(a, b),
            (_, TypeRef::Wildcard(_)) => self.contains_argument(sub, sup),
            (TypeRef::Wildcard(w), _) => w.upper_bounds().iter().any(|upper| self.is_subtype(upper, sup)),
            (TypeRef::Parameterized(_), TypeRef::Parameterized(_)) => self
                .supertype_closure(sub)
                .iter()
                .any(|candidate| self.same_declarator_subtype(candidate, sup)),
            _ => false,
        }
    }

    fn common_supertype(&self, a: &TypeRef, b: &TypeRef) -> Option<TypeRef> {
        if self.is_subtype(a, b) {
            return Some(b.clone());
        }
        if self.is_subtype(b, a) {
            return Some(a.clone());
        }
        match (a, b) {
            (TypeRef::Array(x), TypeRef::Array(y)) => self.common_supertype(x, y).map(TypeRef::array),
            _ => self
                .supertype_closure(a)
                .into_iter()
                .skip(1)
                .find(|candidate| self.is_subtype(b, candidate)),
        }
    }

    fn common_subtype(&self, a: &TypeRef, b: &TypeRef) -> Option<TypeRef> {
        if self.is_subtype(a, b) {
            Some(a.clone())
        } else if self.is_subtype(b, a) {
            Some(b.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/hierarchy_tests.rs"]
mod tests;
