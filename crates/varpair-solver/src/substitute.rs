//! Type-parameter substitution.
//!
//! Rewrites a reference by replacing every bare occurrence of a mapped
//! parameter with its bound argument. Replacement values are substituted in
//! turn, so `A -> B, B -> Str` rewrites `A` to `Str`. A parameter reached
//! again through its own replacement (`T -> Comparable<T>`) is left as is.
//!
//! Inference variables and unmapped parameters pass through unchanged.

use crate::bound::TypeParameterMapping;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{ParameterizedRef, TypeParamId, TypeRef, TypeTarget, WildcardRef};
use tracing::trace;
use varpair_common::ensure_sufficient_stack;

pub struct TypeParameterSubstitutor<'m> {
    mapping: &'m TypeParameterMapping,
    profile: RecursionProfile,
}

impl<'m> TypeParameterSubstitutor<'m> {
    pub fn new(mapping: &'m TypeParameterMapping) -> Self {
        Self::with_profile(mapping, RecursionProfile::Substitution)
    }

    pub fn with_profile(mapping: &'m TypeParameterMapping, profile: RecursionProfile) -> Self {
        Self { mapping, profile }
    }

    pub fn mapping(&self) -> &'m TypeParameterMapping {
        self.mapping
    }

    /// Substitute `reference`. Each call starts with a fresh cycle guard.
    pub fn substitute(&self, reference: &TypeRef) -> TypeRef {
        if self.mapping.is_empty() {
            return reference.clone();
        }
        let mut guard = RecursionGuard::with_profile(self.profile);
        self.substitute_in(reference, &mut guard)
    }

    fn substitute_in(&self, reference: &TypeRef, guard: &mut RecursionGuard<TypeParamId>) -> TypeRef {
        ensure_sufficient_stack(|| match reference {
            TypeRef::Parameterized(p) => match p.target {
                TypeTarget::Parameter(param) => self.substitute_parameter(param, reference, guard),
                TypeTarget::Declarator(_) => TypeRef::Parameterized(ParameterizedRef {
                    target: p.target,
                    arguments: p
                        .arguments
                        .iter()
                        .map(|arg| self.substitute_in(arg, guard))
                        .collect(),
                }),
            },
            TypeRef::Array(component) => TypeRef::array(self.substitute_in(component, guard)),
            TypeRef::Wildcard(w) => TypeRef::Wildcard(WildcardRef {
                lower_bound: w
                    .lower_bound()
                    .map(|lower| Box::new(self.substitute_in(lower, guard))),
                upper_bounds: w
                    .upper_bounds
                    .iter()
                    .map(|upper| self.substitute_in(upper, guard))
                    .collect(),
            }),
            TypeRef::Unbound(_) | TypeRef::Any => reference.clone(),
        })
    }

    fn substitute_parameter(
        &self,
        param: TypeParamId,
        reference: &TypeRef,
        guard: &mut RecursionGuard<TypeParamId>,
    ) -> TypeRef {
        let Some(bound) = self.mapping.get(&param) else {
            return reference.clone();
        };
        match guard.enter(param) {
            RecursionResult::Entered => {
                let substituted = self.substitute_in(bound.type_reference(), guard);
                guard.leave(param);
                substituted
            }
            denied => {
                trace!(?param, ?denied, "substitution stopped; keeping parameter");
                reference.clone()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/substitute_tests.rs"]
mod tests;
