//! Flattening an instantiated declarator into a parameter mapping.
//!
//! For `ArrayList<Str>` the mapping is
//!
//! ```text
//! ArrayList.E  -> Str
//! List.E       -> ArrayList.E
//! Collection.E -> List.E
//! ```
//!
//! Own parameters are bound positionally to the reference's arguments.
//! Supertype parameters are bound to the arguments written in the `extends`
//! clause, unsubstituted, so that callers can follow parameter-to-parameter
//! links. Every entry is collected under `Invariant`; a parameter reached
//! twice (diamond inheritance) is merged.

use crate::bound::{MergedBoundTypeArgument, TypeParameterMapping};
use crate::lattice::TypeModel;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{DeclaratorId, TypeParamId, TypeRef};
use crate::variance::VarianceInfo;
use indexmap::map::Entry;
use tracing::trace;
use varpair_common::ensure_sufficient_stack;

pub struct DeclaratorTypeArgumentCollector<'a> {
    model: &'a dyn TypeModel,
    profile: RecursionProfile,
}

impl<'a> DeclaratorTypeArgumentCollector<'a> {
    pub fn new(model: &'a dyn TypeModel) -> Self {
        Self::with_profile(model, RecursionProfile::SupertypeCollection)
    }

    pub fn with_profile(model: &'a dyn TypeModel, profile: RecursionProfile) -> Self {
        Self { model, profile }
    }

    /// Mapping for `reference`. Anything but a declarator instantiation yields
    /// an empty mapping.
    pub fn type_parameter_mapping(&self, reference: &TypeRef) -> TypeParameterMapping {
        let mut mapping = TypeParameterMapping::default();
        let mut guard = RecursionGuard::with_profile(self.profile);
        self.collect(reference, &mut mapping, &mut guard);
        mapping
    }

    fn collect(
        &self,
        reference: &TypeRef,
        mapping: &mut TypeParameterMapping,
        guard: &mut RecursionGuard<DeclaratorId>,
    ) {
        let Some(declarator) = reference.declarator() else {
            return;
        };
        match guard.enter(declarator) {
            RecursionResult::Entered => {}
            denied => {
                trace!(?declarator, ?denied, "declarator already being collected");
                return;
            }
        }

        let params = self.model.type_parameters(declarator);
        for (param, argument) in params.iter().zip(reference.type_arguments()) {
            self.bind(mapping, *param, argument);
        }
        for supertype in self.model.declared_supertypes(declarator) {
            ensure_sufficient_stack(|| self.collect(&supertype, mapping, guard));
        }

        guard.leave(declarator);
    }

    fn bind(&self, mapping: &mut TypeParameterMapping, param: TypeParamId, argument: &TypeRef) {
        match mapping.entry(param) {
            Entry::Occupied(mut entry) => {
                entry
                    .get_mut()
                    .merge(argument, VarianceInfo::Invariant, self.model);
            }
            Entry::Vacant(entry) => {
                entry.insert(MergedBoundTypeArgument::new(
                    argument.clone(),
                    VarianceInfo::Invariant,
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/collector_tests.rs"]
mod tests;
