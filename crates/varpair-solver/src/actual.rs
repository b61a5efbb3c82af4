//! The stock pair walker: collects every occurrence of a set of parameters.
//!
//! ```ignore
//! let mut collector = ActualTypeArgumentCollector::new(&store, &table, [t]);
//! collector.populate(&declared, &actual);
//! let mapping = collector.type_parameter_mapping();
//! ```

use crate::bound::{BoundTypeArgument, MergedBoundTypeArgument, TypeParameterMapping};
use crate::config::SolverOptions;
use crate::lattice::TypeModel;
use crate::owner::ReferenceOwner;
use crate::recursion::RecursionProfile;
use crate::types::{TypeParamId, TypeParamList, TypeRef};
use crate::walker::{TypeReferencePairWalker, WalkState};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::trace;

/// Records a [`BoundTypeArgument`] per occurrence of each parameter of
/// interest, in discovery order.
pub struct ActualTypeArgumentCollector<'a> {
    model: &'a dyn TypeModel,
    owner: &'a dyn ReferenceOwner,
    state: WalkState,
    profile: RecursionProfile,
    /// Empty means every parameter.
    parameters: TypeParamList,
    occurrences: IndexMap<TypeParamId, Vec<BoundTypeArgument>, FxBuildHasher>,
}

impl<'a> ActualTypeArgumentCollector<'a> {
    pub fn new(
        model: &'a dyn TypeModel,
        owner: &'a dyn ReferenceOwner,
        parameters: impl IntoIterator<Item = TypeParamId>,
    ) -> Self {
        Self::with_profile(model, owner, parameters, RecursionProfile::PairWalk)
    }

    pub fn with_options(
        model: &'a dyn TypeModel,
        owner: &'a dyn ReferenceOwner,
        parameters: impl IntoIterator<Item = TypeParamId>,
        options: &SolverOptions,
    ) -> Self {
        Self::with_profile(model, owner, parameters, options.pair_walk_profile())
    }

    fn with_profile(
        model: &'a dyn TypeModel,
        owner: &'a dyn ReferenceOwner,
        parameters: impl IntoIterator<Item = TypeParamId>,
        profile: RecursionProfile,
    ) -> Self {
        Self {
            model,
            owner,
            state: WalkState::with_profile(profile),
            profile,
            parameters: parameters.into_iter().collect(),
            occurrences: IndexMap::default(),
        }
    }

    /// Walk one declared/actual pair. May be called repeatedly; occurrences
    /// accumulate.
    pub fn populate(&mut self, declared: &TypeRef, actual: &TypeRef) {
        self.process_paired_references(declared, actual);
    }

    pub fn occurrences(&self) -> &IndexMap<TypeParamId, Vec<BoundTypeArgument>, FxBuildHasher> {
        &self.occurrences
    }

    pub fn occurrences_of(&self, param: TypeParamId) -> &[BoundTypeArgument] {
        self.occurrences
            .get(&param)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Merge the occurrences of each parameter into one binding.
    pub fn type_parameter_mapping(&self) -> TypeParameterMapping {
        self.occurrences
            .iter()
            .filter_map(|(param, occurrences)| {
                MergedBoundTypeArgument::merge_all(occurrences, self.model).map(|merged| (*param, merged))
            })
            .collect()
    }

    pub fn into_occurrences(self) -> IndexMap<TypeParamId, Vec<BoundTypeArgument>, FxBuildHasher> {
        self.occurrences
    }

    fn is_of_interest(&self, param: TypeParamId) -> bool {
        self.parameters.is_empty() || self.parameters.contains(&param)
    }
}

impl TypeReferencePairWalker for ActualTypeArgumentCollector<'_> {
    fn model(&self) -> &dyn TypeModel {
        self.model
    }

    fn owner(&self) -> &dyn ReferenceOwner {
        self.owner
    }

    fn walk_state(&self) -> &WalkState {
        &self.state
    }

    fn walk_state_mut(&mut self) -> &mut WalkState {
        &mut self.state
    }

    fn process_type_parameter(&mut self, param: TypeParamId, reference: &TypeRef) {
        // Inference variables reach here without passing `should_process`.
        if !self.is_of_interest(param) {
            return;
        }
        let occurrence = BoundTypeArgument::new(
            reference.clone(),
            self.state.expected_variance(),
            self.state.actual_variance(),
            self.state.origin().cloned(),
        );
        trace!(
            ?param,
            reference = ?occurrence.reference,
            variance = ?occurrence.variance(),
            "recording occurrence"
        );
        self.occurrences.entry(param).or_default().push(occurrence);
    }

    fn should_process(&self, param: TypeParamId) -> bool {
        self.is_of_interest(param)
    }

    fn recursion_profile(&self) -> RecursionProfile {
        self.profile
    }
}

#[cfg(test)]
#[path = "tests/actual_tests.rs"]
mod tests;
