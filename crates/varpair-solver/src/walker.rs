//! Pairing a declared reference with an actual reference.
//!
//! The walker descends two type-reference trees in parallel, dispatching on
//! the kind of the declared node and then on the kind of the actual node.
//! Whenever an open type parameter on the declared side meets something on
//! the actual side, it reports the pair through
//! [`TypeReferencePairWalker::process_type_parameter`] together with the
//! current variance context (see [`WalkState`]).
//!
//! Variance at each step comes from a fixed table:
//!
//! | declared | actual | recurse with (expected, actual) |
//! |----------|--------|---------------------------------|
//! | `T[]` | `U[]` | `T` vs `U`, unchanged |
//! | `? super L` | `? super M` | `L` vs `M`, `(In, In)` |
//! | `? super L` | `? extends U` | `L` vs each `U`, `(In, Out)` |
//! | `? extends U` | `? extends V` | each `U` vs each `V`, `(Out, Out)` |
//! | `? extends U` | `? super M` | each `U` vs `M`, `(Out, In)` |
//! | `? super L` | `A` | `L` vs `A`, `(In, Invariant)` |
//! | `? extends U` | `A` | each `U` vs `A`, `(Out, Invariant)` |
//! | `D` / `T` / `'h` | `? super M` | vs `M`, `(expected, In)` |
//! | `D` / `T` / `'h` | `? extends V` | vs each `V`, `(expected, Out)` |
//! | `D<..>` | `E<..>` | aligned arguments, `(Invariant, Invariant)` |
//!
//! `Any` on either side contributes nothing.
//!
//! Implementors provide the model, the owner, the walk state, and the
//! binding hook. Every traversal step is a provided method and may be
//! overridden to customize one declared kind without touching the others.

use crate::bound::TypeParameterMapping;
use crate::collector::DeclaratorTypeArgumentCollector;
use crate::lattice::TypeModel;
use crate::owner::ReferenceOwner;
use crate::recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
use crate::substitute::TypeParameterSubstitutor;
use crate::types::{
    InferenceHandle, ParameterizedRef, TypeParamId, TypeParamList, TypeRef, TypeTarget, UnboundRef,
    WildcardRef,
};
use crate::variance::VarianceInfo;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use varpair_common::ensure_sufficient_stack;

// =============================================================================
// WalkState
// =============================================================================

/// Variance pair and origin of the step being visited.
#[derive(Clone, Debug)]
struct WalkContext {
    expected_variance: VarianceInfo,
    actual_variance: VarianceInfo,
    origin: Option<TypeRef>,
}

/// Per-call state of a pair walk.
///
/// Holds the current `(expected variance, actual variance, origin)` context,
/// a guard over inference variables being re-dispatched through their
/// resolution, and a depth budget. A fresh state is swapped in for every
/// top-level [`process_paired_references`] call.
///
/// [`process_paired_references`]: TypeReferencePairWalker::process_paired_references
pub struct WalkState {
    context: WalkContext,
    profile: RecursionProfile,
    handles: RecursionGuard<InferenceHandle>,
    depth: DepthCounter,
}

impl Default for WalkState {
    fn default() -> Self {
        Self::new()
    }
}

impl WalkState {
    pub fn new() -> Self {
        Self::with_profile(RecursionProfile::PairWalk)
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self {
            context: WalkContext {
                expected_variance: VarianceInfo::Out,
                actual_variance: VarianceInfo::Out,
                origin: None,
            },
            profile,
            handles: RecursionGuard::with_profile(match profile {
                RecursionProfile::PairWalk => RecursionProfile::HandleResolution,
                custom => custom,
            }),
            depth: DepthCounter::with_profile(profile),
        }
    }

    /// Variance of the position on the declared side.
    pub fn expected_variance(&self) -> VarianceInfo {
        self.context.expected_variance
    }

    /// Variance of the position on the actual side.
    pub fn actual_variance(&self) -> VarianceInfo {
        self.context.actual_variance
    }

    /// The declared node whose traversal produced the current step.
    pub fn origin(&self) -> Option<&TypeRef> {
        self.context.origin.as_ref()
    }

    pub fn profile(&self) -> RecursionProfile {
        self.profile
    }

    pub fn depth(&self) -> u32 {
        self.depth.depth()
    }

    /// Whether the walk was cut short by a depth or visit limit.
    pub fn is_exceeded(&self) -> bool {
        self.depth.is_exceeded() || self.handles.is_exceeded()
    }

    fn replace_context(&mut self, context: WalkContext) -> WalkContext {
        std::mem::replace(&mut self.context, context)
    }
}

// =============================================================================
// TypeReferencePairWalker
// =============================================================================

pub trait TypeReferencePairWalker {
    /// Declarator structure and order primitives.
    fn model(&self) -> &dyn TypeModel;

    /// Resolution authority for inference variables.
    fn owner(&self) -> &dyn ReferenceOwner;

    fn walk_state(&self) -> &WalkState;

    fn walk_state_mut(&mut self) -> &mut WalkState;

    /// Called once per discovered occurrence of an open parameter. Variance
    /// and origin are available through [`walk_state`](Self::walk_state).
    fn process_type_parameter(&mut self, param: TypeParamId, reference: &TypeRef);

    /// Filter for parameters met as bare references.
    fn should_process(&self, _param: TypeParamId) -> bool {
        true
    }

    /// Filter consulted while aligning two parameterizations, when the
    /// declared-side argument is itself a type parameter.
    fn should_process_in_context_of(
        &self,
        _declared_param: TypeParamId,
        _bound_params: &[TypeParamId],
        _visited: &FxHashSet<TypeParamId>,
    ) -> bool {
        true
    }

    /// Limits for each top-level call.
    fn recursion_profile(&self) -> RecursionProfile {
        RecursionProfile::PairWalk
    }

    // -------------------------------------------------------------------------
    // Entry points
    // -------------------------------------------------------------------------

    /// Pair `declared` with `actual` under `(Out, Out)`, with `declared` as
    /// the origin.
    fn process_paired_references(&mut self, declared: &TypeRef, actual: &TypeRef) {
        trace!(?declared, ?actual, "process_paired_references");
        let fresh = WalkState::with_profile(self.recursion_profile());
        let previous = std::mem::replace(self.walk_state_mut(), fresh);

        self.outer_visit_with(declared, actual, declared, VarianceInfo::Out, VarianceInfo::Out);

        let finished = std::mem::replace(self.walk_state_mut(), previous);
        if finished.is_exceeded() {
            debug!(?declared, ?actual, "pair walk stopped at recursion limit");
        }
    }

    /// Visit a pair under a new variance context, restoring the previous one
    /// afterwards.
    fn outer_visit_with(
        &mut self,
        declared: &TypeRef,
        actual: &TypeRef,
        origin: &TypeRef,
        expected_variance: VarianceInfo,
        actual_variance: VarianceInfo,
    ) {
        let saved = self.walk_state_mut().replace_context(WalkContext {
            expected_variance,
            actual_variance,
            origin: Some(origin.clone()),
        });
        self.outer_visit(declared, actual);
        self.walk_state_mut().replace_context(saved);
    }

    /// Visit a pair under the current variance context.
    fn outer_visit(&mut self, declared: &TypeRef, actual: &TypeRef) {
        if declared.is_any() || actual.is_any() {
            return;
        }
        if !self.walk_state_mut().depth.enter() {
            trace!(?declared, ?actual, "pair walk depth limit reached");
            return;
        }
        ensure_sufficient_stack(|| match declared {
            TypeRef::Parameterized(p) => self.traverse_parameterized(declared, p, actual),
            TypeRef::Array(component) => self.traverse_array(declared, component, actual),
            TypeRef::Wildcard(w) => self.traverse_wildcard(declared, w, actual),
            TypeRef::Unbound(u) => self.traverse_unbound(declared, u, actual),
            TypeRef::Any => {}
        });
        self.walk_state_mut().depth.leave();
    }

    /// Recurse `declared` against the bounds of a wildcard actual, keeping
    /// the expected variance.
    fn visit_actual_wildcard_bounds(&mut self, declared: &TypeRef, actual: &WildcardRef) {
        let expected = self.walk_state().expected_variance();
        if let Some(lower) = actual.lower_bound() {
            self.outer_visit_with(declared, lower, declared, expected, VarianceInfo::In);
        } else {
            for upper in actual.upper_bounds() {
                self.outer_visit_with(declared, upper, declared, expected, VarianceInfo::Out);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Traversers, one per declared kind
    // -------------------------------------------------------------------------

    fn traverse_parameterized(&mut self, declared: &TypeRef, parameterized: &ParameterizedRef, actual: &TypeRef) {
        if let TypeRef::Wildcard(w) = actual {
            self.visit_actual_wildcard_bounds(declared, w);
            return;
        }
        match parameterized.target {
            TypeTarget::Parameter(param) => {
                if self.should_process(param) {
                    trace!(?param, ?actual, "binding bare parameter");
                    self.process_type_parameter(param, actual);
                }
            }
            TypeTarget::Declarator(declarator) => {
                if matches!(actual, TypeRef::Parameterized(_)) && self.model().has_type_parameters(declarator) {
                    self.visit_matching_type_parameters(actual, declared);
                }
            }
        }
    }

    fn traverse_array(&mut self, declared: &TypeRef, component: &TypeRef, actual: &TypeRef) {
        match actual {
            TypeRef::Array(actual_component) => self.outer_visit(component, actual_component),
            TypeRef::Parameterized(p) => {
                if let Some(param) = p.type_parameter() {
                    if self.should_process(param) {
                        trace!(?param, ?declared, "binding actual parameter to declared array");
                        self.process_type_parameter(param, declared);
                    }
                }
            }
            TypeRef::Unbound(u) => match u.try_resolve(self.owner()) {
                Some(resolved) => self.visit_resolved(u.handle, declared, declared, &resolved),
                None => {
                    if self.should_process(u.param) {
                        trace!(param = ?u.param, ?declared, "binding inference variable to declared array");
                        self.process_type_parameter(u.param, declared);
                    }
                }
            },
            TypeRef::Wildcard(_) | TypeRef::Any => {}
        }
    }

    fn traverse_wildcard(&mut self, declared: &TypeRef, wildcard: &WildcardRef, actual: &TypeRef) {
        use VarianceInfo::{In, Invariant, Out};

        match actual {
            TypeRef::Wildcard(actual_wildcard) => {
                if let Some(declared_lower) = wildcard.lower_bound() {
                    if let Some(actual_lower) = actual_wildcard.lower_bound() {
                        self.outer_visit_with(declared_lower, actual_lower, declared, In, In);
                    } else {
                        for actual_upper in actual_wildcard.upper_bounds() {
                            self.outer_visit_with(declared_lower, actual_upper, declared, In, Out);
                        }
                    }
                } else {
                    for declared_upper in wildcard.upper_bounds() {
                        for actual_upper in actual_wildcard.upper_bounds() {
                            self.outer_visit_with(declared_upper, actual_upper, declared, Out, Out);
                        }
                        if let Some(actual_lower) = actual_wildcard.lower_bound() {
                            self.outer_visit_with(declared_upper, actual_lower, declared, Out, In);
                        }
                    }
                }
            }
            TypeRef::Parameterized(_) | TypeRef::Array(_) | TypeRef::Unbound(_) => {
                if let Some(declared_lower) = wildcard.lower_bound() {
                    self.outer_visit_with(declared_lower, actual, declared, In, Invariant);
                } else {
                    for declared_upper in wildcard.upper_bounds() {
                        self.outer_visit_with(declared_upper, actual, declared, Out, Invariant);
                    }
                }
            }
            TypeRef::Any => {}
        }
    }

    fn traverse_unbound(&mut self, declared: &TypeRef, unbound: &UnboundRef, actual: &TypeRef) {
        match actual {
            TypeRef::Unbound(other) if self.owner().equal_handles(unbound.handle, other.handle) => {}
            TypeRef::Wildcard(w) => self.visit_actual_wildcard_bounds(declared, w),
            _ => match unbound.try_resolve(self.owner()) {
                Some(resolved) => self.visit_resolved(unbound.handle, declared, &resolved, actual),
                None => {
                    trace!(param = ?unbound.param, handle = unbound.handle.index(), ?actual, "binding inference variable");
                    self.process_type_parameter(unbound.param, actual);
                }
            },
        }
    }

    /// Re-dispatch with an inference variable's resolved value in place of
    /// the variable. `origin` is the node that held the variable. A handle
    /// reached again through its own resolution stops that branch.
    fn visit_resolved(&mut self, handle: InferenceHandle, origin: &TypeRef, declared: &TypeRef, actual: &TypeRef) {
        let (expected, actual_variance) = {
            let state = self.walk_state();
            (state.expected_variance(), state.actual_variance())
        };
        match self.walk_state_mut().handles.enter(handle) {
            RecursionResult::Entered => {
                self.outer_visit_with(declared, actual, origin, expected, actual_variance);
                self.walk_state_mut().handles.leave(handle);
            }
            denied => {
                trace!(handle = handle.index(), ?denied, "resolved inference variable not re-entered");
            }
        }
    }

    // -------------------------------------------------------------------------
    // Alignment of two parameterizations
    // -------------------------------------------------------------------------

    /// Pair each type argument of `actual` with the declared-side argument
    /// bound to the same parameter, following parameter-to-parameter links
    /// through the actual mapping when the declared side has no direct entry.
    fn visit_matching_type_parameters(&mut self, actual: &TypeRef, declared: &TypeRef) {
        let (actual_mapping, declared_mapping) = {
            let collector = DeclaratorTypeArgumentCollector::new(self.model());
            (
                collector.type_parameter_mapping(actual),
                collector.type_parameter_mapping(declared),
            )
        };
        let actual_substitutor = TypeParameterSubstitutor::new(&actual_mapping);
        let declared_substitutor = TypeParameterSubstitutor::new(&declared_mapping);
        let bound_params: TypeParamList = actual_mapping.keys().copied().collect();
        let mut visited: FxHashSet<TypeParamId> = FxHashSet::default();

        for &start in &bound_params {
            if !visited.insert(start) {
                continue;
            }
            let mut current = start;
            let declared_bound = loop {
                if let Some(bound) = declared_mapping.get(&current) {
                    break Some(bound);
                }
                match self.find_mapped_parameter(current, &actual_mapping, &mut visited) {
                    Some(next) => {
                        trace!(from = ?current, to = ?next, "following mapped parameter");
                        current = next;
                    }
                    None => break None,
                }
            };
            let Some(declared_bound) = declared_bound else {
                trace!(param = ?start, "no declared counterpart; occurrence dropped");
                continue;
            };

            let mut declared_ref = declared_bound.type_reference().clone();
            if let Some(declared_param) = declared_ref.referenced_parameter() {
                if !self.should_process_in_context_of(declared_param, &bound_params, &visited) {
                    continue;
                }
                declared_ref = declared_substitutor.substitute(&declared_ref);
            }
            let Some(actual_bound) = actual_mapping.get(&current) else {
                continue;
            };
            let actual_ref = actual_substitutor.substitute(actual_bound.type_reference());
            self.outer_visit_with(
                &declared_ref,
                &actual_ref,
                declared,
                VarianceInfo::Invariant,
                VarianceInfo::Invariant,
            );
        }
    }

    /// The key of `mapping` whose bound argument references `param`, if that
    /// key was not visited yet. A revisited key ends the chase.
    fn find_mapped_parameter(
        &self,
        param: TypeParamId,
        mapping: &TypeParameterMapping,
        visited: &mut FxHashSet<TypeParamId>,
    ) -> Option<TypeParamId> {
        let (key, _) = mapping
            .iter()
            .find(|(_, bound)| bound.type_reference().referenced_parameter() == Some(param))?;
        if visited.insert(*key) {
            Some(*key)
        } else {
            trace!(?param, key = ?key, "mapped parameter already visited");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/walker_tests.rs"]
mod tests;
