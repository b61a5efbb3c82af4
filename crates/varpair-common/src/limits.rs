//! Centralized limits and thresholds for the inference engine.
//!
//! The solver's recursion guards are configured from
//! `varpair_solver::recursion::RecursionProfile`; the values below are the
//! defaults those profiles (and `SolverOptions`) start from.

/// Maximum nesting depth of a single pair walk.
///
/// Each paired step (array component, wildcard bound, generic argument,
/// resolved inference variable) adds one level. Past this depth the walk
/// stops contributing bindings for the branch.
pub const MAX_PAIR_WALK_DEPTH: u32 = 100;

/// Maximum number of paired visits in one top-level walk.
pub const MAX_PAIR_WALK_ITERATIONS: u32 = 100_000;

/// Maximum nesting depth for recursive type-parameter substitution.
///
/// Substitution re-substitutes mapped values, so a mapping chain
/// `A -> B -> C -> ...` costs one level per link.
pub const MAX_SUBSTITUTION_DEPTH: u32 = 50;

/// Maximum depth when walking a declarator's supertype graph.
///
/// Used by type-argument collection and by the subtype lattice.
pub const MAX_HIERARCHY_DEPTH: u32 = 64;
