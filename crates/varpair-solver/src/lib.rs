//! Variance-Aware Type-Argument Inference
//!
//! This crate pairs a *declared* type reference (containing open type
//! parameters) with an *actual* reference and discovers, for every open
//! parameter, the bindings consistent with the positions it occurs in. It uses:
//!
//! - **Double dispatch** over a closed set of reference kinds (`TypeRef`)
//! - **Variance tracking** (`VarianceInfo`) saved and restored per step
//! - **Ena**: union-find ownership of inference-variable resolution
//! - **Recursion guards** for self-referential bounds and hierarchies
//!
//! Key pieces:
//! - `TypeReferencePairWalker`: the pairing algorithm, with overridable hooks
//! - `ActualTypeArgumentCollector`: stock walker producing merged bindings
//! - `DeclaratorStore`: in-crate host model with nominal subtyping
mod actual;
mod bound;
mod collector;
pub mod config;
mod declarator;
mod error;
mod format;
mod hierarchy;
pub mod lattice;
mod owner;
pub mod recursion;
mod substitute;
pub mod types;
pub mod variance;
mod walker;

pub use actual::ActualTypeArgumentCollector;
pub use bound::{BoundTypeArgument, MergedBoundTypeArgument, TypeParameterMapping};
pub use collector::DeclaratorTypeArgumentCollector;
pub use config::SolverOptions;
pub use declarator::{DeclKind, DeclaratorInfo, DeclaratorStore, TypeParamInfo};
pub use error::ModelError;
pub use format::TypeFormatter;
pub use lattice::{TypeLattice, TypeModel};
pub use owner::{HandleConflict, HandleValue, InferenceTable, ReferenceOwner, Unresolved};
pub use recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
pub use substitute::TypeParameterSubstitutor;
pub use types::{
    DeclaratorId, InferenceHandle, ParameterizedRef, TypeParamId, TypeParamList, TypeRef,
    TypeRefKind, TypeTarget, UnboundRef, WildcardRef,
};
pub use variance::VarianceInfo;
pub use walker::{TypeReferencePairWalker, WalkState};

// Test modules: loaded by their source files via #[path = "tests/..."] declarations.
