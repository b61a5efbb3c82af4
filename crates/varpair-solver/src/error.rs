//! Errors raised at the host-model and owner boundaries.
//!
//! The pair walk itself never fails; missing information is "no binding".
//! Only building references and resolving inference variables can be wrong.

use crate::types::{DeclaratorId, InferenceHandle, TypeParamId, TypeRef};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("declarator {name} expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        declarator: DeclaratorId,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown declarator {0:?}")]
    UnknownDeclarator(DeclaratorId),

    #[error("unknown type parameter {0:?}")]
    UnknownTypeParameter(TypeParamId),

    #[error("inference variable {0:?} was not allocated by this table")]
    UnknownInferenceHandle(InferenceHandle),

    #[error("inference variable {handle:?} is already resolved to {existing:?}, cannot resolve to {incoming:?}")]
    ConflictingResolution {
        handle: InferenceHandle,
        existing: TypeRef,
        incoming: TypeRef,
    },
}
