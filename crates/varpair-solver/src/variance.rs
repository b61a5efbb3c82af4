//! Variance of a type-parameter occurrence.
//!
//! | Variance | Meaning for `T` bound to `A` |
//! |----------|------------------------------|
//! | `Out` | `T` may be any supertype of `A` (covariant position) |
//! | `In` | `T` may be any subtype of `A` (contravariant position) |
//! | `Invariant` | `T` must be exactly `A` |

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarianceInfo {
    Out,
    In,
    Invariant,
}

impl VarianceInfo {
    /// Flip the sign of the position. `Invariant` stays invariant.
    pub const fn invert(self) -> Self {
        match self {
            Self::Out => Self::In,
            Self::In => Self::Out,
            Self::Invariant => Self::Invariant,
        }
    }

    /// Effective variance of a binding found with `self` on the declared side
    /// and `actual` on the actual side.
    ///
    /// An invariant side carries no direction of its own, so the other side
    /// decides. Opposite directions collapse to `Invariant`.
    pub const fn combine(self, actual: Self) -> Self {
        match (self, actual) {
            (Self::Invariant, other) | (other, Self::Invariant) => other,
            (Self::Out, Self::Out) => Self::Out,
            (Self::In, Self::In) => Self::In,
            (Self::Out, Self::In) | (Self::In, Self::Out) => Self::Invariant,
        }
    }

    /// Variance after merging two occurrences of the same parameter.
    /// Agreement keeps the direction; anything else is invariant.
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Out, Self::Out) => Self::Out,
            (Self::In, Self::In) => Self::In,
            _ => Self::Invariant,
        }
    }

    pub const fn is_invariant(self) -> bool {
        matches!(self, Self::Invariant)
    }
}
