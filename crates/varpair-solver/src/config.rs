//! Solver configuration.

use crate::recursion::RecursionProfile;
use serde::{Deserialize, Serialize};
use varpair_common::limits;

/// Numeric limits for the engine's recursive algorithms.
///
/// All fields are optional when deserializing; missing fields take the
/// defaults from `varpair_common::limits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverOptions {
    pub max_walk_depth: u32,
    pub max_walk_iterations: u32,
    pub max_substitution_depth: u32,
    pub max_hierarchy_depth: u32,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_walk_depth: limits::MAX_PAIR_WALK_DEPTH,
            max_walk_iterations: limits::MAX_PAIR_WALK_ITERATIONS,
            max_substitution_depth: limits::MAX_SUBSTITUTION_DEPTH,
            max_hierarchy_depth: limits::MAX_HIERARCHY_DEPTH,
        }
    }
}

impl SolverOptions {
    pub const fn pair_walk_profile(&self) -> RecursionProfile {
        RecursionProfile::Custom {
            max_depth: self.max_walk_depth,
            max_iterations: self.max_walk_iterations,
        }
    }

    pub const fn substitution_profile(&self) -> RecursionProfile {
        RecursionProfile::Custom {
            max_depth: self.max_substitution_depth,
            max_iterations: self.max_walk_iterations,
        }
    }

    pub const fn hierarchy_profile(&self) -> RecursionProfile {
        RecursionProfile::Custom {
            max_depth: self.max_hierarchy_depth,
            max_iterations: self.max_walk_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_profiles() {
        let options = SolverOptions::default();
        assert_eq!(
            options.pair_walk_profile().max_depth(),
            RecursionProfile::PairWalk.max_depth()
        );
        assert_eq!(
            options.substitution_profile().max_depth(),
            RecursionProfile::Substitution.max_depth()
        );
        assert_eq!(
            options.hierarchy_profile().max_depth(),
            RecursionProfile::SupertypeCollection.max_depth()
        );
    }

    #[test]
    fn deserialize_partial_json_fills_defaults() {
        let options: SolverOptions =
            serde_json::from_str(r#"{ "maxWalkDepth": 8 }"#).expect("valid options");
        assert_eq!(options.max_walk_depth, 8);
        assert_eq!(
            options.max_substitution_depth,
            SolverOptions::default().max_substitution_depth
        );
        assert_eq!(options.pair_walk_profile().max_depth(), 8);
    }

    #[test]
    fn serialize_uses_camel_case() {
        let json = serde_json::to_value(SolverOptions::default()).expect("serializable");
        assert!(json.get("maxHierarchyDepth").is_some());
        assert!(json.get("max_hierarchy_depth").is_none());
    }
}
