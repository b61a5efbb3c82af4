//! Recursion guards for cycle detection and depth limiting.
//!
//! Every recursive algorithm in the engine runs over data that may be
//! self-referential: a parameter mapped (directly or through a chain) to a
//! reference mentioning itself, a declarator hierarchy with a cycle, or an
//! inference variable resolved to a type containing the same variable.
//!
//! - [`RecursionGuard`] combines a visiting set (cycle detection) with depth
//!   and iteration limits.
//! - [`DepthCounter`] limits nesting only, for walks where the same key may be
//!   legitimately revisited.
//!
//! Limits come from named [`RecursionProfile`]s so call sites document intent
//! instead of repeating magic numbers.
//!
//! In debug builds, dropping a guard with active entries panics, catching a
//! forgotten `leave()`.

use rustc_hash::FxHashSet;
use std::hash::Hash;
use varpair_common::limits;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Pairing a declared reference with an actual reference.
    ///
    /// depth = 100, iterations = 100,000
    PairWalk,

    /// Resolved inference variables re-dispatched during a pair walk.
    ///
    /// depth = 100, iterations = 100,000
    HandleResolution,

    /// Recursive type-parameter substitution.
    ///
    /// depth = 50, iterations = 100,000
    Substitution,

    /// Supertype graph traversal (argument collection, subtype lattice).
    ///
    /// depth = 64, iterations = 100,000
    SupertypeCollection,

    /// Custom limits for configured or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::PairWalk | Self::HandleResolution => limits::MAX_PAIR_WALK_DEPTH,
            Self::Substitution => limits::MAX_SUBSTITUTION_DEPTH,
            Self::SupertypeCollection => limits::MAX_HIERARCHY_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::PairWalk
            | Self::HandleResolution
            | Self::Substitution
            | Self::SupertypeCollection => limits::MAX_PAIR_WALK_ITERATIONS,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks recursion state for cycle detection, depth limiting, and iteration
/// bounding.
///
/// ```ignore
/// let mut guard = RecursionGuard::with_profile(RecursionProfile::Substitution);
/// match guard.enter(param) {
///     RecursionResult::Entered => {
///         let result = substitute(mapped);
///         guard.leave(param);
///         result
///     }
///     _ => unchanged,
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }

        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a computation previously entered for `key`.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sticky: stays set after any limit was hit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set",
                self.visiting.len(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// DepthCounter
// ---------------------------------------------------------------------------

/// Depth and visit budget without cycle detection.
///
/// The pair walk legitimately revisits equal node pairs (sibling arguments,
/// repeated bounds), so it limits nesting and total work instead of tracking
/// keys.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    visits: u32,
    max_visits: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(max_depth: u32, max_visits: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            visits: 0,
            max_visits,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter a deeper level. On `false`, do **not** call `leave()`.
    #[inline]
    pub fn enter(&mut self) -> bool {
        self.visits = self.visits.saturating_add(1);
        if self.depth >= self.max_depth || self.visits > self.max_visits {
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave() called at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("DepthCounter dropped with depth {} > 0", self.depth);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
