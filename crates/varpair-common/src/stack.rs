//! Stack safety utilities for deep recursion.
//!
//! Pairing two deeply nested type references recurses once per nesting
//! level. Wrapping each step in [`ensure_sufficient_stack`] grows the stack
//! on demand instead of overflowing on pathological inputs.
//!
//! - **Red zone**: 100KB - if less than this remains, the stack grows
//! - **Growth size**: 1MB per growth

const RED_ZONE: usize = 100 * 1024;

const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(not(target_arch = "wasm32"))]
    {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
    }

    #[cfg(target_arch = "wasm32")]
    {
        f()
    }
}
