//! Common types and utilities for the varpair inference engine.
//!
//! This crate provides foundational types used by the solver:
//! - String interning (`Atom`, `Interner`) for declarator and parameter names
//! - Centralized limits for recursive algorithms
//! - Stack growth for deeply nested type references

// String interning for declarator / type parameter names
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;

// Stack safety for deep recursion
pub mod stack;
pub use stack::ensure_sufficient_stack;
