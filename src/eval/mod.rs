//! Move evaluation for the AI
//!
//! This module provides the priority scan used to pick candidate moves.
//! The scan considers:
//! - Capture opportunities and capture-win proximity
//! - Run completion and blocking
//! - Defence of endangered tokens

pub mod heuristic;
pub mod patterns;

pub use heuristic::{Heuristic, Scan, ScanSource};
pub use patterns::{capture_priority, run_priority, Priority};
