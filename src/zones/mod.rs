//! Base zone detection pipeline
//!
//! Bars flow strictly upward through these stages:
//!
//! - **helpers**: per-bar range size (high - low)
//! - **scanner**: enumerate every leg-in / anchor / leg-out structure
//! - **tracker**: count post-anchor re-entries into the anchor's range
//! - **scorer**: pick the representative zone, score it, decide a verdict

pub mod helpers;
pub mod scanner;
pub mod scorer;
pub mod tracker;

pub use scanner::{AnchorStructure, StructureThresholds};
pub use scorer::{ScoreBase, SelectionPolicy};
