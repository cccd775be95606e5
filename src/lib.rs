//! adaptlift - Adaptive strength-training periodization engine
//!
//! Generates a 12-week plan, suggests the next set, and moves the plan
//! forward one version per weekly check-in.

pub mod db;
pub mod engine;
pub mod error;
pub mod exercises;
pub mod profile;
pub mod program;
pub mod tips;

pub use db::Database;
pub use error::EngineError;
