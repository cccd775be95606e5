//! Periodization engine
//!
//! Features:
//! - Per-set weight/rep/rest suggestions
//! - Initial 12-week program generation
//! - Weekly check-in decisions and plan versioning
//! - Exercise swaps requested from the coach chat
//!
//! Every component is a zero-field struct: snapshot in, snapshot out.

pub mod generator;
pub mod modifier;
pub mod suggestion;
pub mod weekly;

pub use generator::ProgramGenerator;
pub use modifier::{CoachAction, ProgramModifier, SwapOutcome};
pub use suggestion::{SetPerformance, SetRating, Suggestion, SuggestionEngine};
pub use weekly::{Action, WeeklyAnalyzer, WeeklyCheckIn, WeeklyDecision};
