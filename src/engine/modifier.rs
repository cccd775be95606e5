//! Out-of-band exercise substitution requested from the chat coach

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::exercises::{find_exercise_by_name, name_matches};
use crate::program::ProgramData;

/// Weight carried over to a substituted exercise is scaled down by this factor
const SWAP_WEIGHT_FACTOR: f64 = 0.8;

/// Structured action emitted by the chat layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CoachAction {
    SwapExercise { target: String, replacement: String },
}

/// Decode a chat-layer action payload
pub fn parse_coach_action(json: &str) -> Result<CoachAction> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let action = value
        .get("action")
        .and_then(|a| a.as_str())
        .unwrap_or_default()
        .to_string();
    serde_json::from_value(value).map_err(|_| EngineError::UnsupportedAction(action))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapOutcome {
    pub program_data: ProgramData,
    pub swap_count: usize,
    pub success: bool,
    pub message: String,
}

/// Stateless plan modifier
pub struct ProgramModifier;

impl ProgramModifier {
    /// Replace every exercise whose name contains `target` with `replacement`
    ///
    /// Misses are reported through `success = false`; the tree comes back
    /// unchanged in that case.
    pub fn swap_exercise(program: &ProgramData, target: &str, replacement: &str) -> SwapOutcome {
        let Some(substitute) = find_exercise_by_name(replacement) else {
            warn!(replacement, "Replacement not in catalogue");
            return SwapOutcome {
                program_data: program.clone(),
                swap_count: 0,
                success: false,
                message: format!("Couldn't find \"{}\" in the exercise library.", replacement),
            };
        };

        let mut patched = program.clone();
        let mut swap_count = 0;
        for entry in patched.exercises_mut() {
            // Already swapped: repeating the request must not rescale the load again
            if !name_matches(&entry.exercise_name, target)
                || entry.exercise_name.eq_ignore_ascii_case(substitute.name)
            {
                continue;
            }
            entry.exercise_name = substitute.name.to_string();
            entry.notes = Some(substitute.cue.to_string());
            entry.suggested_weight = entry.suggested_weight.map(scale_weight);
            swap_count += 1;
        }

        if swap_count == 0 {
            warn!(swap_target = target, "Swap target not found in active plan");
            return SwapOutcome {
                program_data: program.clone(),
                swap_count: 0,
                success: false,
                message: format!("Couldn't find \"{}\" in your current program.", target),
            };
        }

        info!(swap_target = target, replacement = substitute.name, swap_count, "Swapped exercise");
        SwapOutcome {
            program_data: patched,
            swap_count,
            success: true,
            message: format!(
                "Swapped {} for {} in {} place(s).",
                target, substitute.name, swap_count
            ),
        }
    }
}

/// 80% of the old load, back on the 0.25 grid
fn scale_weight(weight: f64) -> f64 {
    (weight * SWAP_WEIGHT_FACTOR * 4.0).round() / 4.0
}
