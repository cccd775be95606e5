//! Weekly check-in analysis and next-week plan mutation

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::generator::ProgramGenerator;
use crate::error::{EngineError, Result};
use crate::profile::Profile;
use crate::program::{ChangeType, NewProgramVersion, ProgramData, ProgramVersion, VersionTransition};

const DELOAD_SET_FACTOR: f64 = 0.6;
const PROGRESS_NOTE: &str =
    "Progress: work to the top of the rep range, then add 2.5 kg next session.";
const DELOAD_NOTE: &str =
    "Deload: focus on technique, controlled tempo and full range of motion.";

/// Aggregated stats for one training week
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCheckIn {
    /// Percent of planned sessions completed, 0-100
    pub adherence: f64,
    pub total_volume: f64,
    /// 1-10
    pub difficulty: u8,
    /// 1-10
    pub recovery: u8,
    /// 1-5
    pub stress: u8,
}

impl WeeklyCheckIn {
    /// Pull every field into its documented range
    pub fn clamped(&self) -> Self {
        let adherence = if self.adherence.is_finite() {
            self.adherence.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let total_volume = if self.total_volume.is_finite() {
            self.total_volume.max(0.0)
        } else {
            0.0
        };
        Self {
            adherence,
            total_volume,
            difficulty: self.difficulty.clamp(1, 10),
            recovery: self.recovery.clamp(1, 10),
            stress: self.stress.clamp(1, 5),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Progress,
    Maintain,
    Deload,
    Rebuild,
}

impl Action {
    pub fn change_type(&self) -> ChangeType {
        match self {
            Action::Progress => ChangeType::Progress,
            Action::Maintain => ChangeType::Maintain,
            Action::Deload => ChangeType::Deload,
            Action::Rebuild => ChangeType::Rebuild,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Progress => write!(f, "PROGRESS"),
            Self::Maintain => write!(f, "MAINTAIN"),
            Self::Deload => write!(f, "DELOAD"),
            Self::Rebuild => write!(f, "REBUILD"),
        }
    }
}

/// Machine-readable reason behind an action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ReasonCode {
    LowAdherence,
    BurnoutRisk,
    ExcellentWeek,
    SteadyConsistency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyDecision {
    pub action: Action,
    pub feedback: String,
    pub reason: ReasonCode,
}

/// Stateless weekly analyzer
pub struct WeeklyAnalyzer;

impl WeeklyAnalyzer {
    /// Ordered decision chain, first match wins
    pub fn analyze_weekly_progress(stats: &WeeklyCheckIn) -> WeeklyDecision {
        let s = stats.clamped();

        let (action, reason, feedback) = if s.adherence < 60.0 {
            (
                Action::Maintain,
                ReasonCode::LowAdherence,
                format!(
                    "Life happens. You completed {:.0}% of sessions, so we'll repeat this week before moving on.",
                    s.adherence
                ),
            )
        } else if s.stress >= 4 && s.recovery <= 4 {
            (
                Action::Deload,
                ReasonCode::BurnoutRisk,
                format!(
                    "Stress is high ({}/5) and recovery is low ({}/10). Next week is a deload to recharge.",
                    s.stress, s.recovery
                ),
            )
        } else if s.adherence >= 90.0 && s.difficulty <= 6 && s.recovery >= 7 {
            (
                Action::Progress,
                ReasonCode::ExcellentWeek,
                "Excellent week: great consistency, manageable effort and good recovery. Time to push."
                    .to_string(),
            )
        } else {
            (
                Action::Progress,
                ReasonCode::SteadyConsistency,
                "Steady, consistent week. Keep building.".to_string(),
            )
        };

        info!(%action, ?reason, adherence = s.adherence, "Weekly decision");

        WeeklyDecision {
            action,
            feedback,
            reason,
        }
    }

    /// Produce next week's tree from the current one; the input is left untouched
    pub fn generate_next_week_program(current: &ProgramData, action: Action) -> ProgramData {
        let mut next = current.clone();
        next.version += 1;

        match action {
            Action::Progress => {
                for entry in next.exercises_mut() {
                    entry.notes = Some(match entry.notes.take() {
                        Some(existing) if existing.contains(PROGRESS_NOTE) => existing,
                        Some(existing) if !existing.is_empty() => {
                            format!("{} {}", existing, PROGRESS_NOTE)
                        }
                        _ => PROGRESS_NOTE.to_string(),
                    });
                }
            }
            Action::Deload => {
                for entry in next.exercises_mut() {
                    entry.sets = deload_sets(entry.sets);
                    entry.notes = Some(DELOAD_NOTE.to_string());
                }
            }
            Action::Maintain | Action::Rebuild => {}
        }

        next
    }

    /// Build the version swap for a decision against the active version
    ///
    /// REBUILD regenerates the whole tree when a profile is available; without
    /// one it falls back to leaving the tree as-is.
    pub fn plan_transition(
        active: &ProgramVersion,
        decision: &WeeklyDecision,
        profile: Option<&Profile>,
    ) -> Result<VersionTransition> {
        if !active.active {
            return Err(EngineError::InactiveVersion {
                version_number: active.version_number,
            });
        }

        let program_data = match (decision.action, profile) {
            (Action::Rebuild, Some(profile)) => {
                let mut rebuilt = ProgramGenerator::generate(profile);
                rebuilt.version = active.program_data.version + 1;
                rebuilt
            }
            (Action::Rebuild, None) => {
                warn!("Rebuild requested without a profile, keeping current plan");
                Self::generate_next_week_program(&active.program_data, Action::Rebuild)
            }
            (action, _) => Self::generate_next_week_program(&active.program_data, action),
        };

        Ok(VersionTransition {
            deactivate_id: active.id,
            new_version: NewProgramVersion {
                user_id: active.user_id.clone(),
                version_number: active.version_number + 1,
                program_data,
                active: true,
                reason_for_change: Some(decision.feedback.clone()),
                change_type: decision.action.change_type(),
            },
        })
    }
}

/// ceil(0.6 * sets), never below 1
fn deload_sets(sets: u32) -> u32 {
    ((f64::from(sets) * DELOAD_SET_FACTOR).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::Equipment;
    use crate::profile::{ExperienceLevel, Goal};
    use chrono::Utc;

    fn checkin(adherence: f64, difficulty: u8, recovery: u8, stress: u8) -> WeeklyCheckIn {
        WeeklyCheckIn {
            adherence,
            total_volume: 12_000.0,
            difficulty,
            recovery,
            stress,
        }
    }

    fn profile() -> Profile {
        Profile {
            goal: Goal::MuscleGain,
            experience: ExperienceLevel::Beginner,
            equipment: [Equipment::Dumbbells].into_iter().collect(),
            days_per_week: 3,
            session_duration: 45,
            injuries: vec![],
        }
    }

    fn active_version() -> ProgramVersion {
        ProgramVersion {
            id: 7,
            user_id: "user-1".to_string(),
            version_number: 3,
            program_data: ProgramGenerator::generate(&profile()),
            active: true,
            created_at: Utc::now(),
            reason_for_change: None,
            change_type: ChangeType::Progress,
        }
    }

    #[test]
    fn test_low_adherence_short_circuits() {
        for (d, r, s) in [(1, 10, 1), (10, 1, 5), (5, 5, 3)] {
            let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(50.0, d, r, s));
            assert_eq!(decision.action, Action::Maintain);
            assert_eq!(decision.reason, ReasonCode::LowAdherence);
        }
    }

    #[test]
    fn test_burnout_deloads() {
        let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(95.0, 5, 4, 4));
        assert_eq!(decision.action, Action::Deload);
        assert_eq!(decision.reason, ReasonCode::BurnoutRisk);
    }

    #[test]
    fn test_excellent_week_progresses() {
        let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(90.0, 6, 7, 2));
        assert_eq!(decision.action, Action::Progress);
        assert_eq!(decision.reason, ReasonCode::ExcellentWeek);
    }

    #[test]
    fn test_default_progresses() {
        let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(75.0, 8, 6, 3));
        assert_eq!(decision.action, Action::Progress);
        assert_eq!(decision.reason, ReasonCode::SteadyConsistency);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        // 150% adherence clamps to 100, stress 9 clamps to 5, recovery 0 clamps to 1
        let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(150.0, 3, 0, 9));
        assert_eq!(decision.action, Action::Deload);
        let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(f64::NAN, 3, 8, 1));
        assert_eq!(decision.action, Action::Maintain);
    }

    #[test]
    fn test_deload_reduces_sets_without_touching_input() {
        let plan = ProgramGenerator::generate(&profile());
        let before = plan.clone();
        let next = WeeklyAnalyzer::generate_next_week_program(&plan, Action::Deload);

        assert_eq!(plan, before);
        assert_ne!(next, plan);
        for (old, new) in plan.exercises().zip(next.exercises()) {
            assert!(f64::from(new.sets) <= (0.6 * f64::from(old.sets)).ceil());
            assert!(new.sets >= 1);
            assert_eq!(new.notes.as_deref(), Some(DELOAD_NOTE));
            assert_eq!(new.reps, old.reps);
        }
    }

    #[test]
    fn test_deload_sets_floor() {
        assert_eq!(deload_sets(0), 1);
        assert_eq!(deload_sets(1), 1);
        assert_eq!(deload_sets(3), 2);
        assert_eq!(deload_sets(4), 3);
        assert_eq!(deload_sets(5), 3);
    }

    #[test]
    fn test_progress_attaches_note_once() {
        let plan = ProgramGenerator::generate(&profile());
        let once = WeeklyAnalyzer::generate_next_week_program(&plan, Action::Progress);
        let twice = WeeklyAnalyzer::generate_next_week_program(&once, Action::Progress);

        for (old, new) in plan.exercises().zip(once.exercises()) {
            assert_eq!(old.sets, new.sets);
            assert_eq!(old.reps, new.reps);
            assert!(new.notes.as_deref().unwrap().contains(PROGRESS_NOTE));
        }
        for (a, b) in once.exercises().zip(twice.exercises()) {
            assert_eq!(a.notes, b.notes);
        }
        assert_eq!(twice.version, plan.version + 2);
    }

    #[test]
    fn test_maintain_only_bumps_version() {
        let plan = ProgramGenerator::generate(&profile());
        let next = WeeklyAnalyzer::generate_next_week_program(&plan, Action::Maintain);
        assert_eq!(next.weeks, plan.weeks);
        assert_eq!(next.version, plan.version + 1);
    }

    #[test]
    fn test_plan_transition_increments_version_number() {
        let active = active_version();
        let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(95.0, 5, 8, 1));
        let transition = WeeklyAnalyzer::plan_transition(&active, &decision, None).unwrap();

        assert_eq!(transition.deactivate_id, 7);
        assert_eq!(transition.new_version.version_number, 4);
        assert_eq!(transition.new_version.change_type, ChangeType::Progress);
        assert_eq!(transition.new_version.change_type.to_string(), "progress");
        assert!(transition.new_version.active);
        assert_eq!(
            transition.new_version.reason_for_change.as_deref(),
            Some(decision.feedback.as_str())
        );
    }

    #[test]
    fn test_plan_transition_rejects_inactive_version() {
        let mut stale = active_version();
        stale.active = false;
        let decision = WeeklyAnalyzer::analyze_weekly_progress(&checkin(95.0, 5, 8, 1));
        let err = WeeklyAnalyzer::plan_transition(&stale, &decision, None).unwrap_err();
        assert!(matches!(err, EngineError::InactiveVersion { version_number: 3 }));
    }

    #[test]
    fn test_rebuild_regenerates_from_profile() {
        let mut active = active_version();
        active.program_data =
            WeeklyAnalyzer::generate_next_week_program(&active.program_data, Action::Deload);
        let decision = WeeklyDecision {
            action: Action::Rebuild,
            feedback: "Goal changed".to_string(),
            reason: ReasonCode::SteadyConsistency,
        };

        let transition = WeeklyAnalyzer::plan_transition(&active, &decision, Some(&profile())).unwrap();
        let fresh = ProgramGenerator::generate(&profile());
        assert_eq!(transition.new_version.program_data.weeks, fresh.weeks);
        assert_eq!(
            transition.new_version.program_data.version,
            active.program_data.version + 1
        );
        assert_eq!(transition.new_version.change_type, ChangeType::Rebuild);
    }

    #[test]
    fn test_rebuild_without_profile_keeps_tree() {
        let active = active_version();
        let decision = WeeklyDecision {
            action: Action::Rebuild,
            feedback: "Goal changed".to_string(),
            reason: ReasonCode::SteadyConsistency,
        };

        let transition = WeeklyAnalyzer::plan_transition(&active, &decision, None).unwrap();
        let new = &transition.new_version;
        assert_eq!(new.program_data.weeks, active.program_data.weeks);
        assert_eq!(new.program_data.version, active.program_data.version + 1);
        assert_eq!(new.version_number, active.version_number + 1);
        assert_eq!(new.change_type, ChangeType::Rebuild);
        assert_eq!(new.change_type.to_string(), "rebuild");
    }

    #[test]
    fn test_action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Action::Deload).unwrap(), "\"DELOAD\"");
        assert_eq!(Action::Maintain.change_type().to_string(), "maintain");
    }
}
