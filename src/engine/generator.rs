//! Initial 12-week program synthesis
//!
//! Fixed four-phase calendar:
//! - weeks 1-4 Foundation: baseline sets/reps
//! - weeks 5-8 Development: same numbers, progression comes from the weekly cycle
//! - week 9 Deload: half the sets (rounded up), RPE 6
//! - weeks 10-12 Realization: full sets/reps

use tracing::{debug, info};

use crate::exercises::{name_matches, Exercise};
use crate::profile::Profile;
use crate::program::{ExerciseEntry, ProgramData, Week, Workout};

pub const PROGRAM_WEEKS: u32 = 12;

/// Pool offset between consecutive workouts
const POOL_STRIDE: usize = 2;

/// Rough minutes one exercise takes including rest
const MINUTES_PER_EXERCISE: u32 = 12;
const MIN_EXERCISES_PER_WORKOUT: usize = 3;

const DELOAD_RPE: u8 = 6;
const DELOAD_NOTE: &str = "Deload week: half the sets, leave plenty in the tank.";

const WORKOUT_LABELS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Foundation,
    Development,
    Deload,
    Realization,
}

impl Phase {
    pub fn for_week(week_number: u32) -> Self {
        match week_number {
            0..=4 => Phase::Foundation,
            5..=8 => Phase::Development,
            9 => Phase::Deload,
            _ => Phase::Realization,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Foundation => "Foundation",
            Phase::Development => "Development",
            Phase::Deload => "Deload",
            Phase::Realization => "Realization",
        }
    }
}

/// Stateless program generator
pub struct ProgramGenerator;

impl ProgramGenerator {
    /// Build the full 12-week plan for a profile
    pub fn generate(profile: &Profile) -> ProgramData {
        let tier = profile.equipment_tier();
        let pool = Self::usable_pool(tier.pool(), &profile.injuries);
        let days = profile.days_per_week.clamp(1, 7) as usize;
        let per_workout = Self::exercises_per_workout(profile.session_duration, pool.len());

        info!(
            ?tier,
            days,
            per_workout,
            goal = profile.goal.label(),
            "Generating program"
        );

        let weeks = (1..=PROGRAM_WEEKS)
            .map(|week_number| {
                let phase = Phase::for_week(week_number);
                let workouts = (0..days)
                    .map(|i| Self::build_workout(&pool, i, per_workout, phase))
                    .collect();
                Week {
                    week_number,
                    focus: phase.label().to_string(),
                    workouts,
                }
            })
            .collect();

        ProgramData {
            name: Some(format!("{}-Week {} Program", PROGRAM_WEEKS, profile.goal.label())),
            version: 1,
            weeks,
        }
    }

    /// Drop exercises that mention an injury keyword, unless that leaves too few
    fn usable_pool(pool: &'static [Exercise], injuries: &[String]) -> Vec<&'static Exercise> {
        let filtered: Vec<_> = pool
            .iter()
            .filter(|e| !injuries.iter().any(|injury| name_matches(e.name, injury)))
            .collect();

        if filtered.len() >= MIN_EXERCISES_PER_WORKOUT {
            filtered
        } else {
            debug!("Injury filter left too few exercises, using full pool");
            pool.iter().collect()
        }
    }

    fn exercises_per_workout(session_minutes: u32, pool_len: usize) -> usize {
        let by_time = (session_minutes / MINUTES_PER_EXERCISE) as usize;
        by_time.clamp(MIN_EXERCISES_PER_WORKOUT.min(pool_len), pool_len)
    }

    /// Workout `index` takes `count` consecutive pool entries starting at `2 * index`
    fn build_workout(
        pool: &[&'static Exercise],
        index: usize,
        count: usize,
        phase: Phase,
    ) -> Workout {
        let start = index * POOL_STRIDE;
        let exercises = (0..count)
            .map(|offset| Self::entry(pool[(start + offset) % pool.len()], phase))
            .collect();

        Workout {
            day: (index + 1) as u8,
            workout_name: format!("Workout {}", WORKOUT_LABELS[index % WORKOUT_LABELS.len()]),
            exercises,
        }
    }

    fn entry(exercise: &Exercise, phase: Phase) -> ExerciseEntry {
        match phase {
            Phase::Deload => ExerciseEntry {
                exercise_name: exercise.name.to_string(),
                sets: exercise.sets.div_ceil(2),
                reps: exercise.reps.to_string(),
                rest_seconds: exercise.rest_seconds,
                notes: Some(format!("{} {}", exercise.cue, DELOAD_NOTE)),
                rpe_target: Some(DELOAD_RPE),
                suggested_weight: None,
            },
            Phase::Foundation | Phase::Development | Phase::Realization => ExerciseEntry {
                exercise_name: exercise.name.to_string(),
                sets: exercise.sets,
                reps: exercise.reps.to_string(),
                rest_seconds: exercise.rest_seconds,
                notes: Some(exercise.cue.to_string()),
                rpe_target: None,
                suggested_weight: None,
            },
        }
    }
}
