//! adaptlift - Adaptive strength-training periodization engine

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use adaptlift::db::{Database, SetLog};
use adaptlift::engine::modifier::{parse_coach_action, CoachAction};
use adaptlift::engine::suggestion::{Difficulty, FormQuality, SetRating};
use adaptlift::engine::{
    ProgramGenerator, ProgramModifier, SetPerformance, SuggestionEngine, WeeklyAnalyzer,
    WeeklyCheckIn,
};
use adaptlift::exercises::{find_exercise_by_name, Equipment};
use adaptlift::profile::{ExperienceLevel, Goal, Profile};
use adaptlift::program::ProgramData;

#[derive(Parser)]
#[command(name = "adaptlift")]
#[command(author, version, about = "Adaptive strength-training periodization engine")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "ADAPTLIFT_DB", default_value = "adaptlift.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a profile and generate the initial 12-week program
    Init {
        #[arg(short, long)]
        user: String,

        #[arg(long, value_enum)]
        goal: Goal,

        #[arg(long, value_enum)]
        experience: ExperienceLevel,

        /// Comma-separated equipment ids (e.g. "dumbbells,bench")
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<Equipment>,

        #[arg(long, default_value = "3")]
        days: u8,

        /// Session length in minutes
        #[arg(long, default_value = "60")]
        minutes: u32,

        /// Comma-separated injury keywords
        #[arg(long, value_delimiter = ',')]
        injuries: Vec<String>,
    },

    /// Suggest the next set from the one just completed
    Suggest {
        /// How the set felt
        #[arg(long, value_enum)]
        difficulty: Difficulty,

        #[arg(long, value_enum)]
        form: FormQuality,

        #[arg(short, long)]
        weight: f64,

        #[arg(short, long)]
        reps: u32,

        #[arg(short, long)]
        target: u32,

        /// Exercise name; fills in compound/category from the catalogue
        #[arg(short, long)]
        exercise: Option<String>,

        #[arg(long)]
        compound: bool,

        /// Log the set (and suggestion) for this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Submit a weekly check-in and advance the program
    Checkin {
        #[arg(short, long)]
        user: String,

        /// Percent of planned sessions completed
        #[arg(long)]
        adherence: f64,

        /// Perceived difficulty 1-10
        #[arg(long)]
        difficulty: u8,

        /// Recovery 1-10
        #[arg(long)]
        recovery: u8,

        /// Stress 1-5
        #[arg(long)]
        stress: u8,

        /// Total volume; summed from the last 7 days of set logs if omitted
        #[arg(long)]
        volume: Option<f64>,
    },

    /// Swap an exercise across the active program
    Swap {
        #[arg(short, long)]
        user: String,

        /// Chat action payload: {"action":"swap_exercise","target":..,"replacement":..}
        #[arg(long, conflicts_with_all = ["target", "replacement"])]
        payload: Option<String>,

        #[arg(long)]
        target: Option<String>,

        #[arg(long)]
        replacement: Option<String>,
    },

    /// Show the active program
    Show {
        #[arg(short, long)]
        user: String,

        /// Only this week
        #[arg(short, long)]
        week: Option<u32>,
    },

    /// List program versions
    History {
        #[arg(short, long)]
        user: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let db = Database::open(&cli.db)?;

    match cli.command {
        Commands::Init { user, goal, experience, equipment, days, minutes, injuries } => {
            let profile = Profile {
                goal,
                experience,
                equipment: equipment.into_iter().collect(),
                days_per_week: days,
                session_duration: minutes,
                injuries,
            };
            let program = ProgramGenerator::generate(&profile);
            db.save_profile(&user, &profile)?;
            let version = db.create_initial_version(&user, program)?;
            println!(
                "Created {} for {} (version {}, {:?} tier)",
                version.program_data.name.as_deref().unwrap_or("program"),
                user,
                version.version_number,
                profile.equipment_tier()
            );
        }

        Commands::Suggest { difficulty, form, weight, reps, target, exercise, compound, user } => {
            let known = exercise.as_deref().and_then(find_exercise_by_name);
            let performance = SetPerformance {
                difficulty,
                form_quality: form,
                current_weight: weight,
                current_reps: reps,
                target_reps: target,
                is_compound: known.map(|e| e.is_compound).unwrap_or(compound),
                category: known.map(|e| e.category),
            };
            let suggestion = SuggestionEngine::generate_suggestion(&performance);

            if let Some(e) = known {
                println!("{} ({} movement)", e.name, e.category.name());
            }
            println!("Next set: {} x {}", suggestion.next_weight, suggestion.next_reps);
            println!("Rest: {}s", suggestion.rest_seconds);
            println!("{}", suggestion.reasoning);
            for tip in &suggestion.form_tips {
                println!("  tip: {}", tip);
            }
            for warning in &suggestion.warnings {
                println!("  warning: {}", warning);
            }

            if let (Some(user), Some(exercise)) = (user, exercise) {
                db.log_set(&SetLog {
                    id: None,
                    user_id: user.clone(),
                    logged_at: Utc::now(),
                    exercise: exercise.clone(),
                    weight,
                    reps,
                    rating: SetRating::from(&performance),
                    ai_suggestion: Some(suggestion),
                })?;
                print_set_analysis(&db, &user, &exercise)?;
            }
        }

        Commands::Checkin { user, adherence, difficulty, recovery, stress, volume } => {
            let active = db
                .active_version(&user)?
                .with_context(|| format!("No active program for {}", user))?;
            let total_volume = match volume {
                Some(v) => v,
                None => db.weekly_volume(&user, Utc::now())?,
            };
            let stats = WeeklyCheckIn { adherence, total_volume, difficulty, recovery, stress };

            let decision = WeeklyAnalyzer::analyze_weekly_progress(&stats);
            let profile = db.get_profile(&user)?;
            let transition = WeeklyAnalyzer::plan_transition(&active, &decision, profile.as_ref())?;
            let version = db.commit_weekly_checkin(&transition, &stats, &decision)?;

            println!("{} ({:?})", decision.action, decision.reason);
            println!("{}", decision.feedback);
            println!("Program is now at version {}", version.version_number);
        }

        Commands::Swap { user, payload, target, replacement } => {
            let (target, replacement) = match (payload, target, replacement) {
                (Some(json), _, _) => match parse_coach_action(&json)? {
                    CoachAction::SwapExercise { target, replacement } => (target, replacement),
                },
                (None, Some(t), Some(r)) => (t, r),
                _ => bail!("Provide --payload or both --target and --replacement"),
            };

            let active = db
                .active_version(&user)?
                .with_context(|| format!("No active program for {}", user))?;
            let outcome = ProgramModifier::swap_exercise(&active.program_data, &target, &replacement);
            if outcome.success {
                db.patch_active_program(&user, &outcome.program_data)?;
            }
            println!("{}", outcome.message);
        }

        Commands::Show { user, week } => {
            let active = db
                .active_version(&user)?
                .with_context(|| format!("No active program for {}", user))?;
            println!(
                "{} - version {} ({})",
                active.program_data.name.as_deref().unwrap_or("Program"),
                active.version_number,
                active.change_type
            );
            print_program(&active.program_data, week);
        }

        Commands::History { user } => {
            let history = db.history(&user)?;
            if history.is_empty() {
                println!("No program history for {}", user);
            }
            for v in history {
                println!(
                    "{} | v{:<3} | {:8} | {} | {}",
                    v.created_at.format("%Y-%m-%d %H:%M"),
                    v.version_number,
                    v.change_type.to_string(),
                    if v.active { "active" } else { "      " },
                    v.reason_for_change.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

fn print_set_analysis(db: &Database, user: &str, exercise: &str) -> Result<()> {
    let ratings: Vec<SetRating> = db
        .set_logs(user, exercise)?
        .iter()
        .map(|log| log.rating)
        .collect();

    let trend = SuggestionEngine::analyze_progression_trend(&ratings);
    println!("Trend: {:?} - {}", trend.trend, trend.recommendation);

    let deload = SuggestionEngine::should_deload(&ratings);
    if let Some(reason) = deload.reason.filter(|_| deload.should_deload) {
        println!("Deload suggested: {}", reason);
    }
    Ok(())
}

fn print_program(program: &ProgramData, only_week: Option<u32>) {
    let weeks: Vec<_> = match only_week {
        Some(n) => program.week(n).into_iter().collect(),
        None => program.weeks.iter().collect(),
    };
    if weeks.is_empty() {
        println!("No such week");
    }

    for week in weeks {
        println!("\nWeek {} - {}", week.week_number, week.focus);
        println!("{:-<60}", "");
        for workout in &week.workouts {
            println!("Day {}: {}", workout.day, workout.workout_name);
            for e in &workout.exercises {
                let rpe = e.rpe_target.map(|r| format!(" @RPE {}", r)).unwrap_or_default();
                println!(
                    "  {:28} {}x{:6} rest {}s{}",
                    e.exercise_name, e.sets, e.reps, e.rest_seconds, rpe
                );
                if let Some(notes) = &e.notes {
                    println!("    {}", notes);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_suggest_enum_values() {
        let cli = Cli::try_parse_from([
            "adaptlift", "suggest", "--difficulty", "too_easy", "--form", "perfect",
            "-w", "60", "-r", "8", "-t", "8",
        ])
        .unwrap();
        match cli.command {
            Commands::Suggest { difficulty, form, .. } => {
                assert_eq!(difficulty, Difficulty::TooEasy);
                assert_eq!(form, FormQuality::Perfect);
            }
            _ => panic!("Wrong command"),
        }

        let bad = Cli::try_parse_from([
            "adaptlift", "suggest", "--difficulty", "brutal", "--form", "good",
            "-w", "60", "-r", "8", "-t", "8",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_parse_goal_snake_case() {
        let cli = Cli::try_parse_from([
            "adaptlift", "init", "--user", "u1", "--goal", "fat_loss",
            "--experience", "complete_beginner",
        ])
        .unwrap();
        match cli.command {
            Commands::Init { goal, experience, .. } => {
                assert_eq!(goal, Goal::FatLoss);
                assert_eq!(experience, ExperienceLevel::CompleteBeginner);
            }
            _ => panic!("Wrong command"),
        }
    }

    #[test]
    fn test_parse_init_args() {
        let cli = Cli::try_parse_from([
            "adaptlift", "init", "--user", "u1", "--goal", "strength",
            "--experience", "beginner", "--equipment", "barbell,bench",
        ])
        .unwrap();
        match cli.command {
            Commands::Init { equipment, days, .. } => {
                assert_eq!(equipment, vec![Equipment::Barbell, Equipment::Bench]);
                assert_eq!(days, 3);
            }
            _ => panic!("Wrong command"),
        }
    }
}
