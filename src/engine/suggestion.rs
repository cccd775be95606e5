//! Set-by-set load suggestions
//!
//! Turns one completed set's difficulty and form rating into the weight, reps
//! and rest for the next set of the same exercise. Also reads short runs of
//! sets for a trend and for deload readiness.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::exercises::Category;
use crate::tips::form_tips;

/// Base rest between sets, seconds
const COMPOUND_REST_SECS: i32 = 120;
const ISOLATION_REST_SECS: i32 = 90;

/// Weight rounding granularity
const WEIGHT_STEP: f64 = 0.25;

/// Reps may run this far past the target before being capped
const REP_CAP_OVER_TARGET: u32 = 3;

/// Minimum sets/sessions before trend or deload analysis says anything
const MIN_SAMPLES: usize = 3;

/// How the lifter rated the set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Difficulty {
    TooEasy,
    Easy,
    Perfect,
    Challenging,
    Failure,
}

impl Difficulty {
    /// Ordinal score, too_easy = 1 .. failure = 5
    pub fn score(&self) -> u8 {
        match self {
            Difficulty::TooEasy => 1,
            Difficulty::Easy => 2,
            Difficulty::Perfect => 3,
            Difficulty::Challenging => 4,
            Difficulty::Failure => 5,
        }
    }

    /// Rest offset applied on top of the base rest, seconds
    pub fn rest_offset(&self) -> i32 {
        match self {
            Difficulty::TooEasy => -30,
            Difficulty::Easy => -15,
            Difficulty::Perfect => 0,
            Difficulty::Challenging => 30,
            Difficulty::Failure => 60,
        }
    }

    fn is_hard(&self) -> bool {
        matches!(self, Difficulty::Challenging | Difficulty::Failure)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum FormQuality {
    Poor,
    Good,
    Perfect,
}

impl FormQuality {
    /// Ordinal score, poor = 1 .. perfect = 3
    pub fn score(&self) -> u8 {
        match self {
            FormQuality::Poor => 1,
            FormQuality::Good => 2,
            FormQuality::Perfect => 3,
        }
    }
}

/// One completed set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetPerformance {
    pub difficulty: Difficulty,
    pub form_quality: FormQuality,
    pub current_weight: f64,
    pub current_reps: u32,
    pub target_reps: u32,
    pub is_compound: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Recommendation for the next set, persisted as `ai_suggestion`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub next_weight: f64,
    pub next_reps: u32,
    pub rest_seconds: u32,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Difficulty/form pair of a set or session, for trend and deload checks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetRating {
    pub difficulty: Difficulty,
    pub form_quality: FormQuality,
}

impl From<&SetPerformance> for SetRating {
    fn from(set: &SetPerformance) -> Self {
        Self {
            difficulty: set.difficulty,
            form_quality: set.form_quality,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Maintaining,
    Declining,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub recommendation: String,
    /// Set when there were too few sets to read a trend
    pub low_confidence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeloadCheck {
    pub should_deload: bool,
    pub reason: Option<String>,
}

/// Increment sizes: (compound, isolation)
#[derive(Debug, Clone, Copy)]
enum Increment {
    Heavy,
    Light,
}

impl Increment {
    fn amount(&self, is_compound: bool) -> f64 {
        match (self, is_compound) {
            (Increment::Heavy, true) => 5.0,
            (Increment::Heavy, false) => 2.5,
            (Increment::Light, true) => 2.5,
            (Increment::Light, false) => 1.25,
        }
    }
}

/// Raw outcome of the decision table, before clamping
struct Adjustment {
    weight_delta: f64,
    rep_delta: i64,
    reasoning: &'static str,
    warning: Option<&'static str>,
}

/// Stateless suggestion engine
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Suggest the next set from the one just completed
    pub fn generate_suggestion(set: &SetPerformance) -> Suggestion {
        let current_weight = if set.current_weight.is_finite() {
            set.current_weight.max(0.0)
        } else {
            0.0
        };
        let current_reps = set.current_reps.max(1);
        let target_reps = set.target_reps.max(1);

        let mut adj = Self::decide(
            set.difficulty,
            set.form_quality,
            set.is_compound,
            current_reps,
            target_reps,
        );

        let mut form_tips_out = Vec::new();
        let mut warnings = Vec::new();
        if let Some(w) = adj.warning {
            warnings.push(w.to_string());
        }

        // Never add load on poor form
        if set.form_quality == FormQuality::Poor && set.difficulty != Difficulty::Failure {
            if adj.weight_delta > 0.0 {
                adj.weight_delta = 0.0;
            }
            form_tips_out = form_tips(set.category, 3);
        } else if set.difficulty == Difficulty::Perfect && set.form_quality == FormQuality::Good {
            form_tips_out = form_tips(set.category, 1);
        }

        let next_weight = round_to_step((current_weight + adj.weight_delta).max(0.0));
        let rep_cap = i64::from(target_reps + REP_CAP_OVER_TARGET);
        let next_reps = (i64::from(current_reps) + adj.rep_delta).max(1).min(rep_cap) as u32;

        let base_rest = if set.is_compound {
            COMPOUND_REST_SECS
        } else {
            ISOLATION_REST_SECS
        };
        let rest_seconds = (base_rest + set.difficulty.rest_offset()).max(0) as u32;

        debug!(
            difficulty = ?set.difficulty,
            form = ?set.form_quality,
            next_weight,
            next_reps,
            rest_seconds,
            "Generated set suggestion"
        );

        Suggestion {
            next_weight,
            next_reps,
            rest_seconds,
            reasoning: adj.reasoning.to_string(),
            form_tips: form_tips_out,
            warnings,
        }
    }

    /// Decision table over (difficulty, form)
    fn decide(
        difficulty: Difficulty,
        form: FormQuality,
        is_compound: bool,
        current_reps: u32,
        target_reps: u32,
    ) -> Adjustment {
        let heavy = Increment::Heavy.amount(is_compound);
        let light = Increment::Light.amount(is_compound);

        match (difficulty, form) {
            (Difficulty::TooEasy, FormQuality::Perfect) => Adjustment {
                weight_delta: heavy,
                rep_delta: 0,
                reasoning: "Too easy with perfect form: time for a bigger jump in load.",
                warning: None,
            },
            (Difficulty::TooEasy, FormQuality::Good | FormQuality::Poor) => Adjustment {
                weight_delta: 0.0,
                rep_delta: 2,
                reasoning: "Too easy, but tighten up form before adding load: add 2 reps instead.",
                warning: None,
            },
            (Difficulty::Easy, FormQuality::Perfect) => Adjustment {
                weight_delta: light,
                rep_delta: 0,
                reasoning: "Easy with perfect form: small load increase.",
                warning: None,
            },
            (Difficulty::Easy, FormQuality::Good | FormQuality::Poor) => Adjustment {
                weight_delta: 0.0,
                rep_delta: 1,
                reasoning: "Easy: add one rep and keep refining form.",
                warning: None,
            },
            (Difficulty::Perfect, _) => Adjustment {
                weight_delta: 0.0,
                rep_delta: 0,
                reasoning: "Right in the target zone: repeat this weight and reps.",
                warning: None,
            },
            (Difficulty::Challenging, FormQuality::Poor) => Adjustment {
                weight_delta: -light,
                rep_delta: -1,
                reasoning: "Challenging and form slipped: drop the load slightly and one rep.",
                warning: Some("Form breakdown under load: reduce weight until technique is solid."),
            },
            (Difficulty::Challenging, FormQuality::Good | FormQuality::Perfect) => Adjustment {
                weight_delta: 0.0,
                rep_delta: 0,
                reasoning: "Challenging but solid: keep the load and take a little more rest.",
                warning: None,
            },
            (Difficulty::Failure, _) => Adjustment {
                weight_delta: -heavy,
                rep_delta: (i64::from(target_reps) - i64::from(current_reps)).clamp(-2, 0),
                reasoning: "Reached failure: reduce the load and rest longer before the next set.",
                warning: Some("Fatigue is high: consider ending this exercise if the next set also fails."),
            },
        }
    }

    /// Read a trend from three or more consecutive sets
    pub fn analyze_progression_trend(sets: &[SetRating]) -> TrendAnalysis {
        if sets.len() < MIN_SAMPLES {
            return TrendAnalysis {
                trend: Trend::Maintaining,
                recommendation: format!(
                    "Only {} set(s) logged; need at least {} to read a trend.",
                    sets.len(),
                    MIN_SAMPLES
                ),
                low_confidence: true,
            };
        }

        let scores: Vec<u8> = sets.iter().map(|s| s.difficulty.score()).collect();
        let non_decreasing = scores.windows(2).all(|w| w[0] <= w[1]);
        let non_increasing = scores.windows(2).all(|w| w[0] >= w[1]);

        let first_form = sets[0].form_quality.score();
        let last_form = sets[sets.len() - 1].form_quality.score();
        let form_held = last_form >= first_form;

        let (trend, recommendation) = if non_decreasing && form_held {
            (
                Trend::Improving,
                "Effort is climbing steadily while form holds: stay the course.",
            )
        } else if non_increasing || !form_held {
            (
                Trend::Declining,
                "Sets are trending the wrong way: cut a set or reduce the load.",
            )
        } else {
            (Trend::Maintaining, "Mixed signals: keep the current prescription.")
        };

        TrendAnalysis {
            trend,
            recommendation: recommendation.to_string(),
            low_confidence: false,
        }
    }

    /// Decide whether the last three sessions call for a deload
    pub fn should_deload(recent_sessions: &[SetRating]) -> DeloadCheck {
        if recent_sessions.len() < MIN_SAMPLES {
            return DeloadCheck {
                should_deload: false,
                reason: None,
            };
        }

        let window = &recent_sessions[recent_sessions.len() - MIN_SAMPLES..];
        let hard = window.iter().filter(|s| s.difficulty.is_hard()).count();
        let poor_form = window
            .iter()
            .filter(|s| s.form_quality == FormQuality::Poor)
            .count();

        if hard >= 2 {
            DeloadCheck {
                should_deload: true,
                reason: Some(format!(
                    "Accumulated fatigue: {} of the last {} sessions were challenging or failed.",
                    hard, MIN_SAMPLES
                )),
            }
        } else if poor_form >= 2 {
            DeloadCheck {
                should_deload: true,
                reason: Some(format!(
                    "Technical breakdown: poor form in {} of the last {} sessions.",
                    poor_form, MIN_SAMPLES
                )),
            }
        } else {
            DeloadCheck {
                should_deload: false,
                reason: None,
            }
        }
    }
}

/// Round to the nearest 0.25
fn round_to_step(weight: f64) -> f64 {
    (weight / WEIGHT_STEP).round() * WEIGHT_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFFICULTIES: [Difficulty; 5] = [
        Difficulty::TooEasy,
        Difficulty::Easy,
        Difficulty::Perfect,
        Difficulty::Challenging,
        Difficulty::Failure,
    ];
    const FORMS: [FormQuality; 3] = [FormQuality::Poor, FormQuality::Good, FormQuality::Perfect];

    fn set(
        difficulty: Difficulty,
        form_quality: FormQuality,
        weight: f64,
        reps: u32,
        target: u32,
        is_compound: bool,
    ) -> SetPerformance {
        SetPerformance {
            difficulty,
            form_quality,
            current_weight: weight,
            current_reps: reps,
            target_reps: target,
            is_compound,
            category: None,
        }
    }

    fn rating(difficulty: Difficulty, form_quality: FormQuality) -> SetRating {
        SetRating {
            difficulty,
            form_quality,
        }
    }

    #[test]
    fn test_failure_poor_form_compound() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::Failure,
            FormQuality::Poor,
            60.0,
            5,
            8,
            true,
        ));
        assert_eq!(s.next_weight, 55.0);
        assert!(s.rest_seconds > 120);
        assert!(!s.warnings.is_empty());
        // target - current = 3, clamped to 0
        assert_eq!(s.next_reps, 5);
    }

    #[test]
    fn test_too_easy_perfect_compound() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::TooEasy,
            FormQuality::Perfect,
            60.0,
            8,
            8,
            true,
        ));
        assert_eq!(s.next_weight, 65.0);
        assert_eq!(s.next_reps, 8);
        assert_eq!(s.rest_seconds, 90);
    }

    #[test]
    fn test_too_easy_imperfect_form_adds_reps_not_load() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::TooEasy,
            FormQuality::Good,
            40.0,
            8,
            10,
            false,
        ));
        assert_eq!(s.next_weight, 40.0);
        assert_eq!(s.next_reps, 10);
    }

    #[test]
    fn test_easy_perfect_isolation_light_increment() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::Easy,
            FormQuality::Perfect,
            10.0,
            12,
            12,
            false,
        ));
        // 11.25 is already on the 0.25 grid
        assert_eq!(s.next_weight, 11.25);
        assert_eq!(s.rest_seconds, 75);
    }

    #[test]
    fn test_easy_good_form_adds_one_rep() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::Easy,
            FormQuality::Good,
            20.0,
            10,
            10,
            true,
        ));
        assert_eq!(s.next_weight, 20.0);
        assert_eq!(s.next_reps, 11);
    }

    #[test]
    fn test_perfect_difficulty_holds() {
        for form in FORMS {
            let s = SuggestionEngine::generate_suggestion(&set(
                Difficulty::Perfect,
                form,
                50.0,
                8,
                8,
                true,
            ));
            assert_eq!(s.next_weight, 50.0);
            assert_eq!(s.next_reps, 8);
            assert_eq!(s.rest_seconds, 120);
        }
    }

    #[test]
    fn test_challenging_poor_form_backs_off() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::Challenging,
            FormQuality::Poor,
            50.0,
            8,
            8,
            true,
        ));
        assert_eq!(s.next_weight, 47.5);
        assert_eq!(s.next_reps, 7);
        assert!(s.warnings.iter().any(|w| w.contains("Form breakdown")));
        assert!(!s.form_tips.is_empty());
    }

    #[test]
    fn test_challenging_good_form_more_rest() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::Challenging,
            FormQuality::Good,
            50.0,
            8,
            8,
            false,
        ));
        assert_eq!(s.next_weight, 50.0);
        assert_eq!(s.rest_seconds, 120);
        assert!(s.warnings.is_empty());
    }

    #[test]
    fn test_failure_pulls_reps_down_toward_target() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::Failure,
            FormQuality::Good,
            30.0,
            12,
            8,
            false,
        ));
        assert_eq!(s.next_weight, 27.5);
        // target - current = -4, clamped to -2
        assert_eq!(s.next_reps, 10);
        assert_eq!(s.rest_seconds, 150);
    }

    #[test]
    fn test_poor_form_never_increases_weight() {
        for difficulty in DIFFICULTIES {
            let s = SuggestionEngine::generate_suggestion(&set(
                difficulty,
                FormQuality::Poor,
                40.0,
                8,
                8,
                true,
            ));
            assert!(s.next_weight <= 40.0, "{:?} raised load on poor form", difficulty);
        }
    }

    #[test]
    fn test_poor_form_attaches_category_tips() {
        let mut s = set(Difficulty::Easy, FormQuality::Poor, 40.0, 8, 8, true);
        s.category = Some(Category::Hinge);
        let suggestion = SuggestionEngine::generate_suggestion(&s);
        assert_eq!(suggestion.form_tips.len(), 3);
        assert!(suggestion.form_tips[0].contains("Hips travel back"));
    }

    #[test]
    fn test_weight_is_non_negative_and_on_grid() {
        for difficulty in DIFFICULTIES {
            for form in FORMS {
                for weight in [0.0, 1.0, 2.4, 13.37, 60.0, -5.0, f64::NAN] {
                    for is_compound in [true, false] {
                        let s = SuggestionEngine::generate_suggestion(&set(
                            difficulty,
                            form,
                            weight,
                            6,
                            8,
                            is_compound,
                        ));
                        assert!(s.next_weight >= 0.0);
                        assert_eq!((s.next_weight * 4.0).fract(), 0.0, "{} off grid", s.next_weight);
                    }
                }
            }
        }
    }

    #[test]
    fn test_reps_stay_within_bounds() {
        for difficulty in DIFFICULTIES {
            for form in FORMS {
                for (reps, target) in [(0, 0), (1, 1), (5, 8), (8, 8), (15, 8), (30, 5)] {
                    let s = SuggestionEngine::generate_suggestion(&set(
                        difficulty, form, 20.0, reps, target, true,
                    ));
                    let target = target.max(1);
                    assert!(s.next_reps >= 1);
                    assert!(s.next_reps <= target + 3, "{} > {}", s.next_reps, target + 3);
                }
            }
        }
    }

    #[test]
    fn test_suggestion_serializes_camel_case() {
        let s = SuggestionEngine::generate_suggestion(&set(
            Difficulty::Failure,
            FormQuality::Good,
            60.0,
            5,
            8,
            true,
        ));
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("nextWeight"));
        assert!(json.contains("restSeconds"));
        assert!(json.contains("warnings"));
        assert!(!json.contains("formTips"));
    }

    #[test]
    fn test_trend_improving() {
        let sets = vec![
            rating(Difficulty::Easy, FormQuality::Good),
            rating(Difficulty::Perfect, FormQuality::Good),
            rating(Difficulty::Challenging, FormQuality::Perfect),
        ];
        let analysis = SuggestionEngine::analyze_progression_trend(&sets);
        assert_eq!(analysis.trend, Trend::Improving);
        assert!(!analysis.low_confidence);
    }

    #[test]
    fn test_trend_declining_on_form_loss() {
        let sets = vec![
            rating(Difficulty::Easy, FormQuality::Perfect),
            rating(Difficulty::Perfect, FormQuality::Good),
            rating(Difficulty::Challenging, FormQuality::Poor),
        ];
        let analysis = SuggestionEngine::analyze_progression_trend(&sets);
        assert_eq!(analysis.trend, Trend::Declining);
    }

    #[test]
    fn test_trend_declining_on_falling_scores() {
        let sets = vec![
            rating(Difficulty::Failure, FormQuality::Good),
            rating(Difficulty::Challenging, FormQuality::Good),
            rating(Difficulty::Easy, FormQuality::Good),
        ];
        let analysis = SuggestionEngine::analyze_progression_trend(&sets);
        assert_eq!(analysis.trend, Trend::Declining);
    }

    #[test]
    fn test_trend_maintaining_when_mixed() {
        let sets = vec![
            rating(Difficulty::Easy, FormQuality::Good),
            rating(Difficulty::Challenging, FormQuality::Good),
            rating(Difficulty::Perfect, FormQuality::Good),
        ];
        let analysis = SuggestionEngine::analyze_progression_trend(&sets);
        assert_eq!(analysis.trend, Trend::Maintaining);
    }

    #[test]
    fn test_trend_needs_three_sets() {
        let sets = vec![
            rating(Difficulty::Easy, FormQuality::Good),
            rating(Difficulty::Perfect, FormQuality::Good),
        ];
        let analysis = SuggestionEngine::analyze_progression_trend(&sets);
        assert_eq!(analysis.trend, Trend::Maintaining);
        assert!(analysis.low_confidence);
    }

    #[test]
    fn test_should_deload_on_fatigue() {
        let sessions = vec![
            rating(Difficulty::Challenging, FormQuality::Good),
            rating(Difficulty::Perfect, FormQuality::Good),
            rating(Difficulty::Failure, FormQuality::Good),
        ];
        let check = SuggestionEngine::should_deload(&sessions);
        assert!(check.should_deload);
        assert!(check.reason.unwrap().contains("fatigue"));
    }

    #[test]
    fn test_should_deload_on_form() {
        let sessions = vec![
            rating(Difficulty::Perfect, FormQuality::Poor),
            rating(Difficulty::Easy, FormQuality::Poor),
            rating(Difficulty::Perfect, FormQuality::Good),
        ];
        let check = SuggestionEngine::should_deload(&sessions);
        assert!(check.should_deload);
        assert!(check.reason.unwrap().contains("Technical breakdown"));
    }

    #[test]
    fn test_should_deload_only_reads_last_three() {
        let sessions = vec![
            rating(Difficulty::Failure, FormQuality::Poor),
            rating(Difficulty::Failure, FormQuality::Poor),
            rating(Difficulty::Perfect, FormQuality::Good),
            rating(Difficulty::Easy, FormQuality::Good),
            rating(Difficulty::Challenging, FormQuality::Perfect),
        ];
        assert!(!SuggestionEngine::should_deload(&sessions).should_deload);
    }

    #[test]
    fn test_should_deload_needs_three_sessions() {
        let sessions = vec![
            rating(Difficulty::Failure, FormQuality::Poor),
            rating(Difficulty::Failure, FormQuality::Poor),
        ];
        let check = SuggestionEngine::should_deload(&sessions);
        assert!(!check.should_deload);
        assert!(check.reason.is_none());
    }
}
