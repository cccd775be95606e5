//! Program tree and versioned program records
//!
//! `ProgramData` is the interchange format stored on every version:
//! weeks → workouts → exercises. It is kept stable because history is retained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub exercise_name: String,
    pub sets: u32,
    pub reps: String,
    pub rest_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe_target: Option<u8>,
    /// Working weight carried over from logged sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub day: u8,
    pub workout_name: String,
    pub exercises: Vec<ExerciseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Week {
    pub week_number: u32,
    pub focus: String,
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Bumped by every weekly mutation of the tree
    #[serde(default)]
    pub version: u32,
    pub weeks: Vec<Week>,
}

impl ProgramData {
    /// Parse a stored tree, failing fast when `weeks` is missing or malformed
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| EngineError::MalformedProgram("program_data is not an object".into()))?;
        match obj.get("weeks") {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(EngineError::MalformedProgram("`weeks` is not an array".into()));
            }
            None => return Err(EngineError::MalformedProgram("missing `weeks` array".into())),
        }
        serde_json::from_value(value.clone())
            .map_err(|e| EngineError::MalformedProgram(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| EngineError::MalformedProgram(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn exercises(&self) -> impl Iterator<Item = &ExerciseEntry> {
        self.weeks
            .iter()
            .flat_map(|w| w.workouts.iter())
            .flat_map(|w| w.exercises.iter())
    }

    pub fn exercises_mut(&mut self) -> impl Iterator<Item = &mut ExerciseEntry> {
        self.weeks
            .iter_mut()
            .flat_map(|w| w.workouts.iter_mut())
            .flat_map(|w| w.exercises.iter_mut())
    }

    pub fn week(&self, week_number: u32) -> Option<&Week> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }
}

/// How a version came to be; the lowercase action name for weekly versions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Initial,
    Progress,
    Maintain,
    Deload,
    Rebuild,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Progress => write!(f, "progress"),
            Self::Maintain => write!(f, "maintain"),
            Self::Deload => write!(f, "deload"),
            Self::Rebuild => write!(f, "rebuild"),
        }
    }
}

impl std::str::FromStr for ChangeType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Self::Initial),
            "progress" => Ok(Self::Progress),
            "maintain" => Ok(Self::Maintain),
            "deload" => Ok(Self::Deload),
            "rebuild" => Ok(Self::Rebuild),
            _ => Err(format!("Unknown change type: {}", s)),
        }
    }
}

/// One row of a user's append-only plan history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramVersion {
    pub id: i64,
    pub user_id: String,
    pub version_number: u32,
    pub program_data: ProgramData,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub reason_for_change: Option<String>,
    pub change_type: ChangeType,
}

/// A version about to be inserted (no id yet)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgramVersion {
    pub user_id: String,
    pub version_number: u32,
    pub program_data: ProgramData,
    pub active: bool,
    pub reason_for_change: Option<String>,
    pub change_type: ChangeType,
}

impl NewProgramVersion {
    /// Version 1, produced at onboarding
    pub fn initial(user_id: &str, program_data: ProgramData) -> Self {
        Self {
            user_id: user_id.to_string(),
            version_number: 1,
            program_data,
            active: true,
            reason_for_change: Some("Initial program generated from profile".to_string()),
            change_type: ChangeType::Initial,
        }
    }
}

/// Everything the store needs to swap the active version atomically
#[derive(Debug, Clone)]
pub struct VersionTransition {
    /// Id of the currently active row to flip inactive
    pub deactivate_id: i64,
    pub new_version: NewProgramVersion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> Value {
        json!({
            "weeks": [{
                "week_number": 1,
                "focus": "Foundation",
                "workouts": [{
                    "day": 1,
                    "workout_name": "Workout A",
                    "exercises": [
                        {"exercise_name": "Goblet Squat", "sets": 3, "reps": "8-12", "rest_seconds": 120},
                        {"exercise_name": "Push-Up", "sets": 3, "reps": "8-15", "rest_seconds": 90, "rpe_target": 7}
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_from_value_parses_tree() {
        let data = ProgramData::from_value(&sample_json()).unwrap();
        assert_eq!(data.version, 0);
        assert_eq!(data.weeks.len(), 1);
        assert_eq!(data.exercises().count(), 2);
        assert_eq!(data.week(1).unwrap().focus, "Foundation");
        assert!(data.week(2).is_none());
    }

    #[test]
    fn test_from_value_missing_weeks() {
        let err = ProgramData::from_value(&json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, EngineError::MalformedProgram(_)));
        assert!(err.to_string().contains("weeks"));
    }

    #[test]
    fn test_from_value_weeks_not_array() {
        let err = ProgramData::from_value(&json!({"weeks": {}})).unwrap_err();
        assert!(matches!(err, EngineError::MalformedProgram(_)));
    }

    #[test]
    fn test_from_value_not_object() {
        assert!(ProgramData::from_value(&json!([1, 2, 3])).is_err());
        assert!(ProgramData::from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_from_value_bad_exercise_shape() {
        let bad = json!({"weeks": [{"week_number": 1, "focus": "x", "workouts": [{"day": 1}]}]});
        assert!(matches!(
            ProgramData::from_value(&bad),
            Err(EngineError::MalformedProgram(_))
        ));
    }

    #[test]
    fn test_optional_fields_are_omitted_when_empty() {
        let data = ProgramData::from_value(&sample_json()).unwrap();
        let json = data.to_json().unwrap();
        assert!(!json.contains("notes"));
        assert!(!json.contains("suggested_weight"));
        assert!(json.contains("\"rpe_target\":7"));
    }

    #[test]
    fn test_change_type_string_roundtrip() {
        for ct in [
            ChangeType::Initial,
            ChangeType::Progress,
            ChangeType::Maintain,
            ChangeType::Deload,
            ChangeType::Rebuild,
        ] {
            assert_eq!(ct.to_string().parse::<ChangeType>(), Ok(ct));
        }
        assert!("swap".parse::<ChangeType>().is_err());
    }

    #[test]
    fn test_initial_version() {
        let data = ProgramData::from_value(&sample_json()).unwrap();
        let v = NewProgramVersion::initial("user-1", data);
        assert_eq!(v.version_number, 1);
        assert!(v.active);
        assert_eq!(v.change_type, ChangeType::Initial);
    }
}
