//! User profile captured at onboarding

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::exercises::{Equipment, EquipmentTier};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Goal {
    MuscleGain,
    Strength,
    FatLoss,
    GeneralFitness,
    AthleticPerformance,
}

impl Goal {
    pub fn label(&self) -> &'static str {
        match self {
            Goal::MuscleGain => "Muscle Gain",
            Goal::Strength => "Strength",
            Goal::FatLoss => "Fat Loss",
            Goal::GeneralFitness => "General Fitness",
            Goal::AthleticPerformance => "Athletic Performance",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ExperienceLevel {
    CompleteBeginner,
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub goal: Goal,
    pub experience: ExperienceLevel,
    #[serde(default)]
    pub equipment: BTreeSet<Equipment>,
    pub days_per_week: u8,
    /// Minutes per session
    pub session_duration: u32,
    #[serde(default)]
    pub injuries: Vec<String>,
}

impl Profile {
    pub fn equipment_tier(&self) -> EquipmentTier {
        EquipmentTier::classify(&self.equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_json() {
        let json = r#"{
            "goal": "muscle_gain",
            "experience": "complete_beginner",
            "equipment": ["dumbbells", "bench"],
            "days_per_week": 3,
            "session_duration": 45
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.goal, Goal::MuscleGain);
        assert_eq!(profile.experience, ExperienceLevel::CompleteBeginner);
        assert!(profile.injuries.is_empty());
        assert_eq!(profile.equipment_tier(), EquipmentTier::DumbbellOnly);
    }

    #[test]
    fn test_experience_is_ordered() {
        assert!(ExperienceLevel::CompleteBeginner < ExperienceLevel::Beginner);
        assert!(ExperienceLevel::Intermediate < ExperienceLevel::Advanced);
    }
}
