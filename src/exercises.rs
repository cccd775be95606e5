//! Exercise definitions - catalogue of movements grouped by equipment tier

use serde::{Deserialize, Serialize};

/// Equipment a user can have access to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Bodyweight,
    Barbell,
    Dumbbells,
    Bench,
    SquatRack,
    PullUpBar,
    Kettlebell,
    ResistanceBands,
    Cable,
    Machine,
}

impl Equipment {
    pub fn id(&self) -> &'static str {
        match self {
            Equipment::Bodyweight => "bodyweight",
            Equipment::Barbell => "barbell",
            Equipment::Dumbbells => "dumbbells",
            Equipment::Bench => "bench",
            Equipment::SquatRack => "squat_rack",
            Equipment::PullUpBar => "pull_up_bar",
            Equipment::Kettlebell => "kettlebell",
            Equipment::ResistanceBands => "resistance_bands",
            Equipment::Cable => "cable",
            Equipment::Machine => "machine",
        }
    }

    pub fn all() -> &'static [Equipment] {
        &[
            Equipment::Bodyweight,
            Equipment::Barbell,
            Equipment::Dumbbells,
            Equipment::Bench,
            Equipment::SquatRack,
            Equipment::PullUpBar,
            Equipment::Kettlebell,
            Equipment::ResistanceBands,
            Equipment::Cable,
            Equipment::Machine,
        ]
    }
}

impl std::str::FromStr for Equipment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Equipment::all()
            .iter()
            .find(|e| e.id() == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown equipment: {}", s))
    }
}

/// Movement pattern, used for form cues
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Push,  // Presses, push-ups
    Pull,  // Rows, pull-ups
    Legs,  // Squats, lunges
    Hinge, // Deadlifts, swings, bridges
    Core,  // Planks, carries
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Push => "push",
            Category::Pull => "pull",
            Category::Legs => "legs",
            Category::Hinge => "hinge",
            Category::Core => "core",
        }
    }
}

/// Equipment tier a profile falls into; each tier owns one pool
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentTier {
    BodyweightOnly,
    FullGym,
    DumbbellOnly,
    Mixed,
}

impl EquipmentTier {
    /// Barbell wins outright; dumbbells plus anything else is mixed
    pub fn classify<'a, I>(equipment: I) -> Self
    where
        I: IntoIterator<Item = &'a Equipment>,
    {
        let mut has_barbell = false;
        let mut has_dumbbells = false;
        let mut has_other = false;

        for item in equipment {
            match item {
                Equipment::Barbell => has_barbell = true,
                Equipment::Dumbbells => has_dumbbells = true,
                Equipment::Bodyweight | Equipment::Bench => {}
                _ => has_other = true,
            }
        }

        match (has_barbell, has_dumbbells, has_other) {
            (true, _, _) => EquipmentTier::FullGym,
            (false, true, false) => EquipmentTier::DumbbellOnly,
            (false, true, true) | (false, false, true) => EquipmentTier::Mixed,
            (false, false, false) => EquipmentTier::BodyweightOnly,
        }
    }

    pub fn pool(&self) -> &'static [Exercise] {
        match self {
            EquipmentTier::BodyweightOnly => BODYWEIGHT_POOL,
            EquipmentTier::FullGym => FULL_GYM_POOL,
            EquipmentTier::DumbbellOnly => DUMBBELL_POOL,
            EquipmentTier::Mixed => MIXED_POOL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub equipment: &'static [Equipment],
    pub is_compound: bool,
    /// Baseline prescription used by the program generator
    pub sets: u32,
    pub reps: &'static str,
    pub rest_seconds: u32,
    pub cue: &'static str,
}

const PUSH_UP: Exercise = Exercise {
    id: "push_up",
    name: "Push-Up",
    category: Category::Push,
    equipment: &[Equipment::Bodyweight],
    is_compound: true,
    sets: 3,
    reps: "8-15",
    rest_seconds: 90,
    cue: "Body in one straight line, elbows at 45 degrees",
};

const BODYWEIGHT_SQUAT: Exercise = Exercise {
    id: "bodyweight_squat",
    name: "Bodyweight Squat",
    category: Category::Legs,
    equipment: &[Equipment::Bodyweight],
    is_compound: true,
    sets: 3,
    reps: "15-20",
    rest_seconds: 90,
    cue: "Sit between the heels, knees track over toes",
};

const INVERTED_ROW: Exercise = Exercise {
    id: "inverted_row",
    name: "Inverted Row",
    category: Category::Pull,
    equipment: &[Equipment::Bodyweight],
    is_compound: true,
    sets: 3,
    reps: "8-12",
    rest_seconds: 90,
    cue: "Pull the chest to the bar, squeeze the shoulder blades",
};

const GLUTE_BRIDGE: Exercise = Exercise {
    id: "glute_bridge",
    name: "Glute Bridge",
    category: Category::Hinge,
    equipment: &[Equipment::Bodyweight],
    is_compound: false,
    sets: 3,
    reps: "12-15",
    rest_seconds: 60,
    cue: "Drive through the heels, pause at the top",
};

const PIKE_PUSH_UP: Exercise = Exercise {
    id: "pike_push_up",
    name: "Pike Push-Up",
    category: Category::Push,
    equipment: &[Equipment::Bodyweight],
    is_compound: true,
    sets: 3,
    reps: "6-10",
    rest_seconds: 90,
    cue: "Hips high, head travels in front of the hands",
};

const REVERSE_LUNGE: Exercise = Exercise {
    id: "reverse_lunge",
    name: "Reverse Lunge",
    category: Category::Legs,
    equipment: &[Equipment::Bodyweight],
    is_compound: true,
    sets: 3,
    reps: "10-12",
    rest_seconds: 75,
    cue: "Step back softly, front shin stays vertical",
};

const PLANK: Exercise = Exercise {
    id: "plank",
    name: "Plank",
    category: Category::Core,
    equipment: &[Equipment::Bodyweight],
    is_compound: false,
    sets: 3,
    reps: "30-45s",
    rest_seconds: 60,
    cue: "Ribs down, squeeze glutes, breathe behind the brace",
};

const BARBELL_BACK_SQUAT: Exercise = Exercise {
    id: "barbell_back_squat",
    name: "Barbell Back Squat",
    category: Category::Legs,
    equipment: &[Equipment::Barbell, Equipment::SquatRack],
    is_compound: true,
    sets: 4,
    reps: "5-8",
    rest_seconds: 180,
    cue: "Brace before descent, hit depth with a neutral spine",
};

const BARBELL_BENCH_PRESS: Exercise = Exercise {
    id: "barbell_bench_press",
    name: "Barbell Bench Press",
    category: Category::Push,
    equipment: &[Equipment::Barbell, Equipment::Bench],
    is_compound: true,
    sets: 4,
    reps: "5-8",
    rest_seconds: 180,
    cue: "Shoulder blades pinned, bar touches lower chest",
};

const BARBELL_ROW: Exercise = Exercise {
    id: "barbell_row",
    name: "Barbell Row",
    category: Category::Pull,
    equipment: &[Equipment::Barbell],
    is_compound: true,
    sets: 4,
    reps: "6-10",
    rest_seconds: 120,
    cue: "Hinge to 45 degrees, pull to the belly button",
};

const ROMANIAN_DEADLIFT: Exercise = Exercise {
    id: "romanian_deadlift",
    name: "Romanian Deadlift",
    category: Category::Hinge,
    equipment: &[Equipment::Barbell],
    is_compound: true,
    sets: 3,
    reps: "8-10",
    rest_seconds: 150,
    cue: "Push the hips back, bar stays against the thighs",
};

const OVERHEAD_PRESS: Exercise = Exercise {
    id: "overhead_press",
    name: "Overhead Press",
    category: Category::Push,
    equipment: &[Equipment::Barbell],
    is_compound: true,
    sets: 3,
    reps: "6-8",
    rest_seconds: 150,
    cue: "Glutes tight, head through once the bar passes the forehead",
};

const PULL_UP: Exercise = Exercise {
    id: "pull_up",
    name: "Pull-Up",
    category: Category::Pull,
    equipment: &[Equipment::PullUpBar],
    is_compound: true,
    sets: 3,
    reps: "5-10",
    rest_seconds: 120,
    cue: "Start from a dead hang, lead with the chest",
};

const CABLE_FACE_PULL: Exercise = Exercise {
    id: "cable_face_pull",
    name: "Cable Face Pull",
    category: Category::Pull,
    equipment: &[Equipment::Cable],
    is_compound: false,
    sets: 3,
    reps: "12-15",
    rest_seconds: 60,
    cue: "Pull to the eyes, thumbs finish behind the ears",
};

const GOBLET_SQUAT: Exercise = Exercise {
    id: "goblet_squat",
    name: "Goblet Squat",
    category: Category::Legs,
    equipment: &[Equipment::Dumbbells],
    is_compound: true,
    sets: 3,
    reps: "8-12",
    rest_seconds: 120,
    cue: "Elbows inside the knees, chest tall",
};

const DUMBBELL_BENCH_PRESS: Exercise = Exercise {
    id: "dumbbell_bench_press",
    name: "Dumbbell Bench Press",
    category: Category::Push,
    equipment: &[Equipment::Dumbbells, Equipment::Bench],
    is_compound: true,
    sets: 3,
    reps: "8-12",
    rest_seconds: 120,
    cue: "Lower under control to chest level, press slightly inward",
};

const DUMBBELL_ROW: Exercise = Exercise {
    id: "dumbbell_row",
    name: "One-Arm Dumbbell Row",
    category: Category::Pull,
    equipment: &[Equipment::Dumbbells],
    is_compound: true,
    sets: 3,
    reps: "8-12",
    rest_seconds: 90,
    cue: "Flat back, drive the elbow toward the hip",
};

const DUMBBELL_RDL: Exercise = Exercise {
    id: "dumbbell_romanian_deadlift",
    name: "Dumbbell Romanian Deadlift",
    category: Category::Hinge,
    equipment: &[Equipment::Dumbbells],
    is_compound: true,
    sets: 3,
    reps: "10-12",
    rest_seconds: 120,
    cue: "Soft knees, dumbbells slide down the front of the legs",
};

const DUMBBELL_SHOULDER_PRESS: Exercise = Exercise {
    id: "dumbbell_shoulder_press",
    name: "Dumbbell Shoulder Press",
    category: Category::Push,
    equipment: &[Equipment::Dumbbells],
    is_compound: true,
    sets: 3,
    reps: "8-12",
    rest_seconds: 90,
    cue: "Stack wrists over elbows, no lower-back arch",
};

const DUMBBELL_LUNGE: Exercise = Exercise {
    id: "dumbbell_lunge",
    name: "Dumbbell Walking Lunge",
    category: Category::Legs,
    equipment: &[Equipment::Dumbbells],
    is_compound: true,
    sets: 3,
    reps: "10-12",
    rest_seconds: 90,
    cue: "Long stride, back knee kisses the floor",
};

const DUMBBELL_CURL: Exercise = Exercise {
    id: "dumbbell_curl",
    name: "Dumbbell Curl",
    category: Category::Pull,
    equipment: &[Equipment::Dumbbells],
    is_compound: false,
    sets: 3,
    reps: "10-15",
    rest_seconds: 60,
    cue: "Elbows pinned to the sides, no swinging",
};

const DUMBBELL_LATERAL_RAISE: Exercise = Exercise {
    id: "dumbbell_lateral_raise",
    name: "Dumbbell Lateral Raise",
    category: Category::Push,
    equipment: &[Equipment::Dumbbells],
    is_compound: false,
    sets: 3,
    reps: "12-15",
    rest_seconds: 60,
    cue: "Lead with the elbows, stop at shoulder height",
};

const KETTLEBELL_SWING: Exercise = Exercise {
    id: "kettlebell_swing",
    name: "Kettlebell Swing",
    category: Category::Hinge,
    equipment: &[Equipment::Kettlebell],
    is_compound: true,
    sets: 3,
    reps: "15-20",
    rest_seconds: 90,
    cue: "Snap the hips, arms are just ropes",
};

const BAND_PULL_APART: Exercise = Exercise {
    id: "band_pull_apart",
    name: "Band Pull-Apart",
    category: Category::Pull,
    equipment: &[Equipment::ResistanceBands],
    is_compound: false,
    sets: 3,
    reps: "15-20",
    rest_seconds: 45,
    cue: "Arms straight, pull the band to the chest",
};

/// Bodyweight-only pool
pub const BODYWEIGHT_POOL: &[Exercise] = &[
    BODYWEIGHT_SQUAT,
    PUSH_UP,
    INVERTED_ROW,
    GLUTE_BRIDGE,
    PIKE_PUSH_UP,
    REVERSE_LUNGE,
    PLANK,
];

/// Full barbell gym pool
pub const FULL_GYM_POOL: &[Exercise] = &[
    BARBELL_BACK_SQUAT,
    BARBELL_BENCH_PRESS,
    BARBELL_ROW,
    ROMANIAN_DEADLIFT,
    OVERHEAD_PRESS,
    PULL_UP,
    CABLE_FACE_PULL,
    PLANK,
];

/// Dumbbell-only pool
pub const DUMBBELL_POOL: &[Exercise] = &[
    GOBLET_SQUAT,
    DUMBBELL_BENCH_PRESS,
    DUMBBELL_ROW,
    DUMBBELL_RDL,
    DUMBBELL_SHOULDER_PRESS,
    DUMBBELL_LUNGE,
    DUMBBELL_CURL,
    DUMBBELL_LATERAL_RAISE,
];

/// Mixed home-gym pool (dumbbells plus kettlebell/bands/bar)
pub const MIXED_POOL: &[Exercise] = &[
    GOBLET_SQUAT,
    PUSH_UP,
    DUMBBELL_ROW,
    KETTLEBELL_SWING,
    DUMBBELL_SHOULDER_PRESS,
    BAND_PULL_APART,
    REVERSE_LUNGE,
    PLANK,
];

/// Substitutes that never appear in a generated plan but can be swapped in
pub const ALTERNATIVE_EXERCISES: &[Exercise] = &[
    Exercise {
        id: "front_squat",
        name: "Front Squat",
        category: Category::Legs,
        equipment: &[Equipment::Barbell, Equipment::SquatRack],
        is_compound: true,
        sets: 4,
        reps: "5-8",
        rest_seconds: 180,
        cue: "Elbows high, stay upright out of the hole",
    },
    Exercise {
        id: "leg_press",
        name: "Leg Press",
        category: Category::Legs,
        equipment: &[Equipment::Machine],
        is_compound: true,
        sets: 3,
        reps: "10-12",
        rest_seconds: 120,
        cue: "Lower back stays on the pad, do not lock the knees",
    },
    Exercise {
        id: "incline_dumbbell_press",
        name: "Incline Dumbbell Press",
        category: Category::Push,
        equipment: &[Equipment::Dumbbells, Equipment::Bench],
        is_compound: true,
        sets: 3,
        reps: "8-12",
        rest_seconds: 120,
        cue: "Bench at 30 degrees, press over the upper chest",
    },
    Exercise {
        id: "chin_up",
        name: "Chin-Up",
        category: Category::Pull,
        equipment: &[Equipment::PullUpBar],
        is_compound: true,
        sets: 3,
        reps: "5-10",
        rest_seconds: 120,
        cue: "Palms toward you, pull the chin over the bar",
    },
    Exercise {
        id: "lat_pulldown",
        name: "Lat Pulldown",
        category: Category::Pull,
        equipment: &[Equipment::Cable],
        is_compound: true,
        sets: 3,
        reps: "10-12",
        rest_seconds: 90,
        cue: "Pull the bar to the collarbone, chest up",
    },
    Exercise {
        id: "hip_thrust",
        name: "Hip Thrust",
        category: Category::Hinge,
        equipment: &[Equipment::Barbell, Equipment::Bench],
        is_compound: true,
        sets: 3,
        reps: "8-12",
        rest_seconds: 120,
        cue: "Chin tucked, ribs down, full lockout",
    },
    Exercise {
        id: "bulgarian_split_squat",
        name: "Bulgarian Split Squat",
        category: Category::Legs,
        equipment: &[Equipment::Dumbbells, Equipment::Bench],
        is_compound: true,
        sets: 3,
        reps: "8-10",
        rest_seconds: 90,
        cue: "Front foot far enough that the heel stays down",
    },
    Exercise {
        id: "dips",
        name: "Dips",
        category: Category::Push,
        equipment: &[Equipment::Bodyweight],
        is_compound: true,
        sets: 3,
        reps: "6-12",
        rest_seconds: 120,
        cue: "Slight forward lean, shoulders away from the ears",
    },
];

pub fn get_all_exercises() -> Vec<&'static Exercise> {
    BODYWEIGHT_POOL
        .iter()
        .chain(FULL_GYM_POOL.iter())
        .chain(DUMBBELL_POOL.iter())
        .chain(MIXED_POOL.iter())
        .chain(ALTERNATIVE_EXERCISES.iter())
        .collect()
}

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    get_all_exercises().into_iter().find(|e| e.id == id)
}

/// Case-insensitive containment: does `name` contain `needle`?
///
/// An empty needle never matches, otherwise it would match every name.
pub fn name_matches(name: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    !needle.is_empty() && name.to_lowercase().contains(&needle)
}

/// Find exercise by name: exact (case-insensitive) first, then containment
pub fn find_exercise_by_name(name: &str) -> Option<&'static Exercise> {
    let all = get_all_exercises();
    let wanted = name.trim().to_lowercase();
    all.iter()
        .find(|e| e.name.to_lowercase() == wanted)
        .copied()
        .or_else(|| find_exercise(&wanted))
        .or_else(|| all.into_iter().find(|e| name_matches(e.name, name)))
}
