//! Tips module - form-correction cues attached to set suggestions

use crate::exercises::Category;

pub struct Tip {
    /// `None` means the cue applies to any movement
    pub category: Option<Category>,
    pub text: &'static str,
}

pub const TIPS: &[Tip] = &[
    // === GENERAL ===
    Tip {
        category: None,
        text: "Slow the lowering phase to a 2-3 second count.",
    },
    Tip {
        category: None,
        text: "Film a set from the side and compare it with your best reps.",
    },
    Tip {
        category: None,
        text: "Brace before every rep, not just the first one.",
    },

    // === PUSH ===
    Tip {
        category: Some(Category::Push),
        text: "Keep the shoulder blades set; do not let the shoulders roll forward.",
    },
    Tip {
        category: Some(Category::Push),
        text: "Stack wrists directly over elbows at the bottom of the press.",
    },

    // === PULL ===
    Tip {
        category: Some(Category::Pull),
        text: "Start each rep by pulling the shoulder blades back, then bend the elbows.",
    },
    Tip {
        category: Some(Category::Pull),
        text: "Stop using momentum; pause for a second at the top.",
    },

    // === LEGS ===
    Tip {
        category: Some(Category::Legs),
        text: "Keep the whole foot planted; pressure through mid-foot and heel.",
    },
    Tip {
        category: Some(Category::Legs),
        text: "Knees follow the toes; do not let them cave inward.",
    },

    // === HINGE ===
    Tip {
        category: Some(Category::Hinge),
        text: "Hips travel back, not down; keep a neutral spine throughout.",
    },
    Tip {
        category: Some(Category::Hinge),
        text: "Keep the load close to the body for the full range.",
    },

    // === CORE ===
    Tip {
        category: Some(Category::Core),
        text: "Ribs down and glutes squeezed; stop the set when the hips sag.",
    },
];

/// Form-correction cues for a movement: specific ones first, then general ones
pub fn form_tips(category: Option<Category>, limit: usize) -> Vec<String> {
    let specific = TIPS
        .iter()
        .filter(|t| category.is_some() && t.category == category);
    let general = TIPS.iter().filter(|t| t.category.is_none());

    specific
        .chain(general)
        .take(limit)
        .map(|t| t.text.to_string())
        .collect()
}
