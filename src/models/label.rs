//! Activity label models.
//!
//! The preset list is fixed; any other non-blank text is accepted as a custom
//! label.

use serde::Serialize;

/// A preset activity shown on the picker screen.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLabel {
    /// Value written into the `label` column.
    pub name: &'static str,
    pub icon: &'static str,
    pub order_index: usize,
}

impl ActivityLabel {
    /// Picker text, e.g. `"🚶 Walking"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

const PRESETS: [ActivityLabel; 4] = [
    ActivityLabel {
        name: "Walking",
        icon: "🚶",
        order_index: 0,
    },
    ActivityLabel {
        name: "Sitting",
        icon: "🪑",
        order_index: 1,
    },
    ActivityLabel {
        name: "Standing",
        icon: "🧍",
        order_index: 2,
    },
    ActivityLabel {
        name: "Running",
        icon: "🏃",
        order_index: 3,
    },
];

pub fn preset_labels() -> Vec<ActivityLabel> {
    PRESETS.to_vec()
}

/// Turns user input into the label recorded with each sample.
///
/// Returns `None` for blank input. A preset's display text maps to the bare
/// preset name so the icon never reaches the CSV.
pub fn normalize_label(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let preset = PRESETS
        .iter()
        .find(|preset| preset.display_name() == trimmed);

    match preset {
        Some(preset) => Some(preset.name.to_string()),
        None => Some(trimmed.to_string()),
    }
}
