use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Attrition;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colours for the attrition series.
pub fn attrition_color(attrition: Attrition) -> Color32 {
    match attrition {
        Attrition::No => Color32::from_rgb(76, 120, 168),
        Attrition::Yes => Color32::from_rgb(228, 87, 86),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: department → Color32
// ---------------------------------------------------------------------------

/// Maps every department of the dataset to a distinct colour, so a
/// department keeps its colour while filters change.
#[derive(Debug, Clone, Default)]
pub struct DepartmentColors {
    mapping: BTreeMap<String, Color32>,
}

impl DepartmentColors {
    pub fn new(departments: &BTreeSet<String>) -> Self {
        let palette = generate_palette(departments.len());
        let mapping = departments
            .iter()
            .zip(palette)
            .map(|(d, c)| (d.clone(), c))
            .collect();
        DepartmentColors { mapping }
    }

    pub fn color_for(&self, department: &str) -> Color32 {
        self.mapping
            .get(department)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let colours = generate_palette(6);
        assert_eq!(colours.len(), 6);
        let unique: BTreeSet<[u8; 4]> = colours.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn unknown_department_falls_back_to_gray() {
        let departments = BTreeSet::from(["Sales".to_string(), "Engineering".to_string()]);
        let colours = DepartmentColors::new(&departments);
        assert_ne!(colours.color_for("Sales"), colours.color_for("Engineering"));
        assert_eq!(colours.color_for("Legal"), Color32::GRAY);
    }
}
