//! Shared domain types.
//!
//! This module defines:
//!
//! - the categorical inputs (`GeologicalPeriod`, `StratigraphicPosition`, `PaleomagneticData`)
//! - slider bounds for the continuous inputs (`SliderBounds`, `NumericField`)
//! - the one-row `FeatureRecord` handed to the predictor
//! - the cosmetic `Theme`

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Geological period, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum GeologicalPeriod {
    Cretaceous,
    Cambrian,
    Permian,
    Devonian,
    Jurassic,
    Neogene,
    Triassic,
    Paleogene,
    Ordovician,
    Carboniferous,
    Silurian,
}

impl GeologicalPeriod {
    pub const ALL: [GeologicalPeriod; 11] = [
        GeologicalPeriod::Cretaceous,
        GeologicalPeriod::Cambrian,
        GeologicalPeriod::Permian,
        GeologicalPeriod::Devonian,
        GeologicalPeriod::Jurassic,
        GeologicalPeriod::Neogene,
        GeologicalPeriod::Triassic,
        GeologicalPeriod::Paleogene,
        GeologicalPeriod::Ordovician,
        GeologicalPeriod::Carboniferous,
        GeologicalPeriod::Silurian,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GeologicalPeriod::Cretaceous => "Cretaceous",
            GeologicalPeriod::Cambrian => "Cambrian",
            GeologicalPeriod::Permian => "Permian",
            GeologicalPeriod::Devonian => "Devonian",
            GeologicalPeriod::Jurassic => "Jurassic",
            GeologicalPeriod::Neogene => "Neogene",
            GeologicalPeriod::Triassic => "Triassic",
            GeologicalPeriod::Paleogene => "Paleogene",
            GeologicalPeriod::Ordovician => "Ordovician",
            GeologicalPeriod::Carboniferous => "Carboniferous",
            GeologicalPeriod::Silurian => "Silurian",
        }
    }
}

/// Position of the fossil within its stratigraphic layer, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum StratigraphicPosition {
    Middle,
    Top,
    Bottom,
}

impl StratigraphicPosition {
    pub const ALL: [StratigraphicPosition; 3] = [
        StratigraphicPosition::Middle,
        StratigraphicPosition::Top,
        StratigraphicPosition::Bottom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StratigraphicPosition::Middle => "Middle",
            StratigraphicPosition::Top => "Top",
            StratigraphicPosition::Bottom => "Bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum PaleomagneticData {
    #[serde(rename = "Normal polarity")]
    NormalPolarity,
    #[serde(rename = "Reversed polarity")]
    ReversedPolarity,
}

impl PaleomagneticData {
    pub const ALL: [PaleomagneticData; 2] = [
        PaleomagneticData::NormalPolarity,
        PaleomagneticData::ReversedPolarity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaleomagneticData::NormalPolarity => "Normal polarity",
            PaleomagneticData::ReversedPolarity => "Reversed polarity",
        }
    }
}

/// Fixed `[min, max]` range and step of a slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Decimal places implied by `step`; used to strip float noise after snapping.
    pub decimals: u32,
}

impl SliderBounds {
    pub const fn new(min: f64, max: f64, step: f64, decimals: u32) -> Self {
        Self {
            min,
            max,
            step,
            decimals,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Clamp into range and snap onto the step grid anchored at `min`.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let k = ((clamped - self.min) / self.step).round();
        let scale = 10f64.powi(self.decimals as i32);
        let snapped = ((self.min + k * self.step) * scale).round() / scale;
        snapped.clamp(self.min, self.max)
    }

    /// Move `value` by `steps` grid steps, staying in range.
    pub fn offset(&self, value: f64, steps: i64) -> f64 {
        self.snap(value + steps as f64 * self.step)
    }

    /// Number of steps covering roughly 1% of the range (at least one).
    pub fn coarse_steps(&self) -> i64 {
        (((self.max - self.min) / self.step) / 100.0).round().max(1.0) as i64
    }

    pub fn format(&self, value: f64) -> String {
        format!("{value:.*}", self.decimals as usize)
    }
}

/// The five continuous inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    UraniumLeadRatio,
    Carbon14Ratio,
    RadioactiveDecaySeries,
    StratigraphicLayerDepth,
    FossilSize,
}

impl NumericField {
    pub const ALL: [NumericField; 5] = [
        NumericField::UraniumLeadRatio,
        NumericField::Carbon14Ratio,
        NumericField::RadioactiveDecaySeries,
        NumericField::StratigraphicLayerDepth,
        NumericField::FossilSize,
    ];

    pub fn bounds(self) -> SliderBounds {
        match self {
            NumericField::UraniumLeadRatio => SliderBounds::new(0.000241, 1.533270, 0.000001, 6),
            NumericField::Carbon14Ratio => SliderBounds::new(0.000244, 1.000000, 0.000001, 6),
            NumericField::RadioactiveDecaySeries => {
                SliderBounds::new(0.000076, 1.513325, 0.000001, 6)
            }
            NumericField::StratigraphicLayerDepth => SliderBounds::new(0.13, 494.2, 0.01, 2),
            NumericField::FossilSize => SliderBounds::new(0.13, 216.39, 0.01, 2),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            NumericField::UraniumLeadRatio => "uranium_lead_ratio",
            NumericField::Carbon14Ratio => "carbon_14_ratio",
            NumericField::RadioactiveDecaySeries => "radioactive_decay_series",
            NumericField::StratigraphicLayerDepth => "stratigraphic_layer_depth",
            NumericField::FossilSize => "fossil_size",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NumericField::UraniumLeadRatio => "Uranium-Lead Ratio",
            NumericField::Carbon14Ratio => "Carbon-14 Ratio",
            NumericField::RadioactiveDecaySeries => "Radioactive Decay Series",
            NumericField::StratigraphicLayerDepth => "Stratigraphic Layer Depth",
            NumericField::FossilSize => "Fossil Size",
        }
    }

    /// Check a raw value against the slider range and snap it onto the step grid.
    pub fn validate(self, value: f64) -> Result<f64, AppError> {
        let bounds = self.bounds();
        if !bounds.contains(value) {
            return Err(AppError::config(format!(
                "{} must be within [{}, {}] (got {value}).",
                self.column(),
                bounds.format(bounds.min),
                bounds.format(bounds.max),
            )));
        }
        Ok(bounds.snap(value))
    }
}

/// A single cell of the one-row frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(&'static str),
}

impl std::fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureValue::Number(v) => write!(f, "{v}"),
            FeatureValue::Category(label) => f.write_str(label),
        }
    }
}

/// The eight-field input row handed to the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub uranium_lead_ratio: f64,
    pub carbon_14_ratio: f64,
    pub radioactive_decay_series: f64,
    pub stratigraphic_layer_depth: f64,
    pub geological_period: GeologicalPeriod,
    pub paleomagnetic_data: PaleomagneticData,
    pub stratigraphic_position: StratigraphicPosition,
    pub fossil_size: f64,
}

impl FeatureRecord {
    /// Column names in the order the model artifact expects them.
    pub const COLUMNS: [&'static str; 8] = [
        "uranium_lead_ratio",
        "carbon_14_ratio",
        "radioactive_decay_series",
        "stratigraphic_layer_depth",
        "geological_period",
        "paleomagnetic_data",
        "stratigraphic_position",
        "fossil_size",
    ];

    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::UraniumLeadRatio => self.uranium_lead_ratio,
            NumericField::Carbon14Ratio => self.carbon_14_ratio,
            NumericField::RadioactiveDecaySeries => self.radioactive_decay_series,
            NumericField::StratigraphicLayerDepth => self.stratigraphic_layer_depth,
            NumericField::FossilSize => self.fossil_size,
        }
    }

    /// `(column, value)` pairs in `COLUMNS` order.
    pub fn cells(&self) -> [(&'static str, FeatureValue); 8] {
        [
            (Self::COLUMNS[0], FeatureValue::Number(self.uranium_lead_ratio)),
            (Self::COLUMNS[1], FeatureValue::Number(self.carbon_14_ratio)),
            (Self::COLUMNS[2], FeatureValue::Number(self.radioactive_decay_series)),
            (Self::COLUMNS[3], FeatureValue::Number(self.stratigraphic_layer_depth)),
            (Self::COLUMNS[4], FeatureValue::Category(self.geological_period.label())),
            (Self::COLUMNS[5], FeatureValue::Category(self.paleomagnetic_data.label())),
            (Self::COLUMNS[6], FeatureValue::Category(self.stratigraphic_position.label())),
            (Self::COLUMNS[7], FeatureValue::Number(self.fossil_size)),
        ]
    }

    /// Every numeric field must sit inside its slider range.
    pub fn validate(&self) -> Result<(), AppError> {
        for field in NumericField::ALL {
            let value = self.numeric(field);
            if !field.bounds().contains(value) {
                return Err(AppError::config(format!(
                    "{} is outside its range (got {value}).",
                    field.column()
                )));
            }
        }
        Ok(())
    }
}

impl Default for FeatureRecord {
    /// Slider minimums and the first option of each selector.
    fn default() -> Self {
        Self {
            uranium_lead_ratio: NumericField::UraniumLeadRatio.bounds().min,
            carbon_14_ratio: NumericField::Carbon14Ratio.bounds().min,
            radioactive_decay_series: NumericField::RadioactiveDecaySeries.bounds().min,
            stratigraphic_layer_depth: NumericField::StratigraphicLayerDepth.bounds().min,
            geological_period: GeologicalPeriod::ALL[0],
            paleomagnetic_data: PaleomagneticData::ALL[0],
            stratigraphic_position: StratigraphicPosition::ALL[0],
            fossil_size: NumericField::FossilSize.bounds().min,
        }
    }
}

/// Cosmetic color scheme selected in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    LightBlue,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Default, Theme::Dark, Theme::LightBlue];

    pub fn display_name(self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::Dark => "Dark",
            Theme::LightBlue => "Light Blue",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Theme::Default => Theme::Dark,
            Theme::Dark => Theme::LightBlue,
            Theme::LightBlue => Theme::Default,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Theme::Default => Theme::LightBlue,
            Theme::Dark => Theme::Default,
            Theme::LightBlue => Theme::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_keeps_bounds_exact() {
        for field in NumericField::ALL {
            let b = field.bounds();
            assert_eq!(b.snap(b.min), b.min, "{field:?} min");
            assert_eq!(b.snap(b.max), b.max, "{field:?} max");
            assert_eq!(b.snap(b.max + 10.0), b.max);
            assert_eq!(b.snap(b.min - 10.0), b.min);
        }
    }

    #[test]
    fn snap_lands_on_step_grid() {
        let b = NumericField::StratigraphicLayerDepth.bounds();
        assert_eq!(b.snap(100.004), 100.0);
        assert_eq!(b.snap(100.006), 100.01);
        assert_eq!(b.offset(0.13, 1), 0.14);
        assert_eq!(b.offset(494.19, 5), 494.2);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(NumericField::UraniumLeadRatio.validate(1.6).is_err());
        assert!(NumericField::FossilSize.validate(f64::NAN).is_err());
        assert_eq!(NumericField::Carbon14Ratio.validate(0.5).unwrap(), 0.5);
    }

    #[test]
    fn columns_follow_artifact_order() {
        let record = FeatureRecord::default();
        let names: Vec<&str> = record.cells().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, FeatureRecord::COLUMNS);
        assert_eq!(names[5], "paleomagnetic_data");
        assert_eq!(names[6], "stratigraphic_position");
    }

    #[test]
    fn default_record_uses_first_options_and_minimums() {
        let record = FeatureRecord::default();
        assert_eq!(record.geological_period, GeologicalPeriod::Cretaceous);
        assert_eq!(record.stratigraphic_position, StratigraphicPosition::Middle);
        assert_eq!(record.paleomagnetic_data, PaleomagneticData::NormalPolarity);
        assert_eq!(record.uranium_lead_ratio, 0.000241);
        assert_eq!(record.fossil_size, 0.13);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn categorical_labels_serialize_as_display_strings() {
        let json = serde_json::to_value(PaleomagneticData::ReversedPolarity).unwrap();
        assert_eq!(json, serde_json::json!("Reversed polarity"));
        assert_eq!(GeologicalPeriod::ALL.len(), 11);
    }

    #[test]
    fn theme_cycles_through_all_options() {
        let mut theme = Theme::Default;
        for _ in 0..Theme::ALL.len() {
            theme = theme.next();
        }
        assert_eq!(theme, Theme::Default);
        assert_eq!(Theme::Default.prev(), Theme::LightBlue);
    }
}
