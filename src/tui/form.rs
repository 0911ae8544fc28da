//! Form state behind the TUI: control values, focus, and the prediction phase.
//!
//! Kept free of terminal types so the controller logic is testable on its own.

use crate::app::prediction::{PredictionReport, run_prediction};
use crate::domain::{
    FeatureRecord, GeologicalPeriod, NumericField, PaleomagneticData, StratigraphicPosition, Theme,
};
use crate::models::Predictor;
use crate::report::SUCCESS_MESSAGE;

/// Focusable controls, in tab order (sidebar first, trigger button last).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Theme,
    Slider(NumericField),
    Period,
    Position,
    Polarity,
    Predict,
}

pub const CONTROLS: [Control; 10] = [
    Control::Theme,
    Control::Slider(NumericField::UraniumLeadRatio),
    Control::Slider(NumericField::Carbon14Ratio),
    Control::Slider(NumericField::RadioactiveDecaySeries),
    Control::Slider(NumericField::StratigraphicLayerDepth),
    Control::Period,
    Control::Position,
    Control::Polarity,
    Control::Slider(NumericField::FossilSize),
    Control::Predict,
];

/// What the result area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    AwaitingInput,
    ShowingPrediction(PredictionReport),
    /// The last trigger errored; nothing but the error is rendered.
    Failed(String),
}

/// Raw control values. Sliders hold numbers, selectors hold option indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlValues {
    sliders: [f64; 5],
    period: usize,
    position: usize,
    polarity: usize,
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            sliders: NumericField::ALL.map(|f| f.bounds().min),
            period: 0,
            position: 0,
            polarity: 0,
        }
    }
}

impl ControlValues {
    fn slot(field: NumericField) -> usize {
        NumericField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default()
    }

    pub fn slider(&self, field: NumericField) -> f64 {
        self.sliders[Self::slot(field)]
    }

    /// Set a slider; the value is clamped and snapped to the slider's grid.
    pub fn set_slider(&mut self, field: NumericField, value: f64) {
        self.sliders[Self::slot(field)] = field.bounds().snap(value);
    }

    pub fn period(&self) -> GeologicalPeriod {
        GeologicalPeriod::ALL[self.period]
    }

    pub fn position(&self) -> StratigraphicPosition {
        StratigraphicPosition::ALL[self.position]
    }

    pub fn polarity(&self) -> PaleomagneticData {
        PaleomagneticData::ALL[self.polarity]
    }

    /// Assemble the record the trigger will submit.
    pub fn record(&self) -> FeatureRecord {
        FeatureRecord {
            uranium_lead_ratio: self.slider(NumericField::UraniumLeadRatio),
            carbon_14_ratio: self.slider(NumericField::Carbon14Ratio),
            radioactive_decay_series: self.slider(NumericField::RadioactiveDecaySeries),
            stratigraphic_layer_depth: self.slider(NumericField::StratigraphicLayerDepth),
            geological_period: self.period(),
            paleomagnetic_data: self.polarity(),
            stratigraphic_position: self.position(),
            fossil_size: self.slider(NumericField::FossilSize),
        }
    }
}

fn cycle(index: usize, len: usize, delta: i64) -> usize {
    (index as i64 + delta).rem_euclid(len as i64) as usize
}

pub struct FormState {
    pub theme: Theme,
    pub values: ControlValues,
    pub focus: usize,
    /// Text buffer while typing a slider value.
    pub entry: Option<String>,
    pub phase: Phase,
    pub status: String,
}

impl FormState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            values: ControlValues::default(),
            focus: 0,
            entry: None,
            phase: Phase::AwaitingInput,
            status: String::new(),
        }
    }

    pub fn focused(&self) -> Control {
        CONTROLS[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1).min(CONTROLS.len() - 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub fn focus_control(&mut self, control: Control) {
        if let Some(idx) = CONTROLS.iter().position(|c| *c == control) {
            self.focus = idx;
        }
    }

    /// Any input change invalidates the shown result; only the trigger predicts.
    fn changed(&mut self) {
        self.phase = Phase::AwaitingInput;
    }

    /// Step the focused control: slider by `delta` grid steps, selectors by
    /// `delta.signum()` options (wrapping).
    pub fn adjust(&mut self, delta: i64) {
        let before = self.snapshot();
        match self.focused() {
            Control::Theme => {
                self.theme = if delta >= 0 {
                    self.theme.next()
                } else {
                    self.theme.prev()
                };
                self.status = format!("theme: {}", self.theme.display_name());
            }
            Control::Slider(field) => {
                let next = field.bounds().offset(self.values.slider(field), delta);
                self.values.set_slider(field, next);
            }
            Control::Period => {
                self.values.period =
                    cycle(self.values.period, GeologicalPeriod::ALL.len(), delta.signum());
            }
            Control::Position => {
                self.values.position = cycle(
                    self.values.position,
                    StratigraphicPosition::ALL.len(),
                    delta.signum(),
                );
            }
            Control::Polarity => {
                self.values.polarity =
                    cycle(self.values.polarity, PaleomagneticData::ALL.len(), delta.signum());
            }
            Control::Predict => {}
        }
        if self.snapshot() != before {
            self.changed();
        }
    }

    /// Move the focused slider by ~1% of its range.
    pub fn adjust_coarse(&mut self, direction: i64) {
        if let Control::Slider(field) = self.focused() {
            self.adjust(direction.signum() * field.bounds().coarse_steps());
        }
    }

    /// Jump the focused slider to its min (`to_max == false`) or max.
    pub fn jump(&mut self, to_max: bool) {
        if let Control::Slider(field) = self.focused() {
            let bounds = field.bounds();
            let target = if to_max { bounds.max } else { bounds.min };
            if self.values.slider(field) != target {
                self.values.set_slider(field, target);
                self.changed();
            }
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("theme: {}", self.theme.display_name());
        self.changed();
    }

    fn snapshot(&self) -> (Theme, ControlValues) {
        (self.theme, self.values.clone())
    }

    pub fn begin_entry(&mut self) {
        if let Control::Slider(field) = self.focused() {
            let bounds = field.bounds();
            self.entry = Some(bounds.format(self.values.slider(field)));
            self.status = format!(
                "Enter {} in [{}, {}]. Enter to apply, Esc to cancel.",
                field.label(),
                bounds.format(bounds.min),
                bounds.format(bounds.max)
            );
        }
    }

    pub fn entry_push(&mut self, c: char) {
        if let Some(buf) = &mut self.entry {
            if c.is_ascii_digit() || c == '.' || c == '-' || c == 'e' || c == 'E' {
                buf.push(c);
            }
        }
    }

    pub fn entry_backspace(&mut self) {
        if let Some(buf) = &mut self.entry {
            buf.pop();
        }
    }

    pub fn cancel_entry(&mut self) {
        self.entry = None;
        self.status = "Edit canceled.".to_string();
    }

    /// Apply the typed value. Unparsable or out-of-range text leaves the slider as it was.
    pub fn commit_entry(&mut self) {
        let Some(buf) = self.entry.take() else {
            return;
        };
        let Control::Slider(field) = self.focused() else {
            return;
        };

        let raw = buf.trim();
        let value = match raw.parse::<f64>() {
            Ok(v) => v,
            Err(e) => {
                self.status = format!("Invalid number '{raw}': {e}");
                return;
            }
        };
        match field.validate(value) {
            Ok(v) => {
                if self.values.slider(field) != v {
                    self.values.set_slider(field, v);
                    self.changed();
                }
                self.status = format!("{}: {}", field.label(), field.bounds().format(v));
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Run one inference cycle on the current control values.
    ///
    /// Returns `true` when a prediction is now showing.
    pub fn trigger(&mut self, predictor: &dyn Predictor) -> bool {
        let record = self.values.record();
        match run_prediction(predictor, &record) {
            Ok(report) => {
                self.status = SUCCESS_MESSAGE.to_string();
                self.phase = Phase::ShowingPrediction(report);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "prediction aborted");
                self.status = "Prediction failed.".to_string();
                self.phase = Phase::Failed(err.to_string());
                false
            }
        }
    }

    pub fn last_report(&self) -> Option<&PredictionReport> {
        match &self.phase {
            Phase::ShowingPrediction(report) => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::prediction::tests::RecordingPredictor;

    fn focus_slider(form: &mut FormState, field: NumericField) {
        form.focus_control(Control::Slider(field));
    }

    #[test]
    fn record_mirrors_slider_values_exactly() {
        let mut form = FormState::new(Theme::Default);
        for field in NumericField::ALL {
            let b = field.bounds();
            for value in [b.min, b.max, b.snap((b.min + b.max) / 2.0)] {
                form.values.set_slider(field, value);
                assert_eq!(form.values.slider(field), value);
                assert_eq!(form.values.record().numeric(field), value);
            }
        }
    }

    #[test]
    fn selectors_wrap_within_their_option_sets() {
        let mut form = FormState::new(Theme::Default);
        form.focus_control(Control::Period);
        for _ in 0..GeologicalPeriod::ALL.len() * 2 + 3 {
            form.adjust(1);
            assert!(GeologicalPeriod::ALL.contains(&form.values.record().geological_period));
        }
        form.focus_control(Control::Position);
        form.adjust(-1);
        assert_eq!(form.values.position(), StratigraphicPosition::Bottom);
        form.focus_control(Control::Polarity);
        form.adjust(1);
        form.adjust(1);
        assert_eq!(form.values.polarity(), PaleomagneticData::NormalPolarity);
    }

    #[test]
    fn sliders_cannot_leave_their_range() {
        let mut form = FormState::new(Theme::Default);
        focus_slider(&mut form, NumericField::UraniumLeadRatio);
        form.adjust(-5);
        assert_eq!(form.values.slider(NumericField::UraniumLeadRatio), 0.000241);
        form.jump(true);
        form.adjust_coarse(1);
        assert_eq!(form.values.slider(NumericField::UraniumLeadRatio), 1.533270);
    }

    #[test]
    fn boundary_values_predict_without_error() {
        let predictor = RecordingPredictor::returning(vec![5000.0]);
        let mut form = FormState::new(Theme::Default);
        for field in NumericField::ALL {
            focus_slider(&mut form, field);
            form.jump(false);
        }
        assert!(form.trigger(&predictor));
        for field in NumericField::ALL {
            focus_slider(&mut form, field);
            form.jump(true);
        }
        assert!(form.trigger(&predictor));
        let calls = predictor.calls.lock().unwrap();
        assert_eq!(calls[0][0].uranium_lead_ratio, 0.000241);
        assert_eq!(calls[1][0].uranium_lead_ratio, 1.533270);
    }

    #[test]
    fn only_the_trigger_invokes_the_predictor() {
        let predictor = RecordingPredictor::returning(vec![1.0]);
        let mut form = FormState::new(Theme::Default);
        for idx in 0..CONTROLS.len() {
            form.focus = idx;
            form.adjust(1);
            form.adjust_coarse(1);
        }
        form.cycle_theme();
        assert_eq!(predictor.call_count(), 0);
        form.trigger(&predictor);
        assert_eq!(predictor.call_count(), 1);
    }

    #[test]
    fn input_change_clears_the_shown_prediction() {
        let predictor = RecordingPredictor::returning(vec![42.9]);
        let mut form = FormState::new(Theme::Default);
        assert!(form.trigger(&predictor));
        assert_eq!(form.last_report().map(|r| r.age_years), Some(42));

        focus_slider(&mut form, NumericField::FossilSize);
        form.adjust(1);
        assert_eq!(form.phase, Phase::AwaitingInput);
    }

    #[test]
    fn failed_prediction_shows_only_the_error() {
        let predictor = RecordingPredictor::failing("unknown category");
        let mut form = FormState::new(Theme::Default);
        assert!(!form.trigger(&predictor));
        assert!(form.last_report().is_none());
        match &form.phase {
            Phase::Failed(msg) => assert!(msg.contains("unknown category")),
            other => panic!("unexpected phase {other:?}"),
        }
        assert_ne!(form.status, SUCCESS_MESSAGE);
    }

    #[test]
    fn typed_entry_is_validated_before_it_lands() {
        let mut form = FormState::new(Theme::Default);
        focus_slider(&mut form, NumericField::StratigraphicLayerDepth);

        form.begin_entry();
        form.entry = Some(String::new());
        for c in "600".chars() {
            form.entry_push(c);
        }
        form.commit_entry();
        assert_eq!(form.values.slider(NumericField::StratigraphicLayerDepth), 0.13);

        form.begin_entry();
        form.entry = Some("100.004".to_string());
        form.commit_entry();
        assert_eq!(form.values.slider(NumericField::StratigraphicLayerDepth), 100.0);
        assert!(form.entry.is_none());
    }

    #[test]
    fn entry_only_opens_on_sliders() {
        let mut form = FormState::new(Theme::Default);
        form.focus_control(Control::Predict);
        form.begin_entry();
        assert!(form.entry.is_none());
    }
}
