use super::ExportRecord;
use crate::threshold::ThresholdEstimate;

/// Y-axis label for a yield raised to `power_number`.
pub fn yield_axis_label(power_number: f64) -> String {
    if 0.49 < power_number && power_number < 0.51 {
        "PYS^{1/2}".to_string()
    } else if 0.3 < power_number && power_number < 0.35 {
        "PYS^{1/3}".to_string()
    } else {
        format!("PYS^{power_number:.2}")
    }
}

/// Everything a renderer needs to draw one yield spectrum, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotView<'a> {
    pub title: &'a str,
    pub energy: &'a [f64],
    pub npyield: &'a [f64],
    pub guideline: &'a [f64],
    pub estimate: Option<ThresholdEstimate>,
    pub power_number: f64,
    pub uv_intensity59: f64,
}

impl<'a> PlotView<'a> {
    pub fn new(record: &'a ExportRecord) -> Self {
        Self {
            title: &record.record.sample_name,
            energy: &record.series().uv_energy,
            npyield: &record.calibrated().npyield,
            guideline: &record.analysis().guideline,
            estimate: record.estimate(),
            power_number: record.record.power_number,
            uv_intensity59: record.record.uv_intensity59,
        }
    }

    pub fn y_label(&self) -> String {
        yield_axis_label(self.power_number)
    }

    pub fn legend_title(&self) -> String {
        format!("Power {:.2}nW", self.uv_intensity59)
    }

    /// Guideline legend entry, present only when a threshold was fitted.
    pub fn threshold_label(&self) -> Option<String> {
        self.estimate.map(|estimate| {
            format!(
                "User\nThreshold: {:.2}eV\nSlope:{:.2}",
                estimate.threshold_energy, estimate.slope
            )
        })
    }

    /// Height of the threshold annotation, 30% of the highest powered yield.
    pub fn annotation_height(&self) -> f64 {
        let max = self
            .npyield
            .iter()
            .copied()
            .filter(|value| !value.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);
        if max.is_finite() { max * 0.3 } else { 0.0 }
    }
}
