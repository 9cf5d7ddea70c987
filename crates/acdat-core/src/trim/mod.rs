//! Truncation of the calibrated arrays at the energy and detector-saturation ceilings.

use crate::calibration::CalibratedYield;
use crate::domain::InstrumentModel;
use crate::record::SampleSeries;
use crate::threshold::ThresholdAnalysis;
use serde::{Deserialize, Serialize};

/// Light-intensity correction is unreliable above this photon energy (eV).
pub const DEFAULT_ENERGY_CEILING_EV: f64 = 6.8;

/// What a ceiling does when no sample reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CeilingFallback {
    /// Keep every sample.
    #[default]
    KeepAll,
    /// Treat the cut index as 0, as the first AC converters did: the energy
    /// ceiling keeps one sample and the saturation ceiling keeps none.
    LegacyArgmax,
}

/// Every per-sample array of one conversion, kept at a common length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesBundle {
    pub series: SampleSeries,
    pub calibrated: CalibratedYield,
    pub analysis: ThresholdAnalysis,
}

impl SeriesBundle {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn truncated(&self, len: usize) -> Self {
        Self {
            series: self.series.truncated(len),
            calibrated: self.calibrated.truncated(len),
            analysis: self.analysis.truncated(len),
        }
    }
}

fn first_reaching(values: &[f64], limit: f64) -> Option<usize> {
    values.iter().position(|&value| value >= limit)
}

/// Keeps samples up to and including the first energy at or above `ceiling`.
pub fn trim_energy_ceiling(
    bundle: &SeriesBundle,
    ceiling: f64,
    fallback: CeilingFallback,
) -> SeriesBundle {
    let len = match first_reaching(&bundle.series.uv_energy, ceiling) {
        Some(index) => index + 1,
        None => match fallback {
            CeilingFallback::KeepAll => bundle.len(),
            CeilingFallback::LegacyArgmax => 1,
        },
    };
    tracing::debug!(ceiling, kept = len, of = bundle.len(), "energy ceiling applied");
    bundle.truncated(len)
}

/// Keeps samples strictly before the first corrected count at or above the model limit.
pub fn trim_saturation_ceiling(
    bundle: &SeriesBundle,
    model: &InstrumentModel,
    fallback: CeilingFallback,
) -> SeriesBundle {
    let limit = model.saturation_limit();
    let len = match first_reaching(&bundle.calibrated.counting_correction, limit) {
        Some(index) => index,
        None => match fallback {
            CeilingFallback::KeepAll => bundle.len(),
            CeilingFallback::LegacyArgmax => 0,
        },
    };
    tracing::debug!(limit, kept = len, of = bundle.len(), "saturation ceiling applied");
    bundle.truncated(len)
}

/// Energy ceiling first, then saturation within the remaining window.
pub fn trim_ranges(
    bundle: &SeriesBundle,
    model: &InstrumentModel,
    energy_ceiling: f64,
    fallback: CeilingFallback,
) -> SeriesBundle {
    let energy_trimmed = trim_energy_ceiling(bundle, energy_ceiling, fallback);
    trim_saturation_ceiling(&energy_trimmed, model, fallback)
}
