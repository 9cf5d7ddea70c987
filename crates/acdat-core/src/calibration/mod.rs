//! Counting-rate and photon-flux calibration of the raw AC counts.

use crate::numerics::{clamp_negative_to_zero, powf_each_nan_to_zero};
use crate::record::{InstrumentRecord, SampleSeries, prefix};

/// Photon count per unit UV power, energy in eV.
pub const PHOTON_CONVERSION_FACTOR: f64 = 0.625;
/// Reference energy (eV) at which `uvIntensity59` is measured.
pub const REFERENCE_ENERGY_EV: f64 = 5.9;

const SENSITIVITY_EXPONENT_NUMERATOR: f64 = 0.13571;
const SENSITIVITY_EXPONENT_SLOPE: f64 = 0.0028;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalibratedYield {
    pub counting_correction: Vec<f64>,
    pub photon_correction: Vec<f64>,
    /// Yield per photon, negatives clipped to zero.
    pub pyield: Vec<f64>,
    /// `pyield ^ powerNumber` with NaN replaced by zero.
    pub npyield: Vec<f64>,
}

impl CalibratedYield {
    pub fn len(&self) -> usize {
        self.pyield.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pyield.is_empty()
    }

    pub fn truncated(&self, len: usize) -> Self {
        Self {
            counting_correction: prefix(&self.counting_correction, len),
            photon_correction: prefix(&self.photon_correction, len),
            pyield: prefix(&self.pyield, len),
            npyield: prefix(&self.npyield, len),
        }
    }
}

pub fn calibrate(record: &InstrumentRecord, series: &SampleSeries) -> CalibratedYield {
    let counting_correction = counting_rate_correction(record, &series.counting_rate);
    let photon_correction =
        photon_flux_correction(record.uv_intensity59, &series.uv_intensity, &series.uv_energy);
    let pyield = photoemission_yield(&counting_correction, &photon_correction);
    let npyield = powf_each_nan_to_zero(&pyield, record.power_number);

    tracing::debug!(
        model = %record.model,
        samples = pyield.len(),
        "calibrated counting rate and photon flux"
    );

    CalibratedYield {
        counting_correction,
        photon_correction,
        pyield,
        npyield,
    }
}

/// Dead-time and sensitivity correction with the background rate subtracted.
///
/// AC-2 and AC-3 counts are returned unchanged.
pub fn counting_rate_correction(record: &InstrumentRecord, counting_rate: &[f64]) -> Vec<f64> {
    if !record.model.needs_dead_time_correction() {
        return counting_rate.to_vec();
    }

    let background = corrected_rate(
        record.bg_counting_rate,
        record.dead_time,
        record.sensitivity1,
    );
    counting_rate
        .iter()
        .map(|&rate| corrected_rate(rate, record.dead_time, record.sensitivity1) - background)
        .collect()
}

fn corrected_rate(rate: f64, dead_time: f64, sensitivity: f64) -> f64 {
    let dead_time_term = rate / (1.0 - dead_time * rate);
    let sensitivity_term = (SENSITIVITY_EXPONENT_NUMERATOR
        / (1.0 - SENSITIVITY_EXPONENT_SLOPE * rate))
        .exp()
        * sensitivity;
    dead_time_term * sensitivity_term
}

/// Photon count at each energy relative to the photon count at the 5.9 eV reference.
pub fn photon_flux_correction(
    uv_intensity59: f64,
    uv_intensity: &[f64],
    uv_energy: &[f64],
) -> Vec<f64> {
    let unit_photon = uv_intensity59 * PHOTON_CONVERSION_FACTOR / REFERENCE_ENERGY_EV;
    uv_intensity
        .iter()
        .zip(uv_energy)
        .map(|(&intensity, &energy)| PHOTON_CONVERSION_FACTOR * (intensity / energy) / unit_photon)
        .collect()
}

pub fn photoemission_yield(counting_correction: &[f64], photon_correction: &[f64]) -> Vec<f64> {
    clamp_negative_to_zero(
        counting_correction
            .iter()
            .zip(photon_correction)
            .map(|(&counts, &photons)| counts / photons),
    )
}
