use crate::domain::InstrumentModel;

/// How the background level enters the threshold fit, from `flagDifDataGroundLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    /// Flag `-1`: subtract the background average before powering and fitting.
    SubtractAverage,
    /// Any other flag: fit the powered yield as measured.
    AsMeasured,
}

impl BackgroundMode {
    pub const fn from_flag(flag: i64) -> Self {
        if flag == -1 {
            Self::SubtractAverage
        } else {
            Self::AsMeasured
        }
    }
}

/// Header of an AC `.dat` file (rows 0-2).
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRecord {
    pub file_type: String,
    pub dead_time: f64,
    pub counting_time: f64,
    pub power_number: f64,
    pub anode_voltage: f64,
    pub step: f64,
    pub model: InstrumentModel,
    pub y_axis_maximum: f64,
    pub start_energy: f64,
    pub finish_energy: f64,
    pub flag_dif_data_ground_level: i64,
    pub bg_counting_rate: f64,
    pub measure_date: String,
    pub sample_name: String,
    pub uv_intensity59: f64,
    pub target_uv: f64,
    pub name_light_correction: String,
    pub sensitivity1: f64,
    pub sensitivity2: f64,
}

impl InstrumentRecord {
    pub const fn background_mode(&self) -> BackgroundMode {
        BackgroundMode::from_flag(self.flag_dif_data_ground_level)
    }
}

/// Body rows of an AC `.dat` file, one entry per energy step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSeries {
    pub uv_energy: Vec<f64>,
    pub counting_rate: Vec<f64>,
    pub fl_grand_level: Vec<i64>,
    pub fl_reg_level: Vec<i64>,
    pub uv_intensity: Vec<f64>,
}

impl SampleSeries {
    pub fn len(&self) -> usize {
        self.uv_energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uv_energy.is_empty()
    }

    /// Rows flagged `-1` in the ground-level column.
    pub fn background_indices(&self) -> Vec<usize> {
        flagged_indices(&self.fl_grand_level)
    }

    /// Rows flagged `-1` in the regression-level column.
    pub fn regression_indices(&self) -> Vec<usize> {
        flagged_indices(&self.fl_reg_level)
    }

    pub fn truncated(&self, len: usize) -> Self {
        Self {
            uv_energy: prefix(&self.uv_energy, len),
            counting_rate: prefix(&self.counting_rate, len),
            fl_grand_level: prefix(&self.fl_grand_level, len),
            fl_reg_level: prefix(&self.fl_reg_level, len),
            uv_intensity: prefix(&self.uv_intensity, len),
        }
    }
}

fn flagged_indices(levels: &[i64]) -> Vec<usize> {
    levels
        .iter()
        .enumerate()
        .filter(|(_, level)| **level == -1)
        .map(|(index, _)| index)
        .collect()
}

pub(crate) fn prefix<T: Clone>(values: &[T], len: usize) -> Vec<T> {
    values[..len.min(values.len())].to_vec()
}
