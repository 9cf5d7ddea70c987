//! Ordered metadata assembly and the JSON/CSV/plot views of a converted record.

mod json;
mod plot;
mod table;

pub use json::{render_json, write_json};
pub use plot::{PlotView, yield_axis_label};
pub use table::{CsvColumns, render_csv, write_csv};
pub(crate) use table::write_csv_file;

use crate::calibration::CalibratedYield;
use crate::record::{InstrumentRecord, SampleSeries};
use crate::threshold::{ThresholdAnalysis, ThresholdEstimate};
use crate::trim::SeriesBundle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const HEADER_KEYS: [&str; 19] = [
    "fileType",
    "deadTime",
    "countingTime",
    "powerNumber",
    "anodeVoltage",
    "step",
    "model",
    "yAxisMaximum",
    "startEnergy",
    "finishEnergy",
    "flagDifDataGroundLevel",
    "bgCountingRate",
    "measureDate",
    "sampleName",
    "uvIntensity59",
    "targetUv",
    "nameLightCorrection",
    "sensitivity1",
    "sensitivity2",
];

pub const ESTIMATE_KEYS: [&str; 4] = ["thresholdEnergy", "slope", "yslice", "bg"];

pub const FILE_NAME_KEY: &str = "file_name";

/// How non-finite floats are written, since JSON has no NaN literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NanEncoding {
    #[default]
    Null,
    /// `"NaN"`, `"Infinity"` or `"-Infinity"`.
    String,
}

impl NanEncoding {
    pub fn encode(self, value: f64) -> Value {
        if let Some(number) = serde_json::Number::from_f64(value) {
            return Value::Number(number);
        }
        match self {
            Self::Null => Value::Null,
            Self::String if value.is_nan() => Value::from("NaN"),
            Self::String if value > 0.0 => Value::from("Infinity"),
            Self::String => Value::from("-Infinity"),
        }
    }

    fn encode_all(self, values: &[f64]) -> Value {
        Value::Array(values.iter().map(|&value| self.encode(value)).collect())
    }
}

/// The per-sample arrays in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculatedColumn {
    UvEnergy,
    CountingCorrection,
    PhotonCorrection,
    Pyield,
    Npyield,
    Nayield,
    Guideline,
    CountingRate,
    FlGrandLevel,
    FlRegLevel,
    UvIntensity,
}

impl CalculatedColumn {
    pub const ALL: [Self; 11] = [
        Self::UvEnergy,
        Self::CountingCorrection,
        Self::PhotonCorrection,
        Self::Pyield,
        Self::Npyield,
        Self::Nayield,
        Self::Guideline,
        Self::CountingRate,
        Self::FlGrandLevel,
        Self::FlRegLevel,
        Self::UvIntensity,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::UvEnergy => "uvEnergy",
            Self::CountingCorrection => "countingCorrection",
            Self::PhotonCorrection => "photonCorrection",
            Self::Pyield => "pyield",
            Self::Npyield => "npyield",
            Self::Nayield => "nayield",
            Self::Guideline => "guideline",
            Self::CountingRate => "countingRate",
            Self::FlGrandLevel => "flGrandLevel",
            Self::FlRegLevel => "flRegLevel",
            Self::UvIntensity => "uvIntensity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnValues<'a> {
    Float(&'a [f64]),
    Integer(&'a [i64]),
}

/// A fully converted `.dat` file, ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub record: InstrumentRecord,
    pub bundle: SeriesBundle,
    /// Source base name including its extension.
    pub file_name: String,
}

impl ExportRecord {
    pub fn new(record: InstrumentRecord, bundle: SeriesBundle, file_name: impl Into<String>) -> Self {
        Self {
            record,
            bundle,
            file_name: file_name.into(),
        }
    }

    pub fn series(&self) -> &SampleSeries {
        &self.bundle.series
    }

    pub fn calibrated(&self) -> &CalibratedYield {
        &self.bundle.calibrated
    }

    pub fn analysis(&self) -> &ThresholdAnalysis {
        &self.bundle.analysis
    }

    pub fn estimate(&self) -> Option<ThresholdEstimate> {
        self.bundle.analysis.estimate
    }

    pub fn len(&self) -> usize {
        self.bundle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundle.is_empty()
    }

    pub fn column(&self, column: CalculatedColumn) -> ColumnValues<'_> {
        let series = &self.bundle.series;
        let calibrated = &self.bundle.calibrated;
        let analysis = &self.bundle.analysis;
        match column {
            CalculatedColumn::UvEnergy => ColumnValues::Float(&series.uv_energy),
            CalculatedColumn::CountingCorrection => {
                ColumnValues::Float(&calibrated.counting_correction)
            }
            CalculatedColumn::PhotonCorrection => ColumnValues::Float(&calibrated.photon_correction),
            CalculatedColumn::Pyield => ColumnValues::Float(&calibrated.pyield),
            CalculatedColumn::Npyield => ColumnValues::Float(&calibrated.npyield),
            CalculatedColumn::Nayield => ColumnValues::Float(&analysis.nayield),
            CalculatedColumn::Guideline => ColumnValues::Float(&analysis.guideline),
            CalculatedColumn::CountingRate => ColumnValues::Float(&series.counting_rate),
            CalculatedColumn::FlGrandLevel => ColumnValues::Integer(&series.fl_grand_level),
            CalculatedColumn::FlRegLevel => ColumnValues::Integer(&series.fl_reg_level),
            CalculatedColumn::UvIntensity => ColumnValues::Float(&series.uv_intensity),
        }
    }

    /// Header, calculated arrays, threshold estimate and file name, in that order.
    pub fn metadata(&self, nan: NanEncoding) -> Map<String, Value> {
        let mut metadata = self.header_entries(nan);
        for column in CalculatedColumn::ALL {
            let value = match self.column(column) {
                ColumnValues::Float(values) => nan.encode_all(values),
                ColumnValues::Integer(values) => Value::from(values.to_vec()),
            };
            metadata.insert(column.key().to_string(), value);
        }
        self.append_trailer(&mut metadata, nan);
        metadata
    }

    /// [`Self::metadata`] without the per-sample arrays.
    pub fn metadata_without_calculated(&self, nan: NanEncoding) -> Map<String, Value> {
        let mut metadata = self.header_entries(nan);
        self.append_trailer(&mut metadata, nan);
        metadata
    }

    fn header_entries(&self, nan: NanEncoding) -> Map<String, Value> {
        let record = &self.record;
        let values = [
            Value::from(record.file_type.as_str()),
            nan.encode(record.dead_time),
            nan.encode(record.counting_time),
            nan.encode(record.power_number),
            nan.encode(record.anode_voltage),
            nan.encode(record.step),
            Value::from(record.model.as_str()),
            nan.encode(record.y_axis_maximum),
            nan.encode(record.start_energy),
            nan.encode(record.finish_energy),
            Value::from(record.flag_dif_data_ground_level),
            nan.encode(record.bg_counting_rate),
            Value::from(record.measure_date.as_str()),
            Value::from(record.sample_name.as_str()),
            nan.encode(record.uv_intensity59),
            nan.encode(record.target_uv),
            Value::from(record.name_light_correction.as_str()),
            nan.encode(record.sensitivity1),
            nan.encode(record.sensitivity2),
        ];
        HEADER_KEYS
            .iter()
            .zip(values)
            .map(|(key, value)| ((*key).to_string(), value))
            .collect()
    }

    fn append_trailer(&self, metadata: &mut Map<String, Value>, nan: NanEncoding) {
        let estimate = self.estimate().unwrap_or(ThresholdEstimate::NAN);
        let values = [
            estimate.threshold_energy,
            estimate.slope,
            estimate.y_intercept,
            estimate.background_level,
        ];
        for (key, value) in ESTIMATE_KEYS.iter().zip(values) {
            metadata.insert((*key).to_string(), nan.encode(value));
        }
        metadata.insert(
            FILE_NAME_KEY.to_string(),
            Value::from(self.file_name.as_str()),
        );
    }

    pub fn plot_view(&self) -> PlotView<'_> {
        PlotView::new(self)
    }
}
