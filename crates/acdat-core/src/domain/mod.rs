pub mod errors;

pub use errors::{
    AcdatError, AcdatErrorCategory, AcdatResult, ExportResult, ParserResult,
};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Instrument family recorded in the `.dat` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstrumentModel {
    Ac2,
    Ac3,
    Ac5,
    Ac2s,
    Other(String),
}

impl InstrumentModel {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "AC-2" => Self::Ac2,
            "AC-3" => Self::Ac3,
            "AC-5" => Self::Ac5,
            "AC-2S" => Self::Ac2s,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ac2 => "AC-2",
            Self::Ac3 => "AC-3",
            Self::Ac5 => "AC-5",
            Self::Ac2s => "AC-2S",
            Self::Other(label) => label,
        }
    }

    /// AC-2 and AC-3 detectors report counts that need no dead-time correction.
    pub const fn needs_dead_time_correction(&self) -> bool {
        !matches!(self, Self::Ac2 | Self::Ac3)
    }

    /// Corrected count rate (cps) at which the detector overflows.
    pub const fn saturation_limit(&self) -> f64 {
        match self {
            Self::Ac2 | Self::Ac3 => 2000.0,
            _ => 4000.0,
        }
    }
}

impl Display for InstrumentModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConverterVariant {
    #[default]
    Standard,
    /// Drops rows above the energy ceiling and from the first saturated count on.
    Advanced,
}

impl ConverterVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Advanced => "advanced",
        }
    }

    pub const fn applies_range_trimming(self) -> bool {
        matches!(self, Self::Advanced)
    }
}

impl Display for ConverterVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
}

impl ConversionRequest {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            formats: vec![ExportFormat::Json, ExportFormat::Csv],
        }
    }

    pub fn with_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// File stem shared by every artifact written for this request.
    pub fn output_stem(&self) -> String {
        self.input_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub path: PathBuf,
}

impl ExportArtifact {
    pub fn new(format: ExportFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            path: path.into(),
        }
    }
}
