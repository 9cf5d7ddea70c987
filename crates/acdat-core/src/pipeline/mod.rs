//! Parse, calibrate, estimate and optionally trim one `.dat` file.

mod config;
mod converter;

pub use config::{PipelineConfig, PipelineConfigError, load_pipeline_config};
pub use converter::{AcConverter, ConversionOutcome, Converter};

use crate::calibration::calibrate;
use crate::domain::{AcdatError, AcdatResult};
use crate::export::ExportRecord;
use crate::record::parse_record_bytes;
use crate::threshold::estimate_threshold;
use crate::trim::{SeriesBundle, trim_ranges};
use std::fs;
use std::path::Path;

/// Runs every stage on the raw bytes of a file called `file_name`.
pub fn convert_bytes(
    file_name: &str,
    bytes: &[u8],
    config: &PipelineConfig,
) -> AcdatResult<ExportRecord> {
    let parsed = parse_record_bytes(bytes).map_err(|error| error.with_source_name(file_name))?;
    let record = parsed.record;
    let series = parsed.series;
    tracing::debug!(
        file_name,
        encoding = %parsed.encoding,
        model = %record.model,
        samples = series.len(),
        "parsed AC record"
    );

    let calibrated = calibrate(&record, &series);
    let analysis = estimate_threshold(
        &series,
        &calibrated.pyield,
        &calibrated.npyield,
        record.power_number,
        record.background_mode(),
    );
    if analysis.estimate.is_none() {
        tracing::debug!(file_name, "no threshold estimate");
    }

    let mut bundle = SeriesBundle {
        series,
        calibrated,
        analysis,
    };
    if config.apply_range_trimming {
        bundle = trim_ranges(
            &bundle,
            &record.model,
            config.energy_ceiling,
            config.ceiling_fallback,
        );
    }

    Ok(ExportRecord::new(record, bundle, file_name))
}

pub fn convert_path(path: &Path, config: &PipelineConfig) -> AcdatResult<ExportRecord> {
    let bytes = fs::read(path).map_err(|source| {
        AcdatError::io_system(
            "IO.INPUT_READ",
            format!("failed to read '{}': {source}", path.display()),
        )
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    convert_bytes(&file_name, &bytes, config)
}
