use super::{PipelineConfig, convert_path};
use crate::domain::{
    AcdatError, AcdatResult, ConversionRequest, ExportArtifact, ExportFormat,
};
use crate::export::{ExportRecord, write_csv_file, write_json};
use std::fs;

pub trait Converter {
    fn execute(&self, request: &ConversionRequest) -> AcdatResult<Vec<ExportArtifact>>;
}

/// The converted record together with the files written for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub record: ExportRecord,
    pub artifacts: Vec<ExportArtifact>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AcConverter {
    pub config: PipelineConfig,
}

impl AcConverter {
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, request: &ConversionRequest) -> AcdatResult<ConversionOutcome> {
        let record = convert_path(&request.input_path, &self.config)?;

        fs::create_dir_all(&request.output_dir).map_err(|source| {
            AcdatError::io_system(
                "IO.OUTPUT_DIRECTORY",
                format!(
                    "failed to create output directory '{}': {}",
                    request.output_dir.display(),
                    source
                ),
            )
        })?;

        let stem = request.output_stem();
        let mut artifacts = Vec::with_capacity(request.formats.len());
        for &format in &request.formats {
            let path = request
                .output_dir
                .join(format!("{stem}.{}", format.extension()));
            match format {
                ExportFormat::Json => write_json(&record, self.config.nan_encoding, &path)?,
                ExportFormat::Csv => write_csv_file(&record, self.config.csv_columns, &path)?,
            }
            tracing::debug!(path = %path.display(), "wrote export artifact");
            artifacts.push(ExportArtifact::new(format, path));
        }

        tracing::info!(
            file_name = %record.file_name,
            variant = %self.config.variant(),
            samples = record.len(),
            artifacts = artifacts.len(),
            "converted AC record"
        );
        Ok(ConversionOutcome { record, artifacts })
    }
}

impl Converter for AcConverter {
    fn execute(&self, request: &ConversionRequest) -> AcdatResult<Vec<ExportArtifact>> {
        self.convert(request).map(|outcome| outcome.artifacts)
    }
}
