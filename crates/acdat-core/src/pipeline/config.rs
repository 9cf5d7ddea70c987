use crate::domain::ConverterVariant;
use crate::export::{CsvColumns, NanEncoding};
use crate::trim::{CeilingFallback, DEFAULT_ENERGY_CEILING_EV};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Knobs of one conversion run, loadable from a camelCase JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub apply_range_trimming: bool,
    /// Photon energy (eV) above which advanced runs drop samples.
    pub energy_ceiling: f64,
    pub ceiling_fallback: CeilingFallback,
    pub nan_encoding: NanEncoding,
    pub csv_columns: CsvColumns,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            apply_range_trimming: false,
            energy_ceiling: DEFAULT_ENERGY_CEILING_EV,
            ceiling_fallback: CeilingFallback::default(),
            nan_encoding: NanEncoding::default(),
            csv_columns: CsvColumns::default(),
        }
    }
}

impl PipelineConfig {
    pub fn for_variant(variant: ConverterVariant) -> Self {
        Self {
            apply_range_trimming: variant.applies_range_trimming(),
            ..Self::default()
        }
    }

    pub const fn variant(&self) -> ConverterVariant {
        if self.apply_range_trimming {
            ConverterVariant::Advanced
        } else {
            ConverterVariant::Standard
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineConfigError {
    #[error("failed to read pipeline config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse pipeline config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_pipeline_config(
    config_path: impl AsRef<Path>,
) -> Result<PipelineConfig, PipelineConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| PipelineConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| PipelineConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}
