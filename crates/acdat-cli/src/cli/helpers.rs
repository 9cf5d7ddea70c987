use acdat_core::domain::AcdatError;
use acdat_core::export::{CsvColumns, NanEncoding};
use acdat_core::pipeline::{
    ConversionOutcome, PipelineConfig, PipelineConfigError, load_pipeline_config,
};
use acdat_core::trim::CeilingFallback;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr; `-v`/`-vv` take precedence over `RUST_LOG`.
pub(super) fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    // a subscriber may already be installed when run() is called repeatedly
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(super) struct ConfigOverrides {
    pub advanced: bool,
    pub energy_ceiling: Option<f64>,
    pub legacy_ceiling: bool,
    pub nan_encoding: Option<NanEncoding>,
    pub csv_columns: Option<CsvColumns>,
}

pub(super) fn resolve_pipeline_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<PipelineConfig, AcdatError> {
    let mut config = match config_path {
        Some(path) => load_pipeline_config(path).map_err(config_error)?,
        None => PipelineConfig::default(),
    };

    if overrides.advanced {
        config.apply_range_trimming = true;
    }
    if let Some(energy_ceiling) = overrides.energy_ceiling {
        config.energy_ceiling = energy_ceiling;
    }
    if overrides.legacy_ceiling {
        config.ceiling_fallback = CeilingFallback::LegacyArgmax;
    }
    if let Some(nan_encoding) = overrides.nan_encoding {
        config.nan_encoding = nan_encoding;
    }
    if let Some(csv_columns) = overrides.csv_columns {
        config.csv_columns = csv_columns;
    }

    tracing::debug!(?config, "resolved pipeline config");
    Ok(config)
}

fn config_error(error: PipelineConfigError) -> AcdatError {
    match &error {
        PipelineConfigError::Read { .. } => {
            AcdatError::io_system("IO.CONFIG_READ", error.to_string())
        }
        PipelineConfigError::Parse { .. } => {
            AcdatError::input_validation("INPUT.CONFIG_PARSE", error.to_string())
        }
    }
}

/// Exports land next to the input unless an output directory is given.
pub(super) fn output_dir_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    if let Some(output_dir) = output_dir {
        return output_dir.to_path_buf();
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub(super) fn render_summary_line(outcome: &ConversionOutcome) -> String {
    let record = &outcome.record;
    let threshold = match record.estimate() {
        Some(estimate) => format!("threshold {:.2} eV", estimate.threshold_energy),
        None => "no threshold estimate".to_string(),
    };
    let written = outcome
        .artifacts
        .iter()
        .map(|artifact| artifact.path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}: {} samples, {} -> {}",
        record.file_name,
        record.len(),
        threshold,
        written
    )
}

pub(super) fn write_stdout(rendered: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write metadata to stdout")?;
    stdout.flush().context("failed to flush stdout")
}
