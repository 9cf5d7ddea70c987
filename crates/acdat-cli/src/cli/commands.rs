use super::CliError;
use super::helpers::{
    ConfigOverrides, output_dir_for, render_summary_line, resolve_pipeline_config,
    write_stdout,
};
use acdat_core::domain::{AcdatError, ConversionRequest, ExportFormat};
use acdat_core::export::{CsvColumns, NanEncoding, render_json};
use acdat_core::pipeline::{AcConverter, convert_path};
use std::path::PathBuf;

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => Self::Json,
            FormatArg::Csv => Self::Csv,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum CsvColumnsArg {
    Full,
    Summary,
}

impl From<CsvColumnsArg> for CsvColumns {
    fn from(value: CsvColumnsArg) -> Self {
        match value {
            CsvColumnsArg::Full => Self::Full,
            CsvColumnsArg::Summary => Self::Summary,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum NanArg {
    Null,
    String,
}

impl From<NanArg> for NanEncoding {
    fn from(value: NanArg) -> Self {
        match value {
            NanArg::Null => Self::Null,
            NanArg::String => Self::String,
        }
    }
}

#[derive(clap::Args)]
pub(super) struct ConvertArgs {
    /// AC .dat files to convert
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Drop samples above the energy ceiling and from the first saturated count on
    #[arg(long)]
    advanced: bool,

    /// Directory for the exported files (default: next to each input)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Export format, repeatable (default: json and csv)
    #[arg(long = "format", value_enum)]
    formats: Vec<FormatArg>,

    /// CSV column set
    #[arg(long, value_enum)]
    csv_columns: Option<CsvColumnsArg>,

    /// JSON spelling of NaN and infinite values
    #[arg(long, value_enum)]
    nan: Option<NanArg>,

    /// Truncate at index 0 when a ceiling is never reached
    #[arg(long)]
    legacy_ceiling: bool,

    /// Energy ceiling in eV for --advanced
    #[arg(long, value_name = "EV")]
    energy_ceiling: Option<f64>,

    /// JSON pipeline config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConvertArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            advanced: self.advanced,
            energy_ceiling: self.energy_ceiling,
            legacy_ceiling: self.legacy_ceiling,
            nan_encoding: self.nan.map(Into::into),
            csv_columns: self.csv_columns.map(Into::into),
        }
    }

    fn export_formats(&self) -> Vec<ExportFormat> {
        if self.formats.is_empty() {
            vec![ExportFormat::Json, ExportFormat::Csv]
        } else {
            self.formats.iter().copied().map(Into::into).collect()
        }
    }
}

#[derive(clap::Args)]
pub(super) struct InspectArgs {
    /// AC .dat file to inspect
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Estimate on the range-trimmed arrays
    #[arg(long)]
    advanced: bool,

    /// JSON spelling of NaN and infinite values
    #[arg(long, value_enum)]
    nan: Option<NanArg>,
}

pub(super) fn run_convert_command(args: ConvertArgs) -> Result<i32, CliError> {
    let config =
        resolve_pipeline_config(args.config.as_deref(), &args.overrides()).map_err(CliError::Convert)?;
    let converter = AcConverter::new(config);
    let formats = args.export_formats();

    let mut first_failure: Option<AcdatError> = None;
    for input in &args.files {
        let output_dir = output_dir_for(input, args.output_dir.as_deref());
        let request = ConversionRequest::new(input, output_dir).with_formats(formats.clone());
        match converter.convert(&request) {
            Ok(outcome) => println!("{}", render_summary_line(&outcome)),
            Err(error) => {
                tracing::warn!(input = %input.display(), "skipping file after conversion failure");
                eprintln!("{}", error.diagnostic_line());
                if first_failure.is_none() {
                    first_failure = Some(error);
                }
            }
        }
    }

    match first_failure {
        Some(error) => {
            if let Some(summary_line) = error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            Ok(error.exit_code())
        }
        None => Ok(0),
    }
}

pub(super) fn run_inspect_command(args: InspectArgs) -> Result<i32, CliError> {
    let overrides = ConfigOverrides {
        advanced: args.advanced,
        nan_encoding: args.nan.map(Into::into),
        ..ConfigOverrides::default()
    };
    let config = resolve_pipeline_config(None, &overrides).map_err(CliError::Convert)?;

    let record = convert_path(&args.file, &config).map_err(CliError::Convert)?;
    let rendered = render_json(&record.metadata_without_calculated(config.nan_encoding))
        .map_err(CliError::Convert)?;
    write_stdout(&rendered)?;
    Ok(0)
}
