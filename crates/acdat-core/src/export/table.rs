use super::{CalculatedColumn, ColumnValues, ExportRecord};
use crate::domain::{AcdatError, ExportResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column set of the CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CsvColumns {
    /// Every per-sample array.
    #[default]
    Full,
    /// Energy and the yield curves only.
    Summary,
}

impl CsvColumns {
    pub fn columns(self) -> &'static [CalculatedColumn] {
        const SUMMARY: [CalculatedColumn; 5] = [
            CalculatedColumn::UvEnergy,
            CalculatedColumn::Pyield,
            CalculatedColumn::Npyield,
            CalculatedColumn::Nayield,
            CalculatedColumn::Guideline,
        ];
        match self {
            Self::Full => &CalculatedColumn::ALL,
            Self::Summary => &SUMMARY,
        }
    }
}

fn float_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:?}")
    }
}

fn cell(values: ColumnValues<'_>, index: usize) -> String {
    let rendered = match values {
        ColumnValues::Float(values) => values.get(index).copied().map(float_cell),
        ColumnValues::Integer(values) => values.get(index).map(i64::to_string),
    };
    rendered.unwrap_or_default()
}

fn export_error(error: impl std::fmt::Display) -> AcdatError {
    AcdatError::io_system("IO.EXPORT_WRITE", format!("failed to write CSV: {error}"))
}

/// Header row, then one row per sample; NaN cells are left empty.
pub fn write_csv<W: Write>(
    record: &ExportRecord,
    columns: CsvColumns,
    writer: W,
) -> ExportResult<()> {
    let columns = columns.columns();
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(columns.iter().map(|column| column.key()))
        .map_err(export_error)?;

    for index in 0..record.len() {
        writer
            .write_record(
                columns
                    .iter()
                    .map(|&column| cell(record.column(column), index)),
            )
            .map_err(export_error)?;
    }
    writer.flush().map_err(export_error)
}

pub fn render_csv(record: &ExportRecord, columns: CsvColumns) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_csv(record, columns, &mut buffer)?;
    String::from_utf8(buffer).map_err(|source| {
        AcdatError::internal("SYS.CSV_ENCODE", format!("CSV output is not UTF-8: {source}"))
    })
}

pub(crate) fn write_csv_file(
    record: &ExportRecord,
    columns: CsvColumns,
    path: &Path,
) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| {
        AcdatError::io_system(
            "IO.EXPORT_WRITE",
            format!("failed to create '{}': {source}", path.display()),
        )
    })?;
    write_csv(record, columns, file)
}

#[cfg(test)]
mod tests {
    use super::{CsvColumns, render_csv};
    use crate::export::fixtures::{estimate, export_record};

    #[test]
    fn full_table_lists_every_array() {
        let rendered =
            render_csv(&export_record(Some(estimate())), CsvColumns::Full).expect("csv renders");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines[0],
            "uvEnergy,countingCorrection,photonCorrection,pyield,npyield,nayield,guideline,countingRate,flGrandLevel,flRegLevel,uvIntensity"
        );
        assert_eq!(lines[1], "4.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,-1,0,20.0");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn summary_table_leaves_nan_cells_empty() {
        let rendered = render_csv(&export_record(None), CsvColumns::Summary).expect("csv renders");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "uvEnergy,pyield,npyield,nayield,guideline");
        assert_eq!(lines[2], "4.5,4.0,2.0,2.0,");
    }
}
