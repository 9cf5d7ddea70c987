use super::encoding::{TextEncoding, decode_with_candidates};
use super::model::{InstrumentRecord, SampleSeries};
use crate::domain::{AcdatError, InstrumentModel, ParserResult};
use std::str::FromStr;

pub const HEADER_ROW_COUNT: usize = 3;
pub const BODY_COLUMN_COUNT: usize = 5;

const PARAMETER_FIELD_COUNT: usize = 12;
const MEASUREMENT_FIELD_COUNT: usize = 2;
const LIGHT_FIELD_COUNT: usize = 5;
const LEGACY_PARAMETER_FIELD_COUNT: usize = 10;

const BODY_COLUMN_NAMES: [&str; BODY_COLUMN_COUNT] = [
    "uvEnergy",
    "countingRate",
    "flGrandLevel",
    "flRegLevel",
    "uvIntensity",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub encoding: TextEncoding,
    pub record: InstrumentRecord,
    pub series: SampleSeries,
}

pub fn parse_record_bytes(bytes: &[u8]) -> ParserResult<ParsedRecord> {
    let decoded = decode_with_candidates(bytes)?;
    let (record, series) = parse_record_text(&decoded.text)?;
    Ok(ParsedRecord {
        encoding: decoded.encoding,
        record,
        series,
    })
}

pub fn parse_record_text(text: &str) -> ParserResult<(InstrumentRecord, SampleSeries)> {
    let rows = split_rows(text)?;
    parse_rows(rows)
}

/// Splits decoded text into comma-separated rows; blank lines are dropped.
pub fn split_rows(text: &str) -> ParserResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|source| {
            AcdatError::malformed_record(
                "INPUT.ROW_SPLIT",
                format!("failed to split row {}: {}", index + 1, source),
            )
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

/// Pads the older 10-field AC-5 header layout up to the current layout.
pub fn extend_legacy_layout(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    if rows
        .first()
        .is_some_and(|row| row.len() == LEGACY_PARAMETER_FIELD_COUNT)
    {
        rows[0].extend(["0".to_string(), "0.0".to_string()]);
        if let Some(light_row) = rows.get_mut(2) {
            light_row.extend(["1".to_string(), "1".to_string()]);
        }
    }
    rows
}

pub fn parse_rows(rows: Vec<Vec<String>>) -> ParserResult<(InstrumentRecord, SampleSeries)> {
    let rows = extend_legacy_layout(rows);
    if rows.len() <= HEADER_ROW_COUNT {
        return Err(AcdatError::malformed_record(
            "INPUT.ROW_COUNT",
            format!(
                "expected {} header rows followed by at least one data row, found {} rows",
                HEADER_ROW_COUNT,
                rows.len()
            ),
        ));
    }

    let record = parse_header(&rows[..HEADER_ROW_COUNT])?;
    let series = parse_body(&rows[HEADER_ROW_COUNT..])?;
    Ok((record, series))
}

fn parse_header(rows: &[Vec<String>]) -> ParserResult<InstrumentRecord> {
    let parameters = HeaderRow::new(0, &rows[0], PARAMETER_FIELD_COUNT)?;
    let measurement = HeaderRow::new(1, &rows[1], MEASUREMENT_FIELD_COUNT)?;
    let light = HeaderRow::new(2, &rows[2], LIGHT_FIELD_COUNT)?;

    Ok(InstrumentRecord {
        file_type: parameters.text(0),
        dead_time: parameters.number(1, "deadTime")?,
        counting_time: parameters.number(2, "countingTime")?,
        power_number: parameters.number(3, "powerNumber")?,
        anode_voltage: parameters.number(4, "anodeVoltage")?,
        step: parameters.number(5, "step")?,
        model: InstrumentModel::from_label(&parameters.text(6)),
        y_axis_maximum: parameters.number(7, "yAxisMaximum")?,
        start_energy: parameters.number(8, "startEnergy")?,
        finish_energy: parameters.number(9, "finishEnergy")?,
        flag_dif_data_ground_level: parameters.number(10, "flagDifDataGroundLevel")?,
        bg_counting_rate: parameters.number(11, "bgCountingRate")?,
        measure_date: measurement.text(0),
        sample_name: measurement.text(1),
        uv_intensity59: light.number(0, "uvIntensity59")?,
        target_uv: light.number(1, "targetUv")?,
        name_light_correction: light.text(2),
        sensitivity1: light.number(3, "sensitivity1")?,
        sensitivity2: light.number(4, "sensitivity2")?,
    })
}

struct HeaderRow<'a> {
    index: usize,
    fields: &'a [String],
}

impl<'a> HeaderRow<'a> {
    fn new(index: usize, fields: &'a [String], required: usize) -> ParserResult<Self> {
        if fields.len() < required {
            return Err(AcdatError::malformed_record(
                "INPUT.HEADER_SHAPE",
                format!(
                    "header row {} has {} fields, expected {}",
                    index + 1,
                    fields.len(),
                    required
                ),
            ));
        }
        Ok(Self { index, fields })
    }

    fn text(&self, column: usize) -> String {
        self.fields[column].clone()
    }

    fn number<T: FromStr>(&self, column: usize, name: &str) -> ParserResult<T> {
        let raw = &self.fields[column];
        raw.trim().parse::<T>().map_err(|_| {
            AcdatError::malformed_record(
                "INPUT.HEADER_FIELD",
                format!(
                    "row {} column {} ({}): '{}' is not a valid {}",
                    self.index + 1,
                    column + 1,
                    name,
                    raw,
                    numeric_kind::<T>()
                ),
            )
        })
    }
}

fn parse_body(rows: &[Vec<String>]) -> ParserResult<SampleSeries> {
    let mut series = SampleSeries {
        uv_energy: Vec::with_capacity(rows.len()),
        counting_rate: Vec::with_capacity(rows.len()),
        fl_grand_level: Vec::with_capacity(rows.len()),
        fl_reg_level: Vec::with_capacity(rows.len()),
        uv_intensity: Vec::with_capacity(rows.len()),
    };

    for (offset, row) in rows.iter().enumerate() {
        let line = HEADER_ROW_COUNT + offset + 1;
        if row.len() < BODY_COLUMN_COUNT {
            return Err(AcdatError::malformed_record(
                "INPUT.BODY_SHAPE",
                format!(
                    "data row {} has {} fields, expected {}",
                    line,
                    row.len(),
                    BODY_COLUMN_COUNT
                ),
            ));
        }

        series.uv_energy.push(body_value(row, line, 0)?);
        series.counting_rate.push(body_value(row, line, 1)?);
        series.fl_grand_level.push(body_value(row, line, 2)?);
        series.fl_reg_level.push(body_value(row, line, 3)?);
        series.uv_intensity.push(body_value(row, line, 4)?);
    }

    Ok(series)
}

fn body_value<T: FromStr>(row: &[String], line: usize, column: usize) -> ParserResult<T> {
    let raw = &row[column];
    raw.trim().parse::<T>().map_err(|_| {
        AcdatError::malformed_record(
            "INPUT.BODY_COLUMN",
            format!(
                "row {} column {} ({}): '{}' is not a valid {}",
                line,
                column + 1,
                BODY_COLUMN_NAMES[column],
                raw,
                numeric_kind::<T>()
            ),
        )
    })
}

fn numeric_kind<T>() -> &'static str {
    if std::any::type_name::<T>() == std::any::type_name::<f64>() {
        "number"
    } else {
        "integer"
    }
}

#[cfg(test)]
mod tests {
    use super::{extend_legacy_layout, parse_record_bytes, parse_record_text, split_rows};
    use crate::domain::{AcdatErrorCategory, InstrumentModel};
    use crate::record::{BackgroundMode, TextEncoding};

    const CURRENT_LAYOUT: &str = "\
AC-2,0.000285,10,0.5,2950,0.05,AC-2,30,4.2,6.2,-1,12.5
2023/05/12,ITO glass
25.0,5.9,Filter_A,1.02,1.0
4.20,10.0,-1,0,100.0
4.25,11.0,-1,0,101.0
4.30,30.0,0,-1,102.0
";

    fn rows(table: &[&[&str]]) -> Vec<Vec<String>> {
        table
            .iter()
            .map(|row| row.iter().map(|field| field.to_string()).collect())
            .collect()
    }

    #[test]
    fn current_layout_parses_typed_header_and_body() {
        let (record, series) = parse_record_text(CURRENT_LAYOUT).expect("record should parse");

        assert_eq!(record.file_type, "AC-2");
        assert_eq!(record.dead_time, 0.000285);
        assert_eq!(record.power_number, 0.5);
        assert_eq!(record.model, InstrumentModel::Ac2);
        assert_eq!(record.flag_dif_data_ground_level, -1);
        assert_eq!(record.background_mode(), BackgroundMode::SubtractAverage);
        assert_eq!(record.bg_counting_rate, 12.5);
        assert_eq!(record.measure_date, "2023/05/12");
        assert_eq!(record.sample_name, "ITO glass");
        assert_eq!(record.uv_intensity59, 25.0);
        assert_eq!(record.name_light_correction, "Filter_A");
        assert_eq!(record.sensitivity1, 1.02);

        assert_eq!(series.len(), 3);
        assert_eq!(series.uv_energy, vec![4.20, 4.25, 4.30]);
        assert_eq!(series.counting_rate, vec![10.0, 11.0, 30.0]);
        assert_eq!(series.fl_grand_level, vec![-1, -1, 0]);
        assert_eq!(series.fl_reg_level, vec![0, 0, -1]);
        assert_eq!(series.uv_intensity, vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn legacy_ten_field_header_gets_default_flag_rate_and_sensitivities() {
        let legacy = rows(&[
            &["AC-5", "0.5", "10", "0.5", "500", "0.05", "AC-5", "1000", "4.0", "6.5"],
            &["2020/01/01", "old sample"],
            &["100.0", "50.0", "Filter"],
            &["4.0", "5.0", "0", "0", "90.0"],
        ]);

        let extended = extend_legacy_layout(legacy.clone());
        assert_eq!(extended[0].len(), 12);
        assert_eq!(&extended[0][10..], &["0".to_string(), "0.0".to_string()]);
        assert_eq!(&extended[2][3..], &["1".to_string(), "1".to_string()]);

        let (record, _) = super::parse_rows(legacy).expect("legacy record should parse");
        assert_eq!(record.flag_dif_data_ground_level, 0);
        assert_eq!(record.bg_counting_rate, 0.0);
        assert_eq!(record.sensitivity1, 1.0);
        assert_eq!(record.sensitivity2, 1.0);
        assert_eq!(record.background_mode(), BackgroundMode::AsMeasured);
    }

    #[test]
    fn crlf_and_blank_lines_are_tolerated() {
        let text = CURRENT_LAYOUT.replace('\n', "\r\n") + "\r\n\r\n";
        let (_, series) = parse_record_text(&text).expect("crlf record should parse");
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn quoted_sample_names_keep_embedded_commas() {
        let text = CURRENT_LAYOUT.replace("ITO glass", "\"ITO, annealed\"");
        let (record, _) = parse_record_text(&text).expect("quoted record should parse");
        assert_eq!(record.sample_name, "ITO, annealed");
    }

    #[test]
    fn split_rows_keeps_field_text_verbatim() {
        let rows = split_rows("a, b ,c\n\n1,2\n").expect("rows should split");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), " b ".to_string(), "c".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ]
        );
    }

    #[test]
    fn non_numeric_header_field_is_malformed() {
        let text = CURRENT_LAYOUT.replacen("0.000285", "fast", 1);
        let error = parse_record_text(&text).expect_err("bad dead time should fail");

        assert_eq!(error.category(), AcdatErrorCategory::MalformedRecord);
        assert_eq!(error.placeholder(), "INPUT.HEADER_FIELD");
        assert!(error.message().contains("deadTime"), "{}", error.message());
    }

    #[test]
    fn fractional_marker_is_malformed() {
        let text = CURRENT_LAYOUT.replacen("4.30,30.0,0,-1", "4.30,30.0,0.0,-1", 1);
        let error = parse_record_text(&text).expect_err("float marker should fail");

        assert_eq!(error.placeholder(), "INPUT.BODY_COLUMN");
        assert!(error.message().contains("row 6 column 3 (flGrandLevel)"));
    }

    #[test]
    fn short_rows_are_malformed() {
        let short_body = CURRENT_LAYOUT.replacen("4.25,11.0,-1,0,101.0", "4.25,11.0,-1,0", 1);
        let error = parse_record_text(&short_body).expect_err("short body row should fail");
        assert_eq!(error.placeholder(), "INPUT.BODY_SHAPE");

        let short_header = CURRENT_LAYOUT.replacen("25.0,5.9,Filter_A,1.02,1.0", "25.0,5.9", 1);
        let error = parse_record_text(&short_header).expect_err("short header should fail");
        assert_eq!(error.placeholder(), "INPUT.HEADER_SHAPE");

        let header_only = CURRENT_LAYOUT.lines().take(3).collect::<Vec<_>>().join("\n");
        let error = parse_record_text(&header_only).expect_err("missing body should fail");
        assert_eq!(error.placeholder(), "INPUT.ROW_COUNT");
    }

    #[test]
    fn extra_body_columns_are_ignored() {
        let text = CURRENT_LAYOUT.replacen("4.20,10.0,-1,0,100.0", "4.20,10.0,-1,0,100.0,x", 1);
        let (_, series) = parse_record_text(&text).expect("extra column should be ignored");
        assert_eq!(series.uv_intensity[0], 100.0);
    }

    #[test]
    fn bytes_entry_point_reports_encoding() {
        let parsed = parse_record_bytes(CURRENT_LAYOUT.as_bytes()).expect("bytes should parse");
        assert_eq!(parsed.encoding, TextEncoding::Iso2022Jp);
        assert_eq!(parsed.series.len(), 3);
    }
}
