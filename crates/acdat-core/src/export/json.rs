use super::{ExportRecord, NanEncoding};
use crate::domain::{AcdatError, ExportResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const JSON_INDENT: &[u8] = b"    ";

/// Pretty-prints `metadata` with four-space indentation.
pub fn render_json(metadata: &Map<String, Value>) -> ExportResult<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    metadata.serialize(&mut serializer).map_err(|source| {
        AcdatError::internal(
            "SYS.JSON_ENCODE",
            format!("failed to encode metadata: {source}"),
        )
    })?;

    String::from_utf8(buffer).map_err(|source| {
        AcdatError::internal(
            "SYS.JSON_ENCODE",
            format!("encoded metadata is not UTF-8: {source}"),
        )
    })
}

pub fn write_json(record: &ExportRecord, nan: NanEncoding, path: &Path) -> ExportResult<()> {
    let mut rendered = render_json(&record.metadata(nan))?;
    rendered.push('\n');
    fs::write(path, rendered).map_err(|source| {
        AcdatError::io_system(
            "IO.EXPORT_WRITE",
            format!("failed to write '{}': {source}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{render_json, write_json};
    use crate::export::NanEncoding;
    use crate::export::fixtures::{estimate, export_record};
    use serde_json::Value;
    use tempfile::TempDir;

    #[test]
    fn rendering_uses_four_space_indent() {
        let record = export_record(Some(estimate()));
        let rendered = render_json(&record.metadata_without_calculated(NanEncoding::Null))
            .expect("metadata should encode");

        assert!(rendered.starts_with("{\n    \"fileType\": \"AC-2\",\n"));
        assert!(rendered.ends_with("\"file_name\": \"sample.dat\"\n}"));
    }

    #[test]
    fn written_file_parses_back_with_nulls() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("sample.json");
        write_json(&export_record(None), NanEncoding::Null, &path).expect("json should write");

        let parsed: Value = serde_json::from_str(
            &std::fs::read_to_string(&path).expect("json should be readable"),
        )
        .expect("json should parse");
        assert_eq!(parsed["thresholdEnergy"], Value::Null);
        assert_eq!(parsed["npyield"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("missing").join("sample.json");
        let error = write_json(&export_record(None), NanEncoding::Null, &path)
            .expect_err("write into a missing directory should fail");

        assert_eq!(error.placeholder(), "IO.EXPORT_WRITE");
        assert_eq!(error.exit_code(), 4);
    }
}
