use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ITO_DAT: &str = "\
AC-2,0,10,0.5,2950,0.5,AC-2,30,4,5.5,0,0
2024/05/01,ITO glass
20,20,corr,1,1
4.0,1,-1,0,20
4.5,1,-1,0,20
5.0,4,0,-1,20
5.5,16,0,-1,20
";

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, contents).expect("file should be written");
}

fn run_acdat(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_acdat"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("acdat should run")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths should be UTF-8")
}

#[test]
fn convert_writes_json_and_csv_next_to_input() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("ito.dat");
    write_file(&input, ITO_DAT);

    let output = run_acdat(&["convert", path_arg(&input)]);
    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("ito.dat: 4 samples, threshold 4.75 eV"),
        "unexpected summary: {stdout}"
    );

    let json = fs::read_to_string(temp.path().join("ito.json")).expect("json should exist");
    assert!(json.starts_with("{\n    \"fileType\": \"AC-2\""));
    let parsed: Value = serde_json::from_str(&json).expect("json should parse");
    assert_eq!(parsed["sampleName"], Value::from("ITO glass"));
    assert_eq!(parsed["file_name"], Value::from("ito.dat"));
    assert_eq!(parsed["uvEnergy"].as_array().map(Vec::len), Some(4));

    let csv = fs::read_to_string(temp.path().join("ito.csv")).expect("csv should exist");
    assert!(csv.starts_with("uvEnergy,countingCorrection,photonCorrection,"));
}

#[test]
fn convert_honors_output_dir_format_and_columns() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("data/ito.dat");
    let output_dir = temp.path().join("exports");
    write_file(&input, ITO_DAT);

    let output = run_acdat(&[
        "convert",
        path_arg(&input),
        "--output-dir",
        path_arg(&output_dir),
        "--format",
        "csv",
        "--csv-columns",
        "summary",
    ]);
    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(!output_dir.join("ito.json").exists());
    let csv = fs::read_to_string(output_dir.join("ito.csv")).expect("csv should exist");
    assert_eq!(
        csv.lines().next(),
        Some("uvEnergy,pyield,npyield,nayield,guideline")
    );
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn convert_continues_past_bad_files_and_reports_first_failure() {
    let temp = TempDir::new().expect("tempdir should be created");
    let broken = temp.path().join("broken.dat");
    let good = temp.path().join("ito.dat");
    write_file(&broken, "AC-2,0\n2024/05/01,x\n");
    write_file(&good, ITO_DAT);

    let output = run_acdat(&["convert", path_arg(&broken), path_arg(&good)]);
    assert_eq!(output.status.code(), Some(3));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [INPUT.ROW_COUNT] broken.dat: "), "{stderr}");
    assert!(stderr.contains("FATAL EXIT CODE: 3"), "{stderr}");
    assert!(temp.path().join("ito.json").exists());
    assert!(!temp.path().join("broken.json").exists());
}

#[test]
fn missing_input_exits_with_io_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("missing.dat");

    let output = run_acdat(&["convert", path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[IO.INPUT_READ]"));
}

#[test]
fn inspect_prints_metadata_without_arrays() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("ito.dat");
    write_file(&input, ITO_DAT);

    let output = run_acdat(&["inspect", path_arg(&input), "--nan", "string"]);
    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let object = parsed.as_object().expect("metadata should be an object");
    assert!(object.contains_key("powerNumber"));
    assert!(object.contains_key("thresholdEnergy"));
    assert!(!object.contains_key("uvEnergy"));
    assert!(!object.contains_key("guideline"));
    assert_eq!(parsed["model"], Value::from("AC-2"));
}

#[test]
fn config_file_enables_range_trimming() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("wide.dat");
    let config = temp.path().join("acdat.json");
    write_file(
        &input,
        "\
AC-2,0,10,0.5,2950,1,AC-2,30,5,8,0,0
2024/05/01,wide
20,20,corr,1,1
5.0,100,0,0,20
6.0,200,0,0,20
7.0,5000,0,0,20
8.0,6000,0,0,20
",
    );
    write_file(&config, r#"{ "applyRangeTrimming": true }"#);

    let output = run_acdat(&[
        "convert",
        path_arg(&input),
        "--config",
        path_arg(&config),
        "--format",
        "json",
    ]);
    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("wide.json")).expect("json should exist"),
    )
    .expect("json should parse");
    assert_eq!(parsed["uvEnergy"], serde_json::json!([5.0, 6.0]));
    assert_eq!(parsed["thresholdEnergy"], Value::Null);
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let output = run_acdat(&["convert", "--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[INPUT.CLI_USAGE]"));
}
