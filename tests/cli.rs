use std::path::Path;
use std::process::{Command, Output};

use assert_fs::prelude::*;

fn dfm(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dfm"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dfm")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_tone(path: &Path, sample_rate: u32, seconds: f32) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as usize;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = (0.3 * (2.0 * std::f32::consts::PI * 220.0 * t).sin() * i16::MAX as f32) as i16;
        writer.write_sample(value).unwrap();
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn version_flag_prints_name() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = dfm(temp.path(), &["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("dfm "));
}

#[test]
fn output_with_multiple_inputs_is_rejected_before_filesystem_checks() {
    let temp = assert_fs::TempDir::new().unwrap();
    // Neither input exists: the argument check must win over the not-found check
    let output = dfm(temp.path(), &["a.wav", "b.mp4", "-o", "out.wav"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot specify --output when processing multiple files"));
    assert!(!temp.child("out.wav").path().exists());
    assert!(!temp.child("output").path().exists());
}

#[test]
fn missing_input_exits_with_one() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = dfm(temp.path(), &["missing.wav"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Input file not found: missing.wav"));
}

#[test]
fn unsupported_type_exits_with_one_and_writes_nothing() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("notes.txt").write_str("not media").unwrap();

    let output = dfm(temp.path(), &["notes.txt", "-q"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unsupported file type: .txt"));
    assert!(stderr(&output).contains("Run 'dfm --help' for usage."));
    assert!(!temp.child("output").path().exists());
}

#[test]
fn invalid_config_exits_with_one() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("dfm.toml").write_str("[enhance]\nstrength = \"loud\"\n").unwrap();
    temp.child("sample.wav").touch().unwrap();

    let output = dfm(temp.path(), &["sample.wav"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Configuration error"));
}

#[test]
fn wav_input_is_enhanced_to_default_output() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_tone(temp.child("sample.wav").path(), 44100, 0.5);

    let output = dfm(temp.path(), &["sample.wav", "-q"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let enhanced = temp.child("output/sample_enhanced.wav");
    assert!(enhanced.path().is_file());

    let reader = hound::WavReader::open(enhanced.path()).unwrap();
    assert_eq!(reader.spec().sample_rate, 48000);
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.duration(), 24000);
}

#[test]
fn explicit_output_path_is_used() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_tone(temp.child("take.wav").path(), 48000, 0.25);

    let output = dfm(temp.path(), &["take.wav", "-q", "-o", "clean/take.wav"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(temp.child("clean/take.wav").path().is_file());
    assert!(!temp.child("output").path().exists());
}
