use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn chalkboard_cmd() -> Command {
    Command::cargo_bin("chalkboard").expect("binary exists")
}

const DRAG_SCRIPT: &str = r#"{
    "width": 120,
    "height": 60,
    "events": [
        { "type": "mouse_down", "x": 10, "y": 10 },
        { "type": "mouse_move", "x": 50, "y": 10 },
        { "type": "frame" },
        { "type": "mouse_up" }
    ]
}"#;

#[test]
fn chalkboard_help_prints_about() {
    chalkboard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chalk-textured drawing board"));
}

#[test]
fn no_arguments_prints_usage() {
    chalkboard_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--script"));
}

#[test]
fn print_default_config_emits_toml() {
    chalkboard_cmd()
        .arg("--print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[drawing]"))
        .stdout(predicate::str::contains("brush_size = 7.0"))
        .stdout(predicate::str::contains("background_color = \"#0a3d0a\""));
}

#[test]
fn replay_writes_png_into_output_dir() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("drag.json");
    fs::write(&script, DRAG_SCRIPT).unwrap();
    let out = temp.path().join("out");

    chalkboard_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--script")
        .arg(&script)
        .arg("--output-dir")
        .arg(&out)
        .args(["--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chalkboard_"))
        .stdout(predicate::str::contains(".png"));

    let pngs: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    assert_eq!(pngs.len(), 1);
    assert!(fs::read(&pngs[0]).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn config_file_controls_filename_prefix() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("drag.json");
    fs::write(&script, DRAG_SCRIPT).unwrap();
    let config = temp.path().join("config.toml");
    fs::write(
        &config,
        "[save]\nfilename_prefix = \"lesson\"\ninclude_timestamp = false\n",
    )
    .unwrap();
    let out = temp.path().join("out");

    chalkboard_cmd()
        .arg("--config")
        .arg(&config)
        .arg("--script")
        .arg(&script)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("lesson.png").is_file());
}

#[test]
fn no_save_skips_export() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("drag.json");
    fs::write(&script, DRAG_SCRIPT).unwrap();
    let out = temp.path().join("out");

    chalkboard_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--script")
        .arg(&script)
        .arg("--output-dir")
        .arg(&out)
        .arg("--no-save")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(!out.exists());
}

#[test]
fn malformed_script_fails() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("broken.json");
    fs::write(&script, "{ \"width\": 10 ").unwrap();

    chalkboard_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load script"));
}

#[test]
fn schema_binary_prints_json_schema() {
    Command::cargo_bin("dump_config_schema")
        .expect("binary exists")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"drawing\""))
        .stdout(predicate::str::contains("\"keybindings\""));
}
