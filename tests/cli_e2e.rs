use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_defgen"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

fn widgets_json() -> String {
    fixture("widgets.json").to_string_lossy().into_owned()
}

/// Golden test: verify exact output for a known library
#[test]
fn e2e_golden_output_exact() {
    let temp_dir = TempDir::new().expect("temp dir");

    let status = bin()
        .current_dir(temp_dir.path())
        .args(["WA", "Demo.Widgets", widgets_json().as_str(), "-o", "."])
        .status()
        .expect("run defgen");
    assert!(status.success());

    let output = std::fs::read_to_string(temp_dir.path().join("WA.ts")).expect("read");
    let expected = std::fs::read_to_string(fixture("widgets.ts")).expect("read golden");
    assert_eq!(output, expected);
}

#[test]
fn e2e_output_is_deterministic() {
    let first = TempDir::new().expect("temp dir");
    let second = TempDir::new().expect("temp dir");

    for dir in [&first, &second] {
        let status = bin()
            .current_dir(dir.path())
            .args(["WA", "Demo.Widgets", widgets_json().as_str()])
            .status()
            .expect("run defgen");
        assert!(status.success());
    }

    let a = std::fs::read(first.path().join("WA.ts")).expect("read first");
    let b = std::fs::read(second.path().join("WA.ts")).expect("read second");
    assert_eq!(a, b);
}

#[test]
fn e2e_module_suffix_is_stripped() {
    let temp_dir = TempDir::new().expect("temp dir");
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).expect("mkdir");

    let status = bin()
        .current_dir(temp_dir.path())
        .args([
            "WA.ts",
            "Demo.Widgets",
            widgets_json().as_str(),
            "--out-dir",
            out_dir.to_string_lossy().as_ref(),
        ])
        .status()
        .expect("run defgen");
    assert!(status.success());

    assert!(out_dir.join("WA.ts").exists());
    assert!(!out_dir.join("WA.ts.ts").exists());

    let output = std::fs::read_to_string(out_dir.join("WA.ts")).expect("read");
    assert!(output.contains("namespace WA {"));
    assert!(output.contains("export default WA;"));
}

#[test]
fn e2e_missing_library_fails_without_output() {
    let temp_dir = TempDir::new().expect("temp dir");

    let output = bin()
        .current_dir(temp_dir.path())
        .args(["WA", "Demo.Widgets", "No.Such.Library"])
        .output()
        .expect("run defgen");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No.Such.Library"), "Got:\n{}", stderr);
    assert!(!temp_dir.path().join("WA.ts").exists());
}

#[test]
fn e2e_invalid_metadata_fails_without_output() {
    let temp_dir = TempDir::new().expect("temp dir");
    let broken = temp_dir.path().join("broken.json");
    std::fs::write(&broken, "{ \"types\": [").expect("write");

    let output = bin()
        .current_dir(temp_dir.path())
        .args(["WA", "Demo.Widgets", broken.to_string_lossy().as_ref()])
        .output()
        .expect("run defgen");

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("WA.ts").exists());
}

#[test]
fn e2e_no_arguments_prints_help() {
    let temp_dir = TempDir::new().expect("temp dir");

    let output = bin()
        .current_dir(temp_dir.path())
        .output()
        .expect("run defgen");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Got:\n{}", stderr);
    assert_eq!(std::fs::read_dir(temp_dir.path()).expect("ls").count(), 0);
}

#[test]
fn e2e_dry_run_prints_to_stdout() {
    let temp_dir = TempDir::new().expect("temp dir");

    let output = bin()
        .current_dir(temp_dir.path())
        .args(["WA", "Demo.Widgets", widgets_json().as_str(), "--dry-run"])
        .output()
        .expect("run defgen");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = std::fs::read_to_string(fixture("widgets.ts")).expect("read golden");
    assert_eq!(stdout, expected);
    assert!(!temp_dir.path().join("WA.ts").exists());
}

#[test]
fn e2e_exclude_flag_drops_types() {
    let temp_dir = TempDir::new().expect("temp dir");

    let status = bin()
        .current_dir(temp_dir.path())
        .args([
            "WA",
            "Demo.Widgets",
            widgets_json().as_str(),
            "--exclude",
            "Demo.Extras.Internal.*",
        ])
        .status()
        .expect("run defgen");
    assert!(status.success());

    let output = std::fs::read_to_string(temp_dir.path().join("WA.ts")).expect("read");
    assert!(output.contains("class Chip"));
    assert!(!output.contains("Ghost"));
    assert!(!output.contains("namespace Internal"));
}

#[test]
fn e2e_config_search_paths_resolve_library_name() {
    let temp_dir = TempDir::new().expect("temp dir");
    let meta_dir = temp_dir.path().join("meta");
    std::fs::create_dir(&meta_dir).expect("mkdir");
    std::fs::copy(fixture("widgets.json"), meta_dir.join("Demo.Widgets.json")).expect("copy");

    std::fs::write(
        temp_dir.path().join("defgen.toml"),
        "[metadata]\nsearch_paths = [\"meta\"]\n\n[selection]\nexclude = [\"Demo.Extras.*\"]\n",
    )
    .expect("write config");

    let status = bin()
        .current_dir(temp_dir.path())
        .args(["WA", "Demo.Widgets", "Demo.Widgets"])
        .status()
        .expect("run defgen");
    assert!(status.success());

    let output = std::fs::read_to_string(temp_dir.path().join("WA.ts")).expect("read");
    assert!(output.contains("export declare class Badge"));
    assert!(!output.contains("class Chip"));
    assert!(!output.contains("export namespace Demo"));
}

#[test]
fn e2e_explicit_config_flag() {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = temp_dir.path().join("custom.toml");
    std::fs::write(&config, "[selection]\nexclude = [\"*.Holder\"]\n").expect("write config");

    let status = bin()
        .current_dir(temp_dir.path())
        .args([
            "WA",
            "Demo.Widgets",
            widgets_json().as_str(),
            "--config",
            config.to_string_lossy().as_ref(),
        ])
        .status()
        .expect("run defgen");
    assert!(status.success());

    let output = std::fs::read_to_string(temp_dir.path().join("WA.ts")).expect("read");
    assert!(!output.contains("class Holder"));
    assert!(output.contains("class Stack"));
}
