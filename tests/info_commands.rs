#![cfg(unix)]

mod common;

use common::get_nativepack_binary;
use common::helpers::TestProject;
use std::fs;
use std::process::Command;

#[test]
fn manifest_prints_json() {
    let project = TestProject::with_toolchain("0.8.1\n");

    let output = project
        .command()
        .args(["manifest", "--pretty"])
        .output()
        .expect("Failed to execute nativepack manifest");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(manifest["name"], "caffe2");
    assert_eq!(manifest["version"], "0.8.1");
    assert_eq!(manifest["ext_modules"], serde_json::json!(["caffe2-ext"]));
    assert!(
        manifest["cmdclass"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["name"] == "develop")
    );
}

#[test]
fn manifest_honours_project_config() {
    let project = TestProject::with_toolchain("2.0.0");
    fs::write(
        project.root().join("nativepack.toml"),
        "[package]\nname = \"mypkg\"\n\n[dependencies]\ninstall = [\"six\", \"numpy\"]\n",
    )
    .unwrap();

    let output = project
        .command()
        .arg("manifest")
        .output()
        .expect("Failed to execute nativepack manifest");

    assert!(output.status.success());
    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(manifest["name"], "mypkg");
    assert_eq!(manifest["install_requires"], serde_json::json!(["numpy", "six"]));
}

#[test]
fn manifest_without_version_file_fails() {
    let project = TestProject::with_toolchain("0.8.1");
    fs::remove_file(project.root().join("VERSION_NUMBER")).unwrap();
    let elsewhere = project.root().join("nested");
    fs::create_dir_all(&elsewhere).unwrap();

    let output = project
        .command()
        .arg("manifest")
        .arg("--project-root")
        .arg(&elsewhere)
        .output()
        .expect("Failed to execute nativepack manifest");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("VERSION_NUMBER"));
}

#[test]
fn check_reports_toolchain() {
    let project = TestProject::with_toolchain("0.8.1");

    let output = project
        .command()
        .arg("check")
        .output()
        .expect("Failed to execute nativepack check");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {stdout}");
    assert!(stdout.contains(&project.bin_dir().join("cmake").display().to_string()));
    assert!(stdout.contains("version:   0.8.1"));
    assert!(stdout.contains("Ready to build"));
}

#[test]
fn check_flags_invalid_cmake_args() {
    let project = TestProject::with_toolchain("0.8.1");

    let output = project
        .command()
        .env("CMAKE_ARGS", "-DFOO='unterminated")
        .arg("check")
        .output()
        .expect("Failed to execute nativepack check");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("CMAKE_ARGS"));
}

#[test]
fn completion_needs_no_toolchain() {
    let output = Command::new(get_nativepack_binary())
        .env("PATH", "")
        .args(["completion", "bash"])
        .output()
        .expect("Failed to execute nativepack completion");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("nativepack"));
}
