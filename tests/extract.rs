//! Integration tests for the ffmpeg wrapper, driven against fake ffmpeg
//! scripts so no real decoder is needed.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use stenote::extract::{ExtractError, FfmpegConfig, extract_wav, require_ffmpeg};

/// Write an executable shell script standing in for ffmpeg.
fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ffmpeg");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");

    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod script");

    path
}

fn dummy_input(dir: &Path) -> PathBuf {
    let path = dir.join("clip.mp4");
    fs::write(&path, b"dummy media").expect("write input");
    path
}

#[test]
fn failed_run_surfaces_captured_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ffmpeg = fake_ffmpeg(
        dir.path(),
        "echo 'clip.mp4: unsupported codec' >&2\nexit 1",
    );
    let input = dummy_input(dir.path());
    let output = dir.path().join("out").join("clip.wav");

    let err = extract_wav(&input, &output, &FfmpegConfig::default(), &ffmpeg).unwrap_err();

    match &err {
        ExtractError::Failed { status, stderr, .. } => {
            assert!(!status.success());
            assert!(stderr.contains("unsupported codec"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }

    // The rendered message carries the captured stderr for the user.
    let message = err.to_string();
    assert!(message.contains("ffmpeg failed to decode media"));
    assert!(message.contains("unsupported codec"));
}

#[test]
fn success_without_output_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ffmpeg = fake_ffmpeg(dir.path(), "exit 0");
    let input = dummy_input(dir.path());
    let output = dir.path().join("out").join("clip.wav");

    let err = extract_wav(&input, &output, &FfmpegConfig::default(), &ffmpeg).unwrap_err();
    assert!(matches!(err, ExtractError::OutputMissing(_)));
}

#[test]
fn successful_run_creates_output_and_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");

    // The output path is the last argument; "create" it like ffmpeg would.
    let ffmpeg = fake_ffmpeg(
        dir.path(),
        "for last in \"$@\"; do :; done\ntouch \"$last\"",
    );
    let input = dummy_input(dir.path());
    let output = dir.path().join("audio").join("clip.wav");

    let written =
        extract_wav(&input, &output, &FfmpegConfig::default(), &ffmpeg).expect("extract succeeds");

    assert_eq!(written, output);
    assert!(output.is_file());
}

#[test]
fn missing_binary_is_a_distinct_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dummy_input(dir.path());
    let output = dir.path().join("clip.wav");
    let ghost = dir.path().join("ghost-ffmpeg");

    // Spawn failure path (binary vanished after the up-front check).
    let err = extract_wav(&input, &output, &FfmpegConfig::default(), &ghost).unwrap_err();
    assert!(matches!(err, ExtractError::FfmpegNotFound));

    // Lookup failure path.
    let err = require_ffmpeg(Some(ghost.as_path())).unwrap_err();
    assert!(matches!(err, ExtractError::FfmpegNotFound));
}

#[test]
fn require_ffmpeg_resolves_a_containing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ffmpeg = fake_ffmpeg(dir.path(), "exit 0");

    let resolved = require_ffmpeg(Some(dir.path())).expect("resolves from directory");
    assert_eq!(resolved, ffmpeg);
}
