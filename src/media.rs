use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File extensions we consider transcribable media, lowercase, without the dot.
///
/// Anything else found in the input directory is silently ignored.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "mov", "avi", // video containers
    "wav", "mp3", "m4a", "flac", // audio
];

/// Ensure `path` exists and is a directory, creating it (and any parents) when missing.
///
/// Returns the path back so call sites can chain directory setup.
pub fn validate_directory(path: impl Into<PathBuf>) -> Result<PathBuf> {
    let path = path.into();

    if !path.exists() {
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        anyhow::bail!("invalid directory: {}", path.display());
    }

    Ok(path)
}

/// Whether a path has a supported media extension (case-insensitive).
pub fn is_supported_media(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// List the supported media files directly inside `directory`.
///
/// Notes:
/// - Non-recursive; subdirectories are not descended into.
/// - Non-files and unsupported extensions are filtered out silently.
/// - Results are sorted by file name so processing order is deterministic.
pub fn discover_media_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("failed to read directory: {}", directory.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_supported_media(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Find a file in `directory` whose name matches `filename` case-insensitively.
///
/// Used to re-locate an extracted audio file whose on-disk casing may not match
/// what we asked ffmpeg to write (notably on case-insensitive filesystems).
pub fn find_media_file(directory: &Path, filename: &str) -> Result<Option<PathBuf>> {
    let wanted = filename.to_lowercase();

    let entries = fs::read_dir(directory)
        .with_context(|| format!("failed to read directory: {}", directory.display()))?;

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.to_lowercase() == wanted);

        if matches {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    #[test]
    fn is_supported_media_is_case_insensitive() {
        assert!(is_supported_media(Path::new("a.mp4")));
        assert!(is_supported_media(Path::new("a.MP3")));
        assert!(is_supported_media(Path::new("a.FlAc")));
        assert!(!is_supported_media(Path::new("a.txt")));
        assert!(!is_supported_media(Path::new("no_extension")));
    }

    #[test]
    fn validate_directory_creates_missing_dirs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");

        let validated = validate_directory(&nested)?;
        assert_eq!(validated, nested);
        assert!(nested.is_dir());

        // Calling again on an existing directory is fine.
        validate_directory(&nested)?;
        Ok(())
    }

    #[test]
    fn validate_directory_rejects_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("not_a_dir");
        File::create(&file)?;

        let err = validate_directory(&file).unwrap_err();
        assert!(err.to_string().contains("invalid directory"));
        Ok(())
    }

    #[test]
    fn discover_filters_and_sorts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        File::create(dir.path().join("b.mp4"))?;
        File::create(dir.path().join("a.WAV"))?;
        File::create(dir.path().join("notes.txt"))?;
        fs::create_dir(dir.path().join("sub.mp4"))?;

        let found = discover_media_files(dir.path())?;
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["a.WAV", "b.mp4"]);
        Ok(())
    }

    #[test]
    fn find_media_file_ignores_case() -> Result<()> {
        let dir = tempfile::tempdir()?;
        File::create(dir.path().join("Interview One.wav"))?;

        let found = find_media_file(dir.path(), "interview one.WAV")?;
        assert!(found.is_some());

        let missing = find_media_file(dir.path(), "other.wav")?;
        assert!(missing.is_none());
        Ok(())
    }
}
