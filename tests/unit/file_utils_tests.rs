/*!
 * Tests for file and folder utilities
 */

use std::fs;

use anyhow::Result;
use capwright::file_utils::FileManager;

use crate::common;

/// Output paths carry the tag between stem and extension
#[test]
fn test_generate_output_path_withTagAndExtension_shouldComposeName() {
    let path = FileManager::generate_output_path("clips/video.mkv", "out", "captioned", "mp4");

    assert_eq!(path, std::path::PathBuf::from("out/video.captioned.mp4"));
}

/// Video detection goes by extension, case-insensitively
#[test]
fn test_is_video_file_withVariousExtensions_shouldDetectVideos() -> Result<()> {
    let dir = common::create_temp_dir()?;

    for name in ["a.mp4", "b.MKV", "c.mov"] {
        fs::write(dir.path().join(name), b"x")?;
        assert!(
            FileManager::is_video_file(dir.path().join(name)),
            "{} should be a video",
            name
        );
    }

    for name in ["d.srt", "e.txt", "f.wav"] {
        fs::write(dir.path().join(name), b"x")?;
        assert!(!FileManager::is_video_file(dir.path().join(name)));
    }

    // A directory is never a video file
    assert!(!FileManager::is_video_file(dir.path()));

    Ok(())
}

/// Directory scans find nested videos and return them sorted
#[test]
fn test_find_video_files_withNestedDirs_shouldFindAllSorted() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let nested = dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    fs::write(dir.path().join("b.mp4"), b"x")?;
    fs::write(nested.join("a.mkv"), b"x")?;
    fs::write(dir.path().join("notes.txt"), b"x")?;

    let found = FileManager::find_video_files(dir.path())?;

    assert_eq!(found.len(), 2);
    assert!(found.windows(2).all(|w| w[0] <= w[1]));
    assert!(found.iter().any(|p| p.ends_with("a.mkv")));
    assert!(found.iter().any(|p| p.ends_with("b.mp4")));

    Ok(())
}

/// ensure_dir creates missing parents and tolerates existing dirs
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAndTolerate() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let deep = dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&deep)?;
    assert!(FileManager::dir_exists(&deep));

    // Second call is a no-op
    FileManager::ensure_dir(&deep)?;

    Ok(())
}

/// write_to_file creates parent directories and round-trips content
#[test]
fn test_write_to_file_withMissingParent_shouldCreateAndRoundTrip() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("sub").join("captions.srt");

    FileManager::write_to_file(&path, "1\n00:00:00,000 --> 00:00:01,000\nHi\n")?;

    assert!(FileManager::file_exists(&path));
    let content = FileManager::read_to_string(&path)?;
    assert!(content.contains("Hi"));

    Ok(())
}
