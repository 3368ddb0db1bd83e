//! Assertion helpers for E2E tests

use crate::RunOutcome;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

/// Assert loggrab exited with `expected`
pub fn assert_exit_code(outcome: &RunOutcome, expected: i32) -> Result<(), String> {
    if outcome.exit_code == Some(expected) {
        Ok(())
    } else {
        Err(format!(
            "Expected exit code {}, got {:?}\nstderr:\n{}",
            expected, outcome.exit_code, outcome.stderr
        ))
    }
}

/// Decompressed content of the single archive entry whose name ends with
/// `suffix`
pub fn read_archive_entry(archive: &Path, suffix: &str) -> Result<String, String> {
    let file = File::open(archive).map_err(|e| format!("Failed to open {}: {}", archive.display(), e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| format!("Invalid archive {}: {}", archive.display(), e))?;

    let names: Vec<String> = zip.file_names().map(str::to_string).collect();
    let matching: Vec<&String> = names.iter().filter(|n| n.ends_with(suffix)).collect();
    let name = match matching.as_slice() {
        [name] => name.as_str(),
        _ => return Err(format!("Expected one entry ending with {} in {:?}", suffix, names)),
    };

    let mut compressed = Vec::new();
    zip.by_name(name)
        .map_err(|e| format!("Failed to read entry {}: {}", name, e))?
        .read_to_end(&mut compressed)
        .map_err(|e| format!("Failed to read entry {}: {}", name, e))?;

    let mut content = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut content)
        .map_err(|e| format!("Entry {} is not gzip: {}", name, e))?;

    Ok(content)
}

/// Assert the archive holds exactly `line <first>` .. `line <last>` for
/// the entry ending with `suffix`
pub fn assert_archive_holds_lines(archive: &Path, suffix: &str, first: u32, last: u32) -> Result<(), String> {
    let content = read_archive_entry(archive, suffix)?;
    let expected: String = (first..=last).map(|i| format!("line {}\n", i)).collect();

    if content == expected {
        Ok(())
    } else {
        Err(format!(
            "Entry {} holds unexpected lines:\n{}\nexpected lines {}..{}",
            suffix, content, first, last
        ))
    }
}

/// Assert no `*_logs.zip` exists anywhere under `dir`
pub fn assert_no_archive(dir: &Path) -> Result<(), String> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| format!("Failed to walk {}: {}", dir.display(), e))?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with("_logs.zip") {
            return Err(format!("Unexpected archive: {}", entry.path().display()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_no_archive_finds_nested_archives() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("Advanced_Logs/Smoke/login");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("notes.txt"), "x").unwrap();

        assert!(assert_no_archive(dir.path()).is_ok());
        assert!(assert_no_archive(&dir.path().join("missing")).is_ok());

        std::fs::write(nested.join("1700000000_logs.zip"), "x").unwrap();
        let err = assert_no_archive(dir.path()).unwrap_err();
        assert!(err.contains("1700000000_logs.zip"), "{}", err);
    }
}
