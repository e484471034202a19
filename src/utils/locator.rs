//! Locating candidate spreadsheets in the working directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::models::{AppError, AppResult};

/// Non-recursive scan of `dir` for `.xlsx` files, sorted by file name so the
/// selection prompt is deterministic.
///
/// Finding nothing is fatal: the run has no input to work with.
pub fn find_spreadsheets(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_xlsx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
            .unwrap_or(false);
        if is_xlsx {
            found.push(path);
        }
    }

    if found.is_empty() {
        return Err(AppError::NoSpreadsheetFound(dir.to_path_buf()));
    }

    found.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    debug!("found {} candidate spreadsheet(s) in {}", found.len(), dir.display());
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_no_spreadsheet_is_fatal() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let err = find_spreadsheets(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::NoSpreadsheetFound(_)));
    }

    #[test]
    fn test_finds_and_sorts_candidates() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.xlsx")).unwrap();
        File::create(dir.path().join("a.xlsx")).unwrap();
        File::create(dir.path().join("links.XLSX")).unwrap();
        File::create(dir.path().join("ignored.csv")).unwrap();

        let found = find_spreadsheets(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx", "links.XLSX"]);
    }

    #[test]
    fn test_directories_are_not_candidates() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.xlsx")).unwrap();
        File::create(dir.path().join("real.xlsx")).unwrap();

        let found = find_spreadsheets(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
    }
}
