//! Interactive console prompts.
//!
//! All of this text is operator-facing and free-form; nothing parses it.
//! The input parsers are split out from the read loops so they can be
//! tested without a terminal.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::config::ColumnRef;

/// Print `prompt` and read one trimmed line from stdin.
pub fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Parse a 1-based selection against a list of `len` items.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

/// Numbered selection from several candidate files. Re-prompts indefinitely
/// on non-numeric or out-of-range input.
pub fn select_spreadsheet(candidates: &[PathBuf]) -> io::Result<PathBuf> {
    println!("\nSpreadsheets found:");
    for (i, path) in candidates.iter().enumerate() {
        println!("  {}: {}", i + 1, display_name(path));
    }

    loop {
        let input = read_line("\nEnter the number of the file to use: ")?;
        match parse_selection(&input, candidates.len()) {
            Some(index) => return Ok(candidates[index].clone()),
            None => println!("Please enter a number between 1 and {}.", candidates.len()),
        }
    }
}

/// Confirmation gate: the operator types `OK` to proceed, anything else
/// aborts cleanly.
pub fn confirm_start() -> io::Result<bool> {
    let input = read_line("\nType 'OK' to continue, or press Enter to cancel: ")?;
    Ok(input.eq_ignore_ascii_case("ok"))
}

/// Output folder prompt; empty input falls back to `default`.
pub fn prompt_output_dir(default: &str) -> io::Result<PathBuf> {
    let input = read_line(&format!(
        "\nEnter the folder to download videos into [{default}]: "
    ))?;
    if input.is_empty() {
        Ok(PathBuf::from(default))
    } else {
        Ok(PathBuf::from(input))
    }
}

/// Column-letter prompt; re-prompts until a single alphabetic character is
/// given.
pub fn prompt_column(label: &str) -> io::Result<ColumnRef> {
    loop {
        let input = read_line(&format!("Enter the column letter {label} (e.g. B): "))?;
        match ColumnRef::parse(&input) {
            Ok(column) => return Ok(column),
            Err(_) => println!("Please enter a single letter (A-Z)."),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        assert_eq!(parse_selection("1", 3), Some(0));
        assert_eq!(parse_selection(" 3 ", 3), Some(2));
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
    }

    #[test]
    fn test_selection_non_numeric() {
        assert_eq!(parse_selection("", 3), None);
        assert_eq!(parse_selection("two", 3), None);
        assert_eq!(parse_selection("-1", 3), None);
        assert_eq!(parse_selection("1.5", 3), None);
    }
}
