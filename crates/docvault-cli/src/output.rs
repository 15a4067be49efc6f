//! Terminal rendering for tree listings, upload reports and notices.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows in the selected format, or `empty` when there are none.
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat, empty: &str) {
    match format {
        OutputFormat::Table if items.is_empty() => println!("{empty}"),
        OutputFormat::Table => println!("{}", Table::new(items)),
        OutputFormat::Json => print_json(&items),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Label for one tree row.
///
/// `path` holds one flag per level below the roots, set when the node on
/// that level is the last of its siblings. Roots have an empty path.
pub fn tree_label(text: &str, path: &[bool]) -> String {
    let Some((last, ancestors)) = path.split_last() else {
        return text.to_string();
    };
    let mut label = String::with_capacity(text.len() + path.len() * 4);
    for ancestor_last in ancestors {
        label.push_str(if *ancestor_last { "   " } else { "│  " });
    }
    label.push_str(if *last { "└─ " } else { "├─ " });
    label.push_str(text);
    label
}

/// One-line summary such as `2 uploaded, 1 failed`, skipping zero counts.
pub fn totals_line(counts: &[(usize, &str)]) -> String {
    let parts: Vec<String> = counts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{count} {label}"))
        .collect();
    if parts.is_empty() {
        "nothing to report".to_string()
    } else {
        parts.join(", ")
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a notice that stays until dismissed, with the files it names.
pub fn print_sticky(msg: &str, files: &[String]) {
    println!("⚠ {msg}");
    for file in files {
        println!("    · {file}");
    }
}

/// Print a cancelled prompt
pub fn print_cancelled(what: &str) {
    println!("– {what} cancelled");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_label_draws_guides() {
        assert_eq!(tree_label("A1", &[]), "A1");
        assert_eq!(tree_label("F1", &[false]), "├─ F1");
        assert_eq!(tree_label("F2", &[false, true]), "│  └─ F2");
        assert_eq!(tree_label("F3", &[true, false]), "   ├─ F3");
    }

    #[test]
    fn test_totals_line_skips_zero_counts() {
        assert_eq!(totals_line(&[(2, "uploaded"), (0, "failed")]), "2 uploaded");
        assert_eq!(totals_line(&[(1, "uploaded"), (1, "failed")]), "1 uploaded, 1 failed");
        assert_eq!(totals_line(&[(0, "uploaded")]), "nothing to report");
    }
}
