//! Formatting functions for terminal output.
//!
//! Errors and warnings go to stderr, everything else to stdout.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::RepoState;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_info(message: &str) {
    println!("{} {}", style("ℹ").cyan(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render the branch and short status, as shown by `info`.
pub fn format_state(state: &RepoState) -> String {
    let mut out = format!("On branch {}\n", style(&state.branch).bold());
    if state.is_clean() {
        out.push_str("nothing to commit, working tree clean\n");
    } else {
        for line in state.status.lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}

pub fn display_state(state: &RepoState) {
    print!("{}", format_state(state));
}

/// Display a numbered list of choices, 1-based.
pub fn display_choices(question: &str, choices: &[&str]) {
    println!("\n{}", style(question).bold());
    for (i, choice) in choices.iter().enumerate() {
        println!("  {}. {}", i + 1, choice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clean_state() {
        console::set_colors_enabled(false);
        let state = RepoState {
            branch: "development".to_string(),
            status: String::new(),
        };
        assert_eq!(
            format_state(&state),
            "On branch development\nnothing to commit, working tree clean\n"
        );
    }

    #[test]
    fn test_format_dirty_state() {
        console::set_colors_enabled(false);
        let state = RepoState {
            branch: "feature-x".to_string(),
            status: " M README.md\n?? notes.txt\n".to_string(),
        };
        let out = format_state(&state);
        assert!(out.contains("  M README.md\n"));
        assert!(out.contains("  ?? notes.txt\n"));
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
