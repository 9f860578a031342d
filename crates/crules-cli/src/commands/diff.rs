//! Diff command implementation

use colored::Colorize;

use crules_core::{DiffLine, FileDiff};

use crate::context::Context;
use crate::error::Result;

/// Run the diff command for one file under `.cursor`.
pub fn run_diff(ctx: &Context, path: &str, verbose: bool) -> Result<()> {
    match ctx.workspace.diff(path, verbose)? {
        FileDiff::Identical => {
            println!("{} {} is identical to the repository.", "OK".green().bold(), path);
        }
        FileDiff::NewInProject(content) => {
            println!("{} {}", "New in project:".green().bold(), path);
            for line in content.lines() {
                println!("{}", format!("+ {}", line).green());
            }
        }
        FileDiff::DeletedInProject(content) => {
            println!("{} {}", "Only in repository:".red().bold(), path);
            for line in content.lines() {
                println!("{}", format!("- {}", line).red());
            }
        }
        FileDiff::Changed(lines) => {
            println!("{}", format!("--- repository/{}", path).red());
            println!("{}", format!("+++ project/{}", path).green());
            print_diff_lines(&lines, None);
        }
    }
    Ok(())
}

/// Print diff lines, stopping after `limit` lines when given.
pub fn print_diff_lines(lines: &[DiffLine], limit: Option<usize>) {
    let shown = limit.unwrap_or(lines.len()).min(lines.len());
    for line in &lines[..shown] {
        match line {
            DiffLine::Added(text) => println!("{}", format!("+ {}", text).green()),
            DiffLine::Removed(text) => println!("{}", format!("- {}", text).red()),
            DiffLine::Context(text) => println!("  {}", text.dimmed()),
        }
    }
    if shown < lines.len() {
        println!(
            "{}",
            format!("  ... {} more lines", lines.len() - shown).dimmed()
        );
    }
}
