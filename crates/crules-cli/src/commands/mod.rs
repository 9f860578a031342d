//! Command implementations

mod config;
mod diff;
mod push;
mod status;
mod sync;

pub use config::run_config;
pub use diff::{print_diff_lines, run_diff};
pub use push::run_push;
pub use status::run_status;
pub use sync::run_sync;

use colored::Colorize;
use crules_git::Refresh;

/// Print the warning for a degraded mirror refresh, if any.
fn print_refresh_warning(refresh: &Refresh) {
    if let Some(warning) = refresh.warning() {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
}
