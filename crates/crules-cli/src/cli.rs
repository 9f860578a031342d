//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keep a project's Cursor rules in step with a shared repository
#[derive(Parser, Debug)]
#[command(name = "crules")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Home directory holding the global configuration and caches
    #[arg(long, global = true, env = "CRULES_HOME", hide = true)]
    pub home: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Replace the project's .cursor rules with the shared ones
    ///
    /// Files matching the profile's protected pattern are kept.
    Sync {
        /// Show what would happen without touching .cursor
        #[arg(long)]
        dry_run: bool,
    },

    /// Publish local rule changes to the shared repository
    Push {
        /// Show the change counts without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the review prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List rule files that differ from the shared repository
    Status,

    /// Show line differences for one rule file
    ///
    /// The path is relative to .cursor, e.g. rules/example.mdc
    Diff {
        /// File to compare
        path: String,
    },

    /// Manage configuration profiles
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// List all profiles
    List {
        /// Only show profiles defined in the global configuration
        #[arg(long)]
        global: bool,
    },

    /// Show a profile, or one of its values
    Get {
        /// Key to show (repository, cacheDir, protectedPattern, commitMessageTemplate)
        key: Option<String>,

        /// Profile to read instead of the active one
        #[arg(long)]
        alias: Option<String>,

        /// Read only the global configuration
        #[arg(long)]
        global: bool,
    },

    /// Set a value on a profile
    Set {
        key: String,
        value: String,

        /// Profile to change instead of the active one
        #[arg(long)]
        alias: Option<String>,

        /// Write to the global configuration instead of the project's
        #[arg(long)]
        global: bool,
    },

    /// Switch the active profile
    Use {
        alias: String,

        /// Write to the global configuration instead of the project's
        #[arg(long)]
        global: bool,
    },

    /// Create a profile
    Create {
        alias: String,

        /// Repository URL
        #[arg(short, long)]
        repository: Option<String>,

        /// Protected file pattern (regular expression)
        #[arg(short = 'p', long)]
        pattern: Option<String>,

        /// Commit message template; {summary} is replaced with the change summary
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// Write to the global configuration instead of the project's
        #[arg(long)]
        global: bool,
    },

    /// Delete a profile
    Delete {
        alias: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Write to the global configuration instead of the project's
        #[arg(long)]
        global: bool,
    },

    /// Set a value on a named profile
    Edit {
        alias: String,
        key: String,
        value: String,

        /// Write to the global configuration instead of the project's
        #[arg(long)]
        global: bool,
    },

    /// Rename a profile
    Rename {
        old: String,
        new: String,

        /// Write to the global configuration instead of the project's
        #[arg(long)]
        global: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_push_flags() {
        let cli = Cli::parse_from(["crules", "push", "--dry-run", "--force"]);
        assert_eq!(
            cli.command,
            Commands::Push {
                dry_run: true,
                force: true
            }
        );
    }

    #[test]
    fn parse_config_create() {
        let cli = Cli::parse_from([
            "crules", "config", "create", "work", "-r", "git@host:rules.git", "-p", "^local-",
            "--global",
        ]);
        assert_eq!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Create {
                    alias: "work".to_string(),
                    repository: Some("git@host:rules.git".to_string()),
                    pattern: Some("^local-".to_string()),
                    message: None,
                    global: true,
                }
            }
        );
    }

    #[test]
    fn parse_config_get_without_key() {
        let cli = Cli::parse_from(["crules", "config", "get", "--alias", "work"]);
        assert_eq!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Get {
                    key: None,
                    alias: Some("work".to_string()),
                    global: false,
                }
            }
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["crules", "status", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn diff_requires_path() {
        assert!(Cli::try_parse_from(["crules", "diff"]).is_err());
    }
}
