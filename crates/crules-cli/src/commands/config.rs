//! Configuration profile commands

use colored::Colorize;

use crules_core::Scope;
use crules_core::config::{PartialProfile, Profile, ProfileKey};

use crate::cli::ConfigAction;
use crate::context::Context;
use crate::error::{CliError, Result};
use crate::interactive::confirm_delete;

fn scope(global: bool) -> Scope {
    if global { Scope::Global } else { Scope::Local }
}

/// Dispatch a `config` subcommand
pub fn run_config(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::List { global } => run_list(ctx, global),
        ConfigAction::Get { key, alias, global } => {
            run_get(ctx, key.as_deref(), alias.as_deref(), global)
        }
        ConfigAction::Set {
            key,
            value,
            alias,
            global,
        } => {
            let alias = match alias {
                Some(alias) => alias,
                None => ctx.workspace.active_profile().alias,
            };
            run_set(ctx, &alias, &key, &value, scope(global))
        }
        ConfigAction::Use { alias, global } => {
            ctx.workspace.store().set_active(&alias, scope(global))?;
            println!(
                "{} Now using profile {} ({})",
                "OK".green().bold(),
                alias.cyan(),
                scope(global)
            );
            Ok(())
        }
        ConfigAction::Create {
            alias,
            repository,
            pattern,
            message,
            global,
        } => run_create(ctx, &alias, repository, pattern, message, scope(global)),
        ConfigAction::Delete { alias, yes, global } => run_delete(ctx, &alias, yes, scope(global)),
        ConfigAction::Edit {
            alias,
            key,
            value,
            global,
        } => run_set(ctx, &alias, &key, &value, scope(global)),
        ConfigAction::Rename { old, new, global } => {
            ctx.workspace.store().rename(&old, &new, scope(global))?;
            println!(
                "{} Renamed profile {} to {}",
                "OK".green().bold(),
                old.cyan(),
                new.cyan()
            );
            Ok(())
        }
    }
}

fn run_list(ctx: &Context, global_only: bool) -> Result<()> {
    let store = ctx.workspace.store();
    let defined_globally = store
        .document(Scope::Global)
        .map(|document| document.profiles)
        .unwrap_or_default();

    println!("{}", "Profiles".bold());
    for (profile, active) in store.list() {
        if global_only && !profile.is_default() && !defined_globally.contains_key(&profile.alias) {
            continue;
        }
        let marker = if active { "*".green().bold() } else { " ".normal() };
        let repository = if profile.has_repository() {
            profile.repository.normal()
        } else {
            "(no repository)".dimmed()
        };
        println!("  {} {:<16} {}", marker, profile.alias.cyan(), repository);
    }
    Ok(())
}

fn run_get(ctx: &Context, key: Option<&str>, alias: Option<&str>, global_only: bool) -> Result<()> {
    let store = ctx.workspace.store();

    if global_only {
        let alias = alias.unwrap_or(crules_core::config::DEFAULT_ALIAS);
        let document = store.document(Scope::Global).unwrap_or_default();
        let Some(partial) = document.profiles.get(alias) else {
            return Err(CliError::user(format!(
                "Profile '{}' is not defined in the global configuration",
                alias
            )));
        };
        return match key {
            Some(key) => {
                let key: ProfileKey = key.parse()?;
                println!("{}", partial.get(key).unwrap_or_default());
                Ok(())
            }
            None => {
                print_fields(alias, |key| partial.get(key).unwrap_or_default().to_string());
                Ok(())
            }
        };
    }

    match key {
        Some(key) => {
            println!("{}", store.value(alias, key)?);
        }
        None => {
            let profile = store.get(alias).ok_or_else(|| {
                CliError::from(crules_core::ConfigError::NotFound {
                    alias: alias.unwrap_or_default().to_string(),
                })
            })?;
            print_profile(&profile);
        }
    }
    Ok(())
}

fn print_profile(profile: &Profile) {
    print_fields(&profile.alias, |key| profile.field(key));
}

fn print_fields(alias: &str, value: impl Fn(ProfileKey) -> String) {
    println!("{} {}", "Profile".bold(), alias.cyan());
    for key in ProfileKey::ALL {
        println!(
            "  {:<24} {}",
            format!("{}:", key).dimmed(),
            value(key)
        );
    }
}

fn run_set(ctx: &Context, alias: &str, key: &str, value: &str, scope: Scope) -> Result<()> {
    ctx.workspace.store().set_field(alias, key, value, scope)?;
    println!(
        "{} Set {} on {} ({})",
        "OK".green().bold(),
        key.cyan(),
        alias.cyan(),
        scope
    );
    Ok(())
}

fn run_create(
    ctx: &Context,
    alias: &str,
    repository: Option<String>,
    pattern: Option<String>,
    message: Option<String>,
    scope: Scope,
) -> Result<()> {
    let fields = PartialProfile {
        repository,
        protected_pattern: pattern,
        commit_message_template: message,
        ..PartialProfile::default()
    };
    let outcome = ctx.workspace.store().create(alias, fields, scope)?;
    for warning in &outcome.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    println!("{} Created profile {} ({})", "OK".green().bold(), alias.cyan(), scope);
    print_profile(&outcome.profile);
    if !outcome.profile.has_repository() {
        println!();
        println!(
            "Set a repository with {}",
            format!("crules config edit {} repository <url>", alias).cyan()
        );
    }
    Ok(())
}

fn run_delete(ctx: &Context, alias: &str, yes: bool, scope: Scope) -> Result<()> {
    if !yes && !confirm_delete(alias)? {
        println!("{}", "Delete cancelled.".yellow());
        return Ok(());
    }
    ctx.workspace.store().delete(alias, scope)?;
    println!("{} Deleted profile {} ({})", "OK".green().bold(), alias.cyan(), scope);
    Ok(())
}
