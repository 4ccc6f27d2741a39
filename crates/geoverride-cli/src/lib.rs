//! geoverride-cli
//! ==============
//!
//! Command-line interface for the `geoverride-core` override documents.
//!
//! The binary (`geoverride`) loads the `"geo.custom"` override from the admin
//! settings store, applies one command, and saves the whole document back
//! if the command changed it. The library target hosts the command runner so
//! it can be driven from tests.
//!
//! Quick start
//! -----------
//!
//! ```text
//! geoverride --file settings.json show
//! geoverride --file settings.json add-state --code RJ --name-en Rajasthan
//! geoverride --file settings.json rename states RJ RAJ
//! geoverride --file settings.json hide districts:RAJ RJ-33
//! geoverride --base base.json.gz search jaipur
//! ```
//!
//! Without `--file`, the `[api]` section of the config file selects the
//! REST endpoint (`GET`/`PATCH {base_url}/settings`).
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod args;

use crate::args::{CliArgs, Commands, EntryFields};
use anyhow::{anyhow, bail, Context};
use geoverride_core::config::ConsoleConfig;
use geoverride_core::{
    load_override, save_override, BaseDirectory, EntryPatch, FileSettingsStore, GeoOverride,
    ResolvedDirectory, ResolvedEntry, Scope, SettingsStore,
};
use std::io::Write;
use std::path::PathBuf;

/// Runs one CLI invocation, writing human output to `out`.
pub fn run(args: CliArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ConsoleConfig::load_from(path)?,
        None => ConsoleConfig::load(),
    };
    let base_path = args.base.clone().or_else(|| config.directory_path());

    // Read-only views of the resolved directory.
    match &args.command {
        Commands::Resolved { .. } | Commands::Search { .. } | Commands::Stats => {
            let store = open_store(&args, &config)?;
            let doc = load_override(&*store).context("loading geo override")?;
            let base = load_base(base_path)?;
            return print_view(&args.command, &ResolvedDirectory::new(&base, &doc), out);
        }
        _ => {}
    }

    let store = open_store(&args, &config)?;
    let mut doc = load_override(&*store).context("loading geo override")?;

    if apply(&args.command, &mut doc, out)? {
        save_override(&*store, &doc).context("saving geo override")?;
        tracing::info!("override saved");
    }
    Ok(())
}

/// Applies a mutating (or `show`) command. Returns whether the document changed.
fn apply(command: &Commands, doc: &mut GeoOverride, out: &mut impl Write) -> anyhow::Result<bool> {
    match command {
        Commands::Show => {
            writeln!(out, "{}", doc.to_json_string_pretty()?)?;
            Ok(false)
        }

        Commands::AddState { fields } => insert(doc, &Scope::States, fields, out),
        Commands::AddDistrict { state, fields } => {
            insert(doc, &Scope::districts(state.trim()), fields, out)
        }
        Commands::AddCity {
            state,
            district,
            fields,
        } => insert(doc, &Scope::cities(state.trim(), district.trim()), fields, out),

        Commands::Rename { scope, old, new } => {
            let id = find(doc, scope, old)?;
            doc.update_entry(scope, id, EntryPatch::code(new.as_str()))?;
            writeln!(out, "Renamed {} -> {} in {}", old.trim(), new.trim(), scope)?;
            Ok(true)
        }

        Commands::Remove { scope, code } => {
            let id = find(doc, scope, code)?;
            doc.remove_entry(scope, id);
            writeln!(out, "Removed {} from {}", code.trim(), scope)?;
            Ok(true)
        }

        Commands::Hide { scope, code } => {
            let changed = doc.hide_code(scope, code);
            if changed {
                writeln!(out, "Hidden {} in {}", code.trim(), scope)?;
            } else {
                writeln!(out, "{} is already hidden in {}", code.trim(), scope)?;
            }
            Ok(changed)
        }

        Commands::Unhide { scope, code } => {
            let changed = doc.unhide_code(scope, code);
            if changed {
                writeln!(out, "Unhidden {} in {}", code.trim(), scope)?;
            } else {
                writeln!(out, "{} was not hidden in {}", code.trim(), scope)?;
            }
            Ok(changed)
        }

        Commands::Resolved { .. } | Commands::Search { .. } | Commands::Stats => Ok(false),
    }
}

fn insert(
    doc: &mut GeoOverride,
    scope: &Scope,
    fields: &EntryFields,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let patch = EntryPatch::code(fields.code.as_str())
        .with_name_en(fields.name_en.as_str())
        .with_name_hi(fields.name_hi.as_str());
    doc.insert(scope, patch)?;
    writeln!(out, "Added {} to {}", fields.code.trim(), scope)?;
    Ok(true)
}

fn find(doc: &GeoOverride, scope: &Scope, code: &str) -> anyhow::Result<geoverride_core::EntryId> {
    doc.find_by_code(scope, code)
        .map(|e| e.id())
        .ok_or_else(|| anyhow!("no custom entry '{}' in {}", code.trim(), scope))
}

fn print_view(
    command: &Commands,
    view: &ResolvedDirectory<'_>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Resolved { scope } => {
            let scope = scope.clone().unwrap_or(Scope::States);
            for entry in view.entries(&scope) {
                print_entry(&entry, out)?;
            }
        }
        Commands::Search { query } => {
            let hits = view.find_by_name(query);
            if hits.is_empty() {
                writeln!(out, "No entries found matching: {query}")?;
            }
            for hit in hits {
                write!(out, "[{}] ", hit.scope)?;
                print_entry(&hit.entry, out)?;
            }
        }
        Commands::Stats => {
            let stats = view.stats();
            writeln!(out, "Resolved directory:")?;
            writeln!(out, "  States: {}", stats.states)?;
            writeln!(out, "  Districts: {}", stats.districts)?;
            writeln!(out, "  Cities: {}", stats.cities)?;
        }
        _ => {}
    }
    Ok(())
}

fn print_entry(entry: &ResolvedEntry, out: &mut impl Write) -> anyhow::Result<()> {
    let origin = match entry.origin {
        geoverride_core::Origin::Base => "",
        geoverride_core::Origin::Overridden => " (overridden)",
        geoverride_core::Origin::Custom => " (custom)",
    };
    if entry.name_hi.is_empty() {
        writeln!(out, "{} {}{}", entry.code, entry.name_en, origin)?;
    } else {
        writeln!(out, "{} {} / {}{}", entry.code, entry.name_en, entry.name_hi, origin)?;
    }
    Ok(())
}

fn load_base(path: Option<PathBuf>) -> anyhow::Result<BaseDirectory> {
    let Some(path) = path else {
        bail!("no base directory: pass --base or set [directory] path in the config");
    };
    #[cfg(feature = "json")]
    {
        BaseDirectory::load_cached(&path)
            .with_context(|| format!("loading base directory {}", path.display()))
    }
    #[cfg(not(feature = "json"))]
    {
        BaseDirectory::read_snapshot(&path)
            .with_context(|| format!("loading base directory snapshot {}", path.display()))
    }
}

fn open_store(args: &CliArgs, config: &ConsoleConfig) -> anyhow::Result<Box<dyn SettingsStore>> {
    if let Some(path) = &args.file {
        tracing::debug!(path = %path.display(), "using local settings file");
        return Ok(Box::new(FileSettingsStore::new(path)));
    }

    #[cfg(feature = "http")]
    if let Some(session) = config.session() {
        tracing::debug!(base_url = session.base_url(), "using settings endpoint");
        return Ok(Box::new(geoverride_core::HttpSettingsStore::from(session)));
    }

    #[cfg(not(feature = "http"))]
    let _ = config;

    bail!("no settings source: pass --file or configure [api] base_url and token")
}
