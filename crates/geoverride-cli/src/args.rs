use clap::{Args, Parser, Subcommand};
use geoverride_core::Scope;
use std::path::PathBuf;

/// CLI arguments for geoverride
#[derive(Debug, Parser)]
#[command(
    name = "geoverride",
    version,
    about = "Inspect and edit the geo override document of the admin settings store"
)]
pub struct CliArgs {
    /// Config file (default: $GEOVERRIDE_CONFIG or ~/.geoverride/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Use a local settings JSON file instead of the REST endpoint
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Base directory JSON(.gz) used by `resolved`, `search` and `stats`
    #[arg(short = 'b', long = "base", global = true)]
    pub base: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Fields of a new entry.
#[derive(Debug, Args)]
pub struct EntryFields {
    /// Code of the new entry (unique among its siblings)
    #[arg(long)]
    pub code: String,

    /// English name
    #[arg(long = "name-en", default_value = "")]
    pub name_en: String,

    /// Hindi name
    #[arg(long = "name-hi", default_value = "")]
    pub name_hi: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the persisted override document
    Show,

    /// Add a custom state
    AddState {
        #[command(flatten)]
        fields: EntryFields,
    },

    /// Add a custom district under a state code
    AddDistrict {
        /// Parent state code
        state: String,
        #[command(flatten)]
        fields: EntryFields,
    },

    /// Add a custom city under a state and district code
    AddCity {
        /// Parent state code
        state: String,
        /// Parent district code
        district: String,
        #[command(flatten)]
        fields: EntryFields,
    },

    /// Rename a custom entry's code, moving everything keyed by it
    Rename {
        /// `states`, `districts:STATE` or `cities:STATE/DISTRICT`
        scope: Scope,
        old: String,
        new: String,
    },

    /// Remove a custom entry and everything keyed by its code
    Remove { scope: Scope, code: String },

    /// Hide a base directory code
    Hide { scope: Scope, code: String },

    /// Un-hide a base directory code
    Unhide { scope: Scope, code: String },

    /// List the base directory with the override applied
    Resolved {
        /// Sibling list to show (default: states)
        scope: Option<Scope>,
    },

    /// Search resolved names (accent- and case-insensitive)
    Search { query: String },

    /// Count resolved states, districts and cities
    Stats,
}
