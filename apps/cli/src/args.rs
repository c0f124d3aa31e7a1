//! # CLI Argument Definitions
//!
//! Every subcommand that needs a graph takes it through `--graph`; results are printed as
//! JSON on stdout.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fvgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Resolves singleton feature versions into a minimal set of test configurations")]
pub(crate) struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); overrides the config level
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    /// Settings file; without it an optional `fvgen.toml` in the working directory is read
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Args)]
pub(crate) struct GraphSource {
    /// Graph document (`.json` or `.toml`)
    #[arg(short, long)]
    pub(crate) graph: PathBuf,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Print every legal variant of the given features
    Expand {
        #[command(flatten)]
        source: GraphSource,
        /// Feature names or short names
        #[arg(required = true)]
        features: Vec<String>,
    },
    /// Pack the variants of the given features (all features when omitted) into configurations
    Generate {
        #[command(flatten)]
        source: GraphSource,
        /// Feature names or short names
        features: Vec<String>,
        /// Never use this feature as a root (repeatable)
        #[arg(long = "ignore", value_name = "FEATURE")]
        ignored: Vec<String>,
        /// Only expand the requested roots, not the features they reach
        #[arg(long)]
        no_reachable: bool,
        /// Also print the permutation set of every expanded feature
        #[arg(long)]
        permutations: bool,
    },
    /// Parse a trigger filter and print what it requires
    Filter {
        /// The filter expression, e.g. '(&(type=osgi.subsystem.feature)(osgi.identity=a-1.0))'
        filter: String,
        /// Print the raw clause sets instead of the required feature names
        #[arg(long)]
        clauses: bool,
    },
    /// Check the trigger filters of every auto feature in the graph
    Triggers {
        #[command(flatten)]
        source: GraphSource,
        /// Fail when any trigger is unsatisfiable, malformed or names unknown features
        #[arg(long)]
        strict: bool,
    },
}
