//! @dose
//! purpose: Command-line interface for defgen using clap derive macros. Three positional inputs
//!     (module name, root namespace, library locator) plus output and configuration options.
//!
//! when-editing:
//!     - !All three positionals are required; running with none prints help and exits
//!     - PathBuf is used for all file/directory path arguments
//!
//! gotchas:
//!     - The library locator is a String, not a PathBuf: it may be a library name resolved
//!       through metadata search paths
//!     - A module name ending in ".ts" is accepted; the suffix is stripped in the command

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "defgen")]
#[command(author, version, about = "TypeScript declaration generator for reflected widget libraries")]
#[command(arg_required_else_help = true)]
#[command(after_help = "Example: defgen XF Xamarin.Forms ./metadata/Xamarin.Forms.Core.json\n\
Example: defgen WA WebAtoms WebAtoms.XF --config defgen.toml")]
pub struct Cli {
    /// Output module name (also the output file stem)
    #[arg(value_name = "MODULE")]
    pub module: String,

    /// Root namespace seeding the default namespace set when the library declares none
    #[arg(value_name = "ROOT_NAMESPACE")]
    pub root_namespace: String,

    /// Metadata file path or library name to reflect
    #[arg(value_name = "LIBRARY")]
    pub library: String,

    /// Directory the declaration file is written to
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Configuration file (defaults to ./defgen.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exclude types whose full name matches glob pattern (can be repeated)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Print declarations to stdout instead of writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
