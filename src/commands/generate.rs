//! @dose
//! purpose: Implements the generate command: load configuration and library metadata, run the
//!     generator, and write `<module>.ts` once the full text exists.
//!
//! when-editing:
//!     - !A metadata load failure aborts before anything is written
//!     - !The output file is written in a single call after generation completes
//!     - CLI --exclude patterns are appended to the config file's exclude list
//!
//! invariants:
//!     - Output is UTF-8 text named after the module, with any ".ts" suffix stripped first
//!     - --dry-run never touches the filesystem beyond reading inputs
//!
//! flows:
//!     - Load config (--config or ./defgen.toml) -> merge CLI excludes
//!     - Load library through JsonMetadataSource (path, then search paths)
//!     - Generator::build + emit -> write or print

use crate::cli::Cli;
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::generator::{DeclarationEmitter, Generator};
use crate::metadata::{JsonMetadataSource, MetadataSource};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn run_generate(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_file(path),
        None => Config::load(Path::new(".")),
    };
    config.selection.exclude.extend(cli.exclude.iter().cloned());

    if cli.verbose {
        let source = cli
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));
        println!("Using configuration from {}", source.display());
    }

    let module = module_name(&cli.module);

    let metadata = JsonMetadataSource::new(config.metadata.search_paths.clone());
    let library = metadata
        .load(&cli.library)
        .with_context(|| format!("Failed to load library metadata for {}", cli.library))?;

    if cli.verbose {
        println!(
            "Loaded {} ({} exported types)",
            library.assembly_full_name(),
            library.exported_types().count()
        );
    }

    let generator = Generator::new(&library, &config, module, cli.root_namespace.as_str());
    let run = generator.build();

    if cli.verbose {
        let folded: Vec<&str> = run.default_namespaces.iter().map(|s| s.as_str()).collect();
        println!("Default namespaces: {}", folded.join(", "));
        println!(
            "Selected {} types across {} namespaces",
            run.tree.type_count(),
            run.tree.nodes().len()
        );
    }

    let output = DeclarationEmitter::new(&run).emit();

    if cli.dry_run {
        print!("{}", output);
        return Ok(());
    }

    let output_path = output_path(&cli.out_dir, module);
    fs::write(&output_path, output)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if cli.verbose {
        println!("Wrote {}", output_path.display());
    }

    Ok(())
}

/// Module name without a trailing ".ts"
pub fn module_name(raw: &str) -> &str {
    raw.strip_suffix(".ts").unwrap_or(raw)
}

pub fn output_path(out_dir: &Path, module: &str) -> PathBuf {
    out_dir.join(format!("{}.ts", module))
}
