//! CLI subcommands — synth, validate, outputs, assets, schema, completions.

use crate::assets;
use crate::core::synth;
use crate::core::types::{DeployContext, Environment, Manifest};
use crate::stacks::{self, backend};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "trazado",
    version,
    about = "Rust-native cloud stack synthesis — declarative resource graphs, deterministic manifests, BLAKE3 asset fingerprints"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Manifest output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize manifests for every stack
    Synth {
        /// Directory to write manifests into
        #[arg(short, long, default_value = "manifests")]
        out_dir: PathBuf,

        /// Manifest format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Existing network partition ID (default: automatic lookup)
        #[arg(long)]
        network_id: Option<String>,

        /// Base directory asset paths are resolved against
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,

        /// Skip the asset-directory existence check
        #[arg(long)]
        skip_asset_check: bool,
    },

    /// Validate the declaration tree without writing manifests
    Validate {
        /// Existing network partition ID (default: automatic lookup)
        #[arg(long)]
        network_id: Option<String>,
    },

    /// Print the cross-stack export table
    Outputs {
        /// Existing network partition ID (default: automatic lookup)
        #[arg(long)]
        network_id: Option<String>,
    },

    /// Verify and fingerprint asset directories
    Assets {
        /// Base directory asset paths are resolved against
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
    },

    /// Print the manifest JSON schema
    Schema,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Synth {
            out_dir,
            format,
            network_id,
            base_dir,
            skip_asset_check,
        } => cmd_synth(&out_dir, format, network_id, &base_dir, skip_asset_check),
        Commands::Validate { network_id } => cmd_validate(network_id),
        Commands::Outputs { network_id } => cmd_outputs(network_id),
        Commands::Assets { base_dir } => cmd_assets(&base_dir),
        Commands::Schema => cmd_schema(),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "trazado",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

fn build_manifests(network_id: Option<String>) -> Result<Vec<Manifest>, String> {
    let env = Environment::from_env();
    let ctx = DeployContext {
        existing_network_id: network_id,
    };
    let app = stacks::platform_app(&env, &ctx, backend::DEFAULT_ROSTER)?;
    app.synth_all()
}

fn manifest_file_name(stack: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format!("{}.manifest.json", stack),
        OutputFormat::Yaml => format!("{}.manifest.yaml", stack),
    }
}

fn cmd_synth(
    out_dir: &Path,
    format: OutputFormat,
    network_id: Option<String>,
    base_dir: &Path,
    skip_asset_check: bool,
) -> Result<(), String> {
    let manifests = build_manifests(network_id)?;

    if !skip_asset_check {
        for manifest in &manifests {
            assets::verify_assets(manifest, base_dir)?;
        }
    }

    std::fs::create_dir_all(out_dir)
        .map_err(|e| format!("cannot create {}: {}", out_dir.display(), e))?;

    for manifest in &manifests {
        let rendered = match format {
            OutputFormat::Json => synth::render_json(manifest)?,
            OutputFormat::Yaml => synth::render_yaml(manifest)?,
        };
        let path = out_dir.join(manifest_file_name(&manifest.stack, format));
        std::fs::write(&path, rendered)
            .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;

        println!(
            "{}: {} resources, {} outputs, {}",
            manifest.stack,
            manifest.resources.len(),
            manifest.outputs.len(),
            synth::manifest_hash(manifest)?
        );
    }
    println!("wrote {} manifests to {}", manifests.len(), out_dir.display());
    Ok(())
}

fn cmd_validate(network_id: Option<String>) -> Result<(), String> {
    let manifests = build_manifests(network_id)?;
    for manifest in &manifests {
        println!("{}: OK", manifest.stack);
    }
    Ok(())
}

fn cmd_outputs(network_id: Option<String>) -> Result<(), String> {
    let manifests = build_manifests(network_id)?;
    for manifest in &manifests {
        for output in manifest.outputs.values() {
            println!("{}\t{}\t{}", output.export, output.value, manifest.stack);
        }
    }
    Ok(())
}

fn cmd_assets(base_dir: &Path) -> Result<(), String> {
    let manifests = build_manifests(None)?;
    for manifest in &manifests {
        for (path, fingerprint) in assets::fingerprint_assets(manifest, base_dir)? {
            println!("{}\t{}\t{}", manifest.stack, path, fingerprint);
        }
    }
    Ok(())
}

fn cmd_schema() -> Result<(), String> {
    let schema = schemars::schema_for!(Manifest);
    let json =
        serde_json::to_string_pretty(&schema).map_err(|e| format!("schema error: {}", e))?;
    println!("{}", json);
    Ok(())
}
