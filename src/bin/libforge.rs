//! libforge CLI - native library cross-build helpers
//!
//! Usage:
//!   libforge checksum <file> [--expect <hex>]   Print or verify a SHA-256 digest
//!   libforge locate <command>                  Find an executable on PATH
//!   libforge arch <arch>                       Show toolchain names for an architecture
//!   libforge abis [arch...]                    List Android ABIs
//!   libforge unpack <archive> <dest>           Stage a source tree from an archive
//!   libforge patch <dir> <name> [-D k=v]...    Apply a templated patch
//!   libforge render <name> [-o out] [-D k=v]   Render a template

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use libforge::{arch, output, BuildConfig, HashAlgorithm};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "libforge")]
#[command(about = "Helpers for cross-compiling native libraries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to libforge.toml
    #[arg(short, long, global = true, env = "LIBFORGE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SHA-256 digest of a file, or verify it
    Checksum {
        file: PathBuf,

        /// Expected hex digest
        #[arg(long)]
        expect: Option<String>,
    },

    /// Locate an executable on the search path
    Locate { command: String },

    /// Show toolchain names for an architecture identifier
    Arch { arch: String },

    /// List the Android ABIs among the given (or configured) architectures
    Abis { archs: Vec<String> },

    /// Unpack a source archive, replacing the destination
    Unpack { archive: PathBuf, dest: PathBuf },

    /// Render a patch template and apply it with `patch -p1`
    Patch {
        /// Source tree to patch
        dir: PathBuf,

        /// Patch name (without .diff)
        name: String,

        /// Substitution value
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_define)]
        define: Vec<(String, String)>,
    },

    /// Render a template from the templates directory
    Render {
        name: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Substitution value
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_define)]
        define: Vec<(String, String)>,
    },
}

fn parse_define(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Checksum { file, expect } => checksum(&file, expect.as_deref()),
        Commands::Locate { command } => match libforge::locate_command(&command) {
            Some(path) => {
                println!("{}", path.display());
                Ok(())
            }
            None => bail!("{} not found on PATH", command),
        },
        Commands::Arch { arch } => show_arch(&arch),
        Commands::Abis { archs } => {
            let archs = if archs.is_empty() {
                load_config(cli.config.as_deref())?.archs
            } else {
                archs
            };
            for abi in arch::get_android_abis(&archs) {
                println!("{}", abi);
            }
            Ok(())
        }
        Commands::Unpack { archive, dest } => {
            output::action(&format!("Unpacking {}", archive.display()));
            libforge::unpack_source(&archive, &dest)
                .with_context(|| format!("Failed to unpack {}", archive.display()))?;
            output::success(&format!("Sources staged in {}", dest.display()));
            Ok(())
        }
        Commands::Patch { dir, name, define } => {
            let config = load_config(cli.config.as_deref())?;
            let context: HashMap<String, String> = define.into_iter().collect();
            output::action(&format!("Applying patch {}", name));
            if !libforge::is_available(&config.patch_program) {
                output::warning(&format!("{} not found on PATH", config.patch_program));
            }
            config.patcher().apply(&dir, &name, &context)?;
            output::success(&format!("Patched {}", dir.display()));
            Ok(())
        }
        Commands::Render {
            name,
            output: out,
            define,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let context: HashMap<String, String> = define.into_iter().collect();
            let template = config.loader().template(&name).with_context(|| {
                format!(
                    "Failed to read template {}",
                    config.loader().template_path(&name).display()
                )
            })?;

            let missing: Vec<&str> = template
                .placeholders()
                .filter(|p| !context.contains_key(*p))
                .collect();
            if !missing.is_empty() {
                bail!("missing -D values for: {}", missing.join(", "));
            }

            let text = template.render(&context)?;
            match out {
                Some(path) => {
                    libforge::write_to_file(&path, &text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    output::detail(&format!("wrote {}", path.display()));
                }
                None => print!("{}", text),
            }
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<BuildConfig> {
    BuildConfig::discover(explicit).context("Failed to load libforge config")
}

fn checksum(file: &Path, expect: Option<&str>) -> Result<()> {
    match expect {
        Some(expected) => {
            libforge::verify_file_hash(file, expected, HashAlgorithm::Sha256)?;
            output::success(&format!("{} OK", file.display()));
        }
        None => {
            let digest = libforge::sha256_file(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            println!("{}  {}", digest, file.display());
        }
    }
    Ok(())
}

fn show_arch(id: &str) -> Result<()> {
    println!("platform: {}", arch::get_platform_from_arch(id));
    println!("android:  {}", arch::arch_is_android(id));

    if arch::arch_is_android(id) {
        let host = arch::get_android_configure_host_type(id)?;
        let info = arch::arch_to_setenv_info(id)?;
        println!("host:     {}", host);
        println!("cpu:      {}", info.android_arch);
        println!("toolchain: {}", info.toolchain);
    }

    let lib = arch::staticlib_name(id, "<name>");
    output::info(&format!("static libraries are named {}", lib));
    Ok(())
}
