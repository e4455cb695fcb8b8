mod cli;
mod menu;

use clap::Parser;
use console::style;
use env_logger::Env;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;

use metaguard::analysis::{AnalysisOptions, analyze_file, render_report};
use metaguard::loader::{ensure_readable_file, mime};
use metaguard::metadata_editor::{
    apply_custom_metadata, apply_default_metadata, parse_metadata_pairs, wipe_metadata,
};
use metaguard::{Result, security};

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.default_log_filter()))
        .format_timestamp_millis()
        .init();

    security::init();

    let result = match cli.command {
        Some(command) => run(command),
        None => menu::run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", style(format!("Error: {error}")).red());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Analyze {
            path,
            json,
            no_hash,
        } => {
            let options = AnalysisOptions {
                include_hash: !no_hash,
            };
            let report = analyze_file(&path, &options)?;
            if json {
                println!("{}", report.to_json_pretty()?);
            } else {
                render_report(&report);
            }
            Ok(())
        }
        Command::VerifyExt { path } => verify_extension(&path),
        Command::Wipe { path, output } => {
            print_written(&wipe_metadata(&path, output.as_deref())?);
            Ok(())
        }
        Command::Default { path, output } => {
            print_written(&apply_default_metadata(&path, output.as_deref())?);
            Ok(())
        }
        Command::Custom { path, set, output } => {
            let metadata: BTreeMap<String, String> = set
                .iter()
                .flat_map(|pairs| parse_metadata_pairs(pairs))
                .collect();
            print_written(&apply_custom_metadata(&path, &metadata, output.as_deref())?);
            Ok(())
        }
    }
}

/// Informa si la extensión coincide con el contenido y sugiere la correcta.
pub(crate) fn verify_extension(path: &Path) -> Result<()> {
    let path = ensure_readable_file(path)?;

    if mime::extension_matches_mime(&path)? {
        println!(
            "{}",
            style(format!("✓ La extensión de {} coincide con su contenido", path.display())).green()
        );
        return Ok(());
    }

    println!(
        "{}",
        style(format!("⚠ La extensión de {} no coincide con su contenido", path.display())).yellow()
    );
    match mime::suggest_extension(&path)? {
        Some(extension) => println!("{}", style(format!("  Extensión sugerida: {extension}")).dim()),
        None => println!("{}", style("  No se pudo determinar el tipo real del archivo").dim()),
    }
    Ok(())
}

pub(crate) fn print_written(output: &Path) {
    println!(
        "{} {}",
        style("✓ Archivo generado:").green().bold(),
        output.display()
    );
}
