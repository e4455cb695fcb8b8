//! Menú interactivo para quien ejecuta el binario sin subcomando.

use console::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use metaguard::analysis::{AnalysisOptions, analyze_file, render_report};
use metaguard::metadata_editor::{
    apply_custom_metadata, apply_default_metadata, parse_metadata_pairs, wipe_metadata,
};
use metaguard::Result;

use crate::{print_written, verify_extension};

const HEADER_WIDTH: usize = 66;

pub fn run() -> Result<()> {
    render_header();

    loop {
        render_options();

        let Some(choice) = prompt("Selecciona una opción")? else {
            println!("\n{}", style("Fin de la entrada. ¡Hasta luego!").dim());
            return Ok(());
        };

        let result = match choice.as_str() {
            "1" => with_path(|path| {
                let report = analyze_file(path, &AnalysisOptions::default())?;
                render_report(&report);
                Ok(())
            }),
            "2" => with_path(verify_extension),
            "3" => with_path(|path| report_written(wipe_metadata(path, None)?)),
            "4" => with_path(|path| report_written(apply_default_metadata(path, None)?)),
            "5" => with_path(custom_metadata),
            "6" | "salir" | "exit" => {
                println!("{}", style("Hasta luego!").dim());
                return Ok(());
            }
            "" => continue,
            _ => {
                println!(
                    "\n{}",
                    style("│ Opción inválida. Intenta de nuevo.").yellow()
                );
                continue;
            }
        };

        if let Err(error) = result {
            println!("\n{}", style(format!("│ Error: {error}")).red());
        }
    }
}

fn render_header() {
    let border = "─".repeat(HEADER_WIDTH - 2);
    println!("\n{}", style(format!("┌{}┐", border)).cyan());
    println!(
        "{}",
        style(format!(
            "│ {:^inner_width$} │",
            "▸ metaguard · Análisis y saneamiento de metadata ◂",
            inner_width = HEADER_WIDTH - 4
        ))
        .cyan()
        .bold()
    );
    println!("{}", style(format!("└{}┘", border)).cyan());
}

fn render_options() {
    println!("\n{}", style("┌─ Opciones ─").cyan());
    println!("{}", style("│").cyan());
    println!("{}", style("│  [1] Analizar archivo").cyan());
    println!("{}", style("│  [2] Verificar extensión").cyan());
    println!("{}", style("│  [3] Eliminar toda la metadata").cyan());
    println!("{}", style("│  [4] Aplicar metadata genérica").cyan());
    println!("{}", style("│  [5] Aplicar metadata personalizada").cyan());
    println!("{}", style("│  [6] Salir").cyan());
    println!("{}", style("└─").cyan());
}

/// Pide una ruta y ejecuta `action`; una línea vacía cancela.
fn with_path(action: impl FnOnce(&Path) -> Result<()>) -> Result<()> {
    match prompt("Ruta del archivo")? {
        Some(line) if !line.is_empty() => action(&PathBuf::from(line)),
        _ => Ok(()),
    }
}

fn custom_metadata(path: &Path) -> Result<()> {
    println!(
        "{}",
        style("│ Formato: clave=valor, clave=valor (ej. author=Ana, title=Informe)").dim()
    );
    let Some(line) = prompt("Metadata")? else {
        return Ok(());
    };

    let metadata = parse_metadata_pairs(&line);
    report_written(apply_custom_metadata(path, &metadata, None)?)
}

fn report_written(output: PathBuf) -> Result<()> {
    println!();
    print_written(&output);
    Ok(())
}

/// Lee una línea de stdin; `None` al llegar al final de la entrada.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("\n{} ", style(format!("│ {label} ▸")).cyan());
    io::stdout().flush()?;

    let mut buffer = String::new();
    let bytes_read = io::stdin().read_line(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }

    Ok(Some(buffer.trim().to_string()))
}
