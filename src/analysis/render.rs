//! Presentación del reporte de análisis en consola.

use console::style;

use crate::value::{MetadataValue, Scalar};

use super::AnalysisReport;

#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Warning,
    Danger,
}

fn print_property(label: &str, value: &str, tone: Tone) {
    let label_styled = style(format!("  {}", label)).cyan().bold();
    let arrow = style("→").dim();

    let value_styled = match tone {
        Tone::Warning => style(value).yellow(),
        Tone::Danger => style(value).red(),
        Tone::Plain => style(value).white(),
    };

    println!("{} {} {}", label_styled, arrow, value_styled);
}

fn print_section(title: &str) {
    println!("\n{}", style(format!("━━━ {title} ━━━")).cyan().bold());
}

pub fn render_report(report: &AnalysisReport) {
    print_section("Archivo");
    print_property("Nombre", &report.file, Tone::Plain);
    print_property("Ruta", &report.path, Tone::Plain);
    print_property("Tipo MIME", &report.mime_type, Tone::Plain);
    if !report.extension.is_empty() {
        print_property("Extensión", &report.extension, Tone::Plain);
    }
    if let Some(hashes) = &report.hashes {
        print_property("MD5", &hashes.md5, Tone::Plain);
        print_property("SHA-256", &hashes.sha256, Tone::Plain);
    }

    print_section("Metadata");
    let lines = flatten_metadata(&report.metadata);
    if lines.is_empty() {
        println!("{}", style("  No se encontró metadata").dim());
    }
    for (label, value) in &lines {
        let tone = if label == "error" {
            Tone::Danger
        } else {
            Tone::Plain
        };
        print_property(label, value, tone);
    }

    print_section("Seguridad");
    match &report.security_analysis {
        Some(risk) => {
            println!(
                "{}",
                style(format!(
                    "  ⚠  Se detectaron {} indicador(es) de riesgo",
                    risk.indicators().len()
                ))
                .red()
                .bold()
            );
            for indicator in risk.indicators() {
                print_property("•", indicator, Tone::Warning);
            }
        }
        None => println!("{}", style("  Sin indicadores de riesgo").green()),
    }
    println!();
}

/// Aplana el árbol en pares `ruta → valor` para mostrarlo línea a línea.
pub(crate) fn flatten_metadata(metadata: &MetadataValue) -> Vec<(String, String)> {
    let mut lines = Vec::new();
    let mut stack = vec![(String::new(), metadata)];

    while let Some((path, value)) = stack.pop() {
        match value {
            MetadataValue::Mapping(map) => {
                for (key, child) in map.iter().rev() {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    stack.push((child_path, child));
                }
            }
            MetadataValue::Sequence(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push((format!("{path}[{index}]"), child));
                }
            }
            MetadataValue::String(text) => lines.push((path, text.clone())),
            MetadataValue::Scalar(scalar) => lines.push((path, scalar_text(scalar))),
        }
    }

    lines
}

fn scalar_text(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Bool(flag) => flag.to_string(),
        Scalar::Integer(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
        Scalar::Null => "null".to_string(),
    }
}
