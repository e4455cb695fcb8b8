use super::{
    JSPDF_EXEMPTION, RiskReport, analyze_risk, scan_metadata, scan_office_structure, scan_pdf_bytes,
    scan_pdf_structure, scan_structure,
};
use crate::value::MetadataValue;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

fn write_zip(path: &Path, entries: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = ZipWriter::new(File::create(path)?);
    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Stored);
    for name in entries {
        writer.start_file(*name, options)?;
        writer.write_all(b"contenido")?;
    }
    writer.finish()?;
    Ok(())
}

#[test]
fn benign_metadata_has_no_indicators() {
    let metadata = MetadataValue::from(json!({
        "author": "Ana Pérez",
        "title": "Informe trimestral",
        "pages": 12,
        "GPS": {"GPSLatitudeRef": "N", "GPSLatitude": [40, 25, 0]},
        "tags": ["finanzas", true, null],
    }));

    assert!(scan_metadata(&metadata).is_empty());
}

#[test]
fn long_value_reports_path_and_length() {
    let metadata = MetadataValue::from(json!({"a": {"b": "x".repeat(5001)}}));

    let indicators = scan_metadata(&metadata);

    assert_eq!(indicators.len(), 1);
    assert!(indicators[0].contains("a.b"));
    assert!(indicators[0].contains("5001"));
}

#[test]
fn value_at_limit_is_not_long() {
    let metadata = MetadataValue::from(json!({"a": "x".repeat(5000)}));
    assert!(scan_metadata(&metadata).is_empty());
}

#[test]
fn script_tag_reports_key_and_description() {
    let metadata = MetadataValue::from(json!({"comment": "<script>alert(1)</script>"}));

    let indicators = scan_metadata(&metadata);

    assert_eq!(
        indicators,
        vec!["Detected 'Possible HTML script injection' at 'comment'".to_string()]
    );
}

#[test]
fn patterns_match_without_case() {
    let metadata = MetadataValue::from(json!({"note": "JavaScript:void(0) via CMD.EXE"}));

    let indicators = scan_metadata(&metadata);

    assert_eq!(
        indicators,
        vec![
            "Detected 'Possible JavaScript URI scheme' at 'note'".to_string(),
            "Detected 'Reference to Windows command line' at 'note'".to_string(),
        ]
    );
}

#[test]
fn sequence_paths_use_brackets() {
    let metadata = MetadataValue::from(json!({
        "items": ["ok", {"macro": "Sub Document_Open()"}]
    }));

    let indicators = scan_metadata(&metadata);

    assert_eq!(
        indicators,
        vec!["Detected 'Auto-execute macro (Office)' at 'items[1].macro'".to_string()]
    );
}

#[test]
fn root_string_and_root_sequence_paths() {
    let root = MetadataValue::from("powershell -nop");
    assert_eq!(
        scan_metadata(&root),
        vec!["Detected 'Reference to PowerShell' at ''".to_string()]
    );

    let list = MetadataValue::from(json!(["/bin/sh -c id"]));
    assert_eq!(
        scan_metadata(&list),
        vec!["Detected 'Reference to Unix shell' at '[0]'".to_string()]
    );
}

#[test]
fn deep_nesting_does_not_overflow() {
    let mut value = MetadataValue::from("eval(payload)");
    for _ in 0..10_000 {
        value = MetadataValue::Sequence(vec![value]);
    }

    let indicators = scan_metadata(&value);

    assert_eq!(indicators.len(), 1);
    assert!(indicators[0].ends_with("[0]'"));

    // Liberar el árbol nivel a nivel; el drop recursivo podría agotar la pila.
    let mut current = value;
    loop {
        match current {
            MetadataValue::Sequence(mut items) => {
                current = items.pop().unwrap_or_else(MetadataValue::null);
            }
            _ => break,
        }
    }
}

#[test]
fn metadata_scan_is_deterministic() {
    let metadata = MetadataValue::from(json!({
        "z": "base64_decode(x)",
        "a": ["auto_open", "<SCRIPT src=x>"],
        "m": {"k": "javascript:alert(1)"},
    }));

    let first = scan_metadata(&metadata);
    let second = scan_metadata(&metadata);

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
    assert!(first[0].ends_with("at 'a[0]'"));
    assert!(first[1].ends_with("at 'a[1]'"));
    assert!(first[2].ends_with("at 'm.k'"));
    assert!(first[3].ends_with("at 'z'"));
}

#[test]
fn open_action_alone_is_not_reported() {
    let content = b"%PDF-1.7\n1 0 obj << /Type /Catalog /OpenAction [3 0 R /Fit] >> endobj";
    assert!(scan_pdf_bytes(content).is_empty());
}

#[test]
fn open_action_with_javascript_is_reported_once() {
    let content =
        b"%PDF-1.7 << /OpenAction 5 0 R >> << /S /JavaScript >> << /OpenAction 6 0 R >>";

    let indicators = scan_pdf_bytes(content);

    let combined: Vec<_> = indicators
        .iter()
        .filter(|indicator| indicator.contains("combined with scripts/launchers"))
        .collect();
    assert_eq!(combined.len(), 1);
    assert!(indicators.contains(
        &"Suspicious PDF structure: Contains JavaScript code (/JavaScript)".to_string()
    ));
    assert_eq!(indicators.len(), 2);
}

#[test]
fn launch_alone_is_reported() {
    let indicators = scan_pdf_bytes(b"%PDF-1.4 << /S /Launch /F (calc.exe) >>");
    assert_eq!(
        indicators,
        vec!["Suspicious PDF structure: Attempts to launch an external program (/Launch)"
            .to_string()]
    );
}

#[test]
fn launch_with_open_action_adds_combined_indicator() {
    let indicators = scan_pdf_bytes(b"%PDF-1.4 /OpenAction << /S /Launch >>");
    assert_eq!(indicators.len(), 2);
    assert!(indicators.iter().any(|i| i.ends_with("(/Launch)")));
}

#[test]
fn js_and_rich_media_keywords_are_reported() {
    let indicators = scan_pdf_bytes(b"%PDF-1.5 << /JS (app.alert(1)) >> /RichMedia");
    assert_eq!(
        indicators,
        vec![
            "Suspicious PDF structure: Contains JavaScript code (/JS)".to_string(),
            "Suspicious PDF structure: Embedded rich media content (possible attack vector) (/RichMedia)"
                .to_string(),
        ]
    );
}

#[test]
fn jspdf_marker_keeps_combined_open_action() {
    let autoprint = b"%PDF-1.3 /Producer (jsPDF 2.5.1) /OpenAction 7 0 R /S /JavaScript";
    assert!(JSPDF_EXEMPTION.applies_to(autoprint));

    let indicators = scan_pdf_bytes(autoprint);
    assert_eq!(
        indicators,
        vec![
            "Suspicious PDF structure: Contains JavaScript code (/JavaScript)".to_string(),
            "Suspicious PDF structure: Runs an action when the document is opened combined with scripts/launchers"
                .to_string(),
        ]
    );
    assert_eq!(
        indicators
            .iter()
            .filter(|i| i.contains("combined with scripts/launchers"))
            .count(),
        1
    );

    let launcher = b"%PDF-1.3 /Producer (jsPDF) /OpenAction /Launch";
    let indicators = scan_pdf_bytes(launcher);
    assert!(indicators.iter().any(|i| i.contains("combined with scripts/launchers")));
}

#[test]
fn keyword_search_ignores_partial_matches() {
    assert!(scan_pdf_bytes(b"%PDF-1.7 /Jav /Launc /OpenActio").is_empty());
    assert!(!JSPDF_EXEMPTION.applies_to(b""));
}

#[test]
fn pdf_scan_reads_file_from_disk() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("doc.pdf");
    std::fs::write(&path, b"%PDF-1.7 /JavaScript")?;

    let indicators = scan_pdf_structure(&path)?;
    assert_eq!(indicators.len(), 1);
    Ok(())
}

#[test]
fn office_scan_detects_vba_project() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("macro.docm");
    write_zip(&path, &["[Content_Types].xml", "word/document.xml", "word/vbaProject.bin"])?;

    let indicators = scan_office_structure(&path)?;

    assert_eq!(indicators, vec!["Contains VBA macros (vbaProject.bin)".to_string()]);
    Ok(())
}

#[test]
fn office_scan_counts_ole_objects_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("objects.docx");
    write_zip(
        &path,
        &[
            "word/document.xml",
            "word/embeddings/oleObject1.bin",
            "word/embeddings/oleObject2.bin",
            "word/embeddings/oleObject3.bin",
        ],
    )?;

    let indicators = scan_office_structure(&path)?;

    assert_eq!(indicators, vec!["Contains 3 embedded OLE object(s)".to_string()]);
    Ok(())
}

#[test]
fn office_scan_ignores_non_zip_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("legacy.docx");
    std::fs::write(&path, b"\xD0\xCF\x11\xE0 not a zip")?;

    assert!(scan_office_structure(&path)?.is_empty());
    assert!(scan_structure(&path, DOCX_MIME).is_empty());
    Ok(())
}

#[test]
fn unreadable_file_becomes_single_indicator() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing.pdf");

    let indicators = scan_structure(&missing, "application/pdf");

    assert_eq!(indicators.len(), 1);
    assert!(indicators[0].starts_with("Error analyzing file structure:"));
    Ok(())
}

#[test]
fn other_mime_types_have_no_structure_checks() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("photo.png");
    std::fs::write(&path, b"/JavaScript /Launch")?;

    assert!(scan_structure(&path, "image/png").is_empty());
    Ok(())
}

#[test]
fn aggregator_orders_metadata_before_structure() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("doc.pdf");
    std::fs::write(&path, b"%PDF-1.7 /Launch")?;
    let metadata = MetadataValue::from(json!({"Title": "cmd.exe /c calc"}));

    let report = analyze_risk(&path, &metadata, "application/pdf");

    assert!(report.is_suspicious());
    assert_eq!(
        report.indicators(),
        [
            "Detected 'Reference to Windows command line' at 'Title'".to_string(),
            "Suspicious PDF structure: Attempts to launch an external program (/Launch)"
                .to_string(),
        ]
    );
    assert_eq!(report, analyze_risk(&path, &metadata, "application/pdf"));
    Ok(())
}

#[test]
fn clean_file_is_not_suspicious() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("clean.pdf");
    std::fs::write(&path, b"%PDF-1.7 /OpenAction [1 0 R /Fit]")?;

    let report = analyze_risk(&path, &MetadataValue::from(json!({"Title": "Hola"})), "application/pdf");

    assert!(!report.is_suspicious());
    assert!(report.indicators().is_empty());
    Ok(())
}

#[test]
fn report_flag_tracks_indicators() -> Result<(), Box<dyn std::error::Error>> {
    let empty = RiskReport::from_indicators(Vec::new());
    assert_eq!(empty.is_suspicious(), !empty.indicators().is_empty());

    let found = RiskReport::from_indicators(vec!["x".to_string()]);
    assert_eq!(found.is_suspicious(), !found.indicators().is_empty());

    let json = serde_json::to_value(&found)?;
    assert_eq!(json, json!({"is_suspicious": true, "indicators": ["x"]}));
    Ok(())
}
