// Tests for workbook rendering

use navsheet_core::TrackerError;
use navsheet_core::planner::{LayoutPolicy, plan_rows};
use navsheet_core::render::{
    MAX_URL_LEN, SheetLayout, StatusSet, StatusValidation, TrackerDocument, TrackerRenderer,
    contiguous_ranges, is_hyperlink,
};
use navsheet_core::style::StyleSheet;
use navsheet_scanner::NavNode;
use std::io::{Cursor, Read};
use tempfile::TempDir;
use zip::ZipArchive;

fn sample_nodes() -> Vec<NavNode> {
    vec![
        NavNode::new(0, "Overview", "https://x.io/overview").with_children(true),
        NavNode::new(1, "Intro", "https://x.io/intro"),
        NavNode::new(1, "Repositories", "https://x.io/repos").with_children(true),
        NavNode::new(2, "Core concepts", "https://x.io/repos/core"),
        NavNode::new(2, "Query methods", ""),
        NavNode::new(0, "Appendix", "https://x.io/appendix"),
    ]
}

fn render(document: &TrackerDocument, nodes: &[NavNode]) -> Vec<u8> {
    let styles = StyleSheet::standard();
    let policy = LayoutPolicy::default().with_start_row(document.layout.first_data_row());
    let plan = plan_rows(nodes, &policy);
    TrackerRenderer::new(document, &styles)
        .render_to_buffer(&plan)
        .unwrap()
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

/// Sheet XML and the shared string table of a rendered workbook.
fn sheet(bytes: &[u8]) -> (String, Vec<String>) {
    let strings = part(bytes, "xl/sharedStrings.xml")
        .split("<si>")
        .skip(1)
        .map(|item| {
            let start = item.find("<t").unwrap();
            let text = &item[start..];
            let open = text.find('>').unwrap() + 1;
            let close = text.find("</t>").unwrap();
            text[open..close].to_string()
        })
        .collect();
    (part(bytes, "xl/worksheets/sheet1.xml"), strings)
}

/// Text of a string cell, `None` when the cell is missing or empty.
fn cell_text(xml: &str, strings: &[String], cell: &str) -> Option<String> {
    let start = xml.find(&format!(r#"<c r="{}""#, cell))?;
    let rest = &xml[start..];
    let tag = &rest[..rest.find('>')? + 1];
    if tag.ends_with("/>") {
        return None;
    }
    let rest = &rest[..rest.find("</c>")?];
    let value = &rest[rest.find("<v>")? + 3..rest.find("</v>")?];
    if tag.contains(r#"t="s""#) {
        strings.get(value.parse::<usize>().ok()?).cloned()
    } else {
        Some(value.to_string())
    }
}

fn row_tag<'a>(xml: &'a str, row: usize) -> &'a str {
    let start = xml.find(&format!(r#"<row r="{}""#, row)).unwrap();
    let rest = &xml[start..];
    &rest[..rest.find('>').unwrap() + 1]
}

// ============================================================================
// Status Set Tests
// ============================================================================

#[test]
fn test_status_set_default_value_is_first() {
    let statuses = StatusSet::new(&["Todo", "Doing", "Done"]).unwrap();
    assert_eq!(statuses.default_value(), "Todo");
    assert_eq!(statuses.values().len(), 3);
    assert!(statuses.contains("Doing"));
    assert!(!statuses.contains("doing"));
}

#[test]
fn test_status_set_trims_values() {
    let statuses = StatusSet::new(&[" Todo ", "Done"]).unwrap();
    assert_eq!(statuses.values(), &["Todo".to_string(), "Done".to_string()]);
}

#[test]
fn test_status_set_rejects_empty_list() {
    let empty: [&str; 0] = [];
    assert!(matches!(
        StatusSet::new(&empty),
        Err(TrackerError::InvalidStatuses(_))
    ));
}

#[test]
fn test_status_set_rejects_blank_value() {
    assert!(matches!(
        StatusSet::new(&["Todo", "  "]),
        Err(TrackerError::InvalidStatuses(_))
    ));
}

#[test]
fn test_status_set_rejects_comma() {
    assert!(matches!(
        StatusSet::new(&["Todo", "Done, really"]),
        Err(TrackerError::InvalidStatuses(_))
    ));
}

#[test]
fn test_status_set_rejects_duplicates() {
    assert!(matches!(
        StatusSet::new(&["Todo", "Done", "Todo"]),
        Err(TrackerError::InvalidStatuses(_))
    ));
}

#[test]
fn test_status_set_rejects_overlong_list() {
    let long = "x".repeat(200);
    let longer = "y".repeat(60);
    assert!(matches!(
        StatusSet::new(&[long.as_str(), longer.as_str()]),
        Err(TrackerError::InvalidStatuses(_))
    ));
}

#[test]
fn test_status_set_default() {
    let statuses = StatusSet::default();
    assert_eq!(statuses.default_value(), "To do");
    assert_eq!(statuses.values().len(), 3);
}

// ============================================================================
// Contiguous Range Tests
// ============================================================================

#[test]
fn test_contiguous_ranges_empty() {
    assert!(contiguous_ranges(&[]).is_empty());
}

#[test]
fn test_contiguous_ranges_single() {
    assert_eq!(contiguous_ranges(&[7]), vec![(7, 7)]);
}

#[test]
fn test_contiguous_ranges_gaps() {
    assert_eq!(
        contiguous_ranges(&[4, 5, 6, 9, 11, 12]),
        vec![(4, 6), (9, 9), (11, 12)]
    );
}

// ============================================================================
// Layout Tests
// ============================================================================

#[test]
fn test_docs_layout_rows() {
    let layout = SheetLayout::docs();
    assert_eq!(layout.header_row(), 3);
    assert_eq!(layout.first_data_row(), 4);
}

#[test]
fn test_catalog_layout_rows() {
    let layout = SheetLayout::catalog();
    assert_eq!(layout.header_row(), 5);
    assert_eq!(layout.first_data_row(), 6);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_status_validation_covers_leaf_rows_only() {
    let policy = LayoutPolicy::default().with_start_row(4);
    let plan = plan_rows(&sample_nodes(), &policy);
    // 4 Overview, 5 sep, 6 Intro, 7 sep, 8 Repositories, 9 Core, 10 Query,
    // 11 sep, 12 Appendix, 13 closing
    let validation = StatusValidation::new(&StatusSet::default(), &plan).unwrap();
    assert_eq!(validation.ranges(), &[(6, 6), (9, 10), (12, 12)]);
}

#[test]
fn test_status_validation_empty_plan() {
    let plan = plan_rows(&[], &LayoutPolicy::default().with_start_row(4));
    let validation = StatusValidation::new(&StatusSet::default(), &plan).unwrap();
    assert!(validation.ranges().is_empty());
}

// ============================================================================
// Renderer Tests
// ============================================================================

#[test]
fn test_render_to_buffer_is_xlsx() {
    let bytes = render(&TrackerDocument::default(), &sample_nodes());
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_render_docs_header_bands() {
    let bytes = render(&TrackerDocument::default(), &sample_nodes());
    let (xml, strings) = sheet(&bytes);

    assert!(xml.contains(r#"<mergeCell ref="A1:C2"/>"#));
    assert!(xml.contains(r#"<mergeCell ref="A3:C3"/>"#));
    assert_eq!(cell_text(&xml, &strings, "A1").as_deref(), Some("Progress Tracking"));
    assert_eq!(cell_text(&xml, &strings, "A4").as_deref(), Some("Label"));
    assert_eq!(cell_text(&xml, &strings, "B4").as_deref(), Some("Link"));
    assert_eq!(cell_text(&xml, &strings, "C4").as_deref(), Some("Status"));
}

#[test]
fn test_render_catalog_header_bands() {
    let document = TrackerDocument {
        layout: SheetLayout::catalog(),
        ..Default::default()
    };
    let bytes = render(&document, &[]);
    let (xml, strings) = sheet(&bytes);

    assert!(xml.contains(r#"<mergeCell ref="A1:Z3"/>"#));
    assert!(xml.contains(r#"<mergeCell ref="A4:Z5"/>"#));
    assert_eq!(cell_text(&xml, &strings, "A6").as_deref(), Some("Label"));
    assert!(!xml.contains("<dataValidation "));
}

#[test]
fn test_render_category_rows_are_merged_links() {
    let bytes = render(&TrackerDocument::default(), &sample_nodes());
    let (xml, strings) = sheet(&bytes);

    assert!(xml.contains(r#"<mergeCell ref="A5:C5"/>"#));
    assert!(xml.contains(r#"<mergeCell ref="A9:C9"/>"#));
    assert_eq!(cell_text(&xml, &strings, "A5").as_deref(), Some("Overview"));
    assert_eq!(cell_text(&xml, &strings, "A9").as_deref(), Some("Repositories"));
    assert!(xml.contains(r#"<hyperlink ref="A5""#));
    assert!(xml.contains(r#"<hyperlink ref="A9""#));
}

#[test]
fn test_render_leaf_rows_default_status() {
    let bytes = render(&TrackerDocument::default(), &sample_nodes());
    let (xml, strings) = sheet(&bytes);

    assert_eq!(cell_text(&xml, &strings, "A7").as_deref(), Some("Intro"));
    assert_eq!(
        cell_text(&xml, &strings, "B7").as_deref(),
        Some("https://x.io/intro")
    );
    assert!(xml.contains(r#"<hyperlink ref="B7""#));
    for cell in ["C7", "C10", "C11", "C13"] {
        assert_eq!(cell_text(&xml, &strings, cell).as_deref(), Some("To do"));
    }
    // Query methods has no url
    assert_eq!(cell_text(&xml, &strings, "B11"), None);
    assert!(!xml.contains(r#"<hyperlink ref="B11""#));
}

#[test]
fn test_render_status_validation() {
    let bytes = render(&TrackerDocument::default(), &sample_nodes());
    let (xml, _) = sheet(&bytes);

    assert!(xml.contains(r#"sqref="C7""#));
    assert!(xml.contains(r#"sqref="C10:C11""#));
    assert!(xml.contains(r#"sqref="C13""#));
    assert_eq!(xml.matches("<dataValidation ").count(), 3);
    assert!(xml.contains(r#"<formula1>"To do,In progress,Done"</formula1>"#));
    assert!(!xml.contains("allowBlank"));
    // no category or separator row is validated
    for cell in ["C5", "C6", "C9", "C14"] {
        assert!(!xml.contains(&format!(r#"sqref="{}""#, cell)));
    }
}

#[test]
fn test_render_separator_rows_have_no_cells() {
    let bytes = render(&TrackerDocument::default(), &sample_nodes());
    let (xml, _) = sheet(&bytes);

    for row in [6, 8, 12, 14] {
        for col in ["A", "B", "C"] {
            assert!(!xml.contains(&format!(r#"<c r="{}{}""#, col, row)));
        }
        let tag = row_tag(&xml, row);
        assert!(tag.contains(r#"customHeight="1""#), "{}", tag);
        assert!(tag.contains(r#"customFormat="1""#), "{}", tag);
    }
    assert!(row_tag(&xml, 6).contains(r#"ht="15""#));
    assert!(row_tag(&xml, 14).contains(r#"ht="10""#));
}

#[test]
fn test_render_custom_statuses() {
    let document = TrackerDocument {
        statuses: StatusSet::new(&["NOT STARTED", "DONE"]).unwrap(),
        ..Default::default()
    };
    let bytes = render(&document, &sample_nodes());
    let (xml, strings) = sheet(&bytes);

    assert_eq!(cell_text(&xml, &strings, "C7").as_deref(), Some("NOT STARTED"));
    assert!(xml.contains(r#"<formula1>"NOT STARTED,DONE"</formula1>"#));
}

#[test]
fn test_render_empty_plan() {
    let document = TrackerDocument {
        layout: SheetLayout::catalog(),
        ..Default::default()
    };
    let bytes = render(&document, &[]);
    let (xml, _) = sheet(&bytes);

    assert!(bytes.starts_with(b"PK"));
    // only the closing separator below the header
    assert!(row_tag(&xml, 7).contains(r#"customHeight="1""#));
    assert!(!xml.contains(r#"<c r="A7""#));
}

#[test]
fn test_render_to_file_replaces_existing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tracker.xlsx");
    std::fs::write(&path, b"stale").unwrap();

    let document = TrackerDocument::default();
    let styles = StyleSheet::standard();
    let plan = plan_rows(&sample_nodes(), &LayoutPolicy::default().with_start_row(4));
    TrackerRenderer::new(&document, &styles)
        .render_to_file(&plan, &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let (xml, _) = sheet(&bytes);
    assert!(xml.contains(r#"<mergeCell ref="A5:C5"/>"#));
}

#[test]
fn test_render_rejects_bad_sheet_name() {
    let document = TrackerDocument {
        sheet_name: "bad[name]".to_string(),
        ..Default::default()
    };
    let styles = StyleSheet::standard();
    let plan = plan_rows(&[], &LayoutPolicy::default());

    let result = TrackerRenderer::new(&document, &styles).render_to_buffer(&plan);
    assert!(matches!(result, Err(TrackerError::Xlsx(_))));
}

#[test]
fn test_render_deep_leaf_indent_is_clamped() {
    let nodes = vec![NavNode::new(40, "Deep", "https://x.io/deep")];
    let bytes = render(&TrackerDocument::default(), &nodes);

    let styles = part(&bytes, "xl/styles.xml");
    assert!(styles.contains(r#"indent="15""#));
    assert!(!styles.contains(r#"indent="40""#));
}

// ============================================================================
// Link Fallback Tests
// ============================================================================

#[test]
fn test_is_hyperlink() {
    assert!(is_hyperlink("https://x.io/intro"));
    assert!(is_hyperlink("http://localhost:8080/ref/"));
    assert!(is_hyperlink("mailto:docs@x.io"));
    assert!(!is_hyperlink("javascript:void(0)"));
    assert!(!is_hyperlink("tel:+15550100"));
    assert!(!is_hyperlink("data:text/html,hi"));
    assert!(!is_hyperlink("https://"));
    assert!(!is_hyperlink(""));

    let long = format!("https://x.io/{}", "a".repeat(MAX_URL_LEN));
    assert!(!is_hyperlink(&long));
}

#[test]
fn test_render_non_hyperlink_urls_as_text() {
    let long = format!("https://x.io/{}", "a".repeat(MAX_URL_LEN));
    let nodes = vec![
        NavNode::new(0, "Scripts", "javascript:void(0)").with_children(true),
        NavNode::new(1, "Toggle", "javascript:toggle()"),
        NavNode::new(1, "Huge", long.as_str()),
    ];
    // 5 Scripts, 6 sep, 7 Toggle, 8 sep, 9 Huge, 10 closing
    let bytes = render(&TrackerDocument::default(), &nodes);
    let (xml, strings) = sheet(&bytes);

    assert!(xml.contains(r#"<mergeCell ref="A5:C5"/>"#));
    assert_eq!(cell_text(&xml, &strings, "A5").as_deref(), Some("Scripts"));
    assert_eq!(
        cell_text(&xml, &strings, "B7").as_deref(),
        Some("javascript:toggle()")
    );
    assert_eq!(cell_text(&xml, &strings, "B9"), Some(long));
    assert_eq!(cell_text(&xml, &strings, "C7").as_deref(), Some("To do"));
    assert!(!xml.contains("<hyperlink "));
}
