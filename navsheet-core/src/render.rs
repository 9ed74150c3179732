//! Spreadsheet rendering of a [`RowPlan`].

use crate::error::{Result, TrackerError};
use crate::planner::{LABEL_COL, LINK_COL, RenderInstruction, RowPlan, STATUS_COL};
use crate::style::{StyleSheet, StyleTier};
use rust_xlsxwriter::{DataValidation, Format, Url, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Excel worksheet maximum row count.
pub const MAX_SHEET_ROWS: usize = 1_048_576;
/// Longest comma-joined list Excel accepts for a list validation.
pub const MAX_STATUS_LIST_LEN: usize = 255;
/// Deepest indent applied to leaf labels.
pub const MAX_INDENT: u8 = 15;
/// Longest hyperlink target Excel stores.
pub const MAX_URL_LEN: usize = 2079;

const HYPERLINK_SCHEMES: [&str; 5] = ["http://", "https://", "ftp://", "ftps://", "mailto:"];

/// Fixed block above the table: a merged title band, a merged spacer band,
/// then the column header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub title_rows: usize,
    pub spacer_rows: usize,
    /// Columns covered by the title and spacer bands, at least 3.
    pub band_width: u16,
}

impl SheetLayout {
    /// Title over A1:C2, spacer A3:C3, header on row 4.
    pub fn docs() -> Self {
        Self {
            title_rows: 2,
            spacer_rows: 1,
            band_width: 3,
        }
    }

    /// Title over A1:Z3, spacer A4:Z5, header on row 6.
    pub fn catalog() -> Self {
        Self {
            title_rows: 3,
            spacer_rows: 2,
            band_width: 26,
        }
    }

    /// 0-based row of the column headers.
    pub fn header_row(&self) -> usize {
        self.title_rows.max(1) + self.spacer_rows
    }

    /// 0-based row of the first planned instruction.
    pub fn first_data_row(&self) -> usize {
        self.header_row() + 1
    }

    fn last_band_col(&self) -> u16 {
        self.band_width.max(3) - 1
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::docs()
    }
}

/// Ordered allowed values of the status column. The first one is the value
/// every leaf row starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSet {
    values: Vec<String>,
}

impl StatusSet {
    pub fn new<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let values: Vec<String> = values.iter().map(|v| v.as_ref().trim().to_string()).collect();

        if values.is_empty() {
            return Err(TrackerError::InvalidStatuses(
                "at least one status is required".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| v.is_empty() || v.contains(',')) {
            return Err(TrackerError::InvalidStatuses(format!(
                "'{}' is blank or contains a comma",
                bad
            )));
        }
        if let Some((idx, dup)) = values
            .iter()
            .enumerate()
            .find(|&(idx, v)| values[..idx].contains(v))
        {
            return Err(TrackerError::InvalidStatuses(format!(
                "'{}' is listed twice (position {})",
                dup,
                idx + 1
            )));
        }
        let joined_len = values.iter().map(|v| v.chars().count()).sum::<usize>() + values.len() - 1;
        if joined_len > MAX_STATUS_LIST_LEN {
            return Err(TrackerError::InvalidStatuses(format!(
                "{} characters exceeds the {} character list limit",
                joined_len, MAX_STATUS_LIST_LEN
            )));
        }

        Ok(Self { values })
    }

    /// Build from known-good values without validation.
    pub(crate) fn preset(values: &[&str]) -> Self {
        Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn default_value(&self) -> &str {
        // `new` guarantees at least one value
        &self.values[0]
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

impl Default for StatusSet {
    fn default() -> Self {
        Self::preset(&["To do", "In progress", "Done"])
    }
}

/// Everything the renderer needs besides the plan and the styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerDocument {
    pub title: String,
    pub sheet_name: String,
    /// Label, link and status column headers.
    pub headers: [String; 3],
    pub statuses: StatusSet,
    pub layout: SheetLayout,
}

impl Default for TrackerDocument {
    fn default() -> Self {
        Self {
            title: "Progress Tracking".to_string(),
            sheet_name: "Tracker".to_string(),
            headers: ["Label".to_string(), "Link".to_string(), "Status".to_string()],
            statuses: StatusSet::default(),
            layout: SheetLayout::docs(),
        }
    }
}

/// Group ascending row indices into inclusive runs of consecutive rows.
pub fn contiguous_ranges(sorted_rows: &[usize]) -> Vec<(usize, usize)> {
    let Some((&first, rest)) = sorted_rows.split_first() else {
        return vec![];
    };

    let mut ranges = Vec::new();
    let mut start = first;
    let mut end = first;

    for &row in rest {
        if row == end + 1 {
            end = row;
        } else {
            ranges.push((start, end));
            start = row;
            end = row;
        }
    }

    ranges.push((start, end));
    ranges
}

/// One list validation rule and the status-column row ranges it applies to.
pub struct StatusValidation {
    rule: DataValidation,
    ranges: Vec<(usize, usize)>,
}

impl StatusValidation {
    pub fn new(statuses: &StatusSet, plan: &RowPlan) -> Result<Self> {
        let rule = DataValidation::new()
            .allow_list_strings(statuses.values())?
            .ignore_blank(false)
            .set_error_title("Unknown status")?
            .set_error_message(format!("Pick one of: {}", statuses.values().join(", ")))?;

        Ok(Self {
            rule,
            ranges: contiguous_ranges(&plan.leaf_rows()),
        })
    }

    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }

    fn apply(&self, worksheet: &mut Worksheet) -> Result<()> {
        for &(first, last) in &self.ranges {
            worksheet.add_data_validation(
                sheet_row(first)?,
                STATUS_COL,
                sheet_row(last)?,
                STATUS_COL,
                &self.rule,
            )?;
        }
        Ok(())
    }
}

fn sheet_row(row: usize) -> Result<u32> {
    if row >= MAX_SHEET_ROWS {
        return Err(TrackerError::RowOverflow(row));
    }
    u32::try_from(row).map_err(|_| TrackerError::RowOverflow(row))
}

/// Writes a single-sheet tracker workbook.
pub struct TrackerRenderer<'a> {
    document: &'a TrackerDocument,
    styles: &'a StyleSheet,
}

impl<'a> TrackerRenderer<'a> {
    pub fn new(document: &'a TrackerDocument, styles: &'a StyleSheet) -> Self {
        Self { document, styles }
    }

    /// Build the workbook in memory.
    pub fn build(&self, plan: &RowPlan) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.document.sheet_name)?;

        self.write_header(worksheet)?;
        self.write_rows(worksheet, plan)?;
        StatusValidation::new(&self.document.statuses, plan)?.apply(worksheet)?;

        Ok(workbook)
    }

    /// Render and save to `path`, replacing any existing file.
    pub fn render_to_file(&self, plan: &RowPlan, path: &Path) -> Result<()> {
        let mut workbook = self.build(plan)?;
        workbook.save(path)?;
        info!("Saved {} rows to {}", plan.len(), path.display());
        Ok(())
    }

    pub fn render_to_buffer(&self, plan: &RowPlan) -> Result<Vec<u8>> {
        let mut workbook = self.build(plan)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn write_header(&self, worksheet: &mut Worksheet) -> Result<()> {
        let layout = &self.document.layout;
        let last_col = layout.last_band_col();
        let title_rows = layout.title_rows.max(1);

        worksheet.merge_range(
            0,
            0,
            sheet_row(title_rows - 1)?,
            last_col,
            &self.document.title,
            &self.styles.format(StyleTier::Title),
        )?;

        if layout.spacer_rows > 0 {
            worksheet.merge_range(
                sheet_row(title_rows)?,
                0,
                sheet_row(title_rows + layout.spacer_rows - 1)?,
                last_col,
                "",
                &Format::new(),
            )?;
        }

        let header_row = sheet_row(layout.header_row())?;
        let header_format = self.styles.format(StyleTier::Header);
        for (col, header) in [LABEL_COL, LINK_COL, STATUS_COL]
            .into_iter()
            .zip(&self.document.headers)
        {
            worksheet.write_string_with_format(header_row, col, header, &header_format)?;
        }

        worksheet.set_column_width(LABEL_COL, 60)?;
        worksheet.set_column_width(LINK_COL, 70)?;
        worksheet.set_column_width(STATUS_COL, 16)?;
        worksheet.set_freeze_panes(header_row + 1, 0)?;

        Ok(())
    }

    fn write_rows(&self, worksheet: &mut Worksheet, plan: &RowPlan) -> Result<()> {
        let link_format = self.styles.format(StyleTier::LeafLink);
        let status_format = self.styles.format(StyleTier::Status);
        let plain_format = self.styles.format(StyleTier::LeafLabel);
        let separator_format = self.styles.format(StyleTier::Separator);
        let status_default = self.document.statuses.default_value();

        for (row, instruction) in plan.rows() {
            let row = sheet_row(row)?;

            match instruction {
                RenderInstruction::CategoryRow {
                    label,
                    url,
                    tier,
                    span,
                    ..
                } => {
                    let format = self.styles.format(tier.style_tier());
                    worksheet.merge_range(row, span.first_col, row, span.last_col, label, &format)?;
                    if !url.is_empty() {
                        if is_hyperlink(url) {
                            worksheet.write_url_with_format(
                                row,
                                span.first_col,
                                link_with_text(url, label),
                                &format,
                            )?;
                        } else {
                            warn!(
                                "Category '{}' kept as plain text, '{}' is not a hyperlink",
                                label, url
                            );
                        }
                    }
                }
                RenderInstruction::LeafRow { label, url, indent } => {
                    let indent = u8::try_from(*indent).unwrap_or(MAX_INDENT).min(MAX_INDENT);
                    let label_format = self.styles.get(StyleTier::LeafLabel).to_format(indent);
                    worksheet.write_string_with_format(row, LABEL_COL, label, &label_format)?;

                    if url.is_empty() {
                        worksheet.write_blank(row, LINK_COL, &link_format)?;
                    } else if is_hyperlink(url) {
                        let link = Url::new(url);
                        worksheet.write_url_with_format(row, LINK_COL, link, &link_format)?;
                    } else {
                        warn!("Writing '{}' as text, it is not a hyperlink", url);
                        worksheet.write_string_with_format(row, LINK_COL, url, &plain_format)?;
                    }

                    worksheet.write_string_with_format(
                        row,
                        STATUS_COL,
                        status_default,
                        &status_format,
                    )?;
                }
                RenderInstruction::SeparatorRow { height } => {
                    worksheet.set_row_height(row, *height)?;
                    worksheet.set_row_format(row, &separator_format)?;
                }
            }
        }

        debug!("Wrote {} planned rows", plan.len());
        Ok(())
    }
}

/// Whether Excel can store `url` as a hyperlink. Other schemes such as
/// `javascript:` or `tel:`, and over-long targets, are written as text.
pub fn is_hyperlink(url: &str) -> bool {
    url.chars().count() <= MAX_URL_LEN
        && HYPERLINK_SCHEMES
            .iter()
            .any(|scheme| url.starts_with(scheme) && url.len() > scheme.len())
}

fn link_with_text(url: &str, label: &str) -> Url {
    let link = Url::new(url);
    if label.is_empty() {
        link
    } else {
        link.set_text(label)
    }
}
