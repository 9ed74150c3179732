//! Row layout planning.
//!
//! Turns the flat, leveled navigation outline into the exact sequence of
//! spreadsheet rows: merged category bands, trackable leaf rows and blank
//! separator rows. Planning is a pure function of its inputs; nothing here
//! touches a workbook or a style object.

use crate::style::StyleTier;
use navsheet_scanner::NavNode;
use serde::Serialize;
use tracing::debug;

/// Column holding labels.
pub const LABEL_COL: u16 = 0;
/// Column holding links.
pub const LINK_COL: u16 = 1;
/// Column holding the status dropdown.
pub const STATUS_COL: u16 = 2;

/// Deepest level that may still be rendered as a category band.
pub const DEFAULT_MAX_CATEGORY_LEVEL: usize = 2;
pub const DEFAULT_SEPARATOR_HEIGHT: f64 = 15.0;
pub const DEFAULT_CLOSING_SEPARATOR_HEIGHT: f64 = 10.0;

/// Inclusive column range merged on a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeSpan {
    pub first_col: u16,
    pub last_col: u16,
}

impl MergeSpan {
    /// The label/link/status column triple.
    pub const TRACKER_COLUMNS: MergeSpan = MergeSpan {
        first_col: LABEL_COL,
        last_col: STATUS_COL,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CategoryTier {
    Main,
    Sub,
    SubSub,
}

impl CategoryTier {
    pub fn for_level(level: usize) -> Self {
        match level {
            0 => CategoryTier::Main,
            1 => CategoryTier::Sub,
            _ => CategoryTier::SubSub,
        }
    }

    pub fn style_tier(self) -> StyleTier {
        match self {
            CategoryTier::Main => StyleTier::MainCategory,
            CategoryTier::Sub => StyleTier::SubCategory,
            CategoryTier::SubSub => StyleTier::SubSubCategory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Category,
    Leaf,
}

/// A node is a category when it has children and is shallow enough to get a
/// band of its own; everything else is a trackable leaf.
pub fn classify(node: &NavNode, max_category_level: usize) -> RowKind {
    if node.level <= max_category_level && node.has_children {
        RowKind::Category
    } else {
        RowKind::Leaf
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    CategoryRow {
        level: usize,
        label: String,
        url: String,
        tier: CategoryTier,
        span: MergeSpan,
    },
    /// A trackable item; its status cell starts at the first status value.
    LeafRow {
        label: String,
        url: String,
        indent: usize,
    },
    SeparatorRow {
        height: f64,
    },
}

impl RenderInstruction {
    pub fn is_separator(&self) -> bool {
        matches!(self, RenderInstruction::SeparatorRow { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPolicy {
    pub max_category_level: usize,
    /// First worksheet row (0-based) below the fixed header block.
    pub start_row: usize,
    pub separator_height: f64,
    pub closing_separator_height: f64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            max_category_level: DEFAULT_MAX_CATEGORY_LEVEL,
            start_row: 0,
            separator_height: DEFAULT_SEPARATOR_HEIGHT,
            closing_separator_height: DEFAULT_CLOSING_SEPARATOR_HEIGHT,
        }
    }
}

impl LayoutPolicy {
    pub fn with_start_row(mut self, start_row: usize) -> Self {
        self.start_row = start_row;
        self
    }

    pub fn with_max_category_level(mut self, level: usize) -> Self {
        self.max_category_level = level;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub categories: usize,
    pub leaves: usize,
    pub separators: usize,
}

impl PlanSummary {
    pub fn total(&self) -> usize {
        self.categories + self.leaves + self.separators
    }
}

/// Ordered render instructions; instruction `i` lands on row `start_row + i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPlan {
    pub start_row: usize,
    pub instructions: Vec<RenderInstruction>,
}

impl RowPlan {
    fn new(start_row: usize) -> Self {
        Self {
            start_row,
            instructions: Vec::new(),
        }
    }

    /// Row the next pushed instruction will occupy.
    pub fn cursor(&self) -> usize {
        self.start_row + self.instructions.len()
    }

    fn push(&mut self, instruction: RenderInstruction) {
        debug!("row {}: {:?}", self.cursor(), instruction);
        self.instructions.push(instruction);
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &RenderInstruction)> {
        self.instructions
            .iter()
            .enumerate()
            .map(move |(idx, instruction)| (self.start_row + idx, instruction))
    }

    /// Rows carrying a status cell, ascending.
    pub fn leaf_rows(&self) -> Vec<usize> {
        self.rows()
            .filter(|(_, instruction)| matches!(instruction, RenderInstruction::LeafRow { .. }))
            .map(|(row, _)| row)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for instruction in &self.instructions {
            match instruction {
                RenderInstruction::CategoryRow { .. } => summary.categories += 1,
                RenderInstruction::LeafRow { .. } => summary.leaves += 1,
                RenderInstruction::SeparatorRow { .. } => summary.separators += 1,
            }
        }
        summary
    }
}

/// Lay out `nodes` as spreadsheet rows.
///
/// Every node at level 0 or 1 except the first is preceded by a separator,
/// and the plan always ends with one closing separator, so `n` nodes give
/// `n + top_level_nodes_after_first + 1` rows.
pub fn plan_rows(nodes: &[NavNode], policy: &LayoutPolicy) -> RowPlan {
    let mut plan = RowPlan::new(policy.start_row);

    for (idx, node) in nodes.iter().enumerate() {
        if node.is_top_level() && idx > 0 {
            plan.push(RenderInstruction::SeparatorRow {
                height: policy.separator_height,
            });
        }

        let instruction = match classify(node, policy.max_category_level) {
            RowKind::Category => RenderInstruction::CategoryRow {
                level: node.level,
                label: node.label.clone(),
                url: node.url.clone(),
                tier: CategoryTier::for_level(node.level),
                span: MergeSpan::TRACKER_COLUMNS,
            },
            RowKind::Leaf => RenderInstruction::LeafRow {
                label: node.label.clone(),
                url: node.url.clone(),
                indent: node.level,
            },
        };
        plan.push(instruction);
    }

    plan.push(RenderInstruction::SeparatorRow {
        height: policy.closing_separator_height,
    });

    debug!(
        "Planned {} rows for {} nodes starting at row {}",
        plan.len(),
        nodes.len(),
        plan.start_row
    );
    plan
}
