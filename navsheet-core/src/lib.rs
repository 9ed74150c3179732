//! Row layout planning and spreadsheet rendering for navsheet.
//!
//! - `planner` : navigation outline -> ordered row instructions
//! - `style`   : style tier presets
//! - `render`  : row instructions -> xlsx workbook
//! - `tracker` : fetch, plan and render in one call
pub mod error;
pub mod planner;
pub mod render;
pub mod style;
pub mod tracker;

pub use error::TrackerError;
pub use planner::{
    CategoryTier, LayoutPolicy, MergeSpan, PlanSummary, RenderInstruction, RowKind, RowPlan,
    classify, plan_rows,
};
pub use render::{SheetLayout, StatusSet, TrackerDocument, TrackerRenderer};
pub use style::{StyleDescriptor, StyleSheet, StyleTier};
pub use tracker::{
    TrackerOptions, TrackerPreset, TrackerReport, TrackerSource, build_tracker, plan_outline,
    scan_outline,
};
