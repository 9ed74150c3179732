use crate::error::Result;
use crate::planner::{DEFAULT_MAX_CATEGORY_LEVEL, LayoutPolicy, PlanSummary, RowPlan, plan_rows};
use crate::render::{SheetLayout, StatusSet, TrackerDocument, TrackerRenderer};
use crate::style::{StyleDescriptor, StyleSheet, StyleTier};
use indicatif::{ProgressBar, ProgressStyle};
use navsheet_scanner::{
    CatalogScanner, CatalogSelectors, Fetcher, NavExtractor, NavNode, NavSelectors,
    ProgressCallback, parse_url,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const SPRING_DATA_URL: &str = "https://docs.spring.io/spring-data/commons/reference/";
pub const DEV_JAVA_URL: &str = "https://dev.java/learn/";

/// Where the outline comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerSource {
    /// A single documentation page with a navigation tree.
    Docs { url: String, selectors: NavSelectors },
    /// A course catalog index plus one page per lesson.
    Catalog {
        url: String,
        selectors: CatalogSelectors,
    },
}

impl TrackerSource {
    pub fn docs(url: impl Into<String>) -> Self {
        TrackerSource::Docs {
            url: url.into(),
            selectors: NavSelectors::default(),
        }
    }

    pub fn catalog(url: impl Into<String>) -> Self {
        TrackerSource::Catalog {
            url: url.into(),
            selectors: CatalogSelectors::default(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            TrackerSource::Docs { url, .. } | TrackerSource::Catalog { url, .. } => url,
        }
    }

    pub fn with_url(self, url: impl Into<String>) -> Self {
        match self {
            TrackerSource::Docs { selectors, .. } => TrackerSource::Docs {
                url: url.into(),
                selectors,
            },
            TrackerSource::Catalog { selectors, .. } => TrackerSource::Catalog {
                url: url.into(),
                selectors,
            },
        }
    }
}

/// Options for building one tracker workbook
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub source: TrackerSource,
    pub output: PathBuf,
    pub document: TrackerDocument,
    pub styles: StyleSheet,
    pub max_category_level: usize,
    pub show_progress: bool,
}

/// Ready-made option sets for the sites the tool was built around
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackerPreset {
    /// Spring Data Commons reference documentation
    #[default]
    SpringData,
    /// dev.java learning catalog
    DevJava,
}

impl FromStr for TrackerPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring-data" | "spring" => Ok(TrackerPreset::SpringData),
            "dev-java" | "java" => Ok(TrackerPreset::DevJava),
            _ => Err(format!(
                "unknown preset '{}', expected spring-data or dev-java",
                s
            )),
        }
    }
}

impl TrackerPreset {
    pub fn options(self) -> TrackerOptions {
        match self {
            TrackerPreset::SpringData => TrackerOptions {
                source: TrackerSource::docs(SPRING_DATA_URL),
                output: PathBuf::from("spring-data-tracking.xlsx"),
                document: TrackerDocument {
                    title: "Spring Data Progress Tracking".to_string(),
                    sheet_name: "Spring Data".to_string(),
                    headers: ["Label".to_string(), "Link".to_string(), "Status".to_string()],
                    statuses: StatusSet::default(),
                    layout: SheetLayout::docs(),
                },
                styles: StyleSheet::standard(),
                max_category_level: DEFAULT_MAX_CATEGORY_LEVEL,
                show_progress: true,
            },
            TrackerPreset::DevJava => {
                let styles = StyleSheet::standard();
                let title = StyleDescriptor {
                    font_size: 24.0,
                    ..styles.get(StyleTier::Title).clone()
                };
                TrackerOptions {
                    source: TrackerSource::catalog(DEV_JAVA_URL),
                    output: PathBuf::from("java-learning-tracking.xlsx"),
                    document: TrackerDocument {
                        title: "Dev.Java Courses Tracking".to_string(),
                        sheet_name: "Java tutorials".to_string(),
                        headers: [
                            "Tutorial".to_string(),
                            "Link".to_string(),
                            "Progress".to_string(),
                        ],
                        statuses: StatusSet::preset(&["NOT STARTED", "IN PROGRESS", "DONE"]),
                        layout: SheetLayout::catalog(),
                    },
                    styles: styles.with(StyleTier::Title, title),
                    max_category_level: DEFAULT_MAX_CATEGORY_LEVEL,
                    show_progress: true,
                }
            }
        }
    }
}

impl Default for TrackerOptions {
    fn default() -> Self {
        TrackerPreset::SpringData.options()
    }
}

/// Outcome of a tracker build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerReport {
    pub output: PathBuf,
    pub nodes: usize,
    pub summary: PlanSummary,
}

/// Fetch and flatten the outline described by `source`.
pub async fn scan_outline(
    source: &TrackerSource,
    progress_callback: Option<ProgressCallback>,
) -> Result<Vec<NavNode>> {
    let fetcher = Fetcher::new()?;

    let nodes = match source {
        TrackerSource::Docs { url, selectors } => {
            let extractor = NavExtractor::new(selectors)?;
            let url = parse_url(url)?;
            if let Some(ref callback) = progress_callback {
                callback(format!("Fetching {}", url));
            }
            let html = fetcher.fetch(&url).await?;
            extractor.extract(&html, &url)
        }
        TrackerSource::Catalog { url, selectors } => {
            let mut scanner = CatalogScanner::new(selectors)?;
            if let Some(callback) = progress_callback {
                scanner = scanner.with_progress_callback(callback);
            }
            scanner.scan(&fetcher, &parse_url(url)?).await?
        }
    };

    Ok(nodes)
}

/// Plan `nodes` below the fixed header block of `document`.
pub fn plan_outline(
    nodes: &[NavNode],
    document: &TrackerDocument,
    max_category_level: usize,
) -> RowPlan {
    let policy = LayoutPolicy::default()
        .with_start_row(document.layout.first_data_row())
        .with_max_category_level(max_category_level);
    plan_rows(nodes, &policy)
}

/// Fetch, plan and render a tracker workbook. Nothing is written unless
/// every fetch succeeded.
pub async fn build_tracker(options: TrackerOptions) -> Result<TrackerReport> {
    let TrackerOptions {
        source,
        output,
        document,
        styles,
        max_category_level,
        show_progress,
    } = options;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Scanning {}", source.url()));
        Some(pb)
    } else {
        None
    };

    let progress_callback: Option<ProgressCallback> = progress_bar.clone().map(|pb| {
        let callback: ProgressCallback = Arc::new(move |msg: String| pb.set_message(msg));
        callback
    });

    let nodes = match scan_outline(&source, progress_callback).await {
        Ok(nodes) => nodes,
        Err(e) => {
            if let Some(ref pb) = progress_bar {
                pb.finish_and_clear();
            }
            return Err(e);
        }
    };

    let plan = plan_outline(&nodes, &document, max_category_level);
    let summary = plan.summary();

    if let Some(ref pb) = progress_bar {
        pb.set_message(format!("Writing {}", output.display()));
    }
    let rendered = TrackerRenderer::new(&document, &styles).render_to_file(&plan, &output);
    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }
    rendered?;

    info!(
        "Tracker written to {}: {} categories, {} leaves",
        output.display(),
        summary.categories,
        summary.leaves
    );

    Ok(TrackerReport {
        output,
        nodes: nodes.len(),
        summary,
    })
}
