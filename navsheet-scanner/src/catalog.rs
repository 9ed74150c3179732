use crate::error::Result;
use crate::extractor::{compile_selector, resolve_href};
use crate::fetcher::{Fetcher, parse_url};
use crate::node::NavNode;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// CSS selectors for a course catalog: an index page of lesson groups, and
/// one page per lesson listing its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSelectors {
    pub group: String,
    /// Searched inside a group.
    pub group_title: String,
    /// Searched inside a group.
    pub lesson_link: String,
    /// Searched on a lesson page.
    pub lesson_parts: String,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            group: "div.learn-group".to_string(),
            group_title: "h2".to_string(),
            lesson_link: "a".to_string(),
            lesson_parts: "#tutorial-group a".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogGroup {
    pub title: String,
    pub lessons: Vec<CatalogLink>,
}

struct CompiledCatalog {
    group: Selector,
    group_title: Selector,
    lesson_link: Selector,
    lesson_parts: Selector,
}

impl CompiledCatalog {
    fn new(selectors: &CatalogSelectors) -> Result<Self> {
        Ok(Self {
            group: compile_selector(&selectors.group)?,
            group_title: compile_selector(&selectors.group_title)?,
            lesson_link: compile_selector(&selectors.lesson_link)?,
            lesson_parts: compile_selector(&selectors.lesson_parts)?,
        })
    }
}

/// Walks a multi-page course catalog and flattens it into [`NavNode`]s:
/// groups at level 0, lessons at level 1, lesson parts at level 2.
pub struct CatalogScanner {
    selectors: CompiledCatalog,
    progress_callback: Option<ProgressCallback>,
}

impl CatalogScanner {
    pub fn new(selectors: &CatalogSelectors) -> Result<Self> {
        Ok(Self {
            selectors: CompiledCatalog::new(selectors)?,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Read the groups and lesson links of a catalog index page.
    pub fn groups(&self, index_html: &str, base: &Url) -> Vec<CatalogGroup> {
        let document = Html::parse_document(index_html);
        let sel = &self.selectors;

        document
            .select(&sel.group)
            .map(|group| {
                let title = group
                    .select(&sel.group_title)
                    .next()
                    .map(element_text)
                    .unwrap_or_else(|| {
                        warn!("Catalog group without a title in {}", base);
                        String::new()
                    });
                let lessons = group
                    .select(&sel.lesson_link)
                    .filter_map(|a| link_of(a, base))
                    .collect();
                CatalogGroup { title, lessons }
            })
            .collect()
    }

    /// Read the parts listed on a lesson page. A page without a parts list
    /// yields nothing.
    pub fn lesson_parts(&self, lesson_html: &str, base: &Url) -> Vec<CatalogLink> {
        let document = Html::parse_document(lesson_html);
        document
            .select(&self.selectors.lesson_parts)
            .filter_map(|a| link_of(a, base))
            .collect()
    }

    /// Fetch the index and every lesson page, one after the other.
    pub async fn scan(&self, fetcher: &Fetcher, index_url: &Url) -> Result<Vec<NavNode>> {
        info!("Scanning course catalog at {}", index_url);
        self.report(format!("Fetching {}", index_url));

        let index_html = fetcher.fetch(index_url).await?;
        let groups = self.groups(&index_html, index_url);
        let total_lessons: usize = groups.iter().map(|g| g.lessons.len()).sum();
        debug!("Found {} groups, {} lessons", groups.len(), total_lessons);

        let mut nodes = Vec::new();
        let mut fetched = 0;
        for group in groups {
            nodes.push(NavNode::new(0, group.title, "").with_children(!group.lessons.is_empty()));

            for lesson in group.lessons {
                fetched += 1;
                self.report(format!(
                    "Fetching lesson {}/{}: {}",
                    fetched, total_lessons, lesson.label
                ));

                let lesson_url = parse_url(&lesson.url)?;
                let lesson_html = fetcher.fetch(&lesson_url).await?;
                let parts = self.lesson_parts(&lesson_html, &lesson_url);

                nodes.push(
                    NavNode::new(1, lesson.label, lesson.url).with_children(!parts.is_empty()),
                );
                nodes.extend(
                    parts
                        .into_iter()
                        .map(|part| NavNode::new(2, part.label, part.url)),
                );
            }
        }

        info!("Catalog scan complete: {} nodes", nodes.len());
        Ok(nodes)
    }

    fn report(&self, msg: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(msg);
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn link_of(anchor: ElementRef<'_>, base: &Url) -> Option<CatalogLink> {
    let Some(href) = anchor.value().attr("href") else {
        debug!("Skipping catalog link without href");
        return None;
    };
    let url = resolve_href(base, href);
    if url.is_empty() {
        return None;
    }
    Some(CatalogLink {
        label: element_text(anchor),
        url,
    })
}
