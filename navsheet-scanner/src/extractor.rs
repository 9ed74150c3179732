use crate::error::{Result, ScanError};
use crate::node::NavNode;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// CSS selectors describing the navigation DOM shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSelectors {
    /// Element holding the whole navigation tree.
    pub container: String,
    /// A list of items; the first one inside the container is the root.
    pub list: String,
    /// One entry of a list.
    pub item: String,
    /// The entry's own link.
    pub link: String,
}

impl Default for NavSelectors {
    fn default() -> Self {
        Self {
            container: "nav.nav-menu".to_string(),
            list: "ul.nav-list".to_string(),
            item: "li.nav-item".to_string(),
            link: "a.nav-link".to_string(),
        }
    }
}

pub(crate) fn compile_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("selector '{}': {}", css, e)))
}

/// Flattens a navigation tree into [`NavNode`]s, depth-first and pre-order.
pub struct NavExtractor {
    container: Selector,
    list: Selector,
    item: Selector,
    link: Selector,
}

impl NavExtractor {
    pub fn new(selectors: &NavSelectors) -> Result<Self> {
        Ok(Self {
            container: compile_selector(&selectors.container)?,
            list: compile_selector(&selectors.list)?,
            item: compile_selector(&selectors.item)?,
            link: compile_selector(&selectors.link)?,
        })
    }

    /// Extract the navigation outline of `html`, resolving links against `base`.
    ///
    /// A document without the navigation container (or without a root list
    /// inside it) has nothing to track and yields an empty outline.
    pub fn extract(&self, html: &str, base: &Url) -> Vec<NavNode> {
        let document = Html::parse_document(html);

        let Some(container) = document.select(&self.container).next() else {
            warn!("Navigation container not found in {}", base);
            return Vec::new();
        };
        let Some(root) = container.select(&self.list).next() else {
            warn!("Navigation container in {} has no list", base);
            return Vec::new();
        };

        let nodes = self.walk(root, 0, base);
        debug!("Extracted {} navigation nodes from {}", nodes.len(), base);
        nodes
    }

    fn walk(&self, list: ElementRef<'_>, level: usize, base: &Url) -> Vec<NavNode> {
        let mut nodes = Vec::new();

        for item in direct_children(list).filter(|el| self.item.matches(el)) {
            let link = direct_children(item).find(|el| self.link.matches(el));
            let sub_list = direct_children(item).find(|el| self.list.matches(el));

            let label = match link {
                Some(a) => collapse_whitespace(a.text()),
                None => own_text(item, sub_list),
            };
            let url = link
                .and_then(|a| a.value().attr("href"))
                .map(|href| resolve_href(base, href))
                .unwrap_or_default();

            let children = sub_list
                .map(|sub| self.walk(sub, level + 1, base))
                .unwrap_or_default();

            nodes.push(NavNode::new(level, label, url).with_children(!children.is_empty()));
            nodes.extend(children);
        }

        nodes
    }
}

fn direct_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Text of `item` without the text of its nested list.
fn own_text(item: ElementRef<'_>, sub_list: Option<ElementRef<'_>>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for child in item.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if sub_list.is_some_and(|sub| sub.id() == el.id()) {
                continue;
            }
            parts.extend(el.text());
        } else if let Some(text) = child.value().as_text() {
            parts.push(&**text);
        }
    }
    collapse_whitespace(parts.into_iter())
}

fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a navigation `href` against the page it was found on.
///
/// Absolute URLs are returned unchanged. Paths starting with `/` are joined to
/// the base origin; any other relative path is joined to the base path, which
/// is always treated as a directory.
pub fn resolve_href(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    let joined = if href.starts_with('/') {
        base.join(href)
    } else {
        directory_of(base).join(href)
    };

    match joined {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!("Could not resolve '{}' against {}: {}", href, base, e);
            href.to_string()
        }
    }
}

fn directory_of(base: &Url) -> Url {
    let mut dir = base.clone();
    dir.set_query(None);
    dir.set_fragment(None);
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir
}
