pub mod catalog;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod node;

pub use catalog::{CatalogScanner, CatalogSelectors, ProgressCallback};
pub use error::ScanError;
pub use extractor::{NavExtractor, NavSelectors, resolve_href};
pub use fetcher::{Fetcher, parse_url};
pub use node::NavNode;
