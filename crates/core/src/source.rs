//! Document sources: where listing and entity pages come from.
//!
//! A source holds one navigation context and hands out one page at a time.
//! [`HttpSource`] talks to the live wiki; [`FileSource`] reads a saved mirror
//! from disk. Any error a source returns is fatal to the run.

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::fetch::fetch_file;
use crate::layout::CompiledLayout;
use crate::parse::Document;
use crate::{AscensionError, Result};

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, build_client, fetch_url};

/// Where the pipeline gets its pages.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Loads the category listing page.
    async fn listing(&mut self) -> Result<String>;

    /// Loads one entity page by the handle found on the listing page.
    async fn load(&mut self, handle: &str) -> Result<String>;
}

/// Collects entity handles from a listing page, in document order.
///
/// Entries without a link are ignored.
///
/// # Errors
///
/// Returns [`AscensionError::ListingMissing`] when the members container is
/// absent.
pub fn entity_handles(listing_html: &str, layout: &CompiledLayout) -> Result<Vec<String>> {
    let doc = Document::parse(listing_html);
    let members = doc
        .first(&layout.listing_members)
        .ok_or_else(|| AscensionError::ListingMissing { selector: layout.source().listing_members.clone() })?;

    let handles = members
        .select_with(&layout.listing_item)
        .iter()
        .filter_map(|item| item.first(&layout.listing_link))
        .filter_map(|link| link.attr("href").map(str::to_string))
        .filter(|href| !href.trim().is_empty())
        .collect();

    Ok(handles)
}

/// Live wiki source over HTTP.
#[cfg(feature = "fetch")]
pub struct HttpSource {
    listing_url: Url,
    config: FetchConfig,
    client: reqwest::Client,
}

#[cfg(feature = "fetch")]
impl HttpSource {
    /// Creates a source rooted at the category listing URL.
    pub fn new(listing_url: &str, config: FetchConfig) -> Result<Self> {
        let listing_url = Url::parse(listing_url).map_err(|e| AscensionError::InvalidUrl(e.to_string()))?;
        let client = build_client(&config)?;
        Ok(Self { listing_url, config, client })
    }

    /// Resolves a handle against the listing URL.
    pub fn resolve(&self, handle: &str) -> Result<Url> {
        self.listing_url
            .join(handle)
            .map_err(|e| AscensionError::InvalidUrl(format!("{}: {}", handle, e)))
    }
}

#[cfg(feature = "fetch")]
impl DocumentSource for HttpSource {
    async fn listing(&mut self) -> Result<String> {
        fetch_url(&self.client, &self.listing_url, &self.config).await
    }

    async fn load(&mut self, handle: &str) -> Result<String> {
        let url = self.resolve(handle)?;
        debug!(%url, "fetching entity page");
        fetch_url(&self.client, &url, &self.config).await
    }
}

/// Saved mirror on disk: a listing file plus entity pages under a root.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    listing: PathBuf,
}

impl FileSource {
    /// `listing` is resolved relative to `root` unless absolute.
    pub fn new(root: impl Into<PathBuf>, listing: impl AsRef<Path>) -> Self {
        let root = root.into();
        let listing = root.join(listing);
        Self { root, listing }
    }

    /// Maps a handle to a file under the root.
    ///
    /// Absolute URLs contribute their path; a leading `/` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AscensionError::InvalidHandle`] when the handle holds a `..`
    /// component or a drive prefix.
    pub fn resolve(&self, handle: &str) -> Result<PathBuf> {
        let path = match Url::parse(handle) {
            Ok(url) => url.path().to_string(),
            Err(_) => handle.to_string(),
        };

        let mut resolved = self.root.clone();
        for component in Path::new(&path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(AscensionError::InvalidHandle(handle.to_string()));
                }
            }
        }
        Ok(resolved)
    }
}

impl DocumentSource for FileSource {
    async fn listing(&mut self) -> Result<String> {
        fetch_file(&self.listing)
    }

    async fn load(&mut self, handle: &str) -> Result<String> {
        let path = self.resolve(handle)?;
        debug!(path = %path.display(), "reading entity page");
        fetch_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SiteLayout;
    use crate::testing::listing_page;

    fn layout() -> CompiledLayout {
        SiteLayout::default().compile().unwrap()
    }

    #[test]
    fn test_entity_handles_in_order() {
        let html = listing_page(&["/wiki/Amber", "/wiki/Kaeya", "/wiki/Lisa"]);
        let handles = entity_handles(&html, &layout()).unwrap();

        assert_eq!(handles, vec!["/wiki/Amber", "/wiki/Kaeya", "/wiki/Lisa"]);
    }

    #[test]
    fn test_listing_without_container_is_fatal() {
        let err = entity_handles("<html><body><ul><li><a href='/x'>x</a></li></ul></body></html>", &layout());
        assert!(matches!(err, Err(AscensionError::ListingMissing { .. })));
    }

    #[test]
    fn test_file_source_resolves_inside_root() {
        let source = FileSource::new("/mirror", "listing.html");

        assert_eq!(source.resolve("/wiki/Amber").unwrap(), PathBuf::from("/mirror/wiki/Amber"));
        assert_eq!(source.resolve("amber.html").unwrap(), PathBuf::from("/mirror/amber.html"));
        assert_eq!(source.resolve("./wiki/Amber").unwrap(), PathBuf::from("/mirror/wiki/Amber"));
        assert_eq!(
            source.resolve("https://example.org/wiki/Amber").unwrap(),
            PathBuf::from("/mirror/wiki/Amber")
        );
    }

    #[rstest::rstest]
    #[case("../../etc/passwd")]
    #[case("/wiki/../../secret.html")]
    #[case("wiki/..")]
    fn test_file_source_rejects_parent_components(#[case] handle: &str) {
        let source = FileSource::new("/mirror", "listing.html");

        assert!(matches!(
            source.resolve(handle),
            Err(AscensionError::InvalidHandle(h)) if h == handle
        ));
    }

    #[tokio::test]
    async fn test_file_source_refuses_to_load_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("mirror");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(dir.path().join("outside.html"), "<html>outside</html>").unwrap();

        let mut source = FileSource::new(&root, "listing.html");
        assert!(matches!(
            source.load("../outside.html").await,
            Err(AscensionError::InvalidHandle(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_reads_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("listing.html"), listing_page(&["amber.html"])).unwrap();
        std::fs::write(dir.path().join("amber.html"), "<html>amber</html>").unwrap();

        let mut source = FileSource::new(dir.path(), "listing.html");
        let listing = source.listing().await.unwrap();
        assert_eq!(entity_handles(&listing, &layout()).unwrap(), vec!["amber.html"]);
        assert_eq!(source.load("amber.html").await.unwrap(), "<html>amber</html>");
        assert!(matches!(
            source.load("missing.html").await,
            Err(AscensionError::FileNotFound(_))
        ));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_http_source_resolves_relative_handles() {
        let source = HttpSource::new(
            "https://genshin-impact.fandom.com/wiki/Category:Characters_by_Release_Date",
            FetchConfig::default(),
        )
        .unwrap();

        assert_eq!(
            source.resolve("/wiki/Amber").unwrap().as_str(),
            "https://genshin-impact.fandom.com/wiki/Amber"
        );
        assert_eq!(
            source.resolve("https://other.example/wiki/Lisa").unwrap().as_str(),
            "https://other.example/wiki/Lisa"
        );
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_http_source_rejects_bad_url() {
        assert!(matches!(
            HttpSource::new("not a url", FetchConfig::default()),
            Err(AscensionError::InvalidUrl(_))
        ));
    }
}
