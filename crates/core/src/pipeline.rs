//! Pipeline driver and its configuration.
//!
//! [`Pipeline::run`] lists the entity handles, then loads, extracts and drops
//! one page at a time. A page that yields no record is logged and tallied;
//! only a failing document source stops the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use ascension_core::{FetchConfig, HttpSource, Pipeline, PipelineConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> ascension_core::Result<()> {
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let mut source = HttpSource::new(ascension_core::pipeline::DEFAULT_LISTING_URL, FetchConfig::default())?;
//!
//! let report = pipeline.run(&mut source).await?;
//! println!("{} records, {} skipped", report.records.len(), report.skipped.len());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dataset::Dataset;
use crate::fetch::fetch_file;
use crate::fields::ELEMENTAL_DMG;
use crate::layout::{CompiledLayout, SiteLayout};
use crate::parse::Document;
use crate::record::{EntityRecord, build_entity};
use crate::source::{DocumentSource, entity_handles};
use crate::{AscensionError, Result, SkipReason};

/// Category page listing every character by release date.
pub const DEFAULT_LISTING_URL: &str = "https://genshin-impact.fandom.com/wiki/Category:Characters_by_Release_Date";

/// Extraction rules for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Structural paths into the pages.
    pub layout: SiteLayout,
    /// Non-playable placeholder entities (default: Traveler, Aloy).
    pub placeholder_names: Vec<String>,
    /// Further names to leave out.
    pub excluded_names: Vec<String>,
    /// Label replacing ascension stats ending in "Bonus".
    pub elemental_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            layout: SiteLayout::default(),
            placeholder_names: vec!["Traveler".to_string(), "Aloy".to_string()],
            excluded_names: Vec::new(),
            elemental_label: ELEMENTAL_DMG.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new builder for PipelineConfig.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Loads a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fetch_file(path)?;
        serde_json::from_str(&text)
            .map_err(|e| AscensionError::ConfigError(format!("{}: {}", path.display(), e)))
    }
}

/// Builder for PipelineConfig.
///
/// # Example
///
/// ```rust
/// use ascension_core::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .exclude("Paimon")
///     .elemental_label("Elemental DMG%")
///     .build();
/// assert_eq!(config.excluded_names, vec!["Paimon".to_string()]);
/// ```
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    /// Replaces the page layout.
    pub fn layout(mut self, layout: SiteLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Adds a placeholder name.
    pub fn placeholder(mut self, name: impl Into<String>) -> Self {
        self.config.placeholder_names.push(name.into());
        self
    }

    /// Adds an excluded name.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.config.excluded_names.push(name.into());
        self
    }

    /// Sets the label for elemental damage bonuses.
    pub fn elemental_label(mut self, label: impl Into<String>) -> Self {
        self.config.elemental_label = label.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An entity that produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntity {
    pub handle: String,
    pub reason: SkipReason,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Records in listing order.
    pub records: Vec<EntityRecord>,
    pub skipped: Vec<SkippedEntity>,
    /// Number of entity pages loaded.
    pub visited: usize,
}

impl PipelineReport {
    /// Skip count per [`SkipReason::kind`].
    pub fn tally(&self) -> BTreeMap<&'static str, usize> {
        let mut tally = BTreeMap::new();
        for skipped in &self.skipped {
            *tally.entry(skipped.reason.kind()).or_insert(0) += 1;
        }
        tally
    }

    /// Long-form dataset of all records.
    pub fn dataset(&self) -> Dataset {
        Dataset::from_records(&self.records)
    }
}

/// Sequential extraction over a [`DocumentSource`].
pub struct Pipeline {
    config: PipelineConfig,
    layout: CompiledLayout,
}

impl Pipeline {
    /// Validates the config and compiles its layout.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let layout = config.layout.compile()?;
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extracts one entity page.
    pub fn extract_entity(&self, html: &str) -> std::result::Result<EntityRecord, SkipReason> {
        let doc = Document::parse(html);
        build_entity(&doc, &self.layout, &self.config)
    }

    /// Runs the whole pipeline against `source`.
    ///
    /// # Errors
    ///
    /// Any source failure aborts the run with
    /// [`AscensionError::SourceUnavailable`]; no partial report is returned.
    pub async fn run<S: DocumentSource>(&self, source: &mut S) -> Result<PipelineReport> {
        let listing = source.listing().await.map_err(|e| AscensionError::SourceUnavailable {
            handle: "listing".to_string(),
            source: Box::new(e),
        })?;
        let handles = entity_handles(&listing, &self.layout)?;
        info!(entities = handles.len(), "listing loaded");

        let mut report = PipelineReport::default();

        for handle in handles {
            debug!(%handle, "loading entity page");
            let html = source.load(&handle).await.map_err(|e| AscensionError::SourceUnavailable {
                handle: handle.clone(),
                source: Box::new(e),
            })?;
            report.visited += 1;

            match self.extract_entity(&html) {
                Ok(record) => {
                    info!(%handle, name = record.name(), "record built");
                    report.records.push(record);
                }
                Err(reason) => {
                    warn!(%handle, kind = reason.kind(), "entity skipped: {}", reason);
                    report.skipped.push(SkippedEntity { handle, reason });
                }
            }
        }

        info!(
            records = report.records.len(),
            skipped = report.skipped.len(),
            "extraction finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LEVEL_COUNT;
    use crate::testing::{EntityPage, listing_page};
    use std::collections::HashMap;

    /// In-memory source keyed by handle.
    struct MapSource {
        listing: Option<String>,
        pages: HashMap<String, String>,
        loads: Vec<String>,
    }

    impl MapSource {
        fn new(pages: &[(&str, String)]) -> Self {
            let handles: Vec<&str> = pages.iter().map(|(h, _)| *h).collect();
            Self {
                listing: Some(listing_page(&handles)),
                pages: pages.iter().map(|(h, p)| (h.to_string(), p.clone())).collect(),
                loads: Vec::new(),
            }
        }
    }

    impl DocumentSource for MapSource {
        async fn listing(&mut self) -> Result<String> {
            self.listing.clone().ok_or(AscensionError::Timeout { timeout: 1 })
        }

        async fn load(&mut self, handle: &str) -> Result<String> {
            self.loads.push(handle.to_string());
            self.pages
                .get(handle)
                .cloned()
                .ok_or_else(|| AscensionError::FileNotFound(handle.into()))
        }
    }

    #[tokio::test]
    async fn test_complete_and_incomplete_entities() {
        let mut source = MapSource::new(&[
            ("/wiki/A", EntityPage::new("Entity A").ascension_stat("Pyro DMG Bonus").render()),
            ("/wiki/B", EntityPage::new("Entity B").levels(10).render()),
        ]);
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

        let report = pipeline.run(&mut source).await.unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name(), "Entity A");
        assert_eq!(report.records[0].fields.ascension_stat, "Elemental DMG");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].handle, "/wiki/B");
        assert_eq!(report.visited, 2);

        let dataset = report.dataset();
        assert_eq!(dataset.len(), LEVEL_COUNT);
        assert!(dataset.rows().iter().all(|row| row.fields.name == "Entity A"));
    }

    #[tokio::test]
    async fn test_skip_tally() {
        let mut source = MapSource::new(&[
            ("/wiki/Traveler", EntityPage::new("Traveler").render()),
            ("/wiki/Aloy", EntityPage::new("Aloy").render()),
            ("/wiki/Soon", EntityPage::new("Soon").levels(0).render()),
            ("/wiki/Amber", EntityPage::new("Amber").render()),
        ]);
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

        let report = pipeline.run(&mut source).await.unwrap();
        let tally = report.tally();

        assert_eq!(report.records.len(), 1);
        assert_eq!(tally.get("placeholder"), Some(&2));
        assert_eq!(tally.get("incomplete"), Some(&1));
    }

    #[tokio::test]
    async fn test_unavailable_listing_is_fatal() {
        let mut source = MapSource::new(&[]);
        source.listing = None;
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

        let err = pipeline.run(&mut source).await.unwrap_err();
        assert!(matches!(err, AscensionError::SourceUnavailable { handle, .. } if handle == "listing"));
    }

    #[tokio::test]
    async fn test_unavailable_page_aborts_run() {
        let mut source = MapSource::new(&[("/wiki/Amber", EntityPage::new("Amber").render())]);
        source.listing = Some(listing_page(&["/wiki/Gone", "/wiki/Amber"]));
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

        let err = pipeline.run(&mut source).await.unwrap_err();
        assert!(matches!(err, AscensionError::SourceUnavailable { handle, .. } if handle == "/wiki/Gone"));
        assert_eq!(source.loads, vec!["/wiki/Gone".to_string()]);
    }

    #[test]
    fn test_invalid_layout_rejected_up_front() {
        let layout = SiteLayout { card: ":::".to_string(), ..Default::default() };
        let config = PipelineConfig::builder().layout(layout).build();
        assert!(matches!(Pipeline::new(config), Err(AscensionError::HtmlParseError(_))));
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "excluded_names": ["Amber"], "layout": { "card": ".infobox" } }"#).unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.excluded_names, vec!["Amber".to_string()]);
        assert_eq!(config.placeholder_names, vec!["Traveler".to_string(), "Aloy".to_string()]);
        assert_eq!(config.layout.card, ".infobox");
        assert_eq!(config.layout.name, "h2");
    }

    #[test]
    fn test_config_from_bad_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(AscensionError::ConfigError(_))
        ));
    }
}
