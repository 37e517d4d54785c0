//! Structural paths into the wiki's page layout.
//!
//! Every element the extractors read is located through a CSS selector held
//! in [`SiteLayout`]. The defaults match the character pages of the Genshin
//! Impact fandom wiki; a different mirror can override any of them from a
//! JSON file without recompiling (see [`crate::PipelineConfig::from_json_file`]).
//!
//! Selectors are compiled once by [`SiteLayout::compile`] so a typo surfaces
//! before any page is fetched.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::parse::compile_selector;

/// Selector strings for the listing page and the entity pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLayout {
    /// Container of the category listing members.
    pub listing_members: String,
    /// One entry inside the members container.
    pub listing_item: String,
    /// Link inside a listing entry; its `href` is the entity handle.
    pub listing_link: String,

    /// The info card of an entity page. All paths below except the stat
    /// table ones are relative to it.
    pub card: String,
    /// Heading holding the entity name.
    pub name: String,
    /// First info row (rarity, weapon, element cells).
    pub info_row: String,
    /// Cells of the info row.
    pub info_cell: String,
    /// Image inside the rarity cell; its `title` encodes the rarity.
    pub rarity_image: String,
    /// Link whose `title` reads e.g. "Tall Female".
    pub sex: String,
    /// Region link paths, tried in order. The first match wins.
    pub region: Vec<String>,
    /// Value container of the release date section.
    pub release_date: String,
    /// Marker that terminates the date inside the release date markup.
    pub date_terminator: String,

    /// Body of the ascension stat table.
    pub stat_table: String,
    /// Rows of the stat table; the first one is the header.
    pub stat_row: String,
    /// Data cells of a stat row.
    pub stat_cell: String,
    /// Header link naming the ascension stat.
    pub ascension_stat: String,
    /// First class token marking a decorative separator row.
    pub decorative_row_class: String,
}

const DATA_PANEL: &str = "section:nth-of-type(2) > div:nth-of-type(2)";

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            listing_members: ".category-page__members-for-char".to_string(),
            listing_item: "li".to_string(),
            listing_link: "a".to_string(),
            card: ".portable-infobox".to_string(),
            name: "h2".to_string(),
            info_row: "section > table > tbody > tr".to_string(),
            info_cell: "td".to_string(),
            rarity_image: "img".to_string(),
            sex: format!("{DATA_PANEL} > div > div > a"),
            region: vec![
                format!("{DATA_PANEL} > div[data-source='region'] > div > a"),
                format!("{DATA_PANEL} > div[data-source='region'] > div > ul > li > a"),
            ],
            release_date: format!("{DATA_PANEL} > div[data-source='releaseDate'] > div"),
            date_terminator: "<br>".to_string(),
            stat_table: ".ascension-stats > tbody".to_string(),
            stat_row: "tr".to_string(),
            stat_cell: "td".to_string(),
            ascension_stat: "tr > th:nth-of-type(6) > span > b > a".to_string(),
            decorative_row_class: "ascension".to_string(),
        }
    }
}

impl SiteLayout {
    /// Compiles every selector.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AscensionError::HtmlParseError`] naming the first
    /// invalid selector, or [`crate::AscensionError::ConfigError`] when no
    /// region path is configured.
    pub fn compile(&self) -> Result<CompiledLayout> {
        if self.region.is_empty() {
            return Err(crate::AscensionError::ConfigError(
                "at least one region selector is required".to_string(),
            ));
        }

        Ok(CompiledLayout {
            listing_members: compile_selector(&self.listing_members)?,
            listing_item: compile_selector(&self.listing_item)?,
            listing_link: compile_selector(&self.listing_link)?,
            card: compile_selector(&self.card)?,
            name: compile_selector(&self.name)?,
            info_row: compile_selector(&self.info_row)?,
            info_cell: compile_selector(&self.info_cell)?,
            rarity_image: compile_selector(&self.rarity_image)?,
            sex: compile_selector(&self.sex)?,
            region: self.region.iter().map(|s| compile_selector(s)).collect::<Result<_>>()?,
            release_date: compile_selector(&self.release_date)?,
            date_terminator: self.date_terminator.clone(),
            stat_table: compile_selector(&self.stat_table)?,
            stat_row: compile_selector(&self.stat_row)?,
            stat_cell: compile_selector(&self.stat_cell)?,
            ascension_stat: compile_selector(&self.ascension_stat)?,
            decorative_row_class: self.decorative_row_class.clone(),
            source: self.clone(),
        })
    }
}

/// A [`SiteLayout`] with every selector compiled.
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    pub listing_members: Selector,
    pub listing_item: Selector,
    pub listing_link: Selector,
    pub card: Selector,
    pub name: Selector,
    pub info_row: Selector,
    pub info_cell: Selector,
    pub rarity_image: Selector,
    pub sex: Selector,
    pub region: Vec<Selector>,
    pub release_date: Selector,
    pub date_terminator: String,
    pub stat_table: Selector,
    pub stat_row: Selector,
    pub stat_cell: Selector,
    pub ascension_stat: Selector,
    pub decorative_row_class: String,
    source: SiteLayout,
}

impl CompiledLayout {
    /// The selector strings this layout was compiled from.
    pub fn source(&self) -> &SiteLayout {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AscensionError;

    #[test]
    fn test_default_layout_compiles() {
        let layout = SiteLayout::default().compile().unwrap();
        assert_eq!(layout.region.len(), 2);
        assert_eq!(layout.decorative_row_class, "ascension");
        assert_eq!(layout.source(), &SiteLayout::default());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let layout = SiteLayout { sex: "div >> [[".to_string(), ..Default::default() };
        let err = layout.compile().unwrap_err();
        assert!(matches!(err, AscensionError::HtmlParseError(msg) if msg.contains("div >> [[")));
    }

    #[test]
    fn test_empty_region_list_rejected() {
        let layout = SiteLayout { region: Vec::new(), ..Default::default() };
        assert!(matches!(layout.compile(), Err(AscensionError::ConfigError(_))));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let layout: SiteLayout = serde_json::from_str(r#"{ "card": ".infobox" }"#).unwrap();
        assert_eq!(layout.card, ".infobox");
        assert_eq!(layout.stat_table, SiteLayout::default().stat_table);
    }
}
