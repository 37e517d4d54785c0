//! Entity record assembly.
//!
//! [`build_entity`] runs the field extractor and the stat table reader over
//! one parsed page and either returns a complete [`EntityRecord`] or the
//! reason the entity was dropped. Nothing partial ever leaves this module.

use serde::Serialize;

use crate::fields::{self, EntityFields};
use crate::layout::CompiledLayout;
use crate::parse::Document;
use crate::pipeline::PipelineConfig;
use crate::stats::{self, LEVEL_COUNT, LEVELS, StatSeries};
use crate::SkipReason;

/// One entity's scalar attributes and per-level stats.
///
/// The stat arrays are fixed-size, so every record holds exactly
/// [`LEVEL_COUNT`] values per stat, aligned with [`EntityRecord::levels`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRecord {
    #[serde(flatten)]
    pub fields: EntityFields,
    #[serde(rename = "Level")]
    pub levels: [&'static str; LEVEL_COUNT],
    #[serde(flatten)]
    pub stats: StatSeries,
}

impl EntityRecord {
    pub fn new(fields: EntityFields, stats: StatSeries) -> Self {
        Self { fields, levels: LEVELS, stats }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }
}

/// Rejects placeholder and excluded names.
pub fn check_name(name: &str, config: &PipelineConfig) -> Result<(), SkipReason> {
    if config.placeholder_names.iter().any(|p| p == name) {
        return Err(SkipReason::PlaceholderName(name.to_string()));
    }
    if config.excluded_names.iter().any(|p| p == name) {
        return Err(SkipReason::Excluded(name.to_string()));
    }
    Ok(())
}

/// Builds the record for one entity page.
///
/// Checks run in this order: info card, name, stat table completeness,
/// scalar fields. The first failure decides the [`SkipReason`].
pub fn build_entity(doc: &Document, layout: &CompiledLayout, config: &PipelineConfig) -> Result<EntityRecord, SkipReason> {
    let card = fields::find_card(doc, layout)?;
    let name = fields::read_name(&card, layout)?;
    check_name(&name, config)?;

    let table = stats::find_stat_table(doc, &layout.stat_table)?;
    let series = stats::read_stat_table(&table, layout)?;

    let fields = fields::extract_fields(name, &card, &table, layout, &config.elemental_label)?;

    Ok(EntityRecord::new(fields, series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EntityPage, Region};

    fn build(html: &str) -> Result<EntityRecord, SkipReason> {
        let config = PipelineConfig::default();
        let layout = config.layout.compile().unwrap();
        build_entity(&Document::parse(html), &layout, &config)
    }

    #[test]
    fn test_complete_page_builds_record() {
        let record = build(&EntityPage::new("Amber").ascension_stat("ATK").render()).unwrap();

        assert_eq!(record.name(), "Amber");
        assert_eq!(record.fields.rarity, '4');
        assert_eq!(record.fields.sex, 'F');
        assert_eq!(record.fields.region, "Mondstadt");
        assert_eq!(record.fields.ascension_stat, "ATK");
        assert_eq!(record.levels, LEVELS);
        assert_eq!(record.stats.hp.len(), LEVEL_COUNT);
        assert_eq!(record.stats.hp[0], "1000");
        assert_eq!(record.stats.def[13], "3013");
    }

    #[test]
    fn test_bonus_stat_is_normalized() {
        let record = build(&EntityPage::new("Amber").ascension_stat("Pyro DMG Bonus").render()).unwrap();
        assert_eq!(record.fields.ascension_stat, "Elemental DMG");
    }

    #[test]
    fn test_placeholder_is_skipped_before_stats() {
        let err = build(&EntityPage::new("Traveler").levels(3).render()).unwrap_err();
        assert_eq!(err, SkipReason::PlaceholderName("Traveler".to_string()));
    }

    #[test]
    fn test_excluded_name() {
        let config = PipelineConfig::builder().exclude("Amber").build();
        let layout = config.layout.compile().unwrap();
        let doc = Document::parse(&EntityPage::new("Amber").render());

        let err = build_entity(&doc, &layout, &config).unwrap_err();
        assert_eq!(err, SkipReason::Excluded("Amber".to_string()));
    }

    #[test]
    fn test_unreleased_entity_is_skipped() {
        let err = build(&EntityPage::new("Newcomer").levels(10).render()).unwrap_err();
        assert_eq!(err, SkipReason::IncompleteStats { found: 10, expected: LEVEL_COUNT });
    }

    #[test]
    fn test_nested_region_builds_same_record() {
        let direct = build(&EntityPage::new("Amber").render()).unwrap();
        let nested = build(&EntityPage::new("Amber").region(Region::Nested("Mondstadt City")).render()).unwrap();
        assert_eq!(direct, nested);
    }

    #[test]
    fn test_bad_date_is_skipped() {
        let err = build(&EntityPage::new("Amber").release_date("Soon").render()).unwrap_err();
        assert!(matches!(err, SkipReason::DateFormatMismatch { .. }));
    }

    #[test]
    fn test_page_without_card() {
        let err = build("<html><body><h1>Not found</h1></body></html>").unwrap_err();
        assert_eq!(err, SkipReason::missing("info card"));
    }
}
