//! Scalar field extraction from an entity's info card.
//!
//! Each reader returns a typed [`SkipReason`] on failure instead of
//! panicking, so the caller can drop the entity and move on. Region is the
//! only field with alternative paths: [`read_region`] walks the configured
//! selectors in order and the first usable link wins.

use serde::Serialize;
use time::Date;
use time::macros::format_description;
use tracing::debug;

use crate::SkipReason;
use crate::layout::CompiledLayout;
use crate::parse::{Document, Element};

/// Canonical label replacing every "<Element> DMG Bonus" ascension stat.
pub const ELEMENTAL_DMG: &str = "Elemental DMG";

/// The eight scalar attributes of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFields {
    #[serde(rename = "Name")]
    pub name: String,
    /// First character of the rarity image title, e.g. `'5'`.
    #[serde(rename = "Rarity")]
    pub rarity: char,
    #[serde(rename = "Weapon")]
    pub weapon: String,
    #[serde(rename = "Element")]
    pub element: String,
    /// First letter of the body type's second word, e.g. `'F'` for "Tall Female".
    #[serde(rename = "Sex")]
    pub sex: char,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Release Date")]
    pub release_date: Date,
    #[serde(rename = "Ascension Stat")]
    pub ascension_stat: String,
}

/// Locates the info card of an entity page.
pub fn find_card<'a>(doc: &'a Document, layout: &CompiledLayout) -> Result<Element<'a>, SkipReason> {
    doc.first(&layout.card).ok_or_else(|| SkipReason::missing("info card"))
}

/// Reads the entity name from the card heading.
pub fn read_name(card: &Element<'_>, layout: &CompiledLayout) -> Result<String, SkipReason> {
    card.first(&layout.name)
        .map(|el| el.text().trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| SkipReason::missing("name heading"))
}

/// Reads rarity, weapon and element from the first info row.
pub fn read_info_row(card: &Element<'_>, layout: &CompiledLayout) -> Result<(char, String, String), SkipReason> {
    let row = card.first(&layout.info_row).ok_or_else(|| SkipReason::missing("info row"))?;
    let cells = row.select_with(&layout.info_cell);

    let rarity = cells
        .first()
        .and_then(|cell| cell.first(&layout.rarity_image))
        .and_then(|img| img.attr("title"))
        .and_then(|title| title.chars().next())
        .ok_or_else(|| SkipReason::missing("rarity image title"))?;
    let weapon = cell_text(&cells, 1, "weapon cell")?;
    let element = cell_text(&cells, 2, "element cell")?;

    Ok((rarity, weapon, element))
}

fn cell_text(cells: &[Element<'_>], index: usize, what: &str) -> Result<String, SkipReason> {
    cells
        .get(index)
        .map(|cell| cell.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| SkipReason::missing(what))
}

/// Reads the sex code from the body type link ("Tall Female" -> `'F'`).
pub fn read_sex(card: &Element<'_>, layout: &CompiledLayout) -> Result<char, SkipReason> {
    card.first(&layout.sex)
        .and_then(|link| link.attr("title"))
        .and_then(|title| title.split_whitespace().nth(1))
        .and_then(|word| word.chars().next())
        .ok_or_else(|| SkipReason::missing("body type link"))
}

/// First whitespace-delimited token of a link's `title`.
pub fn first_title_token(link: &Element<'_>) -> Option<String> {
    link.attr("title")?.split_whitespace().next().map(str::to_string)
}

/// Reads the region, trying each configured path in order.
///
/// Some pages link the region directly, others nest it inside a list. Both
/// shapes yield the same result: the first token of the link title.
pub fn read_region(card: &Element<'_>, layout: &CompiledLayout) -> Result<String, SkipReason> {
    for (attempt, selector) in layout.region.iter().enumerate() {
        if let Some(region) = card.first(selector).as_ref().and_then(first_title_token) {
            if attempt > 0 {
                debug!(attempt, region = %region, "region resolved through fallback path");
            }
            return Ok(region);
        }
    }

    Err(SkipReason::missing("region link"))
}

/// Parses the release date markup, e.g. `"September 28, 2020<br><small>1.0</small>"`.
///
/// Only the text before `terminator` is considered. Markup without the
/// terminator is rejected rather than guessed at.
pub fn parse_release_date(raw: &str, terminator: &str) -> Result<Date, SkipReason> {
    let mismatch = || SkipReason::DateFormatMismatch { text: raw.trim().to_string() };

    let (date, _) = raw.split_once(terminator).ok_or_else(mismatch)?;
    let format = format_description!("[month repr:long] [day padding:none], [year]");

    Date::parse(date.trim(), format).map_err(|_| mismatch())
}

/// Reads and parses the release date.
pub fn read_release_date(card: &Element<'_>, layout: &CompiledLayout) -> Result<Date, SkipReason> {
    let raw = card
        .first(&layout.release_date)
        .map(|el| el.inner_html())
        .ok_or_else(|| SkipReason::missing("release date"))?;

    parse_release_date(&raw, &layout.date_terminator)
}

/// Collapses elemental damage bonuses into one category.
///
/// ```rust
/// use ascension_core::fields::{normalize_ascension_stat, ELEMENTAL_DMG};
///
/// assert_eq!(normalize_ascension_stat("Pyro DMG Bonus", ELEMENTAL_DMG), "Elemental DMG");
/// assert_eq!(normalize_ascension_stat("CRIT Rate", ELEMENTAL_DMG), "CRIT Rate");
/// ```
pub fn normalize_ascension_stat(name: &str, elemental_label: &str) -> String {
    if name.ends_with("Bonus") { elemental_label.to_string() } else { name.to_string() }
}

/// Reads the ascension stat name from the stat table header.
pub fn read_ascension_stat(
    table: &Element<'_>, layout: &CompiledLayout, elemental_label: &str,
) -> Result<String, SkipReason> {
    let name = table
        .first(&layout.ascension_stat)
        .map(|el| el.text().trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| SkipReason::missing("ascension stat header"))?;

    Ok(normalize_ascension_stat(&name, elemental_label))
}

/// Extracts every scalar field of an entity whose name was already read.
pub fn extract_fields(
    name: String, card: &Element<'_>, table: &Element<'_>, layout: &CompiledLayout, elemental_label: &str,
) -> Result<EntityFields, SkipReason> {
    let (rarity, weapon, element) = read_info_row(card, layout)?;

    Ok(EntityFields {
        name,
        rarity,
        weapon,
        element,
        sex: read_sex(card, layout)?,
        region: read_region(card, layout)?,
        release_date: read_release_date(card, layout)?,
        ascension_stat: read_ascension_stat(table, layout, elemental_label)?,
    })
}
