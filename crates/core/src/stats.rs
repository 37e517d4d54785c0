//! Ascension stat table reader.
//!
//! The wiki renders one row per level, with a decorative "ascension" row
//! between tiers. The level label cell is merged across each pair of rows, so
//! odd rows carry one cell fewer and every stat column shifts left by one.
//! [`columns_for`] captures that layout quirk on its own.

use scraper::Selector;
use serde::Serialize;

use crate::SkipReason;
use crate::layout::CompiledLayout;
use crate::parse::{Document, Element};

/// Number of canonical ascension levels.
pub const LEVEL_COUNT: usize = 14;

/// Canonical level labels, in progression order.
pub const LEVELS: [&str; LEVEL_COUNT] = [
    "01/20", "20/20", "20/40", "40/40", "40/50", "50/50", "50/60", "60/60", "60/70", "70/70", "70/80", "80/80",
    "80/90", "90/90",
];

/// Label of the fully ascended level.
pub const FINAL_LEVEL: &str = LEVELS[LEVEL_COUNT - 1];

/// Position of a label in [`LEVELS`].
pub fn level_index(label: &str) -> Option<usize> {
    LEVELS.iter().position(|l| *l == label)
}

/// Cell positions of HP, ATK and DEF for the genuine row at `level_index`.
///
/// Even rows start with the merged level cell, odd rows do not.
///
/// ```rust
/// use ascension_core::stats::columns_for;
///
/// assert_eq!(columns_for(0), (2, 3, 4));
/// assert_eq!(columns_for(1), (1, 2, 3));
/// ```
pub fn columns_for(level_index: usize) -> (usize, usize, usize) {
    let correction = level_index % 2;
    (2 - correction, 3 - correction, 4 - correction)
}

/// Raw HP/ATK/DEF values, one per canonical level.
///
/// Values are kept as the text found in the table; see [`crate::coerce`] for
/// the numeric conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatSeries {
    #[serde(rename = "HP")]
    pub hp: [String; LEVEL_COUNT],
    #[serde(rename = "ATK")]
    pub atk: [String; LEVEL_COUNT],
    #[serde(rename = "DEF")]
    pub def: [String; LEVEL_COUNT],
}

impl StatSeries {
    /// Assembles a series from per-level vectors.
    ///
    /// Returns [`SkipReason::IncompleteStats`] unless all three hold exactly
    /// [`LEVEL_COUNT`] values.
    pub fn from_vecs(hp: Vec<String>, atk: Vec<String>, def: Vec<String>) -> Result<Self, SkipReason> {
        let found = hp.len().min(atk.len()).min(def.len());
        let incomplete = || SkipReason::IncompleteStats { found, expected: LEVEL_COUNT };

        Ok(Self {
            hp: hp.try_into().map_err(|_| incomplete())?,
            atk: atk.try_into().map_err(|_| incomplete())?,
            def: def.try_into().map_err(|_| incomplete())?,
        })
    }

    /// Values at the given level index as `(hp, atk, def)`.
    pub fn at(&self, index: usize) -> Option<(&str, &str, &str)> {
        Some((self.hp.get(index)?, self.atk.get(index)?, self.def.get(index)?))
    }
}

/// Whether a row is a decorative tier separator.
pub fn is_decorative(row: &Element<'_>, decorative_class: &str) -> bool {
    row.first_class() == Some(decorative_class)
}

/// Returns the genuine level rows of a stat table, header and decorative rows
/// removed, capped at [`LEVEL_COUNT`].
pub fn level_rows<'a>(table: &Element<'a>, layout: &CompiledLayout) -> Vec<Element<'a>> {
    table
        .select_with(&layout.stat_row)
        .into_iter()
        .skip(1)
        .filter(|row| !is_decorative(row, &layout.decorative_row_class))
        .take(LEVEL_COUNT)
        .collect()
}

/// Reads the HP/ATK/DEF series from a stat table body.
///
/// # Errors
///
/// - [`SkipReason::IncompleteStats`] when fewer than [`LEVEL_COUNT`] genuine
///   rows exist (the entity is not released yet).
/// - [`SkipReason::StructuralMissing`] when a row lacks the cell its parity
///   calls for.
pub fn read_stat_table(table: &Element<'_>, layout: &CompiledLayout) -> Result<StatSeries, SkipReason> {
    let rows = level_rows(table, layout);
    if rows.len() < LEVEL_COUNT {
        return Err(SkipReason::IncompleteStats { found: rows.len(), expected: LEVEL_COUNT });
    }

    let mut hp = Vec::with_capacity(LEVEL_COUNT);
    let mut atk = Vec::with_capacity(LEVEL_COUNT);
    let mut def = Vec::with_capacity(LEVEL_COUNT);

    for (index, row) in rows.iter().enumerate() {
        let cells = row.select_with(&layout.stat_cell);
        let (hp_col, atk_col, def_col) = columns_for(index);

        hp.push(cell_text(&cells, hp_col, index, "HP")?);
        atk.push(cell_text(&cells, atk_col, index, "ATK")?);
        def.push(cell_text(&cells, def_col, index, "DEF")?);
    }

    StatSeries::from_vecs(hp, atk, def)
}

fn cell_text(cells: &[Element<'_>], col: usize, index: usize, stat: &str) -> Result<String, SkipReason> {
    cells
        .get(col)
        .map(|cell| cell.text().trim().to_string())
        .ok_or_else(|| SkipReason::missing(format!("{} cell {} of level {}", stat, col, LEVELS[index])))
}

/// Locates the stat table body in a document.
pub fn find_stat_table<'a>(doc: &'a Document, selector: &Selector) -> Result<Element<'a>, SkipReason> {
    doc.first(selector).ok_or_else(|| SkipReason::missing("ascension stat table"))
}
