//! Long-form dataset built from entity records.
//!
//! [`Dataset::from_records`] unrolls each record's parallel stat arrays into
//! one [`NormalizedRow`] per level, repeating the scalar fields. Row order is
//! entity arrival order, then level order. Stat values stay raw text here;
//! numeric conversion belongs to [`crate::coerce`].

use std::collections::HashMap;

use serde::Serialize;

use crate::fields::EntityFields;
use crate::record::EntityRecord;
use crate::stats::{FINAL_LEVEL, LEVEL_COUNT, StatSeries, level_index};
use crate::{AscensionError, Result};

/// One (entity, level) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRow {
    #[serde(flatten)]
    pub fields: EntityFields,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "HP")]
    pub hp: String,
    #[serde(rename = "ATK")]
    pub atk: String,
    #[serde(rename = "DEF")]
    pub def: String,
}

/// One entity at its final level, without the level column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeveledRow {
    #[serde(flatten)]
    pub fields: EntityFields,
    #[serde(rename = "HP")]
    pub hp: String,
    #[serde(rename = "ATK")]
    pub atk: String,
    #[serde(rename = "DEF")]
    pub def: String,
}

/// Flat sequence of normalized rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<NormalizedRow>,
}

impl Dataset {
    /// Wraps rows that are already in dataset order.
    pub fn from_rows(rows: Vec<NormalizedRow>) -> Self {
        Self { rows }
    }

    /// Expands records into exactly [`LEVEL_COUNT`] rows each.
    pub fn from_records(records: &[EntityRecord]) -> Self {
        let mut rows = Vec::with_capacity(records.len() * LEVEL_COUNT);

        for record in records {
            for (i, level) in record.levels.iter().enumerate() {
                rows.push(NormalizedRow {
                    fields: record.fields.clone(),
                    level: level.to_string(),
                    hp: record.stats.hp[i].clone(),
                    atk: record.stats.atk[i].clone(),
                    def: record.stats.def[i].clone(),
                });
            }
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct entity names in arrival order.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.fields.name.as_str()) {
                names.push(&row.fields.name);
            }
        }
        names
    }

    /// Final-level rows with the level column dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AscensionError::InvalidDataset`] if an entity contributes
    /// zero or several final-level rows.
    pub fn leveled(&self) -> Result<Vec<LeveledRow>> {
        let leveled: Vec<LeveledRow> = self
            .rows
            .iter()
            .filter(|row| row.level == FINAL_LEVEL)
            .map(|row| LeveledRow {
                fields: row.fields.clone(),
                hp: row.hp.clone(),
                atk: row.atk.clone(),
                def: row.def.clone(),
            })
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &leveled {
            *counts.entry(row.fields.name.as_str()).or_default() += 1;
        }

        for name in self.entity_names() {
            match counts.get(name).copied().unwrap_or(0) {
                1 => {}
                n => {
                    return Err(AscensionError::InvalidDataset(format!(
                        "'{}' has {} rows at level {}",
                        name, n, FINAL_LEVEL
                    )));
                }
            }
        }

        Ok(leveled)
    }

    /// Rebuilds each entity's stat arrays from the flat rows.
    ///
    /// Rows are grouped on name (arrival order) and placed by level index.
    ///
    /// # Errors
    ///
    /// Returns [`AscensionError::InvalidDataset`] for an unknown level label,
    /// a duplicated level, or an entity missing a level.
    pub fn regroup(&self) -> Result<Vec<(String, StatSeries)>> {
        let mut order: Vec<String> = Vec::new();
        let mut slots: HashMap<String, [Option<(String, String, String)>; LEVEL_COUNT]> = HashMap::new();

        for row in &self.rows {
            let index = level_index(&row.level).ok_or_else(|| {
                AscensionError::InvalidDataset(format!("'{}' has unknown level '{}'", row.fields.name, row.level))
            })?;

            let entry = slots.entry(row.fields.name.clone()).or_insert_with(|| {
                order.push(row.fields.name.clone());
                Default::default()
            });
            if entry[index].is_some() {
                return Err(AscensionError::InvalidDataset(format!(
                    "'{}' has level '{}' twice",
                    row.fields.name, row.level
                )));
            }
            entry[index] = Some((row.hp.clone(), row.atk.clone(), row.def.clone()));
        }

        order
            .into_iter()
            .map(|name| {
                let levels = slots.remove(&name).unwrap_or_default();
                let mut hp = Vec::with_capacity(LEVEL_COUNT);
                let mut atk = Vec::with_capacity(LEVEL_COUNT);
                let mut def = Vec::with_capacity(LEVEL_COUNT);

                for (h, a, d) in levels.into_iter().flatten() {
                    hp.push(h);
                    atk.push(a);
                    def.push(d);
                }

                let series = StatSeries::from_vecs(hp, atk, def)
                    .map_err(|skip| AscensionError::InvalidDataset(format!("'{}': {}", name, skip)))?;
                Ok((name, series))
            })
            .collect()
    }
}

impl IntoIterator for Dataset {
    type Item = NormalizedRow;
    type IntoIter = std::vec::IntoIter<NormalizedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
