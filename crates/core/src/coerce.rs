//! Numeric coercion of raw stat text.
//!
//! Extraction keeps stat values as the text found on the page. Consumers that
//! aggregate call [`coerce`] with an explicit [`CoercionPolicy`] deciding what
//! happens to values that are not numbers.

use serde::Serialize;
use tracing::warn;

use crate::dataset::LeveledRow;
use crate::fields::EntityFields;

/// Parses a raw stat value such as `"1,000"` or `" 912.5 "`.
///
/// Thousands separators and surrounding whitespace are ignored. Anything
/// else that is not a finite number yields `None`.
///
/// ```rust
/// use ascension_core::coerce::parse_stat;
///
/// assert_eq!(parse_stat("12,981"), Some(12981.0));
/// assert_eq!(parse_stat("—"), None);
/// ```
pub fn parse_stat(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// What to do with a row whose stats are not all numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoercionPolicy {
    /// Drop the row and report its name.
    RejectRow,
    /// Substitute the given value for every non-numeric stat.
    Default(f64),
}

/// A leveled row with numeric stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericRow {
    #[serde(flatten)]
    pub fields: EntityFields,
    #[serde(rename = "HP")]
    pub hp: f64,
    #[serde(rename = "ATK")]
    pub atk: f64,
    #[serde(rename = "DEF")]
    pub def: f64,
}

/// Result of [`coerce`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercionOutcome {
    pub rows: Vec<NumericRow>,
    /// Names of rows dropped under [`CoercionPolicy::RejectRow`].
    pub rejected: Vec<String>,
}

/// Converts leveled rows to numeric rows under `policy`.
pub fn coerce(rows: &[LeveledRow], policy: CoercionPolicy) -> CoercionOutcome {
    let mut outcome = CoercionOutcome::default();

    for row in rows {
        let parsed = [parse_stat(&row.hp), parse_stat(&row.atk), parse_stat(&row.def)];

        let values = match (parsed, policy) {
            ([Some(hp), Some(atk), Some(def)], _) => [hp, atk, def],
            (_, CoercionPolicy::Default(fallback)) => parsed.map(|v| v.unwrap_or(fallback)),
            (_, CoercionPolicy::RejectRow) => {
                warn!(name = %row.fields.name, hp = %row.hp, atk = %row.atk, def = %row.def, "non-numeric stats, row rejected");
                outcome.rejected.push(row.fields.name.clone());
                continue;
            }
        };

        let [hp, atk, def] = values;
        outcome.rows.push(NumericRow { fields: row.fields.clone(), hp, atk, def });
    }

    outcome
}
