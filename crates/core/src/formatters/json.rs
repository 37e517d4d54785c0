use serde::Serialize;

use crate::Result;
use crate::dataset::{Dataset, LeveledRow};

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Serialize any output value to JSON text
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Dataset as an array of row objects keyed by column name
    pub fn dataset(&self, dataset: &Dataset) -> Result<String> {
        to_json(dataset, self.config.pretty)
    }

    /// Leveled view as an array of row objects (no `Level` key)
    pub fn leveled(&self, rows: &[LeveledRow]) -> Result<String> {
        to_json(rows, self.config.pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::EntityFields;
    use crate::record::EntityRecord;
    use crate::stats::{LEVEL_COUNT, StatSeries};
    use time::{Date, Month};

    fn record() -> EntityRecord {
        let fields = EntityFields {
            name: "Diluc".to_string(),
            rarity: '5',
            weapon: "Claymore".to_string(),
            element: "Pyro".to_string(),
            sex: 'M',
            region: "Mondstadt".to_string(),
            release_date: Date::from_calendar_date(2020, Month::September, 28).unwrap(),
            ascension_stat: "CRIT Rate".to_string(),
        };
        let values = vec!["1".to_string(); LEVEL_COUNT];
        EntityRecord::new(fields, StatSeries::from_vecs(values.clone(), values.clone(), values).unwrap())
    }

    #[test]
    fn test_leveled_has_no_level_key() {
        let formatter = JsonFormatter::new(JsonConfig { pretty: true });
        let leveled = Dataset::from_records(&[record()]).leveled().unwrap();
        let json = formatter.leveled(&leveled).unwrap();

        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value[0].get("Level").is_none());
        assert_eq!(value[0]["Sex"], "M");
    }

    #[test]
    fn test_compact_dataset() {
        let formatter = JsonFormatter::new(JsonConfig::default());
        let json = formatter.dataset(&Dataset::from_records(&[record()])).unwrap();

        assert!(!json.contains('\n'));
        assert!(json.starts_with('['));
    }
}
