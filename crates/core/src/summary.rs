//! Group-by aggregation over the numeric leveled view.
//!
//! Groups are keyed on one or more categorical columns and ordered by key.
//! The value of a group is the mean of the chosen stat, or the number of
//! rows for [`Metric::Quantity`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::coerce::NumericRow;
use crate::fields::EntityFields;

/// Categorical column to group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Rarity,
    Weapon,
    Element,
    Sex,
    Region,
    AscensionStat,
}

impl GroupKey {
    /// Column name as written in the interchange file.
    pub fn column(&self) -> &'static str {
        match self {
            GroupKey::Rarity => "Rarity",
            GroupKey::Weapon => "Weapon",
            GroupKey::Element => "Element",
            GroupKey::Sex => "Sex",
            GroupKey::Region => "Region",
            GroupKey::AscensionStat => "Ascension Stat",
        }
    }

    fn value(&self, fields: &EntityFields) -> String {
        match self {
            GroupKey::Rarity => fields.rarity.to_string(),
            GroupKey::Weapon => fields.weapon.clone(),
            GroupKey::Element => fields.element.clone(),
            GroupKey::Sex => fields.sex.to_string(),
            GroupKey::Region => fields.region.clone(),
            GroupKey::AscensionStat => fields.ascension_stat.clone(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "rarity" => Ok(Self::Rarity),
            "weapon" => Ok(Self::Weapon),
            "element" => Ok(Self::Element),
            "sex" => Ok(Self::Sex),
            "region" => Ok(Self::Region),
            "ascensionstat" | "stat" => Ok(Self::AscensionStat),
            _ => Err(format!(
                "Invalid group key: {}. Valid options: rarity, weapon, element, sex, region, ascension-stat",
                s
            )),
        }
    }
}

/// Value computed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Hp,
    Atk,
    Def,
    /// Number of rows in the group.
    Quantity,
}

impl Metric {
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Hp => "HP",
            Metric::Atk => "ATK",
            Metric::Def => "DEF",
            Metric::Quantity => "Quantity",
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hp" => Ok(Self::Hp),
            "atk" => Ok(Self::Atk),
            "def" => Ok(Self::Def),
            "quantity" | "count" => Ok(Self::Quantity),
            _ => Err(format!("Invalid metric: {}. Valid options: hp, atk, def, quantity", s)),
        }
    }
}

/// One aggregated group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Group key values, in `group_by` order.
    pub keys: Vec<String>,
    /// Mean of the metric, or the row count for [`Metric::Quantity`].
    pub value: f64,
    /// Number of rows in the group.
    pub count: usize,
}

/// Aggregates rows by `group_by`, ordered by key.
pub fn summarize(rows: &[NumericRow], group_by: &[GroupKey], metric: Metric) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<Vec<String>, (f64, usize)> = BTreeMap::new();

    for row in rows {
        let keys = group_by.iter().map(|k| k.value(&row.fields)).collect();
        let stat = match metric {
            Metric::Hp => row.hp,
            Metric::Atk => row.atk,
            Metric::Def => row.def,
            Metric::Quantity => 0.0,
        };

        let entry = groups.entry(keys).or_insert((0.0, 0));
        entry.0 += stat;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(keys, (sum, count))| {
            let value = match metric {
                Metric::Quantity => count as f64,
                _ => sum / count as f64,
            };
            GroupSummary { keys, value, count }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month};

    fn row(name: &str, element: &str, rarity: char, atk: f64) -> NumericRow {
        NumericRow {
            fields: EntityFields {
                name: name.to_string(),
                rarity,
                weapon: "Sword".to_string(),
                element: element.to_string(),
                sex: 'M',
                region: "Liyue".to_string(),
                release_date: Date::from_calendar_date(2021, Month::January, 12).unwrap(),
                ascension_stat: "ATK".to_string(),
            },
            hp: 10000.0,
            atk,
            def: 700.0,
        }
    }

    fn rows() -> Vec<NumericRow> {
        vec![
            row("Xingqiu", "Hydro", '4', 202.0),
            row("Keqing", "Electro", '5', 323.0),
            row("Childe", "Hydro", '5', 301.0),
            row("Razor", "Electro", '4', 234.0),
            row("Barbara", "Hydro", '4', 159.0),
        ]
    }

    #[test]
    fn test_quantity_by_element() {
        let summary = summarize(&rows(), &[GroupKey::Element], Metric::Quantity);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].keys, vec!["Electro".to_string()]);
        assert_eq!(summary[0].value, 2.0);
        assert_eq!(summary[1].keys, vec!["Hydro".to_string()]);
        assert_eq!(summary[1].value, 3.0);
    }

    #[test]
    fn test_mean_by_two_keys() {
        let summary = summarize(&rows(), &[GroupKey::Element, GroupKey::Rarity], Metric::Atk);

        let hydro_four = summary
            .iter()
            .find(|g| g.keys == ["Hydro", "4"])
            .unwrap();
        assert_eq!(hydro_four.count, 2);
        assert!((hydro_four.value - 180.5).abs() < 1e-9);
        assert_eq!(summary.len(), 4);
    }

    #[test]
    fn test_parse_keys_and_metrics() {
        assert_eq!("Ascension Stat".parse::<GroupKey>().unwrap(), GroupKey::AscensionStat);
        assert_eq!("ascension-stat".parse::<GroupKey>().unwrap(), GroupKey::AscensionStat);
        assert_eq!("REGION".parse::<GroupKey>().unwrap(), GroupKey::Region);
        assert!("level".parse::<GroupKey>().is_err());
        assert_eq!("quantity".parse::<Metric>().unwrap(), Metric::Quantity);
        assert!("crit".parse::<Metric>().is_err());
    }

    #[test]
    fn test_empty_rows() {
        assert!(summarize(&[], &[GroupKey::Sex], Metric::Hp).is_empty());
    }
}
