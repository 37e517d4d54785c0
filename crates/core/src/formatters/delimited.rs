//! Semicolon-separated interchange file.
//!
//! The dataset is persisted with one header row and the fixed column order
//! in [`COLUMNS`]. The display layer reads the same file back through
//! [`read_csv`].

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::dataset::{Dataset, LeveledRow, NormalizedRow};
use crate::fields::EntityFields;
use crate::summary::{GroupKey, GroupSummary, Metric};
use crate::{AscensionError, Result};

/// Field delimiter of the interchange file.
pub const DELIMITER: u8 = b';';

/// Column order of the interchange file.
pub const COLUMNS: [&str; 12] = [
    "Name",
    "Rarity",
    "Weapon",
    "Element",
    "Sex",
    "Region",
    "Release Date",
    "Ascension Stat",
    "Level",
    "HP",
    "ATK",
    "DEF",
];

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

fn iso_date(date: Date) -> Result<String> {
    date.format(ISO_DATE)
        .map_err(|e| AscensionError::InvalidDataset(format!("cannot format date {}: {}", date, e)))
}

fn scalar_cells(fields: &EntityFields) -> Result<Vec<String>> {
    Ok(vec![
        fields.name.clone(),
        fields.rarity.to_string(),
        fields.weapon.clone(),
        fields.element.clone(),
        fields.sex.to_string(),
        fields.region.clone(),
        iso_date(fields.release_date)?,
        fields.ascension_stat.clone(),
    ])
}

/// Writes the dataset with a header row.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(DELIMITER).from_writer(writer);
    wtr.write_record(COLUMNS)?;

    for row in dataset.rows() {
        let mut cells = scalar_cells(&row.fields)?;
        cells.extend([row.level.clone(), row.hp.clone(), row.atk.clone(), row.def.clone()]);
        wtr.write_record(&cells)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the leveled view: every column except `Level`.
pub fn write_leveled_csv<W: Write>(rows: &[LeveledRow], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(DELIMITER).from_writer(writer);
    wtr.write_record(COLUMNS.iter().filter(|c| **c != "Level"))?;

    for row in rows {
        let mut cells = scalar_cells(&row.fields)?;
        cells.extend([row.hp.clone(), row.atk.clone(), row.def.clone()]);
        wtr.write_record(&cells)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes grouped aggregates: one column per key, then the metric column.
///
/// Means are written with two decimals, [`Metric::Quantity`] as a count.
pub fn write_summary_csv<W: Write>(
    groups: &[GroupSummary], group_by: &[GroupKey], metric: Metric, writer: W,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(DELIMITER).from_writer(writer);
    wtr.write_record(group_by.iter().map(|k| k.column()).chain([metric.column()]))?;

    for group in groups {
        let value = match metric {
            Metric::Quantity => group.count.to_string(),
            _ => format!("{:.2}", group.value),
        };
        wtr.write_record(group.keys.iter().map(String::as_str).chain([value.as_str()]))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Reads a dataset written by [`write_csv`].
///
/// # Errors
///
/// Returns [`AscensionError::InvalidDataset`] when the header differs from
/// [`COLUMNS`] or a row cannot be decoded, and [`AscensionError::Csv`] for
/// malformed delimited text.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().delimiter(DELIMITER).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(AscensionError::InvalidDataset(format!(
            "unexpected header '{}'",
            headers.iter().collect::<Vec<_>>().join(";")
        )));
    }

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        rows.push(decode_row(&record).map_err(|msg| {
            AscensionError::InvalidDataset(format!("row {}: {}", line + 2, msg))
        })?);
    }

    Ok(Dataset::from_rows(rows))
}

fn decode_row(record: &StringRecord) -> std::result::Result<NormalizedRow, String> {
    let cell = |i: usize| record.get(i).map(str::to_string).ok_or_else(|| format!("missing column {}", COLUMNS[i]));
    let single = |i: usize| -> std::result::Result<char, String> {
        let text = cell(i)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("{} must be a single character, got '{}'", COLUMNS[i], text)),
        }
    };

    let date_text = cell(6)?;
    let release_date =
        Date::parse(&date_text, ISO_DATE).map_err(|_| format!("invalid release date '{}'", date_text))?;

    Ok(NormalizedRow {
        fields: EntityFields {
            name: cell(0)?,
            rarity: single(1)?,
            weapon: cell(2)?,
            element: cell(3)?,
            sex: single(4)?,
            region: cell(5)?,
            release_date,
            ascension_stat: cell(7)?,
        },
        level: cell(8)?,
        hp: cell(9)?,
        atk: cell(10)?,
        def: cell(11)?,
    })
}
