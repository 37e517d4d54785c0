pub mod coerce;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod fields;
pub mod formatters;
pub mod layout;
pub mod parse;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod stats;
pub mod summary;
#[cfg(any(test, feature = "testing"))]
#[doc(hidden)]
pub mod testing;

pub use coerce::{CoercionOutcome, CoercionPolicy, NumericRow, coerce, parse_stat};
pub use dataset::{Dataset, LeveledRow, NormalizedRow};
pub use error::{AscensionError, Result, SkipReason};
pub use fetch::FetchConfig;
pub use fetch::{fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{build_client, fetch_url};
pub use fields::{ELEMENTAL_DMG, EntityFields};
pub use formatters::{
    COLUMNS, DELIMITER, JsonConfig, JsonFormatter, read_csv, to_json, write_csv, write_leveled_csv,
    write_summary_csv,
};
pub use layout::{CompiledLayout, SiteLayout};
pub use parse::{Document, Element};
pub use pipeline::{Pipeline, PipelineConfig, PipelineConfigBuilder, PipelineReport, SkippedEntity};
pub use record::EntityRecord;
#[cfg(feature = "fetch")]
pub use source::HttpSource;
pub use source::{DocumentSource, FileSource, entity_handles};
pub use stats::{FINAL_LEVEL, LEVEL_COUNT, LEVELS, StatSeries, columns_for};
pub use summary::{GroupKey, GroupSummary, Metric, summarize};
