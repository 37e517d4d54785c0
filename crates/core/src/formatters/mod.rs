pub mod delimited;
pub mod json;

pub use delimited::{COLUMNS, DELIMITER, read_csv, write_csv, write_leveled_csv, write_summary_csv};
pub use json::{JsonConfig, JsonFormatter, to_json};
