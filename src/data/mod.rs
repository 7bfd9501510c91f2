pub mod history;
pub mod tables;

pub use history::{load_history, parse_history_csv, REQUIRED_COLUMNS};
pub use tables::{load_tables, load_tables_or_default};
