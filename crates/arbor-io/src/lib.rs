//! CSV loading and JSON prediction output for the arbor CLI.

mod error;
mod reader;
mod table;
mod writer;

pub use error::IoError;
pub use reader::{LabelColumn, TableReader};
pub use table::Table;
pub use writer::write_predictions;
