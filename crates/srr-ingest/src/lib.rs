pub mod raw_table;
pub mod writer;

pub use raw_table::RawTable;
pub use writer::{render_csv, write_csv};
