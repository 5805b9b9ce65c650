//! Tabular datasets and their persistence.
//!
//! - `table`: column-major [`Dataset`] with numeric and text columns
//! - `codec`: CSV reading and writing
//! - `store`: the [`DatasetStore`] capability with local and in-memory backends

mod codec;
mod store;
mod table;


pub use codec::{from_reader, read_csv, to_writer, write_csv};
pub use store::{DatasetStore, InMemoryDatasetStore, LocalDatasetStore};
pub use table::{format_number, Column, Dataset};
