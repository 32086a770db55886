//! Data acquisition for the report pipeline.
//!
//! A [`Table`] is produced either by reading a header-named delimited file
//! ([`read_table`]) or by synthesizing one from a parameterized random model
//! ([`synthesize`]). Column names are normalized once at this boundary so
//! downstream stages can rely on a stable schema.

pub mod csv_io;
pub mod schema;
pub mod synth;
pub mod table;

pub use csv_io::{read_table, read_table_or_empty, write_table};
pub use schema::{normalize_column_name, normalize_columns};
pub use synth::{synthesize, SynthSpec};
pub use table::{Field, Table};
