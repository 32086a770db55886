//! Aggregation over in-memory tables: group-by reductions, ranked tables,
//! threshold percentages, and per-group time series.

pub mod aggregate;
pub mod series;

pub use aggregate::{group_reduce, percent_below, top_n, Aggregate, Reduction};
pub use series::{distinct_values, time_series, SeriesFilter};
