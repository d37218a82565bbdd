//! Data module - Benchmark samples and the report datasets

pub mod datasets;
mod series;

pub use series::{SamplePair, SampleSeries, SeriesError};
