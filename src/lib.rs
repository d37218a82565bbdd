//! Speedup Plot - annotated speedup line charts
//!
//! Renders precomputed benchmark speedups as line charts with markers, a
//! baseline reference line and value annotations, written as PNG files.

pub mod charts;
pub mod data;
pub mod job;

pub use charts::{render, ChartLayout, ChartRenderer, ChartSpec, RenderError, RenderResult};
pub use data::{SamplePair, SampleSeries, SeriesError};
pub use job::{JobError, RenderJob};
