//! Report Datasets
//! Measured speedups of the embedding-layer prefetcher and the charts they go in.

use crate::charts::{AnnotationMode, ChartSpec, LowerBound, Marker, Rgb, UpperBound};
use crate::data::{SampleSeries, SeriesError};
use crate::job::RenderJob;

/// Embedding dimension `d` of each run.
pub const EMBEDDING_SIZES: [f64; 5] = [25.0, 50.0, 100.0, 200.0, 300.0];
pub const EMBEDDING_SPEEDUPS: [f64; 5] = [1.37828, 1.38488, 1.28126, 1.19913, 1.1111];

/// Elements looked ahead by the prefetcher.
pub const PREFETCH_DISTANCES: [f64; 16] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 20.0,
];
pub const PREFETCH_SPEEDUPS: [f64; 16] = [
    1.00556, 1.11786, 1.21132, 1.27877, 1.32668, 1.32967, 1.35421, 1.33614, 1.31543, 1.36956,
    1.37477, 1.34274, 1.3134, 1.29274, 1.32218, 1.37349,
];

/// Speedup against embedding size, every point labelled.
pub fn embedding_size_job() -> Result<RenderJob, SeriesError> {
    let series = SampleSeries::from_xy(&EMBEDDING_SIZES, &EMBEDDING_SPEEDUPS)?;
    let spec = ChartSpec::new("embedding_size_speedup.png")
        .with_title("Prefetching Speedup vs. Embedding Size")
        .with_labels("Embedding Size (d)", "Speedup Factor")
        .with_series_style(Rgb::GREEN, Marker::Square)
        .with_y_axis(LowerBound::Fixed(1.0), UpperBound::Offset(0.1));

    Ok(RenderJob::new("embedding_size", series, spec))
}

/// Speedup against prefetch distance, only the best distance labelled.
pub fn prefetch_distance_job() -> Result<RenderJob, SeriesError> {
    let series = SampleSeries::from_xy(&PREFETCH_DISTANCES, &PREFETCH_SPEEDUPS)?;
    let spec = ChartSpec::new("prefetch_speedup.png")
        .with_title("Prefetch Distance Speedup")
        .with_labels("Prefetch Ahead Distance", "Speedup Factor")
        .with_series_style(Rgb::BLUE, Marker::Circle)
        .with_annotation_mode(AnnotationMode::HighlightMax)
        .with_y_axis(LowerBound::Fixed(0.9), UpperBound::Scale(1.05));

    Ok(RenderJob::new("prefetch_distance", series, spec))
}

/// Both report figures.
pub fn report_jobs() -> Result<Vec<RenderJob>, SeriesError> {
    Ok(vec![embedding_size_job()?, prefetch_distance_job()?])
}
