//! Render Job Module
//! A series paired with its chart spec, loadable from JSON.

use crate::charts::{ChartRenderer, ChartSpec, RenderError, RenderResult};
use crate::data::SampleSeries;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Failed to read job {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse job: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One chart to produce.
///
/// ```json
/// {
///   "name": "embedding_size",
///   "series": { "xs": [25, 50, 100], "ys": [1.378, 1.385, 1.281] },
///   "spec": { "title": "Speedup", "output_path": "speedup.png" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    #[serde(default)]
    pub name: String,
    pub series: SampleSeries,
    #[serde(default)]
    pub spec: ChartSpec,
}

impl RenderJob {
    pub fn new(name: impl Into<String>, series: SampleSeries, spec: ChartSpec) -> Self {
        Self {
            name: name.into(),
            series,
            spec,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, JobError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, JobError> {
        let json = fs::read_to_string(path).map_err(|source| JobError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn run(&self) -> Result<RenderResult, RenderError> {
        log::debug!("Rendering job '{}' -> {}", self.name, self.spec.output_path.display());
        ChartRenderer::render(&self.series, &self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::AnnotationMode;

    #[test]
    fn parses_minimal_job() {
        let job = RenderJob::from_json_str(
            r#"{ "series": { "xs": [1, 2, 3], "ys": [1.0, 1.2, 1.1] } }"#,
        )
        .unwrap();
        assert_eq!(job.name, "");
        assert_eq!(job.series.len(), 3);
        assert_eq!(job.spec, ChartSpec::default());
    }

    #[test]
    fn parses_full_job() {
        let job = RenderJob::from_json_str(
            r#"{
                "name": "prefetch",
                "series": { "xs": [1, 2], "ys": [1.0, 1.3] },
                "spec": { "annotation_mode": "per_point_with_max", "output_path": "out/p.png" }
            }"#,
        )
        .unwrap();
        assert_eq!(job.name, "prefetch");
        assert_eq!(job.spec.annotation_mode, AnnotationMode::PerPointWithMax);
        assert_eq!(job.spec.output_path, PathBuf::from("out/p.png"));
    }

    #[test]
    fn rejects_misaligned_series() {
        let err = RenderJob::from_json_str(r#"{ "series": { "xs": [1, 2], "ys": [1.0] } }"#)
            .unwrap_err();
        assert!(matches!(err, JobError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RenderJob::load(Path::new("/nonexistent/speedup-job.json")).unwrap_err();
        assert!(matches!(err, JobError::Io { .. }));
    }

    #[test]
    fn json_round_trip_keeps_spec() {
        let job = crate::data::datasets::prefetch_distance_job().unwrap();
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(RenderJob::from_json_str(&json).unwrap(), job);
    }
}
