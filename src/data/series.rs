//! Sample Series Module
//! Paired (x, y) benchmark samples with validated alignment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Series is empty")]
    Empty,
    #[error("Length mismatch: {xs} x values vs {ys} y values")]
    LengthMismatch { xs: usize, ys: usize },
    #[error("Non-finite sample at index {index}")]
    NonFinite { index: usize },
    #[error("Sample span overflows: {axis} values range over more than f64 can hold")]
    SpanOverflow { axis: char },
}

/// One benchmark measurement: a tuning parameter and the speedup it produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePair {
    pub x: f64,
    pub y: f64,
}

impl SamplePair {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for SamplePair {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Wire form of a series: two parallel arrays, validated on conversion.
#[derive(Deserialize)]
struct RawSeries {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

/// Ordered, non-empty sequence of samples. Insertion order is plot order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries", into = "RawSeriesOut")]
pub struct SampleSeries {
    pairs: Vec<SamplePair>,
}

#[derive(Serialize)]
struct RawSeriesOut {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl TryFrom<RawSeries> for SampleSeries {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        SampleSeries::from_xy(&raw.xs, &raw.ys)
    }
}

impl From<SampleSeries> for RawSeriesOut {
    fn from(series: SampleSeries) -> Self {
        Self {
            xs: series.xs(),
            ys: series.ys(),
        }
    }
}

impl SampleSeries {
    /// Build a series from already paired samples.
    pub fn new<I, P>(pairs: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = P>,
        P: Into<SamplePair>,
    {
        let pairs: Vec<SamplePair> = pairs.into_iter().map(Into::into).collect();
        if pairs.is_empty() {
            return Err(SeriesError::Empty);
        }
        if let Some(index) = pairs
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(SeriesError::NonFinite { index });
        }
        let series = Self { pairs };
        if !(series.max_x() - series.min_x()).is_finite() {
            return Err(SeriesError::SpanOverflow { axis: 'x' });
        }
        if !(series.max_y() - series.min_y()).is_finite() {
            return Err(SeriesError::SpanOverflow { axis: 'y' });
        }
        Ok(series)
    }

    /// Build a series from two parallel arrays, the i-th x matching the i-th y.
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Result<Self, SeriesError> {
        if xs.len() != ys.len() {
            return Err(SeriesError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        Self::new(xs.iter().copied().zip(ys.iter().copied()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[SamplePair] {
        &self.pairs
    }

    pub fn xs(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.y).collect()
    }

    pub fn min_x(&self) -> f64 {
        self.pairs.iter().map(|p| p.x).fold(f64::INFINITY, f64::min)
    }

    pub fn max_x(&self) -> f64 {
        self.pairs.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_y(&self) -> f64 {
        self.pairs.iter().map(|p| p.y).fold(f64::INFINITY, f64::min)
    }

    pub fn max_y(&self) -> f64 {
        self.pairs.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the largest y value. Ties resolve to the first occurrence.
    pub fn max_index(&self) -> usize {
        let mut best = 0;
        for (i, p) in self.pairs.iter().enumerate().skip(1) {
            if p.y > self.pairs[best].y {
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_mismatched_input() {
        assert_eq!(SampleSeries::from_xy(&[], &[]), Err(SeriesError::Empty));
        assert_eq!(
            SampleSeries::from_xy(&[1.0, 2.0], &[1.1]),
            Err(SeriesError::LengthMismatch { xs: 2, ys: 1 })
        );
        assert_eq!(
            SampleSeries::from_xy(&[1.0, 2.0], &[1.1, f64::NAN]),
            Err(SeriesError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn rejects_spans_that_overflow() {
        assert_eq!(
            SampleSeries::from_xy(&[-1e308, 1e308], &[1.0, 1.1]),
            Err(SeriesError::SpanOverflow { axis: 'x' })
        );
        assert_eq!(
            SampleSeries::from_xy(&[1.0, 2.0], &[f64::MAX, -f64::MAX]),
            Err(SeriesError::SpanOverflow { axis: 'y' })
        );
        assert!(SampleSeries::from_xy(&[-1e308, 7e307], &[1.0, 1.1]).is_ok());
    }

    #[test]
    fn preserves_insertion_order() {
        let series = SampleSeries::from_xy(&[300.0, 25.0, 100.0], &[1.1, 1.3, 1.2]).unwrap();
        assert_eq!(series.xs(), vec![300.0, 25.0, 100.0]);
        assert_eq!(series.ys(), vec![1.1, 1.3, 1.2]);
        assert_eq!(series.min_x(), 25.0);
        assert_eq!(series.max_x(), 300.0);
    }

    #[test]
    fn max_index_prefers_first_tie() {
        let series = SampleSeries::new([(1.0, 1.2), (2.0, 1.5), (3.0, 1.5), (4.0, 1.1)]).unwrap();
        assert_eq!(series.max_index(), 1);
        assert_eq!(series.max_y(), 1.5);
        assert_eq!(series.min_y(), 1.1);
    }

    #[test]
    fn deserialize_validates_alignment() {
        let ok: SampleSeries = serde_json::from_str(r#"{"xs":[1,2],"ys":[1.1,1.2]}"#).unwrap();
        assert_eq!(ok.len(), 2);

        let bad = serde_json::from_str::<SampleSeries>(r#"{"xs":[1,2,3],"ys":[1.1,1.2]}"#);
        assert!(bad.is_err());

        let empty = serde_json::from_str::<SampleSeries>(r#"{"xs":[],"ys":[]}"#);
        assert!(empty.is_err());
    }

    #[test]
    fn serializes_as_parallel_arrays() {
        let series = SampleSeries::from_xy(&[1.0, 2.0], &[1.5, 1.25]).unwrap();
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["xs"], serde_json::json!([1.0, 2.0]));
        assert_eq!(json["ys"], serde_json::json!([1.5, 1.25]));
    }
}
