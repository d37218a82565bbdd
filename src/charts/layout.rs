//! Chart Layout Module
//! Resolves axis bounds, ticks and annotations before anything is drawn.
//!
//! The layout is pure data: the renderer only paints what is listed here, so
//! every visible decision (tick positions, label text, y range) can be checked
//! without decoding pixels.

use crate::charts::spec::{ChartSpec, LowerBound, UpperBound, YAxisPolicy};
use crate::data::SampleSeries;
use serde::Serialize;

/// Target number of y grid intervals.
const Y_GRID_STEPS: usize = 8;

/// Fraction of the data span kept below the lowest value by `LowerBound::Auto`.
const AUTO_LOWER_MARGIN: f64 = 0.05;
/// Fraction of the data span kept above the highest value by `UpperBound::Auto`.
const AUTO_UPPER_MARGIN: f64 = 0.10;

/// Offsets of value labels above their point, in points.
const VALUE_OFFSET_PT: (f64, f64) = (0.0, 5.0);
const HIGHLIGHT_OFFSET_PT: (f64, f64) = (5.0, 10.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnnotationKind {
    Value,
    Highlight,
}

/// Horizontal text anchor. Annotations are always bottom-anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Center,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Index of the annotated sample in the series.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub kind: AnnotationKind,
    /// (right, up) in points from the sample.
    pub offset_pt: (f64, f64),
    pub anchor: Anchor,
}

/// Everything the renderer needs to draw, in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub points: Vec<(f64, f64)>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub baseline: f64,
    pub annotations: Vec<Annotation>,
}

impl ChartLayout {
    pub fn compute(series: &SampleSeries, spec: &ChartSpec) -> Self {
        let points: Vec<(f64, f64)> = series.pairs().iter().map(|p| (p.x, p.y)).collect();
        let x_range = x_range(series);
        let y_range = y_bounds(series, spec.baseline, &spec.y_axis);

        let x_ticks = series
            .pairs()
            .iter()
            .map(|p| Tick {
                value: p.x,
                label: format_tick(p.x),
            })
            .collect();
        let y_ticks = y_grid_ticks(y_range.0, y_range.1);
        let annotations = annotations(series, spec);

        log::debug!(
            "layout: {} points, x {:?}, y {:?}, {} annotations",
            points.len(),
            x_range,
            y_range,
            annotations.len()
        );

        Self {
            points,
            x_range,
            y_range,
            x_ticks,
            y_ticks,
            baseline: spec.baseline,
            annotations,
        }
    }

    /// The maximum-value highlight, if the annotation mode produced one.
    pub fn highlight(&self) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| a.kind == AnnotationKind::Highlight)
    }
}

fn annotations(series: &SampleSeries, spec: &ChartSpec) -> Vec<Annotation> {
    let mode = spec.annotation_mode;
    let fmt = &spec.annotation;
    let mut out = Vec::new();

    if mode.per_point() {
        for (index, p) in series.pairs().iter().enumerate() {
            out.push(Annotation {
                index,
                x: p.x,
                y: p.y,
                text: fmt.value(p.y),
                kind: AnnotationKind::Value,
                offset_pt: VALUE_OFFSET_PT,
                anchor: Anchor::Center,
            });
        }
    }

    if mode.highlight_max() {
        let index = series.max_index();
        let p = series.pairs()[index];
        out.push(Annotation {
            index,
            x: p.x,
            y: p.y,
            text: fmt.highlight(p.y),
            kind: AnnotationKind::Highlight,
            offset_pt: HIGHLIGHT_OFFSET_PT,
            anchor: Anchor::Left,
        });
    }

    out
}

/// Data x range with a 5% margin on each side.
pub fn x_range(series: &SampleSeries) -> (f64, f64) {
    let (lo, hi) = (series.min_x(), series.max_x());
    let span = hi - lo;
    let margin = if span > 0.0 {
        // Scale before subtracting so spans near f64::MAX stay finite.
        hi * 0.05 - lo * 0.05
    } else {
        (lo.abs() * 0.05).max(0.5)
    };
    (lo - margin, hi + margin)
}

/// Resolve the y range from the policy, then widen it so it always covers the
/// baseline and every sample.
pub fn y_bounds(series: &SampleSeries, baseline: f64, policy: &YAxisPolicy) -> (f64, f64) {
    let min_y = series.min_y();
    let max_y = series.max_y();
    let floor = min_y.min(baseline);
    let ceil = max_y.max(baseline);
    let span = ceil - floor;

    let lower = match policy.lower {
        LowerBound::Auto => floor - span * AUTO_LOWER_MARGIN,
        LowerBound::Fixed(v) => v,
    };
    let upper = match policy.upper {
        UpperBound::Auto => ceil + span * AUTO_UPPER_MARGIN,
        UpperBound::Offset(d) => max_y + d,
        UpperBound::Scale(f) => max_y * f,
    };

    let lower = if lower.is_finite() { lower.min(floor) } else { floor };
    let upper = if upper.is_finite() { upper.max(ceil) } else { ceil };

    if upper - lower <= f64::EPSILON * ceil.abs().max(1.0) {
        let pad = if ceil == 0.0 { 0.1 } else { ceil.abs() * 0.1 };
        (lower - pad, upper + pad)
    } else {
        (lower, upper)
    }
}

/// Round a raw step up to 1, 2 or 5 times a power of ten.
pub fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

/// Grid ticks on nice steps within `[lo, hi]`.
pub fn y_grid_ticks(lo: f64, hi: f64) -> Vec<Tick> {
    let range = hi - lo;
    if !(range > 0.0) {
        return Vec::new();
    }
    let step = nice_step(range, Y_GRID_STEPS);
    let decimals = (-step.log10() - 1e-9).ceil().max(0.0) as usize;
    let scale = 10f64.powi(decimals as i32);
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;

    (first..=last)
        .map(|k| {
            let value = (k as f64 * step * scale).round() / scale;
            Tick {
                value,
                label: format!("{:.*}", decimals, value),
            }
        })
        .filter(|t| t.value >= lo && t.value <= hi)
        .collect()
}

/// Tick label for a provided x value: integers without decimals, otherwise the
/// fewest decimals (up to 6) that reproduce the value.
pub fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        let s = format!("{:.0}", v);
        return if s == "-0" { "0".to_string() } else { s };
    }
    for decimals in 1..=6 {
        let scale = 10f64.powi(decimals as i32);
        if ((v * scale).round() / scale - v).abs() < 1e-9 {
            return format!("{:.*}", decimals, v);
        }
    }
    format!("{:.6}", v)
}
