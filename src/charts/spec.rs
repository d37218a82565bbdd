//! Chart Specification Module
//! Display metadata for a speedup chart: labels, styles, axis policy and output.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// RGB colour, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLUE: Rgb = Rgb(31, 119, 180);
    pub const GREEN: Rgb = Rgb(44, 160, 44);
    pub const RED: Rgb = Rgb(214, 39, 40);
    pub const GREY: Rgb = Rgb(176, 176, 176);
}

/// Point marker drawn at every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    #[default]
    Circle,
    Square,
}

/// How samples are labelled on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationMode {
    /// Every point gets its formatted value.
    #[default]
    PerPoint,
    /// Only the maximum sample is labelled, with the highlight prefix.
    HighlightMax,
    /// Per-point values plus the maximum highlight.
    PerPointWithMax,
}

impl AnnotationMode {
    pub fn per_point(self) -> bool {
        matches!(self, AnnotationMode::PerPoint | AnnotationMode::PerPointWithMax)
    }

    pub fn highlight_max(self) -> bool {
        matches!(
            self,
            AnnotationMode::HighlightMax | AnnotationMode::PerPointWithMax
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationFormat {
    /// Decimal places of the printed value.
    pub precision: usize,
    pub suffix: String,
    /// Prefix of the maximum-value highlight.
    pub highlight_label: String,
}

impl Default for AnnotationFormat {
    fn default() -> Self {
        Self {
            precision: 2,
            suffix: "x".to_string(),
            highlight_label: "Max Speedup: ".to_string(),
        }
    }
}

impl AnnotationFormat {
    /// Format a value, e.g. `1.37828` -> `"1.38x"`.
    pub fn value(&self, y: f64) -> String {
        format!("{:.*}{}", self.precision, y, self.suffix)
    }

    /// Format the highlight text, e.g. `"Max Speedup: 1.37x"`.
    pub fn highlight(&self, y: f64) -> String {
        format!("{}{}", self.highlight_label, self.value(y))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub marker: Marker,
    pub line_width_pt: f64,
    /// Marker diameter.
    pub marker_size_pt: f64,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: Rgb::BLUE,
            marker: Marker::Circle,
            line_width_pt: 2.0,
            marker_size_pt: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Rgb,
    pub alpha: f64,
    pub width_pt: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Rgb::RED,
            alpha: 0.5,
            width_pt: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub visible: bool,
    pub color: Rgb,
    pub alpha: f64,
    pub dashed: bool,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Rgb::GREY,
            alpha: 0.7,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowerBound {
    /// A little below `min(baseline, min_y)`.
    #[default]
    Auto,
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBound {
    /// A little above `max(baseline, max_y)`.
    #[default]
    Auto,
    /// `max_y + offset`
    Offset(f64),
    /// `max_y * factor`
    Scale(f64),
}

/// Y-axis bound policy. Whatever the policy, the resolved range always
/// contains the baseline and every sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YAxisPolicy {
    pub lower: LowerBound,
    pub upper: UpperBound,
}

/// Physical figure size and typography, in inches and points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    /// Padding kept around the content when cropping.
    pub pad_in: f64,
    pub title_pt: f64,
    pub label_pt: f64,
    pub tick_pt: f64,
    pub annotation_pt: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 6.0,
            dpi: 300.0,
            pad_in: 0.1,
            title_pt: 14.0,
            label_pt: 12.0,
            tick_pt: 10.0,
            annotation_pt: 10.0,
        }
    }
}

/// Largest uncropped raster a render will allocate.
pub const MAX_PIXELS: u64 = 100_000_000;

impl Canvas {
    /// Uncropped raster size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(0.0) as u32,
            (self.height_in * self.dpi).round().max(0.0) as u32,
        )
    }

    /// Convert points (1/72 in) to pixels at this canvas' dpi.
    pub fn px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }
}

/// Everything about a chart except its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub baseline: f64,
    pub annotation: AnnotationFormat,
    pub annotation_mode: AnnotationMode,
    pub series_style: SeriesStyle,
    pub baseline_style: LineStyle,
    pub grid: GridStyle,
    pub y_axis: YAxisPolicy,
    pub canvas: Canvas,
    pub output_path: PathBuf,
    /// Open the written image in the system viewer.
    pub show: bool,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            baseline: 1.0,
            annotation: AnnotationFormat::default(),
            annotation_mode: AnnotationMode::default(),
            series_style: SeriesStyle::default(),
            baseline_style: LineStyle::default(),
            grid: GridStyle::default(),
            y_axis: YAxisPolicy::default(),
            canvas: Canvas::default(),
            output_path: PathBuf::from("chart.png"),
            show: false,
        }
    }
}

impl ChartSpec {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    pub fn with_annotation_mode(mut self, mode: AnnotationMode) -> Self {
        self.annotation_mode = mode;
        self
    }

    pub fn with_y_axis(mut self, lower: LowerBound, upper: UpperBound) -> Self {
        self.y_axis = YAxisPolicy { lower, upper };
        self
    }

    pub fn with_series_style(mut self, color: Rgb, marker: Marker) -> Self {
        self.series_style.color = color;
        self.series_style.marker = marker;
        self
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.canvas.dpi = dpi;
        self
    }

    /// Check the fields a render cannot proceed without.
    pub fn validate(&self) -> Result<(), String> {
        if !self.baseline.is_finite() {
            return Err(format!("baseline must be finite, got {}", self.baseline));
        }
        if !(self.canvas.dpi.is_finite() && self.canvas.dpi > 0.0) {
            return Err(format!("dpi must be positive, got {}", self.canvas.dpi));
        }
        let width = (self.canvas.width_in * self.canvas.dpi).round();
        let height = (self.canvas.height_in * self.canvas.dpi).round();
        if !(width.is_finite() && height.is_finite()) {
            return Err(format!(
                "canvas size must be finite, got {}x{} in",
                self.canvas.width_in, self.canvas.height_in
            ));
        }
        if width > f64::from(u32::MAX) || height > f64::from(u32::MAX) {
            return Err(format!("canvas is too large ({}x{} px)", width, height));
        }
        let (w, h) = self.canvas.pixel_size();
        if w == 0 || h == 0 {
            return Err(format!("canvas is empty ({}x{} px)", w, h));
        }
        if u64::from(w) * u64::from(h) > MAX_PIXELS {
            return Err(format!(
                "canvas is too large ({}x{} px, limit {} px)",
                w, h, MAX_PIXELS
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_formatting() {
        let fmt = AnnotationFormat::default();
        assert_eq!(fmt.value(1.37828), "1.38x");
        assert_eq!(fmt.value(1.19913), "1.20x");
        assert_eq!(fmt.highlight(1.37477), "Max Speedup: 1.37x");

        let custom = AnnotationFormat {
            precision: 3,
            suffix: " times".to_string(),
            highlight_label: "Max: ".to_string(),
        };
        assert_eq!(custom.value(1.1111), "1.111 times");
        assert_eq!(custom.highlight(2.0), "Max: 2.000 times");
    }

    #[test]
    fn defaults_follow_report_style() {
        let spec = ChartSpec::default();
        assert_eq!(spec.baseline, 1.0);
        assert_eq!(spec.annotation_mode, AnnotationMode::PerPoint);
        assert_eq!(spec.canvas.pixel_size(), (3000, 1800));
        assert!(spec.grid.dashed);
        assert_eq!(spec.grid.alpha, 0.7);
        assert!(spec.title.is_none());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let spec: ChartSpec = serde_json::from_str(
            r#"{
                "title": "Prefetch Distance Speedup",
                "annotation_mode": "highlight_max",
                "y_axis": { "lower": { "fixed": 0.9 }, "upper": { "scale": 1.05 } },
                "series_style": { "color": [0, 0, 255], "marker": "square" }
            }"#,
        )
        .unwrap();
        assert_eq!(spec.title.as_deref(), Some("Prefetch Distance Speedup"));
        assert_eq!(spec.annotation_mode, AnnotationMode::HighlightMax);
        assert_eq!(spec.y_axis.lower, LowerBound::Fixed(0.9));
        assert_eq!(spec.y_axis.upper, UpperBound::Scale(1.05));
        assert_eq!(spec.series_style.color, Rgb(0, 0, 255));
        assert_eq!(spec.series_style.marker, Marker::Square);
        assert_eq!(spec.series_style.line_width_pt, 2.0);
        assert_eq!(spec.annotation.precision, 2);
        assert_eq!(spec.output_path, PathBuf::from("chart.png"));
    }

    #[test]
    fn validate_rejects_unusable_specs() {
        assert!(ChartSpec::default().validate().is_ok());

        let mut spec = ChartSpec::default();
        spec.baseline = f64::NAN;
        assert!(spec.validate().is_err());

        let spec = ChartSpec::default().with_dpi(0.0);
        assert!(spec.validate().is_err());

        let mut spec = ChartSpec::default();
        spec.canvas.width_in = 0.0;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn validate_caps_canvas_size() {
        assert!(ChartSpec::default().with_dpi(1.0e7).validate().is_err());
        assert!(ChartSpec::default().with_dpi(1.0e12).validate().is_err());

        let mut spec = ChartSpec::default();
        spec.canvas.height_in = f64::INFINITY;
        assert!(spec.validate().is_err());

        // 10x6 in at 1290 dpi is just under the limit.
        assert!(ChartSpec::default().with_dpi(1290.0).validate().is_ok());
        assert!(ChartSpec::default().with_dpi(1300.0).validate().is_err());
    }

    #[test]
    fn annotation_mode_flags() {
        assert!(AnnotationMode::PerPoint.per_point());
        assert!(!AnnotationMode::PerPoint.highlight_max());
        assert!(!AnnotationMode::HighlightMax.per_point());
        assert!(AnnotationMode::PerPointWithMax.per_point());
        assert!(AnnotationMode::PerPointWithMax.highlight_max());
    }
}
