//! Static Chart Renderer
//! Draws an annotated speedup line chart and writes it as a PNG.
//!
//! Layout:
//! 1. Title centered above the plot area
//! 2. Dashed grid at every x sample and every y grid tick
//! 3. Dashed baseline reference line
//! 4. Line with markers through the samples, in the given order
//! 5. Value annotations (per point and/or the maximum highlight)
//! 6. Tick labels and axis titles
//!
//! The raster is sized from the canvas in inches and dpi, then cropped to its
//! content ("tight" bounding box) before encoding.

use crate::charts::figure::Figure;
use crate::charts::layout::{Anchor, ChartLayout};
use crate::charts::spec::{Canvas, ChartSpec, Marker, Rgb};
use crate::data::{SampleSeries, SeriesError};
use image::{ImageError, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT_FAMILY: &str = "sans-serif";

/// Length of tick marks and the gap to their labels, in points.
const TICK_LEN_PT: f64 = 3.5;
const TICK_PAD_PT: f64 = 3.5;
/// Dash pattern of grid and baseline, in points.
const DASH_PT: f64 = 3.7;
const GAP_PT: f64 = 1.6;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),
    #[error("Invalid chart spec: {0}")]
    InvalidSpec(String),
    #[error("Cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[source] ImageError),
}

fn drawing<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Outcome of a successful render.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Where the image was written, canonicalized when possible.
    pub output_path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
    /// The ticks, bounds and annotations that were drawn.
    pub layout: ChartLayout,
}

/// Validate raw parallel arrays and render them. Nothing is written when the
/// arrays are empty or of different lengths.
pub fn render(xs: &[f64], ys: &[f64], spec: &ChartSpec) -> Result<RenderResult, RenderError> {
    let series = SampleSeries::from_xy(xs, ys)?;
    ChartRenderer::render(&series, spec)
}

/// Renders speedup charts. Stateless: every call owns its own `Figure`.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Render `series` with `spec` and write the PNG to `spec.output_path`.
    pub fn render(series: &SampleSeries, spec: &ChartSpec) -> Result<RenderResult, RenderError> {
        let (image, layout) = Self::rasterize(series, spec)?;
        Self::write_png(&image, &spec.output_path)?;

        let output_path =
            fs::canonicalize(&spec.output_path).unwrap_or_else(|_| spec.output_path.clone());
        log::info!(
            "Chart written: {} ({}x{} px)",
            output_path.display(),
            image.width(),
            image.height()
        );

        if spec.show {
            if let Err(e) = open::that(&output_path) {
                log::warn!("Could not open {} in a viewer: {}", output_path.display(), e);
            }
        }

        Ok(RenderResult {
            output_path,
            width_px: image.width(),
            height_px: image.height(),
            layout,
        })
    }

    /// Draw the chart into memory and crop it, without touching the disk.
    pub fn rasterize(
        series: &SampleSeries,
        spec: &ChartSpec,
    ) -> Result<(RgbImage, ChartLayout), RenderError> {
        spec.validate().map_err(RenderError::InvalidSpec)?;

        let layout = ChartLayout::compute(series, spec);
        let (x_lo, x_hi) = layout.x_range;
        let (y_lo, y_hi) = layout.y_range;
        if !((x_hi - x_lo).is_finite() && (y_hi - y_lo).is_finite()) {
            return Err(RenderError::InvalidSpec(format!(
                "axis range overflows: x {:?}, y {:?}",
                layout.x_range, layout.y_range
            )));
        }
        let mut figure = Figure::new(&spec.canvas, Rgb::WHITE);
        let size = figure.size();
        Self::paint(figure.pixels_mut(), size, &layout, spec, Self::fonts_available())?;

        let pad = spec.canvas.px(spec.canvas.pad_in * 72.0).round().max(0.0) as u32;
        let image = figure
            .into_cropped_image(pad)
            .ok_or_else(|| RenderError::Drawing("pixel buffer size mismatch".to_string()))?;
        Ok((image, layout))
    }

    /// Text needs a system font; without one the chart is drawn without text.
    fn fonts_available() -> bool {
        match (FONT_FAMILY, 12.0).into_font().box_size("0") {
            Ok(_) => true,
            Err(e) => {
                log::warn!("No usable {} font, chart text omitted: {:?}", FONT_FAMILY, e);
                false
            }
        }
    }

    fn paint(
        pixels: &mut [u8],
        size: (u32, u32),
        layout: &ChartLayout,
        spec: &ChartSpec,
        with_text: bool,
    ) -> Result<(), RenderError> {
        let canvas = &spec.canvas;
        let px = |pt: f64| canvas.px(pt);
        let tick_len = px(TICK_LEN_PT).round() as i32;
        let tick_pad = px(TICK_PAD_PT).round() as i32;

        let root = BitMapBackend::with_buffer(pixels, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        // Label areas are sized from the fonts that go into them.
        let top = if spec.title.is_some() {
            px(canvas.title_pt * 2.4)
        } else {
            px(canvas.annotation_pt * 2.0)
        };
        let mut left = px(TICK_LEN_PT + TICK_PAD_PT + canvas.tick_pt * 3.2);
        if spec.y_label.is_some() {
            left += px(canvas.label_pt * 1.8);
        }
        let mut bottom = px(TICK_LEN_PT + TICK_PAD_PT + canvas.tick_pt * 1.6);
        if spec.x_label.is_some() {
            bottom += px(canvas.label_pt * 1.8);
        }

        let mut chart = ChartBuilder::on(&root)
            .margin_top(top.round() as u32)
            .margin_right(px(canvas.annotation_pt * 4.0).round() as u32)
            .y_label_area_size(left.round() as u32)
            .x_label_area_size(bottom.round() as u32)
            .build_cartesian_2d(
                layout.x_range.0..layout.x_range.1,
                layout.y_range.0..layout.y_range.1,
            )
            .map_err(drawing)?;

        let (x_px, y_px) = chart.plotting_area().get_pixel_range();
        let (plot_left, plot_right) = (x_px.start, x_px.end - 1);
        let (plot_top, plot_bottom) = (y_px.start, y_px.end - 1);
        let to_px = |x: f64, y: f64| chart.plotting_area().map_coordinate(&(x, y));

        let x_ticks: Vec<(i32, &str)> = layout
            .x_ticks
            .iter()
            .map(|t| (to_px(t.value, layout.y_range.0).0, t.label.as_str()))
            .collect();
        let y_ticks: Vec<(i32, &str)> = layout
            .y_ticks
            .iter()
            .map(|t| (to_px(layout.x_range.0, t.value).1, t.label.as_str()))
            .collect();
        let baseline_y = to_px(layout.x_range.0, layout.baseline).1;
        let annotations: Vec<((i32, i32), &str, Anchor, (f64, f64))> = layout
            .annotations
            .iter()
            .map(|a| (to_px(a.x, a.y), a.text.as_str(), a.anchor, a.offset_pt))
            .collect();

        // Grid
        if spec.grid.visible {
            let style = color(spec.grid.color)
                .mix(spec.grid.alpha)
                .stroke_width(px(0.8).round().max(1.0) as u32);
            for &(x, _) in &x_ticks {
                Self::line(&root, (x, plot_top), (x, plot_bottom), style, spec.grid.dashed, canvas)?;
            }
            for &(y, _) in &y_ticks {
                Self::line(&root, (plot_left, y), (plot_right, y), style, spec.grid.dashed, canvas)?;
            }
        }

        // Baseline
        let baseline = &spec.baseline_style;
        let baseline_style = color(baseline.color)
            .mix(baseline.alpha)
            .stroke_width(px(baseline.width_pt).round().max(1.0) as u32);
        Self::line(
            &root,
            (plot_left, baseline_y),
            (plot_right, baseline_y),
            baseline_style,
            true,
            canvas,
        )?;

        // Series
        let series = &spec.series_style;
        let series_color = color(series.color);
        chart
            .draw_series(LineSeries::new(
                layout.points.iter().copied(),
                series_color.stroke_width(px(series.line_width_pt).round().max(1.0) as u32),
            ))
            .map_err(drawing)?;

        let radius = (px(series.marker_size_pt) / 2.0).round().max(1.0);
        match series.marker {
            Marker::Circle => {
                chart
                    .draw_series(
                        layout
                            .points
                            .iter()
                            .map(|&p| Circle::new(p, radius as u32, series_color.filled())),
                    )
                    .map_err(drawing)?;
            }
            Marker::Square => {
                let r = radius as i32;
                chart
                    .draw_series(layout.points.iter().map(|&p| {
                        EmptyElement::at(p)
                            + Rectangle::new([(-r, -r), (r, r)], series_color.filled())
                    }))
                    .map_err(drawing)?;
            }
        }

        // Frame and tick marks
        let frame = BLACK.stroke_width(px(0.8).round().max(1.0) as u32);
        root.draw(&Rectangle::new(
            [(plot_left, plot_top), (plot_right, plot_bottom)],
            frame,
        ))
        .map_err(drawing)?;
        for &(x, _) in &x_ticks {
            root.draw(&PathElement::new(
                vec![(x, plot_bottom), (x, plot_bottom + tick_len)],
                frame,
            ))
            .map_err(drawing)?;
        }
        for &(y, _) in &y_ticks {
            root.draw(&PathElement::new(
                vec![(plot_left - tick_len, y), (plot_left, y)],
                frame,
            ))
            .map_err(drawing)?;
        }

        if !with_text {
            return root.present().map_err(drawing);
        }

        // Annotations
        let annotation_font = px(canvas.annotation_pt);
        for &((x, y), text, anchor, (dx, dy)) in &annotations {
            let h = match anchor {
                Anchor::Center => HPos::Center,
                Anchor::Left => HPos::Left,
            };
            let at = (x + px(dx).round() as i32, y - px(dy).round() as i32);
            Self::text(&root, text, at, annotation_font, Pos::new(h, VPos::Bottom), false)?;
        }

        // Tick labels
        let tick_font = px(canvas.tick_pt);
        for &(x, label) in &x_ticks {
            let at = (x, plot_bottom + tick_len + tick_pad);
            Self::text(&root, label, at, tick_font, Pos::new(HPos::Center, VPos::Top), false)?;
        }
        for &(y, label) in &y_ticks {
            let at = (plot_left - tick_len - tick_pad, y);
            Self::text(&root, label, at, tick_font, Pos::new(HPos::Right, VPos::Center), false)?;
        }

        // Axis titles and chart title
        let label_font = px(canvas.label_pt);
        let plot_mid_x = (plot_left + plot_right) / 2;
        if let Some(x_label) = &spec.x_label {
            let at = (
                plot_mid_x,
                plot_bottom + tick_len + tick_pad + (tick_font * 1.6).round() as i32,
            );
            Self::text(&root, x_label, at, label_font, Pos::new(HPos::Center, VPos::Top), false)?;
        }
        if let Some(y_label) = &spec.y_label {
            let at = (
                plot_left - tick_len - tick_pad - (tick_font * 3.2).round() as i32
                    - (label_font * 0.6).round() as i32,
                (plot_top + plot_bottom) / 2,
            );
            Self::text(&root, y_label, at, label_font, Pos::new(HPos::Center, VPos::Center), true)?;
        }
        if let Some(title) = &spec.title {
            let at = (plot_mid_x, plot_top - (px(canvas.title_pt) * 0.8).round() as i32);
            Self::text(
                &root,
                title,
                at,
                px(canvas.title_pt),
                Pos::new(HPos::Center, VPos::Bottom),
                false,
            )?;
        }

        root.present().map_err(drawing)
    }

    /// Straight pixel-space line, optionally broken into dashes.
    fn line(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        from: (i32, i32),
        to: (i32, i32),
        style: ShapeStyle,
        dashed: bool,
        canvas: &Canvas,
    ) -> Result<(), RenderError> {
        if !dashed {
            return root
                .draw(&PathElement::new(vec![from, to], style))
                .map_err(drawing);
        }

        let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
        let len = dx.hypot(dy);
        if len == 0.0 {
            return Ok(());
        }
        let (ux, uy) = (dx / len, dy / len);
        let dash = canvas.px(DASH_PT).max(1.0);
        let gap = canvas.px(GAP_PT).max(1.0);
        let at = |t: f64| {
            (
                (from.0 as f64 + ux * t).round() as i32,
                (from.1 as f64 + uy * t).round() as i32,
            )
        };

        let mut t = 0.0;
        while t < len {
            let end = (t + dash).min(len);
            root.draw(&PathElement::new(vec![at(t), at(end)], style))
                .map_err(drawing)?;
            t += dash + gap;
        }
        Ok(())
    }

    fn text(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        text: &str,
        at: (i32, i32),
        size_px: f64,
        pos: Pos,
        vertical: bool,
    ) -> Result<(), RenderError> {
        let mut font = (FONT_FAMILY, size_px).into_font();
        if vertical {
            font = font.transform(FontTransform::Rotate270);
        }
        let style = font.color(&BLACK).pos(pos);
        root.draw(&Text::new(text.to_string(), at, style))
            .map_err(drawing)
    }

    /// Encode to a temporary file beside the target, then move it into place,
    /// so a failed render never leaves a partial image.
    fn write_png(image: &RgbImage, path: &Path) -> Result<(), RenderError> {
        let io_error = |source: io::Error| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let Some(name) = path.file_name() else {
            return Err(io_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "output path has no file name",
            )));
        };
        let mut tmp_name = name.to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);

        let result = image
            .save_with_format(&tmp, ImageFormat::Png)
            .map_err(|e| match e {
                ImageError::IoError(source) => io_error(source),
                other => RenderError::Encode(other),
            })
            .and_then(|_| fs::rename(&tmp, path).map_err(io_error));

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::spec::AnnotationMode;

    fn small_spec(path: PathBuf) -> ChartSpec {
        ChartSpec::new(path)
            .with_title("Speedup")
            .with_labels("Distance", "Speedup Factor")
            .with_dpi(40.0)
    }

    /// Fresh directory for one test; the test removes it when done.
    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "speedup-plot-renderer-{}-{}",
            test,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn rasterize_crops_within_canvas() {
        let series = SampleSeries::from_xy(&[1.0, 2.0, 3.0], &[1.1, 1.3, 1.2]).unwrap();
        let spec = small_spec(PathBuf::from("unused.png"));
        let (image, layout) = ChartRenderer::rasterize(&series, &spec).unwrap();
        let (w, h) = spec.canvas.pixel_size();
        assert!(image.width() <= w && image.height() <= h);
        assert!(image.width() > w / 2 && image.height() > h / 2);
        assert_eq!(layout.x_ticks.len(), 3);
    }

    #[test]
    fn rasterize_rejects_invalid_spec() {
        let series = SampleSeries::from_xy(&[1.0], &[1.1]).unwrap();
        let mut spec = small_spec(PathBuf::from("unused.png"));
        spec.baseline = f64::INFINITY;
        assert!(matches!(
            ChartRenderer::rasterize(&series, &spec),
            Err(RenderError::InvalidSpec(_))
        ));
    }

    #[test]
    fn rasterize_rejects_oversized_canvas() {
        let series = SampleSeries::from_xy(&[1.0, 2.0], &[1.1, 1.2]).unwrap();
        let spec = small_spec(PathBuf::from("unused.png")).with_dpi(1.0e7);
        assert!(matches!(
            ChartRenderer::rasterize(&series, &spec),
            Err(RenderError::InvalidSpec(_))
        ));
    }

    #[test]
    fn rasterize_rejects_overflowing_axis() {
        let series = SampleSeries::from_xy(&[1.0], &[1.0e308]).unwrap();
        let mut spec = small_spec(PathBuf::from("unused.png"));
        spec.baseline = -1.0e308;
        assert!(matches!(
            ChartRenderer::rasterize(&series, &spec),
            Err(RenderError::InvalidSpec(_))
        ));
    }

    #[test]
    fn render_writes_png_without_leftovers() {
        let dir = scratch_dir("leftovers");
        let path = dir.join("square.png");
        let mut spec = small_spec(path.clone())
            .with_series_style(Rgb::GREEN, Marker::Square)
            .with_annotation_mode(AnnotationMode::PerPointWithMax);
        spec.grid.dashed = false;

        let result = render(&[25.0, 50.0, 100.0], &[1.37, 1.38, 1.28], &spec).unwrap();
        assert!(path.exists());
        assert!(!path.with_file_name("square.png.tmp").exists());
        assert_eq!(result.layout.annotations.len(), 4);

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), result.width_px);
        assert_eq!(decoded.height(), result.height_px);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mismatched_arrays_write_nothing() {
        let dir = scratch_dir("mismatch");
        let path = dir.join("mismatch.png");
        let spec = small_spec(path.clone());
        let err = render(&[1.0, 2.0], &[1.0], &spec).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidSeries(SeriesError::LengthMismatch { xs: 2, ys: 1 })
        ));
        assert!(!path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn path_without_file_name_is_io_error() {
        let series = SampleSeries::from_xy(&[1.0], &[1.1]).unwrap();
        let spec = small_spec(PathBuf::from("/"));
        assert!(matches!(
            ChartRenderer::render(&series, &spec),
            Err(RenderError::Io { .. })
        ));
    }
}
