//! Charts module - Chart specification, layout and rendering

mod figure;
pub mod layout;
mod renderer;
mod spec;

pub use figure::{content_bounds, crop_tight, Figure};
pub use layout::{Anchor, Annotation, AnnotationKind, ChartLayout, Tick};
pub use renderer::{render, ChartRenderer, RenderError, RenderResult};
pub use spec::{
    AnnotationFormat, AnnotationMode, Canvas, ChartSpec, GridStyle, LineStyle, LowerBound, Marker,
    Rgb, SeriesStyle, UpperBound, YAxisPolicy, MAX_PIXELS,
};
