use std::fmt;

use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::detection::DetectedSymbol;
use crate::geometry::{Point, Quad};

/// Colour and width used to outline symbols
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba<u8>,
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba([255, 0, 0, 255]),
            width: 2.0,
        }
    }
}

/// A symbol that could not be outlined
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("symbol {index}: invalid points: got {count}")]
    InvalidPoints { index: usize, count: usize },
}

/// Every [`SymbolError`] of one annotation pass, in detection order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolErrors(pub Vec<SymbolError>);

impl fmt::Display for SymbolErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for SymbolErrors {}

/// Boundary of a symbol that was drawn, before extension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolOutline {
    pub index: usize,
    pub quad: Quad,
}

/// Result of outlining every detected symbol on a copy of the source image
#[derive(Debug)]
pub struct Annotation {
    pub image: RgbaImage,
    pub outlines: Vec<SymbolOutline>,
    pub errors: Vec<SymbolError>,
}

impl Annotation {
    /// The rendered image, or all symbol errors if any symbol was malformed
    pub fn into_result(self) -> Result<(RgbaImage, Vec<SymbolOutline>), SymbolErrors> {
        if self.errors.is_empty() {
            Ok((self.image, self.outlines))
        } else {
            Err(SymbolErrors(self.errors))
        }
    }
}

/// Copy `img` into a premultiplied pixmap, draw, and copy the result back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let Some(mut pixmap) = Pixmap::new(img.width(), img.height()) else {
        return;
    };

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    f(&mut pixmap);

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
}

/// One path holding every segment, or `None` if nothing is drawable
fn build_outline_path(segments: &[(Point, Point)]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for (from, to) in segments {
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
    }
    pb.finish()
}

/// Stroke all `segments` in a single pass
fn stroke_segments(pixmap: &mut Pixmap, segments: &[(Point, Point)], style: &StrokeStyle) {
    let Some(path) = build_outline_path(segments) else {
        return;
    };

    let [r, g, b, a] = style.color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: style.width,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Side extension for a symbol: a quarter of its module width plus height
pub fn symbol_offset(symbol: &DetectedSymbol) -> f64 {
    (symbol.bits.width() + symbol.bits.height()) as f64 / 4.0
}

/// Outline every well-formed symbol on a copy of `source`
///
/// Symbols without exactly three corners are skipped and reported in
/// [`Annotation::errors`]; the remaining symbols are still drawn.
pub fn annotate(source: &RgbaImage, symbols: &[DetectedSymbol], style: &StrokeStyle) -> Annotation {
    let mut image = source.clone();
    let mut outlines = Vec::with_capacity(symbols.len());
    let mut errors = Vec::new();
    let mut paths = Vec::with_capacity(symbols.len());

    for (index, symbol) in symbols.iter().enumerate() {
        let [p0, p1, p2] = match symbol.points.as_slice() {
            &[p0, p1, p2] => [p0, p1, p2],
            points => {
                log::warn!("Skipping symbol {}: {} corner points", index, points.len());
                errors.push(SymbolError::InvalidPoints {
                    index,
                    count: points.len(),
                });
                continue;
            }
        };

        let quad = Quad::from_corners(p0, p1, p2);
        paths.push(quad.extended_edges(symbol_offset(symbol)));
        outlines.push(SymbolOutline { index, quad });
    }

    // Untouched copy when nothing is drawn, so the raster round-trips exactly
    if !paths.is_empty() {
        with_pixmap(&mut image, |pixmap| {
            for segments in &paths {
                stroke_segments(pixmap, segments, style);
            }
        });
    }

    Annotation {
        image,
        outlines,
        errors,
    }
}
