use anyhow::{Context, Result};
use image::DynamicImage;
use rqrr::{BitGrid, PreparedImage};

use crate::geometry::Point;
use crate::matrix::{binarize, BitMatrix};

/// Options passed to a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectHints {
    /// Spend more time searching in exchange for finding more symbols
    pub try_harder: bool,
}

impl Default for DetectHints {
    fn default() -> Self {
        Self { try_harder: true }
    }
}

/// A symbol located by a detector
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedSymbol {
    /// Corner points in detector order; a well-formed symbol has three
    pub points: Vec<Point>,
    /// Sampled module grid of the symbol
    pub bits: BitMatrix,
}

impl DetectedSymbol {
    pub fn new(points: Vec<Point>, bits: BitMatrix) -> Self {
        Self { points, bits }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("cannot search an empty {width}x{height} matrix")]
    EmptyMatrix { width: usize, height: usize },
}

/// A multi-symbol detection engine
pub trait SymbolDetector {
    fn detect_all(
        &self,
        matrix: &BitMatrix,
        hints: &DetectHints,
    ) -> std::result::Result<Vec<DetectedSymbol>, DetectError>;
}

/// Detection backed by the `rqrr` grid finder
///
/// Each grid is reported as `[bottom-left, top-left, top-right]`, so the
/// missing corner is `p0 - p1 + p2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDetector;

impl RqrrDetector {
    fn scan(matrix: &BitMatrix) -> Vec<DetectedSymbol> {
        let mut prepared =
            PreparedImage::prepare_from_bitmap(matrix.width(), matrix.height(), |x, y| {
                matrix.get(x, y)
            });

        prepared
            .detect_grids()
            .into_iter()
            .map(|grid| {
                let [top_left, top_right, _, bottom_left] = grid.bounds;
                let to_point = |p: rqrr::Point| Point::new(p.x as f64, p.y as f64);

                let size = grid.grid.size();
                let mut bits = BitMatrix::new(size, size);
                for y in 0..size {
                    for x in 0..size {
                        bits.set(x, y, grid.grid.bit(y, x));
                    }
                }

                DetectedSymbol::new(
                    vec![to_point(bottom_left), to_point(top_left), to_point(top_right)],
                    bits,
                )
            })
            .collect()
    }
}

impl SymbolDetector for RqrrDetector {
    fn detect_all(
        &self,
        matrix: &BitMatrix,
        hints: &DetectHints,
    ) -> std::result::Result<Vec<DetectedSymbol>, DetectError> {
        if matrix.is_empty() {
            return Err(DetectError::EmptyMatrix {
                width: matrix.width(),
                height: matrix.height(),
            });
        }

        let mut symbols = Self::scan(matrix);
        log::debug!("Direct scan found {} symbol(s)", symbols.len());

        if hints.try_harder {
            // Light-on-dark symbols only show up in the inverted matrix
            let inverted = Self::scan(&matrix.inverted());
            let before = symbols.len();
            for symbol in inverted {
                if !symbols.iter().any(|known| overlaps(known, &symbol)) {
                    symbols.push(symbol);
                }
            }
            log::debug!("Inverted scan added {} symbol(s)", symbols.len() - before);
        }

        Ok(symbols)
    }
}

/// True if the centre of `b` lies within half a side length of `a`'s centre
fn overlaps(a: &DetectedSymbol, b: &DetectedSymbol) -> bool {
    let (Some(ca), Some(cb)) = (diagonal_centre(a), diagonal_centre(b)) else {
        return false;
    };
    let side = nalgebra::distance(&a.points[0], &a.points[1]);
    nalgebra::distance(&ca, &cb) < side / 2.0
}

/// Midpoint of the p0-p2 diagonal, which is also the centre of the derived quad
fn diagonal_centre(symbol: &DetectedSymbol) -> Option<Point> {
    match symbol.points.as_slice() {
        [p0, _, p2, ..] => Some(nalgebra::center(p0, p2)),
        _ => None,
    }
}

/// Binarize a decoded image and run `detector` over it once
pub fn detect_symbols(
    img: &DynamicImage,
    detector: &dyn SymbolDetector,
    hints: &DetectHints,
) -> Result<Vec<DetectedSymbol>> {
    let matrix = binarize(img);
    let symbols = detector
        .detect_all(&matrix, hints)
        .context("Symbol detection failed")?;
    log::debug!("Detector returned {} symbol(s)", symbols.len());
    Ok(symbols)
}
