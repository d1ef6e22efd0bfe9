pub mod annotate;
pub mod app;
pub mod cli;
pub mod detection;
pub mod geometry;
pub mod matrix;

pub use annotate::{annotate, Annotation, StrokeStyle, SymbolError, SymbolErrors, SymbolOutline};
pub use cli::Cli;
pub use detection::{detect_symbols, DetectHints, DetectedSymbol, RqrrDetector, SymbolDetector};
pub use geometry::{complete_parallelogram, extend_line, Point, Quad};
pub use matrix::BitMatrix;
