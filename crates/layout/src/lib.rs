pub mod reconstruct;

pub use reconstruct::{
    LayoutConfig, LayoutError, LayoutReconstructor, DEFAULT_CELL_SEPARATOR,
    DEFAULT_CELL_THRESHOLD, DEFAULT_LINE_THRESHOLD,
};
