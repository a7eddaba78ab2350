#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("grid must have at least one row and one column (got {rows}x{columns})")]
    EmptyGrid { rows: usize, columns: usize },

    #[error("expected {expected} cell items for a {rows}x{columns} grid, got {actual}")]
    ItemCount {
        rows: usize,
        columns: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{axis} gutter must be a finite, non-negative length (got {value})")]
    InvalidGutter { axis: &'static str, value: f32 },

    #[error("cell item {index} has an invalid minimum size {width}x{height}")]
    InvalidItemSize {
        index: usize,
        width: f32,
        height: f32,
    },

    #[error("no cell rectangle for row {row}, column {column}")]
    MissingCell { row: usize, column: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
