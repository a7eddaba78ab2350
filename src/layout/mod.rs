mod error;
pub(crate) mod routing;
pub(crate) mod types;
pub use error::{LayoutError, Result};
pub use routing::*;
pub use types::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// Edge length used for the reported grid extent when no cell has a size.
pub const DEFAULT_CELL_EDGE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub rows: usize,
    pub columns: usize,
    pub horizontal_gutter: f32,
    pub vertical_gutter: f32,
}

impl GridSpec {
    pub fn new(rows: usize, columns: usize, horizontal_gutter: f32, vertical_gutter: f32) -> Self {
        Self {
            rows,
            columns,
            horizontal_gutter,
            vertical_gutter,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// `(row, column)` of a flat item index.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    pub fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then_some(row * self.columns + column)
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(LayoutError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        check_gutter("horizontal", self.horizontal_gutter)?;
        check_gutter("vertical", self.vertical_gutter)?;
        Ok(())
    }
}

fn check_gutter(axis: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidGutter { axis, value })
    }
}

/// One positional slot of the grid. Empty slots still take part in sizing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellItem {
    pub min_size: Size,
}

impl CellItem {
    pub const EMPTY: CellItem = CellItem {
        min_size: Size::ZERO,
    };

    pub const fn new(min_size: Size) -> Self {
        Self { min_size }
    }
}

/// Per-column widths and per-row heights from the measurement pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetrics {
    pub column_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
}

impl GridMetrics {
    pub fn content_width(&self, spec: &GridSpec) -> f32 {
        self.column_widths.iter().sum::<f32>() + gutter_total(spec.columns, spec.horizontal_gutter)
    }

    pub fn content_height(&self, spec: &GridSpec) -> f32 {
        self.row_heights.iter().sum::<f32>() + gutter_total(spec.rows, spec.vertical_gutter)
    }
}

fn gutter_total(count: usize, gutter: f32) -> f32 {
    count.saturating_sub(1) as f32 * gutter
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub spec: GridSpec,
    /// One rectangle per flat item index.
    pub cells: Vec<Rect>,
    pub column_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    pub column_offsets: Vec<f32>,
    pub row_offsets: Vec<f32>,
    /// Total extent, including the empty-grid fallback.
    pub width: f32,
    pub height: f32,
}

impl GridLayout {
    pub fn cell(&self, row: usize, column: usize) -> Option<Rect> {
        self.spec
            .index(row, column)
            .and_then(|idx| self.cells.get(idx).copied())
    }

    /// Iterates `(row, column, rect)` in flat index order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Rect)> + '_ {
        self.cells.iter().enumerate().map(|(idx, rect)| {
            let (row, column) = self.spec.position(idx);
            (row, column, *rect)
        })
    }
}

/// Source of per-cell rectangles for routing.
pub trait CellRects {
    fn cell_rect(&self, row: usize, column: usize) -> Option<Rect>;
}

impl CellRects for GridLayout {
    fn cell_rect(&self, row: usize, column: usize) -> Option<Rect> {
        self.cell(row, column)
    }
}

impl CellRects for BTreeMap<(usize, usize), Rect> {
    fn cell_rect(&self, row: usize, column: usize) -> Option<Rect> {
        self.get(&(row, column)).copied()
    }
}

fn validate_items(items: &[CellItem], spec: &GridSpec) -> Result<()> {
    spec.validate()?;
    if items.len() != spec.cell_count() {
        return Err(LayoutError::ItemCount {
            rows: spec.rows,
            columns: spec.columns,
            expected: spec.cell_count(),
            actual: items.len(),
        });
    }
    if let Some((index, item)) = items
        .iter()
        .enumerate()
        .find(|(_, item)| !item.min_size.is_valid())
    {
        return Err(LayoutError::InvalidItemSize {
            index,
            width: item.min_size.width,
            height: item.min_size.height,
        });
    }
    Ok(())
}

/// Measurement pass: max minimum width per column, max minimum height per row.
pub fn measure(items: &[CellItem], spec: &GridSpec) -> Result<GridMetrics> {
    validate_items(items, spec)?;
    let mut column_widths = vec![0.0f32; spec.columns];
    let mut row_heights = vec![0.0f32; spec.rows];
    for (idx, item) in items.iter().enumerate() {
        let (row, column) = spec.position(idx);
        column_widths[column] = column_widths[column].max(item.min_size.width);
        row_heights[row] = row_heights[row].max(item.min_size.height);
    }
    Ok(GridMetrics {
        column_widths,
        row_heights,
    })
}

fn offsets(sizes: &[f32], gutter: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut cursor = 0.0f32;
    for size in sizes {
        out.push(cursor);
        cursor += size + gutter;
    }
    out
}

fn with_fallback(total: f32, count: usize, gutter: f32, fallback_edge: f32) -> f32 {
    if total == 0.0 {
        count as f32 * fallback_edge + gutter_total(count, gutter)
    } else {
        total
    }
}

pub fn compute_grid_layout(
    items: &[CellItem],
    spec: &GridSpec,
    fallback_edge: f32,
) -> Result<GridLayout> {
    let metrics = measure(items, spec)?;
    let width = with_fallback(
        metrics.content_width(spec),
        spec.columns,
        spec.horizontal_gutter,
        fallback_edge,
    );
    let height = with_fallback(
        metrics.content_height(spec),
        spec.rows,
        spec.vertical_gutter,
        fallback_edge,
    );

    let column_offsets = offsets(&metrics.column_widths, spec.horizontal_gutter);
    let row_offsets = offsets(&metrics.row_heights, spec.vertical_gutter);

    let cells = (0..items.len())
        .map(|idx| {
            let (row, column) = spec.position(idx);
            Rect::new(
                column_offsets[column],
                row_offsets[row],
                metrics.column_widths[column],
                metrics.row_heights[row],
            )
        })
        .collect();

    Ok(GridLayout {
        spec: *spec,
        cells,
        column_widths: metrics.column_widths,
        row_heights: metrics.row_heights,
        column_offsets,
        row_offsets,
        width,
        height,
    })
}

/// Sizes and positions all `rows * columns` items.
pub fn layout(items: &[CellItem], spec: &GridSpec) -> Result<Vec<Rect>> {
    compute_grid_layout(items, spec, DEFAULT_CELL_EDGE).map(|grid| grid.cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(spec: &GridSpec, edge: f32) -> Vec<CellItem> {
        vec![CellItem::new(Size::square(edge)); spec.cell_count()]
    }

    #[test]
    fn places_uniform_cells_with_gutters() {
        let spec = GridSpec::new(15, 4, 23.0, 23.0);
        let grid = compute_grid_layout(&uniform(&spec, 46.0), &spec, DEFAULT_CELL_EDGE).unwrap();
        assert_eq!(grid.cells.len(), 60);
        assert_eq!(grid.cell(0, 0), Some(Rect::new(0.0, 0.0, 46.0, 46.0)));
        assert_eq!(grid.cell(2, 3), Some(Rect::new(207.0, 138.0, 46.0, 46.0)));
        assert_eq!(grid.width, 4.0 * 46.0 + 3.0 * 23.0);
        assert_eq!(grid.height, 15.0 * 46.0 + 14.0 * 23.0);
        assert!(grid.cell(15, 0).is_none());
    }

    #[test]
    fn columns_and_rows_size_independently() {
        let spec = GridSpec::new(2, 3, 5.0, 7.0);
        let mut items = vec![CellItem::EMPTY; 6];
        items[1] = CellItem::new(Size::new(30.0, 10.0));
        items[5] = CellItem::new(Size::new(12.0, 40.0));
        let grid = compute_grid_layout(&items, &spec, DEFAULT_CELL_EDGE).unwrap();
        assert_eq!(grid.column_widths, vec![0.0, 30.0, 12.0]);
        assert_eq!(grid.row_heights, vec![10.0, 40.0]);
        assert_eq!(grid.column_offsets, vec![0.0, 5.0, 40.0]);
        assert_eq!(grid.row_offsets, vec![0.0, 17.0]);
        // Empty slots still span their full column width and row height.
        assert_eq!(grid.cell(1, 1), Some(Rect::new(5.0, 17.0, 30.0, 40.0)));
        assert_eq!(grid.width, 52.0);
        assert_eq!(grid.height, 57.0);
    }

    #[test]
    fn rejects_wrong_item_count() {
        let spec = GridSpec::new(2, 2, 0.0, 0.0);
        let err = layout(&[CellItem::EMPTY; 3], &spec).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ItemCount {
                rows: 2,
                columns: 2,
                expected: 4,
                actual: 3
            }
        );
        assert!(layout(&[CellItem::EMPTY; 5], &spec).is_err());
    }

    #[test]
    fn rejects_degenerate_specs() {
        assert!(matches!(
            layout(&[], &GridSpec::new(0, 4, 0.0, 0.0)),
            Err(LayoutError::EmptyGrid { .. })
        ));
        assert!(matches!(
            layout(&[CellItem::EMPTY; 4], &GridSpec::new(2, 2, -1.0, 0.0)),
            Err(LayoutError::InvalidGutter {
                axis: "horizontal",
                ..
            })
        ));
        assert!(matches!(
            layout(&[CellItem::EMPTY; 4], &GridSpec::new(2, 2, 0.0, f32::NAN)),
            Err(LayoutError::InvalidGutter {
                axis: "vertical",
                ..
            })
        ));
        let mut items = [CellItem::EMPTY; 4];
        items[2] = CellItem::new(Size::new(-3.0, 1.0));
        assert!(matches!(
            layout(&items, &GridSpec::new(2, 2, 0.0, 0.0)),
            Err(LayoutError::InvalidItemSize { index: 2, .. })
        ));
    }

    #[test]
    fn single_cell_grid_has_no_gutters() {
        let spec = GridSpec::new(1, 1, 10.0, 10.0);
        let grid =
            compute_grid_layout(&[CellItem::new(Size::new(8.0, 9.0))], &spec, 50.0).unwrap();
        assert_eq!(grid.cells, vec![Rect::new(0.0, 0.0, 8.0, 9.0)]);
        assert_eq!((grid.width, grid.height), (8.0, 9.0));
    }

    #[test]
    fn rect_map_implements_cell_rects() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(map.cell_rect(1, 2), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(map.cell_rect(0, 0), None);
    }
}
