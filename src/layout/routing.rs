use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::ir::{DependencyGraph, Entity, Prerequisite};

use super::error::{LayoutError, Result};
use super::types::{Arrowhead, RouteKind, RoutedEdge, Segment};
use super::CellRects;

/// Default arrowhead wing length.
pub const DEFAULT_ARROW_SIZE: f32 = 8.0;

/// How two cells are judged to share a row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    /// Exact equality of the rectangles' top-left coordinates. Holds only
    /// because every cell in a row reads its offset from the same table.
    #[default]
    Geometry,
    /// Row/column index comparison.
    GridIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptions {
    pub arrow_size: f32,
    pub alignment: Alignment,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            arrow_size: DEFAULT_ARROW_SIZE,
            alignment: Alignment::Geometry,
        }
    }
}

struct Placed<'a> {
    entity: &'a Entity,
    rect: Rect,
}

fn place<'a, C: CellRects + ?Sized>(entity: &'a Entity, cells: &C) -> Result<Placed<'a>> {
    let rect = cells
        .cell_rect(entity.row, entity.column)
        .ok_or(LayoutError::MissingCell {
            row: entity.row,
            column: entity.column,
        })?;
    Ok(Placed { entity, rect })
}

fn classify(parent: &Placed<'_>, child: &Placed<'_>, alignment: Alignment) -> RouteKind {
    let (same_row, same_column) = match alignment {
        Alignment::Geometry => (parent.rect.y == child.rect.y, parent.rect.x == child.rect.x),
        Alignment::GridIndex => (
            parent.entity.row == child.entity.row,
            parent.entity.column == child.entity.column,
        ),
    };
    if same_row {
        RouteKind::Horizontal
    } else if same_column {
        RouteKind::Vertical
    } else {
        RouteKind::Step
    }
}

fn horizontal_route(parent: Rect, child: Rect) -> Vec<Segment> {
    let y = parent.y + parent.height / 2.0;
    let (start_x, end_x) = if child.x > parent.x {
        (parent.right(), child.x)
    } else {
        (parent.x, child.right())
    };
    vec![Segment::new(Point::new(start_x, y), Point::new(end_x, y))]
}

fn vertical_route(parent: Rect, child: Rect) -> Vec<Segment> {
    // Centered on the half-height of the parent; cells are square in practice.
    let x = parent.x + parent.height / 2.0;
    let (start_y, end_y) = if child.y >= parent.y {
        (parent.bottom(), child.y)
    } else {
        (parent.y, child.bottom())
    };
    vec![Segment::new(Point::new(x, start_y), Point::new(x, end_y))]
}

fn step_route(parent: Rect, child: Rect) -> Vec<Segment> {
    let start_x = if child.x > parent.x {
        parent.right()
    } else {
        parent.x
    };
    let y = parent.y + parent.height / 2.0;
    let corner = Point::new(child.x + child.width / 2.0, y);
    vec![
        Segment::new(Point::new(start_x, y), corner),
        Segment::new(corner, Point::new(corner.x, child.y)),
    ]
}

/// Arrowhead at `to` for a line arriving from `from`; `None` when the points coincide.
pub fn arrowhead(from: Point, to: Point, size: f32) -> Option<Arrowhead> {
    let u = from.to(to).unit()?;
    let p = u.perpendicular();
    let back = to - u * size;
    let half = p * (size / 2.0);
    Some(Arrowhead {
        tip: to,
        left: back + half,
        right: back - half,
    })
}

/// Routes one prerequisite link from `parent` to `child`.
pub fn route_edge<C: CellRects + ?Sized>(
    parent: &Entity,
    child: &Entity,
    prerequisite: &Prerequisite,
    cells: &C,
    options: &RouteOptions,
) -> Result<RoutedEdge> {
    let parent = place(parent, cells)?;
    let child = place(child, cells)?;
    let kind = classify(&parent, &child, options.alignment);
    let segments = match kind {
        RouteKind::Horizontal => horizontal_route(parent.rect, child.rect),
        RouteKind::Vertical => vertical_route(parent.rect, child.rect),
        RouteKind::Step => step_route(parent.rect, child.rect),
    };
    let arrowhead = segments
        .last()
        .and_then(|last| arrowhead(last.start, last.end, options.arrow_size));
    Ok(RoutedEdge {
        from: parent.entity.id,
        to: child.entity.id,
        rank: prerequisite.rank,
        kind,
        segments,
        arrowhead,
    })
}

/// Routes every resolvable prerequisite in the graph, skipping dangling links.
pub fn route<C: CellRects + ?Sized>(
    graph: &DependencyGraph,
    cells: &C,
    options: &RouteOptions,
) -> Result<Vec<RoutedEdge>> {
    let mut edges = Vec::new();
    for child in graph.entities() {
        for prerequisite in child.prerequisites() {
            let Some(parent) = graph.lookup(prerequisite.target) else {
                continue;
            };
            edges.push(route_edge(parent, child, prerequisite, cells, options)?);
        }
    }
    Ok(edges)
}
