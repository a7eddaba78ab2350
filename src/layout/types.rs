use serde::Serialize;

use crate::geometry::{Point, Rect};
use crate::ir::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.to(self.end).length()
    }
}

/// Two wings drawn back from `tip`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

impl Arrowhead {
    pub fn wings(&self) -> [Segment; 2] {
        [
            Segment::new(self.tip, self.left),
            Segment::new(self.tip, self.right),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Horizontal,
    Vertical,
    Step,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedEdge {
    /// Prerequisite (parent) talent.
    pub from: EntityId,
    /// Dependent (child) talent; the arrow points here.
    pub to: EntityId,
    pub rank: u32,
    pub kind: RouteKind,
    pub segments: Vec<Segment>,
    pub arrowhead: Option<Arrowhead>,
}

impl RoutedEdge {
    /// Final point of the route, where the arrowhead sits.
    pub fn terminal(&self) -> Option<Point> {
        self.segments.last().map(|segment| segment.end)
    }

    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        self.segments
            .iter()
            .copied()
            .map(Primitive::Line)
            .chain(self.arrowhead.map(Primitive::Arrowhead))
    }
}

/// Flat drawing item handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Cell {
        row: usize,
        column: usize,
        rect: Rect,
        occupant: Option<EntityId>,
    },
    Line(Segment),
    Arrowhead(Arrowhead),
}
