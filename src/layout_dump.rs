use crate::geometry::Rect;
use crate::ir::EntityId;
use crate::layout::{GridSpec, RoutedEdge};
use crate::scene::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub spec: GridSpec,
    pub width: f32,
    pub height: f32,
    pub column_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    pub cells: Vec<CellDump>,
    pub edges: Vec<RoutedEdge>,
    pub declared_links: usize,
    pub dangling: Vec<DanglingDump>,
}

#[derive(Debug, Serialize)]
pub struct CellDump {
    pub row: usize,
    pub column: usize,
    pub occupant: Option<EntityId>,
    #[serde(flatten)]
    pub rect: Rect,
}

#[derive(Debug, Serialize)]
pub struct DanglingDump {
    pub talent: EntityId,
    pub missing: EntityId,
}

impl LayoutDump {
    pub fn from_scene(scene: &Scene) -> Self {
        let cells = scene
            .grid
            .iter_cells()
            .map(|(row, column, rect)| CellDump {
                row,
                column,
                occupant: scene.occupant(row, column),
                rect,
            })
            .collect();

        let dangling = scene
            .graph
            .dangling()
            .map(|(talent, missing)| DanglingDump { talent, missing })
            .collect();

        LayoutDump {
            spec: scene.grid.spec,
            width: scene.grid.width,
            height: scene.grid.height,
            column_widths: scene.grid.column_widths.clone(),
            row_heights: scene.grid.row_heights.clone(),
            cells,
            edges: scene.edges.clone(),
            declared_links: scene.graph.declared_edge_count(),
            dangling,
        }
    }
}

pub fn write_layout_dump(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
