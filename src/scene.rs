//! A laid-out and routed talent grid, and a handle that swaps whole scenes.

use std::sync::{Arc, RwLock};

use log::debug;

use crate::config::LayoutConfig;
use crate::ir::{DependencyGraph, EntityId};
use crate::layout::{
    CellItem, GridLayout, Primitive, Result, RoutedEdge, compute_grid_layout, route,
};

/// Cell geometry and routed edges computed together from one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub graph: DependencyGraph,
    pub grid: GridLayout,
    pub edges: Vec<RoutedEdge>,
}

impl Scene {
    pub fn build(graph: DependencyGraph, items: &[CellItem], config: &LayoutConfig) -> Result<Self> {
        let spec = config.grid_spec();
        let grid = compute_grid_layout(items, &spec, config.fallback_cell_edge)?;
        let edges = route(&graph, &grid, &config.route_options())?;
        debug!(
            "built {}x{} talent grid: {} talents, {} of {} prerequisite links routed",
            spec.rows,
            spec.columns,
            graph.len(),
            edges.len(),
            graph.declared_edge_count()
        );
        Ok(Self { graph, grid, edges })
    }

    pub fn occupant(&self, row: usize, column: usize) -> Option<EntityId> {
        self.graph.occupant(row, column).map(|entity| entity.id)
    }

    /// Cells first, then each edge's lines followed by its arrowhead.
    pub fn primitives(&self) -> Vec<Primitive> {
        let cells = self.grid.iter_cells().map(|(row, column, rect)| Primitive::Cell {
            row,
            column,
            rect,
            occupant: self.occupant(row, column),
        });
        cells
            .chain(self.edges.iter().flat_map(RoutedEdge::primitives))
            .collect()
    }
}

/// Holds the current scene; readers get a snapshot and never see a partial rebuild.
#[derive(Debug)]
pub struct SceneStore {
    current: RwLock<Arc<Scene>>,
}

impl SceneStore {
    pub fn new(scene: Scene) -> Self {
        Self {
            current: RwLock::new(Arc::new(scene)),
        }
    }

    pub fn load(&self) -> Arc<Scene> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Installs `scene` and returns the one it replaced.
    pub fn replace(&self, scene: Scene) -> Arc<Scene> {
        let next = Arc::new(scene);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    /// Builds a new scene and swaps it in only if the build succeeds.
    pub fn rebuild(
        &self,
        graph: DependencyGraph,
        items: &[CellItem],
        config: &LayoutConfig,
    ) -> Result<Arc<Scene>> {
        let next = Arc::new(Scene::build(graph, items, config)?);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&next);
        Ok(next)
    }
}
