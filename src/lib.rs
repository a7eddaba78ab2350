#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod scene;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use geometry::{Point, Rect, Size};
pub use ir::{DependencyGraph, Entity, EntityId, Prerequisite};
pub use layout::{
    CellItem, GridLayout, GridSpec, LayoutError, Primitive, RouteKind, RoutedEdge, layout, route,
};
pub use parser::{DocumentError, parse_document};
pub use render::render_svg;
pub use scene::{Scene, SceneStore};
pub use theme::Theme;

/// Parses a talent document and lays it out. The document's `rows`/`columns`
/// replace the configured shape unless `rows`/`columns` are given explicitly.
pub fn build_scene(
    input: &str,
    layout: &mut LayoutConfig,
    rows: Option<usize>,
    columns: Option<usize>,
) -> anyhow::Result<Scene> {
    let document = parser::parse_document(input)?;
    if let Some(rows) = rows.or(document.rows) {
        layout.rows = rows;
    }
    if let Some(columns) = columns.or(document.columns) {
        layout.columns = columns;
    }
    let spec = layout.grid_spec();
    spec.validate()?;
    let placed = parser::place_talents(&document, &spec)?;
    let items = parser::cell_items(&placed, &spec, layout.cell_size());
    Ok(Scene::build(placed.graph, &items, layout)?)
}

/// Document in, SVG out.
pub fn render_with_config(input: &str, mut config: Config) -> anyhow::Result<String> {
    let scene = build_scene(input, &mut config.layout, None, None)?;
    Ok(render_svg(&scene, &config.theme, &config.render))
}
