use crate::geometry::Size;
use crate::layout::{Alignment, DEFAULT_ARROW_SIZE, DEFAULT_CELL_EDGE, GridSpec, RouteOptions};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Talent tiers per tab.
pub const DEFAULT_ROWS: usize = 15;
/// Talent columns per tab.
pub const DEFAULT_COLUMNS: usize = 4;
/// Native talent icon edge.
pub const DEFAULT_ICON_SIZE: f32 = 46.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub rows: usize,
    pub columns: usize,
    pub cell_size: f32,
    pub horizontal_gutter: f32,
    pub vertical_gutter: f32,
    /// Edge length used for the reported extent of a grid with no sized cells.
    pub fallback_cell_edge: f32,
    pub arrow_size: f32,
    pub alignment: Alignment,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            cell_size: DEFAULT_ICON_SIZE,
            horizontal_gutter: DEFAULT_ICON_SIZE / 2.0,
            vertical_gutter: DEFAULT_ICON_SIZE / 2.0,
            fallback_cell_edge: DEFAULT_CELL_EDGE,
            arrow_size: DEFAULT_ARROW_SIZE,
            alignment: Alignment::Geometry,
        }
    }
}

impl LayoutConfig {
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(
            self.rows,
            self.columns,
            self.horizontal_gutter,
            self.vertical_gutter,
        )
    }

    pub fn cell_size(&self) -> Size {
        Size::square(self.cell_size)
    }

    pub fn route_options(&self) -> RouteOptions {
        RouteOptions {
            arrow_size: self.arrow_size,
            alignment: self.alignment,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    /// Margin around the grid in the SVG canvas.
    pub padding: f32,
    pub show_ids: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 1100.0,
            padding: 12.0,
            show_ids: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    cell_fill: Option<String>,
    cell_border: Option<String>,
    cell_text_color: Option<String>,
    placeholder_border: Option<String>,
    placeholder_dash: Option<f32>,
    line_color: Option<String>,
    line_width: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridConfigFile {
    rows: Option<usize>,
    columns: Option<usize>,
    cell_size: Option<f32>,
    horizontal_gutter: Option<f32>,
    vertical_gutter: Option<f32>,
    fallback_cell_edge: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutingConfigFile {
    arrow_size: Option<f32>,
    alignment: Option<Alignment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    padding: Option<f32>,
    show_ids: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    grid: Option<GridConfigFile>,
    routing: Option<RoutingConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.cell_fill {
            config.theme.cell_fill = v;
        }
        if let Some(v) = vars.cell_border {
            config.theme.cell_border = v;
        }
        if let Some(v) = vars.cell_text_color {
            config.theme.cell_text_color = v;
        }
        if let Some(v) = vars.placeholder_border {
            config.theme.placeholder_border = v;
        }
        if let Some(v) = vars.placeholder_dash {
            config.theme.placeholder_dash = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
    }

    if let Some(grid) = parsed.grid {
        if let Some(v) = grid.rows {
            config.layout.rows = v;
        }
        if let Some(v) = grid.columns {
            config.layout.columns = v;
        }
        if let Some(v) = grid.cell_size {
            config.layout.cell_size = v;
        }
        if let Some(v) = grid.horizontal_gutter {
            config.layout.horizontal_gutter = v;
        }
        if let Some(v) = grid.vertical_gutter {
            config.layout.vertical_gutter = v;
        }
        if let Some(v) = grid.fallback_cell_edge {
            config.layout.fallback_cell_edge = v;
        }
    }

    if let Some(routing) = parsed.routing {
        if let Some(v) = routing.arrow_size {
            config.layout.arrow_size = v;
        }
        if let Some(v) = routing.alignment {
            config.layout.alignment = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.show_ids {
            config.render.show_ids = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_talent_editor_grid() {
        let config = Config::default();
        let spec = config.layout.grid_spec();
        assert_eq!((spec.rows, spec.columns), (15, 4));
        assert_eq!(spec.horizontal_gutter, 23.0);
        assert_eq!(config.layout.route_options().arrow_size, 8.0);
    }

    #[test]
    fn overlays_partial_config() {
        let config = parse_config(
            r##"{
                "theme": "light",
                "themeVariables": { "lineColor": "#00FF00", "lineWidth": 3 },
                "grid": { "rows": 7, "verticalGutter": 10 },
                "routing": { "alignment": "gridIndex" },
                "render": { "showIds": false }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.line_color, "#00FF00");
        assert_eq!(config.theme.line_width, 3.0);
        assert_eq!(config.theme.cell_fill, Theme::light().cell_fill);
        assert_eq!(config.layout.rows, 7);
        assert_eq!(config.layout.columns, 4);
        assert_eq!(config.layout.vertical_gutter, 10.0);
        assert_eq!(config.layout.alignment, Alignment::GridIndex);
        assert!(!config.render.show_ids);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(parse_config(r#"{ "theme": "neon" }"#).is_err());
    }
}
