use serde::Deserialize;
use talent_grid_renderer::{Config, Theme, render_with_config};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TalentGridRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    line_color: Option<String>,
    arrow_size: Option<f32>,
    show_ids: Option<bool>,
}

fn build_config(options: TalentGridRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(line_color) = options.line_color {
        config.theme.line_color = line_color;
    }
    if let Some(arrow_size) = options.arrow_size {
        config.layout.arrow_size = arrow_size;
    }
    if let Some(show_ids) = options.show_ids {
        config.render.show_ids = show_ids;
    }
    config
}

#[wasm_bindgen]
pub fn render_talent_grid_svg(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TalentGridRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TalentGridRenderOptions::default()
    };

    render_with_config(document, build_config(options))
        .map_err(|error| JsValue::from_str(&format!("{error:#}")))
}
