use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub cell_fill: String,
    pub cell_border: String,
    pub cell_text_color: String,
    pub placeholder_border: String,
    pub placeholder_dash: f32,
    pub line_color: String,
    pub line_width: f32,
}

impl Theme {
    /// Dark editor look: red prerequisite arrows, dashed white empty slots.
    pub fn classic() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            background: "#1E1E1E".to_string(),
            cell_fill: "#2D2D30".to_string(),
            cell_border: "#8A8A8A".to_string(),
            cell_text_color: "#F0F0F0".to_string(),
            placeholder_border: "#FFFFFF".to_string(),
            placeholder_dash: 4.0,
            line_color: "#FF0000".to_string(),
            line_width: 2.0,
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            background: "#FFFFFF".to_string(),
            cell_fill: "#F8FAFF".to_string(),
            cell_border: "#C7D2E5".to_string(),
            cell_text_color: "#1C2430".to_string(),
            placeholder_border: "#9AA6BC".to_string(),
            placeholder_dash: 4.0,
            line_color: "#D03030".to_string(),
            line_width: 2.0,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" | "dark" => Some(Self::classic()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
