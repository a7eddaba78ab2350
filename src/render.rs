use crate::config::RenderConfig;
use crate::layout::{Primitive, Segment};
use crate::scene::Scene;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(scene: &Scene, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    let pad = config.padding.max(0.0);
    let width = scene.grid.width + pad * 2.0;
    let height = scene.grid.height + pad * 2.0;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&format!("<g transform=\"translate({pad:.2} {pad:.2})\">"));

    // Cells go first so edges are drawn on top of them.
    let primitives = scene.primitives();
    for primitive in &primitives {
        if let Primitive::Cell { rect, occupant, .. } = primitive {
            match occupant {
                Some(id) => {
                    svg.push_str(&format!(
                        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.2\"/>",
                        rect.x, rect.y, rect.width, rect.height, theme.cell_fill, theme.cell_border
                    ));
                    if config.show_ids {
                        let center = rect.center();
                        svg.push_str(&format!(
                            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{id}</text>",
                            center.x,
                            center.y,
                            escape_xml(&theme.font_family),
                            theme.font_size,
                            theme.cell_text_color
                        ));
                    }
                }
                None => {
                    // Inset by half a stroke so the dashed outline stays inside the cell.
                    svg.push_str(&format!(
                        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"{d} {d}\"/>",
                        rect.x + 0.5,
                        rect.y + 0.5,
                        (rect.width - 1.0).max(0.0),
                        (rect.height - 1.0).max(0.0),
                        theme.placeholder_border,
                        d = theme.placeholder_dash
                    ));
                }
            }
        }
    }

    for primitive in &primitives {
        match primitive {
            Primitive::Line(segment) => push_line(&mut svg, segment, theme),
            Primitive::Arrowhead(head) => {
                for wing in head.wings() {
                    push_line(&mut svg, &wing, theme);
                }
            }
            Primitive::Cell { .. } => {}
        }
    }

    svg.push_str("</g></svg>");
    svg
}

fn push_line(svg: &mut String, segment: &Segment, theme: &Theme) {
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
        segment.start.x,
        segment.start.y,
        segment.end.x,
        segment.end.y,
        theme.line_color,
        theme.line_width
    ));
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{DependencyGraph, Entity};
    use crate::layout::CellItem;

    fn scene() -> Scene {
        let config = LayoutConfig {
            rows: 2,
            columns: 2,
            ..LayoutConfig::default()
        };
        let graph = DependencyGraph::new(vec![
            Entity::new(101, 0, 0),
            Entity::new(102, 1, 1).with_prerequisite(101, 1),
        ]);
        Scene::build(graph, &[CellItem::new(config.cell_size()); 4], &config).unwrap()
    }

    #[test]
    fn render_svg_basic() {
        let theme = Theme::classic();
        let svg = render_svg(&scene(), &theme, &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">101</text>"));
        assert!(svg.contains("stroke-dasharray=\"4 4\""));
        // Step route: two segments plus two arrowhead wings.
        assert_eq!(svg.matches("<line ").count(), 4);
        assert!(svg.contains(&format!("stroke=\"{}\"", theme.line_color)));
    }

    #[test]
    fn ids_can_be_hidden() {
        let config = RenderConfig {
            show_ids: false,
            ..RenderConfig::default()
        };
        let svg = render_svg(&scene(), &Theme::light(), &config);
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn escapes_font_family() {
        assert_eq!(escape_xml("\"a\" & <b>"), "&quot;a&quot; &amp; &lt;b&gt;");
    }
}
