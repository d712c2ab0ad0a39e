use std::fmt::Write;

use super::layout::Rect;
use crate::utils::escape;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Rect {
        rect: Rect,
        fill: &'static str,
    },
    /// `y` is the baseline of the first line.
    Text {
        x: f32,
        y: f32,
        lines: Vec<String>,
        line_height: f32,
        family: String,
        weight: u16,
        size: f32,
        fill: &'static str,
    },
    Image {
        rect: Rect,
        href: String,
    },
}

/// Serializes paint commands into a standalone SVG document.
pub fn to_svg(commands: &[PaintCommand], width: u32, height: u32) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    for command in commands {
        // Writing into a String cannot fail.
        let _ = match command {
            PaintCommand::Rect { rect, fill } => write!(
                svg,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{fill}"/>"#,
                rect.x, rect.y, rect.width, rect.height
            ),
            PaintCommand::Text {
                x,
                y,
                lines,
                line_height,
                family,
                weight,
                size,
                fill,
            } => {
                let _ = write!(
                    svg,
                    r#"<text font-family="{}" font-weight="{weight}" font-size="{size:.2}" fill="{fill}">"#,
                    escape(family)
                );

                for (index, line) in lines.iter().enumerate() {
                    let _ = write!(
                        svg,
                        r#"<tspan x="{x:.2}" y="{:.2}">{}</tspan>"#,
                        y + index as f32 * line_height,
                        escape(line)
                    );
                }

                svg.write_str("</text>")
            }
            PaintCommand::Image { rect, href } => write!(
                svg,
                r#"<image x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="xMidYMid slice" xlink:href="{}"/>"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                escape(href)
            ),
        };
    }

    svg.push_str("</svg>");
    svg
}
