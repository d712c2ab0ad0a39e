//! # Layout
//!
//! A small flexbox subset, enough for fixed cards.
//!
//! - Containers lay children out along a row or a column
//! - Children with `grow` share the free main-axis space by ratio, the rest keep their intrinsic size
//! - The cross axis always stretches to the container
//! - `SpaceBetween` spreads leftover space between children when nothing grows
//! - Text wraps on whitespace to the width of its box
//!
//! Overflow is never an error: content that does not fit is placed past the
//! edge of its box and clipped by the canvas.
use super::{
    fonts::{Fonts, Weight},
    paint::PaintCommand,
};

pub const LINE_HEIGHT: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    fn inset(&self, padding: f32) -> Self {
        Self {
            x: self.x + padding,
            y: self.y + padding,
            width: (self.width - padding * 2.0).max(0.0),
            height: (self.height - padding * 2.0).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Justify {
    #[default]
    Start,
    SpaceBetween,
}

#[derive(Debug, Clone, Default)]
pub struct Style {
    pub direction: Direction,
    pub justify: Justify,
    pub grow: f32,
    pub gap: f32,
    pub padding: f32,
    pub background: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub enum Node {
    Flex {
        style: Style,
        children: Vec<Node>,
    },
    Text {
        text: String,
        weight: Weight,
        size: f32,
        color: &'static str,
    },
    /// Covers its whole box, cropping to keep the aspect ratio.
    Image { href: String, grow: f32 },
}

impl Node {
    fn grow(&self) -> f32 {
        match self {
            Node::Flex { style, .. } => style.grow,
            Node::Text { .. } => 0.0,
            Node::Image { grow, .. } => *grow,
        }
    }

    /// Width when laid out without wrapping.
    fn intrinsic_width(&self, fonts: &Fonts) -> f32 {
        match self {
            Node::Flex { style, children } => {
                let widths = children.iter().map(|child| child.intrinsic_width(fonts));

                let content = match style.direction {
                    Direction::Row => widths.sum::<f32>() + gaps(style.gap, children.len()),
                    Direction::Column => widths.fold(0.0, f32::max),
                };

                content + style.padding * 2.0
            }
            Node::Text {
                text, weight, size, ..
            } => fonts.face(*weight).width(text, *size),
            Node::Image { .. } => 0.0,
        }
    }

    /// Height when constrained to `width`.
    fn intrinsic_height(&self, width: f32, fonts: &Fonts) -> f32 {
        match self {
            Node::Flex { style, children } => {
                let inner = (width - style.padding * 2.0).max(0.0);
                let heights = children
                    .iter()
                    .map(|child| child.intrinsic_height(inner, fonts));

                let content = match style.direction {
                    Direction::Column => heights.sum::<f32>() + gaps(style.gap, children.len()),
                    Direction::Row => heights.fold(0.0, f32::max),
                };

                content + style.padding * 2.0
            }
            Node::Text {
                text, weight, size, ..
            } => {
                let lines = wrap(text, width, |line| fonts.face(*weight).width(line, *size));
                lines.len().max(1) as f32 * size * LINE_HEIGHT
            }
            Node::Image { .. } => 0.0,
        }
    }
}

/// Places `node` inside `rect` and returns the paint commands in drawing order.
pub fn layout(node: &Node, rect: Rect, fonts: &Fonts) -> Vec<PaintCommand> {
    let mut commands = Vec::new();
    place(node, rect, fonts, &mut commands);

    commands
}

fn place(node: &Node, rect: Rect, fonts: &Fonts, commands: &mut Vec<PaintCommand>) {
    match node {
        Node::Flex { style, children } => {
            if let Some(fill) = style.background {
                commands.push(PaintCommand::Rect { rect, fill });
            }

            let inner = rect.inset(style.padding);
            for (child, child_rect) in children
                .iter()
                .zip(flex_boxes(style, children, inner, fonts))
            {
                place(child, child_rect, fonts, commands);
            }
        }
        Node::Text {
            text,
            weight,
            size,
            color,
        } => {
            let face = fonts.face(*weight);
            let line_height = size * LINE_HEIGHT;

            commands.push(PaintCommand::Text {
                x: rect.x,
                y: rect.y + (line_height - size) / 2.0 + face.ascent(*size),
                lines: wrap(text, rect.width, |line| face.width(line, *size)),
                line_height,
                family: face.family.clone(),
                weight: face.weight,
                size: *size,
                fill: *color,
            });
        }
        Node::Image { href, .. } => commands.push(PaintCommand::Image {
            rect,
            href: href.clone(),
        }),
    }
}

fn flex_boxes(style: &Style, children: &[Node], inner: Rect, fonts: &Fonts) -> Vec<Rect> {
    let (start, available) = match style.direction {
        Direction::Row => (inner.x, inner.width),
        Direction::Column => (inner.y, inner.height),
    };

    let bases: Vec<f32> = children
        .iter()
        .map(|child| match (child.grow() > 0.0, style.direction) {
            (true, _) => 0.0,
            (false, Direction::Row) => child.intrinsic_width(fonts),
            (false, Direction::Column) => child.intrinsic_height(inner.width, fonts),
        })
        .collect();

    let free = (available - bases.iter().sum::<f32>() - gaps(style.gap, children.len())).max(0.0);
    let total_grow: f32 = children.iter().map(Node::grow).sum();

    let spacing = match style.justify {
        Justify::SpaceBetween if total_grow == 0.0 && children.len() > 1 => {
            style.gap + free / (children.len() - 1) as f32
        }
        _ => style.gap,
    };

    let mut cursor = start;
    children
        .iter()
        .zip(bases)
        .map(|(child, base)| {
            let size = if total_grow > 0.0 {
                base + free * child.grow() / total_grow
            } else {
                base
            };

            let rect = match style.direction {
                Direction::Row => Rect {
                    x: cursor,
                    y: inner.y,
                    width: size,
                    height: inner.height,
                },
                Direction::Column => Rect {
                    x: inner.x,
                    y: cursor,
                    width: inner.width,
                    height: size,
                },
            };

            cursor += size + spacing;
            rect
        })
        .collect()
}

fn gaps(gap: f32, count: usize) -> f32 {
    gap * count.saturating_sub(1) as f32
}

/// Greedy word wrap. A word wider than `width` gets a line of its own.
pub fn wrap(text: &str, width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) > width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::{Direction, Justify, Node, Rect, Style, layout, wrap};
    use crate::render::{
        fonts::{Fonts, Weight},
        paint::PaintCommand,
    };

    fn text(text: &str) -> Node {
        Node::Text {
            text: text.to_string(),
            weight: Weight::Regular,
            size: 10.0,
            color: "#000000",
        }
    }

    fn rects(commands: &[PaintCommand]) -> Vec<Rect> {
        commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::Rect { rect, .. } | PaintCommand::Image { rect, .. } => Some(*rect),
                PaintCommand::Text { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_wrap() {
        let measure = |line: &str| line.len() as f32;

        assert_eq!(
            wrap("the quick brown fox", 10.0, measure),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap("  spaced   out  ", 100.0, measure), vec!["spaced out"]);
        assert_eq!(
            wrap("a incomprehensibilities b", 5.0, measure),
            vec!["a", "incomprehensibilities", "b"]
        );
        assert!(wrap("", 10.0, measure).is_empty());
    }

    #[test]
    fn test_grow_ratio() {
        let panel = |grow: f32| Node::Flex {
            style: Style {
                grow,
                background: Some("#ffffff"),
                ..Default::default()
            },
            children: vec![],
        };
        let root = Node::Flex {
            style: Style::default(),
            children: vec![panel(6.0), panel(4.0)],
        };

        let boxes = rects(&layout(&root, Rect::new(100.0, 50.0), &Fonts::estimated()));

        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].width, 60.0);
        assert_eq!(boxes[1].x, 60.0);
        assert_eq!(boxes[1].width, 40.0);
        assert_eq!(boxes[1].height, 50.0);
    }

    #[test]
    fn test_space_between() {
        let root = Node::Flex {
            style: Style {
                direction: Direction::Column,
                justify: Justify::SpaceBetween,
                padding: 10.0,
                ..Default::default()
            },
            children: vec![text("top"), text("bottom")],
        };

        let commands = layout(&root, Rect::new(200.0, 100.0), &Fonts::estimated());
        let baselines: Vec<f32> = commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();

        // Line height 12, half leading 1, estimated ascent 8.
        assert_eq!(baselines.len(), 2);
        assert!((baselines[0] - 19.0).abs() < 1e-3);
        assert!((baselines[1] - 87.0).abs() < 1e-3);
    }

    #[test]
    fn test_text_wraps_to_box() {
        let root = Node::Flex {
            style: Style {
                padding: 5.0,
                ..Default::default()
            },
            children: vec![Node::Flex {
                style: Style {
                    grow: 1.0,
                    direction: Direction::Column,
                    ..Default::default()
                },
                children: vec![text("one two three four")],
            }],
        };

        // Estimated advance is 5 per char at size 10, leaving 60 for text.
        let commands = layout(&root, Rect::new(70.0, 100.0), &Fonts::estimated());

        match &commands[..] {
            [PaintCommand::Text { x, lines, .. }] => {
                assert_eq!(*x, 5.0);
                assert_eq!(lines, &vec!["one two", "three four"]);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn test_overflow_is_placed() {
        let root = Node::Flex {
            style: Style {
                direction: Direction::Column,
                ..Default::default()
            },
            children: (0..20).map(|_| text("line")).collect(),
        };

        let commands = layout(&root, Rect::new(100.0, 50.0), &Fonts::estimated());

        assert_eq!(commands.len(), 20);
    }
}
