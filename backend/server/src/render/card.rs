//! The answer card shown in the frame.
//!
//! ```text
//! ┌──────────────────────────────┬─────────────────────┐
//! │ Query (title)                │                     │
//! │ Response (body)              │    illustration     │
//! │                              │                     │
//! │ Built by @gregfromstl        │                     │
//! └──────────────────────────────┴─────────────────────┘
//!               6                           4
//! ```
use super::{
    fonts::Weight,
    layout::{Direction, Justify, Node, Style},
};
use crate::utils::present;

pub const DEFAULT_TITLE: &str = "Farcaster Support Agent";
pub const DEFAULT_BODY: [&str; 2] = [
    "This agent has been trained to answer your questions based on the Farcaster docs.",
    "Click \"Chat in Converse\" to talk to the agent via XMTP, powered by Operator.",
];
pub const FOOTER: &str = "Built by @gregfromstl";

const BACKGROUND: &str = "#ffffff";
const PANEL: &str = "#f2f2f2";
const TITLE_COLOR: &str = "#000000";
const BODY_COLOR: &str = "#303030";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    pub query: Option<String>,
    pub response: Option<String>,
}

impl Card {
    /// Empty strings count as missing and fall back to the default copy.
    pub fn new(query: Option<String>, response: Option<String>) -> Self {
        Self {
            query: present(query),
            response: present(response),
        }
    }

    pub fn title(&self) -> &str {
        self.query.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn tree(&self, illustration: &str) -> Node {
        let heading = Node::Flex {
            style: Style {
                direction: Direction::Column,
                gap: 8.0,
                ..Default::default()
            },
            children: vec![text(self.title(), Weight::Semibold, 28.0, TITLE_COLOR), self.body()],
        };

        let column = Node::Flex {
            style: Style {
                direction: Direction::Column,
                justify: Justify::SpaceBetween,
                grow: 6.0,
                padding: 54.0,
                ..Default::default()
            },
            children: vec![heading, text(FOOTER, Weight::Regular, 16.0, TITLE_COLOR)],
        };

        let panel = Node::Flex {
            style: Style {
                direction: Direction::Column,
                grow: 4.0,
                background: Some(PANEL),
                ..Default::default()
            },
            children: vec![Node::Image {
                href: illustration.to_string(),
                grow: 1.0,
            }],
        };

        Node::Flex {
            style: Style {
                background: Some(BACKGROUND),
                ..Default::default()
            },
            children: vec![column, panel],
        }
    }

    fn body(&self) -> Node {
        match &self.response {
            Some(response) => text(response, Weight::Regular, 20.0, BODY_COLOR),
            None => Node::Flex {
                style: Style {
                    direction: Direction::Column,
                    gap: 12.0,
                    ..Default::default()
                },
                children: DEFAULT_BODY
                    .iter()
                    .map(|line| text(line, Weight::Regular, 20.0, BODY_COLOR))
                    .collect(),
            },
        }
    }
}

fn text(text: &str, weight: Weight, size: f32, color: &'static str) -> Node {
    Node::Text {
        text: text.to_string(),
        weight,
        size,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, DEFAULT_TITLE};

    #[test]
    fn test_empty_is_default() {
        let card = Card::new(Some(String::new()), None);

        assert_eq!(card, Card::default());
        assert_eq!(card.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_query_is_title() {
        let card = Card::new(Some("How do I cast?".to_string()), Some("Tap the button.".to_string()));

        assert_eq!(card.title(), "How do I cast?");
        assert_eq!(card.response.as_deref(), Some("Tap the button."));
    }
}
