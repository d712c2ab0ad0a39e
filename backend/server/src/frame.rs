//! # Frame
//!
//! Frame state, actions and the metadata document served at `/`.
//!
//! ## State
//! The only state is the current `query`. It round-trips through the post
//! URL as a protobuf message, base64url encoded without padding, so nothing
//! is stored server side. A missing `state` parameter is the empty state.
//!
//! ## Buttons
//! 1. `Chat in Converse`: link to the agent's Converse DM, never posts back
//! 2. `Submit`: posts the text input, which becomes the new query
//!
//! ## Flow
//! - First load renders the default card with an empty query
//! - Each submit re-asks the agent, the previous answer is not kept
//! - The answer only lives in the image URL
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use prost::Message;
use serde::Deserialize;
use url::Url;

use crate::{config::Config, error::AppError, render::card::DEFAULT_TITLE, utils::escape};

pub const SUBMIT_BUTTON: u32 = 2;

pub const INITIAL_PLACEHOLDER: &str = "Type your question...";
pub const FOLLOWUP_PLACEHOLDER: &str = "Ask a followup...";
pub const LINK_LABEL: &str = "Chat in Converse";
pub const SUBMIT_LABEL: &str = "Submit";
pub const ASPECT_RATIO: &str = "1.91:1";

#[derive(Clone, PartialEq, Message)]
pub struct FrameState {
    #[prost(string, tag = "1")]
    pub query: String,
}

impl FrameState {
    pub fn encode_state(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.encode_to_vec())
    }

    pub fn decode_state(encoded: Option<&str>) -> Result<Self, AppError> {
        let Some(encoded) = encoded.filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AppError::MalformedPayload)?;

        Self::decode(bytes.as_slice()).map_err(|_| AppError::MalformedPayload)
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }
}

/// Body posted by the client when a button is pressed.
///
/// Only the untrusted fields the frame reads are kept. `trustedData` is not
/// verified, so it is not deserialized either.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FrameAction {
    pub untrusted_data: UntrustedData,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UntrustedData {
    pub fid: Option<u64>,
    pub button_index: Option<u32>,
    pub input_text: Option<String>,
}

/// Empty bodies carry no action.
pub fn parse_action(body: &[u8]) -> Result<Option<FrameAction>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|_| AppError::MalformedPayload)
}

/// Applies a button press to the state.
///
/// Only `Submit` posts back, so an action without a button index is treated as a submit.
pub fn apply_action(state: FrameState, action: &FrameAction) -> FrameState {
    let data = &action.untrusted_data;

    match data.button_index.unwrap_or(SUBMIT_BUTTON) {
        SUBMIT_BUTTON => FrameState {
            query: data.input_text.clone().unwrap_or_default(),
        },
        _ => state,
    }
}

pub fn placeholder(state: &FrameState) -> &'static str {
    if state.has_query() {
        FOLLOWUP_PLACEHOLDER
    } else {
        INITIAL_PLACEHOLDER
    }
}

/// Everything the client needs to draw the next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image: Url,
    pub placeholder: &'static str,
    pub link: String,
    pub post_url: Url,
}

impl Frame {
    pub fn new(config: &Config, state: &FrameState, response: &str) -> Result<Self, AppError> {
        let image = Url::parse_with_params(
            &format!("{}/image", config.origin),
            &[("query", state.query.as_str()), ("response", response)],
        )
        .map_err(|e| AppError::InternalError(e.into()))?;

        let post_url = Url::parse_with_params(
            &format!("{}/", config.origin),
            &[("state", state.encode_state())],
        )
        .map_err(|e| AppError::InternalError(e.into()))?;

        Ok(Self {
            image,
            placeholder: placeholder(state),
            link: config.converse_url.clone(),
            post_url,
        })
    }

    pub fn tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("og:title", DEFAULT_TITLE.to_string()),
            ("og:image", self.image.to_string()),
            ("fc:frame", "vNext".to_string()),
            ("fc:frame:image", self.image.to_string()),
            ("fc:frame:image:aspect_ratio", ASPECT_RATIO.to_string()),
            ("fc:frame:input:text", self.placeholder.to_string()),
            ("fc:frame:button:1", LINK_LABEL.to_string()),
            ("fc:frame:button:1:action", "link".to_string()),
            ("fc:frame:button:1:target", self.link.clone()),
            ("fc:frame:button:2", SUBMIT_LABEL.to_string()),
            ("fc:frame:button:2:action", "post".to_string()),
            ("fc:frame:post_url", self.post_url.to_string()),
        ]
    }

    pub fn to_html(&self) -> String {
        let meta: String = self
            .tags()
            .iter()
            .map(|(property, content)| {
                format!(
                    "    <meta property=\"{property}\" content=\"{}\" />\n",
                    escape(content)
                )
            })
            .collect();

        format!(
            "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\" />\n    <title>{DEFAULT_TITLE}</title>\n{meta}  </head>\n  <body></body>\n</html>\n"
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{path::PathBuf, time::Duration};

    use super::{
        FOLLOWUP_PLACEHOLDER, Frame, FrameAction, FrameState, INITIAL_PLACEHOLDER, apply_action,
        parse_action, placeholder,
    };
    use crate::{config::Config, error::AppError};

    pub(crate) fn config() -> Config {
        Config {
            port: 3000,
            origin: "https://frame.example".to_string(),
            agent_url: "http://127.0.0.1:9".to_string(),
            agent_timeout: Duration::from_millis(100),
            illustration_url: "http://127.0.0.1:9/farcaster.png".to_string(),
            illustration_timeout: Duration::from_millis(100),
            converse_url: "https://converse.xyz/dm/agent".to_string(),
            font_dir: PathBuf::from("."),
        }
    }

    fn action(body: &str) -> FrameAction {
        parse_action(body.as_bytes()).unwrap().unwrap()
    }

    #[test]
    fn test_state_round_trip() {
        for query in ["", "gm", "What's a channel? ✨ & more"] {
            let state = FrameState {
                query: query.to_string(),
            };
            let encoded = state.encode_state();

            assert_eq!(FrameState::decode_state(Some(encoded.as_str())).unwrap(), state);
        }
    }

    #[test]
    fn test_missing_state() {
        assert_eq!(FrameState::decode_state(None).unwrap(), FrameState::default());
        assert_eq!(FrameState::decode_state(Some("")).unwrap(), FrameState::default());
    }

    #[test]
    fn test_malformed_state() {
        assert!(matches!(
            FrameState::decode_state(Some("not base64!")),
            Err(AppError::MalformedPayload)
        ));
        assert!(matches!(
            FrameState::decode_state(Some("_____")),
            Err(AppError::MalformedPayload)
        ));
    }

    #[test]
    fn test_parse_action() {
        assert!(parse_action(b"").unwrap().is_none());
        assert!(parse_action(b"  \n").unwrap().is_none());
        assert!(matches!(
            parse_action(b"{\"untrusted\":"),
            Err(AppError::MalformedPayload)
        ));

        let action = action(
            r#"{
                "untrustedData": {
                    "fid": 2,
                    "url": "https://frame.example",
                    "messageHash": "0xd2b1ddc6c88e865a33cb1a565e0058d757042974",
                    "timestamp": 1706243218,
                    "network": 1,
                    "buttonIndex": 2,
                    "inputText": "how do channels work?",
                    "castId": { "fid": 226, "hash": "0xa48dd46161d8e57725f5e26e34ec19c13ff7f3b9" }
                },
                "trustedData": { "messageBytes": "d2b1ddc6c88e865a33cb1a565e0058d757042974" }
            }"#,
        );

        assert_eq!(action.untrusted_data.fid, Some(2));
        assert_eq!(
            action.untrusted_data.input_text.as_deref(),
            Some("how do channels work?")
        );
        assert_eq!(action.untrusted_data.button_index, Some(2));
    }

    #[test]
    fn test_submit_sets_query() {
        let state = FrameState {
            query: "old question".to_string(),
        };
        let submit = action(r#"{"untrustedData":{"buttonIndex":2,"inputText":"new question"}}"#);

        assert_eq!(apply_action(state, &submit).query, "new question");
    }

    #[test]
    fn test_submit_without_text() {
        let state = FrameState {
            query: "old question".to_string(),
        };
        let submit = action(r#"{"untrustedData":{"buttonIndex":2}}"#);

        assert_eq!(apply_action(state, &submit), FrameState::default());
    }

    #[test]
    fn test_other_button_keeps_state() {
        let state = FrameState {
            query: "old question".to_string(),
        };
        let other = action(r#"{"untrustedData":{"buttonIndex":1,"inputText":"ignored"}}"#);

        assert_eq!(apply_action(state.clone(), &other), state);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder(&FrameState::default()), INITIAL_PLACEHOLDER);
        assert_eq!(
            placeholder(&FrameState {
                query: "gm".to_string()
            }),
            FOLLOWUP_PLACEHOLDER
        );
    }

    #[test]
    fn test_frame_urls() {
        let state = FrameState {
            query: "fees & storage?".to_string(),
        };
        let frame = Frame::new(&config(), &state, "About $7 a year.").unwrap();

        let pairs: Vec<(String, String)> = frame.image.query_pairs().into_owned().collect();
        assert_eq!(frame.image.path(), "/image");
        assert_eq!(
            pairs,
            vec![
                ("query".to_string(), "fees & storage?".to_string()),
                ("response".to_string(), "About $7 a year.".to_string()),
            ]
        );

        let (key, encoded) = frame.post_url.query_pairs().next().unwrap();
        assert_eq!(key, "state");
        assert_eq!(FrameState::decode_state(Some(&*encoded)).unwrap(), state);
    }

    #[test]
    fn test_initial_html() {
        let frame = Frame::new(&config(), &FrameState::default(), "").unwrap();
        let html = frame.to_html();

        assert!(html.contains(r#"<meta property="fc:frame" content="vNext" />"#));
        assert!(html.contains(
            r#"<meta property="fc:frame:image" content="https://frame.example/image?query=&amp;response=" />"#
        ));
        assert!(html.contains(r#"<meta property="fc:frame:input:text" content="Type your question..." />"#));
        assert!(html.contains(r#"<meta property="fc:frame:button:1:target" content="https://converse.xyz/dm/agent" />"#));
        assert!(html.contains(r#"<meta property="fc:frame:button:2" content="Submit" />"#));
        assert!(html.contains(r#"<meta property="fc:frame:post_url" content="https://frame.example/?state=" />"#));
    }
}
