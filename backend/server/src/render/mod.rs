//! # Rendering
//!
//! Turns a [`Card`] into the PNG shown in the frame.
//!
//! ```text
//! Card ──► layout tree ──► paint commands ──► SVG ──► PNG
//!            card.rs         layout.rs        paint.rs  raster.rs
//! ```
//!
//! The output is always [`WIDTH`] x [`HEIGHT`] (1.91:1, the frame image ratio).
//! Identical cards produce identical bytes.
//!
//! Every failure is a [`AppError`], there is no fallback image.
pub mod card;
pub mod fonts;
pub mod layout;
pub mod paint;
pub mod raster;

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, header::CONTENT_TYPE};

use crate::error::AppError;
use card::Card;
use fonts::Fonts;
use layout::{Rect, layout};
use paint::{PaintCommand, to_svg};

pub const WIDTH: u32 = 896;
pub const HEIGHT: u32 = 469;

/// Image drawn in the right panel, embedded into the SVG as a data URI.
#[derive(Debug, Clone)]
pub struct Illustration {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Illustration {
    pub fn new(mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.to_string(),
            bytes,
        }
    }

    /// A host that does not answer within `timeout` is a fetch failure.
    pub async fn fetch(client: &Client, url: &str, timeout: Duration) -> Result<Self, AppError> {
        let response = client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .filter(|mime| mime.starts_with("image/"))
            .unwrap_or("image/png")
            .to_string();

        let bytes = response.bytes().await?.to_vec();

        Ok(Self { mime, bytes })
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

pub fn paint_card(fonts: &Fonts, card: &Card, illustration: &Illustration) -> Vec<PaintCommand> {
    let tree = card.tree(&illustration.data_uri());

    layout(&tree, Rect::new(WIDTH as f32, HEIGHT as f32), fonts)
}

pub fn render_svg(fonts: &Fonts, card: &Card, illustration: &Illustration) -> String {
    to_svg(&paint_card(fonts, card, illustration), WIDTH, HEIGHT)
}

pub fn render_card(
    fonts: &Fonts,
    card: &Card,
    illustration: &Illustration,
) -> Result<Vec<u8>, AppError> {
    raster::rasterize(&render_svg(fonts, card, illustration), fonts, WIDTH, HEIGHT)
}
