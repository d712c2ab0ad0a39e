use std::{env, fs, path::PathBuf};

use anyhow::{Context, Error};
use frame::{
    config::{ILLUSTRATION_TIMEOUT, ILLUSTRATION_URL},
    render::{Illustration, card::Card, fonts::Fonts, render_card},
};
use reqwest::Client;

/// Renders one card to `../card.png`.
///
/// Usage: `tester [query] [response]`
#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut args = env::args().skip(1);
    let card = Card::new(args.next(), args.next());

    let font_dir = env::var("FONT_DIR").map_or_else(|_| PathBuf::from("."), PathBuf::from);
    let fonts = Fonts::load(&font_dir)?;

    let url = env::var("ILLUSTRATION_URL").unwrap_or_else(|_| ILLUSTRATION_URL.to_string());
    let illustration = Illustration::fetch(&Client::new(), &url, ILLUSTRATION_TIMEOUT)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    let png = render_card(&fonts, &card, &illustration)?;
    fs::write("../card.png", &png).context("Failed to write ../card.png")?;

    println!("Wrote ../card.png ({} bytes) for \"{}\"", png.len(), card.title());

    Ok(())
}
