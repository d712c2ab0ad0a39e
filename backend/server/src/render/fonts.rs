//! # Fonts
//!
//! The card uses two faces of Nunito Sans, read from disk once at startup.
//!
//! Each face is registered twice:
//! - In a `fontdb` database handed to `usvg`, which shapes and draws the text
//! - Kept as raw bytes so layout can measure glyph advances with `ttf-parser`
//!
//! Both must agree on the family name and weight, so those are read from the
//! font itself rather than hardcoded.
use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Error, anyhow};
use resvg::usvg::fontdb::{Database, Source};
use tracing::info;
use ttf_parser::{Face, GlyphId, name_id};

pub const REGULAR_FONT: &str = "NunitoSansRegular.ttf";
pub const SEMIBOLD_FONT: &str = "NunitoSansSemibold.ttf";

// Rough advance and ascent as a fraction of the font size, used without font data.
const ESTIMATED_ADVANCE: f32 = 0.5;
const ESTIMATED_ASCENT: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Semibold,
}

#[derive(Clone, Debug)]
pub struct FontFace {
    pub family: String,
    pub weight: u16,
    data: Option<Arc<Vec<u8>>>,
}

impl FontFace {
    pub fn parse(data: Arc<Vec<u8>>) -> Result<Self, Error> {
        let face = Face::parse(&data, 0)?;

        let family = family_name(&face).ok_or_else(|| anyhow!("Font has no family name"))?;
        let weight = face.weight().to_number();

        Ok(Self {
            family,
            weight,
            data: Some(data),
        })
    }

    /// Face without font data. Widths and ascent are estimated from the size.
    pub fn estimated(family: &str, weight: u16) -> Self {
        Self {
            family: family.to_string(),
            weight,
            data: None,
        }
    }

    pub fn width(&self, text: &str, size: f32) -> f32 {
        let Some(face) = self.face() else {
            return text.chars().count() as f32 * size * ESTIMATED_ADVANCE;
        };

        let units: u32 = text
            .chars()
            .map(|c| {
                let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
                face.glyph_hor_advance(glyph).unwrap_or(0) as u32
            })
            .sum();

        units as f32 * size / face.units_per_em() as f32
    }

    pub fn ascent(&self, size: f32) -> f32 {
        match self.face() {
            Some(face) => face.ascender() as f32 * size / face.units_per_em() as f32,
            None => size * ESTIMATED_ASCENT,
        }
    }

    fn face(&self) -> Option<Face<'_>> {
        self.data
            .as_deref()
            .and_then(|data| Face::parse(data, 0).ok())
    }
}

pub struct Fonts {
    pub regular: FontFace,
    pub semibold: FontFace,
    database: Arc<Database>,
}

impl Fonts {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        Self::load_files(&dir.join(REGULAR_FONT), &dir.join(SEMIBOLD_FONT))
    }

    pub fn load_files(regular: &Path, semibold: &Path) -> Result<Self, Error> {
        let mut database = Database::new();

        let regular = load_face(&mut database, regular)?;
        let semibold = load_face(&mut database, semibold)?;

        Ok(Self {
            regular,
            semibold,
            database: Arc::new(database),
        })
    }

    /// Fonts with estimated metrics and an empty database. Text is laid out but not drawn.
    pub fn estimated() -> Self {
        Self {
            regular: FontFace::estimated("Nunito Sans", 400),
            semibold: FontFace::estimated("Nunito Sans", 600),
            database: Arc::new(Database::new()),
        }
    }

    pub fn face(&self, weight: Weight) -> &FontFace {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Semibold => &self.semibold,
        }
    }

    pub fn database(&self) -> Arc<Database> {
        self.database.clone()
    }
}

fn load_face(database: &mut Database, path: &Path) -> Result<FontFace, Error> {
    let data = Arc::new(
        fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?,
    );

    let face =
        FontFace::parse(data.clone()).with_context(|| format!("Invalid font {}", path.display()))?;
    database.load_font_source(Source::Binary(data));

    info!("Loaded font {} ({} {})", path.display(), face.family, face.weight);

    Ok(face)
}

// fontdb prefers the typographic family, so match it.
fn family_name(face: &Face) -> Option<String> {
    [name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY]
        .into_iter()
        .find_map(|id| {
            face.names()
                .into_iter()
                .filter(|name| name.name_id == id && name.is_unicode())
                .find_map(|name| name.to_string())
        })
}
