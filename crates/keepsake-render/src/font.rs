use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use thiserror::Error;
use tracing::{debug, warn};

/// Cell size of the built-in bitmap font.
const BITMAP_CELL: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Title,
    Message,
    Footer,
}

impl FontRole {
    pub const ALL: [FontRole; 3] = [FontRole::Title, FontRole::Message, FontRole::Footer];

    /// File name of the preferred face for this role.
    pub fn preferred_file(self) -> &'static str {
        match self {
            FontRole::Title => "PlayfairDisplay-Bold.ttf",
            FontRole::Message => "PlayfairDisplay-Italic.ttf",
            FontRole::Footer => "PlayfairDisplay-Regular.ttf",
        }
    }
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("cannot read font file: {0}")]
    Read(#[from] std::io::Error),

    #[error("not a usable font: {0}")]
    Parse(#[from] ab_glyph::InvalidFont),
}

/// A loaded face: a TrueType/OpenType outline font or the built-in 8x8
/// bitmap font, which needs no files and is always available.
#[derive(Clone)]
pub enum Typeface {
    Outline(Arc<FontVec>),
    Builtin,
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typeface::Outline(font) => write!(f, "Typeface::Outline({} glyphs)", font.glyph_count()),
            Typeface::Builtin => f.write_str("Typeface::Builtin"),
        }
    }
}

impl Typeface {
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)?;
        Ok(Typeface::Outline(Arc::new(font)))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Typeface::Builtin)
    }

    /// Advance width of a single line of text at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        match self {
            Typeface::Outline(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                let mut width = 0.0;
                let mut prev: Option<GlyphId> = None;
                for c in text.chars().filter(|c| !c.is_control()) {
                    let id = font.glyph_id(c);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            Typeface::Builtin => {
                let cell = bitmap_scale(size) * BITMAP_CELL;
                (text.chars().filter(|c| !c.is_control()).count() as u32 * cell) as f32
            }
        }
    }

    /// Draws a line of text with its top-left corner at (`left`, `top`),
    /// reporting each touched pixel with a coverage in `0.0..=1.0`.
    pub fn draw<F>(&self, text: &str, size: f32, left: f32, top: f32, mut plot: F)
    where
        F: FnMut(i64, i64, f32),
    {
        match self {
            Typeface::Outline(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                let baseline = top + scaled.ascent();
                let mut caret = left;
                let mut prev: Option<GlyphId> = None;

                for c in text.chars().filter(|c| !c.is_control()) {
                    let id = font.glyph_id(c);
                    if let Some(p) = prev {
                        caret += scaled.kern(p, id);
                    }
                    let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
                    caret += scaled.h_advance(id);
                    prev = Some(id);

                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        let (ox, oy) = (bounds.min.x as i64, bounds.min.y as i64);
                        outlined.draw(|gx, gy, coverage| plot(ox + gx as i64, oy + gy as i64, coverage));
                    }
                }
            }
            Typeface::Builtin => {
                let scale = bitmap_scale(size);
                let cell = scale * BITMAP_CELL;
                let (left, top) = (left.round() as i64, top.round() as i64);

                for (i, c) in text.chars().filter(|c| !c.is_control()).enumerate() {
                    let rows = bitmap_glyph(c);
                    let cx = left + (i as u32 * cell) as i64;
                    for (r, bits) in rows.iter().enumerate() {
                        for bit in 0..BITMAP_CELL {
                            if bits & (1 << bit) == 0 {
                                continue;
                            }
                            let px = cx + (bit * scale) as i64;
                            let py = top + (r as u32 * scale) as i64;
                            for dy in 0..scale as i64 {
                                for dx in 0..scale as i64 {
                                    plot(px + dx, py + dy, 1.0);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Integer magnification of the 8x8 bitmap font for a nominal pixel size.
fn bitmap_scale(size: f32) -> u32 {
    (size / 20.0).round().max(1.0) as u32
}

fn bitmap_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Maps a font role to a face. Implementations may touch the filesystem;
/// everything downstream of resolution is deterministic.
pub trait FontResolver {
    fn resolve(&self, role: FontRole) -> Typeface;
}

/// Always answers with the built-in bitmap font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinResolver;

impl FontResolver for BuiltinResolver {
    fn resolve(&self, _role: FontRole) -> Typeface {
        Typeface::Builtin
    }
}

/// Looks for the role's preferred face in `font_dir`, then the optional
/// secondary font file, then gives up on files and uses the built-in font.
#[derive(Debug, Clone)]
pub struct FsFontResolver {
    font_dir: PathBuf,
    fallback: Option<PathBuf>,
}

impl FsFontResolver {
    pub fn new(font_dir: impl Into<PathBuf>, fallback: Option<PathBuf>) -> Self {
        Self {
            font_dir: font_dir.into(),
            fallback,
        }
    }
}

impl FontResolver for FsFontResolver {
    fn resolve(&self, role: FontRole) -> Typeface {
        let preferred = self.font_dir.join(role.preferred_file());
        match Typeface::load(&preferred) {
            Ok(face) => {
                debug!("{:?} font: {}", role, preferred.display());
                return face;
            }
            Err(e) => warn!("Font not found at {} ({}); trying fallback", preferred.display(), e),
        }

        if let Some(fallback) = &self.fallback {
            match Typeface::load(fallback) {
                Ok(face) => return face,
                Err(e) => warn!("Fallback font {} unusable ({})", fallback.display(), e),
            }
        }

        warn!("Using built-in bitmap font for {:?} text", role);
        Typeface::Builtin
    }
}

/// One resolved face per role.
#[derive(Debug, Clone)]
pub struct FontSet {
    title: Typeface,
    message: Typeface,
    footer: Typeface,
}

impl FontSet {
    pub fn resolve(resolver: &dyn FontResolver) -> Self {
        Self {
            title: resolver.resolve(FontRole::Title),
            message: resolver.resolve(FontRole::Message),
            footer: resolver.resolve(FontRole::Footer),
        }
    }

    /// Environment-independent fonts for headless rendering.
    pub fn builtin() -> Self {
        Self::resolve(&BuiltinResolver)
    }

    pub fn get(&self, role: FontRole) -> &Typeface {
        match role {
            FontRole::Title => &self.title,
            FontRole::Message => &self.message,
            FontRole::Footer => &self.footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_measures_fixed_cells() {
        let face = Typeface::Builtin;
        assert_eq!(face.measure("abc", 20.0), 24.0);
        assert_eq!(face.measure("abc", 40.0), 48.0);
        assert_eq!(face.measure("", 40.0), 0.0);
        // tiny sizes never collapse to zero width
        assert_eq!(face.measure("a", 1.0), 8.0);
    }

    #[test]
    fn builtin_draw_stays_inside_measured_box() {
        let face = Typeface::Builtin;
        let width = face.measure("Hi!", 40.0) as i64;
        let mut touched = 0;
        face.draw("Hi!", 40.0, 10.0, 5.0, |x, y, coverage| {
            assert!((10..10 + width).contains(&x));
            assert!((5..5 + 16).contains(&y));
            assert_eq!(coverage, 1.0);
            touched += 1;
        });
        assert!(touched > 0);
    }

    #[test]
    fn unknown_characters_fall_back_to_a_glyph() {
        assert_eq!(bitmap_glyph('\u{1F496}'), bitmap_glyph('?'));
        assert_ne!(bitmap_glyph('é'), bitmap_glyph('?'));
    }

    #[test]
    fn load_reports_typed_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ttf");
        assert!(matches!(Typeface::load(&missing), Err(FontError::Read(_))));

        let corrupt = dir.path().join("corrupt.ttf");
        std::fs::write(&corrupt, b"not a font").unwrap();
        assert!(matches!(Typeface::load(&corrupt), Err(FontError::Parse(_))));
    }

    #[test]
    fn missing_font_files_resolve_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FsFontResolver::new(dir.path(), Some(dir.path().join("arial.ttf")));

        for role in FontRole::ALL {
            assert!(resolver.resolve(role).is_builtin());
        }
    }

    #[test]
    fn corrupt_font_file_resolves_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FontRole::Title.preferred_file()), b"not a font").unwrap();

        let fonts = FontSet::resolve(&FsFontResolver::new(dir.path(), None));
        assert!(fonts.get(FontRole::Title).is_builtin());
    }
}
