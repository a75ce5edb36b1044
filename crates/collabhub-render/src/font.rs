//! Label font discovery.
//!
//! An explicitly configured font must load. Without one, a few common system
//! locations are probed; if none has a usable font, labels are drawn as empty
//! boxes and a warning is logged.

use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use tracing::{debug, warn};

use crate::png::RenderError;

/// Probed in order when no font is configured.
pub const SYSTEM_FONT_CANDIDATES: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Read and parse a TrueType/OpenType font file.
///
/// # Errors
///
/// Returns [`RenderError::FontRead`] or [`RenderError::FontInvalid`].
pub fn load_font_file(path: &Path) -> Result<FontArc, RenderError> {
    let bytes = std::fs::read(path).map_err(|source| RenderError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| RenderError::FontInvalid {
        path: path.to_path_buf(),
    })
}

/// Resolve the label font.
///
/// # Errors
///
/// Fails only when `explicit` is given and cannot be loaded.
pub fn resolve_font(explicit: Option<&Path>) -> Result<Option<FontArc>, RenderError> {
    if let Some(path) = explicit {
        return load_font_file(path).map(Some);
    }

    for candidate in SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from) {
        if !candidate.is_file() {
            continue;
        }
        match load_font_file(&candidate) {
            Ok(font) => {
                debug!(path = %candidate.display(), "using system font for labels");
                return Ok(Some(font));
            }
            Err(err) => debug!(error = %err, "skipping system font"),
        }
    }

    warn!("no label font found; set render.font_path to draw label text");
    Ok(None)
}
