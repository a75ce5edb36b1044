//! PNG encoding.

use std::io::Cursor;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use collabhub_core::error::ErrorCode;
use collabhub_triage::style::RenderScene;
use image::{ImageFormat, RgbaImage};
use tracing::{debug, instrument};

use crate::canvas::{RenderOptions, draw_scene};
use crate::font::resolve_font;

/// Smallest canvas edge accepted, in pixels.
pub const MIN_CANVAS_EDGE: u32 = 64;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("canvas {width}x{height} is smaller than {MIN_CANVAS_EDGE}x{MIN_CANVAS_EDGE}")]
    CanvasTooSmall { width: u32, height: u32 },

    #[error("failed to read font {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a usable TrueType/OpenType font", path.display())]
    FontInvalid { path: PathBuf },

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

impl RenderError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::RenderFailed
    }
}

/// Draw `scene` and return the PNG bytes.
///
/// # Errors
///
/// Returns a [`RenderError`] if the canvas is too small, a configured font
/// cannot be loaded, or encoding fails.
#[instrument(skip(scene), fields(nodes = scene.nodes.len(), labels = scene.labels.len()))]
pub fn render_png(scene: &RenderScene, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
    if options.width < MIN_CANVAS_EDGE || options.height < MIN_CANVAS_EDGE {
        return Err(RenderError::CanvasTooSmall {
            width: options.width,
            height: options.height,
        });
    }

    let font = resolve_font(options.font_path.as_deref())?;
    let image = draw_scene(scene, options.width, options.height, font.as_ref());
    let bytes = encode_png(&image)?;

    debug!(bytes = bytes.len(), "encoded PNG");
    Ok(bytes)
}

/// Encode an RGBA image as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if the encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Standard base64 (with padding), as embedded in the JSON result.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabhub_triage::layout::Position;
    use collabhub_triage::style::{PALETTE, SceneNode};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn options(width: u32, height: u32) -> RenderOptions {
        RenderOptions {
            width,
            height,
            font_path: None,
        }
    }

    #[test]
    fn renders_valid_png_of_requested_size() {
        let scene = RenderScene {
            title: "Top 1 Hub Nodes in Collaboration Network".to_string(),
            nodes: vec![SceneNode {
                position: Position::ORIGIN,
                size: 300.0,
                fill: PALETTE[0],
                outline: None,
            }],
            ..RenderScene::default()
        };

        let bytes = render_png(&scene, &options(320, 240)).expect("render");
        assert_eq!(bytes[..8], PNG_SIGNATURE);

        let decoded = image::load_from_memory(&bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (320, 240));
    }

    #[test]
    fn empty_scene_still_renders() {
        let bytes = render_png(&RenderScene::default(), &options(64, 64)).expect("render");
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let err = render_png(&RenderScene::default(), &options(10, 10)).expect_err("too small");
        assert!(matches!(err, RenderError::CanvasTooSmall { .. }));
        assert_eq!(err.code(), ErrorCode::RenderFailed);
    }

    #[test]
    fn base64_uses_standard_alphabet_with_padding() {
        assert_eq!(encode_base64(b"hub"), "aHVi");
        assert_eq!(encode_base64(b"hubs"), "aHVicw==");
    }
}
