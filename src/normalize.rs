//! # Image Normalization
//!
//! Turns any acquired image (camera frame or uploaded file, arbitrary pixel
//! dimensions, arbitrary source encoding) into the single canonical payload
//! every downstream consumer relies on: a JPEG whose longest edge fits within
//! [`MAX_DIMENSION`], encoded at quality [`JPEG_QUALITY`], tagged with its
//! MIME type and transportable as a base64 data URL.
//!
//! The pipeline is decode → plan → resize → encode. Decode failures signal an
//! unsupported or corrupt input ([`crate::error::PalError::Decode`]); resize
//! and encode failures signal an environment/resource problem
//! ([`crate::error::PalError::Surface`]). Neither is swallowed here; the
//! caller surfaces a message and returns to idle.

use base64::{Engine as _, engine::general_purpose};
use fast_image_resize::Resizer;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use pal_scale::plan::{Size, fit_long_side};

use crate::error::{PalError, PalResult};

/// Longest edge of any canonical payload, in pixels.
pub const MAX_DIMENSION: u32 = 1500;

/// Quality factor of the canonical lossy encode (0.85 on the unit scale).
pub const JPEG_QUALITY: u8 = 85;

/// Hard byte ceiling on raw inputs, checked before any decode attempt.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// MIME tag of the canonical encoding.
pub const JPEG_MIME: &str = "image/jpeg";

/// Canonical encoded image payload: bytes plus a self-describing format tag.
/// Immutable once produced by the [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type matching the chosen encoding
    pub mime: String,
    /// Compressed image bytes
    pub bytes: Vec<u8>,
    /// Pixel width of the encoded image
    pub width: u32,
    /// Pixel height of the encoded image
    pub height: u32,
}

impl EncodedImage {
    /// Render as a `data:<mime>;base64,<payload>` URL, the transport and
    /// persistence form of the payload.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Base64 body alone, without the data-URL prefix.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Reconstruct a payload from its persisted data-URL form.
    ///
    /// Decodes the image header to recover pixel dimensions, so a stored
    /// value that is not a decodable image is rejected rather than carried
    /// forward blindly.
    pub fn from_data_url(url: &str) -> PalResult<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| PalError::decode("payload is not a data URL"))?;
        let (mime, body) = rest
            .split_once(";base64,")
            .ok_or_else(|| PalError::decode("data URL is not base64-encoded"))?;
        let bytes = general_purpose::STANDARD
            .decode(body)
            .map_err(|e| PalError::decode(format!("invalid base64 payload: {}", e)))?;
        let decoded = image::load_from_memory(&bytes)?;
        Ok(Self {
            mime: mime.to_string(),
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }
}

/// Fast precondition check on raw input size, run before decode to bound
/// memory use. Not part of the normalization algorithm itself.
pub fn guard_byte_ceiling(len: u64, ceiling: u64) -> PalResult<()> {
    if len > ceiling {
        const MIB: u64 = 1024 * 1024;
        // MiB only reads sensibly for whole-MiB ceilings.
        let limit = if ceiling >= MIB && ceiling % MIB == 0 {
            format!("must be {} MiB or smaller", ceiling / MIB)
        } else {
            format!("must be {} bytes or smaller", ceiling)
        };
        return Err(PalError::validation("image file", limit, len.to_string())
            .with_recovery_suggestion("Choose a smaller image or export a reduced copy"));
    }
    Ok(())
}

/// Produces canonical payloads from raw image bytes.
///
/// Owns the resizer so repeated normalizations reuse its internal buffers.
pub struct Normalizer {
    max_long_side: u32,
    quality: u8,
    resizer: Resizer,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Normalizer with the canonical limits (1500px longest edge, quality 85).
    pub fn new() -> Self {
        Self::with_limits(MAX_DIMENSION, JPEG_QUALITY)
    }

    /// Normalizer with explicit limits.
    pub fn with_limits(max_long_side: u32, quality: u8) -> Self {
        Self {
            max_long_side,
            quality,
            resizer: Resizer::new(),
        }
    }

    /// Normalize raw image bytes into the canonical payload.
    ///
    /// Decodes the source, fits it within the longest-edge bound (aspect
    /// preserved exactly, never upscaled), and re-encodes as JPEG.
    pub fn normalize(&mut self, raw: &[u8]) -> PalResult<EncodedImage> {
        let decoded = image::load_from_memory(raw)?;
        let rgb = decoded.to_rgb8();
        let input = Size {
            w: rgb.width(),
            h: rgb.height(),
        };

        let plan = fit_long_side(input, self.max_long_side);
        let (pixels, out) = if plan.is_shrinking() {
            let mut dst = vec![0u8; (plan.out.w as usize) * (plan.out.h as usize) * 3];
            pal_scale::cpu::scale_rgb_cpu(&mut self.resizer, rgb.as_raw(), input, &plan, &mut dst)?;
            (dst, plan.out)
        } else {
            (rgb.into_raw(), input)
        };

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode(&pixels, out.w, out.h, ExtendedColorType::Rgb8)
            .map_err(|e| PalError::surface("jpeg_encode", e.to_string()))?;

        Ok(EncodedImage {
            mime: JPEG_MIME.to_string(),
            bytes,
            width: out.w,
            height: out.h,
        })
    }
}
