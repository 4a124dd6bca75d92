// SPDX-License-Identifier: MIT
// CPU resize built on fast_image_resize (SIMD-accelerated).
// Tightly-packed RGB8 in → RGB8 out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x3;
use fir::{ResizeOptions, Resizer};

use crate::plan::{ScalePlan, Size};

#[derive(Debug)]
pub enum ScaleError {
    SourceTooSmall,
    BufferTooSmall,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError {
    fn from(e: fir::ResizeError) -> Self {
        Self::Fir(e)
    }
}
impl From<fir::ImageBufferError> for ScaleError {
    fn from(e: fir::ImageBufferError) -> Self {
        Self::ImageBuf(e)
    }
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::SourceTooSmall => write!(f, "Source buffer too small"),
            ScaleError::BufferTooSmall => write!(f, "Output buffer too small"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Main resize entry point.
/// `src_rgb` must hold exactly `src.w * src.h * 3` bytes of packed RGB rows.
/// `dst` must hold at least `plan.out.w * plan.out.h * 3` bytes.
pub fn scale_rgb_cpu(
    resizer: &mut Resizer,
    src_rgb: &[u8],
    src: Size,
    plan: &ScalePlan,
    dst: &mut [u8],
) -> Result<(), ScaleError> {
    let src_len = (src.w as usize) * (src.h as usize) * 3;
    if src_rgb.len() < src_len {
        return Err(ScaleError::SourceTooSmall);
    }
    let dst_len = (plan.out.w as usize) * (plan.out.h as usize) * 3;
    if dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall);
    }

    let src_view = TypedImageRef::<U8x3>::from_buffer(src.w, src.h, &src_rgb[..src_len])?;
    let mut dst_image = TypedImage::<U8x3>::from_buffer(plan.out.w, plan.out.h, dst)?;

    // Default convolution filter; quality must stay visually acceptable for
    // the downstream lossy encode, so nearest-neighbor is not an option here.
    let opts = ResizeOptions::new().use_alpha(false);
    resizer.resize_typed::<U8x3>(&src_view, &mut dst_image, &opts)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::fit_long_side;

    #[test]
    fn shrinks_solid_color_image_without_artifacts() {
        let src = Size { w: 64, h: 48 };
        let src_rgb = vec![200u8; (src.w * src.h * 3) as usize];
        let plan = fit_long_side(src, 32);
        let mut dst = vec![0u8; (plan.out.w * plan.out.h * 3) as usize];

        let mut resizer = Resizer::new();
        scale_rgb_cpu(&mut resizer, &src_rgb, src, &plan, &mut dst).unwrap();

        assert_eq!(plan.out, Size { w: 32, h: 24 });
        // Solid input must stay solid after resampling.
        assert!(dst.iter().all(|&b| b.abs_diff(200) <= 1));
    }

    #[test]
    fn rejects_undersized_buffers() {
        let src = Size { w: 8, h: 8 };
        let plan = fit_long_side(src, 4);
        let mut resizer = Resizer::new();

        let short_src = vec![0u8; 10];
        let mut dst = vec![0u8; (plan.out.w * plan.out.h * 3) as usize];
        assert!(matches!(
            scale_rgb_cpu(&mut resizer, &short_src, src, &plan, &mut dst),
            Err(ScaleError::SourceTooSmall)
        ));

        let src_rgb = vec![0u8; (src.w * src.h * 3) as usize];
        let mut short_dst = vec![0u8; 5];
        assert!(matches!(
            scale_rgb_cpu(&mut resizer, &src_rgb, src, &plan, &mut short_dst),
            Err(ScaleError::BufferTooSmall)
        ));
    }
}
