// SPDX-License-Identifier: MIT
//! # pal-scale: Downscale Planning for Canonical Image Payloads
//!
//! This crate computes aspect-preserving downscale plans and executes them on
//! the CPU with SIMD acceleration. It exists so the normalization pipeline can
//! separate the *decision* (what output size keeps the longest edge inside a
//! bound) from the *mechanism* (resampling pixels into a destination buffer).
//!
//! ## Key Components
//!
//! - [`plan`]: output-size computation with a hard no-upscale rule
//! - [`cpu`]: CPU resize of tightly-packed RGB8 buffers via fast_image_resize
//!
//! ## Behavior Guarantees
//!
//! - Aspect ratio is preserved exactly up to integer rounding
//! - Images already inside the bound pass through at their native size
//! - Output dimensions are clamped to a minimum of 1px per side
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use pal_scale::{cpu::scale_rgb_cpu, plan::{fit_long_side, Size}};
//!
//! # fn example(src_rgb: &[u8]) -> Result<(), pal_scale::cpu::ScaleError> {
//! let input = Size { w: 4000, h: 3000 };
//! let plan = fit_long_side(input, 1500); // -> 1500x1125
//!
//! let mut resizer = fast_image_resize::Resizer::new();
//! let mut output = vec![0u8; (plan.out.w * plan.out.h * 3) as usize];
//! scale_rgb_cpu(&mut resizer, src_rgb, input, &plan, &mut output)?;
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod plan;
