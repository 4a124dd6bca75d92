// SPDX-License-Identifier: MIT
//! # Downscale Plan Computation
//!
//! A plan captures the output dimensions for one resize. The single strategy
//! offered here clamps the longest side of the input to a maximum and derives
//! the other side proportionally, which keeps payloads inside a fixed pixel
//! budget without cropping or letterboxing.
//!
//! All computation uses floating point for precision and rounds to integers
//! at the end. Inputs already inside the bound are never upscaled.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    /// Longest of the two sides.
    pub fn long_side(&self) -> u32 {
        self.w.max(self.h)
    }
}

/// Complete plan for one downscale operation.
#[derive(Clone, Copy, Debug)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Final computed output dimensions
    pub out: Size,
}

impl ScalePlan {
    /// True when executing the plan changes the pixel dimensions at all.
    pub fn is_shrinking(&self) -> bool {
        self.out != self.input
    }
}

/// Compute a plan that fits `input` within `max_long` on its longest side.
///
/// Derives the shorter side proportionally and rounds to the nearest pixel,
/// clamped to a minimum of 1px. Never upscales: inputs whose longest side is
/// already `<= max_long` come back unchanged.
pub fn fit_long_side(input: Size, max_long: u32) -> ScalePlan {
    let (w, h) = (input.w as f64, input.h as f64);
    let long = w.max(h);
    let s = (max_long as f64 / long).min(1.0); // don't upscale
    ScalePlan {
        input,
        out: Size {
            w: ((w * s).round() as u32).max(1),
            h: ((h * s).round() as u32).max(1),
        },
    }
}
