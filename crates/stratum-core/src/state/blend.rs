// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Composition of the blend region of a [`RenderState`].
//!
//! The blend region packs four 4-bit factor codes starting at bit 12:
//!
//! ```text
//! bits 12..15  source color      bits 20..23  source alpha
//! bits 16..19  destination color bits 24..27  destination alpha
//! ```
//!
//! Equations are two 3-bit codes starting at bit 28, alpha three bits above color.

use super::enums::{BlendEquation, BlendFactor};
use super::render_state::RenderState;

/// Packs a (source, destination) factor pair into one byte: source in the low nibble.
const fn factor_pair(src: BlendFactor, dst: BlendFactor) -> u64 {
    (src.code() as u64) | ((dst.code() as u64) << 4)
}

/// Blend function using the same factors for color and alpha.
pub const fn blend_function(src: BlendFactor, dst: BlendFactor) -> RenderState {
    blend_function_separate(src, dst, src, dst)
}

/// Blend function with independent color and alpha factors.
///
/// The color pair lands in bits `[12..19]`, the alpha pair in bits `[20..27]`.
pub const fn blend_function_separate(
    src_color: BlendFactor,
    dst_color: BlendFactor,
    src_alpha: BlendFactor,
    dst_alpha: BlendFactor,
) -> RenderState {
    let color = factor_pair(src_color, dst_color);
    let alpha = factor_pair(src_alpha, dst_alpha);
    RenderState::from_bits(
        ((color | (alpha << 8)) << RenderState::BLEND_SHIFT) & RenderState::BLEND_MASK,
    )
}

/// Blend equation shared by color and alpha.
pub const fn blend_equation(equation: BlendEquation) -> RenderState {
    blend_equation_separate(equation, equation)
}

/// Blend equations with independent color and alpha operations.
pub const fn blend_equation_separate(color: BlendEquation, alpha: BlendEquation) -> RenderState {
    let packed = (color.code() as u64) | ((alpha.code() as u64) << 3);
    RenderState::from_bits(
        (packed << RenderState::BLEND_EQUATION_SHIFT) & RenderState::BLEND_EQUATION_MASK,
    )
}
