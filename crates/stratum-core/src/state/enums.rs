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

//! Field values stored inside the packed render and stencil words.
//!
//! Every enum carries the exact code written into its bitfield. Codes are part
//! of the wire-compatible layout and must not be renumbered.

/// The comparison function used for depth and stencil testing.
///
/// Code `0` is reserved for "no test", which behaves like [`CompareFunction::Always`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CompareFunction {
    /// Passes if the incoming value is less than the stored value.
    Less = 1,
    /// Passes if the incoming value is less than or equal to the stored value.
    LessEqual = 2,
    /// Passes if both values are equal.
    Equal = 3,
    /// Passes if the incoming value is greater than or equal to the stored value.
    GreaterEqual = 4,
    /// Passes if the incoming value is greater than the stored value.
    Greater = 5,
    /// Passes if the values differ.
    NotEqual = 6,
    /// Never passes.
    Never = 7,
    /// Always passes.
    Always = 8,
}

impl CompareFunction {
    /// All comparison functions, in code order.
    pub const ALL: [Self; 8] = [
        Self::Less,
        Self::LessEqual,
        Self::Equal,
        Self::GreaterEqual,
        Self::Greater,
        Self::NotEqual,
        Self::Never,
        Self::Always,
    ];

    /// The field code of this function.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a field code. Returns `None` for `0` (unset) and out-of-range codes.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Less),
            2 => Some(Self::LessEqual),
            3 => Some(Self::Equal),
            4 => Some(Self::GreaterEqual),
            5 => Some(Self::Greater),
            6 => Some(Self::NotEqual),
            7 => Some(Self::Never),
            8 => Some(Self::Always),
            _ => None,
        }
    }
}

/// A factor in a blend equation.
///
/// Code `0` means "blending disabled" for the whole blend region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlendFactor {
    /// `0`
    Zero = 1,
    /// `1`
    One = 2,
    /// Source color.
    SourceColor = 3,
    /// `1 - source color`
    InvSourceColor = 4,
    /// Source alpha.
    SourceAlpha = 5,
    /// `1 - source alpha`
    InvSourceAlpha = 6,
    /// Destination alpha.
    DestAlpha = 7,
    /// `1 - destination alpha`
    InvDestAlpha = 8,
    /// Destination color.
    DestColor = 9,
    /// `1 - destination color`
    InvDestColor = 10,
    /// `min(source alpha, 1 - destination alpha)`
    SourceAlphaSaturate = 11,
    /// The constant blend factor supplied alongside the render state.
    Factor = 12,
    /// `1 -` the constant blend factor.
    InvFactor = 13,
}

impl BlendFactor {
    /// All blend factors, in code order.
    pub const ALL: [Self; 13] = [
        Self::Zero,
        Self::One,
        Self::SourceColor,
        Self::InvSourceColor,
        Self::SourceAlpha,
        Self::InvSourceAlpha,
        Self::DestAlpha,
        Self::InvDestAlpha,
        Self::DestColor,
        Self::InvDestColor,
        Self::SourceAlphaSaturate,
        Self::Factor,
        Self::InvFactor,
    ];

    /// The field code of this factor.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 4-bit field code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Zero),
            2 => Some(Self::One),
            3 => Some(Self::SourceColor),
            4 => Some(Self::InvSourceColor),
            5 => Some(Self::SourceAlpha),
            6 => Some(Self::InvSourceAlpha),
            7 => Some(Self::DestAlpha),
            8 => Some(Self::InvDestAlpha),
            9 => Some(Self::DestColor),
            10 => Some(Self::InvDestColor),
            11 => Some(Self::SourceAlphaSaturate),
            12 => Some(Self::Factor),
            13 => Some(Self::InvFactor),
            _ => None,
        }
    }
}

/// The operation combining the weighted source and destination colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlendEquation {
    /// `src + dst`
    #[default]
    Add = 0,
    /// `src - dst`
    Subtract = 1,
    /// `dst - src`
    ReverseSubtract = 2,
    /// `min(src, dst)`
    Min = 3,
    /// `max(src, dst)`
    Max = 4,
}

impl BlendEquation {
    /// All equations, in code order.
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::ReverseSubtract,
        Self::Min,
        Self::Max,
    ];

    /// The field code of this equation.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 3-bit field code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::Subtract),
            2 => Some(Self::ReverseSubtract),
            3 => Some(Self::Min),
            4 => Some(Self::Max),
            _ => None,
        }
    }
}

/// Which winding order gets culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CullMode {
    /// No culling.
    #[default]
    None = 0,
    /// Cull clockwise triangles.
    Clockwise = 1,
    /// Cull counter-clockwise triangles.
    CounterClockwise = 2,
}

impl CullMode {
    /// All cull modes, in code order.
    pub const ALL: [Self; 3] = [Self::None, Self::Clockwise, Self::CounterClockwise];

    /// The field code of this mode.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 2-bit field code. Code `3` is unassigned.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Clockwise),
            2 => Some(Self::CounterClockwise),
            _ => None,
        }
    }
}

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PrimitiveTopology {
    /// Every three vertices form a triangle.
    #[default]
    Triangles = 0,
    /// Connected triangle strip.
    TriangleStrip = 1,
    /// Every two vertices form a line.
    Lines = 2,
    /// Connected line strip.
    LineStrip = 3,
    /// Isolated points.
    Points = 4,
}

impl PrimitiveTopology {
    /// All topologies, in code order.
    pub const ALL: [Self; 5] = [
        Self::Triangles,
        Self::TriangleStrip,
        Self::Lines,
        Self::LineStrip,
        Self::Points,
    ];

    /// The field code of this topology.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 3-bit field code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Triangles),
            1 => Some(Self::TriangleStrip),
            2 => Some(Self::Lines),
            3 => Some(Self::LineStrip),
            4 => Some(Self::Points),
            _ => None,
        }
    }

    /// Number of complete primitives assembled from `elements` vertices or indices.
    pub const fn primitive_count(self, elements: u32) -> u32 {
        match self {
            Self::Triangles => elements / 3,
            Self::TriangleStrip => elements.saturating_sub(2),
            Self::Lines => elements / 2,
            Self::LineStrip => elements.saturating_sub(1),
            Self::Points => elements,
        }
    }
}

/// An operation applied to the stencil buffer for one test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StencilOperation {
    /// Set the stored value to 0.
    #[default]
    Zero = 0,
    /// Keep the stored value.
    Keep = 1,
    /// Replace the stored value with the reference value.
    Replace = 2,
    /// Increment, wrapping to 0 on overflow.
    IncrementWrap = 3,
    /// Increment, clamping at the maximum.
    Increment = 4,
    /// Decrement, wrapping to the maximum on underflow.
    DecrementWrap = 5,
    /// Decrement, clamping at 0.
    Decrement = 6,
    /// Bitwise invert the stored value.
    Invert = 7,
}

impl StencilOperation {
    /// All operations, in code order.
    pub const ALL: [Self; 8] = [
        Self::Zero,
        Self::Keep,
        Self::Replace,
        Self::IncrementWrap,
        Self::Increment,
        Self::DecrementWrap,
        Self::Decrement,
        Self::Invert,
    ];

    /// The field code of this operation.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 4-bit field code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Zero),
            1 => Some(Self::Keep),
            2 => Some(Self::Replace),
            3 => Some(Self::IncrementWrap),
            4 => Some(Self::Increment),
            5 => Some(Self::DecrementWrap),
            6 => Some(Self::Decrement),
            7 => Some(Self::Invert),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_decode_back() {
        for f in CompareFunction::ALL {
            assert_eq!(CompareFunction::from_code(f.code()), Some(f));
        }
        for f in BlendFactor::ALL {
            assert_eq!(BlendFactor::from_code(f.code()), Some(f));
        }
        for e in BlendEquation::ALL {
            assert_eq!(BlendEquation::from_code(e.code()), Some(e));
        }
        for op in StencilOperation::ALL {
            assert_eq!(StencilOperation::from_code(op.code()), Some(op));
        }
    }

    #[test]
    fn reserved_codes_do_not_decode() {
        assert_eq!(CompareFunction::from_code(0), None);
        assert_eq!(BlendFactor::from_code(0), None);
        assert_eq!(BlendFactor::from_code(14), None);
        assert_eq!(CullMode::from_code(3), None);
        assert_eq!(PrimitiveTopology::from_code(7), None);
    }

    #[test]
    fn primitive_counts() {
        assert_eq!(PrimitiveTopology::Triangles.primitive_count(7), 2);
        assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(6), 4);
        assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(1), 0);
        assert_eq!(PrimitiveTopology::Lines.primitive_count(5), 2);
        assert_eq!(PrimitiveTopology::LineStrip.primitive_count(0), 0);
        assert_eq!(PrimitiveTopology::Points.primitive_count(9), 9);
    }
}
