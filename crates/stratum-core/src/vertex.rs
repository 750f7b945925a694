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

//! Vertex layouts: which attributes a vertex carries, in which format, at which offset.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};

/// Semantic of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Attrib {
    Position = 0,
    Normal,
    Tangent,
    Bitangent,
    Color0,
    Color1,
    Color2,
    Color3,
    Indices,
    Weight,
    TexCoord0,
    TexCoord1,
    TexCoord2,
    TexCoord3,
    TexCoord4,
    TexCoord5,
    TexCoord6,
    TexCoord7,
}

impl Attrib {
    /// Number of attribute semantics.
    pub const COUNT: usize = 18;
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttribType {
    /// One unsigned byte per component.
    Uint8,
    /// Packed 10-10-10-2; always occupies four bytes.
    Uint10,
    /// Signed 16-bit integers.
    Int16,
    /// 16-bit floats.
    Half,
    /// 32-bit floats.
    Float,
}

impl AttribType {
    /// Size in bytes of `count` components (1..=4) of this type.
    ///
    /// Small attributes are padded to keep 4-byte alignment, so a 3-component
    /// `Uint8` takes as much room as a 4-component one.
    pub const fn size(self, count: u8) -> u16 {
        const SIZES: [[u16; 4]; 5] = [
            [1, 2, 4, 4],
            [4, 4, 4, 4],
            [2, 4, 8, 8],
            [2, 4, 8, 8],
            [4, 8, 12, 16],
        ];
        let row = match self {
            AttribType::Uint8 => 0,
            AttribType::Uint10 => 1,
            AttribType::Int16 => 2,
            AttribType::Half => 3,
            AttribType::Float => 4,
        };
        let col = match count {
            0 | 1 => 0,
            2 => 1,
            3 => 2,
            _ => 3,
        };
        SIZES[row][col]
    }
}

/// One attribute inside a [`VertexLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// Semantic.
    pub attrib: Attrib,
    /// Component count, 1..=4.
    pub count: u8,
    /// Component type.
    pub ty: AttribType,
    /// Integer components are normalized to `[0, 1]` / `[-1, 1]` in the shader.
    pub normalized: bool,
    /// Integer components are passed as integers instead of floats.
    pub as_int: bool,
    /// Byte offset from the start of the vertex.
    pub offset: u16,
}

/// A finished vertex layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u16,
}

impl VertexLayout {
    /// Starts a new layout.
    pub fn builder() -> VertexLayoutBuilder {
        VertexLayoutBuilder::default()
    }

    /// Byte distance between two consecutive vertices.
    pub fn stride(&self) -> u16 {
        self.stride
    }

    /// All attributes, in declaration order.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Returns `true` if the layout declares `attrib`.
    pub fn has(&self, attrib: Attrib) -> bool {
        self.attributes.iter().any(|a| a.attrib == attrib)
    }

    /// Byte offset of `attrib`, if declared.
    pub fn offset(&self, attrib: Attrib) -> Option<u16> {
        self.attributes
            .iter()
            .find(|a| a.attrib == attrib)
            .map(|a| a.offset)
    }

    /// Number of whole vertices in `bytes` of data.
    pub fn vertex_count(&self, bytes: usize) -> Result<u32, ResourceError> {
        if self.stride == 0 {
            return Err(ResourceError::LayoutMismatch(
                "layout has a stride of zero".to_string(),
            ));
        }
        if bytes % self.stride as usize != 0 {
            return Err(ResourceError::LayoutMismatch(format!(
                "{bytes} bytes is not a multiple of the {}-byte stride",
                self.stride
            )));
        }
        Ok((bytes / self.stride as usize) as u32)
    }
}

/// Accumulates attributes, assigning offsets in declaration order.
#[derive(Debug, Clone, Default)]
pub struct VertexLayoutBuilder {
    attributes: Vec<VertexAttribute>,
    offset: u16,
}

impl VertexLayoutBuilder {
    /// Appends a float-interpreted attribute.
    pub fn add(self, attrib: Attrib, count: u8, ty: AttribType) -> Self {
        self.push(attrib, count, ty, false, false)
    }

    /// Appends an integer attribute that the shader sees normalized.
    pub fn add_normalized(self, attrib: Attrib, count: u8, ty: AttribType) -> Self {
        self.push(attrib, count, ty, true, false)
    }

    /// Appends an integer attribute that the shader reads as integers.
    pub fn add_integer(self, attrib: Attrib, count: u8, ty: AttribType) -> Self {
        self.push(attrib, count, ty, false, true)
    }

    /// Leaves `bytes` of padding.
    pub fn skip(mut self, bytes: u16) -> Self {
        self.offset += bytes;
        self
    }

    fn push(
        mut self,
        attrib: Attrib,
        count: u8,
        ty: AttribType,
        normalized: bool,
        as_int: bool,
    ) -> Self {
        let count = count.clamp(1, 4);
        if self.attributes.iter().any(|a| a.attrib == attrib) {
            log::warn!("Vertex attribute {attrib:?} declared twice; lookups use the first.");
        }
        self.attributes.push(VertexAttribute {
            attrib,
            count,
            ty,
            normalized,
            as_int,
            offset: self.offset,
        });
        self.offset += ty.size(count);
        self
    }

    /// Finishes the layout.
    pub fn build(self) -> VertexLayout {
        VertexLayout {
            attributes: self.attributes,
            stride: self.offset,
        }
    }
}
