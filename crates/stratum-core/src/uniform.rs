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

//! The named uniform binding table.
//!
//! Uniforms are de-duplicated by name: creating a name that is already live
//! returns the existing handle and bumps its reference count. The slot is freed
//! when the count reaches zero, after which the name can be created afresh
//! with an unrelated handle.

use crate::command::UniformUpload;
use crate::error::ResourceError;
use crate::handle::{HandlePool, RawHandle, UniformHandle};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Element type of a uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniformType {
    /// A single integer; also used for texture samplers.
    Int1,
    /// Four floats.
    Vec4,
    /// 3x3 float matrix.
    Mat3,
    /// 4x4 float matrix.
    Mat4,
}

impl UniformType {
    /// Size in bytes of one element.
    pub const fn size(self) -> usize {
        match self {
            UniformType::Int1 => 4,
            UniformType::Vec4 => 16,
            UniformType::Mat3 => 36,
            UniformType::Mat4 => 64,
        }
    }
}

/// What a uniform handle was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformInfo {
    /// Name the shader refers to.
    pub name: String,
    /// Element type.
    pub ty: UniformType,
    /// Array size, at least 1.
    pub num: u16,
}

#[derive(Debug)]
struct UniformEntry {
    info: UniformInfo,
    refs: u32,
    value: Vec<u8>,
}

/// Outcome of [`UniformTable::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Created {
    /// A new slot; the backend must hear about it.
    New(UniformHandle),
    /// An existing live uniform with the same name.
    Shared(UniformHandle),
}

impl Created {
    pub fn handle(self) -> UniformHandle {
        match self {
            Created::New(handle) | Created::Shared(handle) => handle,
        }
    }
}

#[derive(Debug)]
pub(crate) struct UniformTable {
    entries: HandlePool<UniformEntry>,
    by_name: AHashMap<String, RawHandle>,
    capacity: u16,
}

impl UniformTable {
    pub fn new(capacity: u16) -> Self {
        Self {
            entries: HandlePool::new(capacity),
            by_name: AHashMap::new(),
            capacity,
        }
    }

    pub fn create(
        &mut self,
        name: &str,
        ty: UniformType,
        num: u16,
    ) -> Result<Created, ResourceError> {
        let num = num.max(1);

        if let Some(&raw) = self.by_name.get(name) {
            if let Some(entry) = self.entries.get_mut(raw) {
                if entry.info.ty != ty || entry.info.num != num {
                    log::warn!(
                        "Uniform '{name}' re-created as {ty:?}[{num}], keeping {:?}[{}].",
                        entry.info.ty,
                        entry.info.num
                    );
                }
                entry.refs += 1;
                return Ok(Created::Shared(UniformHandle::from_raw(raw)));
            }
        }

        let entry = UniformEntry {
            info: UniformInfo {
                name: name.to_string(),
                ty,
                num,
            },
            refs: 1,
            value: vec![0; ty.size() * num as usize],
        };
        let raw = self
            .entries
            .insert(entry)
            .map_err(|_| ResourceError::PoolExhausted {
                kind: "uniform",
                capacity: self.capacity as usize,
            })?;
        self.by_name.insert(name.to_string(), raw);
        Ok(Created::New(UniformHandle::from_raw(raw)))
    }

    /// Drops one reference. Returns `true` when the slot was freed.
    pub fn destroy(&mut self, handle: UniformHandle) -> Result<bool, ResourceError> {
        let raw = handle.raw();
        let entry = self
            .entries
            .get_mut(raw)
            .ok_or(ResourceError::InvalidHandle { kind: "uniform" })?;
        entry.refs -= 1;
        if entry.refs > 0 {
            return Ok(false);
        }

        if let Some(entry) = self.entries.remove(raw) {
            self.by_name.remove(&entry.info.name);
        }
        Ok(true)
    }

    pub fn info(&self, handle: UniformHandle) -> Option<&UniformInfo> {
        self.entries.get(handle.raw()).map(|e| &e.info)
    }

    /// The value most recently recorded for `handle`.
    pub fn value(&self, handle: UniformHandle) -> Option<&[u8]> {
        self.entries.get(handle.raw()).map(|e| e.value.as_slice())
    }

    /// Validates a value set on a draw call and returns the upload the draw
    /// carries to the backend. Nothing is recorded until [`UniformTable::record`].
    ///
    /// `count` is clamped to the uniform's array size.
    pub fn resolve(
        &self,
        handle: UniformHandle,
        count: u16,
        data: &[u8],
    ) -> Result<UniformUpload, ResourceError> {
        let entry = self
            .entries
            .get(handle.raw())
            .ok_or(ResourceError::InvalidHandle { kind: "uniform" })?;

        let count = count.clamp(1, entry.info.num);
        let required = entry.info.ty.size() * count as usize;
        if data.len() < required {
            return Err(ResourceError::OutOfBounds {
                required,
                supplied: data.len(),
            });
        }

        Ok(UniformUpload {
            handle,
            ty: entry.info.ty,
            count,
            data: data[..required].to_vec(),
        })
    }

    /// Stores a resolved upload as the uniform's current value.
    pub fn record(&mut self, upload: &UniformUpload) {
        if let Some(entry) = self.entries.get_mut(upload.handle.raw()) {
            entry.value[..upload.data.len()].copy_from_slice(&upload.data);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Live uniforms and their reference counts.
    pub fn live(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(_, e)| (e.info.name.as_str(), e.refs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_is_shared_and_refcounted() {
        let mut table = UniformTable::new(8);
        let a = table.create("u_color", UniformType::Vec4, 1).unwrap();
        let b = table.create("u_color", UniformType::Vec4, 1).unwrap();
        assert!(matches!(a, Created::New(_)));
        assert_eq!(b, Created::Shared(a.handle()));
        assert_eq!(table.len(), 1);

        assert_eq!(table.destroy(a.handle()), Ok(false));
        assert!(table.info(a.handle()).is_some());
        assert_eq!(table.destroy(a.handle()), Ok(true));
        assert!(table.info(a.handle()).is_none());
    }

    #[test]
    fn recreate_after_destroy_is_independent() {
        let mut table = UniformTable::new(8);
        let first = table.create("u_time", UniformType::Vec4, 1).unwrap().handle();
        table.destroy(first).unwrap();

        let second = table.create("u_time", UniformType::Vec4, 1).unwrap();
        assert!(matches!(second, Created::New(_)));
        assert_ne!(first, second.handle());
        assert_eq!(
            table.destroy(first),
            Err(ResourceError::InvalidHandle { kind: "uniform" })
        );
    }

    #[test]
    fn resolve_clamps_count_and_record_stores_value() {
        let mut table = UniformTable::new(8);
        let handle = table
            .create("u_lights", UniformType::Vec4, 2)
            .unwrap()
            .handle();
        let data = [7u8; 64];

        let upload = table.resolve(handle, 10, &data).unwrap();
        assert_eq!(upload.count, 2);
        assert_eq!(upload.data.len(), 32);
        assert_eq!(table.value(handle), Some(&[0u8; 32][..]));

        table.record(&upload);
        assert_eq!(table.value(handle), Some(&data[..32]));
    }

    #[test]
    fn resolve_rejects_short_data() {
        let mut table = UniformTable::new(8);
        let handle = table
            .create("u_mvp", UniformType::Mat4, 1)
            .unwrap()
            .handle();
        assert_eq!(
            table.resolve(handle, 1, &[0u8; 16]),
            Err(ResourceError::OutOfBounds {
                required: 64,
                supplied: 16
            })
        );
    }

    #[test]
    fn pool_limit() {
        let mut table = UniformTable::new(1);
        table.create("a", UniformType::Int1, 1).unwrap();
        assert!(matches!(
            table.create("b", UniformType::Int1, 1),
            Err(ResourceError::PoolExhausted { capacity: 1, .. })
        ));
        // Shared names never need a new slot.
        assert!(table.create("a", UniformType::Int1, 1).is_ok());
    }
}
