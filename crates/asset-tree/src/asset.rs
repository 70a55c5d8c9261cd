//! Buffer and texture objects.
//!
//! Importers hand the tree "an array of bytes with a declared element stride
//! and count". These helpers fix the object layout engine code expects:
//!
//! ```text
//! buffer:  { "stride": uint, "count": uint, "bytes": raw }
//! texture: { "extent_x": uint, "extent_y": uint, "layers": uint,
//!            "format": uint, "mipmap": uint, "texels": raw }
//! ```

use std::path::Path;

use asset_types::PropertyId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::tree::PropertyTree;

fn uint_item(tree: &PropertyTree, object: PropertyId, name: &str) -> TreeResult<u32> {
    let id = tree
        .object_item(object, name)
        .map_err(|_| TreeError::MalformedAsset(format!("missing {name:?}")))?;
    tree.get(id)?.as_uint()
}

fn raw_item<'t>(tree: &'t PropertyTree, object: PropertyId, name: &str) -> TreeResult<&'t [u8]> {
    let id = tree
        .object_item(object, name)
        .map_err(|_| TreeError::MalformedAsset(format!("missing {name:?}")))?;
    tree.get(id)?.raw_bytes(0)
}

fn set_uint_item(
    tree: &mut PropertyTree,
    object: PropertyId,
    name: &str,
    value: u32,
) -> TreeResult<()> {
    let id = tree.create_uint(value);
    tree.set_object_item(object, name, id)
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// Add a buffer object holding `count` elements of `stride` bytes each.
///
/// Fails if `bytes` is not exactly `stride × count` long.
pub fn create_buffer_property(
    tree: &mut PropertyTree,
    bytes: &[u8],
    stride: u32,
    count: u32,
) -> TreeResult<PropertyId> {
    let expected = stride as usize * count as usize;
    if bytes.len() != expected {
        return Err(TreeError::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    let root = tree.create_object();
    set_uint_item(tree, root, "stride", stride)?;
    set_uint_item(tree, root, "count", count)?;
    let raw = tree.create_raw_from(bytes);
    tree.set_object_item(root, "bytes", raw)?;
    Ok(root)
}

/// Borrowed view of a buffer object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferView<'t> {
    pub stride: u32,
    pub count: u32,
    pub bytes: &'t [u8],
}

impl<'t> BufferView<'t> {
    /// Read the buffer object at `id`, checking that its payload matches
    /// the declared stride and count.
    pub fn read(tree: &'t PropertyTree, id: PropertyId) -> TreeResult<Self> {
        let stride = uint_item(tree, id, "stride")?;
        let count = uint_item(tree, id, "count")?;
        let bytes = raw_item(tree, id, "bytes")?;
        if bytes.len() != stride as usize * count as usize {
            return Err(TreeError::MalformedAsset(format!(
                "buffer holds {} bytes, expected {stride} x {count}",
                bytes.len()
            )));
        }
        Ok(Self {
            stride,
            count,
            bytes,
        })
    }

    /// Bytes of element `index`, if in range.
    pub fn element(&self, index: u32) -> Option<&'t [u8]> {
        if index >= self.count {
            return None;
        }
        let start = index as usize * self.stride as usize;
        self.bytes.get(start..start + self.stride as usize)
    }
}

/// Concatenate raw binary files into one buffer object.
///
/// The combined length must be a whole number of `stride`-sized elements.
pub fn import_buffer<P: AsRef<Path>>(
    tree: &mut PropertyTree,
    paths: &[P],
    stride: u32,
) -> TreeResult<PropertyId> {
    if stride == 0 {
        return Err(TreeError::MalformedAsset("stride must be non-zero".into()));
    }
    let mut bytes = Vec::new();
    for path in paths {
        let chunk = std::fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), len = chunk.len(), "read buffer chunk");
        bytes.extend_from_slice(&chunk);
    }
    if bytes.len() % stride as usize != 0 {
        return Err(TreeError::MalformedAsset(format!(
            "{} bytes is not a multiple of stride {stride}",
            bytes.len()
        )));
    }
    let count = u32::try_from(bytes.len() / stride as usize)
        .map_err(|_| TreeError::MalformedAsset("element count exceeds u32".into()))?;
    create_buffer_property(tree, &bytes, stride, count)
}

/// Write the payload of the buffer object at `id` to `path`.
pub fn export_buffer(tree: &PropertyTree, id: PropertyId, path: &Path) -> TreeResult<()> {
    let view = BufferView::read(tree, id)?;
    std::fs::write(path, view.bytes)?;
    debug!(path = %path.display(), len = view.bytes.len(), "exported buffer");
    Ok(())
}

// ---------------------------------------------------------------------------
// Texture
// ---------------------------------------------------------------------------

/// Texture layout parameters.
///
/// `format` is the engine's pixel format code and is not interpreted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureDesc {
    pub extent_x: u32,
    pub extent_y: u32,
    pub layers: u32,
    pub format: u32,
    pub mipmap: u32,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            extent_x: 1,
            extent_y: 1,
            layers: 1,
            format: 0,
            mipmap: 1,
        }
    }
}

/// Add a texture object.
pub fn create_texture_property(
    tree: &mut PropertyTree,
    texels: &[u8],
    desc: TextureDesc,
) -> TreeResult<PropertyId> {
    let root = tree.create_object();
    set_uint_item(tree, root, "extent_x", desc.extent_x)?;
    set_uint_item(tree, root, "extent_y", desc.extent_y)?;
    set_uint_item(tree, root, "layers", desc.layers)?;
    set_uint_item(tree, root, "format", desc.format)?;
    set_uint_item(tree, root, "mipmap", desc.mipmap)?;
    let raw = tree.create_raw_from(texels);
    tree.set_object_item(root, "texels", raw)?;
    Ok(root)
}

/// Borrowed view of a texture object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureView<'t> {
    pub desc: TextureDesc,
    pub texels: &'t [u8],
}

impl<'t> TextureView<'t> {
    pub fn read(tree: &'t PropertyTree, id: PropertyId) -> TreeResult<Self> {
        let desc = TextureDesc {
            extent_x: uint_item(tree, id, "extent_x")?,
            extent_y: uint_item(tree, id, "extent_y")?,
            layers: uint_item(tree, id, "layers")?,
            format: uint_item(tree, id, "format")?,
            mipmap: uint_item(tree, id, "mipmap")?,
        };
        let texels = raw_item(tree, id, "texels")?;
        Ok(Self { desc, texels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_layout() {
        let mut tree = PropertyTree::new();
        let bytes: Vec<u8> = (0..12).collect();
        let id = create_buffer_property(&mut tree, &bytes, 4, 3).unwrap();

        let stride = tree.object_item(id, "stride").unwrap();
        assert_eq!(tree.get(stride).unwrap().as_uint().unwrap(), 4);

        let view = BufferView::read(&tree, id).unwrap();
        assert_eq!(view.count, 3);
        assert_eq!(view.element(1).unwrap(), &[4, 5, 6, 7]);
        assert!(view.element(3).is_none());
    }

    #[test]
    fn buffer_rejects_size_mismatch() {
        let mut tree = PropertyTree::new();
        assert!(matches!(
            create_buffer_property(&mut tree, &[0; 5], 4, 2),
            Err(TreeError::SizeMismatch {
                expected: 8,
                actual: 5
            })
        ));
    }

    #[test]
    fn buffer_view_rejects_non_buffer() {
        let mut tree = PropertyTree::new();
        let id = tree.create_object();
        assert!(matches!(
            BufferView::read(&tree, id),
            Err(TreeError::MalformedAsset(_))
        ));
    }

    #[test]
    fn texture_layout() {
        let mut tree = PropertyTree::new();
        let desc = TextureDesc {
            extent_x: 2,
            extent_y: 2,
            layers: 1,
            format: 37,
            mipmap: 1,
        };
        let id = create_texture_property(&mut tree, &[0xFF; 16], desc).unwrap();
        let view = TextureView::read(&tree, id).unwrap();
        assert_eq!(view.desc, desc);
        assert_eq!(view.texels.len(), 16);
    }

    #[test]
    fn import_concatenates_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, [1u8, 2, 3, 4]).unwrap();
        std::fs::write(&b, [5u8, 6, 7, 8]).unwrap();

        let mut tree = PropertyTree::new();
        let id = import_buffer(&mut tree, &[&a, &b], 2).unwrap();
        let view = BufferView::read(&tree, id).unwrap();
        assert_eq!(view.count, 4);
        assert_eq!(view.bytes, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn import_rejects_misaligned_total() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        std::fs::write(&a, [1u8, 2, 3]).unwrap();
        let mut tree = PropertyTree::new();
        assert!(matches!(
            import_buffer(&mut tree, &[&a], 2),
            Err(TreeError::MalformedAsset(_))
        ));
        assert!(import_buffer(&mut tree, &[&a], 0).is_err());
    }

    #[test]
    fn import_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = PropertyTree::new();
        assert!(matches!(
            import_buffer(&mut tree, &[dir.path().join("nope.bin")], 4),
            Err(TreeError::Io(_))
        ));
    }

    #[test]
    fn export_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.bin");
        let mut tree = PropertyTree::new();
        let id = create_buffer_property(&mut tree, &[9, 8, 7, 6], 2, 2).unwrap();
        export_buffer(&tree, id, &out).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), vec![9, 8, 7, 6]);
    }
}
