//! Fixed-size vectors and matrices stored as arrays of scalar nodes.
//!
//! Engine data such as colors, positions and instance transforms is kept
//! human-readable in the tree as `[x, y, z]`-style arrays of `real` or `uint`
//! nodes. A 3×4 transform is stored row-major as twelve reals.

use asset_types::PropertyId;

use crate::error::{TreeError, TreeResult};
use crate::property::Property;
use crate::tree::PropertyTree;

/// Row-major 3×4 affine transform.
pub type Mat3x4 = [[f32; 4]; 3];

fn create_array_of<T: Copy>(
    tree: &mut PropertyTree,
    values: &[T],
    make: impl Fn(T) -> Property,
) -> PropertyId {
    let children: Vec<Option<PropertyId>> = values
        .iter()
        .map(|v| Some(tree.push(make(*v))))
        .collect();
    tree.push(Property::Array(children))
}

fn read_array_of<T: Copy + Default, const N: usize>(
    tree: &PropertyTree,
    id: PropertyId,
    read: impl Fn(&Property) -> TreeResult<T>,
) -> TreeResult<[T; N]> {
    let node = tree.get(id)?;
    let size = node.array_size()?;
    if size != N {
        return Err(TreeError::SizeMismatch {
            expected: N,
            actual: size,
        });
    }
    let mut out = [T::default(); N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = read(tree.get(node.array_item(i)?)?)?;
    }
    Ok(out)
}

fn write_array_of<T: Copy>(
    tree: &mut PropertyTree,
    id: PropertyId,
    values: &[T],
    write: impl Fn(&mut Property, T) -> TreeResult<()>,
) -> TreeResult<()> {
    let node = tree.get(id)?;
    let size = node.array_size()?;
    if size != values.len() {
        return Err(TreeError::SizeMismatch {
            expected: size,
            actual: values.len(),
        });
    }
    let children = (0..size)
        .map(|i| node.array_item(i))
        .collect::<TreeResult<Vec<_>>>()?;
    for (child, value) in children.into_iter().zip(values) {
        write(tree.get_mut(child)?, *value)?;
    }
    Ok(())
}

/// Add an array of `N` real nodes.
pub fn create_real_array<const N: usize>(tree: &mut PropertyTree, values: [f32; N]) -> PropertyId {
    create_array_of(tree, &values, Property::Real)
}

/// Read an array of exactly `N` real nodes.
pub fn read_real_array<const N: usize>(
    tree: &PropertyTree,
    id: PropertyId,
) -> TreeResult<[f32; N]> {
    read_array_of(tree, id, Property::as_real)
}

/// Overwrite the elements of an existing real array of matching size.
pub fn write_real_array(
    tree: &mut PropertyTree,
    id: PropertyId,
    values: &[f32],
) -> TreeResult<()> {
    write_array_of(tree, id, values, Property::set_real)
}

/// Add an array of `N` uint nodes.
pub fn create_uint_array<const N: usize>(tree: &mut PropertyTree, values: [u32; N]) -> PropertyId {
    create_array_of(tree, &values, Property::Uint)
}

/// Read an array of exactly `N` uint nodes.
pub fn read_uint_array<const N: usize>(
    tree: &PropertyTree,
    id: PropertyId,
) -> TreeResult<[u32; N]> {
    read_array_of(tree, id, Property::as_uint)
}

pub fn write_uint_array(
    tree: &mut PropertyTree,
    id: PropertyId,
    values: &[u32],
) -> TreeResult<()> {
    write_array_of(tree, id, values, Property::set_uint)
}

/// Add a 3×4 transform as twelve reals, row-major.
pub fn create_mat3x4(tree: &mut PropertyTree, mat: &Mat3x4) -> PropertyId {
    let flat: Vec<f32> = mat.iter().flatten().copied().collect();
    create_array_of(tree, &flat, Property::Real)
}

pub fn read_mat3x4(tree: &PropertyTree, id: PropertyId) -> TreeResult<Mat3x4> {
    let flat: [f32; 12] = read_real_array(tree, id)?;
    let mut mat = [[0.0f32; 4]; 3];
    for (i, row) in mat.iter_mut().enumerate() {
        row.copy_from_slice(&flat[i * 4..i * 4 + 4]);
    }
    Ok(mat)
}
