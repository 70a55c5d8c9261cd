use asset_tree::{PropertyId, PropertyKind, PropertyTree, Raw};
use asset_types::BinaryToken;
use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::{depth_limit, Binaries, DEFAULT_MAX_DEPTH};

/// Options for [`decode`].
#[derive(Clone, Copy, Debug)]
pub struct DecodeOptions {
    /// Clamped to [`MAX_SUPPORTED_DEPTH`](crate::MAX_SUPPORTED_DEPTH).
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Output of [`decode`].
#[derive(Clone, Debug)]
pub struct Decoded {
    /// The rebuilt tree. Its root is the node for the whole document.
    pub tree: PropertyTree,
    /// Raw placeholders awaiting content, keyed by node.
    pub binaries: Binaries,
}

/// Rebuild a property tree from a JSON document.
///
/// Numbers take their tag from their lexical form: non-negative integers
/// become `uint`, negative integers `sint`, anything with a fraction or
/// exponent `real`. `null` becomes `undefined`. Strings shaped like a
/// [`BinaryToken`] become unallocated raw nodes listed in
/// [`Decoded::binaries`].
pub fn decode(document: &Value, options: &DecodeOptions) -> CodecResult<Decoded> {
    let mut decoder = Decoder {
        tree: PropertyTree::new(),
        binaries: Binaries::new(),
        options,
    };
    let root = decoder.node(document, 0)?;
    decoder.tree.set_root(root)?;
    debug!(
        nodes = decoder.tree.len(),
        binaries = decoder.binaries.len(),
        "decoded tree"
    );
    Ok(Decoded {
        tree: decoder.tree,
        binaries: decoder.binaries,
    })
}

struct Decoder<'a> {
    tree: PropertyTree,
    binaries: Binaries,
    options: &'a DecodeOptions,
}

impl Decoder<'_> {
    fn node(&mut self, value: &Value, depth: usize) -> CodecResult<PropertyId> {
        let limit = depth_limit(self.options.max_depth);
        if depth > limit {
            return Err(CodecError::DepthExceeded { limit });
        }
        let id = match value {
            Value::Null => self.tree.create(PropertyKind::Undefined),
            Value::Bool(v) => self.tree.create_bool(*v),
            Value::Number(n) => self.number(n)?,
            Value::String(s) => match BinaryToken::parse(s) {
                Ok(token) => {
                    let id = self.tree.create_raw(Raw::new());
                    self.binaries.insert(id, token);
                    id
                }
                Err(_) => self.tree.create_string(s.as_str()),
            },
            Value::Object(map) => {
                let id = self.tree.create_object();
                for (key, child) in map {
                    let child = self.node(child, depth + 1)?;
                    self.tree.set_object_item(id, key.as_str(), child)?;
                }
                id
            }
            Value::Array(seq) => {
                let id = self.tree.create_array(seq.len());
                for (index, child) in seq.iter().enumerate() {
                    let child = self.node(child, depth + 1)?;
                    self.tree.set_array_item(id, index, child)?;
                }
                id
            }
        };
        Ok(id)
    }

    fn number(&mut self, n: &Number) -> CodecResult<PropertyId> {
        let out_of_range = || CodecError::NumberOutOfRange(n.to_string());
        if let Some(v) = n.as_u64() {
            let v = u32::try_from(v).map_err(|_| out_of_range())?;
            Ok(self.tree.create_uint(v))
        } else if let Some(v) = n.as_i64() {
            let v = i32::try_from(v).map_err(|_| out_of_range())?;
            Ok(self.tree.create_sint(v))
        } else {
            let v = n.as_f64().ok_or_else(out_of_range)? as f32;
            if !v.is_finite() {
                return Err(out_of_range());
            }
            Ok(self.tree.create_real(v))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode, EncodeOptions};
    use asset_tree::{Property, TreeError};
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn decode_default(document: Value) -> Decoded {
        decode(&document, &DecodeOptions::default()).unwrap()
    }

    fn roundtrip(tree: &PropertyTree) -> Decoded {
        let encoded = encode(tree, &EncodeOptions::default()).unwrap();
        decode(&encoded.document, &DecodeOptions::default()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Numeric tags
    // -----------------------------------------------------------------------

    #[test]
    fn numbers_follow_lexical_form() {
        let decoded = decode_default(json!([7, -7, 7.0, 2.5e3]));
        let tree = &decoded.tree;
        let root = tree.require_root().unwrap();
        let kinds: Vec<_> = (0..4)
            .map(|i| tree.kind(tree.array_item(root, i).unwrap()).unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                PropertyKind::Uint,
                PropertyKind::Sint,
                PropertyKind::Real,
                PropertyKind::Real
            ]
        );
    }

    #[test]
    fn non_negative_sint_reloads_as_uint() {
        let mut tree = PropertyTree::new();
        let root = tree.create_sint(5);
        tree.set_root(root).unwrap();

        let decoded = roundtrip(&tree);
        let node = decoded.tree.get(decoded.tree.require_root().unwrap()).unwrap();
        assert_eq!(node, &Property::Uint(5));
        assert!(matches!(node.as_sint(), Err(TreeError::WrongVariant { .. })));
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        for document in [json!(4_294_967_296u64), json!(-2_147_483_649i64), json!(1e300)] {
            assert!(matches!(
                decode(&document, &DecodeOptions::default()),
                Err(CodecError::NumberOutOfRange(_))
            ));
        }
    }

    #[test]
    fn null_becomes_undefined() {
        let decoded = decode_default(json!({"a": null}));
        let a = decoded
            .tree
            .object_item(decoded.tree.require_root().unwrap(), "a")
            .unwrap();
        assert_eq!(decoded.tree.kind(a).unwrap(), PropertyKind::Undefined);
    }

    // -----------------------------------------------------------------------
    // Round trips
    // -----------------------------------------------------------------------

    #[test]
    fn every_scalar_tag_roundtrips() {
        let mut tree = PropertyTree::new();
        let root = tree.create_object();
        let items = [
            ("b", tree.create_bool(false)),
            ("s", tree.create_sint(-123)),
            ("u", tree.create_uint(u32::MAX)),
            ("r", tree.create_real(-0.125)),
            ("t", tree.create_string("hello")),
            ("n", tree.create(PropertyKind::Undefined)),
        ];
        for (key, id) in items {
            tree.set_object_item(root, key, id).unwrap();
        }
        tree.set_root(root).unwrap();

        let decoded = roundtrip(&tree);
        assert!(tree.deep_eq(root, &decoded.tree, decoded.tree.require_root().unwrap()));
        assert!(decoded.binaries.is_empty());
    }

    #[test]
    fn raw_decodes_as_placeholder() {
        let mut tree = PropertyTree::new();
        let root = tree.create_object();
        let count = tree.create_uint(3);
        let name = tree.create_string("mesh");
        let data = tree.create_raw_from(&[0x01, 0x02, 0x03, 0x04]);
        tree.set_object_item(root, "count", count).unwrap();
        tree.set_object_item(root, "name", name).unwrap();
        tree.set_object_item(root, "data", data).unwrap();
        tree.set_root(root).unwrap();

        let encoded = encode(&tree, &EncodeOptions::default()).unwrap();
        let decoded = decode(&encoded.document, &DecodeOptions::default()).unwrap();

        let new_root = decoded.tree.require_root().unwrap();
        let new_data = decoded.tree.object_item(new_root, "data").unwrap();
        let raw = decoded.tree.get(new_data).unwrap().raw().unwrap();
        assert!(!raw.is_allocated());
        assert_eq!(raw.capacity(), 0);
        assert_eq!(decoded.binaries[&new_data], encoded.binaries[&data]);
    }

    #[test]
    fn empty_containers_roundtrip() {
        let decoded = decode_default(json!({"obj": {}, "arr": []}));
        let tree = &decoded.tree;
        let root = tree.require_root().unwrap();
        let obj = tree.object_item(root, "obj").unwrap();
        let arr = tree.object_item(root, "arr").unwrap();
        assert!(tree.get(obj).unwrap().as_object().unwrap().is_empty());
        assert_eq!(tree.get(arr).unwrap().array_size().unwrap(), 0);
    }

    #[test]
    fn arrays_are_presized_and_filled() {
        let decoded = decode_default(json!(["a", null, 3]));
        let tree = &decoded.tree;
        let root = tree.require_root().unwrap();
        assert_eq!(tree.get(root).unwrap().array_size().unwrap(), 3);
        let middle = tree.array_item(root, 1).unwrap();
        assert_eq!(tree.kind(middle).unwrap(), PropertyKind::Undefined);
    }

    // -----------------------------------------------------------------------
    // Token recognition
    // -----------------------------------------------------------------------

    #[test]
    fn token_shaped_string_is_read_as_raw() {
        // Ordinary text that happens to match the token shape is
        // indistinguishable from a real reference.
        let lookalike = "-aa".repeat(16);
        let decoded = decode_default(json!({ "label": lookalike }));
        let label = decoded
            .tree
            .object_item(decoded.tree.require_root().unwrap(), "label")
            .unwrap();
        assert_eq!(decoded.tree.kind(label).unwrap(), PropertyKind::Raw);
        assert_eq!(decoded.binaries[&label].to_string(), lookalike);
    }

    #[test]
    fn near_miss_strings_stay_strings() {
        let cases = [
            "-AA".repeat(16),
            "-aa".repeat(15) + "-zz",
            "_aa".repeat(16),
            "x".repeat(48),
            "-aa".repeat(17),
        ];
        for text in cases {
            let decoded = decode_default(json!(text.clone()));
            let root = decoded.tree.require_root().unwrap();
            assert_eq!(decoded.tree.get(root).unwrap().as_str().unwrap(), text);
            assert!(decoded.binaries.is_empty());
        }
    }

    // -----------------------------------------------------------------------
    // Depth
    // -----------------------------------------------------------------------

    #[test]
    fn nesting_beyond_limit_is_rejected() {
        let mut document = json!(1);
        for _ in 0..10 {
            document = json!([document]);
        }
        let options = DecodeOptions { max_depth: 5 };
        assert!(matches!(
            decode(&document, &options),
            Err(CodecError::DepthExceeded { limit: 5 })
        ));
        assert!(decode(&document, &DecodeOptions { max_depth: 10 }).is_ok());
    }

    // -----------------------------------------------------------------------
    // Property-based round trip
    // -----------------------------------------------------------------------

    #[derive(Clone, Debug)]
    enum Shape {
        Bool(bool),
        Sint(i32),
        Uint(u32),
        Real(f32),
        Text(String),
        Object(BTreeMap<String, Shape>),
        Array(Vec<Shape>),
    }

    fn shape() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Shape::Bool),
            (i32::MIN..0).prop_map(Shape::Sint),
            any::<u32>().prop_map(Shape::Uint),
            (-1.0e6f32..1.0e6f32).prop_map(Shape::Real),
            "[a-z ]{0,16}".prop_map(Shape::Text),
        ];
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                prop::collection::btree_map("[a-z]{1,6}", inner.clone(), 0..4)
                    .prop_map(Shape::Object),
                prop::collection::vec(inner, 0..4).prop_map(Shape::Array),
            ]
        })
    }

    fn build(tree: &mut PropertyTree, shape: &Shape) -> PropertyId {
        match shape {
            Shape::Bool(v) => tree.create_bool(*v),
            Shape::Sint(v) => tree.create_sint(*v),
            Shape::Uint(v) => tree.create_uint(*v),
            Shape::Real(v) => tree.create_real(*v),
            Shape::Text(v) => tree.create_string(v.as_str()),
            Shape::Object(items) => {
                let id = tree.create_object();
                for (key, item) in items {
                    let child = build(tree, item);
                    tree.set_object_item(id, key.as_str(), child).unwrap();
                }
                id
            }
            Shape::Array(items) => {
                let id = tree.create_array(items.len());
                for (index, item) in items.iter().enumerate() {
                    let child = build(tree, item);
                    tree.set_array_item(id, index, child).unwrap();
                }
                id
            }
        }
    }

    proptest! {
        #[test]
        fn prop_structural_roundtrip(shape in shape()) {
            let mut tree = PropertyTree::new();
            let root = build(&mut tree, &shape);
            tree.set_root(root).unwrap();

            let decoded = roundtrip(&tree);
            let new_root = decoded.tree.require_root().unwrap();
            prop_assert!(tree.deep_eq(root, &decoded.tree, new_root));
            prop_assert!(decoded.binaries.is_empty());
        }
    }
}
