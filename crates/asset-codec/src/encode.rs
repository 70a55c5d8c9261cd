use asset_digest::ContentHasher;
use asset_tree::{Property, PropertyId, PropertyTree};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::{depth_limit, Binaries, DEFAULT_MAX_DEPTH};

/// Options for [`encode`].
#[derive(Clone, Copy, Debug)]
pub struct EncodeOptions {
    /// Digest used to name raw payloads.
    pub hasher: ContentHasher,
    /// Clamped to [`MAX_SUPPORTED_DEPTH`](crate::MAX_SUPPORTED_DEPTH).
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            hasher: ContentHasher::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Output of [`encode`].
#[derive(Clone, Debug)]
pub struct Encoded {
    pub document: Value,
    /// Every raw node reached, with the token written in its place.
    pub binaries: Binaries,
}

/// Project the tree below its root into a JSON document.
///
/// A raw node reachable from several parents is hashed once per visit and
/// always yields the same token.
pub fn encode(tree: &PropertyTree, options: &EncodeOptions) -> CodecResult<Encoded> {
    let root = tree.require_root()?;
    encode_from(tree, root, options)
}

/// Project the subtree at `id` into a JSON document.
pub fn encode_from(
    tree: &PropertyTree,
    id: PropertyId,
    options: &EncodeOptions,
) -> CodecResult<Encoded> {
    let mut encoder = Encoder {
        tree,
        options,
        binaries: Binaries::new(),
    };
    let document = encoder.node(id, 0)?;
    debug!(
        root = %id,
        binaries = encoder.binaries.len(),
        digest = %options.hasher.kind(),
        "encoded tree"
    );
    Ok(Encoded {
        document,
        binaries: encoder.binaries,
    })
}

struct Encoder<'a> {
    tree: &'a PropertyTree,
    options: &'a EncodeOptions,
    binaries: Binaries,
}

impl Encoder<'_> {
    fn node(&mut self, id: PropertyId, depth: usize) -> CodecResult<Value> {
        let limit = depth_limit(self.options.max_depth);
        if depth > limit {
            return Err(CodecError::DepthExceeded { limit });
        }
        let value = match self.tree.get(id)? {
            Property::Undefined => Value::Null,
            Property::Bool(v) => Value::Bool(*v),
            Property::Sint(v) => Value::from(*v),
            Property::Uint(v) => Value::from(*v),
            Property::Real(v) => Number::from_f64(f64::from(*v))
                .map(Value::Number)
                .ok_or(CodecError::NonFiniteReal(*v))?,
            Property::String(v) => Value::String(v.clone()),
            Property::Object(items) => {
                let mut map = Map::new();
                for (key, child) in items {
                    map.insert(key.clone(), self.node(*child, depth + 1)?);
                }
                Value::Object(map)
            }
            Property::Array(items) => {
                let mut seq = Vec::with_capacity(items.len());
                for slot in items {
                    seq.push(match slot {
                        Some(child) => self.node(*child, depth + 1)?,
                        None => Value::Null,
                    });
                }
                Value::Array(seq)
            }
            Property::Raw(raw) => {
                let token = self.options.hasher.token(raw.as_slice());
                let text = token.to_string();
                self.binaries.insert(id, token);
                Value::String(text)
            }
        };
        Ok(value)
    }
}
