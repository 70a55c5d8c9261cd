//! Text form of encoded documents.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::CodecResult;

const INDENT: &[u8] = b"    ";

/// Render a document with four-space indentation.
pub fn to_vec_pretty(document: &Value) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut ser)?;
    Ok(buf)
}

/// Render a document on a single line.
pub fn to_vec(document: &Value) -> CodecResult<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}

pub fn to_string_pretty(document: &Value) -> CodecResult<String> {
    Ok(String::from_utf8(to_vec_pretty(document)?)?)
}

pub fn from_slice(bytes: &[u8]) -> CodecResult<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn from_str(text: &str) -> CodecResult<Value> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::{decode, encode, DecodeOptions, EncodeOptions};
    use asset_tree::PropertyTree;
    use serde_json::json;

    #[test]
    fn pretty_uses_four_spaces() {
        let text = to_string_pretty(&json!({"a": {"b": 1}})).unwrap();
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[test]
    fn mesh_document_text() {
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
        let text = to_string_pretty(&encoded.document).unwrap();
        let token = encoded.binaries[&data].to_string();

        assert!(text.contains("\"count\": 3"));
        assert!(text.contains("\"name\": \"mesh\""));
        assert!(text.contains(&format!("\"data\": \"{token}\"")));
        assert_eq!(token.len(), 48);

        let reparsed = from_str(&text).unwrap();
        let decoded = decode(&reparsed, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.binaries.len(), 1);
    }

    #[test]
    fn malformed_text_is_json_error() {
        assert!(matches!(from_str("{\"a\": "), Err(CodecError::Json(_))));
        assert!(matches!(from_slice(b"[1, 2"), Err(CodecError::Json(_))));
    }
}
