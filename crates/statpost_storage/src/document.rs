//! Encoding shared by every backend, plus typed access helpers.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use statpost_error::{JsonError, StatpostResult, StorageError, StorageErrorKind};
use statpost_interface::DocumentStore;

/// The document a missing key reads as.
pub fn empty_document() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Decode an object body.
///
/// A blank body decodes as [`empty_document`].
pub fn parse_document(key: &str, bytes: &[u8]) -> StatpostResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_document());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        StorageError::new(StorageErrorKind::InvalidDocument {
            key: key.to_string(),
            reason: e.to_string(),
        })
        .into()
    })
}

/// Encode a document as 4-space-indented JSON.
pub fn to_pretty_json(key: &str, document: &Value) -> StatpostResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| JsonError::encode(key, e))?;
    Ok(buf)
}

/// Load the document at `key` and deserialize it.
///
/// Missing keys arrive as `{}`, so `T` must accept an empty object.
pub async fn load_document<T, S>(store: &S, key: &str) -> StatpostResult<T>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    let value = store.load(key).await?;
    serde_json::from_value(value).map_err(|e| JsonError::decode(key, e).into())
}

/// Serialize `document` and store it at `key`.
pub async fn save_document<T, S>(store: &S, key: &str, document: &T) -> StatpostResult<()>
where
    T: Serialize + ?Sized,
    S: DocumentStore + ?Sized,
{
    let value = serde_json::to_value(document).map_err(|e| JsonError::encode(key, e))?;
    store.save(key, &value).await
}
