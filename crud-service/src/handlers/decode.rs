//! Request body decoding
//!
//! POST and PUT bodies are laid over the manager's empty entity: members the
//! body mentions replace the template's, everything else keeps its zero
//! value. `null` members leave the template untouched.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::manager::PartialUpdateData;

/// Decode `body` into a copy of `template`
///
/// The body must be exactly one JSON value; trailing data is rejected.
pub fn decode_entity<E>(template: E, body: &[u8]) -> serde_json::Result<E>
where
    E: Serialize + DeserializeOwned,
{
    let overlay: Value = serde_json::from_slice(body)?;

    match (serde_json::to_value(&template)?, overlay) {
        (Value::Object(mut base), Value::Object(members)) => {
            overlay_object(&mut base, members);
            serde_json::from_value(Value::Object(base))
        }
        (_, other) => serde_json::from_value(other),
    }
}

fn overlay_object(base: &mut Map<String, Value>, members: Map<String, Value>) {
    for (key, value) in members {
        match value {
            Value::Null => {}
            Value::Object(nested) => match base.get_mut(&key) {
                Some(Value::Object(inner)) => overlay_object(inner, nested),
                _ => {
                    base.insert(key, Value::Object(nested));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Decode a merge-patch document; anything but a JSON object is rejected
pub fn decode_patch(body: &[u8]) -> serde_json::Result<PartialUpdateData> {
    serde_json::from_slice(body)
}
