//! DAG-JSON transcoding of canonical DAG-CBOR.
//!
//! Byte strings and links have no native JSON form, so DAG-JSON reserves the
//! `"/"` key for them:
//!
//! ```text
//! bytes  ->  {"/": {"bytes": "<base64, standard alphabet, unpadded>"}}
//! link   ->  {"/": "<cid string>"}
//! ```

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use ciborium::value::Value;
use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::cbor::decode_value;
use crate::cid::{Cid, LINK_TAG};
use crate::error::{CoreError, Result};

/// Transcode canonical DAG-CBOR bytes to pretty-printed DAG-JSON.
pub fn to_dag_json(bytes: &[u8]) -> Result<String> {
    let value = decode_value(bytes).map_err(|e| CoreError::TranscodeError(e.to_string()))?;
    let json = value_to_dag_json(&value)?;
    serde_json::to_string_pretty(&json).map_err(|e| CoreError::TranscodeError(e.to_string()))
}

/// Convert a CBOR value tree to its DAG-JSON form.
pub fn value_to_dag_json(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Text(s) => Json::String(s.clone()),
        Value::Integer(i) => {
            let n: i128 = (*i).into();
            if let Ok(n) = i64::try_from(n) {
                Json::Number(n.into())
            } else if let Ok(n) = u64::try_from(n) {
                Json::Number(n.into())
            } else {
                return Err(CoreError::TranscodeError(format!(
                    "integer {n} is outside the JSON number range"
                )));
            }
        }
        Value::Float(f) => Number::from_f64(*f).map(Json::Number).ok_or_else(|| {
            CoreError::TranscodeError(format!("non-finite float {f} has no JSON form"))
        })?,
        Value::Bytes(b) => slash(Json::Object(JsonMap::from_iter([(
            "bytes".to_string(),
            Json::String(STANDARD_NO_PAD.encode(b)),
        )]))),
        Value::Array(items) => Json::Array(
            items
                .iter()
                .map(value_to_dag_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(entries) => {
            let mut map = JsonMap::new();
            for (k, v) in entries {
                let Value::Text(key) = k else {
                    return Err(CoreError::TranscodeError("map key is not text".into()));
                };
                if map.insert(key.clone(), value_to_dag_json(v)?).is_some() {
                    return Err(CoreError::TranscodeError(format!("duplicate map key `{key}`")));
                }
            }
            Json::Object(map)
        }
        Value::Tag(LINK_TAG, _) => {
            let cid = Cid::from_link_value(value)
                .map_err(|e| CoreError::TranscodeError(e.to_string()))?;
            slash(Json::String(cid.to_string()))
        }
        Value::Tag(tag, _) => {
            return Err(CoreError::TranscodeError(format!("unsupported tag {tag}")))
        }
        _ => return Err(CoreError::TranscodeError("unsupported CBOR value".into())),
    })
}

fn slash(inner: Json) -> Json {
    Json::Object(JsonMap::from_iter([("/".to_string(), inner)]))
}
