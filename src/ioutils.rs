use crate::error::{Error, Result};
use serde_json::{Map, Value};

pub fn read_from(mut reader: impl std::io::Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(Error::IoError)?;
    Ok(buf)
}

/// Parses predefined answers into a JSON object.
///
/// Input that is valid JSON but not an object yields an empty map. Over-escaped
/// quotes (`\"`) coming from shell invocations are unescaped before giving up.
pub fn parse_string_to_json(buf: &str) -> Result<Map<String, Value>> {
    let value = match serde_json::from_str::<Value>(buf) {
        Ok(value) => value,
        Err(initial_err) if buf.contains("\\\"") => {
            serde_json::from_str::<Value>(&buf.replace("\\\"", "\""))
                .map_err(|_| Error::JSONParseError(initial_err))?
        }
        Err(initial_err) => return Err(Error::JSONParseError(initial_err)),
    };

    match value {
        Value::Object(map) => Ok(map),
        other => {
            log::warn!("Ignoring answers that are not a JSON object: {other}");
            Ok(Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object() {
        let map = parse_string_to_json(r#"{"name": "Bob", "port": 8080}"#).unwrap();
        assert_eq!(map.get("name"), Some(&json!("Bob")));
        assert_eq!(map.get("port"), Some(&json!(8080)));
    }

    #[test]
    fn handles_escaped_quotes() {
        let map = parse_string_to_json("{\\\"foo\\\":\\\"bar\\\"}").unwrap();
        assert_eq!(map.get("foo"), Some(&json!("bar")));
    }

    #[test]
    fn non_object_is_empty() {
        assert!(parse_string_to_json("[1, 2]").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse_string_to_json("{oops"), Err(Error::JSONParseError(_))));
    }

    #[test]
    fn reads_everything() {
        assert_eq!(read_from("a\nb".as_bytes()).unwrap(), "a\nb");
    }
}
