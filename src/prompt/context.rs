use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Answers accumulated across a chain
///
/// Keyed answers are stored in insertion order. Every answer, keyed or not,
/// is also appended to the history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultContext {
    values: IndexMap<String, Value>,
    history: Vec<Value>,
}

impl ResultContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// String items of an array value, or the keys of an object value.
    pub fn get_strings(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => {
                Some(items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            }
            Value::Object(map) => Some(map.keys().cloned().collect()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every answer given so far, in the order it was given.
    pub fn history(&self) -> &[Value] {
        &self.history
    }

    pub(crate) fn record(&mut self, value: Value) {
        self.history.push(value);
    }

    /// Keyed answers as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl From<Map<String, Value>> for ResultContext {
    fn from(map: Map<String, Value>) -> Self {
        Self { values: map.into_iter().collect(), history: Vec::new() }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ResultContext {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let mut context = ResultContext::new();
        context.insert("zeta", json!(1));
        context.insert("alpha", json!(2));
        let keys: Vec<&String> = context.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(context.to_value().to_string(), r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn reads_typed_values() {
        let context: ResultContext = [
            ("name", json!("Bob")),
            ("ok", json!(true)),
            ("count", json!(3)),
            ("ifaces", json!(["eth0", "lo"])),
            ("addrs", json!({"eth0": [], "wlan0": []})),
        ]
        .into_iter()
        .collect();

        assert_eq!(context.get_str("name"), Some("Bob"));
        assert_eq!(context.get_bool("ok"), Some(true));
        assert_eq!(context.get_i64("count"), Some(3));
        assert_eq!(context.get_strings("ifaces"), Some(vec!["eth0".into(), "lo".into()]));
        assert_eq!(context.get_strings("addrs"), Some(vec!["eth0".into(), "wlan0".into()]));
        assert_eq!(context.get_strings("name"), None);
        assert_eq!(context.get_str("missing"), None);
    }

    #[test]
    fn history_is_separate_from_keyed_values() {
        let mut context = ResultContext::from(
            json!({"seed": []}).as_object().cloned().unwrap_or_default(),
        );
        context.record(json!("first"));
        context.record(json!(false));
        assert_eq!(context.history(), &[json!("first"), json!(false)]);
        assert_eq!(context.len(), 1);
        assert!(context.contains_key("seed"));
        assert_eq!(context.remove("seed"), Some(json!([])));
        assert!(context.is_empty());
    }
}
