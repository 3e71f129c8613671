//! Static action metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key conventionally used to carry an action's name.
const ACTION_NAME_KEY: &str = "actionName";

/// Arbitrary static key/value data attached to an action definition.
///
/// Metadata is fixed at definition time and visible to every middleware.
/// Repeated attachment merges shallowly, with later keys winning.
///
/// ```
/// use praxis_core::Metadata;
///
/// let base: Metadata = [("actionName", "greet")].into_iter().collect();
/// let more: Metadata = [("actionName", "hello"), ("audit", "on")].into_iter().collect();
/// let merged = base.merge(&more);
///
/// assert_eq!(merged.action_name(), Some("hello"));
/// assert_eq!(merged.get("audit"), Some(&serde_json::json!("on")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the `actionName` entry when it is a string.
    #[must_use]
    pub fn action_name(&self) -> Option<&str> {
        self.0.get(ACTION_NAME_KEY).and_then(Value::as_str)
    }

    /// Returns a new set containing `self` overlaid with `other`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        for (key, value) in &other.0 {
            merged.insert(key.clone(), value.clone());
        }
        Self(merged)
    }

    /// Iterates over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns `true` if no keys are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the metadata as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
