use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of the upstream character collection.
///
/// Only `id`, `name` and `image` are contractual. Every other field is kept
/// in `extra` and written back out unchanged.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Character {
    pub fn status(&self) -> Option<&str> {
        self.extra_str("status")
    }

    pub fn species(&self) -> Option<&str> {
        self.extra_str("species")
    }

    pub fn created(&self) -> Option<&str> {
        self.extra_str("created")
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}
