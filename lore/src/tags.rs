use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag input from the front end: a single string, a list, or nothing.
///
/// Lookups only ever use the first tag; prompt trait lines list all of them.
/// String and number elements become tags, anything else in a list is skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Tags(Vec<String>);

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(tag) => Some(tag.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl From<Value> for Tags {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self(items.iter().filter_map(scalar).collect()),
            Value::String(tag) if tag.is_empty() => Self::default(),
            other => Self(scalar(&other).into_iter().collect()),
        }
    }
}

impl Tags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    /// The lookup key.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl From<&str> for Tags {
    fn from(tag: &str) -> Self {
        Value::String(tag.to_string()).into()
    }
}
