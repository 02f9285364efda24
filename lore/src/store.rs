use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// The `data` object of a stored item.
pub type Record = Map<String, Value>;

/// Single-field filter understood by the content store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Field equals the value exactly.
    Eq { field: String, value: String },
    /// Field contains the value as a substring.
    Contains { field: String, value: String },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. } | Self::Contains { field, .. } => field,
        }
    }

    /// Render in the Wix Data query language, e.g. `{"title": {"$contains": "x"}}`.
    pub fn to_json(&self) -> Value {
        let (field, op, value) = match self {
            Self::Eq { field, value } => (field, "$eq", value),
            Self::Contains { field, value } => (field, "$contains", value),
        };
        let mut condition = Map::new();
        condition.insert(op.to_string(), Value::String(value.clone()));
        let mut filter = Map::new();
        filter.insert(field.clone(), Value::Object(condition));
        Value::Object(filter)
    }

    /// Whether `record` satisfies this filter.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.get(self.field()).and_then(Value::as_str) else {
            return false;
        };
        match self {
            Self::Eq { value, .. } => actual == value,
            Self::Contains { value, .. } => actual.contains(value.as_str()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode content store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("content store unavailable")]
    Unavailable,
}

/// A read-only collection store queried with a single filter.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Record>, StoreError>;
}
