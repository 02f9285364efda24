use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::store::{ContentStore, Filter, Record, StoreError};

/// A query seen by [`MockStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub collection: String,
    pub filter: Filter,
    pub limit: usize,
}

/// In-memory content store used in tests.
#[derive(Clone, Default)]
pub struct MockStore {
    collections: HashMap<String, Vec<Record>>,
    failing: bool,
    queries: Arc<Mutex<Vec<Query>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every query fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Add a record to `collection`. Non-object values are ignored.
    pub fn with(mut self, collection: &str, record: Value) -> Self {
        if let Value::Object(record) = record {
            self.collections
                .entry(collection.to_string())
                .or_default()
                .push(record);
        }
        self
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Record>, StoreError> {
        self.queries.lock().unwrap().push(Query {
            collection: collection.to_string(),
            filter: filter.clone(),
            limit,
        });
        if self.failing {
            return Err(StoreError::Unavailable);
        }
        Ok(self
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.matches(r))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
