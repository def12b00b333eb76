//! In-memory Graph API used by application tests.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::domain::{AppError, GraphApi, Result};

/// Canned responses keyed by path (for `get`) or absolute URL (for
/// `get_url`). Unknown keys answer with a 404 Graph error.
#[derive(Default)]
pub struct StubApi {
    paths: HashMap<String, Value>,
    urls: HashMap<String, Value>,
    calls: RefCell<Vec<String>>,
    params: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: &str, body: Value) -> Self {
        self.paths.insert(path.to_string(), body);
        self
    }

    pub fn with_url(mut self, url: &str, body: Value) -> Self {
        self.urls.insert(url.to_string(), body);
        self
    }

    /// Every path or URL requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Query parameters sent with each `get` of `path`, one entry per call.
    pub fn params(&self, path: &str) -> Vec<Vec<(String, String)>> {
        self.params
            .borrow()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, params)| params.clone())
            .collect()
    }

    fn answer(&self, table: &HashMap<String, Value>, key: &str) -> Result<Value> {
        self.calls.borrow_mut().push(key.to_string());
        table.get(key).cloned().ok_or_else(|| AppError::Graph {
            status: 404,
            message: format!("no stub for {key}"),
        })
    }
}

impl GraphApi for StubApi {
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let params = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.params.borrow_mut().push((path.to_string(), params));
        self.answer(&self.paths, path)
    }

    async fn get_url(&self, url: &str) -> Result<Value> {
        self.answer(&self.urls, url)
    }
}
