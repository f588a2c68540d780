//! In-memory resolver source for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::search::{provider::VncSource, types::SearchFilter};
use crate::services::resolver::VncInfo;

/// A complete, valid raw record.
pub fn sample_info(id: i64, ip: &str) -> VncInfo {
    match json!({
        "id": id,
        "ip": ip,
        "port": 5900,
        "city": "Reykjavik",
        "state": "Capital Region",
        "country": "IS",
        "clientname": "office-desktop",
        "screenres": "1024x768",
        "hostname": null,
        "osname": "Linux 5.X",
        "openports": [22, 5900],
        "username": "",
        "password": "",
        "createdat": 1_700_000_000,
        "asn": "AS12969"
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[derive(Default)]
pub struct MockSource {
    filtered: Vec<VncInfo>,
    random: Mutex<Vec<VncInfo>>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filtered(mut self, records: Vec<VncInfo>) -> Self {
        self.filtered = records;
        self
    }

    /// Records handed out by `fetch_random`, first to last.
    pub fn with_random(self, mut records: Vec<VncInfo>) -> Self {
        records.reverse();
        *self.random.lock().unwrap() = records;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VncSource for MockSource {
    async fn fetch_filtered(&self, _filter: &SearchFilter) -> Result<Vec<VncInfo>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.filtered.clone())
    }

    async fn fetch_random(&self) -> Result<VncInfo, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.random
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AppError::Network("no more records".into()))
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}
