#![allow(dead_code)]

use async_trait::async_trait;
use fieldmap::{
    BoundsQuery, Category, ClientConfig, HeadlessWidget, MapClient, MapError, MemoryDocument,
    MemoryLocation, Record, RecordSource, Result,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Canned answer for one request
pub enum Reply {
    Records(Vec<Value>),
    Status(u16),
    Body(&'static str),
}

/// Record API fake: replies are queued per category and consumed in order.
/// An empty queue answers `[]`.
#[derive(Default)]
pub struct FakeSource {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    queries: Mutex<Vec<(String, BoundsQuery)>>,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, category: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(category.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn queries(&self) -> Vec<(String, BoundsQuery)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn fetch(&self, category: &Category, query: &BoundsQuery) -> Result<Vec<Record>> {
        self.queries
            .lock()
            .unwrap()
            .push((category.id.clone(), query.clone()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&category.id)
            .and_then(VecDeque::pop_front);

        match reply {
            None => Ok(Vec::new()),
            Some(Reply::Records(values)) => values.into_iter().map(Record::from_value).collect(),
            Some(Reply::Status(status)) => Err(MapError::HttpStatus {
                category: category.id.clone(),
                status,
            }),
            Some(Reply::Body(body)) => fieldmap::data::record::parse_records(body.as_bytes()),
        }
    }
}

/// A client wired to in-memory collaborators, plus handles to inspect them
pub struct Harness {
    pub client: MapClient,
    pub source: Arc<FakeSource>,
    pub widget: HeadlessWidget,
    pub location: MemoryLocation,
    pub document: Arc<MemoryDocument>,
}

impl Harness {
    pub fn new(fragment: &str) -> Self {
        Self::with_config(fragment, ClientConfig::default())
    }

    pub fn with_config(fragment: &str, config: ClientConfig) -> Self {
        let source = FakeSource::new();
        let widget = HeadlessWidget::new();
        let location = MemoryLocation::new(fragment);
        let document = Arc::new(MemoryDocument::new());

        let client = MapClient::new(
            config,
            source.clone(),
            Box::new(widget.clone()),
            Box::new(location.clone()),
            document.clone(),
        )
        .expect("client");

        Self {
            client,
            source,
            widget,
            location,
            document,
        }
    }

    pub fn count_text(&self, category: &str) -> Option<String> {
        self.document.content(&format!("{category}-count"))
    }

    pub fn layer_len(&self, category: &str) -> usize {
        self.client
            .with_layers(|layers| layers.get_layer(category).map(|l| l.markers().len()))
            .unwrap()
            .expect("layer exists")
    }
}
