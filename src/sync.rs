//! Marker synchronization
//!
//! For a viewport, every configured category is fetched independently and
//! its layer is cleared and repopulated from the response. A failed fetch
//! leaves that category's previous markers on screen and does not affect the
//! other categories. Overlapping refreshes of the same category are not
//! serialized: whichever response is applied last wins.

use crate::core::context::ClientContext;
use crate::core::viewport::Viewport;
use crate::data::category::Category;
use crate::data::record::Record;
use crate::fetch::query::BoundsQuery;
use crate::fetch::source::RecordSource;
use crate::layers::base::LayerTrait;
use crate::layers::marker::{Marker, MarkerBinding};
use crate::prelude::Arc;
use crate::{MapError, Result};
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub struct MarkerSynchronizer {
    context: Arc<ClientContext>,
    source: Arc<dyn RecordSource>,
    categories: Vec<Category>,
    generation: AtomicU64,
    in_flight: Arc<AtomicUsize>,
}

/// Outcome of one refresh of one category
#[derive(Debug)]
pub struct CategoryOutcome {
    pub category: String,
    pub result: Result<usize>,
}

/// Outcome of refreshing every category for one viewport
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub outcomes: Vec<CategoryOutcome>,
}

impl RefreshReport {
    /// Marker count for a category, if its refresh succeeded
    pub fn count(&self, category: &str) -> Option<usize> {
        self.outcomes
            .iter()
            .find(|o| o.category == category)
            .and_then(|o| o.result.as_ref().ok().copied())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Keeps the in-flight counter accurate even if a refresh future is dropped
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MarkerSynchronizer {
    pub fn new(
        context: Arc<ClientContext>,
        source: Arc<dyn RecordSource>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            context,
            source,
            categories,
            generation: AtomicU64::new(0),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn context(&self) -> &Arc<ClientContext> {
        &self.context
    }

    /// Number of category refreshes currently awaiting a response
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Refreshes every category concurrently. Failures are logged and
    /// reported per category; they never stop the other categories.
    pub async fn refresh_all(&self, viewport: &Viewport) -> RefreshReport {
        log::debug!(
            "refreshing {} categories for {}",
            self.categories.len(),
            viewport.to_fragment()
        );

        let refreshes = self.categories.iter().map(|category| async move {
            CategoryOutcome {
                category: category.id.clone(),
                result: self.refresh_category(category, viewport).await,
            }
        });

        RefreshReport {
            outcomes: join_all(refreshes).await,
        }
    }

    /// Spawns [`refresh_all`](Self::refresh_all) on the installed runtime
    /// and returns immediately.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn_refresh_all(
        self: &Arc<Self>,
        viewport: Viewport,
    ) -> Box<dyn crate::runtime::AsyncHandle> {
        let this = Arc::clone(self);
        crate::runtime::spawn(async move {
            let report = this.refresh_all(&viewport).await;
            log::debug!(
                "background refresh finished: {} ok, {} failed",
                report.succeeded().count(),
                report.failed().count()
            );
        })
    }

    /// Fetches one category for `viewport` and replaces its layer.
    ///
    /// On any fetch error the layer and its count are left untouched.
    /// Returns the number of markers placed.
    pub async fn refresh_category(&self, category: &Category, viewport: &Viewport) -> Result<usize> {
        let _in_flight = InFlight::start(&self.in_flight);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started = instant::Instant::now();
        let query = BoundsQuery::from(viewport);

        let records = match self.source.fetch(category, &query).await {
            Ok(records) => records,
            Err(e) => {
                let level = if e.is_fetch_error() {
                    log::Level::Warn
                } else {
                    log::Level::Error
                };
                log::log!(
                    level,
                    "refresh of {} (generation {}) failed, keeping stale markers: {}",
                    category.id,
                    generation,
                    e
                );
                return Err(e);
            }
        };

        let fetched = records.len();
        let markers = self.build_markers(category, generation, records);
        let count = self.apply(category, generation, markers)?;

        log::info!(
            "{}: {} markers from {} records (generation {}, {:?})",
            category.id,
            count,
            fetched,
            generation,
            started.elapsed()
        );
        Ok(count)
    }

    fn build_markers(&self, category: &Category, generation: u64, records: Vec<Record>) -> Vec<Marker> {
        let icon = self
            .context
            .icon(&category.id)
            .cloned()
            .unwrap_or_else(|| category.icon.clone());

        let mut markers = Vec::with_capacity(records.len());
        for record in records {
            let position = match category.coordinates(&record) {
                Ok(position) => position,
                Err(e) => {
                    log::warn!("{}: skipping record {:?}: {}", category.id, record.id(), e);
                    continue;
                }
            };
            let binding = MarkerBinding::new(category.id.clone(), markers.len(), record.id())
                .issued_at(generation);
            let popup = category.popup_text(&record);
            markers.push(Marker::new(position, icon.clone(), binding, record).with_popup(popup));
        }
        markers
    }

    /// Replaces the layer contents, redraws it and updates the visible count.
    ///
    /// Once the layer has been replaced the refresh counts as applied, so a
    /// count element that cannot be written is logged rather than returned.
    fn apply(&self, category: &Category, generation: u64, markers: Vec<Marker>) -> Result<usize> {
        let count = {
            let mut layers = self.context.layers()?;
            let layer = layers
                .with_layer_mut(&category.id, |layer| {
                    if layer.generation() > generation {
                        log::debug!(
                            "{}: generation {} applied after newer generation {}",
                            category.id,
                            generation,
                            layer.generation()
                        );
                    }
                    layer.replace(generation, markers);
                })
                .and_then(|_| layers.get_layer(&category.id))
                .ok_or_else(|| MapError::UnknownCategory(category.id.clone()))?;

            self.context.widget()?.show_layer(layer)?;
            layer.len()
        };

        let element_id = category.count_element_id();
        if let Err(e) = self
            .context
            .document()
            .set_text(&element_id, &count.to_string())
        {
            log::error!("{}: could not update #{}: {}", category.id, element_id, e);
        }
        Ok(count)
    }
}
