//! The map client: wires viewport state, the synchronizer and the detail
//! presenter together and drives them from load and viewport-change events.

use crate::core::config::ClientConfig;
use crate::core::context::ClientContext;
use crate::core::location::{LocationStore, ViewportState};
use crate::core::viewport::Viewport;
use crate::data::category::Category;
use crate::data::template::DetailView;
use crate::fetch::source::RecordSource;
use crate::layers::manager::LayerManager;
use crate::layers::marker::MarkerBinding;
use crate::prelude::Arc;
use crate::sync::{MarkerSynchronizer, RefreshReport};
use crate::ui::detail::DetailPresenter;
use crate::ui::document::HostDocument;
use crate::ui::widget::MapWidget;
use crate::{MapError, Result};

/// The client is refreshing while any category fetch is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    Refreshing,
}

pub struct MapClient {
    config: ClientConfig,
    viewport: ViewportState,
    synchronizer: Arc<MarkerSynchronizer>,
    presenter: DetailPresenter,
}

impl MapClient {
    /// Builds a client for the categories named in `config`
    pub fn new(
        config: ClientConfig,
        source: Arc<dyn RecordSource>,
        widget: Box<dyn MapWidget>,
        location: Box<dyn LocationStore>,
        document: Arc<dyn HostDocument>,
    ) -> Result<Self> {
        config.validate()?;
        let categories = config.resolve_categories()?;
        Ok(Self::with_categories(
            config, categories, source, widget, location, document,
        ))
    }

    /// Builds a client for an explicit category list
    pub fn with_categories(
        config: ClientConfig,
        categories: Vec<Category>,
        source: Arc<dyn RecordSource>,
        widget: Box<dyn MapWidget>,
        location: Box<dyn LocationStore>,
        document: Arc<dyn HostDocument>,
    ) -> Self {
        let context = Arc::new(ClientContext::new(widget, document.clone(), &categories));
        let synchronizer = Arc::new(MarkerSynchronizer::new(context, source, categories));
        let presenter = DetailPresenter::new(document, config.detail_element_id.clone());
        let viewport = ViewportState::new(location, config.default_viewport);

        Self {
            config,
            viewport,
            synchronizer,
            presenter,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    pub fn synchronizer(&self) -> &Arc<MarkerSynchronizer> {
        &self.synchronizer
    }

    pub fn state(&self) -> ClientState {
        if self.synchronizer.in_flight() > 0 {
            ClientState::Refreshing
        } else {
            ClientState::Idle
        }
    }

    /// Runs `f` with the current layers
    pub fn with_layers<R>(&self, f: impl FnOnce(&LayerManager) -> R) -> Result<R> {
        let layers = self.synchronizer.context().layers()?;
        Ok(f(&layers))
    }

    /// First half of page load: viewport from the fragment (or the default),
    /// widget initialisation and icon registration.
    pub fn mount(&mut self) -> Result<Viewport> {
        let viewport = self.viewport.parse_from_location();
        let context = self.synchronizer.context();
        let mut widget = context.widget()?;
        widget.initialize(
            &self.config.map_element_id,
            &viewport,
            &self.config.tiles,
        )?;
        for icon in context.icons() {
            widget.register_icon(icon)?;
        }
        log::info!("map mounted at {}", viewport.to_fragment());
        Ok(viewport)
    }

    /// Page load: [`mount`](Self::mount), then a refresh of every category.
    pub async fn load(&mut self) -> Result<RefreshReport> {
        let viewport = self.mount()?;
        Ok(self.synchronizer.refresh_all(&viewport).await)
    }

    /// Reads the new bounds from the widget and mirrors them into the fragment.
    pub fn record_viewport_change(&mut self) -> Result<Viewport> {
        let viewport = {
            let widget = self.synchronizer.context().widget()?;
            self.viewport.current_from_widget(&**widget)?
        };
        self.viewport.write_to_location(viewport)?;
        Ok(viewport)
    }

    /// Widget "viewport changed" event: update the fragment and refresh.
    pub async fn on_viewport_changed(&mut self) -> Result<RefreshReport> {
        let viewport = self.record_viewport_change()?;
        Ok(self.synchronizer.refresh_all(&viewport).await)
    }

    /// Like [`on_viewport_changed`](Self::on_viewport_changed) but leaves the
    /// refresh running in the background.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn on_viewport_changed_detached(
        &mut self,
    ) -> Result<Box<dyn crate::runtime::AsyncHandle>> {
        let viewport = self.record_viewport_change()?;
        Ok(self.synchronizer.spawn_refresh_all(viewport))
    }

    /// Marker activation: shows the bound record in the detail panel.
    pub fn activate(&self, binding: &MarkerBinding) -> Result<DetailView> {
        let category = self
            .synchronizer
            .category(&binding.category)
            .ok_or_else(|| MapError::UnknownCategory(binding.category.clone()))?;

        let record = {
            let layers = self.synchronizer.context().layers()?;
            layers
                .get_layer(&binding.category)
                .and_then(|layer| layer.find(binding))
                .map(|marker| marker.record().clone())
                .ok_or_else(|| {
                    MapError::Layer(format!(
                        "no marker at {}#{}",
                        binding.category, binding.index
                    ))
                })?
        };

        log::debug!("presenting {}#{}", binding.category, binding.index);
        self.presenter.present(category, &record)
    }
}
