use crate::data::category::Category;
use crate::data::record::Record;
use crate::data::template::DetailView;
use crate::prelude::Arc;
use crate::ui::document::HostDocument;
use crate::Result;

/// Renders an activated record into the single shared detail panel.
///
/// Each call replaces the panel's previous contents; there is no history.
pub struct DetailPresenter {
    document: Arc<dyn HostDocument>,
    element_id: String,
}

impl DetailPresenter {
    pub fn new(document: Arc<dyn HostDocument>, element_id: impl Into<String>) -> Self {
        Self {
            document,
            element_id: element_id.into(),
        }
    }

    pub fn present(&self, category: &Category, record: &Record) -> Result<DetailView> {
        let view = category.template.render(record);
        self.document.set_html(&self.element_id, &view.to_html())?;
        Ok(view)
    }
}
