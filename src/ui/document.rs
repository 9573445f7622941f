use crate::prelude::{HashMap, Mutex};
use crate::{MapError, Result};

/// Mount points provided by the host document, located by element id
pub trait HostDocument: Send + Sync {
    fn set_text(&self, element_id: &str, text: &str) -> Result<()>;

    /// Replaces the element's contents with trusted HTML
    fn set_html(&self, element_id: &str, html: &str) -> Result<()>;
}

/// In-memory document for headless use and tests
#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: Mutex<HashMap<String, String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of an element, if anything was written to it
    pub fn content(&self, element_id: &str) -> Option<String> {
        self.elements
            .lock()
            .ok()
            .and_then(|e| e.get(element_id).cloned())
    }

    fn write(&self, element_id: &str, content: &str) -> Result<()> {
        self.elements
            .lock()
            .map_err(|e| MapError::Widget(e.to_string()))?
            .insert(element_id.to_string(), content.to_string());
        Ok(())
    }
}

impl HostDocument for MemoryDocument {
    fn set_text(&self, element_id: &str, text: &str) -> Result<()> {
        self.write(element_id, text)
    }

    fn set_html(&self, element_id: &str, html: &str) -> Result<()> {
        self.write(element_id, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_replace_content() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.content("detail"), None);
        doc.set_html("detail", "<p>one</p>").unwrap();
        doc.set_html("detail", "<p>two</p>").unwrap();
        assert_eq!(doc.content("detail").as_deref(), Some("<p>two</p>"));
    }
}
