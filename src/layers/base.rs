// LayerTrait is the shared LayerOperations trait
pub use crate::traits::LayerOperations as LayerTrait;

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties() {
        let props = LayerProperties::new("trap-data".to_string(), "Traps".to_string());

        assert_eq!(props.id, "trap-data");
        assert_eq!(props.name, "Traps");
        assert!(props.visible);
    }
}
