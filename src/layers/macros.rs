//! Macros to reduce boilerplate in layer implementations

/// Implements the property-backed `LayerTrait` methods:
/// id(), name(), is_visible(), set_visible().
///
/// Usage:
/// ```ignore
/// impl LayerTrait for MyLayer {
///     fieldmap::impl_layer_trait!(MyLayer, properties);
///     fn len(&self) -> usize { 0 }
/// }
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($layer_type:ty, $properties_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn is_visible(&self) -> bool {
            self.$properties_field.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$properties_field.visible = visible;
        }
    };
}
