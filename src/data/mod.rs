pub mod category;
pub mod record;
pub mod template;

pub use category::{Category, CoordinatePath, Icon};
pub use record::{parse_records, Record};
pub use template::{DetailEntry, DetailTemplate, DetailView, FieldKind, FieldSpec};
