
pub mod aspect;
pub mod choice;
pub mod class;
pub mod property;

pub use aspect::AspectDef;
pub use choice::{Choice, ChoiceListDef, ChoiceValue};
pub use class::ClassDef;
pub use property::PropertyDecl;
