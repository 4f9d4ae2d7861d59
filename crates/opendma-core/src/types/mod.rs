pub mod blob;
pub mod content;
pub mod guid;
pub mod id;
pub mod reference;
pub mod timestamp;

pub use blob::Blob;
pub use content::{Content, ContentSource};
pub use guid::Guid;
pub use id::ObjectId;
pub use reference::{ObjectRef, RefIter, ReferenceList, ReferenceSeq};
pub use timestamp::{Timestamp, TimestampError};
