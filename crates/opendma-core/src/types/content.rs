use crate::types::Blob;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Write};

///
/// ContentSource
///
/// Where a content element's payload lives. `Bytes` is fully materialized;
/// `External` records a repository locator plus the advertised size, and
/// transfer stays the binding's concern.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ContentSource {
    Bytes(Blob),
    External { locator: String, size: u64 },
}

///
/// Content
///
/// Value of a Content-kind property: a MIME type plus the payload source.
/// Equality is structural; two external elements with the same locator and
/// size compare equal without fetching anything.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Content {
    mime_type: String,
    source: ContentSource,
}

impl Content {
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: impl Into<Blob>) -> Self {
        Self {
            mime_type: mime_type.into(),
            source: ContentSource::Bytes(bytes.into()),
        }
    }

    #[must_use]
    pub fn external(mime_type: impl Into<String>, locator: impl Into<String>, size: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            source: ContentSource::External {
                locator: locator.into(),
                size,
            },
        }
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub const fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Payload size in bytes; for external elements, the advertised size.
    #[must_use]
    pub fn size(&self) -> u64 {
        match &self.source {
            ContentSource::Bytes(blob) => blob.len() as u64,
            ContentSource::External { size, .. } => *size,
        }
    }

    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self.source, ContentSource::External { .. })
    }

    /// Borrow the materialized payload, if there is one.
    #[must_use]
    pub const fn bytes(&self) -> Option<&Blob> {
        match &self.source {
            ContentSource::Bytes(blob) => Some(blob),
            ContentSource::External { .. } => None,
        }
    }

    /// Hex SHA-256 of a materialized payload. External payloads have no
    /// locally computable digest.
    #[must_use]
    pub fn sha256_hex(&self) -> Option<String> {
        let blob = self.bytes()?;
        let digest = Sha256::digest(blob.as_slice());

        let mut out = String::with_capacity(digest.len() * 2);
        for byte in digest {
            // infallible on String
            let _ = write!(out, "{byte:02x}");
        }

        Some(out)
    }
}

impl Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ({} bytes)]", self.mime_type, self.size())
    }
}
