//! Payload value types exchanged between transports and the dispatch core.

use bytes::Bytes;

// ---------------------------------------------------------------------------
// Content kind
// ---------------------------------------------------------------------------

/// How the bytes of a [`Sink`] are meant to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentKind {
    /// Opaque bytes. Also the kind assumed when a transport names none.
    #[default]
    RawBytes,
    /// Human-readable text.
    Text,
    /// A structured binary encoding (e.g. protobuf).
    StructuredBinary,
}

impl ContentKind {
    /// All recognised kinds, in declaration order.
    pub const ALL: [ContentKind; 3] = [
        ContentKind::RawBytes,
        ContentKind::Text,
        ContentKind::StructuredBinary,
    ];
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentKind::RawBytes => "bytes",
            ContentKind::Text => "text",
            ContentKind::StructuredBinary => "structured",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// An immutable byte payload tagged with its [`ContentKind`].
///
/// Owned by the request or response that carries it. Cloning is cheap: the
/// payload is reference-counted, never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sink {
    payload: Bytes,
    kind: ContentKind,
}

impl Sink {
    /// Creates a [`Sink`] from a payload and its content kind.
    pub fn new(payload: impl Into<Bytes>, kind: ContentKind) -> Self {
        Self {
            payload: payload.into(),
            kind,
        }
    }

    /// Creates a raw-bytes [`Sink`].
    pub fn bytes(payload: impl Into<Bytes>) -> Self {
        Self::new(payload, ContentKind::RawBytes)
    }

    /// Creates a text [`Sink`].
    pub fn text(payload: impl Into<String>) -> Self {
        Self::new(payload.into(), ContentKind::Text)
    }

    /// Creates a structured-binary [`Sink`].
    pub fn structured(payload: impl Into<Bytes>) -> Self {
        Self::new(payload, ContentKind::StructuredBinary)
    }

    /// Returns the payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Returns the content kind.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Consumes the sink, returning its payload.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}
