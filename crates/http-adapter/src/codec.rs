//! Conversion between HTTP bodies and [`Sink`] payloads.
//!
//! The content kind travels in the `Content-Type` header. Exactly three MIME
//! types are recognised; anything else (including no header at all) decodes
//! as raw bytes, so decoding never yields an "unknown" kind.

use std::fmt;

use bytes::Bytes;
use dispatch::{ContentKind, Sink};
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http_body::Body;
use http_body_util::BodyExt;
use tracing::warn;

/// MIME type for [`ContentKind::RawBytes`].
pub const OCTET_STREAM: &str = "application/octet-stream";
/// MIME type for [`ContentKind::Text`].
pub const TEXT_PLAIN: &str = "text/plain";
/// MIME type for [`ContentKind::StructuredBinary`].
pub const X_PROTOBUF: &str = "application/x-protobuf";

const MIME_TABLE: [(ContentKind, &str); 3] = [
    (ContentKind::RawBytes, OCTET_STREAM),
    (ContentKind::Text, TEXT_PLAIN),
    (ContentKind::StructuredBinary, X_PROTOBUF),
];

/// Returns the canonical MIME string for `kind`.
pub fn mime_for(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::RawBytes => OCTET_STREAM,
        ContentKind::Text => TEXT_PLAIN,
        ContentKind::StructuredBinary => X_PROTOBUF,
    }
}

/// Maps a `Content-Type` value to a content kind.
///
/// Parameters such as `; charset=utf-8` are ignored and the comparison is
/// ASCII case-insensitive. Missing or unrecognised values map to raw bytes.
pub fn content_kind_from_mime(value: Option<&str>) -> ContentKind {
    let Some(value) = value else {
        return ContentKind::RawBytes;
    };
    let essence = value.split(';').next().unwrap_or_default().trim();
    MIME_TABLE
        .iter()
        .find(|(_, mime)| mime.eq_ignore_ascii_case(essence))
        .map(|(kind, _)| *kind)
        .unwrap_or(ContentKind::RawBytes)
}

/// Reads `body` to the end and tags it with the kind named in `headers`.
///
/// Returns `None` if reading fails; a partially read body is never returned.
pub async fn decode_sink<B>(body: B, headers: &HeaderMap) -> Option<Sink>
where
    B: Body,
    B::Error: fmt::Display,
{
    let payload = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            warn!(error = %err, "failed to read message body");
            return None;
        }
    };

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    Some(Sink::new(payload, content_kind_from_mime(content_type)))
}

/// Splits `sink` into a body and the matching `Content-Type` value.
pub fn encode_sink(sink: &Sink) -> (Bytes, HeaderValue) {
    (
        sink.payload().clone(),
        HeaderValue::from_static(mime_for(sink.kind())),
    )
}
