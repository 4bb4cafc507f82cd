//! HTTP adapter for the dispatch core.
//!
//! Lets a [`dispatch::Dispatcher`] be reached over HTTP ([`RemoteDispatcher`])
//! and lets the same core call remote peers over HTTP ([`RemoteDest`]).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Header names, MIME strings, method tokens and status
//! codes all live here. The [`dispatch`] crate sees only its own
//! [`dispatch::Request`] and [`dispatch::Response`] values.
//!
//! ## Wire Conventions
//!
//! | Concern | Wire form |
//! |---------|-----------|
//! | Verb | `PUT` = Call, `POST` = Send, anything else inbound = Call |
//! | Content kind | `Content-Type`: `application/octet-stream`, `text/plain`, `application/x-protobuf` |
//! | Credentials | `Authorization: Basic ...` |
//! | Deadline | `X-Dispatch-Timeout: 1.5s` |
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`codec`] | Sink <-> body + `Content-Type` |
//! | [`duration`] | Human-readable duration format used by the deadline header |
//! | [`bridge`] | Request/response translation between `http` and `dispatch` types |
//! | [`status`] | Dispatch error -> status code mapping |
//! | [`server`] | Inbound adapter (`RemoteDispatcher`) |
//! | [`client`] | Outbound adapter (`RemoteDest`) and its transport |
//! | [`config`] | Server and client configuration |
//! | [`error`] | Adapter-local error types |

pub mod bridge;
pub mod client;
pub mod codec;
pub mod config;
pub mod duration;
pub mod error;
pub mod server;
pub mod status;

pub use bridge::{
    build_request, method_for, resolve_request, resolve_response, verb_from_method,
    write_response, TIMEOUT_HEADER,
};
pub use client::{
    ClientAdapter, DefaultClientAdapter, RemoteDest, ReqwestTransport, Transport, WireBody,
};
pub use codec::{decode_sink, encode_sink, OCTET_STREAM, TEXT_PLAIN, X_PROTOBUF};
pub use config::{ClientConfig, ServerConfig};
pub use duration::{format_duration, parse_duration};
pub use error::{BoxError, BuildError, ConfigError, DurationParseError, TransportError};
pub use server::{DefaultServerAdapter, RemoteDispatcher, ServerAdapter};
pub use status::{error_response, to_status_error};
