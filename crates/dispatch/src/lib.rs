//! Core message model for the request-dispatch engine.
//!
//! This crate contains the transport-neutral view of a dispatched request: the
//! payload ([`Sink`]), the request and response values, the error taxonomy of
//! the dispatch core, and the [`Dispatcher`] port that adapters invoke.
//! Adapter crates translate to and from these types; they never add routing
//! rules of their own.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a request is; adapter crates define *how* it travels.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Routing address and credential values |
//! | [`types`] | Payload value types (`Sink`, `ContentKind`) |
//! | [`message`] | `Request`, `Response`, `Verb` |
//! | [`errors`] | Dispatch error taxonomy and `StatusError` |
//! | [`context`] | Deadline-bearing execution context |
//! | [`dispatcher`] | The `Dispatcher` port trait |

pub mod context;
pub mod dispatcher;
pub mod errors;
pub mod identifiers;
pub mod message;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use context::{Context, DEFAULT_TIMEOUT};
pub use dispatcher::Dispatcher;
pub use errors::{DispatchError, StatusError};
pub use identifiers::{Address, Credentials};
pub use message::{Request, Response, Verb};
pub use types::{ContentKind, Sink};
