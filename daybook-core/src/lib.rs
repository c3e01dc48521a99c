//! Core types for daybook.
//!
//! This crate is shared by the server and the command-line client:
//! - `store`: durable, user-partitioned event storage
//! - `transport`: the operations a client can ask of a server
//! - `cursor`: lazy day-by-day listing over a transport
//! - `session` and `view`: what the client builds on top

pub mod config;
pub mod cursor;
pub mod error;
pub mod event;
pub mod session;
pub mod store;
pub mod transport;
pub mod user;
pub mod view;

pub use cursor::{EventCursor, MAX_DAYS_SCANNED, RangePredicate, RangedEvents};
pub use error::{ConfigError, StoreError, StoreResult, TransportError};
pub use event::{Event, EventId, EventSummary};
pub use session::Session;
pub use store::{EventStore, FileStore};
pub use transport::{LocalTransport, Transport};
pub use user::User;
pub use view::ViewSpan;
