//! Event model and the contracts of the code under test.
//!
//! - `DomainEvent` / `EventPayload`: recorded events and their typed payloads
//! - `DetailProjection`: the `{type, data}` shape used for event equality
//! - `CommandHandler` / `StateProjector`: pure functions replayed by the harness

pub mod command;
pub mod event;
pub mod handler;
pub mod projection;

pub use command::Command;
pub use event::{DetailProjection, DomainEvent, EventDetails, EventPayload, Metadata, Tags};
pub use handler::CommandHandler;
pub use projection::StateProjector;
