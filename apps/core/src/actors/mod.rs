//! # Actors Module
//!
//! The message pipeline and its collaborator seams.
//!
//! ## Components
//! - `traits`: store, transport and sentiment interfaces
//! - `intake`: per-event classify / persist / reply loop
//! - `broadcast`: operator fan-out with per-recipient isolation
//! - `supervisor`: actor owning both entry points
//! - `transport`: Messenger Send API client

pub mod broadcast;
pub mod intake;
pub mod messages;
pub mod supervisor;
pub mod traits;
pub mod transport;

pub use broadcast::{BroadcastDispatcher, BroadcastFailure, BroadcastReport};
pub use intake::{BatchReport, IntakePipeline, MEDIA_PLACEHOLDER};
pub use supervisor::SupervisorHandle;
pub use traits::{Collaborators, ContactStore, InteractionStore, MessageTransport};
pub use transport::GraphApiTransport;
