//! Homeserve - client state layer for the home-services marketplace
//!
//! This library holds everything the customer and provider apps know about
//! the session: who is signed in, their bookings, the service catalog, chats,
//! notifications and transient UI flags. State lives in a single [`Store`],
//! changes only through actions, and talks to the backend over a small REST
//! [`api`] layer.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod slices;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use api::{ApiClient, Transport};
pub use config::Config;
pub use error::{ActionError, HomeserveError, Result};
pub use slices::{Phase, RequestStatus};
pub use store::{Action, FileStorage, MemoryStorage, RootState, StateStorage, Store};
pub use types::{Booking, BookingStatus, Chat, ChatMessage, Provider, Service, User, UserRole};
