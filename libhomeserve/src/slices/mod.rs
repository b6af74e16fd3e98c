//! State slices
//!
//! Each slice owns one partition of the state tree:
//! - State: what is true right now
//! - Action: what can happen to it
//! - `reduce`: pure `(State, Action) -> State`, no I/O
//!
//! Slices backed by the remote API also define their async actions as methods
//! on [`Store`](crate::store::Store). Those wrap exactly one call each and
//! settle through [`lifecycle::settle`].

pub mod auth;
pub mod booking;
pub mod chat;
pub mod lifecycle;
pub mod location;
pub mod notification;
pub mod service;
pub mod ui;
pub mod user;

pub use auth::{AuthAction, AuthState};
pub use booking::{BookingAction, BookingState, Transition};
pub use chat::{ChatAction, ChatState};
pub use lifecycle::{EntityList, Phase, RequestStatus, Tracked};
pub use location::{LocationAction, LocationState};
pub use notification::{NotificationAction, NotificationState};
pub use service::{ServiceAction, ServiceState};
pub use ui::{UiAction, UiState};
pub use user::{UserAction, UserState};
