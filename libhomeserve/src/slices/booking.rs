//! Bookings and the one booking currently being tracked
//!
//! Every booking is stored once in an [`EntityList`]; the active booking is an
//! id into the same storage. Any update by id (a lifecycle call, a refetch, a
//! provider location ping) is therefore visible through both
//! [`BookingState::bookings`] and [`BookingState::active_booking`] at once.
//!
//! Status transitions are decided by the server. The client only stores what
//! each call returns.

use super::lifecycle::{settle, EntityList, Phase, RequestStatus, Tracked};
use crate::error::ActionError;
use crate::store::Store;
use crate::types::{Booking, BookingStatus, Coordinates, NewBooking};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingState {
    pub list: EntityList<Booking>,
    pub status: RequestStatus,
}

impl Tracked for BookingState {
    fn status(&self) -> &RequestStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut RequestStatus {
        &mut self.status
    }
}

impl BookingState {
    /// Bookings in display order (newest created first)
    pub fn bookings(&self) -> Vec<Booking> {
        self.list.to_vec()
    }

    pub fn active_booking(&self) -> Option<&Booking> {
        self.list.active()
    }

    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.list.get(id)
    }

    pub fn by_status(&self, status: BookingStatus) -> Vec<&Booking> {
        self.list.iter().filter(|b| b.status == status).collect()
    }

    /// Bookings that still expect a lifecycle call, soonest first
    pub fn upcoming(&self) -> Vec<&Booking> {
        let mut upcoming: Vec<&Booking> =
            self.list.iter().filter(|b| !b.status.is_terminal()).collect();
        upcoming.sort_by_key(|b| b.scheduled_at);
        upcoming
    }
}

/// Which lifecycle call produced a booking update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accept,
    Reject,
    Start,
    Complete,
    Cancel,
    Rate,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Accept => "booking/accept",
            Transition::Reject => "booking/reject",
            Transition::Start => "booking/start",
            Transition::Complete => "booking/complete",
            Transition::Cancel => "booking/cancel",
            Transition::Rate => "booking/rate",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingAction {
    Create(Phase<Booking>),
    FetchAll(Phase<Vec<Booking>>),
    FetchById(Phase<Booking>),
    Transition(Transition, Phase<Booking>),
    SetActive(String),
    ClearActive,
    UpdateProviderLocation {
        booking_id: String,
        location: Coordinates,
    },
    ClearError,
}

impl BookingAction {
    pub fn name(&self) -> &'static str {
        match self {
            BookingAction::Create(_) => "booking/create",
            BookingAction::FetchAll(_) => "booking/fetchAll",
            BookingAction::FetchById(_) => "booking/fetchById",
            BookingAction::Transition(transition, _) => transition.name(),
            BookingAction::SetActive(_) => "booking/setActive",
            BookingAction::ClearActive => "booking/clearActive",
            BookingAction::UpdateProviderLocation { .. } => "booking/updateProviderLocation",
            BookingAction::ClearError => "booking/clearError",
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            BookingAction::Create(p)
            | BookingAction::FetchById(p)
            | BookingAction::Transition(_, p) => Some(p.name()),
            BookingAction::FetchAll(p) => Some(p.name()),
            _ => None,
        }
    }
}

pub fn reduce(state: BookingState, action: BookingAction) -> BookingState {
    match action {
        BookingAction::Create(phase) => settle(state, phase, |s, booking| {
            let id = booking.id.clone();
            s.list.prepend(booking);
            s.list.set_active(&id);
        }),

        BookingAction::FetchAll(phase) => {
            settle(state, phase, |s, bookings| s.list.replace_all(bookings))
        }

        BookingAction::FetchById(phase) => settle(state, phase, |s, booking| {
            s.list.upsert(booking);
        }),

        // A booking held neither in the list nor as active is not inserted
        BookingAction::Transition(_, phase) => settle(state, phase, |s, booking| {
            s.list.replace_existing(booking);
        }),

        BookingAction::SetActive(id) => {
            let mut state = state;
            state.list.set_active(&id);
            state
        }

        BookingAction::ClearActive => {
            let mut state = state;
            state.list.clear_active();
            state
        }

        BookingAction::UpdateProviderLocation {
            booking_id,
            location,
        } => {
            let mut state = state;
            if let Some(booking) = state.list.get_mut(&booking_id) {
                booking.provider_location = Some(location);
            }
            state
        }

        BookingAction::ClearError => {
            let mut state = state;
            state.status.error = None;
            state
        }
    }
}

// === Async actions ===

impl Store {
    pub async fn create_booking(&self, booking: NewBooking) -> Result<Booking, ActionError> {
        self.run(BookingAction::Create, async {
            if booking.address.trim().is_empty() {
                return Err(ActionError::Validation("address cannot be empty".to_string()));
            }
            self.api().create_booking(&booking).await
        })
        .await
    }

    pub async fn fetch_bookings(&self) -> Result<Vec<Booking>, ActionError> {
        self.run(BookingAction::FetchAll, self.api().fetch_bookings())
            .await
    }

    pub async fn fetch_booking_by_id(&self, id: &str) -> Result<Booking, ActionError> {
        self.run(BookingAction::FetchById, self.api().fetch_booking(id))
            .await
    }

    pub async fn accept_booking(&self, id: &str) -> Result<Booking, ActionError> {
        self.run(transition(Transition::Accept), self.api().accept_booking(id))
            .await
    }

    pub async fn reject_booking(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.run(transition(Transition::Reject), self.api().reject_booking(id, reason))
            .await
    }

    pub async fn start_booking(&self, id: &str) -> Result<Booking, ActionError> {
        self.run(transition(Transition::Start), self.api().start_booking(id))
            .await
    }

    pub async fn complete_booking(
        &self,
        id: &str,
        notes: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.run(transition(Transition::Complete), self.api().complete_booking(id, notes))
            .await
    }

    pub async fn cancel_booking(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.run(transition(Transition::Cancel), self.api().cancel_booking(id, reason))
            .await
    }

    /// Rate a finished booking; `rating` must be 1 to 5
    pub async fn rate_booking(
        &self,
        id: &str,
        rating: u8,
        review: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.run(transition(Transition::Rate), async {
            if !(1..=5).contains(&rating) {
                return Err(ActionError::Validation(format!(
                    "rating must be between 1 and 5, got {}",
                    rating
                )));
            }
            self.api().rate_booking(id, rating, review).await
        })
        .await
    }
}

fn transition(transition: Transition) -> impl Fn(Phase<Booking>) -> BookingAction {
    move |phase| BookingAction::Transition(transition, phase)
}
