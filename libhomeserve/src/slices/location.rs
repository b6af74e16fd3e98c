//! Last known device location
//!
//! Consumers read the location through two names, `user_location` and
//! `current_location`. Both are backed by the same stored snapshot, so they
//! are identical after every write.

use super::lifecycle::RequestStatus;
use crate::error::ActionError;
use crate::types::LocationSnapshot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationState {
    location: Option<LocationSnapshot>,
    pub status: RequestStatus,
}

impl LocationState {
    pub fn user_location(&self) -> Option<&LocationSnapshot> {
        self.location.as_ref()
    }

    pub fn current_location(&self) -> Option<&LocationSnapshot> {
        self.location.as_ref()
    }
}

/// Location is produced by the device, not the API, so every action here is
/// synchronous. The consumer owning the device lookup drives `SetLoading` and
/// `SetError` itself.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationAction {
    SetUserLocation(LocationSnapshot),
    SetLoading(bool),
    SetError(ActionError),
    ClearLocation,
}

impl LocationAction {
    pub fn name(&self) -> &'static str {
        match self {
            LocationAction::SetUserLocation(_) => "location/setUserLocation",
            LocationAction::SetLoading(_) => "location/setLoading",
            LocationAction::SetError(_) => "location/setError",
            LocationAction::ClearLocation => "location/clearLocation",
        }
    }
}

pub fn reduce(state: LocationState, action: LocationAction) -> LocationState {
    match action {
        LocationAction::SetUserLocation(snapshot) => LocationState {
            location: Some(snapshot),
            status: RequestStatus::default(),
        },
        LocationAction::SetLoading(loading) => LocationState {
            status: RequestStatus {
                loading,
                ..state.status
            },
            ..state
        },
        LocationAction::SetError(error) => LocationState {
            status: RequestStatus {
                loading: false,
                error: Some(error),
            },
            ..state
        },
        LocationAction::ClearLocation => LocationState {
            location: None,
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> LocationSnapshot {
        LocationSnapshot {
            latitude: 52.52,
            longitude: 13.405,
            address: Some("Alexanderplatz".to_string()),
        }
    }

    #[test]
    fn test_set_user_location_writes_both_views() {
        let state = reduce(LocationState::default(), LocationAction::SetUserLocation(snapshot()));
        assert_eq!(state.user_location(), Some(&snapshot()));
        assert_eq!(state.user_location(), state.current_location());
    }

    #[test]
    fn test_set_user_location_clears_flags() {
        let state = reduce(LocationState::default(), LocationAction::SetLoading(true));
        let state = reduce(
            state,
            LocationAction::SetError(ActionError::Unknown("permission denied".to_string())),
        );
        let state = reduce(state, LocationAction::SetLoading(true));
        assert!(state.status.loading);
        assert!(state.status.error.is_some());

        let state = reduce(state, LocationAction::SetUserLocation(snapshot()));
        assert!(!state.status.loading);
        assert!(state.status.error.is_none());
    }

    #[test]
    fn test_set_error_stops_loading() {
        let state = reduce(LocationState::default(), LocationAction::SetLoading(true));
        let state = reduce(
            state,
            LocationAction::SetError(ActionError::Unknown("no fix".to_string())),
        );
        assert!(!state.status.loading);
        assert_eq!(state.status.error_message().as_deref(), Some("no fix"));
    }

    #[test]
    fn test_clear_location() {
        let state = reduce(LocationState::default(), LocationAction::SetUserLocation(snapshot()));
        let state = reduce(state, LocationAction::ClearLocation);
        assert!(state.user_location().is_none());
        assert!(state.current_location().is_none());
    }
}
