//! Root state tree and root action
//!
//! The root reducer only routes: each action goes to the slice that owns it,
//! and every other partition is carried over untouched.

use crate::slices::{
    auth, booking, chat, location, notification, service, ui, user, AuthAction, AuthState,
    BookingAction, BookingState, ChatAction, ChatState, LocationAction, LocationState,
    NotificationAction, NotificationState, ServiceAction, ServiceState, UiAction, UiState,
    UserAction, UserState,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub auth: AuthState,
    pub user: UserState,
    pub booking: BookingState,
    pub service: ServiceState,
    pub location: LocationState,
    pub chat: ChatState,
    pub notification: NotificationState,
    pub ui: UiState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    User(UserAction),
    Booking(BookingAction),
    Service(ServiceAction),
    Location(LocationAction),
    Chat(ChatAction),
    Notification(NotificationAction),
    Ui(UiAction),
}

impl Action {
    /// `"slice/action"`, as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Auth(a) => a.name(),
            Action::User(a) => a.name(),
            Action::Booking(a) => a.name(),
            Action::Service(a) => a.name(),
            Action::Location(a) => a.name(),
            Action::Chat(a) => a.name(),
            Action::Notification(a) => a.name(),
            Action::Ui(a) => a.name(),
        }
    }

    /// Lifecycle phase for async actions, `None` for plain commands
    pub fn phase(&self) -> Option<&'static str> {
        match self {
            Action::Auth(a) => a.phase(),
            Action::User(a) => a.phase(),
            Action::Booking(a) => a.phase(),
            Action::Service(a) => a.phase(),
            _ => None,
        }
    }
}

macro_rules! impl_from_slice_action {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Action {
                fn from(action: $ty) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from_slice_action! {
    Auth => AuthAction,
    User => UserAction,
    Booking => BookingAction,
    Service => ServiceAction,
    Location => LocationAction,
    Chat => ChatAction,
    Notification => NotificationAction,
    Ui => UiAction,
}

/// Pure root reducer
pub fn reduce(state: RootState, action: Action) -> RootState {
    match action {
        Action::Auth(action) => RootState {
            auth: auth::reduce(state.auth, action),
            ..state
        },
        Action::User(action) => RootState {
            user: user::reduce(state.user, action),
            ..state
        },
        Action::Booking(action) => RootState {
            booking: booking::reduce(state.booking, action),
            ..state
        },
        Action::Service(action) => RootState {
            service: service::reduce(state.service, action),
            ..state
        },
        Action::Location(action) => RootState {
            location: location::reduce(state.location, action),
            ..state
        },
        Action::Chat(action) => RootState {
            chat: chat::reduce(state.chat, action),
            ..state
        },
        Action::Notification(action) => RootState {
            notification: notification::reduce(state.notification, action),
            ..state
        },
        Action::Ui(action) => RootState {
            ui: ui::reduce(state.ui, action),
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;
    use crate::slices::Phase;

    #[test]
    fn test_reducer_is_pure() {
        let state = RootState::default();
        let before = state.clone();

        let next = reduce(state.clone(), UiAction::ShowLoading.into());

        assert_eq!(state, before);
        assert!(next.ui.global_loading);
    }

    #[test]
    fn test_failure_in_one_slice_leaves_others() {
        let state = reduce(
            RootState::default(),
            BookingAction::FetchAll(Phase::Failed(ActionError::status(500))).into(),
        );

        assert!(state.booking.status.error.is_some());
        assert!(state.auth.status.error.is_none());
        assert!(state.service.status.error.is_none());
        assert!(state.user.status.error.is_none());
    }

    #[test]
    fn test_action_names_and_phases() {
        let action: Action = ServiceAction::Search(Phase::Requested).into();
        assert_eq!(action.name(), "service/search");
        assert_eq!(action.phase(), Some("requested"));

        let action: Action = ChatAction::CloseChat.into();
        assert_eq!(action.name(), "chat/closeChat");
        assert_eq!(action.phase(), None);
    }
}
