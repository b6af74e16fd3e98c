//! Profile and saved addresses of the signed-in user

use super::lifecycle::{settle, Phase, RequestStatus, Tracked};
use crate::api::ProfileUpdate;
use crate::error::ActionError;
use crate::store::Store;
use crate::types::{Address, NewAddress, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub profile: Option<User>,
    pub addresses: Vec<Address>,
    pub status: RequestStatus,
}

impl Tracked for UserState {
    fn status(&self) -> &RequestStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut RequestStatus {
        &mut self.status
    }
}

impl UserState {
    /// First address flagged as default. Nothing here stops the server from
    /// flagging more than one.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    FetchProfile(Phase<User>),
    UpdateProfile(Phase<User>),
    FetchAddresses(Phase<Vec<Address>>),
    AddAddress(Phase<Address>),
    ClearError,
    Reset,
}

impl UserAction {
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::FetchProfile(_) => "user/fetchProfile",
            UserAction::UpdateProfile(_) => "user/updateProfile",
            UserAction::FetchAddresses(_) => "user/fetchAddresses",
            UserAction::AddAddress(_) => "user/addAddress",
            UserAction::ClearError => "user/clearError",
            UserAction::Reset => "user/reset",
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            UserAction::FetchProfile(p) | UserAction::UpdateProfile(p) => Some(p.name()),
            UserAction::FetchAddresses(p) => Some(p.name()),
            UserAction::AddAddress(p) => Some(p.name()),
            UserAction::ClearError | UserAction::Reset => None,
        }
    }
}

pub fn reduce(state: UserState, action: UserAction) -> UserState {
    match action {
        UserAction::FetchProfile(phase) | UserAction::UpdateProfile(phase) => {
            settle(state, phase, |s, profile| s.profile = Some(profile))
        }
        UserAction::FetchAddresses(phase) => {
            settle(state, phase, |s, addresses| s.addresses = addresses)
        }
        UserAction::AddAddress(phase) => {
            settle(state, phase, |s, address| s.addresses.push(address))
        }
        UserAction::ClearError => {
            let mut state = state;
            state.status.error = None;
            state
        }
        UserAction::Reset => UserState::default(),
    }
}

// === Async actions ===

impl Store {
    pub async fn fetch_profile(&self) -> Result<User, ActionError> {
        self.run(UserAction::FetchProfile, self.api().fetch_profile())
            .await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, ActionError> {
        self.run(UserAction::UpdateProfile, async {
            if update == ProfileUpdate::default() {
                return Err(ActionError::Validation("nothing to update".to_string()));
            }
            self.api().update_profile(&update).await
        })
        .await
    }

    pub async fn fetch_addresses(&self) -> Result<Vec<Address>, ActionError> {
        self.run(UserAction::FetchAddresses, self.api().fetch_addresses())
            .await
    }

    pub async fn add_address(&self, address: NewAddress) -> Result<Address, ActionError> {
        self.run(UserAction::AddAddress, async {
            if address.line.trim().is_empty() {
                return Err(ActionError::Validation("address line cannot be empty".to_string()));
            }
            self.api().add_address(&address).await
        })
        .await
    }
}
