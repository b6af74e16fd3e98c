//! Session state: who is signed in and with which tokens
//!
//! Signup has two outcomes. When the server asks for OTP verification (or
//! returns no token) the user is stored but the session stays
//! unauthenticated with `awaiting_verification` set; a later `verify_otp`
//! completes the sign-in. Otherwise signup signs in directly like `login`.

use super::lifecycle::{settle, Phase, RequestStatus, Tracked};
use super::user::UserAction;
use crate::api::{AuthResponse, LoginRequest, OtpRequest, SignupRequest, SignupResponse};
use crate::error::ActionError;
use crate::store::Store;
use crate::types::User;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    /// Signed up, waiting for the OTP step
    pub awaiting_verification: bool,
    pub status: RequestStatus,
}

impl Tracked for AuthState {
    fn status(&self) -> &RequestStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut RequestStatus {
        &mut self.status
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Login(Phase<AuthResponse>),
    Signup(Phase<SignupResponse>),
    VerifyOtp(Phase<AuthResponse>),
    Logout(Phase<()>),
    ClearError,
    /// Replace the signed-in user's record (e.g. after a profile edit)
    UpdateUser(User),
    /// Tokens rotated outside the login flow
    SetTokens {
        token: String,
        refresh_token: Option<String>,
    },
}

impl AuthAction {
    pub fn name(&self) -> &'static str {
        match self {
            AuthAction::Login(_) => "auth/login",
            AuthAction::Signup(_) => "auth/signup",
            AuthAction::VerifyOtp(_) => "auth/verifyOtp",
            AuthAction::Logout(_) => "auth/logout",
            AuthAction::ClearError => "auth/clearError",
            AuthAction::UpdateUser(_) => "auth/updateUser",
            AuthAction::SetTokens { .. } => "auth/setTokens",
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            AuthAction::Login(p) | AuthAction::VerifyOtp(p) => Some(p.name()),
            AuthAction::Signup(p) => Some(p.name()),
            AuthAction::Logout(p) => Some(p.name()),
            _ => None,
        }
    }
}

pub fn reduce(state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Login(phase) | AuthAction::VerifyOtp(phase) => {
            settle(state, phase, |s, response| {
                sign_in(s, response.user, response.token, Some(response.refresh_token))
            })
        }

        AuthAction::Signup(phase) => settle(state, phase, |s, response| match response.token {
            Some(token) if !response.needs_verification => {
                sign_in(s, response.user, token, response.refresh_token)
            }
            _ => {
                s.is_authenticated = false;
                s.user = Some(response.user);
                s.token = None;
                s.refresh_token = None;
                s.awaiting_verification = true;
            }
        }),

        AuthAction::Logout(phase) => settle(state, phase, |s, ()| {
            s.is_authenticated = false;
            s.user = None;
            s.token = None;
            s.refresh_token = None;
            s.awaiting_verification = false;
        }),

        AuthAction::ClearError => AuthState {
            status: RequestStatus {
                error: None,
                ..state.status
            },
            ..state
        },

        AuthAction::UpdateUser(user) => AuthState {
            user: Some(user),
            ..state
        },

        AuthAction::SetTokens {
            token,
            refresh_token,
        } => AuthState {
            token: Some(token),
            refresh_token: refresh_token.or(state.refresh_token),
            ..state
        },
    }
}

fn sign_in(state: &mut AuthState, user: User, token: String, refresh_token: Option<String>) {
    state.is_authenticated = true;
    state.user = Some(user);
    state.token = Some(token);
    state.refresh_token = refresh_token;
    state.awaiting_verification = false;
}

fn require(field: &str, value: &str) -> Result<(), ActionError> {
    if value.trim().is_empty() {
        return Err(ActionError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

// === Async actions ===

impl Store {
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ActionError> {
        self.run(AuthAction::Login, async {
            require("email", &request.email)?;
            require("password", &request.password)?;
            self.api().login(&request).await
        })
        .await
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, ActionError> {
        self.run(AuthAction::Signup, async {
            require("name", &request.name)?;
            require("email", &request.email)?;
            require("phone", &request.phone)?;
            require("password", &request.password)?;
            self.api().signup(&request).await
        })
        .await
    }

    pub async fn verify_otp(&self, request: OtpRequest) -> Result<AuthResponse, ActionError> {
        self.run(AuthAction::VerifyOtp, async {
            require("phone", &request.phone)?;
            require("otp", &request.otp)?;
            self.api().verify_otp(&request).await
        })
        .await
    }

    /// End the session. The local session is cleared whatever the server
    /// answers.
    /// End the session locally whatever the server says, and drop the
    /// signed-out account's profile and addresses.
    pub async fn logout(&self) {
        self.dispatch(AuthAction::Logout(Phase::Requested));
        if let Err(error) = self.api().logout().await {
            tracing::warn!(%error, "logout request failed, clearing session anyway");
        }
        self.dispatch(AuthAction::Logout(Phase::Succeeded(())));
        self.dispatch(UserAction::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+100".to_string(),
            role: UserRole::Customer,
            is_verified: true,
            avatar: None,
            location: None,
        }
    }

    fn auth_response() -> AuthResponse {
        AuthResponse {
            user: user(),
            token: "t1".to_string(),
            refresh_token: "r1".to_string(),
        }
    }

    fn signed_in() -> AuthState {
        reduce(AuthState::default(), AuthAction::Login(Phase::Succeeded(auth_response())))
    }

    #[test]
    fn test_login_succeeded() {
        let state = reduce(AuthState::default(), AuthAction::Login(Phase::Requested));
        assert!(state.status.loading);

        let state = reduce(state, AuthAction::Login(Phase::Succeeded(auth_response())));
        assert!(state.is_authenticated);
        assert_eq!(state.user, Some(user()));
        assert_eq!(state.token.as_deref(), Some("t1"));
        assert_eq!(state.refresh_token.as_deref(), Some("r1"));
        assert_eq!(state.status, RequestStatus::default());
    }

    #[test]
    fn test_login_failed_keeps_previous_session() {
        let state = signed_in();
        let state = reduce(state, AuthAction::Login(Phase::Requested));
        let state = reduce(state, AuthAction::Login(Phase::Failed(ActionError::status(401))));

        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("t1"));
        assert!(!state.status.loading);
        assert!(state.status.error.is_some());
    }

    #[test]
    fn test_signup_needing_verification_stays_signed_out() {
        let response = SignupResponse {
            user: user(),
            token: Some("ignored".to_string()),
            refresh_token: Some("ignored".to_string()),
            needs_verification: true,
        };
        let state = reduce(AuthState::default(), AuthAction::Signup(Phase::Succeeded(response)));

        assert!(!state.is_authenticated);
        assert!(state.awaiting_verification);
        assert_eq!(state.user, Some(user()));
        assert!(state.token.is_none());
        assert!(state.refresh_token.is_none());
    }

    #[test]
    fn test_signup_without_token_waits_for_verification() {
        let response = SignupResponse {
            user: user(),
            token: None,
            refresh_token: None,
            needs_verification: false,
        };
        let state = reduce(AuthState::default(), AuthAction::Signup(Phase::Succeeded(response)));
        assert!(!state.is_authenticated);
        assert!(state.awaiting_verification);
    }

    #[test]
    fn test_signup_with_token_signs_in() {
        let response = SignupResponse {
            user: user(),
            token: Some("t2".to_string()),
            refresh_token: Some("r2".to_string()),
            needs_verification: false,
        };
        let state = reduce(AuthState::default(), AuthAction::Signup(Phase::Succeeded(response)));
        assert!(state.is_authenticated);
        assert!(!state.awaiting_verification);
        assert_eq!(state.token.as_deref(), Some("t2"));
    }

    #[test]
    fn test_verify_otp_completes_signup() {
        let state = AuthState {
            user: Some(user()),
            awaiting_verification: true,
            ..Default::default()
        };
        let state = reduce(state, AuthAction::VerifyOtp(Phase::Succeeded(auth_response())));
        assert!(state.is_authenticated);
        assert!(!state.awaiting_verification);
    }

    #[test]
    fn test_logout_clears_session() {
        let state = reduce(signed_in(), AuthAction::Logout(Phase::Succeeded(())));
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert!(state.refresh_token.is_none());
    }

    #[test]
    fn test_clear_error() {
        let state = reduce(
            AuthState::default(),
            AuthAction::Login(Phase::Failed(ActionError::Network("down".to_string()))),
        );
        let state = reduce(state, AuthAction::ClearError);
        assert!(state.status.error.is_none());
    }

    #[test]
    fn test_set_tokens_keeps_refresh_when_absent() {
        let state = reduce(
            signed_in(),
            AuthAction::SetTokens {
                token: "t9".to_string(),
                refresh_token: None,
            },
        );
        assert_eq!(state.token.as_deref(), Some("t9"));
        assert_eq!(state.refresh_token.as_deref(), Some("r1"));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(AuthAction::Login(Phase::Requested).name(), "auth/login");
        assert_eq!(AuthAction::Login(Phase::Requested).phase(), Some("requested"));
        assert_eq!(AuthAction::ClearError.phase(), None);
    }
}
