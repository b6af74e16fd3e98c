//! Transient UI flags
//!
//! Command-style reducers only; nothing here talks to the API and none of it
//! survives a restart.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastSeverity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// What a modal is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalPayload {
    ConfirmCancel { booking_id: String },
    RateBooking { booking_id: String },
    ProviderDetails { provider_id: String },
    Message { title: String, body: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub visible: bool,
    pub payload: Option<ModalPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastState {
    pub visible: bool,
    pub message: String,
    pub severity: ToastSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub theme: Theme,
    pub language: String,
    /// Full-screen loading overlay
    pub global_loading: bool,
    pub modal: ModalState,
    pub toast: ToastState,
    pub network_online: bool,
    pub keyboard_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: "en".to_string(),
            global_loading: false,
            modal: ModalState::default(),
            toast: ToastState::default(),
            network_online: true,
            keyboard_visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SetTheme(Theme),
    SetLanguage(String),
    ShowLoading,
    HideLoading,
    ShowModal(ModalPayload),
    HideModal,
    ShowToast {
        message: String,
        severity: ToastSeverity,
    },
    HideToast,
    SetNetworkStatus(bool),
    SetKeyboardVisible(bool),
}

impl UiAction {
    pub fn name(&self) -> &'static str {
        match self {
            UiAction::SetTheme(_) => "ui/setTheme",
            UiAction::SetLanguage(_) => "ui/setLanguage",
            UiAction::ShowLoading => "ui/showLoading",
            UiAction::HideLoading => "ui/hideLoading",
            UiAction::ShowModal(_) => "ui/showModal",
            UiAction::HideModal => "ui/hideModal",
            UiAction::ShowToast { .. } => "ui/showToast",
            UiAction::HideToast => "ui/hideToast",
            UiAction::SetNetworkStatus(_) => "ui/setNetworkStatus",
            UiAction::SetKeyboardVisible(_) => "ui/setKeyboardVisible",
        }
    }
}

pub fn reduce(state: UiState, action: UiAction) -> UiState {
    match action {
        UiAction::SetTheme(theme) => UiState { theme, ..state },
        UiAction::SetLanguage(language) => UiState { language, ..state },
        UiAction::ShowLoading => UiState {
            global_loading: true,
            ..state
        },
        UiAction::HideLoading => UiState {
            global_loading: false,
            ..state
        },
        UiAction::ShowModal(payload) => UiState {
            modal: ModalState {
                visible: true,
                payload: Some(payload),
            },
            ..state
        },
        UiAction::HideModal => UiState {
            modal: ModalState::default(),
            ..state
        },
        UiAction::ShowToast { message, severity } => UiState {
            toast: ToastState {
                visible: true,
                message,
                severity,
            },
            ..state
        },
        // Keep the text so a fade-out can still render it
        UiAction::HideToast => UiState {
            toast: ToastState {
                visible: false,
                ..state.toast
            },
            ..state
        },
        UiAction::SetNetworkStatus(network_online) => UiState {
            network_online,
            ..state
        },
        UiAction::SetKeyboardVisible(keyboard_visible) => UiState {
            keyboard_visible,
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = UiState::default();
        assert_eq!(state.theme, Theme::System);
        assert_eq!(state.language, "en");
        assert!(state.network_online);
        assert!(!state.modal.visible);
    }

    #[test]
    fn test_modal_carries_payload() {
        let payload = ModalPayload::ConfirmCancel {
            booking_id: "b1".to_string(),
        };
        let state = reduce(UiState::default(), UiAction::ShowModal(payload.clone()));
        assert!(state.modal.visible);
        assert_eq!(state.modal.payload, Some(payload));

        let state = reduce(state, UiAction::HideModal);
        assert_eq!(state.modal, ModalState::default());
    }

    #[test]
    fn test_toast_hide_keeps_message() {
        let state = reduce(
            UiState::default(),
            UiAction::ShowToast {
                message: "Booking created".to_string(),
                severity: ToastSeverity::Success,
            },
        );
        let state = reduce(state, UiAction::HideToast);
        assert!(!state.toast.visible);
        assert_eq!(state.toast.message, "Booking created");
        assert_eq!(state.toast.severity, ToastSeverity::Success);
    }

    #[test]
    fn test_flags() {
        let state = reduce(UiState::default(), UiAction::ShowLoading);
        let state = reduce(state, UiAction::SetNetworkStatus(false));
        let state = reduce(state, UiAction::SetKeyboardVisible(true));
        let state = reduce(state, UiAction::SetTheme(Theme::Dark));
        let state = reduce(state, UiAction::SetLanguage("de".to_string()));

        assert!(state.global_loading);
        assert!(!state.network_online);
        assert!(state.keyboard_visible);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.language, "de");

        let state = reduce(state, UiAction::HideLoading);
        assert!(!state.global_loading);
    }
}
