//! In-app notifications, newest first

use crate::types::Notification;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationState {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationAction {
    SetNotifications(Vec<Notification>),
    AddNotification(Notification),
    MarkRead(String),
    MarkAllRead,
    Clear,
}

impl NotificationAction {
    pub fn name(&self) -> &'static str {
        match self {
            NotificationAction::SetNotifications(_) => "notification/setNotifications",
            NotificationAction::AddNotification(_) => "notification/addNotification",
            NotificationAction::MarkRead(_) => "notification/markRead",
            NotificationAction::MarkAllRead => "notification/markAllRead",
            NotificationAction::Clear => "notification/clear",
        }
    }
}

pub fn reduce(state: NotificationState, action: NotificationAction) -> NotificationState {
    let mut notifications = state.notifications;
    match action {
        NotificationAction::SetNotifications(list) => notifications = list,
        NotificationAction::AddNotification(notification) => {
            notifications.retain(|n| n.id != notification.id);
            notifications.insert(0, notification);
        }
        NotificationAction::MarkRead(id) => {
            if let Some(n) = notifications.iter_mut().find(|n| n.id == id) {
                n.read = true;
            }
        }
        NotificationAction::MarkAllRead => notifications.iter_mut().for_each(|n| n.read = true),
        NotificationAction::Clear => notifications.clear(),
    }

    let unread_count = notifications.iter().filter(|n| !n.read).count();
    NotificationState {
        notifications,
        unread_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notification(id: &str) -> Notification {
        Notification {
            id: id.to_string(),
            title: "Booking accepted".to_string(),
            body: "Your cleaner is confirmed".to_string(),
            kind: "booking".to_string(),
            read: false,
            created_at: Utc::now(),
            booking_id: Some("b1".to_string()),
        }
    }

    #[test]
    fn test_add_prepends_and_counts() {
        let state = reduce(
            NotificationState::default(),
            NotificationAction::SetNotifications(vec![notification("n1")]),
        );
        let state = reduce(state, NotificationAction::AddNotification(notification("n2")));

        assert_eq!(state.notifications[0].id, "n2");
        assert_eq!(state.unread_count, 2);
    }

    #[test]
    fn test_add_duplicate_replaces() {
        let state = reduce(
            NotificationState::default(),
            NotificationAction::AddNotification(notification("n1")),
        );
        let state = reduce(state, NotificationAction::AddNotification(notification("n1")));
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn test_mark_read() {
        let state = reduce(
            NotificationState::default(),
            NotificationAction::SetNotifications(vec![notification("n1"), notification("n2")]),
        );
        let state = reduce(state, NotificationAction::MarkRead("n2".to_string()));
        assert_eq!(state.unread_count, 1);

        let state = reduce(state, NotificationAction::MarkAllRead);
        assert_eq!(state.unread_count, 0);
    }

    #[test]
    fn test_clear() {
        let state = reduce(
            NotificationState::default(),
            NotificationAction::SetNotifications(vec![notification("n1")]),
        );
        assert_eq!(reduce(state, NotificationAction::Clear), NotificationState::default());
    }
}
