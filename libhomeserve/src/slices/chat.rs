//! Booking conversations
//!
//! Chats live in an [`EntityList`]: most recently active first, with one chat
//! open at a time. A message is appended to the single stored copy, so the
//! open chat and its list entry always carry the same messages.

use std::collections::HashSet;

use super::lifecycle::EntityList;
use crate::types::{Chat, ChatMessage};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub chats: EntityList<Chat>,
}

impl ChatState {
    pub fn active_chat(&self) -> Option<&Chat> {
        self.chats.active()
    }

    pub fn chat_for_booking(&self, booking_id: &str) -> Option<&Chat> {
        self.chats
            .active()
            .filter(|chat| chat.booking_id == booking_id)
            .or_else(|| self.chats.iter().find(|chat| chat.booking_id == booking_id))
    }

    /// Unread messages across all listed chats not sent by `user_id`
    pub fn unread_count(&self, user_id: &str) -> usize {
        self.chats
            .iter()
            .flat_map(|chat| chat.messages.iter())
            .filter(|message| !message.read && message.sender_id != user_id)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    SetChats(Vec<Chat>),
    /// Open `chat`, replacing the listed copy if there is one
    OpenChat(Chat),
    CloseChat,
    AddMessage {
        chat_id: String,
        message: ChatMessage,
    },
    MarkMessagesAsRead {
        chat_id: String,
        message_ids: Vec<String>,
    },
}

impl ChatAction {
    pub fn name(&self) -> &'static str {
        match self {
            ChatAction::SetChats(_) => "chat/setChats",
            ChatAction::OpenChat(_) => "chat/openChat",
            ChatAction::CloseChat => "chat/closeChat",
            ChatAction::AddMessage { .. } => "chat/addMessage",
            ChatAction::MarkMessagesAsRead { .. } => "chat/markMessagesAsRead",
        }
    }
}

pub fn reduce(state: ChatState, action: ChatAction) -> ChatState {
    let mut state = state;
    match action {
        ChatAction::SetChats(chats) => state.chats.replace_all(chats),

        ChatAction::OpenChat(chat) => {
            let id = chat.id.clone();
            if state.chats.replace_existing(chat.clone()) {
                state.chats.set_active(&id);
            } else {
                state.chats.pin(chat);
            }
        }

        ChatAction::CloseChat => state.chats.clear_active(),

        // Messages for a chat that is neither listed nor open are dropped
        ChatAction::AddMessage { chat_id, message } => {
            if let Some(chat) = state.chats.get_mut(&chat_id) {
                chat.updated_at = Some(message.sent_at);
                chat.messages.push(message);
                state.chats.move_to_front(&chat_id);
            }
        }

        ChatAction::MarkMessagesAsRead {
            chat_id,
            message_ids,
        } => {
            let ids: HashSet<&str> = message_ids.iter().map(String::as_str).collect();
            if let Some(chat) = state.chats.get_mut(&chat_id) {
                for message in chat
                    .messages
                    .iter_mut()
                    .filter(|message| ids.contains(message.id.as_str()))
                {
                    message.read = true;
                }
            }
        }
    }
    state
}
