//! Shared building blocks for slices
//!
//! - [`Phase`] and [`settle`]: the requested / succeeded / failed contract
//!   every remote-backed action goes through, written once.
//! - [`EntityList`]: an ordered list with an optional "active" entity where
//!   each entity is stored exactly once, so the list view and the active view
//!   cannot drift apart.

use std::collections::HashMap;

use crate::error::ActionError;
use crate::types::{Booking, Chat};

/// One step of an asynchronous action
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Requested,
    Succeeded(T),
    Failed(ActionError),
}

impl<T> Phase<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Requested => "requested",
            Phase::Succeeded(_) => "succeeded",
            Phase::Failed(_) => "failed",
        }
    }
}

/// `loading` / `error` pair carried by every slice with remote calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestStatus {
    pub loading: bool,
    pub error: Option<ActionError>,
}

impl RequestStatus {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self) {
        self.loading = false;
        self.error = None;
    }

    pub fn fail(&mut self, error: ActionError) {
        self.loading = false;
        self.error = Some(error);
    }

    /// Human-readable error text, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Slice state that carries a [`RequestStatus`]
pub trait Tracked {
    fn status(&self) -> &RequestStatus;
    fn status_mut(&mut self) -> &mut RequestStatus;
}

/// Reduce one lifecycle phase into `state`.
///
/// `apply` runs only on success, after `loading`/`error` are cleared. A failed
/// phase touches nothing but the status.
pub fn settle<S, T>(mut state: S, phase: Phase<T>, apply: impl FnOnce(&mut S, T)) -> S
where
    S: Tracked,
{
    match phase {
        Phase::Requested => state.status_mut().begin(),
        Phase::Succeeded(value) => {
            state.status_mut().succeed();
            apply(&mut state, value);
        }
        Phase::Failed(error) => state.status_mut().fail(error),
    }
    state
}

/// Entities addressed by a string id
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Booking {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Chat {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Ordered entities plus an optional active one.
///
/// The active entity is an id into the same storage as the list, so an update
/// by id is seen by both views at once. The active entity may be absent from
/// the visible list (for example after the list is replaced by a fetch that no
/// longer includes it); it is then kept until it stops being active.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityList<T> {
    order: Vec<String>,
    entities: HashMap<String, T>,
    active: Option<String>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entities: HashMap::new(),
            active: None,
        }
    }
}

impl<T: Keyed + Clone> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        let mut list = Self::new();
        list.replace_all(items);
        list
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entities in list order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn first(&self) -> Option<&T> {
        self.order.first().and_then(|id| self.entities.get(id))
    }

    /// Look up by id in the list or the active slot
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entities.get_mut(id)
    }

    /// Whether `id` is part of the visible list
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|key| key == id)
    }

    pub fn active(&self) -> Option<&T> {
        self.active.as_deref().and_then(|id| self.entities.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// Replace the visible list wholesale. The active entity is kept even if
    /// `items` no longer contains it. Duplicate ids keep their first position
    /// and the last payload.
    pub fn replace_all(&mut self, items: Vec<T>) {
        let active = self
            .active
            .as_ref()
            .and_then(|id| self.entities.remove(id).map(|entity| (id.clone(), entity)));

        self.order.clear();
        self.entities.clear();
        for item in items {
            let key = item.key().to_string();
            if !self.entities.contains_key(&key) {
                self.order.push(key.clone());
            }
            self.entities.insert(key, item);
        }

        if let Some((id, entity)) = active {
            self.entities.entry(id).or_insert(entity);
        }
    }

    /// Insert at the front, moving an existing entry with the same id
    pub fn prepend(&mut self, item: T) {
        let key = item.key().to_string();
        self.order.retain(|id| id != &key);
        self.order.insert(0, key.clone());
        self.entities.insert(key, item);
    }

    /// Replace in place when the id is listed, otherwise prepend.
    ///
    /// Returns `true` when an existing list entry was replaced.
    pub fn upsert(&mut self, item: T) -> bool {
        let key = item.key().to_string();
        if self.contains(&key) {
            self.entities.insert(key, item);
            true
        } else {
            self.prepend(item);
            false
        }
    }

    /// Replace the entity with the same id if it is listed or active.
    ///
    /// Unknown ids are ignored and `false` is returned.
    pub fn replace_existing(&mut self, item: T) -> bool {
        let key = item.key().to_string();
        if self.contains(&key) || self.is_active(&key) {
            self.entities.insert(key, item);
            true
        } else {
            false
        }
    }

    /// Make an already stored entity active.
    ///
    /// A previously active entity that is not listed is dropped.
    pub fn set_active(&mut self, id: &str) -> bool {
        if !self.entities.contains_key(id) {
            return false;
        }
        if !self.is_active(id) {
            self.clear_active();
            self.active = Some(id.to_string());
        }
        true
    }

    /// Store `item` (replacing any copy with its id) and make it active
    /// without adding it to the visible list.
    pub fn pin(&mut self, item: T) {
        let key = item.key().to_string();
        self.clear_active();
        self.entities.insert(key.clone(), item);
        self.active = Some(key);
    }

    pub fn clear_active(&mut self) {
        if let Some(id) = self.active.take() {
            if !self.contains(&id) {
                self.entities.remove(&id);
            }
        }
    }

    pub fn move_to_front(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                let key = self.order.remove(index);
                self.order.insert(0, key);
                true
            }
            None => false,
        }
    }
}
