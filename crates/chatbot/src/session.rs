//! Conversation history: the active transcript plus every saved conversation.
//!
//! A conversation is saved automatically once it holds more than the two seed
//! messages, and re-saved (upserted by id) after every later append. History
//! lives in memory only.

use chrono::{DateTime, Duration, Utc};
use numina_core::{Conversation, ConversationId, Message, SessionError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

use crate::store::{MessageStore, SEED_LEN};

/// How far back the history list reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryWindow {
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[default]
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "year")]
    Year,
}

impl HistoryWindow {
    pub fn days(&self) -> i64 {
        match self {
            HistoryWindow::Week => 7,
            HistoryWindow::TwoWeeks => 14,
            HistoryWindow::Month => 30,
            HistoryWindow::SixMonths => 180,
            HistoryWindow::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryWindow::Week => "week",
            HistoryWindow::TwoWeeks => "2weeks",
            HistoryWindow::Month => "month",
            HistoryWindow::SixMonths => "6months",
            HistoryWindow::Year => "year",
        }
    }

    /// Oldest `last_updated_at` still inside the window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::milliseconds(self.days() * 86_400_000)
    }
}

impl FromStr for HistoryWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(HistoryWindow::Week),
            "2weeks" => Ok(HistoryWindow::TwoWeeks),
            "month" => Ok(HistoryWindow::Month),
            "6months" => Ok(HistoryWindow::SixMonths),
            "year" => Ok(HistoryWindow::Year),
            other => Err(format!("unknown history window: {other}")),
        }
    }
}

impl std::fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SessionManager {
    active_id: ConversationId,
    store: MessageStore,
    /// Save order
    history: Vec<Conversation>,
    disclaimer_visible: bool,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            active_id: ConversationId::current(),
            store: MessageStore::seeded(),
            history: Vec::new(),
            disclaimer_visible: true,
        }
    }

    pub fn active_id(&self) -> &ConversationId {
        &self.active_id
    }

    /// The full active transcript, disclaimer included.
    pub fn transcript(&self) -> &[Message] {
        self.store.messages()
    }

    /// The transcript as displayed: the disclaimer is omitted once dismissed.
    pub fn visible_messages(&self) -> Vec<&Message> {
        self.store
            .messages()
            .iter()
            .filter(|m| self.disclaimer_visible || m.role != numina_core::Role::Disclaimer)
            .collect()
    }

    pub fn disclaimer_visible(&self) -> bool {
        self.disclaimer_visible
    }

    /// Hide the disclaimer. It stays in the transcript.
    pub fn dismiss_disclaimer(&mut self) {
        self.disclaimer_visible = false;
    }

    pub fn append(&mut self, message: Message) {
        self.append_at(message, Utc::now());
    }

    /// Append to the active transcript and autosave once past the seed.
    pub fn append_at(&mut self, message: Message, now: DateTime<Utc>) {
        self.store.push(message);
        if self.store.len() > SEED_LEN {
            self.save_active(now);
        }
    }

    fn save_active(&mut self, now: DateTime<Utc>) {
        let snapshot = Conversation::snapshot(
            self.active_id.clone(),
            self.store.messages().to_vec(),
            now,
        );
        match self.history.iter_mut().find(|c| c.id == self.active_id) {
            Some(existing) => *existing = snapshot,
            None => self.history.push(snapshot),
        }
        debug!(conversation = %self.active_id, messages = self.store.len(), "Saved conversation");
    }

    pub fn list(&self, window: HistoryWindow) -> Vec<&Conversation> {
        self.list_at(window, Utc::now())
    }

    /// Saved conversations updated within `window` of `now`, boundary included.
    pub fn list_at(&self, window: HistoryWindow, now: DateTime<Utc>) -> Vec<&Conversation> {
        let cutoff = window.cutoff(now);
        self.history
            .iter()
            .filter(|c| c.last_updated_at >= cutoff)
            .collect()
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.history.iter().find(|c| &c.id == id)
    }

    /// Make a saved conversation active, replacing the transcript in one step.
    pub fn switch_to(&mut self, id: &ConversationId) -> Result<(), SessionError> {
        let conversation = self
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let messages = conversation.messages.clone();
        self.store.replace(messages);
        self.active_id = id.clone();
        info!(conversation = %id, "Switched conversation");
        Ok(())
    }

    pub fn start_new(&mut self) -> ConversationId {
        self.start_new_at(Utc::now())
    }

    /// Reset to the seed messages under a fresh id. Saved history is kept.
    pub fn start_new_at(&mut self, now: DateTime<Utc>) -> ConversationId {
        self.active_id = ConversationId::from_time(now);
        self.store = MessageStore::seeded_at(now);
        self.disclaimer_visible = true;
        info!(conversation = %self.active_id, "Started new conversation");
        self.active_id.clone()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
