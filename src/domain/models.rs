//! Domain models for exported page data.
//!
//! Records deserialize straight from Graph API payloads and serialize into
//! the context handed to user templates, so field names on the serialize
//! side are the names templates refer to.

use serde::{Deserialize, Serialize};

/// Typed container for one page of API results.
#[derive(Debug, Clone, Deserialize)]
pub struct Batch<T> {
    /// Records on this page.
    pub data: Vec<T>,
}

/// A thread between the page and one or more participants.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Conversation id (`t_...`).
    pub id: String,
    /// Last activity timestamp, as returned by the API.
    #[serde(default)]
    pub updated_time: String,
}

/// Author of a message.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Sender {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Message body (`message` on the wire).
    #[serde(default, alias = "message")]
    pub text: String,
    /// Who sent it. Missing for deleted accounts.
    #[serde(default)]
    pub from: Sender,
    #[serde(default)]
    pub created_time: String,
}

/// A conversation participant, as exported by the users command.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    /// Display time of the owning conversation's last update.
    #[serde(default, skip_deserializing)]
    pub last_send_time: String,
}

/// Participant list of a conversation (`?fields=participants`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Participants {
    #[serde(default)]
    pub participants: Option<Batch<User>>,
}

impl Participants {
    /// Consume into the raw participant list.
    #[must_use]
    pub fn into_users(self) -> Vec<User> {
        self.participants.map(|b| b.data).unwrap_or_default()
    }
}

/// Identity behind the access token (`/me`).
#[derive(Debug, Clone, Deserialize)]
pub struct PageIdentity {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Result of exchanging a short-lived token.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LongLivedToken {
    pub access_token: String,
    /// Seconds until expiry, 0 when the API does not say.
    #[serde(default)]
    pub expires_in: u64,
}

/// Template context for one page of messages.
#[derive(Debug, Serialize)]
pub struct MessagePage<'a> {
    pub conversation_id: &'a str,
    pub messages: &'a [Message],
}

/// Template context for the senders of one conversation page.
#[derive(Debug, Serialize)]
pub struct UserPage<'a> {
    pub users: &'a [User],
}

/// Counters accumulated during one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Result pages visited (conversation and message pages).
    pub pages: usize,
    /// Pages dropped because they failed to decode.
    pub skipped_pages: usize,
    /// Conversations visited.
    pub conversations: usize,
    /// Records handed to the template.
    pub records: usize,
    /// Template executions that failed.
    pub render_failures: usize,
}
