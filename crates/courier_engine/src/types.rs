use courier_core::{InvalidRangeError, MediaKind};

/// Identity returned by the platform's "get bot identity" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Membership standing of a user inside a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
    Other(String),
}

impl ChatMemberStatus {
    /// Whether this standing allows managing the channel.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            ChatMemberStatus::Creator | ChatMemberStatus::Administrator
        )
    }

    pub(crate) fn from_wire(status: &str) -> Self {
        match status {
            "creator" => ChatMemberStatus::Creator,
            "administrator" => ChatMemberStatus::Administrator,
            "member" => ChatMemberStatus::Member,
            "restricted" => ChatMemberStatus::Restricted,
            "left" => ChatMemberStatus::Left,
            "kicked" => ChatMemberStatus::Kicked,
            other => ChatMemberStatus::Other(other.to_string()),
        }
    }
}

/// Best-effort metadata about a source message. The platform offers no
/// general fetch-by-id, so most copies run without this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMeta {
    pub kind: MediaKind,
    pub caption: String,
    pub file_name: String,
    pub file_size: u64,
}

/// Classified result of a single copy attempt. The classification decides
/// whether the run loop advances, retries the same id, or counts toward the
/// error-storm threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Success {
        new_message_id: i64,
    },
    /// The platform throttled the bot; retry the same id after the hint.
    RateLimited {
        retry_after_secs: u64,
    },
    /// Expected content-absence condition; logged and passed over.
    Skippable {
        reason: String,
    },
    /// Unexpected structured error.
    RealError {
        description: String,
    },
    /// No usable response from the platform at all.
    NetworkError {
        description: String,
    },
}

/// Failure of a non-copy API call (identity probe, member lookup).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("api error: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("network error: {0}")]
    Network(String),
}

/// Why a run refused to start. Per-message failures never surface here;
/// they are handled inside the loop.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("transport is not connected: {0}")]
    NotConnected(String),
    #[error("source and destination channels must both be set")]
    MissingChannel,
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),
}
