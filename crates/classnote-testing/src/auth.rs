//! Mock identity helpers for handler tests.
//!
//! Services behind the gateway receive `x-classnote-user-id` +
//! `x-classnote-user-role` after the gateway verified the caller's token.
//! `MockAuth` produces those headers directly so no gateway is needed.

use axum::http::{HeaderName, HeaderValue};
use uuid::Uuid;

use classnote_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use classnote_domain::id::UserId;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub user_role: u8,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: u8) -> Self {
        Self {
            user_id: UserId(user_id),
            user_role,
        }
    }

    /// A regular (role 0) user with a fresh id.
    pub fn user() -> Self {
        Self::new(Uuid::now_v7(), 0)
    }

    /// Header pairs as the gateway would inject them.
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        vec![
            (
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
            ),
            (
                HeaderName::from_static(USER_ROLE_HEADER),
                HeaderValue::from(u16::from(self.user_role)),
            ),
        ]
    }
}
