use crate::constants::{GUEST_NAME_ID_CHARS, GUEST_NAME_PREFIX};
use mongodb::bson::oid::ObjectId;
use std::fmt;

/// Who a request acts for, resolved once from the bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Registered { id: ObjectId },
    Guest { id: String },
}

impl Identity {
    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest { .. })
    }

    /// Stable string form used for token subjects and lock keys.
    pub fn subject(&self) -> String {
        match self {
            Identity::Registered { id } => id.to_hex(),
            Identity::Guest { id } => id.clone(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Registered { id } => write!(f, "user:{}", id.to_hex()),
            Identity::Guest { id } => write!(f, "guest:{}", id),
        }
    }
}

pub fn guest_display_name(guest_id: &str) -> String {
    let short: String = guest_id.chars().take(GUEST_NAME_ID_CHARS).collect();
    format!("{}{}", GUEST_NAME_PREFIX, short)
}
