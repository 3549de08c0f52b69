use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored capsule, normalized across storage backends.
///
/// The server only ever holds ciphertext here. `Debug` redacts it so a capsule
/// can be logged without leaking the sealed payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    pub id: String,
    pub ciphertext: String,
    pub created_at: DateTime<Utc>,
    /// `None` for legacy rows whose unlock date is missing or unreadable.
    pub unlock_at: Option<NaiveDate>,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub title: Option<String>,
}

impl fmt::Debug for Capsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capsule")
            .field("id", &self.id)
            .field("ciphertext", &format_args!("<{} bytes sealed>", self.ciphertext.len()))
            .field("created_at", &self.created_at)
            .field("unlock_at", &self.unlock_at)
            .field("sender_name", &self.sender_name)
            .field("recipient_name", &self.recipient_name)
            .field("title", &self.title)
            .finish()
    }
}

/// A capsule about to be inserted. Every field is fixed at creation time.
#[derive(Clone, PartialEq, Eq)]
pub struct NewCapsule {
    pub id: String,
    pub ciphertext: String,
    pub created_at: DateTime<Utc>,
    pub unlock_at: NaiveDate,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub title: Option<String>,
}

impl NewCapsule {
    /// The record as it reads back from a store.
    pub fn to_capsule(&self) -> Capsule {
        Capsule {
            id: self.id.clone(),
            ciphertext: self.ciphertext.clone(),
            created_at: self.created_at,
            unlock_at: Some(self.unlock_at),
            sender_name: self.sender_name.clone(),
            recipient_name: self.recipient_name.clone(),
            title: self.title.clone(),
        }
    }
}

impl fmt::Debug for NewCapsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCapsule")
            .field("id", &self.id)
            .field("ciphertext", &format_args!("<{} bytes sealed>", self.ciphertext.len()))
            .field("created_at", &self.created_at)
            .field("unlock_at", &self.unlock_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewCapsule {
        NewCapsule {
            id: "abc".into(),
            ciphertext: "c2VhbGVkLXBheWxvYWQ=".into(),
            created_at: DateTime::<Utc>::default(),
            unlock_at: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
            sender_name: Some("Sam".into()),
            recipient_name: None,
            title: None,
        }
    }

    #[test]
    fn debug_redacts_ciphertext() {
        let new = sample();
        let capsule = new.to_capsule();

        assert!(!format!("{:?}", new).contains("c2VhbGVk"));
        assert!(!format!("{:?}", capsule).contains("c2VhbGVk"));
        assert!(format!("{:?}", capsule).contains("20 bytes sealed"));
    }

    #[test]
    fn to_capsule_keeps_unlock_date() {
        let capsule = sample().to_capsule();
        assert_eq!(capsule.unlock_at, NaiveDate::from_ymd_opt(2026, 2, 9));
        assert_eq!(capsule.sender_name.as_deref(), Some("Sam"));
    }
}
