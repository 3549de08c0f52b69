use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::Connection;
use tracing::warn;

use keepsake_types::models::{Capsule, NewCapsule};

use crate::models::CapsuleRow;

pub fn insert_capsule(conn: &Connection, capsule: &NewCapsule) -> Result<()> {
    conn.execute(
        "INSERT INTO capsules (id, ciphertext, created_at, unlock_at, sender_name, recipient_name, title)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            capsule.id,
            capsule.ciphertext,
            capsule.created_at.to_rfc3339(),
            capsule.unlock_at.format("%Y-%m-%d").to_string(),
            capsule.sender_name,
            capsule.recipient_name,
            capsule.title,
        ],
    )?;
    Ok(())
}

pub fn query_capsule_by_id(conn: &Connection, id: &str) -> Result<Option<CapsuleRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, ciphertext, created_at, unlock_at, sender_name, recipient_name, title
         FROM capsules WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(CapsuleRow {
                id: row.get(0)?,
                ciphertext: row.get(1)?,
                created_at: row.get(2)?,
                unlock_at: row.get(3)?,
                sender_name: row.get(4)?,
                recipient_name: row.get(5)?,
                title: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

impl CapsuleRow {
    /// Normalize a raw row. Unreadable dates are logged, never fatal: a bad
    /// `unlock_at` becomes `None` and a bad `created_at` becomes the epoch.
    pub fn into_capsule(self) -> Capsule {
        let created_at = parse_timestamp(&self.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on capsule '{}'", self.created_at, self.id);
            DateTime::<Utc>::default()
        });

        let unlock_at = match self.unlock_at.as_deref() {
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    warn!("Invalid unlock_at '{}' on capsule '{}'", raw, self.id);
                }
                parsed
            }
            None => None,
        };

        Capsule {
            id: self.id,
            ciphertext: self.ciphertext,
            created_at,
            unlock_at,
            sender_name: self.sender_name,
            recipient_name: self.recipient_name,
            title: self.title,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            // Rows written without an offset: "YYYY-MM-DDTHH:MM:SS[.f]" or
            // SQLite's "YYYY-MM-DD HH:MM:SS". Read them as UTC.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .map(|ndt| ndt.and_utc())
                .ok()
        })
}

/// Accepts a bare date or a full ISO timestamp, keeping only the date part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(created_at: &str, unlock_at: Option<&str>) -> CapsuleRow {
        CapsuleRow {
            id: "legacy".into(),
            ciphertext: "sealed".into(),
            created_at: created_at.into(),
            unlock_at: unlock_at.map(str::to_string),
            sender_name: None,
            recipient_name: None,
            title: None,
        }
    }

    #[test]
    fn reads_dates_in_every_stored_shape() {
        let capsule = row("2026-02-01T10:30:00+00:00", Some("2026-02-09")).into_capsule();
        assert_eq!(capsule.created_at.to_rfc3339(), "2026-02-01T10:30:00+00:00");
        assert_eq!(capsule.unlock_at, NaiveDate::from_ymd_opt(2026, 2, 9));

        let naive = row("2026-02-01T10:30:00.123456", Some("2026-02-09T00:00:00")).into_capsule();
        assert_eq!(naive.created_at.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(naive.unlock_at, NaiveDate::from_ymd_opt(2026, 2, 9));

        let sqlite = row("2026-02-01 10:30:00", None).into_capsule();
        assert_eq!(sqlite.created_at.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn unreadable_dates_degrade_instead_of_failing() {
        let capsule = row("yesterday-ish", Some("soon")).into_capsule();
        assert_eq!(capsule.created_at, DateTime::<Utc>::default());
        assert_eq!(capsule.unlock_at, None);
    }
}
