use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};

/// Drops sub-microsecond digits, which `TIMESTAMPTZ` does not keep.
pub fn truncate_to_micros(t: OffsetDateTime) -> OffsetDateTime {
    t - Duration::nanoseconds(i64::from(t.nanosecond() % 1_000))
}

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub phone: String,
    pub avatar_url: String,
    pub bio: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Insert payload; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serialized() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: 7,
            email: "a@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: String::new(),
            last_name: String::new(),
            display_name: String::new(),
            phone: String::new(),
            avatar_url: String::new(),
            bio: String::new(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "a@example.com");
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn truncation_keeps_microseconds_only() {
        let t = time::macros::datetime!(2024-05-06 07:08:09.123456789 UTC);
        let cut = truncate_to_micros(t);
        assert_eq!(cut, time::macros::datetime!(2024-05-06 07:08:09.123456 UTC));
        assert_eq!(truncate_to_micros(cut), cut);
    }
}
