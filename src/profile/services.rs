use time::{Duration, OffsetDateTime};
use tracing::{error, info};

use super::dto::ProfileUpdate;
use crate::{
    error::AppError,
    users::{truncate_to_micros, User, UserStore},
};

pub const MAX_BIO_CHARS: usize = 500;

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// `first last` with runs of whitespace folded to one space.
fn derived_display_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strictly after `previous`, even when the clock has not moved, and at
/// the microsecond precision the database stores.
fn advance(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    let now = truncate_to_micros(now);
    if now > previous {
        now
    } else {
        truncate_to_micros(previous + Duration::microseconds(1))
    }
}

/// Applies `update` in place. On error the user is left untouched.
pub fn apply_update(
    user: &mut User,
    update: ProfileUpdate,
    now: OffsetDateTime,
) -> Result<(), AppError> {
    let ProfileUpdate {
        first_name,
        last_name,
        display_name,
        phone,
        avatar_url,
        bio,
    } = update;

    let bio = trimmed(bio);
    if bio
        .as_deref()
        .is_some_and(|b| b.chars().count() > MAX_BIO_CHARS)
    {
        return Err(AppError::validation("bio too long"));
    }

    if let Some(v) = trimmed(first_name) {
        user.first_name = v;
    }
    if let Some(v) = trimmed(last_name) {
        user.last_name = v;
    }
    if let Some(v) = trimmed(display_name) {
        user.display_name = v;
    }
    if let Some(v) = trimmed(phone) {
        user.phone = v;
    }
    if let Some(v) = trimmed(avatar_url) {
        user.avatar_url = v;
    }
    if let Some(v) = bio {
        user.bio = v;
    }

    if user.display_name.is_empty() && (!user.first_name.is_empty() || !user.last_name.is_empty())
    {
        user.display_name = derived_display_name(&user.first_name, &user.last_name);
    }

    user.updated_at = advance(user.updated_at, now);
    Ok(())
}

/// Applies and persists the update; returns the stored record.
pub async fn update_profile(
    store: &dyn UserStore,
    mut user: User,
    update: ProfileUpdate,
) -> Result<User, AppError> {
    apply_update(&mut user, update, OffsetDateTime::now_utc())?;

    store.save(&user).await.map_err(|e| {
        error!(error = %e, user_id = user.id, "save profile failed");
        AppError::internal("db error")
    })?;

    info!(user_id = user.id, "profile updated");
    Ok(user)
}
