use serde::Deserialize;

/// Sparse profile update: `None` leaves a field untouched, `Some` overwrites
/// it with the trimmed value.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}
