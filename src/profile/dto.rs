use serde::Deserialize;

/// Request body for profile update. Both fields must be present; missing
/// ones are reported as a 400, so they decode as options.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}
