use serde::{Deserialize, Serialize};

/// Identity of an authenticated caller, resolved by the identity service in
/// front of this library. Every operation receives it and cross-checks it
/// against the parties stored in the referenced document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppAuthedClaim {
    pub profile: String, // user id
    pub email: String,
}

impl AppAuthedClaim {
    pub fn new(profile: &str, email: &str) -> Self {
        Self {
            profile: profile.to_string(),
            email: email.to_string(),
        }
    }

    pub fn same_user(&self, usr_id: &str) -> bool {
        !usr_id.is_empty() && self.profile == usr_id
    }

    // emails are compared case-insensitively, blank email never matches
    pub fn same_email(&self, email: &str) -> bool {
        let given = email.trim();
        !given.is_empty() && self.email.trim().eq_ignore_ascii_case(given)
    }
}
