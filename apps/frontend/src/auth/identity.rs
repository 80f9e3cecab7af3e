use serde::{Deserialize, Serialize};

use crate::auth::token::TokenPayload;

/// Role claim carried in the credential token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Applicant,
}

impl Role {
    /// Case-insensitive parse; anything but the two known roles is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "applicant" => Some(Role::Applicant),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Applicant => "applicant",
        }
    }
}

/// Who is making the current request.
///
/// Built once per request by the session middleware and read by guards,
/// handlers and templates. `role` and `is_authenticated` are independent: an
/// authenticated identity may still carry no usable role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_authenticated: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Identity {
            email: None,
            role: None,
            is_authenticated: false,
        }
    }

    /// Identity for a decoded token that has already passed the expiry check.
    pub fn from_payload(payload: &TokenPayload) -> Self {
        Identity {
            email: payload.user_email().map(str::to_owned),
            role: payload.user_role(),
            is_authenticated: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.role == Some(Role::Admin)
    }

    pub fn is_applicant(&self) -> bool {
        self.is_authenticated && self.role == Some(Role::Applicant)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::anonymous()
    }
}
