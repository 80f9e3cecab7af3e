//! Credential handling: token payload decoding, the request identity, the
//! credential cookie and the route guards built on top of them.

pub mod cookie;
pub mod guards;
pub mod identity;
pub mod token;

pub use cookie::{AuthCookies, AUTH_COOKIE_NAME};
pub use guards::{require_admin, require_auth, Access, Denial};
pub use identity::{Identity, Role};
