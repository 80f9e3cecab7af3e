pub mod form_or_json;
pub mod identity;
pub mod session_token;

pub use form_or_json::FormOrJson;
pub use session_token::SessionToken;
