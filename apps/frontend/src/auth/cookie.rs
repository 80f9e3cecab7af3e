use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpResponse;

use crate::config::RuntimeEnv;
use crate::error::AppError;

/// Name of the cookie carrying the backend-issued credential token.
pub const AUTH_COOKIE_NAME: &str = "authToken";

/// Lifetime of the credential cookie, fixed at login/registration time.
pub const AUTH_COOKIE_MAX_AGE: Duration = Duration::hours(24);

/// Builds the credential cookie and its removal counterpart.
///
/// The `Secure` attribute must match between the two, otherwise browsers keep
/// the old cookie, so both are derived from the same flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCookies {
    secure: bool,
}

impl AuthCookies {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// `Secure` only in production, where the site is served over HTTPS.
    pub fn for_env(runtime_env: RuntimeEnv) -> Self {
        Self::new(runtime_env.is_production())
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build(AUTH_COOKIE_NAME, token.to_owned())
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(AUTH_COOKIE_MAX_AGE)
            .finish()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(AUTH_COOKIE_NAME, "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .finish();
        cookie.make_removal();
        cookie
    }

    /// Attach the credential cookie for `token` to `res`.
    pub fn set<B>(&self, res: &mut HttpResponse<B>, token: &str) -> Result<(), AppError> {
        res.add_cookie(&self.session_cookie(token))?;
        Ok(())
    }

    /// Attach a cookie to `res` that makes the browser drop the credential.
    pub fn clear<B>(&self, res: &mut HttpResponse<B>) -> Result<(), AppError> {
        res.add_cookie(&self.removal_cookie())?;
        Ok(())
    }
}
