use std::sync::Arc;

use crate::api_client::BackendClient;
use crate::auth::AuthCookies;
use crate::config::Config;
use crate::features::FeatureFlagCache;
use crate::views::PageRenderer;

/// Shared, cheaply clonable handles used by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: BackendClient,
    pub cookies: AuthCookies,
    pub flags: Arc<FeatureFlagCache>,
    pub renderer: Arc<dyn PageRenderer>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("api", &self.api.base_url())
            .field("cookies", &self.cookies)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
