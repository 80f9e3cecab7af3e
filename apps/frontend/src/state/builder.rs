use std::sync::Arc;

use crate::api_client::BackendClient;
use crate::auth::AuthCookies;
use crate::config::Config;
use crate::error::AppError;
use crate::features::{Clock, FeatureFlagCache, FlagSource, SystemClock};
use crate::state::app_state::AppState;
use crate::views::{HtmlRenderer, PageRenderer};

/// Builder for AppState (used in both tests and main).
///
/// Unset parts fall back to production choices: configuration from the
/// environment, the HTML renderer, flags fetched from the backend client and
/// the system clock.
#[derive(Default)]
pub struct StateBuilder {
    config: Option<Config>,
    renderer: Option<Arc<dyn PageRenderer>>,
    flag_source: Option<Arc<dyn FlagSource>>,
    clock: Option<Arc<dyn Clock>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_flag_source(mut self, source: Arc<dyn FlagSource>) -> Self {
        self.flag_source = Some(source);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let config = match self.config {
            Some(config) => config,
            None => Config::from_env()?,
        };

        let api = BackendClient::new(config.api_base_url.clone())
            .map_err(|failure| AppError::config(failure.message))?;
        let cookies = AuthCookies::for_env(config.runtime_env);

        let source = self
            .flag_source
            .unwrap_or_else(|| Arc::new(api.clone()) as Arc<dyn FlagSource>);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let flags = Arc::new(FeatureFlagCache::with_clock(source, clock, config.features));

        let renderer = self.renderer.unwrap_or_else(|| Arc::new(HtmlRenderer));

        Ok(AppState {
            config: Arc::new(config),
            api,
            cookies,
            flags,
            renderer,
        })
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
