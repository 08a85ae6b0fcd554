#![allow(dead_code)]

use elegua::platform::MemoryPlatform;
use elegua::{InterceptorConfig, NavigationInterceptor, Navigator};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

pub const ORIGIN: &str = "https://app.test/";

pub struct App {
    pub platform: Arc<MemoryPlatform>,
    pub navigator: Arc<Navigator>,
    pub interceptor: NavigationInterceptor,
}

impl App {
    /// A started app at `ORIGIN`.
    pub fn new() -> Self {
        Self::with_config(InterceptorConfig::default())
    }

    pub fn with_config(config: InterceptorConfig) -> Self {
        Self::at(ORIGIN, config)
    }

    pub fn at(initial: &str, config: InterceptorConfig) -> Self {
        let platform = Arc::new(MemoryPlatform::new(initial).unwrap());
        let navigator = Arc::new(Navigator::new(platform.clone()));
        let interceptor =
            NavigationInterceptor::with_config(navigator.clone(), platform.clone(), config);
        interceptor.start();
        Self {
            platform,
            navigator,
            interceptor,
        }
    }

    pub fn path(&self) -> String {
        use elegua::Readable;
        self.navigator.state().path().get()
    }
}

// ============================================================================
// Route handlers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Post,
    Files,
    NotFound,
}
