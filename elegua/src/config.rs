//! Interceptor configuration.

use elegua_core::Modifiers;

/// Attribute that makes an anchor bypass interception.
pub const DEFAULT_OPT_OUT_ATTRIBUTE: &str = "data-native-router";

/// How the [`NavigationInterceptor`](crate::NavigationInterceptor) decides
/// which clicks to take over.
///
/// # Example
///
/// ```rust,ignore
/// let config = InterceptorConfig::default()
///     .opt_out_attribute("data-external")
///     .new_tab_modifiers(Modifiers::CTRL | Modifiers::META);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorConfig {
    opt_out_attribute: String,
    new_tab_modifiers: Modifiers,
    respect_target: bool,
}

impl InterceptorConfig {
    /// The defaults: `data-native-router`, Ctrl/Shift/Meta, targets respected.
    pub fn new() -> Self {
        Self {
            opt_out_attribute: DEFAULT_OPT_OUT_ATTRIBUTE.to_string(),
            new_tab_modifiers: Modifiers::CTRL | Modifiers::SHIFT | Modifiers::META,
            respect_target: true,
        }
    }

    /// Anchors carrying this attribute are left to the platform.
    pub fn opt_out_attribute(mut self, name: impl Into<String>) -> Self {
        self.opt_out_attribute = name.into();
        self
    }

    /// Modifier keys that mean "open elsewhere"; a click with any of them held
    /// is left to the platform.
    pub fn new_tab_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.new_tab_modifiers = modifiers;
        self
    }

    /// Whether an anchor whose `target` is not `_self` is left to the platform.
    pub fn respect_target(mut self, respect: bool) -> Self {
        self.respect_target = respect;
        self
    }

    /// The opt-out attribute name.
    pub fn opt_out(&self) -> &str {
        &self.opt_out_attribute
    }

    /// The new-tab modifier set.
    pub fn modifiers(&self) -> Modifiers {
        self.new_tab_modifiers
    }

    /// Whether `target` is honored.
    pub fn respects_target(&self) -> bool {
        self.respect_target
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self::new()
    }
}
