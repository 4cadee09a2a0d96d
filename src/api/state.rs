//! Shared state for the payroll engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, PayrollPolicy};

/// State shared by every request handler.
///
/// Requests carry their own session, so the only shared resource is the
/// loaded policy.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates application state around a loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the payroll policy in force.
    pub fn policy(&self) -> &PayrollPolicy {
        self.config.policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_policy() {
        let state = AppState::new(ConfigLoader::builtin());
        let clone = state.clone();

        assert!(std::ptr::eq(state.policy(), clone.policy()));
        assert_eq!(state.policy(), &PayrollPolicy::default());
    }
}
