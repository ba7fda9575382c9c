//! Client environment accessor
//!
//! Read-only view of the environment an order was placed from. Only used to
//! build the metadata snapshot stored alongside a saved transaction.

use crate::config::ClientConfig;

pub trait ClientEnvironment: Send + Sync {
    fn user_agent(&self) -> String;
    fn languages(&self) -> Vec<String>;
    /// (width, height)
    fn viewport(&self) -> (u32, u32);
    fn platform(&self) -> String;
    fn vendor(&self) -> String;
}

/// Environment fixed at startup from configuration
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    config: ClientConfig,
}

impl StaticEnvironment {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl ClientEnvironment for StaticEnvironment {
    fn user_agent(&self) -> String {
        self.config.user_agent.clone()
    }

    fn languages(&self) -> Vec<String> {
        self.config.languages.clone()
    }

    fn viewport(&self) -> (u32, u32) {
        (self.config.viewport_width, self.config.viewport_height)
    }

    fn platform(&self) -> String {
        self.config.platform.clone()
    }

    fn vendor(&self) -> String {
        self.config.vendor.clone()
    }
}
