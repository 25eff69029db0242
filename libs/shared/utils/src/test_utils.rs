use std::sync::Arc;

use shared_config::AppConfig;
use uuid::Uuid;

pub struct TestConfig {
    pub portal_api_url: String,
    pub portal_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            portal_api_url: "http://localhost:8080".to_string(),
            portal_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the config at a mock server for integration tests.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.portal_api_url = url.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            portal_api_url: self.portal_api_url.clone(),
            portal_api_key: self.portal_api_key.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub fn random_doctor_id() -> Uuid {
    Uuid::new_v4()
}
