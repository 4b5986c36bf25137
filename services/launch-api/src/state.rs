use launchcore_core::AppConfig;
use launchcore_query::{LaunchQueryService, SessionFactory};

use crate::dynamo::DynamoSessionFactory;

/// Shared, read-only request state
pub struct AppState<F> {
    pub config: AppConfig,
    pub launches: LaunchQueryService<F>,
}

impl<F: SessionFactory> AppState<F> {
    pub fn new(config: AppConfig, factory: F) -> Self {
        AppState {
            config,
            launches: LaunchQueryService::new(factory),
        }
    }
}

impl AppState<DynamoSessionFactory> {
    /// State backed by the DynamoDB table named in `config`.
    pub async fn connect(config: AppConfig) -> Self {
        let factory = DynamoSessionFactory::from_config(&config.store).await;
        AppState::new(config, factory)
    }
}
