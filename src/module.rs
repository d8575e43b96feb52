//! Object graph wiring
//!
//! Builds every chain once at startup. Builders run in a fixed order:
//!
//! ```text
//! observability -> config -> credit -> record -> <business> -> <provider>
//! ```

use crate::config::Config;
use crate::core::handler::biz::{
    CompositionHandler, FacadeHandler, QuestionExamineBizHandlerBuilder,
};
use crate::core::handler::{
    Builder, ConfigHandlerBuilder, CreditHandlerBuilder, Handler, ObservabilityHandlerBuilder,
    RecordHandlerBuilder,
};
use crate::core::observability::MetricsCollector;
use crate::core::providers::ZhipuProvider;
use crate::services::{CreditService, ExamineService, LlmService, QUESTION_EXAMINE_BIZ};
use crate::storage::Storage;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// The assembled dispatch module
#[derive(Debug, Clone)]
pub struct AiModule {
    pub llm: LlmService,
    pub examine: ExamineService,
    pub metrics: MetricsCollector,
    pub storage: Storage,
}

impl AiModule {
    /// Wire the module against the configured Zhipu backend
    pub fn init(config: &Config, storage: Storage, credit: Arc<dyn CreditService>) -> Result<Self> {
        let provider: Arc<dyn Handler> = Arc::new(init_zhipu(config)?);
        Ok(Self::with_provider(storage, credit, provider))
    }

    /// Wire the module around an arbitrary terminal handler
    pub fn with_provider(
        storage: Storage,
        credit: Arc<dyn CreditService>,
        provider: Arc<dyn Handler>,
    ) -> Self {
        let metrics = MetricsCollector::new();
        let common = init_common_handlers(&metrics, &storage, credit);
        let facade = init_handler_facade([init_question_examine_handler(&common, provider)]);
        info!(businesses = ?facade.business_keys(), "dispatch module initialized");

        let llm = LlmService::new(Arc::new(facade));
        Self {
            examine: ExamineService::new(llm.clone()),
            llm,
            metrics,
            storage,
        }
    }
}

/// Cross-cutting builders shared by every business, in chain order
pub fn init_common_handlers(
    metrics: &MetricsCollector,
    storage: &Storage,
    credit: Arc<dyn CreditService>,
) -> Vec<Arc<dyn Builder>> {
    vec![
        Arc::new(ObservabilityHandlerBuilder::new(metrics.clone())),
        Arc::new(ConfigHandlerBuilder::new(storage.configs.clone())),
        Arc::new(CreditHandlerBuilder::new(credit, storage.credit_logs.clone())),
        Arc::new(RecordHandlerBuilder::new(storage.usage.clone())),
    ]
}

pub fn init_question_examine_handler(
    common: &[Arc<dyn Builder>],
    provider: Arc<dyn Handler>,
) -> Arc<dyn Handler> {
    let mut builders = common.to_vec();
    builders.push(Arc::new(QuestionExamineBizHandlerBuilder::new()));
    Arc::new(CompositionHandler::new(
        QUESTION_EXAMINE_BIZ,
        &builders,
        provider,
    ))
}

pub fn init_handler_facade(
    handlers: impl IntoIterator<Item = Arc<dyn Handler>>,
) -> FacadeHandler {
    FacadeHandler::new(handlers)
}

pub fn init_zhipu(config: &Config) -> Result<ZhipuProvider> {
    Ok(ZhipuProvider::from_provider_config(&config.provider)?)
}
