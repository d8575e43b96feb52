//! Dispatch chain integration tests
//!
//! Full chains assembled by `AiModule` around a scripted provider.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{config_with_examine, intermediate_answer};
    use crate::common::mocks::{CountingCredit, CountingUsageLog, ScriptedProvider};
    use llm_dispatch::config::Config;
    use llm_dispatch::core::examine::ExamineTier;
    use llm_dispatch::storage::{CreditStatus, InMemoryCreditLog, Storage};
    use llm_dispatch::{
        AiModule, DispatchError, LlmRequest, ProviderError, RequestContext, RequestInput,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const UID: i64 = 42;
    const PRICE: i64 = 2;

    struct Harness {
        module: AiModule,
        provider: Arc<ScriptedProvider>,
        credit: Arc<CountingCredit>,
        usage: Arc<CountingUsageLog>,
        credit_logs: Arc<InMemoryCreditLog>,
    }

    fn harness_with(config: &Config, provider: Arc<ScriptedProvider>, balance: i64) -> Harness {
        let credit = CountingCredit::with_balance(UID, balance);
        let usage = CountingUsageLog::new();
        let credit_logs = Arc::new(InMemoryCreditLog::new());

        let mut storage = Storage::in_memory(config);
        storage.usage = usage.clone();
        storage.credit_logs = credit_logs.clone();

        let module = AiModule::with_provider(storage, credit.clone(), provider.clone());
        Harness {
            module,
            provider,
            credit,
            usage,
            credit_logs,
        }
    }

    fn harness(provider: Arc<ScriptedProvider>) -> Harness {
        harness_with(&config_with_examine(PRICE), provider, 10_000)
    }

    #[tokio::test]
    async fn test_intermediate_answer_is_charged_and_recorded() {
        let h = harness(ScriptedProvider::new(
            "25K\nCovers ownership and borrowing, misses interior mutability.",
            120,
        ));

        let result = h
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-1", intermediate_answer())
            .await
            .unwrap();

        assert_eq!(result.tier, ExamineTier::Intermediate);
        assert_eq!(result.tokens, 120);
        assert_eq!(result.amount, 120 * PRICE);
        assert_eq!(result.tid, "tid-1");

        let record = h.usage.inner.get("tid-1").expect("usage record");
        assert_eq!((record.uid, record.tokens, record.amount), (UID, 120, 240));
        assert_eq!(record.biz, "question_examine");

        assert_eq!(h.credit.ledger.debited("tid-1"), Some(240));
        assert_eq!(h.credit.ledger.balance_of(UID), 10_000 - 240);
        assert_eq!(h.credit_logs.get("tid-1").unwrap().status, CreditStatus::Success);
    }

    #[tokio::test]
    async fn test_prompt_is_rendered_from_business_template() {
        let h = harness(ScriptedProvider::new("15K", 10));

        h.module
            .examine
            .examine(&RequestContext::new(), UID, "tid-prompt", intermediate_answer())
            .await
            .unwrap();

        let prompt = h.provider.last_prompt().unwrap();
        assert!(prompt.starts_with("Q: Explain ownership and borrowing"));
        assert!(prompt.contains("25K: Borrows are either shared or mutable"));
        assert!(prompt.contains("A: Every value has one owner."));
    }

    #[tokio::test]
    async fn test_retry_with_same_tid_charges_and_records_once() {
        let h = harness(ScriptedProvider::new("35K", 100));
        let ctx = RequestContext::new();

        for _ in 0..3 {
            let result = h
                .module
                .examine
                .examine(&ctx, UID, "tid-retry", intermediate_answer())
                .await
                .unwrap();
            assert_eq!(result.tier, ExamineTier::Advanced);
        }

        assert_eq!(h.provider.calls(), 3);
        assert_eq!(h.credit.ledger.debit_count(), 1);
        assert_eq!(h.credit.ledger.balance_of(UID), 10_000 - 200);
        assert_eq!(h.usage.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_retry_reporting_other_usage_keeps_first_charge() {
        let config = config_with_examine(PRICE);
        let first = harness_with(&config, ScriptedProvider::new("25K", 120), 10_000);

        let mut storage = Storage::in_memory(&config);
        storage.usage = first.usage.clone();
        storage.credit_logs = first.credit_logs.clone();
        let retry = AiModule::with_provider(
            storage,
            first.credit.clone(),
            ScriptedProvider::new("25K", 200),
        );

        let r1 = first
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-r", intermediate_answer())
            .await
            .unwrap();
        let r2 = retry
            .examine
            .examine(&RequestContext::new(), UID, "tid-r", intermediate_answer())
            .await
            .unwrap();

        assert_eq!((r1.amount, r2.amount), (240, 240));
        assert_eq!(first.credit.ledger.debited("tid-r"), Some(240));
        assert_eq!(first.credit.ledger.balance_of(UID), 10_000 - 240);
        let log = first.credit_logs.get("tid-r").unwrap();
        assert_eq!((log.status, log.amount), (CreditStatus::Success, 240));
        assert_eq!(first.usage.inner.get("tid-r").unwrap().amount, 240);
    }

    #[tokio::test]
    async fn test_unknown_business_key_runs_no_handler() {
        let h = harness(ScriptedProvider::new("15K", 10));
        let req = LlmRequest::new("translate", UID, "tid-x", RequestInput::Text("hi".into()));

        let err = h
            .module
            .llm
            .invoke(&RequestContext::new(), req)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::UnknownBusinessKey(ref biz) if biz == "translate"));
        assert_eq!(h.provider.calls(), 0);
        assert_eq!(h.credit.balance_calls(), 0);
        assert_eq!(h.usage.appends(), 0);
        assert_eq!(h.module.metrics.stats("translate").await.requests, 0);
    }

    #[tokio::test]
    async fn test_missing_config_fails_before_network() {
        let mut config = Config::default();
        config.provider.api_key = "test-key".into();
        let h = harness_with(&config, ScriptedProvider::new("15K", 10), 10_000);

        let err = h
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-cfg", intermediate_answer())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::ConfigNotFound(ref biz) if biz == "question_examine"));
        assert_eq!(h.provider.calls(), 0);
        assert_eq!(h.credit.debit_calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_never_charged() {
        let h = harness(ScriptedProvider::failing(ProviderError::api_error(
            "zhipu",
            503,
            "overloaded",
        )));

        let err = h
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-503", intermediate_answer())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Provider(ProviderError::ApiError { status: 503, .. })));
        assert!(err.is_retryable());
        assert_eq!(h.credit.debit_calls(), 0);
        assert_eq!(h.usage.appends(), 0);
        assert!(h.credit_logs.is_empty());
        assert_eq!(h.credit.ledger.balance_of(UID), 10_000);
    }

    #[tokio::test]
    async fn test_failed_debit_leaves_no_usage_record() {
        let h = harness(ScriptedProvider::new("25K", 120));
        h.credit.reject_debits();

        let err = h
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-nodebit", intermediate_answer())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::CreditDebitFailed(_)));
        assert_eq!(h.provider.calls(), 1);
        assert_eq!(h.credit.debit_calls(), 1);
        assert_eq!(h.usage.appends(), 0);
        assert_eq!(
            h.credit_logs.get("tid-nodebit").unwrap().status,
            CreditStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_charge_exceeding_balance_is_rejected() {
        let h = harness_with(
            &config_with_examine(PRICE),
            ScriptedProvider::new("25K", 120),
            100,
        );

        let err = h
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-poor", intermediate_answer())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::CreditDebitFailed(_)));
        assert_eq!(h.credit.ledger.balance_of(UID), 100);
        assert!(h.usage.inner.is_empty());
    }

    #[tokio::test]
    async fn test_empty_balance_skips_provider() {
        let h = harness_with(&config_with_examine(PRICE), ScriptedProvider::new("25K", 120), 0);

        let err = h
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-empty", intermediate_answer())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::InsufficientCredit { uid: UID, balance: 0 }));
        assert_eq!(h.provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_deadline_aborts_provider_without_charge() {
        let h = harness(ScriptedProvider::slow("25K", 120, Duration::from_secs(5)));
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));

        let err = h
            .module
            .examine
            .examine(&ctx, UID, "tid-slow", intermediate_answer())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::DeadlineExceeded));
        assert_eq!(h.provider.calls(), 1);
        assert_eq!(h.credit.debit_calls(), 0);
        assert_eq!(h.usage.appends(), 0);
        assert!(h.credit_logs.is_empty());
    }

    #[tokio::test]
    async fn test_caller_cancellation_aborts_request() {
        let h = harness(ScriptedProvider::slow("25K", 120, Duration::from_secs(5)));
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = h
            .module
            .examine
            .examine(&ctx, UID, "tid-cancel", intermediate_answer())
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(err.is_cancellation());
        assert!(matches!(err, DispatchError::Canceled));
        assert_eq!(h.credit.debit_calls(), 0);
        assert_eq!(h.usage.appends(), 0);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_provider() {
        let h = harness(ScriptedProvider::new("25K", 120));
        let req = LlmRequest::new(
            "question_examine",
            UID,
            "tid-text",
            RequestInput::Text("grade me".into()),
        );

        let err = h
            .module
            .llm
            .invoke(&RequestContext::new(), req)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::InvalidInput(_)));
        assert_eq!(h.provider.calls(), 0);
        assert_eq!(h.credit.debit_calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_chain() {
        let h = Arc::new(harness(ScriptedProvider::new("15K", 10)));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let h = h.clone();
                tokio::spawn(async move {
                    h.module
                        .examine
                        .examine(&RequestContext::new(), UID, format!("tid-{i}"), intermediate_answer())
                        .await
                })
            })
            .collect();

        for task in tasks {
            let result = task.await.unwrap().unwrap();
            assert_eq!(result.tier, ExamineTier::Basic);
        }

        assert_eq!(h.credit.ledger.debit_count(), 16);
        assert_eq!(h.usage.inner.len(), 16);
        assert_eq!(h.credit.ledger.balance_of(UID), 10_000 - 16 * 20);
    }

    #[tokio::test]
    async fn test_metrics_see_final_outcome() {
        let h = harness(ScriptedProvider::new("25K", 120));
        h.module
            .examine
            .examine(&RequestContext::new(), UID, "tid-m1", intermediate_answer())
            .await
            .unwrap();

        h.credit.reject_debits();
        let _ = h
            .module
            .examine
            .examine(&RequestContext::new(), UID, "tid-m2", intermediate_answer())
            .await;

        let stats = h.module.metrics.stats("question_examine").await;
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!((stats.tokens, stats.amount), (120, 240));

        let exported = h.module.metrics.export_prometheus().await;
        assert!(exported.contains("llm_dispatch_requests_total{biz=\"question_examine\"} 2"));
    }
}
