//! Zhipu adapter tests against a mock HTTP backend

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{
        completion_body, config_with_examine, examine_config, intermediate_answer,
    };
    use llm_dispatch::core::examine::ExamineTier;
    use llm_dispatch::core::handler::Handler;
    use llm_dispatch::core::providers::{ZhipuConfig, ZhipuProvider};
    use llm_dispatch::services::InMemoryCreditLedger;
    use llm_dispatch::storage::Storage;
    use llm_dispatch::{
        AiModule, DispatchError, LlmRequest, ProviderError, RequestContext, RequestInput,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CHAT_PATH: &str = "/api/paas/v4/chat/completions";

    fn provider(server: &MockServer) -> ZhipuProvider {
        let config = ZhipuConfig::new("test-key", 1)
            .with_base_url(format!("{}/api/paas/v4", server.uri()))
            .with_timeout(Duration::from_millis(500));
        ZhipuProvider::new(config).unwrap()
    }

    fn request(price: i64) -> LlmRequest {
        LlmRequest::new(
            "question_examine",
            7,
            "tid-http",
            RequestInput::Examine(intermediate_answer()),
        )
        .with_config(examine_config(price))
        .with_prompt("rendered prompt")
    }

    #[tokio::test]
    async fn test_chat_completion_contract() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "glm-4",
                "max_tokens": 512,
                "messages": [
                    {"role": "system", "content": "Grade the answer. First line: 15K, 25K, 35K or failed."},
                    {"role": "user", "content": "rendered prompt"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("chatcmpl-1", "25K", 120)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let resp = provider(&server)
            .handle(&RequestContext::new(), request(3))
            .await
            .unwrap();

        assert_eq!(resp.answer, "25K");
        assert_eq!(resp.tokens, 120);
        assert_eq!(resp.amount, 360);
        assert_eq!(resp.trace_id, "chatcmpl-1");
    }

    #[tokio::test]
    async fn test_missing_id_falls_back_to_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "15K"}}],
                "usage": {"total_tokens": 5}
            })))
            .mount(&server)
            .await;

        let ctx = RequestContext::new().with_request_id("req-7");
        let resp = provider(&server).handle(&ctx, request(1)).await.unwrap();

        assert_eq!(resp.trace_id, "req-7");
        assert_eq!(resp.amount, 5);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": "1002", "message": "invalid api key"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .handle(&RequestContext::new(), request(1))
            .await
            .unwrap_err();

        match err {
            DispatchError::Provider(ProviderError::Authentication { message, .. }) => {
                assert_eq!(message, "1002: invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .handle(&RequestContext::new(), request(1))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(
            err,
            DispatchError::Provider(ProviderError::RateLimit {
                retry_after: Some(7),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .handle(&RequestContext::new(), request(1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Provider(ProviderError::ApiError { status: 500, ref message, .. })
                if message == "upstream exploded"
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .handle(&RequestContext::new(), request(1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Provider(ProviderError::ResponseParsing { .. })
        ));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("late", "25K", 10))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .handle(&RequestContext::new(), request(1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Provider(ProviderError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_context_deadline_aborts_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("late", "25K", 10))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));
        let err = provider(&server).handle(&ctx, request(1)).await.unwrap_err();

        assert!(matches!(err, DispatchError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_cost_overflow_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("c", "25K", 120)))
            .mount(&server)
            .await;

        let err = provider(&server)
            .handle(&RequestContext::new(), request(i64::MAX))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Provider(ProviderError::CostOverflow { tokens: 120, .. })
        ));
    }

    #[tokio::test]
    async fn test_examine_end_to_end_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "chatcmpl-e2e",
                "25K\nSolid on borrowing, nothing on interior mutability.",
                120,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_with_examine(2);
        config.provider.base_url = format!("{}/api/paas/v4", server.uri());
        let storage = Storage::in_memory(&config);
        let ledger = Arc::new(InMemoryCreditLedger::new());
        ledger.grant(7, 1_000);

        let module = AiModule::init(&config, storage, ledger.clone()).unwrap();
        let result = module
            .examine
            .examine(&RequestContext::new(), 7, "tid-e2e", intermediate_answer())
            .await
            .unwrap();

        assert_eq!(result.tier, ExamineTier::Intermediate);
        assert_eq!((result.tokens, result.amount), (120, 240));
        assert_eq!(ledger.debited("tid-e2e"), Some(240));
        assert_eq!(ledger.balance_of(7), 760);
    }

    #[tokio::test]
    async fn test_backend_failure_end_to_end_is_not_charged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut config = config_with_examine(2);
        config.provider.base_url = format!("{}/api/paas/v4", server.uri());
        let ledger = Arc::new(InMemoryCreditLedger::new());
        ledger.grant(7, 1_000);

        let module = AiModule::init(&config, Storage::in_memory(&config), ledger.clone()).unwrap();
        let err = module
            .examine
            .examine(&RequestContext::new(), 7, "tid-503", intermediate_answer())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Provider(_)));
        assert_eq!(ledger.debit_count(), 0);
        assert_eq!(ledger.balance_of(7), 1_000);
    }
}
