//! sea-orm storage backend tests on in-memory SQLite

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use crate::common::fixtures::{config_with_examine, examine_config, intermediate_answer};
    use crate::common::mocks::ScriptedProvider;
    use llm_dispatch::config::DatabaseConfig;
    use llm_dispatch::services::InMemoryCreditLedger;
    use llm_dispatch::storage::{
        ConfigDao, CreditLog, CreditLogRepository, CreditStatus, Storage, UsageLogRepository,
        UsageRecord,
    };
    use llm_dispatch::{AiModule, DispatchError, RequestContext};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn usage(tid: &str, tokens: i64) -> UsageRecord {
        UsageRecord {
            tid: tid.to_string(),
            uid: 9,
            biz: "question_examine".to_string(),
            tokens,
            amount: tokens * 2,
            raw_output: "25K".to_string(),
            ctime: 1_717_000_000_000,
            utime: 1_717_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_migrate_and_health_check() {
        let db = TestDatabase::new().await;
        assert_ok!(db.db().health_check().await);
        assert_eq!(db.db().count_records().await.unwrap(), 0);

        // Migrations are idempotent
        assert_ok!(db.db().migrate().await);
    }

    #[tokio::test]
    async fn test_seeded_config_round_trips() {
        let db = TestDatabase::new().await;
        db.db().seed_configs(&[examine_config(2)]).await.unwrap();

        let stored = db.db().find_config("question_examine").await.unwrap().unwrap();
        assert_eq!(stored, examine_config(2));
        assert!(db.db().find_config("translate").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seeding_twice_updates_in_place() {
        let db = TestDatabase::new().await;
        db.db().seed_configs(&[examine_config(2)]).await.unwrap();
        db.db().seed_configs(&[examine_config(5)]).await.unwrap();

        let stored = db.db().find_config("question_examine").await.unwrap().unwrap();
        assert_eq!(stored.price, Some(5));
    }

    #[tokio::test]
    async fn test_usage_append_ignores_duplicate_tid() {
        let db = TestDatabase::new().await;
        db.db().append(usage("tid-a", 120)).await.unwrap();
        db.db().append(usage("tid-a", 999)).await.unwrap();
        db.db().append(usage("tid-b", 10)).await.unwrap();

        assert_eq!(db.db().count_records().await.unwrap(), 2);
        let record = db.db().find_record("tid-a").await.unwrap().unwrap();
        assert_eq!((record.tokens, record.amount), (120, 240));
        assert_eq!(record, usage("tid-a", 120));
    }

    #[tokio::test]
    async fn test_credit_log_upsert_by_tid() {
        let db = TestDatabase::new().await;
        let mut log = CreditLog {
            tid: "tid-c".to_string(),
            uid: 9,
            biz: "question_examine".to_string(),
            amount: 240,
            status: CreditStatus::Processing,
            ctime: 1,
            utime: 1,
        };
        db.db().save(log.clone()).await.unwrap();

        log.status = CreditStatus::Success;
        log.utime = 2;
        db.db().save(log).await.unwrap();

        let stored = db.db().find_credit_log("tid-c").await.unwrap().unwrap();
        assert_eq!(stored.status, CreditStatus::Success);
        assert_eq!((stored.ctime, stored.utime), (1, 2));
        assert!(db.db().find_credit_log("tid-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settled_credit_log_is_not_rewritten() {
        let db = TestDatabase::new().await;
        let settled = CreditLog {
            tid: "tid-s".to_string(),
            uid: 9,
            biz: "question_examine".to_string(),
            amount: 240,
            status: CreditStatus::Success,
            ctime: 1,
            utime: 1,
        };
        assert_ok!(db.db().save(settled.clone()).await);

        let retry = CreditLog {
            amount: 400,
            status: CreditStatus::Processing,
            utime: 3,
            ..settled.clone()
        };
        assert_ok!(db.db().save(retry).await);

        let stored = db.db().find_credit_log("tid-s").await.unwrap().unwrap();
        assert_eq!(stored, settled);
    }

    #[tokio::test]
    async fn test_pipeline_over_database_storage() {
        let mut config = config_with_examine(2);
        config.storage.database = DatabaseConfig::sqlite_memory();

        let storage = assert_ok!(Storage::connect(&config).await);
        let db = storage.database.clone().expect("database backend");
        let ledger = Arc::new(InMemoryCreditLedger::new());
        ledger.grant(9, 1_000);

        let module = AiModule::with_provider(
            storage,
            ledger.clone(),
            ScriptedProvider::new("25K", 120),
        );
        let result = module
            .examine
            .examine(&RequestContext::new(), 9, "tid-db", intermediate_answer())
            .await
            .unwrap();

        assert_eq!(result.amount, 240);
        let record = db.find_record("tid-db").await.unwrap().unwrap();
        assert_eq!((record.uid, record.tokens, record.amount), (9, 120, 240));
        assert_eq!(record.raw_output, "25K");
        let log = db.find_credit_log("tid-db").await.unwrap().unwrap();
        assert_eq!(log.status, CreditStatus::Success);
        assert_eq!(ledger.balance_of(9), 760);
    }

    #[tokio::test]
    async fn test_unseeded_business_is_config_not_found() {
        let mut config = config_with_examine(2);
        config.businesses.clear();
        config.storage.database = DatabaseConfig::sqlite_memory();

        let storage = Storage::connect(&config).await.unwrap();
        let provider = ScriptedProvider::new("25K", 120);
        let ledger = Arc::new(InMemoryCreditLedger::new());
        ledger.grant(9, 1_000);
        let module = AiModule::with_provider(storage, ledger, provider.clone());

        let err = assert_err!(
            module
                .examine
                .examine(&RequestContext::new(), 9, "tid-none", intermediate_answer())
                .await
        );

        assert!(matches!(err, DispatchError::ConfigNotFound(_)));
        assert_eq!(provider.calls(), 0);
    }
}
