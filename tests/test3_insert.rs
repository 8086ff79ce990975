mod common;

use std::sync::Arc;

use common::ScriptedDriver;
use mysql_session::{
    Environment, FixedEnvironment, MysqlSessionError, RowRecord, RowValues, Session,
    SessionConfig,
};
use tokio::runtime::Runtime;

async fn open_local(driver: ScriptedDriver) -> Result<Session<ScriptedDriver>, MysqlSessionError> {
    let config = SessionConfig::new("testdb").with_local_credentials("root", "secret");
    Session::open(driver, config, Arc::new(FixedEnvironment::new(Environment::Local))).await
}

#[test]
fn differing_key_sets_are_rejected_before_any_sql() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = ScriptedDriver::new();
        let mut session = open_local(driver.clone()).await?;

        let rows = vec![
            RowRecord::from_pairs(vec![
                ("a", RowValues::Int(1)),
                ("b", RowValues::Int(2)),
            ]),
            RowRecord::from_pairs(vec![
                ("a", RowValues::Int(3)),
                ("c", RowValues::Int(4)),
            ]),
        ];
        let err = session
            .insert_rows("t", &rows, None)
            .await
            .expect_err("mismatched keys must fail");

        assert!(matches!(err, MysqlSessionError::SchemaMismatch(_)));
        assert!(driver.executed().is_empty());
        assert_eq!(driver.commits(), 0);
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn empty_batch_is_a_schema_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = ScriptedDriver::new();
        let mut session = open_local(driver.clone()).await?;

        let err = session
            .insert_rows("t", &[], None)
            .await
            .expect_err("empty batch must fail");
        assert!(matches!(err, MysqlSessionError::SchemaMismatch(_)));
        assert!(driver.executed().is_empty());
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn columns_are_canonicalized_by_name() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = ScriptedDriver::new();
        let mut session = open_local(driver.clone()).await?;

        // Same key set, different insertion order per record.
        let rows = vec![
            RowRecord::from_pairs(vec![
                ("name", RowValues::Text("Hector".to_string())),
                ("age", RowValues::Int(20)),
            ]),
            RowRecord::from_pairs(vec![
                ("age", RowValues::Int(31)),
                ("name", RowValues::Text("Helen".to_string())),
            ]),
        ];
        session.insert_rows("heroes", &rows, None).await?;

        assert_eq!(
            driver.executed(),
            vec!["INSERT INTO `heroes` (`age`, `name`) VALUES (?, ?)".to_string()]
        );
        assert_eq!(
            driver.executed_params()[0],
            vec![
                vec![RowValues::Int(20), RowValues::Text("Hector".to_string())],
                vec![RowValues::Int(31), RowValues::Text("Helen".to_string())],
            ]
        );
        assert_eq!(driver.commits(), 1);
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn single_record_uses_a_single_execute() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = ScriptedDriver::new();
        let mut session = open_local(driver.clone()).await?;

        let row = RowRecord::from_pairs(vec![
            ("name", RowValues::Text("Hector".to_string())),
            ("age", RowValues::Int(20)),
        ]);
        session.insert_rows("heroes", &[row], None).await?;

        let params = driver.executed_params();
        assert_eq!(params.len(), 1);
        // One tuple, not a batch of tuples.
        assert_eq!(
            params[0],
            vec![vec![RowValues::Int(20), RowValues::Text("Hector".to_string())]]
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn upsert_appends_duplicate_key_clause() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let driver = ScriptedDriver::new();
        let mut session = open_local(driver.clone()).await?;

        let row = RowRecord::from_pairs(vec![
            ("name", RowValues::Text("Hector".to_string())),
            ("age", RowValues::Int(21)),
        ]);
        session
            .insert_rows("heroes", &[row], Some(&["age"]))
            .await?;

        assert_eq!(
            driver.executed(),
            vec![
                "INSERT INTO `heroes` (`age`, `name`) VALUES (?, ?) \
                 ON DUPLICATE KEY UPDATE `age` = VALUES(`age`)"
                    .to_string()
            ]
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}
