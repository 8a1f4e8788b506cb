use axum::http::StatusCode;
use foodbank::{Error, database, load_config};

#[tokio::test]
async fn test_statement_timeout_maps_to_timeout() {
    let mut config = load_config().expect("Failed to load config");
    config.database.statement_timeout_seconds = 1;
    let pool = database::connect(&config).await.expect("Failed to connect to database");

    let mut conn = database::acquire(&pool).await.unwrap();
    let err = sqlx::query("SELECT pg_sleep(3)")
        .execute(conn.as_mut())
        .await
        .map_err(Error::from)
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)), "expected timeout, got {:?}", err);
    assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    // The connection stays usable after the cancelled statement
    sqlx::query("SELECT 1").execute(conn.as_mut()).await.unwrap();

    drop(conn);
    database::close(&pool).await;
}
