use foodbank::{AppState, Config, DbPool, build_router, database, load_config, schema};
use reqwest::{Client, redirect::Policy};
use tokio::net::TcpListener;

/// HTTP test application wrapper
///
/// Runs the real router on a random port so tests exercise the full stack.
/// Each test gets its own server instance to allow parallel test execution.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client for making requests
    pub client: Client,
    pub config: Config,
    /// Pool shared with the server; use it to inspect or adjust rows directly
    pub pool: DbPool,
}

impl TestApp {
    /// App backed by the configured Postgres, with the schema initialized.
    pub async fn new() -> Self {
        let config = load_config().expect("Failed to load config");
        let pool = database::connect(&config)
            .await
            .expect("Failed to connect to database");
        schema::initialize_schema(&pool)
            .await
            .expect("Failed to initialize schema");

        Self::spawn(config, pool).await
    }

    /// App whose database can never be reached.
    ///
    /// Anything that needs a connection fails, so a successful (or 4xx)
    /// answer proves the request was handled before touching the database.
    pub async fn without_database() -> Self {
        let mut config = load_config().expect("Failed to load config");
        config.database.host = "127.0.0.1".to_string();
        config.database.port = 1;
        config.database.acquire_timeout_seconds = 1;

        let pool = database::connect_lazy(&config).expect("Failed to build lazy pool");

        Self::spawn(config, pool).await
    }

    async fn spawn(config: Config, pool: DbPool) -> Self {
        let app = build_router(AppState::new(pool.clone(), config.clone()));

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            config,
            pool,
        }
    }

    /// Get the full URL for an API endpoint
    ///
    /// # Example
    /// ```rust,ignore
    /// let url = app.url("/api/health");
    /// // Returns: "http://127.0.0.1:54321/api/health"
    /// ```
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
