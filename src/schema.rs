//! Idempotent schema bootstrap run at start-up.

use crate::{database::DbPool, error::Result};

/// Advisory lock key serializing concurrent initializers ("FOODBANK" in ASCII).
const SCHEMA_LOCK_KEY: i64 = 0x464F_4F44_4241_4E4B;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(80) NOT NULL UNIQUE,
        email VARCHAR(120) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        full_name VARCHAR(200) NOT NULL,
        phone VARCHAR(20),
        address TEXT,
        location VARCHAR(200),
        role TEXT NOT NULL DEFAULT 'donor' CHECK (role IN ('admin', 'donor', 'recipient')),
        is_verified BOOLEAN NOT NULL DEFAULT FALSE,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        member_since TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        last_login TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_FOOD_DONATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS food_donations (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        food_category VARCHAR(100) NOT NULL,
        food_type TEXT NOT NULL CHECK (food_type IN ('veg', 'non-veg')),
        description TEXT NOT NULL,
        quantity DOUBLE PRECISION NOT NULL CHECK (quantity > 0),
        unit VARCHAR(20) NOT NULL,
        expiry_date DATE NOT NULL,
        preferred_pickup_time TIME NOT NULL,
        pickup_address TEXT NOT NULL,
        special_instructions TEXT,
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'approved', 'collected', 'cancelled')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_FOOD_REQUESTS: &str = r#"
    CREATE TABLE IF NOT EXISTS food_requests (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        food_category VARCHAR(100) NOT NULL,
        quantity_needed INTEGER NOT NULL CHECK (quantity_needed > 0),
        urgency_level TEXT NOT NULL DEFAULT 'medium'
            CHECK (urgency_level IN ('low', 'medium', 'high')),
        preferred_delivery_time TIME,
        delivery_address TEXT NOT NULL,
        special_requirements TEXT,
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'approved', 'delivered', 'cancelled')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_NOTIFICATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title VARCHAR(200) NOT NULL,
        message TEXT NOT NULL,
        notification_type TEXT NOT NULL DEFAULT 'info'
            CHECK (notification_type IN ('info', 'success', 'warning', 'error')),
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        related_entity_type TEXT NOT NULL DEFAULT 'system'
            CHECK (related_entity_type IN ('donation', 'request', 'system')),
        related_entity_id BIGINT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_OTP_VERIFICATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS otp_verifications (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        otp_code VARCHAR(6) NOT NULL,
        purpose TEXT NOT NULL
            CHECK (purpose IN ('email_verification', 'password_reset', 'profile_update')),
        is_used BOOLEAN NOT NULL DEFAULT FALSE,
        expires_at TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_REVOKED_REFRESH_TOKENS: &str = r#"
    CREATE TABLE IF NOT EXISTS revoked_refresh_tokens (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        token_hash VARCHAR(64) NOT NULL UNIQUE,
        expires_at TIMESTAMPTZ NOT NULL,
        revoked_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_INDEXES: [&str; 5] = [
    "CREATE INDEX IF NOT EXISTS idx_food_donations_user_id ON food_donations (user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_food_donations_status ON food_donations (status, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_food_requests_user_id ON food_requests (user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications (user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_otp_lookup ON otp_verifications (user_id, purpose, otp_code)",
];

/// Creates every table (and its indexes) that does not exist yet.
///
/// Runs in a single transaction and commits once; a failing statement rolls
/// the whole sequence back and the error is returned to the caller, which
/// should refuse to start.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(tx.as_mut())
        .await?;

    let tables = [
        CREATE_USERS,
        CREATE_FOOD_DONATIONS,
        CREATE_FOOD_REQUESTS,
        CREATE_NOTIFICATIONS,
        CREATE_OTP_VERIFICATIONS,
        CREATE_REVOKED_REFRESH_TOKENS,
    ];

    for statement in tables.iter().chain(CREATE_INDEXES.iter()) {
        sqlx::query(statement).execute(tx.as_mut()).await?;
    }

    tx.commit().await?;

    tracing::info!("Database tables initialized successfully");
    Ok(())
}
