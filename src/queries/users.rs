use sqlx::Postgres;

use crate::{
    error::{Error, Result, is_unique_violation},
    models::users::{NewUser, User},
};

use crate::DbConn;

/// Maps a unique violation on `users` to the conflict the caller reports.
fn map_user_conflict(e: sqlx::Error) -> Error {
    if !is_unique_violation(&e) {
        return e.into();
    }

    let constraint = match &e {
        sqlx::Error::Database(db) => db.constraint().unwrap_or_default().to_string(),
        _ => String::new(),
    };

    if constraint.contains("username") {
        Error::Conflict("Username already exists".to_string())
    } else {
        Error::Conflict("Email already exists".to_string())
    }
}

/// Creates a new user in the database.
pub async fn create_user(conn: &mut DbConn, new_user: NewUser) -> Result<User> {
    let user = sqlx::query_as::<Postgres, User>(
        r#"
        INSERT INTO users (username, email, password_hash, full_name, phone, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, username, email, password_hash, full_name, phone, address, location,
                  role, is_verified, is_active, member_since, last_login, created_at, updated_at
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.full_name)
    .bind(&new_user.phone)
    .bind(new_user.role.as_ref())
    .fetch_one(conn)
    .await
    .map_err(map_user_conflict)?;

    Ok(user)
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_user_by_id(conn: &mut DbConn, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<Postgres, User>(
        r#"
        SELECT id, username, email, password_hash, full_name, phone, address, location,
               role, is_verified, is_active, member_since, last_login, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(user)
}

/// Gets a single user by their username. The user may not exist.
pub async fn get_user_by_username(conn: &mut DbConn, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<Postgres, User>(
        r#"
        SELECT id, username, email, password_hash, full_name, phone, address, location,
               role, is_verified, is_active, member_since, last_login, created_at, updated_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(conn)
    .await?;

    Ok(user)
}

/// Gets a single user by their email address (case-insensitive). The user may not exist.
pub async fn get_user_by_email(conn: &mut DbConn, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<Postgres, User>(
        r#"
        SELECT id, username, email, password_hash, full_name, phone, address, location,
               role, is_verified, is_active, member_since, last_login, created_at, updated_at
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(conn)
    .await?;

    Ok(user)
}

/// Updates an existing user's mutable profile columns.
pub async fn update_user(conn: &mut DbConn, user: &User) -> Result<User> {
    let updated_user = sqlx::query_as::<Postgres, User>(
        r#"
        UPDATE users
        SET email = $1, full_name = $2, phone = $3, address = $4, location = $5,
            password_hash = $6, updated_at = NOW()
        WHERE id = $7
        RETURNING id, username, email, password_hash, full_name, phone, address, location,
                  role, is_verified, is_active, member_since, last_login, created_at, updated_at
        "#,
    )
    .bind(&user.email)
    .bind(&user.full_name)
    .bind(&user.phone)
    .bind(&user.address)
    .bind(&user.location)
    .bind(&user.password_hash)
    .bind(user.id)
    .fetch_optional(conn)
    .await
    .map_err(map_user_conflict)?
    .ok_or_else(|| Error::NotFound(format!("User {} not found", user.id)))?;

    Ok(updated_user)
}

/// Records a successful login.
pub async fn touch_last_login(conn: &mut DbConn, user_id: i64) -> Result<()> {
    sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Marks the user's email address as verified.
pub async fn mark_verified(conn: &mut DbConn, user_id: i64) -> Result<()> {
    sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}
