use crate::DbConn;
use crate::{
    config::PasswordConfig,
    error::{Error, Result},
    models::{
        requests::{ProfilePatch, RegisterUser},
        users::{NewUser, User},
    },
    queries::users,
};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hashes a password with Argon2id and a fresh random salt.
///
/// The work factor comes from `config`; the resulting PHC string embeds it,
/// so hashes made under older settings still verify.
pub fn hash_password(password: &str, config: &PasswordConfig) -> Result<String> {
    let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
        .map_err(|e| Error::Internal(format!("Invalid password hashing parameters: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a stored hash.
///
/// A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Registers a new user.
///
/// Username is checked before email so the caller learns about the first
/// clash; the unique constraints still catch a concurrent duplicate.
pub async fn register_user(conn: &mut DbConn, register_user: RegisterUser, config: &PasswordConfig) -> Result<User> {
    if users::get_user_by_username(conn, &register_user.username).await?.is_some() {
        return Err(Error::Conflict("Username already exists".to_string()));
    }

    if users::get_user_by_email(conn, &register_user.email).await?.is_some() {
        return Err(Error::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&register_user.password, config)?;

    let new_user = NewUser {
        username: register_user.username,
        email: register_user.email,
        password_hash,
        full_name: register_user.full_name,
        phone: register_user.phone,
        role: register_user.role,
    };

    let user = users::create_user(conn, new_user).await?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    Ok(user)
}

/// Applies a profile patch. On an email clash nothing is written.
pub async fn update_profile(conn: &mut DbConn, user_id: i64, patch: ProfilePatch) -> Result<User> {
    let mut user = users::get_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    if let Some(email) = patch.email {
        if let Some(existing) = users::get_user_by_email(conn, &email).await? {
            if existing.id != user.id {
                return Err(Error::Conflict("Email already taken".to_string()));
            }
        }
        user.email = email;
    }

    if let Some(full_name) = patch.full_name {
        user.full_name = full_name;
    }
    if let Some(phone) = patch.phone {
        user.phone = phone;
    }
    if let Some(address) = patch.address {
        user.address = address;
    }
    if let Some(location) = patch.location {
        user.location = location;
    }

    let updated = users::update_user(conn, &user).await.map_err(|e| match e {
        Error::Conflict(_) => Error::Conflict("Email already taken".to_string()),
        other => other,
    })?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(updated)
}
