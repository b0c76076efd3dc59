//! Authentication service: password hashing, JWT, signup, and signin.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::user::{SignupRequest, User};
use crate::store::KvStore;

/// JWT claims embedded in access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub exp: i64,
    pub iat: i64,
}

/// Bearer session returned on successful signin.
#[derive(Debug, Serialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a signed access token for the user.
pub fn generate_token(
    user: &User,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<Session, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(jwt_secret.as_bytes());

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id.to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let access_token = jsonwebtoken::encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(Session {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: expiry_secs,
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Create a new account: validate the request, reject duplicate emails,
/// store the user record and the email index entry.
pub async fn signup(kv: &KvStore, input: &SignupRequest) -> Result<User, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = input.email.trim().to_lowercase();
    let existing: Option<Uuid> = kv.get(&User::email_key(&email)).await?;
    if existing.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let user = User {
        id: Uuid::new_v4(),
        email: email.clone(),
        password_hash: hash_password(&input.password)?,
        full_name: input.full_name.clone(),
        organization: input.organization.clone(),
        role: input.role.clone(),
        created_at: Utc::now(),
        total_analyses: 0,
        total_threats_detected: 0,
    };

    kv.set(&User::key(user.id), &user).await?;
    kv.set(&User::email_key(&email), &user.id).await?;

    tracing::info!(user_id = %user.id, email = %email, "User created");
    Ok(user)
}

/// Authenticate by email and password, returning a session and the user.
pub async fn signin(
    kv: &KvStore,
    email: &str,
    password: &str,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<(Session, User), AppError> {
    let email = email.trim().to_lowercase();
    let user_id: Uuid = kv
        .get(&User::email_key(&email))
        .await?
        .ok_or(AppError::Unauthorized)?;

    let user: User = kv
        .get(&User::key(user_id))
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let session = generate_token(&user, jwt_secret, expiry_secs)?;
    Ok((session, user))
}

/// Find a user by ID.
pub async fn find_user_by_id(kv: &KvStore, id: Uuid) -> Result<User, AppError> {
    kv.get(&User::key(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
