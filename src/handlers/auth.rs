use axum::{extract::State, Json};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand_core::OsRng;
use sqlx::SqlitePool;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::AppError,
    models::{Claims, LoginRequest, SignupRequest, Token, User},
};

#[utoipa::path(
    post,
    path = "/users",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = User),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<User>, AppError> {
    // 1. Hash de contraseña
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::AuthError(e.to_string()))?
        .to_string();

    // 2. Insertar usuario; la clave primaria sobre email convierte el
    // check-then-insert en una operación atómica
    sqlx::query("INSERT INTO users (email, name, hashed_password) VALUES (?, ?, ?)")
        .bind(&payload.email)
        .bind(&payload.name)
        .bind(&password_hash)
        .execute(&pool)
        .await
        .map_err(|e| AppError::or_conflict(e, AppError::DuplicateEmail))?;

    tracing::info!("account created for {}", payload.email);

    // 3. Retornar usuario creado (sin auto-login)
    Ok(Json(User {
        email: payload.email,
        name: payload.name,
        hashed_password: String::new(), // No retornar hash
    }))
}

#[utoipa::path(
    post,
    path = "/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Token),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(pool): State<SqlitePool>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Token>, AppError> {
    // 1. Buscar usuario
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // 2. Verificar password (comparación en tiempo constante vía argon2)
    let parsed_hash = PasswordHash::new(&user.hashed_password)
        .map_err(|_| AppError::AuthError("Invalid password hash in DB".to_string()))?;

    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    // 3. Generar JWT
    let secret = env::var("SECRET_KEY").unwrap_or_else(|_| "secret".to_string());

    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as usize + 60 * 30; // 30 minutos

    let claims = Claims {
        sub: user.email,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::AuthError(format!("Token creation failed: {}", e)))?;

    Ok(Json(Token {
        access_token: token,
        token_type: "bearer".to_string(),
        name: user.name,
    }))
}
