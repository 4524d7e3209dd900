use crate::{
    auth::{hash_password, issue_token, verify_password, AuthResponse, LoginRequest, SignupRequest},
    config::Config,
    error::AppError,
    models::{User, UserResponse},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user account.
///
/// Returns the public user record and a bearer token for it. A duplicate
/// email is a 400 and creates no second record.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    signup_data.validate()?;

    // Check if email already exists
    let existing_user = User::find_by_email(&**pool, &signup_data.email).await?;
    if existing_user.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    // Hash password and insert the new user
    let password_hash = hash_password(&signup_data.password)?;
    let user = User::insert(&**pool, &signup_data.email, &password_hash).await?;

    let token = issue_token(user.id, &config.jwt_secret)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        user: UserResponse::from(&user),
        token,
    }))
}

/// Authenticate a user and return a bearer token.
///
/// Unknown email and wrong password produce the same 401 body.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let user = User::find_by_email(&**pool, &login_data.email).await?;

    match user {
        Some(user) => {
            if verify_password(&login_data.password, &user.password_hash)? {
                let token = issue_token(user.id, &config.jwt_secret)?;
                Ok(HttpResponse::Ok().json(AuthResponse {
                    user: UserResponse::from(&user),
                    token,
                }))
            } else {
                Err(AppError::Unauthorized("Invalid email or password".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid email or password".into())),
    }
}
