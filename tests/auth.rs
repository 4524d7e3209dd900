use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use dotenv::dotenv;
use serde_json::json;
use sqlx::PgPool;
use todovault::auth::{AuthMiddleware, AuthResponse};
use todovault::config::Config;
use todovault::routes;
use todovault::routes::health;

fn init_env() {
    dotenv().ok();
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }
}

async fn connect_test_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    todovault::db::init_schema(&pool)
        .await
        .expect("Failed to initialize test schema");
    pool
}

async fn cleanup_user(pool: &PgPool, email: &str) {
    if let Ok(Some((id,))) =
        sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    {
        let _ = sqlx::query("DELETE FROM tasks WHERE user_id = $1")
            .bind(id.to_string())
            .execute(pool)
            .await;
    }
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

#[actix_rt::test]
async fn test_signup_and_login_flow() {
    init_env();
    let pool = connect_test_pool().await;
    let config = web::Data::new(Config::from_env());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    let email = "signup_flow@example.com";
    cleanup_user(&pool, email).await;

    // Sign up a new user
    let signup_payload = json!({
        "email": email,
        "password": "password1"
    });
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&signup_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Signup failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes)
    );

    let signup_response: AuthResponse =
        serde_json::from_slice(&body_bytes).expect("Failed to parse signup response");
    assert_eq!(signup_response.user.email, email);
    assert!(!signup_response.token.is_empty());
    let user_id = signup_response.user.id;

    // Signing up with the same email again must fail and not create a
    // second record
    let req_dup = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&signup_payload)
        .to_request();
    let resp_dup = test::call_service(&app, req_dup).await;
    assert_eq!(resp_dup.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "Duplicate signup must not create a second record");

    // Log in with the registered credentials
    let login_payload = json!({
        "email": email,
        "password": "password1"
    });
    let req_login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&login_payload)
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    let status_login = resp_login.status();
    let body_login = test::read_body(resp_login).await;
    assert_eq!(
        status_login,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body_login)
    );

    let login_response: AuthResponse =
        serde_json::from_slice(&body_login).expect("Failed to parse login response");
    assert_eq!(login_response.user.id, user_id);
    let token = login_response.token;

    // The token authenticates requests under this user's path prefix, and a
    // padded title is stored trimmed
    let create_payload = json!({
        "title": "  buy milk  "
    });
    let req_create = test::TestRequest::post()
        .uri(&format!("/api/{}/tasks", user_id))
        .append_header(("Authorization", format!("Bearer {}", token)))
        .set_json(&create_payload)
        .to_request();
    let resp_create = test::call_service(&app, req_create).await;
    let status_create = resp_create.status();
    let body_create = test::read_body(resp_create).await;
    assert_eq!(
        status_create,
        actix_web::http::StatusCode::CREATED,
        "Create task with token failed. Body: {:?}",
        String::from_utf8_lossy(&body_create)
    );

    let created: serde_json::Value = serde_json::from_slice(&body_create).unwrap();
    assert_eq!(created["title"], "buy milk");
    assert_eq!(created["user_id"], user_id.to_string());
    assert_eq!(created["completed"], false);

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_invalid_signup_inputs() {
    init_env();
    let pool = connect_test_pool().await;
    let config = web::Data::new(Config::from_env());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    let test_cases = vec![
        // Deserialization errors (400 for missing fields)
        (
            json!({ "password": "password1" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "test@example.com" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (422 after successful deserialization)
        (
            json!({ "email": "not-an-email", "password": "password1" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "seven77" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
        (
            json!({ "email": "test@example.com", "password": "x".repeat(101) }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "password too long",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    init_env();
    let pool = connect_test_pool().await;
    let config = web::Data::new(Config::from_env());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    // Register a user for the credential checks
    let email = "login_checks@example.com";
    cleanup_user(&pool, email).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&json!({ "email": email, "password": "password1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(
        resp.status().is_success(),
        "Setup: failed to register test user"
    );

    let test_cases = vec![
        // Deserialization errors (400 for missing fields)
        (
            json!({ "password": "password1" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": email }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors
        (
            json!({ "email": "not-an-email", "password": "password1" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        // Authentication errors
        (
            json!({ "email": email, "password": "WrongPassword1" }),
            actix_web::http::StatusCode::UNAUTHORIZED,
            "incorrect password",
        ),
        (
            json!({ "email": "nobody@example.com", "password": "password1" }),
            actix_web::http::StatusCode::UNAUTHORIZED,
            "non-existent user",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }

    cleanup_user(&pool, email).await;
}
