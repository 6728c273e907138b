//! Configuration loading tests. Environment variables are process-global,
//! so every test here is serialized and starts from a known-clean slate.

use serial_test::serial;
use std::env;
use termhub::config::{AppConfig, DEFAULT_MIN_CONTENT_LEN, Env};

const VARS: &[&str] = &[
    "APP_ENV",
    "DATABASE_URL",
    "JWT_SECRET",
    "ADMIN_EMAIL",
    "ADMIN_PASSWORD",
    "ALLOWED_ORIGINS",
    "MIN_CONTENT_LENGTH",
];

fn clear_env() {
    for var in VARS {
        unsafe { env::remove_var(var) };
    }
}

#[test]
#[serial]
fn local_load_falls_back_to_development_defaults() {
    clear_env();
    unsafe { env::set_var("DATABASE_URL", "postgres://localhost/termhub") };

    let config = AppConfig::load();

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.db_url, "postgres://localhost/termhub");
    // A fresh checkout gets working admin credentials and a signing secret
    // without a .env file.
    assert_eq!(config.admin_email, "admin@termhub.test");
    assert_eq!(config.admin_password, "admin-password");
    assert!(!config.jwt_secret.is_empty());
    assert_eq!(config.min_content_len, DEFAULT_MIN_CONTENT_LEN);
    assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
}

#[test]
#[serial]
fn explicit_values_override_the_local_defaults() {
    clear_env();
    unsafe {
        env::set_var("DATABASE_URL", "postgres://localhost/termhub");
        env::set_var("ADMIN_EMAIL", "ops@example.com");
        env::set_var("ADMIN_PASSWORD", "s3cret");
        env::set_var("JWT_SECRET", "explicit-secret");
        env::set_var("MIN_CONTENT_LENGTH", "250");
    }

    let config = AppConfig::load();

    assert_eq!(config.admin_email, "ops@example.com");
    assert_eq!(config.admin_password, "s3cret");
    assert_eq!(config.jwt_secret, "explicit-secret");
    assert_eq!(config.min_content_len, 250);
}

#[test]
#[serial]
fn unparseable_min_content_length_falls_back() {
    clear_env();
    unsafe {
        env::set_var("DATABASE_URL", "postgres://localhost/termhub");
        env::set_var("MIN_CONTENT_LENGTH", "plenty");
    }

    let config = AppConfig::load();
    assert_eq!(config.min_content_len, DEFAULT_MIN_CONTENT_LEN);
}

#[test]
#[serial]
fn allowed_origins_are_split_and_trimmed() {
    clear_env();
    unsafe {
        env::set_var("DATABASE_URL", "postgres://localhost/termhub");
        env::set_var(
            "ALLOWED_ORIGINS",
            "https://termhub.example, https://staging.termhub.example ,,",
        );
    }

    let config = AppConfig::load();
    assert_eq!(
        config.allowed_origins,
        vec![
            "https://termhub.example".to_string(),
            "https://staging.termhub.example".to_string(),
        ]
    );
}

#[test]
#[serial]
fn unknown_app_env_is_treated_as_local() {
    clear_env();
    unsafe {
        env::set_var("APP_ENV", "staging");
        env::set_var("DATABASE_URL", "postgres://localhost/termhub");
    }

    let config = AppConfig::load();
    assert_eq!(config.env, Env::Local);
}

#[test]
#[serial]
fn production_load_takes_everything_from_the_environment() {
    clear_env();
    unsafe {
        env::set_var("APP_ENV", "production");
        env::set_var("DATABASE_URL", "postgres://db.internal/termhub");
        env::set_var("JWT_SECRET", "prod-secret");
        env::set_var("ADMIN_EMAIL", "admin@termhub.example");
        env::set_var("ADMIN_PASSWORD", "prod-password");
    }

    let config = AppConfig::load();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.admin_email, "admin@termhub.example");
    assert_eq!(config.jwt_secret, "prod-secret");
}

#[test]
#[serial]
#[should_panic(expected = "JWT_SECRET")]
fn production_without_a_signing_secret_refuses_to_start() {
    clear_env();
    unsafe {
        env::set_var("APP_ENV", "production");
        env::set_var("DATABASE_URL", "postgres://db.internal/termhub");
        env::set_var("ADMIN_EMAIL", "admin@termhub.example");
        env::set_var("ADMIN_PASSWORD", "prod-password");
    }

    AppConfig::load();
}

#[test]
#[serial]
#[should_panic(expected = "ADMIN_PASSWORD")]
fn production_without_admin_credentials_refuses_to_start() {
    clear_env();
    unsafe {
        env::set_var("APP_ENV", "production");
        env::set_var("DATABASE_URL", "postgres://db.internal/termhub");
        env::set_var("JWT_SECRET", "prod-secret");
        env::set_var("ADMIN_EMAIL", "admin@termhub.example");
    }

    AppConfig::load();
}

#[test]
#[serial]
#[should_panic(expected = "DATABASE_URL")]
fn local_load_still_requires_a_database() {
    clear_env();
    AppConfig::load();
}
