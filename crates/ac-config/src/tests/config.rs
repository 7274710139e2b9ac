use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{contains_substring, eq, none};
use serial_test::serial;

#[test]
#[serial]
fn given_empty_config_dir_when_loaded_then_defaults_apply() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _db = EnvGuard::remove("AC_DATABASE_PATH");
    let _ttl = EnvGuard::remove("AC_AUTH_TOKEN_TTL_SECS");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.path, eq("data.db"));
    assert_that!(config.auth.token_ttl_secs, eq(3600));
    assert_that!(config.auth.invite_ttl_secs, eq(86400));
    assert_that!(config.auth.token_secret, none());
}

#[test]
#[serial]
fn given_config_toml_when_loaded_then_values_apply() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
[database]
path = "auth.db"

[auth]
token_ttl_secs = 600

[logging]
level = "debug"
"#,
    )
    .unwrap();
    let _db = EnvGuard::remove("AC_DATABASE_PATH");
    let _ttl = EnvGuard::remove("AC_AUTH_TOKEN_TTL_SECS");
    let _level = EnvGuard::remove("AC_LOG_LEVEL");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.path, eq("auth.db"));
    assert_that!(config.auth.token_ttl_secs, eq(600));
    assert_that!(*config.logging.level, eq(log::LevelFilter::Debug));
}

#[test]
#[serial]
fn given_env_override_then_it_wins_over_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[database]\npath = \"from-toml.db\"\n",
    )
    .unwrap();
    let _db = EnvGuard::set("AC_DATABASE_PATH", "from-env.db");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.database.path, eq("from-env.db"));
}

#[test]
#[serial]
fn given_absolute_database_path_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _token = EnvGuard::set(
        "AC_AUTH_TOKEN_SECRET",
        "0123456789012345678901234567890123456789",
    );
    let _invite = EnvGuard::set(
        "AC_AUTH_INVITE_SECRET",
        "0123456789012345678901234567890123456789",
    );
    let _db = EnvGuard::set("AC_DATABASE_PATH", "/etc/passwd");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("database.path"));
}
