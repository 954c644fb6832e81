use super::*;
use serial_test::serial;
use std::collections::HashMap;

fn full_env() -> HashMap<&'static str, String> {
    HashMap::from([
        (DB_USER_ENV, "listener".to_string()),
        (DB_NAME_ENV, "music".to_string()),
        (DB_PASSWORD_ENV, "hunter2".to_string()),
        (DB_HOST_ENV, "127.0.0.1".to_string()),
        (DB_PORT_ENV, "5432".to_string()),
    ])
}

fn lookup_in<'a>(vars: &'a HashMap<&'static str, String>) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| vars.get(name).cloned()
}

#[test]
fn from_lookup_reads_all_fields() {
    let vars = full_env();
    let cfg = DbConfig::from_lookup(lookup_in(&vars)).expect("complete config");

    assert_eq!(cfg.user, "listener");
    assert_eq!(cfg.dbname, "music");
    assert_eq!(cfg.password, "hunter2");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 5432);
}

#[test]
fn each_missing_variable_is_reported_by_name() {
    for name in REQUIRED_ENV_VARS {
        let mut vars = full_env();
        vars.remove(name);

        match DbConfig::from_lookup(lookup_in(&vars)) {
            Err(ConfigError::Missing(missing)) => assert_eq!(missing, *name),
            other => panic!("removing {name} should fail with Missing, got {other:?}"),
        }
    }
}

#[test]
fn empty_value_counts_as_missing() {
    let mut vars = full_env();
    vars.insert(DB_HOST_ENV, String::new());

    assert!(matches!(
        DbConfig::from_lookup(lookup_in(&vars)),
        Err(ConfigError::Missing(DB_HOST_ENV))
    ));
}

#[test]
fn invalid_port_values_are_rejected() {
    let cases = ["abc", "-1", "65536", "54 32"];

    for raw in cases {
        let mut vars = full_env();
        vars.insert(DB_PORT_ENV, raw.to_string());

        match DbConfig::from_lookup(lookup_in(&vars)) {
            Err(ConfigError::InvalidPort { value, .. }) => assert_eq!(value, raw),
            other => panic!("port {raw:?} should be rejected, got {other:?}"),
        }
    }
}

#[test]
fn debug_output_redacts_password() {
    let vars = full_env();
    let cfg = DbConfig::from_lookup(lookup_in(&vars)).unwrap();

    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    assert!(rendered.contains("<redacted>"));
    assert!(rendered.contains("listener"));
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
    for name in REQUIRED_ENV_VARS {
        unsafe { std::env::remove_var(name) };
    }
    for (name, value) in full_env() {
        unsafe { std::env::set_var(name, value) };
    }

    let cfg = DbConfig::from_env().expect("env is complete");
    assert_eq!(cfg.port, 5432);

    unsafe { std::env::remove_var(DB_PASSWORD_ENV) };
    assert!(matches!(
        DbConfig::from_env(),
        Err(ConfigError::Missing(DB_PASSWORD_ENV))
    ));

    for name in REQUIRED_ENV_VARS {
        unsafe { std::env::remove_var(name) };
    }
}
