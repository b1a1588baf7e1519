use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_empty_uses_defaults() {
    let cfg = SessionConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!(cfg.endpoints.verify, DEFAULT_VERIFY_PATH);
    assert_eq!(cfg.storage.access_token, "accessToken");
    assert_eq!(cfg.storage.refresh_token, "refreshToken");
    assert_eq!(cfg.routes.login, "/login");
    assert_eq!(cfg.routes.admin_login, "/admin/login");
    assert_eq!(cfg.routes.root, "/");
    assert_eq!(cfg.log_level, LogLevel(log::LevelFilter::Info));
}

#[test]
fn from_lookup_applies_overrides() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[
        ("STOREFRONT_API_BASE", "https://shop.example.test/"),
        ("STOREFRONT_REFRESH_PATH", "/api/auth/refresh"),
        ("STOREFRONT_ACCESS_TOKEN_KEY", "shop_access"),
        ("STOREFRONT_LOGIN_PATH", "/signin"),
        ("STOREFRONT_LOG_LEVEL", "debug"),
    ]))
    .unwrap();
    assert_eq!(cfg.endpoints.api_base, "https://shop.example.test");
    assert_eq!(cfg.endpoints.refresh, "/api/auth/refresh");
    assert_eq!(cfg.endpoints.verify, DEFAULT_VERIFY_PATH);
    assert_eq!(cfg.storage.access_token, "shop_access");
    assert_eq!(cfg.routes.login, "/signin");
    assert_eq!(cfg.log_level, LogLevel(log::LevelFilter::Debug));
}

#[test]
fn from_lookup_overrides_root_route_for_forbidden_redirects() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[("STOREFRONT_ROOT_PATH", "/shop")])).unwrap();
    assert_eq!(cfg.routes.root, "/shop");

    let err = SessionConfig::from_lookup(lookup_from(&[("STOREFRONT_ROOT_PATH", "shop")])).unwrap_err();
    assert_eq!(err, ConfigError::RelativePath { key: "STOREFRONT_ROOT_PATH", value: "shop".to_owned() });
}

#[test]
fn from_lookup_rejects_relative_route() {
    let err = SessionConfig::from_lookup(lookup_from(&[("STOREFRONT_LOGIN_PATH", "login")])).unwrap_err();
    assert_eq!(err, ConfigError::RelativePath { key: "STOREFRONT_LOGIN_PATH", value: "login".to_owned() });
    assert!(err.to_string().contains("absolute path"));
}

#[test]
fn from_lookup_rejects_blank_storage_key() {
    let err = SessionConfig::from_lookup(lookup_from(&[("STOREFRONT_REFRESH_TOKEN_KEY", "  ")])).unwrap_err();
    assert_eq!(err, ConfigError::EmptyValue { key: "STOREFRONT_REFRESH_TOKEN_KEY" });
}

#[test]
fn from_lookup_rejects_unknown_log_level() {
    let err = SessionConfig::from_lookup(lookup_from(&[("STOREFRONT_LOG_LEVEL", "loud")])).unwrap_err();
    assert!(err.to_string().contains("unknown STOREFRONT_LOG_LEVEL"));
}

#[test]
fn from_build_env_without_overrides_is_valid() {
    assert!(SessionConfig::from_build_env().is_ok());
}
