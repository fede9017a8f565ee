use core::fmt::{Debug, Display};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "mentorship.toml";
pub const ENV_PREFIX: &str = "MENTORSHIP_";

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

const fn default_listen() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000))
}

fn default_log_filter() -> String {
    "info".to_owned()
}

const fn default_run_migrations() -> bool {
    true
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// `mentorship.toml` in the working directory, overridden by `MENTORSHIP_*`
/// environment variables.
pub fn get_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?)
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_when_only_the_database_is_set() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("MENTORSHIP_DATABASE_URL", "postgres://localhost/mentorship");
            let config = get_config().unwrap();
            assert_eq!(
                config,
                Config {
                    database_url: "postgres://localhost/mentorship".to_owned(),
                    listen: "0.0.0.0:3000".parse().unwrap(),
                    log_filter: "info".to_owned(),
                    run_migrations: true,
                }
            );
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_url = "postgres://file/mentorship"
                listen = "127.0.0.1:8080"
                log_filter = "debug"
                "#,
            )?;
            jail.set_env("MENTORSHIP_DATABASE_URL", "postgres://env/mentorship");
            jail.set_env("MENTORSHIP_RUN_MIGRATIONS", "false");

            let config = get_config().unwrap();
            assert_eq!(config.database_url, "postgres://env/mentorship");
            assert_eq!(config.listen, "127.0.0.1:8080".parse().unwrap());
            assert_eq!(config.log_filter, "debug");
            assert!(!config.run_migrations);
            Ok(())
        });
    }

    #[test]
    fn database_url_is_required() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            assert!(get_config().is_err());
            Ok(())
        });
    }
}
