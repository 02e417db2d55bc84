//! # Core Service 設定
//!
//! 環境変数からサーバーの設定を読み込む。
//!
//! | 変数名 | デフォルト |
//! |--------|-----------|
//! | `APP_HOST` | `0.0.0.0` |
//! | `APP_PORT` | `3000` |
//! | `DATABASE_URL` | `sqlite://dailylog.db` |
//! | `DATABASE_MAX_CONNECTIONS` | `5` |

use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://dailylog.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 数値として解釈できない値
    #[error("{name} は有効な数値である必要があります: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Core Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// バインドアドレス
    pub host:                     String,
    /// ポート番号
    pub port:                     u16,
    /// データベース接続 URL
    pub database_url:             String,
    /// 接続プールの最大接続数
    pub database_max_connections: u32,
}

impl CoreConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host:                     get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port:                     parse_or("APP_PORT", get("APP_PORT"), DEFAULT_PORT)?,
            database_url:             get("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: v }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_未設定ならデフォルト値を使う() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(
            config,
            CoreConfig {
                host:                     "0.0.0.0".to_string(),
                port:                     3000,
                database_url:             "sqlite://dailylog.db".to_string(),
                database_max_connections: 5,
            }
        );
    }

    #[test]
    fn test_環境変数の値で上書きできる() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "1"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.database_max_connections, 1);
    }

    #[test]
    fn test_空文字列は未設定として扱う() {
        let config = CoreConfig::from_lookup(lookup_from(&[("APP_PORT", "")])).unwrap();

        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_不正なポート番号はエラーになる() {
        let result = CoreConfig::from_lookup(lookup_from(&[("APP_PORT", "http")]));

        assert_eq!(
            result,
            Err(ConfigError::InvalidNumber {
                name:  "APP_PORT",
                value: "http".to_string(),
            })
        );
    }

    #[test]
    fn test_範囲外のポート番号はエラーになる() {
        let result = CoreConfig::from_lookup(lookup_from(&[("APP_PORT", "70000")]));

        assert!(result.is_err());
    }
}
