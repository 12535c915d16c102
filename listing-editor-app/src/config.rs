//! 编辑器配置（JSON）

use std::path::{Path, PathBuf};

use listing_editor_core::error::{CoreError, CoreResult};
use listing_editor_core::services::{NavigationPolicy, OrchestratorOptions};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP adapter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sent as a bearer token when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

/// 编辑器配置
///
/// 所有字段都有默认值，空对象 `{}` 即为合法配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// 离开有未保存修改的区块时的策略
    #[serde(default)]
    pub navigation: NavigationPolicy,
    #[serde(default = "default_true")]
    pub notify_on_success: bool,
    /// 自保存成功后是否调用刷新钩子
    #[serde(default = "default_true")]
    pub refresh_after_self_save: bool,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationPolicy::default(),
            notify_on_success: true,
            refresh_after_self_save: true,
            http: HttpConfig::default(),
            catalog_path: None,
        }
    }
}

impl EditorConfig {
    /// 从 JSON 文本解析
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// 从文件读取
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    #[must_use]
    pub fn to_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            navigation_policy: self.navigation,
            notify_on_success: self.notify_on_success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.to_options(), OrchestratorOptions::default());
    }

    #[test]
    fn parses_camel_case_fields() {
        let config = EditorConfig::from_json(
            r#"{
                "navigation": "discard-silently",
                "notifyOnSuccess": false,
                "refreshAfterSelfSave": false,
                "http": { "baseUrl": "https://api.example", "authToken": "t0k" },
                "catalogPath": "catalog.json"
            }"#,
        )
        .unwrap();
        assert_eq!(config.navigation, NavigationPolicy::DiscardSilently);
        assert!(!config.refresh_after_self_save);
        assert_eq!(config.http.base_url, "https://api.example");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.auth_token.as_deref(), Some("t0k"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert!(!config.to_options().notify_on_success);
    }

    #[test]
    fn unknown_policy_is_config_error() {
        let err = EditorConfig::from_json(r#"{ "navigation": "ask-twice" }"#).unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(_)));
    }
}
