//! 字段错误与校验结果

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 字段错误表
///
/// 键为 UI 可寻址的点路径（如 `locationData.city`），值为展示用文案。
/// 客户端校验与服务端返回共用同一套键。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置字段错误，已存在的键保留先写入的文案
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 用 `other` 覆盖同名键（`other` 优先）
    #[must_use]
    pub fn overlaid_with(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        for (k, v) in &other.0 {
            merged.insert(k.clone(), v.clone());
        }
        Self(merged)
    }

    /// 只保留满足条件的键
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(k, _)| keep(k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut errors = Self::new();
        for (k, v) in iter {
            errors.insert(k, v);
        }
        errors
    }
}

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(FieldErrors),
}

impl Validation {
    /// 由错误表构造（空表即通过）
    #[must_use]
    pub fn from_errors(errors: FieldErrors) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Valid => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    #[must_use]
    pub fn into_errors(self) -> FieldErrors {
        match self {
            Self::Valid => FieldErrors::new(),
            Self::Invalid(errors) => errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_message_wins_for_same_key() {
        let mut errors = FieldErrors::new();
        errors.insert("people", "too few");
        errors.insert("people", "too many");
        assert_eq!(errors.get("people"), Some("too few"));
    }

    #[test]
    fn overlay_prefers_other() {
        let client: FieldErrors = [("title", "client"), ("summary", "client")]
            .into_iter()
            .collect();
        let server: FieldErrors = [("title", "server")].into_iter().collect();
        let merged = client.overlaid_with(&server);
        assert_eq!(merged.get("title"), Some("server"));
        assert_eq!(merged.get("summary"), Some("client"));
    }

    #[test]
    fn empty_errors_validate() {
        assert!(Validation::from_errors(FieldErrors::new()).is_valid());
        let invalid = Validation::from_errors([("a", "b")].into_iter().collect());
        assert_eq!(invalid.errors().map(FieldErrors::len), Some(1));
    }

    #[test]
    fn serializes_as_flat_map() {
        let errors: FieldErrors = [("checkInOut.checkoutId", "Pick a time")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"checkInOut.checkoutId":"Pick a time"}"#);
    }
}
