//! 与网络层 / 通知层交互的数据类型

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FieldErrors;

/// 服务端确认后的区块值
pub type ServerValues = Value;

/// 提交失败
///
/// 只有 `Generic` 会到达全局通知层；`Fields` 留在 Controller 内部。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmitError {
    /// 带字段信息的业务拒绝
    #[serde(rename_all = "camelCase")]
    Fields { field_errors: FieldErrors },
    /// 传输 / 服务端故障（含超时），无字段信息
    Generic { detail: String },
}

impl SubmitError {
    #[must_use]
    pub fn generic(detail: impl Into<String>) -> Self {
        Self::Generic {
            detail: detail.into(),
        }
    }

    /// 非空的字段错误表；空表按通用失败处理
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Fields { field_errors } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fields { field_errors } => {
                write!(f, "Rejected with {} field error(s)", field_errors.len())
            }
            Self::Generic { detail } => write!(f, "Submit failed: {detail}"),
        }
    }
}

/// 逐项自保存区块的单次变更
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ItemMutation {
    #[serde(rename_all = "camelCase")]
    Select { item_id: String },
    #[serde(rename_all = "camelCase")]
    Deselect { item_id: String },
    #[serde(rename_all = "camelCase")]
    Caption { item_id: String, caption: String },
}

impl ItemMutation {
    #[must_use]
    pub fn item_id(&self) -> &str {
        match self {
            Self::Select { item_id } | Self::Deselect { item_id } | Self::Caption { item_id, .. } => {
                item_id
            }
        }
    }
}

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast 通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_errors_degrade_to_generic() {
        let err = SubmitError::Fields {
            field_errors: FieldErrors::new(),
        };
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn submit_error_wire_format() {
        let json = r#"{"kind":"fields","fieldErrors":{"title":"Taken"}}"#;
        let err: SubmitError = serde_json::from_str(json).unwrap();
        assert_eq!(err.field_errors().and_then(|e| e.get("title")), Some("Taken"));
    }

    #[test]
    fn item_mutation_wire_format() {
        let m = ItemMutation::Caption {
            item_id: "p1".to_string(),
            caption: "Balcony".to_string(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["action"], "caption");
        assert_eq!(json["itemId"], "p1");
        assert_eq!(m.item_id(), "p1");
    }
}
