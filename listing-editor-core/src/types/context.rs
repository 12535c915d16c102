//! 编辑上下文
//!
//! 多个独立挂载的区块需要同一组上下文标识（当前 listing、已加载的相册），
//! 统一通过构造参数注入到每个 Controller，而不是读取进程级全局状态。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ListingId;

/// 编辑模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditMode {
    #[default]
    Edit,
    /// 只读查看，所有 setter 都必须拒绝修改
    View,
}

/// 相册中的一张照片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPhoto {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// 注入到 Controller 的编辑上下文
#[derive(Debug, Clone, PartialEq)]
pub struct EditingContext {
    pub listing_id: ListingId,
    pub gallery: Arc<[GalleryPhoto]>,
    pub mode: EditMode,
}

impl EditingContext {
    #[must_use]
    pub fn new(listing_id: ListingId) -> Self {
        Self {
            listing_id,
            gallery: Arc::from(Vec::new()),
            mode: EditMode::Edit,
        }
    }

    #[must_use]
    pub fn with_gallery(mut self, gallery: Vec<GalleryPhoto>) -> Self {
        self.gallery = Arc::from(gallery);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EditMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.mode == EditMode::View
    }
}
