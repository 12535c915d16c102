//! 业务逻辑服务层

mod optimistic;
mod section_orchestrator;
mod self_save;

pub use optimistic::{OptimisticMap, PendingChange};
pub use section_orchestrator::{
    NavigationOutcome, NavigationPolicy, OrchestratorOptions, SaveOutcome, SaveState,
    SectionOrchestrator,
};
pub use self_save::{
    Captions, ItemOutcome, SelfSaveController, SelfSaveModel, SelfSaveSection, Selection,
};

use std::sync::Arc;

use crate::traits::{CatalogProvider, ListingNetwork, Messages, Notifier, RefreshHook};

/// 服务上下文 - 持有所有协作方
///
/// 平台层需要创建此上下文，并注入平台特定的实现。
pub struct ServiceContext {
    /// 网络层
    pub network: Arc<dyn ListingNetwork>,
    /// 只读参考数据
    pub catalog: Arc<dyn CatalogProvider>,
    /// 翻译文案
    pub messages: Arc<dyn Messages>,
    /// Toast 通知
    pub notifier: Arc<dyn Notifier>,
    /// 自保存成功后的刷新钩子（可选）
    pub refresh: Option<Arc<dyn RefreshHook>>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        network: Arc<dyn ListingNetwork>,
        catalog: Arc<dyn CatalogProvider>,
        messages: Arc<dyn Messages>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            network,
            catalog,
            messages,
            notifier,
            refresh: None,
        }
    }

    /// 设置刷新钩子
    #[must_use]
    pub fn with_refresh(mut self, refresh: Arc<dyn RefreshHook>) -> Self {
        self.refresh = Some(refresh);
        self
    }
}
