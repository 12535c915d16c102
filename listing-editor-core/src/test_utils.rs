//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::oneshot;

use crate::controller::{FlagCallback, SectionController, Subscription, WatchChannel};
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{
    BuiltinMessages, CapacityOptions, CatalogOption, CatalogProvider, CheckInMethodOption,
    ListingNetwork, Messages, Notifier, PropertyTypeOption, RefreshHook,
};
use crate::types::{
    EditingContext, FieldErrors, ItemMutation, ListingId, Notification, NotificationKind,
    PatchFragment, SectionSlug, ServerValues, SubmitError, Validation,
};
use crate::utils::sync::lock;

pub const LISTING_ID: &str = "listing-1";

/// 默认编辑上下文
pub fn context() -> EditingContext {
    EditingContext::new(ListingId::new(LISTING_ID))
}

/// 英文默认文案
pub fn messages() -> Arc<dyn Messages> {
    Arc::new(BuiltinMessages)
}

/// 包装为共享句柄
pub fn shared<C>(controller: C) -> Arc<Mutex<C>> {
    Arc::new(Mutex::new(controller))
}

// ===== ProbeController =====

/// 手动驱动 dirty / valid 的 Controller 替身
pub struct ProbeController {
    slug: SectionSlug,
    ctx: EditingContext,
    dirty: bool,
    valid: bool,
    disposed: bool,
    submit_attempted: bool,
    server_errors: FieldErrors,
    discards: usize,
    rebases: usize,
    dirty_channel: WatchChannel<bool>,
    validity_channel: WatchChannel<bool>,
}

impl ProbeController {
    pub fn new(slug: SectionSlug) -> Self {
        Self {
            slug,
            ctx: context(),
            dirty: false,
            valid: true,
            disposed: false,
            submit_attempted: false,
            server_errors: FieldErrors::new(),
            discards: 0,
            rebases: 0,
            dirty_channel: WatchChannel::new(),
            validity_channel: WatchChannel::new(),
        }
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
        self.dirty_channel.emit(&dirty);
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
        self.validity_channel.emit(&valid);
    }

    pub fn subscriber_count(&self) -> usize {
        self.dirty_channel.subscriber_count() + self.validity_channel.subscriber_count()
    }

    pub fn discards(&self) -> usize {
        self.discards
    }

    pub fn rebases(&self) -> usize {
        self.rebases
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }
}

impl SectionController for ProbeController {
    fn slug(&self) -> SectionSlug {
        self.slug
    }

    fn context(&self) -> &EditingContext {
        &self.ctx
    }

    fn supports_footer_save(&self) -> bool {
        self.slug.supports_footer_save()
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn validate(&self) -> Validation {
        if self.valid {
            Validation::Valid
        } else {
            Validation::from_errors([("probe", "invalid")].into_iter().collect())
        }
    }

    fn build_patch(&self) -> CoreResult<PatchFragment> {
        if !self.valid {
            return Err(CoreError::InvalidDraft(self.slug));
        }
        Ok(PatchFragment::scoped(self.slug, json!({ "probe": true })))
    }

    fn mark_submit_attempted(&mut self) {
        self.submit_attempted = true;
    }

    fn discard(&mut self) {
        self.discards += 1;
        self.server_errors.clear();
        self.set_dirty(false);
    }

    fn rebase(&mut self) {
        self.rebases += 1;
        self.server_errors.clear();
        self.set_dirty(false);
    }

    fn apply_server_errors(&mut self, errors: FieldErrors) {
        self.server_errors = errors;
    }

    fn visible_errors(&self) -> FieldErrors {
        let client = if self.submit_attempted {
            self.validate().into_errors()
        } else {
            FieldErrors::new()
        };
        client.overlaid_with(&self.server_errors)
    }

    fn watch_dirty(&self, callback: FlagCallback) -> Subscription {
        self.dirty_channel.subscribe(callback)
    }

    fn watch_validity(&self, callback: FlagCallback) -> Subscription {
        self.validity_channel.subscribe(callback)
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

// ===== MockNetwork =====

enum Scripted<T> {
    Ready(Result<T, SubmitError>),
    Gated(oneshot::Receiver<Result<T, SubmitError>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, SubmitError> {
        match self {
            Self::Ready(result) => result,
            Self::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SubmitError::generic("gate dropped"))),
        }
    }
}

/// 可编排响应的网络层
///
/// 未编排的请求直接成功：`submit_patch` 回显区块内容，`mutate_item` 返回 `Ok(())`。
/// Gate 让测试按任意顺序释放并发请求的响应。
pub struct MockNetwork {
    submits: Mutex<VecDeque<Scripted<ServerValues>>>,
    items: Mutex<HashMap<String, VecDeque<Scripted<()>>>>,
    submitted: Mutex<Vec<PatchFragment>>,
    mutations: Mutex<Vec<ItemMutation>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self {
            submits: Mutex::new(VecDeque::new()),
            items: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
        }
    }

    /// 下一次提交的结果
    pub fn push_submit(&self, result: Result<ServerValues, SubmitError>) {
        lock(&self.submits).push_back(Scripted::Ready(result));
    }

    /// 下一次提交挂起，直到返回的 Sender 发送结果
    pub fn gate_submit(&self) -> oneshot::Sender<Result<ServerValues, SubmitError>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.submits).push_back(Scripted::Gated(rx));
        tx
    }

    /// 指定 item 的下一次变更结果
    pub fn push_item(&self, item_id: &str, result: Result<(), SubmitError>) {
        lock(&self.items)
            .entry(item_id.to_string())
            .or_default()
            .push_back(Scripted::Ready(result));
    }

    /// 指定 item 的下一次变更挂起
    pub fn gate_item(&self, item_id: &str) -> oneshot::Sender<Result<(), SubmitError>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.items)
            .entry(item_id.to_string())
            .or_default()
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub fn submitted(&self) -> Vec<PatchFragment> {
        lock(&self.submitted).clone()
    }

    pub fn mutations(&self) -> Vec<ItemMutation> {
        lock(&self.mutations).clone()
    }
}

#[async_trait]
impl ListingNetwork for MockNetwork {
    async fn submit_patch(
        &self,
        _listing_id: &ListingId,
        patch: &PatchFragment,
    ) -> Result<ServerValues, SubmitError> {
        lock(&self.submitted).push(patch.clone());
        let scripted = lock(&self.submits).pop_front();
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(patch.section().clone()),
        }
    }

    async fn mutate_item(
        &self,
        _listing_id: &ListingId,
        _slug: SectionSlug,
        mutation: &ItemMutation,
    ) -> Result<(), SubmitError> {
        lock(&self.mutations).push(mutation.clone());
        let scripted = lock(&self.items)
            .get_mut(mutation.item_id())
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(()),
        }
    }
}

// ===== RecordingNotifier =====

pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn all(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        lock(&self.notifications)
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }
}

// ===== RecordingRefresh =====

pub struct RecordingRefresh {
    calls: AtomicUsize,
}

impl RecordingRefresh {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshHook for RecordingRefresh {
    async fn refresh(&self, _listing_id: &ListingId, _slug: SectionSlug) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== FixedCatalog =====

/// 固定参考数据
pub struct FixedCatalog;

impl CatalogProvider for FixedCatalog {
    fn time_slots(&self) -> Vec<CatalogOption> {
        (8..=22)
            .map(|hour| CatalogOption::new(format!("{hour:02}:00"), format!("{hour}:00")))
            .collect()
    }

    fn property_types(&self) -> Vec<PropertyTypeOption> {
        vec![
            PropertyTypeOption {
                id: "apartment".to_string(),
                label: "Apartment".to_string(),
                subtypes: vec![
                    CatalogOption::new("loft", "Loft"),
                    CatalogOption::new("condo", "Condo"),
                ],
            },
            PropertyTypeOption {
                id: "house".to_string(),
                label: "House".to_string(),
                subtypes: vec![
                    CatalogOption::new("cottage", "Cottage"),
                    CatalogOption::new("villa", "Villa"),
                ],
            },
            PropertyTypeOption {
                id: "unique".to_string(),
                label: "Unique space".to_string(),
                subtypes: Vec::new(),
            },
        ]
    }

    fn cancellation_policies(&self) -> Vec<CatalogOption> {
        vec![
            CatalogOption::new("flexible", "Flexible"),
            CatalogOption::new("moderate", "Moderate"),
            CatalogOption::new("strict", "Strict"),
        ]
    }

    fn check_in_methods(&self) -> Vec<CheckInMethodOption> {
        [
            ("smart-lock", false),
            ("keypad", true),
            ("lockbox", true),
            ("host-greets", false),
        ]
        .into_iter()
        .map(|(id, requires_instructions)| CheckInMethodOption {
            id: id.to_string(),
            label: id.to_string(),
            requires_instructions,
        })
        .collect()
    }

    fn advance_notice_options(&self) -> Vec<CatalogOption> {
        vec![
            CatalogOption::new("same-day", "Same day"),
            CatalogOption::new("one-day", "At least 1 day"),
            CatalogOption::new("three-days", "At least 3 days"),
        ]
    }

    fn capacity_options(&self) -> CapacityOptions {
        CapacityOptions {
            people: (1..=16).collect(),
            bedrooms: (0..=10).collect(),
            beds: (1..=16).collect(),
            bathrooms: (0..=8).collect(),
        }
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockNetwork>,
    Arc<RecordingNotifier>,
    Arc<RecordingRefresh>,
) {
    let network = Arc::new(MockNetwork::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let refresh = Arc::new(RecordingRefresh::new());

    let ctx = Arc::new(
        ServiceContext::new(
            network.clone(),
            Arc::new(FixedCatalog),
            messages(),
            notifier.clone(),
        )
        .with_refresh(refresh.clone()),
    );

    (ctx, network, notifier, refresh)
}

/// 带字段错误的拒绝
pub fn rejected(fields: &[(&str, &str)]) -> SubmitError {
    SubmitError::Fields {
        field_errors: fields.iter().copied().collect(),
    }
}
