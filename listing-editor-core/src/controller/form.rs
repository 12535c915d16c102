//! Generic draft store + controller for footer-saved sections.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::watch::{Subscription, WatchChannel};
use super::{FlagCallback, SectionController};
use crate::error::{CoreError, CoreResult};
use crate::traits::Messages;
use crate::types::{EditingContext, FieldErrors, PatchFragment, SectionSlug, Validation};
use crate::utils::deep_eq::{draft_equal, ComparatorOverrides};

/// Per-section definition: baseline → draft adapter, validation and patch shape
pub trait SectionForm: Send + 'static {
    const SLUG: SectionSlug;

    /// Server shape of the section
    type Baseline: DeserializeOwned + Send;
    /// Editing shape; may keep raw text where the server stores numbers
    type Draft: Clone + Debug + Serialize + Send;
    /// Externally supplied rule parameters (catalog-derived limits etc.)
    type Rules: Debug + Send;
    /// Submitted section snapshot
    type Patch: Serialize;

    /// Must accept an absent baseline and return a well-defined empty draft
    fn to_draft(baseline: Option<&Self::Baseline>) -> Self::Draft;

    /// Comparison overrides for [`is_dirty`](Self::is_dirty)
    fn comparators() -> &'static ComparatorOverrides {
        &[]
    }

    fn is_dirty(draft: &Self::Draft, baseline: &Self::Draft) -> bool {
        !draft_equal(draft, baseline, Self::comparators())
    }

    fn validate(draft: &Self::Draft, rules: &Self::Rules, messages: &dyn Messages) -> Validation;

    /// Only ever called with a draft that validates
    fn build_patch(draft: &Self::Draft, rules: &Self::Rules) -> Self::Patch;
}

/// Controller for one mounted [`SectionForm`]
pub struct FormController<S: SectionForm> {
    ctx: EditingContext,
    rules: S::Rules,
    messages: Arc<dyn Messages>,
    baseline: S::Draft,
    draft: S::Draft,
    /// 正在提交的草稿快照
    submitted: Option<S::Draft>,
    external_errors: FieldErrors,
    notices: FieldErrors,
    touched: BTreeSet<String>,
    submit_attempted: bool,
    disposed: bool,
    last_dirty: bool,
    last_valid: bool,
    last_saved_at: Option<DateTime<Utc>>,
    dirty_channel: WatchChannel<bool>,
    validity_channel: WatchChannel<bool>,
}

impl<S: SectionForm> FormController<S> {
    /// 由 baseline 创建（baseline 缺失时使用空草稿）
    pub fn new(
        ctx: EditingContext,
        baseline: Option<&S::Baseline>,
        rules: S::Rules,
        messages: Arc<dyn Messages>,
    ) -> Self {
        let baseline = S::to_draft(baseline);
        let last_valid = S::validate(&baseline, &rules, messages.as_ref()).is_valid();
        Self {
            ctx,
            rules,
            messages,
            draft: baseline.clone(),
            baseline,
            submitted: None,
            external_errors: FieldErrors::new(),
            notices: FieldErrors::new(),
            touched: BTreeSet::new(),
            submit_attempted: false,
            disposed: false,
            last_dirty: false,
            last_valid,
            last_saved_at: None,
            dirty_channel: WatchChannel::new(),
            validity_channel: WatchChannel::new(),
        }
    }

    /// 创建并包装为可共享句柄
    pub fn shared(
        ctx: EditingContext,
        baseline: Option<&S::Baseline>,
        rules: S::Rules,
        messages: Arc<dyn Messages>,
    ) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new(ctx, baseline, rules, messages)))
    }

    pub fn draft(&self) -> &S::Draft {
        &self.draft
    }

    pub fn baseline(&self) -> &S::Draft {
        &self.baseline
    }

    pub fn rules(&self) -> &S::Rules {
        &self.rules
    }

    pub fn messages(&self) -> &dyn Messages {
        self.messages.as_ref()
    }

    /// 当前草稿的全部客户端错误（不论是否已展示）
    pub fn client_errors(&self) -> FieldErrors {
        self.validate().into_errors()
    }

    /// 单个字段当前应展示的错误
    pub fn field_error(&self, field: &str) -> Option<String> {
        self.visible_errors().get(field).map(str::to_string)
    }

    /// 规则提示（例如被自动修正的输入），下一次编辑时清除
    pub fn notices(&self) -> &FieldErrors {
        &self.notices
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// 修改草稿的唯一入口
    ///
    /// 拒绝只读 / 已销毁状态下的修改；任何编辑都会清空全部服务端错误。
    pub fn edit(&mut self, field: &str, apply: impl FnOnce(&mut S::Draft)) -> CoreResult<()> {
        if self.disposed {
            log::warn!("Refused edit of {field} on disposed {} controller", S::SLUG);
            return Err(CoreError::ControllerDisposed(S::SLUG));
        }
        if self.ctx.is_read_only() {
            log::warn!("Refused edit of {field} on read-only {} section", S::SLUG);
            return Err(CoreError::ReadOnlyViolation {
                slug: S::SLUG,
                field: field.to_string(),
            });
        }

        apply(&mut self.draft);
        self.external_errors.clear();
        self.notices.clear();
        self.touched.insert(field.to_string());
        self.publish();
        Ok(())
    }

    /// 记录规则提示（须在 `edit` 之后调用）
    pub(crate) fn set_notice(&mut self, field: &str, message: String) {
        self.notices.insert(field, message);
    }

    fn publish(&mut self) {
        let dirty = S::is_dirty(&self.draft, &self.baseline);
        if dirty != self.last_dirty {
            self.last_dirty = dirty;
            self.dirty_channel.emit(&dirty);
        }
        let valid = self.validate().is_valid();
        if valid != self.last_valid {
            self.last_valid = valid;
            self.validity_channel.emit(&valid);
        }
    }

    fn clear_feedback(&mut self) {
        self.external_errors.clear();
        self.notices.clear();
        self.touched.clear();
        self.submit_attempted = false;
    }
}

impl<S: SectionForm> SectionController for FormController<S> {
    fn slug(&self) -> SectionSlug {
        S::SLUG
    }

    fn context(&self) -> &EditingContext {
        &self.ctx
    }

    fn supports_footer_save(&self) -> bool {
        S::SLUG.supports_footer_save()
    }

    fn is_dirty(&self) -> bool {
        S::is_dirty(&self.draft, &self.baseline)
    }

    fn validate(&self) -> Validation {
        S::validate(&self.draft, &self.rules, self.messages.as_ref())
    }

    fn build_patch(&self) -> CoreResult<PatchFragment> {
        if !self.validate().is_valid() {
            return Err(CoreError::InvalidDraft(S::SLUG));
        }
        let patch = S::build_patch(&self.draft, &self.rules);
        Ok(PatchFragment::from_section(S::SLUG, &patch)?)
    }

    fn begin_submit(&mut self) -> CoreResult<PatchFragment> {
        let patch = self.build_patch()?;
        self.submitted = Some(self.draft.clone());
        Ok(patch)
    }

    fn mark_submit_attempted(&mut self) {
        self.submit_attempted = true;
    }

    fn discard(&mut self) {
        if self.disposed {
            log::debug!("Ignoring discard on disposed {} controller", S::SLUG);
            return;
        }
        self.draft = self.baseline.clone();
        self.clear_feedback();
        self.publish();
    }

    fn rebase(&mut self) {
        if self.disposed {
            log::debug!("Ignoring rebase on disposed {} controller", S::SLUG);
            return;
        }
        self.baseline = self
            .submitted
            .take()
            .unwrap_or_else(|| self.draft.clone());
        self.clear_feedback();
        self.last_saved_at = Some(Utc::now());
        self.publish();
    }

    fn apply_server_errors(&mut self, errors: FieldErrors) {
        if self.disposed {
            log::debug!("Ignoring server errors on disposed {} controller", S::SLUG);
            return;
        }
        self.submitted = None;
        self.external_errors = errors;
    }

    fn visible_errors(&self) -> FieldErrors {
        let client = self.client_errors();
        let shown = if self.submit_attempted {
            client
        } else {
            client.filtered(|field| self.touched.contains(field))
        };
        shown.overlaid_with(&self.external_errors)
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
