//! 逐项乐观更新状态机
//!
//! 每个 item 独立经历 Idle → Pending → Idle(success | failure)。
//! 本地值在请求发出前即被修改；失败时只回滚该 item 自己的变更，
//! 与其他仍在进行中的请求互不影响。

use std::collections::{BTreeMap, BTreeSet};

/// 一次进行中的乐观变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange<K, V> {
    pub key: K,
    /// 变更前的值（`None` 表示不存在 / 未选中）
    pub previous: Option<V>,
    /// 乐观写入的值
    pub next: Option<V>,
}

/// 乐观值表：值 + pending 集合 + 逐项错误
#[derive(Debug, Clone)]
pub struct OptimisticMap<K, V> {
    values: BTreeMap<K, V>,
    pending: BTreeSet<K>,
    failed: BTreeMap<K, String>,
    error: Option<String>,
}

impl<K: Ord + Clone, V: Clone> OptimisticMap<K, V> {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            values: values.into_iter().collect(),
            pending: BTreeSet::new(),
            failed: BTreeMap::new(),
            error: None,
        }
    }

    /// 乐观写入；该 item 已在进行中时返回 `None`
    pub fn begin(&mut self, key: K, next: Option<V>) -> Option<PendingChange<K, V>> {
        if self.pending.contains(&key) {
            return None;
        }
        let previous = match &next {
            Some(value) => self.values.insert(key.clone(), value.clone()),
            None => self.values.remove(&key),
        };
        self.pending.insert(key.clone());
        self.failed.remove(&key);
        Some(PendingChange {
            key,
            previous,
            next,
        })
    }

    /// 服务端确认：保留乐观值
    pub fn succeed(&mut self, change: &PendingChange<K, V>) {
        self.pending.remove(&change.key);
        self.failed.remove(&change.key);
        if self.failed.is_empty() {
            self.error = None;
        }
    }

    /// 服务端拒绝：恢复变更前的值并记录错误
    pub fn fail(&mut self, change: &PendingChange<K, V>, message: impl Into<String>) {
        let message = message.into();
        match &change.previous {
            Some(value) => {
                self.values.insert(change.key.clone(), value.clone());
            }
            None => {
                self.values.remove(&change.key);
            }
        }
        self.pending.remove(&change.key);
        self.failed.insert(change.key.clone(), message.clone());
        self.error = Some(message);
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<K, V> {
        &self.values
    }

    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.values.keys().cloned().collect()
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains(key)
    }

    #[must_use]
    pub fn pending(&self) -> &BTreeSet<K> {
        &self.pending
    }

    /// 某个 item 最近一次失败的提示
    #[must_use]
    pub fn item_error(&self, key: &K) -> Option<&str> {
        self.failed.get(key).map(String::as_str)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&K, &str)> {
        self.failed.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// 最近一次失败的提示（区块级）
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(ids: &[u32]) -> OptimisticMap<u32, ()> {
        OptimisticMap::new(ids.iter().map(|id| (*id, ())))
    }

    #[test]
    fn begin_applies_immediately_and_blocks_same_item() {
        let mut map = selection(&[1, 2]);
        let change = map.begin(3, Some(())).unwrap();
        assert_eq!(map.keys(), vec![1, 2, 3]);
        assert!(map.is_pending(&3));
        assert_eq!(change.previous, None);

        assert!(map.begin(3, None).is_none());
        assert!(map.contains(&3));
    }

    #[test]
    fn failure_inverts_only_that_item() {
        let mut map = selection(&[1, 2]);
        let add = map.begin(3, Some(())).unwrap();
        let remove = map.begin(1, None).unwrap();

        map.fail(&add, "nope");
        assert_eq!(map.keys(), vec![2]);
        assert!(map.is_pending(&1));
        assert_eq!(map.item_error(&3), Some("nope"));

        map.succeed(&remove);
        assert_eq!(map.keys(), vec![2]);
        assert!(map.pending().is_empty());
        assert_eq!(map.error(), Some("nope"));
    }

    #[test]
    fn failed_removal_restores_previous_value() {
        let mut map: OptimisticMap<String, String> =
            OptimisticMap::new([("p1".to_string(), "Old".to_string())]);
        let change = map.begin("p1".to_string(), Some("New".to_string())).unwrap();
        assert_eq!(map.get(&"p1".to_string()).map(String::as_str), Some("New"));

        map.fail(&change, "failed");
        assert_eq!(map.get(&"p1".to_string()).map(String::as_str), Some("Old"));
    }

    #[test]
    fn retry_clears_item_error_and_success_clears_global() {
        let mut map = selection(&[]);
        let first = map.begin(5, Some(())).unwrap();
        map.fail(&first, "nope");

        let retry = map.begin(5, Some(())).unwrap();
        assert_eq!(map.item_error(&5), None);
        map.succeed(&retry);
        assert_eq!(map.error(), None);
        assert!(map.contains(&5));
    }
}
