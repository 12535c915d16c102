//! Listing 标识与快照

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PatchFragment, SectionSlug};

/// Listing 的外部稳定 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 已获取的 Listing 值树（各区块 baseline 的来源）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSnapshot {
    pub id: ListingId,
    #[serde(default)]
    pub values: Value,
}

impl ListingSnapshot {
    #[must_use]
    pub fn new(id: ListingId, values: Value) -> Self {
        Self { id, values }
    }

    /// 空 Listing（尚无任何已保存值）
    #[must_use]
    pub fn empty(id: ListingId) -> Self {
        Self::new(id, Value::Object(Map::new()))
    }

    /// 获取区块的 baseline 值（缺失或为 null 时返回 None）
    #[must_use]
    pub fn section_values(&self, slug: SectionSlug) -> Option<&Value> {
        slug.patch_path()
            .iter()
            .try_fold(&self.values, |node, key| node.get(key))
            .filter(|v| !v.is_null())
    }

    /// 合并保存成功的 patch：区块子对象整体覆盖
    pub fn apply_patch(&mut self, patch: &PatchFragment) {
        let values = std::mem::take(&mut self.values);
        self.values = replace_at(values, patch.slug().patch_path(), patch.section().clone());
    }
}

/// 沿路径替换子树，缺失或非对象的中间节点会被重建
fn replace_at(node: Value, path: &[&str], section: Value) -> Value {
    let Some((key, rest)) = path.split_first() else {
        return section;
    };
    let mut map = match node {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let child = map.remove(*key).unwrap_or(Value::Null);
    map.insert((*key).to_string(), replace_at(child, rest, section));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_values_follow_patch_path() {
        let snapshot = ListingSnapshot::new(
            ListingId::new("L-1"),
            json!({ "yourPlace": { "titleSection": { "title": "Loft" }, "priceSection": null } }),
        );
        assert_eq!(
            snapshot.section_values(SectionSlug::Title),
            Some(&json!({ "title": "Loft" }))
        );
        assert!(snapshot.section_values(SectionSlug::Price).is_none());
        assert!(snapshot.section_values(SectionSlug::Directions).is_none());
    }

    #[test]
    fn apply_patch_overwrites_whole_section_and_keeps_siblings() {
        let mut snapshot = ListingSnapshot::new(
            ListingId::new("L-1"),
            json!({ "yourPlace": {
                "titleSection": { "title": "Old", "legacy": true },
                "capacitySection": { "people": 2 }
            } }),
        );
        snapshot.apply_patch(&PatchFragment::scoped(
            SectionSlug::Title,
            json!({ "title": "New" }),
        ));
        assert_eq!(
            snapshot.values["yourPlace"]["titleSection"],
            json!({ "title": "New" })
        );
        assert_eq!(snapshot.values["yourPlace"]["capacitySection"]["people"], 2);
    }

    #[test]
    fn apply_patch_creates_missing_branches() {
        let mut snapshot = ListingSnapshot::empty(ListingId::new("L-2"));
        snapshot.apply_patch(&PatchFragment::scoped(
            SectionSlug::CheckInMethod,
            json!({ "methodId": "lockbox" }),
        ));
        assert_eq!(
            snapshot.section_values(SectionSlug::CheckInMethod),
            Some(&json!({ "methodId": "lockbox" }))
        );
    }
}
