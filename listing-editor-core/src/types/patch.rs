//! Patch 片段类型

use serde::Serialize;
use serde_json::{Map, Value};

use super::SectionSlug;

/// 区块作用域的 patch 片段
///
/// 序列化结果是镜像 Listing 区块树的嵌套对象，只有提交区块所在的分支有值，
/// 例如 `{ "yourPlace": { "titleSection": { "title": "..." } } }`。
/// 区块内容总是完整快照：服务端按子对象整体覆盖。
#[derive(Debug, Clone, PartialEq)]
pub struct PatchFragment {
    slug: SectionSlug,
    section: Value,
}

impl PatchFragment {
    /// 将区块快照挂到该区块的 patch 路径下
    #[must_use]
    pub fn scoped(slug: SectionSlug, section: Value) -> Self {
        Self { slug, section }
    }

    /// 序列化区块快照后构造
    pub fn from_section<T: Serialize>(slug: SectionSlug, section: &T) -> serde_json::Result<Self> {
        Ok(Self::scoped(slug, serde_json::to_value(section)?))
    }

    #[must_use]
    pub fn slug(&self) -> SectionSlug {
        self.slug
    }

    /// 区块本身的内容（不含外层路径）
    #[must_use]
    pub fn section(&self) -> &Value {
        &self.section
    }

    /// 完整的嵌套 payload
    #[must_use]
    pub fn to_payload(&self) -> Value {
        self.slug
            .patch_path()
            .iter()
            .rev()
            .fold(self.section.clone(), |inner, key| {
                let mut map = Map::new();
                map.insert((*key).to_string(), inner);
                Value::Object(map)
            })
    }
}

impl Serialize for PatchFragment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_nests_under_section_path() {
        let patch = PatchFragment::scoped(SectionSlug::Title, json!({ "title": "Loft" }));
        assert_eq!(
            patch.to_payload(),
            json!({ "yourPlace": { "titleSection": { "title": "Loft" } } })
        );
    }

    #[test]
    fn arrival_guide_sections_use_their_own_branch() {
        let patch = PatchFragment::scoped(SectionSlug::Directions, json!({ "directions": "" }));
        let payload = serde_json::to_value(&patch).unwrap();
        assert!(payload.get("yourPlace").is_none());
        assert_eq!(payload["arrivalGuide"]["directionsSection"]["directions"], "");
    }
}
