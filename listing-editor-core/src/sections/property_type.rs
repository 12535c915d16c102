//! 房源类型区块
//!
//! 类型与子类型来自 catalog；更换类型时子类型被清空。

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm};
use crate::error::CoreResult;
use crate::traits::{CatalogProvider, Messages, PropertyTypeOption};
use crate::types::{SectionSlug, Validation};
use crate::utils::rules::Checks;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypeValues {
    #[serde(default)]
    pub property_type_id: Option<String>,
    #[serde(default)]
    pub subtype_id: Option<String>,
}

pub type PropertyTypeDraft = PropertyTypeValues;

/// 可选的类型分类
#[derive(Debug, Clone, Default)]
pub struct PropertyTypeRules {
    pub types: Vec<PropertyTypeOption>,
}

impl PropertyTypeRules {
    pub fn from_catalog(catalog: &dyn CatalogProvider) -> Self {
        Self {
            types: catalog.property_types(),
        }
    }

    fn find(&self, id: Option<&str>) -> Option<&PropertyTypeOption> {
        let id = id?;
        self.types.iter().find(|t| t.id == id)
    }
}

pub struct PropertyType;

impl SectionForm for PropertyType {
    const SLUG: SectionSlug = SectionSlug::PropertyType;
    type Baseline = PropertyTypeValues;
    type Draft = PropertyTypeDraft;
    type Rules = PropertyTypeRules;
    type Patch = PropertyTypeValues;

    fn to_draft(baseline: Option<&PropertyTypeValues>) -> PropertyTypeDraft {
        baseline.cloned().unwrap_or_default()
    }

    fn validate(
        draft: &PropertyTypeDraft,
        rules: &PropertyTypeRules,
        messages: &dyn Messages,
    ) -> Validation {
        let mut checks = Checks::new(messages);
        let type_id = draft.property_type_id.as_deref();
        if checks.one_of(
            "propertyTypeId",
            type_id,
            rules.types.iter().map(|t| t.id.as_str()),
        ) {
            if let Some(selected) = rules.find(type_id) {
                if !selected.subtypes.is_empty() {
                    checks.one_of(
                        "subtypeId",
                        draft.subtype_id.as_deref(),
                        selected.subtypes.iter().map(|s| s.id.as_str()),
                    );
                }
            }
        }
        checks.finish()
    }

    fn build_patch(draft: &PropertyTypeDraft, rules: &PropertyTypeRules) -> PropertyTypeValues {
        let has_subtypes = rules
            .find(draft.property_type_id.as_deref())
            .is_some_and(|t| !t.subtypes.is_empty());
        PropertyTypeValues {
            property_type_id: draft.property_type_id.clone(),
            subtype_id: draft.subtype_id.clone().filter(|_| has_subtypes),
        }
    }
}

impl FormController<PropertyType> {
    pub fn set_property_type(&mut self, id: impl Into<String>) -> CoreResult<()> {
        let id = id.into();
        self.edit("propertyTypeId", |d| {
            if d.property_type_id.as_deref() != Some(id.as_str()) {
                d.subtype_id = None;
            }
            d.property_type_id = Some(id);
        })
    }

    pub fn set_subtype(&mut self, id: impl Into<String>) -> CoreResult<()> {
        let id = id.into();
        self.edit("subtypeId", |d| d.subtype_id = Some(id))
    }

    /// 当前类型下可选的子类型
    pub fn subtype_options(&self) -> Vec<String> {
        self.rules()
            .find(self.draft().property_type_id.as_deref())
            .map(|t| t.subtypes.iter().map(|s| s.id.clone()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SectionController;
    use crate::test_utils::{context, messages, FixedCatalog};

    fn controller(baseline: Option<&PropertyTypeValues>) -> FormController<PropertyType> {
        FormController::new(
            context(),
            baseline,
            PropertyTypeRules::from_catalog(&FixedCatalog),
            messages(),
        )
    }

    #[test]
    fn changing_type_clears_subtype() {
        let mut c = controller(Some(&PropertyTypeValues {
            property_type_id: Some("apartment".to_string()),
            subtype_id: Some("loft".to_string()),
        }));
        c.set_property_type("house").unwrap();
        assert_eq!(c.draft().subtype_id, None);
        assert_eq!(c.subtype_options(), vec!["cottage", "villa"]);
        assert!(c.field_error("subtypeId").is_none());

        c.mark_submit_attempted();
        assert_eq!(
            c.field_error("subtypeId").as_deref(),
            Some("This field is required")
        );
    }

    #[test]
    fn reselecting_same_type_keeps_subtype() {
        let mut c = controller(Some(&PropertyTypeValues {
            property_type_id: Some("apartment".to_string()),
            subtype_id: Some("condo".to_string()),
        }));
        c.set_property_type("apartment").unwrap();
        assert_eq!(c.draft().subtype_id.as_deref(), Some("condo"));
        assert!(!c.is_dirty());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut c = controller(None);
        c.set_property_type("castle").unwrap();
        assert_eq!(
            c.field_error("propertyTypeId").as_deref(),
            Some("Choose one of the available options")
        );
    }

    #[test]
    fn type_without_subtypes_submits_no_subtype() {
        let mut c = controller(None);
        c.set_property_type("unique").unwrap();
        assert!(c.validate().is_valid());
        assert_eq!(
            c.build_patch().unwrap().section(),
            &serde_json::json!({ "propertyTypeId": "unique", "subtypeId": null })
        );
    }
}
