//! 区块标识（Section Slug）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 区块标识
///
/// 封闭枚举，导航与 patch / 错误作用域使用同一套字符串。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionSlug {
    Title,
    PropertyType,
    Price,
    Availability,
    Capacity,
    Description,
    Amenities,
    Booking,
    HouseRules,
    GuestSafety,
    CancellationPolicy,
    Address,
    PhotoGallery,
    Directions,
    CheckInMethod,
    ListingState,
    RequestChanges,
    DeleteListing,
}

impl SectionSlug {
    /// 全部区块（导航顺序）
    pub const ALL: [Self; 18] = [
        Self::Title,
        Self::PropertyType,
        Self::Price,
        Self::Availability,
        Self::Capacity,
        Self::Description,
        Self::Amenities,
        Self::Booking,
        Self::HouseRules,
        Self::GuestSafety,
        Self::CancellationPolicy,
        Self::Address,
        Self::PhotoGallery,
        Self::Directions,
        Self::CheckInMethod,
        Self::ListingState,
        Self::RequestChanges,
        Self::DeleteListing,
    ];

    /// 字符串形式
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::PropertyType => "property-type",
            Self::Price => "price",
            Self::Availability => "availability",
            Self::Capacity => "capacity",
            Self::Description => "description",
            Self::Amenities => "amenities",
            Self::Booking => "booking",
            Self::HouseRules => "house-rules",
            Self::GuestSafety => "guest-safety",
            Self::CancellationPolicy => "cancellation-policy",
            Self::Address => "address",
            Self::PhotoGallery => "photo-gallery",
            Self::Directions => "directions",
            Self::CheckInMethod => "check-in-method",
            Self::ListingState => "listing-state",
            Self::RequestChanges => "request-changes",
            Self::DeleteListing => "delete-listing",
        }
    }

    /// 区块在 Listing patch 树中的路径
    #[must_use]
    pub fn patch_path(self) -> &'static [&'static str] {
        match self {
            Self::Title => &["yourPlace", "titleSection"],
            Self::PropertyType => &["yourPlace", "propertyTypeSection"],
            Self::Price => &["yourPlace", "priceSection"],
            Self::Availability => &["yourPlace", "availabilitySection"],
            Self::Capacity => &["yourPlace", "capacitySection"],
            Self::Description => &["yourPlace", "descriptionSection"],
            Self::Amenities => &["yourPlace", "amenitiesSection"],
            Self::Booking => &["yourPlace", "bookingSection"],
            Self::HouseRules => &["yourPlace", "houseRulesSection"],
            Self::GuestSafety => &["yourPlace", "guestSafetySection"],
            Self::CancellationPolicy => &["yourPlace", "cancellationPolicySection"],
            Self::Address => &["yourPlace", "locationSection"],
            Self::PhotoGallery => &["yourPlace", "photoGallerySection"],
            Self::ListingState => &["yourPlace", "listingStateSection"],
            Self::Directions => &["arrivalGuide", "directionsSection"],
            Self::CheckInMethod => &["arrivalGuide", "checkInMethodSection"],
            Self::RequestChanges => &["requestChanges"],
            Self::DeleteListing => &["deleteListing"],
        }
    }

    /// 是否走底部 "保存" 流程（否则为逐项自保存或独立动作）
    #[must_use]
    pub fn supports_footer_save(self) -> bool {
        !matches!(
            self,
            Self::Amenities | Self::GuestSafety | Self::PhotoGallery | Self::DeleteListing
        )
    }
}

impl fmt::Display for SectionSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionSlug {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slug| slug.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSlug(s.to_string()))
    }
}
