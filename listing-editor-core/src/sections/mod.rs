//! Concrete sections and the mount factory.
//!
//! Every footer-saved section is a [`SectionForm`] driven by [`FormController`];
//! amenities, guest-safety and the photo gallery persist per action through
//! [`SelfSaveController`].

pub mod availability;
pub mod booking;
pub mod cancellation_policy;
pub mod capacity;
pub mod check_in_method;
pub mod description;
pub mod directions;
pub mod house_rules;
pub mod listing_state;
pub mod location;
pub mod price;
pub mod property_type;
pub mod request_changes;
pub mod title;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::controller::{FormController, SectionForm, SharedController};
use crate::error::{CoreError, CoreResult};
use crate::services::{Captions, SelfSaveController, Selection, ServiceContext};
use crate::types::{EditingContext, ListingSnapshot, SectionSlug};

use availability::{Availability, AvailabilityRules};
use booking::Booking;
use cancellation_policy::{CancellationPolicy, CancellationPolicyRules};
use capacity::{Capacity, CapacityRules};
use check_in_method::{CheckInMethod, CheckInMethodRules};
use description::{Description, DescriptionRules};
use directions::Directions;
use house_rules::{HouseRules, HouseRulesRules};
use listing_state::{ListingState, ListingStateRules};
use location::Location;
use price::{Price, PriceRules};
use property_type::{PropertyType, PropertyTypeRules};
use request_changes::RequestChanges;
use title::Title;

/// Server shape of the id-set sections (amenities, guest-safety)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionValues {
    #[serde(default)]
    pub selected_ids: Vec<u32>,
}

type Form<S> = Arc<Mutex<FormController<S>>>;

/// Typed handle to a mounted section
pub enum SectionHandle {
    Title(Form<Title>),
    PropertyType(Form<PropertyType>),
    Price(Form<Price>),
    Availability(Form<Availability>),
    Capacity(Form<Capacity>),
    Description(Form<Description>),
    Booking(Form<Booking>),
    HouseRules(Form<HouseRules>),
    CancellationPolicy(Form<CancellationPolicy>),
    Address(Form<Location>),
    Directions(Form<Directions>),
    CheckInMethod(Form<CheckInMethod>),
    ListingState(Form<ListingState>),
    RequestChanges(Form<RequestChanges>),
    Amenities(Arc<SelfSaveController<Selection>>),
    GuestSafety(Arc<SelfSaveController<Selection>>),
    PhotoGallery(Arc<SelfSaveController<Captions>>),
}

/// A section ready to be registered
pub struct MountedSection {
    slug: SectionSlug,
    handle: SectionHandle,
    controller: SharedController,
}

impl MountedSection {
    #[must_use]
    pub fn slug(&self) -> SectionSlug {
        self.slug
    }

    /// Type-erased controller for the orchestrator
    #[must_use]
    pub fn controller(&self) -> SharedController {
        Arc::clone(&self.controller)
    }

    #[must_use]
    pub fn handle(&self) -> &SectionHandle {
        &self.handle
    }

    #[must_use]
    pub fn into_handle(self) -> SectionHandle {
        self.handle
    }
}

fn decode<T: DeserializeOwned>(
    slug: SectionSlug,
    snapshot: &ListingSnapshot,
) -> CoreResult<Option<T>> {
    snapshot
        .section_values(slug)
        .map(|values| {
            serde_json::from_value(values.clone()).map_err(|e| CoreError::BaselineDecode {
                slug,
                detail: e.to_string(),
            })
        })
        .transpose()
}

fn form<S: SectionForm>(
    wrap: fn(Form<S>) -> SectionHandle,
    snapshot: &ListingSnapshot,
    ctx: EditingContext,
    rules: S::Rules,
    services: &ServiceContext,
) -> CoreResult<MountedSection> {
    let baseline = decode::<S::Baseline>(S::SLUG, snapshot)?;
    let controller = FormController::<S>::shared(
        ctx,
        baseline.as_ref(),
        rules,
        Arc::clone(&services.messages),
    );
    Ok(MountedSection {
        slug: S::SLUG,
        controller: controller.clone(),
        handle: wrap(controller),
    })
}

fn selection(
    slug: SectionSlug,
    snapshot: &ListingSnapshot,
    ctx: EditingContext,
    services: &Arc<ServiceContext>,
) -> CoreResult<Arc<SelfSaveController<Selection>>> {
    let values = decode::<SelectionValues>(slug, snapshot)?.unwrap_or_default();
    Ok(SelfSaveController::<Selection>::new(
        slug,
        ctx,
        Arc::clone(services),
        values.selected_ids.into_iter().map(|id| (id, ())),
    ))
}

/// Build the controller for `slug`.
///
/// The baseline is read from `snapshot` at the section's patch path; rule
/// parameters come from the catalog. `delete-listing` has no controller.
pub fn mount(
    slug: SectionSlug,
    snapshot: &ListingSnapshot,
    ctx: EditingContext,
    services: &Arc<ServiceContext>,
) -> CoreResult<MountedSection> {
    let catalog = services.catalog.as_ref();
    let mounted = match slug {
        SectionSlug::Title => form(SectionHandle::Title, snapshot, ctx, (), services)?,
        SectionSlug::PropertyType => form(
            SectionHandle::PropertyType,
            snapshot,
            ctx,
            PropertyTypeRules::from_catalog(catalog),
            services,
        )?,
        SectionSlug::Price => form(
            SectionHandle::Price,
            snapshot,
            ctx,
            PriceRules::default(),
            services,
        )?,
        SectionSlug::Availability => form(
            SectionHandle::Availability,
            snapshot,
            ctx,
            AvailabilityRules::from_catalog(catalog),
            services,
        )?,
        SectionSlug::Capacity => form(
            SectionHandle::Capacity,
            snapshot,
            ctx,
            CapacityRules::from_catalog(catalog),
            services,
        )?,
        SectionSlug::Description => form(
            SectionHandle::Description,
            snapshot,
            ctx,
            DescriptionRules::default(),
            services,
        )?,
        SectionSlug::Booking => form(SectionHandle::Booking, snapshot, ctx, (), services)?,
        SectionSlug::HouseRules => form(
            SectionHandle::HouseRules,
            snapshot,
            ctx,
            HouseRulesRules::from_catalog(catalog),
            services,
        )?,
        SectionSlug::CancellationPolicy => form(
            SectionHandle::CancellationPolicy,
            snapshot,
            ctx,
            CancellationPolicyRules::from_catalog(catalog),
            services,
        )?,
        SectionSlug::Address => form(SectionHandle::Address, snapshot, ctx, (), services)?,
        SectionSlug::Directions => form(SectionHandle::Directions, snapshot, ctx, (), services)?,
        SectionSlug::CheckInMethod => form(
            SectionHandle::CheckInMethod,
            snapshot,
            ctx,
            CheckInMethodRules::from_catalog(catalog),
            services,
        )?,
        SectionSlug::ListingState => form(
            SectionHandle::ListingState,
            snapshot,
            ctx,
            ListingStateRules {
                today: Utc::now().date_naive(),
            },
            services,
        )?,
        SectionSlug::RequestChanges => {
            form(SectionHandle::RequestChanges, snapshot, ctx, (), services)?
        }
        SectionSlug::Amenities | SectionSlug::GuestSafety => {
            let controller = selection(slug, snapshot, ctx, services)?;
            let shared = controller.section();
            let handle = if slug == SectionSlug::Amenities {
                SectionHandle::Amenities(controller)
            } else {
                SectionHandle::GuestSafety(controller)
            };
            MountedSection {
                slug,
                handle,
                controller: shared,
            }
        }
        SectionSlug::PhotoGallery => {
            let controller =
                SelfSaveController::<Captions>::for_gallery(ctx, Arc::clone(services));
            MountedSection {
                slug,
                controller: controller.section(),
                handle: SectionHandle::PhotoGallery(controller),
            }
        }
        SectionSlug::DeleteListing => return Err(CoreError::UnsupportedSection(slug)),
    };
    log::debug!("Mounted {slug} section");
    Ok(mounted)
}
