use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::models::{Hotel, Package, PricingTier};
use crate::quote::{HotelSelection, QuoteRequest, Services};
use crate::repository::{CouponRepository, HotelRepository, PackageRepository};

/// Each adult beyond the first in a room pays this share of the nightly rate.
pub const ADDITIONAL_ADULT_RATE: f64 = 0.85;
/// Per child, when an extra bed is requested for the room.
pub const CHILD_WITH_EXTRA_BED_RATE: f64 = 0.75;
/// Per child, sharing existing bedding.
pub const CHILD_SHARING_RATE: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Package not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid pricing selection: no tier priced at {0}")]
    InvalidSelection(f64),

    #[error("Guest count mismatch for selected pricing: tier requires {expected}, got {actual}")]
    GuestCountMismatch { expected: u32, actual: u32 },

    #[error("Catalog lookup failed: {0}")]
    Repository(String),
}

/// How a total was assembled. Only `total` is authoritative; the rest is for
/// logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub main_price: f64,
    pub hotel_total: f64,
    pub add_ons: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub tier_selected: bool,
}

/// Server-side price computation for package quotes.
///
/// Read-only against the catalog; never looks at a client-supplied total.
pub struct PricingEngine {
    packages: Arc<dyn PackageRepository>,
    hotels: Arc<dyn HotelRepository>,
    coupons: Arc<dyn CouponRepository>,
}

impl PricingEngine {
    pub fn new(
        packages: Arc<dyn PackageRepository>,
        hotels: Arc<dyn HotelRepository>,
        coupons: Arc<dyn CouponRepository>,
    ) -> Self {
        Self {
            packages,
            hotels,
            coupons,
        }
    }

    /// Compute the authoritative total for a quote.
    pub async fn compute_total(&self, req: &QuoteRequest) -> Result<PriceBreakdown, PricingError> {
        let package = self
            .packages
            .get_package(req.package_id)
            .await
            .map_err(|e| PricingError::Repository(e.to_string()))?
            .ok_or(PricingError::NotFound(req.package_id))?;

        let (main_price, tier) = main_price(&package, req.guest_count, req.tier_price())?;
        let add_ons = add_on_charges(tier, req.services);
        let hotel_total = self.hotel_total(&req.hotel_selections).await;

        let subtotal = main_price + hotel_total + add_ons;
        let discount = match req.coupon_id {
            Some(coupon_id) => self.coupon_discount(coupon_id, subtotal).await,
            None => 0.0,
        };

        let breakdown = PriceBreakdown {
            main_price,
            hotel_total,
            add_ons,
            subtotal,
            discount,
            total: subtotal - discount,
            tier_selected: tier.is_some(),
        };

        debug!(
            package_id = %package.id,
            guests = req.guest_count,
            main_price,
            hotel_total,
            add_ons,
            discount,
            total = breakdown.total,
            "Computed package price"
        );

        Ok(breakdown)
    }

    /// Sum of all resolvable hotel selections. Unknown or failing hotels are
    /// skipped so one bad reference does not sink the quote.
    async fn hotel_total(&self, selections: &[HotelSelection]) -> f64 {
        let mut total = 0.0;

        for selection in selections {
            let Some(hotel_id) = selection.hotel_id else {
                warn!("Skipping hotel selection without a hotel id");
                continue;
            };

            match self.hotels.get_hotel(hotel_id).await {
                Ok(Some(hotel)) => total += hotel_price(&hotel, selection),
                Ok(None) => warn!(%hotel_id, "Hotel not found, skipping selection"),
                Err(e) => error!(%hotel_id, "Error loading hotel, skipping selection: {}", e),
            }
        }

        total
    }

    /// Coupon problems never fail a quote; they just mean no discount.
    async fn coupon_discount(&self, coupon_id: Uuid, subtotal: f64) -> f64 {
        match self.coupons.get_coupon(coupon_id).await {
            Ok(Some(coupon)) => coupon.discount_for(subtotal),
            Ok(None) => {
                warn!(%coupon_id, "Invalid coupon id, pricing without discount");
                0.0
            }
            Err(e) => {
                error!(%coupon_id, "Error fetching coupon, pricing without discount: {}", e);
                0.0
            }
        }
    }
}

/// Package price before hotels and add-ons, plus the matched tier if any.
pub fn main_price(
    package: &Package,
    guest_count: u32,
    selected_base_price: Option<f64>,
) -> Result<(f64, Option<&PricingTier>), PricingError> {
    let guests = f64::from(guest_count);

    let Some(selected) = selected_base_price else {
        return Ok((package.base_price * guests, None));
    };

    let tier = package
        .find_tier(selected)
        .ok_or(PricingError::InvalidSelection(selected))?;

    if !tier.per_person && guest_count != tier.guest_count {
        return Err(PricingError::GuestCountMismatch {
            expected: tier.guest_count,
            actual: guest_count,
        });
    }

    // Bundle tiers are still multiplied by the guest count once the count matches.
    Ok((selected * guests, Some(tier)))
}

/// Surcharges from the matched tier. Without a tier, requested services cost nothing.
pub fn add_on_charges(tier: Option<&PricingTier>, services: Services) -> f64 {
    let Some(tier) = tier else {
        return 0.0;
    };

    let mut charges = 0.0;
    if services.extra_bed {
        charges += tier.extra_bed_charge;
    }
    if services.cnb {
        charges += tier.cnb;
    }
    if services.cwb {
        charges += tier.cwb;
    }
    charges
}

/// Occupancy-adjusted price for a single hotel selection.
pub fn hotel_price(hotel: &Hotel, selection: &HotelSelection) -> f64 {
    let rooms = f64::from(selection.rooms);
    let mut price = hotel.price * rooms;

    if selection.adults > 1 {
        price += f64::from(selection.adults - 1) * hotel.price * ADDITIONAL_ADULT_RATE * rooms;
    }

    if selection.children > 0 {
        let rate = if selection.extra_bed {
            CHILD_WITH_EXTRA_BED_RATE
        } else {
            CHILD_SHARING_RATE
        };
        price += f64::from(selection.children) * hotel.price * rate;
    }

    price
}
