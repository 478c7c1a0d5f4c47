use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A priced option on a package.
///
/// Tiers are selected by exact equality between the client's chosen base price
/// and `base_price`; there is no stable tier identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub guest_count: u32,
    #[serde(default)]
    pub package_type: Option<String>,
    pub base_price: f64,
    /// When false the tier is a fixed bundle that only applies to exactly `guest_count` guests.
    #[serde(default)]
    pub per_person: bool,
    #[serde(default)]
    pub extra_person_charge: Option<f64>,
    #[serde(default)]
    pub extra_bed_charge: f64,
    /// Child without bed.
    #[serde(default)]
    pub cnb: f64,
    /// Child with bed.
    #[serde(default)]
    pub cwb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price: f64,
    #[serde(default)]
    pub pricing: Vec<PricingTier>,
}

impl Package {
    /// First tier whose stored base price equals `selected_base_price`.
    pub fn find_tier(&self, selected_base_price: f64) -> Option<&PricingTier> {
        self.pricing
            .iter()
            .find(|tier| tier.base_price == selected_base_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    /// Nightly price per room.
    pub price: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hotel_type: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_percentage: f64,
    pub max_discount: f64,
}

impl Coupon {
    /// `min(total * pct / 100, max_discount)`, kept within `[0, total]` so a
    /// misconfigured coupon can never push a price below zero.
    pub fn discount_for(&self, total: f64) -> f64 {
        let discount = (total * self.discount_percentage / 100.0).min(self.max_discount);
        discount.max(0.0).min(total.max(0.0))
    }
}
