use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional add-ons requested alongside a tier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    #[serde(default)]
    pub extra_bed: bool,
    #[serde(default)]
    pub cnb: bool,
    #[serde(default)]
    pub cwb: bool,
}

/// One hotel the traveller picked, with its occupancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSelection {
    #[serde(default)]
    pub hotel_id: Option<Uuid>,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default = "default_rooms")]
    pub rooms: u32,
    #[serde(default)]
    pub extra_bed: bool,
}

fn default_rooms() -> u32 {
    1
}

/// Inputs to a price computation.
///
/// There is deliberately no price field: the total is always derived server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub package_id: Uuid,
    pub guest_count: u32,
    #[serde(default)]
    pub hotel_selections: Vec<HotelSelection>,
    #[serde(default)]
    pub coupon_id: Option<Uuid>,
    #[serde(default)]
    pub selected_base_price: Option<f64>,
    #[serde(default)]
    pub services: Services,
}

impl QuoteRequest {
    /// The selected tier price, treating `0` the same as "nothing selected".
    pub fn tier_price(&self) -> Option<f64> {
        self.selected_base_price.filter(|price| *price != 0.0)
    }
}
