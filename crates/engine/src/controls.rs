use configuration::ControlsSettings;
use core_types::Controls;
use normalizer::RawControls;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snaps a requested stress band onto the configured set.
///
/// Anything that is not exactly one of the allowed bands, including a missing
/// or fractional value, becomes the default band.
pub fn snap_stress_band(requested: Option<Decimal>, settings: &ControlsSettings) -> u8 {
    let snapped = requested
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_u8())
        .filter(|band| settings.stress_bands.contains(band));

    match snapped {
        Some(band) => band,
        None => {
            if requested.is_some() {
                tracing::debug!(?requested, default = settings.default_stress_band, "Stress band snapped to default.");
            }
            settings.default_stress_band
        }
    }
}

/// A controls change requested by the user; re-fetching applies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlsUpdate {
    pub stress_band_pct: Option<Decimal>,
    pub use_cost_anchor: bool,
    pub anchor_total_cost: Option<Decimal>,
    pub use_revenue_anchor: bool,
    pub anchor_revenue: Option<Decimal>,
}

impl ControlsUpdate {
    /// The update with its stress band snapped; anchors are dropped when their toggle is off.
    pub fn snapped(&self, settings: &ControlsSettings) -> Controls {
        Controls {
            stress_band_pct: snap_stress_band(self.stress_band_pct, settings),
            use_cost_anchor: self.use_cost_anchor,
            anchor_total_cost: self.anchor_total_cost.filter(|_| self.use_cost_anchor),
            use_revenue_anchor: self.use_revenue_anchor,
            anchor_revenue: self.anchor_revenue.filter(|_| self.use_revenue_anchor),
        }
    }
}

/// The controls echoed back by the payload, snapped the same way.
pub fn controls_from_payload(raw: &RawControls, settings: &ControlsSettings) -> Controls {
    Controls {
        stress_band_pct: snap_stress_band(raw.stress_band_pct, settings),
        use_cost_anchor: raw.use_cost_anchor,
        anchor_total_cost: raw.anchor_total_cost,
        use_revenue_anchor: raw.use_revenue_anchor,
        anchor_revenue: raw.anchor_revenue,
    }
}
