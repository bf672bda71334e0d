//! Code for turning product costs into sale prices and margins.
use crate::product::PackageCosts;
use crate::units::{Dimensionless, Money, add_percent, div_or_zero, to_percent};
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// Markup applied when none is given
const DEFAULT_MARKUP: Dimensionless = Dimensionless(1.0);

/// VAT percentage applied when none is given
const DEFAULT_VAT_PCT: Dimensionless = Dimensionless(21.0);

/// Which cost figure is used as the base for pricing
#[derive(
    PartialEq,
    Default,
    Debug,
    Clone,
    Copy,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum PricingMethod {
    /// Price from the total cost of one package
    #[default]
    #[string = "per_package"]
    PerPackage,
    /// Price from the cost per equivalent kilogram
    #[string = "per_kg"]
    PerKg,
}

impl PricingMethod {
    /// Select the cost base from a package cost breakdown
    pub fn cost_base(&self, package: &PackageCosts) -> Money {
        match self {
            Self::PerPackage => package.total_cost,
            Self::PerKg => Money(package.cost_per_kg.value()),
        }
    }
}

/// How a product is priced
#[derive(PartialEq, Debug, Clone, Default, Deserialize)]
pub struct PricingConfig {
    /// The cost base to price from
    pub method: PricingMethod,
    /// Multiplier applied to the cost base (defaults to 1)
    pub markup: Option<Dimensionless>,
    /// VAT percentage (defaults to 21)
    pub vat_pct: Option<Dimensionless>,
    /// Manually set net sale price
    pub manual_net_price: Option<Money>,
    /// Whether `manual_net_price` is in effect
    pub use_manual_price: bool,
}

impl PricingConfig {
    /// The markup, with the default applied
    pub fn markup(&self) -> Dimensionless {
        self.markup.unwrap_or(DEFAULT_MARKUP)
    }

    /// The VAT percentage, with the default applied
    pub fn vat_pct(&self) -> Dimensionless {
        self.vat_pct.unwrap_or(DEFAULT_VAT_PCT)
    }

    /// The manual net price, if it is currently in effect.
    ///
    /// A price left over from when the override was enabled is ignored.
    pub fn effective_manual_price(&self) -> Option<Money> {
        if self.use_manual_price {
            self.manual_net_price
        } else {
            None
        }
    }
}

/// Suggested and real prices for a product, along with the realised margin
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct PricingStats {
    /// The cost figure the markup is applied to
    pub cost_base: Money,
    /// Cost base multiplied by markup
    pub suggested_net_price: Money,
    /// Suggested net price with VAT added
    pub suggested_price_with_vat: Money,
    /// The price actually charged, excluding VAT
    pub real_net_price: Money,
    /// The price actually charged, including VAT
    pub real_price_with_vat: Money,
    /// Margin as a percentage of the real net price
    pub margin_pct: Dimensionless,
}

/// Calculate prices and margin for a product with the given package costs.
///
/// Margin is calculated on price rather than cost, so a markup of 1.35 gives a margin of about
/// 25.9%. A real net price of zero gives a margin of zero.
pub fn compute_pricing(package: &PackageCosts, config: &PricingConfig) -> PricingStats {
    let vat_pct = config.vat_pct();
    let cost_base = config.method.cost_base(package);
    let suggested_net_price = cost_base * config.markup();
    let real_net_price = config
        .effective_manual_price()
        .unwrap_or(suggested_net_price);
    let margin = div_or_zero(real_net_price - cost_base, real_net_price);

    PricingStats {
        cost_base,
        suggested_net_price,
        suggested_price_with_vat: add_percent(suggested_net_price, vat_pct),
        real_net_price,
        real_price_with_vat: add_percent(real_net_price, vat_pct),
        margin_pct: to_percent(margin),
    }
}
