//! This module defines the unit types used in costing calculations and the conversions between
//! them.
//!
//! A [`Quantity`] is an amount expressed in whatever output unit is relevant in context: the
//! costing unit of a material (e.g. kg), kilograms of formed mix or a number of packages.
use serde::{Deserialize, Serialize};
use std::ops::Div;

/// The number of minutes in an hour
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Common behaviour for all unit types
pub trait UnitType: Copy + From<f64> {
    /// The raw value of this quantity
    fn value(&self) -> f64;
}

/// Represents a dimensionless quantity (a ratio, factor or count).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
    derive_more::Sum,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

impl UnitType for Dimensionless {
    fn value(&self) -> f64 {
        self.0
    }
}

impl Dimensionless {
    /// Returns the value as a f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether the value is finite
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl float_cmp::ApproxEq for Dimensionless {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        float_cmp::ApproxEq::approx_eq(self.0, other.0, margin)
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::Sum,
            derive_more::Display,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl From<$name> for f64 {
            fn from(val: $name) -> Self {
                val.0
            }
        }

        impl $name {
            /// Returns the value of the unit type as a f64.
            pub fn value(&self) -> f64 {
                self.0
            }

            /// Whether the value is finite
            pub fn is_finite(&self) -> bool {
                self.0.is_finite()
            }
        }

        impl From<f64> for $name {
            fn from(val: f64) -> Self {
                Self(val)
            }
        }

        impl UnitType for $name {
            fn value(&self) -> f64 {
                self.0
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                float_cmp::ApproxEq::approx_eq(self.0, other.0, margin)
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::ops::Div<$name> for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::from(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::from(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::from(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money);
unit_struct!(Quantity);
unit_struct!(Minutes);

// Derived quantities
unit_struct!(MoneyPerQuantity);
unit_struct!(MoneyPerHour);
unit_struct!(MoneyPerMinute);
unit_struct!(MinutesPerQuantity);
unit_struct!(QuantityPerHour);
unit_struct!(QuantityPerMinute);

// Division rules
impl_div!(Money, Quantity, MoneyPerQuantity);
impl_div!(Minutes, Quantity, MinutesPerQuantity);
impl_div!(Dimensionless, QuantityPerMinute, MinutesPerQuantity);

// Multiplication rules
impl_mul!(MoneyPerQuantity, Quantity, Money);
impl_mul!(MinutesPerQuantity, MoneyPerMinute, MoneyPerQuantity);
impl_mul!(Minutes, MoneyPerMinute, Money);

impl MoneyPerHour {
    /// The equivalent cost per minute
    pub fn per_minute(self) -> MoneyPerMinute {
        MoneyPerMinute(self.0 / MINUTES_PER_HOUR)
    }
}

impl QuantityPerHour {
    /// The equivalent throughput per minute
    pub fn per_minute(self) -> QuantityPerMinute {
        QuantityPerMinute(self.0 / MINUTES_PER_HOUR)
    }
}

/// Divide `numerator` by `denominator`, returning zero unless the denominator is strictly
/// positive.
///
/// This is the only way the costing engine divides, so that empty batches, zero throughput or
/// zero prices never produce infinite or NaN values.
pub fn div_or_zero<N, D, O>(numerator: N, denominator: D) -> O
where
    N: Div<D, Output = O>,
    D: UnitType,
    O: UnitType,
{
    if denominator.value() > 0.0 {
        numerator / denominator
    } else {
        O::from(0.0)
    }
}

/// Express a fraction as a percentage
pub fn to_percent(fraction: Dimensionless) -> Dimensionless {
    fraction * Dimensionless(100.0)
}

/// Apply a percentage surcharge (e.g. VAT) to an amount
pub fn add_percent(amount: Money, percent: Dimensionless) -> Money {
    amount * (Dimensionless(1.0) + percent / Dimensionless(100.0))
}
