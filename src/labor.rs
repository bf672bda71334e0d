//! The labor time model shared by every production stage.
//!
//! Batch mixing, forming and packing all cost labor the same way: some fixed setup time per batch
//! which is amortised over the batch, plus variable time which depends on throughput. The only
//! difference between stages is the output unit (kilograms of mix for forming, packages for
//! packing), which the model does not need to know about.
use crate::units::{
    Dimensionless, Minutes, MinutesPerQuantity, Money, MoneyPerHour, MoneyPerMinute,
    MoneyPerQuantity, Quantity, QuantityPerHour, div_or_zero,
};
use serde::{Deserialize, Serialize};

/// Default throughput when none is given, in output units per hour
const DEFAULT_THROUGHPUT: QuantityPerHour = QuantityPerHour(60.0);

/// Default number of operators working a stage
const DEFAULT_OPERATORS: Dimensionless = Dimensionless(1.0);

/// Default batch size, in output units
const DEFAULT_BATCH_SIZE: Quantity = Quantity(1.0);

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}
define_param_default!(default_low_margin_pct, Dimensionless, Dimensionless(20.0));
define_param_default!(default_critical_margin_pct, Dimensionless, Dimensionless(15.0));

/// Settings which apply to the whole catalog.
///
/// This is stored in `catalog.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// The cost of one hour of operator labor
    pub labor_cost_per_hour: MoneyPerHour,
    /// Products with a margin (%) below this are counted as low margin
    #[serde(default = "default_low_margin_pct")]
    pub low_margin_pct: Dimensionless,
    /// Products with a margin (%) below this raise a critical alert
    #[serde(default = "default_critical_margin_pct")]
    pub critical_margin_pct: Dimensionless,
}

impl GlobalSettings {
    /// Create settings with the given labor rate and default margin thresholds
    pub fn new(labor_cost_per_hour: MoneyPerHour) -> Self {
        Self {
            labor_cost_per_hour,
            low_margin_pct: default_low_margin_pct(),
            critical_margin_pct: default_critical_margin_pct(),
        }
    }

    /// The cost of one minute of operator labor
    pub fn labor_cost_per_minute(&self) -> MoneyPerMinute {
        self.labor_cost_per_hour.per_minute()
    }
}

/// The parameters for a labor stage as provided by the user.
///
/// Any of these may be missing, in which case defaults are used (see
/// [`LaborStageParameters::resolve`]).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LaborStageParameters {
    /// Output units produced per hour at steady state
    pub throughput: Option<QuantityPerHour>,
    /// Number of operators required at the same time
    pub operators: Option<Dimensionless>,
    /// Setup minutes needed once per batch
    pub fixed_minutes: Option<Minutes>,
    /// Output units in one batch
    pub batch_size: Option<Quantity>,
}

impl LaborStageParameters {
    /// Fill in defaults for any missing parameters
    pub fn resolve(&self) -> LaborStage {
        LaborStage {
            throughput: self.throughput.unwrap_or(DEFAULT_THROUGHPUT),
            operators: self.operators.unwrap_or(DEFAULT_OPERATORS),
            fixed_minutes: self.fixed_minutes.unwrap_or(Minutes(0.0)),
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }
}

/// A labor stage with all parameters known
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaborStage {
    /// Output units produced per hour at steady state
    pub throughput: QuantityPerHour,
    /// Number of operators required at the same time
    pub operators: Dimensionless,
    /// Setup minutes needed once per batch
    pub fixed_minutes: Minutes,
    /// Output units in one batch
    pub batch_size: Quantity,
}

impl LaborStage {
    /// Operator minutes needed to produce one output unit at steady-state throughput.
    ///
    /// Zero if throughput is zero.
    pub fn variable_minutes_per_unit(&self) -> MinutesPerQuantity {
        let minutes_per_unit: MinutesPerQuantity =
            div_or_zero(Dimensionless(1.0), self.throughput.per_minute());
        minutes_per_unit * self.operators
    }

    /// Setup operator minutes amortised over every unit in a batch.
    ///
    /// Zero if batch size is zero.
    pub fn fixed_minutes_per_unit(&self) -> MinutesPerQuantity {
        div_or_zero(man_minutes(self.fixed_minutes, self.operators), self.batch_size)
    }

    /// Total operator minutes per output unit
    pub fn minutes_per_unit(&self) -> MinutesPerQuantity {
        self.variable_minutes_per_unit() + self.fixed_minutes_per_unit()
    }

    /// Labor cost per output unit
    pub fn cost_per_unit(&self, cost_per_minute: MoneyPerMinute) -> MoneyPerQuantity {
        self.minutes_per_unit() * cost_per_minute
    }
}

/// Operator minutes for a task taking `minutes` with `operators` working concurrently
pub fn man_minutes(minutes: Minutes, operators: Dimensionless) -> Minutes {
    minutes * operators
}

/// Labor cost of a task taking `minutes` with `operators` working concurrently
pub fn labor_cost(
    minutes: Minutes,
    operators: Dimensionless,
    settings: &GlobalSettings,
) -> Money {
    man_minutes(minutes, operators) * settings.labor_cost_per_minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn labor_stage(
        throughput: f64,
        operators: f64,
        fixed_minutes: f64,
        batch_size: f64,
    ) -> LaborStage {
        LaborStage {
            throughput: QuantityPerHour(throughput),
            operators: Dimensionless(operators),
            fixed_minutes: Minutes(fixed_minutes),
            batch_size: Quantity(batch_size),
        }
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(
            LaborStageParameters::default().resolve(),
            labor_stage(60.0, 1.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_resolve_keeps_explicit_zero() {
        let params = LaborStageParameters {
            throughput: Some(QuantityPerHour(0.0)),
            operators: Some(Dimensionless(2.0)),
            fixed_minutes: Some(Minutes(15.0)),
            batch_size: Some(Quantity(0.0)),
        };
        assert_eq!(params.resolve(), labor_stage(0.0, 2.0, 15.0, 0.0));
    }

    #[rstest]
    #[case(labor_stage(60.0, 2.0, 15.0, 60.0), 2.0, 0.5)] // Forming: 60 kg/h, 2 operators
    #[case(labor_stage(120.0, 1.0, 10.0, 120.0), 0.5, 1.0 / 12.0)] // Packing: 120 packages/h
    #[case(labor_stage(0.0, 1.0, 10.0, 20.0), 0.0, 0.5)] // Zero throughput
    #[case(labor_stage(60.0, 1.0, 10.0, 0.0), 1.0, 0.0)] // Zero batch size
    fn test_minutes_per_unit(
        #[case] stage: LaborStage,
        #[case] variable: f64,
        #[case] fixed: f64,
    ) {
        assert_approx_eq!(
            MinutesPerQuantity,
            stage.variable_minutes_per_unit(),
            MinutesPerQuantity(variable),
            epsilon = 1e-12
        );
        assert_approx_eq!(
            MinutesPerQuantity,
            stage.fixed_minutes_per_unit(),
            MinutesPerQuantity(fixed),
            epsilon = 1e-12
        );
        assert_approx_eq!(
            MinutesPerQuantity,
            stage.minutes_per_unit(),
            MinutesPerQuantity(variable + fixed),
            epsilon = 1e-12
        );
        assert!(stage.minutes_per_unit().is_finite());
    }

    #[test]
    fn test_fixed_minutes_amortised_over_batch() {
        let small = labor_stage(60.0, 2.0, 15.0, 50.0);
        let large = LaborStage {
            batch_size: Quantity(100.0),
            ..small
        };
        assert!(large.fixed_minutes_per_unit() < small.fixed_minutes_per_unit());
        assert_approx_eq!(
            MinutesPerQuantity,
            large.fixed_minutes_per_unit(),
            small.fixed_minutes_per_unit() / Dimensionless(2.0)
        );
    }

    #[test]
    fn test_halving_throughput_doubles_variable_minutes() {
        let fast = labor_stage(120.0, 1.5, 0.0, 1.0);
        let slow = LaborStage {
            throughput: QuantityPerHour(60.0),
            ..fast
        };
        assert_approx_eq!(
            MinutesPerQuantity,
            slow.variable_minutes_per_unit(),
            fast.variable_minutes_per_unit() * Dimensionless(2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cost_per_unit() {
        let settings = GlobalSettings::new(MoneyPerHour(6000.0));
        let forming = labor_stage(60.0, 2.0, 15.0, 60.0);
        // (2 + 0.5) minutes at 100 per minute
        assert_approx_eq!(
            MoneyPerQuantity,
            forming.cost_per_unit(settings.labor_cost_per_minute()),
            MoneyPerQuantity(250.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_labor_cost() {
        let settings = GlobalSettings::new(MoneyPerHour(5000.0));
        assert_approx_eq!(
            Money,
            labor_cost(Minutes(15.0), Dimensionless(1.0), &settings),
            Money(1250.0),
            epsilon = 1e-9
        );
    }
}
