//! Ordered argument/value tables.
//!
//! A [`Table`] keeps its points sorted by argument and never holds two points
//! with the same argument. Two insertion flavours exist:
//! - [`Table::insert_first`]: the first value for an argument wins, later
//!   duplicates are rejected (used when loading legacy tables)
//! - [`Table::upsert`] (time series only): the last write wins (used when
//!   synthesizing windows)
//!
//! Time series (`NaiveDateTime` arguments) additionally support validated
//! periodic extrapolation and step evaluation; lookup tables (`f64` arguments)
//! support constant/linear interpolation.

use core::cmp::Ordering;

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{CoreError, CoreResult};

/// How values between two points are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    None,
    #[default]
    Constant,
    Linear,
}

/// How values outside the first/last argument are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation {
    None,
    #[default]
    Constant,
    Linear,
    /// Repeat the series every `period_seconds`, measured from the first argument.
    Periodic { period_seconds: i64 },
}

impl Extrapolation {
    /// Period of a periodic extrapolation.
    pub fn period(&self) -> Option<TimeDelta> {
        match self {
            Extrapolation::Periodic { period_seconds } => TimeDelta::try_seconds(*period_seconds),
            _ => None,
        }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(self, Extrapolation::Periodic { .. })
    }
}

/// Sorted table of unique arguments mapped to values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table<A, V> {
    points: Vec<(A, V)>,
    pub interpolation: Interpolation,
    pub extrapolation: Extrapolation,
    /// Value used when the table holds no points.
    pub default_value: Option<V>,
}

/// Measured value (or rate) mapped to a setpoint.
pub type LookupTable = Table<f64, f64>;

/// Time-indexed values.
pub type TimeSeries<V> = Table<NaiveDateTime, V>;

impl<A, V> Default for Table<A, V> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            interpolation: Interpolation::default(),
            extrapolation: Extrapolation::default(),
            default_value: None,
        }
    }
}

impl<A, V> Table<A, V> {
    /// Create an empty table.
    pub fn new(interpolation: Interpolation, extrapolation: Extrapolation) -> Self {
        Self {
            points: Vec::new(),
            interpolation,
            extrapolation,
            default_value: None,
        }
    }

    /// Set the value reported while the table is empty.
    pub fn with_default_value(mut self, value: V) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn points(&self) -> &[(A, V)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn arguments(&self) -> impl Iterator<Item = &A> {
        self.points.iter().map(|(a, _)| a)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.points.iter().map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<&(A, V)> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&(A, V)> {
        self.points.last()
    }
}

impl<A: PartialOrd + Copy, V> Table<A, V> {
    /// Binary search for `arg`; `Ok` when present, `Err` with the insertion point otherwise.
    fn locate(&self, arg: A) -> CoreResult<Result<usize, usize>> {
        // NaN-like arguments compare with nothing, not even themselves
        if arg.partial_cmp(&arg).is_none() {
            return Err(CoreError::Unordered {
                what: "table argument",
            });
        }
        Ok(self
            .points
            .binary_search_by(|(a, _)| a.partial_cmp(&arg).unwrap_or(Ordering::Less)))
    }

    /// Insert a point unless the argument is already present.
    ///
    /// Returns `Ok(false)` when the argument existed; the stored value is kept.
    pub fn insert_first(&mut self, arg: A, value: V) -> CoreResult<bool> {
        match self.locate(arg)? {
            Ok(_) => Ok(false),
            Err(pos) => {
                self.points.insert(pos, (arg, value));
                Ok(true)
            }
        }
    }

    /// Value stored exactly at `arg`.
    pub fn get(&self, arg: A) -> Option<&V> {
        match self.locate(arg) {
            Ok(Ok(pos)) => Some(&self.points[pos].1),
            _ => None,
        }
    }

    /// Index of the last point whose argument is `<= arg`.
    fn step_index(&self, arg: A) -> Option<usize> {
        let upper = self.points.partition_point(|(a, _)| *a <= arg);
        upper.checked_sub(1)
    }
}

impl<V> Table<NaiveDateTime, V> {
    /// Distance between the first and the last argument.
    pub fn span(&self) -> TimeDelta {
        match (self.points.first(), self.points.last()) {
            (Some((first, _)), Some((last, _))) => *last - *first,
            _ => TimeDelta::zero(),
        }
    }

    /// Switch to periodic extrapolation.
    ///
    /// The period must be strictly longer than [`Table::span`]; otherwise the
    /// table is left untouched and `PeriodTooShort` is returned.
    pub fn set_periodic(&mut self, period: TimeDelta) -> CoreResult<()> {
        let span = self.span();
        if period <= TimeDelta::zero() || period <= span {
            return Err(CoreError::PeriodTooShort {
                period_seconds: period.num_seconds(),
                span_seconds: span.num_seconds(),
            });
        }
        self.extrapolation = Extrapolation::Periodic {
            period_seconds: period.num_seconds(),
        };
        Ok(())
    }

    /// Insert or overwrite the value at `time`.
    pub fn upsert(&mut self, time: NaiveDateTime, value: V) {
        match self.points.binary_search_by(|(t, _)| t.cmp(&time)) {
            Ok(pos) => self.points[pos].1 = value,
            Err(pos) => self.points.insert(pos, (time, value)),
        }
    }

    /// Step (constant interpolation) value at `time`.
    ///
    /// Returns `None` outside the data when extrapolation is `None`.
    pub fn value_at(&self, time: NaiveDateTime) -> Option<&V> {
        let (first, _) = self.points.first()?;
        let (last, _) = self.points.last()?;

        let time = match self.extrapolation.period() {
            Some(period) if period > TimeDelta::zero() => {
                let in_first_period = first
                    .checked_add_signed(period)
                    .is_some_and(|end| time >= *first && time < end);
                if in_first_period {
                    time
                } else {
                    let offset = (time - *first)
                        .num_milliseconds()
                        .rem_euclid(period.num_milliseconds());
                    first.checked_add_signed(TimeDelta::milliseconds(offset))?
                }
            }
            _ => time,
        };

        if self.extrapolation == Extrapolation::None && (time < *first || time > *last) {
            return None;
        }

        let idx = self.step_index(time).unwrap_or(0);
        self.points.get(idx).map(|(_, v)| v)
    }
}

impl Table<f64, f64> {
    /// Evaluate the lookup table at `x`.
    ///
    /// Outside the data the nearest end value is used unless extrapolation is `None`.
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        let Some(&(x0, y0)) = self.points.first() else {
            return self.default_value;
        };
        let &(xn, yn) = self.points.last()?;

        if x < x0 || x > xn {
            if self.extrapolation == Extrapolation::None {
                return None;
            }
            return Some(if x < x0 { y0 } else { yn });
        }

        let idx = self.step_index(x)?;
        let (xa, ya) = self.points[idx];
        match (self.interpolation, self.points.get(idx + 1)) {
            (Interpolation::Linear, Some(&(xb, yb))) if xb > xa => {
                Some(ya + (yb - ya) * (x - xa) / (xb - xa))
            }
            _ => Some(ya),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn upsert_orders_times_and_last_value_wins() {
        let mut series: TimeSeries<bool> = TimeSeries::default();
        series.upsert(t(6, 0), false);
        series.upsert(t(0, 0), true);
        series.upsert(t(6, 0), true);

        assert_eq!(series.points(), &[(t(0, 0), true), (t(6, 0), true)]);
    }

    #[test]
    fn insert_first_keeps_order_and_first_value() {
        let mut table = LookupTable::default();
        assert!(table.insert_first(2.0, 20.0).unwrap());
        assert!(table.insert_first(1.0, 10.0).unwrap());
        assert!(!table.insert_first(2.0, 99.0).unwrap());

        let args: Vec<f64> = table.arguments().copied().collect();
        assert_eq!(args, vec![1.0, 2.0]);
        assert_eq!(table.get(2.0), Some(&20.0));
    }

    #[test]
    fn nan_argument_rejected() {
        let mut table = LookupTable::default();
        assert!(matches!(
            table.insert_first(f64::NAN, 1.0),
            Err(CoreError::Unordered { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn periodic_requires_period_longer_than_span() {
        let mut series = TimeSeries::<f64>::default();
        series.upsert(t(0, 0), 1.0);
        series.upsert(t(2, 0), 2.0);

        let err = series.set_periodic(TimeDelta::hours(1)).unwrap_err();
        assert_eq!(
            err,
            CoreError::PeriodTooShort {
                period_seconds: 3600,
                span_seconds: 7200
            }
        );
        assert_eq!(series.extrapolation, Extrapolation::Constant);

        // equal to the span is still too short
        assert!(series.set_periodic(TimeDelta::hours(2)).is_err());

        series.set_periodic(TimeDelta::hours(3)).unwrap();
        assert_eq!(series.extrapolation.period(), Some(TimeDelta::hours(3)));
    }

    #[test]
    fn step_value_with_periodic_wrap() {
        let mut series = TimeSeries::<bool>::default();
        series.upsert(t(0, 0), true);
        series.upsert(t(1, 0), false);
        series.set_periodic(TimeDelta::hours(2)).unwrap();

        assert_eq!(series.value_at(t(0, 30)), Some(&true));
        assert_eq!(series.value_at(t(1, 30)), Some(&false));
        // next period
        assert_eq!(series.value_at(t(2, 30)), Some(&true));
        assert_eq!(series.value_at(t(3, 30)), Some(&false));
    }

    #[test]
    fn no_extrapolation_is_undefined_outside_data() {
        let mut series = TimeSeries::<bool>::new(Interpolation::Constant, Extrapolation::None);
        series.upsert(t(1, 0), true);
        series.upsert(t(2, 0), false);
        assert_eq!(series.value_at(t(0, 0)), None);
        assert_eq!(series.value_at(t(1, 30)), Some(&true));
        assert_eq!(series.value_at(t(3, 0)), None);
    }

    #[test]
    fn lookup_interpolation() {
        let mut table = LookupTable::new(Interpolation::Linear, Extrapolation::Constant);
        table.insert_first(0.0, 0.0).unwrap();
        table.insert_first(10.0, 100.0).unwrap();
        assert_eq!(table.interpolate(5.0), Some(50.0));
        assert_eq!(table.interpolate(-1.0), Some(0.0));
        assert_eq!(table.interpolate(11.0), Some(100.0));

        table.interpolation = Interpolation::Constant;
        assert_eq!(table.interpolate(5.0), Some(0.0));
    }

    #[test]
    fn empty_lookup_uses_default_value() {
        let table = LookupTable::default().with_default_value(4.0);
        assert_eq!(table.interpolate(1.0), Some(4.0));
    }
}
