//! Controller record to rule draft.

use rtc_controls::{
    DeadBand, HydraulicRule, IntervalMode, IntervalRule, IntervalSetting, PidRule, PidSetpoint,
    PidSetting, RelativeTimeRule, RuleDraft, RuleKind, SetpointMode, TimeRule,
};
use rtc_core::{DiagnosticsSink, Extrapolation, Interpolation, LookupTable, TimeSeries};
use rtc_records::{
    ControllerProperties, ControllerRecord, ControllerType, DeadBandType, ExtrapolationKind,
    IntervalType, LookupRow, SetpointType,
};

use crate::error::{ImportError, ImportResult};
use crate::tables::{apply_periodic, lookup_table_from_rows, time_series_from_rows};

/// Arguments of the synthetic flow-direction table.
pub const FLOW_DIRECTION_NEGATIVE: f64 = -9999.0;
pub const FLOW_DIRECTION_ZERO: f64 = 0.0;
pub const FLOW_DIRECTION_POSITIVE: f64 = 9999.0;

/// Build the rule draft for one controller.
pub fn build_rule(
    controller: &ControllerRecord,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<RuleDraft> {
    let kind = match &controller.controller_type {
        ControllerType::Time => RuleKind::Time(time_rule(controller, sink)),
        ControllerType::Hydraulic => RuleKind::Hydraulic(hydraulic_rule(controller, sink)),
        ControllerType::Interval => RuleKind::Interval(interval_rule(controller, sink)?),
        ControllerType::Pid => RuleKind::Pid(pid_rule(controller, sink)?),
        ControllerType::RelativeTime => {
            RuleKind::RelativeTime(relative_time_rule(controller, false, sink))
        }
        ControllerType::RelativeFromValue => {
            RuleKind::RelativeTime(relative_time_rule(controller, true, sink))
        }
        ControllerType::Other(tag) => {
            return Err(ImportError::not_supported("controller type", tag));
        }
    };

    tracing::debug!(controller = %controller.id, kind = kind.type_name(), "rule built");
    Ok(RuleDraft::new(&controller.id, &controller.name, kind))
}

fn extrapolation(kind: ExtrapolationKind) -> Extrapolation {
    match kind {
        ExtrapolationKind::None => Extrapolation::None,
        ExtrapolationKind::Constant | ExtrapolationKind::Periodic => Extrapolation::Constant,
        ExtrapolationKind::Linear => Extrapolation::Linear,
    }
}

/// The controller's time table with its interpolation and (validated) extrapolation.
fn setpoint_series(controller: &ControllerRecord, sink: &mut dyn DiagnosticsSink) -> TimeSeries<f64> {
    let rows = controller.time_table.as_deref().unwrap_or_default();
    let mut series = time_series_from_rows(
        &controller.id,
        rows,
        controller.interpolation,
        extrapolation(controller.extrapolation),
        sink,
    );
    if controller.extrapolation == ExtrapolationKind::Periodic {
        apply_periodic(&controller.id, &mut series, &controller.extrapolation_period, sink);
    }
    series
}

fn lookup_table(controller: &ControllerRecord, sink: &mut dyn DiagnosticsSink) -> LookupTable {
    let rows = controller.lookup_table.as_deref().unwrap_or_default();
    lookup_table_from_rows(&controller.id, rows, controller.interpolation, sink)
}

fn time_rule(controller: &ControllerRecord, sink: &mut dyn DiagnosticsSink) -> TimeRule {
    TimeRule {
        setpoints: setpoint_series(controller, sink),
    }
}

/// Two output states selected by the sign of the measured flow.
fn flow_direction_table(controller: &ControllerRecord, sink: &mut dyn DiagnosticsSink) -> LookupTable {
    let rows = [
        (FLOW_DIRECTION_NEGATIVE, controller.negative_stream),
        (FLOW_DIRECTION_ZERO, controller.positive_stream),
        (FLOW_DIRECTION_POSITIVE, controller.positive_stream),
    ]
    .map(|(argument, value)| LookupRow { argument, value });
    lookup_table_from_rows(&controller.id, &rows, Interpolation::Constant, sink)
}

fn hydraulic_rule(controller: &ControllerRecord, sink: &mut dyn DiagnosticsSink) -> HydraulicRule {
    let time_lag_seconds = match &controller.properties {
        Some(ControllerProperties::Hydraulic { time_lag }) => *time_lag,
        _ => 0,
    };

    let table = if controller.lookup_table.is_some() {
        lookup_table(controller, sink)
    } else if controller.positive_stream != 0.0 || controller.negative_stream != 0.0 {
        flow_direction_table(controller, sink)
    } else {
        LookupTable::new(controller.interpolation, Extrapolation::Constant)
    };

    HydraulicRule {
        table,
        time_lag_seconds,
    }
}

fn interval_rule(
    controller: &ControllerRecord,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<IntervalRule> {
    let Some(ControllerProperties::Interval(props)) = &controller.properties else {
        return Err(ImportError::MissingProperties {
            controller: controller.id.clone(),
            expected: "interval",
        });
    };

    let dead_band = match props.dead_band_type {
        DeadBandType::Fixed => DeadBand::Fixed {
            size: props.dead_band_fixed_size,
        },
        DeadBandType::PercentageDischarge => DeadBand::PercentageDischarge {
            percentage: props.dead_band_percentage,
        },
    };
    let interval = match props.interval_type {
        IntervalType::Fixed => IntervalMode::Fixed {
            step: props.fixed_interval,
        },
        IntervalType::Variable => IntervalMode::Variable,
    };
    let setpoint_mode = match props.setpoint_type {
        SetpointType::Constant => SetpointMode::Constant,
        SetpointType::Series => SetpointMode::Series,
    };

    let mut setpoints = if controller.time_table.is_some() {
        setpoint_series(controller, sink)
    } else {
        TimeSeries::new(controller.interpolation, extrapolation(controller.extrapolation))
    };
    setpoints.default_value = Some(props.constant_setpoint);

    Ok(IntervalRule {
        setting: IntervalSetting {
            min: props.dead_band_min,
            max: props.dead_band_max,
            below: props.setting_below,
            above: props.setting_above,
            max_speed: props.max_speed,
        },
        dead_band,
        interval,
        setpoint_mode,
        setpoints,
    })
}

fn pid_rule(controller: &ControllerRecord, sink: &mut dyn DiagnosticsSink) -> ImportResult<PidRule> {
    let Some(ControllerProperties::Pid(props)) = &controller.properties else {
        return Err(ImportError::MissingProperties {
            controller: controller.id.clone(),
            expected: "PID",
        });
    };

    let setpoint = match props.constant_setpoint.filter(|v| !v.is_nan()) {
        Some(value) => PidSetpoint::Constant { value },
        None if controller.time_table.is_none() => {
            sink.error(
                &controller.id,
                format!("Time table for setpoint of '{}' not set; rule kept with an empty setpoint series", controller.id),
            );
            PidSetpoint::Series {
                series: TimeSeries::new(controller.interpolation, extrapolation(controller.extrapolation)),
            }
        }
        None => PidSetpoint::Series {
            series: setpoint_series(controller, sink),
        },
    };

    sink.warn(
        &controller.id,
        format!(
            "The initial value {} of PID controller '{}' will not be used; the structure's current setting is the initial value",
            props.initial_value, controller.id
        ),
    );

    Ok(PidRule {
        kp: props.kp,
        ki: props.ki,
        kd: props.kd,
        setting: PidSetting {
            min: props.setting_min,
            max: props.setting_max,
            max_speed: props.max_speed,
        },
        setpoint,
    })
}

fn relative_time_rule(
    controller: &ControllerRecord,
    from_value: bool,
    sink: &mut dyn DiagnosticsSink,
) -> RelativeTimeRule {
    RelativeTimeRule {
        table: lookup_table(controller, sink),
        minimum_period_seconds: controller.minimum_period,
        from_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rtc_core::Diagnostics;
    use rtc_records::{
        ControlledParameter, IntervalProperties, LookupRow, PidProperties, TimeValueRow,
    };

    fn t(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn controller(controller_type: ControllerType) -> ControllerRecord {
        ControllerRecord::new("c1", controller_type, ControlledParameter::CrestLevel)
    }

    fn pid_props(constant_setpoint: Option<f64>) -> ControllerProperties {
        ControllerProperties::Pid(PidProperties {
            kp: 1.0,
            ki: 0.1,
            kd: 0.0,
            setting_min: 0.0,
            setting_max: 5.0,
            max_speed: 0.2,
            initial_value: 2.5,
            constant_setpoint,
        })
    }

    #[test]
    fn unknown_controller_type_not_supported() {
        let mut diags = Diagnostics::new();
        let err = build_rule(&controller(ControllerType::Other("Fuzzy".into())), &mut diags)
            .unwrap_err();
        assert_eq!(
            err,
            ImportError::NotSupported {
                what: "controller type",
                tag: "Fuzzy".into()
            }
        );
    }

    #[test]
    fn time_rule_with_valid_period_is_periodic() {
        let mut record = controller(ControllerType::Time);
        record.extrapolation = ExtrapolationKind::Periodic;
        record.extrapolation_period = "'1;00:00:00'".into();
        record.time_table = Some(vec![
            TimeValueRow { time: t(0), value: 1.0 },
            TimeValueRow { time: t(12), value: 2.0 },
        ]);

        let mut diags = Diagnostics::new();
        let draft = build_rule(&record, &mut diags).unwrap();
        let RuleKind::Time(rule) = draft.kind else {
            panic!("expected a time rule");
        };
        assert!(rule.setpoints.extrapolation.is_periodic());
        assert_eq!(rule.setpoints.len(), 2);
        assert!(diags.is_empty());
        assert_eq!(draft.name, "c1");
    }

    #[test]
    fn time_rule_with_short_period_degrades() {
        let mut record = controller(ControllerType::Time);
        record.extrapolation = ExtrapolationKind::Periodic;
        record.extrapolation_period = "3600".into();
        record.time_table = Some(vec![
            TimeValueRow { time: t(0), value: 1.0 },
            TimeValueRow { time: t(12), value: 2.0 },
        ]);

        let mut diags = Diagnostics::new();
        let RuleKind::Time(rule) = build_rule(&record, &mut diags).unwrap().kind else {
            panic!("expected a time rule");
        };
        assert_eq!(rule.setpoints.extrapolation, Extrapolation::None);
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn hydraulic_rule_without_table_uses_flow_direction() {
        let mut record = controller(ControllerType::Hydraulic);
        record.positive_stream = 4.0;
        record.negative_stream = -1.0;
        record.properties = Some(ControllerProperties::Hydraulic { time_lag: 120 });

        let mut diags = Diagnostics::new();
        let RuleKind::Hydraulic(rule) = build_rule(&record, &mut diags).unwrap().kind else {
            panic!("expected a hydraulic rule");
        };
        assert_eq!(
            rule.table.points(),
            &[(-9999.0, -1.0), (0.0, 4.0), (9999.0, 4.0)]
        );
        assert_eq!(rule.table.interpolation, Interpolation::Constant);
        assert_eq!(rule.time_lag_seconds, 120);
    }

    #[test]
    fn hydraulic_rule_duplicate_arguments_warn() {
        let mut record = controller(ControllerType::Hydraulic);
        record.lookup_table = Some(vec![
            LookupRow { argument: 0.0, value: 1.0 },
            LookupRow { argument: 0.0, value: 3.0 },
        ]);

        let mut diags = Diagnostics::new();
        let RuleKind::Hydraulic(rule) = build_rule(&record, &mut diags).unwrap().kind else {
            panic!("expected a hydraulic rule");
        };
        assert_eq!(rule.table.points(), &[(0.0, 1.0)]);
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn interval_rule_modes() {
        let mut record = controller(ControllerType::Interval);
        record.properties = Some(ControllerProperties::Interval(IntervalProperties {
            dead_band_min: 0.1,
            dead_band_max: 0.3,
            setting_below: -0.05,
            setting_above: 0.05,
            max_speed: 0.01,
            dead_band_type: DeadBandType::PercentageDischarge,
            dead_band_fixed_size: 0.0,
            dead_band_percentage: 10.0,
            interval_type: IntervalType::Fixed,
            fixed_interval: 0.02,
            setpoint_type: SetpointType::Constant,
            constant_setpoint: 1.7,
        }));

        let mut diags = Diagnostics::new();
        let RuleKind::Interval(rule) = build_rule(&record, &mut diags).unwrap().kind else {
            panic!("expected an interval rule");
        };
        assert_eq!(rule.dead_band, DeadBand::PercentageDischarge { percentage: 10.0 });
        assert_eq!(rule.interval, IntervalMode::Fixed { step: 0.02 });
        assert_eq!(rule.setpoint_mode, SetpointMode::Constant);
        assert_eq!(rule.setpoints.default_value, Some(1.7));
        assert!(rule.setpoints.is_empty());
    }

    #[test]
    fn interval_rule_without_properties_is_fatal() {
        let mut diags = Diagnostics::new();
        let err = build_rule(&controller(ControllerType::Interval), &mut diags).unwrap_err();
        assert!(matches!(err, ImportError::MissingProperties { expected: "interval", .. }));
    }

    #[test]
    fn pid_constant_setpoint() {
        let mut record = controller(ControllerType::Pid);
        record.properties = Some(pid_props(Some(1.25)));

        let mut diags = Diagnostics::new();
        let RuleKind::Pid(rule) = build_rule(&record, &mut diags).unwrap().kind else {
            panic!("expected a PID rule");
        };
        assert_eq!(rule.setpoint, PidSetpoint::Constant { value: 1.25 });
        assert_eq!(rule.setting.max, 5.0);
        // initial value is always reported as ignored
        assert_eq!(diags.warnings().count(), 1);
        assert_eq!(diags.errors().count(), 0);
    }

    #[test]
    fn pid_series_setpoint_without_table_reports_error() {
        let mut record = controller(ControllerType::Pid);
        record.properties = Some(pid_props(Some(f64::NAN)));

        let mut diags = Diagnostics::new();
        let RuleKind::Pid(rule) = build_rule(&record, &mut diags).unwrap().kind else {
            panic!("expected a PID rule");
        };
        assert!(matches!(rule.setpoint, PidSetpoint::Series { ref series } if series.is_empty()));
        assert_eq!(diags.errors().count(), 1);
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn from_value_rule() {
        let mut record = controller(ControllerType::RelativeFromValue);
        record.minimum_period = 300;
        record.lookup_table = Some(vec![LookupRow { argument: 0.0, value: 0.0 }]);

        let mut diags = Diagnostics::new();
        let RuleKind::RelativeTime(rule) = build_rule(&record, &mut diags).unwrap().kind else {
            panic!("expected a relative time rule");
        };
        assert!(rule.from_value);
        assert_eq!(rule.minimum_period_seconds, 300);
    }
}
