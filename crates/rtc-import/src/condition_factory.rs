//! Trigger record to condition drafts.
//!
//! Every draft of one trigger is named after the trigger id and carries the
//! trigger name as long name. Inputs are not assigned here.

use rtc_controls::{ConditionDraft, ConditionKind, Operation};
use rtc_core::{DiagnosticsSink, Extrapolation, Interpolation, TimeSeries};
use rtc_records::{CheckOn, TriggerRecord, TriggerRow, TriggerType};

use crate::error::{ImportError, ImportResult};
use crate::tables::apply_periodic;

/// Build the chained condition drafts for one trigger.
///
/// An empty result means the trigger contributes nothing; the reason has
/// been reported to `sink`.
pub fn build_conditions(
    trigger: &TriggerRecord,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<Vec<ConditionDraft>> {
    let drafts = match &trigger.trigger_type {
        TriggerType::Time => vec![time_condition(trigger, sink)],
        TriggerType::Hydraulic => hydraulic_conditions(trigger, sink),
        TriggerType::Combined => {
            sink.warn(
                &trigger.id,
                format!(
                    "Combined triggers are not supported; trigger '{}' - '{}' has not been imported",
                    trigger.id, trigger.name
                ),
            );
            Vec::new()
        }
        TriggerType::Other(tag) => return Err(ImportError::not_supported("trigger type", tag)),
    };

    tracing::debug!(trigger = %trigger.id, conditions = drafts.len(), "conditions built");
    Ok(drafts)
}

fn step_series() -> TimeSeries<bool> {
    TimeSeries::new(Interpolation::Constant, Extrapolation::Constant)
}

fn time_condition(trigger: &TriggerRecord, sink: &mut dyn DiagnosticsSink) -> ConditionDraft {
    let mut series = step_series();
    for row in &trigger.rows {
        series.upsert(row.time, row.on);
    }
    if !trigger.periodic_extrapolation_period.trim().is_empty() {
        apply_periodic(&trigger.id, &mut series, &trigger.periodic_extrapolation_period, sink);
    }
    ConditionDraft::new(&trigger.id, &trigger.name, ConditionKind::Time { series })
}

fn hydraulic_condition(trigger: &TriggerRecord, row: &TriggerRow) -> ConditionDraft {
    let operation = Operation::from_greater_bit(row.greater);
    match trigger.check_on {
        CheckOn::Direction => {
            ConditionDraft::new(&trigger.id, &trigger.name, ConditionKind::Directional { operation })
        }
        CheckOn::Value => {
            ConditionDraft::new(&trigger.id, &trigger.name, ConditionKind::Standard { operation })
                .with_threshold(row.value)
        }
    }
}

/// Step series that is true from `rows[index]` until the next row.
///
/// Times before the window are false. When the window ends before the last
/// row, the series returns to its value at the first row from there on.
fn window_series(rows: &[TriggerRow], index: usize) -> TimeSeries<bool> {
    let start = rows[0].time;
    let end = rows[rows.len() - 1].time;
    let row = &rows[index];

    let mut series = step_series();
    if row.time != start {
        series.upsert(start, false);
    }
    series.upsert(row.time, true);
    if let Some(next) = rows.get(index + 1) {
        series.upsert(next.time, false);
    }
    if let Some(&(last, _)) = series.last() {
        if end > last {
            let at_start = series.get(start).copied().unwrap_or(false);
            series.upsert(end, at_start);
        }
    }
    series
}

fn hydraulic_conditions(trigger: &TriggerRecord, sink: &mut dyn DiagnosticsSink) -> Vec<ConditionDraft> {
    match trigger.rows.as_slice() {
        [] => {
            sink.warn(
                &trigger.id,
                format!("Hydraulic trigger '{}' has no rows and has not been imported", trigger.id),
            );
            Vec::new()
        }
        [row] => vec![hydraulic_condition(trigger, row)],
        rows => {
            let periodic = !trigger.periodic_extrapolation_period.trim().is_empty();
            let mut drafts = Vec::with_capacity(rows.len() * 2);
            for index in 0..rows.len() {
                let mut series = window_series(rows, index);
                if periodic {
                    apply_periodic(&trigger.id, &mut series, &trigger.periodic_extrapolation_period, sink);
                }

                // time condition at 2i, its hydraulic condition at 2i + 1
                let mut window =
                    ConditionDraft::new(&trigger.id, &trigger.name, ConditionKind::Time { series });
                window.true_next = Some(drafts.len() + 1);
                if index + 1 < rows.len() {
                    window.false_next = Some(drafts.len() + 2);
                }
                drafts.push(window);
                drafts.push(hydraulic_condition(trigger, &rows[index]));
            }
            drafts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use rtc_core::Diagnostics;

    fn t(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn row(h: u32, greater: bool, value: f64) -> TriggerRow {
        TriggerRow {
            time: t(h),
            on: false,
            greater,
            value,
        }
    }

    fn hydraulic(rows: Vec<TriggerRow>) -> TriggerRecord {
        let mut trigger = TriggerRecord::new("t1", TriggerType::Hydraulic);
        trigger.name = "High water".into();
        trigger.rows = rows;
        trigger
    }

    fn steps(draft: &ConditionDraft) -> Vec<(NaiveDateTime, bool)> {
        match &draft.kind {
            ConditionKind::Time { series } => series.points().to_vec(),
            other => panic!("expected a time condition, got {other:?}"),
        }
    }

    #[test]
    fn time_trigger_single_condition() {
        let mut trigger = TriggerRecord::new("t1", TriggerType::Time);
        trigger.rows = vec![
            TriggerRow { time: t(0), on: true, greater: false, value: 0.0 },
            TriggerRow { time: t(6), on: false, greater: false, value: 0.0 },
        ];
        trigger.periodic_extrapolation_period = "'0;12:00:00'".into();

        let mut diags = Diagnostics::new();
        let drafts = build_conditions(&trigger, &mut diags).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(steps(&drafts[0]), vec![(t(0), true), (t(6), false)]);
        let ConditionKind::Time { series } = &drafts[0].kind else { unreachable!() };
        assert_eq!(series.extrapolation.period(), Some(TimeDelta::hours(12)));
        assert!(diags.is_empty());
    }

    #[test]
    fn single_row_hydraulic_is_one_condition() {
        let mut diags = Diagnostics::new();
        let drafts = build_conditions(&hydraulic(vec![row(0, true, 2.5)]), &mut diags).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(
            drafts[0].kind,
            ConditionKind::Standard { operation: Operation::Greater }
        );
        assert_eq!(drafts[0].threshold, 2.5);
        assert_eq!(drafts[0].long_name, "High water");
    }

    #[test]
    fn direction_check_yields_directional_condition() {
        let mut trigger = hydraulic(vec![row(0, false, 1.0)]);
        trigger.check_on = CheckOn::Direction;
        let mut diags = Diagnostics::new();
        let drafts = build_conditions(&trigger, &mut diags).unwrap();
        assert_eq!(
            drafts[0].kind,
            ConditionKind::Directional { operation: Operation::Less }
        );
    }

    #[test]
    fn multi_row_hydraulic_windows() {
        // non-contiguous windows at t0, t1, t2
        let mut trigger = hydraulic(vec![row(0, true, 1.0), row(1, false, 2.0), row(2, true, 3.0)]);
        trigger.periodic_extrapolation_period = "10800".into();

        let mut diags = Diagnostics::new();
        let drafts = build_conditions(&trigger, &mut diags).unwrap();
        assert_eq!(drafts.len(), 6);

        assert_eq!(steps(&drafts[0]), vec![(t(0), true), (t(1), false), (t(2), true)]);
        assert_eq!(steps(&drafts[2]), vec![(t(0), false), (t(1), true), (t(2), false)]);
        assert_eq!(steps(&drafts[4]), vec![(t(0), false), (t(2), true)]);

        for pair in 0..3 {
            let window = &drafts[2 * pair];
            assert_eq!(window.true_next, Some(2 * pair + 1));
            let ConditionKind::Time { series } = &window.kind else { unreachable!() };
            assert!(series.extrapolation.is_periodic());
        }
        assert_eq!(drafts[0].false_next, Some(2));
        assert_eq!(drafts[2].false_next, Some(4));
        assert_eq!(drafts[4].false_next, None);

        assert_eq!(drafts[3].threshold, 2.0);
        assert_eq!(drafts[3].kind, ConditionKind::Standard { operation: Operation::Less });
        assert!(diags.is_empty());
    }

    #[test]
    fn short_period_degrades_every_window() {
        let mut trigger = hydraulic(vec![row(0, true, 1.0), row(4, true, 2.0)]);
        trigger.periodic_extrapolation_period = "3600".into();

        let mut diags = Diagnostics::new();
        let drafts = build_conditions(&trigger, &mut diags).unwrap();
        for window in [&drafts[0], &drafts[2]] {
            let ConditionKind::Time { series } = &window.kind else { unreachable!() };
            assert_eq!(series.extrapolation, Extrapolation::None);
        }
        assert_eq!(diags.warnings().count(), 2);
    }

    #[test]
    fn empty_hydraulic_and_combined_are_skipped() {
        let mut diags = Diagnostics::new();
        assert!(build_conditions(&hydraulic(vec![]), &mut diags).unwrap().is_empty());

        let mut combined = TriggerRecord::new("t9", TriggerType::Combined);
        combined.name = "Mixed".into();
        assert!(build_conditions(&combined, &mut diags).unwrap().is_empty());

        assert_eq!(diags.warnings().count(), 2);
        assert_eq!(diags.count_for("t9"), 1);
    }

    #[test]
    fn unknown_trigger_type_not_supported() {
        let mut diags = Diagnostics::new();
        let err = build_conditions(&TriggerRecord::new("t1", TriggerType::Other("Tidal".into())), &mut diags)
            .unwrap_err();
        assert_eq!(
            err,
            ImportError::NotSupported { what: "trigger type", tag: "Tidal".into() }
        );
    }
}
