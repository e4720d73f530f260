//! Sharing one output between consecutive rules.

use rtc_graph::{ControlGroupBuilder, GraphError};

use crate::error::ImportResult;
use crate::wiring::Wiring;

/// Route every open edge of `previous` to the entry of `next`.
///
/// Used when `next` writes the same output as `previous`, so the later rule
/// is only evaluated where the earlier one is not reached. Returns the
/// number of edges connected.
pub fn merge_into(
    builder: &mut ControlGroupBuilder,
    previous: &Wiring,
    next: &Wiring,
) -> ImportResult<usize> {
    let mut connected = 0;
    for &id in &previous.conditions {
        let condition = builder
            .condition(id)
            .ok_or(GraphError::ConditionNotFound { id })?;
        if !condition.has_open_edge() {
            continue;
        }
        if builder.connect_true(id, next.entry)? {
            connected += 1;
        }
        if builder.connect_false(id, next.entry)? {
            connected += 1;
        }
    }
    tracing::debug!(
        previous = %previous.rule,
        next = %next.rule,
        connected,
        "rules merged on shared output"
    );
    Ok(connected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiring::{Clause, wire_rule};
    use rtc_controls::{
        ConditionDraft, ConditionKind, DataItem, EdgeTarget, ElementSet, Operation, QuantityType,
        RuleDraft, RuleKind, TimeRule,
    };
    use rtc_core::TimeSeries;

    fn time_rule(name: &str) -> RuleDraft {
        RuleDraft::new(
            name,
            name,
            RuleKind::Time(TimeRule {
                setpoints: TimeSeries::default(),
            }),
        )
    }

    #[test]
    fn open_edges_lead_to_next_entry() {
        let mut builder = ControlGroupBuilder::new("s1");
        let output = builder.ensure_output(DataItem::new(
            "s1",
            "Crest level",
            QuantityType::CrestLevel,
            ElementSet::Structures,
        ));

        let first = builder.add_rule(time_rule("c1"), output);
        let clause = Clause {
            drafts: vec![ConditionDraft::new(
                "t1",
                "t1",
                ConditionKind::Standard { operation: Operation::Greater },
            )],
            and: true,
        };
        let previous = wire_rule(&mut builder, first, vec![clause]).unwrap();

        let second = builder.add_rule(time_rule("c2"), output);
        let next = wire_rule(&mut builder, second, Vec::new()).unwrap();

        assert_eq!(merge_into(&mut builder, &previous, &next).unwrap(), 1);
        let condition = builder.condition(previous.conditions[0]).unwrap();
        assert_eq!(condition.true_output.target(), Some(EdgeTarget::Rule(first)));
        assert_eq!(condition.false_output.target(), Some(EdgeTarget::Rule(second)));

        // nothing left open the second time
        assert_eq!(merge_into(&mut builder, &previous, &next).unwrap(), 0);
    }
}
