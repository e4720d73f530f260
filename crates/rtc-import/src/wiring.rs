//! Wiring of a rule's triggers into AND/OR condition chains.
//!
//! Triggers are processed in order. A trigger with `and` set extends the
//! current clause: every condition so far with an open true edge is routed
//! to its first condition. A trigger with `and` cleared closes the clause by
//! routing its open true edges to the rule; the next trigger then starts an
//! alternative reached through the open false edges of everything before it.
//! Edges are only ever set once.

use rtc_controls::{ConditionDraft, EdgeTarget};
use rtc_core::{ConditionId, DiagnosticsSink, RuleId};
use rtc_graph::ControlGroupBuilder;
use rtc_records::{ControllerRecord, DataItemResolver, StructureMapping, TriggerRecord};

use crate::condition_factory::build_conditions;
use crate::error::ImportResult;
use crate::inputs::{ZERO_THRESHOLD_PARAMETER, resolve_trigger_input};

/// Conditions of one trigger, ready to be added to a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub drafts: Vec<ConditionDraft>,
    /// Whether the trigger keeps the clause open for the next one.
    pub and: bool,
}

/// What wiring produced for one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Wiring {
    pub rule: RuleId,
    pub conditions: Vec<ConditionId>,
    /// First guarding condition, or the rule itself when unguarded.
    pub entry: EdgeTarget,
}

/// Turn a controller's trigger references into clauses.
///
/// Inactive references and triggers without conditions are skipped, unknown
/// trigger ids are reported. Non-time conditions get the trigger's input.
pub fn trigger_clauses<'a>(
    builder: &mut ControlGroupBuilder,
    controller: &ControllerRecord,
    structure: &StructureMapping,
    lookup: impl Fn(&str) -> Option<&'a TriggerRecord>,
    resolver: &dyn DataItemResolver,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<Vec<Clause>> {
    let mut clauses = Vec::with_capacity(controller.triggers.len());

    for reference in &controller.triggers {
        if !reference.active {
            tracing::debug!(controller = %controller.id, trigger = %reference.id, "inactive trigger skipped");
            continue;
        }
        let Some(trigger) = lookup(&reference.id) else {
            sink.error(
                &reference.id,
                format!(
                    "Trigger '{}' of controller '{}' has not been found",
                    reference.id, controller.id
                ),
            );
            continue;
        };

        let mut drafts = build_conditions(trigger, sink)?;
        if drafts.is_empty() {
            continue;
        }

        if drafts.iter().any(|d| !d.kind.is_time()) {
            if let Some(item) = resolve_trigger_input(trigger, structure, resolver, sink)? {
                let zero_threshold = item.parameter_name == ZERO_THRESHOLD_PARAMETER;
                let input = builder.ensure_input(item);
                for draft in drafts.iter_mut().filter(|d| !d.kind.is_time()) {
                    draft.input = Some(input);
                    if zero_threshold {
                        draft.threshold = 0.0;
                    }
                }
            }
        }

        clauses.push(Clause {
            drafts,
            and: reference.and,
        });
    }

    Ok(clauses)
}

/// Add the clauses' conditions to the group and wire them to `rule`.
pub fn wire_rule(
    builder: &mut ControlGroupBuilder,
    rule: RuleId,
    clauses: Vec<Clause>,
) -> ImportResult<Wiring> {
    let to_rule = EdgeTarget::Rule(rule);
    let mut conditions = Vec::new();
    let mut frontier: Vec<ConditionId> = Vec::new();
    let mut open_clause: Vec<ConditionId> = Vec::new();
    let mut new_branch = false;

    for clause in clauses {
        let ids = builder.add_conditions(clause.drafts)?;
        let Some(&first) = ids.first() else {
            continue;
        };
        let to_first = EdgeTarget::Condition(first);

        if new_branch {
            for &id in &frontier {
                builder.connect_false(id, to_first)?;
            }
            frontier.clear();
            new_branch = false;
        } else {
            for &id in &frontier {
                builder.connect_true(id, to_first)?;
            }
        }
        frontier.extend_from_slice(&ids);

        if clause.and {
            open_clause = ids.clone();
        } else {
            for &id in &ids {
                builder.connect_true(id, to_rule)?;
            }
            open_clause.clear();
            new_branch = true;
        }
        conditions.extend(ids);
    }

    for id in open_clause {
        builder.connect_true(id, to_rule)?;
    }

    let entry = conditions
        .first()
        .map_or(to_rule, |&id| EdgeTarget::Condition(id));
    tracing::debug!(rule = %rule, conditions = conditions.len(), "rule wired");

    Ok(Wiring {
        rule,
        conditions,
        entry,
    })
}
