//! Control group validation.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rtc_controls::{Condition, EdgeTarget, Input, Output, Rule};

use crate::error::{GraphError, GraphResult};
use crate::graph::GroupNode;

/// Check that every edge, input and output reference points at an existing entity.
pub(crate) fn validate_references(
    rules: &[Rule],
    conditions: &[Condition],
    inputs: &[Input],
    outputs: &[Output],
) -> GraphResult<()> {
    for condition in conditions {
        for target in [condition.true_output.target(), condition.false_output.target()]
            .into_iter()
            .flatten()
        {
            let exists = match target {
                EdgeTarget::Condition(id) => (id.index() as usize) < conditions.len(),
                EdgeTarget::Rule(id) => (id.index() as usize) < rules.len(),
            };
            if !exists {
                return Err(GraphError::DanglingEdge {
                    condition: condition.name.clone(),
                    target,
                });
            }
        }

        if let Some(input) = condition.input {
            if input.index() as usize >= inputs.len() {
                return Err(GraphError::InvalidInputRef {
                    owner: condition.name.clone(),
                    input,
                });
            }
        }
    }

    for rule in rules {
        if rule.output.index() as usize >= outputs.len() {
            return Err(GraphError::InvalidOutputRef {
                rule: rule.name.clone(),
                output: rule.output,
            });
        }
        if let Some(input) = rule.input {
            if input.index() as usize >= inputs.len() {
                return Err(GraphError::InvalidInputRef {
                    owner: rule.name.clone(),
                    input,
                });
            }
        }
    }

    Ok(())
}

/// Build the decision graph (conditions first, then rules) and reject cycles.
///
/// Edge weights are the branch taken: `true` or `false`.
pub(crate) fn decision_graph(
    rules: &[Rule],
    conditions: &[Condition],
) -> GraphResult<DiGraph<GroupNode, bool>> {
    let mut graph = DiGraph::with_capacity(conditions.len() + rules.len(), conditions.len() * 2);
    for index in 0..conditions.len() {
        graph.add_node(GroupNode::Condition(rtc_core::Id::from_index(index as u32)));
    }
    for index in 0..rules.len() {
        graph.add_node(GroupNode::Rule(rtc_core::Id::from_index(index as u32)));
    }

    let node_of = |target: EdgeTarget| match target {
        EdgeTarget::Condition(id) => NodeIndex::new(id.index() as usize),
        EdgeTarget::Rule(id) => NodeIndex::new(conditions.len() + id.index() as usize),
    };

    for (index, condition) in conditions.iter().enumerate() {
        let from = NodeIndex::new(index);
        if let Some(target) = condition.true_output.target() {
            graph.add_edge(from, node_of(target), true);
        }
        if let Some(target) = condition.false_output.target() {
            graph.add_edge(from, node_of(target), false);
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        let name = conditions
            .get(cycle.node_id().index())
            .map(|c| c.name.clone())
            .unwrap_or_default();
        return Err(GraphError::Cycle { condition: name });
    }

    Ok(graph)
}
