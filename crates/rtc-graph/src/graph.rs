//! Validated control group and decision-graph queries.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef, Reversed};
use rtc_controls::{Condition, EdgeTarget, Input, Output, Rule};
use rtc_core::{ConditionId, InputId, OutputId, RuleId};
use serde::Serialize;

/// Node of the decision graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupNode {
    Condition(ConditionId),
    Rule(RuleId),
}

/// One condition on a path together with the branch taken out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub condition: ConditionId,
    pub outcome: bool,
}

/// One structure's rules, conditions, inputs and outputs.
///
/// All references are known to be valid and the condition graph is acyclic.
#[derive(Debug, Clone, Serialize)]
pub struct ControlGroup {
    pub(crate) name: String,
    pub(crate) rules: Vec<Rule>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) inputs: Vec<Input>,
    pub(crate) outputs: Vec<Output>,

    /// Conditions occupy nodes `0..conditions.len()`, rules follow.
    #[serde(skip)]
    pub(crate) graph: DiGraph<GroupNode, bool>,
}

impl ControlGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.index() as usize)
    }

    pub fn condition(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.get(id.index() as usize)
    }

    pub fn input(&self, id: InputId) -> Option<&Input> {
        self.inputs.get(id.index() as usize)
    }

    pub fn output(&self, id: OutputId) -> Option<&Output> {
        self.outputs.get(id.index() as usize)
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.rules
            .iter()
            .position(|r| r.name == name)
            .map(|i| rtc_core::Id::from_index(i as u32))
    }

    pub fn condition_id(&self, name: &str) -> Option<ConditionId> {
        self.conditions
            .iter()
            .position(|c| c.name == name)
            .map(|i| rtc_core::Id::from_index(i as u32))
    }

    /// Rules writing to `output`, in insertion order.
    pub fn rules_for_output(&self, output: OutputId) -> Vec<RuleId> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.output == output)
            .map(|(i, _)| rtc_core::Id::from_index(i as u32))
            .collect()
    }

    fn node(&self, node: GroupNode) -> NodeIndex {
        match node {
            GroupNode::Condition(id) => NodeIndex::new(id.index() as usize),
            GroupNode::Rule(id) => NodeIndex::new(self.conditions.len() + id.index() as usize),
        }
    }

    /// Conditions no other condition leads to.
    pub fn entry_conditions(&self) -> Vec<ConditionId> {
        (0..self.conditions.len())
            .filter(|&i| {
                self.graph
                    .neighbors_directed(NodeIndex::new(i), Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|i| rtc_core::Id::from_index(i as u32))
            .collect()
    }

    /// Every condition from which the rule can be reached, sorted by id.
    pub fn guarding_conditions(&self, rule: RuleId) -> Vec<ConditionId> {
        if self.rule(rule).is_none() {
            return Vec::new();
        }
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, self.node(GroupNode::Rule(rule)));
        let mut found = Vec::new();
        while let Some(node) = dfs.next(reversed) {
            if let GroupNode::Condition(id) = self.graph[node] {
                found.push(id);
            }
        }
        found.sort();
        found
    }

    /// All paths from an entry condition to the rule.
    pub fn paths_to_rule(&self, rule: RuleId) -> Vec<Vec<PathStep>> {
        if self.rule(rule).is_none() {
            return Vec::new();
        }
        let goal = self.node(GroupNode::Rule(rule));
        let mut paths = Vec::new();
        for entry in self.entry_conditions() {
            let mut current = Vec::new();
            self.collect_paths(self.node(GroupNode::Condition(entry)), goal, &mut current, &mut paths);
        }
        paths
    }

    fn collect_paths(
        &self,
        from: NodeIndex,
        goal: NodeIndex,
        current: &mut Vec<PathStep>,
        paths: &mut Vec<Vec<PathStep>>,
    ) {
        let GroupNode::Condition(condition) = self.graph[from] else {
            return;
        };
        for edge in self.graph.edges(from) {
            current.push(PathStep {
                condition,
                outcome: *edge.weight(),
            });
            if edge.target() == goal {
                paths.push(current.clone());
            } else {
                self.collect_paths(edge.target(), goal, current, paths);
            }
            current.pop();
        }
    }

    /// Walk the decision graph from `start`, taking the branch chosen by `decide`.
    ///
    /// Returns the rule reached, or `None` when an open edge is hit.
    pub fn follow(
        &self,
        start: ConditionId,
        mut decide: impl FnMut(ConditionId, &Condition) -> bool,
    ) -> Option<RuleId> {
        let mut id = start;
        // acyclic, so at most one visit per condition
        for _ in 0..=self.conditions.len() {
            let condition = self.condition(id)?;
            let edge = if decide(id, condition) {
                condition.true_output
            } else {
                condition.false_output
            };
            match edge.target()? {
                EdgeTarget::Rule(rule) => return Some(rule),
                EdgeTarget::Condition(next) => id = next,
            }
        }
        None
    }
}
