//! Incremental control group builder.

use std::collections::HashMap;

use rtc_controls::{
    Condition, ConditionDraft, DataItem, EdgeTarget, Input, Output, Rule, RuleDraft,
};
use rtc_core::{ConditionId, InputId, OutputId, RuleId};

use crate::error::{GraphError, GraphResult};
use crate::graph::ControlGroup;
use crate::naming::{unique_condition_name, unique_rule_name};
use crate::validate;

type PlaceholderKey = (String, String);

/// Builder for one structure's control group.
///
/// Entities are appended during one import pass and never removed. Call
/// `build()` to validate and freeze the group into an immutable `ControlGroup`.
#[derive(Debug)]
pub struct ControlGroupBuilder {
    name: String,
    rules: Vec<Rule>,
    conditions: Vec<Condition>,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    input_index: HashMap<PlaceholderKey, InputId>,
    output_index: HashMap<PlaceholderKey, OutputId>,
}

fn placeholder_key(item: &DataItem) -> PlaceholderKey {
    let (feature, parameter) = item.key();
    (feature.to_string(), parameter.to_string())
}

fn next_id(len: usize) -> rtc_core::Id {
    rtc_core::Id::from_index(u32::try_from(len).unwrap_or(u32::MAX))
}

impl ControlGroupBuilder {
    /// Create an empty group for a structure.
    pub fn new(structure_id: &str) -> Self {
        Self {
            name: format!("Control group of {structure_id}"),
            rules: Vec::new(),
            conditions: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            input_index: HashMap::new(),
            output_index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input linked to `item`, created on first use.
    pub fn ensure_input(&mut self, item: DataItem) -> InputId {
        let key = placeholder_key(&item);
        if let Some(&id) = self.input_index.get(&key) {
            return id;
        }
        let id = next_id(self.inputs.len());
        self.inputs.push(Input::new(item));
        self.input_index.insert(key, id);
        id
    }

    /// Output already linked to `item`, if any.
    pub fn find_output(&self, item: &DataItem) -> Option<OutputId> {
        self.output_index.get(&placeholder_key(item)).copied()
    }

    /// Output linked to `item`, created on first use.
    pub fn ensure_output(&mut self, item: DataItem) -> OutputId {
        let key = placeholder_key(&item);
        if let Some(&id) = self.output_index.get(&key) {
            return id;
        }
        let id = next_id(self.outputs.len());
        self.outputs.push(Output::new(item));
        self.output_index.insert(key, id);
        id
    }

    /// Add a rule writing to `output`; the draft's name is made unique.
    pub fn add_rule(&mut self, mut draft: RuleDraft, output: OutputId) -> RuleId {
        draft.name = unique_rule_name(self.rules.iter().map(|r| r.name.as_str()), &draft.name);
        let id = next_id(self.rules.len());
        tracing::trace!(rule = %draft.name, kind = draft.kind.type_name(), "add rule");
        self.rules.push(Rule::from_draft(draft, output));
        id
    }

    /// Add a batch of condition drafts, in order, returning their ids.
    ///
    /// Names are made unique one by one, so later drafts of the batch see the
    /// earlier ones. Positional links between drafts become edges.
    pub fn add_conditions(&mut self, drafts: Vec<ConditionDraft>) -> GraphResult<Vec<ConditionId>> {
        let len = drafts.len();
        for draft in &drafts {
            for position in [draft.true_next, draft.false_next].into_iter().flatten() {
                if position >= len {
                    return Err(GraphError::DraftLinkOutOfRange {
                        name: draft.name.clone(),
                        position,
                        len,
                    });
                }
            }
        }

        let first = self.conditions.len();
        let ids: Vec<ConditionId> = (first..first + len).map(next_id).collect();

        for draft in &drafts {
            let mut condition = Condition::from_draft(draft);
            condition.name = unique_condition_name(
                self.conditions.iter().map(|c| c.name.as_str()),
                &draft.name,
            );
            if let Some(position) = draft.true_next {
                condition.link_true(EdgeTarget::Condition(ids[position]))?;
            }
            if let Some(position) = draft.false_next {
                condition.link_false(EdgeTarget::Condition(ids[position]))?;
            }
            tracing::trace!(condition = %condition.name, "add condition");
            self.conditions.push(condition);
        }

        Ok(ids)
    }

    /// Connect the true edge of a condition unless it is already connected.
    pub fn connect_true(&mut self, id: ConditionId, target: EdgeTarget) -> GraphResult<bool> {
        Ok(self.condition_mut(id)?.connect_true(target))
    }

    /// Connect the false edge of a condition unless it is already connected.
    pub fn connect_false(&mut self, id: ConditionId, target: EdgeTarget) -> GraphResult<bool> {
        Ok(self.condition_mut(id)?.connect_false(target))
    }

    fn condition_mut(&mut self, id: ConditionId) -> GraphResult<&mut Condition> {
        self.conditions
            .get_mut(id.index() as usize)
            .ok_or(GraphError::ConditionNotFound { id })
    }

    pub fn condition(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.get(id.index() as usize)
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.index() as usize)
    }

    pub fn input(&self, id: InputId) -> Option<&Input> {
        self.inputs.get(id.index() as usize)
    }

    pub fn output(&self, id: OutputId) -> Option<&Output> {
        self.outputs.get(id.index() as usize)
    }

    /// Most recently added rule.
    pub fn last_rule(&self) -> Option<(RuleId, &Rule)> {
        let rule = self.rules.last()?;
        Some((next_id(self.rules.len() - 1), rule))
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

    /// Validate references and acyclicity, returning an immutable `ControlGroup`.
    pub fn build(self) -> GraphResult<ControlGroup> {
        validate::validate_references(&self.rules, &self.conditions, &self.inputs, &self.outputs)?;
        let graph = validate::decision_graph(&self.rules, &self.conditions)?;

        Ok(ControlGroup {
            name: self.name,
            rules: self.rules,
            conditions: self.conditions,
            inputs: self.inputs,
            outputs: self.outputs,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtc_controls::{
        ConditionKind, ElementSet, HydraulicRule, Operation, QuantityType, RuleKind,
    };
    use rtc_core::LookupTable;

    fn item(feature: &str, parameter: &str) -> DataItem {
        DataItem::new(feature, parameter, QuantityType::CrestLevel, ElementSet::Structures)
    }

    fn hydraulic(name: &str) -> RuleDraft {
        RuleDraft::new(
            name,
            name,
            RuleKind::Hydraulic(HydraulicRule {
                table: LookupTable::default(),
                time_lag_seconds: 0,
            }),
        )
    }

    fn standard(name: &str) -> ConditionDraft {
        ConditionDraft::new(name, name, ConditionKind::Standard {
            operation: Operation::Less,
        })
    }

    #[test]
    fn placeholders_deduplicated_by_feature_and_parameter() {
        let mut builder = ControlGroupBuilder::new("s1");
        let a = builder.ensure_output(item("s1", "Crest level"));
        let b = builder.ensure_output(item("s1", "Crest level"));
        let c = builder.ensure_output(item("s1", "Crest width"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(builder.outputs().len(), 2);
        assert_eq!(builder.find_output(&item("s1", "Crest width")), Some(c));

        let i = builder.ensure_input(item("obs", "Water level"));
        let j = builder.ensure_input(item("obs", "Water level"));
        assert_eq!(i, j);
        assert_eq!(builder.inputs()[0].name, "obs_Water level");
    }

    #[test]
    fn names_made_unique() {
        let mut builder = ControlGroupBuilder::new("s1");
        let out = builder.ensure_output(item("s1", "Crest level"));
        builder.add_rule(hydraulic("c1"), out);
        builder.add_rule(hydraulic("c1"), out);
        let names: Vec<&str> = builder.rules().iter().map(|r| r.name.as_str()).collect();
        // exact matches are not counted for rules
        assert_eq!(names, vec!["c1", "c1"]);

        builder
            .add_conditions(vec![standard("t1"), standard("t1"), standard("t1")])
            .unwrap();
        let names: Vec<&str> = builder.conditions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["t1", "t1_1", "t1_2"]);
    }

    #[test]
    fn draft_links_become_edges() {
        let mut builder = ControlGroupBuilder::new("s1");
        let mut first = standard("t1");
        first.true_next = Some(1);
        let ids = builder.add_conditions(vec![first, standard("t1")]).unwrap();

        let head = builder.condition(ids[0]).unwrap();
        assert_eq!(head.true_output.target(), Some(EdgeTarget::Condition(ids[1])));
        assert!(head.false_output.is_open());
    }

    #[test]
    fn draft_link_out_of_range_rejected() {
        let mut builder = ControlGroupBuilder::new("s1");
        let mut draft = standard("t1");
        draft.false_next = Some(3);
        let err = builder.add_conditions(vec![draft]).unwrap_err();
        assert!(matches!(err, GraphError::DraftLinkOutOfRange { position: 3, len: 1, .. }));
        assert!(builder.conditions().is_empty());
    }

    #[test]
    fn connect_is_edge_once() {
        let mut builder = ControlGroupBuilder::new("s1");
        let out = builder.ensure_output(item("s1", "Crest level"));
        let r1 = builder.add_rule(hydraulic("c1"), out);
        let r2 = builder.add_rule(hydraulic("c2"), out);
        let ids = builder.add_conditions(vec![standard("t1")]).unwrap();

        assert!(builder.connect_true(ids[0], EdgeTarget::Rule(r1)).unwrap());
        assert!(!builder.connect_true(ids[0], EdgeTarget::Rule(r2)).unwrap());
        assert_eq!(
            builder.condition(ids[0]).unwrap().true_output.target(),
            Some(EdgeTarget::Rule(r1))
        );
    }

    #[test]
    fn last_rule_tracks_insertion() {
        let mut builder = ControlGroupBuilder::new("s1");
        assert!(builder.last_rule().is_none());
        let out = builder.ensure_output(item("s1", "Crest level"));
        builder.add_rule(hydraulic("c1"), out);
        let r2 = builder.add_rule(hydraulic("c2"), out);
        let (id, rule) = builder.last_rule().unwrap();
        assert_eq!(id, r2);
        assert_eq!(rule.name, "c2");
    }
}
