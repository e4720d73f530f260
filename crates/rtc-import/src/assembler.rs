//! Per-structure assembly of control groups.

use rtc_core::DiagnosticsSink;
use rtc_graph::{ControlGroup, ControlGroupBuilder};
use rtc_records::{DataItemResolver, ImportDocument, StructureMapping};

use crate::error::{ImportError, ImportResult};
use crate::inputs::{resolve_controller_input, resolve_output};
use crate::merge::merge_into;
use crate::orderer::order_controllers;
use crate::rule_factory::build_rule;
use crate::wiring::{Wiring, trigger_clauses, wire_rule};

/// A structure whose group could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureFailure {
    pub structure_id: String,
    pub error: ImportError,
}

/// Outcome of importing a whole document.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub groups: Vec<ControlGroup>,
    pub failures: Vec<StructureFailure>,
}

impl ImportReport {
    pub fn group(&self, name: &str) -> Option<&ControlGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }
}

/// Build the control group of one structure.
///
/// Returns `Ok(None)` when the structure is unknown or none of its
/// controllers exist. Any error abandons the whole group.
pub fn assemble_structure(
    structure: &StructureMapping,
    document: &ImportDocument,
    resolver: &dyn DataItemResolver,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<Option<ControlGroup>> {
    let _span = tracing::debug_span!("structure", id = %structure.structure_id).entered();

    if !resolver.has_structure(&structure.structure_id) {
        sink.error(
            &structure.structure_id,
            format!(
                "Structure '{}' is not known to the model; its controllers are skipped",
                structure.structure_id
            ),
        );
        return Ok(None);
    }

    let ordered = order_controllers(
        &structure.structure_id,
        &structure.controller_ids,
        |id| document.controller(id),
        sink,
    );
    if ordered.is_empty() {
        return Ok(None);
    }

    let mut builder = ControlGroupBuilder::new(&structure.structure_id);
    let mut previous: Option<Wiring> = None;

    for controller in ordered {
        let Some(item) = resolve_output(structure, controller, resolver, sink)? else {
            continue;
        };

        let shares_output = builder.find_output(&item).is_some_and(|output| {
            builder
                .last_rule()
                .is_some_and(|(_, rule)| rule.output == output)
        });
        let output = builder.ensure_output(item);

        let mut draft = build_rule(controller, sink)?;
        if let Some(item) = resolve_controller_input(controller, resolver, sink)? {
            draft.input = Some(builder.ensure_input(item));
        }
        let rule = builder.add_rule(draft, output);

        let clauses = trigger_clauses(
            &mut builder,
            controller,
            structure,
            |id| document.trigger(id),
            resolver,
            sink,
        )?;
        let wiring = wire_rule(&mut builder, rule, clauses)?;

        if shares_output {
            if let Some(previous) = &previous {
                merge_into(&mut builder, previous, &wiring)?;
            }
        }
        previous = Some(wiring);
    }

    let group = builder.build()?;
    tracing::debug!(
        group = group.name(),
        rules = group.rules().len(),
        conditions = group.conditions().len(),
        "control group built"
    );
    Ok(Some(group))
}

/// Import every structure of `document`.
///
/// A fatal error only abandons the structure it occurred in.
pub fn import_all(
    document: &ImportDocument,
    resolver: &dyn DataItemResolver,
    sink: &mut dyn DiagnosticsSink,
) -> ImportReport {
    let mut report = ImportReport::default();

    for structure in &document.structures {
        match assemble_structure(structure, document, resolver, sink) {
            Ok(Some(group)) => report.groups.push(group),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(structure = %structure.structure_id, %error, "structure abandoned");
                report.failures.push(StructureFailure {
                    structure_id: structure.structure_id.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        groups = report.groups.len(),
        failures = report.failures.len(),
        "import finished"
    );
    report
}
