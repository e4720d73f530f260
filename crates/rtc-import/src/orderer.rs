//! Controller ordering within one structure.
//!
//! Controllers acting on the same controlled parameter are grouped so their
//! rules can share one output. A controller joins the most recent controller
//! with the same parameter only while that one is not within the last two
//! positions of the list; otherwise it is appended.

use rtc_core::DiagnosticsSink;
use rtc_records::ControllerRecord;

/// Order a structure's controllers; unknown ids are reported and skipped.
pub fn order_controllers<'a>(
    structure_id: &str,
    controller_ids: &[String],
    lookup: impl Fn(&str) -> Option<&'a ControllerRecord>,
    sink: &mut dyn DiagnosticsSink,
) -> Vec<&'a ControllerRecord> {
    let mut ordered: Vec<&'a ControllerRecord> = Vec::with_capacity(controller_ids.len());

    for id in controller_ids {
        let Some(controller) = lookup(id) else {
            sink.error(
                id,
                format!("Controller '{id}' of structure '{structure_id}' has not been found"),
            );
            continue;
        };

        let matched = ordered
            .iter()
            .rposition(|c| c.controlled_parameter == controller.controlled_parameter);

        match matched {
            Some(index) if index + 2 < ordered.len() => ordered.insert(index + 1, controller),
            _ => ordered.push(controller),
        }
    }

    ordered
}
