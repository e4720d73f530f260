//! Resolution of rule and condition inputs and rule outputs.
//!
//! Unresolved data items are reported and leave the entity without a
//! placeholder. Unmapped tags are fatal.

use rtc_controls::{DataItem, ElementSet, QuantityType};
use rtc_core::DiagnosticsSink;
use rtc_records::{
    ControlledParameter, ControllerRecord, DataItemResolver, StructureMapping, TriggerParameter,
    TriggerRecord, TriggerType,
};

use crate::error::{ImportError, ImportResult};
use crate::quantity::{controlled_quantity, measured_quantity, trigger_quantity};

/// Legacy parameter name of an input whose conditions always compare against zero.
pub const ZERO_THRESHOLD_PARAMETER: &str = "haha";

/// Where a hydraulic trigger measures its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerLocation {
    ObservationPoint,
    Structure,
    RetentionArea,
}

pub fn trigger_location(parameter: &TriggerParameter) -> ImportResult<TriggerLocation> {
    match parameter {
        TriggerParameter::WaterLevelBranchLocation | TriggerParameter::DischargeBranchLocation => {
            Ok(TriggerLocation::ObservationPoint)
        }
        TriggerParameter::HeadDifferenceStructure
        | TriggerParameter::GateHeightStructure
        | TriggerParameter::CrestLevelStructure
        | TriggerParameter::CrestWidthStructure
        | TriggerParameter::PressureDifferenceStructure => Ok(TriggerLocation::Structure),
        TriggerParameter::WaterlevelRetentionArea => Ok(TriggerLocation::RetentionArea),
        TriggerParameter::Other(tag) => Err(ImportError::not_supported("trigger location", tag)),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_or_report(
    subject: &str,
    resolver: &dyn DataItemResolver,
    location: &str,
    quantity: QuantityType,
    element_set: ElementSet,
    sink: &mut dyn DiagnosticsSink,
) -> Option<DataItem> {
    let item = resolver.find_input(location, quantity, element_set);
    if item.is_none() {
        sink.error(
            subject,
            format!(
                "No data item for {quantity} at '{location}' ({element_set}) used by '{subject}'"
            ),
        );
    }
    item
}

/// Measured data item a trigger's conditions read.
///
/// Time triggers never have one. A location that is absent, or a structure
/// id of `-1`, leaves the conditions without input.
pub fn resolve_trigger_input(
    trigger: &TriggerRecord,
    structure: &StructureMapping,
    resolver: &dyn DataItemResolver,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<Option<DataItem>> {
    if trigger.trigger_type == TriggerType::Time {
        return Ok(None);
    }
    let Some(parameter) = &trigger.parameter else {
        sink.error(
            &trigger.id,
            format!("Trigger '{}' has no measured parameter", trigger.id),
        );
        return Ok(None);
    };

    let (location, element_set) = match trigger_location(parameter)? {
        TriggerLocation::ObservationPoint => {
            match non_empty(trigger.measurement_station_id.as_deref()) {
                Some(station) => (station, ElementSet::Observations),
                None => return Ok(None),
            }
        }
        TriggerLocation::Structure => match non_empty(trigger.structure_id.as_deref()) {
            Some(id) if id != "-1" => (id, ElementSet::Structures),
            _ => return Ok(None),
        },
        TriggerLocation::RetentionArea => {
            sink.error(
                &trigger.id,
                format!(
                    "Trigger '{}' measures a retention area, which is not supported",
                    trigger.id
                ),
            );
            return Ok(None);
        }
    };

    let quantity = trigger_quantity(structure.kind, parameter)?;
    Ok(resolve_or_report(&trigger.id, resolver, location, quantity, element_set, sink))
}

/// Measured data item a controller's rule reads, if it has a measurement location.
pub fn resolve_controller_input(
    controller: &ControllerRecord,
    resolver: &dyn DataItemResolver,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<Option<DataItem>> {
    let (location, element_set) = if let Some(station) =
        non_empty(controller.measurement_station_id.as_deref())
    {
        (station, ElementSet::Observations)
    } else if let Some(structure) = non_empty(controller.structure_id.as_deref()) {
        (structure, ElementSet::Structures)
    } else {
        return Ok(None);
    };

    let Some(parameter) = &controller.measurement_parameter else {
        sink.error(
            &controller.id,
            format!(
                "Controller '{}' measures at '{location}' but names no measured parameter",
                controller.id
            ),
        );
        return Ok(None);
    };
    let quantity = measured_quantity(parameter)?;
    Ok(resolve_or_report(&controller.id, resolver, location, quantity, element_set, sink))
}

/// Controllable data item a controller writes on its structure.
pub fn resolve_output(
    structure: &StructureMapping,
    controller: &ControllerRecord,
    resolver: &dyn DataItemResolver,
    sink: &mut dyn DiagnosticsSink,
) -> ImportResult<Option<DataItem>> {
    let quantity = controlled_quantity(structure.kind, &controller.controlled_parameter)?;
    let location = structure.structure_id.as_str();

    let item = resolver
        .find_output(location, quantity, ElementSet::Structures)
        .or_else(|| match controller.controlled_parameter {
            ControlledParameter::PumpCapacity => {
                resolver.find_output(location, quantity, ElementSet::Pumps)
            }
            _ => None,
        });

    if item.is_none() {
        sink.error(
            &controller.id,
            format!(
                "No controllable {quantity} on structure '{location}'; controller '{}' skipped",
                controller.id
            ),
        );
    }
    Ok(item)
}
