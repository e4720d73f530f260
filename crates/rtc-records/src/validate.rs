//! Import document validation.
//!
//! Only structural problems are rejected here. Dangling references between
//! records (a structure naming an unknown controller, a controller naming an
//! unknown trigger) are left to the importer, which skips them with a
//! diagnostic.

use std::collections::HashSet;

use crate::schema::{
    CatalogueEntry, ControllerProperties, ControllerRecord, ImportDocument, TriggerRecord,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Empty ID in {context}")]
    EmptyId { context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_document(document: &ImportDocument) -> Result<(), ValidationError> {
    if document.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: document.version,
        });
    }

    unique_ids(
        document.structures.iter().map(|s| s.structure_id.as_str()),
        "structures",
    )?;
    unique_ids(document.controllers.iter().map(|c| c.id.as_str()), "controllers")?;
    unique_ids(document.triggers.iter().map(|t| t.id.as_str()), "triggers")?;

    for controller in &document.controllers {
        validate_controller(controller)?;
    }
    for trigger in &document.triggers {
        validate_trigger(trigger)?;
    }
    for entry in &document.catalogue {
        validate_entry(entry)?;
    }

    Ok(())
}

fn unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    context: &str,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId {
                context: context.to_string(),
            });
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                id: id.to_string(),
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

fn finite(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: field(),
        value: value.to_string(),
        reason: "must be finite".to_string(),
    })
}

fn validate_controller(controller: &ControllerRecord) -> Result<(), ValidationError> {
    let id = &controller.id;
    finite(|| format!("controller '{id}' positive_stream"), controller.positive_stream)?;
    finite(|| format!("controller '{id}' negative_stream"), controller.negative_stream)?;

    if controller.minimum_period < 0 {
        return Err(ValidationError::InvalidValue {
            field: format!("controller '{id}' minimum_period"),
            value: controller.minimum_period.to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    for row in controller.time_table.iter().flatten() {
        finite(|| format!("controller '{id}' time_table value at {}", row.time), row.value)?;
    }
    for row in controller.lookup_table.iter().flatten() {
        finite(|| format!("controller '{id}' lookup_table argument"), row.argument)?;
        finite(|| format!("controller '{id}' lookup_table value"), row.value)?;
    }

    for trigger in &controller.triggers {
        if trigger.id.trim().is_empty() {
            return Err(ValidationError::EmptyId {
                context: format!("controller '{id}' triggers"),
            });
        }
    }

    match &controller.properties {
        Some(ControllerProperties::Hydraulic { time_lag }) if *time_lag < 0 => {
            Err(ValidationError::InvalidValue {
                field: format!("controller '{id}' time_lag"),
                value: time_lag.to_string(),
                reason: "must not be negative".to_string(),
            })
        }
        Some(ControllerProperties::Interval(p)) => {
            for (name, value) in [
                ("dead_band_min", p.dead_band_min),
                ("dead_band_max", p.dead_band_max),
                ("setting_below", p.setting_below),
                ("setting_above", p.setting_above),
                ("max_speed", p.max_speed),
                ("dead_band_fixed_size", p.dead_band_fixed_size),
                ("dead_band_percentage", p.dead_band_percentage),
                ("fixed_interval", p.fixed_interval),
                ("constant_setpoint", p.constant_setpoint),
            ] {
                finite(|| format!("controller '{id}' {name}"), value)?;
            }
            Ok(())
        }
        Some(ControllerProperties::Pid(p)) => {
            for (name, value) in [
                ("kp", p.kp),
                ("ki", p.ki),
                ("kd", p.kd),
                ("setting_min", p.setting_min),
                ("setting_max", p.setting_max),
                ("max_speed", p.max_speed),
                ("initial_value", p.initial_value),
            ] {
                finite(|| format!("controller '{id}' {name}"), value)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn validate_trigger(trigger: &TriggerRecord) -> Result<(), ValidationError> {
    for row in &trigger.rows {
        finite(
            || format!("trigger '{}' row value at {}", trigger.id, row.time),
            row.value,
        )?;
    }
    Ok(())
}

fn validate_entry(entry: &CatalogueEntry) -> Result<(), ValidationError> {
    if entry.feature.trim().is_empty() {
        return Err(ValidationError::EmptyId {
            context: "catalogue feature".to_string(),
        });
    }
    Ok(())
}
