//! Schema migration framework.

use crate::RecordsError;
use crate::schema::ImportDocument;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut document: ImportDocument) -> Result<ImportDocument, RecordsError> {
    while document.version < LATEST_VERSION {
        document = migrate_one_version(document)?;
    }
    Ok(document)
}

fn migrate_one_version(document: ImportDocument) -> Result<ImportDocument, RecordsError> {
    match document.version {
        0 => migrate_v0_to_v1(document),
        v => Err(RecordsError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 allowed unnamed controllers and triggers; names fall back to ids.
fn migrate_v0_to_v1(mut document: ImportDocument) -> Result<ImportDocument, RecordsError> {
    for trigger in &mut document.triggers {
        if trigger.name.is_empty() {
            trigger.name = trigger.id.clone();
        }
    }
    for controller in &mut document.controllers {
        if controller.name.is_empty() {
            controller.name = controller.id.clone();
        }
    }
    document.version = 1;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_document_migrates() {
        let document: ImportDocument = serde_yaml::from_str(
            r#"
triggers:
  - id: t1
    trigger_type: Time
"#,
        )
        .unwrap();
        assert_eq!(document.version, 0);

        let migrated = migrate_to_latest(document).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.triggers[0].name, "t1");
    }
}
