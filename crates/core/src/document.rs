//! YAML document form of a maintenance template.
//!
//! Template files share the usual envelope: `apiVersion`, `kind`,
//! `metadata`, and a kind-specific `spec`. Compiling a document validates it
//! and yields the typed [`MaintenanceTemplate`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::equipment::Hours;
use crate::error::{FleetError, Result};
use crate::template::{MaintenanceActivity, MaintenanceTemplate};

/// The only document kind this loader accepts.
pub const TEMPLATE_KIND: &str = "MaintenanceTemplate";

// ── YAML-level types ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DocumentMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Top-level template document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceTemplateDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: DocumentMetadata,
    pub spec: MaintenanceTemplateSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaintenanceTemplateSpec {
    /// Shared, strictly ascending hour offsets.
    pub due_offsets: Vec<Hours>,
    #[serde(default)]
    pub activities: Vec<MaintenanceActivity>,
}

impl MaintenanceTemplateDocument {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate the document and produce the typed template.
    pub fn compile(&self) -> Result<MaintenanceTemplate> {
        if self.kind != TEMPLATE_KIND {
            return Err(FleetError::InvalidTemplate(format!(
                "expected kind '{}', got '{}'",
                TEMPLATE_KIND, self.kind
            )));
        }
        if !self.metadata.enabled {
            warn!(template = %self.metadata.id, "template is marked disabled");
        }

        let template = MaintenanceTemplate {
            id: self.metadata.id.clone(),
            name: Some(self.metadata.name.clone()),
            due_offsets: self.spec.due_offsets.clone(),
            activities: self.spec.activities.clone(),
        };
        template.validate()?;
        Ok(template)
    }
}

/// Read and compile a template file.
pub fn load_template(path: &Path) -> Result<MaintenanceTemplate> {
    let yaml = fs::read_to_string(path)?;
    let template = MaintenanceTemplateDocument::from_yaml(&yaml)?.compile()?;
    debug!(
        path = %path.display(),
        template = %template.id,
        offsets = template.due_offsets.len(),
        activities = template.activities.len(),
        "maintenance template loaded"
    );
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SHIPPED: &str = include_str!("../../../data/templates/maintenance-template.yml");

    #[test]
    fn parse_shipped_template() {
        let doc = MaintenanceTemplateDocument::from_yaml(SHIPPED).unwrap();
        assert_eq!(doc.kind, "MaintenanceTemplate");
        assert_eq!(doc.spec.due_offsets, vec![0, 300, 600, 900, 1200, 1500]);

        let template = doc.compile().unwrap();
        assert_eq!(template.id, "heavy-equipment-pm");
        assert_eq!(template.activities.len(), 5);
        assert_eq!(template.activities_at(1500).len(), 4);
    }

    #[test]
    fn wrong_kind_rejected() {
        let yaml = SHIPPED.replace("kind: MaintenanceTemplate", "kind: TrendConfig");
        let doc = MaintenanceTemplateDocument::from_yaml(&yaml).unwrap();
        let err = doc.compile().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn descending_offsets_fail_compile() {
        let yaml = r#"
apiVersion: v1
kind: MaintenanceTemplate
metadata:
  id: broken
  name: Broken
spec:
  dueOffsets: [0, 600, 300]
"#;
        let doc = MaintenanceTemplateDocument::from_yaml(yaml).unwrap();
        assert!(matches!(doc.compile(), Err(FleetError::InvalidTemplate(_))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let yaml = r#"
apiVersion: v1
kind: MaintenanceTemplate
metadata:
  id: t
  name: T
spec:
  dueOffsets: [0, 300]
  cron: "0 * * * *"
"#;
        assert!(matches!(
            MaintenanceTemplateDocument::from_yaml(yaml),
            Err(FleetError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SHIPPED.as_bytes()).unwrap();

        let template = load_template(file.path()).unwrap();
        assert_eq!(template.due_offsets.len(), 6);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_template(Path::new("/definitely/not/here.yml")).unwrap_err();
        assert!(matches!(err, FleetError::Io(_)));
    }
}
