//! Catalog and project metadata types
//!
//! `TemplateDescriptor` mirrors the catalog's camelCase wire format;
//! `ProjectInfo` is collected interactively and consumed by rendering and
//! by custom-install payloads.

use serde::{Deserialize, Serialize};

/// What kind of artifact the user is creating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Project,
    Component,
}

impl ProjectKind {
    /// Human-facing label, also the tag value used in the catalog
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
        }
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How a template installs: rendered copy, or a delegated install script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Normal,
    Custom,
}

/// One catalog entry describing an installable template package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    /// Registry package name (`@brokkr/template-vue3`)
    pub npm_name: String,

    /// Requested version spec for the package
    pub version: String,

    /// Display name shown in the selection prompt
    pub name: String,

    /// Project kinds this template can produce
    #[serde(default)]
    pub tags: Vec<ProjectKind>,

    /// Installation mode
    #[serde(rename = "type", default)]
    pub kind: TemplateKind,

    /// Globs excluded from rendering
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Dependency-install command to run after rendering
    #[serde(default)]
    pub install_command: Option<String>,

    /// Start command to run after installation
    #[serde(default)]
    pub start_command: Option<String>,
}

impl TemplateDescriptor {
    /// Whether this template is tagged for the given project kind
    pub fn supports(&self, kind: ProjectKind) -> bool {
        self.tags.contains(&kind)
    }
}

/// Filter a catalog down to the templates supporting a project kind
pub fn filter_by_kind(templates: &[TemplateDescriptor], kind: ProjectKind) -> Vec<TemplateDescriptor> {
    templates
        .iter()
        .filter(|t| t.supports(kind))
        .cloned()
        .collect()
}

/// Validated, immutable project metadata collected by the init pipeline
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub kind: ProjectKind,
    pub name: String,

    /// Normalized semver
    pub version: String,

    /// Registry name of the chosen template package
    pub template: String,

    /// Kebab-case derivation of `name`, available to templates
    pub class_name: String,

    /// Component description; absent for projects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectInfo {
    /// Assemble project metadata, deriving the class name
    pub fn new(
        kind: ProjectKind,
        name: impl Into<String>,
        version: impl Into<String>,
        template: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        let name = name.into();
        let class_name = kebab_case(&name);
        Self {
            kind,
            name,
            version: version.into(),
            template: template.into(),
            class_name,
            description,
        }
    }
}

/// Kebab-case a project name (`MyApp` → `my-app`, `my_app` → `my-app`).
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' || ch == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else {
            out.push(ch);
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_derivations() {
        assert_eq!(kebab_case("MyApp"), "my-app");
        assert_eq!(kebab_case("my_app"), "my-app");
        assert_eq!(kebab_case("my-app"), "my-app");
        assert_eq!(kebab_case("App2Go"), "app2-go");
        assert_eq!(kebab_case("plain"), "plain");
    }

    #[test]
    fn descriptor_parses_catalog_wire_format() {
        let descriptor: TemplateDescriptor = serde_json::from_str(
            r#"{
                "npmName": "@brokkr/template-vue3",
                "version": "^1.0.0",
                "name": "Vue 3 standard template",
                "tags": ["project"],
                "type": "normal",
                "ignore": ["**/public/**"],
                "installCommand": "npm install",
                "startCommand": "npm run serve"
            }"#,
        )
        .unwrap();

        assert_eq!(descriptor.npm_name, "@brokkr/template-vue3");
        assert_eq!(descriptor.kind, TemplateKind::Normal);
        assert!(descriptor.supports(ProjectKind::Project));
        assert!(!descriptor.supports(ProjectKind::Component));
    }

    #[test]
    fn descriptor_defaults_apply() {
        let descriptor: TemplateDescriptor = serde_json::from_str(
            r#"{"npmName": "@brokkr/template-min", "version": "latest", "name": "Minimal"}"#,
        )
        .unwrap();
        assert_eq!(descriptor.kind, TemplateKind::Normal);
        assert!(descriptor.tags.is_empty());
        assert!(descriptor.install_command.is_none());
    }

    #[test]
    fn filtering_respects_tags() {
        let catalog: Vec<TemplateDescriptor> = serde_json::from_str(
            r#"[
                {"npmName": "a", "version": "latest", "name": "A", "tags": ["project"]},
                {"npmName": "b", "version": "latest", "name": "B", "tags": ["project", "component"]},
                {"npmName": "c", "version": "latest", "name": "C", "tags": ["component"]}
            ]"#,
        )
        .unwrap();

        let projects = filter_by_kind(&catalog, ProjectKind::Project);
        assert_eq!(
            projects.iter().map(|t| t.npm_name.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
        let components = filter_by_kind(&catalog, ProjectKind::Component);
        assert_eq!(
            components.iter().map(|t| t.npm_name.as_str()).collect::<Vec<_>>(),
            ["b", "c"]
        );
    }

    #[test]
    fn project_info_serializes_camel_case() {
        let info = ProjectInfo::new(
            ProjectKind::Component,
            "DataGrid",
            "1.0.0",
            "@brokkr/template-component",
            Some("a grid".to_string()),
        );
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["className"], "data-grid");
        assert_eq!(json["kind"], "component");
        assert_eq!(json["description"], "a grid");
    }
}
