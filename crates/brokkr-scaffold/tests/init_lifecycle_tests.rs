//! Init pipeline lifecycle tests
//!
//! Drives the pipeline with a scripted prompter over temp directories.
//! Template downloads are exercised against a fabricated store tree (the
//! layout a real package-manager install produces), so no network or
//! package manager is needed.

use std::path::{Path, PathBuf};

use brokkr_core::RuntimeConfig;
use brokkr_scaffold::pipeline::{InitOptions, Outcome, Prepared, ProjectInitPipeline};
use brokkr_scaffold::prompt::ScriptedPrompter;
use brokkr_scaffold::types::TemplateDescriptor;
use brokkr_scaffold::Error;

fn catalog() -> Vec<TemplateDescriptor> {
    serde_json::from_str(
        r#"[
            {
                "npmName": "@brokkr/template-vue3",
                "version": "1.0.0",
                "name": "Vue 3 standard template",
                "tags": ["project"],
                "type": "normal"
            },
            {
                "npmName": "@brokkr/template-component",
                "version": "1.0.0",
                "name": "Component library template",
                "tags": ["component"],
                "type": "normal"
            }
        ]"#,
    )
    .unwrap()
}

struct Fixture {
    config: RuntimeConfig,
    workdir: tempfile::TempDir,
    _cli_home: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let cli_home = tempfile::tempdir().unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let config = RuntimeConfig::new(cli_home.path(), cli_home.path().join(".brokkr"));
    Fixture {
        config,
        workdir,
        _cli_home: cli_home,
    }
}

/// Fabricate the store tree a successful template install produces
fn stage_template(store: &Path, name: &str, version: &str) -> PathBuf {
    let key = format!("{}@{}", name.replace('/', "+"), version);
    let pkg_dir = store.join(key).join("node_modules").join(name);
    let template_dir = pkg_dir.join("template");
    std::fs::create_dir_all(template_dir.join("src")).unwrap();
    std::fs::write(
        pkg_dir.join("package.json"),
        format!(r#"{{"name": "{name}", "version": "{version}"}}"#),
    )
    .unwrap();
    std::fs::write(
        template_dir.join("package.json"),
        r#"{"name": "{{ project_name }}", "version": "{{ version }}"}"#,
    )
    .unwrap();
    std::fs::write(template_dir.join("src/main.js"), "// {{ class_name }}\n").unwrap();
    pkg_dir
}

#[test]
fn empty_catalog_is_fatal() {
    let fx = fixture();
    let prompter = ScriptedPrompter::new(Vec::<String>::new());
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        Vec::new(),
        fx.workdir.path(),
        InitOptions::default(),
    );
    assert!(matches!(pipeline.prepare(), Err(Error::EmptyCatalog)));
}

#[test]
fn empty_directory_skips_all_confirmations() {
    let fx = fixture();
    let prompter = ScriptedPrompter::new(["project", "1.0.0", "Vue 3 standard template"]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions {
            name: Some("my-app".to_string()),
            force: false,
        },
    );

    let Prepared::Ready(info) = pipeline.prepare().unwrap() else {
        panic!("expected Ready");
    };
    assert_eq!(info.name, "my-app");
    assert_eq!(info.version, "1.0.0");
    assert_eq!(info.template, "@brokkr/template-vue3");
    assert!(info.description.is_none());

    // No confirm was ever asked: the directory was already empty
    assert!(prompter.asked().iter().all(|q| !q.starts_with("confirm")));
    // The valid positional name skipped the name prompt
    assert!(prompter.asked().iter().all(|q| q != "input: Project name"));
}

#[test]
fn declined_continue_is_a_clean_no_op() {
    let fx = fixture();
    std::fs::write(fx.workdir.path().join("existing.txt"), "keep me").unwrap();

    let prompter = ScriptedPrompter::new(["n"]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions::default(),
    );

    assert!(matches!(pipeline.prepare().unwrap(), Prepared::Declined));
    // Only the continue confirmation was asked; no metadata was collected
    assert_eq!(prompter.asked().len(), 1);
    // Nothing was downloaded into the cache
    assert!(!fx.config.template_store_dir().exists());
    // And the directory is untouched
    assert_eq!(
        std::fs::read_to_string(fx.workdir.path().join("existing.txt")).unwrap(),
        "keep me"
    );
}

#[test]
fn clear_requires_both_signals() {
    // force supplies the first signal; declining the second keeps the files
    let fx = fixture();
    std::fs::write(fx.workdir.path().join("existing.txt"), "keep me").unwrap();

    let prompter =
        ScriptedPrompter::new(["n", "project", "my-app", "1.0.0", "Vue 3 standard template"]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions {
            name: None,
            force: true,
        },
    );

    assert!(matches!(pipeline.prepare().unwrap(), Prepared::Ready(_)));
    assert!(fx.workdir.path().join("existing.txt").exists());
}

#[test]
fn clear_happens_with_both_signals() {
    let fx = fixture();
    std::fs::write(fx.workdir.path().join("existing.txt"), "remove me").unwrap();

    let prompter = ScriptedPrompter::new([
        "y", // continue into non-empty directory
        "y", // confirm the destructive clear
        "project",
        "my-app",
        "1.0.0",
        "Vue 3 standard template",
    ]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions::default(),
    );

    assert!(matches!(pipeline.prepare().unwrap(), Prepared::Ready(_)));
    assert!(!fx.workdir.path().join("existing.txt").exists());
}

#[test]
fn dotfiles_and_dependency_cache_do_not_count() {
    let fx = fixture();
    std::fs::write(fx.workdir.path().join(".gitignore"), "node_modules").unwrap();
    std::fs::create_dir(fx.workdir.path().join("node_modules")).unwrap();

    let prompter = ScriptedPrompter::new(["project", "1.0.0", "Vue 3 standard template"]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions {
            name: Some("my-app".to_string()),
            force: false,
        },
    );

    assert!(matches!(pipeline.prepare().unwrap(), Prepared::Ready(_)));
    assert!(prompter.asked().iter().all(|q| !q.starts_with("confirm")));
}

#[test]
fn invalid_positional_name_falls_back_to_prompt() {
    let fx = fixture();
    let prompter =
        ScriptedPrompter::new(["project", "9-bad", "good-name", "1.0.0", "Vue 3 standard template"]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions {
            name: Some("1nvalid".to_string()),
            force: false,
        },
    );

    let Prepared::Ready(info) = pipeline.prepare().unwrap() else {
        panic!("expected Ready");
    };
    // The invalid scripted answer was re-prompted away as well
    assert_eq!(info.name, "good-name");
    assert!(prompter.asked().iter().any(|q| q == "input: Project name"));
}

#[test]
fn component_flow_collects_description_and_filters_templates() {
    let fx = fixture();
    let prompter = ScriptedPrompter::new([
        "component",
        "data-grid",
        "2.1.0",
        "Component library template",
        "a reusable data grid",
    ]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions::default(),
    );

    let Prepared::Ready(info) = pipeline.prepare().unwrap() else {
        panic!("expected Ready");
    };
    assert_eq!(info.template, "@brokkr/template-component");
    assert_eq!(info.class_name, "data-grid");
    assert_eq!(info.description.as_deref(), Some("a reusable data grid"));
}

#[tokio::test]
async fn full_run_installs_a_cached_normal_template() {
    let fx = fixture();
    stage_template(
        &fx.config.template_store_dir(),
        "@brokkr/template-vue3",
        "1.0.0",
    );

    let prompter = ScriptedPrompter::new(["project", "1.2.0", "Vue 3 standard template"]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        catalog(),
        fx.workdir.path(),
        InitOptions {
            name: Some("my-app".to_string()),
            force: false,
        },
    );

    let Outcome::Completed(info) = pipeline.run().await.unwrap() else {
        panic!("expected Completed");
    };
    assert_eq!(info.version, "1.2.0");

    let manifest = std::fs::read_to_string(fx.workdir.path().join("package.json")).unwrap();
    assert_eq!(manifest, r#"{"name": "my-app", "version": "1.2.0"}"#);
    let main = std::fs::read_to_string(fx.workdir.path().join("src/main.js")).unwrap();
    assert_eq!(main, "// my-app\n");
}

#[tokio::test]
async fn custom_template_without_entry_is_fatal() {
    let fx = fixture();
    // Stage a custom template whose manifest declares no main
    stage_template(
        &fx.config.template_store_dir(),
        "@brokkr/template-admin",
        "1.0.0",
    );
    let custom_catalog: Vec<TemplateDescriptor> = serde_json::from_str(
        r#"[{
            "npmName": "@brokkr/template-admin",
            "version": "1.0.0",
            "name": "Admin console template",
            "tags": ["project"],
            "type": "custom"
        }]"#,
    )
    .unwrap();

    let prompter = ScriptedPrompter::new(["project", "1.0.0", "Admin console template"]);
    let pipeline = ProjectInitPipeline::new(
        &fx.config,
        &prompter,
        custom_catalog,
        fx.workdir.path(),
        InitOptions {
            name: Some("my-admin".to_string()),
            force: false,
        },
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, Error::MissingEntry { .. }));
}
