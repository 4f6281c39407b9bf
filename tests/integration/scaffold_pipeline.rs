//! Full scaffold runs over fixture modules.

use serde_json::json;
use std::fs;
use tgscaffold_cli::core::ScaffoldError;
use tgscaffold_cli::templating::MissingConfigAction;

use crate::common::{COMPUTE_VARIABLES, FakeLookup, FixtureFetcher, Workspace, scaffolder, write_tree};

const MODULE_URL: &str = "git::https://github.com/acme/modules.git//compute";

#[tokio::test]
async fn test_default_template_lists_required_and_optional_inputs() {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.2.3");

    let outcome = scaffolder(&fetcher, &lookup).run(&ws.options(MODULE_URL)).await.unwrap();

    assert_eq!(outcome.inputs.required.len(), 1);
    assert_eq!(outcome.inputs.optional.len(), 1);
    assert_eq!(outcome.files, [ws.output_dir().join("terragrunt.hcl")]);

    let generated = ws.read_output("terragrunt.hcl");
    assert!(
        generated.contains(
            "terraform {\n  source = \"git::https://github.com/acme/modules.git//compute?ref=v1.2.3\"\n}"
        ),
        "{generated}"
    );
    assert!(generated.contains("  # Description: Number of instances\n  # Type: number\n  instance_count = null  # TODO: fill in value"));
    assert!(generated.contains("  # Description: AWS region\n  # Type: string\n  # region = \"us-east-1\""));

    let required_at = generated.find("instance_count").unwrap();
    let optional_at = generated.find("# region").unwrap();
    assert!(required_at < optional_at);

    assert!(!generated.contains("\n\n\n"));
    assert!(generated.ends_with("}\n"));
    hcl::parse(&generated).unwrap();
}

#[tokio::test]
async fn test_module_without_variables_still_scaffolds() {
    let ws = Workspace::new();
    ws.write_module(&[("main.tf", "resource \"null_resource\" \"x\" {}\n")]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v0.1.0");

    let outcome = scaffolder(&fetcher, &lookup).run(&ws.options(MODULE_URL)).await.unwrap();

    assert!(outcome.inputs.is_empty());
    let generated = ws.read_output("terragrunt.hcl");
    assert!(!generated.contains("TODO: fill in value"));
    hcl::parse(&generated).unwrap();
}

#[tokio::test]
async fn test_broken_declaration_files_are_skipped() {
    let ws = Workspace::new();
    ws.write_module(&[
        ("variables.tf", COMPUTE_VARIABLES),
        ("broken.tf", "variable \"oops\" {\n  default = \n"),
        (
            "complex.tf",
            "variable \"settings\" {\n  type = object({ a = string, b = number })\n  default = merge({}, {})\n}\n",
        ),
    ]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let outcome = scaffolder(&fetcher, &lookup).run(&ws.options(MODULE_URL)).await.unwrap();

    let required: Vec<_> = outcome.inputs.required.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(required, ["settings", "instance_count"]);

    let generated = ws.read_output("terragrunt.hcl");
    assert!(generated.contains("  # Description: No description for settings\n  # Type: No type for settings\n  settings = null"));
    assert!(!generated.contains("oops"));
}

#[tokio::test]
async fn test_module_boilerplate_is_used_as_template() {
    let ws = Workspace::new();
    ws.write_module(&[
        ("variables.tf", COMPUTE_VARIABLES),
        (
            ".boilerplate/boilerplate.yml",
            "variables:\n  - name: Env\n    default: dev\n",
        ),
        (
            ".boilerplate/terragrunt.hcl",
            "terraform {\nsource = \"{{ sourceUrl }}\"\n}\ninputs = {\nenv = \"{{ Env }}\"\n{% for input in parsedRequiredInputs %}{{ input.Name }} = null\n{% endfor %}}\n",
        ),
    ]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v2.0.0");

    let mut options = ws.options(MODULE_URL);
    options.vars.insert("Env".to_string(), json!("prod"));
    scaffolder(&fetcher, &lookup).run(&options).await.unwrap();

    assert_eq!(
        ws.read_output("terragrunt.hcl"),
        "terraform {\n  source = \"git::https://github.com/acme/modules.git//compute?ref=v2.0.0\"\n}\ninputs = {\n  env = \"prod\"\n  instance_count = null\n}\n"
    );
    assert!(!ws.output_dir().join("boilerplate.yml").exists());
}

#[tokio::test]
async fn test_explicit_template_wins_over_module_boilerplate() {
    let ws = Workspace::new();
    ws.write_module(&[
        ("variables.tf", COMPUTE_VARIABLES),
        (".boilerplate/boilerplate.yml", ""),
        (".boilerplate/terragrunt.hcl", "from_module = true\n"),
    ]);
    write_tree(
        &ws.root().join("templates/custom"),
        &[
            ("boilerplate.yml", ""),
            ("terragrunt.hcl", "from_template = true\ncount = {{ parsedOptionalInputs | length }}\n"),
        ],
    );
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let mut options = ws.options(MODULE_URL);
    options.template_url = Some("templates/custom".to_string());
    scaffolder(&fetcher, &lookup).run(&options).await.unwrap();

    assert_eq!(ws.read_output("terragrunt.hcl"), "from_template = true\ncount = 1\n");

    let fetched = fetcher.fetched.lock().unwrap().clone();
    assert_eq!(fetched.len(), 2);
    assert!(fetched[1].starts_with("file://"), "{fetched:?}");
    assert!(fetched[1].ends_with("/templates/custom"), "{fetched:?}");
}

#[tokio::test]
async fn test_local_module_directory() {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let outcome = scaffolder(&fetcher, &lookup).run(&ws.options("module")).await.unwrap();

    assert!(outcome.source_url.starts_with("file://"));
    assert!(lookup.calls.lock().unwrap().is_empty());
    assert!(ws.read_output("terragrunt.hcl").contains("instance_count = null"));
}

#[tokio::test]
async fn test_declared_template_variable_without_value_fails() {
    let ws = Workspace::new();
    ws.write_module(&[
        ("variables.tf", COMPUTE_VARIABLES),
        (".boilerplate/boilerplate.yml", "variables:\n  - name: Owner\n"),
        (".boilerplate/terragrunt.hcl", "owner = \"{{ Owner }}\"\n"),
    ]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let err = scaffolder(&fetcher, &lookup).run(&ws.options(MODULE_URL)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScaffoldError>(),
        Some(ScaffoldError::MissingTemplateVariable { name, .. }) if name == "Owner"
    ));
    assert!(!ws.output_dir().join("terragrunt.hcl").exists());
}

#[tokio::test]
async fn test_template_without_config() {
    let ws = Workspace::new();
    ws.write_module(&[
        ("variables.tf", COMPUTE_VARIABLES),
        (".boilerplate/terragrunt.hcl", "a = 1\n"),
    ]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let err = scaffolder(&fetcher, &lookup).run(&ws.options(MODULE_URL)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScaffoldError>(),
        Some(ScaffoldError::TemplateConfigMissing { .. })
    ));

    let mut options = ws.options(MODULE_URL);
    options.missing_config = MissingConfigAction::Ignore;
    scaffolder(&fetcher, &lookup).run(&options).await.unwrap();
    assert_eq!(ws.read_output("terragrunt.hcl"), "a = 1\n");
}

#[tokio::test]
async fn test_formatting_can_be_disabled() {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let mut options = ws.options(MODULE_URL);
    options.format = false;
    scaffolder(&fetcher, &lookup).run(&options).await.unwrap();

    let generated = ws.read_output("terragrunt.hcl");
    assert!(generated.contains("\n  \n"), "{generated}");
}

#[tokio::test]
async fn test_var_files_and_overrides() {
    let ws = Workspace::new();
    ws.write_module(&[
        ("variables.tf", COMPUTE_VARIABLES),
        (
            ".boilerplate/boilerplate.yml",
            "variables:\n  - name: Env\n  - name: Team\n    default: platform\n",
        ),
        (".boilerplate/terragrunt.hcl", "env = \"{{ Env }}\"\nteam = \"{{ Team }}\"\n"),
    ]);
    let var_file = ws.root().join("vars.yml");
    fs::write(&var_file, "Env: staging\nTeam: infra\n").unwrap();
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let mut options = ws.options(MODULE_URL);
    options.var_files = vec![var_file];
    options.vars.insert("Env".to_string(), json!("prod"));
    scaffolder(&fetcher, &lookup).run(&options).await.unwrap();

    assert_eq!(ws.read_output("terragrunt.hcl"), "env = \"prod\"\nteam = \"infra\"\n");
}

#[tokio::test]
async fn test_invalid_generated_hcl_names_the_format_stage() {
    let ws = Workspace::new();
    ws.write_module(&[
        ("variables.tf", COMPUTE_VARIABLES),
        (".boilerplate/boilerplate.yml", ""),
        (".boilerplate/terragrunt.hcl", "inputs = {\n"),
    ]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    let lookup = FakeLookup::with_tag("v1.0.0");

    let err = scaffolder(&fetcher, &lookup).run(&ws.options(MODULE_URL)).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to format generated files");
    assert!(matches!(
        err.downcast_ref::<ScaffoldError>(),
        Some(ScaffoldError::FormatFailed { .. })
    ));

    let reported = tgscaffold_cli::core::user_friendly_error(err);
    assert_eq!(reported.details.as_deref(), Some("Failed to format generated files"));
}
