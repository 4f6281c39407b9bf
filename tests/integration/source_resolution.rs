//! Ref pinning and URL form as they end up in generated files.

use serde_json::json;

use crate::common::{COMPUTE_VARIABLES, FakeLookup, FixtureFetcher, Workspace, scaffolder};

fn module_workspace() -> (Workspace, FixtureFetcher) {
    let ws = Workspace::new();
    ws.write_module(&[("variables.tf", COMPUTE_VARIABLES)]);
    let fetcher = FixtureFetcher::new(&ws.module_dir());
    (ws, fetcher)
}

#[tokio::test]
async fn test_ssh_form_only_changes_generated_source() {
    let (ws, fetcher) = module_workspace();
    let lookup = FakeLookup::with_tag("v1.2.3");

    let mut options = ws.options("git::https://github.com/acme/modules.git//compute");
    options.vars.insert("SourceUrlType".to_string(), json!("git-ssh"));
    let outcome = scaffolder(&fetcher, &lookup).run(&options).await.unwrap();

    assert_eq!(outcome.source_url, "git@github.com:acme/modules.git//compute?ref=v1.2.3");
    assert!(
        ws.read_output("terragrunt.hcl")
            .contains("source = \"git@github.com:acme/modules.git//compute?ref=v1.2.3\"")
    );

    let fetched = fetcher.fetched.lock().unwrap().clone();
    assert_eq!(fetched, ["git::https://github.com/acme/modules.git//compute?ref=v1.2.3"]);
}

#[tokio::test]
async fn test_custom_ssh_user() {
    let (ws, fetcher) = module_workspace();
    let lookup = FakeLookup::with_tag("v1.2.3");

    let mut options = ws.options("git::https://github.com/acme/modules.git//compute");
    options.vars.insert("SourceUrlType".to_string(), json!("git-ssh"));
    options.vars.insert("SourceGitSshUser".to_string(), json!("deploy"));
    let outcome = scaffolder(&fetcher, &lookup).run(&options).await.unwrap();

    assert_eq!(outcome.source_url, "deploy@github.com:acme/modules.git//compute?ref=v1.2.3");
}

#[tokio::test]
async fn test_github_shorthand_is_pinned() {
    let (ws, fetcher) = module_workspace();
    let lookup = FakeLookup::with_tag("v3.0.0");

    let outcome = scaffolder(&fetcher, &lookup)
        .run(&ws.options("github.com/acme/modules//compute"))
        .await
        .unwrap();

    assert_eq!(outcome.source_url, "git::https://github.com/acme/modules.git//compute?ref=v3.0.0");
    assert_eq!(*lookup.calls.lock().unwrap(), ["github.com/acme/modules"]);
}

#[tokio::test]
async fn test_explicit_ref_skips_lookup() {
    let (ws, fetcher) = module_workspace();
    let lookup = FakeLookup::with_tag("v9.9.9");

    let outcome = scaffolder(&fetcher, &lookup)
        .run(&ws.options("git::https://github.com/acme/modules.git//compute?ref=v1.0.0"))
        .await
        .unwrap();

    assert_eq!(outcome.source_url, "git::https://github.com/acme/modules.git//compute?ref=v1.0.0");
    assert!(lookup.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_lookup_leaves_source_unpinned() {
    let (ws, fetcher) = module_workspace();
    let lookup = FakeLookup::failing();

    let outcome = scaffolder(&fetcher, &lookup)
        .run(&ws.options("git::https://github.com/acme/modules.git//compute"))
        .await
        .unwrap();

    assert_eq!(outcome.source_url, "git::https://github.com/acme/modules.git//compute");
    assert_eq!(lookup.calls.lock().unwrap().len(), 1);
    assert!(
        ws.read_output("terragrunt.hcl")
            .contains("source = \"git::https://github.com/acme/modules.git//compute\"")
    );
}
