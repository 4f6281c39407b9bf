//! `tgscaffold scaffold`: generate a terragrunt.hcl for a module.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::constants::GITHUB_TOKEN_ENV;
use crate::fetch::SourceFetcher;
use crate::format::HclFormatter;
use crate::release::GitHubReleaseLookup;
use crate::scaffold::{ScaffoldOptions, Scaffolder, parse_vars};
use crate::templating::{MissingConfigAction, MissingKeyAction};

/// Generate a scaffold for a module.
#[derive(Args, Debug)]
pub struct ScaffoldCommand {
    /// Module locator: git URL, `github.com/org/repo//path` or local directory.
    #[arg(value_name = "MODULE_URL")]
    pub module_url: String,

    /// Template locator. Defaults to the module's `.boilerplate/` directory,
    /// then to the built-in template.
    #[arg(value_name = "TEMPLATE_URL")]
    pub template_url: Option<String>,

    /// Directory to write the scaffold into.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Template variable as NAME=VALUE. Repeatable; wins over var files.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// YAML file of template variables. Repeatable; later files win.
    #[arg(long = "var-file", value_name = "PATH")]
    pub var_files: Vec<PathBuf>,

    /// Token for the release lookup API.
    #[arg(long, env = GITHUB_TOKEN_ENV, hide_env_values = true)]
    pub github_token: Option<String>,

    /// Skip formatting the generated HCL.
    #[arg(long)]
    pub no_format: bool,

    /// What to do when a template references an undefined variable.
    #[arg(long, value_enum, default_value_t = MissingKeyAction::Invalid)]
    pub missing_key_action: MissingKeyAction,

    /// What to do when the template has no boilerplate.yml.
    #[arg(long, value_enum, default_value_t = MissingConfigAction::Exit)]
    pub missing_config_action: MissingConfigAction,
}

impl ScaffoldCommand {
    pub async fn execute(self) -> Result<()> {
        let working_dir = std::env::current_dir().context("Failed to determine current directory")?;
        let output_dir = match self.output_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => working_dir.join(dir),
            None => working_dir.clone(),
        };

        let options = ScaffoldOptions {
            module_url: self.module_url,
            template_url: self.template_url,
            output_dir,
            working_dir,
            vars: parse_vars(&self.vars)?,
            var_files: self.var_files,
            format: !self.no_format,
            missing_key: self.missing_key_action,
            missing_config: self.missing_config_action,
        };

        let scaffolder = Scaffolder::new(
            Box::new(SourceFetcher::new()),
            Box::new(GitHubReleaseLookup::new(self.github_token)?),
            Box::new(HclFormatter::new()),
        );
        let outcome = scaffolder.run(&options).await?;

        for file in &outcome.files {
            let shown = file.strip_prefix(&options.output_dir).unwrap_or(file);
            println!("{} {}", "Generated".green().bold(), shown.display());
        }
        println!("{} {}", "Source".dimmed(), outcome.source_url);

        Ok(())
    }
}
