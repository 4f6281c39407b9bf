//! Template used when neither the user nor the module provides one.

use anyhow::Result;
use std::path::Path;

use crate::constants::{BOILERPLATE_CONFIG_FILE, DEFAULT_TEMPLATE_FILE};
use crate::utils::fs::write_file;

/// Declares the two source URL variables with their defaults.
pub const DEFAULT_BOILERPLATE_CONFIG: &str = r#"variables:
  - name: SourceUrlType
    description: Source URL type, git-https or git-ssh
    default: git-https
  - name: SourceGitSshUser
    description: Default git SSH user
    default: git
"#;

/// `terragrunt.hcl` pointing at the module with one entry per input.
pub const DEFAULT_TERRAGRUNT_TEMPLATE: &str = r#"# This is a Terragrunt module generated by tgscaffold.
terraform {
  source = "{{ sourceUrl }}"
}

inputs = {
  # --------------------------------------------------------------------------------------------------------------------
  # Required input variables
  # --------------------------------------------------------------------------------------------------------------------
  {% for input in parsedRequiredInputs %}
  # Description: {{ input.Description }}
  # Type: {{ input.Type }}
  {{ input.Name }} = null  # TODO: fill in value
  {% endfor %}

  # --------------------------------------------------------------------------------------------------------------------
  # Optional input variables
  # Uncomment the ones you wish to set
  # --------------------------------------------------------------------------------------------------------------------
  {% for input in parsedOptionalInputs %}
  # Description: {{ input.Description }}
  # Type: {{ input.Type }}
  # {{ input.Name }} = {{ input.DefaultValue }}
  {% endfor %}
}
"#;

/// Write the default template folder into `dir`.
pub fn write_default_template(dir: &Path) -> Result<()> {
    write_file(&dir.join(DEFAULT_TEMPLATE_FILE), DEFAULT_TERRAGRUNT_TEMPLATE)?;
    write_file(&dir.join(BOILERPLATE_CONFIG_FILE), DEFAULT_BOILERPLATE_CONFIG)?;
    tracing::debug!(target: "render", "Wrote default template into {}", dir.display());
    Ok(())
}
