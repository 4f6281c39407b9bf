//! Global constants used throughout the tgscaffold codebase.
//!
//! This module contains the variable names, defaults, file names and
//! timeouts that are shared between the source resolver, the extractor,
//! the template renderer and the CLI. Defining them centrally keeps the
//! names templates rely on in one discoverable place.

use std::time::Duration;

/// Override variable selecting how the module source URL is written.
pub const SOURCE_URL_TYPE_VAR: &str = "SourceUrlType";

/// Override variable naming the user for SSH-style source URLs.
pub const SOURCE_GIT_SSH_USER_VAR: &str = "SourceGitSshUser";

/// `SourceUrlType` value requesting the `user@host:path` SSH form.
pub const SOURCE_URL_TYPE_SSH: &str = "git-ssh";

/// Default user for SSH-style source URLs.
pub const DEFAULT_GIT_SSH_USER: &str = "git";

/// Context key holding the final module locator.
pub const SOURCE_URL_KEY: &str = "sourceUrl";

/// Context key holding inputs without a default.
pub const REQUIRED_INPUTS_KEY: &str = "parsedRequiredInputs";

/// Context key holding inputs with a default.
pub const OPTIONAL_INPUTS_KEY: &str = "parsedOptionalInputs";

/// Query parameter carrying the version reference of a locator.
pub const REF_QUERY_PARAM: &str = "ref";

/// Extension of Terraform declaration files scanned for variables.
pub const DECLARATION_FILE_EXTENSION: &str = "tf";

/// Block kind holding an input variable declaration.
pub const VARIABLE_BLOCK: &str = "variable";

/// Directory inside a module that carries its own scaffold template.
pub const DEFAULT_BOILERPLATE_DIR: &str = ".boilerplate";

/// Template configuration file declaring template variables.
pub const BOILERPLATE_CONFIG_FILE: &str = "boilerplate.yml";

/// File name of the default scaffold template.
pub const DEFAULT_TEMPLATE_FILE: &str = "terragrunt.hcl";

/// Extension of files touched by the formatter.
pub const HCL_FILE_EXTENSION: &str = "hcl";

/// Terragrunt cache directory, never formatted.
pub const TERRAGRUNT_CACHE_DIR: &str = ".terragrunt-cache";

/// Environment variable the CLI reads the release lookup token from.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_OAUTH_TOKEN";

/// Timeout for Git clone operations (120 seconds).
///
/// Clone operations may take a while for large repositories, but a hung
/// authentication prompt must not block the run forever.
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for the latest-release HTTP request (15 seconds).
pub const RELEASE_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);
