//! The variable map handed to the template renderer.

use serde_json::{Map, Value as JsonValue, json};

use crate::constants::{OPTIONAL_INPUTS_KEY, REQUIRED_INPUTS_KEY, SOURCE_URL_KEY};
use crate::variables::{InputDescriptor, InputSet};

/// Insertion-ordered render context for one scaffold run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScaffoldContext {
    vars: Map<String, JsonValue>,
}

impl ScaffoldContext {
    /// Merge user variables, the classified inputs and the final locator.
    ///
    /// User variables come first and win for their own keys. `sourceUrl`,
    /// `parsedRequiredInputs` and `parsedOptionalInputs` are always set by the
    /// pipeline and replace any user entry of the same name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::{Map, json};
    /// use tgscaffold_cli::scaffold::ScaffoldContext;
    /// use tgscaffold_cli::variables::InputSet;
    ///
    /// let mut user = Map::new();
    /// user.insert("sourceUrl".to_string(), json!("ignored"));
    /// user.insert("SourceUrlType".to_string(), json!("git-ssh"));
    ///
    /// let ctx = ScaffoldContext::assemble(&user, &InputSet::default(), "git@github.com:org/repo");
    /// assert_eq!(ctx.get("sourceUrl"), Some(&json!("git@github.com:org/repo")));
    /// assert_eq!(ctx.get("SourceUrlType"), Some(&json!("git-ssh")));
    /// assert_eq!(ctx.get("parsedRequiredInputs"), Some(&json!([])));
    /// ```
    #[must_use]
    pub fn assemble(user_vars: &Map<String, JsonValue>, inputs: &InputSet, source_url: &str) -> Self {
        let mut vars = user_vars.clone();
        vars.insert(SOURCE_URL_KEY.to_string(), JsonValue::String(source_url.to_string()));
        vars.insert(REQUIRED_INPUTS_KEY.to_string(), descriptors_value(&inputs.required));
        vars.insert(OPTIONAL_INPUTS_KEY.to_string(), descriptors_value(&inputs.optional));
        Self { vars }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.vars.get(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.vars
    }
}

fn descriptors_value(descriptors: &[InputDescriptor]) -> JsonValue {
    JsonValue::Array(
        descriptors
            .iter()
            .map(|d| {
                json!({
                    "Name": d.name,
                    "Description": d.description,
                    "Type": d.type_name,
                    "DefaultValue": d.default_value,
                })
            })
            .collect(),
    )
}
