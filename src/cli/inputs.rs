//! `tgscaffold inputs`: list the input variables of a local module.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::variables::{InputDescriptor, InputSet, classify, extract_inputs};

/// Output format for `inputs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// List the required and optional inputs of a module directory.
#[derive(Args, Debug)]
pub struct InputsCommand {
    /// Module directory to scan for `*.tf` files.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl InputsCommand {
    pub fn execute(self) -> Result<()> {
        let inputs = classify(extract_inputs(&self.dir)?);
        let rendered = match self.format {
            OutputFormat::Text => render_text(&inputs),
            OutputFormat::Json => serde_json::to_string_pretty(&inputs)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

fn render_text(inputs: &InputSet) -> String {
    if inputs.is_empty() {
        return "No input variables found".to_string();
    }

    let mut out = String::new();
    push_section(&mut out, "Required inputs", &inputs.required);
    push_section(&mut out, "Optional inputs", &inputs.optional);
    out.trim_end().to_string()
}

fn push_section(out: &mut String, title: &str, descriptors: &[InputDescriptor]) {
    if descriptors.is_empty() {
        return;
    }

    out.push_str(&format!("{} ({})\n", title.bold(), descriptors.len()));
    for input in descriptors {
        out.push_str(&format!("  {}  {}\n", input.name.cyan(), input.type_name.dimmed()));
        out.push_str(&format!("      {}\n", input.description));
        if !input.is_required() {
            out.push_str(&format!("      default: {}\n", input.default_value));
        }
    }
    out.push('\n');
}
