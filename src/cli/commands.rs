use clap::{Args, Parser, Subcommand};
use ologstyle::core::olog::AttributeAxis;
use std::path::PathBuf;
use std::str::FromStr;

/// `ologstyle` - apply olog-defined design aesthetics to free-text descriptions.
#[derive(Parser, Debug)]
#[command(name = "ologstyle")]
#[command(version)]
#[command(
    about = "Olog-driven aesthetic transformation and coherence checking.",
    long_about = None
)]
pub struct Cli {
    /// Olog document (defaults to `spec.path` from the config)
    #[arg(long, global = true)]
    pub spec: Option<PathBuf>,

    /// Config file (defaults to ~/.ologstyle/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the attribute set comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct AttributeInput {
    /// Free-text description to extract attributes from
    #[arg(long)]
    pub text: Option<String>,

    /// Attribute set as JSON, e.g. '{"subject":"animal","palette":"muted"}'
    #[arg(long)]
    pub attributes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the categories the olog declares
    Categories,

    /// Extract structured attributes from a description
    Extract {
        text: String,

        /// Also report which phrase decided each axis
        #[arg(long)]
        evidence: bool,
    },

    /// Apply a category's rules and check its constraints
    Transform {
        #[command(flatten)]
        input: AttributeInput,

        #[arg(short, long)]
        category: String,

        /// Style parameter override, e.g. `energy_level=0.9` (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Fail when any coherence constraint is violated
        #[arg(long)]
        strict: bool,

        /// Include the rendered description
        #[arg(long)]
        render: bool,
    },

    /// Check an attribute set against a category's constraints
    Check {
        #[command(flatten)]
        input: AttributeInput,

        #[arg(short, long)]
        category: String,
    },

    /// Transform, then pin individual axes by hand and re-check
    Refine {
        #[command(flatten)]
        input: AttributeInput,

        #[arg(short, long)]
        category: String,

        /// Style parameter override, e.g. `energy_level=0.9` (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Axis to pin after the rules ran, e.g. `palette=bright` (repeatable)
        #[arg(short = 's', long = "set", value_parser = parse_override, required = true)]
        overrides: Vec<(AttributeAxis, String)>,
    },

    /// Show a category's profile and rationale
    Explain { category: String },

    /// List a category's rules and constraints
    Rules { category: String },

    /// Rank categories for a description
    Suggest { text: String },

    /// Transform once per style preset
    Variants {
        #[command(flatten)]
        input: AttributeInput,

        #[arg(short, long)]
        category: String,

        /// Number of presets to run (1-5; defaults to `engine.variant_count`)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Load and validate the olog, reporting warnings
    Validate,

    /// Show olog metadata
    Metadata,
}

fn parse_param(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn parse_override(raw: &str) -> Result<(AttributeAxis, String), String> {
    let (axis, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected AXIS=VALUE, got `{raw}`"))?;
    let axis = AttributeAxis::from_str(axis.trim())
        .map_err(|_| format!("`{}` is not an attribute axis", axis.trim()))?;
    Ok((axis, value.trim().to_string()))
}
