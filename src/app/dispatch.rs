use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::cli::commands::{AttributeInput, Cli, Commands};
use ologstyle::Config;
use ologstyle::core::olog::{self, SpecModel, StructuredAttributeSet, StyleParams};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn spec_path(cli: &Cli, config: &Config) -> Result<PathBuf> {
    cli.spec
        .clone()
        .or_else(|| config.spec_path())
        .context("No olog configured: pass --spec or set spec.path in the config file")
}

/// Parse a JSON attribute object and check every value against its domain.
fn parse_attributes(json: &str, model: &SpecModel) -> Result<StructuredAttributeSet> {
    let attributes: StructuredAttributeSet = serde_json::from_str(json)
        .context("--attributes must be a JSON object mapping attribute axes to strings")?;
    model.validate_attributes(&attributes)?;
    Ok(attributes)
}

fn resolve_input(input: &AttributeInput, model: &SpecModel) -> Result<StructuredAttributeSet> {
    match (&input.text, &input.attributes) {
        (Some(text), _) => Ok(olog::extract_attributes(text, model)),
        (None, Some(json)) => parse_attributes(json, model),
        (None, None) => bail!("either --text or --attributes is required"),
    }
}

#[derive(Serialize)]
struct TransformOutput<'a> {
    #[serde(flatten)]
    result: &'a olog::TransformationResult,
    coherent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rendered: Option<olog::RenderedDescription>,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    path: String,
    valid: bool,
    warnings: &'a [String],
    #[serde(flatten)]
    summary: olog::MetadataReport,
}

pub fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let path = spec_path(&cli, &config)?;
    let model = config
        .spec_loader()
        .load_path(&path)
        .with_context(|| format!("Failed to load olog {}", path.display()))?;

    match cli.command {
        Commands::Categories => print_json(&olog::list_categories(&model)),

        Commands::Extract { text, evidence } => {
            if evidence {
                print_json(&model.extractor().extract_with_evidence(&text))
            } else {
                print_json(&olog::extract_attributes(&text, &model))
            }
        }

        Commands::Transform {
            input,
            category,
            params,
            strict,
            render,
        } => {
            let attributes = resolve_input(&input, &model)?;
            let request: StyleParams = params.into_iter().collect();
            let params = config.merged_params(&request);
            let result = olog::transform(&attributes, &category, &params, &model)?;
            let rendered = if render {
                Some(olog::render(&result, &model)?)
            } else {
                None
            };
            print_json(&TransformOutput {
                result: &result,
                coherent: result.is_coherent(),
                rendered,
            })?;

            let violations = result.violations().count();
            if (strict || config.engine.strict) && violations > 0 {
                bail!("{violations} coherence constraint(s) violated for `{category}`");
            }
            Ok(())
        }

        Commands::Check { input, category } => {
            let attributes = resolve_input(&input, &model)?;
            print_json(&olog::check(&attributes, &category, &model)?)
        }

        Commands::Refine {
            input,
            category,
            params,
            overrides,
        } => {
            let attributes = resolve_input(&input, &model)?;
            let request: StyleParams = params.into_iter().collect();
            let params = config.merged_params(&request);
            let mut result = olog::transform(&attributes, &category, &params, &model)?;
            for (axis, value) in &overrides {
                result = olog::refine(&result, *axis, value, &model)?;
            }
            print_json(&TransformOutput {
                result: &result,
                coherent: result.is_coherent(),
                rendered: None,
            })
        }

        Commands::Explain { category } => print_json(&olog::explain(&category, &model)?),

        Commands::Rules { category } => print_json(&olog::category_rules(&category, &model)?),

        Commands::Suggest { text } => {
            let attributes = olog::extract_attributes(&text, &model);
            print_json(&olog::suggest_category(&text, &attributes, &model))
        }

        Commands::Variants {
            input,
            category,
            count,
        } => {
            let attributes = resolve_input(&input, &model)?;
            let count = count.unwrap_or(config.engine.variant_count);
            print_json(&olog::generate_variants(&attributes, &category, count, &model)?)
        }

        Commands::Validate => {
            info!(path = %path.display(), warnings = model.warnings().len(), "olog valid");
            print_json(&ValidationReport {
                path: path.display().to_string(),
                valid: true,
                warnings: model.warnings(),
                summary: olog::metadata(&model),
            })
        }

        Commands::Metadata => print_json(&olog::metadata(&model)),
    }
}
