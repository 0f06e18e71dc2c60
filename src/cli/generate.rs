use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use locator_synth::{generate_locators, AppContext, LocatorRequest, LocatorResult, PlatformKind};
use tokio::fs;
use tracing::info;

use super::output::{emit_structured, OutputFormat};
use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Hierarchy snapshot (XML page source)
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,

    /// Platform or automation name (ios, xcuitest, android, uiautomator2, ...)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Context the snapshot was taken in (native, web or a WEBVIEW_* name)
    #[arg(long)]
    pub context: Option<String>,

    /// Only generate locators for these tags
    #[arg(long = "include-tag", value_name = "TAG")]
    pub include_tags: Vec<String>,

    /// Skip these tags, in addition to the configured ones
    #[arg(long = "exclude-tag", value_name = "TAG")]
    pub exclude_tags: Vec<String>,

    /// Require at least one of these attributes
    #[arg(long = "require-attr", value_name = "ATTR")]
    pub require_attrs: Vec<String>,

    /// Minimum number of attributes on a node
    #[arg(long = "min-attrs", value_name = "N")]
    pub min_attrs: Option<usize>,

    /// Only interactable elements
    #[arg(long)]
    pub fetchable_only: bool,

    /// Only elements with clickable="true"
    #[arg(long)]
    pub clickable_only: bool,

    /// Evaluate nodes in parallel
    #[arg(long)]
    pub parallel: bool,
}

impl GenerateArgs {
    /// Configured request with command line flags applied on top
    pub fn request(&self, config: &Config) -> LocatorRequest {
        let mut request = config.request();
        if let Some(platform) = &self.platform {
            request.platform = PlatformKind::from_token(platform);
        }
        if let Some(context) = &self.context {
            request.context = AppContext::from_token(context);
        }

        let filters = &mut request.filters;
        filters
            .include_tag_names
            .extend(self.include_tags.iter().cloned());
        filters
            .exclude_tag_names
            .extend(self.exclude_tags.iter().cloned());
        filters
            .require_attributes
            .extend(self.require_attrs.iter().cloned());
        if let Some(min_attrs) = self.min_attrs {
            filters.min_attribute_count = min_attrs;
        }
        filters.fetchable_only |= self.fetchable_only;
        filters.clickable_only |= self.clickable_only;
        request.parallel |= self.parallel;
        request
    }
}

pub async fn cmd_generate(args: GenerateArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let snapshot = fs::read_to_string(&args.source)
        .await
        .with_context(|| format!("Failed to read snapshot {}", args.source.display()))?;
    let request = args.request(config);

    info!(
        source = %args.source.display(),
        platform = %request.platform,
        parallel = request.parallel,
        "generating locators"
    );
    let results = generate_locators(&snapshot, &request);

    if !emit_structured(&results, output)? {
        print_human(&results);
    }
    Ok(())
}

fn print_human(results: &[LocatorResult]) {
    if results.is_empty() {
        println!("No elements matched");
        return;
    }
    for result in results {
        let element = &result.element;
        let path = if element.path.is_empty() {
            "/"
        } else {
            element.path.as_str()
        };
        if element.text.is_empty() {
            println!("[{}] {}", path, element.tag_name);
        } else {
            println!("[{}] {} \"{}\"", path, element.tag_name, element.text);
        }
        for (strategy, expression) in &result.locators {
            println!("    {:<22} {}", strategy.name(), expression);
        }
    }
    println!("{} element(s)", results.len());
}
