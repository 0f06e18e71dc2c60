use anyhow::Result;
use locator_synth::PlatformKind;
use serde_json::json;

use super::output::{emit_structured, OutputFormat};
use super::runtime::LoadedConfig;

pub fn cmd_info(loaded: &LoadedConfig, output: OutputFormat) -> Result<()> {
    let config_path = loaded
        .path
        .as_ref()
        .map(|path| path.display().to_string());
    let platforms: Vec<_> = [PlatformKind::Ios, PlatformKind::Android, PlatformKind::Other]
        .into_iter()
        .map(|platform| {
            let priority: Vec<&str> = platform.priority().iter().map(|s| s.name()).collect();
            (platform, priority)
        })
        .collect();

    let payload = json!({
        "version": env!("CARGO_PKG_VERSION"),
        "buildDate": env!("LOCATOR_SYNTH_BUILD_DATE"),
        "gitCommit": env!("LOCATOR_SYNTH_GIT_HASH"),
        "configPath": config_path,
        "config": loaded.config,
        "priorities": platforms
            .iter()
            .map(|(platform, priority)| (platform.name().to_string(), json!(priority)))
            .collect::<serde_json::Map<_, _>>(),
    });
    if emit_structured(&payload, output)? {
        return Ok(());
    }

    println!("locator-synth v{}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("LOCATOR_SYNTH_BUILD_DATE"));
    println!("Git Commit: {}", env!("LOCATOR_SYNTH_GIT_HASH"));
    println!(
        "Config: {}",
        config_path.as_deref().unwrap_or("(defaults only)")
    );
    println!(
        "Defaults: platform={} context={:?} parallel={}",
        loaded.config.platform, loaded.config.context, loaded.config.parallel
    );
    println!("Strategy priority:");
    for (platform, priority) in &platforms {
        println!("  {:<8} {}", platform.name(), priority.join(", "));
    }
    Ok(())
}
