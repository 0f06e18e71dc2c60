use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

/// Print `payload` in a structured format. Returns `false` for `Human`, which
/// each command renders itself.
pub fn emit_structured<T: Serialize + ?Sized>(payload: &T, output: OutputFormat) -> Result<bool> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(payload)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(payload)?),
        OutputFormat::Human => return Ok(false),
    }
    Ok(true)
}
