use clap::Subcommand;

use super::generate::GenerateArgs;
use super::query::QueryArgs;
use super::tree::TreeArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Generate ranked locators for every element of a snapshot
    Generate(GenerateArgs),

    /// Evaluate a path query against a snapshot
    Query(QueryArgs),

    /// Print the parsed snapshot outline with node paths
    Tree(TreeArgs),

    /// Show build information and the effective configuration
    Info,
}
