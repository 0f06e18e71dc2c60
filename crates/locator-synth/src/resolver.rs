//! Traversal orchestration: filter, generate and rank for every node

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::errors::LocatorError;
use crate::oracle::Oracle;
use crate::ranker::rank;
use crate::strategies::{self, simple};
use crate::tree::{NodeId, Tree};
use crate::types::{ElementSummary, LocatorRequest, LocatorResult};

/// Parse `snapshot` and compute locators for every included node.
///
/// Malformed or empty snapshots yield an empty list.
pub fn generate_locators(snapshot: &str, request: &LocatorRequest) -> Vec<LocatorResult> {
    let tree = Tree::parse(snapshot);
    LocatorResolver::new(&tree, request).run()
}

/// Locator generation over one parsed tree
pub struct LocatorResolver<'t> {
    tree: &'t Tree,
    oracle: Oracle<'t>,
    request: &'t LocatorRequest,
}

impl<'t> LocatorResolver<'t> {
    pub fn new(tree: &'t Tree, request: &'t LocatorRequest) -> Self {
        Self {
            tree,
            oracle: Oracle::new(tree),
            request,
        }
    }

    /// Nodes that pass the filter, in document order
    pub fn included(&self) -> Vec<NodeId> {
        let platform = self.request.platform;
        self.tree
            .iter()
            .filter(|id| {
                self.request
                    .filters
                    .should_include(self.tree.node(*id), platform)
            })
            .collect()
    }

    /// Ranked locators for one node, regardless of the filter
    pub fn locate(&self, id: NodeId) -> Result<LocatorResult, LocatorError> {
        let node = self
            .tree
            .get(id)
            .ok_or_else(|| LocatorError::NodeNotFound(format!("#{}", id.index())))?;
        let platform = self.request.platform;
        let context = self.request.context;

        let mut candidates = simple::generate(&self.oracle, node, platform, context);
        for kind in platform.complex_strategies(context) {
            if let Some(candidate) = strategies::generate(*kind, &self.oracle, id)? {
                debug!(
                    path = node.path(),
                    strategy = candidate.strategy.name(),
                    expression = %candidate.expression,
                    "candidate generated"
                );
                candidates.push(candidate);
            }
        }

        Ok(LocatorResult {
            element: ElementSummary::from_node(node),
            locators: rank(platform, candidates),
        })
    }

    /// `locate`, dropping the node with a warning on failure
    pub fn try_locate(&self, id: NodeId) -> Option<LocatorResult> {
        match self.locate(id) {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(
                    path = self.tree.get(id).map(|node| node.path()).unwrap_or_default(),
                    severity = err.severity(),
                    %err,
                    "skipping node"
                );
                None
            }
        }
    }

    /// Results for every included node, in document order
    pub fn run(&self) -> Vec<LocatorResult> {
        if self.tree.is_empty() {
            debug!("empty tree, no locators");
            return Vec::new();
        }

        let included = self.included();
        let results: Vec<LocatorResult> = if self.request.parallel {
            included
                .par_iter()
                .map(|id| self.try_locate(*id))
                .collect::<Vec<Option<LocatorResult>>>()
                .into_iter()
                .flatten()
                .collect()
        } else {
            included.iter().filter_map(|id| self.try_locate(*id)).collect()
        };

        info!(
            platform = %self.request.platform,
            nodes = self.tree.len(),
            included = included.len(),
            results = results.len(),
            "locator generation finished"
        );
        results
    }
}
