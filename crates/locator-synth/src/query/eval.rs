//! Path-query evaluation against a [`Tree`]

use std::collections::BTreeSet;

use super::parser::{Condition, NodeTest, PathExpr, Predicate, Step, StepKind};
use crate::tree::{Node, NodeId, Tree};

/// Evaluation context: the document itself sits above the root element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Ctx {
    Document,
    Node(NodeId),
}

pub(crate) fn evaluate(tree: &Tree, expr: &PathExpr) -> Vec<NodeId> {
    eval_path(tree, expr)
        .into_iter()
        .filter_map(|ctx| match ctx {
            Ctx::Node(id) => Some(id),
            Ctx::Document => None,
        })
        .collect()
}

fn eval_path(tree: &Tree, expr: &PathExpr) -> Vec<Ctx> {
    match expr {
        PathExpr::Location(steps) => apply_steps(tree, vec![Ctx::Document], steps),
        PathExpr::Filter {
            inner,
            predicates,
            steps,
        } => {
            let selected = apply_predicates(tree, eval_path(tree, inner), predicates);
            apply_steps(tree, selected, steps)
        }
    }
}

fn apply_steps(tree: &Tree, mut contexts: Vec<Ctx>, steps: &[Step]) -> Vec<Ctx> {
    for step in steps {
        if contexts.is_empty() {
            break;
        }
        contexts = apply_step(tree, contexts, step);
    }
    contexts
}

fn apply_step(tree: &Tree, contexts: Vec<Ctx>, step: &Step) -> Vec<Ctx> {
    let bases = if step.descendant {
        descendant_or_self(tree, &contexts)
    } else {
        contexts
    };

    let mut selected = BTreeSet::new();
    for base in bases {
        let candidates: Vec<Ctx> = match &step.kind {
            StepKind::Element(test) => children(tree, base)
                .into_iter()
                .filter(|ctx| matches_test(tree, *ctx, test))
                .collect(),
            StepKind::SelfNode => vec![base],
            StepKind::Parent => parent(tree, base).into_iter().collect(),
        };
        selected.extend(apply_predicates(tree, candidates, &step.predicates));
    }
    selected.into_iter().collect()
}

fn apply_predicates(
    tree: &Tree,
    mut candidates: Vec<Ctx>,
    predicates: &[Predicate],
) -> Vec<Ctx> {
    for predicate in predicates {
        let size = candidates.len();
        candidates = candidates
            .into_iter()
            .enumerate()
            .filter(|(index, ctx)| match predicate {
                Predicate::Position(position) => index + 1 == *position,
                Predicate::Last => index + 1 == size,
                Predicate::Condition(condition) => match ctx {
                    Ctx::Node(id) => holds(tree.node(*id), condition),
                    Ctx::Document => false,
                },
            })
            .map(|(_, ctx)| ctx)
            .collect();
    }
    candidates
}

fn holds(node: &Node, condition: &Condition) -> bool {
    let raw = |name: &str| node.attributes().get(name).map(String::as_str);
    match condition {
        Condition::HasAttr(name) => raw(name.as_str()).is_some(),
        Condition::AttrEquals {
            name,
            value,
            negate,
        } => match raw(name.as_str()) {
            Some(actual) => (actual == value.as_str()) != *negate,
            None => false,
        },
        Condition::Contains { name, value } => {
            raw(name.as_str()).is_some_and(|v| v.contains(value.as_str()))
        }
        Condition::StartsWith { name, value } => {
            raw(name.as_str()).is_some_and(|v| v.starts_with(value.as_str()))
        }
        Condition::Not(inner) => !holds(node, inner),
        Condition::And(left, right) => holds(node, left) && holds(node, right),
        Condition::Or(left, right) => holds(node, left) || holds(node, right),
    }
}

fn matches_test(tree: &Tree, ctx: Ctx, test: &NodeTest) -> bool {
    match (ctx, test) {
        (Ctx::Document, _) => false,
        (Ctx::Node(_), NodeTest::Any) => true,
        (Ctx::Node(id), NodeTest::Name(name)) => tree.node(id).tag() == name,
    }
}

fn children(tree: &Tree, ctx: Ctx) -> Vec<Ctx> {
    match ctx {
        Ctx::Document => tree.root().map(Ctx::Node).into_iter().collect(),
        Ctx::Node(id) => tree.children(id).iter().copied().map(Ctx::Node).collect(),
    }
}

fn parent(tree: &Tree, ctx: Ctx) -> Option<Ctx> {
    match ctx {
        Ctx::Document => None,
        Ctx::Node(id) => Some(tree.parent(id).map_or(Ctx::Document, Ctx::Node)),
    }
}

fn descendant_or_self(tree: &Tree, contexts: &[Ctx]) -> Vec<Ctx> {
    let mut expanded = BTreeSet::new();
    for ctx in contexts {
        match ctx {
            Ctx::Document => {
                expanded.insert(Ctx::Document);
                expanded.extend(tree.iter().map(Ctx::Node));
            }
            Ctx::Node(id) => {
                let mut stack = vec![*id];
                while let Some(current) = stack.pop() {
                    if expanded.insert(Ctx::Node(current)) {
                        stack.extend(tree.children(current).iter().copied());
                    }
                }
            }
        }
    }
    expanded.into_iter().collect()
}
