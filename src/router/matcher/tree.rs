use tracing::debug;

use crate::router::RouteError;

use super::{segment::is_static_path, Exact, Match, Node};

/// Routes of a single method: fully static patterns in an exact map, every
/// other pattern in a trie.
pub struct MethodTree<H> {
    exact: Exact<H>,
    trie: Node<H>,
}

impl<H> MethodTree<H> {
    pub fn new() -> Self {
        Self {
            exact: Exact::new(),
            trie: Node::new_root(),
        }
    }

    pub fn add_route(&mut self, pattern: impl Into<String>, handler: H) {
        let pattern = pattern.into();
        if is_static_path(&pattern) {
            debug!(%pattern, "static route");
            self.exact.add_route(pattern, handler);
            return;
        }
        debug!(%pattern, "trie route");
        self.trie.insert(pattern, handler);
    }

    pub fn check(&self, pattern: &str) -> Result<(), RouteError> {
        if is_static_path(pattern) {
            return Ok(());
        }
        self.trie.check(pattern)
    }

    pub fn pattern_match(&self, request_target: &str) -> Option<Match<'_, H>> {
        if let Some(m) = self.exact.pattern_match(request_target) {
            return Some(m);
        }
        self.trie.pattern_match(request_target)
    }
}
