pub use exact::Exact;
pub use tree::MethodTree;
pub use trie::Node;

use crate::router::params::Params;

mod exact;
mod segment;
mod tree;
mod trie;

#[derive(Debug)]
pub struct Match<'r, H> {
    /// The pattern the matching route was registered with.
    pub pattern: &'r str,
    pub handler: &'r H,
    pub params: Params,
}

impl<'r, H> Match<'r, H> {
    fn new(pattern: &'r str, handler: &'r H, params: Params) -> Self {
        Self {
            pattern,
            handler,
            params,
        }
    }
}
