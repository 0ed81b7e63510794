use std::collections::HashMap;

use crate::router::params::Params;

use super::Match;

pub struct Exact<H>(HashMap<String, H>);

impl<H> Exact<H> {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn add_route(&mut self, pattern: impl Into<String>, handler: H) {
        self.0.insert(pattern.into(), handler);
    }

    pub fn pattern_match(&self, request_target: &str) -> Option<Match<'_, H>> {
        self.0
            .get_key_value(request_target)
            .map(|(pattern, handler)| Match::new(pattern, handler, Params::new_empty()))
    }
}
