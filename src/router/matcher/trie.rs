use std::iter;

use tracing::trace;

use crate::router::{params::Params, RouteError};

use super::{
    segment::{segments, Segment},
    Match,
};

#[derive(Debug, Eq, PartialEq)]
enum Kind {
    Static(String),
    Param(String),
    Wildcard,
    MultiWildcard,
}

impl Kind {
    fn accepts(&self, segment: &Segment) -> bool {
        match (self, segment) {
            (Kind::Static(literal), Segment::Static(s)) => literal == s,
            (Kind::Param(name), Segment::Param(n)) => name == n,
            (Kind::Wildcard, Segment::Wildcard) => true,
            (Kind::MultiWildcard, Segment::MultiWildcard) => true,
            _ => false,
        }
    }
}

impl From<Segment<'_>> for Kind {
    fn from(segment: Segment<'_>) -> Self {
        match segment {
            Segment::Static(literal) => Kind::Static(literal.to_owned()),
            Segment::Param(name) => Kind::Param(name.to_owned()),
            Segment::Wildcard => Kind::Wildcard,
            Segment::MultiWildcard => Kind::MultiWildcard,
        }
    }
}

type Bindings<'n, 'p> = Vec<(&'n str, &'p str)>;

/// One path segment of the patterned routes of a method.
///
/// Children are kept in insertion order and tried in that order when
/// matching, so the route registered first wins whenever two alternatives
/// both fit a path. The first complete match is returned; no search for a
/// more specific one happens.
#[derive(Debug)]
pub struct Node<H> {
    kind: Kind,
    children: Vec<Node<H>>,
    route: Option<(String, H)>,
}

impl<H> Node<H> {
    pub fn new_root() -> Self {
        Self::new(Kind::Static(String::new()))
    }

    fn new(kind: Kind) -> Self {
        Self {
            kind,
            children: vec![],
            route: None,
        }
    }

    /// Walks the segments of `pattern`, reusing children that have the same
    /// kind and the same literal or parameter name, and attaches the handler
    /// to the last node. A handler already there is replaced.
    pub fn insert(&mut self, pattern: impl Into<String>, handler: H) {
        let pattern = pattern.into();
        let mut node = self;
        for segment in segments(&pattern).map(Segment::classify) {
            trace!(kind = %segment, "insert");
            let idx = match node.children.iter().position(|c| c.kind.accepts(&segment)) {
                Some(idx) => idx,
                None => {
                    node.children.push(Node::new(Kind::from(segment)));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }
        node.route = Some((pattern, handler));
    }

    /// Reports the first position where `pattern` would add a param node next
    /// to an existing param node with a different name.
    pub fn check(&self, pattern: &str) -> Result<(), RouteError> {
        let mut node = self;
        for segment in segments(pattern).map(Segment::classify) {
            if let Some(child) = node.children.iter().find(|c| c.kind.accepts(&segment)) {
                node = child;
                continue;
            }
            if let Segment::Param(new) = segment {
                let existing = node.children.iter().find_map(|c| match &c.kind {
                    Kind::Param(name) => Some(name),
                    _ => None,
                });
                if let Some(existing) = existing {
                    return Err(RouteError::ConflictingParam {
                        pattern: pattern.to_owned(),
                        existing: existing.clone(),
                        new: new.to_owned(),
                    });
                }
            }
            return Ok(());
        }
        Ok(())
    }

    pub fn pattern_match<'n>(&'n self, request_target: &str) -> Option<Match<'n, H>> {
        let mut bindings = vec![];
        let (pattern, handler) = self.find(request_target, 0, &mut bindings)?;
        let params = bindings.into_iter().collect::<Params>();
        Some(Match::new(pattern, handler, params))
    }

    fn find<'n, 'p>(
        &'n self,
        path: &'p str,
        cursor: usize,
        bindings: &mut Bindings<'n, 'p>,
    ) -> Option<&'n (String, H)> {
        if cursor >= path.len() {
            if let Some(route) = &self.route {
                return Some(route);
            }
        }

        for child in &self.children {
            let mark = bindings.len();
            if let Some(route) = child.descend(path, cursor, bindings) {
                return Some(route);
            }
            bindings.truncate(mark);
        }
        None
    }

    /// Tries to consume input at `cursor` with this node's rule and continue
    /// below it.
    fn descend<'n, 'p>(
        &'n self,
        path: &'p str,
        cursor: usize,
        bindings: &mut Bindings<'n, 'p>,
    ) -> Option<&'n (String, H)> {
        // only a multi-wildcard may match nothing
        if cursor >= path.len() && self.kind != Kind::MultiWildcard {
            return None;
        }
        trace!(kind = ?self.kind, cursor, "descend");

        match &self.kind {
            Kind::Static(literal) => {
                // a prefix test: the literal need not end on a `/`
                path[cursor..].strip_prefix(literal.as_str())?;
                let next = skip_separator(path, cursor + literal.len());
                self.find(path, next, bindings)
            }
            Kind::Param(name) => {
                let end = component_end(path, cursor);
                bindings.push((name.as_str(), &path[cursor..end]));
                self.find(path, skip_separator(path, end), bindings)
            }
            Kind::Wildcard => {
                let end = component_end(path, cursor);
                self.find(path, skip_separator(path, end), bindings)
            }
            Kind::MultiWildcard => {
                for split in split_points(path, cursor) {
                    let mark = bindings.len();
                    if let Some(route) = self.find(path, split, bindings) {
                        return Some(route);
                    }
                    bindings.truncate(mark);
                }
                None
            }
        }
    }
}

fn component_end(path: &str, cursor: usize) -> usize {
    path[cursor..]
        .find('/')
        .map_or(path.len(), |offset| cursor + offset)
}

fn skip_separator(path: &str, pos: usize) -> usize {
    if path.as_bytes().get(pos) == Some(&b'/') {
        pos + 1
    } else {
        pos
    }
}

/// Where a multi-wildcard starting at `cursor` may stop, longest first: end
/// of path, then the start of every later component, then `cursor` itself.
/// A split lands just past a `/`, where the next component starts, not on
/// the `/`, so a segment after `**` matches the same way as after any other.
fn split_points(path: &str, cursor: usize) -> impl Iterator<Item = usize> + '_ {
    let bytes = path.as_bytes();
    iter::once(path.len())
        .chain(
            (cursor + 1..path.len())
                .rev()
                .filter(move |&k| bytes[k - 1] == b'/'),
        )
        .chain((cursor < path.len()).then_some(cursor))
}
