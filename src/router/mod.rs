use std::collections::HashMap;

use matcher::MethodTree;
use thiserror::Error;
use tracing::{debug, span, Level};

pub use matcher::Match;
pub use params::Params;

mod matcher;
mod params;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum RouteError {
    #[error("{pattern}: parameter {{{new}}} conflicts with {{{existing}}} at the same position")]
    ConflictingParam {
        pattern: String,
        existing: String,
        new: String,
    },
}

/// Maps a method and a path to the handler registered for it.
///
/// Methods are opaque strings compared exactly; each method owns its own
/// routes. Patterns are split on `/` and each segment is one of:
///
/// - literal text, which the remaining path must start with
/// - `{name}`, which matches one component and binds it to `name`
/// - `*`, which matches one component without binding it
/// - `**`, which matches zero or more trailing components
///
/// A pattern without any `{`, `*` or `?` is looked up by exact string
/// comparison and takes precedence over every other pattern. The remaining
/// patterns are tried in registration order and the first one that fits is
/// returned.
///
/// Routes are added through `&mut self` and matched through `&self`, so a
/// router shared between threads is read-only.
pub struct Router<H> {
    trees: HashMap<String, MethodTree<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
        }
    }

    /// Registers `handler` for `method` and `pattern`. Registering the same
    /// pattern again replaces its handler.
    ///
    /// A `{name}` segment whose name differs from a param already registered
    /// at that position becomes a separate alternative tried after it. Use
    /// [`Router::try_add_route`] to reject such patterns instead.
    pub fn add_route(
        &mut self,
        method: impl Into<String>,
        pattern: impl Into<String>,
        handler: H,
    ) {
        let method = method.into();
        let pattern = pattern.into();
        debug!(%method, %pattern, "add route");
        self.trees
            .entry(method)
            .or_insert_with(MethodTree::new)
            .add_route(pattern, handler);
    }

    /// Like [`Router::add_route`] but fails, leaving the router untouched,
    /// when a `{name}` segment would sit next to a param with another name.
    pub fn try_add_route(
        &mut self,
        method: impl Into<String>,
        pattern: impl Into<String>,
        handler: H,
    ) -> Result<(), RouteError> {
        let method = method.into();
        let pattern = pattern.into();
        if let Some(tree) = self.trees.get(&method) {
            tree.check(&pattern)?;
        }
        self.add_route(method, pattern, handler);
        Ok(())
    }

    pub fn pattern_match(&self, method: &str, path: &str) -> Option<Match<'_, H>> {
        let span = span!(Level::DEBUG, "match", method, path);
        let _guard = span.enter();

        let Some(tree) = self.trees.get(method) else {
            debug!("no routes for method");
            return None;
        };

        let m = tree.pattern_match(path);
        match &m {
            Some(m) => debug!(pattern = m.pattern, params = %m.params, "match"),
            None => debug!("not found"),
        }
        m
    }

    /// Methods under which `path` has a route, sorted.
    pub fn allowed_methods(&self, path: &str) -> Vec<&str> {
        let mut methods = self
            .trees
            .iter()
            .filter_map(|(method, tree)| {
                if tree.pattern_match(path).is_some() {
                    Some(method.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        methods.sort();
        methods
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::{Params, RouteError, Router};

    #[test]
    fn test_static_precedence() {
        let mut router = Router::new();
        router.add_route("GET", "/users/{id}", "user");
        router.add_route("GET", "/users/list", "list");

        let m = router.pattern_match("GET", "/users/list").unwrap();
        assert_eq!(*m.handler, "list");
        assert!(m.params.is_empty());

        let m = router.pattern_match("GET", "/users/42").unwrap();
        assert_eq!(*m.handler, "user");
    }

    #[test]
    fn test_param_capture() {
        let mut router = Router::new();
        router.add_route("GET", "/users/{id}", "user");

        let m = router.pattern_match("GET", "/users/42").unwrap();
        assert_eq!(m.pattern, "/users/{id}");
        assert_eq!(m.params, [("id", "42")].into_iter().collect::<Params>());
    }

    #[test]
    fn test_wildcard_single_segment() {
        let mut router = Router::new();
        router.add_route("GET", "/files/*", "file");

        assert!(router.pattern_match("GET", "/files/a").is_some());
        assert!(router.pattern_match("GET", "/files/a/b").is_none());
    }

    #[test]
    fn test_multi_wildcard() {
        let mut router = Router::new();
        router.add_route("GET", "/assets/**", "assets");

        let tests = ["/assets/a/b/c", "/assets/a", "/assets/", "/assets"];
        for path in tests {
            let m = router.pattern_match("GET", path).unwrap();
            assert_eq!(*m.handler, "assets", "path {}", path);
            assert!(m.params.is_empty());
        }
    }

    #[test]
    fn test_method_isolation() {
        let mut router = Router::new();
        router.add_route("GET", "/x", "get");
        router.add_route("GET", "/y/{id}", "get");

        assert!(router.pattern_match("POST", "/x").is_none());
        assert!(router.pattern_match("POST", "/y/1").is_none());
        assert!(router.pattern_match("get", "/x").is_none());

        router.add_route("POST", "/y/{id}", "post");
        assert_eq!(*router.pattern_match("POST", "/y/1").unwrap().handler, "post");
        assert_eq!(*router.pattern_match("GET", "/y/1").unwrap().handler, "get");
    }

    #[test]
    fn test_param_isolation_across_backtracking() {
        let mut router = Router::new();
        router.add_route("GET", "/a/{x}/c", "c");
        router.add_route("GET", "/a/{x}/d", "d");

        let m = router.pattern_match("GET", "/a/1/d").unwrap();
        assert_eq!(*m.handler, "d");
        assert_eq!(m.params, [("x", "1")].into_iter().collect::<Params>());
    }

    #[test]
    fn test_reregistration_replaces_handler() {
        let mut router = Router::new();
        router.add_route("GET", "/static", 1);
        router.add_route("GET", "/static", 2);
        router.add_route("GET", "/items/{id}", 1);
        router.add_route("GET", "/items/{id}", 2);

        assert_eq!(*router.pattern_match("GET", "/static").unwrap().handler, 2);
        assert_eq!(*router.pattern_match("GET", "/items/3").unwrap().handler, 2);
    }

    #[test]
    fn test_not_found() {
        let mut router = Router::new();
        router.add_route("GET", "/a/{x}/c", "c");

        assert!(router.pattern_match("GET", "/a/1/d").is_none());
        assert!(router.pattern_match("GET", "/unknown").is_none());
        assert!(router.pattern_match("DELETE", "/a/1/c").is_none());
    }

    #[test]
    fn test_conflicting_param_name_last_write_is_sibling() {
        let mut router = Router::new();
        router.add_route("GET", "/u/{id}", "id");
        router.add_route("GET", "/u/{uid}", "uid");

        // both patterns fit, the first one registered wins
        let m = router.pattern_match("GET", "/u/1").unwrap();
        assert_eq!(*m.handler, "id");
        assert_eq!(m.params, [("id", "1")].into_iter().collect::<Params>());
    }

    #[test]
    fn test_try_add_route() {
        let mut router = Router::new();
        router.try_add_route("GET", "/u/{id}/a", "a").unwrap();
        router.try_add_route("GET", "/u/{id}/b", "b").unwrap();
        router.try_add_route("POST", "/u/{uid}", "post").unwrap();

        let err = router.try_add_route("GET", "/u/{uid}/c", "c").unwrap_err();
        assert_eq!(
            err,
            RouteError::ConflictingParam {
                pattern: "/u/{uid}/c".to_owned(),
                existing: "id".to_owned(),
                new: "uid".to_owned(),
            }
        );
        assert_eq!(
            err.to_string(),
            "/u/{uid}/c: parameter {uid} conflicts with {id} at the same position"
        );
        assert!(router.pattern_match("GET", "/u/1/c").is_none());
    }

    #[test]
    fn test_allowed_methods() {
        let mut router = Router::new();
        router.add_route("POST", "/todos", ());
        router.add_route("GET", "/todos", ());
        router.add_route("DELETE", "/todos/{id}", ());

        assert_eq!(router.allowed_methods("/todos"), vec!["GET", "POST"]);
        assert_eq!(router.allowed_methods("/todos/1"), vec!["DELETE"]);
        assert!(router.allowed_methods("/other").is_empty());
    }

    #[test]
    fn test_concurrent_match() {
        let mut router = Router::new();
        router.add_route("GET", "/users/{id}", "user");
        router.add_route("GET", "/assets/**", "assets");
        let router = Arc::new(router);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let router = Arc::clone(&router);
                thread::spawn(move || {
                    let path = format!("/users/{}", i);
                    let m = router.pattern_match("GET", &path).unwrap();
                    assert_eq!(m.params.get("id"), Some(i.to_string().as_str()));
                    assert!(router.pattern_match("GET", "/assets/x/y").is_some());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
