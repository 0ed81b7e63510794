use std::io::Write;

use clap::{ArgAction, Parser};
use thiserror::Error;
use tracing::{info, Level};

use crate::router::Router;

#[derive(Parser, Debug)]
#[command(version, about = "Resolve requests against a set of route patterns")]
pub struct Args {
    /// Route to register as "METHOD PATTERN", e.g. "GET /users/{id}". Repeatable.
    #[arg(short, long = "route", value_name = "ROUTE")]
    pub routes: Vec<String>,

    /// Reject a route whose parameter name differs from an earlier route at
    /// the same position.
    #[arg(long)]
    pub strict: bool,

    /// More logging: -v for debug, -vv for trace.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Requests to resolve as "METHOD PATH".
    #[arg(required = true, value_name = "REQUEST")]
    pub requests: Vec<String>,
}

impl Args {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[derive(Error, Debug)]
#[error("invalid {kind} {line:?}, expected \"METHOD PATH\"")]
pub struct InvalidLine {
    kind: &'static str,
    line: String,
}

fn split_line<'a>(kind: &'static str, line: &'a str) -> Result<(&'a str, &'a str), InvalidLine> {
    let invalid = || InvalidLine {
        kind,
        line: line.to_owned(),
    };
    let (method, path) = line.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let path = path.trim();
    if path.is_empty() {
        Err(invalid())?
    }
    Ok((method, path))
}

/// Registers every route of `args` in order. The handler is the route's index.
pub fn build_router(args: &Args) -> anyhow::Result<Router<usize>> {
    let mut router = Router::new();
    for (idx, line) in args.routes.iter().enumerate() {
        let (method, pattern) = split_line("route", line)?;
        if args.strict {
            router.try_add_route(method, pattern, idx)?;
        } else {
            router.add_route(method, pattern, idx);
        }
    }
    info!(routes = args.routes.len(), "router ready");
    Ok(router)
}

pub fn run(args: &Args, out: &mut impl Write) -> anyhow::Result<()> {
    let router = build_router(args)?;
    for line in &args.requests {
        let (method, path) = split_line("request", line)?;
        let Some(m) = router.pattern_match(method, path) else {
            let allowed = router.allowed_methods(path);
            if allowed.is_empty() {
                writeln!(out, "{} {} -> not found", method, path)?;
            } else {
                writeln!(
                    out,
                    "{} {} -> not found (allowed: {})",
                    method,
                    path,
                    allowed.join(", ")
                )?;
            }
            continue;
        };
        writeln!(out, "{} {} -> {} {}", method, path, m.pattern, m.params)?;
    }
    Ok(())
}
