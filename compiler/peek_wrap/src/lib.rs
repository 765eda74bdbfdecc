//! Expression wrapping.
//!
//! [`wrap`] rewrites a program so that the value of almost every expression
//! can be observed when the result runs: caller-supplied text is spliced
//! immediately before and after each wrappable expression, and around the
//! whole program body. Nothing is evaluated; the output differs from the
//! input only by insertions (and the fault-injection [`SENTINEL`]).
//!
//! # Pipeline
//!
//! ```text
//! source -> lex -> parse -> plan (classify) -> group by line -> patch
//! ```
//!
//! - [`classify`]: void-value expressions, which are never wrapped
//! - `plan`: the per-kind rules choosing candidate spans
//! - `lines`: one wrap per physical line, keeping heredoc bodies clean
//! - `patch`: offset-stable splicing, leading comments, the data segment
//!
//! ```
//! use peek_wrap::{wrap, Markers};
//!
//! let out = wrap("def a\n1\nreturn 2\nend", &mut Markers::new("<", ">")).unwrap();
//! assert_eq!(out, "<def a\n<1>\nreturn <2>\nend>");
//! ```

pub mod classify;
mod error;
mod hooks;
mod lines;
mod patch;
mod plan;
mod regions;
mod sentinel;

pub use error::WrapError;
pub use hooks::{FnHooks, Hooks, Markers};
pub use sentinel::{SENTINEL, SENTINEL_REPLACEMENT};

use std::sync::Once;

use peek_diagnostic::LineOffsetTable;
use tracing::debug;

use lines::group_by_line;
use patch::Edit;
use plan::Planner;
use regions::Regions;

static TRACING_INIT: Once = Once::new();

/// Initialize a tracing subscriber for the transform and its front end.
///
/// Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=peek_wrap=trace,peek_parse=debug`. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Rewrite `source` with `hooks` text around every wrappable expression.
///
/// Returns [`WrapError::Syntax`] for source that does not lex or parse;
/// no partial output is produced.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn wrap<H: Hooks + ?Sized>(source: &str, hooks: &mut H) -> Result<String, WrapError> {
    if u32::try_from(source.len()).is_err() {
        return Err(WrapError::TooLarge { len: source.len() });
    }

    let table = LineOffsetTable::build(source);
    let lexed = peek_lexer::lex(source);
    if let Some(err) = lexed.errors.first() {
        return Err(WrapError::Syntax {
            code: err.code,
            message: err.message.clone(),
            location: table.locate(source, err.span),
        });
    }
    let parsed = peek_parse::parse(&lexed).map_err(|err| WrapError::Syntax {
        code: err.code,
        message: err.message,
        location: table.locate(source, err.span),
    })?;

    let regions = Regions::new(&lexed, &parsed);
    let plan = Planner::plan(&parsed.arena, source, parsed.root)?;
    let wraps = group_by_line(&plan.candidates, &table);
    debug!(
        nodes = parsed.arena.len(),
        candidates = plan.candidates.len(),
        kept = wraps.len(),
        data_segment = ?regions.data_segment,
        "planned"
    );

    let mut edits = Vec::with_capacity(wraps.len() * 2 + plan.replacements.len() + 2);
    let Some(body) = regions.body else {
        // Nothing to wrap: both body markers go first, even before comments.
        let mut text = hooks.before_all();
        text.push_str(&hooks.after_all());
        edits.push(Edit::before_all(0, text));
        return patch::apply(source, edits, &regions);
    };

    edits.push(Edit::before_all(body.start, hooks.before_all()));
    for wrap in &wraps {
        edits.push(Edit::open(wrap.span, hooks.before_each(wrap.start_line)));
        edits.push(Edit::close(wrap.span, hooks.after_each(wrap.end_line)));
    }
    edits.extend(
        plan.replacements
            .iter()
            .map(|replacement| Edit::replace(replacement.span, replacement.text)),
    );
    edits.push(Edit::after_all(body.end, hooks.after_all()));

    patch::apply(source, edits, &regions)
}

#[cfg(test)]
mod tests;
