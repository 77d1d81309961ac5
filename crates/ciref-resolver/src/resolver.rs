//! Reference resolution.
//!
//! Walks a parsed document and replaces every `!reference [k1, .., kn]` marker
//! with the fully resolved value found at that path in the original document.
//! Targets are memoized per path, so a section shared by many markers is
//! resolved once. Paths currently being resolved are kept on a stack; meeting
//! one of them again means the document contains a circular chain.

use std::collections::HashMap;

use ciref_core::{Mapping, Reference, ReferenceError, Result, TargetPath, Value};
use tracing::{debug, trace};

use crate::ResolverConfig;

/// Counters collected during one resolution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Distinct target paths that were looked up and resolved.
    pub targets_resolved: usize,
    /// Markers answered from the memo without resolving their target again.
    pub memo_hits: usize,
    /// Deepest stack of in-progress targets reached.
    pub max_depth: usize,
}

/// Stateless entry point. Every call gets its own resolution context, so one
/// resolver can serve any number of documents, on any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve every marker reachable from `root`.
    pub fn resolve(&self, root: &Mapping) -> Result<Mapping> {
        self.resolve_with_stats(root).map(|(resolved, _)| resolved)
    }

    /// Like [`Resolver::resolve`], also reporting how much work was done.
    pub fn resolve_with_stats(&self, root: &Mapping) -> Result<(Mapping, ResolutionStats)> {
        debug!(keys = root.len(), "Resolving references");

        let mut context = ResolutionContext::new(root, &self.config);
        let resolved = context.resolve_mapping(root)?;

        if self.config.strict {
            ensure_resolved(resolved.values())?;
        }

        let stats = context.stats;
        debug!(
            targets = stats.targets_resolved,
            memo_hits = stats.memo_hits,
            max_depth = stats.max_depth,
            "References resolved"
        );
        Ok((resolved, stats))
    }

    /// Resolve a single value, looking targets up in `root`.
    ///
    /// `value` does not have to live inside `root`; this is how one section
    /// (a job, say) is expanded without resolving the rest of the document.
    pub fn resolve_value(&self, root: &Mapping, value: &Value) -> Result<Value> {
        let mut context = ResolutionContext::new(root, &self.config);
        let resolved = context.resolve(value)?;

        if self.config.strict {
            ensure_resolved(std::iter::once(&resolved))?;
        }
        Ok(resolved)
    }
}

/// Per-call state: the memo of finished targets and the stack of targets in progress.
struct ResolutionContext<'a> {
    root: &'a Mapping,
    max_nesting: usize,
    memo: HashMap<TargetPath, Value>,
    in_progress: Vec<TargetPath>,
    stats: ResolutionStats,
}

impl<'a> ResolutionContext<'a> {
    fn new(root: &'a Mapping, config: &ResolverConfig) -> Self {
        Self {
            root,
            max_nesting: config.max_nesting,
            memo: HashMap::new(),
            in_progress: Vec::new(),
            stats: ResolutionStats::default(),
        }
    }

    fn resolve(&mut self, value: &Value) -> Result<Value> {
        match value {
            Value::Scalar(_) => Ok(value.clone()),
            Value::Mapping(mapping) => self.resolve_mapping(mapping).map(Value::Mapping),
            // Resolved targets are substituted as one element, never flattened.
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            Value::Reference(reference) => self.resolve_target(reference.target_path()),
        }
    }

    fn resolve_mapping(&mut self, mapping: &Mapping) -> Result<Mapping> {
        mapping
            .iter()
            .map(|(key, value)| Ok((key.clone(), self.resolve(value)?)))
            .collect()
    }

    fn resolve_target(&mut self, path: &TargetPath) -> Result<Value> {
        if let Some(start) = self.in_progress.iter().position(|p| p == path) {
            return Err(ReferenceError::CircularReference {
                tag: Reference::TAG,
                path: path.clone(),
                chain: self.in_progress[start..].to_vec(),
            });
        }

        if let Some(resolved) = self.memo.get(path) {
            trace!(path = %path, "Reusing resolved target");
            self.stats.memo_hits += 1;
            return Ok(resolved.clone());
        }

        if self.in_progress.len() >= self.max_nesting {
            return Err(ReferenceError::NestingTooDeep {
                tag: Reference::TAG,
                path: path.clone(),
                limit: self.max_nesting,
            });
        }

        let raw = lookup(self.root, path).ok_or_else(|| ReferenceError::MissingReference {
            tag: Reference::TAG,
            path: path.clone(),
        })?;

        self.in_progress.push(path.clone());
        self.stats.max_depth = self.stats.max_depth.max(self.in_progress.len());
        let resolved = self.resolve(raw);
        self.in_progress.pop();
        let resolved = resolved?;

        trace!(path = %path, depth = self.in_progress.len(), "Resolved target");
        self.stats.targets_resolved += 1;
        self.memo.insert(path.clone(), resolved.clone());
        Ok(resolved)
    }
}

/// Walk mapping keys segment by segment. Sequences and scalars end the walk.
fn lookup<'a>(root: &'a Mapping, path: &TargetPath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    rest.iter()
        .try_fold(root.get(first)?, |current, segment| current.get(segment))
}

fn ensure_resolved<'v>(values: impl IntoIterator<Item = &'v Value>) -> Result<()> {
    match values.into_iter().flat_map(Value::references).next() {
        Some(leftover) => Err(ReferenceError::UnresolvedMarker {
            path: leftover.target_path().clone(),
        }),
        None => Ok(()),
    }
}
