//! Story graph
//!
//! Steps live in a dense vector; checkpoints are name -> step-index
//! multimaps. An edge links every step ending with a checkpoint to every
//! step starting from it, so branches (several producers or consumers of
//! one name) and loops (a step continuing into one of its ancestors) need
//! no special casing. Traversal is iterative and marks each step once, so
//! cycles cannot cause unbounded work.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::PathBuf;

use crate::step::{StoryStep, STORY_START};

/// Continuation from one step to another through a checkpoint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub checkpoint: String,
}

/// Non-fatal finding collected while building a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphWarning {
    /// A step starts from a checkpoint no step ends with
    UnresolvedCheckpoint { checkpoint: String, step_id: String },
    /// A step ends with a checkpoint no step starts from
    UnusedCheckpoint { checkpoint: String, step_id: String },
    UnknownIntent { intent: String, step_id: String },
    UnknownAction { action: String, step_id: String },
    UnknownSlot { slot: String, step_id: String },
    /// A story file could not be read or parsed
    SkippedFile { path: PathBuf, reason: String },
    /// A line in a story file was not understood
    SkippedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

impl GraphWarning {
    /// Whether the warning comes from checkpoint resolution
    pub fn is_checkpoint_warning(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedCheckpoint { .. } | Self::UnusedCheckpoint { .. }
        )
    }
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedCheckpoint { checkpoint, step_id } => write!(
                f,
                "Step '{}' starts from checkpoint '{}' which no step ends with",
                step_id, checkpoint
            ),
            Self::UnusedCheckpoint { checkpoint, step_id } => write!(
                f,
                "Step '{}' ends with checkpoint '{}' which no step starts from",
                step_id, checkpoint
            ),
            Self::UnknownIntent { intent, step_id } => {
                write!(f, "Step '{}' uses intent '{}' missing from the domain", step_id, intent)
            }
            Self::UnknownAction { action, step_id } => {
                write!(f, "Step '{}' uses action '{}' missing from the domain", step_id, action)
            }
            Self::UnknownSlot { slot, step_id } => {
                write!(f, "Step '{}' sets slot '{}' missing from the domain", step_id, slot)
            }
            Self::SkippedFile { path, reason } => {
                write!(f, "Skipped story file {}: {}", path.display(), reason)
            }
            Self::SkippedLine {
                path,
                line,
                content,
            } => write!(f, "Skipped {}:{} '{}'", path.display(), line, content),
        }
    }
}

/// Graph of story steps joined through checkpoints
#[derive(Debug, Clone, Default)]
pub struct StoryGraph {
    steps: Vec<StoryStep>,
    starts: BTreeMap<String, Vec<usize>>,
    ends: BTreeMap<String, Vec<usize>>,
    edges: Vec<Edge>,
    successors: Vec<Vec<usize>>,
    ordering: Vec<usize>,
    cyclic: BTreeSet<(usize, usize)>,
    /// Warnings handed in by the reader and builder
    collected: Vec<GraphWarning>,
    /// Collected warnings plus checkpoint warnings
    warnings: Vec<GraphWarning>,
}

impl StoryGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build indexes, edges and ordering for `steps`
    pub fn new(steps: Vec<StoryStep>, warnings: Vec<GraphWarning>) -> Self {
        let mut graph = Self {
            steps,
            collected: warnings
                .into_iter()
                .filter(|w| !w.is_checkpoint_warning())
                .collect(),
            ..Default::default()
        };
        graph.index();
        graph
    }

    fn index(&mut self) {
        self.starts.clear();
        self.ends.clear();
        for (idx, step) in self.steps.iter().enumerate() {
            for checkpoint in &step.start_checkpoints {
                self.starts.entry(checkpoint.name.clone()).or_default().push(idx);
            }
            for checkpoint in &step.end_checkpoints {
                self.ends.entry(checkpoint.name.clone()).or_default().push(idx);
            }
        }

        self.edges.clear();
        self.successors = vec![Vec::new(); self.steps.len()];
        for (name, producers) in &self.ends {
            let Some(consumers) = self.starts.get(name) else {
                continue;
            };
            for &from in producers {
                for &to in consumers {
                    self.edges.push(Edge {
                        from,
                        to,
                        checkpoint: name.clone(),
                    });
                    if !self.successors[from].contains(&to) {
                        self.successors[from].push(to);
                    }
                }
            }
        }
        self.edges.sort();
        for targets in self.successors.iter_mut() {
            targets.sort_unstable();
        }

        self.order();

        let checkpoint_warnings = self.checkpoint_warnings();
        self.warnings = self.collected.clone();
        self.warnings.extend(checkpoint_warnings);
    }

    /// Depth-first post-order over steps, roots being steps that start the
    /// story first, then anything not yet reached. Edges into a step still
    /// on the stack are cyclic.
    fn order(&mut self) {
        const UNSEEN: u8 = 0;
        const ACTIVE: u8 = 1;
        const DONE: u8 = 2;

        let n = self.steps.len();
        let mut state = vec![UNSEEN; n];
        let mut post_order = Vec::with_capacity(n);
        self.cyclic.clear();

        let roots = (0..n)
            .filter(|&i| self.steps[i].starts_at_story_start())
            .chain(0..n);

        for root in roots {
            if state[root] != UNSEEN {
                continue;
            }
            state[root] = ACTIVE;
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(&(node, child)) = stack.last() {
                match self.successors[node].get(child).copied() {
                    Some(next) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        match state[next] {
                            UNSEEN => {
                                state[next] = ACTIVE;
                                stack.push((next, 0));
                            }
                            ACTIVE => {
                                self.cyclic.insert((node, next));
                            }
                            _ => {}
                        }
                    }
                    None => {
                        state[node] = DONE;
                        post_order.push(node);
                        stack.pop();
                    }
                }
            }
        }

        post_order.reverse();
        self.ordering = post_order;
    }

    fn checkpoint_warnings(&self) -> Vec<GraphWarning> {
        let mut warnings = Vec::new();
        for (name, consumers) in &self.starts {
            if name == STORY_START || self.ends.contains_key(name) {
                continue;
            }
            for &idx in consumers {
                warnings.push(GraphWarning::UnresolvedCheckpoint {
                    checkpoint: name.clone(),
                    step_id: self.steps[idx].id.clone(),
                });
            }
        }
        for (name, producers) in &self.ends {
            if self.starts.contains_key(name) {
                continue;
            }
            for &idx in producers {
                warnings.push(GraphWarning::UnusedCheckpoint {
                    checkpoint: name.clone(),
                    step_id: self.steps[idx].id.clone(),
                });
            }
        }
        warnings
    }

    pub fn steps(&self) -> &[StoryStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, id: &str) -> Option<&StoryStep> {
        self.position(id).map(|idx| &self.steps[idx])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// Steps in a topological order; cyclic edges are ignored for ordering
    pub fn ordered_steps(&self) -> Vec<&StoryStep> {
        self.ordering.iter().map(|&idx| &self.steps[idx]).collect()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges as `(from id, to id, checkpoint)`, independent of step order
    pub fn resolved_edges(&self) -> BTreeSet<(String, String, String)> {
        self.edges
            .iter()
            .map(|e| {
                (
                    self.steps[e.from].id.clone(),
                    self.steps[e.to].id.clone(),
                    e.checkpoint.clone(),
                )
            })
            .collect()
    }

    /// Edges that close a loop
    pub fn cyclic_edges(&self) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| self.cyclic.contains(&(e.from, e.to)))
            .collect()
    }

    pub fn has_cycles(&self) -> bool {
        !self.cyclic.is_empty()
    }

    pub fn steps_starting_at(&self, checkpoint: &str) -> Vec<&StoryStep> {
        self.lookup(&self.starts, checkpoint)
    }

    pub fn steps_ending_at(&self, checkpoint: &str) -> Vec<&StoryStep> {
        self.lookup(&self.ends, checkpoint)
    }

    fn lookup(&self, index: &BTreeMap<String, Vec<usize>>, checkpoint: &str) -> Vec<&StoryStep> {
        index
            .get(checkpoint)
            .map(|ids| ids.iter().map(|&idx| &self.steps[idx]).collect())
            .unwrap_or_default()
    }

    /// Steps that directly continue `step_id`
    pub fn continuations(&self, step_id: &str) -> Vec<&StoryStep> {
        match self.position(step_id) {
            Some(idx) => self.successors[idx].iter().map(|&to| &self.steps[to]).collect(),
            None => Vec::new(),
        }
    }

    /// Steps that `step_id` directly continues
    pub fn predecessors(&self, step_id: &str) -> Vec<&StoryStep> {
        let Some(idx) = self.position(step_id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter(|e| e.to == idx && seen.insert(e.from))
            .map(|e| &self.steps[e.from])
            .collect()
    }

    /// End checkpoints nothing continues from
    pub fn story_end_checkpoints(&self) -> BTreeSet<&str> {
        self.ends
            .keys()
            .filter(|name| !self.starts.contains_key(*name))
            .map(String::as_str)
            .collect()
    }

    pub fn block_names(&self) -> BTreeSet<&str> {
        self.steps.iter().map(|s| s.block_name.as_str()).collect()
    }

    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    /// Combine with another graph; steps whose id is already present are
    /// dropped, warnings are concatenated
    pub fn merge(mut self, other: StoryGraph) -> Self {
        let known: HashSet<String> = self.steps.iter().map(|s| s.id.clone()).collect();
        self.steps
            .extend(other.steps.into_iter().filter(|s| !known.contains(&s.id)));
        self.collected.extend(other.collected);
        self.index();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::StoryEvent;
    use crate::step::Checkpoint;

    fn step(id: &str, starts: &[&str], ends: &[&str]) -> StoryStep {
        let mut step = StoryStep::new(
            id,
            "block",
            "stories.md",
            0,
            starts.iter().map(|s| Checkpoint::new(*s)).collect(),
        );
        step.end_checkpoints = ends.iter().map(|s| Checkpoint::new(*s)).collect();
        step.events.push(StoryEvent::action("utter_greet"));
        step
    }

    #[test]
    fn test_edges_link_producers_to_consumers() {
        let graph = StoryGraph::new(
            vec![
                step("a", &[STORY_START], &["ask_name"]),
                step("b", &[STORY_START], &["ask_name"]),
                step("c", &["ask_name"], &[]),
            ],
            Vec::new(),
        );

        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.predecessors("c").len(), 2);
        assert_eq!(graph.continuations("a")[0].id, "c");
        assert!(graph.warnings().is_empty());
        assert!(!graph.has_cycles());

        let order: Vec<_> = graph.ordered_steps().iter().map(|s| s.id.as_str()).collect();
        let pos = |id| order.iter().position(|s| *s == id).unwrap();
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("c"));
    }

    #[test]
    fn test_cycles_terminate() {
        let graph = StoryGraph::new(
            vec![
                step("start", &[STORY_START], &["loop"]),
                step("body", &["loop"], &["loop"]),
                step("x", &["ping"], &["pong"]),
                step("y", &["pong"], &["ping"]),
            ],
            Vec::new(),
        );

        assert!(graph.has_cycles());
        assert_eq!(graph.ordered_steps().len(), 4);
        assert!(graph
            .cyclic_edges()
            .iter()
            .any(|e| e.from == 1 && e.to == 1));
        assert_eq!(graph.cyclic_edges().len(), 2);
    }

    #[test]
    fn test_checkpoint_warnings() {
        let graph = StoryGraph::new(
            vec![
                step("a", &["nowhere"], &["dead_end"]),
                step("b", &[STORY_START], &[]),
            ],
            vec![GraphWarning::SkippedFile {
                path: PathBuf::from("bad.md"),
                reason: "line 1: oops".into(),
            }],
        );

        assert_eq!(graph.warnings().len(), 3);
        assert!(graph.warnings().contains(&GraphWarning::UnresolvedCheckpoint {
            checkpoint: "nowhere".into(),
            step_id: "a".into()
        }));
        assert_eq!(
            graph.story_end_checkpoints().into_iter().collect::<Vec<_>>(),
            vec!["dead_end"]
        );
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_merge_resolves_across_graphs() {
        let a = StoryGraph::new(vec![step("a", &[STORY_START], &["ask_name"])], Vec::new());
        let b = StoryGraph::new(vec![step("b", &["ask_name"], &[])], Vec::new());
        assert_eq!(a.warnings().len(), 1);

        let merged = a.clone().merge(b.clone());
        assert_eq!(merged.len(), 2);
        assert!(merged.warnings().is_empty());

        let reversed = b.merge(a.clone());
        assert_eq!(merged.resolved_edges(), reversed.resolved_edges());

        let doubled = merged.clone().merge(a);
        assert_eq!(doubled.len(), 2);
    }

    #[test]
    fn test_views_on_missing_ids() {
        let graph = StoryGraph::empty();
        assert!(graph.is_empty());
        assert!(graph.continuations("nope").is_empty());
        assert!(graph.predecessors("nope").is_empty());
        assert!(graph.steps_starting_at(STORY_START).is_empty());
        assert!(graph.step("nope").is_none());
    }
}
