//! Story graph builder
//!
//! Reads every story file concurrently, skips files that cannot be read or
//! parsed, applies exclusion sampling to whole stories, checks story
//! symbols against the domain and hands the surviving steps to
//! [`StoryGraph`] for checkpoint resolution.

use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dialogue_import_config::Domain;
use dialogue_import_core::{LoadOutcome, Result};

use crate::events::StoryEvent;
use crate::exclusion::ExclusionSampler;
use crate::graph::{GraphWarning, StoryGraph};
use crate::options::StoryReadOptions;
use crate::reader::{ParsedStoryFile, StoryFileReader};
use crate::step::StoryStep;

#[derive(Debug, Clone)]
pub struct StoryGraphBuilder {
    check_domain_symbols: bool,
}

impl Default for StoryGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryGraphBuilder {
    pub fn new() -> Self {
        Self {
            check_domain_symbols: true,
        }
    }

    /// Report intents, actions and slots missing from a non-empty domain
    pub fn with_domain_checks(mut self, enabled: bool) -> Self {
        self.check_domain_symbols = enabled;
        self
    }

    /// Build one graph from all `story_paths`
    ///
    /// File-level problems never fail the build; they are recorded as
    /// [`GraphWarning::SkippedFile`]. The only error is an exclusion
    /// percentage above 100.
    pub async fn build(
        &self,
        story_paths: &[PathBuf],
        domain: &Domain,
        options: &StoryReadOptions,
    ) -> Result<StoryGraph> {
        let sampler = options
            .exclusion_percentage
            .map(|pct| ExclusionSampler::new(pct, options.exclusion_seed))
            .transpose()?;

        if story_paths.is_empty() {
            return Ok(StoryGraph::empty());
        }

        let outcomes = join_all(
            story_paths
                .iter()
                .map(|path| Self::read_file(path, options)),
        )
        .await;

        let mut steps = Vec::new();
        let mut warnings = Vec::new();
        for outcome in outcomes {
            match outcome {
                LoadOutcome::Loaded(parsed) => {
                    steps.extend(parsed.steps);
                    warnings.extend(parsed.warnings);
                }
                LoadOutcome::Degraded { fallback, reason } => {
                    warnings.push(GraphWarning::SkippedFile {
                        path: fallback.path,
                        reason,
                    });
                }
                LoadOutcome::Fatal(err) => return Err(err),
            }
        }

        if let Some(sampler) = sampler {
            steps = Self::apply_exclusion(steps, &sampler);
        }

        if self.check_domain_symbols && !domain.is_empty() {
            warnings.extend(Self::domain_warnings(&steps, domain));
        }

        let graph = StoryGraph::new(steps, warnings);
        for warning in graph.warnings().iter().filter(|w| w.is_checkpoint_warning()) {
            tracing::warn!("{}", warning);
        }

        tracing::info!(
            files = story_paths.len(),
            steps = graph.len(),
            edges = graph.edges().len(),
            warnings = graph.warnings().len(),
            "Built story graph"
        );

        Ok(graph)
    }

    async fn read_file(path: &Path, options: &StoryReadOptions) -> LoadOutcome<ParsedStoryFile> {
        match StoryFileReader::new(path, options).read().await {
            Ok(parsed) => LoadOutcome::Loaded(parsed),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping story file"
                );
                LoadOutcome::degraded(
                    ParsedStoryFile {
                        path: path.to_path_buf(),
                        ..Default::default()
                    },
                    e.to_string(),
                )
            }
        }
    }

    fn apply_exclusion(steps: Vec<StoryStep>, sampler: &ExclusionSampler) -> Vec<StoryStep> {
        let mut excluded_stories = HashSet::new();
        let before = steps.len();
        let kept: Vec<StoryStep> = steps
            .into_iter()
            .filter(|step| {
                let key = step.story_key();
                if sampler.is_excluded(&key) {
                    excluded_stories.insert(key);
                    false
                } else {
                    true
                }
            })
            .collect();

        tracing::debug!(
            percentage = sampler.percentage(),
            stories = excluded_stories.len(),
            steps = before - kept.len(),
            "Excluded stories"
        );
        kept
    }

    /// One warning per unknown symbol, naming the first step using it
    fn domain_warnings(steps: &[StoryStep], domain: &Domain) -> Vec<GraphWarning> {
        let mut reported: HashSet<(u8, String)> = HashSet::new();
        let mut warnings = Vec::new();

        for step in steps {
            for event in &step.events {
                let warning = match event {
                    StoryEvent::UserUttered {
                        intent: Some(intent),
                        ..
                    } if !domain.has_intent(&intent.name) => {
                        reported
                            .insert((0, intent.name.clone()))
                            .then(|| GraphWarning::UnknownIntent {
                                intent: intent.name.clone(),
                                step_id: step.id.clone(),
                            })
                    }
                    StoryEvent::ActionExecuted { name } if !domain.has_action(name) => reported
                        .insert((1, name.clone()))
                        .then(|| GraphWarning::UnknownAction {
                            action: name.clone(),
                            step_id: step.id.clone(),
                        }),
                    StoryEvent::ActiveForm { name: Some(name) } if !domain.has_action(name) => {
                        reported
                            .insert((1, name.clone()))
                            .then(|| GraphWarning::UnknownAction {
                                action: name.clone(),
                                step_id: step.id.clone(),
                            })
                    }
                    StoryEvent::SlotSet { key, .. } if !domain.has_slot(key) => reported
                        .insert((2, key.clone()))
                        .then(|| GraphWarning::UnknownSlot {
                            slot: key.clone(),
                            step_id: step.id.clone(),
                        }),
                    _ => None,
                };

                if let Some(warning) = warning {
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::STORY_START;
    use dialogue_import_core::ImportError;
    use tempfile::tempdir;

    const FIRST: &str = r#"
## greet
* greet
  - utter_greet
> ask_name
"#;

    const SECOND: &str = r#"
## name
> ask_name
* inform{"name": "Ada"}
  - slot{"name": "Ada"}
  - utter_thanks
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_empty_paths_give_empty_graph() {
        let graph = StoryGraphBuilder::new()
            .build(&[], &Domain::empty(), &StoryReadOptions::default())
            .await
            .unwrap();
        assert!(graph.is_empty());
        assert!(graph.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_cross_file_checkpoints() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.md", FIRST);
        let b = write(dir.path(), "b.md", SECOND);

        let graph = StoryGraphBuilder::new()
            .build(&[a.clone(), b.clone()], &Domain::empty(), &StoryReadOptions::default())
            .await
            .unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edges().len(), 1);
        let first = graph.steps_ending_at("ask_name")[0];
        assert!(first.starts_at(STORY_START));
        assert_eq!(graph.continuations(&first.id)[0].block_name, "name");

        let reversed = StoryGraphBuilder::new()
            .build(&[b, a], &Domain::empty(), &StoryReadOptions::default())
            .await
            .unwrap();
        assert_eq!(graph.resolved_edges(), reversed.resolved_edges());
    }

    #[tokio::test]
    async fn test_malformed_and_missing_files_are_skipped() {
        let dir = tempdir().unwrap();
        let good = write(dir.path(), "good.md", FIRST);
        let bad = write(dir.path(), "bad.md", "## s\n* inform{\"name\": }\n");
        let missing = dir.path().join("missing.md");

        let graph = StoryGraphBuilder::new()
            .build(&[good, bad, missing], &Domain::empty(), &StoryReadOptions::default())
            .await
            .unwrap();

        assert_eq!(graph.len(), 1);
        let skipped = graph
            .warnings()
            .iter()
            .filter(|w| matches!(w, GraphWarning::SkippedFile { .. }))
            .count();
        assert_eq!(skipped, 2);
        // ask_name is never continued
        assert!(graph
            .warnings()
            .iter()
            .any(|w| matches!(w, GraphWarning::UnusedCheckpoint { .. })));
    }

    #[tokio::test]
    async fn test_exclusion_bounds() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.md", FIRST);
        let b = write(dir.path(), "b.md", SECOND);
        let paths = vec![a, b];
        let builder = StoryGraphBuilder::new();
        let domain = Domain::empty();

        let baseline = builder
            .build(&paths, &domain, &StoryReadOptions::default())
            .await
            .unwrap();
        let zero = builder
            .build(&paths, &domain, &StoryReadOptions::default().with_exclusion(0))
            .await
            .unwrap();
        assert_eq!(baseline.steps(), zero.steps());
        assert_eq!(baseline.resolved_edges(), zero.resolved_edges());

        let all = builder
            .build(&paths, &domain, &StoryReadOptions::default().with_exclusion(100))
            .await
            .unwrap();
        assert!(all.is_empty());

        let err = builder
            .build(&paths, &domain, &StoryReadOptions::default().with_exclusion(101))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_domain_symbol_warnings() {
        let dir = tempdir().unwrap();
        let b = write(dir.path(), "b.md", SECOND);
        let domain = Domain::from_yaml("intents: [greet]\nactions: [utter_greet]\n").unwrap();

        let graph = StoryGraphBuilder::new()
            .build(&[b.clone()], &domain, &StoryReadOptions::default())
            .await
            .unwrap();
        let kinds: Vec<_> = graph
            .warnings()
            .iter()
            .filter(|w| !w.is_checkpoint_warning())
            .collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], GraphWarning::UnknownIntent { intent, .. } if intent == "inform"));

        let unchecked = StoryGraphBuilder::new()
            .with_domain_checks(false)
            .build(&[b], &domain, &StoryReadOptions::default())
            .await
            .unwrap();
        assert!(unchecked.warnings().iter().all(|w| w.is_checkpoint_warning()));
    }

    #[tokio::test]
    async fn test_exclusion_independent_of_checkout_location() {
        let content: String = (0..40)
            .map(|i| format!("## story {}\n* greet\n  - utter_greet\n\n", i))
            .collect();
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let options = StoryReadOptions::default().with_exclusion(50).with_seed(42);

        let mut kept = Vec::new();
        for dir in [&first, &second] {
            let path = write(dir.path(), "stories.md", &content);
            let graph = StoryGraphBuilder::new()
                .build(&[path], &Domain::empty(), &options)
                .await
                .unwrap();
            let names: Vec<String> = graph.block_names().into_iter().map(String::from).collect();
            kept.push(names);
        }

        assert!(!kept[0].is_empty() && kept[0].len() < 40);
        assert_eq!(kept[0], kept[1]);
    }
}
