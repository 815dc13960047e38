//! End-to-end behaviour of the file importers

use std::path::{Path, PathBuf};

use dialogue_import_importer::{
    load_from_config, CombinedDataImporter, SimpleFileImporter, TrainingFileImporter,
};
use dialogue_import_stories::{GraphWarning, StoryGraph, StoryReadOptions, STORY_START};
use tempfile::{tempdir, TempDir};

const DOMAIN: &str = r#"
intents:
  - greet
  - inform
  - goodbye
entities:
  - name
slots:
  name:
    type: text
actions:
  - utter_greet
  - utter_ask_name
  - utter_thanks
  - utter_goodbye
responses:
  utter_greet:
    - text: "Hello!"
  utter_ask_name:
    - text: "What is your name?"
  utter_thanks:
    - text: "Thanks, {name}!"
  utter_goodbye:
    - text: "Bye"
"#;

const GREET_STORIES: &str = r#"
## greet
* greet
  - utter_greet
  - utter_ask_name
> ask_name

## goodbye
* goodbye
  - utter_goodbye
"#;

const NAME_STORIES: &str = r#"
## name given
> ask_name
* inform{"name": "Ada"}
  - slot{"name": "Ada"}
  - utter_thanks
> ask_name
"#;

const NLU_A: &str = r#"
## intent:greet
- hello
- hi there

## intent:inform
- my name is [Ada](name)
"#;

const NLU_B: &str = r#"{
  "rasa_nlu_data": {
    "common_examples": [
      {"text": "hello", "intent": "greet"},
      {"text": "bye", "intent": "goodbye"}
    ]
  }
}"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        Self { dir }
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn full() -> Self {
        let project = Self::new();
        project.write("domain.yml", DOMAIN);
        project.write("config.yml", "language: en\npolicies:\n  - name: MemoizationPolicy\n");
        project.write("data/greet_stories.md", GREET_STORIES);
        project.write("data/name_stories.md", NAME_STORIES);
        project.write("data/nlu_a.md", NLU_A);
        project.write("data/nlu_b.json", NLU_B);
        project
    }

    fn importer(&self) -> SimpleFileImporter {
        SimpleFileImporter::new(
            Some(&self.path("config.yml")),
            Some(&self.path("domain.yml")),
            &[self.path("data")],
        )
        .unwrap()
    }
}

async fn story_graph(importer: &dyn TrainingFileImporter, options: &StoryReadOptions) -> StoryGraph {
    importer.get_story_data(options).await.unwrap()
}

#[tokio::test]
async fn test_missing_or_malformed_domain_is_empty() {
    let project = Project::new();
    let broken = project.write("broken.yml", "intents: [greet\n");
    let duplicated = project.write("dup.yml", "intents: [greet, greet]\n");
    let candidates: Vec<Option<PathBuf>> = vec![
        None,
        Some(project.path("missing.yml")),
        Some(broken),
        Some(duplicated),
    ];

    for domain in candidates {
        let importer = SimpleFileImporter::new(None, domain.as_deref(), &[]).unwrap();
        assert!(importer.get_domain().await.is_empty(), "domain {:?}", domain);
    }
}

#[tokio::test]
async fn test_no_training_paths_gives_empty_data() {
    let importer = SimpleFileImporter::new(None, None, &[]).unwrap();

    let graph = story_graph(&importer, &StoryReadOptions::default()).await;
    assert!(graph.is_empty());
    assert!(importer.get_nlu_data(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_config_is_empty_mapping() {
    let project = Project::new();
    let importer =
        SimpleFileImporter::new(Some(&project.path("config.yml")), None, &[]).unwrap();
    assert!(importer.get_config().await.is_empty());

    let combined = load_from_config(Some(&project.path("config.yml")), None, &[]).unwrap();
    assert!(combined.get_config().await.is_empty());
}

#[tokio::test]
async fn test_full_project() {
    let project = Project::full();
    let importer = project.importer();

    assert_eq!(importer.story_files().len(), 2);
    assert_eq!(importer.nlu_files().len(), 2);
    assert_eq!(importer.get_config().await.policies().len(), 1);
    assert!(importer.get_domain().await.has_intent("inform"));

    let graph = story_graph(&importer, &StoryReadOptions::default()).await;
    assert_eq!(graph.block_names().len(), 3);
    assert!(graph
        .warnings()
        .iter()
        .all(|w| !matches!(w, GraphWarning::SkippedFile { .. })));
    // every domain symbol used by the stories exists
    assert!(graph.warnings().iter().all(|w| w.is_checkpoint_warning()));
}

#[tokio::test]
async fn test_cross_file_checkpoint_links_continuation() {
    let project = Project::full();
    let graph = story_graph(&project.importer(), &StoryReadOptions::default()).await;

    let producers: Vec<_> = graph
        .steps_ending_at("ask_name")
        .into_iter()
        .filter(|s| s.starts_at(STORY_START))
        .collect();
    assert_eq!(producers.len(), 1);

    let continuations = graph.continuations(&producers[0].id);
    assert_eq!(continuations.len(), 1);
    assert_eq!(continuations[0].block_name, "name given");
    assert!(continuations[0].source.ends_with("name_stories.md"));
}

#[tokio::test]
async fn test_cyclic_checkpoint_terminates() {
    let project = Project::full();
    let graph = story_graph(&project.importer(), &StoryReadOptions::default()).await;

    // "name given" starts from and ends with ask_name
    assert!(graph.has_cycles());
    assert_eq!(graph.ordered_steps().len(), graph.len());
}

#[tokio::test]
async fn test_checkpoint_resolution_is_order_independent() {
    let project = Project::full();
    let greet = project.path("data/greet_stories.md");
    let name = project.path("data/name_stories.md");

    let forward = SimpleFileImporter::new(None, None, &[greet.clone(), name.clone()]).unwrap();
    let backward = SimpleFileImporter::new(None, None, &[name, greet]).unwrap();

    let a = story_graph(&forward, &StoryReadOptions::default()).await;
    let b = story_graph(&backward, &StoryReadOptions::default()).await;
    assert!(!a.resolved_edges().is_empty());
    assert_eq!(a.resolved_edges(), b.resolved_edges());

    let merged_ab = a.clone().merge(b.clone());
    let merged_ba = b.merge(a);
    assert_eq!(merged_ab.resolved_edges(), merged_ba.resolved_edges());
}

#[tokio::test]
async fn test_exclusion_percentage_bounds() {
    let project = Project::full();
    let importer = project.importer();

    let baseline = story_graph(&importer, &StoryReadOptions::default()).await;
    let zero = story_graph(&importer, &StoryReadOptions::default().with_exclusion(0)).await;
    assert_eq!(baseline.steps(), zero.steps());
    assert_eq!(baseline.resolved_edges(), zero.resolved_edges());

    let all = story_graph(&importer, &StoryReadOptions::default().with_exclusion(100)).await;
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_exclusion_is_reproducible() {
    let project = Project::full();
    let importer = project.importer();
    let options = StoryReadOptions::default().with_exclusion(50).with_seed(3);

    let first = story_graph(&importer, &options).await;
    let second = story_graph(&importer, &options).await;
    assert_eq!(first.steps(), second.steps());
}

#[tokio::test]
async fn test_malformed_story_file_is_skipped() {
    let project = Project::full();
    project.write("data/broken_stories.md", "## broken\n* inform{\"name\": \n  - utter_thanks\n");
    let importer = project.importer();
    assert_eq!(importer.story_files().len(), 3);

    let graph = story_graph(&importer, &StoryReadOptions::default()).await;
    assert_eq!(graph.block_names().len(), 3);
    assert!(graph
        .warnings()
        .iter()
        .any(|w| matches!(w, GraphWarning::SkippedFile { path, .. } if path.ends_with("broken_stories.md"))));
}

#[tokio::test]
async fn test_nlu_counts_are_summed_without_dedup() {
    let project = Project::full();
    let importer = project.importer();

    let data = importer.get_nlu_data(Some("en")).await.unwrap();
    // 3 Markdown examples plus 2 JSON examples, "hello" appears twice
    assert_eq!(data.len(), 5);
    assert_eq!(data.examples_per_intent()["greet"], 3);
    assert_eq!(data.language, "en");
}

#[tokio::test]
async fn test_concurrent_calls_on_one_importer() {
    let project = Project::full();
    let importer = project.importer();
    let options = StoryReadOptions::default();

    let (graph, nlu, domain) = tokio::join!(
        importer.get_story_data(&options),
        importer.get_nlu_data(None),
        importer.get_domain()
    );
    assert!(!graph.unwrap().is_empty());
    assert_eq!(nlu.unwrap().len(), 5);
    assert!(!domain.is_empty());
}

#[tokio::test]
async fn test_combined_importer_matches_single_source() {
    let project = Project::full();
    let combined: CombinedDataImporter = load_from_config(
        Some(&project.path("config.yml")),
        Some(&project.path("domain.yml")),
        &[project.path("data")],
    )
    .unwrap();
    let single = project.importer();

    assert_eq!(combined.get_config().await, single.get_config().await);
    assert_eq!(combined.get_domain().await, single.get_domain().await);
    assert_eq!(
        story_graph(&combined, &StoryReadOptions::default()).await.resolved_edges(),
        story_graph(&single, &StoryReadOptions::default()).await.resolved_edges()
    );
}

fn assert_send_sync<T: Send + Sync>(_: &T) {}

#[test]
fn test_importer_is_shareable() {
    let missing = Path::new("/nonexistent").to_path_buf();
    let importer = SimpleFileImporter::new(None, None, &[missing]).unwrap();
    assert!(importer.story_files().is_empty());
    assert_send_sync(&importer);
}
