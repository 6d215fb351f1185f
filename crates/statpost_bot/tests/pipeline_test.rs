//! Pipeline behaviour against scripted drivers, a mock platform and memory storage.

use async_trait::async_trait;
use serde_json::json;
use statpost_bot::{
    Pipeline, PostGenerator, StateRepository, StatisticsProvider, StatpostConfig,
};
use statpost_core::{
    GenerateRequest, GenerateResponse, PostHistory, PostRecord, PostStatus, RandomUnused,
    StatisticsDocument,
};
use statpost_error::{
    GenerationErrorKind, ModelsError, ModelsErrorKind, ModelsResult, ProviderErrorKind,
    PublishError, PublishErrorKind, StatpostErrorKind, StatpostResult, StorageError,
    StorageErrorKind,
};
use statpost_interface::{DocumentStore, PostId, SocialPlatform, StatpostDriver};
use statpost_storage::{MemoryStore, load_document, save_document};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const STATS: &str = "statistics.json";
const HISTORY: &str = "previous_posts.json";

/// Driver answering from a queue and recording every request.
#[derive(Default)]
struct ScriptedDriver {
    replies: Mutex<VecDeque<ModelsResult<String>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedDriver {
    fn replying(replies: &[&str]) -> Arc<Self> {
        let driver = Self::default();
        for reply in replies {
            driver.push(Ok(reply.to_string()));
        }
        Arc::new(driver)
    }

    fn push(&self, reply: ModelsResult<String>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_user_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        requests
            .last()
            .unwrap()
            .messages()
            .last()
            .unwrap()
            .content()
            .clone()
    }
}

#[async_trait]
impl StatpostDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> ModelsResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected model call")?;
        Ok(GenerateResponse::builder().text(reply).build().unwrap())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Platform with a configurable outcome.
struct MockPlatform {
    fail_with: Mutex<Option<PublishErrorKind>>,
    published: Mutex<Vec<String>>,
}

impl MockPlatform {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail_with: Mutex::new(None),
            published: Mutex::new(Vec::new()),
        })
    }

    fn failing(kind: PublishErrorKind) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Mutex::new(Some(kind)),
            published: Mutex::new(Vec::new()),
        })
    }

    fn recover(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialPlatform for MockPlatform {
    async fn publish(&self, text: &str) -> Result<PostId, PublishError> {
        if let Some(kind) = self.fail_with.lock().unwrap().clone() {
            return Err(PublishError::new(kind));
        }
        let mut published = self.published.lock().unwrap();
        published.push(text.to_string());
        Ok(PostId(format!("post-{}", published.len())))
    }

    fn platform_name(&self) -> &'static str {
        "mock"
    }
}

fn publisher(platform: &Arc<MockPlatform>) -> Option<Arc<dyn SocialPlatform>> {
    let platform: Arc<dyn SocialPlatform> = platform.clone();
    Some(platform)
}

/// Memory store that refuses the next `failures` saves to one key.
struct FlakyStore {
    inner: MemoryStore,
    key: &'static str,
    failures: Mutex<u32>,
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn load(&self, key: &str) -> StatpostResult<serde_json::Value> {
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, document: &serde_json::Value) -> StatpostResult<()> {
        if key == self.key {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(StorageError::new(StorageErrorKind::Write(key.to_string())).into());
            }
        }
        self.inner.save(key, document).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

struct Harness {
    store: MemoryStore,
    knowledge: Arc<ScriptedDriver>,
    writer: Arc<ScriptedDriver>,
}

impl Harness {
    fn new(knowledge: &[&str], writer: &[&str]) -> Self {
        Self {
            store: MemoryStore::new(),
            knowledge: ScriptedDriver::replying(knowledge),
            writer: ScriptedDriver::replying(writer),
        }
    }

    fn pipeline(&self, publisher: Option<Arc<dyn SocialPlatform>>) -> Pipeline {
        self.pipeline_on(Arc::new(self.store.clone()), publisher)
    }

    fn pipeline_on(
        &self,
        store: Arc<dyn DocumentStore>,
        publisher: Option<Arc<dyn SocialPlatform>>,
    ) -> Pipeline {
        let config = StatpostConfig::bundled().unwrap();
        Pipeline::new(
            config.topic.clone(),
            StatisticsProvider::new(self.knowledge.clone(), config.statistics.clone()),
            PostGenerator::new(self.writer.clone(), config.generation.clone(), config.topic),
            StateRepository::new(store, STATS, HISTORY),
            publisher,
        )
    }

    async fn seed_statistics(&self, statistics: &[&str], used: &[&str]) {
        let doc = StatisticsDocument::with_used(
            statistics.iter().map(|s| s.to_string()).collect(),
            used.iter().map(|s| s.to_string()).collect(),
        );
        save_document(&self.store, STATS, &doc).await.unwrap();
    }

    async fn statistics(&self) -> StatisticsDocument {
        load_document(&self.store, STATS).await.unwrap()
    }

    async fn history(&self) -> PostHistory {
        PostHistory::from_value(self.store.get(HISTORY).await.unwrap_or(json!([])))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_selects_first_unused_statistic() {
    let harness = Harness::new(&[], &["Post about B"]);
    harness.seed_statistics(&["A", "B", "C"], &["A"]).await;

    let report = harness.pipeline(None).run().await.unwrap();

    assert_eq!(report.statistic().as_deref(), Some("B"));
    assert_eq!(report.post(), "Post about B");
    assert!(!*report.refilled());
    assert_eq!(harness.knowledge.calls(), 0);

    let stats = harness.statistics().await;
    assert_eq!(stats.statistics(), &strings(&["A", "B", "C"]));
    assert_eq!(stats.used(), &strings(&["A", "B"]));
}

#[tokio::test]
async fn test_first_run_fetches_statistics() {
    let harness = Harness::new(&["1. First fact.\n\n2. Second fact.\n"], &["A post"]);

    let report = harness.pipeline(None).run().await.unwrap();

    assert!(*report.refilled());
    assert_eq!(report.statistic().as_deref(), Some("1. First fact."));
    let stats = harness.statistics().await;
    assert_eq!(
        stats.statistics(),
        &strings(&["1. First fact.", "2. Second fact."])
    );
    assert_eq!(stats.used(), &strings(&["1. First fact."]));
}

#[tokio::test]
async fn test_exhausted_pool_is_refilled() {
    let harness = Harness::new(&["X\nY"], &["Post about X"]);
    harness.seed_statistics(&["A"], &["A"]).await;

    let report = harness.pipeline(None).run().await.unwrap();

    assert!(*report.refilled());
    assert_eq!(report.statistic().as_deref(), Some("X"));
    let stats = harness.statistics().await;
    assert_eq!(stats.statistics(), &strings(&["X", "Y"]));
    assert_eq!(stats.used(), &strings(&["X"]));
}

#[tokio::test]
async fn test_knowledge_request_uses_configured_prompts() {
    let harness = Harness::new(&["X"], &["post"]);
    harness.pipeline(None).run().await.unwrap();

    let requests = harness.knowledge.requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.messages().len(), 2);
    assert!(
        request.messages()[0]
            .content()
            .contains("European Union government procurement statistics")
    );
    assert!(request.messages()[1].content().starts_with("Give me 5 concise"));
    assert_eq!(*request.max_tokens(), Some(500));
    assert_eq!(*request.top_p(), Some(0.9));
}

#[tokio::test]
async fn test_empty_batch_fails_without_touching_state() {
    let harness = Harness::new(&["\n  \n"], &[]);

    let err = harness.pipeline(None).run().await.unwrap_err();

    match err.kind() {
        StatpostErrorKind::Provider(e) => assert_eq!(e.kind, ProviderErrorKind::Empty),
        other => panic!("unexpected error: {}", other),
    }
    assert!(harness.store.get(STATS).await.is_none());
    assert!(harness.store.get(HISTORY).await.is_none());
}

#[tokio::test]
async fn test_provider_status_error_is_reported() {
    let harness = Harness::new(&[], &[]);
    harness.knowledge.push(Err(ModelsError::new(ModelsErrorKind::Api {
        status: 503,
        body: "busy".to_string(),
    })));

    let err = harness.pipeline(None).run().await.unwrap_err();
    match err.kind() {
        StatpostErrorKind::Provider(e) => assert_eq!(
            e.kind,
            ProviderErrorKind::Status {
                status: 503,
                body: "busy".to_string()
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_blank_post_is_a_generation_error() {
    let harness = Harness::new(&[], &["   "]);
    harness.seed_statistics(&["A"], &[]).await;

    let err = harness.pipeline(None).run().await.unwrap_err();

    match err.kind() {
        StatpostErrorKind::Generation(e) => {
            assert_eq!(e.kind, GenerationErrorKind::EmptyResponse)
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(harness.statistics().await.used().is_empty());
    assert!(harness.history().await.is_empty());
}

#[tokio::test]
async fn test_generator_sees_five_most_recent_posts_oldest_first() {
    let harness = Harness::new(&[], &["  new post  "]);
    harness.seed_statistics(&["A"], &[]).await;
    let mut history = PostHistory::new();
    for i in 1..=7 {
        history.push(PostRecord::new(
            format!("2024-01-0{}T00:00:00", i),
            format!("old post {}", i),
            PostStatus::Published,
        ));
    }
    save_document(&harness.store, HISTORY, &history).await.unwrap();

    let report = harness.pipeline(None).run().await.unwrap();
    assert_eq!(report.post(), "new post");

    let prompt = harness.writer.last_user_prompt();
    assert!(prompt.contains("based on this statistic about EU government procurement: A\n"));
    assert!(prompt.contains("DO NOT use hashtags."));
    assert!(prompt.contains("Keep the post under 300 characters."));
    assert!(prompt.ends_with("old post 3\nold post 4\nold post 5\nold post 6\nold post 7"));
    assert!(!prompt.contains("old post 2"));

    let stored = harness.history().await;
    assert_eq!(stored.len(), 8);
    assert_eq!(stored.last().unwrap().post(), "new post");
}

#[tokio::test]
async fn test_without_publisher_post_is_recorded_as_skipped() {
    let harness = Harness::new(&[], &["post"]);
    harness.seed_statistics(&["A"], &[]).await;

    let report = harness.pipeline(None).run().await.unwrap();

    assert_eq!(*report.status(), PostStatus::Skipped);
    assert!(report.post_id().is_none());
    let history = harness.history().await;
    assert_eq!(*history.last().unwrap().status(), PostStatus::Skipped);
}

#[tokio::test]
async fn test_successful_publish_records_post_id() {
    let harness = Harness::new(&[], &["post"]);
    harness.seed_statistics(&["A"], &[]).await;
    let platform = MockPlatform::succeeding();

    let report = harness
        .pipeline(publisher(&platform))
        .run()
        .await
        .unwrap();

    assert_eq!(*report.status(), PostStatus::Published);
    assert_eq!(report.post_id(), &Some(PostId("post-1".to_string())));
    assert_eq!(platform.published(), vec!["post".to_string()]);

    let history = harness.history().await;
    let record = history.last().unwrap();
    assert_eq!(*record.status(), PostStatus::Published);
    assert_eq!(record.post_id().as_deref(), Some("post-1"));
}

#[tokio::test]
async fn test_publish_failure_keeps_progress_and_resumes_next_run() {
    let harness = Harness::new(&[], &["post about A"]);
    harness.seed_statistics(&["A", "B"], &[]).await;
    let platform = MockPlatform::failing(PublishErrorKind::RateLimited("slow down".into()));

    let err = harness
        .pipeline(publisher(&platform))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), StatpostErrorKind::Publish(_)));

    let stats = harness.statistics().await;
    assert_eq!(stats.used(), &strings(&["A"]));
    let history = harness.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history.last().unwrap().post(), "post about A");
    assert_eq!(*history.last().unwrap().status(), PostStatus::Failed);

    platform.recover();
    let report = harness
        .pipeline(publisher(&platform))
        .run()
        .await
        .unwrap();

    assert!(*report.resumed());
    assert_eq!(report.statistic().as_deref(), Some("A"));
    assert_eq!(report.post(), "post about A");
    assert_eq!(*report.status(), PostStatus::Published);
    assert_eq!(harness.writer.calls(), 1);
    assert_eq!(harness.statistics().await.used(), &strings(&["A"]));

    let history = harness.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(*history.last().unwrap().status(), PostStatus::Published);
    assert_eq!(*history.last().unwrap().attempts(), 2);
}

#[tokio::test]
async fn test_refused_post_is_not_retried_and_next_run_moves_on() {
    let harness = Harness::new(&[], &["post about A", "post about B", "post about C"]);
    harness.seed_statistics(&["A", "B", "C"], &[]).await;
    let platform = MockPlatform::failing(PublishErrorKind::Unauthorized("403 too long".into()));

    let err = harness
        .pipeline(publisher(&platform))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), StatpostErrorKind::Publish(_)));
    let history = harness.history().await;
    assert_eq!(*history.last().unwrap().status(), PostStatus::Rejected);

    let second = harness.pipeline(publisher(&platform)).run().await;
    assert!(second.is_err());
    assert_eq!(harness.writer.calls(), 2);
    assert_eq!(harness.statistics().await.used(), &strings(&["A", "B"]));

    platform.recover();
    let report = harness
        .pipeline(publisher(&platform))
        .run()
        .await
        .unwrap();

    assert!(!*report.resumed());
    assert_eq!(report.statistic().as_deref(), Some("C"));
    assert_eq!(platform.published(), vec!["post about C".to_string()]);
    let statuses: Vec<PostStatus> = harness
        .history()
        .await
        .records()
        .iter()
        .map(|r| *r.status())
        .collect();
    assert_eq!(
        statuses,
        vec![PostStatus::Rejected, PostStatus::Rejected, PostStatus::Published]
    );
}

#[tokio::test]
async fn test_transient_failures_stop_resuming_after_attempt_budget() {
    let harness = Harness::new(&[], &["post about A", "post about B"]);
    harness.seed_statistics(&["A", "B"], &[]).await;
    let platform = MockPlatform::failing(PublishErrorKind::Api {
        status: 503,
        body: "over capacity".into(),
    });
    let pipeline = || harness.pipeline(publisher(&platform)).with_max_attempts(2);

    assert!(pipeline().run().await.is_err());
    assert!(pipeline().run().await.is_err());
    assert_eq!(harness.writer.calls(), 1);
    let history = harness.history().await;
    assert_eq!(*history.last().unwrap().attempts(), 2);
    assert_eq!(*history.last().unwrap().status(), PostStatus::Failed);

    platform.recover();
    let report = pipeline().run().await.unwrap();

    assert!(!*report.resumed());
    assert_eq!(report.statistic().as_deref(), Some("B"));
    assert_eq!(platform.published(), vec!["post about B".to_string()]);
}

#[tokio::test]
async fn test_statistic_of_recorded_post_is_never_reused() {
    let harness = Harness::new(&[], &["post about A", "post about B"]);
    harness.seed_statistics(&["A", "B"], &[]).await;
    let platform = MockPlatform::succeeding();
    let flaky = Arc::new(FlakyStore {
        inner: harness.store.clone(),
        key: STATS,
        failures: Mutex::new(1),
    });

    let err = harness
        .pipeline_on(flaky.clone(), publisher(&platform))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), StatpostErrorKind::Storage(_)));
    assert!(harness.statistics().await.used().is_empty());
    assert_eq!(*harness.history().await.last().unwrap().status(), PostStatus::Pending);

    let resumed = harness
        .pipeline_on(flaky.clone(), publisher(&platform))
        .run()
        .await
        .unwrap();
    assert!(*resumed.resumed());
    assert_eq!(resumed.statistic().as_deref(), Some("A"));
    assert_eq!(harness.statistics().await.used(), &strings(&["A"]));

    let next = harness
        .pipeline_on(flaky, publisher(&platform))
        .run()
        .await
        .unwrap();
    assert_eq!(next.statistic().as_deref(), Some("B"));
    assert_eq!(
        platform.published(),
        vec!["post about A".to_string(), "post about B".to_string()]
    );
}

#[tokio::test]
async fn test_unpublished_statistic_is_settled_without_publisher() {
    let harness = Harness::new(&[], &["post about A", "post about B"]);
    harness.seed_statistics(&["A", "B"], &[]).await;
    let flaky = Arc::new(FlakyStore {
        inner: harness.store.clone(),
        key: STATS,
        failures: Mutex::new(1),
    });

    assert!(harness.pipeline_on(flaky.clone(), None).run().await.is_err());

    let report = harness.pipeline_on(flaky, None).run().await.unwrap();
    assert_eq!(report.statistic().as_deref(), Some("B"));
    assert_eq!(harness.statistics().await.used(), &strings(&["A", "B"]));
}

#[tokio::test]
async fn test_resume_disabled_writes_a_new_post() {
    let harness = Harness::new(&[], &["fresh post"]);
    harness.seed_statistics(&["A", "B"], &["A"]).await;
    let mut history = PostHistory::new();
    history.push(PostRecord::new("2024-01-01T00:00:00", "stale", PostStatus::Failed));
    save_document(&harness.store, HISTORY, &history).await.unwrap();
    let platform = MockPlatform::succeeding();

    let report = harness
        .pipeline(publisher(&platform))
        .with_resume_failed(false)
        .run()
        .await
        .unwrap();

    assert!(!*report.resumed());
    assert_eq!(report.statistic().as_deref(), Some("B"));
    assert_eq!(platform.published(), vec!["fresh post".to_string()]);
}

#[tokio::test]
async fn test_skipped_record_is_not_resumed() {
    let harness = Harness::new(&[], &["fresh post"]);
    harness.seed_statistics(&["A"], &[]).await;
    let mut history = PostHistory::new();
    history.push(PostRecord::new("2024-01-01T00:00:00", "dry run", PostStatus::Skipped));
    save_document(&harness.store, HISTORY, &history).await.unwrap();
    let platform = MockPlatform::succeeding();

    let report = harness.pipeline(publisher(&platform)).run().await.unwrap();

    assert!(!*report.resumed());
    assert_eq!(platform.published(), vec!["fresh post".to_string()]);
}

#[tokio::test]
async fn test_history_is_capped() {
    let harness = Harness::new(&[], &["fourth"]);
    harness.seed_statistics(&["A"], &[]).await;
    let mut history = PostHistory::new();
    for post in ["first", "second", "third"] {
        history.push(PostRecord::new("2024-01-01T00:00:00", post, PostStatus::Published));
    }
    save_document(&harness.store, HISTORY, &history).await.unwrap();

    harness
        .pipeline(None)
        .with_max_history(2)
        .run()
        .await
        .unwrap();

    let posts: Vec<String> = harness
        .history()
        .await
        .records()
        .iter()
        .map(|r| r.post().clone())
        .collect();
    assert_eq!(posts, strings(&["third", "fourth"]));
}

#[tokio::test]
async fn test_random_policy_picks_an_unused_statistic() {
    let harness = Harness::new(&[], &["post"]);
    harness.seed_statistics(&["A", "B", "C"], &["A", "C"]).await;

    let report = harness
        .pipeline(None)
        .with_policy(Box::new(RandomUnused))
        .run()
        .await
        .unwrap();

    assert_eq!(report.statistic().as_deref(), Some("B"));
}

#[tokio::test]
async fn test_legacy_history_without_status_reads_as_published() {
    let harness = Harness::new(&[], &["post"]);
    harness.seed_statistics(&["A"], &[]).await;
    harness
        .store
        .save(
            HISTORY,
            &json!([{"timestamp": "2024-09-01T10:00:00.000001", "post": "legacy"}]),
        )
        .await
        .unwrap();
    let platform = MockPlatform::succeeding();

    let report = harness.pipeline(publisher(&platform)).run().await.unwrap();

    assert!(!*report.resumed());
    assert_eq!(harness.history().await.len(), 2);
}
