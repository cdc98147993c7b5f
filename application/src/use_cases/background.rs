//! Background Processing Coordinator
//!
//! Grading and feedback run off the submission path. Submissions push a
//! [`BackgroundTask`] onto an mpsc queue; a worker loop spawns each task
//! into a `JoinSet`, with a semaphore bounding how many run at once.
//!
//! The worker takes a permit before it receives, so while every slot is
//! busy new tasks wait in the bounded queue and scheduling reports
//! [`ScheduleError::QueueFull`] once it is full.
//!
//! Each task ends in a single write (the answer patch or the session
//! feedback patch). A failure before that write leaves the record untouched:
//! the answer keeps its placeholder and stays pending. Failures are logged
//! and never retried.

use super::composite_grader::CompositeGrader;
use super::feedback::FeedbackWriter;
use crate::config::WorkerConfig;
use crate::ports::llm_gateway::ProviderError;
use crate::ports::progress::{NoProgress, ProcessingProgress};
use crate::ports::repository::{InterviewRepository, RepositoryError};
use crate::ports::task_scheduler::{BackgroundTask, ScheduleError, TaskScheduler};
use interview_domain::{AnswerId, AnswerPatch, QuestionId, SessionId, SessionPatch, SessionSummary};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// Why a background task was abandoned
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Question {0} no longer exists")]
    MissingQuestion(QuestionId),

    #[error("Feedback generation failed: {0}")]
    Feedback(#[from] ProviderError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Executes background tasks
pub struct TaskProcessor {
    repository: Arc<dyn InterviewRepository>,
    grader: Arc<CompositeGrader>,
    feedback: Arc<FeedbackWriter>,
}

impl TaskProcessor {
    pub fn new(
        repository: Arc<dyn InterviewRepository>,
        grader: Arc<CompositeGrader>,
        feedback: Arc<FeedbackWriter>,
    ) -> Self {
        Self {
            repository,
            grader,
            feedback,
        }
    }

    pub async fn run(&self, task: BackgroundTask) -> Result<(), ProcessingError> {
        match task {
            BackgroundTask::GradeAnswer {
                answer_id,
                question_id,
                transcript,
                ..
            } => self.grade_answer(answer_id, question_id, &transcript).await,
            BackgroundTask::SummarizeSession { session_id } => {
                self.summarize_session(session_id).await
            }
        }
    }

    async fn grade_answer(
        &self,
        answer_id: AnswerId,
        question_id: QuestionId,
        transcript: &str,
    ) -> Result<(), ProcessingError> {
        let question = match self.repository.get_question(question_id).await {
            Ok(q) => q,
            Err(RepositoryError::NotFound { .. }) => {
                return Err(ProcessingError::MissingQuestion(question_id));
            }
            Err(e) => return Err(e.into()),
        };

        let report = self
            .grader
            .grade(
                transcript,
                &question.reference_answer,
                &question.text,
                &question.keywords,
            )
            .await;
        let score = report.stored_score();

        let feedback = self
            .feedback
            .answer_feedback(&question.text, &question.reference_answer, transcript, score)
            .await?;

        let patch = AnswerPatch {
            score,
            feedback,
            matched_keywords: report.matched_keywords,
        };
        self.repository.update_answer(answer_id, &patch).await?;
        info!("Graded answer {}: {}", answer_id, score);
        Ok(())
    }

    async fn summarize_session(&self, session_id: SessionId) -> Result<(), ProcessingError> {
        let session = self.repository.get_session(session_id).await?;
        let answers = self.repository.list_answers(session_id).await?;

        let mut questions = Vec::with_capacity(answers.len());
        for answer in &answers {
            match self.repository.get_question(answer.question_id).await {
                Ok(q) => questions.push(q),
                Err(e) => warn!("Summary of {} skips question {}: {}", session_id, answer.question_id, e),
            }
        }

        let summary = SessionSummary::build(&session, &answers, &questions);
        if summary.pending_count() > 0 {
            debug!(
                "Summarizing {} with {} answers still pending",
                session_id,
                summary.pending_count()
            );
        }

        let feedback = self.feedback.session_feedback(&summary).await?;
        self.repository
            .update_session(session_id, &SessionPatch::aggregate_feedback(feedback))
            .await?;
        info!("Wrote aggregate feedback for session {}", session_id);
        Ok(())
    }
}

/// Sending half of the background queue
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::Sender<BackgroundTask>,
}

impl TaskScheduler for TaskQueue {
    fn schedule(&self, task: BackgroundTask) -> Result<(), ScheduleError> {
        self.sender.try_send(task).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => ScheduleError::QueueClosed,
            mpsc::error::TrySendError::Full(_) => ScheduleError::QueueFull,
        })
    }
}

/// Owns the worker loop consuming the background queue
pub struct BackgroundCoordinator {
    queue: TaskQueue,
    shutdown: Option<oneshot::Sender<()>>,
    worker: JoinHandle<()>,
}

impl BackgroundCoordinator {
    /// Start the worker loop on the current tokio runtime.
    pub fn start(processor: Arc<TaskProcessor>, config: WorkerConfig) -> Self {
        Self::start_with_progress(processor, config, Arc::new(NoProgress))
    }

    pub fn start_with_progress(
        processor: Arc<TaskProcessor>,
        config: WorkerConfig,
        progress: Arc<dyn ProcessingProgress>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let permits = Arc::new(Semaphore::new(config.concurrency.max(1)));

        let worker = tokio::spawn(worker_loop(receiver, shutdown_rx, processor, permits, progress));

        Self {
            queue: TaskQueue { sender },
            shutdown: Some(shutdown_tx),
            worker,
        }
    }

    /// Scheduler handle to inject into use cases
    pub fn scheduler(&self) -> Arc<dyn TaskScheduler> {
        Arc::new(self.queue.clone())
    }

    /// Close the queue and wait for queued and in-flight tasks to finish.
    pub async fn drain(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = self.worker.await {
            warn!("Background worker ended abnormally: {}", e);
        }
    }
}

async fn worker_loop(
    mut receiver: mpsc::Receiver<BackgroundTask>,
    mut shutdown: oneshot::Receiver<()>,
    processor: Arc<TaskProcessor>,
    permits: Arc<Semaphore>,
    progress: Arc<dyn ProcessingProgress>,
) {
    let mut tasks = JoinSet::new();
    let mut slot: Option<OwnedSemaphorePermit> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                receiver.close();
                break;
            }
            permit = permits.clone().acquire_owned(), if slot.is_none() => match permit {
                Ok(permit) => slot = Some(permit),
                Err(_) => break,
            },
            next = receiver.recv(), if slot.is_some() => match (next, slot.take()) {
                (Some(task), Some(permit)) => spawn_task(&mut tasks, task, permit, &processor, &progress),
                _ => break,
            },
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    warn!("Background task panicked: {}", e);
                }
            }
        }
    }
    drop(slot);

    // Tasks already queued before the close still run
    while let Some(task) = receiver.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        spawn_task(&mut tasks, task, permit, &processor, &progress);
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!("Background task panicked: {}", e);
        }
    }
    progress.on_drained();
    debug!("Background queue drained");
}

fn spawn_task(
    tasks: &mut JoinSet<()>,
    task: BackgroundTask,
    permit: OwnedSemaphorePermit,
    processor: &Arc<TaskProcessor>,
    progress: &Arc<dyn ProcessingProgress>,
) {
    let processor = Arc::clone(processor);
    let progress = Arc::clone(progress);

    tasks.spawn(async move {
        let _permit = permit;
        let label = task.label();
        let session_id = task.session_id();
        progress.on_task_start(label);

        match processor.run(task).await {
            Ok(()) => progress.on_task_complete(label, true),
            Err(e) => {
                warn!("{} for session {} failed: {}", label, session_id, e);
                progress.on_task_complete(label, false);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedbackConfig, GradingConfig, SessionLimits};
    use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
    use crate::test_support::{FixedEmbedder, FnGateway, MemoryRepository, sample_questions};
    use crate::use_cases::conduct_interview::ConductInterviewUseCase;
    use crate::use_cases::generate_script::ScriptGenerator;
    use crate::use_cases::start_interview::{StartInterviewInput, StartInterviewUseCase};
    use interview_domain::{
        Answer, InterviewPromptTemplate, Question, SessionStatus, TopicFilter, UserId,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Rubric always 100, feedback echoes the kind of request
    fn grading_gateway() -> FnGateway {
        FnGateway::new(|request: &CompletionRequest| {
            if request.system_prompt == InterviewPromptTemplate::feedback_system() {
                Ok("Clear and correct.".to_string())
            } else if request.system_prompt == InterviewPromptTemplate::aggregate_system() {
                Ok("Strong session overall.".to_string())
            } else {
                Ok("SCORE: 100".to_string())
            }
        })
    }

    fn processor(repo: Arc<MemoryRepository>, gateway: Arc<dyn LlmGateway>) -> Arc<TaskProcessor> {
        let grader = CompositeGrader::new(
            gateway.clone(),
            Arc::new(FixedEmbedder::new(vec![0.5, 0.5, 0.5])),
            GradingConfig::default(),
        );
        let feedback = FeedbackWriter::new(gateway, FeedbackConfig::default());
        Arc::new(TaskProcessor::new(repo, Arc::new(grader), Arc::new(feedback)))
    }

    #[derive(Default)]
    struct CountingProgress {
        ok: AtomicUsize,
        failed: AtomicUsize,
    }

    impl ProcessingProgress for CountingProgress {
        fn on_task_start(&self, _label: &str) {}

        fn on_task_complete(&self, _label: &str, success: bool) {
            if success {
                self.ok.fetch_add(1, Ordering::SeqCst);
            } else {
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_end_to_end_single_question() {
        let repo = Arc::new(MemoryRepository::with_questions(sample_questions()));
        let coordinator =
            BackgroundCoordinator::start(processor(repo.clone(), Arc::new(grading_gateway())), WorkerConfig::default());

        let session = StartInterviewUseCase::new(
            repo.clone(),
            Arc::new(ScriptGenerator::templates()),
            SessionLimits::default(),
        )
        .execute(
            StartInterviewInput::new("alice", 1)
                .with_topic(TopicFilter::Topic("Stacks & Queues".to_string())),
        )
        .await
        .unwrap();

        // Hold the provisional answer back from the worker until it has been observed
        let recorder = Arc::new(crate::test_support::RecordingScheduler::default());
        let conduct = ConductInterviewUseCase::new(repo.clone(), recorder.clone());
        let user = UserId::new("alice");
        let receipt = conduct
            .submit_answer(&user, session.id(), "It is a structure; you push and pop items on a stack, LIFO order.")
            .await
            .unwrap();
        assert!(receipt.completed);

        let pending = repo.get_answer(receipt.answer_id).await.unwrap();
        assert_eq!(pending.score, 0);
        assert!(!pending.graded);

        let scheduler = coordinator.scheduler();
        for task in recorder.tasks() {
            scheduler.schedule(task).unwrap();
        }
        coordinator.drain().await;

        let graded = repo.get_answer(receipt.answer_id).await.unwrap();
        assert!(graded.graded);
        assert!(graded.score >= 99, "score={}", graded.score);
        assert_eq!(graded.feedback, "Clear and correct.");
        assert!(!graded.matched_keywords.is_empty());

        let stored = repo.get_session(session.id()).await.unwrap();
        assert_eq!(stored.status(), SessionStatus::Completed);
        assert_eq!(stored.aggregate_feedback(), Some("Strong session overall."));
    }

    #[tokio::test]
    async fn test_feedback_failure_leaves_placeholder() {
        let repo = Arc::new(MemoryRepository::with_questions(sample_questions()));
        let gateway = FnGateway::new(|request: &CompletionRequest| {
            if request.system_prompt == InterviewPromptTemplate::feedback_system() {
                Err(ProviderError::Timeout)
            } else {
                Ok("SCORE: 75".to_string())
            }
        });
        let progress = Arc::new(CountingProgress::default());
        let coordinator = BackgroundCoordinator::start_with_progress(
            processor(repo.clone(), Arc::new(gateway)),
            WorkerConfig::default(),
            progress.clone(),
        );

        let session_id = SessionId::generate();
        let answer = Answer::provisional(session_id, QuestionId::new(1), "a stack", chrono::Utc::now());
        let answer_id = answer.id;
        repo.create_answer(answer).await.unwrap();

        coordinator
            .scheduler()
            .schedule(BackgroundTask::GradeAnswer {
                session_id,
                answer_id,
                question_id: QuestionId::new(1),
                transcript: "a stack".to_string(),
            })
            .unwrap();
        coordinator.drain().await;

        let stored = repo.get_answer(answer_id).await.unwrap();
        assert!(!stored.graded);
        assert_eq!(stored.score, 0);
        assert!(stored.feedback.is_empty());
        assert_eq!(progress.failed.load(Ordering::SeqCst), 1);
        assert_eq!(progress.ok.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_question_aborts_task() {
        let repo = Arc::new(MemoryRepository::with_questions(vec![]));
        let processor = processor(repo.clone(), Arc::new(grading_gateway()));

        let session_id = SessionId::generate();
        let answer = Answer::provisional(session_id, QuestionId::new(42), "t", chrono::Utc::now());
        let answer_id = answer.id;
        repo.create_answer(answer).await.unwrap();

        let err = processor
            .run(BackgroundTask::GradeAnswer {
                session_id,
                answer_id,
                question_id: QuestionId::new(42),
                transcript: "t".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MissingQuestion(id) if id == QuestionId::new(42)));
        assert!(!repo.get_answer(answer_id).await.unwrap().graded);
    }

    #[tokio::test]
    async fn test_parallel_grading_of_many_answers() {
        let questions: Vec<Question> = sample_questions();
        let repo = Arc::new(MemoryRepository::with_questions(questions.clone()));
        let progress = Arc::new(CountingProgress::default());
        let coordinator = BackgroundCoordinator::start_with_progress(
            processor(repo.clone(), Arc::new(grading_gateway())),
            WorkerConfig {
                concurrency: 2,
                queue_capacity: 16,
            },
            progress.clone(),
        );
        let scheduler = coordinator.scheduler();

        let session_id = SessionId::generate();
        let mut ids = Vec::new();
        for q in &questions {
            let answer = Answer::provisional(session_id, q.id, "some answer", chrono::Utc::now());
            let task = BackgroundTask::GradeAnswer {
                session_id,
                answer_id: answer.id,
                question_id: q.id,
                transcript: answer.transcript.clone(),
            };
            ids.push(answer.id);
            repo.create_answer(answer).await.unwrap();
            scheduler.schedule(task).unwrap();
        }
        coordinator.drain().await;

        assert_eq!(progress.ok.load(Ordering::SeqCst), questions.len());
        for id in ids {
            assert!(repo.get_answer(id).await.unwrap().graded);
        }
    }

    /// Holds every completion until the gate is opened
    struct GatedGateway {
        gate: Semaphore,
        entered: AtomicUsize,
    }

    impl GatedGateway {
        fn closed() -> Self {
            Self {
                gate: Semaphore::new(0),
                entered: AtomicUsize::new(0),
            }
        }

        fn open(&self) {
            self.gate.add_permits(64);
        }
    }

    #[async_trait::async_trait]
    impl LlmGateway for GatedGateway {
        async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
            self.entered.fetch_add(1, Ordering::SeqCst);
            let _pass = self.gate.acquire().await.map_err(|_| ProviderError::Timeout)?;
            if request.system_prompt == InterviewPromptTemplate::feedback_system() {
                Ok("Fine.".to_string())
            } else {
                Ok("SCORE: 50".to_string())
            }
        }
    }

    async fn grade_task(repo: &MemoryRepository, session_id: SessionId, question_id: QuestionId) -> BackgroundTask {
        let answer = Answer::provisional(session_id, question_id, "a queue", chrono::Utc::now());
        let task = BackgroundTask::GradeAnswer {
            session_id,
            answer_id: answer.id,
            question_id,
            transcript: answer.transcript.clone(),
        };
        repo.create_answer(answer).await.unwrap();
        task
    }

    #[tokio::test]
    async fn test_busy_workers_fill_the_queue() {
        let repo = Arc::new(MemoryRepository::with_questions(sample_questions()));
        let gateway = Arc::new(GatedGateway::closed());
        let progress = Arc::new(CountingProgress::default());
        let coordinator = BackgroundCoordinator::start_with_progress(
            processor(repo.clone(), gateway.clone()),
            WorkerConfig {
                concurrency: 1,
                queue_capacity: 1,
            },
            progress.clone(),
        );
        let scheduler = coordinator.scheduler();
        let session_id = SessionId::generate();

        scheduler
            .schedule(grade_task(&repo, session_id, QuestionId::new(1)).await)
            .unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while gateway.entered.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        // The only permit is busy, so the second task stays queued
        scheduler
            .schedule(grade_task(&repo, session_id, QuestionId::new(2)).await)
            .unwrap();
        let err = scheduler
            .schedule(grade_task(&repo, session_id, QuestionId::new(3)).await)
            .unwrap_err();
        assert_eq!(err, ScheduleError::QueueFull);

        gateway.open();
        coordinator.drain().await;
        assert_eq!(progress.ok.load(Ordering::SeqCst), 2);
        assert_eq!(progress.failed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_aggregate_feedback_failure_keeps_completed_session() {
        let repo = Arc::new(MemoryRepository::with_questions(sample_questions()));
        let gateway = FnGateway::new(|request: &CompletionRequest| {
            if request.system_prompt == InterviewPromptTemplate::aggregate_system() {
                Err(ProviderError::Timeout)
            } else if request.system_prompt == InterviewPromptTemplate::feedback_system() {
                Ok("Clear and correct.".to_string())
            } else {
                Ok("SCORE: 100".to_string())
            }
        });
        let progress = Arc::new(CountingProgress::default());
        let coordinator = BackgroundCoordinator::start_with_progress(
            processor(repo.clone(), Arc::new(gateway)),
            WorkerConfig::default(),
            progress.clone(),
        );

        let session = StartInterviewUseCase::new(
            repo.clone(),
            Arc::new(ScriptGenerator::templates()),
            SessionLimits::default(),
        )
        .execute(
            StartInterviewInput::new("alice", 1)
                .with_topic(TopicFilter::Topic("Stacks & Queues".to_string())),
        )
        .await
        .unwrap();

        let conduct = ConductInterviewUseCase::new(repo.clone(), coordinator.scheduler());
        let receipt = conduct
            .submit_answer(&UserId::new("alice"), session.id(), "Push and pop on a stack.")
            .await
            .unwrap();
        assert!(receipt.completed);
        coordinator.drain().await;

        let stored = repo.get_session(session.id()).await.unwrap();
        assert_eq!(stored.status(), SessionStatus::Completed);
        assert_eq!(stored.aggregate_feedback(), None);
        assert!(repo.get_answer(receipt.answer_id).await.unwrap().graded);
        assert_eq!(progress.failed.load(Ordering::SeqCst), 1);
        assert_eq!(progress.ok.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_schedule_after_drain_reports_closed_queue() {
        let repo = Arc::new(MemoryRepository::default());
        let coordinator =
            BackgroundCoordinator::start(processor(repo, Arc::new(grading_gateway())), WorkerConfig::default());
        let scheduler = coordinator.scheduler();
        coordinator.drain().await;

        let err = scheduler
            .schedule(BackgroundTask::SummarizeSession {
                session_id: SessionId::generate(),
            })
            .unwrap_err();
        assert_eq!(err, ScheduleError::QueueClosed);
    }
}
