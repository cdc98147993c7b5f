//! Conduct Interview use case
//!
//! Serves the current question of a session and accepts answers. Accepting
//! an answer is the only operation that moves a session forward:
//!
//! 1. reject blank transcripts before touching storage
//! 2. take the per-session lock
//! 3. compute the advance, then write it together with the provisional
//!    answer (compare-and-swap on the index)
//! 4. hand grading (and, on completion, the aggregate pass) to the scheduler

use super::error::InterviewError;
use crate::ports::repository::InterviewRepository;
use crate::ports::speech::{AudioClip, AudioRef, SpeechPort};
use crate::ports::task_scheduler::{BackgroundTask, TaskScheduler};
use chrono::Utc;
use interview_domain::{
    Answer, AnswerId, Question, Session, SessionId, UserId, compose_spoken_text,
};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Per-session critical sections
///
/// Entries only live while a submission holds or waits for them, so
/// abandoned sessions leave nothing behind.
#[derive(Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Weak<Mutex<()>>>>,
}

impl SessionLocks {
    pub async fn lock_for(&self, id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| lock.strong_count() > 0);
        if let Some(lock) = locks.get(&id).and_then(Weak::upgrade) {
            return lock;
        }
        let lock = Arc::new(Mutex::new(()));
        locks.insert(id, Arc::downgrade(&lock));
        lock
    }

    #[cfg(test)]
    async fn active(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| lock.strong_count() > 0)
            .count()
    }
}

/// The question a candidate should answer next
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPrompt {
    pub session_id: SessionId,
    pub index: usize,
    pub total: usize,
    pub question: Question,
    /// Narration read before the question
    pub prefix: Option<String>,
    /// Narration followed by the question text
    pub spoken_text: String,
}

/// Result of an accepted answer
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub answer_id: AnswerId,
    pub answered_index: usize,
    pub completed: bool,
    /// Closing line, set when this answer completed the session
    pub closing: Option<String>,
}

pub struct ConductInterviewUseCase {
    repository: Arc<dyn InterviewRepository>,
    scheduler: Arc<dyn TaskScheduler>,
    speech: Option<Arc<dyn SpeechPort>>,
    locks: SessionLocks,
}

impl ConductInterviewUseCase {
    pub fn new(repository: Arc<dyn InterviewRepository>, scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self {
            repository,
            scheduler,
            speech: None,
            locks: SessionLocks::default(),
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechPort>) -> Self {
        self.speech = Some(speech);
        self
    }

    async fn owned_session(&self, user: &UserId, id: SessionId) -> Result<Session, InterviewError> {
        let session = self.repository.get_session(id).await?;
        if !session.is_owned_by(user) {
            return Err(InterviewError::NotFound(format!("session not found: {}", id)));
        }
        Ok(session)
    }

    /// The question awaiting an answer, with its narration prefix.
    ///
    /// Read-only; repeated calls without an answer return the same prompt.
    pub async fn current_question(
        &self,
        user: &UserId,
        session_id: SessionId,
    ) -> Result<QuestionPrompt, InterviewError> {
        let session = self.owned_session(user, session_id).await?;
        let slot = session.current_slot()?;
        let question = self.repository.get_question(slot.question_id).await?;
        let spoken_text = compose_spoken_text(slot.prefix.as_deref(), &question.text);

        Ok(QuestionPrompt {
            session_id,
            index: slot.index,
            total: slot.total,
            question,
            prefix: slot.prefix,
            spoken_text,
        })
    }

    /// Synthesize the current question, narration first.
    pub async fn speak_current(
        &self,
        user: &UserId,
        session_id: SessionId,
    ) -> Result<(QuestionPrompt, Option<AudioRef>), InterviewError> {
        let prompt = self.current_question(user, session_id).await?;
        let audio = match &self.speech {
            Some(speech) => Some(speech.speak(&prompt.spoken_text).await?),
            None => None,
        };
        Ok((prompt, audio))
    }

    /// Synthesize the closing line of a completed session.
    pub async fn speak_closing(
        &self,
        user: &UserId,
        session_id: SessionId,
    ) -> Result<Option<AudioRef>, InterviewError> {
        let session = self.owned_session(user, session_id).await?;
        match (session.closing(), &self.speech) {
            (Some(closing), Some(speech)) => Ok(Some(speech.speak(closing).await?)),
            _ => Ok(None),
        }
    }

    /// Transcribe recorded audio into an answer transcript.
    pub async fn transcribe(&self, audio: &AudioClip) -> Result<String, InterviewError> {
        match &self.speech {
            Some(speech) => Ok(speech.listen(audio).await?),
            None => Err(InterviewError::Validation(
                "speech is not configured".to_string(),
            )),
        }
    }

    /// Accept an answer to the current question.
    pub async fn submit_answer(
        &self,
        user: &UserId,
        session_id: SessionId,
        transcript: &str,
    ) -> Result<SubmissionReceipt, InterviewError> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(InterviewError::Validation(
                "answer transcript cannot be empty".to_string(),
            ));
        }

        let lock = self.locks.lock_for(session_id).await;
        let _guard = lock.lock().await;

        let session = self.owned_session(user, session_id).await?;
        let advance = session.advance(Utc::now())?;
        let completed = advance.completes_session();

        let answer = Answer::provisional(session_id, advance.question_id, transcript, Utc::now());
        let answer_id = answer.id;
        let updated = self
            .repository
            .advance_session(session_id, &advance.patch, answer)
            .await?;
        debug!(
            "Stored provisional answer {} for question {} of session {}",
            answer_id,
            advance.answered_index + 1,
            session_id
        );

        self.scheduler.schedule(BackgroundTask::GradeAnswer {
            session_id,
            answer_id,
            question_id: advance.question_id,
            transcript: transcript.to_string(),
        })?;

        if completed {
            info!("Session {} completed", session_id);
            self.scheduler
                .schedule(BackgroundTask::SummarizeSession { session_id })?;
        }

        Ok(SubmissionReceipt {
            answer_id,
            answered_index: advance.answered_index,
            completed,
            closing: updated.closing().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionLimits;
    use crate::ports::speech::SpeechError;
    use crate::test_support::{MemoryRepository, RecordingScheduler, sample_questions};
    use crate::use_cases::generate_script::ScriptGenerator;
    use crate::use_cases::start_interview::{StartInterviewInput, StartInterviewUseCase};
    use async_trait::async_trait;
    use interview_domain::{SessionStatus, TopicFilter};

    struct EchoSpeech;

    #[async_trait]
    impl SpeechPort for EchoSpeech {
        async fn speak(&self, text: &str) -> Result<AudioRef, SpeechError> {
            Ok(AudioRef(format!("tts://{}", text)))
        }

        async fn listen(&self, audio: &AudioClip) -> Result<String, SpeechError> {
            String::from_utf8(audio.bytes.clone())
                .map_err(|e| SpeechError::Transcription(e.to_string()))
        }
    }

    struct Fixture {
        repo: Arc<MemoryRepository>,
        scheduler: Arc<RecordingScheduler>,
        use_case: ConductInterviewUseCase,
        user: UserId,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MemoryRepository::with_questions(sample_questions()));
        let scheduler = Arc::new(RecordingScheduler::default());
        let use_case = ConductInterviewUseCase::new(repo.clone(), scheduler.clone())
            .with_speech(Arc::new(EchoSpeech));
        Fixture {
            repo,
            scheduler,
            use_case,
            user: UserId::new("alice"),
        }
    }

    async fn start(f: &Fixture, count: usize) -> Session {
        StartInterviewUseCase::new(
            f.repo.clone(),
            Arc::new(ScriptGenerator::templates()),
            SessionLimits::default(),
        )
        .execute(
            StartInterviewInput::new(f.user.clone(), count)
                .with_topic(TopicFilter::Topic("Databases".to_string())),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_current_question_is_idempotent_and_narrated() {
        let f = fixture();
        let session = start(&f, 2).await;

        let first = f.use_case.current_question(&f.user, session.id()).await.unwrap();
        let again = f.use_case.current_question(&f.user, session.id()).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(first.index, 0);
        assert_eq!(first.question.id, session.question_ids()[0]);
        assert_eq!(first.prefix.as_deref(), Some(session.narration().intro.as_str()));
        assert!(first.spoken_text.starts_with(&session.narration().intro));
        assert!(first.spoken_text.ends_with(&first.question.text));
    }

    #[tokio::test]
    async fn test_speak_current_uses_composed_text() {
        let f = fixture();
        let session = start(&f, 1).await;
        let (prompt, audio) = f.use_case.speak_current(&f.user, session.id()).await.unwrap();
        assert_eq!(audio, Some(AudioRef(format!("tts://{}", prompt.spoken_text))));
    }

    #[tokio::test]
    async fn test_submit_advances_and_schedules_grading() {
        let f = fixture();
        let session = start(&f, 2).await;

        let receipt = f
            .use_case
            .submit_answer(&f.user, session.id(), "  An index speeds up lookups.  ")
            .await
            .unwrap();
        assert_eq!(receipt.answered_index, 0);
        assert!(!receipt.completed);
        assert!(receipt.closing.is_none());

        let stored = f.repo.get_session(session.id()).await.unwrap();
        assert_eq!(stored.current_index(), 1);

        let answer = f.repo.get_answer(receipt.answer_id).await.unwrap();
        assert_eq!(answer.transcript, "An index speeds up lookups.");
        assert_eq!(answer.score, 0);
        assert!(!answer.graded);

        let tasks = f.scheduler.tasks();
        assert_eq!(tasks.len(), 1);
        assert!(matches!(
            &tasks[0],
            BackgroundTask::GradeAnswer { answer_id, .. } if *answer_id == receipt.answer_id
        ));

        let next = f.use_case.current_question(&f.user, session.id()).await.unwrap();
        assert_eq!(next.index, 1);
        assert_eq!(next.prefix.as_deref(), Some(session.narration().transitions[0].as_str()));
    }

    #[tokio::test]
    async fn test_last_answer_completes_session() {
        let f = fixture();
        let session = start(&f, 1).await;

        let receipt = f
            .use_case
            .submit_answer(&f.user, session.id(), "A unique row identifier.")
            .await
            .unwrap();
        assert!(receipt.completed);
        assert_eq!(receipt.closing.as_deref(), Some(session.narration().closing.as_str()));

        let stored = f.repo.get_session(session.id()).await.unwrap();
        assert_eq!(stored.status(), SessionStatus::Completed);
        assert!(stored.ended_at().is_some());

        let tasks = f.scheduler.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(
            tasks[1],
            BackgroundTask::SummarizeSession {
                session_id: session.id()
            }
        );

        let err = f
            .use_case
            .submit_answer(&f.user, session.id(), "again")
            .await
            .unwrap_err();
        assert_eq!(err, InterviewError::SessionNotActive);
        assert_eq!(
            f.use_case.current_question(&f.user, session.id()).await.unwrap_err(),
            InterviewError::SessionNotActive
        );

        let closing = f.use_case.speak_closing(&f.user, session.id()).await.unwrap();
        assert!(closing.is_some());
    }

    #[tokio::test]
    async fn test_blank_transcript_rejected_before_mutation() {
        let f = fixture();
        let session = start(&f, 2).await;

        let err = f
            .use_case
            .submit_answer(&f.user, session.id(), " \n\t ")
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::Validation(_)));
        assert_eq!(f.repo.get_session(session.id()).await.unwrap().current_index(), 0);
        assert!(f.repo.list_answers(session.id()).await.unwrap().is_empty());
        assert!(f.scheduler.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_answer_write_leaves_cursor_in_place() {
        let f = fixture();
        let session = start(&f, 2).await;
        let first = session.question_ids()[0];
        f.repo
            .create_answer(Answer::provisional(session.id(), first, "earlier", Utc::now()))
            .await
            .unwrap();

        let err = f
            .use_case
            .submit_answer(&f.user, session.id(), "An index speeds up lookups.")
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::Conflict(_)));

        let stored = f.repo.get_session(session.id()).await.unwrap();
        assert_eq!(stored.current_index(), 0);
        assert_eq!(f.repo.list_answers(session.id()).await.unwrap().len(), 1);
        assert!(f.scheduler.tasks().is_empty());
        assert_eq!(
            f.use_case.current_question(&f.user, session.id()).await.unwrap().question.id,
            first
        );
    }

    #[tokio::test]
    async fn test_abandoned_session_leaves_no_lock() {
        let f = fixture();
        let session = start(&f, 2).await;
        f.use_case
            .submit_answer(&f.user, session.id(), "only the first")
            .await
            .unwrap();
        assert_eq!(f.use_case.locks.active().await, 0);
    }

    #[tokio::test]
    async fn test_session_lock_shared_while_held() {
        let locks = SessionLocks::default();
        let a = SessionId::generate();
        let held = locks.lock_for(a).await;
        let again = locks.lock_for(a).await;
        assert!(Arc::ptr_eq(&held, &again));
        assert_eq!(locks.active().await, 1);

        drop(held);
        drop(again);
        let _b = locks.lock_for(SessionId::generate()).await;
        assert_eq!(locks.locks.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_other_users_session_is_not_found() {
        let f = fixture();
        let session = start(&f, 1).await;
        let mallory = UserId::new("mallory");

        assert!(matches!(
            f.use_case.current_question(&mallory, session.id()).await.unwrap_err(),
            InterviewError::NotFound(_)
        ));
        assert!(matches!(
            f.use_case.submit_answer(&mallory, session.id(), "hi").await.unwrap_err(),
            InterviewError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_advance_once_each() {
        let f = fixture();
        let session = start(&f, 3).await;
        let use_case = Arc::new(f.use_case);

        let mut handles = Vec::new();
        for i in 0..5 {
            let uc = Arc::clone(&use_case);
            let user = f.user.clone();
            let id = session.id();
            handles.push(tokio::spawn(async move {
                uc.submit_answer(&user, id, &format!("answer {}", i)).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 3);

        let stored = f.repo.get_session(session.id()).await.unwrap();
        assert_eq!(stored.current_index(), 3);
        assert_eq!(f.repo.list_answers(session.id()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_transcribe() {
        let f = fixture();
        let clip = AudioClip {
            file_name: "answer.webm".to_string(),
            bytes: b"a queue is FIFO".to_vec(),
        };
        assert_eq!(f.use_case.transcribe(&clip).await.unwrap(), "a queue is FIFO");
    }
}
