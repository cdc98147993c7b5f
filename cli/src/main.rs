//! CLI entrypoint for Interview Coach
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use interview_application::{
    BackgroundCoordinator, CompositeGrader, ConductInterviewUseCase, ExchangeLogger,
    FeedbackWriter, InterviewConfig, InterviewRepository, LlmGateway, NoExchangeLogger, NoProgress,
    ProcessingProgress, QuestionCatalogUseCase, ReviewSessionUseCase, ScriptGenerator,
    StartInterviewInput, StartInterviewUseCase, TaskProcessor,
};
use interview_domain::{Difficulty, QuestionFilter, SessionId, TopicFilter, UserId};
use interview_infrastructure::{
    ApiClient, ConfigLoader, FileConfig, InMemoryRepository, JsonlExchangeLogger,
    OpenAiCompatGateway, OpenAiEmbedder, OpenAiSpeech, SpeechSettings, load_question_bank,
};
use interview_presentation::{
    Cli, Command, ConsoleFormatter, InterviewRepl, JsonFormatter, OutputFormat, ProgressReporter,
    ReplOutcome, ReportFormatter,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    let config = file_config
        .to_interview_config()
        .context("Invalid configuration")?;

    let _log_guard = init_logging(cli.verbose, file_config.logging.file.as_deref());
    info!("Starting Interview Coach");

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let repository = open_repository(&file_config).await?;
    let formatter: Box<dyn ReportFormatter> = match cli.output {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };
    let user = UserId::from(cli.user.as_str());

    match command {
        Command::Interview {
            topic,
            difficulty,
            count,
            script,
            speak,
        } => {
            let difficulty = match difficulty {
                Some(d) => d.parse::<Difficulty>()?,
                None => file_config.default_difficulty()?,
            };
            let count = count.unwrap_or(file_config.session.default_questions);
            let input = StartInterviewInput::new(user.clone(), count)
                .with_topic(topic.parse::<TopicFilter>()?)
                .with_difficulty(difficulty);

            let mut config = config;
            if let Some(strategy) = script {
                config.script.strategy = strategy.parse().map_err(|e: String| anyhow!(e))?;
            }

            run_interview(&cli, &file_config, config, repository, formatter.as_ref(), user, input, speak)
                .await?;
        }
        Command::Questions { topic, difficulty } => {
            let filter = QuestionFilter {
                difficulty: difficulty.map(|d| d.parse::<Difficulty>()).transpose()?,
                topic: topic.filter(|t| !t.trim().is_empty()),
            };
            let counts = QuestionCatalogUseCase::new(repository)
                .pool_counts(&filter)
                .await?;
            println!("{}", formatter.format_pool(&counts));
        }
        Command::History => {
            if file_config.questions.snapshot.is_none() {
                warn!("No [questions] snapshot configured; history only covers this process");
            }
            let review = ReviewSessionUseCase::new(repository);
            let history = review.history(&user).await?;
            let topics = review.topic_breakdown(&user).await?;
            println!("{}", formatter.format_history(&history, &topics));
        }
        Command::Summary { session_id } => {
            let session_id: SessionId = session_id.parse()?;
            let summary = ReviewSessionUseCase::new(repository)
                .summary(&user, session_id)
                .await?;
            println!("{}", formatter.format_summary(&summary));
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_interview(
    cli: &Cli,
    file_config: &FileConfig,
    config: InterviewConfig,
    repository: Arc<dyn InterviewRepository>,
    formatter: &dyn ReportFormatter,
    user: UserId,
    input: StartInterviewInput,
    speak: bool,
) -> Result<()> {
    if speak && !file_config.speech.enabled {
        bail!("--speak requires [speech] enabled = true in the configuration");
    }

    // === Dependency Injection ===
    let logger = exchange_logger(file_config);
    let provider = &file_config.provider;
    let provider_key = provider.resolve_api_key();
    if provider_key.is_none() {
        warn!(
            "No API key found in {}; provider requests will likely be rejected",
            provider.api_key_env
        );
    }

    let gateway: Arc<dyn LlmGateway> = Arc::new(OpenAiCompatGateway::new(
        ApiClient::new(
            &provider.base_url,
            provider_key,
            Duration::from_secs(provider.timeout_secs),
        )?,
        &provider.model,
    ));

    let embedding = &file_config.embedding;
    let embedder = Arc::new(OpenAiEmbedder::new(
        ApiClient::new(
            embedding.base_url(provider),
            embedding.resolve_api_key(provider),
            Duration::from_secs(embedding.timeout_secs(provider)),
        )?,
        &embedding.model,
    ));

    let grader = Arc::new(
        CompositeGrader::new(gateway.clone(), embedder, config.grading.clone()).with_logger(logger.clone()),
    );
    let feedback =
        Arc::new(FeedbackWriter::new(gateway.clone(), config.feedback.clone()).with_logger(logger.clone()));
    let processor = Arc::new(TaskProcessor::new(repository.clone(), grader, feedback));

    let show_progress = !cli.quiet && cli.output == OutputFormat::Text;
    let reporter = Arc::new(ProgressReporter::hidden());
    let progress: Arc<dyn ProcessingProgress> = if show_progress {
        reporter.clone()
    } else {
        Arc::new(NoProgress)
    };
    let coordinator = BackgroundCoordinator::start_with_progress(processor, config.worker, progress);

    let mut conduct = ConductInterviewUseCase::new(repository.clone(), coordinator.scheduler());
    let speech = &file_config.speech;
    if speech.enabled {
        let client = ApiClient::new(
            speech.base_url(provider),
            speech.resolve_api_key(provider),
            Duration::from_secs(speech.timeout_secs),
        )?;
        let settings = SpeechSettings {
            tts_model: speech.tts_model.clone(),
            voice: speech.voice.clone(),
            instructions: speech.instructions.clone(),
            stt_model: speech.stt_model.clone(),
        };
        conduct = conduct.with_speech(Arc::new(OpenAiSpeech::new(client, settings, &speech.audio_dir)));
    }
    let conduct = Arc::new(conduct);

    let script = Arc::new(ScriptGenerator::new(gateway, config.script.clone()).with_logger(logger));
    let session = StartInterviewUseCase::new(repository.clone(), script, config.session)
        .execute(input)
        .await?;
    info!("Started session {}", session.id());

    let outcome = InterviewRepl::new(conduct, user.clone(), session.id())
        .with_speech(speak)
        .run()
        .await?;

    if show_progress {
        reporter.show();
    }
    coordinator.drain().await;

    match outcome {
        ReplOutcome::Completed => {
            let summary = ReviewSessionUseCase::new(repository)
                .summary(&user, session.id())
                .await?;
            println!("{}", formatter.format_summary(&summary));
        }
        ReplOutcome::Abandoned => {
            println!("Session {} left in progress.", session.id());
        }
    }
    Ok(())
}

/// Load the question bank and open the session store.
async fn open_repository(file_config: &FileConfig) -> Result<Arc<dyn InterviewRepository>> {
    let bank = &file_config.questions.bank;
    let questions = load_question_bank(bank)
        .with_context(|| format!("Failed to load question bank {}", bank.display()))?;
    info!("Loaded {} questions from {}", questions.len(), bank.display());

    let repository = match &file_config.questions.snapshot {
        Some(path) => InMemoryRepository::open(path, questions)
            .await
            .with_context(|| format!("Failed to open snapshot {}", path.display()))?,
        None => InMemoryRepository::with_questions(questions),
    };
    Ok(Arc::new(repository))
}

fn exchange_logger(file_config: &FileConfig) -> Arc<dyn ExchangeLogger> {
    let logging = &file_config.logging;
    let Some(path) = &logging.exchange_log else {
        return Arc::new(NoExchangeLogger);
    };
    match JsonlExchangeLogger::open(path, logging.exchange_max_chars) {
        Ok(logger) => {
            info!("Logging model exchanges to {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Exchange log {} unavailable: {}", path.display(), e);
            Arc::new(NoExchangeLogger)
        }
    }
}

/// Initialize logging based on verbosity level.
///
/// With a log file configured, output goes through a non-blocking writer;
/// the returned guard must live until exit so buffered lines are flushed.
fn init_logging(verbose: u8, file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return None;
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "interview-coach.log".into());
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Some(guard)
}
