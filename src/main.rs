use anyhow::Result;
use clap::{Parser, Subcommand};
use resume_coach::config::{ConfigLayer, ConfigLoader};
use resume_coach::extract::{extract_file, text_or_file, AutoExtractor};
use resume_coach::render::{self, SpinnerProgress};
use resume_coach::{CoachError, CoachSession, Feature, FeatureOutcome, TaskRequest};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace};

#[derive(Parser)]
#[command(name = "resume-coach")]
#[command(about = "AI resume coach: ATS checks, job description analysis and interview prep", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file, applied after the global config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Gemini API key (overrides config and environment)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model name, e.g. gemini-1.5-flash
    #[arg(long, global = true)]
    model: Option<String>,

    /// Directory for result files
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Print results without writing result files
    #[arg(long, global = true)]
    no_download: bool,

    /// Skip the API key check before running a feature
    #[arg(long, global = true)]
    skip_key_check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available features
    Features,
    /// Check that the API key is accepted
    ValidateKey,
    /// ATS check of a resume on its own
    Ats {
        /// Resume file (PDF or text)
        #[arg(short, long)]
        resume: PathBuf,
    },
    /// ATS compatibility of a resume against a job description
    AtsJd {
        #[arg(short, long)]
        resume: PathBuf,
        /// Job description text or file
        #[arg(short, long)]
        jd: String,
        /// Follow up with suggestions for the missing keywords
        #[arg(long)]
        suggest: bool,
    },
    /// Suggestions for a piece of resume content
    Suggest {
        /// Resume content text or file
        #[arg(long)]
        content: String,
    },
    /// Generate a tailored resume and cover letter
    Generate {
        #[arg(short, long)]
        jd: String,
        /// Existing resume to build on
        #[arg(long)]
        current_resume: Option<PathBuf>,
    },
    /// Extract skills, qualifications and keywords from a job description
    AnalyzeJd {
        #[arg(short, long)]
        jd: String,
    },
    /// Company background for interview preparation
    Company {
        /// Company name
        name: String,
    },
    /// LinkedIn profile review
    Linkedin {
        /// Exported profile (PDF or text)
        #[arg(short, long)]
        profile: PathBuf,
    },
    /// Likely interview questions with STAR answers
    Interview {
        #[arg(short, long)]
        resume: PathBuf,
        #[arg(short, long)]
        jd: String,
    },
    /// Skill gaps and course recommendations
    SkillGap {
        #[arg(short, long)]
        resume: PathBuf,
        #[arg(short, long)]
        jd: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,reqwest=debug", // -vvv shows everything including dependencies
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("resume-coach started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", redacted_args());

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        match e.downcast_ref::<CoachError>() {
            Some(coach_error) => render::show_error(coach_error),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

/// What a command line asks for, with its inputs already read
enum Plan {
    ListFeatures,
    ValidateKey,
    Run {
        request: TaskRequest,
        suggest_keywords: bool,
    },
}

async fn run(cli: Cli) -> Result<()> {
    // Inputs are read before any configuration or network access
    let plan = plan(cli.command)?;
    if let Plan::ListFeatures = plan {
        show_features();
        return Ok(());
    }

    let overrides = ConfigLayer {
        api_key: cli.api_key,
        model: cli.model,
        output_dir: cli.output,
        download: cli.no_download.then_some(false),
        ..Default::default()
    };
    let config = ConfigLoader::resolve(cli.config, overrides).await?;
    let session = CoachSession::from_config(config)?;

    let (request, suggest_keywords) = match plan {
        Plan::Run {
            request,
            suggest_keywords,
        } => (request, suggest_keywords),
        Plan::ValidateKey | Plan::ListFeatures => {
            session.validate_credential().await?;
            println!("✓ API key is valid");
            return Ok(());
        }
    };

    if !cli.skip_key_check {
        session.validate_credential().await?;
    }

    let outcome = run_feature(&session, &request).await?;

    if suggest_keywords {
        let missing = outcome
            .structured()
            .map(|normalized| render::missing_keywords(&normalized.record))
            .unwrap_or_default();
        match (&request, missing.is_empty()) {
            (TaskRequest::AtsWithJobDescription { job_description, .. }, false) => {
                let follow_up = TaskRequest::KeywordSuggestions {
                    missing_keywords: missing,
                    job_description: job_description.clone(),
                };
                run_feature(&session, &follow_up).await?;
            }
            _ => info!("No missing keywords; skipping keyword suggestions"),
        }
    }

    Ok(())
}

fn plan(command: Commands) -> Result<Plan> {
    let request = match command {
        Commands::Features => return Ok(Plan::ListFeatures),
        Commands::ValidateKey => return Ok(Plan::ValidateKey),
        Commands::AtsJd {
            resume,
            jd,
            suggest,
        } => {
            return Ok(Plan::Run {
                request: TaskRequest::AtsWithJobDescription {
                    resume: read_document(&resume)?,
                    job_description: read_text(&jd)?,
                },
                suggest_keywords: suggest,
            })
        }
        Commands::Ats { resume } => TaskRequest::AtsResume {
            resume: read_document(&resume)?,
        },
        Commands::Suggest { content } => TaskRequest::ContentSuggestions {
            content: read_text(&content)?,
        },
        Commands::Generate { jd, current_resume } => TaskRequest::GenerateResume {
            job_description: read_text(&jd)?,
            current_resume: current_resume
                .as_deref()
                .map(read_document)
                .transpose()?,
        },
        Commands::AnalyzeJd { jd } => TaskRequest::AnalyzeJobDescription {
            job_description: read_text(&jd)?,
        },
        Commands::Company { name } => TaskRequest::CompanyInfo { company: name },
        Commands::Linkedin { profile } => TaskRequest::LinkedinOptimization {
            profile: read_document(&profile)?,
        },
        Commands::Interview { resume, jd } => TaskRequest::InterviewPreparation {
            resume: read_document(&resume)?,
            job_description: read_text(&jd)?,
        },
        Commands::SkillGap { resume, jd } => TaskRequest::SkillGapAnalysis {
            resume: read_document(&resume)?,
            job_description: read_text(&jd)?,
        },
    };
    Ok(Plan::Run {
        request,
        suggest_keywords: false,
    })
}

async fn run_feature(session: &CoachSession, request: &TaskRequest) -> Result<FeatureOutcome> {
    let feature = request.feature();
    let spinner = SpinnerProgress::new(feature.label());
    let outcome = session.run(request, &spinner).await?;

    render::show_outcome(&outcome);

    let config = session.config();
    if config.download {
        let contents = outcome.artifact_text()?;
        let path = render::write_artifact(&config.output_dir, &outcome.artifact_name, &contents)
            .map_err(CoachError::from)?;
        render::show_saved(&path);
    }

    Ok(outcome)
}

fn read_document(path: &Path) -> Result<String, CoachError> {
    Ok(extract_file(&AutoExtractor, path)?)
}

fn read_text(input: &str) -> Result<String, CoachError> {
    Ok(text_or_file(&AutoExtractor, input)?)
}

fn show_features() {
    println!("Available features:");
    for feature in Feature::ALL {
        let kind = if feature.schema().is_some() {
            "structured"
        } else {
            "text"
        };
        println!("  {:<24} {} ({kind})", feature.slug(), feature.label());
    }
}

/// Process arguments with the API key value masked
fn redacted_args() -> Vec<String> {
    let mut redact_next = false;
    std::env::args()
        .map(|arg| {
            if std::mem::take(&mut redact_next) {
                "<redacted>".to_string()
            } else if arg == "--api-key" {
                redact_next = true;
                arg
            } else if arg.starts_with("--api-key=") {
                "--api-key=<redacted>".to_string()
            } else {
                arg
            }
        })
        .collect()
}
