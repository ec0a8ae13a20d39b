//! Thurgood CLI: command-line client for the case.dev legal-AI API.
//!
//! Set THURGOOD_API_KEY (or CASEDEV_API_KEY). THURGOOD_BASE_URL overrides the endpoint.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use thurgood_cli::{error_hint, init_tracing, search_summary};
use thurgood_client::ApiClient;
use thurgood_core::models::{
    status_line, FormatRequest, FormattedDocument, InputFormat, Job, JobPhase, OcrFormat,
    OcrRequest, OutputFormat, ResearchModel, SearchMethod, SearchQuery, TranscriptionRequest,
    TranscriptionSource,
};

#[derive(Parser)]
#[command(name = "thurgood", about = "case.dev legal-AI CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vault operations
    Vault {
        #[command(subcommand)]
        sub: VaultCommands,
    },
    /// OCR jobs
    Ocr {
        #[command(subcommand)]
        sub: OcrCommands,
    },
    /// Transcription jobs
    Transcribe {
        #[command(subcommand)]
        sub: TranscribeCommands,
    },
    /// Run a research task
    Research {
        /// What to research
        instructions: String,
        /// Depth: fast, normal or pro
        #[arg(long, default_value = "normal")]
        model: String,
    },
    /// Format a document into pdf, docx or an HTML preview
    Format {
        /// File holding the content to format
        input: PathBuf,
        /// Input format: md, json or text
        #[arg(long, default_value = "md")]
        from: String,
        /// Output format: pdf, docx or html_preview
        #[arg(long, default_value = "pdf")]
        to: String,
        /// Where to write the result (binary formats are written to stdout otherwise)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum VaultCommands {
    /// Create a vault
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List vaults
    List,
    /// Upload a file into a vault
    Upload {
        vault_id: String,
        file: PathBuf,
        /// Store the file without indexing it
        #[arg(long)]
        no_index: bool,
    },
    /// List objects in a vault
    Objects { vault_id: String },
    /// Print the extracted text of an object
    Text { vault_id: String, object_id: String },
    /// Download an object (to stdout unless --output is given)
    Download {
        vault_id: String,
        object_id: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Search a vault
    Search {
        vault_id: String,
        query: String,
        /// hybrid, fast, global, entity, local, vector or graph
        #[arg(long)]
        method: Option<String>,
        /// Number of results (clamped to 1-100)
        #[arg(long, allow_negative_numbers = true)]
        top_k: Option<i64>,
        /// Restrict to one object
        #[arg(long)]
        object_id: Option<String>,
        /// One line per result instead of JSON
        #[arg(long)]
        brief: bool,
    },
}

#[derive(Subcommand)]
enum OcrCommands {
    /// Submit a document URL for OCR
    Process {
        document_url: String,
        #[arg(long)]
        engine: Option<String>,
    },
    /// Show the status of an OCR job
    Status { job_id: String },
    /// Download an OCR result
    Download {
        job_id: String,
        /// text, json or pdf
        #[arg(long, default_value = "text")]
        format: String,
        /// Required for pdf
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TranscribeCommands {
    /// Start a transcription from a vault object or an audio URL
    Start {
        #[arg(long, requires = "object_id")]
        vault_id: Option<String>,
        #[arg(long, requires = "vault_id")]
        object_id: Option<String>,
        #[arg(long)]
        audio_url: Option<String>,
        /// Label speakers
        #[arg(long)]
        speaker_labels: bool,
        #[arg(long)]
        language: Option<String>,
    },
    /// Show the status (and transcript, once done) of a transcription job
    Status { job_id: String },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_job<J: Job>(job: &J) -> anyhow::Result<()> {
    println!("{}", status_line(job));
    print_json(job)
}

fn write_stdout(data: &[u8]) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(data).context("Write to stdout")?;
    stdout.flush().context("Write to stdout")
}

async fn run_vault(client: &ApiClient, sub: VaultCommands) -> anyhow::Result<()> {
    match sub {
        VaultCommands::Create { name, description } => {
            print_json(&client.create_vault(&name, description.as_deref()).await?)?;
        }
        VaultCommands::List => print_json(&client.list_vaults().await?)?,
        VaultCommands::Upload {
            vault_id,
            file,
            no_index,
        } => {
            let outcome = client.upload_file(&vault_id, &file, !no_index).await?;
            print_json(&outcome)?;
        }
        VaultCommands::Objects { vault_id } => print_json(&client.list_objects(&vault_id).await?)?,
        VaultCommands::Text {
            vault_id,
            object_id,
        } => println!("{}", client.object_text(&vault_id, &object_id).await?.text),
        VaultCommands::Download {
            vault_id,
            object_id,
            output: Some(path),
        } => {
            let size_bytes = client.save_object(&vault_id, &object_id, &path).await?;
            print_json(&serde_json::json!({ "path": path, "size_bytes": size_bytes }))?;
        }
        VaultCommands::Download {
            vault_id,
            object_id,
            output: None,
        } => write_stdout(&client.download_object(&vault_id, &object_id).await?)?,
        VaultCommands::Search {
            vault_id,
            query,
            method,
            top_k,
            object_id,
            brief,
        } => {
            let mut search = SearchQuery::new(vault_id, query);
            search.method = method.map(|m| m.parse::<SearchMethod>()).transpose()?;
            search.top_k = top_k;
            search.object_id = object_id;

            let outcome = client.search(&search).await?;
            if brief || outcome.is_empty() {
                println!("{}", search_summary(&outcome, 120));
            } else {
                print_json(&outcome)?;
            }
        }
    }
    Ok(())
}

async fn run_ocr(client: &ApiClient, sub: OcrCommands) -> anyhow::Result<()> {
    match sub {
        OcrCommands::Process {
            document_url,
            engine,
        } => {
            let job = client
                .submit_ocr(&OcrRequest {
                    document_url,
                    engine,
                    features: None,
                })
                .await?;
            print_job(&job)?;
        }
        OcrCommands::Status { job_id } => print_job(&client.ocr_status(&job_id).await?)?,
        OcrCommands::Download {
            job_id,
            format,
            output,
        } => {
            let format: OcrFormat = format.parse()?;
            let download = client
                .download_ocr(&job_id, format, output.as_deref())
                .await?;
            print_json(&download)?;
        }
    }
    Ok(())
}

async fn run_transcribe(client: &ApiClient, sub: TranscribeCommands) -> anyhow::Result<()> {
    match sub {
        TranscribeCommands::Start {
            vault_id,
            object_id,
            audio_url,
            speaker_labels,
            language,
        } => {
            let source = TranscriptionSource::from_parts(vault_id, object_id, audio_url)?;
            let mut request = TranscriptionRequest::new(source);
            request.speaker_labels = speaker_labels;
            request.language_code = language;
            print_job(&client.submit_transcription(&request).await?)?;
        }
        TranscribeCommands::Status { job_id } => {
            let job = client.transcription_status(&job_id).await?;
            println!("{}", status_line(&job));
            if job.phase() == JobPhase::Succeeded {
                match job.transcript_text() {
                    Some(text) => println!("\n{}", text),
                    None => println!("\nNo transcript content."),
                }
            } else {
                print_json(&job)?;
            }
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ApiClient::from_env().context(
        "Failed to create API client. Check THURGOOD_BASE_URL, THURGOOD_TIMEOUT_MS and THURGOOD_CONFIG",
    )?;

    match cli.command {
        Commands::Vault { sub } => run_vault(&client, sub).await?,
        Commands::Ocr { sub } => run_ocr(&client, sub).await?,
        Commands::Transcribe { sub } => run_transcribe(&client, sub).await?,
        Commands::Research {
            instructions,
            model,
        } => {
            let model: ResearchModel = model.parse()?;
            print_json(&client.research(&instructions, model).await?)?;
        }
        Commands::Format {
            input,
            from,
            to,
            output,
        } => {
            let content = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let request = FormatRequest {
                content,
                input_format: from.parse::<InputFormat>()?,
                output_format: to.parse::<OutputFormat>()?,
                options: None,
            };
            let document = client.format_document(&request, output.as_deref()).await?;
            match document {
                FormattedDocument::Text { html } => println!("{}", html),
                FormattedDocument::Binary { bytes, .. } => write_stdout(&bytes)?,
                saved => print_json(&saved)?,
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if let Some(hint) = error_hint(&err) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
