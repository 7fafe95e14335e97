use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use tokio::time::{interval, Instant};
use uuid::Uuid;

use crate::modules::jobs::dto::{StatusResponse, UploadResponse};
use crate::modules::jobs::model::JobStatus;

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const POLL_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Parser)]
#[command(name = "avforge", version, about = "Media pairing service: combines a media file with an audio track")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve,
    /// Upload a media+audio pair and wait for the processed result
    Upload {
        /// Path to the media file (image or video)
        #[arg(short, long)]
        media: PathBuf,
        /// Path to the audio file
        #[arg(short, long)]
        audio: PathBuf,
        /// Base URL of the API server
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Upload { media, audio, url }) => upload(&media, &audio, &url).await,
        Some(Commands::Serve) | None => crate::app::serve().await,
    }
}

async fn upload(media: &Path, audio: &Path, url: &str) -> anyhow::Result<()> {
    if !media.exists() {
        bail!("media file not found: {}", media.display());
    }
    if !audio.exists() {
        bail!("audio file not found: {}", audio.display());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let form = Form::new()
        .part("media", file_part(media).await?)
        .part("audio", file_part(audio).await?);

    println!("📤 Uploading files...");
    let resp = client
        .post(format!("{url}/upload"))
        .multipart(form)
        .send()
        .await
        .context("failed to reach the API server")?;

    if !resp.status().is_success() {
        bail!("upload failed: {}", resp.text().await.unwrap_or_default());
    }

    let uploaded: UploadResponse = resp.json().await.context("failed to parse response")?;
    println!("✅ Upload successful, job {}", uploaded.uuid);
    println!("🔍 Check status: curl {url}/status/{}", uploaded.uuid);

    poll_status(&client, url, uploaded.uuid).await
}

async fn file_part(path: &Path) -> anyhow::Result<Part> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Part::bytes(data)
        .file_name(filename)
        .mime_str(mime.as_ref())?)
}

async fn poll_status(client: &reqwest::Client, url: &str, uuid: Uuid) -> anyhow::Result<()> {
    println!("\n⏳ Waiting for processing...");
    let deadline = Instant::now() + POLL_TIMEOUT;
    let mut ticker = interval(POLL_INTERVAL);
    ticker.tick().await; // first tick fires immediately

    loop {
        ticker.tick().await;
        if Instant::now() > deadline {
            bail!("timed out waiting for processing");
        }

        let resp = client
            .get(format!("{url}/status/{uuid}"))
            .send()
            .await
            .context("failed to check status")?;
        if !resp.status().is_success() {
            bail!("status check failed: {}", resp.status());
        }

        let status: StatusResponse = resp.json().await.context("failed to parse status")?;
        match status.status {
            JobStatus::Ready => {
                println!("\n✅ Processing complete!");
                if let Some(download_url) = status.url {
                    println!("📥 Download: {download_url}");
                }
                return Ok(());
            }
            JobStatus::Failed => bail!("processing failed"),
            _ => {
                use std::io::Write;
                print!(".");
                let _ = std::io::stdout().flush();
            }
        }
    }
}
