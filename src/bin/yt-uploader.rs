use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use yt_uploader::{
    Authenticator, ClientSecret, CredentialStore, CsvAuditLog, ListWorkflow, LoopbackPrompt,
    OAuthManager, PrivacyStatus, StdinPrompt, UploadStatus, UploadWorkflow, VideoDetails,
    YouTubeClient,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Upload videos to YouTube and keep a local audit log of every attempt"
)]
struct Cli {
    /// Path to the Google OAuth "installed application" client secret JSON.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "YT_CLIENT_SECRET_FILE",
        default_value = "client_secret.json"
    )]
    client_secret: PathBuf,

    /// Where OAuth tokens are persisted between runs.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "YT_TOKEN_STORE",
        default_value = "tokens.json"
    )]
    token_store: PathBuf,

    /// The CSV audit log recording every upload attempt.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "YT_AUDIT_LOG",
        default_value = "upload_log.csv"
    )]
    audit_log: PathBuf,

    /// Paste the authorization code by hand instead of using the
    /// localhost-redirect browser flow.
    #[arg(long, global = true, default_value_t = false)]
    manual_code: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Uploads a video file with metadata and records the attempt.
    Upload(UploadArgs),
    /// Lists previously uploaded videos.
    List(ListArgs),
}

#[derive(Parser, Debug)]
struct UploadArgs {
    /// The video file to upload.
    #[arg(short = 'f', long = "file", value_name = "VIDEO")]
    file: PathBuf,

    /// Video title.
    #[arg(short = 't', long)]
    title: String,

    /// Video description (may be empty).
    #[arg(short = 'd', long, default_value = "")]
    description: String,

    /// Numeric YouTube category id (22 is "People & Blogs").
    #[arg(long, value_name = "ID", default_value = "22")]
    category: String,

    /// Visibility: public, private, or unlisted.
    #[arg(long, value_name = "STATUS", default_value = "private")]
    privacy: PrivacyStatus,

    /// May be given multiple times.
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Videos per page, at most 50. Defaults to 25.
    #[arg(long, value_name = "N")]
    max_results: Option<u32>,

    /// Continuation token from a previous listing.
    #[arg(long, value_name = "TOKEN")]
    page_token: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    let secret = ClientSecret::load(&cli.client_secret)?;
    let http = reqwest::Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()?;
    let store = CredentialStore::new(&cli.token_store);
    let authenticator = Authenticator::new(
        OAuthManager::new(&secret.installed),
        store.clone(),
        http,
    );

    let client = if cli.manual_code {
        authenticator.authenticate(&mut StdinPrompt).await?
    } else {
        let mut prompt = LoopbackPrompt::bind().await?;
        authenticator.authenticate(&mut prompt).await?
    };

    match cli.command {
        Commands::Upload(args) => {
            let details = VideoDetails::new(
                args.file,
                args.title,
                args.description,
                args.category,
                args.privacy,
                args.tags,
            )?;
            let audit = CsvAuditLog::open(&cli.audit_log)?;
            let mut workflow = UploadWorkflow::new(client.clone(), audit);
            let entry = workflow.run(&details).await;
            persist_token(&store, &client).await;

            match entry.status {
                UploadStatus::Success => {
                    println!(
                        "Uploaded \"{}\" -> {}",
                        entry.video_title,
                        entry.youtube_url.as_deref().unwrap_or_default()
                    );
                }
                UploadStatus::Failure => {
                    eprintln!("Upload of \"{}\" failed: {}", entry.video_title, entry.details);
                    std::process::exit(1);
                }
            }
        }
        Commands::List(args) => {
            let workflow = ListWorkflow::new(client.clone());
            let videos = workflow.run(args.max_results, args.page_token).await;
            persist_token(&store, &client).await;

            if videos.is_empty() {
                println!("No videos found.");
            }
            for video in videos {
                println!(
                    "{:25}  {}  {}",
                    video
                        .published_at
                        .map(|ts| ts.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    video.youtube_url,
                    video.title,
                );
            }
        }
    }

    Ok(())
}

/// Writes the session's token back to the store, since an API call may have
/// refreshed it. Best-effort: a failed write costs one extra consent flow
/// next run, not the operation's result.
async fn persist_token(store: &CredentialStore, client: &YouTubeClient) {
    if let Err(e) = store.save(&client.token().await).await {
        tracing::warn!(error = %e, "could not persist refreshed credentials");
    }
}
