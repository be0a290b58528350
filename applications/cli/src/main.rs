/// tale - generate and listen to narrated stories about code repositories
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tale_cli::{commands, TaleConfig};
use tale_core::{
    GenerationRequest, NarrativeStyle, TechnicalDepth, VoiceName, DEFAULT_DURATION_MINUTES,
};
use tale_server_client::StoryClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tale")]
#[command(about = "Code Tales: audio stories about code repositories", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./tale.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start generating a story for a repository
    Generate {
        /// Repository URL (e.g. https://github.com/tokio-rs/tokio)
        repo_url: String,
        /// Narrative style
        #[arg(short, long, default_value_t = NarrativeStyle::default())]
        style: NarrativeStyle,
        /// Target length in minutes (5-20)
        #[arg(short, long, default_value_t = DEFAULT_DURATION_MINUTES)]
        duration: u32,
        /// Narrator voice
        #[arg(short, long, default_value_t = VoiceName::default())]
        voice: VoiceName,
        /// How much prior knowledge to assume
        #[arg(long, default_value_t = TechnicalDepth::default())]
        depth: TechnicalDepth,
        /// Areas of the codebase to focus on (repeatable)
        #[arg(long = "focus")]
        focus: Vec<String>,
        /// Wait for the story to finish
        #[arg(short, long)]
        wait: bool,
    },
    /// Show a story's pipeline status
    Status {
        /// Story ID
        id: String,
        /// Keep polling until the story completes or fails
        #[arg(short, long)]
        watch: bool,
    },
    /// Restart a failed story
    Restart {
        /// Story ID
        id: String,
    },
    /// Play one or more finished stories
    Play {
        /// Story IDs, played in order
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tale=info,tale_cli=info,tale_playback=info,tale_server_client=info,tale_audio_desktop=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = TaleConfig::load(cli.config.as_deref())?;
    tracing::debug!(server = %config.server.base_url, "Configuration loaded");

    let client = StoryClient::new(config.server.clone())?;

    match cli.command {
        Commands::Generate {
            repo_url,
            style,
            duration,
            voice,
            depth,
            focus,
            wait,
        } => {
            let request = GenerationRequest::new(repo_url)
                .with_style(style)
                .with_duration(duration)
                .with_voice(voice)
                .with_technical_depth(depth)
                .with_focus_areas(focus);
            commands::generate(&client, request, wait).await?;
        }
        Commands::Status { id, watch } => {
            commands::status(&client, &id, watch).await?;
        }
        Commands::Restart { id } => {
            commands::restart(&client, &id).await?;
        }
        Commands::Play { ids } => {
            commands::play(&client, &ids, &config).await?;
        }
    }

    Ok(())
}
