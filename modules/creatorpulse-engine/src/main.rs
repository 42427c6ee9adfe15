use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ai_client::Claude;
use creatorpulse_common::{Config, Platform};
use creatorpulse_store::{DashboardStore, PgStore};
use socialstats_client::SocialStatsClient;

use creatorpulse_engine::generator::{self, PostPreferences};
use creatorpulse_engine::provider::{ContentProvider, CreatorCandidate, StatsProvider};
use creatorpulse_engine::{analysis, discovery, ingest, insights, onboarding};

#[derive(Parser)]
#[command(name = "pulse", about = "CreatorPulse growth pipeline")]
struct Cli {
    /// Account email the command operates on.
    #[arg(long, default_value = "demo@creatorpulse.dev")]
    email: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set the account's niche, target platforms, and optional handle.
    Onboard {
        niche: String,
        #[arg(long, value_delimiter = ',', default_value = "instagram,tiktok")]
        platforms: Vec<String>,
        #[arg(long)]
        handle: Option<String>,
    },
    /// Search for top creators in the account's niche.
    Discover,
    /// Track a creator and ingest their recent posts.
    Track { platform: String, handle: String },
    /// Stop tracking a creator.
    Untrack { id: Uuid },
    /// List tracked creators.
    Creators,
    /// Analyze ingested posts that have no analysis yet.
    Analyze,
    /// Regenerate niche insights from analyzed posts.
    Insights,
    /// Generate a post draft from the current insights.
    Generate {
        platform: String,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        topic: Option<String>,
    },
    /// List generated drafts.
    Drafts,
}

fn parse_platform(tag: &str) -> Result<Platform> {
    Platform::from_tag(tag)
        .ok_or_else(|| anyhow!("Unknown platform: {tag} (expected instagram or tiktok)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_redacted();

    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;

    let model = Claude::new(config.anthropic_api_key.clone(), config.claude_model.clone());
    let provider = StatsProvider::new(SocialStatsClient::new(config.rapidapi_key.clone()));

    let user = store.ensure_user(&cli.email).await?;

    match cli.command {
        Command::Onboard {
            niche,
            platforms,
            handle,
        } => {
            let platforms = platforms
                .iter()
                .map(|p| parse_platform(p))
                .collect::<Result<Vec<_>>>()?;
            let user = onboarding::complete_onboarding(
                &store,
                user.id,
                &niche,
                &platforms,
                handle.as_deref(),
            )
            .await?;
            println!("Onboarded {} into \"{niche}\"", user.email);
        }

        Command::Discover => {
            let niche = user
                .niche
                .clone()
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| anyhow!("No niche set, run `pulse onboard` first"))?;
            let platforms = if user.platforms.is_empty() {
                vec![Platform::Instagram, Platform::Tiktok]
            } else {
                user.platforms.clone()
            };

            let creators = discovery::discover_creators(&provider, &niche, &platforms).await;
            for c in &creators {
                println!(
                    "{:<9} @{:<26} {:>9} followers  {}",
                    c.platform.as_str(),
                    c.handle,
                    c.follower_count,
                    c.display_name
                );
            }
        }

        Command::Track { platform, handle } => {
            let platform = parse_platform(&platform)?;
            // Enrich the candidate from search when the provider knows the
            // handle; otherwise track with the bare profile.
            let candidate = provider
                .search_by_query(platform, &handle)
                .await
                .unwrap_or_default()
                .into_iter()
                .find(|c| c.handle.eq_ignore_ascii_case(&handle))
                .unwrap_or_else(|| CreatorCandidate {
                    handle: handle.clone(),
                    display_name: handle.clone(),
                    platform,
                    follower_count: 0,
                    bio: String::new(),
                    avatar_url: String::new(),
                    cid: None,
                    avg_er: None,
                    quality_score: None,
                });

            let outcome = ingest::sync_creator(&store, &provider, user.id, &candidate).await?;
            println!(
                "Tracking @{} on {}: {} posts ingested",
                outcome.creator.handle, outcome.creator.platform, outcome.posts_ingested
            );
        }

        Command::Untrack { id } => {
            ingest::untrack_creator(&store, id).await?;
            println!("Untracked {id}");
        }

        Command::Creators => {
            for c in store.creators_for_user(user.id).await? {
                let synced = c
                    .last_synced
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{}  {:<9} @{:<26} {:>9} followers  synced {synced}",
                    c.id,
                    c.platform.as_str(),
                    c.handle,
                    c.follower_count
                );
            }
        }

        Command::Analyze => {
            let results = analysis::analyze_unanalyzed_posts(&store, &model, user.id).await?;
            println!("analyzed: {}", results.len());
        }

        Command::Insights => {
            let count = insights::generate_insights_for_user(&store, &model, user.id).await?;
            println!("generated: {count} insights");
            for insight in store.recent_insights(user.id, count as i64).await? {
                println!(
                    "[{}] {} ({} posts)",
                    insight.insight_type, insight.insight_text, insight.data_points
                );
            }
        }

        Command::Generate {
            platform,
            format,
            topic,
        } => {
            let platform = parse_platform(&platform)?;
            let preferences = PostPreferences {
                content_format: format,
                topic,
            };
            let draft =
                generator::generate_and_save(&store, &model, user.id, platform, preferences)
                    .await?;

            println!("--- {} {} draft ---", draft.platform, draft.content_format);
            println!("{}\n", draft.caption);
            if !draft.hashtags.is_empty() {
                let tags: Vec<String> =
                    draft.hashtags.iter().map(|h| format!("#{h}")).collect();
                println!("{}\n", tags.join(" "));
            }
            if !draft.format_tips.is_empty() {
                println!("Format: {}", draft.format_tips);
            }
            if !draft.posting_tips.is_empty() {
                println!("Posting: {}", draft.posting_tips);
            }
        }

        Command::Drafts => {
            for draft in store.generated_posts(user.id, 20).await? {
                let excerpt: String = draft.caption.chars().take(80).collect();
                println!(
                    "{}  {:<9} {:<9} {excerpt}",
                    draft.generated_at.format("%Y-%m-%d %H:%M"),
                    draft.platform.as_str(),
                    draft.content_format
                );
            }
        }
    }

    Ok(())
}
