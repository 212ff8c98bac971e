use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use snip::config::Config;
use snip::models::ListQuery;
use snip::storage;
use snip::UrlService;

#[derive(Parser)]
#[command(name = "snip-admin")]
#[command(about = "snip mapping management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List mappings in insertion order
    List {
        #[arg(long, default_value_t = ListQuery::MAX_LIMIT)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Create a mapping
    Create {
        /// Destination URL
        long_url: String,
        /// Short code to use instead of a generated one
        #[arg(long)]
        code: Option<String>,
    },
    /// Show one mapping without counting a visit
    Show {
        /// Short code
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage = storage::connect(&config.database)
        .await
        .context("failed to open the mapping store")?;
    let service = UrlService::new(storage);

    match cli.command {
        Commands::List { limit, offset } => {
            let urls = service.list(limit, offset).await?;
            if urls.is_empty() {
                println!("No mappings found.");
            } else {
                println!("{:<34} {:>8}  {}", "Short URL", "Visits", "Long URL");
                println!("{}", "-".repeat(80));
                for url in urls {
                    println!(
                        "{:<34} {:>8}  {}",
                        url.short_code, url.visit_count, url.long_url
                    );
                }
            }
        }
        Commands::Create { long_url, code } => {
            let url = service
                .create(&long_url, code.as_deref())
                .await
                .with_context(|| format!("could not create mapping for '{long_url}'"))?;
            println!("✓ Created '{}' -> '{}'", url.short_code, url.long_url);
        }
        Commands::Show { code } => {
            let url = service.retrieve(&code).await?;
            println!("Short URL:   {}", url.short_code);
            println!("Long URL:    {}", url.long_url);
            println!("Visits:      {}", url.visit_count);
            println!("Created at:  {}", url.created_at);
        }
    }

    Ok(())
}
