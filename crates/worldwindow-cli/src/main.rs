use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use worldwindow_api::CardsClient;
use worldwindow_core::format::{format_time, strip_html, truncate};
use worldwindow_core::{
    Card, Config, FavoritesController, FeedController, FeedRequest, Locale, Messages,
};
use worldwindow_tui::App;

#[derive(Parser)]
#[command(name = "worldwindow")]
#[command(version, about = "Browse daily AI news cards from the terminal", long_about = None)]
struct Cli {
    /// Card backend base URL
    #[arg(long, global = true, env = "WORLDWINDOW_SERVER")]
    server: Option<String>,

    /// Interface language (zh or en)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive viewer (default)
    Tui,
    /// Print today's cards
    Daily {
        /// Number of cards to fetch
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
        /// Save the card at this 1-based position (repeatable)
        #[arg(long = "favorite", short = 'f')]
        favorites: Vec<usize>,
    },
    /// Print one page of older cards
    More {
        /// Number of cards to skip
        #[arg(long)]
        offset: usize,
        /// Page size
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        batch: Option<u32>,
        /// Save the card at this 1-based position (repeatable)
        #[arg(long = "favorite", short = 'f')]
        favorites: Vec<usize>,
    },
    /// Print saved cards
    Favorites,
    /// Remove a saved card by id
    Unfavorite {
        /// Card id
        id: String,
    },
    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(interactive);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }
    config.validate()?;

    let client = CardsClient::with_timeout(&config.server.base_url, config.request_timeout())?;
    let t = config.ui.locale.messages();

    match cli.command {
        None | Some(Commands::Tui) => {
            info!("Starting TUI against {}", client.base_url());
            worldwindow_tui::run_tui(App::new(&config), Arc::new(client)).await?;
        }
        Some(Commands::Daily { limit, favorites }) => {
            let mut feed = FeedController::new(
                limit.unwrap_or(config.feed.daily_limit),
                config.feed.batch_size,
            );
            feed.refresh(&client).await?;
            if feed.items().is_empty() {
                println!("{}", t.card_grid.empty);
                return Ok(());
            }
            print_and_save(&client, t, feed.items(), &favorites).await?;
        }
        Some(Commands::More {
            offset,
            batch,
            favorites,
        }) => {
            let request = FeedRequest::LoadMore {
                offset,
                batch: batch.unwrap_or(config.feed.batch_size),
            };
            let cards = request.run(&client).await?;
            if cards.is_empty() {
                println!("{}", t.toast.no_more);
                return Ok(());
            }
            print_and_save(&client, t, &cards, &favorites).await?;
        }
        Some(Commands::Favorites) => {
            let mut saved = FavoritesController::new();
            saved.reload(&client).await?;
            if saved.items().is_empty() {
                println!("{}", t.favorites.empty);
                return Ok(());
            }
            println!("{} ({})\n", t.favorites.title, saved.items().len());
            for (i, card) in saved.items().iter().enumerate() {
                print_card(i + 1, card, t, true);
            }
        }
        Some(Commands::Unfavorite { id }) => {
            let mut saved = FavoritesController::new();
            saved.remove_favorite(&client, &id).await?;
            println!("{}: {}", t.toast.unfavorited, id);
        }
        Some(Commands::Config { init }) => {
            if init {
                if config_path.exists() {
                    anyhow::bail!("{} already exists", config_path.display());
                }
                Config::default().save_to(&config_path)?;
                println!("Wrote default config to {}", config_path.display());
            } else {
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// Print a listing, then bookmark the requested 1-based positions
async fn print_and_save(
    client: &CardsClient,
    t: &Messages,
    cards: &[Card],
    picks: &[usize],
) -> anyhow::Result<()> {
    let mut saved = FavoritesController::new();
    if let Err(e) = saved.reload(client).await {
        warn!("Could not load favorites: {}", e);
    }

    for (i, card) in cards.iter().enumerate() {
        print_card(i + 1, card, t, saved.is_favorited(&card.id));
    }

    for &pick in picks {
        let Some(card) = pick.checked_sub(1).and_then(|i| cards.get(i)) else {
            eprintln!("No card at position {} (1-{})", pick, cards.len());
            continue;
        };
        if saved.is_favorited(&card.id) {
            continue;
        }
        saved.add_favorite(client, card.clone()).await?;
        println!("{}: {}", t.toast.favorited, strip_html(&card.title));
    }

    Ok(())
}

fn print_card(position: usize, card: &Card, t: &Messages, favorited: bool) {
    let mark = if favorited { "♥" } else { " " };
    println!("{:>2}. {} {}", position, mark, strip_html(&card.title));
    println!("    {}", format_time(&card.published, t.card.unknown_time));

    let summary = strip_html(&card.summary);
    if !summary.is_empty() {
        println!("    {}", truncate(&summary, 160));
    }
    if !card.image_prompt.is_empty() {
        println!("    {}: {}", t.card.prompt, truncate(&card.image_prompt, 100));
    }
    println!(
        "    {}: {}  {}: {}  id: {}",
        t.card.palette, card.image_palette, t.card.seed, card.image_seed, card.id
    );
    if !card.link.is_empty() {
        println!("    {}", card.link);
    }
    println!();
}

fn init_logging(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "worldwindow=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if !interactive {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        return;
    }

    // The TUI owns the terminal, so logs go to a file
    let log_file = dirs::cache_dir()
        .map(|dir| dir.join("worldwindow"))
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir.join("worldwindow.log")))
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());

    match log_file {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
            .init(),
        None => registry.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_sizes_rejected() {
        assert!(Cli::try_parse_from(["worldwindow", "daily", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["worldwindow", "more", "--offset", "3", "--batch", "0"]).is_err());
    }

    #[test]
    fn test_page_sizes_and_picks_parse() {
        let cli = Cli::try_parse_from(["worldwindow", "daily", "--limit", "7", "-f", "1", "-f", "3"])
            .unwrap();
        let Some(Commands::Daily { limit, favorites }) = cli.command else {
            panic!("expected the daily command");
        };
        assert_eq!(limit, Some(7));
        assert_eq!(favorites, vec![1, 3]);

        let cli = Cli::try_parse_from(["worldwindow", "more", "--offset", "5", "--batch", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::More { offset: 5, batch: Some(2), .. })
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["worldwindow", "favorites", "--locale", "en"]).unwrap();
        assert_eq!(cli.locale, Some(Locale::En));
        assert!(cli.command.is_some());
    }
}
