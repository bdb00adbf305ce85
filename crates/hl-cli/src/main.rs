//! hl-contacts: HighLevel contacts command line
//!
//! Usage:
//!   hl-contacts get <contact-id>
//!   hl-contacts find <email> <location-id>
//!   hl-contacts search <json>
//!   hl-contacts upsert <json>
//!   hl-contacts update <contact-id> <json>
//!   hl-contacts delete <contact-id>

use hl_contacts::{
    CancellationToken, ContactsApi, HighLevelConfig, HighLevelServices, SearchContactsRequest,
    UpdateContactRequest, UpsertContactRequest,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Parsed command
#[derive(Debug, PartialEq)]
enum Command {
    Get { contact_id: String },
    Find { email: String, location_id: String },
    Search { filters: String },
    Upsert { contact: String },
    Update { contact_id: String, update: String },
    Delete { contact_id: String },
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!();
            print_help();
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("hl-contacts {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = HighLevelConfig::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    let api_key = config.api_key.clone().unwrap_or_default();

    let services = HighLevelServices::new(config);
    let contacts = services.contacts_singleton();

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Cancelling...");
            on_ctrl_c.cancel();
        }
    });

    match command {
        Command::Get { contact_id } => {
            print_json(&contacts.get_by_id(&api_key, &contact_id, &cancel).await?)
        }
        Command::Find { email, location_id } => print_json(
            &contacts
                .get_by_email(&api_key, &email, &location_id, &cancel)
                .await?,
        ),
        Command::Search { filters } => {
            let filters: SearchContactsRequest = serde_json::from_str(&filters)?;
            print_json(&contacts.search(&api_key, &filters, &cancel).await?)
        }
        Command::Upsert { contact } => {
            let mut contact: UpsertContactRequest = serde_json::from_str(&contact)?;
            print_json(&contacts.upsert(&api_key, &mut contact, &cancel).await?)
        }
        Command::Update { contact_id, update } => {
            let mut update: UpdateContactRequest = serde_json::from_str(&update)?;
            print_json(
                &contacts
                    .update(&api_key, &contact_id, &mut update, &cancel)
                    .await?,
            )
        }
        Command::Delete { contact_id } => {
            print_json(&contacts.delete(&api_key, &contact_id, &cancel).await?)
        }
        Command::Help | Command::Version => Ok(()),
    }
}

/// Parse command line arguments (program name already stripped)
fn parse_args(args: &[String]) -> Result<Command, String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["--help"] | ["-h"] | ["help"] => Ok(Command::Help),
        ["--version"] | ["-v"] => Ok(Command::Version),
        ["get", id] => Ok(Command::Get {
            contact_id: id.to_string(),
        }),
        ["find", email, location] => Ok(Command::Find {
            email: email.to_string(),
            location_id: location.to_string(),
        }),
        ["search", filters] => Ok(Command::Search {
            filters: filters.to_string(),
        }),
        ["upsert", contact] => Ok(Command::Upsert {
            contact: contact.to_string(),
        }),
        ["update", id, update] => Ok(Command::Update {
            contact_id: id.to_string(),
            update: update.to_string(),
        }),
        ["delete", id] => Ok(Command::Delete {
            contact_id: id.to_string(),
        }),
        [command, ..] => Err(format!("Invalid arguments for '{}'", command)),
    }
}

/// `RUST_LOG` as given, `info` when unset or empty
fn log_filter(directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new("info"),
    }
}

/// Print a result as pretty JSON; absent results print `null`
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print help message
fn print_help() {
    println!("hl-contacts - HighLevel contacts command line");
    println!();
    println!("Usage:");
    println!("  hl-contacts get <contact-id>            Fetch a contact by ID");
    println!("  hl-contacts find <email> <location-id>  Resolve a contact by email");
    println!("  hl-contacts search <json>               Search with raw filters");
    println!("  hl-contacts upsert <json>               Create or update a contact");
    println!("  hl-contacts update <contact-id> <json>  Update a contact");
    println!("  hl-contacts delete <contact-id>         Delete a contact");
    println!("  hl-contacts --help                      Show this help message");
    println!("  hl-contacts --version                   Show version");
    println!();
    println!("Environment Variables:");
    println!("  HIGHLEVEL_API_KEY      API key (required)");
    println!("  HIGHLEVEL_BASE_URL     API base URL (default: https://services.leadconnectorhq.com)");
    println!("  HIGHLEVEL_API_VERSION  Version header (default: 2021-07-28)");
    println!("  HIGHLEVEL_TIMEOUT_SECS Request timeout (default: 30)");
    println!("  HIGHLEVEL_LOG_ENABLED  Per call diagnostics (default: false)");
    println!("  RUST_LOG               Log filter (default: info; use debug to see diagnostics)");
}
