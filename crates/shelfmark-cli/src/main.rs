use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};

use shelfmark_catalog::{
    CatalogError, Deduplicator, GoogleBooksSource, SearchOutcome, SearchSession,
};
use shelfmark_core::error::ExitCode;
use shelfmark_core::{AppConfig, BookRecord, JsonFileStore, Library, SavedBook, ShelfError};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "shelfmark",
    about = "Personal book library: search a catalog and keep notes on saved books",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting SHELFMARK_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the book catalog.
    Search {
        query: String,
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Save a catalog volume to the library by its id.
    Add { volume_id: String },

    /// Save a book typed in by hand.
    AddManual {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, default_value = "")]
        comments: String,
    },

    /// List saved books.
    List,

    /// Show one saved book.
    Show { id: String },

    /// Replace the notes on a saved book.
    Comment { id: String, text: String },

    /// Remove a book from the library.
    Delete {
        id: String,
        #[arg(long)]
        confirm: bool,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("SHELFMARK_JSON").as_deref() == Ok("1");

    let mut config = AppConfig::load()?;
    if let Ok(lib_path) = std::env::var("SHELFMARK_LIBRARY_PATH") {
        config.set_library_path(lib_path.into());
    }
    tracing::debug!(library = %config.library.path.display(), "config loaded");

    let library = Library::new(JsonFileStore::new(&config.library.path));

    match cli.command {
        Commands::Search { query, limit } => {
            let source = Arc::new(GoogleBooksSource::new(&config.catalog)?);
            let dedup = Deduplicator::new().with_policy(config.catalog.merge_policy);
            let session = SearchSession::new(
                source,
                dedup,
                Duration::from_millis(config.catalog.debounce_ms),
            );

            let outcome = match session.submit(&query).await {
                Ok(outcome) => outcome,
                Err(e) => fail_search(&e, json_output)?,
            };
            let saved = library.saved_ids()?;
            let books: Vec<&BookRecord> = outcome.books().iter().take(limit).collect();
            let dur = start.elapsed().as_millis();

            if json_output {
                let items: Vec<serde_json::Value> = books
                    .iter()
                    .map(|b| {
                        let mut v = serde_json::to_value(b).unwrap_or_default();
                        v["saved"] = serde_json::Value::Bool(saved.contains(&b.id));
                        v
                    })
                    .collect();
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": items, "total": outcome.books().len(), "query": query },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                match &outcome {
                    SearchOutcome::Empty => println!("Start typing to search for books."),
                    SearchOutcome::NoResults(q) => println!("No books found for \"{q}\""),
                    _ => print_results(&books, &saved),
                }
            }
        }

        Commands::Add { volume_id } => {
            let source = GoogleBooksSource::new(&config.catalog)?;
            let record = match source.fetch_by_id(&volume_id).await {
                Ok(record) => record,
                Err(e) => fail_search(&e, json_output)?,
            };
            let title = record.title.clone();

            match library.add_search_result(record) {
                Ok(_) => {
                    let dur = start.elapsed().as_millis();
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":{"added":volume_id},"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("\"{title}\" added to your library");
                    }
                }
                Err(e) => fail_library(e, json_output)?,
            }
        }

        Commands::AddManual {
            title,
            author,
            comments,
        } => match library.add_manual(&title, &author, &comments) {
            Ok(saved) => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":saved}))?;
                } else {
                    println!("\"{}\" added to your library ({})", saved.book.title, saved.id());
                }
            }
            Err(e) => fail_library(e, json_output)?,
        },

        Commands::List => {
            let books = library.load_books()?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": books, "total": books.len() },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if books.is_empty() {
                println!("Your library is empty. Use `shelfmark search` to find books.");
            } else {
                for book in &books {
                    print_saved_line(book);
                }
            }
        }

        Commands::Show { id } => match library.get_book(&id) {
            Ok(book) => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":book}))?;
                } else {
                    print_saved_detail(&book);
                }
            }
            Err(e) => fail_library(e, json_output)?,
        },

        Commands::Comment { id, text } => {
            if !library.is_book_saved(&id)? {
                fail_library::<()>(ShelfError::BookNotFound(id), json_output)?;
            } else {
                library.update_comments(&id, text.trim())?;
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"updated":id}}))?;
                } else {
                    println!("Comments saved.");
                }
            }
        }

        Commands::Delete { id, confirm } => {
            if !confirm {
                eprintln!("Add --confirm to remove the book from your library.");
                std::process::exit(ExitCode::ConfirmRequired as i32);
            }
            let title = library.get_book(&id).map(|b| b.book.title).ok();
            library.delete_book(&id)?;
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"deleted":id}}))?;
            } else if let Some(title) = title {
                println!("\"{title}\" removed from your library");
            } else {
                println!("Nothing to delete for {id}");
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Path => println!("{}", AppConfig::config_path().display()),
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::to_value(&config)?)?;
                } else {
                    println!("config file:   {}", AppConfig::config_path().display());
                    println!("library file:  {}", config.library.path.display());
                    println!("catalog url:   {}", config.catalog.base_url);
                    println!("max results:   {}", config.catalog.max_results);
                    println!("debounce:      {}ms", config.catalog.debounce_ms);
                    println!("merge policy:  {:?}", config.catalog.merge_policy);
                }
            }
        },
    }

    Ok(())
}

// ─── Output helpers ──────────────────────────────────────────────────────────

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn print_results(books: &[&BookRecord], saved: &HashSet<String>) {
    for book in books {
        let marker = if saved.contains(&book.id) { "Added" } else { "Add" };
        println!(
            "{id:<14}  {title:<40}  {author:<25}  [{marker}]",
            id = book.id,
            title = truncate(&book.title, 40),
            author = truncate(&book.author, 25),
        );
    }
}

fn print_saved_line(book: &SavedBook) {
    println!(
        "{id:<14}  {title:<40}  {author:<25}  added {date}",
        id = book.id(),
        title = truncate(&book.book.title, 40),
        author = truncate(&book.book.author, 25),
        date = book.date_added.format("%Y-%m-%d"),
    );
}

fn print_saved_detail(book: &SavedBook) {
    println!("{}", book.book.title);
    println!("by {}", book.book.author);
    if let Some(isbn) = &book.book.isbn {
        println!("ISBN {isbn}");
    }
    println!("Added {}", book.date_added.format("%Y-%m-%d"));
    if let Some(description) = &book.book.description {
        println!("\n{description}");
    }
    println!("\nMy notes:");
    println!("{}", book.comments.as_deref().unwrap_or("No comments yet"));
    if let Some(edited) = book.last_edited {
        println!("(edited {})", edited.format("%Y-%m-%d %H:%M"));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ─── Failure reporting ───────────────────────────────────────────────────────

fn fail_search<T>(err: &CatalogError, json_output: bool) -> Result<T> {
    tracing::warn!(error = %err, "catalog request failed");
    let (kind, code) = search_failure_kind(err);
    if json_output {
        print_json(&serde_json::json!({
            "status": "error",
            "error": kind,
            "message": err.user_message(),
        }))?;
    } else {
        eprintln!("{}", err.user_message());
    }
    std::process::exit(code as i32);
}

fn search_failure_kind(err: &CatalogError) -> (&'static str, ExitCode) {
    match err {
        CatalogError::Network(_) => ("network", ExitCode::NetworkError),
        CatalogError::Provider { .. } => ("provider", ExitCode::NetworkError),
        CatalogError::Parse(_) | CatalogError::InvalidUrl(_) => ("parse", ExitCode::GeneralError),
    }
}

fn fail_library<T>(err: ShelfError, json_output: bool) -> Result<T> {
    let message = match &err {
        ShelfError::BookAlreadyExists(_) => Some("This book is already in your library".to_string()),
        ShelfError::BookNotFound(id) => Some(format!("Book not found: {id}")),
        ShelfError::ValidationError(msg) => Some(msg.clone()),
        _ => None,
    };
    let Some(message) = message else {
        return Err(err.into());
    };
    if json_output {
        print_json(&serde_json::json!({"status":"error","message":message}))?;
    } else {
        eprintln!("{message}");
    }
    std::process::exit(err.exit_code() as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_exit_as_network_errors() {
        let err = CatalogError::Provider {
            url: "https://example.test/volumes".to_string(),
            status: 503,
            body: String::new(),
        };
        assert_eq!(search_failure_kind(&err), ("provider", ExitCode::NetworkError));
    }

    #[test]
    fn malformed_responses_are_not_network_errors() {
        let parse = CatalogError::Parse("volume v1 has no title".to_string());
        assert_eq!(search_failure_kind(&parse), ("parse", ExitCode::GeneralError));

        let url = CatalogError::InvalidUrl("not a url".to_string());
        assert_eq!(search_failure_kind(&url), ("parse", ExitCode::GeneralError));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("Dune", 10), "Dune");
        assert_eq!(truncate("Nineteen Eighty-Four", 8), "Ninetee…");
    }
}
