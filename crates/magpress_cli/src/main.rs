//! Command-line entry point for the Magpress catalog.
//!
//! # Responsibility
//! - Provide the destructive `setup` command that recreates the schema.
//! - Map flags onto `magpress_core` entity operations and print JSON results.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::error;
use magpress_core::{
    create_tables, default_log_level, init_logging, logging_status, Article, Author, Magazine,
    Store,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "magpress", version, about = "Authors, magazines and their articles")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "MAGPRESS_DB", default_value = "magpress.sqlite3", global = true)]
    db: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "MAGPRESS_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(long, env = "MAGPRESS_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drop and recreate every table. All data is lost.
    Setup,
    /// Print core linkage info.
    Ping,
    #[command(subcommand)]
    Author(AuthorCommand),
    #[command(subcommand)]
    Magazine(MagazineCommand),
    #[command(subcommand)]
    Article(ArticleCommand),
}

#[derive(Debug, Args)]
struct IdArg {
    #[arg(long)]
    id: i64,
}

#[derive(Debug, Subcommand)]
enum AuthorCommand {
    /// Create an author, or reuse the one with the same name.
    Add {
        #[arg(long)]
        name: String,
    },
    Show(IdArg),
    Rename {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    Articles(IdArg),
    Magazines(IdArg),
}

#[derive(Debug, Subcommand)]
enum MagazineCommand {
    /// Create a magazine, or reuse the one with the same name and category.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
    },
    Show(IdArg),
    Rename {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    Recategorize {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        category: String,
    },
    Articles(IdArg),
    Contributors(IdArg),
}

#[derive(Debug, Subcommand)]
enum ArticleCommand {
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        author_id: Option<i64>,
        #[arg(long)]
        magazine_id: Option<i64>,
    },
    Show(IdArg),
    /// Replace an article's content.
    Edit {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        content: String,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{}", report_failure(&err, logging_status().is_some()));
        std::process::exit(1);
    }
}

/// Formats the stderr line for a failed command, logging it only when a
/// file logger was started.
fn report_failure(err: &anyhow::Error, logging_active: bool) -> String {
    if logging_active {
        error!("event=cli_exit module=cli status=error error={err:#}");
    }
    format!("error: {err:#}")
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let store = Store::open(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;

    match cli.command {
        Command::Setup => {
            if !create_tables(&store) {
                bail!("schema setup failed; see logs for details");
            }
            println!("tables recreated in {}", cli.db.display());
            Ok(())
        }
        Command::Ping => {
            println!("magpress_core ping={}", magpress_core::ping());
            println!("magpress_core version={}", magpress_core::core_version());
            Ok(())
        }
        Command::Author(command) => run_author(&store, command),
        Command::Magazine(command) => run_magazine(&store, command),
        Command::Article(command) => run_article(&store, command),
    }
}

fn run_author(store: &Store, command: AuthorCommand) -> Result<()> {
    match command {
        AuthorCommand::Add { name } => {
            let mut author = Author::construct(store, None, Some(&name))?;
            print_json(&author.to_record()?)
        }
        AuthorCommand::Show(IdArg { id }) => print_json(&Author::get(store, id)?.to_record()?),
        AuthorCommand::Rename { id, name } => {
            let mut author = Author::get(store, id)?;
            author.set_name(&name)?;
            print_json(&author.to_record()?)
        }
        AuthorCommand::Articles(IdArg { id }) => print_json(&Author::get(store, id)?.articles()?),
        AuthorCommand::Magazines(IdArg { id }) => {
            let records = Author::get(store, id)?
                .magazines()?
                .iter_mut()
                .map(Magazine::to_record)
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&records)
        }
    }
}

fn run_magazine(store: &Store, command: MagazineCommand) -> Result<()> {
    match command {
        MagazineCommand::Add { name, category } => {
            let mut magazine = Magazine::construct(store, None, Some(&name), Some(&category))?;
            print_json(&magazine.to_record()?)
        }
        MagazineCommand::Show(IdArg { id }) => {
            print_json(&Magazine::get(store, id)?.to_record()?)
        }
        MagazineCommand::Rename { id, name } => {
            let mut magazine = Magazine::get(store, id)?;
            magazine.set_name(&name)?;
            print_json(&magazine.to_record()?)
        }
        MagazineCommand::Recategorize { id, category } => {
            let mut magazine = Magazine::get(store, id)?;
            magazine.set_category(&category)?;
            print_json(&magazine.to_record()?)
        }
        MagazineCommand::Articles(IdArg { id }) => {
            print_json(&Magazine::get(store, id)?.articles()?)
        }
        MagazineCommand::Contributors(IdArg { id }) => {
            let records = Magazine::get(store, id)?
                .contributors()?
                .iter_mut()
                .map(Author::to_record)
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&records)
        }
    }
}

fn run_article(store: &Store, command: ArticleCommand) -> Result<()> {
    match command {
        ArticleCommand::Add {
            title,
            content,
            author_id,
            magazine_id,
        } => {
            let article = Article::construct(
                store,
                None,
                title.as_deref(),
                content.as_deref(),
                author_id,
                magazine_id,
            )?;
            print_json(&article.to_record())
        }
        ArticleCommand::Show(IdArg { id }) => print_json(&Article::get(store, id)?.to_record()),
        ArticleCommand::Edit { id, content } => {
            let mut article = Article::get(store, id)?;
            article.set_content(&content)?;
            print_json(&article.to_record())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_report_includes_context_chain() {
        let err = anyhow::anyhow!("no such table: authors").context("failed to open database");
        assert_eq!(
            report_failure(&err, false),
            "error: failed to open database: no such table: authors"
        );
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "magpress",
            "magazine",
            "contributors",
            "--id",
            "3",
            "--db",
            "catalog.sqlite3",
        ])
        .unwrap();
        assert_eq!(cli.db, PathBuf::from("catalog.sqlite3"));
        assert!(cli.log_dir.is_none());
        assert!(matches!(
            cli.command,
            Command::Magazine(MagazineCommand::Contributors(IdArg { id: 3 }))
        ));
    }
}
