//! # Subcommands
//!
//! One subcommand per API operation. Each handler calls the client once
//! and writes its result to the provided writer, either as a short text
//! rendering or as pretty-printed JSON.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tutorial_core::{NewTutorial, Tutorial, TutorialId, TutorialPatch};

use crate::client::{MutationResult, TutorialClient};

/// Tutorial subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List tutorials, optionally filtered by a title substring.
    List {
        /// Case-insensitive substring the title must contain.
        #[arg(long)]
        title: Option<String>,
    },

    /// List published tutorials.
    Published,

    /// Show one tutorial.
    Get {
        /// Tutorial id.
        id: String,
    },

    /// Create a tutorial.
    Create {
        /// Title (required, non-blank).
        #[arg(long)]
        title: String,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// Mark the tutorial as published.
        #[arg(long)]
        published: bool,
    },

    /// Update fields of a tutorial. Omitted fields are left unchanged.
    Update {
        /// Tutorial id.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description.
        #[arg(long)]
        clear_description: bool,
        /// New publication flag.
        #[arg(long)]
        published: Option<bool>,
    },

    /// Delete one tutorial.
    Delete {
        /// Tutorial id.
        id: String,
    },

    /// Delete every tutorial.
    DeleteAll {
        /// Confirm the bulk deletion.
        #[arg(long)]
        yes: bool,
    },
}

/// Output rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Execute `command` against `client`, writing results to `out`.
pub async fn run(
    command: &Command,
    client: &TutorialClient,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List { title } => {
            let tutorials = client.list(title.as_deref()).await?;
            write_list(out, format, &tutorials)?;
        }
        Command::Published => {
            let tutorials = client.published().await?;
            write_list(out, format, &tutorials)?;
        }
        Command::Get { id } => {
            let tutorial = client.get(&parse_id(id)?).await?;
            write_one(out, format, &tutorial)?;
        }
        Command::Create {
            title,
            description,
            published,
        } => {
            let req = NewTutorial {
                title: Some(title.clone()),
                description: description.clone(),
                published: Some(*published),
            };
            req.validate()?;
            let tutorial = client.create(&req).await?;
            write_one(out, format, &tutorial)?;
        }
        Command::Update {
            id,
            title,
            description,
            clear_description,
            published,
        } => {
            let description = if *clear_description {
                Some(None)
            } else {
                description.clone().map(Some)
            };
            let patch = TutorialPatch {
                title: title.clone(),
                description,
                published: *published,
            };
            if patch.is_empty() {
                bail!(
                    "nothing to update: pass at least one of --title, --description, \
                     --clear-description, --published"
                );
            }
            patch.validate()?;
            let result = client.update(&parse_id(id)?, &patch).await?;
            write_mutation(out, format, &result)?;
        }
        Command::Delete { id } => {
            let result = client.delete(&parse_id(id)?).await?;
            write_mutation(out, format, &result)?;
        }
        Command::DeleteAll { yes } => {
            if !yes {
                bail!("refusing to delete every tutorial without --yes");
            }
            let result = client.delete_all().await?;
            write_mutation(out, format, &result)?;
        }
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<TutorialId> {
    raw.parse::<TutorialId>()
        .with_context(|| format!("\"{raw}\" is not a tutorial id"))
}

fn write_list(out: &mut impl Write, format: OutputFormat, tutorials: &[Tutorial]) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(tutorials)?)?,
        OutputFormat::Text => {
            if tutorials.is_empty() {
                writeln!(out, "no tutorials")?;
            }
            for t in tutorials {
                writeln!(out, "{}", summary_line(t))?;
            }
        }
    }
    Ok(())
}

fn write_one(out: &mut impl Write, format: OutputFormat, tutorial: &Tutorial) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(tutorial)?)?,
        OutputFormat::Text => {
            writeln!(out, "id:          {}", tutorial.id)?;
            writeln!(out, "title:       {}", tutorial.title)?;
            writeln!(
                out,
                "description: {}",
                tutorial.description.as_deref().unwrap_or("-")
            )?;
            writeln!(out, "published:   {}", tutorial.published)?;
            writeln!(out, "created:     {}", tutorial.created_at.to_rfc3339())?;
            writeln!(out, "updated:     {}", tutorial.updated_at.to_rfc3339())?;
        }
    }
    Ok(())
}

fn write_mutation(out: &mut impl Write, format: OutputFormat, result: &MutationResult) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(
            out,
            "{}",
            serde_json::json!({ "message": result.message, "count": result.count })
        )?,
        OutputFormat::Text => writeln!(out, "{} ({} affected)", result.message, result.count)?,
    }
    Ok(())
}

fn summary_line(t: &Tutorial) -> String {
    let marker = if t.published { "published" } else { "draft" };
    format!("{}  [{marker}]  {}", t.id, t.title)
}
