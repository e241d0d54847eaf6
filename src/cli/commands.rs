use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::bot::{spawn_dispatcher, Bot};
use crate::charts::ChartExtractor;
use crate::command::{Action, Command, CommandParser};
use crate::domain::{ChartResult, CommentListing};
use crate::page::{ChromeSession, HtmlPage, Page};

/// Extract and print the charts of `site`.
pub async fn charts(ctx: &AppContext, site: &str, html: Option<&Path>, json: bool) -> Result<()> {
    // Resolve the profile before touching any page
    let profile = ctx.config.site(site)?;
    let extractor = ChartExtractor::new(profile, ctx.config.browser.wait_timeout());

    let (result, driver) = match html {
        Some(path) => {
            let page = HtmlPage::from_file(path)?;
            (extractor.extract(page).await?, HtmlPage::DRIVER)
        }
        None => {
            let page = ChromeSession::launch(&ctx.config.browser, &profile.url).await?;
            (extractor.extract(page).await?, ChromeSession::DRIVER)
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result);
    }
    println!("{}", summary(driver, &profile.url, &result));

    Ok(())
}

fn summary(driver: &str, url: &str, result: &ChartResult) -> String {
    format!("{} Driver : {} : ({}) tracks", driver, url, result.track_count)
}

pub fn list_sites(ctx: &AppContext) -> Result<()> {
    if ctx.config.sites.is_empty() {
        println!("No sites configured");
        return Ok(());
    }

    for (name, profile) in &ctx.config.sites {
        println!("{}\n  {}", name, profile.url);
    }

    Ok(())
}

/// Show how a command is understood.
pub fn parse(ctx: &AppContext, text: &str) -> Result<()> {
    let parser = CommandParser::from_settings(&ctx.config.bot);
    let command = parser
        .parse_command(text)
        .unwrap_or_else(|| Command::from_body(text.trim()));

    match parser.try_classify(&command) {
        Ok(classification) => {
            for action in &classification.actions {
                match action {
                    Action::Valid(token) => println!("  valid    {}={}", token.name, token.value),
                    Action::Invalid(token) => println!("  invalid  {}={}", token.name, token.value),
                }
            }
            for chunk in &classification.malformed {
                println!("  malformed {}", chunk);
            }
            print!("{}", classification.valid_string);
        }
        Err(e) => println!("Rejected: {}", e),
    }

    Ok(())
}

/// Run the comments in `path` through the dispatcher and print the replies.
pub async fn bot(ctx: &AppContext, path: &Path, workers: Option<usize>) -> Result<()> {
    let listing = read_listing(path)?;

    if listing.data.is_empty() {
        println!("No comments");
        return Ok(());
    }

    let settings = &ctx.config.bot;
    let bot = Arc::new(Bot::from_settings(settings));
    let (handle, mut replies) = spawn_dispatcher(
        bot,
        workers.unwrap_or(settings.workers),
        settings.queue_capacity,
    );

    let total = listing.data.len();
    for comment in listing.data {
        if let Err(e) = handle.dispatch(comment).await {
            eprintln!("Failed to dispatch comment: {}", e);
            break;
        }
    }
    handle.shutdown().await;

    let mut answered = 0;
    while let Some(reply) = replies.recv().await {
        answered += 1;
        println!("--- reply to {}\n{}\n", reply.comment_id, reply.body);
    }

    println!("Answered {} of {} comments", answered, total);
    Ok(())
}

fn read_listing(path: &Path) -> Result<CommentListing> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    Ok(serde_json::from_str(&content)?)
}
