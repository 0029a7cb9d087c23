//! Profile viewing and editing.

use std::io::Write;

use cardfolio::{Client, ProfileDraft};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CmdResult;
use crate::cli::{Field, LinksAction, SetArgs, ShowArgs};
use crate::output::{print_kv, print_table};

pub async fn show(client: &Client, args: &ShowArgs) -> CmdResult {
    let draft = client.load_profile().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
    } else {
        print_draft(&draft);
    }
    Ok(())
}

pub async fn set(client: &Client, args: &SetArgs) -> CmdResult {
    client.load_profile().await?;
    match args.field {
        Field::Name => client.set_name(&args.value).await?,
        Field::Tagline => client.set_tagline(&args.value).await?,
        Field::Phone => client.set_phone(&args.value).await?,
        Field::Address => client.set_address(&args.value).await?,
        Field::Pic => client.set_profile_pic(&args.value).await?,
    }
    let report = client.save().await?;
    if report.dropped_links > 0 {
        println!(
            "Note: {} malformed link(s) were left out of the saved profile.",
            report.dropped_links
        );
    }
    println!("Saved.");
    Ok(())
}

pub async fn links(client: &Client, action: &LinksAction) -> CmdResult {
    client.load_profile().await?;
    match action {
        LinksAction::List => {
            list_links(&client.draft().await.unwrap_or_default());
            return Ok(());
        }
        LinksAction::Add { url } => {
            client.add_social_link(url).await?;
            println!("Added {url}.");
        }
        LinksAction::Remove { position } => {
            let index = position.checked_sub(1).ok_or("positions start at 1")?;
            let removed = client.remove_social_link(index).await?;
            println!("Removed {removed}.");
        }
        LinksAction::Move { from, to } => {
            let from = from.checked_sub(1).ok_or("positions start at 1")?;
            let to = to.checked_sub(1).ok_or("positions start at 1")?;
            client.move_social_link(from, to).await?;
            println!("Moved.");
        }
    }
    client.save().await?;
    println!("Saved.");
    Ok(())
}

/// Interactive editing session.
///
/// Edits accumulate in the draft with the auto-save engine running; `save`
/// forces a write, `quit` (or Ctrl-C / EOF) leaves after the
/// unsaved-changes guard.
pub async fn edit(client: &Client) -> CmdResult {
    if client.draft().await.is_none() {
        client.load_profile().await?;
    }
    client.start_autosave().await;
    println!("Interactive edit. Commands:");
    println!("  name|tagline|phone|address|pic <value>");
    println!("  links [add <url> | rm <pos> | mv <from> <to>]");
    println!("  show | save | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else { break };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "name" => notice(client.set_name(rest).await),
            "tagline" => notice(client.set_tagline(rest).await),
            "phone" => notice(client.set_phone(rest).await),
            "address" => notice(client.set_address(rest).await),
            "pic" => notice(client.set_profile_pic(rest).await),
            "links" => edit_links(client, rest).await,
            "show" => {
                if let Some(draft) = client.draft().await {
                    print_draft(&draft);
                }
            }
            "save" => match client.save().await {
                Ok(_) => println!("Saved."),
                Err(err) => println!("Save failed: {err}"),
            },
            "quit" | "exit" => break,
            other => println!("Unknown command: {other}"),
        }
    }

    // The unsaved-changes guard: the engine only signals, the decision is
    // the user's.
    if client.is_dirty().await {
        print!("Unsaved changes. Save before leaving? [y/N] ");
        std::io::stdout().flush()?;
        if let Ok(Some(answer)) = lines.next_line().await
            && answer.trim().eq_ignore_ascii_case("y")
        {
            match client.save().await {
                Ok(_) => println!("Saved."),
                Err(err) => println!("Save failed: {err}"),
            }
        }
    }

    client.stop_autosave().await;
    if client.settings().logout_on_close {
        client.logout().await?;
        println!("Logged out (close policy).");
    }
    Ok(())
}

async fn edit_links(client: &Client, rest: &str) {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (None, ..) => {
            if let Some(draft) = client.draft().await {
                list_links(&draft);
            }
        }
        (Some("add"), Some(url), None) => notice(client.add_social_link(url).await),
        (Some("rm"), Some(pos), None) => match parse_position(pos) {
            Some(index) => match client.remove_social_link(index).await {
                Ok(removed) => println!("Removed {removed}."),
                Err(err) => println!("{err}"),
            },
            None => println!("Positions start at 1."),
        },
        (Some("mv"), Some(from), Some(to)) => match (parse_position(from), parse_position(to)) {
            (Some(from), Some(to)) => notice(client.move_social_link(from, to).await),
            _ => println!("Positions start at 1."),
        },
        _ => println!("Usage: links [add <url> | rm <pos> | mv <from> <to>]"),
    }
}

fn parse_position(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok()?.checked_sub(1)
}

/// Mutation outcomes are user notices, not hard failures.
fn notice<T>(result: cardfolio::Result<T>) {
    if let Err(err) = result {
        println!("{err}");
    }
}

fn print_draft(draft: &ProfileDraft) {
    print_kv("Name", &draft.name);
    print_kv("Tagline", &draft.tagline);
    print_kv("Phone", &draft.phone);
    print_kv("Address", &draft.address);
    print_kv("Picture", &draft.profile_pic_url);
    print_kv("Public link", &draft.link);
    list_links(draft);
}

fn list_links(draft: &ProfileDraft) {
    if draft.social_links.is_empty() {
        println!("No social links yet.");
        return;
    }
    let rows: Vec<Vec<String>> = draft
        .social_links
        .iter()
        .enumerate()
        .map(|(i, link)| vec![(i + 1).to_string(), link.clone()])
        .collect();
    print_table(&["#", "Link"], &rows);
}
