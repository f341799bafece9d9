//! Interactive editing session
//!
//! Reads one command per line while the session auto-saves in the
//! background. With `--new` the session starts on a blank profile, which is
//! first stored once it has a name or a link. `save` writes immediately and exits; `quit` (or end of input)
//! exits and drops any save that is still pending.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use linkdance_core::{
    Config, EditorEvent, EditorSession, FileBackend, LinkItem, LinkMove, LinkUpdate, Platform,
    ProfileStore,
};

use super::link::position_index;
use super::{edit_target, save_and_exit, session_for};
use crate::output::Output;

/// Sleep used when nothing is pending; the branch is disabled then anyway
const IDLE_WAIT: Duration = Duration::from_secs(3600);

const HELP: &str = "\
Commands:
  name <text>             set the display name
  bio <text>              set the bio
  photo <url>             set the avatar URL
  add <url> [label]       append a link
  label <n> <text>        relabel link n
  url <n> <url>           change the URL of link n
  icon <n> [icon]         set or clear the icon of link n
  del <n>                 delete link n
  move <from> <to>        move link from one position to another
  social <platform> <url> add or update a social link
  unsocial <platform>     remove a social link
  platforms               list platforms that can be added
  demo                    replace everything with the sample profile
  show                    print the profile
  publish                 publish and print the URL
  save                    save and exit
  quit                    exit without saving pending changes";

/// One parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
enum EditCommand {
    Name(String),
    Bio(String),
    Photo(String),
    Add { url: String, label: String },
    Label(usize, String),
    Url(usize, String),
    Icon(usize, String),
    Delete(usize),
    Move(usize, usize),
    Social(Platform, String),
    Unsocial(Platform),
    Platforms,
    Demo,
    Show,
    Publish,
    Save,
    Quit,
    Help,
    Empty,
}

/// What the loop does after a command
enum Flow {
    Continue,
    SaveAndExit,
    Exit,
}

/// Run an interactive session on an existing profile, or a new one with `new`
pub async fn run(
    config: &Config,
    store: ProfileStore,
    id: Option<String>,
    new: bool,
    output: &Output,
) -> Result<()> {
    let id = edit_target(&store, id, new)?;
    let mut session = session_for(config, store, &id);
    let mut events = session
        .take_events()
        .context("Editor events already taken")?;

    println!("Editing profile {} (type `help` for commands)", session.profile().id);
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let wait = session.next_autosave_in();

        let flow = tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read input")? {
                    Some(line) => match parse(&line) {
                        Ok(command) => apply(&mut session, command, output).await,
                        Err(e) => {
                            println!("{}", e);
                            prompt();
                            Flow::Continue
                        }
                    },
                    None => Flow::Exit,
                }
            }
            _ = tokio::time::sleep(wait.unwrap_or(IDLE_WAIT)), if wait.is_some() => {
                session.tick();
                Flow::Continue
            }
        };

        drain_events(&mut events, output);

        match flow {
            Flow::Continue => {}
            Flow::SaveAndExit => {
                let profile = save_and_exit(session)?;
                output.success(&format!("Saved profile {}", profile.id));
                return Ok(());
            }
            Flow::Exit => {
                if session.next_autosave_in().is_some() {
                    output.message("Discarded unsaved changes.");
                }
                session.close();
                return Ok(());
            }
        }
    }
}

async fn apply(
    session: &mut EditorSession<FileBackend>,
    command: EditCommand,
    output: &Output,
) -> Flow {
    let result: Result<()> = match command {
        EditCommand::Name(name) => {
            session.set_name(name);
            Ok(())
        }
        EditCommand::Bio(bio) => {
            session.set_description(bio);
            Ok(())
        }
        EditCommand::Photo(url) => {
            session.set_photo_url(url);
            Ok(())
        }
        EditCommand::Add { url, label } => {
            session.push_link(LinkItem::new(label, url));
            Ok(())
        }
        EditCommand::Label(n, label) => update_at(
            session,
            n,
            LinkUpdate {
                label: Some(label),
                ..LinkUpdate::default()
            },
        ),
        EditCommand::Url(n, url) => update_at(
            session,
            n,
            LinkUpdate {
                url: Some(url),
                ..LinkUpdate::default()
            },
        ),
        EditCommand::Icon(n, icon) => update_at(
            session,
            n,
            LinkUpdate {
                icon: Some(icon),
                ..LinkUpdate::default()
            },
        ),
        EditCommand::Delete(n) => link_id_at(session, n).map(|id| {
            session.delete_link(&id);
        }),
        EditCommand::Move(from, to) => move_between(session, from, to),
        EditCommand::Social(platform, url) => {
            if session.profile().social_link(&platform).is_some() {
                session
                    .update_social_link_url(&platform, url)
                    .map_err(Into::into)
            } else {
                session.add_social_link(platform, url).map_err(Into::into)
            }
        }
        EditCommand::Unsocial(platform) => {
            if !session.remove_social_link(&platform) {
                println!("No {} link.", platform.display_name());
            }
            Ok(())
        }
        EditCommand::Platforms => {
            output.print_platforms(&session.available_platforms());
            Ok(())
        }
        EditCommand::Demo => {
            session.load_demo();
            Ok(())
        }
        EditCommand::Show => {
            output.print_profile(session.profile());
            Ok(())
        }
        EditCommand::Publish => session.publish().await.map(|_| ()).map_err(Into::into),
        EditCommand::Save => return Flow::SaveAndExit,
        EditCommand::Quit => return Flow::Exit,
        EditCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
        EditCommand::Empty => Ok(()),
    };

    if let Err(e) = result {
        println!("⚠ {}", e);
    }
    prompt();
    Flow::Continue
}

fn update_at(
    session: &mut EditorSession<FileBackend>,
    position: usize,
    update: LinkUpdate,
) -> Result<()> {
    let id = link_id_at(session, position)?;
    session.update_link(&id, update)?;
    Ok(())
}

fn move_between(session: &mut EditorSession<FileBackend>, from: usize, to: usize) -> Result<()> {
    let gesture = LinkMove::to(position_index(from)?, position_index(to)?);
    session.move_link(gesture)?;
    Ok(())
}

fn link_id_at(session: &EditorSession<FileBackend>, position: usize) -> Result<String> {
    let index = position_index(position)?;
    session
        .profile()
        .links
        .get(index)
        .map(|l| l.id.clone())
        .ok_or_else(|| anyhow::anyhow!("No link at position {}", position))
}

fn drain_events(events: &mut UnboundedReceiver<EditorEvent>, output: &Output) {
    while let Ok(event) = events.try_recv() {
        match event {
            EditorEvent::AutoSaved => output.message("✓ Changes auto-saved"),
            EditorEvent::SaveFailed(reason) => eprintln!("⚠ Save failed: {}", reason),
            EditorEvent::DemoLoaded => output.message("Demo profile loaded"),
            EditorEvent::Published(url) => output.print_url(&url),
        }
    }
}

fn prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn parse(line: &str) -> Result<EditCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => EditCommand::Empty,
        "name" => EditCommand::Name(rest.to_string()),
        "bio" => EditCommand::Bio(rest.to_string()),
        "photo" => EditCommand::Photo(rest.to_string()),
        "add" => {
            let (url, label) = split_first(rest);
            if url.is_empty() {
                return Err("Usage: add <url> [label]".to_string());
            }
            EditCommand::Add {
                url: url.to_string(),
                label: label.to_string(),
            }
        }
        "label" => {
            let (n, text) = split_first(rest);
            EditCommand::Label(position(n)?, text.to_string())
        }
        "url" => {
            let (n, url) = split_first(rest);
            EditCommand::Url(position(n)?, url.to_string())
        }
        "icon" => {
            let (n, icon) = split_first(rest);
            EditCommand::Icon(position(n)?, icon.to_string())
        }
        "del" | "delete" | "rm" => EditCommand::Delete(position(rest)?),
        "move" | "mv" => {
            let (from, to) = split_first(rest);
            EditCommand::Move(position(from)?, position(to)?)
        }
        "social" => {
            let (platform, url) = split_first(rest);
            if platform.is_empty() {
                return Err("Usage: social <platform> <url>".to_string());
            }
            EditCommand::Social(Platform::from(platform.to_lowercase()), url.to_string())
        }
        "unsocial" => {
            if rest.is_empty() {
                return Err("Usage: unsocial <platform>".to_string());
            }
            EditCommand::Unsocial(Platform::from(rest.to_lowercase()))
        }
        "platforms" => EditCommand::Platforms,
        "demo" => EditCommand::Demo,
        "show" => EditCommand::Show,
        "publish" => EditCommand::Publish,
        "save" => EditCommand::Save,
        "quit" | "exit" | "q" => EditCommand::Quit,
        "help" | "?" => EditCommand::Help,
        other => return Err(format!("Unknown command '{}'. Type `help`.", other)),
    };
    Ok(command)
}

fn split_first(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (s, ""),
    }
}

fn position(s: &str) -> Result<usize, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("Expected a link position, got '{}'", s))
}
