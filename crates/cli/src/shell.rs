//! Interactive sidebar session on stdin.
//!
//! Each line is one event for the session; catalog results arrive
//! concurrently and are folded in as soon as they land.

use anyhow::{Result, bail};
use opsdash_engine::{Msg, NavigationSession, render_text};
use opsdash_types::SessionUser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::host::Host;

const HELP: &str = "\
commands:
  login <token>     set the session credential
  logout            clear the credential
  user <id,id,...>  set the user's capability references
  route <path>      report a route change
  toggle <name>     expand or collapse a group
  width             toggle collapsed-width mode
  go <path>         click a row
  show              print the sidebar
  quit              leave the shell";

#[derive(Debug)]
pub enum ShellCommand {
    Event(Msg),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "login" | "route" | "go" | "toggle" if rest.is_empty() => bail!("usage: {verb} <argument>"),
        "login" => ShellCommand::Event(Msg::CredentialChanged(Some(rest.to_string()))),
        "logout" => ShellCommand::Event(Msg::CredentialChanged(None)),
        "user" => {
            let refs = rest.split(',').map(str::trim).filter(|id| !id.is_empty());
            ShellCommand::Event(Msg::UserChanged(SessionUser::with_refs(refs)))
        }
        "route" => ShellCommand::Event(Msg::RouteChanged(rest.to_string())),
        "go" => ShellCommand::Event(Msg::NavigateTo(rest.to_string())),
        // Group names may contain spaces.
        "toggle" => ShellCommand::Event(Msg::ToggleNode(rest.to_string())),
        "width" => ShellCommand::Event(Msg::ToggleWidth),
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

pub async fn run(mut host: Host, mut receiver: UnboundedReceiver<Msg>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");
    print_sidebar(&host);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(ShellCommand::Help)) => println!("{HELP}"),
                    Ok(Some(ShellCommand::Show)) => print_sidebar(&host),
                    Ok(Some(ShellCommand::Event(msg))) => {
                        host.dispatch(msg);
                        print_sidebar(&host);
                    }
                    Err(error) => eprintln!("{error}"),
                }
            }
            Some(msg) = receiver.recv() => {
                host.dispatch(msg);
                print_sidebar(&host);
            }
        }
    }
    Ok(())
}

fn print_sidebar(host: &Host) {
    let snapshot = host.session.snapshot();
    println!("{}", status_line(&host.session));
    if snapshot.rows.is_empty() {
        println!("  (no accessible pages)");
    } else {
        print!("{}", render_text(&snapshot.rows));
    }
}

/// One-line header: route, catalog state and the current fetch generation.
fn status_line(session: &NavigationSession) -> String {
    let catalog = session.catalog();
    let status = serde_json::to_string(catalog.status()).unwrap_or_default();
    format!(
        "route: {}  catalog: {status}  generation: {}",
        session.current_route(),
        catalog.generation()
    )
}
