// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Riskflow CLI entrypoint.
//!
//! Runs a line-oriented editor on stdin. Plain lines go to the agent as user turns; slash
//! commands edit the diagram directly. Without `--replies` there is no agent behind the session
//! and every send reports an error turn.

use std::error::Error;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use riskflow::model::{Graph, Position};
use riskflow::render::{render_graph_text, RenderOptions};
use riskflow::session::{
    read_attachments, CannedPrompt, ConversationSession, Role, ScriptedTransport, SessionConfig,
    UserTurn,
};
use riskflow::store::GraphStore;
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--replies <file.json>] [--config <file.json>] [--export <path>] [--empty]\n\n--replies plays back a JSON array of agent replies, one per turn.\n--config loads session settings (history_window, attachment_char_limit, acknowledgement, system_prompt).\n--export writes the diagram as JSON on exit.\n--empty starts from an empty canvas instead of Start → End.\n\nType /help inside the editor for commands. RUST_LOG controls log output on stderr."
    );
}

const COMMAND_HELP: &str = "Commands:
  <text>                         send a message to the assistant
  /attach <path>...              attach files to the next message
  /canned <generate|risks|controls|review>
  /show                          print the diagram
  /rename <id> <title>
  /delete <id>
  /connect <a> <b> [label]
  /move <id> <x> <y>
  /risk <id> <name>
  /control <id> <risk> <name>    quote names that contain spaces
  /clear
  /export <path>
  /history
  /quit";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    replies: Option<String>,
    config: Option<String>,
    export: Option<String>,
    empty: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--replies" => {
                if options.replies.is_some() {
                    return Err(());
                }
                options.replies = Some(args.next().ok_or(())?);
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--export" => {
                if options.export.is_some() {
                    return Err(());
                }
                options.export = Some(args.next().ok_or(())?);
            }
            "--empty" => {
                if options.empty {
                    return Err(());
                }
                options.empty = true;
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Blank,
    Say(String),
    Attach(Vec<PathBuf>),
    Canned(CannedPrompt),
    Show,
    Rename { id: String, title: String },
    Delete { id: String },
    Connect { source: String, target: String, label: Option<String> },
    Move { id: String, x: i32, y: i32 },
    Risk { id: String, name: String },
    Control { id: String, risk: String, name: String },
    Clear,
    Export(PathBuf),
    History,
    Help,
    Quit,
}

/// Splits on whitespace; double quotes group words into one argument.
fn split_args(input: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quote".to_owned());
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Blank);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Say(line.to_owned()));
    };

    let (name, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = split_args(tail)?;
    let usage = |form: &str| format!("usage: /{name} {form}");

    match (name, args.as_slice()) {
        ("attach", [_, ..]) => Ok(Command::Attach(args.iter().map(PathBuf::from).collect())),
        ("attach", []) => Err(usage("<path>...")),
        ("canned", [preset]) => preset
            .parse()
            .map(Command::Canned)
            .map_err(|err| err.to_string()),
        ("canned", _) => Err(usage("<generate|risks|controls|review>")),
        ("show", []) => Ok(Command::Show),
        ("rename", [id, title @ ..]) if !title.is_empty() => Ok(Command::Rename {
            id: id.clone(),
            title: title.join(" "),
        }),
        ("rename", _) => Err(usage("<id> <title>")),
        ("delete", [id]) => Ok(Command::Delete { id: id.clone() }),
        ("delete", _) => Err(usage("<id>")),
        ("connect", [source, target, label @ ..]) => Ok(Command::Connect {
            source: source.clone(),
            target: target.clone(),
            label: (!label.is_empty()).then(|| label.join(" ")),
        }),
        ("connect", _) => Err(usage("<a> <b> [label]")),
        ("move", [id, x, y]) => {
            let x = x.parse().map_err(|_| usage("<id> <x> <y>"))?;
            let y = y.parse().map_err(|_| usage("<id> <x> <y>"))?;
            Ok(Command::Move { id: id.clone(), x, y })
        }
        ("move", _) => Err(usage("<id> <x> <y>")),
        ("risk", [id, name @ ..]) if !name.is_empty() => Ok(Command::Risk {
            id: id.clone(),
            name: name.join(" "),
        }),
        ("risk", _) => Err(usage("<id> <name>")),
        ("control", [id, risk, name @ ..]) if !name.is_empty() => Ok(Command::Control {
            id: id.clone(),
            risk: risk.clone(),
            name: name.join(" "),
        }),
        ("control", _) => Err(usage("<id> <risk> <name>")),
        ("clear", []) => Ok(Command::Clear),
        ("export", [path]) => Ok(Command::Export(PathBuf::from(path))),
        ("export", _) => Err(usage("<path>")),
        ("history", []) => Ok(Command::History),
        ("help", []) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),
        _ => Err(format!("unknown command /{name} (try /help)")),
    }
}

fn report_edit(changed: bool) {
    if !changed {
        println!("(no change)");
    }
}

async fn print_graph(session: &ConversationSession) {
    let graph = session.snapshot().await;
    println!("{}", render_graph_text(&graph, &RenderOptions::default()));
}

async fn send_turn(session: &ConversationSession, turn: UserTurn) {
    match session.send(turn).await {
        Ok(result) => println!("assistant: {}", result.reply.content),
        Err(err) => eprintln!("riskflow: {err}"),
    }
}

async fn run_editor(
    session: ConversationSession,
    export_on_exit: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending_attachments: Vec<PathBuf> = Vec::new();

    print_graph(&session).await;

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            Command::Blank => {}
            Command::Say(text) => {
                let attachments = read_attachments(&std::mem::take(&mut pending_attachments)).await;
                send_turn(&session, UserTurn::text(text).with_attachments(attachments)).await;
            }
            Command::Attach(paths) => {
                println!("{} file(s) queued for the next message", paths.len());
                pending_attachments.extend(paths);
            }
            Command::Canned(prompt) => {
                let attachments = read_attachments(&std::mem::take(&mut pending_attachments)).await;
                send_turn(
                    &session,
                    UserTurn::text(prompt.text()).with_attachments(attachments),
                )
                .await;
            }
            Command::Show => print_graph(&session).await,
            Command::Rename { id, title } => {
                report_edit(session.edit(|store| store.rename_node(&id, &title)).await);
            }
            Command::Delete { id } => {
                report_edit(session.edit(|store| store.delete_node(&id)).await);
            }
            Command::Connect { source, target, label } => {
                let edge = session
                    .edit(|store| store.connect(&source, &target, label.as_deref()))
                    .await;
                match edge {
                    Some(edge) => println!("added edge {edge}"),
                    None => report_edit(false),
                }
            }
            Command::Move { id, x, y } => {
                report_edit(
                    session
                        .edit(|store| store.move_node(&id, Position::new(x, y)))
                        .await,
                );
            }
            Command::Risk { id, name } => {
                let risk = session.edit(|store| store.add_risk(&id, &name)).await;
                match risk {
                    Some(risk) => println!("added risk {risk}"),
                    None => report_edit(false),
                }
            }
            Command::Control { id, risk, name } => {
                let control = session.edit(|store| store.add_control(&id, &risk, &name)).await;
                match control {
                    Some(control) => println!("added control {control}"),
                    None => report_edit(false),
                }
            }
            Command::Clear => report_edit(session.edit(|store| store.clear()).await),
            Command::Export(path) => match session.export_to(&path).await {
                Ok(()) => println!("exported to {}", path.display()),
                Err(err) => eprintln!("riskflow: {err}"),
            },
            Command::History => {
                for message in session.history().await {
                    let role = match message.role {
                        Role::User => "you",
                        Role::Assistant => "assistant",
                    };
                    println!("{role}: {}", message.content);
                }
            }
            Command::Help => println!("{COMMAND_HELP}"),
            Command::Quit => break,
        }
    }

    if let Some(path) = export_on_exit {
        session.export_to(&path).await?;
        println!("exported to {}", path.display());
    }
    Ok(())
}

fn load_transport(replies: Option<&str>) -> Result<ScriptedTransport, Box<dyn Error>> {
    let Some(path) = replies else {
        return Ok(ScriptedTransport::new());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read replies {path:?}: {err}"))?;
    let transport = ScriptedTransport::from_json_str(&text)
        .map_err(|err| format!("invalid replies {path:?}: {err}"))?;
    Ok(transport)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "riskflow".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        riskflow::telemetry::init();

        let config = match options.config.as_deref() {
            Some(path) => SessionConfig::load(Path::new(path))?,
            None => SessionConfig::default(),
        };
        let transport = load_transport(options.replies.as_deref())?;
        let store = if options.empty {
            GraphStore::new(Graph::new())
        } else {
            GraphStore::seeded()
        };
        let session = ConversationSession::new(store, Arc::new(transport), config);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run_editor(session, options.export.map(PathBuf::from)))?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("riskflow: {err}");
        std::process::exit(1);
    }
}
