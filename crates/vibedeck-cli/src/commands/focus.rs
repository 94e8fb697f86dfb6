//! Interactive focus session driven by a real ticker and stdin commands.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use vibedeck_core::{Config, Dashboard, Event, FocusMachine, Intent, IntervalTicker, ViewState};

use super::{open_deck, CliResult};

const HELP: &str = "commands: start | pause | toggle | reset | deep | exit | add <minutes> <title> | done [id] | list | help | quit";

#[derive(Debug, PartialEq)]
enum Command {
    Intent(Intent),
    ToggleDeep,
    CompleteActive,
    List,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let command = match head {
        "start" => Command::Intent(Intent::Start),
        "pause" => Command::Intent(Intent::Pause),
        "toggle" => Command::Intent(Intent::Toggle),
        "reset" => Command::Intent(Intent::Reset),
        "deep" => Command::ToggleDeep,
        "exit" => Command::Intent(Intent::ExitDeep),
        "add" => {
            let minutes = words
                .next()
                .ok_or("usage: add <minutes> <title>")?
                .parse::<f64>()
                .map_err(|e| format!("invalid minutes: {e}"))?;
            let title = words.collect::<Vec<_>>().join(" ");
            Command::Intent(Intent::AddTask { title, minutes })
        }
        "done" => match words.next() {
            Some(id) => Command::Intent(Intent::CompleteTask { id: id.to_string() }),
            None => Command::CompleteActive,
        },
        "list" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

pub fn run(config: &Config, deep: bool) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(config, deep))
}

async fn session(config: &Config, deep: bool) -> CliResult {
    let deck = open_deck(config)?;
    let period = config.tick_period();
    let (tx, mut ticks) = mpsc::unbounded_channel();
    let ticker = IntervalTicker::new(period, tx);
    let machine = FocusMachine::new(config.session_settings(), Box::new(ticker));
    let mut dashboard = Dashboard::new(deck, machine);
    let mut notices = dashboard.subscribe();

    if deep {
        dashboard.dispatch(Intent::EnterDeep);
    }
    println!("{HELP}");
    drain_notices(&mut notices);
    render(&dashboard.view());

    let mut beats = interval_at(Instant::now() + period, period);
    beats.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                dashboard.on_tick(tick);
            }
            _ = beats.tick() => {
                dashboard.beat();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Intent(intent))) => {
                        dashboard.dispatch(intent);
                    }
                    Ok(Some(Command::ToggleDeep)) => {
                        let intent = if dashboard.machine().is_deep_mode() {
                            Intent::ExitDeep
                        } else {
                            Intent::EnterDeep
                        };
                        dashboard.dispatch(intent);
                    }
                    Ok(Some(Command::CompleteActive)) => match dashboard.deck().active_task() {
                        Some(task) => {
                            let id = task.id.clone();
                            dashboard.dispatch(Intent::CompleteTask { id });
                        }
                        None => notice("no pending tasks"),
                    },
                    Ok(Some(Command::List)) => list_tasks(&dashboard),
                    Ok(Some(Command::Help)) => notice(HELP),
                    Err(message) => notice(&message),
                }
            }
        }
        drain_notices(&mut notices);
        render(&dashboard.view());
    }
    println!();
    Ok(())
}

fn drain_notices(rx: &mut broadcast::Receiver<Event>) {
    loop {
        match rx.try_recv() {
            Ok(event) => {
                if let Some(text) = describe(&event) {
                    notice(&text);
                }
            }
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notice receiver lagged");
            }
            Err(_) => break,
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::TaskAdded { task, .. } => Some(format!(
            "added {} ({} min) [{}]",
            task.title,
            task.duration_minutes(),
            task.id
        )),
        Event::TaskCompleted { task, profile, .. } => Some(format!(
            "vibe check: {} done. {} vibes, streak {}",
            task.title, profile.vibes_completed, profile.current_streak
        )),
        Event::FocusTimeUp { next_mode, .. } => Some(format!("time's up, next: {next_mode:?}")),
        Event::BreakFinished { .. } => Some("break over".to_string()),
        Event::TasksRequired { .. } => Some("add a task first: add <minutes> <title>".to_string()),
        Event::Rejected { reason, .. } => Some(format!("rejected: {reason}")),
        Event::DeepModeEntered { .. } => Some("deep mode on".to_string()),
        Event::DeepModeExited { .. } => Some("deep mode off".to_string()),
        _ => None,
    }
}

fn list_tasks(dashboard: &Dashboard) {
    let tasks = dashboard.deck().tasks();
    if tasks.is_empty() {
        notice("no pending tasks");
        return;
    }
    for task in tasks {
        notice(&format!("{}  {:>3} min  {}", task.id, task.duration_minutes(), task.title));
    }
}

fn notice(text: &str) {
    print!("\r\x1b[2K");
    println!("{text}");
}

fn render(view: &ViewState) {
    let mut line = format!("\r\x1b[2K{} {} [{}]", view.title, view.display, view.primary_action);
    if let Some(n) = view.preroll {
        line.push_str(&format!(" {n}..."));
    }
    if let Some(quote) = view.quote {
        line.push_str(&format!(" {quote}"));
    }
    print!("{line}");
    let _ = std::io::stdout().flush();
}
