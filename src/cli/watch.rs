//! Interactive dashboard: redraws on every state change, refreshes live
//! rates on a timer and reads commands from stdin.

use super::{ViewOptions, dashboard, ui};
use crate::core::config::AppConfig;
use crate::core::dashboard::{Effects, LoadTicket};
use crate::core::{
    Action, CurrencyCode, CurrencyRateProvider, DashboardState, DateRange, LiveRates, LoadStatus,
    Preset, RateHistoryProvider, RateRow, SortColumn, fetch_live_rates, load_history,
};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use console::Term;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  sort <date|CODE>        sort by a column, again to flip the direction
  toggle <CODE>           select or deselect a currency
  add <CODE>              select a currency
  remove <CODE>           deselect a currency
  range <START> <END>     show a custom range (YYYY-MM-DD)
  preset <7D|30D|90D|180D|1Y>
  retry                   reload history and live rates
  refresh                 refresh live rates now
  help                    show this help
  quit                    leave the dashboard";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Action(Action),
    Help,
    Quit,
}

/// Parses one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "sort" | "s" => {
            let column: SortColumn = single_arg(&args, "sort <date|CODE>")?.parse()?;
            Command::Action(Action::Sort(column))
        }
        "toggle" | "t" => Command::Action(Action::Toggle(code_arg(&args, "toggle")?)),
        "add" | "a" => Command::Action(Action::Add(code_arg(&args, "add")?)),
        "remove" | "rm" => Command::Action(Action::Remove(code_arg(&args, "remove")?)),
        "range" => {
            let [start, end] = args.as_slice() else {
                bail!("Usage: range <START> <END>");
            };
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            Command::Action(Action::SetRange(DateRange::new(start, end)?))
        }
        "preset" | "p" => {
            let preset: Preset = single_arg(&args, "preset <PRESET>")?.parse()?;
            Command::Action(Action::Preset(preset))
        }
        "retry" | "reload" => Command::Action(Action::Retry),
        "refresh" | "r" => Command::Action(Action::RefreshLive),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands"),
    };
    Ok(Some(command))
}

fn single_arg<'a>(args: &[&'a str], usage: &str) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => bail!("Usage: {usage}"),
    }
}

fn code_arg(args: &[&str], verb: &str) -> Result<CurrencyCode> {
    Ok(single_arg(args, &format!("{verb} <CODE>"))?.parse()?)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: '{s}', expected YYYY-MM-DD"))
}

enum Update {
    History(LoadTicket, Result<Vec<RateRow>>),
    Live(LoadTicket, LiveRates),
}

/// Owns the dashboard state and the background loads feeding it.
struct Session {
    state: DashboardState,
    history_provider: Arc<dyn RateHistoryProvider>,
    rate_provider: Arc<dyn CurrencyRateProvider>,
    tx: mpsc::UnboundedSender<Update>,
    notice: Option<String>,
    /// `--sort`/`--desc`, applied once the first history load lands.
    initial_sort: Option<ViewOptions>,
}

impl Session {
    fn spawn_history(&mut self) {
        let ticket = self.state.begin_load();
        let provider = Arc::clone(&self.history_provider);
        let selection = self.state.selection().clone();
        let range = *self.state.range();
        let quote = self.state.quote().clone();
        let tx = self.tx.clone();
        debug!(?ticket, %range, "Spawning history load");

        tokio::spawn(async move {
            let result =
                load_history(provider.as_ref(), &selection, &range, &quote, &|| {}).await;
            // The receiver is gone once the session ends.
            let _ = tx.send(Update::History(ticket, result));
        });
    }

    fn spawn_live(&mut self) {
        let ticket = self.state.begin_live();
        let provider = Arc::clone(&self.rate_provider);
        let codes = self.state.selection().codes().to_vec();
        let quote = self.state.quote().clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let rates = fetch_live_rates(provider.as_ref(), &codes, &quote).await;
            let _ = tx.send(Update::Live(ticket, rates));
        });
    }

    fn run_effects(&mut self, effects: Effects) {
        if effects.reload {
            self.spawn_history();
        }
        if effects.refresh_live {
            self.spawn_live();
        }
        self.notice = effects.notice;
    }

    fn apply(&mut self, action: Action, today: NaiveDate) {
        let effects = self.state.apply(action, today);
        self.run_effects(effects);
    }

    fn receive(&mut self, update: Update, today: NaiveDate) {
        match update {
            Update::History(ticket, result) => {
                if let Err(e) = &result {
                    warn!(error = %e, "History load failed");
                }
                let applied = self.state.finish_load(ticket, result);
                if applied
                    && self.state.status() == &LoadStatus::Idle
                    && let Some(options) = self.initial_sort.take()
                {
                    options.apply_sort(&mut self.state, today);
                }
            }
            Update::Live(ticket, rates) => {
                self.state.finish_live(ticket, rates);
            }
        }
    }

    fn draw(&self, term: &Term, config: &AppConfig, today: NaiveDate) {
        // Clearing fails when stdout is not a terminal; the frame is still printed.
        let _ = term.clear_screen();
        println!("{}", dashboard::render(&self.state, &config.display, today));
        if let Some(notice) = &self.notice {
            println!("\n{}", ui::style_text(notice, ui::StyleType::Highlight));
        }
        println!(
            "\n{} {}",
            ui::style_text("● LIVE", ui::StyleType::Live),
            ui::style_text(
                &format!(
                    "refreshes every {}s. Type 'help' for commands.",
                    config.refresh_interval_secs
                ),
                ui::StyleType::Subtle
            )
        );
    }
}

/// Runs the dashboard until `quit` or Ctrl-C.
pub async fn run(
    history_provider: Arc<dyn RateHistoryProvider>,
    rate_provider: Arc<dyn CurrencyRateProvider>,
    config: &AppConfig,
    options: &ViewOptions,
) -> Result<()> {
    let today = Local::now().date_naive();
    let state = options.initial_state(config, today)?;
    if let Some(SortColumn::Currency(code)) = &options.sort
        && !state.selection().contains(code)
    {
        return Err(anyhow!("Cannot sort by {code}: it is not selected"));
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = Session {
        state,
        history_provider,
        rate_provider,
        tx,
        notice: None,
        initial_sort: Some(options.clone()),
    };
    session.spawn_history();
    session.spawn_live();

    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and the initial fetch is already running.
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let term = Term::stdout();

    info!(
        interval = config.refresh_interval_secs,
        "Watching exchange rates"
    );

    loop {
        let today = Local::now().date_naive();
        session.draw(&term, config, today);

        tokio::select! {
            _ = ticker.tick() => {
                debug!("Refresh tick");
                session.spawn_live();
            }
            Some(update) = rx.recv() => {
                session.receive(update, today);
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match parse_command(&line) {
                        Ok(Some(Command::Action(action))) => session.apply(action, today),
                        Ok(Some(Command::Help)) => session.notice = Some(HELP.to_string()),
                        Ok(Some(Command::Quit)) => break,
                        Ok(None) => session.notice = None,
                        Err(e) => session.notice = Some(format!("{e:#}")),
                    },
                    Ok(None) => {
                        debug!("stdin closed, continuing without commands");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read from stdin");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    info!("Leaving dashboard");
    Ok(())
}
