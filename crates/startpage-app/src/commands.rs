use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use startpage_core::clock::{format_clock, format_date};
use startpage_core::countdown::{CountdownRemaining, parse_target};
use startpage_core::quotes::quote_for_day;
use startpage_core::todos::TodoSummary;
use startpage_core::{
    AnchorPreset, AppStore, PomodoroMode, STORAGE_KEY, TickSchedule, WidgetKind, resolve,
};
use startpage_core::storage::SlotStorage;

use crate::app::{AppConfig, AppError};

pub const USAGE: &str = "\
Usage: startpage <command>

Commands:
  status                         Show the saved layout and state
  export [FILE]                  Write the configuration to FILE or stdout
  import FILE                    Merge a configuration file into the saved state
  reset                          Restore every default
  toggle WIDGET                  Show or hide a widget
  anchor WIDGET PRESET           Move a widget to an anchor (e.g. top-left)
  pomodoro start|pause|reset     Control the pomodoro timer
  pomodoro run [SECS]            Run the timer until the phase ends or SECS pass";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PomodoroCommand {
    Start,
    Pause,
    Reset,
    /// Run the tick loop, for at most this many seconds.
    Run(Option<u64>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Reset,
    Toggle(WidgetKind),
    Anchor(WidgetKind, AnchorPreset),
    Pomodoro(PomodoroCommand),
}

fn parse_widget(name: &str) -> Result<WidgetKind, AppError> {
    WidgetKind::parse(name).ok_or_else(|| AppError::UnknownWidget(name.to_string()))
}

impl Command {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, AppError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let command = match args.as_slice() {
            [] | ["status"] => Self::Status,
            ["export"] => Self::Export(None),
            ["export", file] => Self::Export(Some(PathBuf::from(file))),
            ["import", file] => Self::Import(PathBuf::from(file)),
            ["reset"] => Self::Reset,
            ["toggle", widget] => Self::Toggle(parse_widget(widget)?),
            ["anchor", widget, preset] => Self::Anchor(
                parse_widget(widget)?,
                AnchorPreset::parse(preset)
                    .ok_or_else(|| AppError::UnknownAnchor(preset.to_string()))?,
            ),
            ["pomodoro", "start"] => Self::Pomodoro(PomodoroCommand::Start),
            ["pomodoro", "pause"] => Self::Pomodoro(PomodoroCommand::Pause),
            ["pomodoro", "reset"] => Self::Pomodoro(PomodoroCommand::Reset),
            ["pomodoro", "run"] => Self::Pomodoro(PomodoroCommand::Run(None)),
            ["pomodoro", "run", secs] => {
                let secs = secs
                    .parse()
                    .map_err(|_| AppError::Usage(format!("Invalid number of seconds: {}", secs)))?;
                Self::Pomodoro(PomodoroCommand::Run(Some(secs)))
            }
            _ => return Err(AppError::Usage(format!("Unknown command: {}", args.join(" ")))),
        };
        Ok(command)
    }
}

/// Execute one command against the store, writing user-facing output to `out`.
pub fn run_command<S: SlotStorage, W: Write>(
    store: &mut AppStore<S>,
    command: Command,
    config: &AppConfig,
    out: &mut W,
) -> Result<(), AppError> {
    match command {
        Command::Status => print_status(&*store, config, out)?,
        Command::Export(None) => writeln!(out, "{}", store.export()?)?,
        Command::Export(Some(path)) => {
            std::fs::write(&path, store.export()?)?;
            writeln!(out, "Exported to {}", path.display())?;
        }
        Command::Import(path) => {
            let json = std::fs::read_to_string(&path)?;
            store.import_config(&json)?;
            writeln!(out, "Imported {}", path.display())?;
        }
        Command::Reset => {
            store.reset_to_default();
            writeln!(out, "Restored defaults")?;
        }
        Command::Toggle(widget) => {
            if !store.toggle_widget(widget) {
                return Err(AppError::NoToggle(widget.name()));
            }
            let state = if store.settings().is_visible(widget) { "shown" } else { "hidden" };
            writeln!(out, "{} is now {}", widget.name(), state)?;
        }
        Command::Anchor(widget, preset) => {
            store.change_widget_anchor(widget, preset);
            writeln!(out, "{} anchored {}", widget.name(), preset.as_str())?;
        }
        Command::Pomodoro(PomodoroCommand::Start) => {
            store.start_pomodoro();
            print_pomodoro(&*store, out)?;
        }
        Command::Pomodoro(PomodoroCommand::Pause) => {
            store.pause_pomodoro();
            print_pomodoro(&*store, out)?;
        }
        Command::Pomodoro(PomodoroCommand::Reset) => {
            store.reset_pomodoro();
            print_pomodoro(&*store, out)?;
        }
        Command::Pomodoro(PomodoroCommand::Run(limit)) => {
            run_pomodoro(store, limit, std::thread::sleep, out)?;
        }
    }
    Ok(())
}

fn print_pomodoro<S: SlotStorage, W: Write>(
    store: &AppStore<S>,
    out: &mut W,
) -> std::io::Result<()> {
    let pomodoro = store.pomodoro();
    writeln!(
        out,
        "{} {} ({}, sessions: {})",
        pomodoro.mode.label(),
        pomodoro.display(),
        if pomodoro.is_running { "running" } else { "stopped" },
        pomodoro.sessions_completed
    )
}

/// Start the timer and tick it on this thread until it stops at a phase
/// boundary or `limit` seconds have been counted. `sleep` waits between ticks.
/// A limit too large to represent runs until the boundary.
pub fn run_pomodoro<S, W, F>(
    store: &mut AppStore<S>,
    limit: Option<u64>,
    mut sleep: F,
    out: &mut W,
) -> Result<Option<(PomodoroMode, PomodoroMode)>, AppError>
where
    S: SlotStorage,
    W: Write,
    F: FnMut(Duration),
{
    let mut now = Instant::now();
    let mut schedule = TickSchedule::default();
    store.start_pomodoro();
    schedule.sync(store.pomodoro().is_running, now);
    print_pomodoro(&*store, out)?;

    // a limit past the end of the clock means no limit
    let deadline = limit.and_then(|secs| now.checked_add(Duration::from_secs(secs)));
    while let Some(wait) = schedule.time_until_next(now) {
        let next = now + wait;
        if deadline.is_some_and(|deadline| next > deadline) {
            store.pause_pomodoro();
            print_pomodoro(&*store, out)?;
            return Ok(None);
        }
        sleep(wait);
        now = next;
        if let Some((from, to)) = store.run_due_ticks(&mut schedule, now) {
            writeln!(out, "{} finished, next: {}", from.label(), to.label())?;
            print_pomodoro(&*store, out)?;
            return Ok(Some((from, to)));
        }
    }
    Ok(None)
}

fn print_status<S: SlotStorage, W: Write>(
    store: &AppStore<S>,
    config: &AppConfig,
    out: &mut W,
) -> Result<(), AppError> {
    let settings = store.settings();
    let now = chrono::Local::now();

    match config.slot_path(STORAGE_KEY) {
        Some(path) if store.is_persistent() => writeln!(out, "Storage: {}", path.display())?,
        _ => writeln!(out, "Storage: memory only")?,
    }
    writeln!(
        out,
        "{}  {}",
        format_clock(
            &now,
            settings.time_format,
            settings.show_seconds,
            settings.clock_style.separator
        ),
        format_date(&now)
    )?;

    let quote = quote_for_day(&now);
    writeln!(out, "「{}」 —— {}", quote.content, quote.author)?;

    let todos = TodoSummary::of(store.todos());
    writeln!(
        out,
        "Bookmarks: {}  Todos: {} open / {} total",
        store.bookmarks().len(),
        todos.remaining(),
        todos.total
    )?;
    print_pomodoro(store, out)?;

    if settings.show_countdown {
        if let Some(target) = settings
            .countdown_target
            .as_deref()
            .and_then(|text| parse_target(text, &chrono::Local))
        {
            let left = CountdownRemaining::until(&target, &now);
            writeln!(
                out,
                "{}: {}天 {}时 {}分 {}秒",
                settings.countdown_title, left.days, left.hours, left.minutes, left.seconds
            )?;
        }
    }

    writeln!(
        out,
        "Widgets (viewport {}x{}):",
        config.viewport.width, config.viewport.height
    )?;
    for widget in WidgetKind::ALL {
        let position = settings.position(widget);
        let point = resolve(position, config.viewport).reference_point();
        let sizes: Vec<String> = widget
            .size_spec()
            .map(|spec| {
                spec.axes()
                    .iter()
                    .filter_map(|&axis| {
                        let bounds = spec.bounds(axis)?;
                        let value = settings.size(widget, axis)?;
                        Some(format!("{}{}", value, bounds.unit.label()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        writeln!(
            out,
            "  {:<10} {:<7} {:<13} offset ({}, {}) at ({:.0}, {:.0}) {}",
            widget.name(),
            if settings.is_visible(widget) { "shown" } else { "hidden" },
            position.preset.as_str(),
            position.offset_x,
            position.offset_y,
            point.x,
            point.y,
            sizes.join("x")
        )?;
    }
    Ok(())
}
