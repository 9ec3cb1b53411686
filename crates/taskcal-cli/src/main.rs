// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::CalendarRuntime;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use serde::Serialize;
use taskcal_app::{Category, CategoryStyle, DateRange, Event, EventDate, EventId, TimeWindow};
use taskcal_db::{Applied, EventStore, KeyValueStore, MemoryKv, Store};
use time::{Date, OffsetDateTime};

const DEMO_TASKS: usize = 12;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `taskcal --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    init_tracing(config.log_level());

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if options.demo {
        let mut store = EventStore::load_with_key(MemoryKv::new(), config.storage_key());
        let month_start = demo_month_start()?;
        store.seed_demo_data(u64::from(month_start.ordinal()), DEMO_TASKS, month_start)?;
        if options.check_only {
            return Ok(());
        }
        return execute(CalendarRuntime::new(store), &options.command, &mut out);
    }

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or TASKCAL_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.check_only {
        return Ok(());
    }

    let store = EventStore::load_with_key(store, config.storage_key());
    execute(CalendarRuntime::new(store), &options.command, &mut out)
}

fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKCAL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn demo_month_start() -> Result<Date> {
    OffsetDateTime::now_utc()
        .date()
        .replace_day(1)
        .context("compute first day of the current month")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List {
        search: String,
        category: Option<Category>,
        within: TimeWindow,
        json: bool,
    },
    Add {
        start: String,
        end: Option<String>,
        title: String,
        category: Option<Category>,
    },
    Edit {
        id: String,
        title: Option<String>,
        category: Option<Category>,
        start: Option<String>,
        end: Option<String>,
    },
    Move {
        id: String,
        start: String,
        end: Option<String>,
    },
    Delete {
        id: String,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::List {
            search: String::new(),
            category: None,
            within: TimeWindow::All,
            json: false,
        }
    }
}

fn execute<K: KeyValueStore>(
    mut runtime: CalendarRuntime<K>,
    command: &Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List {
            search,
            category,
            within,
            json,
        } => {
            runtime.set_search(search.clone());
            runtime.set_category_filter(category.clone());
            runtime.set_time_window(*within);
            let events = runtime.visible();
            if *json {
                let rows: Vec<_> = events.iter().map(ListedTask::from).collect();
                let payload =
                    serde_json::to_string_pretty(&rows).context("serialize visible tasks")?;
                writeln!(out, "{payload}")?;
            } else {
                for event in &events {
                    writeln!(out, "{}", format_event(event))?;
                }
            }
        }
        Command::Add {
            start,
            end,
            title,
            category,
        } => {
            runtime.on_range_select(gesture_date(start), end.as_deref().and_then(optional_date))?;
            runtime.set_title(title.clone())?;
            if let Some(category) = category {
                runtime.set_category(category.clone())?;
            }
            if let Some(Applied::Created(event)) = runtime.save()? {
                writeln!(out, "{}", format_event(&event))?;
            }
        }
        Command::Edit {
            id,
            title,
            category,
            start,
            end,
        } => {
            let id = EventId::from(id.as_str());
            if !runtime.on_event_click(&id)? {
                bail!("no task with id {id}; run `taskcal list` to see ids");
            }
            if let Some(title) = title {
                runtime.set_title(title.clone())?;
            }
            if let Some(category) = category {
                runtime.set_category(category.clone())?;
            }
            if start.is_some() || end.is_some() {
                let current = runtime
                    .dialog()
                    .map(|dialog| dialog.range)
                    .ok_or_else(|| anyhow!("task dialog closed unexpectedly"))?;
                runtime.set_range(DateRange {
                    start: start.as_deref().map_or(current.start, gesture_date),
                    end: match end {
                        Some(raw) => optional_date(raw),
                        None => current.end,
                    },
                })?;
            }
            runtime.save()?;
            if let Some(event) = runtime.store().get(&id) {
                writeln!(out, "{}", format_event(event))?;
            }
        }
        Command::Move { id, start, end } => {
            let id = EventId::from(id.as_str());
            let applied = runtime.on_event_change(
                &id,
                gesture_date(start),
                end.as_deref().and_then(optional_date),
            )?;
            if applied == Applied::Missing(id.clone()) {
                bail!("no task with id {id}; run `taskcal list` to see ids");
            }
            if let Some(event) = runtime.store().get(&id) {
                writeln!(out, "{}", format_event(event))?;
            }
        }
        Command::Delete { id } => {
            let id = EventId::from(id.as_str());
            if !runtime.on_event_click(&id)? {
                bail!("no task with id {id}; run `taskcal list` to see ids");
            }
            runtime.delete()?;
            writeln!(out, "deleted {id}")?;
        }
    }
    Ok(())
}

fn gesture_date(raw: &str) -> EventDate {
    let date = EventDate::new(raw);
    if date.instant().is_none() {
        tracing::warn!(date = %raw, "date does not parse; time filters will hide this task");
    }
    date
}

fn optional_date(raw: &str) -> Option<EventDate> {
    EventDate::optional(raw).map(|date| gesture_date(date.as_str()))
}

/// JSON row for `list --json`: the stored task plus how the calendar paints it.
#[derive(Debug, Serialize)]
struct ListedTask<'a> {
    #[serde(flatten)]
    event: &'a Event,
    label: &'a str,
    style: CategoryStyle,
}

impl<'a> From<&'a Event> for ListedTask<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            event,
            label: category_column(&event.category),
            style: event.category.style(),
        }
    }
}

fn category_column(category: &Category) -> &str {
    match category {
        Category::Unset => "-",
        Category::Other(raw) => raw.as_str(),
        known => known.label(),
    }
}

fn format_event(event: &Event) -> String {
    let end = event.end.as_ref().map_or("-", EventDate::as_str);
    format!(
        "{}\t{}\t{}\t{}\t{}",
        event.id,
        event.start,
        end,
        category_column(&event.category),
        event.title
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    command: Command,
}

#[derive(Debug, Default)]
struct CommandArgs {
    name: Option<String>,
    id: Option<String>,
    search: Option<String>,
    category: Option<String>,
    within: Option<String>,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    json: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
        command: Command::default(),
    };
    let mut command = CommandArgs::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires a value"))
        };
        match arg.as_ref() {
            "--config" => {
                options.config_path = PathBuf::from(
                    value_for("--config")
                        .map_err(|_| anyhow!("--config requires a file path"))?,
                );
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            "--search" => command.search = Some(value_for("--search")?),
            "--category" => command.category = Some(value_for("--category")?),
            "--within" => command.within = Some(value_for("--within")?),
            "--title" => command.title = Some(value_for("--title")?),
            "--start" => command.start = Some(value_for("--start")?),
            "--end" => command.end = Some(value_for("--end")?),
            "--json" => command.json = true,
            unknown if unknown.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
            positional => {
                if command.name.is_none() {
                    command.name = Some(positional.to_owned());
                } else if command.id.is_none() {
                    command.id = Some(positional.to_owned());
                } else {
                    bail!("unexpected argument {positional:?}; run with --help to see usage");
                }
            }
        }
    }

    options.command = build_command(command)?;
    Ok(options)
}

fn build_command(args: CommandArgs) -> Result<Command> {
    let name = args.name.as_deref().unwrap_or("list");
    let only = |allowed: &[&str]| -> Result<()> {
        let given = [
            ("--search", args.search.is_some()),
            ("--category", args.category.is_some()),
            ("--within", args.within.is_some()),
            ("--title", args.title.is_some()),
            ("--start", args.start.is_some()),
            ("--end", args.end.is_some()),
            ("--json", args.json),
        ];
        for (flag, present) in given {
            if present && !allowed.contains(&flag) {
                bail!("{flag} does not apply to `{name}`; run with --help to see usage");
            }
        }
        Ok(())
    };
    let require_id = || {
        args.id
            .clone()
            .ok_or_else(|| anyhow!("`{name}` requires a task id; run `taskcal list` to see ids"))
    };
    let no_id = || -> Result<()> {
        match &args.id {
            Some(extra) => bail!("unexpected argument {extra:?} for `{name}`"),
            None => Ok(()),
        }
    };

    match name {
        "list" => {
            only(&["--search", "--category", "--within", "--json"])?;
            no_id()?;
            Ok(Command::List {
                search: args.search.clone().unwrap_or_default(),
                category: args
                    .category
                    .as_deref()
                    .filter(|value| !value.is_empty())
                    .map(Category::parse),
                within: TimeWindow::parse(args.within.as_deref().unwrap_or(""))?,
                json: args.json,
            })
        }
        "add" => {
            only(&["--title", "--category", "--start", "--end"])?;
            no_id()?;
            let start = args
                .start
                .clone()
                .ok_or_else(|| anyhow!("`add` requires --start <date>"))?;
            Ok(Command::Add {
                start,
                end: args.end.clone(),
                title: args.title.clone().unwrap_or_default(),
                category: args.category.as_deref().map(dialog_category).transpose()?,
            })
        }
        "edit" => {
            only(&["--title", "--category", "--start", "--end"])?;
            Ok(Command::Edit {
                id: require_id()?,
                title: args.title.clone(),
                category: args.category.as_deref().map(dialog_category).transpose()?,
                start: args.start.clone(),
                end: args.end.clone(),
            })
        }
        "move" => {
            only(&["--start", "--end"])?;
            let id = require_id()?;
            let start = args
                .start
                .clone()
                .ok_or_else(|| anyhow!("`move` requires --start <date>"))?;
            Ok(Command::Move {
                id,
                start,
                end: args.end.clone(),
            })
        }
        "delete" => {
            only(&[])?;
            Ok(Command::Delete { id: require_id()? })
        }
        unknown => bail!(
            "unknown command {unknown:?}; use one of: list, add, edit, move, delete"
        ),
    }
}

/// Categories the task dialog offers.
fn dialog_category(value: &str) -> Result<Category> {
    let category = Category::parse(value);
    if !Category::CHOICES.contains(&category) {
        bail!("unknown category {value:?}; choose one of: todo, inprogress, review, completed");
    }
    Ok(category)
}

fn print_help() {
    println!("taskcal (Rust)");
    println!("usage: taskcal [options] [command]");
    println!();
    println!("options:");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Run against seeded demo tasks (in-memory)");
    println!("  --check                  Validate config + DB and exit");
    println!("  --help                   Show this help");
    println!();
    println!("commands:");
    println!("  list [--search T] [--category C] [--within 1week|2weeks|3weeks] [--json]");
    println!("  add --start D [--end D] [--title T] [--category C]");
    println!("  edit <id> [--title T] [--category C] [--start D] [--end D]");
    println!("  move <id> --start D [--end D]");
    println!("  delete <id>");
}
