// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use logging::LogTarget;
use nescka_app::{
    AppCommand, AppState, FilterChoice, Lead, LeadFilter, LeadId, Tone, compose_outreach,
    filter_leads, render_lead_report, report_data_uri,
};
use nescka_assistant::Assistant;
use nescka_db::{LeadRepository, Store};
use nescka_tui::RunOptions;
use runtime::{Runtime, SystemClipboard};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

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
            "load config {}; run `nescka --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_target = if options.command.is_some() || options.check_only {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file()?)
    };
    logging::init(config.log_level(), &log_target)?;

    let assistant = Assistant::new(config.assistant_delay()?);
    let toast_duration = config.toast_duration()?;
    let report_dir = config.report_dir()?;

    let store = Store::open_memory().context("open in-memory lead store")?;
    store.bootstrap()?;
    store.seed_demo_data()?;
    tracing::debug!(config = %options.config_path.display(), "lead store ready");

    if options.check_only {
        return Ok(());
    }

    if let Some(command) = &options.command {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        return run_command(&store, &assistant, &options, command, &mut out);
    }

    let mut state = dashboard_state(config.default_tone(), &options.filter);
    let mut runtime = Runtime::new(
        &store,
        &store,
        assistant,
        report_dir,
        SystemClipboard::default(),
    );
    nescka_tui::run_app(
        &mut state,
        &mut runtime,
        RunOptions {
            toast_duration,
            assistant_name: nescka_assistant::NAME.to_owned(),
            assistant_subtitle: nescka_assistant::SUBTITLE.to_owned(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Draft(LeadId),
    Report(LeadId),
    Ask(String),
}

impl Command {
    const fn flag(&self) -> &'static str {
        match self {
            Self::List => "--list",
            Self::Draft(_) => "--draft",
            Self::Report(_) => "--report",
            Self::Ask(_) => "--ask",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    command: Option<Command>,
    filter: LeadFilter,
    tone: Option<Tone>,
    data_uri: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        command: None,
        filter: LeadFilter::default(),
        tone: None,
        data_uri: false,
    };

    let mut iter = args.into_iter();
    let mut pending = Vec::new();
    while let Some(arg) = iter.next() {
        let mut next_value = |flag: &str, what: &str| -> Result<String> {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires {what}"))
        };
        match arg.as_ref() {
            "--config" => {
                options.config_path = PathBuf::from(next_value("--config", "a file path")?);
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-example-config" => options.print_example = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            "--list" => pending.push(Command::List),
            "--draft" => pending.push(Command::Draft(parse_lead_id(
                "--draft",
                &next_value("--draft", "a lead id")?,
            )?)),
            "--report" => pending.push(Command::Report(parse_lead_id(
                "--report",
                &next_value("--report", "a lead id")?,
            )?)),
            "--ask" => {
                let question = next_value("--ask", "a question")?;
                let question = question.trim();
                if question.is_empty() {
                    bail!("--ask requires a non-empty question");
                }
                pending.push(Command::Ask(question.to_owned()));
            }
            "--source" => {
                options.filter.source =
                    parse_choice("--source", &next_value("--source", "a source")?)?;
            }
            "--status" => {
                options.filter.status =
                    parse_choice("--status", &next_value("--status", "a status")?)?;
            }
            "--priority" => {
                options.filter.priority =
                    parse_choice("--priority", &next_value("--priority", "a priority")?)?;
            }
            "--search" => options.filter.search = next_value("--search", "search text")?,
            "--tone" => {
                let raw = next_value("--tone", "a tone")?;
                let tone = Tone::parse(&raw).ok_or_else(|| {
                    let expected = Tone::ALL.map(Tone::label).join(", ");
                    anyhow!("unknown tone {raw:?}; expected one of {expected}")
                })?;
                options.tone = Some(tone);
            }
            "--data-uri" => options.data_uri = true,
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    if pending.len() > 1 {
        let flags: Vec<&str> = pending.iter().map(Command::flag).collect();
        bail!(
            "only one of --list, --draft, --report, --ask may be given; got {}",
            flags.join(" ")
        );
    }
    options.command = pending.pop();

    let command_flag = options.command.as_ref().map(Command::flag);
    if !options.filter.is_default() && !matches!(command_flag, None | Some("--list")) {
        bail!("--source, --status, --priority, and --search only apply to --list or the dashboard");
    }
    if options.tone.is_some() && command_flag != Some("--draft") {
        bail!("--tone only applies to --draft");
    }
    if options.data_uri && command_flag != Some("--report") {
        bail!("--data-uri only applies to --report");
    }

    Ok(options)
}

fn parse_lead_id(flag: &str, raw: &str) -> Result<LeadId> {
    let id: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{flag} expects a numeric lead id, got {raw:?}"))?;
    Ok(LeadId::new(id))
}

fn parse_choice<T: nescka_app::LeadAttribute>(flag: &str, raw: &str) -> Result<FilterChoice<T>> {
    FilterChoice::parse(raw).ok_or_else(|| {
        let options: Vec<&str> = FilterChoice::<T>::options()
            .into_iter()
            .map(FilterChoice::label)
            .collect();
        anyhow!(
            "unknown {flag} value {raw:?}; expected one of {}",
            options.join(", ")
        )
    })
}

/// Initial dashboard state with the configured tone and any filters given on
/// the command line already applied.
fn dashboard_state(tone: Tone, filter: &LeadFilter) -> AppState {
    let mut state = AppState {
        tone,
        ..AppState::default()
    };
    state.dispatch(AppCommand::SetSourceFilter(filter.source));
    state.dispatch(AppCommand::SetStatusFilter(filter.status));
    state.dispatch(AppCommand::SetPriorityFilter(filter.priority));
    if !filter.search.is_empty() {
        state.dispatch(AppCommand::SetSearch(filter.search.clone()));
    }
    state
}

fn find_lead<R: LeadRepository>(leads: &R, id: LeadId) -> Result<Lead> {
    leads
        .get_lead(id)?
        .ok_or_else(|| anyhow!("lead {id} not found; run `nescka --list` to see lead ids"))
}

fn run_command<R: LeadRepository, W: Write>(
    leads: &R,
    assistant: &Assistant,
    options: &CliOptions,
    command: &Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::List => {
            let leads = leads.list_leads()?;
            let visible = filter_leads(&leads, &options.filter);
            tracing::debug!(
                filter = %options.filter.describe(),
                shown = visible.len(),
                total = leads.len(),
                "listing leads"
            );
            serde_json::to_writer_pretty(&mut *out, &visible).context("encode leads as JSON")?;
            writeln!(out)?;
        }
        Command::Draft(id) => {
            let lead = find_lead(leads, *id)?;
            let tone = options.tone.unwrap_or_default();
            writeln!(out, "{}", compose_outreach(&lead, tone))?;
        }
        Command::Report(id) => {
            let lead = find_lead(leads, *id)?;
            let html = render_lead_report(&lead);
            if options.data_uri {
                writeln!(out, "{}", report_data_uri(&html))?;
            } else {
                out.write_all(html.as_bytes())?;
            }
        }
        Command::Ask(question) => {
            let leads = leads.list_leads()?;
            writeln!(out, "{}", assistant.answer(question, &leads))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn print_help() {
    println!("nescka lead tracker");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and startup dependencies");
    println!("  --list                   Print leads as JSON");
    println!("  Filters (for --list, or to preset the dashboard):");
    println!("    --source <name>        Only leads from Upwork, LinkedIn, or Email");
    println!("    --status <name>        Only Hot, Warm, or Cold leads");
    println!("    --priority <name>      Only High, Medium, or Low priority leads");
    println!("    --search <text>        Match name or message summary");
    println!("  --draft <id>             Print an outreach draft for a lead");
    println!("    --tone <tone>          Professional, Friendly, Casual, Concise, Enthusiastic");
    println!("  --report <id>            Print the HTML summary report for a lead");
    println!("    --data-uri             Print the report as a data: URI instead");
    println!("  --ask <question>         Ask the lead assistant a question");
    println!("  --help                   Show this help");
    println!();
    println!("With no command the interactive dashboard starts.");
}
