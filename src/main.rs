use clap::Parser;
use colored::Colorize;
use flowslot::config::Config;
use flowslot::encoded::SlotDelta;
use flowslot::scenario::{Scenario, ScenarioFlight};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::Tabled;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    config: PathBuf,

    /// Path to the JSON flight plan records, overriding the configured one
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

#[derive(Tabled)]
struct FlightRow {
    #[tabled(rename = "Call sign")]
    call_sign: String,
    #[tabled(rename = "Type")]
    flight_type: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Facilities")]
    facilities: String,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Offset")]
    offset: i64,
    #[tabled(rename = "Holds")]
    holds: u32,
    #[tabled(rename = "Over")]
    overcapacity: u32,
    #[tabled(rename = "Departed")]
    departed: bool,
}

impl From<&ScenarioFlight> for FlightRow {
    fn from(f: &ScenarioFlight) -> Self {
        let fp = &f.flight_plan;
        let efp = &f.encoded;
        FlightRow {
            call_sign: fp.call_sign().to_string(),
            flight_type: efp.flight_type.to_string(),
            start: fp.start_time().map(|t| t.to_string()).unwrap_or_default(),
            end: fp.end_time().map(|t| t.to_string()).unwrap_or_default(),
            facilities: fp.facilities_passed().join(" > "),
            slot: efp.departure_time_slot().map(|s| s.to_string()).unwrap_or_default(),
            offset: efp.schedule_offset(),
            holds: efp.num_hold,
            overcapacity: efp.num_overcapacity,
            departed: efp.is_departed(),
        }
    }
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Facility")]
    facility: String,
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Exit")]
    exit: String,
    #[tabled(rename = "Altitude")]
    altitude: String,
    #[tabled(rename = "Runway")]
    runway: String,
}

fn paginate(content: String) {
    let spawned = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match spawned {
        Ok(pager) => pager,
        Err(_) => {
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn print_table(table: tabled::Table, rows: usize) {
    let mut table = table;
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn print_delta(delta: &SlotDelta) {
    let fmt = |cells: &std::collections::BTreeSet<flowslot::encoded::Cell>| {
        cells
            .iter()
            .map(|(facility, slot)| format!("{}{}", facility, slot))
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("  {} {}", "-".red().bold(), fmt(&delta.vacated).red());
    println!("  {} {}", "+".green().bold(), fmt(&delta.occupied).green());
}

fn shift(scenario: &mut Scenario, parts: &[&str], delay: bool) {
    let usage = if delay { "hold" } else { "advance" };
    match (parts.get(1), parts.get(2).and_then(|n| n.parse::<i64>().ok())) {
        (Some(call_sign), Some(n)) => match scenario.reschedule(call_sign, n, delay) {
            Ok(delta) => {
                println!(
                    "Moved {} {} slot(s) {}.",
                    call_sign,
                    n,
                    if delay { "later" } else { "earlier" }
                );
                print_delta(&delta);
            }
            Err(e) => println!("{}", e.to_string().yellow()),
        },
        _ => println!("Usage: {} <callsign> <slots>", usage),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowslot=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    if let Some(path) = args.scenario {
        config.flight_plan.file_path = path;
    }

    let mut scenario = Scenario::load(&config)?;
    println!(
        "Flow desk online. Loaded {} flights from {}",
        scenario.flights().len(),
        config.flight_plan.file_path.display()
    );

    let rl_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: ["ls", "show", "hold", "advance", "depart", "demand", "help", "exit"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    };

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let sub = parts.get(1).copied().unwrap_or("a");
                        let rows: Vec<FlightRow> = scenario
                            .flights()
                            .iter()
                            .filter(|f| match sub {
                                "d" | "departed" => f.encoded.is_departed(),
                                "h" | "held" => f.encoded.schedule_offset() > 0,
                                "o" | "over" => f.encoded.num_overcapacity > 0,
                                _ => true,
                            })
                            .map(FlightRow::from)
                            .collect();
                        if rows.is_empty() {
                            println!("No matching flights found.")
                        } else {
                            let count = rows.len();
                            print_table(tabled::Table::new(rows), count);
                        }
                    }
                    "show" => match parts.get(1).and_then(|cs| scenario.flight(cs)) {
                        Some(flight) => {
                            let rows: Vec<PlanRow> = flight
                                .flight_plan
                                .plans()
                                .iter()
                                .map(|p| PlanRow {
                                    facility: p.facility.to_string(),
                                    entry: p.time_entry.to_string(),
                                    exit: p.time_exit.to_string(),
                                    altitude: format!("{} > {}", p.altitude_entry, p.altitude_exit),
                                    runway: p.runway_use.map(|r| r.to_string()).unwrap_or_default(),
                                })
                                .collect();
                            let count = rows.len();
                            print_table(tabled::Table::new(rows), count);
                            println!("{}", serde_json::to_string_pretty(&flight.encoded.to_record())?);
                        }
                        None => println!("Usage: show <callsign>"),
                    },
                    "hold" => shift(&mut scenario, &parts, true),
                    "advance" => shift(&mut scenario, &parts, false),
                    "depart" => match parts.get(1) {
                        Some(call_sign) => match scenario.depart(call_sign) {
                            Ok(cells) => println!("{} departed occupying {} cell(s).", call_sign, cells.len()),
                            Err(e) => println!("{}", e.to_string().yellow()),
                        },
                        None => println!("Usage: depart <callsign>"),
                    },
                    "demand" => {
                        let overloaded = scenario.overloaded();
                        if overloaded.is_empty() {
                            println!("{}", "All facilities within capacity.".green());
                        } else {
                            let capacity = scenario.environment().default_capacity;
                            for ((facility, slot), count) in overloaded {
                                println!(
                                    "  {}{}  {}/{}",
                                    facility,
                                    slot,
                                    count.to_string().red().bold(),
                                    capacity
                                );
                            }
                        }
                    }
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [filter]          - List flights, optionally: d - departed, h - held, o - over capacity");
                        println!("  show <cs>            - Show the plans and slot encoding of flight <cs>");
                        println!("  hold <cs> <n>        - Delay flight <cs> by <n> slots");
                        println!("  advance <cs> <n>     - Move flight <cs> <n> slots earlier");
                        println!("  depart <cs>          - Mark flight <cs> departed");
                        println!("  demand               - List facility slots over capacity");
                        println!("  help / ?             - Show this help menu");
                        println!("  exit / quit          - Exit the simulator\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
