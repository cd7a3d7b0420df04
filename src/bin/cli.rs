use availability_tool::{
    AvailabilityCalendar, AvailabilityConfig, TimeOfDay, Weekday, WeeklyAvailabilityScheduler,
    describe_slot, end_time_options, generate_time_options, load_schedule_from_csv,
    load_schedule_from_json, render_week_table, save_schedule_to_csv, save_schedule_to_json,
};
use chrono::{Datelike, NaiveDate};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the weekly schedule\n  day <Day> on|off                   Toggle availability (off clears the day's slots)\n  add <Day> <HH:MM> <HH:MM>          Add a time slot\n  remove <Day> <id>                  Remove a time slot by id\n  options [granularity]              List start time options\n  ends <HH:MM>                       List end time options after a start time\n  bookable <YYYY-MM-DD>              List appointment times on a date\n  next <YYYY-MM-DD>                  Find the next bookable date after a date\n  block <YYYY-MM-DD>                 Block a date from booking\n  config load <json_path>            Load settings (granularity, days, blocked dates)\n  save <json|csv> <path>             Persist schedule to disk\n  load <json|csv> <path>             Load schedule from disk\n  quit|exit                          Exit"
    );
}

fn parse_day(s: Option<&str>) -> Option<Weekday> {
    match s {
        Some(s) => match s.parse::<Weekday>() {
            Ok(day) => Some(day),
            Err(e) => {
                println!("{}", e);
                None
            }
        },
        None => None,
    }
}

/// Prints the usage line when the date is absent, or a format hint when it is malformed.
fn date_arg(s: Option<&str>, usage: &str) -> Option<NaiveDate> {
    let Some(s) = s else {
        println!("{}", usage);
        return None;
    };
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            println!("Invalid date (YYYY-MM-DD)");
            None
        }
    }
}

/// A missing argument is left for the scheduler to report as a missing time.
fn parse_time_arg(s: Option<&str>) -> Result<Option<TimeOfDay>, String> {
    match s {
        None => Ok(None),
        Some(s) => s.parse::<TimeOfDay>().map(Some).map_err(|e| e.to_string()),
    }
}

fn calendar(
    scheduler: &WeeklyAvailabilityScheduler,
    config: &AvailabilityConfig,
) -> AvailabilityCalendar {
    AvailabilityCalendar::from_config(scheduler.snapshot(), config)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = AvailabilityConfig::default();
    let mut scheduler = WeeklyAvailabilityScheduler::with_config(&config);

    println!("Availability Tool (CLI) - type 'help' for commands\n");
    println!("{}", render_week_table(scheduler.week()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_week_table(scheduler.week())),
            "day" => {
                let day_s = parts.next();
                let state_s = parts.next();
                match (day_s, state_s) {
                    (Some(_), Some(state_s)) => {
                        let Some(day) = parse_day(day_s) else {
                            continue;
                        };
                        let available = match state_s {
                            "on" => true,
                            "off" => false,
                            _ => {
                                println!("Usage: day <Day> on|off");
                                continue;
                            }
                        };
                        scheduler.set_day_availability(day, available);
                        if available {
                            println!("{day} is now available.");
                        } else {
                            println!("{day} is now unavailable.");
                        }
                        println!("{}", render_week_table(scheduler.week()));
                    }
                    _ => println!("Usage: day <Day> on|off"),
                }
            }
            "add" => {
                let day_s = parts.next();
                if day_s.is_none() {
                    println!("Usage: add <Day> <HH:MM> <HH:MM>");
                    continue;
                }
                let Some(day) = parse_day(day_s) else {
                    continue;
                };
                let start = parse_time_arg(parts.next());
                let end = parse_time_arg(parts.next());
                let (start, end) = match (start, end) {
                    (Ok(start), Ok(end)) => (start, end),
                    (Err(e), _) | (_, Err(e)) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let well_formed = matches!((start, end), (Some(s), Some(e)) if s < e);
                if well_formed && !scheduler.is_available(day) {
                    println!("{day} is unavailable. Toggle availability to add time slots.");
                    continue;
                }
                match scheduler.add_slot(day, start, end) {
                    Ok(slot) => {
                        println!("Added {} to {} (slot #{}).", describe_slot(&slot), day, slot.id);
                        println!("{}", render_week_table(scheduler.week()));
                    }
                    Err(e) => println!("{}: {}", e.title(), e),
                }
            }
            "remove" => {
                let day_s = parts.next();
                let id_s = parts.next();
                match (day_s, id_s) {
                    (Some(_), Some(id_s)) => {
                        let Some(day) = parse_day(day_s) else {
                            continue;
                        };
                        let id = match id_s.trim_start_matches('#').parse() {
                            Ok(id) => id,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        match scheduler.remove_slot(day, id) {
                            Some(_) => {
                                println!("Removed time slot #{id} from {day}.");
                                println!("{}", render_week_table(scheduler.week()));
                            }
                            None => println!("No slot #{id} on {day}."),
                        }
                    }
                    _ => println!("Usage: remove <Day> <id>"),
                }
            }
            "options" => {
                let granularity = match parts.next() {
                    Some(s) => match s.parse::<u16>() {
                        Ok(g) if (1..=1440).contains(&g) => g,
                        _ => {
                            println!("Invalid granularity (1-1440 minutes)");
                            continue;
                        }
                    },
                    None => config.slot_granularity_minutes,
                };
                for time in generate_time_options(granularity) {
                    println!("  {}  {}", time, time.to_display_string());
                }
            }
            "ends" => {
                let start = match parts.next().map(str::parse::<TimeOfDay>) {
                    Some(Ok(start)) => start,
                    Some(Err(e)) => {
                        println!("{}", e);
                        continue;
                    }
                    None => {
                        println!("Usage: ends <HH:MM>");
                        continue;
                    }
                };
                let options = generate_time_options(config.slot_granularity_minutes);
                for time in end_time_options(&options, start) {
                    println!("  {}  {}", time, time.to_display_string());
                }
            }
            "bookable" => {
                let Some(date) = date_arg(parts.next(), "Usage: bookable <YYYY-MM-DD>") else {
                    continue;
                };
                let starts = calendar(&scheduler, &config)
                    .appointment_starts(date, config.appointment_minutes);
                let weekday = Weekday::from(date.weekday());
                if starts.is_empty() {
                    println!("No bookable times on {date} ({weekday}).");
                } else {
                    let times = starts
                        .iter()
                        .filter_map(|dt| TimeOfDay::try_from(dt.time()).ok())
                        .map(|t| t.to_display_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("{date} ({weekday}): {times}");
                }
            }
            "next" => {
                let Some(date) = date_arg(parts.next(), "Usage: next <YYYY-MM-DD>") else {
                    continue;
                };
                match calendar(&scheduler, &config).next_bookable(date) {
                    Some(next) => println!(
                        "Next bookable date after {date}: {next} ({})",
                        Weekday::from(next.weekday())
                    ),
                    None => println!("No bookable date within a year of {date}."),
                }
            }
            "block" => {
                let Some(date) = date_arg(parts.next(), "Usage: block <YYYY-MM-DD>") else {
                    continue;
                };
                if !config.blocked_dates.contains(&date) {
                    config.blocked_dates.push(date);
                    config.blocked_dates.sort();
                }
                println!("Blocked {date}.");
            }
            "config" => match (parts.next(), parts.next()) {
                (Some("load"), Some(path)) => match AvailabilityConfig::from_json_file(path) {
                    Ok(loaded) => {
                        config = loaded;
                        println!("Config loaded from {}.", path);
                    }
                    Err(e) => println!("Error loading config: {}", e),
                },
                _ => println!("Usage: config load <json_path>"),
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                let snapshot = scheduler.snapshot();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match save_schedule_to_json(&snapshot, path) {
                        Ok(_) => println!("Schedule saved to {}.", path),
                        Err(e) => println!("Error saving schedule: {}", e),
                    },
                    (Some("csv"), Some(path)) => match save_schedule_to_csv(&snapshot, path) {
                        Ok(_) => println!("Schedule saved to {}.", path),
                        Err(e) => println!("Error saving schedule: {}", e),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                let loaded = match (fmt, path) {
                    (Some("json"), Some(path)) => load_schedule_from_json(path),
                    (Some("csv"), Some(path)) => load_schedule_from_csv(path),
                    _ => {
                        println!("Usage: load <json|csv> <path>");
                        continue;
                    }
                };
                match loaded {
                    Ok(week) => {
                        scheduler = WeeklyAvailabilityScheduler::from_snapshot(week);
                        println!("Schedule loaded from {}.", path.unwrap_or_default());
                        println!("{}", render_week_table(scheduler.week()));
                    }
                    Err(e) => println!("Error loading schedule: {}", e),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
