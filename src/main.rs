// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::io;

use bday_tracker::{
    load_store, local_today, print_all, print_json, print_todays, print_upcoming, BirthdayStore,
    Config, Menu,
};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env();
    let args: Vec<String> = env::args().skip(1).collect();
    log::debug!("Using birthday file {}", config.file.display());

    // Only the data commands touch the birthday file
    let path = config.file.clone();
    let load = || load_store(&path);

    match args.first().map(String::as_str) {
        None | Some("menu") => run_menu(load()?, config)?,
        Some("today") => print_todays(&mut io::stdout(), &load()?, local_today())?,
        Some("upcoming") => {
            let days = match args.get(1) {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("Invalid number of days: {}", raw))?,
                None => config.upcoming_days,
            };
            print_upcoming(&mut io::stdout(), &load()?, local_today(), days)?;
        }
        Some("list") if args.iter().any(|a| a == "--json") => {
            print_json(&mut io::stdout(), &load()?)?
        }
        Some("list") => print_all(&mut io::stdout(), &load()?)?,
        Some("tui") => run_ui_mode(&load()?, &config)?,
        Some("help") | Some("--help") | Some("-h") => print_usage(),
        Some(other) => {
            eprintln!("❌ Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_menu(store: BirthdayStore, config: Config) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    Menu::new(store, config).run(&mut input, &mut out)
}

fn print_usage() {
    println!("bday {} - birthday tracker", bday_tracker::VERSION);
    println!();
    println!("Usage:");
    println!("  bday                 interactive menu");
    println!("  bday today           today's birthdays");
    println!("  bday upcoming [DAYS] birthdays in the next DAYS days");
    println!("  bday list [--json]   all birthdays");
    println!("  bday tui             terminal viewer");
    println!();
    println!("Environment: BDAY_FILE (default bdays.csv), BDAY_UPCOMING_DAYS (default 30)");
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: &BirthdayStore, config: &Config) -> Result<()> {
    let mut app = ui::App::new(store, local_today(), config.upcoming_days);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: &BirthdayStore, _config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
