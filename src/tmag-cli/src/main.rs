//! tmag CLI - Toastmasters Agenda Generator
//!
//! Randomly assigns club members to meeting roles, avoiding roles they
//! held in recent meetings.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tmag_core::{
    Agenda, AgendaError, AssignmentEngine, Config, Generation, RandomShuffler, RoleName,
    Schedule, default_config, role, telemetry,
};
use tracing::{Level, info};

const DEFAULT_CONFIG_FILE: &str = "tmag.toml";

#[derive(Parser)]
#[command(
    name = "tmag",
    version,
    about = "tmag is a toastmasters agenda generator",
    long_about = "An agenda generator intended for use with Toastmasters. Assigns members to roles at random, avoiding roles they held in recent meetings."
)]
struct Cli {
    /// Config file (default is tmag.toml, built-in defaults if absent)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single agenda, one member per role
    Generate {
        /// Members to assign (specify once per member, overrides config)
        #[arg(short, long, action = ArgAction::Append, value_name = "MEMBER")]
        member: Vec<String>,

        /// File to write the agenda to
        #[arg(short, long, default_value = "agenda.yaml", value_name = "FILE")]
        output: PathBuf,

        /// Seed for a reproducible assignment
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Add an agenda to a schedule, avoiding recent repeats
    Schedule {
        /// Schedule file, most recent agenda first
        #[arg(long, default_value = "schedule.yaml", value_name = "FILE")]
        schedule_file: PathBuf,

        /// Number of past agendas to compare against
        #[arg(short, long, value_name = "N")]
        window: Option<usize>,

        /// Attempts before giving up
        #[arg(long, value_name = "N")]
        max_attempts: Option<usize>,

        /// Accept an agenda with repeats if no unique one is found
        #[arg(long)]
        accept_repeats: bool,

        /// Seed for a reproducible assignment
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Print the new agenda without saving the schedule
        #[arg(long)]
        dry_run: bool,
    },

    /// List supported roles
    Roles,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    telemetry::init_tracing(cli.json_logs, level);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::Roles = cli.command {
        print_roles();
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;
    config.apply_env()?;

    match cli.command {
        Command::Generate {
            member,
            output,
            seed,
            format,
        } => cmd_generate(&config, member, &output, seed, format),
        Command::Schedule {
            schedule_file,
            window,
            max_attempts,
            accept_repeats,
            seed,
            dry_run,
        } => {
            if let Some(window) = window {
                config.schedule.window_size = window;
            }
            if let Some(max_attempts) = max_attempts {
                config.schedule.max_attempts = max_attempts;
            }
            config.schedule.accept_repeats |= accept_repeats;
            cmd_schedule(&config, &schedule_file, seed, dry_run)
        }
        Command::Roles => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, AgendaError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "using config file");
            Config::load(path)
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            info!(path = DEFAULT_CONFIG_FILE, "using config file");
            Config::load(DEFAULT_CONFIG_FILE)
        }
        None => {
            info!("no config file found, using built-in defaults");
            Ok(default_config())
        }
    }
}

fn engine_for(config: &Config, seed: Option<u64>) -> AssignmentEngine {
    let shuffler = match seed {
        Some(seed) => RandomShuffler::seeded(seed),
        None => RandomShuffler::from_entropy(),
    };
    AssignmentEngine::new(config.engine_config(), shuffler)
}

fn cmd_generate(
    config: &Config,
    members: Vec<String>,
    output: &Path,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let roles = config.resolved_roles()?;
    let members = if members.is_empty() {
        config.members.clone()
    } else {
        members
    };

    let generation = engine_for(config, seed).generate_exact(&roles, &members)?;

    let out = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&generation.agenda)?,
        OutputFormat::Json => serde_json::to_string_pretty(&generation.agenda)?,
    };
    std::fs::write(output, &out)?;

    print_agenda("New Agenda", &generation.agenda);
    println!(
        "{} {}",
        "Written to".dimmed(),
        output.display().to_string().bright_white()
    );
    Ok(())
}

fn cmd_schedule(
    config: &Config,
    schedule_file: &Path,
    seed: Option<u64>,
    dry_run: bool,
) -> Result<(), Box<dyn Error>> {
    let roles = config.resolved_roles()?;
    let mut schedule = Schedule::load(schedule_file)?;
    let mut engine = engine_for(config, seed);

    let Generation {
        agenda,
        attempts,
        relaxed,
    } = engine.generate(&roles, &config.members, schedule.history())?;

    print_agenda("New Agenda", &agenda);
    println!(
        "{}",
        format!("Generated after {} attempt(s).", attempts).bright_green()
    );

    if relaxed {
        let conflicts = engine.conflicts(&agenda, schedule.history());
        print_repeat_warning(&conflicts, engine.config().window_size);
    }

    if dry_run {
        println!("{}", "Dry run: schedule not saved.".dimmed());
        return Ok(());
    }

    schedule.prepend(agenda);
    schedule.save(schedule_file)?;
    println!(
        "{} {} ({} agenda(s))",
        "Schedule saved to".dimmed(),
        schedule_file.display().to_string().bright_white(),
        schedule.len()
    );
    Ok(())
}

fn print_agenda(title: &str, agenda: &Agenda) {
    println!();
    println!("{}", "═".repeat(50).bright_blue());
    println!("{}", format!("  {}", title).bright_blue().bold());
    println!("{}", "═".repeat(50).bright_blue());
    for (role, member) in agenda.iter() {
        let label = role::label(role).unwrap_or(role.as_str());
        println!("  {:<20} {}", label.bold(), member.bright_cyan());
    }
    println!("{}", "─".repeat(50).dimmed());
}

fn print_repeat_warning(conflicts: &[(RoleName, String)], window: usize) {
    eprintln!(
        "{}",
        "Warning: no agenda without recent repeats was found; accepting one with repeats."
            .yellow()
    );
    for (role, member) in conflicts {
        let label = role::label(role).unwrap_or(role.as_str());
        eprintln!(
            "  {} {} repeats {} within the last {} meeting(s)",
            "•".yellow(),
            member.bright_cyan(),
            label.bold(),
            window
        );
    }
}

fn print_roles() {
    println!("{}", "Supported roles:".bold());
    for spec in role::supported_roles() {
        let multi = if role::is_multi_slot_category(&role::normalize(spec.id)) {
            " (shares history across speaker slots)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}{}", spec.label.bright_cyan(), multi);
    }
    println!();
    println!(
        "{} {}",
        "Also accepted:".bold(),
        "speaker (speaker 1), evaluator (evaluator 1)".dimmed()
    );
    println!(
        "{}",
        "Case and spacing are ignored, e.g. \"Speaker 1\" = \"speaker1\".".dimmed()
    );
}
