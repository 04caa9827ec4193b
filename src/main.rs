//! Ring Career - Headless Runner
//!
//! Plays a seeded career month by month: amateur bouts, the pro switch,
//! generated opponents at a fixed cadence, and the world ticking around the
//! player until retirement or the month limit. Prints a JSON or text summary.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ring_career::career::{ActivityStatus, Career, FightRecord, FightRequest, NewBoxer, P4PEntry, Stats};
use ring_career::core::{load_rules, CareerError, Result, RulesConfig};
use ring_career::world::WorldEvent;

/// Headless career runner
#[derive(Parser, Debug)]
#[command(name = "ring-career")]
#[command(about = "Run a seeded boxing career and print a summary")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Months to simulate
    #[arg(long, default_value_t = 240)]
    months: u32,

    /// Book a bout every N months
    #[arg(long, default_value_t = 5)]
    fight_every: u32,

    /// Amateur bouts before turning pro, on top of the rules' readiness gate
    #[arg(long, default_value_t = 6)]
    amateur_bouts: u32,

    /// Rules file (TOML); built-in defaults when omitted
    #[arg(long)]
    rules: Option<PathBuf>,

    #[arg(long, default_value = "Rookie Vale")]
    name: String,

    #[arg(long, default_value = "lightweight")]
    division: String,

    #[arg(long, default_value_t = 19)]
    age: u32,

    /// Starting level for every stat
    #[arg(long, default_value_t = 58)]
    stat_level: i32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// News items to include in the summary
    #[arg(long, default_value_t = 10)]
    news: usize,
}

#[derive(Serialize)]
struct CareerSummary<'a> {
    seed: u64,
    months: u32,
    name: String,
    age: u32,
    division: String,
    retired: bool,
    amateur_record: FightRecord,
    pro_record: FightRecord,
    belts: Vec<(String, String)>,
    lineal_champion: bool,
    best_rank: Option<usize>,
    p4p: Vec<P4PEntry>,
    news: Vec<&'a WorldEvent>,
}

fn run(args: &Args, seed: u64) -> Result<Career> {
    let config = match &args.rules {
        Some(path) => load_rules(path)?,
        None => RulesConfig::default(),
    };
    let (min_lbs, max_lbs) = config
        .weight_classes
        .get(config.division_index(&args.division)?)
        .map(|c| (c.min_lbs, c.max_lbs))
        .ok_or_else(|| CareerError::UnknownDivision(args.division.clone()))?;

    let mut career = Career::new(
        config,
        seed,
        NewBoxer {
            name: args.name.clone(),
            age: args.age,
            height_inches: 69,
            weight_lbs: (min_lbs + max_lbs) / 2,
            division: args.division.clone(),
            stats: Stats::uniform(args.stat_level),
        },
    )?;

    let cadence = args.fight_every.max(1);
    for month in 0..args.months {
        if career.state().is_retired() {
            break;
        }
        if month % cadence == 0 {
            let player = career.player()?;
            if !player.is_pro() && player.amateur_record.total() >= args.amateur_bouts
                && career.pro_readiness()?.is_ready()
            {
                career.turn_pro()?;
            }
            let kind = career.player()?.stage;
            let opponent = career.generate_opponent()?;
            let player_id = career.state().player;
            career.schedule_fight(FightRequest::new(player_id, opponent, kind))?;
        }
        career.advance_month()?;
    }
    Ok(career)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ring_career=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, months = args.months, "ring career starting");

    let career = run(&args, seed)?;
    let state = career.state();
    let player = career.player()?;

    let summary = CareerSummary {
        seed,
        months: state.calendar.career_months(),
        name: player.name.clone(),
        age: player.age,
        division: player.division.clone(),
        retired: matches!(player.status, ActivityStatus::Retired { .. }),
        amateur_record: player.amateur_record,
        pro_record: player.pro_record,
        belts: state.ledger.belts_held(player.id),
        lineal_champion: state.ledger.is_lineal_holder(player.id),
        best_rank: state.ledger.best_rank(&player.division, player.id),
        p4p: career.p4p_snapshot(10)?,
        news: career.news(args.news),
    };

    if args.format == "text" {
        println!("=== RING CAREER (seed {}) ===", summary.seed);
        println!("{} ({}), {} after {} months", summary.name, summary.age, summary.division, summary.months);
        println!("Amateur: {}  Pro: {}", summary.amateur_record, summary.pro_record);
        println!(
            "Status: {}",
            if summary.retired { "retired" } else { "active" }
        );
        for (org, division) in &summary.belts {
            println!("Champion: {} {}", org, division);
        }
        if summary.lineal_champion {
            println!("Lineal champion");
        }
        if let Some(rank) = summary.best_rank {
            println!("Best rank: #{}", rank);
        }
        println!("\n--- P4P ---");
        for entry in &summary.p4p {
            println!(
                "{:>3}. {:<20} {:<14} {:>7.2} {}",
                entry.rank,
                entry.name,
                entry.division,
                entry.score,
                if entry.is_player { "<- you" } else { "" }
            );
        }
        println!("\n--- News ---");
        for event in &summary.news {
            println!("[month {}] {:?}", event.career_month, event.kind);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
