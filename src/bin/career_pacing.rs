//! Career Pacing Tool
//!
//! Simulates many seeded careers under a simple rest/fight booking policy and
//! reports pro bouts per year against the real-world active-pro band.

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ring_career::career::{Career, FightRequest, NewBoxer, Stats};
use ring_career::core::{load_rules, Result, RulesConfig};

/// Broad active-pro cadence from published cohorts
const REAL_WORLD_BOUTS_PER_YEAR_MIN: f64 = 1.7;
const REAL_WORLD_BOUTS_PER_YEAR_MAX: f64 = 2.7;

#[derive(Parser, Debug)]
#[command(name = "career_pacing")]
#[command(about = "Measure pro fight cadence across many seeded careers")]
struct Args {
    /// Number of careers to simulate
    #[arg(long, default_value_t = 200)]
    careers: u64,

    /// First seed; career i uses seed + i
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Stop a career at this age if it has not ended
    #[arg(long, default_value_t = 36)]
    stop_age: u32,

    /// Amateur bouts before turning pro, on top of the rules' readiness gate
    #[arg(long, default_value_t = 8)]
    amateur_bouts: u32,

    /// Minimum months between pro bouts
    #[arg(long, default_value_t = 3)]
    min_gap: u32,

    /// Rest instead of fighting at or above this fatigue
    #[arg(long, default_value_t = 7)]
    rest_fatigue: u32,

    /// Rest instead of fighting at or above this injury risk
    #[arg(long, default_value_t = 34)]
    rest_injury: u32,

    /// Rules file (TOML); built-in defaults when omitted
    #[arg(long)]
    rules: Option<std::path::PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Debug, Clone, Serialize)]
struct CareerSample {
    seed: u64,
    turn_pro_age: Option<u32>,
    amateur_fights: u32,
    pro_fights: u32,
    pro_fights_per_year: f64,
    pro_win_pct: f64,
    retired_at: Option<u32>,
}

#[derive(Debug, Serialize)]
struct PacingReport {
    careers: usize,
    mean_bouts_per_year: f64,
    median_bouts_per_year: f64,
    in_band_pct: f64,
    mean_pro_win_pct: f64,
    retired_pct: f64,
    band: (f64, f64),
}

fn simulate_career(config: &RulesConfig, args: &Args, seed: u64) -> Result<CareerSample> {
    let mut career = Career::new(
        config.clone(),
        seed,
        NewBoxer {
            name: format!("Sim {}", seed),
            age: 18,
            height_inches: 70,
            weight_lbs: 145,
            division: "welterweight".into(),
            stats: Stats::uniform(56),
        },
    )?;

    let mut turn_pro_age = None;
    let mut pro_months = 0u32;
    loop {
        let player = career.player()?;
        if !player.is_active() || player.age >= args.stop_age {
            break;
        }
        let player_id = player.id;

        if !player.is_pro() && player.amateur_record.total() >= args.amateur_bouts && career.pro_readiness()?.is_ready()
        {
            career.turn_pro()?;
            turn_pro_age = Some(career.player()?.age);
            continue;
        }

        let player = career.player()?;
        let rested = player.fatigue < args.rest_fatigue && player.injury_risk < args.rest_injury;
        let gap_ok = !player.is_pro() || career.state().idle_months() >= args.min_gap;
        if rested && gap_ok {
            let kind = player.stage;
            let opponent = career.generate_opponent()?;
            career.schedule_fight(FightRequest::new(player_id, opponent, kind))?;
        }
        if career.player()?.is_pro() {
            pro_months += 1;
        }
        career.advance_month()?;
    }

    let player = career.player()?;
    let pro = player.pro_record;
    let years = (pro_months as f64 / 12.0).max(1.0);
    Ok(CareerSample {
        seed,
        turn_pro_age,
        amateur_fights: player.amateur_record.total(),
        pro_fights: pro.total(),
        pro_fights_per_year: pro.total() as f64 / years,
        pro_win_pct: pro.win_rate() * 100.0,
        retired_at: career.state().retirement.as_ref().map(|r| r.age),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ring_career=warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.rules {
        Some(path) => load_rules(path)?,
        None => RulesConfig::default(),
    };

    let mut samples = Vec::with_capacity(args.careers as usize);
    for i in 0..args.careers {
        samples.push(simulate_career(&config, &args, args.seed + i)?);
    }

    let pro: Vec<&CareerSample> = samples.iter().filter(|s| s.turn_pro_age.is_some()).collect();
    let cadence: Vec<f64> = pro.iter().map(|s| s.pro_fights_per_year).collect();
    let in_band = cadence
        .iter()
        .filter(|c| (REAL_WORLD_BOUTS_PER_YEAR_MIN..=REAL_WORLD_BOUTS_PER_YEAR_MAX).contains(*c))
        .count();
    let pct = |count: usize, total: usize| if total == 0 { 0.0 } else { count as f64 * 100.0 / total as f64 };

    let report = PacingReport {
        careers: samples.len(),
        mean_bouts_per_year: mean(&cadence),
        median_bouts_per_year: median(&cadence),
        in_band_pct: pct(in_band, cadence.len()),
        mean_pro_win_pct: mean(&pro.iter().map(|s| s.pro_win_pct).collect::<Vec<_>>()),
        retired_pct: pct(samples.iter().filter(|s| s.retired_at.is_some()).count(), samples.len()),
        band: (REAL_WORLD_BOUTS_PER_YEAR_MIN, REAL_WORLD_BOUTS_PER_YEAR_MAX),
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Career pacing over {} careers (seeds {}..{})", report.careers, args.seed, args.seed + args.careers);
    println!("======================================");
    println!("Pro bouts/year: mean {:.2}, median {:.2}", report.mean_bouts_per_year, report.median_bouts_per_year);
    println!(
        "Inside real-world band {:.1}-{:.1}: {:.1}%",
        REAL_WORLD_BOUTS_PER_YEAR_MIN, REAL_WORLD_BOUTS_PER_YEAR_MAX, report.in_band_pct
    );
    println!("Mean pro win rate: {:.1}%", report.mean_pro_win_pct);
    println!("Retired before stop age: {:.1}%", report.retired_pct);
    Ok(())
}
