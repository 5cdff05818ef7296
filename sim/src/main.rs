//! Headless batch simulator for balance exploration.
//!
//! Runs many seeded battles between two rosters, tallies the results, and
//! replays the outcomes through the rating engine to show how the two teams'
//! ratings would drift over the series. With `--opponents` it instead ranks
//! a candidate pool by rating distance, the same search the matchmaking
//! endpoint runs.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use cardclash_core::{
    casualties_from_log, find_best_matches, resolve_battle, update_ratings, win_probability,
    Rated, RatingRecord, Team, UnitSpec,
};

#[derive(Parser, Debug)]
#[command(name = "cardclash-sim", about = "Seeded battle batches and rating projections")]
struct Args {
    /// Number of battles to simulate
    #[arg(short = 'n', long, default_value_t = 1000)]
    battles: u64,

    /// Base seed; battle i runs with seed (base + i)
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON file with side A's roster (array of unit specs)
    #[arg(long)]
    roster_a: Option<PathBuf>,

    /// JSON file with side B's roster
    #[arg(long)]
    roster_b: Option<PathBuf>,

    /// Starting rating for side A
    #[arg(long, default_value_t = 1000)]
    rating_a: i32,

    /// Starting rating for side B
    #[arg(long, default_value_t = 1000)]
    rating_b: i32,

    /// JSON file with a candidate pool; rank it by rating distance from
    /// --rating-a and exit without simulating
    #[arg(long)]
    opponents: Option<PathBuf>,

    /// Number of matchmaking candidates to print
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

/// One row of a matchmaking candidate file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    name: String,
    #[serde(flatten)]
    record: RatingRecord,
}

impl Rated for Candidate {
    fn rating(&self) -> Option<i32> {
        self.record.rating
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReport {
    battles: u64,
    wins_a: u64,
    wins_b: u64,
    win_rate_a: f64,
    avg_rounds: f64,
    avg_casualties_a: f64,
    avg_casualties_b: f64,
    start_win_probability_a: u32,
    final_rating_a: i32,
    final_rating_b: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchReport {
    self_rating: i32,
    matches: Vec<Candidate>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.opponents {
        let report = rank_opponents(args.rating_a, path, args.limit)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let roster_a = load_roster(args.roster_a.as_deref(), demo_roster_a)?;
    let roster_b = load_roster(args.roster_b.as_deref(), demo_roster_b)?;
    log::info!(
        "simulating {} battles, {} units vs {}",
        args.battles,
        roster_a.len(),
        roster_b.len()
    );

    let report = run_batch(&args, &roster_a, &roster_b)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn rank_opponents(self_rating: i32, path: &std::path::Path, limit: usize) -> Result<MatchReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading candidate pool {}", path.display()))?;
    let pool: Vec<Candidate> = serde_json::from_str(&raw).context("parsing candidate pool")?;

    let matches = find_best_matches(self_rating, &pool, limit)
        .into_iter()
        .cloned()
        .collect();
    Ok(MatchReport {
        self_rating,
        matches,
    })
}

fn run_batch(args: &Args, roster_a: &[UnitSpec], roster_b: &[UnitSpec]) -> Result<BatchReport> {
    // Battles are independent given their seeds, so the batch parallelizes
    // with no coordination.
    let outcomes: Vec<(Team, u32, usize, usize)> = (0..args.battles)
        .into_par_iter()
        .map(|i| {
            let record = resolve_battle(roster_a, roster_b, args.seed.wrapping_add(i))?;
            Ok((
                record.winner,
                record.rounds_played,
                casualties_from_log(&record.log, Team::A),
                casualties_from_log(&record.log, Team::B),
            ))
        })
        .collect::<Result<_, cardclash_core::EngineError>>()?;

    let wins_a = outcomes.iter().filter(|(w, ..)| *w == Team::A).count() as u64;
    let wins_b = args.battles - wins_a;
    let total = outcomes.len() as f64;
    let avg_rounds = outcomes.iter().map(|(_, r, ..)| f64::from(*r)).sum::<f64>() / total;
    let avg_casualties_a =
        outcomes.iter().map(|(_, _, c, _)| *c as f64).sum::<f64>() / total;
    let avg_casualties_b =
        outcomes.iter().map(|(_, _, _, c)| *c as f64).sum::<f64>() / total;

    // Rating drift: replay the series in order, feeding each outcome back in.
    let mut team_a = RatingRecord {
        rating: Some(args.rating_a),
        ..RatingRecord::default()
    };
    let mut team_b = RatingRecord {
        rating: Some(args.rating_b),
        ..RatingRecord::default()
    };
    for (winner, ..) in &outcomes {
        let update = update_ratings(&team_a, &team_b, *winner);
        team_a.rating = Some(update.team_a.new_rating);
        team_b.rating = Some(update.team_b.new_rating);
        match winner {
            Team::A => {
                team_a.wins += 1;
                team_b.losses += 1;
            }
            Team::B => {
                team_b.wins += 1;
                team_a.losses += 1;
            }
        }
    }

    Ok(BatchReport {
        battles: args.battles,
        wins_a,
        wins_b,
        win_rate_a: wins_a as f64 / total,
        avg_rounds,
        avg_casualties_a,
        avg_casualties_b,
        start_win_probability_a: win_probability(args.rating_a, args.rating_b),
        final_rating_a: team_a.effective_rating(),
        final_rating_b: team_b.effective_rating(),
    })
}

fn load_roster(
    path: Option<&std::path::Path>,
    fallback: fn() -> Vec<UnitSpec>,
) -> Result<Vec<UnitSpec>> {
    match path {
        Some(p) => {
            let raw = fs::read_to_string(p)
                .with_context(|| format!("reading roster {}", p.display()))?;
            let roster: Vec<UnitSpec> =
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", p.display()))?;
            anyhow::ensure!(!roster.is_empty(), "roster {} is empty", p.display());
            Ok(roster)
        }
        None => Ok(fallback()),
    }
}

fn demo_roster_a() -> Vec<UnitSpec> {
    vec![
        UnitSpec::new("Ember Drake").with_stats(7, 14, 6),
        UnitSpec::new("Stone Sentinel").with_stats(3, 22, 2),
        UnitSpec::new("Tide Caller").with_stats(5, 12, 8),
    ]
}

fn demo_roster_b() -> Vec<UnitSpec> {
    vec![
        UnitSpec::new("Gloom Stalker").with_stats(8, 10, 9),
        UnitSpec::new("Iron Husk").with_stats(2, 26, 1),
        UnitSpec::new("Spark Adept").with_stats(6, 11, 5),
    ]
}
