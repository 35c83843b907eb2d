use std::io::{self, BufRead};

use match_state::{Event, MatchStats, MatchTimeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replays newline-delimited JSON events from stdin and prints the final record.
///
/// ```text
/// echo '{"kind":"goal","side":"home","time":10}' | cargo run --example replay -- Arsenal Chelsea
/// ```
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let home = args.next().unwrap_or_else(|| "Home".to_string());
    let away = args.next().unwrap_or_else(|| "Away".to_string());

    let mut events = vec![];
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str::<Event>(&line)?);
    }
    info!("Read {} events", events.len());

    let mut timeline = MatchTimeline::new(home, away);
    timeline.simulate(events)?;

    let stats: &MatchStats = timeline.latest();
    info!(
        "Final score {} {} - {} {}",
        stats.home_team_stats.team_name,
        stats.home_team_stats.goal_count,
        stats.away_team_stats.goal_count,
        stats.away_team_stats.team_name
    );
    serde_json::to_writer_pretty(io::stdout(), &stats.to_record())?;
    println!();
    Ok(())
}
