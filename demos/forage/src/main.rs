//! forage: headless run of the rust_forage multi-agent simulation.
//!
//! Builds an N×N grid with random bombs, rocks and food, lets autonomous
//! agents race for the food on their own threads, and prints the final
//! board and per-agent statistics.  Defaults reproduce the classic console
//! run: 4×4, one bomb, two rocks, three robots `R1..R3`.
//!
//! ```text
//! RUST_LOG=debug cargo run -p forage -- --size 6 --agents 4 --seed 42
//! cargo run -p forage -- --scenario scenario.json --output ./out
//! ```

mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use fg_behavior::RandomNoRepeat;
use fg_core::Position;
use fg_grid::{CellView, GridSnapshot, Obstacle};
use fg_output::{CsvWriter, StatsObserver};
use fg_sim::{NoopObserver, SimBuilder, SimReport};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use scenario::{Args, Scenario};

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Three-character cells: ` F ` food, ` B `/` R ` obstacles, agent tags.
fn render(snap: &GridSnapshot) -> String {
    let mut out = String::new();
    for row in 0..snap.size {
        for col in 0..snap.size {
            let cell = match snap.cell(Position::new(row, col)) {
                CellView::Empty => " . ".to_owned(),
                CellView::Food => " F ".to_owned(),
                CellView::Obstacle(o) => format!(" {} ", o.label()),
                CellView::Agent(id) => {
                    let tag = snap.agent(id).map_or("?", |a| a.tag.as_str());
                    format!("{:^3.3}", tag)
                }
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out
}

fn print_report(report: &SimReport) {
    println!("Outcome: {}", report.outcome);
    if let Some(winner) = report.winner() {
        println!("Winner:  {}", winner.tag);
    }
    println!("Elapsed: {:.2?}  |  Seed: {}", report.elapsed, report.seed);
    println!();
    for agent in &report.agents {
        let reason = report
            .exit_reason(agent.id)
            .map_or_else(String::new, |r| format!("  [{r}]"));
        println!("{agent}{reason}");
    }
    if !report.unjoined.is_empty() {
        println!("{} agent thread(s) did not exit in time", report.unjoined.len());
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let args = Args::parse();
    let scenario = Scenario::resolve(&args)?;

    let sim = SimBuilder::new(scenario.sim.clone(), RandomNoRepeat)
        .random_obstacles(Obstacle::Bomb, scenario.bombs)
        .random_obstacles(Obstacle::Rock, scenario.rocks)
        .random_agents(scenario.agents)
        .build()
        .context("building simulation")?;

    let handle = sim.handle();
    let start = handle.snapshot();
    println!("=== forage ===");
    println!(
        "Grid: {0}×{0}  |  Agents: {1}  |  Bombs: {2}  |  Rocks: {3}  |  Seed: {4}\n",
        start.size, scenario.agents, scenario.bombs, scenario.rocks, sim.seed
    );
    println!("{}", render(&start));

    let report = match &args.output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            let mut obs = StatsObserver::new(CsvWriter::new(dir)?);
            let report = sim.run(&mut obs)?;
            if let Some(e) = obs.take_error() {
                warn!(%e, "output incomplete");
            }
            report
        }
        None => sim.run(&mut NoopObserver)?,
    };

    println!("{}", render(&handle.snapshot()));
    print_report(&report);
    Ok(())
}
