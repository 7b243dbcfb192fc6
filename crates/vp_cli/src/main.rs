//! valopick CLI
//!
//! 에이전트 스쿼드 랜덤 뽑기 + 리빌 애니메이션
//! 픽 기록 / 통계 조회

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;
use vp_cli::{exclusions_from_names, render, run_until_idle, Outcome, Session, SessionCommand};
use vp_client::{ClientConfig, PickClient, RosterProvider};
use vp_core::{
    CompletedRun, ExclusionSet, HistoryPager, RecapSortField, RevealEvent, RevealSequencer, RevealTiming, Role,
    Roster, SelectionMode, WeaponCategory, WeaponPicker,
};

#[derive(Parser)]
#[command(name = "valopick")]
#[command(about = "Roll random agent squads and browse pick history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll one squad and watch the reveal
    Roll {
        /// Selection mode: full or balance
        #[arg(long, default_value = "full")]
        mode: SelectionMode,

        /// Squad size (1-5)
        #[arg(long, default_value_t = 5)]
        players: usize,

        /// Ban an agent by name (repeatable)
        #[arg(long)]
        ban: Vec<String>,

        /// Ban every agent of a role (repeatable)
        #[arg(long)]
        ban_role: Vec<Role>,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the shuffle animation
        #[arg(long, default_value = "false")]
        instant: bool,

        /// Do not send the result to the pick server
        #[arg(long, default_value = "false")]
        no_log: bool,
    },

    /// Interactive session: lock, reroll, pick and ban between rolls
    Session {
        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Do not send results to the pick server
        #[arg(long, default_value = "false")]
        no_log: bool,
    },

    /// Pick a random weapon
    Weapon {
        /// Restrict to a category (repeatable); all categories by default
        #[arg(long = "category")]
        categories: Vec<WeaponCategory>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show logged picks, newest first
    History {
        #[arg(long, default_value_t = vp_core::HISTORY_PAGE_SIZE)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Walk every page
        #[arg(long, default_value = "false")]
        all: bool,
    },

    /// Per-agent pick counts
    Recap {
        /// Sort column: count, name or role
        #[arg(long, default_value = "count")]
        sort: RecapSortField,

        /// Ascending order
        #[arg(long, default_value = "false")]
        asc: bool,
    },

    /// Delete a logged pick by id
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    match cli.command {
        Commands::Roll { mode, players, ban, ban_role, seed, instant, no_log } => {
            let roster = RosterProvider::from_config(&config).fetch_roster().await;
            let (excluded, unknown) = exclusions_from_names(&roster, &ban, &ban_role);
            for name in unknown {
                tracing::warn!(name = %name, "unknown agent in --ban, ignored");
            }

            let timing = if instant { RevealTiming::instant() } else { RevealTiming::from_env()? };
            let mut seq = sequencer(roster, timing, seed);
            seq.set_mode(mode);
            seq.set_player_count(players)?;

            let origin = Instant::now();
            match seq.start(origin.elapsed(), &excluded) {
                Ok(_) => {}
                Err(error) if error.is_user_fixable() => {
                    bail!("{} (drop some --ban/--ban-role flags or lower --players)", error)
                }
                Err(error) => return Err(error.into()),
            }
            let completed = run_until_idle(&mut seq, origin, print_frame).await;
            println!();

            let Some(run) = completed else {
                bail!("reveal ended without a result");
            };
            print_summary(&run);
            if !no_log {
                if let Err(error) = spawn_log(&PickClient::from_config(&config), run).await {
                    tracing::warn!(error = %error, "pick logging task failed");
                }
            }
        }

        Commands::Session { seed, no_log } => {
            run_session(&config, seed, no_log).await?;
        }

        Commands::Weapon { categories, seed } => {
            let weapons = RosterProvider::from_config(&config).fetch_weapons().await;
            if weapons.is_empty() {
                bail!("no weapons available from {}", config.game_api_base);
            }

            let picker = if categories.is_empty() {
                WeaponPicker::default()
            } else {
                WeaponPicker::with_categories(categories)
            };
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };

            match picker.pick(&weapons, &mut rng) {
                Some(weapon) => {
                    let category = weapon.weapon_category().map(|c| c.label()).unwrap_or("?");
                    println!("🎯 {} ({})", weapon.display_name, category);
                }
                None => println!("no weapon matches the selected categories"),
            }
        }

        Commands::History { limit, offset, all } => {
            let picks = PickClient::from_config(&config);
            if all {
                let mut pager = HistoryPager::with_page_size(limit.max(1));
                while pager.has_more() {
                    let page = picks.try_get_history(pager.page_size(), pager.next_offset()).await?;
                    pager.push_page(page);
                }
                println!("{}", render::history_table(pager.entries()));
                println!("{} picks", pager.entries().len());
            } else {
                let page = picks.try_get_history(limit, offset).await?;
                println!("{}", render::history_table(&page));
            }
        }

        Commands::Recap { sort, asc } => {
            let mut rows = PickClient::from_config(&config).try_get_recap().await?;
            vp_core::sort_recap(&mut rows, sort, !asc);
            println!("{}", render::recap_table(&rows));
        }

        Commands::Delete { id } => {
            PickClient::from_config(&config).try_delete_pick(&id).await?;
            println!("✅ Deleted {}", id);
        }
    }

    Ok(())
}

fn sequencer(roster: Roster, timing: RevealTiming, seed: Option<u64>) -> RevealSequencer<ChaCha8Rng> {
    match seed {
        Some(seed) => RevealSequencer::seeded(roster, timing, seed),
        None => RevealSequencer::from_entropy(roster, timing),
    }
}

fn print_frame(seq: &RevealSequencer<ChaCha8Rng>, event: &RevealEvent) {
    match event {
        RevealEvent::ShuffleFrame
        | RevealEvent::SlotCommitted { .. }
        | RevealEvent::RerollFrame { .. }
        | RevealEvent::SlotRerolled { .. } => {
            print!("\r\x1b[K{}", render::squad_line(seq.slots()));
            let _ = std::io::stdout().flush();
        }
        RevealEvent::RevealStarted | RevealEvent::Completed(_) => {}
    }
}

fn print_summary(run: &CompletedRun) {
    let names = run.agents.iter().map(|a| a.display_name.as_str()).collect::<Vec<_>>();
    println!("✅ {} squad: {}", run.mode, names.join(", "));
}

/// Logging runs off the reveal path; the handle lets a one-shot command wait
/// for it before the runtime shuts down.
fn spawn_log(picks: &PickClient, run: CompletedRun) -> JoinHandle<()> {
    let picks = picks.clone();
    tokio::spawn(async move {
        if let Some(log) = picks.log_pick(run.mode, &run.agents).await {
            tracing::info!(id = %log.id, "pick saved");
        }
    })
}

async fn run_session(config: &ClientConfig, seed: Option<u64>, no_log: bool) -> Result<()> {
    let roster = RosterProvider::from_config(config).fetch_roster().await;
    let timing = RevealTiming::from_env()?;
    let picks = (!no_log).then(|| PickClient::from_config(config));

    let mut session = Session::new(sequencer(roster, timing, seed), ExclusionSet::new());
    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let origin = Instant::now();

    println!("{}", vp_cli::session::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(error) => {
                println!("{}", error);
                continue;
            }
        };

        match session.apply(command, origin.elapsed()) {
            Outcome::Message(message) => println!("{}", message),
            Outcome::Quit => break,
            Outcome::Animate => {
                let completed = run_until_idle(&mut session.sequencer, origin, print_frame).await;
                println!();
                if let (Some(run), Some(picks)) = (completed, picks.as_ref()) {
                    pending.retain(|handle| !handle.is_finished());
                    pending.push(spawn_log(picks, run));
                }
            }
        }
    }

    for handle in pending {
        let _ = handle.await;
    }
    Ok(())
}
