//! Headless skirmish runner
//!
//! Plays a scripted coach on both benches (close distance, strike when
//! adjacent) and prints the combat log plus a JSON summary. Useful for
//! eyeballing balance changes and for reproducing a battle from a seed.

use arena_engine::battle::{
    javelin, BattleEvent, BattleState, CoachOrders, HexCoord, OrderAction, RosterSnapshot,
};
use arena_engine::battle::character::{CharacterStats, EquipmentBonuses, PsychologyProfile};
use arena_engine::core::config::BattleConfig;
use arena_engine::core::error::ArenaError;
use arena_engine::core::types::CharacterId;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Headless skirmish runner - scripted coaches, deterministic from a seed
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run a scripted battle and print the log and summary")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Battle config as a TOML file; defaults are used when omitted
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Print the combat log as the battle runs
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn demo_roster(prefix: &str, aggressive: bool) -> Vec<RosterSnapshot> {
    let (ego, team_player, stress) = if aggressive { (75, 35, 40) } else { (40, 70, 20) };
    vec![
        RosterSnapshot {
            id: CharacterId::new(),
            name: format!("{} Striker", prefix),
            stats: CharacterStats { max_hp: 100, max_mana: 60, attack: 25, defense: 5, speed: 12 },
            abilities: vec![javelin().id],
            psyche: PsychologyProfile { adherence: 70, stress, confidence: 65, ego, team_player },
            equipment: EquipmentBonuses { attack: 2, ..Default::default() },
        },
        RosterSnapshot {
            id: CharacterId::new(),
            name: format!("{} Anchor", prefix),
            stats: CharacterStats { max_hp: 120, max_mana: 40, attack: 18, defense: 8, speed: 7 },
            abilities: Vec::new(),
            psyche: PsychologyProfile { adherence: 85, stress: 15, confidence: 55, ego: 30, team_player: 80 },
            equipment: EquipmentBonuses { defense: 2, ..Default::default() },
        },
    ]
}

/// The scripted coach: strike the nearest enemy if adjacent, otherwise
/// step toward them, otherwise guard.
fn scripted_order(battle: &BattleState) -> Option<CoachOrders> {
    let active = battle.active_character()?;
    let from = active.position?;

    let nearest = battle
        .characters
        .iter()
        .filter(|c| c.team != active.team && c.is_alive() && c.position.is_some())
        .min_by_key(|c| (from.distance(&c.position.unwrap()), c.id))?;
    let target_pos = nearest.position?;

    let dist = from.distance(&target_pos);
    if dist <= 1 {
        return Some(CoachOrders {
            character: active.id,
            action: OrderAction::Strike { target: nearest.id },
        });
    }

    // Throw a javelin on the approach when it is ready and affordable.
    let spear = javelin();
    if dist <= spear.range
        && active.knows(&spear.id)
        && active.can_afford(spear.mana_cost)
        && active.cooldown_remaining(&spear.id) == 0
    {
        return Some(CoachOrders {
            character: active.id,
            action: OrderAction::Cast { ability: spear.id, target: nearest.id },
        });
    }

    let budget = active.effective_movement(battle.config.movement_points);
    let best: Option<HexCoord> = battle
        .grid
        .reachable_hexes(from, budget)
        .into_iter()
        .min_by_key(|h| (h.distance(&target_pos), *h));
    match best {
        Some(dest) if dest != from => Some(CoachOrders {
            character: active.id,
            action: OrderAction::MoveTo { destination: dest },
        }),
        _ => Some(CoachOrders { character: active.id, action: OrderAction::Guard }),
    }
}

fn main() -> Result<(), ArenaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            toml::from_str(&text).map_err(|e| ArenaError::Config(e.to_string()))?
        }
        None => BattleConfig::default(),
    };

    let home = demo_roster("Home", true);
    let away = demo_roster("Away", false);
    let mut battle = BattleState::new(config, &home, &away, seed)?;
    battle = battle.apply(&BattleEvent::HuddleComplete)?;

    let mut printed = 0;
    while !battle.is_complete() {
        let Some(orders) = scripted_order(&battle) else {
            break;
        };
        let character = orders.character;
        battle = match battle.apply(&BattleEvent::OrdersSubmitted(orders)) {
            Ok(next) => next,
            Err(ArenaError::IllegalOrder(_)) => {
                // The script picked something the rules refuse; fall back to
                // a guard, which is always legal.
                let fallback = CoachOrders { character, action: OrderAction::Guard };
                battle.apply(&BattleEvent::OrdersSubmitted(fallback))?
            }
            Err(e) => return Err(e),
        };
        if args.verbose {
            for entry in &battle.log[printed..] {
                eprintln!("{}", entry);
            }
            printed = battle.log.len();
        }
    }

    let summary = battle
        .summary()
        .ok_or_else(|| ArenaError::InvariantViolation("battle loop exited unfinished".to_string()))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => {
            for entry in &battle.log {
                println!("{}", entry);
            }
            println!();
            match summary.winner {
                Some(team) => println!("winner: {:?} ({:?})", team, summary.reason),
                None => println!("draw ({:?})", summary.reason),
            }
            println!(
                "rounds: {}  draws: {}  rebellions: {}  seed: {}",
                summary.rounds,
                summary.draws,
                summary.rebellions.len(),
                seed
            );
        }
    }

    Ok(())
}
