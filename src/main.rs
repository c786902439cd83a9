//! Headless skirmish demo: runs one battle with a scripted player and
//! prints the notification stream.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridfall::battle::{
    BattleEvent, BattlePhase, BattleSession, BattleSetup, Command, EnemySpawn, EnemyTemplate,
    EnemyTemplateSet, TriggerSpec, UnitStats,
};
use gridfall::core::error::Result;
use gridfall::core::types::Team;
use gridfall::grid::{ElevationConfig, GridCoord};
use gridfall::roster::{Roster, RosterRecord};

#[derive(Parser, Debug)]
#[command(name = "gridfall", about = "Tactical battle engine demo")]
struct Args {
    /// Simulation seed; the same seed replays the same battle
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Load a battle setup from a JSON file instead of the built-in skirmish
    #[arg(long)]
    setup: Option<std::path::PathBuf>,

    /// Abort the demo after this many turns
    #[arg(long, default_value_t = 30)]
    max_turns: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let setup = match &args.setup {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => default_skirmish(),
    };
    let roster = default_roster();
    let templates = default_templates();

    let mut session = BattleSession::new(&setup, &templates, &roster, args.seed)?;
    session.start();
    report(session.drain_events());

    while session.phase != BattlePhase::Victory && session.turn <= args.max_turns {
        play_turn(&mut session);
        session.handle(Command::EndTurn);
        while session.phase == BattlePhase::EnemyTurn {
            session.advance();
            report(session.drain_events());
        }
        report(session.drain_events());
    }

    if session.phase == BattlePhase::Victory {
        tracing::info!(turn = session.turn, "demo battle won");
    } else {
        tracing::info!(turn = session.turn, "turn limit reached, stopping");
    }
    Ok(())
}

/// Scripted player: every unit attacks an adjacent enemy if it has one,
/// otherwise walks toward the nearest enemy.
fn play_turn(session: &mut BattleSession) {
    let friendlies: Vec<_> = session
        .units()
        .iter()
        .filter(|u| u.team == Team::Friendly)
        .map(|u| u.id)
        .collect();

    for id in friendlies {
        if session.phase != BattlePhase::PlayerTurn {
            break;
        }
        let Some(unit) = session.unit(id) else {
            continue;
        };
        let position = unit.position;
        let range = unit.stats.attack_range;

        let in_range = session
            .units()
            .iter()
            .find(|u| u.team == Team::Enemy && u.position.distance(&position) <= range)
            .map(|u| u.id);

        if let Some(target) = in_range {
            session.handle(Command::SelectUnit(id));
            session.handle(Command::ToggleAttackMode);
            session.handle(Command::Attack { target });
        } else if let Some(destination) = approach_destination(session, position) {
            session.handle(Command::MoveUnit {
                unit: id,
                destination,
            });
        }
        report(session.drain_events());
    }
}

/// Reachable tile closest to any enemy, if moving helps at all
fn approach_destination(session: &BattleSession, from: GridCoord) -> Option<GridCoord> {
    let unit = session.grid.occupant(from)?;
    let options = session.movement_options(unit)?;

    let enemies: Vec<GridCoord> = session
        .units()
        .iter()
        .filter(|u| u.team == Team::Enemy)
        .map(|u| u.position)
        .collect();

    let closing = |coord: &GridCoord| {
        enemies
            .iter()
            .map(|e| coord.distance(e))
            .min()
            .unwrap_or(u32::MAX)
    };

    options
        .iter()
        .min_by_key(closing)
        .filter(|best| closing(best) < closing(&from))
}

fn report(events: Vec<BattleEvent>) {
    for event in events {
        match event {
            BattleEvent::UnitSpawned {
                unit,
                team,
                position,
            } => {
                tracing::info!(?unit, ?team, ?position, "unit spawned");
            }
            BattleEvent::UnitMoved { unit, path } => {
                let destination = path.last().map(|s| s.coord);
                tracing::info!(?unit, ?destination, steps = path.len(), "unit moved");
            }
            BattleEvent::AttackResolved {
                attacker,
                target,
                damage,
                high_ground,
            } => {
                tracing::info!(?attacker, ?target, damage, high_ground, "attack resolved");
            }
            BattleEvent::UnitDied { unit, killer } => {
                tracing::info!(?unit, ?killer, "unit died");
            }
            BattleEvent::TurnChanged { number, side } => {
                tracing::info!(turn = number, ?side, "turn changed");
            }
            BattleEvent::PlayNarrative { reference } => {
                tracing::info!(reference = %reference.0, "narrative beat");
            }
            BattleEvent::BattleWon => {
                tracing::info!("battle won");
            }
        }
    }
}

fn default_skirmish() -> BattleSetup {
    BattleSetup {
        width: 12,
        height: 12,
        elevation: Some(ElevationConfig { amplitude: 1.0 }),
        friendly_spawns: vec![GridCoord::new(1, 5), GridCoord::new(1, 7)],
        enemy_spawns: vec![
            EnemySpawn {
                template: "raider".into(),
                position: GridCoord::new(10, 5),
            },
            EnemySpawn {
                template: "raider".into(),
                position: GridCoord::new(10, 7),
            },
            EnemySpawn {
                template: "marksman".into(),
                position: GridCoord::new(11, 6),
            },
        ],
        triggers: vec![TriggerSpec {
            turn: 3,
            reference: "reinforcement_warning".into(),
        }],
        obstacles: vec![
            GridCoord::new(6, 5),
            GridCoord::new(6, 6),
            GridCoord::new(6, 7),
        ],
    }
}

fn default_roster() -> Roster {
    Roster::new(vec![
        RosterRecord::new("Aldric", 18, 5, 4, 1),
        RosterRecord::new("Mira", 14, 4, 5, 2),
    ])
}

fn default_templates() -> EnemyTemplateSet {
    let mut templates = EnemyTemplateSet::new();
    templates.insert(
        "raider",
        EnemyTemplate {
            name: "Raider".into(),
            stats: UnitStats {
                max_hp: 8,
                damage: 3,
                movement: 3,
                attack_range: 1,
            },
        },
    );
    templates.insert(
        "marksman",
        EnemyTemplate {
            name: "Marksman".into(),
            stats: UnitStats {
                max_hp: 6,
                damage: 4,
                movement: 2,
                attack_range: 3,
            },
        },
    );
    templates
}
