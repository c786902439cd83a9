//! End-to-end battle runs through the public API

use gridfall::battle::{
    BattleEvent, BattlePhase, BattleSession, BattleSetup, Command, EnemySpawn, EnemyTemplate,
    EnemyTemplateSet, TriggerSpec, UnitStats,
};
use gridfall::core::types::{Team, UnitId};
use gridfall::grid::GridCoord;
use gridfall::roster::{Roster, RosterRecord};

fn templates() -> EnemyTemplateSet {
    let mut set = EnemyTemplateSet::new();
    set.insert(
        "raider",
        EnemyTemplate {
            name: "Raider".into(),
            stats: UnitStats {
                max_hp: 7,
                damage: 3,
                movement: 3,
                attack_range: 1,
            },
        },
    );
    set
}

fn skirmish() -> BattleSetup {
    BattleSetup {
        width: 10,
        height: 10,
        elevation: None,
        friendly_spawns: vec![GridCoord::new(0, 4), GridCoord::new(0, 6)],
        enemy_spawns: vec![
            EnemySpawn {
                template: "raider".into(),
                position: GridCoord::new(8, 4),
            },
            EnemySpawn {
                template: "raider".into(),
                position: GridCoord::new(8, 6),
            },
        ],
        triggers: vec![TriggerSpec {
            turn: 2,
            reference: "flank_warning".into(),
        }],
        obstacles: vec![],
    }
}

fn party() -> Roster {
    Roster::new(vec![
        RosterRecord::new("Aldric", 18, 5, 4, 1),
        RosterRecord::new("Mira", 14, 4, 5, 2),
    ])
}

fn started(setup: &BattleSetup, seed: u64) -> BattleSession {
    let mut session = BattleSession::new(setup, &templates(), &party(), seed).unwrap();
    session.start();
    session
}

fn friendly_ids(session: &BattleSession) -> Vec<UnitId> {
    session
        .units()
        .iter()
        .filter(|u| u.team == Team::Friendly)
        .map(|u| u.id)
        .collect()
}

fn enemy_ids(session: &BattleSession) -> Vec<UnitId> {
    session
        .units()
        .iter()
        .filter(|u| u.team == Team::Enemy)
        .map(|u| u.id)
        .collect()
}

/// Scripted player turn: each unit attacks an adjacent enemy or closes in
fn scripted_player_turn(session: &mut BattleSession) {
    for id in friendly_ids(session) {
        if session.phase != BattlePhase::PlayerTurn {
            return;
        }
        let Some(unit) = session.unit(id) else {
            continue;
        };
        let position = unit.position;
        let range = unit.stats.attack_range;
        let movement = unit.stats.movement;

        let target = session
            .units()
            .iter()
            .find(|u| u.team == Team::Enemy && u.position.distance(&position) <= range)
            .map(|u| u.id);

        if let Some(target) = target {
            session.handle(Command::SelectUnit(id));
            session.handle(Command::ToggleAttackMode);
            session.handle(Command::Attack { target });
        } else {
            let destination = session
                .units()
                .iter()
                .filter(|u| u.team == Team::Enemy)
                .map(|u| u.position)
                .next()
                .and_then(|enemy| {
                    session
                        .movement_options(id)?
                        .iter()
                        .min_by_key(|c| c.distance(&enemy))
                })
                .unwrap_or(position);
            if destination != position && destination.distance(&position) <= movement {
                session.handle(Command::MoveUnit {
                    unit: id,
                    destination,
                });
            }
        }
    }
}

fn run_to_completion(session: &mut BattleSession, max_turns: u32) -> Vec<BattleEvent> {
    let mut log = session.drain_events();
    while session.phase != BattlePhase::Victory && session.turn <= max_turns {
        scripted_player_turn(session);
        session.handle(Command::EndTurn);
        session.run_enemy_phase();
        log.extend(session.drain_events());
    }
    log
}

#[test]
fn test_scripted_battle_reaches_victory() {
    let mut session = started(&skirmish(), 7);
    let log = run_to_completion(&mut session, 30);

    assert_eq!(session.phase, BattlePhase::Victory);
    assert!(log.contains(&BattleEvent::BattleWon));

    let deaths = log
        .iter()
        .filter(|e| matches!(e, BattleEvent::UnitDied { .. }))
        .count();
    assert!(deaths >= 2, "both raiders should have fallen");
}

#[test]
fn test_same_seed_replays_identically() {
    let shape = |log: &[BattleEvent]| -> Vec<String> {
        log.iter()
            .map(|e| match e {
                BattleEvent::UnitSpawned { team, position, .. } => {
                    format!("spawn {:?} {:?}", team, position)
                }
                BattleEvent::UnitMoved { path, .. } => {
                    format!("move {:?}", path.last().map(|s| s.coord))
                }
                BattleEvent::AttackResolved {
                    damage,
                    high_ground,
                    ..
                } => format!("hit {} {}", damage, high_ground),
                BattleEvent::UnitDied { .. } => "death".into(),
                BattleEvent::TurnChanged { number, side } => {
                    format!("turn {} {:?}", number, side)
                }
                BattleEvent::PlayNarrative { reference } => format!("beat {}", reference.0),
                BattleEvent::BattleWon => "won".into(),
            })
            .collect()
    };

    let mut first = started(&skirmish(), 123);
    let mut second = started(&skirmish(), 123);
    let first_log = run_to_completion(&mut first, 30);
    let second_log = run_to_completion(&mut second, 30);

    assert_eq!(shape(&first_log), shape(&second_log));
}

#[test]
fn test_enemies_converge_on_player_units() {
    let mut session = started(&skirmish(), 5);
    session.drain_events();

    session.handle(Command::EndTurn);
    session.run_enemy_phase();

    let moves: Vec<_> = session
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            BattleEvent::UnitMoved { unit, path } => Some((unit, path)),
            _ => None,
        })
        .collect();
    assert_eq!(moves.len(), 2, "both raiders should advance");

    for (unit, path) in moves {
        let end = path.last().unwrap().coord;
        let start_col = 8;
        assert!(
            end.col < start_col,
            "{:?} should have closed distance, ended at {:?}",
            unit,
            end
        );
    }
}

#[test]
fn test_trigger_fires_on_scheduled_turn_only() {
    let mut session = started(&skirmish(), 9);
    let beats = |events: Vec<BattleEvent>| {
        events
            .into_iter()
            .filter(|e| matches!(e, BattleEvent::PlayNarrative { .. }))
            .count()
    };

    assert_eq!(beats(session.drain_events()), 0);

    session.handle(Command::EndTurn);
    session.run_enemy_phase();
    assert_eq!(session.turn, 2);
    assert_eq!(beats(session.drain_events()), 1);

    session.handle(Command::EndTurn);
    session.run_enemy_phase();
    assert_eq!(beats(session.drain_events()), 0);
}

#[test]
fn test_high_ground_reported_in_full_session() {
    let mut setup = skirmish();
    setup.enemy_spawns = vec![EnemySpawn {
        template: "raider".into(),
        position: GridCoord::new(1, 4),
    }];
    let mut session = started(&setup, 3);

    let attacker = friendly_ids(&session)[0];
    let target = enemy_ids(&session)[0];
    let attacker_pos = session.unit(attacker).unwrap().position;
    let target_pos = session.unit(target).unwrap().position;
    session.grid.set_elevation(attacker_pos, 0.9);
    session.grid.set_elevation(target_pos, 0.1);

    session.handle(Command::SelectUnit(attacker));
    session.handle(Command::ToggleAttackMode);
    session.handle(Command::Attack { target });

    let events = session.drain_events();
    let hit = events
        .iter()
        .find_map(|e| match e {
            BattleEvent::AttackResolved {
                damage,
                high_ground,
                ..
            } => Some((*damage, *high_ground)),
            _ => None,
        })
        .expect("attack should have resolved");

    assert!(hit.1, "elevated attacker should get the bonus");
    // Band 4..=6 plus the flat bonus
    assert!((5..=7).contains(&hit.0));
}

#[test]
fn test_wounds_written_back_to_roster() {
    let mut setup = skirmish();
    // Single raider adjacent to Aldric so he takes some hits
    setup.enemy_spawns = vec![EnemySpawn {
        template: "raider".into(),
        position: GridCoord::new(1, 4),
    }];
    let mut roster = party();
    let mut session = BattleSession::new(&setup, &templates(), &roster, 21).unwrap();
    session.start();

    // Let the raider strike once, then finish it off
    session.handle(Command::EndTurn);
    session.run_enemy_phase();

    let attacker = friendly_ids(&session)[0];
    let target = enemy_ids(&session)[0];
    while session.phase != BattlePhase::Victory {
        session.handle(Command::SelectUnit(attacker));
        session.handle(Command::ToggleAttackMode);
        session.handle(Command::Attack { target });
        session.handle(Command::EndTurn);
        session.run_enemy_phase();
    }

    session.sync_wounds(&mut roster);
    let wounded: Vec<_> = roster.records.iter().filter(|r| r.wounds > 0).collect();
    assert!(!wounded.is_empty(), "someone should carry wounds out");
    assert!(wounded[0].spawn_hp() < wounded[0].battle_stats().max_hp);

    roster.heal_between_battles();
    assert!(roster.records.iter().all(|r| r.wounds == 0));
}

#[test]
fn test_full_player_turn_action_economy() {
    let mut session = started(&skirmish(), 13);
    let mover = friendly_ids(&session)[0];

    // Move, then try to move again: only the first sticks
    session.handle(Command::MoveUnit {
        unit: mover,
        destination: GridCoord::new(2, 4),
    });
    let after_first = session.unit(mover).unwrap().position;
    session.handle(Command::MoveUnit {
        unit: mover,
        destination: GridCoord::new(4, 4),
    });
    assert_eq!(session.unit(mover).unwrap().position, after_first);

    // Next turn the unit is available again
    session.handle(Command::EndTurn);
    session.run_enemy_phase();
    assert!(session.unit(mover).unwrap().action.can_move());
}
