//! Director and state stack integration tests

use settler_ai::ai::*;
use settler_ai::core::types::{
    BuildingType, MapPos, Mineral, PlayerIndex, SerfState, SerfType, Terrain,
};
use settler_ai::core::AiConfig;
use settler_ai::world::sandbox::WorldCommand;
use settler_ai::world::SandboxWorld;
use std::path::PathBuf;

fn personalities_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/personalities")
}

/// Two computer players and one human on a map with a central range
fn skirmish(seed: u64) -> (AiDirector, SandboxWorld) {
    let mut world = SandboxWorld::new(48, 48, seed);
    for x in 22..=26 {
        for y in 0..48 {
            world.set_terrain(MapPos::new(x, y), Terrain::Tundra1);
        }
    }
    // Within survey range of the first flags both computer players found
    world.add_deposit(MapPos::new(26, 8), Mineral::Coal, true);
    world.add_deposit(MapPos::new(22, 26), Mineral::Iron, false);

    let castles = [MapPos::new(16, 12), MapPos::new(32, 12), MapPos::new(16, 30)];
    let mut director = AiDirector::new(AiConfig::default()).unwrap();
    for (slot, castle) in castles.into_iter().enumerate() {
        let player = world.add_player(slot > 0);
        world.add_building(player, BuildingType::Castle, castle);
        world.building_mut(castle).unwrap().knight_count = 10;
        world.add_serf(player, SerfType::Generic, SerfState::IdleInStock);
        world.add_serf(player, SerfType::Generic, SerfState::IdleInStock);

        if slot > 0 {
            let context = load_personality_from(&personalities_dir(), "warlord").unwrap();
            director
                .create_initial_state(player, context, BehaviorState::Idle)
                .unwrap();
        }
    }

    (director, world)
}

fn run(director: &mut AiDirector, world: &mut SandboxWorld, ticks: u64) {
    for tick in 1..=ticks {
        for report in world.step(20) {
            director.observe_mineral(report.mineral, report.position, report.large);
        }
        assert_eq!(director.advance_all(tick, world), 2);

        for ai in director.players() {
            let bottom = ai.stack.iter().next();
            assert_eq!(bottom, Some(BehaviorState::Idle));
        }
    }
}

#[test]
fn test_push_pop_round_trip() {
    let mut stack = StateStack::with_initial(BehaviorState::Attack);
    let children = [
        BehaviorState::FindOre {
            mineral: Some(Mineral::Gold),
        },
        BehaviorState::BuildBuilding {
            kind: BuildingType::Hut,
        },
        BehaviorState::FindOre { mineral: None },
    ];

    for child in children {
        stack.push(child);
    }
    for _ in children {
        stack.pop();
    }
    assert_eq!(stack.top(), BehaviorState::Attack);
    assert_eq!(stack.len(), 2);
}

#[test]
fn test_delayed_queue_releases_in_due_order() {
    let mut queue = DelayedQueue::new();
    let gold = BehaviorState::FindOre {
        mineral: Some(Mineral::Gold),
    };
    let hut = BehaviorState::BuildBuilding {
        kind: BuildingType::Hut,
    };
    queue.schedule(30, gold);
    queue.schedule(10, hut);
    queue.schedule(20, BehaviorState::Attack);

    assert!(queue.take_due(9).is_empty());
    assert_eq!(queue.take_due(25), vec![hut, BehaviorState::Attack]);
    assert_eq!(queue.take_due(30), vec![gold]);
    assert!(queue.is_empty());
}

#[test]
fn test_every_personality_loads() {
    for name in ["balanced", "warlord", "miner", "novice"] {
        let context = load_personality_from(&personalities_dir(), name).unwrap();
        assert_eq!(context.name, name);
        assert!(context.validate().is_ok());
    }
}

#[test]
fn test_skirmish_keeps_idle_root_and_acts() {
    let (mut director, mut world) = skirmish(21);
    run(&mut director, &mut world, 3_000);

    let commands = world.commands();
    assert!(commands
        .iter()
        .any(|c| matches!(c, WorldCommand::Geologist { .. })));
    assert!(!director.memory().is_empty());
}

#[test]
fn test_skirmish_is_deterministic() {
    let (mut first, mut first_world) = skirmish(77);
    let (mut second, mut second_world) = skirmish(77);
    run(&mut first, &mut first_world, 2_000);
    run(&mut second, &mut second_world, 2_000);

    assert_eq!(first_world.commands(), second_world.commands());
    let stacks = |director: &AiDirector| -> Vec<Vec<BehaviorState>> {
        director.players().map(|ai| ai.stack.iter().collect()).collect()
    };
    assert_eq!(stacks(&first), stacks(&second));
}

#[test]
fn test_director_survives_json_round_trip() {
    let (mut director, mut world) = skirmish(5);
    run(&mut director, &mut world, 1_200);

    let json = serde_json::to_string(&director).unwrap();
    let restored: AiDirector = serde_json::from_str(&json).unwrap();

    for (before, after) in director.players().zip(restored.players()) {
        assert_eq!(before.index, after.index);
        assert_eq!(before.context, after.context);
        assert_eq!(before.stack, after.stack);
        assert_eq!(before.delayed.len(), after.delayed.len());
    }
    assert_eq!(director.memory().len(), restored.memory().len());
}

#[test]
fn test_removed_player_forgotten() {
    let (mut director, mut world) = skirmish(9);
    let gone = PlayerIndex(1);
    director.remove_player(gone);

    assert!(director.player(gone).is_none());
    assert_eq!(director.advance_all(1, &mut world), 1);
    assert!(!director.advance(gone, 2, &mut world).unwrap());
}

#[test]
fn test_defeated_player_dropped_by_advance_all() {
    let (mut director, mut world) = skirmish(9);
    world.remove_player(PlayerIndex(2));

    assert_eq!(director.advance_all(1, &mut world), 1);
    assert!(director.player(PlayerIndex(2)).is_none());
    assert!(director.player(PlayerIndex(1)).is_some());
}
