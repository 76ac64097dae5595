//! Attack decision integration tests

use settler_ai::ai::states::attack::category_targets;
use settler_ai::ai::targeting::{select_target_player, worst_protected};
use settler_ai::ai::*;
use settler_ai::core::types::{BuildingType, MapPos, PlayerIndex};
use settler_ai::core::AiConfig;
use settler_ai::world::sandbox::WorldCommand;
use settler_ai::world::{PlayerStats, SandboxWorld};

fn attack_once(world: &mut SandboxWorld, me: PlayerIndex, context: AiContext) -> Vec<WorldCommand> {
    let mut director = AiDirector::new(AiConfig::default()).unwrap();
    director
        .create_initial_state(me, context, BehaviorState::Attack)
        .unwrap();
    director.advance(me, 1, world).unwrap();

    // Attack is single-shot
    let stack: Vec<BehaviorState> = director.player(me).unwrap().stack.iter().collect();
    assert_eq!(stack, vec![BehaviorState::Idle]);

    world.commands().to_vec()
}

fn reckless() -> AiContext {
    AiContext {
        intelligence: 10,
        ..AiContext::default()
    }
}

#[test]
fn test_lone_player_attacks_nobody() {
    for seed in 0..8 {
        let mut world = SandboxWorld::new(32, 32, seed);
        let me = world.add_player(true);
        world.add_building(me, BuildingType::Castle, MapPos::new(5, 5));
        world.building_mut(MapPos::new(5, 5)).unwrap().knight_count = 20;

        assert!(attack_once(&mut world, me, reckless()).is_empty());
    }
}

#[test]
fn test_unreachable_target_never_chosen() {
    for seed in 0..16 {
        let mut world = SandboxWorld::new(48, 48, seed);
        let me = world.add_player(true);
        let enemy = world.add_player(false);
        let blocked = MapPos::new(20, 20);
        let open = MapPos::new(30, 30);
        world.add_building(enemy, BuildingType::Fortress, blocked);
        world.add_building(enemy, BuildingType::Hut, open);
        // The blocked fortress is otherwise the juicier target
        world.building_mut(blocked).unwrap().knight_count = 0;
        world.building_mut(open).unwrap().knight_count = 6;
        world.set_attack_capacity(me, blocked, 0);
        world.set_attack_capacity(me, open, 2);

        let commands = attack_once(&mut world, me, reckless());
        assert_eq!(
            commands,
            vec![WorldCommand::Attack {
                player: me,
                target: open,
                knights: 2
            }]
        );
    }
}

fn gate_world(capacity: u32) -> (SandboxWorld, PlayerIndex) {
    let mut world = SandboxWorld::new(32, 32, 4);
    let me = world.add_player(true);
    let enemy = world.add_player(false);
    world.add_building(enemy, BuildingType::Tower, MapPos::new(12, 12));
    world.set_attack_capacity(me, MapPos::new(12, 12), capacity);
    (world, me)
}

#[test]
fn test_intelligence_30_refuses_even_fight() {
    let context = AiContext {
        intelligence: 30,
        smartness: 0,
        ..AiContext::default()
    };

    // One defender: capacity 1 scores 0, capacity 2 scores 1
    let (mut world, me) = gate_world(1);
    assert!(attack_once(&mut world, me, context.clone()).is_empty());

    let (mut world, me) = gate_world(2);
    assert_eq!(attack_once(&mut world, me, context).len(), 1);
}

#[test]
fn test_small_military_offers_only_weakest_group() {
    let mut world = SandboxWorld::new(32, 32, 4);
    let _me = world.add_player(true);
    let enemy = world.add_player(false);
    world.add_building(enemy, BuildingType::Hut, MapPos::new(4, 4));
    world.add_building(enemy, BuildingType::Tower, MapPos::new(20, 20));
    world.building_mut(MapPos::new(4, 4)).unwrap().knight_count = 1;
    world.building_mut(MapPos::new(20, 20)).unwrap().knight_count = 3;

    let offered = category_targets(
        &world,
        &AiConfig::default(),
        enemy,
        AttackTarget::SmallMilitary,
    );
    let positions: Vec<MapPos> = offered.iter().map(|b| b.position).collect();
    assert_eq!(positions, vec![MapPos::new(4, 4)]);
}

#[test]
fn test_human_criterion_overrides_weakest() {
    let mut world = SandboxWorld::new(16, 16, 4);
    let me = world.add_player(true);
    let human = world.add_player(false);
    let ai = world.add_player(true);
    world.player_stats_mut(human).unwrap().military_score = 100;
    world.player_stats_mut(ai).unwrap().military_score = 0;

    let context = AiContext {
        primary_player_criterion: PrimaryPlayerCriterion::Human,
        secondary_player_criterion: SecondaryPlayerCriterion::Weakest,
        ..AiContext::default()
    };
    assert_eq!(select_target_player(&mut world, me, &context), Some(human));
}

#[test]
fn test_worst_protected_by_hand() {
    let player = |index: u32, max: u8, min: u8, knights: u32| PlayerStats {
        index: PlayerIndex(index),
        is_ai: false,
        military_score: 0,
        score: 0,
        total_knights: knights,
        knight_occupation: [0x11, 0x11, 0x11, (max << 4) | min],
    };

    // Lowest max bucket is 2 (players 1, 2, 3); among them the lowest min
    // bucket is 1 (players 2, 3); player 3 has fewer knights
    let players = [
        player(0, 5, 0, 1),
        player(1, 2, 2, 1),
        player(2, 2, 1, 30),
        player(3, 2, 1, 12),
    ];
    assert_eq!(worst_protected(&players), Some(PlayerIndex(3)));
}

#[test]
fn test_attack_targets_guard_of_food_production() {
    let mut world = SandboxWorld::new(48, 48, 4);
    let me = world.add_player(true);
    let enemy = world.add_player(false);
    let guard = MapPos::new(10, 10);
    let lonely = MapPos::new(30, 30);
    world.add_building(enemy, BuildingType::Hut, guard);
    world.add_building(enemy, BuildingType::Hut, lonely);
    world.add_building(enemy, BuildingType::Farm, MapPos::new(12, 11));
    world.set_attack_capacity(me, guard, 3);
    world.set_attack_capacity(me, lonely, 6);

    let context = AiContext {
        primary_target: AttackTarget::FoodProduction,
        ..reckless()
    };
    let commands = attack_once(&mut world, me, context);
    assert_eq!(
        commands,
        vec![WorldCommand::Attack {
            player: me,
            target: guard,
            knights: 3
        }]
    );
}
