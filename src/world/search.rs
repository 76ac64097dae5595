//! Bounded-radius searches over the world map

use crate::core::types::MapPos;
use crate::world::GameWorld;

/// Whether any position within `radius` of `center`, at least `min_dist`
/// steps away from it, satisfies `predicate`
pub fn find_any<W, F>(world: &W, center: MapPos, radius: u32, min_dist: u32, predicate: F) -> bool
where
    W: GameWorld + ?Sized,
    F: Fn(&W, MapPos) -> bool,
{
    world
        .spiral(center, radius)
        .into_iter()
        .filter(|pos| pos.distance(&center) >= min_dist)
        .any(|pos| predicate(world, pos))
}

/// First position in spiral order (nearest first) satisfying `predicate`
pub fn find_nearest<W, F>(world: &W, center: MapPos, radius: u32, predicate: F) -> Option<MapPos>
where
    W: GameWorld + ?Sized,
    F: Fn(&W, MapPos) -> bool,
{
    world
        .spiral(center, radius)
        .into_iter()
        .find(|&pos| predicate(world, pos))
}
