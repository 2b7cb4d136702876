//! Autonomous fleet: spawning and per-tick heading decisions.
//!
//! Each vessel picks at most one desired direction per tick. Neighbour
//! avoidance always wins; after that wanderers and followers have their own
//! goals relative to the player. A vessel with nothing to do coasts.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::math::{flatten, horizontal_distance, normalize_or};
use crate::params::{FleetParams, VesselParams};
use crate::vessel::{Pilot, Vessel};

/// What one vessel does this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Steer directly away from a neighbour inside the separation radius
    Avoid(Vec3),

    /// Wanderer strayed too far: adopt this heading (toward the player) and steer along it
    Retarget(Vec3),

    /// Wanderer too close to the player: steer directly away from it
    Flee(Vec3),

    /// Wanderer keeps its stored heading
    Wander(Vec3),

    /// Follower closes in on the player
    Seek(Vec3),

    /// No steering; bearing and decaying speed carry on
    Coast,
}

impl Decision {
    /// Desired direction handed to steering, if any
    pub fn direction(&self) -> Option<Vec3> {
        match *self {
            Decision::Avoid(d)
            | Decision::Retarget(d)
            | Decision::Flee(d)
            | Decision::Wander(d)
            | Decision::Seek(d) => Some(d),
            Decision::Coast => None,
        }
    }
}

/// Choose what `fleet[index]` does this tick. First matching rule wins.
pub fn decide(index: usize, fleet: &[Vessel], player_pos: Vec3, params: &FleetParams) -> Decision {
    let Some(vessel) = fleet.get(index) else {
        return Decision::Coast;
    };

    let neighbour = fleet.iter().enumerate().find(|(j, other)| {
        *j != index && horizontal_distance(vessel.position, other.position) < params.min_separation_m
    });
    if let Some((_, other)) = neighbour {
        return Decision::Avoid(flatten(vessel.position - other.position));
    }

    let to_player = flatten(player_pos - vessel.position);
    let distance = to_player.length();

    match vessel.pilot {
        Pilot::Player => Decision::Coast,
        Pilot::Wanderer { heading } => {
            if distance > params.max_wander_distance_m {
                Decision::Retarget(normalize_or(to_player, heading))
            } else if distance < params.min_player_distance_m {
                Decision::Flee(-to_player)
            } else {
                Decision::Wander(heading)
            }
        }
        Pilot::Follower => {
            if distance > params.min_player_distance_m {
                Decision::Seek(to_player)
            } else {
                Decision::Coast
            }
        }
    }
}

/// A hull close to the player and lying across the line to it
pub fn is_broadside_ram(vessel: &Vessel, player_pos: Vec3, params: &FleetParams) -> bool {
    let to_player = flatten(player_pos - vessel.position);
    if to_player.length() >= params.collision_distance_m {
        return false;
    }
    let line = normalize_or(to_player, Vec3::ZERO);
    let heading = normalize_or(flatten(vessel.forward), vessel.bearing);
    line.dot(heading).abs() < params.broadside_tolerance
}

/// Run one tick of fleet decisions and apply them in fleet order.
///
/// Capsized vessels are skipped. Decisions only read positions, which steering
/// does not touch, so applying them in place matches deciding all first.
pub fn update_fleet(
    fleet: &mut [Vessel],
    player_pos: Vec3,
    fleet_params: &FleetParams,
    vessel_params: &VesselParams,
    dt: f32,
) {
    for index in 0..fleet.len() {
        if fleet[index].capsize.flipped {
            continue;
        }

        if fleet_params.capsize_on_broadside_ram
            && is_broadside_ram(&fleet[index], player_pos, fleet_params)
        {
            fleet[index].begin_capsize();
            log::info!(
                "Vessel {} capsized by a broadside ram at ({:.1}, {:.1})",
                index,
                fleet[index].position.x,
                fleet[index].position.z
            );
            continue;
        }

        let decision = decide(index, fleet, player_pos, fleet_params);
        let vessel = &mut fleet[index];
        if let Decision::Retarget(heading) = decision {
            log::debug!("Vessel {} strayed too far, turning back", index);
            vessel.pilot = Pilot::Wanderer { heading };
        }
        if let Some(desired) = decision.direction() {
            vessel.steer(desired, vessel_params, dt);
        }
    }
}

/// Spawn the fleet around the player.
///
/// Offsets are drawn from a square around the player and redrawn until they
/// clear the minimum distance. Every vessel starts bearing toward the player;
/// the first `follower_count` follow it and the rest wander on a random heading.
pub fn spawn_fleet<R: Rng>(rng: &mut R, player_pos: Vec3, params: &FleetParams) -> Vec<Vessel> {
    let half = params.max_spawn_distance_m.max(params.min_spawn_distance_m);
    let anchor = flatten(player_pos);

    (0..params.vessel_count)
        .map(|i| {
            let position = loop {
                let candidate = anchor
                    + Vec3::new(rng.gen_range(-half..=half), 0.0, rng.gen_range(-half..=half));
                if horizontal_distance(candidate, anchor) >= params.min_spawn_distance_m {
                    break candidate;
                }
            };

            let pilot = if i < params.follower_count {
                Pilot::Follower
            } else {
                let heading = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
                Pilot::Wanderer {
                    heading: Vec3::new(heading.x, 0.0, heading.y),
                }
            };

            Vessel::new(position, anchor - position, pilot)
        })
        .collect()
}
