//! Hull handling and fleet behaviour parameters.

/// Handling shared by every hull on the water
#[derive(Debug, Clone)]
pub struct VesselParams {
    /// Speed set whenever the player steers (meters per second)
    pub player_cruise_speed_m_per_s: f32,

    /// Speed set whenever a fleet vessel steers (meters per second)
    pub fleet_cruise_speed_m_per_s: f32,

    /// Maximum bearing change (radians per second)
    pub turn_rate_per_s: f32,

    /// Linear speed loss while coasting (meters per second, per second)
    pub drag_per_s: f32,

    /// Maximum vertical correction toward the sampled waterline (meters per second)
    pub height_lerp_speed_m_per_s: f32,

    /// Maximum change of the up vector toward the wave normal (per second)
    pub up_rotation_speed_per_s: f32,

    /// Capsize animation rate (flip progress per second, terminal at 1.0)
    pub flip_speed_per_s: f32,

    /// Hull lift while capsized, keeps the rolled hull above the surface (meters)
    pub capsized_lift_m: f32,
}

impl Default for VesselParams {
    fn default() -> Self {
        Self {
            player_cruise_speed_m_per_s: 12.0,
            fleet_cruise_speed_m_per_s: 8.0,
            turn_rate_per_s: 0.5,
            drag_per_s: 5.0,
            height_lerp_speed_m_per_s: 5.0,
            up_rotation_speed_per_s: 0.125,
            flip_speed_per_s: 1.0,
            capsized_lift_m: 3.0,
        }
    }
}

/// Largest fleet the renderer has per-frame draw slots for
pub const MAX_FLEET_VESSELS: usize = 62;

/// Autonomous fleet composition and decision thresholds
#[derive(Debug, Clone)]
pub struct FleetParams {
    /// Number of autonomous vessels spawned at startup
    pub vessel_count: usize,

    /// How many of them pursue the player (the rest wander)
    pub follower_count: usize,

    /// Spawn offsets are drawn from a square of this half-extent around the player (meters)
    pub max_spawn_distance_m: f32,

    /// Spawns closer than this to the player are redrawn (meters)
    pub min_spawn_distance_m: f32,

    /// Wanderers farther than this from the player turn back toward it (meters)
    pub max_wander_distance_m: f32,

    /// Closest approach to the player before a vessel backs off or stops (meters)
    pub min_player_distance_m: f32,

    /// Neighbour distance that triggers avoidance (meters)
    pub min_separation_m: f32,

    /// Player distance at which a broadside hull capsizes (meters)
    pub collision_distance_m: f32,

    /// |cos| between a hull's forward and the line to the player below which it counts as broadside
    pub broadside_tolerance: f32,

    /// Whether broadside rams capsize fleet vessels
    pub capsize_on_broadside_ram: bool,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            vessel_count: 6,
            follower_count: 1,
            max_spawn_distance_m: 400.0,
            min_spawn_distance_m: 50.0,
            max_wander_distance_m: 600.0,
            min_player_distance_m: 50.0,
            min_separation_m: 45.0,
            collision_distance_m: 28.0,
            broadside_tolerance: 0.1,
            capsize_on_broadside_ram: true,
        }
    }
}
