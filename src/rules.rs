use serde::{Deserialize, Serialize};

/// Tunable game rules, read from the optional `[rules]` table of a world file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub max_carry_weight: u32,
    pub max_health: u32,
    pub attack_power: u32,
    pub critical_chance_percent: u8,
    /// Active monsters strike every time the player looks around.
    pub monster_attacks_on_look: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            max_carry_weight: 13,
            max_health: 100,
            attack_power: 10,
            critical_chance_percent: 15,
            monster_attacks_on_look: false,
        }
    }
}
