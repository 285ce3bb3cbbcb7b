use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::rng::GameRng;
use crate::rules::Rules;
use crate::world::{Item, Monster, RoomId, name_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Asleep,
    Woozy,
    Fatigued,
    Awake,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HealthStatus::Asleep => "ASLEEP",
            HealthStatus::Woozy => "WOOZY",
            HealthStatus::Fatigued => "FATIGUED",
            HealthStatus::Awake => "AWAKE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rank {
    Beginner,
    NoviceExplorer,
    SeasonedAdventurer,
    ExpertExplorer,
    AdventureMaster,
}

impl Rank {
    pub fn for_score(score: u32) -> Rank {
        match score {
            s if s >= 1000 => Rank::AdventureMaster,
            s if s >= 750 => Rank::ExpertExplorer,
            s if s >= 500 => Rank::SeasonedAdventurer,
            s if s >= 250 => Rank::NoviceExplorer,
            _ => Rank::Beginner,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rank::Beginner => "Beginner",
            Rank::NoviceExplorer => "Novice Explorer",
            Rank::SeasonedAdventurer => "Seasoned Adventurer",
            Rank::ExpertExplorer => "Expert Explorer",
            Rank::AdventureMaster => "Adventure Master",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackResult {
    pub damage: u32,
    pub critical: bool,
    /// The monster is (now or already) out of the fight.
    pub defeated: bool,
    pub health_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    /// Carried items in pickup order.
    pub inventory: Vec<Item>,
    pub room: RoomId,
    pub score: u32,
    pub max_weight: u32,
    pub attack_power: u32,
    pub critical_chance_percent: u8,
}

impl Player {
    pub fn new(name: impl Into<String>, room: RoomId, rules: &Rules) -> Self {
        Player {
            name: name.into(),
            health: rules.max_health,
            max_health: rules.max_health,
            inventory: Vec::new(),
            room,
            score: 0,
            max_weight: rules.max_carry_weight,
            attack_power: rules.attack_power,
            critical_chance_percent: rules.critical_chance_percent,
        }
    }

    pub fn inventory_weight(&self) -> u32 {
        self.inventory.iter().map(|i| i.weight).sum()
    }

    pub fn can_carry(&self, item: &Item) -> bool {
        self.inventory_weight().saturating_add(item.weight) <= self.max_weight
    }

    /// Hands the item back if it would break the weight limit or is already carried.
    pub fn add_to_inventory(&mut self, item: Item) -> Result<(), Item> {
        if !self.can_carry(&item) || self.carried(&item.name).is_some() {
            return Err(item);
        }
        self.inventory.push(item);
        Ok(())
    }

    pub fn remove_from_inventory(&mut self, name: &str) -> Option<Item> {
        let key = name_key(name);
        let idx = self
            .inventory
            .iter()
            .position(|i| name_key(&i.name) == key)?;
        Some(self.inventory.remove(idx))
    }

    pub fn carried(&self, name: &str) -> Option<&Item> {
        self.inventory.iter().find(|i| i.is_named(name))
    }

    pub fn carried_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.inventory.iter_mut().find(|i| i.is_named(name))
    }

    /// Returns the damage actually absorbed. Health never drops below zero.
    pub fn take_damage(&mut self, amount: i32) -> Result<u32, EngineError> {
        let amount = u32::try_from(amount).map_err(|_| EngineError::NegativeDamage(amount))?;
        Ok(self.suffer(amount))
    }

    pub fn suffer(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.health);
        self.health -= taken;
        debug!(player = %self.name, taken, health = self.health, "player took damage");
        taken
    }

    pub fn is_asleep(&self) -> bool {
        self.health == 0
    }

    pub fn health_status(&self) -> HealthStatus {
        match self.health {
            0 => HealthStatus::Asleep,
            h if h < 40 => HealthStatus::Woozy,
            h if h < 70 => HealthStatus::Fatigued,
            _ => HealthStatus::Awake,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn rank(&self) -> Rank {
        Rank::for_score(self.score)
    }

    /// One blow against the monster. Critical hits double the damage.
    pub fn attack(&self, monster: &mut Monster, rng: &mut GameRng) -> AttackResult {
        if !monster.active {
            return AttackResult {
                damage: 0,
                critical: false,
                defeated: true,
                health_remaining: monster.health,
            };
        }

        let critical = rng.percent(self.critical_chance_percent);
        let damage = if critical {
            self.attack_power.saturating_mul(2)
        } else {
            self.attack_power
        };
        let defeated = monster.take_hit(damage);

        AttackResult {
            damage,
            critical,
            defeated,
            health_remaining: monster.health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("Tester", 1, &Rules::default())
    }

    fn item(name: &str, weight: u32) -> Item {
        Item {
            name: name.to_string(),
            weight,
            max_uses: 1,
            uses_remaining: 1,
            points: 0,
            use_text: String::new(),
            desc: String::new(),
            scored: false,
        }
    }

    fn monster(health: u32) -> Monster {
        Monster {
            name: "Goblin".into(),
            active: true,
            can_attack: true,
            damage: 5,
            attack_text: String::new(),
            desc: String::new(),
            effect: String::new(),
            points: 20,
            solution: "sword".into(),
            target: None,
            health,
            max_health: health,
        }
    }

    #[test]
    fn weight_limit_is_inclusive() {
        let mut p = player();
        assert!(p.add_to_inventory(item("anvil", 10)).is_ok());
        assert!(p.add_to_inventory(item("brick", 3)).is_ok());
        assert_eq!(p.inventory_weight(), 13);

        let rejected = p.add_to_inventory(item("feather", 1)).unwrap_err();
        assert_eq!(rejected.name, "feather");
        assert_eq!(p.inventory.len(), 2);
    }

    #[test]
    fn inventory_keeps_pickup_order() {
        let mut p = player();
        for name in ["c", "a", "b"] {
            p.add_to_inventory(item(name, 1)).unwrap();
        }
        let names: Vec<_> = p.inventory.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut p = player();
        p.add_to_inventory(item("Key", 1)).unwrap();
        assert!(p.remove_from_inventory("gem").is_none());
        assert_eq!(p.remove_from_inventory("KEY").unwrap().name, "Key");
        assert!(p.inventory.is_empty());
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut p = player();
        p.add_to_inventory(item("key", 1)).unwrap();
        assert!(p.add_to_inventory(item("KEY", 1)).is_err());
    }

    #[test]
    fn negative_damage_is_an_error() {
        let mut p = player();
        assert_eq!(p.take_damage(-1), Err(EngineError::NegativeDamage(-1)));
        assert_eq!(p.health, 100);
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut p = player();
        assert_eq!(p.take_damage(70).unwrap(), 70);
        assert_eq!(p.take_damage(70).unwrap(), 30);
        assert_eq!(p.health, 0);
        assert!(p.is_asleep());
    }

    #[test]
    fn health_bands() {
        let mut p = player();
        let cases = [
            (100, HealthStatus::Awake),
            (70, HealthStatus::Awake),
            (69, HealthStatus::Fatigued),
            (40, HealthStatus::Fatigued),
            (39, HealthStatus::Woozy),
            (1, HealthStatus::Woozy),
            (0, HealthStatus::Asleep),
        ];
        for (health, status) in cases {
            p.health = health;
            assert_eq!(p.health_status(), status, "health {health}");
        }
        assert_eq!(HealthStatus::Asleep.to_string(), "ASLEEP");
    }

    #[test]
    fn rank_thresholds() {
        assert_eq!(Rank::for_score(0), Rank::Beginner);
        assert_eq!(Rank::for_score(249), Rank::Beginner);
        assert_eq!(Rank::for_score(250), Rank::NoviceExplorer);
        assert_eq!(Rank::for_score(500), Rank::SeasonedAdventurer);
        assert_eq!(Rank::for_score(750), Rank::ExpertExplorer);
        assert_eq!(Rank::for_score(1000).to_string(), "Adventure Master");
    }

    #[test]
    fn attack_without_crit_deals_base_damage() {
        let mut p = player();
        p.critical_chance_percent = 0;
        let mut m = monster(25);
        let mut rng = GameRng::new(3);

        let r = p.attack(&mut m, &mut rng);
        assert_eq!(r.damage, 10);
        assert!(!r.critical);
        assert!(!r.defeated);
        assert_eq!(r.health_remaining, 15);
    }

    #[test]
    fn critical_doubles_and_defeats() {
        let mut p = player();
        p.critical_chance_percent = 100;
        let mut m = monster(20);
        let mut rng = GameRng::new(3);

        let r = p.attack(&mut m, &mut rng);
        assert_eq!(r.damage, 20);
        assert!(r.critical);
        assert!(r.defeated);
        assert!(!m.active);
    }

    #[test]
    fn attacking_defeated_monster_is_noop() {
        let p = player();
        let mut m = monster(10);
        m.defeat();
        let r = p.attack(&mut m, &mut GameRng::new(1));
        assert_eq!(
            r,
            AttackResult {
                damage: 0,
                critical: false,
                defeated: true,
                health_remaining: 0
            }
        );
    }
}
