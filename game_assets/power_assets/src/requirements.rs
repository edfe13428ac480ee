use {
    hero_components::HeroSnapshot,
    serde::{Deserialize, Serialize},
};

/// Gate on a hero's progression before a group member applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Requirement {
    MinLevel(i32),
    MaxLevel(i32),
    MinGold(i64),
    /// Named counter from the hero's achievement statistics, e.g.
    /// `"kills"` or `"tournament_wins"`.
    MinStat { stat: String, value: u32 },
}

impl Requirement {
    pub fn is_met(&self, hero: &HeroSnapshot) -> bool {
        match self {
            Requirement::MinLevel(min) => hero.level >= *min,
            Requirement::MaxLevel(max) => hero.level <= *max,
            Requirement::MinGold(min) => hero.gold >= *min,
            Requirement::MinStat { stat, value } => hero.counter(stat) >= *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(level: i32, gold: i64) -> HeroSnapshot {
        HeroSnapshot { level, gold, counters: Default::default() }
    }

    #[test]
    fn level_bounds() {
        assert!(Requirement::MinLevel(5).is_met(&snapshot(5, 0)));
        assert!(!Requirement::MinLevel(5).is_met(&snapshot(4, 0)));
        assert!(Requirement::MaxLevel(10).is_met(&snapshot(10, 0)));
        assert!(!Requirement::MaxLevel(10).is_met(&snapshot(11, 0)));
    }

    #[test]
    fn stat_counter_gate() {
        let mut hero = snapshot(1, 0);
        hero.counters.insert("kills".into(), 3);
        let req = Requirement::MinStat { stat: "kills".into(), value: 3 };
        assert!(req.is_met(&hero));
        let req = Requirement::MinStat { stat: "kills".into(), value: 4 };
        assert!(!req.is_met(&hero));
    }
}
