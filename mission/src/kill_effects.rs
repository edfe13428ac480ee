use {
    crate::AgentRecord,
    hero_components::SkillSet,
    mission_events::AgentState,
    serde::{Deserialize, Serialize},
};

/// Tunables for kill and death rewards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillRewardConfig {
    #[serde(default)]
    pub gold_per_kill: i64,
    #[serde(default)]
    pub heal_per_kill: f32,
    #[serde(default)]
    pub xp_per_kill: f32,
    /// Consolation XP granted when the hero goes down.
    #[serde(default)]
    pub xp_per_killed: f32,
    /// Multiplier applied to every gain for subscribers.
    #[serde(default = "one")]
    pub sub_boost: f32,
    /// Strength of victim-level scaling, 0 disables it.
    #[serde(default)]
    pub relative_level_scaling: f32,
    /// Upper bound on the level scaling factor.
    #[serde(default = "default_scaling_cap")]
    pub level_scaling_cap: f32,
    /// Per-skill XP ceiling, `None` for unlimited.
    #[serde(default)]
    pub xp_cap: Option<f32>,
}

fn one() -> f32 {
    1.0
}

fn default_scaling_cap() -> f32 {
    5.0
}

impl Default for KillRewardConfig {
    fn default() -> Self {
        Self {
            gold_per_kill: 0,
            heal_per_kill: 0.0,
            xp_per_kill: 0.0,
            xp_per_killed: 0.0,
            sub_boost: 1.0,
            relative_level_scaling: 0.0,
            level_scaling_cap: default_scaling_cap(),
            xp_cap: None,
        }
    }
}

/// Reward multiplier for beating someone above your level. The level
/// gap is clamped to 31 so the base never reaches zero; `n` in 0..=1
/// sets how steep the curve is, and the result never exceeds `cap`.
/// Gaps of zero or below always yield 1.
pub fn relative_level_scaling(own_level: i32, victim_level: i32, n: f32, cap: f32) -> f32 {
    let diff = (victim_level - own_level).clamp(0, 31);
    let base = 1.0 - diff as f32 / 32.0;
    base.powf(-10.0 * n.clamp(0.0, 1.0)).min(cap)
}

/// Apply one kill's worth of rewards to the killer. Returns the lines
/// describing what happened, already ordered for display: the verb
/// line, then each gain, then the multipliers that shaped them.
#[allow(clippy::too_many_arguments)]
pub fn apply_kill_effects(
    own_level: i32,
    gold: &mut i64,
    skills: &mut SkillSet,
    agent: Option<&mut AgentRecord>,
    victim: Option<&AgentRecord>,
    state: AgentState,
    cfg: &KillRewardConfig,
    subscriber: bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    match victim {
        Some(v) => lines.push(format!("{} {}", state.verb(), v.name)),
        None => lines.push(state.verb().to_string()),
    }

    let sub_boost = if subscriber { cfg.sub_boost } else { 1.0 };
    let (scaling, level_diff) = match victim {
        Some(v) if cfg.relative_level_scaling > 0.0 => (
            relative_level_scaling(
                own_level,
                v.level,
                cfg.relative_level_scaling,
                cfg.level_scaling_cap,
            ),
            v.level - own_level,
        ),
        _ => (1.0, 0),
    };

    let gold_gain = (cfg.gold_per_kill as f32 * sub_boost * scaling) as i64;
    if gold_gain != 0 {
        *gold += gold_gain;
        lines.push(format!("+{gold_gain} gold"));
    }

    let heal_gain = cfg.heal_per_kill * sub_boost * scaling;
    if heal_gain != 0.0
        && let Some(agent) = agent
    {
        let before = agent.health;
        agent.heal(heal_gain);
        let healed = agent.health - before;
        if healed > 0.5 {
            lines.push(format!("+{healed:.0}hp"));
        }
    }

    let xp_gain = cfg.xp_per_kill * sub_boost * scaling;
    if xp_gain > 0.0
        && let Some(grant) = skills.improve(xp_gain, cfg.xp_cap)
    {
        lines.push(grant);
    }

    // Multipliers are only worth mentioning when they shaped a gain;
    // the verb line alone stays bare.
    let gained = lines.len() > 1;
    if gained && sub_boost != 1.0 {
        lines.push(format!("x{sub_boost:.1} (sub)"));
    }
    if gained && scaling != 1.0 {
        lines.push(format!("x{scaling:.1} (lvl diff {level_diff})"));
    }

    lines
}

/// Consolation applied to a hero that went down. No level scaling; the
/// hero already paid for the mismatch.
pub fn apply_killed_effects(
    skills: &mut SkillSet,
    cfg: &KillRewardConfig,
    subscriber: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    let sub_boost = if subscriber { cfg.sub_boost } else { 1.0 };

    let xp_gain = cfg.xp_per_killed * sub_boost;
    if xp_gain > 0.0
        && let Some(grant) = skills.improve(xp_gain, cfg.xp_cap)
    {
        lines.push(grant);
    }
    if !lines.is_empty() && sub_boost != 1.0 {
        lines.push(format!("x{sub_boost:.1} (sub)"));
    }

    lines
}
