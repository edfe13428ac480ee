use {bevy::prelude::*, std::collections::HashMap};

/// Campaign skill values by skill name. XP is applied with
/// [`SkillSet::improve`], which mirrors the auto skill-improvement rule:
/// XP goes to the hero's best improvable skill, and improvement stops at
/// the configured cap.
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct SkillSet {
    pub xp: HashMap<String, f32>,
}

impl SkillSet {
    pub fn with(skills: &[(&str, f32)]) -> Self {
        Self {
            xp: skills.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Adds `amount` XP to the highest skill still below `cap`.
    /// Returns a description of what improved, or `None` when every
    /// skill is already capped (partial success is a capped grant).
    pub fn improve(&mut self, amount: f32, cap: Option<f32>) -> Option<String> {
        let target = self
            .xp
            .iter()
            .filter(|&(_, &xp)| cap.is_none_or(|c| xp < c))
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, _)| name.clone())?;

        let xp = self.xp.get_mut(&target)?;
        let granted = match cap {
            Some(c) => (c - *xp).min(amount),
            None => amount,
        };
        *xp += granted;
        if granted < amount {
            Some(format!("+{granted:.0}xp {target} (capped)"))
        } else {
            Some(format!("+{granted:.0}xp {target}"))
        }
    }
}
