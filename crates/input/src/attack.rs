/// Cooldown gate deciding whether a held (or auto) attack may fire this tick.
///
/// The timer is charged by the cooldown each time an attack fires and drains by
/// one tick delta every simulation step, networked or not.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackGate {
    cooldown: f32,
    timer: f32,
    auto_attack: bool,
}

impl Default for AttackGate {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl AttackGate {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            timer: 0.0,
            auto_attack: false,
        }
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Change the cooldown. An already charged timer keeps draining at its current value.
    pub fn set_cooldown(&mut self, cooldown: f32) {
        self.cooldown = cooldown;
    }

    pub fn auto_attack(&self) -> bool {
        self.auto_attack
    }

    pub fn set_auto_attack(&mut self, enabled: bool) {
        self.auto_attack = enabled;
    }

    pub fn toggle_auto_attack(&mut self) -> bool {
        self.auto_attack = !self.auto_attack;
        tracing::debug!(auto_attack = self.auto_attack, "auto attack toggled");
        self.auto_attack
    }

    /// Cooldown has elapsed.
    pub fn ready(&self) -> bool {
        self.timer <= 0.0
    }

    /// An attack may fire now: requested (held or auto), weapon equipped, cooldown elapsed.
    pub fn eligible(&self, attack_held: bool, weapon_equipped: bool) -> bool {
        (attack_held || self.auto_attack) && weapon_equipped && self.ready()
    }

    /// Charge the timer after an attack fired.
    pub fn fire(&mut self) {
        self.timer += self.cooldown;
    }

    /// Drain the timer by one simulation step.
    pub fn tick(&mut self, tick_delta: f32) {
        if self.timer > 0.0 {
            self.timer -= tick_delta;
        }
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }
}
