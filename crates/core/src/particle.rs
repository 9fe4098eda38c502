//! Transient visual effects. Nothing here feeds back into gameplay.

use glam::Vec2;

const EXPLOSION_TICKS: u32 = 24;
const HURT_TICKS: u32 = 12;
const TEXT_TICKS: u32 = 60;
const TEXT_APPEAR_DELAY: u32 = 10;
const TEXT_RISE_PER_TICK: f32 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub enum ParticleKind {
    Explosion,
    Hurt,
    Text { text: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec2,
    pub velocity: Vec2,
    ticks_existed: u32,
    lifetime: u32,
    appear_delay: u32,
}

impl Particle {
    pub fn explosion(position: Vec2) -> Self {
        Self::still(ParticleKind::Explosion, position, EXPLOSION_TICKS)
    }

    pub fn hurt(position: Vec2) -> Self {
        Self::still(ParticleKind::Hurt, position, HURT_TICKS)
    }

    pub fn text(position: Vec2, text: impl Into<String>) -> Self {
        Self {
            kind: ParticleKind::Text { text: text.into() },
            position,
            velocity: Vec2::new(0.0, TEXT_RISE_PER_TICK),
            ticks_existed: 0,
            lifetime: TEXT_TICKS,
            appear_delay: TEXT_APPEAR_DELAY,
        }
    }

    fn still(kind: ParticleKind, position: Vec2, lifetime: u32) -> Self {
        Self { kind, position, velocity: Vec2::ZERO, ticks_existed: 0, lifetime, appear_delay: 0 }
    }

    pub fn tick(&mut self) {
        self.position += self.velocity;
        self.ticks_existed += 1;
        self.appear_delay = self.appear_delay.saturating_sub(1);
    }

    pub fn should_remove(&self) -> bool {
        self.ticks_existed > self.lifetime
    }

    pub fn is_visible(&self) -> bool {
        self.appear_delay == 0
    }

    pub fn ticks_existed(&self) -> u32 {
        self.ticks_existed
    }
}
