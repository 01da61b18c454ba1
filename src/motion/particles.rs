use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::f64::consts::PI;

const DRAG: f64 = 0.98;
const GRAVITY: f64 = 0.1;
const UPWARD_BIAS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    Circle,
    Star,
    Dot,
}

const SHAPES: [ParticleShape; 3] = [ParticleShape::Circle, ParticleShape::Star, ParticleShape::Dot];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: String,
    pub size: f64,
    pub life: u32, // frames left
    pub shape: ParticleShape,
}

#[derive(Debug, Clone)]
pub struct BurstOptions {
    pub count: usize,
    pub colors: Vec<String>,
    pub max_life: u32,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            count: 15,
            colors: ["#FF3333", "#FF5555", "#FF8888", "#FFFFFF"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            max_life: 60,
        }
    }
}

// Uniform in [min, max); tolerates min == max
fn between<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen_range(0.0..1.0) * (max - min)
}

/// Hover burst: particles fly out from a point, slow down and fall.
#[derive(Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    next_id: u64,
    options: BurstOptions,
}

impl ParticleSystem {
    pub fn new(options: BurstOptions) -> Self {
        Self {
            particles: Vec::new(),
            next_id: 0,
            options,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_idle(&self) -> bool {
        self.particles.is_empty()
    }

    // Spawn `count` particles (the configured count when None) at (x, y)
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, x: f64, y: f64, count: Option<usize>) {
        let count = count.unwrap_or(self.options.count);
        for _ in 0..count {
            let angle = between(rng, 0.0, PI * 2.0);
            let speed = between(rng, 1.0, 3.0);
            let color = self
                .options
                .colors
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "#FFFFFF".to_string());
            let shape = *SHAPES.choose(rng).unwrap_or(&ParticleShape::Circle);

            self.particles.push(Particle {
                id: self.next_id,
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed - UPWARD_BIAS,
                color,
                size: between(rng, 2.0, 6.0),
                life: self.options.max_life,
                shape,
            });
            self.next_id += 1;
        }
    }

    /// Advance one frame. Returns whether anything is still alive.
    pub fn step(&mut self) -> bool {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= DRAG;
            p.vy += GRAVITY;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
        !self.particles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldShape {
    Circle,
    Square,
}

// One drifting background particle, positions in percent of the container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldParticle {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    pub duration: f64, // seconds per drift cycle
    pub delay: f64,    // seconds
    pub shape: FieldShape,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldOptions {
    pub count: usize,
    pub size: (f64, f64),
    pub opacity: (f64, f64),
    pub duration: (f64, f64),
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            count: 80,
            size: (4.0, 8.0),
            opacity: (0.15, 0.4),
            duration: (3.0, 8.0),
        }
    }
}

pub fn ambient_field<R: Rng>(rng: &mut R, options: &FieldOptions) -> Vec<FieldParticle> {
    (0..options.count)
        .map(|id| FieldParticle {
            id,
            x: between(rng, 0.0, 100.0),
            y: between(rng, 0.0, 100.0),
            size: between(rng, options.size.0, options.size.1),
            opacity: between(rng, options.opacity.0, options.opacity.1),
            duration: between(rng, options.duration.0, options.duration.1),
            delay: between(rng, 0.0, 3.0),
            shape: if rng.gen_bool(0.5) { FieldShape::Circle } else { FieldShape::Square },
        })
        .collect()
}
