//! Line-clear particle bursts
//!
//! Every cell of a cleared row throws a handful of particles outward in its
//! piece color. Positions are in board cells, so the renderer only has to map
//! them onto the board area.

use crate::board::ClearedRow;
use crate::tetromino::TetrominoType;
use rand::Rng;
use std::time::{Duration, Instant};

const PARTICLES_PER_CELL: usize = 12;
const PARTICLE_LIFETIME: Duration = Duration::from_millis(800);
/// Travel distance range, in cells
const MIN_TRAVEL: f32 = 0.7;
const MAX_TRAVEL: f32 = 2.7;

#[derive(Debug, Clone)]
struct Particle {
    kind: TetrominoType,
    /// Center of the source cell
    origin: (f32, f32),
    /// Total displacement over the particle's life (d_row, d_col)
    travel: (f32, f32),
    born: Instant,
}

/// A particle ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub row: f32,
    pub col: f32,
    pub kind: TetrominoType,
    /// 0.0 when born, 1.0 when it disappears
    pub age: f32,
}

/// Live particles
#[derive(Debug, Default)]
pub struct Effects {
    particles: Vec<Particle>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the burst for one cleared row
    pub fn burst(&mut self, cleared: &ClearedRow, now: Instant) {
        let mut rng = rand::thread_rng();
        let row = cleared.row as f32 + 0.5;
        for (col, kind) in cleared.columns() {
            let origin = (row, col as f32 + 0.5);
            for _ in 0..PARTICLES_PER_CELL {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let distance = rng.gen_range(MIN_TRAVEL..MAX_TRAVEL);
                self.particles.push(Particle {
                    kind,
                    origin,
                    travel: (angle.sin() * distance, angle.cos() * distance),
                    born: now,
                });
            }
        }
    }

    /// Drop particles that have lived out their lifetime
    pub fn update(&mut self, now: Instant) {
        self.particles
            .retain(|p| now.saturating_duration_since(p.born) < PARTICLE_LIFETIME);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Where every live particle is at `now`
    pub fn sparks(&self, now: Instant) -> impl Iterator<Item = Spark> + '_ {
        self.particles.iter().map(move |p| {
            let age = (now.saturating_duration_since(p.born).as_secs_f32()
                / PARTICLE_LIFETIME.as_secs_f32())
            .min(1.0);
            Spark {
                row: p.origin.0 + p.travel.0 * age,
                col: p.origin.1 + p.travel.1 * age,
                kind: p.kind,
                age,
            }
        })
    }
}
