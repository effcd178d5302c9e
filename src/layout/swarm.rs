// Particle simulation behind the beeswarm layout.
//
// Each tick: decay alpha, apply the x and y pulls (scaled by alpha), resolve
// collisions on predicted positions (not scaled), then damp and integrate
// velocities. Pairs are visited once, lower index first, so the result is a
// pure function of the inputs.

use super::spatial_grid::SpatialGrid;
use super::{ForceConfig, Point};

/// Working copy of one record inside a single layout pass.
#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: Point,
    vx: f64,
    vy: f64,
    target_x: f64,
}

impl Particle {
    fn predicted(&self) -> Point {
        Point { x: self.pos.x + self.vx, y: self.pos.y + self.vy }
    }
}

/// Lay out one particle per target x around the line `y = center_y`.
///
/// Runs `targets.len() * cfg.ticks_per_record` ticks. The output has one
/// position per target, in input order.
pub fn layout_swarm(targets: &[f64], center_y: f64, cfg: &ForceConfig) -> Vec<Point> {
    match targets {
        [] => return Vec::new(),
        [x] => return vec![Point { x: *x, y: center_y }],
        _ => {}
    }

    let mut particles = seed(targets, center_y, cfg.initial_radius);
    let ticks = cfg.total_ticks(particles.len());
    let decay = cfg.alpha_decay();
    let mut alpha = 1.0;
    let mut grid = SpatialGrid::new(cfg.collision_diameter());

    for _ in 0..ticks {
        alpha += (0.0 - alpha) * decay;
        apply_pull(&mut particles, center_y, alpha, cfg);
        apply_collide(&mut particles, &mut grid, cfg);
        for p in &mut particles {
            p.vx *= 1.0 - cfg.velocity_decay;
            p.vy *= 1.0 - cfg.velocity_decay;
            p.pos.x += p.vx;
            p.pos.y += p.vy;
        }
    }

    tracing::debug!(particles = particles.len(), ticks, alpha, "swarm layout finished");
    particles.into_iter().map(|p| p.pos).collect()
}

/// Phyllotaxis offsets around each particle's own target, so no two
/// particles start on the same spot even when their targets coincide.
fn seed(targets: &[f64], center_y: f64, initial_radius: f64) -> Vec<Particle> {
    let angle_step = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    targets
        .iter()
        .enumerate()
        .map(|(i, &target_x)| {
            let radius = initial_radius * (0.5 + i as f64).sqrt();
            let angle = i as f64 * angle_step;
            Particle {
                pos: Point {
                    x: target_x + radius * angle.cos(),
                    y: center_y + radius * angle.sin(),
                },
                vx: 0.0,
                vy: 0.0,
                target_x,
            }
        })
        .collect()
}

fn apply_pull(particles: &mut [Particle], center_y: f64, alpha: f64, cfg: &ForceConfig) {
    for p in particles {
        p.vx += (p.target_x - p.pos.x) * cfg.x_strength * alpha;
        p.vy += (center_y - p.pos.y) * cfg.y_strength * alpha;
    }
}

fn apply_collide(particles: &mut [Particle], grid: &mut SpatialGrid, cfg: &ForceConfig) {
    let diameter = cfg.collision_diameter();
    let diameter_sq = diameter * diameter;

    grid.clear();
    for (i, p) in particles.iter().enumerate() {
        grid.insert(i, p.predicted());
    }

    for i in 0..particles.len() {
        // Snapshot of i's prediction; j's is read live.
        let pi = particles[i].predicted();
        for j in grid.neighbors(pi) {
            if j <= i {
                continue;
            }
            let pj = particles[j].predicted();
            let mut dx = pi.x - pj.x;
            let mut dy = pi.y - pj.y;
            let mut dist_sq = dx * dx + dy * dy;
            if dist_sq >= diameter_sq {
                continue;
            }
            if dx == 0.0 {
                dx = nudge(i, j);
                dist_sq += dx * dx;
            }
            if dy == 0.0 {
                dy = nudge(j, i);
                dist_sq += dy * dy;
            }
            let dist = dist_sq.sqrt();
            let k = (diameter - dist) / dist * cfg.collide_strength;
            // Equal radii: each particle takes half the correction.
            let (sx, sy) = (dx * k * 0.5, dy * k * 0.5);
            particles[i].vx += sx;
            particles[i].vy += sy;
            particles[j].vx -= sx;
            particles[j].vy -= sy;
        }
    }
}

/// Tiny deterministic offset separating coincident centers.
fn nudge(a: usize, b: usize) -> f64 {
    if (a + b) % 2 == 0 { 1e-6 } else { -1e-6 }
}
