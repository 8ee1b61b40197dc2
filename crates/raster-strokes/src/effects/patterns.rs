//! Polyline generators, one per effect.
//!
//! Every generator works in surface pixels and clamps each point into the
//! effect area before it is stored.

use std::f64::consts::PI;

use rand::Rng;

use super::{EffectArea, EffectKind, EffectOptions};

pub(super) type Path = Vec<(f64, f64)>;

pub(super) fn stripes(density: f64) -> usize {
    ((density / 12.0).round() as usize).max(3)
}

pub(super) fn arms(mirror: bool) -> usize {
    if mirror {
        4
    } else {
        3
    }
}

fn loops(density: f64) -> usize {
    ((density / 15.0).round() as usize).max(3)
}

pub(super) fn bursts(density: f64) -> usize {
    ((density * 0.8).round() as usize).max(12)
}

pub(super) fn rows(density: f64) -> usize {
    ((density / 10.0).round() as usize).max(4)
}

/// All polylines for `kind`, mirrored passes directly after their source.
pub(super) fn trace<R: Rng>(
    kind: EffectKind,
    area: &EffectArea,
    options: &EffectOptions,
    rng: &mut R,
) -> Vec<Path> {
    match kind {
        EffectKind::Aurora => aurora(area, options),
        EffectKind::Vortex => vortex(area, options),
        EffectKind::Firefly => firefly(area, options, rng),
        EffectKind::Cascade => cascade(area, options, rng),
    }
}

/// Stacked horizontal sine ribbons, each wider than the one above.
fn aurora(area: &EffectArea, options: &EffectOptions) -> Vec<Path> {
    let stripes = stripes(options.density);
    let (width, height) = (area.width.max(1.0), area.height.max(1.0));
    let base_amplitude = (height / ((stripes * 2) as f64).max(6.0)).max(4.0);
    let steps = ((width / 3.0).round() as usize).max(60);

    let mut paths = Vec::with_capacity(stripes * 2);
    for lane in 0..stripes {
        let lane = lane as f64;
        let amplitude = base_amplitude * (1.0 + lane / (stripes as f64 * 1.25));
        let frequency = 1.6 + lane * 0.35;
        let center_y = area.y + height / (stripes + 1) as f64 * (lane + 0.6);

        let path: Path = (0..=steps)
            .map(|step| {
                let t = step as f64 / steps as f64;
                let mut y = center_y + (t * PI * frequency + lane * 0.4).sin() * amplitude;
                if options.jitter {
                    y += (t * PI * 6.0 + lane).cos() * amplitude * 0.18;
                }
                area.clamp((area.x + t * width, y))
            })
            .collect();

        if options.mirror {
            let mirrored = path
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    let wobble = if options.jitter {
                        (i as f64 * 0.25).sin() * amplitude * 0.08
                    } else {
                        0.0
                    };
                    area.clamp((area.mirror_x(x), y + wobble))
                })
                .collect();
            paths.push(path);
            paths.push(mirrored);
        } else {
            paths.push(path);
        }
    }
    paths
}

/// Spiral arms winding out from the area center.
fn vortex(area: &EffectArea, options: &EffectOptions) -> Vec<Path> {
    let arms = arms(options.mirror);
    let loops = loops(options.density);
    let steps = loops * 160;
    let center_x = area.x + area.width / 2.0;
    let center_y = area.y + area.height / 2.0;
    let max_radius = area.width.min(area.height) / 2.0;
    let squash = if options.mirror { 0.9 } else { 1.0 };

    (0..arms)
        .map(|arm| {
            let phase = 2.0 * PI * arm as f64 / arms as f64;
            (0..=steps)
                .map(|step| {
                    let t = step as f64 / steps as f64;
                    let angle = t * loops as f64 * PI * 2.0 + phase;
                    let mut radius = max_radius * t.powf(0.9);
                    if options.jitter {
                        radius += (angle * 0.6).sin() * radius * 0.08;
                    }
                    area.clamp((
                        center_x + angle.cos() * radius,
                        center_y + angle.sin() * radius * squash,
                    ))
                })
                .collect()
        })
        .collect()
}

/// Short curved flutters from random origins.
fn firefly<R: Rng>(area: &EffectArea, options: &EffectOptions, rng: &mut R) -> Vec<Path> {
    let bursts = bursts(options.density);
    let mut paths = Vec::with_capacity(bursts * 2);

    for _ in 0..bursts {
        let origin_x = area.x + rng.gen::<f64>() * area.width;
        let origin_y = area.y + rng.gen::<f64>() * area.height;
        let heading = rng.gen::<f64>() * PI * 2.0;
        let length = (area.width.min(area.height) * (0.18 + rng.gen::<f64>() * 0.12)).max(10.0);
        let segments = 4 + rng.gen_range(0..4);

        let path: Path = (0..=segments)
            .map(|s| {
                let t = s as f64 / segments as f64;
                let curve = (t * PI).sin();
                let mut x = origin_x + heading.cos() * length * t;
                let mut y = origin_y + heading.sin() * length * t + curve * length * 0.25;
                if options.jitter {
                    x += (rng.gen::<f64>() - 0.5) * length * 0.18;
                    y += (rng.gen::<f64>() - 0.5) * length * 0.12;
                }
                area.clamp((x, y))
            })
            .collect();

        if options.mirror {
            let mirrored = path
                .iter()
                .map(|&(x, y)| area.clamp((area.mirror_x(x), y)))
                .collect();
            paths.push(path);
            paths.push(mirrored);
        } else {
            paths.push(path);
        }
    }
    paths
}

/// Rippling rows that sweep left to right; the mirror flips both axes.
fn cascade<R: Rng>(area: &EffectArea, options: &EffectOptions, rng: &mut R) -> Vec<Path> {
    let rows = rows(options.density);
    let (width, height) = (area.width.max(1.0), area.height.max(1.0));
    let amplitude_base = (height * 0.08).max(6.0);
    let steps = ((width / 4.0).round() as usize).max(80);

    let mut paths = Vec::with_capacity(rows * 2);
    for row in 0..rows {
        let row = row as f64;
        let base_y = area.y + height / (rows + 1) as f64 * (row + 1.0);
        let wave = amplitude_base * (1.0 + row / (rows as f64 * 0.9));

        let path: Path = (0..=steps)
            .map(|step| {
                let t = step as f64 / steps as f64;
                let mut y = base_y + (t * PI * (1.6 + row * 0.25)).sin() * wave;
                if options.jitter {
                    y += (rng.gen::<f64>() - 0.5) * wave * 0.35;
                }
                area.clamp((area.x + t * width, y))
            })
            .collect();

        if options.mirror {
            let mirrored = path
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    let ripple = (i as f64 * 0.08).sin() * wave * 0.12;
                    area.clamp((area.mirror_x(x), area.mirror_y(y) + ripple))
                })
                .collect();
            paths.push(path);
            paths.push(mirrored);
        } else {
            paths.push(path);
        }
    }
    paths
}
