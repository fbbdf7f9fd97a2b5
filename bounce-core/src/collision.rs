//! Pairwise overlap test and collision response.
//!
//! The response re-projects each body's speed onto the other body's
//! heading rather than applying an elastic impulse. Headings are taken
//! from `atan(vy / vx)`, which only spans a half-plane, so a sign pass
//! afterwards restores the travel direction per axis.

use crate::{body::Body, types::BodyId};
use glam::Vec2;

/// Returns `true` if the discs touch or overlap (boundary inclusive).
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.pos.distance(b.pos) <= a.radius + b.radius
}

/// Unit vector from `a` towards `b`, or `+x` when the points coincide.
pub fn separation_axis(a: Vec2, b: Vec2) -> Vec2 {
    let d = b - a;
    let len = d.length();
    if len == 0.0 { Vec2::X } else { d / len }
}

/// Moves `b` along the line from `a` so the centers are
/// `a.radius + b.radius + 1` apart. `a` stays put.
pub fn separate(a: &Body, b: &mut Body) {
    let axis = separation_axis(a.pos, b.pos);
    b.pos = a.pos + axis * (a.radius + b.radius + 1.0);
}

/// Unit heading `(cos θ, sin θ)` with `θ = atan(v.y / v.x)`.
///
/// A zero x-component with non-zero y gives `θ = ±π/2`, returned as an
/// exact vertical axis. A zero velocity has no heading and falls back
/// to `+x`.
fn heading(v: Vec2) -> Vec2 {
    if v.x != 0.0 {
        let theta = (v.y / v.x).atan();
        Vec2::new(theta.cos(), theta.sin())
    } else if v.y != 0.0 {
        Vec2::new(0.0, v.y.signum())
    } else {
        Vec2::X
    }
}

/// Flips `value` if `source` is strictly signed and disagrees with it.
#[inline]
fn match_sign(value: f32, source: f32) -> f32 {
    if (source > 0.0 && value < 0.0) || (source < 0.0 && value > 0.0) {
        -value
    } else {
        value
    }
}

/// Computes post-collision velocities for a pair.
///
/// Each body keeps its own speed but takes the other body's heading.
/// Every resulting component then takes the sign of the other body's
/// original component on the same axis (zero components leave the
/// sign alone).
///
/// ### Parameters
/// - `va` - Velocity of the first body before the collision.
/// - `vb` - Velocity of the second body before the collision.
///
/// ### Returns
/// The new `(va, vb)`.
pub fn exchange_velocities(va: Vec2, vb: Vec2) -> (Vec2, Vec2) {
    let new_a = heading(vb) * va.length();
    let new_b = heading(va) * vb.length();

    (
        Vec2::new(match_sign(new_a.x, vb.x), match_sign(new_a.y, vb.y)),
        Vec2::new(match_sign(new_b.x, va.x), match_sign(new_b.y, va.y)),
    )
}

/// Resolves one detected collision: separates `b` from `a`, exchanges
/// velocities and flags both bodies.
pub fn resolve(a: &mut Body, b: &mut Body) {
    separate(a, b);

    let (va, vb) = exchange_velocities(a.vel, b.vel);
    a.vel = va;
    b.vel = vb;

    a.flagged = true;
    b.flagged = true;
}

/// Two distinct mutable bodies out of one slice.
fn pair_mut(bodies: &mut [Body], i: BodyId, j: BodyId) -> Option<(&mut Body, &mut Body)> {
    if i == j || i.max(j) >= bodies.len() {
        return None;
    }
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        Some((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        Some((&mut hi[0], &mut lo[j]))
    }
}

/// Tests every unordered pair of `ids` once and resolves the ones that
/// overlap.
///
/// Pairs are visited in list order, `(ids[n], ids[m])` with `n < m`, and
/// the earlier id plays the stationary role in [`resolve`]. Ids of both
/// bodies of each colliding pair are appended to `hits`.
///
/// ### Returns
/// Number of pairs tested.
pub fn collide_group(ids: &[BodyId], bodies: &mut [Body], hits: &mut Vec<BodyId>) -> usize {
    let mut tested = 0;
    for (n, &i) in ids.iter().enumerate() {
        for &j in &ids[n + 1..] {
            tested += 1;
            let Some((a, b)) = pair_mut(bodies, i, j) else {
                continue;
            };
            if overlaps(a, b) {
                resolve(a, b);
                hits.extend([i, j]);
            }
        }
    }
    tested
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn disc(x: f32, y: f32, radius: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::ZERO, radius)
    }

    #[test]
    fn touching_discs_overlap() {
        // 6-8-10 triangle: distance is exactly the radius sum.
        assert!(overlaps(&disc(0.0, 0.0, 4.0), &disc(6.0, 8.0, 6.0)));
        assert!(overlaps(&disc(0.0, 0.0, 5.0), &disc(10.0, 0.0, 5.0)));
        assert!(!overlaps(&disc(0.0, 0.0, 5.0), &disc(10.01, 0.0, 5.0)));
    }

    #[test]
    fn separate_restores_gap_along_original_axis() {
        let a = disc(10.0, 10.0, 5.0);
        let mut b = disc(13.0, 14.0, 5.0);

        separate(&a, &mut b);

        assert_relative_eq!(a.pos.distance(b.pos), 11.0, epsilon = 1e-4);
        let axis = separation_axis(a.pos, b.pos);
        assert_relative_eq!(axis.x, 0.6, epsilon = 1e-5);
        assert_relative_eq!(axis.y, 0.8, epsilon = 1e-5);
        assert_eq!(a.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn coincident_centers_separate_along_x() {
        let a = disc(30.0, 40.0, 3.0);
        let mut b = disc(30.0, 40.0, 4.0);

        separate(&a, &mut b);

        assert_eq!(b.pos, Vec2::new(38.0, 40.0));
    }

    #[test]
    fn head_on_exchange_reverses_both() {
        let (va, vb) = exchange_velocities(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0));
        assert_eq!(va, Vec2::new(-1.0, 0.0));
        assert_eq!(vb, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn exchange_keeps_speed_and_takes_other_heading() {
        let old_a = Vec2::new(3.0, 4.0);
        let old_b = Vec2::new(-1.0, 1.0);
        let (va, vb) = exchange_velocities(old_a, old_b);

        let h = std::f32::consts::FRAC_1_SQRT_2 * 5.0;
        assert_relative_eq!(va.x, -h, epsilon = 1e-5);
        assert_relative_eq!(va.y, h, epsilon = 1e-5);
        assert_relative_eq!(vb.x, 0.6 * 2f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(vb.y, 0.8 * 2f32.sqrt(), epsilon = 1e-5);

        assert_relative_eq!(va.length(), old_a.length(), epsilon = 1e-5);
        assert_relative_eq!(vb.length(), old_b.length(), epsilon = 1e-5);
    }

    #[test]
    fn sign_correction_follows_other_body() {
        let old_a = Vec2::new(2.0, -3.0);
        let old_b = Vec2::new(-4.0, -1.0);
        let (va, vb) = exchange_velocities(old_a, old_b);

        assert_eq!(va.x.signum(), old_b.x.signum());
        assert_eq!(va.y.signum(), old_b.y.signum());
        assert_eq!(vb.x.signum(), old_a.x.signum());
        assert_eq!(vb.y.signum(), old_a.y.signum());
    }

    #[test]
    fn vertical_velocity_uses_exact_vertical_heading() {
        let (va, vb) = exchange_velocities(Vec2::new(0.0, 2.0), Vec2::new(3.0, 0.0));
        assert_eq!(va, Vec2::new(2.0, 0.0));
        assert_eq!(vb, Vec2::new(0.0, 3.0));

        let (_, vb) = exchange_velocities(Vec2::new(0.0, -2.0), Vec2::new(3.0, 0.0));
        assert_eq!(vb, Vec2::new(0.0, -3.0));
    }

    #[test]
    fn stationary_bodies_stay_finite() {
        let (va, vb) = exchange_velocities(Vec2::ZERO, Vec2::ZERO);
        assert_eq!(va, Vec2::ZERO);
        assert_eq!(vb, Vec2::ZERO);

        let (va, vb) = exchange_velocities(Vec2::new(2.0, 0.0), Vec2::ZERO);
        assert_eq!(va, Vec2::new(2.0, 0.0));
        assert_eq!(vb, Vec2::ZERO);
    }

    #[test]
    fn resolve_flags_both_bodies() {
        let mut a = disc(0.0, 0.0, 5.0);
        let mut b = disc(3.0, 0.0, 5.0);
        a.vel = Vec2::new(1.0, 1.0);
        b.vel = Vec2::new(-1.0, 1.0);

        resolve(&mut a, &mut b);

        assert!(a.flagged && b.flagged);
        assert_eq!(b.pos, Vec2::new(11.0, 0.0));
    }

    #[test]
    fn collide_group_tests_each_pair_once() {
        let mut bodies = vec![
            disc(0.0, 0.0, 2.0),
            disc(100.0, 100.0, 2.0),
            disc(3.0, 0.0, 2.0),
            disc(50.0, 50.0, 2.0),
        ];
        let mut hits = Vec::new();

        let tested = collide_group(&[0, 1, 2], &mut bodies, &mut hits);

        assert_eq!(tested, 3);
        assert_eq!(hits, vec![0, 2]);
        assert!(bodies[0].flagged && bodies[2].flagged);
        assert!(!bodies[1].flagged && !bodies[3].flagged);
        assert_eq!(bodies[2].pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn collide_group_ignores_bad_ids() {
        let mut bodies = vec![disc(0.0, 0.0, 2.0)];
        let mut hits = Vec::new();

        assert_eq!(collide_group(&[0, 0, 9], &mut bodies, &mut hits), 3);
        assert!(hits.is_empty());
    }
}
