//! End-to-end scenarios for the step driver.

use approx::assert_relative_eq;
use bounce_core::{
    body::Body,
    config::Config,
    phases::{self, StepReport},
    quadtree::QuadTree,
    region::Region,
    simulation::Simulation,
};
use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};

fn head_on_pair() -> Vec<Body> {
    vec![
        Body::new(Vec2::new(10.0, 50.0), Vec2::new(1.0, 0.0), 5.0),
        Body::new(Vec2::new(12.0, 50.0), Vec2::new(-1.0, 0.0), 5.0),
    ]
}

#[test]
fn head_on_pair_is_separated_before_integration() {
    let cfg = Config {
        capacity: 4,
        ..Config::default()
    };
    let mut tree = QuadTree::new(Region::from_dims(Vec2::splat(100.0)).unwrap(), &cfg);
    let mut bodies = head_on_pair();

    assert_eq!(phases::rebuild_phase(&mut tree, &bodies), 2);
    let mut report = StepReport::default();
    phases::collision_phase(&tree, &mut bodies, &mut report);

    assert_eq!(report.collided, vec![0, 1]);
    assert_eq!(bodies[0].pos, Vec2::new(10.0, 50.0));
    assert_eq!(bodies[1].pos, Vec2::new(21.0, 50.0));
    assert_relative_eq!(bodies[0].pos.distance(bodies[1].pos), 11.0);

    // Each velocity takes the sign of the other body's old component.
    assert!(bodies[0].vel.x < 0.0);
    assert!(bodies[1].vel.x > 0.0);
    assert_eq!(bodies[0].vel.y, 0.0);
    assert_eq!(bodies[1].vel.y, 0.0);
}

#[test]
fn head_on_pair_full_step() {
    let mut sim = Simulation::with_bodies(Config::default(), Vec2::splat(100.0), head_on_pair())
        .unwrap();

    let report = sim.step();

    assert_eq!(report.collided, vec![0, 1]);
    let [a, b] = sim.bodies() else {
        panic!("expected two bodies");
    };
    assert_eq!(a.pos, Vec2::new(9.0, 50.0));
    assert_eq!(b.pos, Vec2::new(22.0, 50.0));
    assert_eq!(a.vel, Vec2::new(-1.0, 0.0));
    assert_eq!(b.vel, Vec2::new(1.0, 0.0));
}

#[test]
fn shrinking_the_field_drops_then_recovers_bodies() {
    let bodies = vec![Body::new(Vec2::new(180.0, 100.0), Vec2::new(1.0, 0.0), 4.0)];
    let mut sim = Simulation::with_bodies(Config::default(), Vec2::splat(200.0), bodies).unwrap();

    sim.resize(Vec2::splat(100.0)).unwrap();

    let report = sim.step();
    assert_eq!(report.dropped, 1);
    assert_eq!(sim.bodies()[0].pos.x, 97.0);
    assert_eq!(sim.bodies()[0].vel.x, -1.0);

    let report = sim.step();
    assert_eq!(report.dropped, 0);
    assert_eq!(report.indexed, 1);
}

#[test]
fn long_run_preserves_speeds_and_stays_finite() {
    let mut rng = StdRng::seed_from_u64(2024);
    let dims = Vec2::new(800.0, 600.0);
    let mut sim = Simulation::new(Config::default(), dims).unwrap();
    sim.spawn(2000, &mut rng);

    let speeds: Vec<f32> = sim.bodies().iter().map(|b| b.vel.length()).collect();
    let mut collisions = 0;

    for _ in 0..200 {
        sim.clear_flags();
        let report = sim.step();
        assert_eq!(report.indexed + report.dropped, 2000);
        assert!(report.collided.iter().all(|&id| sim.bodies()[id].flagged));
        collisions += report.collided.len();
    }

    assert!(collisions > 0, "a crowded field should see collisions");
    for (b, &speed) in sim.bodies().iter().zip(&speeds) {
        assert!(b.pos.is_finite() && b.vel.is_finite());
        assert!(b.pos.x > -40.0 && b.pos.x < dims.x + 40.0);
        assert!(b.pos.y > -40.0 && b.pos.y < dims.y + 40.0);
        assert_relative_eq!(b.vel.length(), speed, epsilon = 1e-3, max_relative = 1e-3);
    }
}

#[test]
fn culling_tests_fewer_pairs_than_brute_force() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut sim = Simulation::new(Config::default(), Vec2::new(800.0, 800.0)).unwrap();
    sim.spawn(1000, &mut rng);

    let report = sim.step();

    let brute_force = 1000 * 999 / 2;
    assert!(report.pairs_tested * 100 < brute_force);
    assert!(report.leaves > 1);
}
