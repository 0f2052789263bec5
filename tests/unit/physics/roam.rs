use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::assets::registry::TextureId;
use crate::foundation::core::Vec2;
use crate::scene::particle::ParticleRole;

fn particle(id: u64, position: Vec3, velocity: Vec3) -> Particle {
    Particle {
        ch: 'A',
        role: ParticleRole::Filler,
        texture: TextureId(id),
        size: Vec2::new(3.0, 5.0),
        position,
        rotation: Vec3::ZERO,
        velocity,
        angular_velocity: Vec3::ZERO,
        scale: 1.0,
        opacity: 1.0,
        target: None,
    }
}

#[test]
fn close_particles_are_pushed_apart() {
    let mut rng = StdRng::seed_from_u64(11);
    let params = RoamParams::default();
    for k in 0..50 {
        let offset = Vec3::new(1.0 + k as f32 * 0.05, 0.5, -0.3);
        let mut ps = vec![
            particle(0, offset, Vec3::ZERO),
            particle(1, Vec3::ZERO, Vec3::ZERO),
        ];
        let normal = (ps[0].position - ps[1].position).normalize();
        step(&mut ps, None, &params, &mut rng);
        let rel = ps[0].velocity - ps[1].velocity;
        assert!(rel.dot(normal) > 0.0, "k={k} rel={rel:?}");
    }
}

#[test]
fn coincident_particles_still_separate() {
    let mut rng = StdRng::seed_from_u64(12);
    let mut ps = vec![
        particle(0, Vec3::ZERO, Vec3::ZERO),
        particle(1, Vec3::ZERO, Vec3::ZERO),
    ];
    step(&mut ps, None, &RoamParams::default(), &mut rng);
    let rel = ps[0].velocity - ps[1].velocity;
    assert!(rel.length() > 0.05);
    assert!(ps.iter().all(|p| p.position.is_finite() && p.velocity.is_finite()));
}

#[test]
fn distant_particles_ignore_each_other() {
    let mut rng = StdRng::seed_from_u64(13);
    let v = Vec3::new(0.2, 0.0, 0.0);
    let mut ps = vec![
        particle(0, Vec3::new(-20.0, 0.0, 0.0), v),
        particle(1, Vec3::new(20.0, 0.0, 0.0), -v),
    ];
    step(&mut ps, None, &RoamParams::default(), &mut rng);
    assert_eq!(ps[0].velocity, v * 0.995);
    assert_eq!(ps[1].velocity, -v * 0.995);
    assert_eq!(ps[0].angular_velocity, Vec3::ZERO);
}

#[test]
fn integrates_velocity_and_spin() {
    let mut rng = StdRng::seed_from_u64(14);
    let mut p = particle(0, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.1, 0.2, 0.3));
    p.angular_velocity = Vec3::new(0.01, 0.02, 0.03);
    let mut ps = vec![p];
    step(&mut ps, None, &RoamParams::default(), &mut rng);
    assert!((ps[0].position - Vec3::new(1.1, 2.2, 3.3)).length() < 1e-6);
    assert!((ps[0].rotation - Vec3::new(0.01, 0.02, 0.03)).length() < 1e-6);
}

#[test]
fn walls_reverse_outbound_velocity() {
    let mut rng = StdRng::seed_from_u64(15);
    let mut ps = vec![particle(
        0,
        Vec3::new(109.9, -69.9, 59.9),
        Vec3::new(0.5, -0.5, 0.5),
    )];
    step(&mut ps, None, &RoamParams::default(), &mut rng);
    let v = ps[0].velocity;
    assert!(v.x < 0.0 && v.y > 0.0 && v.z < 0.0, "{v:?}");
}

#[test]
fn pointer_repels_and_spins() {
    let mut rng = StdRng::seed_from_u64(16);
    let mut ps = vec![particle(0, Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0))];
    step(&mut ps, Some(Vec3::ZERO), &RoamParams::default(), &mut rng);
    // after integration d = 11, force = 24/35
    let force = (35.0 - 11.0) / 35.0;
    let expect_vx = (1.0 + force * 0.05) * 0.995;
    assert!((ps[0].velocity.x - expect_vx).abs() < 1e-5);
    assert!((ps[0].angular_velocity.z - force * 0.01).abs() < 1e-6);

    let mut far = vec![particle(0, Vec3::new(100.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0))];
    step(&mut far, Some(Vec3::ZERO), &RoamParams::default(), &mut rng);
    assert_eq!(far[0].angular_velocity.z, 0.0);
}

#[test]
fn slow_particles_get_bounded_jitter() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut ps = vec![particle(0, Vec3::ZERO, Vec3::ZERO)];
    step(&mut ps, None, &RoamParams::default(), &mut rng);
    let v = ps[0].velocity;
    assert!(v.x.abs() <= 0.005 && v.y.abs() <= 0.005);
    assert_eq!(v.z, 0.0);
}

#[test]
fn long_roam_stays_bounded() {
    let mut rng = StdRng::seed_from_u64(18);
    let mut ps: Vec<Particle> = (0..60)
        .map(|i| {
            let f = i as f32;
            particle(
                i,
                Vec3::new((f * 7.3) % 100.0 - 50.0, (f * 3.1) % 60.0 - 30.0, (f * 5.7) % 40.0 - 20.0),
                Vec3::new(0.1, -0.05, 0.02),
            )
        })
        .collect();
    let params = RoamParams::default();
    for _ in 0..2000 {
        step(&mut ps, None, &params, &mut rng);
    }
    for p in &ps {
        assert!(p.position.is_finite());
        assert!(p.position.abs().cmple(params.bounds + Vec3::splat(10.0)).all());
        assert!(p.velocity.length() < 1.5);
    }
}
