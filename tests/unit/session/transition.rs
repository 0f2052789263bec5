use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::assets::registry::TextureId;
use crate::scene::particle::{ParticleRole, SettleTarget};

fn particle(role: ParticleRole, target: Option<Vec2>) -> Particle {
    Particle {
        ch: 'X',
        role,
        texture: TextureId(0),
        size: Vec2::new(3.0, 5.0),
        position: Vec3::new(10.0, -4.0, 7.0),
        rotation: Vec3::new(1.0, 2.0, 3.0),
        velocity: Vec3::new(0.1, 0.1, 0.1),
        angular_velocity: Vec3::new(0.01, 0.01, 0.01),
        scale: 1.0,
        opacity: 0.8,
        target: target.map(|position| SettleTarget {
            position,
            scale: if role == ParticleRole::Author { 0.45 } else { 1.0 },
        }),
    }
}

fn bounds(w: f32, h: f32) -> LayoutBounds {
    LayoutBounds {
        total_width: w,
        total_height: h,
    }
}

#[test]
fn scale_factor_takes_tighter_axis() {
    let p = TransitionParams::default();
    // width-bound: 100 * 0.85 / 110 = 0.7727
    let s = scale_factor(Vec2::new(100.0, 200.0), bounds(110.0, 20.0), &p);
    assert!((s - 100.0 * 0.85 / 110.0).abs() < 1e-6);
    // height-bound: 40 * 0.55 / 20 = 1.1
    let s = scale_factor(Vec2::new(1000.0, 40.0), bounds(110.0, 20.0), &p);
    assert!((s - 1.1).abs() < 1e-6);
}

#[test]
fn scale_factor_is_clamped_and_positive() {
    let p = TransitionParams::default();
    let s = scale_factor(Vec2::new(1e6, 1e6), bounds(110.0, 20.0), &p);
    assert_eq!(s, 1.8);
    let s = scale_factor(Vec2::new(1e-3, 1e-3), bounds(110.0, 20.0), &p);
    assert!(s > 0.0 && s <= 1.8);
    let s = scale_factor(Vec2::new(100.0, 100.0), bounds(0.0, 0.0), &p);
    assert_eq!(s, 1.8);
}

#[test]
fn next_index_never_repeats() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut seen = [0usize; 4];
    let mut current = 0;
    for _ in 0..2000 {
        let next = pick_next_index(4, current, &mut rng);
        assert_ne!(next, current);
        assert!(next < 4);
        seen[next] += 1;
        current = next;
    }
    assert!(seen.iter().all(|&n| n > 300), "{seen:?}");
}

#[test]
fn next_index_with_one_quote_stays_put() {
    let mut rng = StdRng::seed_from_u64(22);
    for _ in 0..100 {
        assert_eq!(pick_next_index(1, 0, &mut rng), 0);
    }
    assert_eq!(pick_next_index(0, 0, &mut rng), 0);
    assert!(pick_next_index(3, 9, &mut rng) < 3);
}

#[test]
fn settle_freezes_and_lands_on_scaled_targets() {
    let p = TransitionParams::default();
    let mut ps = vec![
        particle(ParticleRole::Quote, Some(Vec2::new(2.0, 3.0))),
        particle(ParticleRole::Author, Some(Vec2::new(-1.0, -6.0))),
        particle(ParticleRole::Filler, None),
    ];
    let plan = settle_plan(&mut ps, 1.5, &p);
    assert!(ps.iter().all(|q| q.velocity == Vec3::ZERO && q.angular_velocity == Vec3::ZERO));

    // mid-flight nothing has arrived yet
    plan.apply(&mut ps, 0.3);
    assert_ne!(ps[0].position, Vec3::new(3.0, 4.5, 0.0));

    assert!(!plan.is_done(plan.end_time() - 0.01));
    assert!(plan.is_done(plan.end_time()));
    plan.apply(&mut ps, plan.end_time() + 0.1);

    assert_eq!(ps[0].position, Vec3::new(3.0, 4.5, 0.0));
    assert_eq!(ps[0].rotation, Vec3::ZERO);
    assert_eq!(ps[0].scale, 1.5);
    assert_eq!(ps[1].position, Vec3::new(-1.5, -9.0, 0.0));
    assert!((ps[1].scale - 1.5 * 0.45).abs() < 1e-6);

    assert_eq!(ps[2].position, Vec3::new(30.0, -12.0, 300.0));
    assert_eq!(ps[2].opacity, 0.0);
    assert_eq!(ps[2].scale, 1.0);
}

#[test]
fn settle_staggers_by_index() {
    let p = TransitionParams::default();
    let mut ps: Vec<Particle> = (0..5)
        .map(|i| particle(ParticleRole::Quote, Some(Vec2::new(i as f32, 0.0))))
        .collect();
    let plan = settle_plan(&mut ps, 1.0, &p);
    for i in 0..5 {
        let t = plan.get(i).unwrap().position.unwrap();
        assert!((t.delay - i as f32 * 0.01).abs() < 1e-6);
    }
    assert!((plan.end_time() - (2.0 + 0.04)).abs() < 1e-5);
}

#[test]
fn filler_fade_waits_for_its_delay() {
    let p = TransitionParams::default();
    let mut ps = vec![particle(ParticleRole::Filler, None)];
    let plan = settle_plan(&mut ps, 1.0, &p);
    plan.apply(&mut ps, 0.9);
    assert_eq!(ps[0].opacity, 0.8);
    plan.apply(&mut ps, 1.25);
    assert!(ps[0].opacity > 0.0 && ps[0].opacity < 0.8);
}

#[test]
fn scatter_kicks_letters_only() {
    let p = TransitionParams::default();
    let mut rng = StdRng::seed_from_u64(23);
    let mut ps = vec![
        particle(ParticleRole::Quote, Some(Vec2::ZERO)),
        particle(ParticleRole::Filler, None),
    ];
    ps[1].velocity = Vec3::ZERO;
    let filler_before = ps[1].clone();

    let plan = scatter_plan(&mut ps, &p, &mut rng);
    assert!(ps[0].velocity.abs().max_element() <= 0.75);
    assert!(ps[0].angular_velocity.abs().max_element() <= 0.1);
    assert!((plan.end_time() - 0.8).abs() < 1e-6);

    plan.apply(&mut ps, 0.8);
    let end = ps[0].position;
    assert!(end.x.abs() <= 75.0 && end.y.abs() <= 75.0);
    assert!((100.0..=150.0).contains(&end.z));
    assert_eq!(ps[1], filler_before);
}
