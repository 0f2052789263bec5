use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn centered_samples_stay_in_half_spread() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..1000 {
        let v = centered(&mut rng, 0.3);
        assert!((-0.15..0.15).contains(&v));
    }
}

#[test]
fn centered_vec3_respects_each_axis() {
    let mut rng = StdRng::seed_from_u64(2);
    let extents = Vec3::new(140.0, 90.0, 60.0);
    for _ in 0..500 {
        let v = centered_vec3(&mut rng, extents);
        assert!(v.x.abs() <= 70.0 && v.y.abs() <= 45.0 && v.z.abs() <= 30.0);
    }
}

#[test]
fn works_through_boxed_source() {
    let mut rng: SceneRng = Box::new(StdRng::seed_from_u64(3));
    let a = random_angles(rng.as_mut());
    for c in a.to_array() {
        assert!((0.0..std::f32::consts::PI).contains(&c));
    }
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp_f32(2.0, 4.0, 0.0), 2.0);
    assert_eq!(lerp_f32(2.0, 4.0, 1.0), 4.0);
    assert_eq!(lerp_f32(2.0, 4.0, 0.5), 3.0);
}
