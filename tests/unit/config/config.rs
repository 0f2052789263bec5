use super::*;

#[test]
fn defaults_are_valid() {
    SceneConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "spawn": { "filler_count": 12 }, "layout": { "max_row_width": 80.0 } }"#;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.spawn.filler_count, 12);
    assert_eq!(cfg.layout.max_row_width, 80.0);
    assert_eq!(cfg.layout.base_size, 5.0);
    assert_eq!(cfg.font.family, "Unbounded");
    cfg.validate().unwrap();
}

#[test]
fn rejects_bad_damping() {
    let mut cfg = SceneConfig::default();
    cfg.physics.damping = 1.5;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("damping"));
}

#[test]
fn rejects_empty_alphabet_with_fillers() {
    let mut cfg = SceneConfig::default();
    cfg.spawn.filler_alphabet.clear();
    assert!(cfg.validate().is_err());
    cfg.spawn.filler_count = 0;
    cfg.validate().unwrap();
}

#[test]
fn malformed_json_is_config_error() {
    let err = SceneConfig::from_reader("{ nope".as_bytes()).unwrap_err();
    assert!(matches!(err, SwarmError::Config(_)));
}

#[test]
fn missing_file_is_config_error() {
    let err = SceneConfig::from_path("target/does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("open scene config"));
}

#[test]
fn rejects_overflowing_durations() {
    // 1e39 overflows f32 and parses as infinity
    let json = r#"{ "transitions": { "settle_duration": 1e39 } }"#;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert!(cfg.transitions.settle_duration.is_infinite());
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("transitions.settle_duration"));
}

#[test]
fn rejects_negative_or_non_finite_timings() {
    let cases: [fn(&mut SceneConfig); 6] = [
        |c| c.transitions.settle_stagger = -0.01,
        |c| c.transitions.filler_fade_delay = f32::NAN,
        |c| c.transitions.scatter_duration = f32::INFINITY,
        |c| c.transitions.settle_rotation_duration = -1.0,
        |c| c.transitions.filler_exit_duration = f32::NEG_INFINITY,
        |c| c.transitions.settle_scale_duration = f32::NAN,
    ];
    for set in cases {
        let mut cfg = SceneConfig::default();
        set(&mut cfg);
        assert!(matches!(cfg.validate(), Err(SwarmError::Config(_))));
    }
}

#[test]
fn rejects_non_finite_spawn_ranges() {
    let mut cfg = SceneConfig::default();
    cfg.spawn.filler_volume.y = f32::INFINITY;
    assert!(cfg.validate().unwrap_err().to_string().contains("spawn.filler_volume"));

    let mut cfg = SceneConfig::default();
    cfg.spawn.target_speed = f32::NAN;
    assert!(cfg.validate().unwrap_err().to_string().contains("spawn.target_speed"));

    let mut cfg = SceneConfig::default();
    cfg.spawn.filler_min_opacity = 1.5;
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_durations_are_allowed() {
    let mut cfg = SceneConfig::default();
    cfg.transitions.settle_duration = 0.0;
    cfg.transitions.scatter_duration = 0.0;
    cfg.transitions.settle_stagger = 0.0;
    cfg.validate().unwrap();
}
