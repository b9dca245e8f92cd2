use super::*;
use serde_json::json;

#[test]
fn defaults_are_valid() {
    let cfg = Configuration::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.model_id, "cat");
    assert_eq!(cfg.tick_rate, 60);
    assert_eq!(cfg.load.poll_interval(), Duration::from_millis(100));
    assert_eq!(cfg.load.pixel_factor, 2.0);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: Configuration = serde_json::from_value(json!({
        "model_id": "owl",
        "temperature": 0.3,
        "color": "#FF0000",
        "load": {"timeout_ms": 500}
    }))
    .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.model_id, "owl");
    assert_eq!(cfg.color, Rgba8::opaque(255, 0, 0));
    assert_eq!(cfg.stroke_width, 2.0);
    assert_eq!(cfg.load.timeout(), Duration::from_millis(500));
    assert_eq!(cfg.load.poll_interval_ms, 100);
}

#[test]
fn out_of_range_fields_are_rejected() {
    let bad = [
        Configuration {
            temperature: 0.0,
            ..Configuration::default()
        },
        Configuration {
            temperature: f64::NAN,
            ..Configuration::default()
        },
        Configuration {
            tick_rate: 0,
            ..Configuration::default()
        },
        Configuration {
            stroke_width: -1.0,
            ..Configuration::default()
        },
        Configuration {
            scale_factor: 0.0,
            ..Configuration::default()
        },
        Configuration {
            max_steps: 0,
            ..Configuration::default()
        },
        Configuration {
            model_id: "Not An Id".to_owned(),
            ..Configuration::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
    }
}

#[test]
fn tick_interval_follows_rate() {
    let cfg = Configuration {
        tick_rate: 50,
        ..Configuration::default()
    };
    assert_eq!(cfg.tick_interval(), Duration::from_millis(20));
}

#[test]
fn reads_config_file() {
    let path = std::env::temp_dir().join(format!(
        "stroke_anim_config_{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{"tick_rate": 30, "random_colors": true}"#).unwrap();
    let cfg = Configuration::from_json_file(&path).unwrap();
    assert_eq!(cfg.tick_rate, 30);
    assert!(cfg.random_colors);

    std::fs::write(&path, r#"{"tick_rate": 0}"#).unwrap();
    assert!(Configuration::from_json_file(&path).is_err());
}

#[test]
fn unreadable_config_file_is_an_io_error() {
    let path = std::env::temp_dir().join(format!(
        "stroke_anim_missing_config_{}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    let inner = match Configuration::from_json_file(&path) {
        Err(SketchError::Other(inner)) => inner,
        other => panic!("expected an io error, got {other:?}"),
    };
    assert!(inner.to_string().starts_with("read config"));
    assert!(inner.downcast_ref::<std::io::Error>().is_some());
}
