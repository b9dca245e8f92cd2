use super::*;
use serde_json::json;
use std::time::{Duration, Instant};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "stroke_anim_recorded_{name}_{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn square() -> Recording {
    Recording {
        model_id: "square".to_owned(),
        drawings: vec![
            vec![
                [10.0, 0.0, 0.0],
                [0.0, 10.0, 0.0],
                [-10.0, 0.0, 1.0],
                [0.0, -10.0, 0.0],
            ],
            vec![[4.0, 4.0, 0.0]],
        ],
    }
}

fn wait_until_settled(m: &RecordedModel) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !m.is_loaded() && m.load_failure().is_none() {
        assert!(Instant::now() < deadline, "load did not settle");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn stroke3_maps_to_pen_states() {
    let mut m = RecordedModel::from_recording(square());
    let mut state = m.zero_state();
    let mut pens = Vec::new();
    for _ in 0..5 {
        state = m.update(&m.zero_input(), &state);
        let pdf = m.pdf(&state, 0.1);
        pens.push(m.sample(&pdf).pen);
    }
    assert_eq!(
        pens,
        vec![
            PenState::Down,
            PenState::Down,
            PenState::Up,
            PenState::End,
            PenState::End
        ]
    );
}

#[test]
fn sessions_rotate_through_drawings_and_apply_pixel_factor() {
    let mut m = RecordedModel::from_recording(square());
    m.set_scale_factor(2.0);
    let first = m.zero_state();
    let second = m.zero_state();
    let third = m.zero_state();
    assert_ne!(first, second);
    assert_eq!(first, third);

    let state = m.update(&m.zero_input(), &second);
    let pdf = m.pdf(&state, 1.0);
    assert_eq!(m.sample(&pdf), PenSample::new(2.0, 2.0, PenState::End));
}

#[test]
fn rejects_invalid_recordings() {
    assert!(Recording::from_json("{").is_err());
    let bad_pen = json!({"model_id": "x", "drawings": [[[1.0, 1.0, 0.5]]]});
    assert!(Recording::from_json(&bad_pen.to_string()).is_err());
    let empty = json!({"model_id": "x", "drawings": []});
    assert!(Recording::from_json(&empty.to_string()).is_err());
}

#[test]
fn loader_reads_files_in_background() {
    let dir = temp_dir("ok");
    std::fs::write(
        dir.join("square.json"),
        serde_json::to_string(&square()).unwrap(),
    )
    .unwrap();

    let mut loader = RecordedLoader::new(&dir);
    let m = loader.begin("square").unwrap();
    wait_until_settled(&m);
    assert!(m.is_loaded());
    assert!(loader.available().unwrap().contains(&"square".to_owned()));
}

#[test]
fn loader_reports_missing_files_as_failures() {
    let dir = temp_dir("missing");
    let mut loader = RecordedLoader::new(&dir);
    let m = loader.begin("nothing_here").unwrap();
    wait_until_settled(&m);
    assert!(!m.is_loaded());
    assert!(m.load_failure().unwrap().contains("failed to read"));
}

#[test]
fn loader_rejects_path_like_ids() {
    let mut loader = RecordedLoader::new(temp_dir("ids"));
    assert!(loader.begin("../etc").is_err());
}
