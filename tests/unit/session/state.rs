use super::*;
use crate::foundation::core::Canvas;
use crate::model::scripted::ScriptedModel;
use crate::render::surface::{DrawCall, RecordingSurface};

struct Rig {
    model: ScriptedModel,
    surface: RecordingSurface,
    drawing: DrawingState<usize>,
    config: Configuration,
    rng: Rng64,
}

impl Rig {
    fn new(mut model: ScriptedModel) -> Self {
        let drawing = DrawingState::reset(&mut model, Point::new(100.0, 100.0), Rgba8::WHITE);
        Self {
            model,
            surface: RecordingSurface::new(Canvas::default()),
            drawing,
            config: Configuration::default(),
            rng: Rng64::new(1),
        }
    }

    fn step(&mut self) -> StepOutcome {
        advance(
            &mut self.drawing,
            &mut self.model,
            &self.config,
            &mut self.surface,
            &mut self.rng,
        )
    }
}

#[test]
fn reset_starts_pen_down_at_origin() {
    let mut model = ScriptedModel::new(vec![]);
    let d = DrawingState::reset(&mut model, Point::new(3.0, 4.0), Rgba8::WHITE);
    assert_eq!(d.position, Point::new(3.0, 4.0));
    assert_eq!(d.previous_pen, PenState::Down);
    assert_eq!(d.last_input, model.zero_input());
    assert_eq!(d.stroke_count, 0);
    assert_eq!(d.steps, 0);
}

#[test]
fn draw_decision_uses_previous_pen_state() {
    let mut rig = Rig::new(ScriptedModel::new(vec![
        PenSample::new(10.0, 0.0, PenState::Up),
        PenSample::new(0.0, 10.0, PenState::Down),
        PenSample::new(5.0, 5.0, PenState::End),
    ]));

    // Previous pen is the initial Down: draws even though this sample lifts the pen.
    assert_eq!(
        rig.step(),
        StepOutcome::Advanced {
            drew: true,
            pen: PenState::Up
        }
    );
    // Previous pen is Up: moves without drawing.
    assert_eq!(
        rig.step(),
        StepOutcome::Advanced {
            drew: false,
            pen: PenState::Down
        }
    );
    // Previous pen is Down: draws the final segment to the end point.
    assert_eq!(
        rig.step(),
        StepOutcome::Advanced {
            drew: true,
            pen: PenState::End
        }
    );
    assert_eq!(rig.step(), StepOutcome::Finished(FinishReason::PenEnd));

    assert_eq!(rig.drawing.stroke_count, 2);
    assert_eq!(rig.drawing.position, Point::new(115.0, 115.0));
    let lines: Vec<_> = rig
        .surface
        .calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            (Point::new(100.0, 100.0), Point::new(110.0, 100.0)),
            (Point::new(110.0, 110.0), Point::new(115.0, 115.0)),
        ]
    );
}

#[test]
fn finished_step_makes_no_gateway_calls() {
    let mut rig = Rig::new(ScriptedModel::pen_down_then_end(0, 1.0, 1.0));
    assert!(matches!(rig.step(), StepOutcome::Advanced { .. }));
    let before = rig.model.calls();
    for _ in 0..5 {
        assert_eq!(rig.step(), StepOutcome::Finished(FinishReason::PenEnd));
    }
    assert_eq!(rig.model.calls(), before);
}

#[test]
fn model_is_fed_scaled_previous_sample() {
    let mut rig = Rig::new(ScriptedModel::pen_down_then_end(2, 3.0, 4.0));
    rig.config.scale_factor = 2.0;
    rig.step();
    rig.step();
    assert_eq!(rig.model.inputs()[0], rig.model.zero_input());
    assert_eq!(
        rig.model.inputs()[1],
        PenSample::new(6.0, 8.0, PenState::Down)
    );
    assert_eq!(rig.drawing.last_input, PenSample::new(6.0, 8.0, PenState::Down));
    assert_eq!(rig.drawing.position, Point::new(112.0, 116.0));
}

#[test]
fn temperature_is_passed_through() {
    let mut rig = Rig::new(ScriptedModel::pen_down_then_end(1, 1.0, 1.0));
    rig.config.temperature = 0.37;
    rig.step();
    assert_eq!(rig.model.last_temperature(), Some(0.37));
}

#[test]
fn step_cap_finishes_endless_sequences() {
    let mut rig = Rig::new(
        ScriptedModel::new(vec![PenSample::new(1.0, 0.0, PenState::Down)]).looping(),
    );
    rig.config.max_steps = 10;
    let mut advanced = 0;
    loop {
        match rig.step() {
            StepOutcome::Advanced { .. } => advanced += 1,
            StepOutcome::Finished(reason) => {
                assert_eq!(reason, FinishReason::SequenceLengthExceeded);
                break;
            }
        }
        assert!(advanced <= 10);
    }
    assert_eq!(advanced, 10);
}

#[test]
fn random_colors_pick_from_palette() {
    let mut rig = Rig::new(ScriptedModel::pen_down_then_end(20, 1.0, 0.0));
    rig.config.random_colors = true;
    while matches!(rig.step(), StepOutcome::Advanced { .. }) {}
    let colors: Vec<Rgba8> = rig
        .surface
        .calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::Line { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(colors.len(), 21);
    assert!(colors.iter().all(|c| PALETTE.contains(c)));
}

#[test]
fn fixed_color_and_width_come_from_config() {
    let mut rig = Rig::new(ScriptedModel::pen_down_then_end(1, 1.0, 0.0));
    rig.config.color = Rgba8::opaque(1, 2, 3);
    rig.config.stroke_width = 7.5;
    rig.step();
    assert!(matches!(
        rig.surface.calls()[0],
        DrawCall::Line { color, width, .. } if color == Rgba8::opaque(1, 2, 3) && width == 7.5
    ));
}
