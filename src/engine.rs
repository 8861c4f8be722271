use crate::demo::DemoState;

pub fn update(state: &mut DemoState, ui: &imgui::Ui) -> anyhow::Result<()> {
    state.scene.early_update();

    transition_window(state, ui);

    state.update()
}

fn transition_window(state: &mut DemoState, ui: &imgui::Ui) {
    ui.window("Transitions")
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .size([220.0, 110.0], imgui::Condition::FirstUseEver)
        .build(|| {
            if ui.button("Sphere") {
                state.request_sphere();
            }
            ui.same_line();
            if ui.button("Reset") {
                state.request_reset();
            }
            if state.transitions.is_running() {
                ui.same_line();
                if ui.button("Stop") {
                    state.cancel_transition();
                }
            }

            ui.separator();

            match state.transition_status() {
                Some((kind, progress)) => {
                    ui.text(format!("{:?}: {:.0}%", kind, progress * 100.0));
                }
                None => ui.text_disabled("Idle"),
            }
            ui.text(format!("Boxes: {}", state.boxes.len()));
        });
}
