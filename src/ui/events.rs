use crate::app::{App, AppEvent};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded { generation, result } => {
            if app.apply_fetch_result(generation, result) {
                app.spinner_frame = 0;
            }
        }
        AppEvent::TaskPanicked {
            task,
            generation,
            error,
        } => {
            app.handle_task_panic(task, generation, &error);
        }
    }
}
