use iced::{
    widget::{button, column, pick_list, progress_bar, row, text, Space},
    Element, Length,
};

use crate::domain::{RunOutcome, Strategy};
use crate::surface::Surface;

/// Selector state for the form. Everything else is read from the [`Surface`].
#[derive(Debug, Default)]
pub struct FormView {
    pub selected: Strategy,
}

#[derive(Debug, Clone)]
pub enum FormMessage {
    StrategySelected(Strategy),
    StartPressed,
    CancelPressed,
}

impl FormView {
    pub fn update(&mut self, message: FormMessage) {
        match message {
            FormMessage::StrategySelected(strategy) => {
                self.selected = strategy;
            }
            FormMessage::StartPressed | FormMessage::CancelPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn view<'a>(
        &'a self,
        surface: &Surface,
        active: Option<Strategy>,
    ) -> Element<'a, FormMessage> {
        let progress = surface.progress();

        column![
            text("UI Thread Test").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text("Thread implementation:").size(16),
            pick_list(
                Strategy::ALL,
                Some(self.selected),
                FormMessage::StrategySelected
            ),
            Space::new().height(Length::Fixed(10.0)),
            progress_bar(0.0..=100.0, f32::from(progress.percent())),
            text(status_text(surface, active)).size(14),
            Space::new().height(Length::Fixed(20.0)),
            row![
                button("Start Download")
                    .on_press_maybe(surface.start_enabled().then_some(FormMessage::StartPressed))
                    .padding([10, 20]),
                button("Cancel")
                    .on_press_maybe(surface.cancel_enabled().then_some(FormMessage::CancelPressed))
                    .padding([10, 20]),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

/// Label under the progress bar.
pub fn status_text(surface: &Surface, active: Option<Strategy>) -> String {
    if let Some(strategy) = active {
        return format!(
            "Downloading: {}% ({})",
            surface.progress().percent(),
            strategy
        );
    }
    match surface.last_outcome() {
        Some(RunOutcome::Completed) => "Download complete".to_string(),
        Some(RunOutcome::Cancelled) => "Download cancelled".to_string(),
        None => "Pick a thread implementation and start the download".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProgressFraction;

    #[test]
    fn test_status_before_first_run() {
        let surface = Surface::new();
        assert_eq!(
            status_text(&surface, None),
            "Pick a thread implementation and start the download"
        );
    }

    #[test]
    fn test_status_while_running() {
        let surface = Surface::new();
        surface.show_running().unwrap();
        surface
            .set_progress(ProgressFraction::from_units(80, 200))
            .unwrap();
        assert_eq!(
            status_text(&surface, Some(Strategy::DoWorkInSeparateThread)),
            "Downloading: 40% (DoWorkInSeparateThread)"
        );
    }

    #[test]
    fn test_status_after_reset() {
        let surface = Surface::new();
        surface.reset(RunOutcome::Cancelled).unwrap();
        assert_eq!(status_text(&surface, None), "Download cancelled");
        surface.reset(RunOutcome::Completed).unwrap();
        assert_eq!(status_text(&surface, None), "Download complete");
    }

    #[test]
    fn test_selector_only_changes_selection() {
        let mut view = FormView::default();
        view.update(FormMessage::StrategySelected(
            Strategy::DoWorkInSeparateThreadButIncorrectly,
        ));
        view.update(FormMessage::StartPressed);
        assert_eq!(
            view.selected,
            Strategy::DoWorkInSeparateThreadButIncorrectly
        );
    }
}
