use crate::application::{DownloadController, RunTicket};
use crate::config::DemoConfig;
use crate::domain::Strategy;
use crate::surface::{dispatch::UiUpdate, Surface};
use crate::ui::{FormMessage, FormView};
use iced::Task;

pub struct DemoApp {
    view: FormView,
    controller: DownloadController,
}

impl Default for DemoApp {
    fn default() -> Self {
        Self::new(DemoConfig::default())
    }
}

impl DemoApp {
    /// Builds the form. Must be called on the thread that runs the event loop.
    pub fn new(config: DemoConfig) -> Self {
        Self {
            view: FormView::default(),
            controller: DownloadController::new(config, Surface::new()),
        }
    }

    pub fn controller(&self) -> &DownloadController {
        &self.controller
    }

    #[cfg(test)]
    pub fn selected_strategy(&self) -> Strategy {
        self.view.selected
    }

    fn start_download(&mut self) -> Task<Message> {
        // The selector is read once here; later changes wait for the next run.
        let strategy = self.view.selected;
        match self.controller.start(strategy) {
            Ok(RunTicket::Finished(summary)) => {
                tracing::debug!(?summary, "inline download returned control to the UI");
                Task::none()
            }
            // Dropping the handle detaches the worker.
            Ok(RunTicket::Detached(_worker)) => Task::none(),
            Ok(RunTicket::Marshaled { queue, worker: _ }) => {
                // iced drains the queue on the UI thread, in posting order
                Task::run(queue.into_stream(), Message::Marshaled)
            }
            Err(err) => {
                tracing::warn!(%err, "download not started");
                Task::none()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(FormMessage),
    /// Update posted by a worker, now running on the UI thread
    Marshaled(UiUpdate),
}

pub fn update(app: &mut DemoApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                FormMessage::StartPressed => return app.start_download(),
                FormMessage::CancelPressed => {
                    app.controller.cancel();
                }
                FormMessage::StrategySelected(strategy) => {
                    if let Some(active) = app.controller.active_strategy() {
                        tracing::debug!(%strategy, %active, "selection applies to the next run");
                    }
                }
            }
        }
        Message::Marshaled(ui_update) => {
            if let Err(err) = app.controller.apply(ui_update) {
                tracing::error!(%err, "marshaled update failed");
            }
        }
    }
    Task::none()
}

pub fn view(app: &DemoApp) -> iced::Element<'_, Message> {
    app.view
        .view(app.controller.surface(), app.controller.active_strategy())
        .map(Message::UiMessage)
}
