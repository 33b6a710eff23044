use iced::window;
use ui_thread_demo::{app, logging};

fn main() -> iced::Result {
    if let Err(err) = logging::init() {
        eprintln!("Failed to initialize logging: {}", err);
    }
    tracing::info!("launching form");

    iced::application(app::DemoApp::default, app::update, app::view)
        .title("UI Thread Test")
        .window(window::Settings {
            size: iced::Size::new(520.0, 340.0),
            ..Default::default()
        })
        .run()
}
