mod app;
mod components;
mod event;
mod export_worker;
mod session;
mod widgets;

use crossbeam_channel::unbounded;

fn main() {
    let picker = ratatui_image::picker::Picker::from_query_stdio().unwrap_or_else(|e| {
        eprintln!("Failed to query terminal ({}), using fallback", e);
        ratatui_image::picker::Picker::from_fontsize((8, 16))
    });

    let (log_tx, log_rx) = unbounded();
    if let Err(e) = backendcfg::logging::init(log_tx) {
        eprintln!("Failed to install logger: {}", e);
    }

    let session = session::Session::from_args(std::env::args());
    let mut app = app::App::new(session, Some(picker), log_rx);
    if let Err(e) = app.run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
