//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Lienzo");

    if let Err(e) = pollster::block_on(lienzo_app::App::run()) {
        log::error!("{e}");
        eprintln!("lienzo: {e}");
        std::process::exit(1);
    }
}
