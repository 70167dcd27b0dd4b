mod app;
mod logic;
mod models;
mod mvu;
mod ui;
mod utils;

fn main() -> eframe::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    app::run()
}
