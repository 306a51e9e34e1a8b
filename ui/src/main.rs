mod components;

use components::app::App;

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!("Starting Shamba frontend");
    dioxus::launch(App);
}
