use dioxus::prelude::*;

use api::SupabaseClient;
use store::guard::Destination;
use store::NotebookConfig;
use ui::{SessionProvider, ToastProvider};
use views::{Auth, Notes};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Notes {},
    #[route("/auth")]
    Auth {},
    #[route("/:..segments")]
    Unknown { segments: Vec<String> },
}

impl From<Destination> for Route {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Notes => Route::Notes {},
            Destination::Auth => Route::Auth {},
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const CONFIG: &str = include_str!("../notebook.toml");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

/// Load the bundled config and build the backend client.
fn bootstrap() -> Result<(NotebookConfig, SupabaseClient), String> {
    let config = api::config::load(CONFIG).map_err(|e| e.to_string())?;
    let backend = SupabaseClient::with_default_storage(&config).map_err(|e| e.to_string())?;
    tracing::info!(url = %config.backend.url, "backend configured");
    Ok((config, backend))
}

#[component]
fn App() -> Element {
    let setup = use_hook(bootstrap);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ui::NOTEBOOK_CSS }

        {match setup {
            Ok((config, backend)) => rsx! { Shell { config, backend } },
            Err(message) => rsx! { ConfigError { message } },
        }}
    }
}

#[component]
fn Shell(config: NotebookConfig, backend: SupabaseClient) -> Element {
    let toasts = config.toasts.clone();
    use_context_provider(|| config);

    rsx! {
        ToastProvider {
            settings: toasts,
            SessionProvider {
                backend,
                Router::<Route> {}
            }
        }
    }
}

#[component]
fn ConfigError(message: String) -> Element {
    tracing::error!("Invalid configuration: {}", message);
    rsx! {
        div {
            class: "config-error",
            h1 { "NotebookWeb cannot start" }
            p { "The backend configuration is invalid: {message}" }
        }
    }
}

/// Unknown paths go to the notes, which redirect further if needed.
#[component]
fn Unknown(segments: Vec<String>) -> Element {
    let nav = use_navigator();
    tracing::debug!(path = %segments.join("/"), "unknown route");
    nav.replace(Route::Notes {});
    rsx! {}
}
