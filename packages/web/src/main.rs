use store::BillwiseConfig;

mod logging;

#[cfg(target_arch = "wasm32")]
mod bind;

const CONFIG_TOML: &str = include_str!("../billwise.toml");

fn main() {
    logging::init();
    let config = load_config(CONFIG_TOML);

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = start(&config) {
            tracing::error!(error = %e, "auth layer not started");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::warn!(
            home = %config.pages.home,
            "the billwise client runs in the browser; build it for wasm32-unknown-unknown"
        );
    }
}

/// Parse the bundled config, falling back to defaults when it is invalid.
fn load_config(text: &str) -> BillwiseConfig {
    match BillwiseConfig::from_toml(text) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                error = %e,
                file = BillwiseConfig::filename(),
                "invalid config, using defaults"
            );
            BillwiseConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn start(config: &BillwiseConfig) -> Result<(), String> {
    use api::FirebaseProvider;
    use store::LocalStore;
    use ui::{AuthCoordinator, DomUi, PagePolicy};

    let dom = DomUi::new().ok_or("no browser window")?;
    let hostname = dom.hostname();
    let pathname = dom.pathname();
    let environment = config.site.environment(&hostname);
    let policy = PagePolicy::from_config(&config.pages, config.site.base_path(&hostname));
    let document = dom.document().clone();

    let provider = FirebaseProvider::initialize(&config.firebase).map_err(|e| e.to_string())?;
    let coordinator = AuthCoordinator::new(provider, LocalStore::new(), dom, policy, &pathname)
        .with_message_ttl(config.messages.dismiss_after())
        .start();
    bind::bind_page(&document, &coordinator);

    tracing::info!(?environment, page = coordinator.page(), "auth layer started");
    // The coordinator lives as long as the page.
    std::mem::forget(coordinator);
    Ok(())
}
