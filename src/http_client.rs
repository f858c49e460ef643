use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. The timeout of the first successful call sticks.
pub fn http_client(timeout: Duration) -> reqwest::Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("f1_catalog/", env!("CARGO_PKG_VERSION")))
            .build()
    })
}
