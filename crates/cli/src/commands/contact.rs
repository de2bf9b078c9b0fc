//! Contact command.

use lockshop_client::{ApiClient, ClientConfig};
use lockshop_storefront::ContactForm;

/// Send an inquiry through the configured contact channel.
///
/// # Errors
///
/// Returns the status line as an error when the message was not delivered.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub async fn send(
    config: &ClientConfig,
    name: String,
    email: String,
    phone: String,
    message: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::from_config(config);
    let mut form = ContactForm::new();
    form.name = name;
    form.email = email;
    form.phone = phone;
    form.message = message;

    eprintln!("Sending...");
    let sent = form.submit(&api, &config.contact_channel).await;
    let status = form.status().unwrap_or_default().to_owned();
    if sent {
        println!("{status}");
        Ok(())
    } else {
        Err(status.into())
    }
}
