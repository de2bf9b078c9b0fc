//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! # Store the token issued by the backend
//! lockshop admin login --token eyJ...
//!
//! # Change the price of a product, keeping everything else
//! lockshop admin update 64f1c2... --price 42000
//! ```
//!
//! # Environment Variables
//!
//! - `LOCKSHOP_SESSION_FILE` - Where the admin token is kept

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lockshop_admin::{
    AdminConsole, AdminError, AnalyticsReport, FileSessionStore, ProductForm, SessionStore,
    import_products, load_manifest,
};
use lockshop_client::{ApiClient, ClientConfig, ImageUpload};
use lockshop_core::ProductId;
use tracing::info;

use crate::ProductArgs;
use crate::commands::catalog::print_listing;

fn session_store(config: &ClientConfig) -> Arc<dyn SessionStore> {
    Arc::new(FileSessionStore::new(&config.session_file))
}

fn mount(config: &ClientConfig) -> Result<AdminConsole, AdminError> {
    AdminConsole::mount(ApiClient::from_config(config), session_store(config))
}

/// Mount the console and fetch the product list.
async fn mount_loaded(config: &ClientConfig) -> Result<AdminConsole, Box<dyn std::error::Error>> {
    let mut console = mount(config)?;
    console.refresh().await;
    if let Some(message) = console.state().error() {
        return Err(message.to_owned().into());
    }
    Ok(console)
}

/// Ask a question on stderr and read one line from stdin.
#[allow(clippy::print_stderr)]
fn prompt(question: &str) -> std::io::Result<String> {
    eprint!("{question} ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

/// Store an admin token, reading it from stdin when not given.
///
/// # Errors
///
/// Returns an error if the token is empty or the session file can't be
/// written.
pub fn login(config: &ClientConfig, token: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let token = match token {
        Some(token) => token,
        None => prompt("Admin token:")?,
    };
    lockshop_admin::login(session_store(config).as_ref(), &token)?;
    info!(path = %config.session_file.display(), "Logged in");
    Ok(())
}

/// Forget the stored token.
///
/// # Errors
///
/// Returns an error if the session file can't be written.
pub fn logout(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    match mount(config) {
        Ok(console) => console.logout()?,
        Err(AdminError::NotAuthenticated) => info!("Not logged in"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// List every product as the admin sees it.
///
/// # Errors
///
/// Returns an error when not logged in or the list can't be fetched.
pub async fn list(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let console = mount_loaded(config).await?;
    let products: Vec<_> = console.products().iter().collect();
    let noun = if products.len() == 1 { "product" } else { "products" };
    print_listing(&products, &format!("{} {noun}", products.len()));
    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns an error when not logged in, the image can't be read, or the
/// upload is refused.
pub async fn create(config: &ClientConfig, fields: ProductArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut console = mount(config)?;
    apply(console.form_mut(), fields).await?;
    submit(&mut console).await
}

/// Update a product, keeping fields that weren't given.
///
/// # Errors
///
/// Returns an error when not logged in, the product doesn't exist, or the
/// update is refused.
pub async fn update(
    config: &ClientConfig,
    id: &str,
    fields: ProductArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut console = mount_loaded(config).await?;
    if !console.begin_edit(&ProductId::new(id)) {
        return Err(format!("No product with ID {id}").into());
    }
    apply(console.form_mut(), fields).await?;
    submit(&mut console).await
}

/// Delete a product after confirmation.
///
/// # Errors
///
/// Returns an error when not logged in or the delete is refused.
#[allow(clippy::print_stdout)]
pub async fn delete(config: &ClientConfig, id: &str, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut console = mount(config)?;

    let ask = |question: &str| {
        yes || prompt(&format!("{question} [y/N]"))
            .is_ok_and(|answer| answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    };

    match console.delete(&ProductId::new(id), &ask).await {
        None => {
            println!("Cancelled.");
            Ok(())
        }
        Some(status) if status.is_success() => {
            println!("{}", status.text());
            Ok(())
        }
        Some(status) => Err(status.text().to_owned().into()),
    }
}

/// Print the analytics report.
///
/// # Errors
///
/// Returns an error when not logged in or the list can't be fetched.
#[allow(clippy::print_stdout)]
pub async fn analytics(config: &ClientConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let console = mount_loaded(config).await?;
    let report = AnalyticsReport::from_products(console.products());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = &report.summary;
    println!("Total products:   {}", summary.total_products);
    println!("Total value:      {}", summary.total_value);
    println!("Average price:    {}", summary.average_price);
    println!("Categories:       {}", summary.category_count);

    println!();
    println!("By category");
    for entry in &report.categories {
        println!("  {:<16} {:>4}  {:>3}%", entry.category.label(), entry.count, entry.percentage);
    }

    println!();
    println!("Uploads per month");
    if report.monthly.is_empty() {
        println!("  No dated products.");
    }
    for (entry, height) in report.monthly.iter().zip(&report.bar_heights) {
        let bar = "#".repeat(usize::try_from(*height / 5).unwrap_or_default());
        println!("  {}  {:>4}  {bar}", entry.month, entry.count);
    }

    println!();
    println!("By price range (RWF)");
    for entry in &report.price_ranges {
        println!("  {:<10} {:>4}  {:>3}%", entry.range, entry.count, entry.percentage);
    }
    Ok(())
}

/// Upload every product in a manifest.
///
/// # Errors
///
/// Returns an error when not logged in, the manifest is unusable, or any
/// upload failed.
#[allow(clippy::print_stdout)]
pub async fn import(
    config: &ClientConfig,
    manifest: &Path,
    images: &Path,
    delay_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let console = mount(config)?;
    let entries = load_manifest(manifest).map_err(AdminError::from)?;

    let report = import_products(
        console.api(),
        console.token(),
        entries,
        images,
        Duration::from_millis(delay_ms),
    )
    .await;

    println!("Uploaded {} of {} products.", report.uploaded.len(), report.total());
    for (name, reason) in &report.failed {
        println!("  failed: {name}: {reason}");
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} uploads failed", report.failed.len()).into())
    }
}

#[allow(clippy::print_stdout)]
async fn submit(console: &mut AdminConsole) -> Result<(), Box<dyn std::error::Error>> {
    let status = console.submit().await;
    if status.is_success() {
        println!("{}", status.text());
        Ok(())
    } else {
        Err(status.text().to_owned().into())
    }
}

/// Copy the given fields onto the form.
async fn apply(form: &mut ProductForm, fields: ProductArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ProductArgs {
        name,
        description,
        price,
        category,
        features,
        material,
        compatibility,
        best_for,
        warranty,
        image,
    } = fields;

    let text_fields = [
        (&mut form.name, name),
        (&mut form.description, description),
        (&mut form.price, price),
        (&mut form.material, material),
        (&mut form.compatibility, compatibility),
        (&mut form.best_for, best_for),
        (&mut form.warranty, warranty),
    ];
    for (slot, value) in text_fields {
        if let Some(value) = value {
            *slot = value;
        }
    }
    if let Some(category) = category {
        form.category = category;
    }
    if !features.is_empty() {
        form.key_features = features.join("\n");
    }
    if let Some(path) = image {
        form.image = Some(ImageUpload::from_path(&path).await?);
    }
    Ok(())
}
