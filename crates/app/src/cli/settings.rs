use std::path::PathBuf;

use clap::{Args, Subcommand};
use storefront::{currency::format_amount, settings::StoreSettings};
use storefront_app::context::AppContext;

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// Replace the store settings from a YAML file
    Put(PutSettingsArgs),

    /// Show the current store settings
    Show,
}

#[derive(Debug, Args)]
struct PutSettingsArgs {
    /// YAML file with the settings fields
    file: PathBuf,
}

pub(crate) async fn run(command: SettingsCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        SettingsSubcommand::Put(args) => put(args, ctx).await,
        SettingsSubcommand::Show => show(ctx).await,
    }
}

async fn put(args: PutSettingsArgs, ctx: &AppContext) -> Result<(), String> {
    let settings = StoreSettings::from_yaml_file(&args.file)
        .map_err(|error| format!("failed to load {}: {error}", args.file.display()))?;

    ctx.settings
        .save_settings(settings)
        .await
        .map_err(|error| format!("failed to save settings: {}", describe(&error)))?;

    println!("settings saved");

    Ok(())
}

async fn show(ctx: &AppContext) -> Result<(), String> {
    let settings = ctx
        .settings
        .store_settings()
        .await
        .map_err(|error| format!("failed to load settings: {}", describe(&error)))?;

    println!("store_name: {}", settings.store_name);
    println!("whatsapp_number: {}", settings.whatsapp_number);
    println!("courier_charges: {}", format_amount(settings.courier_charges));
    println!(
        "free_shipping_threshold: {}",
        format_amount(settings.free_shipping_threshold)
    );
    println!("gst_message: {}", settings.gst_message);

    Ok(())
}
