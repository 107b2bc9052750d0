//! Store settings

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::ShippingConfig;

/// Default per-unit courier charge.
pub const DEFAULT_COURIER_CHARGES: u64 = 100;

/// Default free-shipping threshold.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: u64 = 2_000;

/// Default tax disclaimer.
pub const DEFAULT_GST_MESSAGE: &str = "GST not included";

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading a settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Store-wide settings held in the `settings/store` document.
///
/// Every field falls back to its default when missing from the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSettings {
    /// Store name used in messages and invoices.
    pub store_name: String,

    /// Short store description.
    pub description: String,

    /// WhatsApp number orders are sent to.
    pub whatsapp_number: String,

    /// Default per-unit courier charge.
    pub courier_charges: u64,

    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: u64,

    /// Tax disclaimer shown next to totals.
    pub gst_message: String,

    /// Logo shown on invoices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: String::new(),
            description: String::new(),
            whatsapp_number: String::new(),
            courier_charges: DEFAULT_COURIER_CHARGES,
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            gst_message: DEFAULT_GST_MESSAGE.to_string(),
            logo_url: None,
        }
    }
}

impl StoreSettings {
    /// Parse settings from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let settings: StoreSettings = serde_norway::from_str(yaml)?;

        Ok(settings.normalized())
    }

    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Replace a blank disclaimer with the default one.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.gst_message.trim().is_empty() {
            self.gst_message = DEFAULT_GST_MESSAGE.to_string();
        }

        self
    }

    /// Shipping rules for the pricing engine.
    pub fn shipping(&self) -> ShippingConfig {
        ShippingConfig {
            default_charge: self.courier_charges,
            free_shipping_threshold: self.free_shipping_threshold,
            tax_disclaimer: self.gst_message.clone(),
        }
    }
}
