//! Invoices
//!
//! [`InvoiceData`] is the flat field set an invoice document needs. It is built from a stored
//! order and trusts the totals frozen there; only per-line totals are derived.

use std::io;

use jiff::tz::TimeZone;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{currency::CurrencyFormatter, orders::OrderSnapshot, settings::StoreSettings};

/// Errors that can occur when building or writing an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// A line total does not fit in the integer range.
    #[error("line total overflow for {0}")]
    Overflow(String),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Who issued the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreIdentity {
    /// Store name printed in the header.
    pub name: String,

    /// WhatsApp number customers contact.
    pub contact: String,

    /// Logo printed in the header.
    pub logo_url: Option<String>,
}

impl From<&StoreSettings> for StoreIdentity {
    fn from(settings: &StoreSettings) -> Self {
        Self {
            name: settings.store_name.clone(),
            contact: settings.whatsapp_number.clone(),
            logo_url: settings.logo_url.clone(),
        }
    }
}

/// One invoice row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    /// Product name.
    pub name: String,

    /// Selected variant, if any.
    pub variant: Option<String>,

    /// Units sold.
    pub quantity: u32,

    /// Price paid per unit.
    pub unit_price: u64,

    /// `unit_price * quantity`.
    pub line_total: u64,
}

impl InvoiceLine {
    /// Name with the variant in parentheses.
    pub fn description(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{} ({variant})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Everything needed to render an invoice for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    /// Issuing store.
    pub store: StoreIdentity,

    /// Human-readable order id.
    pub order_id: String,

    /// Order date as `dd/mm/yyyy`.
    pub date: String,

    /// Rows in order.
    pub lines: Vec<InvoiceLine>,

    /// Subtotal frozen at checkout.
    pub subtotal: u64,

    /// Shipping total frozen at checkout.
    pub shipping_total: u64,

    /// Grand total frozen at checkout.
    pub grand_total: u64,

    /// Tax disclaimer.
    pub disclaimer: String,
}

impl InvoiceData {
    /// Reshape a stored order for the invoice renderer.
    ///
    /// The order date is the creation day in `tz`.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::Overflow`]: a line total overflowed.
    pub fn from_order(
        order: &OrderSnapshot,
        store: StoreIdentity,
        disclaimer: &str,
        tz: &TimeZone,
    ) -> Result<Self, InvoiceError> {
        let lines = order
            .items()
            .iter()
            .map(|item| {
                let line_total = item
                    .line_total()
                    .ok_or_else(|| InvoiceError::Overflow(item.name.clone()))?;

                Ok(InvoiceLine {
                    name: item.name.clone(),
                    variant: item.selected_size.clone(),
                    quantity: item.quantity,
                    unit_price: item.effective_price(),
                    line_total,
                })
            })
            .collect::<Result<Vec<_>, InvoiceError>>()?;

        let date = order
            .created_at()
            .to_zoned(tz.clone())
            .strftime("%d/%m/%Y")
            .to_string();

        Ok(Self {
            store,
            order_id: order.order_id().to_string(),
            date,
            lines,
            subtotal: order.subtotal(),
            shipping_total: order.shipping_total(),
            grand_total: order.grand_total(),
            disclaimer: disclaimer.to_string(),
        })
    }

    /// File name without extension, e.g. `Invoice-ORD-1700000000000`.
    pub fn file_stem(&self) -> String {
        format!("Invoice-{}", self.order_id)
    }

    /// Render the invoice as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        formatter: &CurrencyFormatter,
    ) -> Result<(), InvoiceError> {
        write_header(&mut out, self)?;
        write_line_table(&mut out, self, formatter)?;
        write_summary(&mut out, self, formatter)?;

        writeln!(out, "\nThank you for your order!").map_err(|_err| InvoiceError::IO)?;
        writeln!(out, "For any queries, contact us via WhatsApp").map_err(|_err| InvoiceError::IO)
    }
}

fn write_header(out: &mut impl io::Write, invoice: &InvoiceData) -> Result<(), InvoiceError> {
    writeln!(out, "{}", invoice.store.name).map_err(|_err| InvoiceError::IO)?;
    writeln!(out, "INVOICE").map_err(|_err| InvoiceError::IO)?;
    writeln!(out, "Order ID: {}", invoice.order_id).map_err(|_err| InvoiceError::IO)?;
    writeln!(out, "Date: {}", invoice.date).map_err(|_err| InvoiceError::IO)?;

    if !invoice.store.contact.is_empty() {
        writeln!(out, "WhatsApp: {}", invoice.store.contact).map_err(|_err| InvoiceError::IO)?;
    }

    Ok(())
}

fn write_line_table(
    out: &mut impl io::Write,
    invoice: &InvoiceData,
    formatter: &CurrencyFormatter,
) -> Result<(), InvoiceError> {
    let mut builder = Builder::default();

    builder.push_record(["Product", "Qty", "Price", "Total"]);

    for line in &invoice.lines {
        builder.push_record([
            line.description(),
            line.quantity.to_string(),
            formatter.format(line.unit_price),
            formatter.format(line.line_total),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..4), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| InvoiceError::IO)
}

fn write_summary(
    out: &mut impl io::Write,
    invoice: &InvoiceData,
    formatter: &CurrencyFormatter,
) -> Result<(), InvoiceError> {
    let shipping = if invoice.shipping_total == 0 {
        "FREE".to_string()
    } else {
        formatter.format(invoice.shipping_total)
    };

    let rows = [
        ("Subtotal:", formatter.format(invoice.subtotal)),
        ("Courier & Packaging:", shipping),
        ("Total:", formatter.format(invoice.grand_total)),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _value)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_label, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| InvoiceError::IO)?;
    }

    writeln!(out, "* {}", invoice.disclaimer).map_err(|_err| InvoiceError::IO)
}
