use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use clap::Args;
use storefront::currency::CurrencyFormatter;
use storefront_app::context::AppContext;
use tracing::info;

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct InvoiceArgs {
    /// Order id, e.g. ORD-1700000000000
    order_id: String,

    /// Directory to write `Invoice-<order id>.txt` into; prints to stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

pub(crate) async fn run(args: InvoiceArgs, ctx: &AppContext) -> Result<(), String> {
    let invoice = ctx
        .orders
        .invoice(&args.order_id)
        .await
        .map_err(|error| format!("failed to build invoice: {}", describe(&error)))?;

    let formatter = CurrencyFormatter::default();

    let Some(dir) = args.out else {
        return invoice
            .write_to(io::stdout().lock(), &formatter)
            .map_err(|error| error.to_string());
    };

    let path = dir.join(format!("{}.txt", invoice.file_stem()));
    let file = File::create(&path)
        .map_err(|error| format!("failed to create {}: {error}", path.display()))?;

    let mut writer = io::BufWriter::new(file);

    invoice
        .write_to(&mut writer, &formatter)
        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;

    writer
        .flush()
        .map_err(|error| format!("failed to write {}: {error}", path.display()))?;

    info!(order_id = %args.order_id, path = %path.display(), "invoice written");

    println!("{}", path.display());

    Ok(())
}
