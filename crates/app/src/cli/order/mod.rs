use clap::{Args, Subcommand};
use storefront::orders::OrderStatus;
use storefront_app::context::AppContext;

use super::describe;

mod list;
mod show;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Show one order
    Show(OrderIdArgs),

    /// List orders with dashboard totals
    List(list::ListOrdersArgs),

    /// Move an order to a new status
    Status(StatusArgs),

    /// Append an admin note to an order
    Note(NoteArgs),

    /// Reduce product stock for every line of an order
    ReduceStock(OrderIdArgs),
}

#[derive(Debug, Args)]
struct OrderIdArgs {
    /// Order id, e.g. ORD-1700000000000
    order_id: String,
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Order id
    order_id: String,

    /// New status (pending, contacted, confirmed, completed, cancelled)
    status: OrderStatus,
}

#[derive(Debug, Args)]
struct NoteArgs {
    /// Order id
    order_id: String,

    /// Note text
    note: String,
}

pub(crate) async fn run(command: OrderCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Show(args) => show::run(&args.order_id, ctx).await,
        OrderSubcommand::List(args) => list::run(args, ctx).await,
        OrderSubcommand::Status(args) => {
            let order = ctx
                .orders
                .update_status(&args.order_id, args.status)
                .await
                .map_err(|error| format!("failed to update order: {}", describe(&error)))?;

            println!("{}: {}", order.order_id(), order.status().label());

            Ok(())
        }
        OrderSubcommand::Note(args) => {
            ctx.orders
                .add_note(&args.order_id, &args.note)
                .await
                .map_err(|error| format!("failed to add note: {}", describe(&error)))?;

            println!("note added to {}", args.order_id);

            Ok(())
        }
        OrderSubcommand::ReduceStock(args) => reduce_stock(&args.order_id, ctx).await,
    }
}

async fn reduce_stock(order_id: &str, ctx: &AppContext) -> Result<(), String> {
    let report = ctx
        .orders
        .reduce_stock_for_order(order_id)
        .await
        .map_err(|error| format!("failed to reduce stock: {}", describe(&error)))?;

    for line in &report.adjusted {
        println!(
            "{}: {} -> {}",
            line.product_id, line.adjustment.previous, line.adjustment.remaining
        );

        if line.adjustment.oversold > 0 {
            println!("  oversold by {}", line.adjustment.oversold);
        }
    }

    for product_id in &report.missing {
        println!("{product_id}: Product not found");
    }

    for line in &report.failed {
        println!("{}: not reduced ({})", line.product_id, line.reason);
    }

    Ok(())
}
