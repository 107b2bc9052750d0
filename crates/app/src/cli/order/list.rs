use clap::Args;
use jiff::tz::TimeZone;
use storefront::{
    currency::format_amount,
    orders::{OrderSnapshot, OrderStats, OrderStatus, filter_orders},
};
use storefront_app::context::AppContext;
use tabled::{builder::Builder, settings::Style};

use crate::cli::describe;

#[derive(Debug, Args)]
pub(crate) struct ListOrdersArgs {
    /// Only orders with this status
    #[arg(long)]
    status: Option<OrderStatus>,

    /// Only orders whose id contains this text
    #[arg(long, default_value = "")]
    search: String,
}

pub(super) async fn run(args: ListOrdersArgs, ctx: &AppContext) -> Result<(), String> {
    let orders: Vec<OrderSnapshot> = ctx
        .orders
        .list_orders()
        .await
        .map_err(|error| format!("failed to list orders: {}", describe(&error)))?
        .into_iter()
        .map(|stored| stored.order)
        .collect();

    let stats = OrderStats::from_orders(&orders);

    println!(
        "orders: {}  pending: {}  completed: {}  revenue: {}",
        stats.total_orders,
        stats.pending,
        stats.completed,
        format_amount(stats.revenue)
    );

    let matching = filter_orders(&orders, args.status, &args.search);

    if matching.is_empty() {
        println!("no orders found");
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Placed", "Status", "Items", "Total"]);

    for order in matching {
        builder.push_record([
            order.order_id().to_string(),
            order
                .created_at()
                .to_zoned(TimeZone::UTC)
                .strftime("%Y-%m-%d %H:%M")
                .to_string(),
            order.status().label().to_string(),
            order.item_count().to_string(),
            format_amount(order.grand_total()),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    println!("{table}");

    Ok(())
}
