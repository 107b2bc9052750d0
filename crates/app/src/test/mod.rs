mod context;
mod helpers;

pub(crate) use context::TestContext;
pub(crate) use helpers::{cart_item, new_cart_item};
