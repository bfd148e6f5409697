//! Plain-text rendering of a cart.

use std::fmt::Write;

use storefront_cart::Cart;

/// One line per cart line, then the total.
///
/// ```text
///   #1  Running sneaker  x2  @ 179.90  = 359.80
/// Items: 1  Units: 2  Total: 359.80
/// ```
pub fn render_cart(cart: &Cart) -> String {
    let mut out = String::new();

    if cart.is_empty() {
        out.push_str("Cart is empty\n");
        return out;
    }

    let title_width = cart
        .items()
        .iter()
        .map(|item| item.product.title.chars().count())
        .max()
        .unwrap_or(0);

    for item in cart.items() {
        let _ = writeln!(
            out,
            "  #{:<4} {:<width$}  x{:<3}  @ {:.2}  = {:.2}",
            item.product_id(),
            item.product.title,
            item.amount,
            item.product.price,
            item.subtotal(),
            width = title_width,
        );
    }

    let _ = writeln!(
        out,
        "Items: {}  Units: {}  Total: {:.2}",
        cart.cart_size(),
        cart.total_units(),
        cart.total()
    );

    out
}
