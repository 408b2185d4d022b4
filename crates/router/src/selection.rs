//! Best-price selection

use bestex_core::Fixed;
use bestex_exchanges::Side;

/// Index and price of the best entry for `side`.
///
/// Buy wants the lowest price and sell the highest. A later entry only
/// replaces the current best if it is strictly better, so on a tie the
/// earliest entry wins. `None` for an empty input.
pub fn select_best<I>(side: Side, prices: I) -> Option<(usize, Fixed)>
where
    I: IntoIterator<Item = (usize, Fixed)>,
{
    prices.into_iter().fold(None, |best, (index, price)| match best {
        None => Some((index, price)),
        Some((_, current)) if is_better(side, price, current) => Some((index, price)),
        keep => keep,
    })
}

fn is_better(side: Side, candidate: Fixed, current: Fixed) -> bool {
    match side {
        Side::Buy => candidate < current,
        Side::Sell => candidate > current,
    }
}
