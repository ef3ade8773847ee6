use crate::game::Direction;

/// Reversal filter applied at the input boundary, before a direction ever
/// reaches the engine.
///
/// Returns the direction to park for the next tick, or `None` when the
/// request is the exact opposite of the committed direction — the snake
/// cannot reverse into its own neck. Re-submitting the current direction
/// passes through unchanged.
pub fn filter_direction(current: Direction, requested: Direction) -> Option<Direction> {
    if current.is_opposite(requested) {
        None
    } else {
        Some(requested)
    }
}
