/// Scene context and state machine.
pub mod hero;
/// Settle and scatter tween plans.
pub mod transition;
