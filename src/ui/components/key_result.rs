/// Outcome of offering a key or mouse event to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, and the parent has an event to process
  Event(T),
  /// Not consumed; the parent should try the next handler
  NotHandled,
}
