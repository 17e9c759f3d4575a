use rand::seq::SliceRandom;
use uuid::Uuid;

/// Generates a unique identifier for locally created entities. Remote rows
/// get their ids from the service instead.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns a shuffled copy of `items`, leaving the input untouched. Used by
/// study-mode pages to randomize term order.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(&mut rand::thread_rng());
    out
}
