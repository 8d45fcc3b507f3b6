use proptest::prelude::*;

/// Strategy for a batch plan: each argument paired with whether its work fails
pub fn batch_plan_strategy() -> impl Strategy<Value = Vec<(u32, bool)>> {
    prop::collection::vec((0u32..1_000, any::<bool>()), 0..40)
}

/// Strategy for concurrency limits, `None` meaning unlimited
pub fn limit_strategy() -> impl Strategy<Value = Option<usize>> {
    prop::option::of(1usize..8)
}

/// Strategy for optional error descriptions
pub fn optional_error_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z][a-z0-9 -]{0,31}")
}
