//! Value comparison with nil and empty-sequence normalization.

use crate::value::Value;

/// Decides whether `got` satisfies `want`.
///
/// Rules, in order:
/// 1. two nil values are equal whatever their types ([`Value::is_nil`]);
/// 2. two sequences of length zero are equal, allocated or not;
/// 3. otherwise deep structural equality.
///
/// Maps get no special treatment: an unallocated map is not equal to an empty one.
pub fn values_equal(want: &Value, got: &Value) -> bool {
    both_nil(want, got) || equal_empty_sequences(want, got) || want == got
}

/// Checks whether both values are nil, regardless of their type tags.
pub fn both_nil(a: &Value, b: &Value) -> bool {
    a.is_nil() && b.is_nil()
}

/// Checks whether both values are sequences with no elements.
pub fn equal_empty_sequences(a: &Value, b: &Value) -> bool {
    matches!((a.seq_len(), b.seq_len()), (Some(0), Some(0)))
}
