// Predicates for `skip_serializing_if`: the console omits zero values.

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}
