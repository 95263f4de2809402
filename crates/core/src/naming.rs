use crate::rule::NameSlice;

pub fn is_candidate_name(name: &str, original_extension: &str) -> bool {
    name.ends_with(original_extension)
}

/// Characters `[start, end)` of `name`, clamped to its length.
pub fn slice_original_name(name: &str, slice: NameSlice) -> String {
    name.chars().skip(slice.start()).take(slice.len()).collect()
}

pub fn format_counter(counter: usize, digits: usize) -> String {
    format!("{:0width$}", counter, width = digits)
}

pub fn compose_target_name(
    original_part: &str,
    new_name: &str,
    counter: &str,
    new_extension: &str,
) -> String {
    format!("{original_part}{new_name}{counter}.{new_extension}")
}

pub fn target_name_for(
    original_name: &str,
    counter: usize,
    new_name: &str,
    digits: usize,
    new_extension: &str,
    slice: NameSlice,
) -> String {
    let original_part = slice_original_name(original_name, slice);
    let counter = format_counter(counter, digits);
    compose_target_name(&original_part, new_name, &counter, new_extension)
}
