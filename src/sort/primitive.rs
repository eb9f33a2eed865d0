/// Return a sorted copy of `sequence`, leaving the input untouched.
///
/// Elements are bare integers, so stability is irrelevant and the unstable
/// sort is used.
pub fn sort_sequence(sequence: &[i64]) -> Vec<i64> {
    let mut sorted = sequence.to_vec();
    sorted.sort_unstable();
    sorted
}

pub fn is_non_decreasing(sequence: &[i64]) -> bool {
    sequence.windows(2).all(|pair| pair[0] <= pair[1])
}
