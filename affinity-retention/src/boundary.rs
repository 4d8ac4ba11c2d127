/// Whether the message at 1-based position `sequence` closes an analysis cycle.
pub fn is_cycle_boundary(sequence: u64, cycle_length: usize) -> bool {
    cycle_length > 0 && sequence > 0 && sequence % cycle_length as u64 == 0
}
