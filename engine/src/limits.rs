// Slots appended on each pool growth event are growth step + 1
pub const DEFAULT_GROWTH_STEP: usize = 1;
