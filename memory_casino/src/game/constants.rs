/// Points awarded per second left on the clock when a Time Attack game is won.
pub const TIME_ATTACK_SECOND_VALUE: i64 = 10;

/// Seconds taken off the Time Attack clock when a mismatch is turned back down.
pub const TIME_ATTACK_MISMATCH_PENALTY_SECS: u32 = 2;

/// Remaining seconds at which the low-time warning fires.
pub const LOW_TIME_WARNING_SECS: u32 = 5;

/// Fallback Time Attack budget per pair when a pair count has no entry in
/// the schedule.
pub const TIME_ATTACK_FALLBACK_SECS_PER_PAIR: u32 = 8;

/// Minimum unmatched pairs left on the table for Double Down to be offered.
pub const DOUBLE_DOWN_MIN_REMAINING_PAIRS: usize = 3;

/// Flat chip bonus for finishing the Daily Challenge.
pub const DAILY_CHALLENGE_BONUS_CHIPS: u64 = 50;

/// Score points per chip of payout.
pub const POINTS_PER_CHIP: i64 = 100;

/// Delay before a mismatched pair is turned back down.
pub const MISMATCH_REVEAL_MS: u64 = 1000;

/// How long the Double Down peek keeps unmatched cards revealed.
pub const DOUBLE_DOWN_PEEK_MS: u64 = 2000;

/// Slots in the outbound effect channel.
pub const EFFECT_CHANNEL_CAPACITY: usize = 64;

/// Slots in the session inbox.
pub const INBOX_CAPACITY: usize = 100;
