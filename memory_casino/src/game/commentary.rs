//! Table talk shown after a successful match.

use rand::{Rng, seq::IndexedRandom};

use super::config::ScoringConfig;
use super::entities::MatchComment;

pub const COMMENT_PERFECT: &str = "comment_perfect";
pub const COMMENT_THE_NUTS: &str = "comment_the_nuts";
pub const COMMENT_HIGH_ROLLER: &str = "comment_high_roller";
pub const COMMENT_ALL_IN: &str = "comment_all_in";
pub const COMMENT_POT_ODDS: &str = "comment_pot_odds";
pub const COMMENT_PHOTOGRAPHIC: &str = "comment_photographic";
pub const COMMENT_ONE_MORE: &str = "comment_one_more";

/// Comments with no trigger of their own, picked at random.
pub const FLAVOR_COMMENTS: [&str; 8] = [
    "comment_flavor_lucky_draw",
    "comment_flavor_card_sharp",
    "comment_flavor_house_edge",
    "comment_flavor_full_house",
    "comment_flavor_poker_face",
    "comment_flavor_ace_up_sleeve",
    "comment_flavor_hot_table",
    "comment_flavor_let_it_ride",
];

/// What the selector needs to know about the match just made
#[derive(Clone, Copy, Debug)]
pub struct CommentContext {
    pub matches_found: usize,
    pub pair_count: usize,
    /// Combo before this match was counted
    pub combo: u32,
    pub moves: u32,
}

/// Pick the comment for a match. Rules are checked in priority order and
/// only the fallback consumes randomness.
pub fn select_comment<R: Rng + ?Sized>(
    ctx: &CommentContext,
    config: &ScoringConfig,
    rng: &mut R,
) -> MatchComment {
    let pot_odds_target = ctx.pair_count / config.comment_pot_odds_divisor.max(1);
    let photographic_limit =
        ctx.matches_found as u64 * u64::from(config.comment_moves_per_match_threshold);

    if ctx.matches_found == ctx.pair_count {
        MatchComment::new(COMMENT_PERFECT).with_arg(ctx.moves)
    } else if ctx.combo > config.the_nuts_threshold {
        MatchComment::new(COMMENT_THE_NUTS).with_arg(ctx.combo + 1)
    } else if ctx.combo > config.high_roller_threshold {
        MatchComment::new(COMMENT_HIGH_ROLLER).with_arg(ctx.combo + 1)
    } else if ctx.matches_found == 1 {
        MatchComment::new(COMMENT_ALL_IN)
    } else if ctx.matches_found == pot_odds_target {
        MatchComment::new(COMMENT_POT_ODDS)
            .with_arg(ctx.matches_found)
            .with_arg(ctx.pair_count)
    } else if u64::from(ctx.moves) <= photographic_limit {
        MatchComment::new(COMMENT_PHOTOGRAPHIC).with_arg(ctx.moves)
    } else if ctx.pair_count - ctx.matches_found == 1 {
        MatchComment::new(COMMENT_ONE_MORE)
    } else {
        let key = FLAVOR_COMMENTS
            .choose(rng)
            .copied()
            .unwrap_or(FLAVOR_COMMENTS[0]);
        MatchComment::new(key)
    }
}
