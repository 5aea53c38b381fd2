pub mod collate;
mod error;
pub mod fallback;
pub mod normalize;
pub mod query;
pub mod state;
pub mod types;

pub use error::ParseError;
pub use fallback::{DEFAULT_SEED, FallbackSource};
pub use normalize::{
    normalize_bills, normalize_deputies, normalize_deputy, normalize_party_stats,
    normalize_stats, normalize_vote,
};
pub use query::{FilterCriteria, SortKey, apply_filters};
pub use state::AppState;
pub use types::{
    AlertBand, Bill, Dashboard, Deputy, DeputyId, GlobalStats, Level, PartyStats, SocialLinks,
    Vote, VoteRecord,
};
