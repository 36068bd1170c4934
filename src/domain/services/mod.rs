pub mod funding_selector;
pub mod ownership_splitter;
pub mod payout_batcher;
pub mod reward_allocator;

pub use funding_selector::FundingSelector;
pub use ownership_splitter::{OwnershipSplit, OwnershipSplitter};
pub use payout_batcher::{BatchDecision, PayoutBatcher};
pub use reward_allocator::{FarmAllocation, FeeBreakdown, RewardAllocator};
