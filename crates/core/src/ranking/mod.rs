//! Business re-rankers applied after the hard constraints.

mod brand;
mod profit;
mod satisfaction;

pub use brand::{brand_score, rank_by_brand};
pub use profit::{optimize_profit, profit_margin, ProfitPolicy};
pub use satisfaction::{filter_by_satisfaction, SatisfactionPolicy};
