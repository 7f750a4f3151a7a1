//! Search, filter and sort over fetched collections
//!
//! The same queries the directory pages run client-side, exposed as optional
//! query parameters on the list endpoints.

use serde::Deserialize;
use std::cmp::Ordering;

use crate::types::{PropFirm, Resource, Review};

/// Most firms shown side by side in a comparison
pub const MAX_COMPARE: usize = 3;

const ALL_ASSETS: &str = "all";
const ALL_CATEGORIES: &str = "All Categories";

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Firm list ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirmSort {
    #[default]
    Default,
    ProfitHigh,
    ProfitLow,
    FeeLow,
    FeeHigh,
    RatingHigh,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirmQuery {
    pub search: Option<String>,
    pub asset: Option<String>,
    #[serde(default)]
    pub sort: FirmSort,
}

impl FirmQuery {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.asset.is_none() && self.sort == FirmSort::Default
    }

    /// Filter then stable-sort. Missing numbers compare as 0.
    pub fn apply(&self, firms: Vec<PropFirm>) -> Vec<PropFirm> {
        let needle = self.search.as_deref().map(str::to_lowercase);
        let asset = self.asset.as_deref().filter(|a| *a != ALL_ASSETS);

        let mut out: Vec<PropFirm> = firms
            .into_iter()
            .filter(|f| match &needle {
                Some(n) => contains_ci(&f.name, n) || contains_ci(&f.description, n),
                None => true,
            })
            .filter(|f| match asset {
                Some(a) => f.tradable_assets.iter().any(|t| t == a),
                None => true,
            })
            .collect();

        let key = |v: Option<f64>| v.unwrap_or(0.0);
        match self.sort {
            FirmSort::Default => {}
            FirmSort::ProfitHigh => out.sort_by(|a, b| cmp_f64(key(b.profit_split), key(a.profit_split))),
            FirmSort::ProfitLow => out.sort_by(|a, b| cmp_f64(key(a.profit_split), key(b.profit_split))),
            FirmSort::FeeLow => {
                out.sort_by(|a, b| cmp_f64(key(a.challenge_fee_min), key(b.challenge_fee_min)))
            }
            FirmSort::FeeHigh => {
                out.sort_by(|a, b| cmp_f64(key(b.challenge_fee_min), key(a.challenge_fee_min)))
            }
            FirmSort::RatingHigh => out.sort_by(|a, b| cmp_f64(b.avg_rating, a.avg_rating)),
        }
        out
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub search: Option<String>,
    pub firm_id: Option<i64>,
    pub rating: Option<u8>,
}

impl ReviewQuery {
    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        let needle = self.search.as_deref().map(str::to_lowercase);
        reviews
            .into_iter()
            .filter(|r| match &needle {
                Some(n) => {
                    contains_ci(&r.title, n) || contains_ci(&r.content, n) || contains_ci(&r.username, n)
                }
                None => true,
            })
            .filter(|r| self.firm_id.map_or(true, |id| r.firm_id == id))
            .filter(|r| self.rating.map_or(true, |rating| r.rating == rating))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ResourceQuery {
    pub fn apply(&self, resources: Vec<Resource>) -> Vec<Resource> {
        let needle = self.search.as_deref().map(str::to_lowercase);
        let category = self.category.as_deref().filter(|c| *c != ALL_CATEGORIES);
        resources
            .into_iter()
            .filter(|r| match &needle {
                Some(n) => contains_ci(&r.title, n) || contains_ci(&r.summary, n),
                None => true,
            })
            .filter(|r| category.map_or(true, |c| r.category == c))
            .collect()
    }
}

/// Parse `ids=1,2,3` into a comparison selection: request order, no duplicates,
/// at most `MAX_COMPARE`. Unparsable entries are skipped.
pub fn compare_selection(ids: &str) -> Vec<i64> {
    let mut selected = Vec::with_capacity(MAX_COMPARE);
    for id in ids.split(',').filter_map(|s| s.trim().parse::<i64>().ok()) {
        if selected.len() == MAX_COMPARE {
            break;
        }
        if !selected.contains(&id) {
            selected.push(id);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewPropFirm;

    fn firm(id: i64, name: &str, split: Option<f64>, fee: Option<f64>, rating: f64, assets: &[&str]) -> PropFirm {
        let input = NewPropFirm::named(name, "A prop trading firm");
        PropFirm {
            id,
            name: input.name,
            logo: None,
            background_image: None,
            description: input.description,
            website_url: None,
            profit_split: split,
            challenge_fee_min: fee,
            challenge_fee_max: None,
            payout_time: None,
            max_daily_drawdown: None,
            max_total_drawdown: None,
            min_trading_days: None,
            scaling_plan: false,
            trading_platforms: Vec::new(),
            tradable_assets: assets.iter().map(|s| s.to_string()).collect(),
            evaluation_stages: Vec::new(),
            news_trading_allowed: false,
            dca_allowed: false,
            max_trailing_allowed: false,
            micro_scalping_allowed: false,
            copy_trading_allowed: false,
            max_accounts_per_trader: None,
            max_contracts_per_trade: None,
            consistency_eval: None,
            consistency_funded: None,
            featured: false,
            avg_rating: rating,
            rating_count: 0,
            account_types: Vec::new(),
            extra: Vec::new(),
        }
    }

    fn sample() -> Vec<PropFirm> {
        vec![
            firm(1, "FTMO", Some(80.0), Some(540.0), 5.0, &["Forex", "Stocks"]),
            firm(2, "Funded Next", Some(90.0), Some(349.0), 4.0, &["Forex"]),
            firm(3, "Apex", None, None, 4.5, &["Futures"]),
        ]
    }

    fn ids(firms: &[PropFirm]) -> Vec<i64> {
        firms.iter().map(|f| f.id).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let q = FirmQuery { search: Some("funded".to_string()), ..Default::default() };
        assert_eq!(ids(&q.apply(sample())), vec![2]);
    }

    #[test]
    fn test_asset_filter() {
        let q = FirmQuery { asset: Some("Forex".to_string()), ..Default::default() };
        assert_eq!(ids(&q.apply(sample())), vec![1, 2]);

        let all = FirmQuery { asset: Some("all".to_string()), ..Default::default() };
        assert_eq!(ids(&all.apply(sample())), vec![1, 2, 3]);
    }

    #[test]
    fn test_sorts_treat_missing_as_zero() {
        let q = FirmQuery { sort: FirmSort::ProfitHigh, ..Default::default() };
        assert_eq!(ids(&q.apply(sample())), vec![2, 1, 3]);

        let q = FirmQuery { sort: FirmSort::FeeLow, ..Default::default() };
        assert_eq!(ids(&q.apply(sample())), vec![3, 2, 1]);

        let q = FirmQuery { sort: FirmSort::RatingHigh, ..Default::default() };
        assert_eq!(ids(&q.apply(sample())), vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_parses_snake_case() {
        let q: FirmQuery = serde_json::from_value(serde_json::json!({"sort": "fee_high"})).unwrap();
        assert_eq!(q.sort, FirmSort::FeeHigh);
        assert!(!q.is_empty());
        assert!(FirmQuery::default().is_empty());
    }

    #[test]
    fn test_compare_selection() {
        assert_eq!(compare_selection("3,1,3,x,2,5"), vec![3, 1, 2]);
        assert!(compare_selection("").is_empty());
    }
}
