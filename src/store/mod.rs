//! In-memory store for firms, reviews, resources and credentials
//!
//! One `Store` is built at startup and shared with every handler. All tables
//! live behind a single `RwLock`: reads share it, every mutation (a review
//! insert together with its rating recomputation) holds the write lock for
//! its whole duration. Ids are sequential per table, start at 1 and are never
//! reused. Lookups that miss return `None`/`false`, never an error.

mod seed;

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::{AuthError, CredentialHasher};
use crate::rating::{self, RatingSummary};
use crate::types::{
    AccountType, NewAccountType, NewPropFirm, NewResource, NewReview, NewUser, PropFirm, PropFirmUpdate,
    Resource, ResourceUpdate, Review, User,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Credential error: {0}")]
    Credentials(#[from] AuthError),
}

struct AdminCredentials {
    username: String,
    password_digest: String,
}

/// Next id for each table
struct Sequences {
    user: i64,
    firm: i64,
    account_type: i64,
    review: i64,
    resource: i64,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            user: 1,
            firm: 1,
            account_type: 1,
            review: 1,
            resource: 1,
        }
    }
}

fn take(seq: &mut i64) -> i64 {
    let id = *seq;
    *seq += 1;
    id
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    firms: BTreeMap<i64, PropFirm>,
    reviews: BTreeMap<i64, Review>,
    resources: BTreeMap<i64, Resource>,
    admins: Vec<AdminCredentials>,
    seq: Sequences,
}

impl Tables {
    fn account_types(&mut self, inputs: Vec<NewAccountType>) -> Vec<AccountType> {
        inputs
            .into_iter()
            .map(|a| {
                let id = take(&mut self.seq.account_type);
                a.into_account(id)
            })
            .collect()
    }

    /// Rewrite a firm's rating aggregate from its reviews. No-op for unknown firms.
    fn recompute_rating(&mut self, firm_id: i64) -> Option<RatingSummary> {
        let summary = RatingSummary::for_firm(firm_id, self.reviews.values());
        let firm = self.firms.get_mut(&firm_id)?;
        firm.avg_rating = summary.avg_rating;
        firm.rating_count = summary.rating_count;
        Some(summary)
    }
}

/// Process-lifetime store
pub struct Store {
    tables: RwLock<Tables>,
    hasher: CredentialHasher,
}

impl Store {
    /// Create an empty store
    pub fn new(hasher: CredentialHasher) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            hasher,
        }
    }

    // ==========================================
    // User Operations
    // ==========================================

    /// Register a user. Usernames are unique; the check and insert happen
    /// under the same lock.
    pub fn create_user(&self, input: NewUser) -> Result<User, StoreError> {
        let password_digest = self.hasher.digest(&input.username, &input.password)?;

        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::UsernameTaken);
        }

        let id = take(&mut tables.seq.user);
        let user = User {
            id,
            username: input.username,
            password_digest,
            is_admin: false,
        };
        tables.users.insert(id, user.clone());
        info!("Registered user {} ({})", id, user.username);
        Ok(user)
    }

    // ==========================================
    // Admin Operations
    // ==========================================

    pub fn add_admin(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let password_digest = self.hasher.digest(username, password)?;
        self.tables.write().admins.push(AdminCredentials {
            username: username.to_string(),
            password_digest,
        });
        info!("Admin account '{}' configured", username);
        Ok(())
    }

    pub fn verify_admin_credentials(&self, username: &str, password: &str) -> bool {
        self.tables
            .read()
            .admins
            .iter()
            .any(|a| a.username == username && self.hasher.verify(username, password, &a.password_digest))
    }

    // ==========================================
    // Firm Operations
    // ==========================================

    pub fn get_all_firms(&self) -> Vec<PropFirm> {
        self.tables.read().firms.values().cloned().collect()
    }

    pub fn get_featured_firms(&self) -> Vec<PropFirm> {
        self.tables
            .read()
            .firms
            .values()
            .filter(|f| f.featured)
            .cloned()
            .collect()
    }

    pub fn get_firm(&self, id: i64) -> Option<PropFirm> {
        self.tables.read().firms.get(&id).cloned()
    }

    /// Firms for the given ids, in the given order; unknown ids are skipped
    pub fn get_firms_by_ids(&self, ids: &[i64]) -> Vec<PropFirm> {
        let tables = self.tables.read();
        ids.iter().filter_map(|id| tables.firms.get(id).cloned()).collect()
    }

    /// Insert a firm. Its rating starts at 0/0 and every account row gets a
    /// fresh id and a derived discounted price.
    pub fn create_firm(&self, input: NewPropFirm) -> PropFirm {
        let mut tables = self.tables.write();
        let id = take(&mut tables.seq.firm);
        let account_types = tables.account_types(input.account_types);

        let firm = PropFirm {
            id,
            name: input.name,
            logo: input.logo,
            background_image: input.background_image,
            description: input.description,
            website_url: input.website_url,
            profit_split: input.profit_split,
            challenge_fee_min: input.challenge_fee_min,
            challenge_fee_max: input.challenge_fee_max,
            payout_time: input.payout_time,
            max_daily_drawdown: input.max_daily_drawdown,
            max_total_drawdown: input.max_total_drawdown,
            min_trading_days: input.min_trading_days,
            scaling_plan: input.scaling_plan,
            trading_platforms: input.trading_platforms,
            tradable_assets: input.tradable_assets,
            evaluation_stages: input.evaluation_stages,
            news_trading_allowed: input.news_trading_allowed,
            dca_allowed: input.dca_allowed,
            max_trailing_allowed: input.max_trailing_allowed,
            micro_scalping_allowed: input.micro_scalping_allowed,
            copy_trading_allowed: input.copy_trading_allowed,
            max_accounts_per_trader: input.max_accounts_per_trader,
            max_contracts_per_trade: input.max_contracts_per_trade,
            consistency_eval: input.consistency_eval,
            consistency_funded: input.consistency_funded,
            featured: input.featured,
            avg_rating: 0.0,
            rating_count: 0,
            account_types,
            extra: input.extra,
        };

        tables.firms.insert(id, firm.clone());
        info!("Created firm {} ({})", id, firm.name);
        firm
    }

    /// Merge the present fields onto an existing firm. An explicit `null`
    /// clears a nullable field.
    pub fn update_firm(&self, id: i64, updates: PropFirmUpdate) -> Option<PropFirm> {
        let mut tables = self.tables.write();
        if !tables.firms.contains_key(&id) {
            return None;
        }
        let account_types = updates.account_types.map(|a| tables.account_types(a));
        let firm = tables.firms.get_mut(&id)?;

        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = updates.$field { firm.$field = v; })*
            };
        }
        merge!(
            name,
            description,
            scaling_plan,
            trading_platforms,
            tradable_assets,
            evaluation_stages,
            news_trading_allowed,
            dca_allowed,
            max_trailing_allowed,
            micro_scalping_allowed,
            copy_trading_allowed,
            featured,
            extra,
            logo,
            background_image,
            website_url,
            profit_split,
            challenge_fee_min,
            challenge_fee_max,
            payout_time,
            max_daily_drawdown,
            max_total_drawdown,
            min_trading_days,
            max_accounts_per_trader,
            max_contracts_per_trade,
            consistency_eval,
            consistency_funded,
        );
        if let Some(accounts) = account_types {
            firm.account_types = accounts;
        }

        info!("Updated firm {}", id);
        Some(firm.clone())
    }

    /// Remove a firm. Its reviews are left in place.
    pub fn delete_firm(&self, id: i64) -> bool {
        let removed = self.tables.write().firms.remove(&id).is_some();
        if removed {
            info!("Deleted firm {}", id);
        }
        removed
    }

    // ==========================================
    // Review Operations
    // ==========================================

    pub fn get_all_reviews(&self) -> Vec<Review> {
        self.tables.read().reviews.values().cloned().collect()
    }

    pub fn get_reviews_by_firm(&self, firm_id: i64) -> Vec<Review> {
        self.tables
            .read()
            .reviews
            .values()
            .filter(|r| r.firm_id == firm_id)
            .cloned()
            .collect()
    }

    /// Insert a review and refresh the rating of the firm it points at
    /// before returning. A review for an unknown firm is still stored.
    pub fn create_review(&self, input: NewReview) -> Review {
        let mut tables = self.tables.write();
        let id = take(&mut tables.seq.review);
        let review = Review {
            id,
            firm_id: input.firm_id,
            username: input.username,
            rating: input.rating,
            title: input.title,
            content: input.content,
            trading_experience: input.trading_experience,
            created_at: Utc::now(),
        };
        tables.reviews.insert(id, review.clone());
        info!("Created review {} for firm {} (rating {})", id, review.firm_id, review.rating);

        match tables.recompute_rating(review.firm_id) {
            Some(summary) => info!(
                "Firm {} rating now {} from {} reviews",
                review.firm_id,
                rating::display(summary.avg_rating),
                summary.rating_count
            ),
            None => debug!("Review {} references unknown firm {}", id, review.firm_id),
        }
        review
    }

    // ==========================================
    // Resource Operations
    // ==========================================

    pub fn get_all_resources(&self) -> Vec<Resource> {
        self.tables.read().resources.values().cloned().collect()
    }

    pub fn get_resources_by_category(&self, category: &str) -> Vec<Resource> {
        self.tables
            .read()
            .resources
            .values()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    pub fn get_resource(&self, id: i64) -> Option<Resource> {
        self.tables.read().resources.get(&id).cloned()
    }

    pub fn create_resource(&self, input: NewResource) -> Resource {
        let mut tables = self.tables.write();
        let id = take(&mut tables.seq.resource);
        let resource = Resource {
            id,
            title: input.title,
            content: input.content,
            summary: input.summary,
            category: input.category,
            author_name: input.author_name,
            author_image: input.author_image,
            image: input.image,
            read_time: input.read_time,
            published_at: input.published_at.unwrap_or_else(Utc::now),
        };
        tables.resources.insert(id, resource.clone());
        info!("Created resource {} ({})", id, resource.title);
        resource
    }

    pub fn update_resource(&self, id: i64, updates: ResourceUpdate) -> Option<Resource> {
        let mut tables = self.tables.write();
        let resource = tables.resources.get_mut(&id)?;

        if let Some(v) = updates.title {
            resource.title = v;
        }
        if let Some(v) = updates.content {
            resource.content = v;
        }
        if let Some(v) = updates.summary {
            resource.summary = v;
        }
        if let Some(v) = updates.category {
            resource.category = v;
        }
        if let Some(v) = updates.author_name {
            resource.author_name = v;
        }
        if let Some(v) = updates.author_image {
            resource.author_image = v;
        }
        if let Some(v) = updates.image {
            resource.image = v;
        }
        if let Some(v) = updates.read_time {
            resource.read_time = v;
        }
        if let Some(v) = updates.published_at {
            resource.published_at = v;
        }

        info!("Updated resource {}", id);
        Some(resource.clone())
    }

    pub fn delete_resource(&self, id: i64) -> bool {
        let removed = self.tables.write().resources.remove(&id).is_some();
        if removed {
            info!("Deleted resource {}", id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrawdownType;
    use std::sync::Arc;

    fn store() -> Store {
        Store::new(CredentialHasher::new("test"))
    }

    fn review_for(firm_id: i64, rating: u8) -> NewReview {
        NewReview {
            firm_id,
            username: "Emma Thompson".to_string(),
            rating,
            title: "Great Profit Split".to_string(),
            content: "Challenge rules are reasonable and payouts are fast.".to_string(),
            trading_experience: None,
        }
    }

    #[test]
    fn test_rating_follows_reviews() {
        let store = store();
        let firm = store.create_firm(NewPropFirm::named("Firm A", "Evaluation firm"));
        assert_eq!(firm.avg_rating, 0.0);
        assert_eq!(firm.rating_count, 0);

        store.create_review(review_for(firm.id, 5));
        let firm_after = store.get_firm(firm.id).unwrap();
        assert_eq!(firm_after.avg_rating, 5.0);
        assert_eq!(firm_after.rating_count, 1);

        store.create_review(review_for(firm.id, 3));
        let firm_after = store.get_firm(firm.id).unwrap();
        assert_eq!(firm_after.avg_rating, 4.0);
        assert_eq!(firm_after.rating_count, 2);
    }

    #[test]
    fn test_concurrent_reviews_keep_rating_consistent() {
        let store = Arc::new(store());
        let firm = store.create_firm(NewPropFirm::named("Firm A", "Evaluation firm"));

        let handles: Vec<_> = (0..16u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        store.create_review(review_for(firm.id, i % 5 + 1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reviews = store.get_reviews_by_firm(firm.id);
        assert_eq!(reviews.len(), 160);
        let mean = reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / reviews.len() as f64;
        let firm_after = store.get_firm(firm.id).unwrap();
        assert_eq!(firm_after.rating_count, 160);
        assert!((firm_after.avg_rating - mean).abs() < 1e-9);
    }

    #[test]
    fn test_review_for_unknown_firm_is_stored() {
        let store = store();
        let review = store.create_review(review_for(42, 4));
        assert_eq!(review.id, 1);
        assert_eq!(store.get_reviews_by_firm(42).len(), 1);
        assert!(store.get_firm(42).is_none());
    }

    #[test]
    fn test_reviews_do_not_touch_other_firms() {
        let store = store();
        let a = store.create_firm(NewPropFirm::named("Firm A", "Evaluation firm"));
        let b = store.create_firm(NewPropFirm::named("Firm B", "Evaluation firm"));
        store.create_review(review_for(a.id, 2));
        assert_eq!(store.get_firm(b.id).unwrap().rating_count, 0);
        assert_eq!(store.get_reviews_by_firm(a.id).len(), 1);
        assert_eq!(store.get_all_reviews().len(), 1);
    }

    #[test]
    fn test_ids_are_sequential_and_not_reused() {
        let store = store();
        let a = store.create_firm(NewPropFirm::named("Firm A", "Evaluation firm"));
        let b = store.create_firm(NewPropFirm::named("Firm B", "Evaluation firm"));
        assert_eq!((a.id, b.id), (1, 2));
        assert!(store.delete_firm(b.id));
        let c = store.create_firm(NewPropFirm::named("Firm C", "Evaluation firm"));
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_missing_ids_report_absent() {
        let store = store();
        assert!(store.get_firm(999_999).is_none());
        assert!(store.update_firm(999_999, PropFirmUpdate::default()).is_none());
        assert!(!store.delete_firm(999_999));
        assert!(store.update_resource(7, ResourceUpdate::default()).is_none());
        assert!(!store.delete_resource(7));
    }

    #[test]
    fn test_update_merges_and_keeps_rating() {
        let store = store();
        let firm = store.create_firm(NewPropFirm::named("Firm A", "Evaluation firm"));
        store.create_review(review_for(firm.id, 4));

        let updated = store
            .update_firm(
                firm.id,
                PropFirmUpdate {
                    featured: Some(true),
                    profit_split: Some(Some(90.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.featured);
        assert_eq!(updated.profit_split, Some(90.0));
        assert_eq!(updated.name, "Firm A");
        assert_eq!(updated.avg_rating, 4.0);
        assert_eq!(updated.rating_count, 1);
        assert_eq!(store.get_featured_firms().len(), 1);
    }

    #[test]
    fn test_account_types_get_ids_and_prices() {
        let store = store();
        let mut input = NewPropFirm::named("Apex", "Futures evaluation firm");
        input.account_types = vec![
            serde_json::from_value(serde_json::json!({
                "accountSize": 50000, "price": 100.0, "currentDiscountRate": 25.0
            }))
            .unwrap(),
            serde_json::from_value(serde_json::json!({
                "accountSize": 100000, "drawdownType": "EOT", "price": 99.99, "currentDiscountRate": 10.0
            }))
            .unwrap(),
        ];
        let firm = store.create_firm(input);
        let prices: Vec<_> = firm.account_types.iter().map(|a| (a.id, a.discounted_price)).collect();
        assert_eq!(prices, vec![(1, 75.0), (2, 89.99)]);
        assert_eq!(firm.account_types[1].drawdown_type, DrawdownType::Eot);

        let replacement: NewAccountType = serde_json::from_value(serde_json::json!({
            "accountSize": 25000, "price": 80.0, "currentDiscountRate": 100.0
        }))
        .unwrap();
        let updated = store
            .update_firm(
                firm.id,
                PropFirmUpdate {
                    account_types: Some(vec![replacement]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.account_types.len(), 1);
        assert_eq!(updated.account_types[0].id, 3);
        assert_eq!(updated.account_types[0].discounted_price, 0.0);
    }

    #[test]
    fn test_resource_category_exact_match() {
        let store = store();
        for (title, category) in [("Passing a challenge", "Beginner Guide"), ("Sizing positions", "Risk Management")] {
            store.create_resource(NewResource {
                title: title.to_string(),
                content: "Long form article content goes here.".to_string(),
                summary: "Short summary text".to_string(),
                category: category.to_string(),
                author_name: "Sarah Johnson".to_string(),
                author_image: None,
                image: None,
                read_time: Some(8),
                published_at: None,
            });
        }
        assert_eq!(store.get_resources_by_category("Risk Management").len(), 1);
        assert!(store.get_resources_by_category("risk management").is_empty());

        let updated = store
            .update_resource(1, ResourceUpdate { read_time: Some(Some(10)), ..Default::default() })
            .unwrap();
        assert_eq!(updated.read_time, Some(10));
        assert_eq!(updated.title, "Passing a challenge");

        let cleared = store
            .update_resource(1, ResourceUpdate { read_time: Some(None), ..Default::default() })
            .unwrap();
        assert_eq!(cleared.read_time, None);
        assert_eq!(cleared.category, "Beginner Guide");
    }

    #[test]
    fn test_users_and_admins() {
        let store = store();
        let user = store
            .create_user(NewUser { username: "trader".to_string(), password: "pw".to_string() })
            .unwrap();
        assert_eq!(user.id, 1);
        assert!(!user.is_admin);
        assert_ne!(user.password_digest, "pw");

        let dup = store.create_user(NewUser { username: "trader".to_string(), password: "x".to_string() });
        assert!(matches!(dup, Err(StoreError::UsernameTaken)));

        store.add_admin("admin", "admin123").unwrap();
        assert!(store.verify_admin_credentials("admin", "admin123"));
        assert!(!store.verify_admin_credentials("admin", "wrong"));
        assert!(!store.verify_admin_credentials("trader", "pw"));
    }
}
