//! Type definitions for the directory
//!
//! Stored records, insert shapes (no id, no derived fields) and partial
//! update shapes. All JSON is camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

use crate::pricing;

// ==========================================
// Firms
// ==========================================

/// One free-form key/value pair attached to a firm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraField {
    pub key: String,
    pub value: String,
}

/// Proprietary trading firm profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropFirm {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub background_image: Option<String>,
    pub description: String,
    pub website_url: Option<String>,
    // Company-wide figures shown on cards and in the compare table
    pub profit_split: Option<f64>,
    pub challenge_fee_min: Option<f64>,
    pub challenge_fee_max: Option<f64>,
    pub payout_time: Option<u32>,
    pub max_daily_drawdown: Option<f64>,
    pub max_total_drawdown: Option<f64>,
    pub min_trading_days: Option<u32>,
    pub scaling_plan: bool,
    pub trading_platforms: Vec<String>,
    pub tradable_assets: Vec<String>,
    pub evaluation_stages: Vec<String>,
    // Firm-level rules
    pub news_trading_allowed: bool,
    #[serde(rename = "DCAAllowed")]
    pub dca_allowed: bool,
    pub max_trailing_allowed: bool,
    pub micro_scalping_allowed: bool,
    pub copy_trading_allowed: bool,
    pub max_accounts_per_trader: Option<u32>,
    pub max_contracts_per_trade: Option<u32>,
    pub consistency_eval: Option<f64>,
    pub consistency_funded: Option<f64>,
    pub featured: bool,
    // Derived from reviews, never written by clients
    pub avg_rating: f64,
    pub rating_count: u32,
    pub account_types: Vec<AccountType>,
    pub extra: Vec<ExtraField>,
}

/// Firm insert body. Ids and rating aggregates are not part of it, so any
/// such fields a client sends are dropped during decoding.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPropFirm {
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    pub description: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub profit_split: Option<f64>,
    #[serde(default)]
    pub challenge_fee_min: Option<f64>,
    #[serde(default)]
    pub challenge_fee_max: Option<f64>,
    #[serde(default)]
    pub payout_time: Option<u32>,
    #[serde(default)]
    pub max_daily_drawdown: Option<f64>,
    #[serde(default)]
    pub max_total_drawdown: Option<f64>,
    #[serde(default)]
    pub min_trading_days: Option<u32>,
    #[serde(default)]
    pub scaling_plan: bool,
    #[serde(default)]
    pub trading_platforms: Vec<String>,
    #[serde(default)]
    pub tradable_assets: Vec<String>,
    #[serde(default)]
    pub evaluation_stages: Vec<String>,
    #[serde(default)]
    pub news_trading_allowed: bool,
    #[serde(default, rename = "DCAAllowed")]
    pub dca_allowed: bool,
    #[serde(default)]
    pub max_trailing_allowed: bool,
    #[serde(default)]
    pub micro_scalping_allowed: bool,
    #[serde(default)]
    pub copy_trading_allowed: bool,
    #[serde(default)]
    pub max_accounts_per_trader: Option<u32>,
    #[serde(default)]
    pub max_contracts_per_trade: Option<u32>,
    #[serde(default)]
    pub consistency_eval: Option<f64>,
    #[serde(default)]
    pub consistency_funded: Option<f64>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub account_types: Vec<NewAccountType>,
    #[serde(default)]
    pub extra: Vec<ExtraField>,
}

impl NewPropFirm {
    /// Minimal insert body, used by seeding and tests
    pub fn named(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            logo: None,
            background_image: None,
            description: description.to_string(),
            website_url: None,
            profit_split: None,
            challenge_fee_min: None,
            challenge_fee_max: None,
            payout_time: None,
            max_daily_drawdown: None,
            max_total_drawdown: None,
            min_trading_days: None,
            scaling_plan: false,
            trading_platforms: Vec::new(),
            tradable_assets: Vec::new(),
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
            account_types: Vec::new(),
            extra: Vec::new(),
        }
    }
}

/// Firm update request (all fields optional). `accountTypes`, when present,
/// replaces the whole offering list. Nullable fields are `Option<Option<_>>`:
/// absent leaves the value, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropFirmUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub logo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub background_image: Option<Option<String>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub profit_split: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub challenge_fee_min: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub challenge_fee_max: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub payout_time: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub max_daily_drawdown: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub max_total_drawdown: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub min_trading_days: Option<Option<u32>>,
    pub scaling_plan: Option<bool>,
    pub trading_platforms: Option<Vec<String>>,
    pub tradable_assets: Option<Vec<String>>,
    pub evaluation_stages: Option<Vec<String>>,
    pub news_trading_allowed: Option<bool>,
    #[serde(rename = "DCAAllowed")]
    pub dca_allowed: Option<bool>,
    pub max_trailing_allowed: Option<bool>,
    pub micro_scalping_allowed: Option<bool>,
    pub copy_trading_allowed: Option<bool>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub max_accounts_per_trader: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub max_contracts_per_trade: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub consistency_eval: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub consistency_funded: Option<Option<f64>>,
    pub featured: Option<bool>,
    pub account_types: Option<Vec<NewAccountType>>,
    pub extra: Option<Vec<ExtraField>>,
}

// ==========================================
// Account offerings
// ==========================================

/// Drawdown measurement: End-Of-Day, End-Of-Test, Trailing Max Daily Drawdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawdownType {
    #[default]
    Eod,
    Eot,
    Tmdd,
}

/// How a trader gets to a funded account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AccountProgram {
    /// One or more evaluation phases before funding
    #[serde(rename_all = "camelCase")]
    Evaluation {
        stages: u32,
        #[serde(default)]
        min_evaluation_days: u32,
        #[serde(default)]
        min_funded_days: u32,
    },
    /// Funded on purchase, no evaluation
    #[serde(rename_all = "camelCase")]
    InstantFunding {
        #[serde(default)]
        min_funded_days: u32,
    },
}

impl Default for AccountProgram {
    fn default() -> Self {
        AccountProgram::Evaluation {
            stages: 1,
            min_evaluation_days: 0,
            min_funded_days: 0,
        }
    }
}

/// Per-account rule flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountRules {
    pub news_trading_allowed: bool,
    #[serde(rename = "DCAAllowed")]
    pub dca_allowed: bool,
    pub max_trailing_allowed: bool,
    pub micro_scalping_allowed: bool,
    pub copy_trading_allowed: bool,
    pub scaling_plan: bool,
    pub algo_trading_allowed: bool,
    pub reset_allowed: bool,
}

/// One purchasable account offering of a firm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountType {
    pub id: i64,
    pub account_size: u64,
    pub drawdown_type: DrawdownType,
    pub price: f64,
    /// Percent, 0-100
    pub current_discount_rate: f64,
    pub discounted_price: f64,
    pub activation_fee: f64,
    pub target_profit: f64,
    /// Maximum loss limit
    #[serde(rename = "MLL")]
    pub mll: f64,
    /// Daily loss limit, absent when the account has none
    #[serde(rename = "DLL")]
    pub dll: Option<f64>,
    /// Percent, 0-100
    pub payout_ratio: f64,
    pub payout_frequency: String,
    pub rules: AccountRules,
    pub program: AccountProgram,
}

/// Account offering as submitted by a client. `discountedPrice` is not
/// accepted; it is derived from price and discount rate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountType {
    pub account_size: u64,
    #[serde(default)]
    pub drawdown_type: DrawdownType,
    pub price: f64,
    #[serde(default)]
    pub current_discount_rate: f64,
    #[serde(default)]
    pub activation_fee: f64,
    #[serde(default)]
    pub target_profit: f64,
    #[serde(default, rename = "MLL")]
    pub mll: f64,
    #[serde(default, rename = "DLL")]
    pub dll: Option<f64>,
    #[serde(default)]
    pub payout_ratio: f64,
    #[serde(default)]
    pub payout_frequency: String,
    #[serde(default)]
    pub rules: AccountRules,
    #[serde(default)]
    pub program: AccountProgram,
}

impl NewAccountType {
    /// Build the stored row, deriving the discounted price
    pub fn into_account(self, id: i64) -> AccountType {
        AccountType {
            id,
            account_size: self.account_size,
            drawdown_type: self.drawdown_type,
            price: self.price,
            current_discount_rate: self.current_discount_rate,
            discounted_price: pricing::discounted_price(self.price, self.current_discount_rate),
            activation_fee: self.activation_fee,
            target_profit: self.target_profit,
            mll: self.mll,
            dll: self.dll,
            payout_ratio: self.payout_ratio,
            payout_frequency: self.payout_frequency,
            rules: self.rules,
            program: self.program,
        }
    }
}

// ==========================================
// Reviews
// ==========================================

/// Trader review of a firm. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub firm_id: i64,
    pub username: String,
    pub rating: u8,
    pub title: String,
    pub content: String,
    pub trading_experience: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub firm_id: i64,
    pub username: String,
    pub rating: u8,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub trading_experience: Option<String>,
}

// ==========================================
// Resources
// ==========================================

/// Educational article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: String,
    pub author_name: String,
    pub author_image: Option<String>,
    pub image: Option<String>,
    pub read_time: Option<u32>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: String,
    pub author_name: String,
    #[serde(default)]
    pub author_image: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub read_time: Option<u32>,
    /// Defaults to insert time
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub author_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub read_time: Option<Option<u32>>,
    pub published_at: Option<DateTime<Utc>>,
}

// ==========================================
// Users & admin
// ==========================================

/// Registered user. The password digest never leaves the process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// Admin login body. Missing fields fail authentication, not decoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}
