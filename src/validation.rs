//! Request body validation
//!
//! Every insert/update body is checked once, before any store mutation.
//! All violated constraints are collected in field order and reported as a
//! single message: `Validation error: <msg> at "<path>"; <msg> at "<path>"`.

use thiserror::Error;
use url::Url;

use crate::types::{
    AccountProgram, ExtraField, NewAccountType, NewPropFirm, NewResource, NewReview, NewUser,
    PropFirmUpdate, ResourceUpdate,
};

/// A single failed field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
#[error("Validation error: {}", format_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} at \"{}\"", v.message, v.path))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Schema check for a decoded request body
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn fail(&mut self, path: impl Into<String>, message: &str) {
        self.violations.push(Violation {
            path: path.into(),
            message: message.to_string(),
        });
    }

    fn min_len(&mut self, path: &str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.fail(path, message);
        }
    }

    fn range(&mut self, path: impl Into<String>, value: f64, min: f64, max: f64, message: &str) {
        if !value.is_finite() || value < min || value > max {
            self.fail(path, message);
        }
    }

    fn non_negative(&mut self, path: impl Into<String>, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.fail(path, "Must be zero or greater");
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}

// ==========================================
// Firms
// ==========================================

fn check_name(c: &mut Checker, name: &str) {
    c.min_len("name", name, 2, "Name must be at least 2 characters");
}

fn check_description(c: &mut Checker, description: &str) {
    if description.trim().is_empty() {
        c.fail("description", "Description is required");
    }
}

fn check_website(c: &mut Checker, website: &str) {
    if !website.is_empty() && Url::parse(website).is_err() {
        c.fail("websiteUrl", "Must be a valid URL");
    }
}

fn check_profit_split(c: &mut Checker, split: f64) {
    c.range("profitSplit", split, 1.0, 100.0, "Must be between 1 and 100");
}

fn check_percent(c: &mut Checker, path: &str, value: f64) {
    c.range(path, value, 0.0, 100.0, "Must be between 0 and 100");
}

fn check_fees(c: &mut Checker, min: Option<f64>, max: Option<f64>) {
    if let Some(v) = min {
        c.non_negative("challengeFeeMin", v);
    }
    if let Some(v) = max {
        c.non_negative("challengeFeeMax", v);
    }
}

fn check_extra(c: &mut Checker, extra: &[ExtraField]) {
    for (i, field) in extra.iter().enumerate() {
        if field.key.is_empty() {
            c.fail(format!("extra[{}].key", i), "Key is required");
        }
        if field.value.is_empty() {
            c.fail(format!("extra[{}].value", i), "Value is required");
        }
    }
}

fn check_account_types(c: &mut Checker, accounts: &[NewAccountType]) {
    for (i, account) in accounts.iter().enumerate() {
        let at = |field: &str| format!("accountTypes[{}].{}", i, field);

        if account.account_size == 0 {
            c.fail(at("accountSize"), "Account size must be positive");
        }
        c.non_negative(at("price"), account.price);
        c.range(
            at("currentDiscountRate"),
            account.current_discount_rate,
            0.0,
            100.0,
            "Discount rate must be between 0 and 100",
        );
        c.non_negative(at("activationFee"), account.activation_fee);
        c.non_negative(at("targetProfit"), account.target_profit);
        c.non_negative(at("MLL"), account.mll);
        if let Some(dll) = account.dll {
            c.non_negative(at("DLL"), dll);
        }
        c.range(at("payoutRatio"), account.payout_ratio, 0.0, 100.0, "Must be between 0 and 100");
        if let AccountProgram::Evaluation { stages: 0, .. } = account.program {
            c.fail(at("program.stages"), "Evaluation needs at least one stage");
        }
    }
}

impl Validate for NewPropFirm {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut c = Checker::default();
        check_name(&mut c, &self.name);
        check_description(&mut c, &self.description);
        if let Some(url) = &self.website_url {
            check_website(&mut c, url);
        }
        if let Some(split) = self.profit_split {
            check_profit_split(&mut c, split);
        }
        check_fees(&mut c, self.challenge_fee_min, self.challenge_fee_max);
        if let Some(v) = self.max_daily_drawdown {
            c.non_negative("maxDailyDrawdown", v);
        }
        if let Some(v) = self.max_total_drawdown {
            c.non_negative("maxTotalDrawdown", v);
        }
        if let Some(v) = self.consistency_eval {
            check_percent(&mut c, "consistencyEval", v);
        }
        if let Some(v) = self.consistency_funded {
            check_percent(&mut c, "consistencyFunded", v);
        }
        check_account_types(&mut c, &self.account_types);
        check_extra(&mut c, &self.extra);
        c.finish()
    }
}

impl Validate for PropFirmUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut c = Checker::default();
        if let Some(name) = &self.name {
            check_name(&mut c, name);
        }
        if let Some(description) = &self.description {
            check_description(&mut c, description);
        }
        if let Some(Some(url)) = &self.website_url {
            check_website(&mut c, url);
        }
        if let Some(Some(split)) = self.profit_split {
            check_profit_split(&mut c, split);
        }
        check_fees(&mut c, self.challenge_fee_min.flatten(), self.challenge_fee_max.flatten());
        if let Some(Some(v)) = self.max_daily_drawdown {
            c.non_negative("maxDailyDrawdown", v);
        }
        if let Some(Some(v)) = self.max_total_drawdown {
            c.non_negative("maxTotalDrawdown", v);
        }
        if let Some(Some(v)) = self.consistency_eval {
            check_percent(&mut c, "consistencyEval", v);
        }
        if let Some(Some(v)) = self.consistency_funded {
            check_percent(&mut c, "consistencyFunded", v);
        }
        if let Some(accounts) = &self.account_types {
            check_account_types(&mut c, accounts);
        }
        if let Some(extra) = &self.extra {
            check_extra(&mut c, extra);
        }
        c.finish()
    }
}

// ==========================================
// Reviews
// ==========================================

impl Validate for NewReview {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut c = Checker::default();
        c.min_len("username", &self.username, 2, "Username must be at least 2 characters");
        if !(1..=5).contains(&self.rating) {
            c.fail("rating", "Rating must be between 1 and 5");
        }
        c.min_len("title", &self.title, 5, "Title must be at least 5 characters");
        c.min_len("content", &self.content, 20, "Review must be at least 20 characters");
        c.finish()
    }
}

// ==========================================
// Resources
// ==========================================

fn check_resource_fields(
    c: &mut Checker,
    title: Option<&str>,
    content: Option<&str>,
    summary: Option<&str>,
    category: Option<&str>,
    author_name: Option<&str>,
    read_time: Option<u32>,
) {
    if let Some(v) = title {
        c.min_len("title", v, 5, "Title must be at least 5 characters");
    }
    if let Some(v) = content {
        c.min_len("content", v, 20, "Content must be at least 20 characters");
    }
    if let Some(v) = summary {
        c.min_len("summary", v, 10, "Summary must be at least 10 characters");
    }
    if let Some(v) = category {
        c.min_len("category", v, 1, "Please select a category");
    }
    if let Some(v) = author_name {
        c.min_len("authorName", v, 2, "Author name is required");
    }
    if read_time == Some(0) {
        c.fail("readTime", "Reading time must be at least 1 minute");
    }
}

impl Validate for NewResource {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut c = Checker::default();
        check_resource_fields(
            &mut c,
            Some(&self.title),
            Some(&self.content),
            Some(&self.summary),
            Some(&self.category),
            Some(&self.author_name),
            self.read_time,
        );
        c.finish()
    }
}

impl Validate for ResourceUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut c = Checker::default();
        check_resource_fields(
            &mut c,
            self.title.as_deref(),
            self.content.as_deref(),
            self.summary.as_deref(),
            self.category.as_deref(),
            self.author_name.as_deref(),
            self.read_time.flatten(),
        );
        c.finish()
    }
}

// ==========================================
// Users
// ==========================================

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut c = Checker::default();
        c.min_len("username", &self.username, 1, "Username is required");
        c.min_len("password", &self.password, 1, "Password is required");
        c.finish()
    }
}
