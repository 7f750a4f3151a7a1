//! Sample records loaded at startup

use chrono::{TimeZone, Utc};
use tracing::info;

use super::Store;
use crate::types::{
    AccountProgram, AccountRules, DrawdownType, NewAccountType, NewPropFirm, NewResource,
    NewReview,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn account(size: u64, price: f64, discount: f64, target: f64, mll: f64, dll: Option<f64>) -> NewAccountType {
    NewAccountType {
        account_size: size,
        drawdown_type: DrawdownType::Eod,
        price,
        current_discount_rate: discount,
        activation_fee: 0.0,
        target_profit: target,
        mll,
        dll,
        payout_ratio: 80.0,
        payout_frequency: "bi-weekly".to_string(),
        rules: AccountRules {
            news_trading_allowed: true,
            scaling_plan: true,
            ..Default::default()
        },
        program: AccountProgram::Evaluation {
            stages: 2,
            min_evaluation_days: 4,
            min_funded_days: 0,
        },
    }
}

impl Store {
    /// Three firms, three articles and one review per firm
    pub fn seed_sample_data(&self) {
        let mut ftmo = NewPropFirm::named(
            "FTMO",
            "FTMO is a proprietary trading firm offering funded accounts to successful traders. \
             They have a rigorous two-phase evaluation process before providing a funded account.",
        );
        ftmo.website_url = Some("https://ftmo.com".to_string());
        ftmo.profit_split = Some(80.0);
        ftmo.challenge_fee_min = Some(540.0);
        ftmo.challenge_fee_max = Some(1080.0);
        ftmo.payout_time = Some(14);
        ftmo.max_daily_drawdown = Some(5.0);
        ftmo.max_total_drawdown = Some(10.0);
        ftmo.min_trading_days = Some(10);
        ftmo.scaling_plan = true;
        ftmo.trading_platforms = strings(&["MetaTrader 4", "MetaTrader 5", "cTrader"]);
        ftmo.tradable_assets = strings(&["Forex", "Commodities", "Indices", "Cryptos", "Stocks"]);
        ftmo.evaluation_stages = strings(&["FTMO Challenge", "Verification"]);
        ftmo.featured = true;
        ftmo.account_types = vec![
            account(100_000, 540.0, 0.0, 10_000.0, 10_000.0, Some(5_000.0)),
            account(200_000, 1080.0, 10.0, 20_000.0, 20_000.0, Some(10_000.0)),
        ];
        let ftmo = self.create_firm(ftmo);

        let mut funded_next = NewPropFirm::named(
            "Funded Next",
            "Funded Next provides traders with capital to trade financial markets. \
             They offer a straightforward evaluation process and competitive profit splits.",
        );
        funded_next.website_url = Some("https://fundednext.com".to_string());
        funded_next.profit_split = Some(90.0);
        funded_next.challenge_fee_min = Some(349.0);
        funded_next.challenge_fee_max = Some(999.0);
        funded_next.payout_time = Some(7);
        funded_next.max_daily_drawdown = Some(4.0);
        funded_next.max_total_drawdown = Some(8.0);
        funded_next.min_trading_days = Some(0);
        funded_next.scaling_plan = true;
        funded_next.trading_platforms = strings(&["MetaTrader 4", "MetaTrader 5"]);
        funded_next.tradable_assets = strings(&["Forex", "Commodities", "Indices", "Cryptos"]);
        funded_next.featured = true;
        funded_next.account_types = vec![account(100_000, 549.0, 20.0, 8_000.0, 8_000.0, Some(4_000.0))];
        let funded_next = self.create_firm(funded_next);

        let mut funded_trader = NewPropFirm::named(
            "The Funded Trader",
            "The Funded Trader offers funded accounts with a user-friendly evaluation process. \
             They are known for their quick payouts and excellent customer support.",
        );
        funded_trader.website_url = Some("https://thefundedtrader.com".to_string());
        funded_trader.profit_split = Some(85.0);
        funded_trader.challenge_fee_min = Some(375.0);
        funded_trader.challenge_fee_max = Some(975.0);
        funded_trader.payout_time = Some(5);
        funded_trader.max_daily_drawdown = Some(5.0);
        funded_trader.max_total_drawdown = Some(8.0);
        funded_trader.min_trading_days = Some(5);
        funded_trader.scaling_plan = true;
        funded_trader.trading_platforms = strings(&["MetaTrader 4", "MetaTrader 5"]);
        funded_trader.tradable_assets = strings(&["Forex", "Commodities", "Indices", "Cryptos"]);
        funded_trader.featured = true;
        funded_trader.account_types = vec![NewAccountType {
            drawdown_type: DrawdownType::Tmdd,
            program: AccountProgram::InstantFunding { min_funded_days: 0 },
            ..account(50_000, 375.0, 15.0, 0.0, 4_000.0, None)
        }];
        let funded_trader = self.create_firm(funded_trader);

        let articles = [
            (
                "How to Pass a Prop Firm Challenge",
                "<p>This comprehensive guide walks you through the essential strategies for passing prop firm challenges...</p>",
                "Essential strategies and tips for successfully passing prop firm evaluations and securing funded accounts.",
                "Beginner Guide",
                "Sarah Johnson",
                "https://randomuser.me/api/portraits/women/40.jpg",
                "https://images.unsplash.com/photo-1611974789855-9c2a0a7236a3",
                8,
                (2023, 8, 15),
            ),
            (
                "Risk Management Techniques for Prop Traders",
                "<p>Learn effective risk management strategies to protect your capital and navigate prop firm drawdown rules...</p>",
                "Learn effective risk management strategies to protect your capital and navigate prop firm drawdown rules.",
                "Risk Management",
                "Michael Chen",
                "https://randomuser.me/api/portraits/men/35.jpg",
                "https://images.unsplash.com/photo-1642543348745-03b1219733d9",
                12,
                (2023, 9, 22),
            ),
            (
                "Top 5 Prop Trading Firms of 2023",
                "<p>Comprehensive reviews and comparisons of the leading proprietary trading firms based on trader feedback...</p>",
                "Comprehensive reviews and comparisons of the leading proprietary trading firms based on trader feedback.",
                "Compare & Review",
                "Alex Rodriguez",
                "https://randomuser.me/api/portraits/men/65.jpg",
                "https://images.unsplash.com/photo-1526628953301-3e589a6a8b74",
                15,
                (2023, 10, 8),
            ),
        ];
        for (title, content, summary, category, author, author_image, image, read_time, (y, m, d)) in articles {
            self.create_resource(NewResource {
                title: title.to_string(),
                content: content.to_string(),
                summary: summary.to_string(),
                category: category.to_string(),
                author_name: author.to_string(),
                author_image: Some(author_image.to_string()),
                image: Some(image.to_string()),
                read_time: Some(read_time),
                published_at: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single(),
            });
        }

        let reviews = [
            (
                ftmo.id,
                "James Wilson",
                5,
                "Excellent Platform and Support",
                "FTMO has been life-changing for me. Their platform is incredibly stable, and their support team is responsive. \
                 I've received every payout on time, and the scaling opportunities are excellent.",
                "Forex Trader, 2 years with FTMO",
            ),
            (
                funded_trader.id,
                "Emma Thompson",
                4,
                "Great Profit Split",
                "The Funded Trader offers the best profit split I've found. Their challenge rules are reasonable, \
                 and I appreciate the rapid payout system. Their educational resources also helped me improve my trading.",
                "Futures Trader, 1 year with TFT",
            ),
            (
                funded_next.id,
                "David Kumar",
                4,
                "Competitive Fees",
                "Funded Next has some of the most competitive challenge fees in the industry. I've managed to get funded \
                 on my first attempt, and their dashboard makes tracking my trading metrics straightforward.",
                "Crypto Trader, 6 months with Funded Next",
            ),
        ];
        for (firm_id, username, rating, title, content, experience) in reviews {
            self.create_review(NewReview {
                firm_id,
                username: username.to_string(),
                rating,
                title: title.to_string(),
                content: content.to_string(),
                trading_experience: Some(experience.to_string()),
            });
        }

        info!("Seeded sample data: 3 firms, 3 resources, 3 reviews");
    }
}
