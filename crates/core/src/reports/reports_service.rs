use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use super::chart_data::{calculate_chart_domains, prepare_chart_data, ChartItem, ChartOptions};
use super::reports_model::{CashFlowMonth, CategoryChart, Dashboard, TierProgress};
use super::reports_traits::ReportServiceTrait;
use super::tier_position::{tier_indicator_offset, TierBand};
use crate::accounts::AccountServiceTrait;
use crate::categories::{organize_hierarchically, Category, CategoryRepositoryTrait};
use crate::notifications::NotificationRepositoryTrait;
use crate::tiers::TierServiceTrait;
use crate::transactions::{Transaction, TransactionKind, TransactionRepositoryTrait};
use crate::utils::{decimal_to_f64, month_key, month_start, next_month_start, DateRange};
use crate::{Error, Result};

/// Chart item id for transactions without a (known) category.
pub const UNCATEGORIZED_ITEM_ID: &str = "__uncategorized__";

/// Income and expense totals.
#[derive(Debug, Clone, Copy, Default)]
struct Flow {
    income: Decimal,
    expense: Decimal,
}

impl Flow {
    fn add(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Income => self.income += transaction.amount,
            TransactionKind::Expense => self.expense += transaction.amount,
            TransactionKind::Transfer => {}
        }
    }

    fn merge(self, other: Flow) -> Flow {
        Flow {
            income: self.income + other.income,
            expense: self.expense + other.expense,
        }
    }

    fn is_empty(&self) -> bool {
        self.income.is_zero() && self.expense.is_zero()
    }

    fn to_item(self, id: &str, label: &str, children: Vec<ChartItem>) -> ChartItem {
        ChartItem {
            id: id.to_string(),
            label: label.to_string(),
            positive: decimal_to_f64(self.income),
            negative: if self.expense.is_zero() {
                0.0
            } else {
                -decimal_to_f64(self.expense)
            },
            children,
        }
    }
}

fn sort_by_magnitude(items: &mut [ChartItem]) {
    items.sort_by(|a, b| {
        b.magnitude()
            .total_cmp(&a.magnitude())
            .then_with(|| a.label.cmp(&b.label))
    });
}

fn category_items(
    transactions: &[Transaction],
    categories: Vec<Category>,
) -> Vec<ChartItem> {
    let known: HashSet<String> = categories.iter().map(|c| c.id.clone()).collect();
    let mut flows: HashMap<String, Flow> = HashMap::new();
    let mut uncategorized = Flow::default();
    for transaction in transactions {
        match transaction.category_id.as_ref().filter(|id| known.contains(*id)) {
            Some(id) => flows.entry(id.clone()).or_default().add(transaction),
            None => uncategorized.add(transaction),
        }
    }

    let mut items = Vec::new();
    for node in organize_hierarchically(categories) {
        let mut total = flows.get(&node.category.id).copied().unwrap_or_default();
        let mut children = Vec::new();
        for child in &node.children {
            let flow = flows.get(&child.id).copied().unwrap_or_default();
            if !flow.is_empty() {
                total = total.merge(flow);
                children.push(flow.to_item(&child.id, &child.name, Vec::new()));
            }
        }
        if total.is_empty() {
            continue;
        }
        sort_by_magnitude(&mut children);
        items.push(total.to_item(&node.category.id, &node.category.name, children));
    }
    if !uncategorized.is_empty() {
        items.push(uncategorized.to_item(UNCATEGORIZED_ITEM_ID, "Uncategorized", Vec::new()));
    }
    sort_by_magnitude(&mut items);
    items
}

pub struct ReportService {
    account_service: Arc<dyn AccountServiceTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    notification_repository: Arc<dyn NotificationRepositoryTrait>,
    tier_service: Arc<dyn TierServiceTrait>,
}

impl ReportService {
    pub fn new(
        account_service: Arc<dyn AccountServiceTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        notification_repository: Arc<dyn NotificationRepositoryTrait>,
        tier_service: Arc<dyn TierServiceTrait>,
    ) -> Self {
        Self {
            account_service,
            category_repository,
            transaction_repository,
            notification_repository,
            tier_service,
        }
    }
}

impl ReportServiceTrait for ReportService {
    fn category_chart(&self, range: &DateRange, options: &ChartOptions) -> Result<CategoryChart> {
        let transactions = self.transaction_repository.list_in_range(range, None)?;
        let categories = self.category_repository.list(None)?;
        let items = category_items(&transactions, categories);
        debug!(
            "Category chart for {}..{}: {} items from {} transactions",
            range.start,
            range.end,
            items.len(),
            transactions.len()
        );

        let rows = prepare_chart_data(&items, options);
        let domain = calculate_chart_domains(&rows);
        Ok(CategoryChart {
            period: *range,
            rows,
            domain,
        })
    }

    fn cash_flow(&self, range: &DateRange) -> Result<Vec<CashFlowMonth>> {
        let mut months: BTreeMap<String, Flow> = BTreeMap::new();
        let mut month = month_start(range.start);
        while month < range.end {
            months.insert(month_key(month), Flow::default());
            match next_month_start(month) {
                Some(next) => month = next,
                None => break,
            }
        }

        for transaction in self.transaction_repository.list_in_range(range, None)? {
            if let Some(flow) = months.get_mut(&month_key(transaction.transaction_date)) {
                flow.add(&transaction);
            }
        }

        Ok(months
            .into_iter()
            .map(|(month, flow)| CashFlowMonth {
                month,
                income: flow.income,
                expense: flow.expense,
                net: flow.income - flow.expense,
            })
            .collect())
    }

    fn tier_progress(&self, as_of: NaiveDate, width: f64) -> Result<TierProgress> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::invalid_input(format!(
                "Width must be a positive number, got {}",
                width
            )));
        }
        let status = self.tier_service.get_membership_status(as_of)?;
        let bands: Vec<TierBand> = self
            .tier_service
            .list_tiers()?
            .into_iter()
            .map(|tier| TierBand {
                label: tier.name,
                min: decimal_to_f64(tier.min_spend),
                max: tier.max_spend.map(decimal_to_f64),
            })
            .collect();
        let indicator_offset = tier_indicator_offset(decimal_to_f64(status.spend), &bands, width);
        Ok(TierProgress {
            status,
            bands,
            width,
            indicator_offset,
        })
    }

    fn dashboard(&self, as_of: NaiveDate) -> Result<Dashboard> {
        let accounts = self.account_service.get_active_accounts()?;
        let month = DateRange::month_of(as_of)?;
        let flow = self
            .transaction_repository
            .list_in_range(&month, None)?
            .iter()
            .fold(Flow::default(), |mut flow, t| {
                flow.add(t);
                flow
            });

        Ok(Dashboard {
            as_of,
            total_balance: accounts.iter().map(|a| a.balance).sum(),
            month_income: flow.income,
            month_expense: flow.expense,
            month_net: flow.income - flow.expense,
            active_accounts: accounts.len(),
            unread_notifications: self.notification_repository.count_unread()?,
        })
    }
}
