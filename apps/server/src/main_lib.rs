use std::sync::Arc;

use crate::{auth::AuthManager, config::Config};
use fintrack_core::{
    accounts::{AccountService, AccountServiceTrait},
    budgets::{BudgetService, BudgetServiceTrait},
    categories::{CategoryService, CategoryServiceTrait},
    notifications::{NotificationService, NotificationServiceTrait},
    partners::{PartnerService, PartnerServiceTrait},
    reports::{ReportService, ReportServiceTrait},
    tiers::{TierService, TierServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
};
use fintrack_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, AccountRepository, BudgetRepository,
    CategoryRepository, DbPool, NotificationRepository, PartnerRepository, TierRepository,
    TransactionRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub category_service: Arc<dyn CategoryServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub tier_service: Arc<dyn TierServiceTrait>,
    pub partner_service: Arc<dyn PartnerServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub report_service: Arc<dyn ReportServiceTrait>,
    pub pool: Arc<DbPool>,
    pub fiscal_year_start_month: u32,
    pub auth: Option<Arc<AuthManager>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("FT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let account_repository = Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let tier_repository = Arc::new(TierRepository::new(pool.clone(), writer.clone()));
    let partner_repository = Arc::new(PartnerRepository::new(pool.clone(), writer.clone()));
    let notification_repository =
        Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));

    let account_service = Arc::new(AccountService::new(account_repository.clone()));
    let category_service = Arc::new(CategoryService::new(category_repository.clone()));
    let partner_service = Arc::new(PartnerService::new(partner_repository));
    let notification_service =
        Arc::new(NotificationService::new(notification_repository.clone()));
    let budget_service = Arc::new(BudgetService::new(
        budget_repository,
        category_repository.clone(),
        transaction_repository.clone(),
        config.fiscal_year_start_month,
    ));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        account_repository.clone(),
        category_repository.clone(),
        budget_service.clone(),
        notification_service.clone(),
    ));
    let tier_service = Arc::new(TierService::new(
        tier_repository,
        account_service.clone(),
        transaction_repository.clone(),
        config.fiscal_year_start_month,
        config.tier_upsert_timeout,
    ));
    let report_service = Arc::new(ReportService::new(
        account_service.clone(),
        category_repository,
        transaction_repository,
        notification_repository,
        tier_service.clone(),
    ));

    let auth = config
        .auth
        .as_ref()
        .map(AuthManager::new)
        .transpose()?
        .map(Arc::new);
    if auth.is_none() {
        tracing::warn!(
            "FT_AUTH_PASSWORD_HASH is not set; the API is served without authentication"
        );
    }

    Ok(Arc::new(AppState {
        account_service,
        category_service,
        transaction_service,
        budget_service,
        tier_service,
        partner_service,
        notification_service,
        report_service,
        pool,
        fiscal_year_start_month: config.fiscal_year_start_month,
        auth,
    }))
}
