//! Fetch → rank → store → introspect, and question answering
//!
//! [`Pipeline`] owns the collaborators and runs the long operations. It holds
//! no session state; see [`crate::session::Session`] for that.

use crate::config::{ConnectionConfig, Settings};
use crate::db::ProductStore;
use crate::error::{CycleError, DbResult, ModelResult};
use crate::llm::{LanguageModel, QueryResponder};
use crate::scrape::fetcher::search_url;
use crate::scrape::{ProductRecord, ProductSource, TOP_N, rank_top};
use crate::verify::{Verification, verify};
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Everything one successful cycle produced
#[derive(Debug)]
pub struct CycleReport {
    pub query: String,
    /// Marketplace page a user can open to check the results by hand
    pub search_url: String,
    /// Ranked products as stored
    pub products: Vec<ProductRecord>,
    /// Schema text regenerated after the store
    pub schema: DbResult<String>,
    pub verification: Verification,
    pub fetched_at: DateTime<Local>,
}

#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn ProductSource>,
    store: Arc<dyn ProductStore>,
    responder: QueryResponder,
    currency: String,
    marketplace_url: String,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn ProductSource>,
        store: Arc<dyn ProductStore>,
        model: Arc<dyn LanguageModel>,
        settings: &Settings,
    ) -> Self {
        Self {
            source,
            store,
            responder: QueryResponder::new(model, settings.model.timeout()),
            currency: settings.scraper.currency.clone(),
            marketplace_url: settings.scraper.marketplace_url.clone(),
        }
    }

    /// Make sure the products table exists and describe the database
    pub async fn prime_schema(&self, config: &ConnectionConfig) -> DbResult<String> {
        self.store.ensure_schema(config).await?;
        self.refresh_schema(config).await
    }

    /// Describe the database as it is now
    pub async fn refresh_schema(&self, config: &ConnectionConfig) -> DbResult<String> {
        let tree = self.store.table_info(config).await?;
        Ok(tree.to_prompt_text())
    }

    /// Run one full cycle for `query`.
    ///
    /// A fetch failure is reported the same way as an empty result. When the
    /// store fails, the schema is not refreshed.
    pub async fn run_cycle(
        &self,
        config: &ConnectionConfig,
        query: &str,
    ) -> Result<CycleReport, CycleError> {
        tracing::info!(query, "starting fetch cycle");

        let fetched = self.source.fetch(query).await.map_err(|e| {
            tracing::warn!(query, error = %e, "fetch failed");
            CycleError::NoProducts(Some(e))
        })?;

        let products = rank_top(fetched, TOP_N);
        if products.is_empty() {
            tracing::info!(query, "no complete listings found");
            return Err(CycleError::NoProducts(None));
        }

        self.store
            .replace_all(config, &products)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "storing products failed");
                CycleError::StoreFailed(e)
            })?;

        let schema = self.refresh_schema(config).await;
        if let Err(ref e) = schema {
            tracing::warn!(error = %e, "schema refresh after store failed");
        }

        let verification = verify(self.store.as_ref(), config, &products, &self.currency).await;

        tracing::info!(query, stored = products.len(), "fetch cycle complete");
        Ok(CycleReport {
            query: query.to_string(),
            search_url: search_url(&self.marketplace_url, query),
            products,
            schema,
            verification,
            fetched_at: Local::now(),
        })
    }

    /// Ask the model one question about the described schema
    pub async fn answer(&self, question: &str, schema_text: &str) -> ModelResult<String> {
        self.responder.answer(question, schema_text).await
    }
}
