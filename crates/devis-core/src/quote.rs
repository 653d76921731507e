//! # Quote Lifecycle
//!
//! [`QuoteBook`] owns the list of saved quotes and applies the lifecycle
//! rules to it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_quote ──► ┌───────────┐   set_status (any → any)               │
//! │                   │ Brouillon │ ◄─────────────────────┐                │
//! │                   └─────┬─────┘                       │                │
//! │                         ▼                             │                │
//! │                   ┌───────────┐                 ┌─────┴─────┐          │
//! │                   │  Envoyé   │ ──────────────► │  Accepté  │          │
//! │                   └───────────┘                 └───────────┘          │
//! │                                                                         │
//! │  update_quote: replaces client, product, quantity, price, config       │
//! │                keeps id, date and status                               │
//! │  delete_quote: removes the quote, whatever its status                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stored `price_ht` is whatever the caller priced the configuration at;
//! the book does not re-price. Quotes stay in insertion order.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{JobConfig, Quote, QuoteStatus};
use crate::validation::{resolve_product_name, validate_client_name, validate_price};

/// Quote dates are calendar days in UTC.
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The saved quotes, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteBook {
    quotes: Vec<Quote>,
}

impl QuoteBook {
    /// Wraps an existing list of quotes.
    pub fn new(quotes: Vec<Quote>) -> Self {
        QuoteBook { quotes }
    }

    /// All quotes, in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Consumes the book, returning the quotes.
    pub fn into_quotes(self) -> Vec<Quote> {
        self.quotes
    }

    /// Finds a quote by id.
    pub fn get(&self, id: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    fn get_mut(&mut self, id: &str) -> CoreResult<&mut Quote> {
        self.quotes
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| CoreError::QuoteNotFound(id.to_string()))
    }

    /// Creates a draft quote dated today.
    ///
    /// ## Validation
    /// - client name must not be blank (it is stored trimmed)
    /// - the configuration must name a product
    /// - the price must be finite
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::{JobConfig, QuoteBook, QuoteStatus};
    ///
    /// let mut book = QuoteBook::default();
    /// let config = JobConfig { product_type: "Flyer".into(), ..Default::default() };
    ///
    /// let quote = book.create_quote("Société ABC", config, 31.6).unwrap();
    /// assert_eq!(quote.status, QuoteStatus::Draft);
    /// assert_eq!(quote.product, "Flyer");
    /// ```
    pub fn create_quote(
        &mut self,
        client: &str,
        config: JobConfig,
        price_ht: f64,
    ) -> CoreResult<Quote> {
        self.create_quote_on(today(), client, config, price_ht)
    }

    /// Same as [`QuoteBook::create_quote`] with an explicit date.
    pub fn create_quote_on(
        &mut self,
        date: NaiveDate,
        client: &str,
        config: JobConfig,
        price_ht: f64,
    ) -> CoreResult<Quote> {
        let client = validate_client_name(client)?;
        let product = resolve_product_name(&config)?;
        let price_ht = validate_price(price_ht)?;

        let quote = Quote {
            id: Uuid::new_v4().to_string(),
            date,
            client,
            product,
            quantity: config.quantity,
            price_ht,
            status: QuoteStatus::Draft,
            configuration: config,
        };

        self.quotes.push(quote.clone());
        Ok(quote)
    }

    /// Replaces the client, product, quantity, price and configuration of
    /// an existing quote. Id, date and status are kept.
    pub fn update_quote(
        &mut self,
        id: &str,
        client: &str,
        config: JobConfig,
        price_ht: f64,
    ) -> CoreResult<Quote> {
        let client = validate_client_name(client)?;
        let product = resolve_product_name(&config)?;
        let price_ht = validate_price(price_ht)?;

        let quote = self.get_mut(id)?;
        quote.client = client;
        quote.product = product;
        quote.quantity = config.quantity;
        quote.price_ht = price_ht;
        quote.configuration = config;

        Ok(quote.clone())
    }

    /// Sets the status of a quote. Every transition is allowed.
    pub fn set_status(&mut self, id: &str, status: QuoteStatus) -> CoreResult<Quote> {
        let quote = self.get_mut(id)?;
        quote.status = status;
        Ok(quote.clone())
    }

    /// Removes a quote, whatever its status.
    pub fn delete_quote(&mut self, id: &str) -> CoreResult<Quote> {
        let pos = self
            .quotes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| CoreError::QuoteNotFound(id.to_string()))?;
        Ok(self.quotes.remove(pos))
    }

    /// Lists quotes whose client or product contains `filter`,
    /// case-insensitively. An empty filter lists everything; whitespace is
    /// matched like any other character.
    pub fn list_quotes(&self, filter: Option<&str>) -> Vec<&Quote> {
        let needle = filter.unwrap_or("").to_lowercase();
        if needle.is_empty() {
            return self.quotes.iter().collect();
        }

        self.quotes
            .iter()
            .filter(|q| {
                q.client.to_lowercase().contains(&needle)
                    || q.product.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl From<Vec<Quote>> for QuoteBook {
    fn from(quotes: Vec<Quote>) -> Self {
        QuoteBook::new(quotes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::seed;
    use crate::types::CUSTOM_PRODUCT_TYPE;

    fn flyer() -> JobConfig {
        JobConfig {
            product_type: "Flyer".to_string(),
            paper_id: Some("1".to_string()),
            quantity: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_quote_defaults() {
        let mut book = QuoteBook::default();
        let quote = book.create_quote("  Restaurant Le Gourmet ", flyer(), 285.0).unwrap();

        assert_eq!(quote.client, "Restaurant Le Gourmet");
        assert_eq!(quote.product, "Flyer");
        assert_eq!(quote.quantity, 1000);
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.date, Utc::now().date_naive());
        assert_eq!(quote.configuration, flyer());
        assert_eq!(book.quotes().len(), 1);
    }

    #[test]
    fn test_create_quote_ids_are_unique() {
        let mut book = QuoteBook::default();
        let a = book.create_quote("A", flyer(), 1.0).unwrap();
        let b = book.create_quote("B", flyer(), 1.0).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_quote_rejects_empty_client() {
        let mut book = QuoteBook::default();
        let result = book.create_quote("", flyer(), 10.0);

        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::Required { ref field })) if field == "client"
        ));
        assert!(book.quotes().is_empty());
    }

    #[test]
    fn test_create_quote_rejects_missing_product() {
        let mut book = QuoteBook::default();
        let config = JobConfig {
            product_type: CUSTOM_PRODUCT_TYPE.to_string(),
            custom_product: "   ".to_string(),
            ..Default::default()
        };

        assert!(book.create_quote("Client", config, 10.0).is_err());
        assert!(book.quotes().is_empty());
    }

    #[test]
    fn test_custom_product_name_is_stored() {
        let mut book = QuoteBook::default();
        let config = JobConfig {
            product_type: CUSTOM_PRODUCT_TYPE.to_string(),
            custom_product: "Calendrier".to_string(),
            ..Default::default()
        };
        let quote = book.create_quote("Client", config, 10.0).unwrap();
        assert_eq!(quote.product, "Calendrier");
    }

    #[test]
    fn test_update_quote_keeps_identity_and_status() {
        let mut book = QuoteBook::new(seed::sample_quotes());
        let before = book.get("2").cloned().unwrap();

        let config = JobConfig {
            product_type: "Brochure".to_string(),
            quantity: 250,
            ..Default::default()
        };
        let updated = book.update_quote("2", "Le Gourmet", config.clone(), 412.3).unwrap();

        assert_eq!(updated.id, before.id);
        assert_eq!(updated.date, before.date);
        assert_eq!(updated.status, before.status);
        assert_eq!(updated.client, "Le Gourmet");
        assert_eq!(updated.product, "Brochure");
        assert_eq!(updated.quantity, 250);
        assert_eq!(updated.price_ht, 412.3);
        assert_eq!(updated.configuration, config);
        assert_eq!(book.get("2"), Some(&updated));
    }

    #[test]
    fn test_update_quote_validation_leaves_quote_untouched() {
        let mut book = QuoteBook::new(seed::sample_quotes());
        let before = book.clone();

        assert!(book.update_quote("1", " ", flyer(), 10.0).is_err());
        assert_eq!(book, before);
    }

    #[test]
    fn test_update_unknown_quote() {
        let mut book = QuoteBook::default();
        assert!(matches!(
            book.update_quote("nope", "Client", flyer(), 1.0),
            Err(CoreError::QuoteNotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_status_transitions_are_unrestricted() {
        let mut book = QuoteBook::new(seed::sample_quotes());

        let accepted = book.set_status("3", QuoteStatus::Accepted).unwrap();
        assert_eq!(accepted.status, QuoteStatus::Accepted);

        let back = book.set_status("3", QuoteStatus::Draft).unwrap();
        assert_eq!(back.status, QuoteStatus::Draft);
    }

    #[test]
    fn test_delete_quote() {
        let mut book = QuoteBook::new(seed::sample_quotes());
        let removed = book.delete_quote("1").unwrap();
        assert_eq!(removed.client, "Société ABC");

        let ids: Vec<&str> = book.quotes().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert!(book.delete_quote("1").is_err());
    }

    #[test]
    fn test_list_quotes_filter() {
        let book = QuoteBook::new(seed::sample_quotes());

        assert_eq!(book.list_quotes(None).len(), 3);
        assert_eq!(book.list_quotes(Some("")).len(), 3);

        // Client match, case-insensitive
        let hits = book.list_quotes(Some("gourmet"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");

        // Product match
        let hits = book.list_quotes(Some("AFFICHE"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");

        // Accented text
        let hits = book.list_quotes(Some("société"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        assert!(book.list_quotes(Some("zzz")).is_empty());
    }

    #[test]
    fn test_list_quotes_matches_whitespace_literally() {
        let book = QuoteBook::new(seed::sample_quotes());

        assert!(book.list_quotes(Some("  ")).is_empty());

        let ids: Vec<&str> = book
            .list_quotes(Some("e "))
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_list_quotes_keeps_insertion_order() {
        let mut book = QuoteBook::new(seed::sample_quotes());
        book.create_quote("Flyers & Co", flyer(), 50.0).unwrap();

        let products: Vec<&str> = book
            .list_quotes(Some("fly"))
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0], "2");
    }
}
