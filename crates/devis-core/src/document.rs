//! # Quote Document
//!
//! Builds the printable fields of a quote. Rendering (PDF or otherwise) is
//! left to the frontend; this module decides what goes on the page.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PEP'S PRINT                                      N° 1                  │
//! │  Devis                                            Date: 01/11/2025      │
//! │                                                   Statut: Accepté       │
//! │  Client:                                                                │
//! │  Société ABC                                                            │
//! │                                                                         │
//! │  Détails du produit                                                     │
//! │  Produit: ... / Format: ... / Papier: ... / Impression: ...             │
//! │  Quantité: ... / Finitions: ... / Livraison EXPRESS (+20%)              │
//! │                                                                         │
//! │  ┌──────────────────────────────┬───────────┐                           │
//! │  │ Prix HT                      │ 125.50 €  │                           │
//! │  │ TVA (20%)                    │  25.10 €  │                           │
//! │  │ Prix TTC                     │ 150.60 €  │                           │
//! │  └──────────────────────────────┴───────────┘                           │
//! │                                                                         │
//! │            PEP'S PRINT - Imprimerie professionnelle                     │
//! │                 Ce devis est valable 30 jours                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts come from the stored `price_ht` only. The document never
//! re-prices the configuration.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::money::format_eur;
use crate::pricing::VAT_RATE;
use crate::types::Quote;

/// Company name printed in the header and footer.
pub const COMPANY_NAME: &str = "PEP'S PRINT";

/// Document title.
pub const DOCUMENT_TITLE: &str = "Devis";

/// Line printed for express jobs.
pub const EXPRESS_LINE: &str = "Livraison EXPRESS (+20%)";

/// Footer lines, top to bottom.
pub const FOOTER_LINES: [&str; 2] = [
    "PEP'S PRINT - Imprimerie professionnelle",
    "Ce devis est valable 30 jours",
];

/// One row of the pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceRow {
    pub label: String,
    pub amount: String,
}

impl PriceRow {
    fn new(label: &str, amount: f64) -> Self {
        PriceRow {
            label: label.to_string(),
            amount: format_eur(amount),
        }
    }
}

/// Everything printed on a quote document.
///
/// Optional fields are omitted from the page when `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteDocument {
    pub company: String,
    pub title: String,
    pub number: String,

    /// `dd/mm/yyyy`
    pub date: String,

    pub status: String,
    pub client: String,
    pub product: Option<String>,
    pub format: Option<String>,

    /// `"<name> - <grammage>g"`, only when the paper still exists.
    pub paper: Option<String>,

    pub print_type: Option<String>,
    pub quantity: Option<i64>,

    /// Names of the selected finishes that still exist.
    pub finishes: Vec<String>,

    pub express: bool,
    pub price_rows: Vec<PriceRow>,
    pub footer: Vec<String>,
}

impl QuoteDocument {
    /// Builds the document of a quote, resolving references in `catalog`.
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::document::QuoteDocument;
    /// use devis_core::seed;
    ///
    /// let quote = &seed::sample_quotes()[0];
    /// let doc = QuoteDocument::build(quote, &seed::default_catalog());
    ///
    /// assert_eq!(doc.date, "01/11/2025");
    /// assert_eq!(doc.price_rows[2].amount, "150.60 €");
    /// assert_eq!(doc.file_name(), "Devis_1_Soci_t__ABC.pdf");
    /// ```
    pub fn build(quote: &Quote, catalog: &Catalog) -> Self {
        let config = &quote.configuration;

        let paper = config
            .paper_id
            .as_deref()
            .and_then(|id| catalog.paper(id))
            .map(|paper| format!("{} - {}g", paper.name, paper.grammage));

        let finishes = config
            .finish_ids
            .iter()
            .filter_map(|id| catalog.finish(id))
            .map(|finish| finish.name.clone())
            .collect();

        let print_type = config.print_type.label();

        let price_ttc = quote.price_ht * (1.0 + VAT_RATE);
        let tva = price_ttc - quote.price_ht;

        QuoteDocument {
            company: COMPANY_NAME.to_string(),
            title: DOCUMENT_TITLE.to_string(),
            number: quote.id.clone(),
            date: quote.date.format("%d/%m/%Y").to_string(),
            status: quote.status.label().to_string(),
            client: quote.client.clone(),
            product: config.product_name().map(str::to_string),
            format: config.format_name().map(str::to_string),
            paper,
            print_type: (!print_type.is_empty()).then(|| print_type.to_string()),
            quantity: (quote.quantity != 0).then_some(quote.quantity),
            finishes,
            express: config.express,
            price_rows: vec![
                PriceRow::new("Prix HT", quote.price_ht),
                PriceRow::new("TVA (20%)", tva),
                PriceRow::new("Prix TTC", price_ttc),
            ],
            footer: FOOTER_LINES.iter().map(|line| line.to_string()).collect(),
        }
    }

    /// The "Détails du produit" lines, in print order.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(product) = &self.product {
            lines.push(format!("Produit: {product}"));
        }
        if let Some(format) = &self.format {
            lines.push(format!("Format: {format}"));
        }
        if let Some(paper) = &self.paper {
            lines.push(format!("Papier: {paper}"));
        }
        if let Some(print_type) = &self.print_type {
            lines.push(format!("Impression: {print_type}"));
        }
        if let Some(quantity) = self.quantity {
            lines.push(format!("Quantité: {quantity}"));
        }
        if !self.finishes.is_empty() {
            lines.push(format!("Finitions: {}", self.finishes.join(", ")));
        }
        if self.express {
            lines.push(EXPRESS_LINE.to_string());
        }

        lines
    }

    /// File name of the exported document.
    ///
    /// Every character of the client name outside `[A-Za-z0-9]` becomes `_`.
    pub fn file_name(&self) -> String {
        let client: String = self
            .client
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("Devis_{}_{}.pdf", self.number, client)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::types::{JobConfig, PrintType, QuoteStatus, CUSTOM_FORMAT, CUSTOM_PRODUCT_TYPE};
    use chrono::NaiveDate;

    fn configured_quote() -> Quote {
        Quote {
            id: "42".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            client: "Salon Beauté".to_string(),
            product: "Calendrier".to_string(),
            quantity: 250,
            price_ht: 100.0,
            status: QuoteStatus::Sent,
            configuration: JobConfig {
                product_type: CUSTOM_PRODUCT_TYPE.to_string(),
                custom_product: "Calendrier".to_string(),
                format: CUSTOM_FORMAT.to_string(),
                custom_format: "30x30 cm".to_string(),
                paper_id: Some("2".to_string()),
                print_type: PrintType::QuadriRectoVerso,
                finish_ids: vec!["1".to_string(), "99".to_string(), "4".to_string()],
                quantity: 250,
                express: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_header_fields() {
        let doc = QuoteDocument::build(&configured_quote(), &seed::default_catalog());

        assert_eq!(doc.company, "PEP'S PRINT");
        assert_eq!(doc.title, "Devis");
        assert_eq!(doc.number, "42");
        assert_eq!(doc.date, "07/03/2025");
        assert_eq!(doc.status, "Envoyé");
        assert_eq!(doc.client, "Salon Beauté");
    }

    #[test]
    fn test_detail_lines_resolve_custom_values() {
        let doc = QuoteDocument::build(&configured_quote(), &seed::default_catalog());

        assert_eq!(
            doc.detail_lines(),
            vec![
                "Produit: Calendrier",
                "Format: 30x30 cm",
                "Papier: Couché brillant 135g - 135g",
                "Impression: Quadri recto-verso",
                "Quantité: 250",
                "Finitions: Pelliculage mat, Dorure",
                "Livraison EXPRESS (+20%)",
            ]
        );
    }

    #[test]
    fn test_unknown_paper_is_omitted() {
        let mut quote = configured_quote();
        quote.configuration.paper_id = Some("missing".to_string());

        let doc = QuoteDocument::build(&quote, &seed::default_catalog());
        assert_eq!(doc.paper, None);
    }

    #[test]
    fn test_price_rows() {
        let doc = QuoteDocument::build(&configured_quote(), &seed::default_catalog());

        let rows: Vec<(&str, &str)> = doc
            .price_rows
            .iter()
            .map(|r| (r.label.as_str(), r.amount.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Prix HT", "100.00 €"),
                ("TVA (20%)", "20.00 €"),
                ("Prix TTC", "120.00 €"),
            ]
        );
    }

    #[test]
    fn test_sample_quote_with_empty_configuration() {
        let quote = &seed::sample_quotes()[1];
        let doc = QuoteDocument::build(quote, &seed::default_catalog());

        // Empty configurations still carry the form defaults
        assert_eq!(doc.product, None);
        assert_eq!(doc.print_type.as_deref(), Some("Quadri recto"));
        assert_eq!(doc.quantity, Some(1000));
        assert!(doc.finishes.is_empty());
        assert_eq!(doc.price_rows[0].amount, "285.00 €");
        assert_eq!(doc.price_rows[1].amount, "57.00 €");
        assert_eq!(doc.price_rows[2].amount, "342.00 €");
    }

    #[test]
    fn test_footer() {
        let doc = QuoteDocument::build(&configured_quote(), &seed::default_catalog());
        assert_eq!(
            doc.footer,
            vec![
                "PEP'S PRINT - Imprimerie professionnelle",
                "Ce devis est valable 30 jours",
            ]
        );
    }

    #[test]
    fn test_file_name_sanitizes_client() {
        let doc = QuoteDocument::build(&configured_quote(), &seed::default_catalog());
        assert_eq!(doc.file_name(), "Devis_42_Salon_Beaut_.pdf");
    }
}
