use serde::{Deserialize, Serialize};

use super::Listing;

/// One row of the invoices (notas fiscais) list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    /// Issue date as a `YYYYMMDD` wire token.
    pub issued: String,
    pub value: Option<f64>,
    pub operation: String,
    /// NF-e access key, used to fetch the PDF.
    pub access_key: String,
}

/// Decoded invoice PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePdf {
    pub access_key: String,
    pub content: Vec<u8>,
}

impl InvoicePdf {
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    /// `Nota_Fiscal_<first 8 chars of the key>.pdf`
    pub fn file_name(&self) -> String {
        let prefix: String = self.access_key.chars().take(8).collect();
        format!("Nota_Fiscal_{prefix}.pdf")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub count: usize,
    pub total_value: f64,
}

impl InvoiceSummary {
    pub fn from_listing(listing: &Listing<Invoice>) -> Self {
        let items = listing.items();
        Self {
            count: items.len(),
            total_value: items.iter().filter_map(|i| i.value).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_file_name() {
        let pdf = InvoicePdf {
            access_key: "35240512345678000190550010000012341000012345".into(),
            content: vec![],
        };
        assert_eq!(pdf.file_name(), "Nota_Fiscal_35240512.pdf");
    }

    #[test]
    fn test_summary_ignores_missing_values() {
        let invoice = |value| Invoice {
            number: "1".into(),
            issued: "20240501".into(),
            value,
            operation: "VENDA".into(),
            access_key: "k".into(),
        };
        let listing = Listing::Found(vec![invoice(Some(100.0)), invoice(None), invoice(Some(50.5))]);
        let summary = InvoiceSummary::from_listing(&listing);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_value, 150.5);
        assert_eq!(
            InvoiceSummary::from_listing(&Listing::NothingFound),
            InvoiceSummary::default()
        );
    }
}
