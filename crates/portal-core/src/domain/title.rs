use serde::{Deserialize, Serialize};

use super::{Listing, UserProfile};
use crate::format::wire_to_display;

/// A financial title (receivable installment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTitle {
    pub number: String,
    pub installment: String,
    /// `YYYYMMDD`
    pub issued: String,
    /// `YYYYMMDD`
    pub due: String,
    pub value: Option<f64>,
    pub paid: Option<f64>,
    pub balance: Option<f64>,
}

impl FinancialTitle {
    pub fn is_open(&self) -> bool {
        self.balance.is_some_and(|b| b > 0.0)
    }

    pub fn is_paid(&self) -> bool {
        self.balance == Some(0.0)
    }

    /// Message asking the finance team for a second copy of the bank slip.
    pub fn second_copy_message(&self, profile: &UserProfile) -> String {
        format!(
            "Ola, Gostaria da segunda via do Boleto do Título {} Parcela {} Vencimento {} Nome: {} CNPJ: {} Codigo do Cliente: {}",
            self.number,
            self.installment,
            wire_to_display(&self.due),
            profile.name,
            profile.tax_id,
            profile.code,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleSummary {
    pub count: usize,
    pub total_value: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub open: usize,
    pub paid: usize,
}

impl TitleSummary {
    pub fn from_listing(listing: &Listing<FinancialTitle>) -> Self {
        let items = listing.items();
        Self {
            count: items.len(),
            total_value: items.iter().filter_map(|t| t.value).sum(),
            total_paid: items.iter().filter_map(|t| t.paid).sum(),
            total_balance: items.iter().filter_map(|t| t.balance).sum(),
            open: items.iter().filter(|t| t.is_open()).count(),
            paid: items.iter().filter(|t| t.is_paid()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(value: f64, paid: f64, balance: Option<f64>) -> FinancialTitle {
        FinancialTitle {
            number: "000123".into(),
            installment: "1".into(),
            issued: "20240401".into(),
            due: "20240501".into(),
            value: Some(value),
            paid: Some(paid),
            balance,
        }
    }

    #[test]
    fn test_summary() {
        let listing = Listing::Found(vec![
            title(100.0, 100.0, Some(0.0)),
            title(200.0, 50.0, Some(150.0)),
            title(10.0, 0.0, None),
        ]);
        let summary = TitleSummary::from_listing(&listing);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_value, 310.0);
        assert_eq!(summary.total_paid, 150.0);
        assert_eq!(summary.total_balance, 150.0);
        assert_eq!(summary.open, 1);
        assert_eq!(summary.paid, 1);
    }

    #[test]
    fn test_nothing_found_summary_is_zero() {
        assert_eq!(
            TitleSummary::from_listing(&Listing::NothingFound),
            TitleSummary::default()
        );
    }

    #[test]
    fn test_second_copy_message() {
        let profile = UserProfile {
            code: "C001".into(),
            name: "ACME".into(),
            email: "a@acme.com".into(),
            tax_id: "11222333000181".into(),
        };
        let msg = title(1.0, 0.0, Some(1.0)).second_copy_message(&profile);
        assert!(msg.contains("Título 000123 Parcela 1 Vencimento 01/05/2024"));
        assert!(msg.ends_with("Codigo do Cliente: C001"));
    }
}
