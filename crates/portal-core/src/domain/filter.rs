//! Search criteria for the list views.
//!
//! Each filter carries an `all` override. When it is set the backend ignores
//! every other field, so [`effective`](OrderFilter::effective) blanks them
//! before anything goes on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire value of the backend's `Todos` flag.
pub fn all_flag(all: bool) -> &'static str {
    if all { "Sim" } else { "Nao" }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    pub all: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub order_number: String,
    pub proposal_number: String,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            all: true,
            start_date: None,
            end_date: None,
            order_number: String::new(),
            proposal_number: String::new(),
        }
    }
}

impl OrderFilter {
    pub fn effective(&self) -> Self {
        if self.all {
            Self::default()
        } else {
            self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceFilter {
    pub all: bool,
    pub invoice_number: String,
    pub issued_from: Option<NaiveDate>,
    pub issued_to: Option<NaiveDate>,
}

impl Default for InvoiceFilter {
    fn default() -> Self {
        Self {
            all: true,
            invoice_number: String::new(),
            issued_from: None,
            issued_to: None,
        }
    }
}

impl InvoiceFilter {
    pub fn effective(&self) -> Self {
        if self.all {
            Self::default()
        } else {
            self.clone()
        }
    }
}

/// Payment status filter for financial titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleStatus {
    #[default]
    Todos,
    Abertos,
    Pagos,
}

impl TitleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleStatus::Todos => "Todos",
            TitleStatus::Abertos => "Abertos",
            TitleStatus::Pagos => "Pagos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleFilter {
    pub all: bool,
    pub status: TitleStatus,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

impl Default for TitleFilter {
    fn default() -> Self {
        Self {
            all: true,
            status: TitleStatus::Todos,
            due_from: None,
            due_to: None,
        }
    }
}

impl TitleFilter {
    /// With `all` set the status goes out blank rather than `Todos`.
    pub fn effective(&self) -> Self {
        if self.all {
            Self::default()
        } else {
            self.clone()
        }
    }

    /// Status as sent to the backend: blank when the override is on.
    pub fn wire_status(&self) -> &'static str {
        if self.all { "" } else { self.status.as_str() }
    }
}
