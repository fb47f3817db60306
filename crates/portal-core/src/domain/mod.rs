//! Domain entities - the core business objects.

mod access;
mod filter;
mod invoice;
mod listing;
mod order;
mod profile;
mod support;
mod title;

pub use access::AccessRequest;
pub use filter::{InvoiceFilter, OrderFilter, TitleFilter, TitleStatus, all_flag};
pub use invoice::{Invoice, InvoicePdf, InvoiceSummary};
pub use listing::{Listing, SENTINELS, is_sentinel};
pub use order::{
    Order, OrderDetail, OrderStage, OrderStatusFlags, ProductionDetail, ProductionItem,
    ProductionSummary, TimelineStep,
};
pub use profile::{UserProfile, UserProfilePatch};
pub use support::{Attachment, SupportTicket};
pub use title::{FinancialTitle, TitleSummary};
