use serde::{Deserialize, Serialize};

/// One row of the orders list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub number: String,
    pub proposal: String,
    /// Date exactly as the backend sent it.
    pub date: String,
    pub operation: String,
    pub value: Option<f64>,
}

/// Progress flags reported for an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusFlags {
    pub checked: bool,
    pub production_started: bool,
    pub production_finished: bool,
    pub invoiced: bool,
    pub shipped: bool,
}

/// Full detail of one order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub proposal: String,
    pub operation_type: String,
    pub carrier: String,
    pub total: Option<f64>,
    /// NF-e access key of the invoice, when one was issued.
    pub access_key: Option<String>,
    pub assembly_link: Option<String>,
    /// `OPGERADA` once a production order exists.
    pub production_order: String,
    pub status: Option<OrderStatusFlags>,
}

/// Marker the backend uses once a production order has been generated.
pub const PRODUCTION_ORDER_GENERATED: &str = "OPGERADA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStage {
    Checked,
    ProductionStarted,
    ProductionFinished,
    Invoiced,
    Shipped,
}

impl OrderStage {
    pub const ALL: [OrderStage; 5] = [
        OrderStage::Checked,
        OrderStage::ProductionStarted,
        OrderStage::ProductionFinished,
        OrderStage::Invoiced,
        OrderStage::Shipped,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderStage::Checked => "Conferido",
            OrderStage::ProductionStarted => "Produção Iniciada",
            OrderStage::ProductionFinished => "Produção Concluída",
            OrderStage::Invoiced => "Faturado",
            OrderStage::Shipped => "Expedido",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OrderStage::Checked => "Pedido conferido e validado",
            OrderStage::ProductionStarted => "Produção foi iniciada",
            OrderStage::ProductionFinished => "Produção finalizada",
            OrderStage::Invoiced => "Pedido faturado",
            OrderStage::Shipped => "Pedido expedido para entrega",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStep {
    pub stage: OrderStage,
    pub completed: bool,
    /// Production detail is worth showing for this step.
    pub show_production_link: bool,
}

impl OrderDetail {
    /// Five-step progress timeline. Empty when the backend sent no status.
    pub fn timeline(&self) -> Vec<TimelineStep> {
        let Some(flags) = self.status else {
            return Vec::new();
        };
        let production_link =
            flags.production_started && self.production_order == PRODUCTION_ORDER_GENERATED;

        OrderStage::ALL
            .into_iter()
            .map(|stage| {
                let completed = match stage {
                    OrderStage::Checked => flags.checked,
                    OrderStage::ProductionStarted => flags.production_started,
                    OrderStage::ProductionFinished => flags.production_finished,
                    OrderStage::Invoiced => flags.invoiced,
                    OrderStage::Shipped => flags.shipped,
                };
                TimelineStep {
                    stage,
                    completed,
                    show_production_link: stage == OrderStage::ProductionStarted
                        && production_link,
                }
            })
            .collect()
    }
}

/// One product line of an order's production.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionItem {
    pub item: String,
    pub product: String,
    pub description: String,
    pub unit: String,
    pub quantity_sold: f64,
    pub total_orders: f64,
    pub produced: f64,
    pub pending: f64,
    /// Percentage complete, 0-100.
    pub progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionDetail {
    pub items: Vec<ProductionItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionSummary {
    pub items: usize,
    pub produced: f64,
    pub pending: f64,
    /// Mean progress rounded to a whole percent.
    pub average_progress: u32,
}

impl ProductionDetail {
    pub fn summary(&self) -> ProductionSummary {
        let items = self.items.len();
        if items == 0 {
            return ProductionSummary::default();
        }
        let produced = self.items.iter().map(|i| i.produced).sum();
        let pending = self.items.iter().map(|i| i.pending).sum();
        let progress: f64 = self.items.iter().map(|i| i.progress).sum();
        ProductionSummary {
            items,
            produced,
            pending,
            average_progress: (progress / items as f64).round().max(0.0) as u32,
        }
    }
}
