//! Wire rows to domain types.

use portal_core::domain::{
    FinancialTitle, Invoice, Order, OrderDetail, OrderStatusFlags, ProductionItem, UserProfile,
};
use portal_shared::wire::{
    InvoiceRow, LoginReply, OrderDetailReply, OrderRow, OrderStatusRow, ProductionRow, TitleRow,
    YES,
};

fn is_yes(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(YES)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn profile(reply: LoginReply) -> UserProfile {
    UserProfile {
        code: reply.code,
        name: reply.name,
        email: reply.email,
        tax_id: reply.cgc,
    }
}

pub(crate) fn order(row: OrderRow) -> Order {
    Order {
        number: row.number,
        proposal: row.proposal,
        date: row.date,
        operation: row.operation,
        value: row.value,
    }
}

fn status_flags(row: &OrderStatusRow) -> OrderStatusFlags {
    OrderStatusFlags {
        checked: is_yes(&row.conferido),
        production_started: is_yes(&row.producaoiniciada),
        production_finished: is_yes(&row.producaoconcluida),
        invoiced: is_yes(&row.faturado),
        shipped: is_yes(&row.expedido),
    }
}

pub(crate) fn order_detail(reply: OrderDetailReply) -> OrderDetail {
    OrderDetail {
        status: reply.status.first().map(status_flags),
        proposal: reply.proposta,
        operation_type: reply.tipooperacao,
        carrier: reply.transportadora,
        total: reply.totalpedido,
        access_key: non_empty(reply.chaveacesso),
        assembly_link: non_empty(reply.link_montagem),
        production_order: reply.op.trim().to_string(),
    }
}

pub(crate) fn production_item(row: ProductionRow) -> ProductionItem {
    ProductionItem {
        item: row.item,
        product: row.product,
        description: row.description,
        unit: row.unit,
        quantity_sold: row.quantity_sold.unwrap_or_default(),
        total_orders: row.total_orders.unwrap_or_default(),
        produced: row.produced.unwrap_or_default(),
        pending: row.pending.unwrap_or_default(),
        progress: row.progress.unwrap_or_default().clamp(0.0, 100.0),
    }
}

pub(crate) fn invoice(row: InvoiceRow) -> Invoice {
    Invoice {
        number: row.number,
        issued: row.issued,
        value: row.value,
        operation: row.operation,
        access_key: row.chavenf,
    }
}

pub(crate) fn title(row: TitleRow) -> FinancialTitle {
    FinancialTitle {
        number: row.number,
        installment: row.installment,
        issued: row.issued,
        due: row.due,
        value: row.value,
        paid: row.paid,
        balance: row.balance,
    }
}
