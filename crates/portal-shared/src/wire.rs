//! Payloads exchanged with the ERP REST backend.
//!
//! Field names are fixed by the backend and mixed-case; the Rust side uses
//! snake_case with explicit renames. Every response field is optional
//! because the backend omits fields freely.

use serde::{Deserialize, Deserializer, Serialize};

pub const LOGIN_ENDPOINT: &str = "VKPCLILOGIN";
pub const ORDERS_ENDPOINT: &str = "VKPCLILPED";
pub const ORDER_DETAIL_ENDPOINT: &str = "VKPCLIDPED";
pub const PRODUCTION_ENDPOINT: &str = "VKPCDETPRD";
pub const INVOICES_ENDPOINT: &str = "VKPCLILNF";
pub const INVOICE_PDF_ENDPOINT: &str = "VKPCLIPNF";
pub const TITLES_ENDPOINT: &str = "VKPCLIDFIN";
pub const ACCESS_REQUEST_ENDPOINT: &str = "SOLICITAR_ACESSO";
pub const HEALTH_ENDPOINT: &str = "health";

/// Value the backend uses for "yes" in flag fields.
pub const YES: &str = "Sim";

/// Accept a number, a numeric string (`"1234.5"` or pt-BR `"1.234,50"`),
/// or null. Anything unparseable becomes `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => parse_number(&s),
        Some(Raw::Other(_)) | None => None,
    })
}

fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(n) = value.parse::<f64>() {
        return n.is_finite().then_some(n);
    }
    let normalized = value.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accept a string or a number and keep it as text. Order and invoice
/// numbers come back either way.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

// Login

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload<'a> {
    pub email: &'a str,
    #[serde(rename = "Pass")]
    pub password: &'a str,
    /// Tax id, digits only.
    #[serde(rename = "Cgc")]
    pub tax_id: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginReply {
    /// Misspelled by the backend.
    #[serde(rename = "sucess", default)]
    pub success: bool,
    #[serde(rename = "Codigo", default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(rename = "Nome", default)]
    pub name: String,
    #[serde(default)]
    pub cgc: String,
    #[serde(default)]
    pub email: String,
}

// Orders

#[derive(Debug, Clone, Serialize)]
pub struct OrdersQuery<'a> {
    #[serde(rename = "CodigoCliente")]
    pub client_code: &'a str,
    #[serde(rename = "Todos")]
    pub all: &'static str,
    #[serde(rename = "Datainicio")]
    pub start_date: String,
    #[serde(rename = "Datafim")]
    pub end_date: String,
    #[serde(rename = "Proposta")]
    pub proposal: &'a str,
    #[serde(rename = "Pedido")]
    pub order: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersReply {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "pedido", default)]
    pub orders: Vec<OrderRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRow {
    #[serde(rename = "Numero", default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(rename = "Proposta", default, deserialize_with = "lenient_string")]
    pub proposal: String,
    #[serde(rename = "Data", default)]
    pub date: String,
    #[serde(rename = "Operacao", default)]
    pub operation: String,
    #[serde(rename = "Valor", default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetailQuery<'a> {
    #[serde(rename = "pedido")]
    pub order: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDetailReply {
    #[serde(default, deserialize_with = "lenient_string")]
    pub proposta: String,
    #[serde(default)]
    pub tipooperacao: String,
    #[serde(default)]
    pub transportadora: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub totalpedido: Option<f64>,
    #[serde(default)]
    pub chaveacesso: Option<String>,
    #[serde(rename = "LinkMontagem", default)]
    pub link_montagem: Option<String>,
    #[serde(rename = "Op", default)]
    pub op: String,
    #[serde(default)]
    pub status: Vec<OrderStatusRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderStatusRow {
    #[serde(default)]
    pub conferido: String,
    #[serde(default)]
    pub producaoiniciada: String,
    #[serde(rename = "Producaoconcluida", default)]
    pub producaoconcluida: String,
    #[serde(default)]
    pub faturado: String,
    #[serde(default)]
    pub expedido: String,
}

// Production

#[derive(Debug, Clone, Serialize)]
pub struct ProductionQuery<'a> {
    #[serde(rename = "Pedido")]
    pub order: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductionReply {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "Produtos", default)]
    pub products: Vec<ProductionRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductionRow {
    #[serde(rename = "Item", default, deserialize_with = "lenient_string")]
    pub item: String,
    #[serde(rename = "Produto", default, deserialize_with = "lenient_string")]
    pub product: String,
    #[serde(rename = "Descricao", default)]
    pub description: String,
    #[serde(rename = "Unidade", default)]
    pub unit: String,
    #[serde(rename = "Qtdvenda", default, deserialize_with = "lenient_number")]
    pub quantity_sold: Option<f64>,
    #[serde(rename = "TotalOrdens", default, deserialize_with = "lenient_number")]
    pub total_orders: Option<f64>,
    #[serde(rename = "TotalProd", default, deserialize_with = "lenient_number")]
    pub produced: Option<f64>,
    #[serde(rename = "TotalPend", default, deserialize_with = "lenient_number")]
    pub pending: Option<f64>,
    /// Spelled this way by the backend.
    #[serde(rename = "Procentagem", default, deserialize_with = "lenient_number")]
    pub progress: Option<f64>,
}

// Invoices

#[derive(Debug, Clone, Serialize)]
pub struct InvoicesQuery<'a> {
    #[serde(rename = "Todos")]
    pub all: &'static str,
    #[serde(rename = "CodigoCliente")]
    pub client_code: &'a str,
    #[serde(rename = "Nota")]
    pub invoice: &'a str,
    #[serde(rename = "DataDe")]
    pub from: String,
    #[serde(rename = "DataAte")]
    pub to: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicesReply {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "Notas", default)]
    pub invoices: Vec<InvoiceRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceRow {
    #[serde(rename = "Numero", default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(rename = "Emissao", default)]
    pub issued: String,
    #[serde(rename = "ValorNF", default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(rename = "Operacao", default)]
    pub operation: String,
    #[serde(default)]
    pub chavenf: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoicePdfQuery<'a> {
    pub chaveacesso: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicePdfReply {
    #[serde(rename = "PDF64", default)]
    pub pdf64: Option<String>,
}

// Financial titles

#[derive(Debug, Clone, Serialize)]
pub struct TitlesQuery<'a> {
    #[serde(rename = "Todos")]
    pub all: &'static str,
    #[serde(rename = "CodigoCliente")]
    pub client_code: &'a str,
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "DataDe")]
    pub from: String,
    #[serde(rename = "DataAte")]
    pub to: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlesReply {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "Titulos", default)]
    pub titles: Vec<TitleRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleRow {
    #[serde(rename = "NumeroTitulo", default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(rename = "Parcela", default, deserialize_with = "lenient_string")]
    pub installment: String,
    #[serde(rename = "Emissao", default)]
    pub issued: String,
    #[serde(rename = "Vencimento", default)]
    pub due: String,
    #[serde(rename = "Valor", default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(rename = "ValorPago", default, deserialize_with = "lenient_number")]
    pub paid: Option<f64>,
    #[serde(rename = "Saldo", default, deserialize_with = "lenient_number")]
    pub balance: Option<f64>,
}

// Access request

#[derive(Debug, Clone, Serialize)]
pub struct AccessRequestPayload<'a> {
    #[serde(rename = "nomeEmpresa")]
    pub company_name: &'a str,
    pub cnpj: &'a str,
    #[serde(rename = "nomeContato")]
    pub contact_name: &'a str,
    pub telefone: &'a str,
    pub email: &'a str,
    pub observacoes: &'a str,
}
