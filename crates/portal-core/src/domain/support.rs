use serde::{Deserialize, Serialize};

/// File attached to a support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// Support (SAC) request submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    /// Invoice, order or proposal number the request is about.
    pub reference: String,
    pub notes: String,
    pub attachments: Vec<Attachment>,
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace each `{{key}}` of `template` in a single pass. Substituted text
/// is never scanned again; unknown keys are kept as written.
fn fill_template(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}").and_then(|end| Some((end, value(&after[..end])?))) {
            Some((end, filled)) => {
                out.push_str(&filled);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

const EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Solicitação SAC - Portal MVK</title>
    <style>
      body { background-color: #f8fafc; font-family: 'Inter', sans-serif; margin: 0; padding: 0; }
      .container { max-width: 600px; margin: 40px auto; background-color: #ffffff; border-radius: 8px; border: 1px solid #e2e8f0; padding: 24px; }
      .header { background-color: #9f2441; color: #ffffff; padding: 16px; border-radius: 8px 8px 0 0; text-align: center; }
      .header h1 { margin: 0; font-size: 20px; }
      .content { padding: 16px 0; }
      .content h2 { color: #111827; font-size: 18px; }
      .info-box { background-color: #f9fafb; padding: 16px; border-radius: 6px; border: 1px solid #e5e7eb; margin-bottom: 16px; }
      .info-box strong { color: #111827; }
      .footer { text-align: center; font-size: 12px; color: #6b7280; margin-top: 24px; }
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>Solicitação de Atendimento - Portal do Cliente MVK</h1>
      </div>
      <div class="content">
        <h2>Detalhes da Solicitação</h2>
        <div class="info-box">
          <p><strong>Nota / Pedido / Proposta:</strong> {{reference}}</p>
          <p><strong>Observações:</strong><br />{{notes}}</p>
        </div>
        <p>
          Esta solicitação foi enviada através do Portal do Cliente MVK.
          Por favor, analise as informações e entre em contato com o cliente se necessário.
        </p>
        <p>
          <strong>Arquivos anexados:</strong> {{attachments}} arquivo(s) enviado(s).
        </p>
      </div>
      <div class="footer">
        © {{year}} MVK - Todos os direitos reservados.
      </div>
    </div>
  </body>
</html>
"#;

impl SupportTicket {
    pub fn subject(&self) -> String {
        format!("Solicitação SAC - {}", self.reference)
    }

    /// HTML body of the notification e-mail. User text is escaped and line
    /// breaks in the notes become `<br>`.
    pub fn render_html(&self, year: i32) -> String {
        let notes = escape_html(&self.notes).replace("\r\n", "\n").replace('\n', "<br>");
        fill_template(EMAIL_TEMPLATE, |key| match key {
            "reference" => Some(escape_html(&self.reference)),
            "notes" => Some(notes.clone()),
            "attachments" => Some(self.attachments.len().to_string()),
            "year" => Some(year.to_string()),
            _ => None,
        })
    }
}
