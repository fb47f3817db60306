use std::sync::Arc;

use crate::domain::{AccessRequest, UserProfile};
use crate::error::DomainError;
use crate::ports::PortalBackend;
use crate::session::SessionContext;
use crate::validation::{digits_only, is_valid_cnpj, is_valid_email};

use super::backend_failure;

pub const ACCESS_REQUESTED_MESSAGE: &str =
    "Solicitação enviada com sucesso! Entraremos em contato em até 24 horas.";

/// `Bem-vindo(a), <name>!`
pub fn welcome_message(profile: &UserProfile) -> String {
    format!("Bem-vindo(a), {}!", profile.name)
}

/// Validate the credentials and check them against the backend, without
/// touching any session. The CNPJ goes out as digits only.
pub async fn authenticate(
    backend: &dyn PortalBackend,
    email: &str,
    password: &str,
    cnpj: &str,
) -> Result<UserProfile, DomainError> {
    LoginView::validate_credentials(email, password, cnpj)?;

    backend
        .login(email.trim(), password, &digits_only(cnpj))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Erro no login");
            DomainError::Backend(e.to_string())
        })?
        .ok_or_else(|| {
            tracing::warn!(email = %email.trim(), "Login rejected by backend");
            DomainError::InvalidCredentials
        })
}

/// Validate, normalize and submit a first-access request. Returns the
/// request as sent.
pub async fn submit_access_request(
    backend: &dyn PortalBackend,
    request: &AccessRequest,
) -> Result<AccessRequest, DomainError> {
    request.validate()?;
    let request = request.normalized();
    backend
        .request_access(&request)
        .await
        .map_err(|e| backend_failure("solicitar acesso", e))?;
    tracing::info!(company = %request.company_name, "Access request submitted");
    Ok(request)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub profile: UserProfile,
    /// `Bem-vindo(a), <name>!`
    pub message: String,
}

/// Login page: credential login and first-access requests.
pub struct LoginView {
    backend: Arc<dyn PortalBackend>,
    session: Arc<SessionContext>,
}

impl LoginView {
    pub fn new(backend: Arc<dyn PortalBackend>, session: Arc<SessionContext>) -> Self {
        Self { backend, session }
    }

    /// Required fields, e-mail and CNPJ checks, in that order.
    pub fn validate_credentials(email: &str, password: &str, cnpj: &str) -> Result<(), DomainError> {
        if email.trim().is_empty() || password.is_empty() || cnpj.trim().is_empty() {
            return Err(DomainError::Validation(
                "Todos os campos são obrigatórios".into(),
            ));
        }
        if !is_valid_email(email) {
            return Err(DomainError::Validation("Email inválido".into()));
        }
        if !is_valid_cnpj(cnpj) {
            return Err(DomainError::Validation("CNPJ inválido".into()));
        }
        Ok(())
    }

    /// Validate, authenticate against the backend and open the session.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cnpj: &str,
    ) -> Result<LoginSuccess, DomainError> {
        let profile = authenticate(self.backend.as_ref(), email, password, cnpj).await?;

        if !self.session.login(&profile).await {
            return Err(DomainError::Internal(
                "não foi possível salvar a sessão".into(),
            ));
        }

        Ok(LoginSuccess {
            message: welcome_message(&profile),
            profile,
        })
    }

    /// Validate and submit a first-access request.
    pub async fn request_access(&self, request: &AccessRequest) -> Result<&'static str, DomainError> {
        submit_access_request(self.backend.as_ref(), request).await?;
        Ok(ACCESS_REQUESTED_MESSAGE)
    }
}
