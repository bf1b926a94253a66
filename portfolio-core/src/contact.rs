//! Contact form validation and the messaging deep link.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::SiteConfig;
use crate::error::PortfolioResult;

/// How long transient form notices stay on screen (ms).
pub const NOTICE_DISMISS_MS: f64 = 5000.0;

/// Minimum trimmed name length.
const NAME_MIN_LEN: usize = 2;

/// Minimum trimmed message length.
const MESSAGE_MIN_LEN: usize = 10;

/// A named form field. `dom_id` matches the document contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// The visitor's name.
    Name,
    /// The visitor's e-mail address.
    Email,
    /// Optional phone number.
    Phone,
    /// The message body.
    Message,
}

impl Field {
    /// The field's element id in the document.
    #[must_use]
    pub fn dom_id(self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::Email => "email",
            Self::Phone => "telefone",
            Self::Message => "mensagem",
        }
    }
}

/// One inline validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field.
    pub field: Field,
    /// Inline message shown next to it.
    pub message: &'static str,
}

/// Transient status notices shown under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormNotice {
    /// Validation passed; the deep link is being opened.
    Redirecting,
    /// One or more fields failed validation.
    ValidationFailed,
    /// Opening the deep link threw.
    OpenFailed,
}

impl FormNotice {
    /// The visitor-facing text.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Redirecting => "Redirecionando para WhatsApp...",
            Self::ValidationFailed => "Por favor, corrija os campos destacados.",
            Self::OpenFailed => "Erro ao enviar mensagem. Tente novamente.",
        }
    }

    /// Whether this notice styles as a success.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Redirecting
    }
}

/// The raw values read from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Name field value.
    pub name: String,
    /// E-mail field value.
    pub email: String,
    /// Phone field value (optional, free-form).
    pub phone: String,
    /// Message field value.
    pub message: String,
}

impl Submission {
    /// Full validation pass, collecting every failing field.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().chars().count() < NAME_MIN_LEN {
            errors.push(FieldError {
                field: Field::Name,
                message: "Nome deve ter pelo menos 2 caracteres",
            });
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError {
                field: Field::Email,
                message: "E-mail inválido",
            });
        }
        if self.message.trim().chars().count() < MESSAGE_MIN_LEN {
            errors.push(FieldError {
                field: Field::Message,
                message: "Mensagem deve ter pelo menos 10 caracteres",
            });
        }
        errors
    }

    /// The fixed-template message sent through the deep link.
    ///
    /// The template must match exactly; users expect this shape in their
    /// messaging app.
    #[must_use]
    pub fn build_message(&self, config: &SiteConfig) -> String {
        let phone = if self.phone.trim().is_empty() {
            "Não informado"
        } else {
            self.phone.trim()
        };
        format!(
            "🌟 *Nova mensagem do site!*\n\n\
             👤 *Nome:* {}\n\
             📧 *E-mail:* {}\n\
             📱 *Telefone:* {}\n\n\
             💬 *Mensagem:*\n{}\n\n\
             ---\n\
             _Enviado via {}_",
            self.name, self.email, phone, self.message, config.site_domain
        )
    }

    /// Build the messaging deep link for this submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured recipient produces an invalid
    /// URL.
    pub fn deep_link(&self, config: &SiteConfig) -> PortfolioResult<Url> {
        let text = urlencoding::encode(&self.build_message(config)).into_owned();
        let raw = format!(
            "https://wa.me/{}?text={}",
            config.whatsapp_number.trim(),
            text
        );
        Ok(Url::parse(&raw)?)
    }
}

/// Per-field check used on blur. Messages are the shorter inline variants.
#[must_use]
pub fn validate_field(field: Field, value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    let message = match field {
        Field::Name if trimmed.chars().count() < NAME_MIN_LEN => "Nome muito curto",
        Field::Email if !is_valid_email(trimmed) => "E-mail inválido",
        Field::Message if trimmed.chars().count() < MESSAGE_MIN_LEN => "Mensagem muito curta",
        _ => return None,
    };
    Some(FieldError { field, message })
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// with content on both sides somewhere after it.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .rfind('.')
        .is_some_and(|dot| dot > 0 && dot < domain.len() - 1)
}
