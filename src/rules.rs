//! Field validation rules
//!
//! Declarative per-field configuration for the registration form. Each
//! field carries an explicit rule set built at form-setup time — the
//! runtime never re-derives rules from markup — and every check produces
//! a fresh [`ValidationResult`], since input can change between calls.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{self, DocumentKind};
use crate::mask::MaskType;
use crate::validators;

/// Default pt-BR error messages, as shown inline next to the fields.
pub mod messages {
    pub const REQUIRED: &str = "Este campo é obrigatório";
    pub const EMAIL: &str = "Por favor, insira um email válido";
    pub const CPF: &str = "CPF inválido";
    pub const CNPJ: &str = "CNPJ inválido";
    pub const CEP: &str = "CEP inválido";
    pub const PHONE: &str = "Telefone inválido";
    pub const DATE: &str = "Data inválida";
    pub const AGE: &str = "Idade mínima de 18 anos requerida";
    pub const ISSUANCE_DATE: &str = "Data de expedição inválida ou futura";
    pub const DOCUMENT_NUMBER: &str = "Número de documento inválido";
    pub const NAME: &str = "Nome inválido";
    pub const PATTERN: &str = "Formato inválido";
    pub const MATCH: &str = "Os campos não coincidem";

    pub fn min_length(min: usize) -> String {
        format!("Este campo deve ter no mínimo {min} caracteres")
    }

    pub fn max_length(max: usize) -> String {
        format!("Este campo deve ter no máximo {max} caracteres")
    }
}

/// A single validation rule attachable to a field.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Email,
    Cpf,
    Cnpj,
    Cep,
    Phone,
    Date,
    Age,
    IssuanceDate,
    Name,
    MinLength(usize),
    MaxLength(usize),
    /// Arbitrary regex the whole value must match.
    Pattern(Regex),
    /// Value must equal the named sibling field's value.
    Match { other: String },
    /// Document number validated against the kind selected in a sibling
    /// field (`RG`, `CNH` or `Passaporte`).
    DocumentNumber { kind_field: String },
}

/// Outcome of validating one field: a verdict plus the inline message to
/// render when invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { is_valid: true, message: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { is_valid: false, message: Some(message.into()) }
    }
}

/// Which conditional section of the form a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    General,
    Residence,
    /// Hidden and mirrored while "same address" is checked.
    Correspondence,
    /// Visible and required only for married / stable-union investors.
    Spouse,
}

/// A rule with an optional per-field message override.
#[derive(Debug, Clone)]
pub struct AttachedRule {
    pub rule: Rule,
    pub message: Option<String>,
}

impl From<Rule> for AttachedRule {
    fn from(rule: Rule) -> Self {
        Self { rule, message: None }
    }
}

/// Explicit configuration for one form field, assembled once at setup.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub name: String,
    pub label: String,
    pub mask: Option<MaskType>,
    pub rules: Vec<AttachedRule>,
    pub section: Section,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            mask: None,
            rules: Vec::new(),
            section: Section::General,
        }
    }

    pub fn mask(mut self, mask: MaskType) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn rule_with_message(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.rules.push(AttachedRule { rule, message: Some(message.into()) });
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    /// Whether the field carries a `Required` rule of its own.
    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|a| matches!(a.rule, Rule::Required))
    }
}

/// Validate a value against a field's rule set.
///
/// `values` exposes the other fields for cross-field rules, `today` fixes
/// the reference date for age/issuance checks. Rule order matters: the
/// required check runs first, then `Name`, then the remaining rules in
/// declaration order; the first failure wins.
pub fn validate_value(
    field: &FieldConfig,
    raw: &str,
    values: &BTreeMap<String, String>,
    today: NaiveDate,
) -> ValidationResult {
    let trimmed = raw.trim();

    if field.is_required() && trimmed.is_empty() {
        let msg = rule_message(field, |r| matches!(r, Rule::Required));
        return ValidationResult::fail(msg.unwrap_or_else(|| messages::REQUIRED.to_string()));
    }

    // Optional and empty: nothing else to check
    if trimmed.is_empty() {
        return ValidationResult::ok();
    }

    // Name runs before the other format rules, as in the original chain
    if let Some(attached) = field
        .rules
        .iter()
        .find(|a| matches!(a.rule, Rule::Name))
    {
        if !validators::is_valid_name(raw) {
            return fail_with(attached, messages::NAME);
        }
    }

    for attached in &field.rules {
        let valid = match &attached.rule {
            Rule::Required | Rule::Name => continue,
            Rule::Email => validators::is_valid_email(trimmed),
            Rule::Cpf => document::is_valid_cpf(trimmed),
            Rule::Cnpj => document::is_valid_cnpj(trimmed),
            Rule::Cep => validators::is_valid_cep(trimmed),
            Rule::Phone => validators::is_valid_phone(trimmed),
            Rule::Date => validators::is_valid_date(trimmed),
            Rule::Age => validators::parse_br_date(trimmed)
                .map(|birth| validators::is_of_age_on(birth, today))
                .unwrap_or(false),
            Rule::IssuanceDate => validators::is_valid_issuance_date_on(trimmed, today),
            Rule::MinLength(min) => trimmed.chars().count() >= *min,
            Rule::MaxLength(max) => trimmed.chars().count() <= *max,
            Rule::Pattern(pattern) => pattern.is_match(trimmed),
            Rule::Match { other } => {
                values.get(other).map(String::as_str).unwrap_or("") == trimmed
            }
            Rule::DocumentNumber { kind_field } => {
                match values.get(kind_field).and_then(|v| DocumentKind::parse(v)) {
                    Some(kind) => document::is_valid_document_number(trimmed, kind),
                    // No kind selected yet: nothing to validate against
                    None => true,
                }
            }
        };

        if !valid {
            tracing::debug!(
                field = %field.name,
                rule = ?attached.rule,
                "field validation failed"
            );
            return fail_with(attached, &default_message(&attached.rule));
        }
    }

    ValidationResult::ok()
}

fn fail_with(attached: &AttachedRule, fallback: &str) -> ValidationResult {
    ValidationResult::fail(
        attached
            .message
            .clone()
            .unwrap_or_else(|| fallback.to_string()),
    )
}

fn rule_message(field: &FieldConfig, pick: impl Fn(&Rule) -> bool) -> Option<String> {
    field
        .rules
        .iter()
        .find(|a| pick(&a.rule))
        .and_then(|a| a.message.clone())
}

fn default_message(rule: &Rule) -> String {
    match rule {
        Rule::Required => messages::REQUIRED.to_string(),
        Rule::Email => messages::EMAIL.to_string(),
        Rule::Cpf => messages::CPF.to_string(),
        Rule::Cnpj => messages::CNPJ.to_string(),
        Rule::Cep => messages::CEP.to_string(),
        Rule::Phone => messages::PHONE.to_string(),
        Rule::Date => messages::DATE.to_string(),
        Rule::Age => messages::AGE.to_string(),
        Rule::IssuanceDate => messages::ISSUANCE_DATE.to_string(),
        Rule::Name => messages::NAME.to_string(),
        Rule::MinLength(min) => messages::min_length(*min),
        Rule::MaxLength(max) => messages::max_length(*max),
        Rule::Pattern(_) => messages::PATTERN.to_string(),
        Rule::Match { .. } => messages::MATCH.to_string(),
        Rule::DocumentNumber { .. } => messages::DOCUMENT_NUMBER.to_string(),
    }
}
