//! Pleme Cadastro - Brazilian investor-registration form engine
//!
//! Headless form handling for the Pleme onboarding flow, with special
//! support for Brazilian market requirements:
//! - CPF (individual taxpayer registry) and CNPJ (business registry)
//!   checksum validation
//! - field format validation (email, phone, CEP, dates, age, names)
//! - input masking with caret preservation
//! - CEP address lookup (ViaCEP) and IBGE locality data
//! - multi-tab form orchestration with conditional sections
//! - an optional backend service for the open-banking connect flow
//!
//! The form orchestrator receives validators and maskers through explicit
//! per-field configuration — there are no global registries and no
//! markup-driven setup.

pub mod cadastro;
pub mod cep;
pub mod document;
pub mod form;
pub mod ibge;
pub mod investment;
pub mod mask;
pub mod rules;
pub mod validators;

#[cfg(feature = "service")]
pub mod service;

pub use cep::Address;
#[cfg(feature = "lookup")]
pub use cep::{AddressLookup, LookupError, ViaCepClient};
pub use document::{is_valid_cnpj, is_valid_cpf, DocumentKind};
pub use form::{FormDefinition, FormEngine, SubmitError, SubmittedForm, TabDefinition};
pub use mask::MaskType;
pub use rules::{FieldConfig, Rule, Section, ValidationResult};
