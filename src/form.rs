//! Form orchestration
//!
//! Multi-tab registration flow: per-tab validation gating, conditional
//! spouse and correspondence-address sections, live address mirroring,
//! debounced re-validation and final submit serialization. The engine
//! receives its validators and maskers through the field configuration —
//! it never reaches into globals and never performs I/O of its own.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::cep::Address;
use crate::mask;
use crate::rules::{self, FieldConfig, Section, ValidationResult};
use crate::validators;

/// Marital statuses that make the spouse section visible and required.
const SPOUSE_STATUSES: [&str; 2] = ["Casado(a)", "União Estável"];

/// Default delay before a field is re-validated mid-typing.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// One page-section of the multi-step form.
#[derive(Debug, Clone)]
pub struct TabDefinition {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldConfig>,
}

impl TabDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, fields: Vec<FieldConfig>) -> Self {
        Self { id: id.into(), title: title.into(), fields }
    }
}

/// Field names of one address block within the form.
#[derive(Debug, Clone)]
pub struct AddressBlock {
    pub cep: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl AddressBlock {
    fn mirror_pairs(&self, other: &AddressBlock) -> Vec<(String, String)> {
        let mut pairs = vec![
            (self.cep.clone(), other.cep.clone()),
            (self.street.clone(), other.street.clone()),
            (self.number.clone(), other.number.clone()),
            (self.neighborhood.clone(), other.neighborhood.clone()),
            (self.city.clone(), other.city.clone()),
            (self.state.clone(), other.state.clone()),
        ];
        if let (Some(a), Some(b)) = (&self.complement, &other.complement) {
            pairs.push((a.clone(), b.clone()));
        }
        pairs
    }
}

/// Complete, explicit description of the form: tabs, address blocks and
/// the conditional-section wiring.
#[derive(Debug, Clone, Default)]
pub struct FormDefinition {
    pub tabs: Vec<TabDefinition>,
    address_blocks: Vec<AddressBlock>,
    address_mirrors: Vec<(String, String)>,
    marital_status_field: Option<String>,
    spouse_optional: Vec<String>,
}

impl FormDefinition {
    pub fn new(tabs: Vec<TabDefinition>) -> Self {
        Self { tabs, ..Self::default() }
    }

    /// Register the residence and correspondence address blocks; the
    /// correspondence block mirrors the residence block while "same
    /// address" is checked.
    pub fn with_mirrored_address(
        mut self,
        residence: AddressBlock,
        correspondence: AddressBlock,
    ) -> Self {
        self.address_mirrors = residence.mirror_pairs(&correspondence);
        self.address_blocks = vec![residence, correspondence];
        self
    }

    /// Name the field whose value drives the spouse section.
    pub fn with_marital_status_field(mut self, name: impl Into<String>) -> Self {
        self.marital_status_field = Some(name.into());
        self
    }

    /// Spouse-section fields that stay optional even while the section is
    /// required (the original form keeps the spouse's father's name free).
    pub fn with_spouse_optional(mut self, names: Vec<String>) -> Self {
        self.spouse_optional = names;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields().find(|f| f.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.tabs.iter().flat_map(|t| t.fields.iter())
    }

    pub fn address_block(&self, index: usize) -> Option<&AddressBlock> {
        self.address_blocks.get(index)
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown address block: {0}")]
    UnknownAddressBlock(usize),
}

/// Submission blocked by validation.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form has invalid fields, first on tab {first_invalid_tab}")]
    Invalid {
        first_invalid_tab: usize,
        fields: Vec<String>,
    },
}

/// The validated form, serialized to a flat field → value mapping.
///
/// Transport is deliberately left to the caller: the engine validates and
/// serializes, nothing more.
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedForm {
    pub fields: BTreeMap<String, String>,
}

/// Per-field debounce bookkeeping. No cancellation: a superseding
/// keystroke re-arms the deadline, and firing always re-reads live state.
#[derive(Debug)]
struct DebounceQueue {
    delay: Duration,
    pending: HashMap<String, Instant>,
}

impl DebounceQueue {
    fn new(delay: Duration) -> Self {
        Self { delay, pending: HashMap::new() }
    }

    fn note(&mut self, field: &str, now: Instant) {
        self.pending.insert(field.to_string(), now + self.delay);
    }

    fn due(&mut self, now: Instant) -> Vec<String> {
        let mut due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(field, _)| field.clone())
            .collect();
        due.sort();
        for field in &due {
            self.pending.remove(field);
        }
        due
    }
}

/// The form state machine. Exactly one tab is active at a time; moving
/// forward is gated on the current tab validating clean.
#[derive(Debug)]
pub struct FormEngine {
    definition: FormDefinition,
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    active_tab: usize,
    tab_clean: Vec<bool>,
    same_address: bool,
    spouse_visible: bool,
    debounce: DebounceQueue,
    reference_today: Option<NaiveDate>,
}

impl FormEngine {
    pub fn new(definition: FormDefinition) -> Self {
        let tab_count = definition.tabs.len();
        Self {
            definition,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            active_tab: 0,
            tab_clean: vec![false; tab_count],
            same_address: false,
            spouse_visible: false,
            debounce: DebounceQueue::new(DEBOUNCE_DELAY),
            reference_today: None,
        }
    }

    /// Pin "today" for the age/issuance rules. Without this the engine
    /// uses the current date in America/Sao_Paulo.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.reference_today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_today
            .unwrap_or_else(validators::today_in_brazil)
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Inline error currently attached to a field, if any.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn spouse_section_visible(&self) -> bool {
        self.spouse_visible
    }

    pub fn correspondence_section_visible(&self) -> bool {
        !self.same_address
    }

    /// Store a keystroke: apply the field's mask, clear its inline error,
    /// mirror into the correspondence block when applicable and refresh
    /// the spouse section when the marital status changed.
    pub fn set_value(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        let mask_type = self
            .definition
            .field(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?
            .mask;

        let display = match mask_type {
            Some(mask_type) => mask::apply(raw, mask_type),
            None => raw.to_string(),
        };

        let mirror_target = if self.same_address {
            self.definition
                .address_mirrors
                .iter()
                .find(|(residence, _)| residence == field)
                .map(|(_, correspondence)| correspondence.clone())
        } else {
            None
        };

        self.values.insert(field.to_string(), display.clone());
        self.errors.remove(field);

        if let Some(target) = mirror_target {
            self.values.insert(target.clone(), display);
            self.errors.remove(&target);
        }

        if self.definition.marital_status_field.as_deref() == Some(field) {
            self.refresh_spouse_section();
        }

        Ok(())
    }

    /// Store a keystroke and arm its debounce timer; call
    /// [`poll_validation`](Self::poll_validation) later to run the delayed
    /// checks.
    pub fn touch(&mut self, field: &str, raw: &str, now: Instant) -> Result<(), FormError> {
        self.set_value(field, raw)?;
        self.debounce.note(field, now);
        Ok(())
    }

    /// Run validation for every field whose debounce window elapsed. The
    /// checks read the field's *current* value, so a timer armed by a
    /// superseded keystroke can never act on stale input.
    pub fn poll_validation(&mut self, now: Instant) -> Vec<(String, ValidationResult)> {
        let due = self.debounce.due(now);
        let mut results = Vec::with_capacity(due.len());
        for field in due {
            if let Ok(result) = self.validate_field(&field) {
                results.push((field, result));
            }
        }
        results
    }

    /// Toggle the "same address" checkbox. Checking copies every residence
    /// value into its correspondence counterpart and hides the section.
    pub fn set_same_address(&mut self, checked: bool) {
        self.same_address = checked;
        if checked {
            let pairs = self.definition.address_mirrors.clone();
            for (residence, correspondence) in pairs {
                let value = self.value(&residence).to_string();
                self.values.insert(correspondence.clone(), value);
                self.errors.remove(&correspondence);
            }
        }
    }

    /// Write a resolved address into an address block and return the name
    /// of the house-number field the caller should focus next.
    pub fn apply_address(
        &mut self,
        block_index: usize,
        address: &Address,
    ) -> Result<String, FormError> {
        let block = self
            .definition
            .address_block(block_index)
            .ok_or(FormError::UnknownAddressBlock(block_index))?
            .clone();

        self.set_value(&block.street, &address.street)?;
        self.set_value(&block.neighborhood, &address.neighborhood)?;
        self.set_value(&block.city, &address.city)?;
        self.set_value(&block.state, &address.state)?;
        Ok(block.number)
    }

    /// Recompute spouse-section visibility from the marital status.
    /// Hiding the section clears its values so stale data can never be
    /// submitted.
    fn refresh_spouse_section(&mut self) {
        let status = self
            .definition
            .marital_status_field
            .as_ref()
            .and_then(|name| self.values.get(name))
            .map(String::as_str)
            .unwrap_or("");
        let requires_spouse = SPOUSE_STATUSES.contains(&status);

        if self.spouse_visible && !requires_spouse {
            let spouse_fields: Vec<String> = self
                .definition
                .fields()
                .filter(|f| f.section == Section::Spouse)
                .map(|f| f.name.clone())
                .collect();
            for name in spouse_fields {
                self.values.remove(&name);
                self.errors.remove(&name);
            }
            tracing::debug!("spouse section hidden, values cleared");
        }
        self.spouse_visible = requires_spouse;
    }

    fn is_visible(&self, field: &FieldConfig) -> bool {
        match field.section {
            Section::Spouse => self.spouse_visible,
            Section::Correspondence => !self.same_address,
            Section::General | Section::Residence => true,
        }
    }

    fn is_effectively_required(&self, field: &FieldConfig) -> bool {
        if !self.is_visible(field) {
            return false;
        }
        if field.is_required() {
            return true;
        }
        field.section == Section::Spouse
            && self.spouse_visible
            && !self.spouse_optional(&field.name)
    }

    fn spouse_optional(&self, name: &str) -> bool {
        self.definition.spouse_optional.iter().any(|n| n == name)
    }

    /// Validate one field now, recording or clearing its inline error.
    pub fn validate_field(&mut self, name: &str) -> Result<ValidationResult, FormError> {
        let result = {
            let field = self
                .definition
                .field(name)
                .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

            if !self.is_visible(field) {
                ValidationResult::ok()
            } else {
                let raw = self.values.get(name).map(String::as_str).unwrap_or("");
                if self.is_effectively_required(field) && raw.trim().is_empty() {
                    ValidationResult::fail(rules::messages::REQUIRED)
                } else {
                    rules::validate_value(field, raw, &self.values, self.today())
                }
            }
        };

        if result.is_valid {
            self.errors.remove(name);
        } else if let Some(message) = &result.message {
            self.errors.insert(name.to_string(), message.clone());
        }
        Ok(result)
    }

    /// Validate the required/non-empty fields of one tab; a clean pass is
    /// remembered for tab-header navigation gating.
    pub fn validate_tab(&mut self, index: usize) -> bool {
        let Some(tab) = self.definition.tabs.get(index) else {
            return false;
        };
        let names: Vec<String> = tab.fields.iter().map(|f| f.name.clone()).collect();

        let mut clean = true;
        for name in names {
            let should_check = {
                match self.definition.field(&name) {
                    Some(field) => {
                        self.is_visible(field)
                            && (self.is_effectively_required(field)
                                || !self.value(&name).trim().is_empty())
                    }
                    None => false,
                }
            };
            if should_check {
                if let Ok(result) = self.validate_field(&name) {
                    clean &= result.is_valid;
                }
            }
        }

        if clean {
            self.tab_clean[index] = true;
        }
        clean
    }

    /// Advance to the next tab; blocked while the current tab has invalid
    /// required/non-empty fields (which stay marked).
    pub fn next(&mut self) -> bool {
        if self.active_tab + 1 >= self.definition.tabs.len() {
            return false;
        }
        if !self.validate_tab(self.active_tab) {
            tracing::debug!(tab = self.active_tab, "navigation blocked by invalid fields");
            return false;
        }
        self.active_tab += 1;
        true
    }

    /// Go back one tab. Never validates.
    pub fn prev(&mut self) -> bool {
        if self.active_tab == 0 {
            return false;
        }
        self.active_tab -= 1;
        true
    }

    /// Jump to a tab via its header. Every tab strictly before the target
    /// must validate clean; otherwise the first failing tab becomes active
    /// instead. Returns the tab that ended up active.
    pub fn jump_to(&mut self, target: usize) -> usize {
        let last = self.definition.tabs.len().saturating_sub(1);
        let target = target.min(last);

        for index in 0..target {
            if !self.validate_tab(index) {
                tracing::debug!(requested = target, redirected = index, "tab jump redirected");
                self.active_tab = index;
                return index;
            }
        }
        self.active_tab = target;
        target
    }

    /// Validate every tab and serialize the form. On failure the first
    /// tab containing an invalid field becomes active and nothing is
    /// produced — there is no partial submit.
    pub fn submit(&mut self) -> Result<SubmittedForm, SubmitError> {
        let mut first_invalid = None;
        for index in 0..self.definition.tabs.len() {
            if !self.validate_tab(index) && first_invalid.is_none() {
                first_invalid = Some(index);
            }
        }

        if let Some(tab) = first_invalid {
            self.active_tab = tab;
            let fields: Vec<String> = self.errors.keys().cloned().collect();
            tracing::debug!(tab, invalid = fields.len(), "submission blocked");
            return Err(SubmitError::Invalid { first_invalid_tab: tab, fields });
        }

        let mut fields = BTreeMap::new();
        for field in self.definition.fields() {
            fields.insert(field.name.clone(), self.value(&field.name).to_string());
        }
        tracing::info!(field_count = fields.len(), "form serialized for submission");
        Ok(SubmittedForm { fields })
    }
}
