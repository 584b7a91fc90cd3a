//! Field format validators
//!
//! Pure predicates used by the rule engine. Unless noted otherwise an
//! empty value validates true — requiredness is a separate, orthogonal
//! rule and the two never mix.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::America::Sao_Paulo;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex");
    static ref CEP_PATTERN: Regex = Regex::new(r"^\d{5}-?\d{3}$").expect("valid regex");
    static ref DATE_PATTERN: Regex =
        Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid regex");
    static ref NAME_PATTERN: Regex =
        Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ\s.'-]+$").expect("valid regex");
    static ref NAME_REPEATED_PUNCT: Regex =
        Regex::new(r"--|\.\.|''").expect("valid regex");
}

/// Today's date as seen by the form's audience (America/Sao_Paulo).
///
/// A plain UTC date can be one day ahead of the user's wall clock late in
/// the evening, which would wrongly reject an 18th-birthday signup.
pub fn today_in_brazil() -> NaiveDate {
    Utc::now().with_timezone(&Sao_Paulo).date_naive()
}

/// Validate an email address (RFC-light).
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.is_empty() || EMAIL_PATTERN.is_match(email)
}

/// Validate a Brazilian phone number: 10 digits for landlines, 11 for
/// mobiles, formatting ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.trim().is_empty() {
        return true;
    }
    let len = phone.chars().filter(char::is_ascii_digit).count();
    len == 10 || len == 11
}

/// Validate CEP format (`00000-000` or `00000000`).
pub fn is_valid_cep(cep: &str) -> bool {
    let cep = cep.trim();
    cep.is_empty() || CEP_PATTERN.is_match(cep)
}

/// Parse a `DD/MM/AAAA` date, rejecting impossible calendar dates.
pub fn parse_br_date(value: &str) -> Option<NaiveDate> {
    let caps = DATE_PATTERN.captures(value.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Validate a `DD/MM/AAAA` date string.
pub fn is_valid_date(value: &str) -> bool {
    value.trim().is_empty() || parse_br_date(value).is_some()
}

/// Age check against an explicit reference date, with exact month/day
/// comparison — no floor division by 365.
pub fn is_of_age_on(birth: NaiveDate, today: NaiveDate) -> bool {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age >= 18
}

/// Validate that a birth date is at least 18 years before today.
/// The date must parse; an empty or malformed value fails.
pub fn is_of_age(value: &str) -> bool {
    match parse_br_date(value) {
        Some(birth) => is_of_age_on(birth, today_in_brazil()),
        None => false,
    }
}

/// Validate a document issuance date: must parse and must not be in the
/// future.
pub fn is_valid_issuance_date(value: &str) -> bool {
    is_valid_issuance_date_on(value, today_in_brazil())
}

pub fn is_valid_issuance_date_on(value: &str, today: NaiveDate) -> bool {
    match parse_br_date(value) {
        Some(date) => date <= today,
        None => false,
    }
}

/// Validate a personal name: letters (accented included), spaces and the
/// simple punctuation `. ' -`. Rejects digits, leading/trailing spaces,
/// double spaces and repeated punctuation.
pub fn is_valid_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return true;
    }

    // Any digit rejects immediately
    if name.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if !NAME_PATTERN.is_match(name) {
        return false;
    }

    if name != name.trim() {
        return false;
    }

    if name.contains("  ") {
        return false;
    }

    !NAME_REPEATED_PUNCT.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("investidor@pleme.io"));
        assert!(is_valid_email("nome.sobrenome+tag@sub.dominio.com.br"));
        assert!(!is_valid_email("sem-arroba.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("dois@@arrobas.com"));
        assert!(is_valid_email(""));
    }

    #[test]
    fn phone_lengths() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("(11) 3456-7890"));
        assert!(!is_valid_phone("(11) 345-678"));
        assert!(!is_valid_phone("119876543210"));
        assert!(is_valid_phone("   "));
    }

    #[test]
    fn cep_format() {
        assert!(is_valid_cep("01310-100"));
        assert!(is_valid_cep("01310100"));
        assert!(!is_valid_cep("1310-100"));
        assert!(!is_valid_cep("01310-10"));
    }

    #[test]
    fn calendar_dates_round_trip() {
        assert!(is_valid_date("29/02/2024")); // leap year
        assert!(!is_valid_date("29/02/2023"));
        assert!(!is_valid_date("31/04/2024")); // April has 30 days
        assert!(is_valid_date("29/02/2000")); // divisible by 400
        assert!(!is_valid_date("29/02/1900")); // divisible by 100, not 400
        assert!(!is_valid_date("2024-02-29"));
        assert!(!is_valid_date("1/1/2024"));
    }

    #[test]
    fn age_boundary_is_exact() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date");
        let exactly_18 = NaiveDate::from_ymd_opt(2008, 8, 7).expect("valid date");
        let one_day_short = NaiveDate::from_ymd_opt(2008, 8, 8).expect("valid date");
        assert!(is_of_age_on(exactly_18, today));
        assert!(!is_of_age_on(one_day_short, today));
    }

    #[test]
    fn age_requires_parseable_date() {
        assert!(!is_of_age(""));
        assert!(!is_of_age("31/02/2000"));
        assert!(is_of_age("01/01/1980"));
    }

    #[test]
    fn issuance_date_not_in_future() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date");
        assert!(is_valid_issuance_date_on("07/08/2026", today));
        assert!(is_valid_issuance_date_on("15/03/2010", today));
        assert!(!is_valid_issuance_date_on("08/08/2026", today));
        assert!(!is_valid_issuance_date_on("", today));
    }

    #[test]
    fn names_allow_accents_and_simple_punctuation() {
        assert!(is_valid_name("Maria da Conceição"));
        assert!(is_valid_name("José D'Ávila Sant'Anna"));
        assert!(is_valid_name("Ana-Luísa M. Prado"));
        assert!(is_valid_name(""));
    }

    #[test]
    fn names_reject_digits_and_sloppy_spacing() {
        assert!(!is_valid_name("Jo4o Silva"));
        assert!(!is_valid_name(" João Silva"));
        assert!(!is_valid_name("João Silva "));
        assert!(!is_valid_name("João  Silva"));
        assert!(!is_valid_name("João--Silva"));
        assert!(!is_valid_name("João..Silva"));
        assert!(!is_valid_name("João''Silva"));
        assert!(!is_valid_name("João_Silva"));
    }
}
