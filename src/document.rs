//! Brazilian document validation
//!
//! Checksum validation for CPF (individual taxpayer registry) and CNPJ
//! (business registry), plus number checks for the identity documents the
//! registration form accepts (RG, CNH, passport).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PASSPORT_PATTERN: Regex = Regex::new(r"^[A-Z]{2}[0-9]{6}$").expect("valid regex");
}

/// Collect the decimal digits of a string, dropping everything else.
fn digits_of(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// CPF validation (Brazilian individual tax ID).
///
/// Strips formatting, then checks the two mod-11 verification digits.
/// Malformed input yields `false`, never an error.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits = digits_of(cpf);

    if digits.len() != 11 {
        return false;
    }

    // Known invalid patterns: all digits identical
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    // First verification digit
    let sum1: u32 = (0..9).map(|i| digits[i] * (10 - i as u32)).sum();
    let check1 = match sum1 % 11 {
        0 | 1 => 0,
        n => 11 - n,
    };

    if digits[9] != check1 {
        return false;
    }

    // Second verification digit
    let sum2: u32 = (0..10).map(|i| digits[i] * (11 - i as u32)).sum();
    let check2 = match sum2 % 11 {
        0 | 1 => 0,
        n => 11 - n,
    };

    digits[10] == check2
}

/// CNPJ validation (Brazilian business tax ID).
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let digits = digits_of(cnpj);

    if digits.len() != 14 {
        return false;
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    // First verification digit
    let weights1 = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let sum1: u32 = (0..12).map(|i| digits[i] * weights1[i]).sum();
    let check1 = match sum1 % 11 {
        0 | 1 => 0,
        n => 11 - n,
    };

    if digits[12] != check1 {
        return false;
    }

    // Second verification digit
    let weights2 = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let sum2: u32 = (0..13).map(|i| digits[i] * weights2[i]).sum();
    let check2 = match sum2 % 11 {
        0 | 1 => 0,
        n => 11 - n,
    };

    digits[13] == check2
}

/// Identity document types accepted by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Rg,
    Cnh,
    Passaporte,
}

impl DocumentKind {
    /// Parse the document-type label used by the form's select field.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "RG" => Some(Self::Rg),
            "CNH" => Some(Self::Cnh),
            "Passaporte" => Some(Self::Passaporte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rg => "RG",
            Self::Cnh => "CNH",
            Self::Passaporte => "Passaporte",
        }
    }
}

/// Validate a document number for the given document type.
///
/// RG accepts 8 to 10 digits, CNH exactly 11, passports the `XX000000`
/// shape (separators and lowercase are tolerated). An empty value is
/// valid — requiredness is a separate rule.
pub fn is_valid_document_number(value: &str, kind: DocumentKind) -> bool {
    if value.trim().is_empty() {
        return true;
    }

    match kind {
        DocumentKind::Rg => {
            let len = digits_of(value).len();
            (8..=10).contains(&len)
        }
        DocumentKind::Cnh => digits_of(value).len() == 11,
        DocumentKind::Passaporte => {
            let cleaned: String = value
                .chars()
                .filter(|c| *c != '.' && *c != '-' && !c.is_whitespace())
                .collect::<String>()
                .to_uppercase();
            PASSPORT_PATTERN.is_match(&cleaned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_accepts_known_valid_numbers() {
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("529.982.247-25"));
    }

    #[test]
    fn cpf_rejects_repeated_digits() {
        assert!(!is_valid_cpf("000.000.000-00"));
        for d in 0..=9 {
            let repeated = d.to_string().repeat(11);
            assert!(!is_valid_cpf(&repeated), "repeated {d} accepted");
        }
    }

    #[test]
    fn cpf_rejects_wrong_length_and_garbage() {
        assert!(!is_valid_cpf(""));
        assert!(!is_valid_cpf("123"));
        assert!(!is_valid_cpf("111.444.777-3"));
        assert!(!is_valid_cpf("invalid"));
        assert!(!is_valid_cpf("123.456.789-09111"));
    }

    #[test]
    fn cpf_rejects_single_digit_mutations() {
        let valid = "11144477735";
        for pos in 0..valid.len() {
            let original = valid.as_bytes()[pos] - b'0';
            let mutated_digit = (original + 1) % 10;
            let mut mutated = valid.to_string();
            mutated.replace_range(pos..pos + 1, &mutated_digit.to_string());
            assert!(!is_valid_cpf(&mutated), "mutation at {pos} accepted");
        }
    }

    #[test]
    fn cnpj_accepts_known_valid_numbers() {
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(is_valid_cnpj("11222333000181"));
    }

    #[test]
    fn cnpj_rejects_repeated_digits_and_bad_checksums() {
        assert!(!is_valid_cnpj("00.000.000/0000-00"));
        assert!(!is_valid_cnpj("11.222.333/0001-82"));
        assert!(!is_valid_cnpj("invalid"));
    }

    #[test]
    fn cnpj_rejects_single_digit_mutations() {
        let valid = "11222333000181";
        for pos in 0..valid.len() {
            let original = valid.as_bytes()[pos] - b'0';
            let mutated_digit = (original + 3) % 10;
            let mut mutated = valid.to_string();
            mutated.replace_range(pos..pos + 1, &mutated_digit.to_string());
            assert!(!is_valid_cnpj(&mutated), "mutation at {pos} accepted");
        }
    }

    #[test]
    fn document_number_by_kind() {
        assert!(is_valid_document_number("12.345.678-9", DocumentKind::Rg));
        assert!(is_valid_document_number("12345678", DocumentKind::Rg));
        assert!(!is_valid_document_number("1234567", DocumentKind::Rg));
        assert!(!is_valid_document_number("12345678901", DocumentKind::Rg));

        assert!(is_valid_document_number("12345678901", DocumentKind::Cnh));
        assert!(!is_valid_document_number("1234567890", DocumentKind::Cnh));

        assert!(is_valid_document_number("AB123456", DocumentKind::Passaporte));
        assert!(is_valid_document_number("ab.123456", DocumentKind::Passaporte));
        assert!(is_valid_document_number("AB-123456", DocumentKind::Passaporte));
        assert!(!is_valid_document_number("A1234567", DocumentKind::Passaporte));

        // Empty is valid for every kind: requiredness is orthogonal
        assert!(is_valid_document_number("", DocumentKind::Rg));
        assert!(is_valid_document_number("  ", DocumentKind::Passaporte));
    }

    #[test]
    fn document_kind_labels_round_trip() {
        for kind in [DocumentKind::Rg, DocumentKind::Cnh, DocumentKind::Passaporte] {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::parse("Título de Eleitor"), None);
    }
}
