//! Checksum validation properties for CPF and CNPJ.

use pleme_cadastro::{is_valid_cnpj, is_valid_cpf, DocumentKind};

const VALID_CPF: &str = "11144477735";
const VALID_CNPJ: &str = "11222333000181";

#[test]
fn known_valid_documents_pass() {
    assert!(is_valid_cpf("111.444.777-35"));
    assert!(is_valid_cpf(VALID_CPF));
    assert!(is_valid_cnpj("11.222.333/0001-81"));
    assert!(is_valid_cnpj(VALID_CNPJ));
}

#[test]
fn all_identical_digit_documents_fail() {
    assert!(!is_valid_cpf("000.000.000-00"));
    assert!(!is_valid_cnpj("00.000.000/0000-00"));
    for d in 0..=9u8 {
        assert!(!is_valid_cpf(&d.to_string().repeat(11)));
        assert!(!is_valid_cnpj(&d.to_string().repeat(14)));
    }
}

#[test]
fn formatting_never_changes_the_verdict() {
    assert_eq!(is_valid_cpf("111.444.777-35"), is_valid_cpf("11144477735"));
    assert_eq!(is_valid_cpf("111 444 777 35"), is_valid_cpf("11144477735"));
    assert_eq!(
        is_valid_cnpj("11.222.333/0001-81"),
        is_valid_cnpj("11222333000181")
    );
}

#[test]
fn every_single_digit_mutation_invalidates_a_valid_cpf() {
    for pos in 0..VALID_CPF.len() {
        for replacement in b'0'..=b'9' {
            if VALID_CPF.as_bytes()[pos] == replacement {
                continue;
            }
            let mut mutated = VALID_CPF.as_bytes().to_vec();
            mutated[pos] = replacement;
            let mutated = String::from_utf8(mutated).expect("ascii digits");
            assert!(
                !is_valid_cpf(&mutated),
                "mutation {mutated} at position {pos} accepted"
            );
        }
    }
}

#[test]
fn every_single_digit_mutation_invalidates_a_valid_cnpj() {
    for pos in 0..VALID_CNPJ.len() {
        for replacement in b'0'..=b'9' {
            if VALID_CNPJ.as_bytes()[pos] == replacement {
                continue;
            }
            let mut mutated = VALID_CNPJ.as_bytes().to_vec();
            mutated[pos] = replacement;
            let mutated = String::from_utf8(mutated).expect("ascii digits");
            assert!(
                !is_valid_cnpj(&mutated),
                "mutation {mutated} at position {pos} accepted"
            );
        }
    }
}

#[test]
fn malformed_input_returns_false_instead_of_panicking() {
    for input in ["", "abc", "１１１４４４７７７３５", "111.444.777-3", "🙂", "\u{0}"] {
        assert!(!is_valid_cpf(input));
        assert!(!is_valid_cnpj(input));
    }
}

#[test]
fn document_number_rules_by_kind() {
    assert!(pleme_cadastro::document::is_valid_document_number(
        "23.456.789-0",
        DocumentKind::Rg
    ));
    assert!(pleme_cadastro::document::is_valid_document_number(
        "98765432100",
        DocumentKind::Cnh
    ));
    assert!(pleme_cadastro::document::is_valid_document_number(
        "BR-123456",
        DocumentKind::Passaporte
    ));
    assert!(!pleme_cadastro::document::is_valid_document_number(
        "BR12345",
        DocumentKind::Passaporte
    ));
}
