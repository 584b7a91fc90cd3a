//! Hot-path benchmarks: checksum validation and keystroke masking run on
//! every input event, so they must stay well under a millisecond.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pleme_cadastro::mask::{self, MaskType};
use pleme_cadastro::{is_valid_cnpj, is_valid_cpf};

fn checksum_benches(c: &mut Criterion) {
    c.bench_function("cpf_checksum", |b| {
        b.iter(|| is_valid_cpf(black_box("111.444.777-35")))
    });
    c.bench_function("cnpj_checksum", |b| {
        b.iter(|| is_valid_cnpj(black_box("11.222.333/0001-81")))
    });
}

fn mask_benches(c: &mut Criterion) {
    c.bench_function("cpf_mask", |b| {
        b.iter(|| mask::apply(black_box("11144477735"), MaskType::Cpf))
    });
    c.bench_function("phone_mask", |b| {
        b.iter(|| mask::apply(black_box("11987654321"), MaskType::Phone))
    });
    c.bench_function("currency_mask", |b| {
        b.iter(|| mask::apply(black_box("1234567,89"), MaskType::Currency))
    });
    c.bench_function("cpf_mask_with_caret", |b| {
        b.iter(|| mask::apply_with_caret(black_box("111.9444.777-35"), 5, MaskType::Cpf))
    });
}

criterion_group!(benches, checksum_benches, mask_benches);
criterion_main!(benches);
