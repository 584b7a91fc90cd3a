//! Investor registration form
//!
//! The concrete field layout of the Pleme investor onboarding form: four
//! tabs, a conditional spouse section on the first tab, mirrored
//! residence/correspondence address blocks on the third.

use crate::form::{AddressBlock, FormDefinition, TabDefinition};
use crate::mask::MaskType;
use crate::rules::{FieldConfig, Rule, Section};

/// Marital statuses offered by the form's select field.
pub const MARITAL_STATUSES: [&str; 5] = [
    "Solteiro(a)",
    "Casado(a)",
    "União Estável",
    "Divorciado(a)",
    "Viúvo(a)",
];

/// Document types offered by the form's select field.
pub const DOCUMENT_TYPES: [&str; 3] = ["RG", "CNH", "Passaporte"];

fn name_field(name: &str, label: &str) -> FieldConfig {
    FieldConfig::new(name, label).rule_with_message(
        Rule::Name,
        "Apenas letras, espaços e caracteres simples como ' - . são permitidos",
    )
}

fn personal_tab() -> TabDefinition {
    let mut fields = vec![
        name_field("nome_completo", "Nome Completo").rule(Rule::Required),
        FieldConfig::new("sexo", "Sexo").rule(Rule::Required),
        FieldConfig::new("estado_civil", "Estado Civil").rule(Rule::Required),
        FieldConfig::new("cpf", "CPF")
            .mask(MaskType::Cpf)
            .rule(Rule::Required)
            .rule_with_message(Rule::Cpf, "CPF inválido. Verifique o número informado."),
        FieldConfig::new("data_nascimento", "Data de Nascimento")
            .mask(MaskType::Date)
            .rule(Rule::Required)
            .rule(Rule::Date)
            .rule(Rule::Age),
        name_field("nacionalidade", "Nacionalidade").rule(Rule::Required),
        name_field("naturalidade", "Naturalidade"),
        name_field("nome_mae", "Nome da Mãe").rule(Rule::Required),
        name_field("nome_pai", "Nome do Pai"),
    ];

    // Spouse section: shown and required only for married / stable-union
    fields.extend([
        name_field("conjuge_nome", "Nome do Cônjuge").section(Section::Spouse),
        FieldConfig::new("conjuge_sexo", "Sexo do Cônjuge").section(Section::Spouse),
        FieldConfig::new("conjuge_cpf", "CPF do Cônjuge")
            .mask(MaskType::Cpf)
            .rule_with_message(Rule::Cpf, "CPF inválido. Verifique o número informado.")
            .section(Section::Spouse),
        name_field("conjuge_nacionalidade", "Nacionalidade do Cônjuge").section(Section::Spouse),
        name_field("conjuge_naturalidade", "Naturalidade do Cônjuge").section(Section::Spouse),
        FieldConfig::new("conjuge_data_nascimento", "Data de Nascimento do Cônjuge")
            .mask(MaskType::Date)
            .rule(Rule::Date)
            .rule(Rule::Age)
            .section(Section::Spouse),
        FieldConfig::new("conjuge_tipo_documento", "Tipo de Documento do Cônjuge")
            .section(Section::Spouse),
        FieldConfig::new("conjuge_numero_documento", "Número do Documento do Cônjuge")
            .rule(Rule::DocumentNumber { kind_field: "conjuge_tipo_documento".to_string() })
            .section(Section::Spouse),
        FieldConfig::new("conjuge_data_expedicao", "Data de Expedição do Cônjuge")
            .mask(MaskType::Date)
            .rule(Rule::Date)
            .rule(Rule::IssuanceDate)
            .section(Section::Spouse),
        name_field("conjuge_orgao_emissor", "Órgão Emissor do Cônjuge").section(Section::Spouse),
        name_field("conjuge_nome_mae", "Nome da Mãe do Cônjuge").section(Section::Spouse),
        name_field("conjuge_nome_pai", "Nome do Pai do Cônjuge").section(Section::Spouse),
    ]);

    TabDefinition::new("tab-1", "Dados Pessoais", fields)
}

fn documents_tab() -> TabDefinition {
    TabDefinition::new(
        "tab-2",
        "Documentos",
        vec![
            FieldConfig::new("tipo_documento", "Tipo de Documento").rule(Rule::Required),
            FieldConfig::new("numero_documento", "Número do Documento")
                .rule(Rule::Required)
                .rule(Rule::DocumentNumber { kind_field: "tipo_documento".to_string() }),
            FieldConfig::new("data_expedicao", "Data de Expedição")
                .mask(MaskType::Date)
                .rule(Rule::Required)
                .rule(Rule::Date)
                .rule(Rule::IssuanceDate),
            name_field("orgao_emissor", "Órgão Emissor").rule(Rule::Required),
        ],
    )
}

fn address_tab() -> TabDefinition {
    let residence = vec![
        FieldConfig::new("cep", "CEP")
            .mask(MaskType::Cep)
            .rule(Rule::Required)
            .rule(Rule::Cep)
            .section(Section::Residence),
        FieldConfig::new("logradouro", "Logradouro")
            .rule(Rule::Required)
            .section(Section::Residence),
        FieldConfig::new("numero", "Número")
            .rule(Rule::Required)
            .section(Section::Residence),
        FieldConfig::new("complemento", "Complemento").section(Section::Residence),
        FieldConfig::new("bairro", "Bairro")
            .rule(Rule::Required)
            .section(Section::Residence),
        FieldConfig::new("cidade", "Cidade")
            .rule(Rule::Required)
            .section(Section::Residence),
        FieldConfig::new("estado", "Estado")
            .rule(Rule::Required)
            .section(Section::Residence),
    ];

    let correspondence = vec![
        FieldConfig::new("corr_cep", "CEP de Correspondência")
            .mask(MaskType::Cep)
            .rule(Rule::Cep)
            .section(Section::Correspondence),
        FieldConfig::new("corr_logradouro", "Logradouro de Correspondência")
            .section(Section::Correspondence),
        FieldConfig::new("corr_numero", "Número de Correspondência")
            .section(Section::Correspondence),
        FieldConfig::new("corr_complemento", "Complemento de Correspondência")
            .section(Section::Correspondence),
        FieldConfig::new("corr_bairro", "Bairro de Correspondência")
            .section(Section::Correspondence),
        FieldConfig::new("corr_cidade", "Cidade de Correspondência")
            .section(Section::Correspondence),
        FieldConfig::new("corr_estado", "Estado de Correspondência")
            .section(Section::Correspondence),
    ];

    let mut fields = residence;
    fields.extend(correspondence);
    TabDefinition::new("tab-3", "Endereço", fields)
}

fn contact_tab() -> TabDefinition {
    TabDefinition::new(
        "tab-4",
        "Contato e Investimento",
        vec![
            FieldConfig::new("email", "Email")
                .rule(Rule::Required)
                .rule_with_message(Rule::Email, "E-mail inválido. Por favor, verifique."),
            FieldConfig::new("telefone", "Telefone")
                .mask(MaskType::Phone)
                .rule(Rule::Required)
                .rule_with_message(
                    Rule::Phone,
                    "Telefone inválido. Use (XX) XXXX-XXXX para fixo ou (XX) XXXXX-XXXX para celular.",
                ),
            FieldConfig::new("valor_investimento", "Valor do Investimento")
                .mask(MaskType::Currency),
            FieldConfig::new("perfil_risco", "Perfil de Risco"),
        ],
    )
}

/// Build the investor registration form definition.
pub fn investor_registration() -> FormDefinition {
    let residence_block = AddressBlock {
        cep: "cep".to_string(),
        street: "logradouro".to_string(),
        number: "numero".to_string(),
        complement: Some("complemento".to_string()),
        neighborhood: "bairro".to_string(),
        city: "cidade".to_string(),
        state: "estado".to_string(),
    };
    let correspondence_block = AddressBlock {
        cep: "corr_cep".to_string(),
        street: "corr_logradouro".to_string(),
        number: "corr_numero".to_string(),
        complement: Some("corr_complemento".to_string()),
        neighborhood: "corr_bairro".to_string(),
        city: "corr_cidade".to_string(),
        state: "corr_estado".to_string(),
    };

    FormDefinition::new(vec![
        personal_tab(),
        documents_tab(),
        address_tab(),
        contact_tab(),
    ])
    .with_mirrored_address(residence_block, correspondence_block)
    .with_marital_status_field("estado_civil")
    .with_spouse_optional(vec!["conjuge_nome_pai".to_string()])
}
