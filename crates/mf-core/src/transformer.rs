//! Column transformer definitions
//!
//! A [`Transformer`] is the configured intent for one column: copy it,
//! null it, replace it with generated data, transform it in a
//! format-preserving way, run custom code over it, or defer to a
//! user-defined transformer stored elsewhere. Each kind carries only the
//! parameters it understands.
//!
//! In YAML a transformer is written as `{ source: <kind>, config: {...} }`;
//! kinds without parameters omit `config`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of generated email addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    /// `<uuid>@<domain>`
    #[default]
    Uuidv4,
    /// `<first>.<last>@<domain>`
    Fullname,
    /// Either of the above
    Any,
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailType::Uuidv4 => write!(f, "uuidv4"),
            EmailType::Fullname => write!(f, "fullname"),
            EmailType::Any => write!(f, "any"),
        }
    }
}

/// What an email transform does with input that is not a valid address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidEmailAction {
    /// Fail the row
    #[default]
    Reject,
    /// Write NULL
    Null,
    /// Keep the original value
    Passthrough,
    /// Generate a fresh address
    Generate,
}

impl fmt::Display for InvalidEmailAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidEmailAction::Reject => write!(f, "reject"),
            InvalidEmailAction::Null => write!(f, "null"),
            InvalidEmailAction::Passthrough => write!(f, "passthrough"),
            InvalidEmailAction::Generate => write!(f, "generate"),
        }
    }
}

/// Parameters for `generate_email`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateEmailConfig {
    pub email_type: Option<EmailType>,
}

/// Parameters for `transform_email`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformEmailConfig {
    pub preserve_domain: bool,
    pub preserve_length: bool,
    pub excluded_domains: Vec<String>,
    pub email_type: Option<EmailType>,
    pub invalid_email_action: Option<InvalidEmailAction>,
}

/// Inclusive `[min, max]` bounds for length- or digit-bounded generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeConfig {
    pub min: i64,
    pub max: i64,
}

/// Parameters for `generate_float64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateFloat64Config {
    #[serde(default)]
    pub randomize_sign: bool,
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_float_precision")]
    pub precision: i64,
}

fn default_float_precision() -> i64 {
    6
}

/// Parameters for `generate_int64`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateInt64Config {
    #[serde(default)]
    pub randomize_sign: bool,
    pub min: i64,
    pub max: i64,
}

/// Parameters for `transform_float64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformFloat64Config {
    pub randomization_range_min: f64,
    pub randomization_range_max: f64,
}

/// Parameters for `transform_int64`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformInt64Config {
    pub randomization_range_min: i64,
    pub randomization_range_max: i64,
}

/// A single boolean switch shared by several kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreserveLengthConfig {
    pub preserve_length: bool,
}

/// `generate_full_name` switch for state and country generators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FullNameConfig {
    pub generate_full_name: bool,
}

/// Parameters for `generate_categorical`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoricalConfig {
    /// Comma-separated category values
    pub categories: String,
}

/// Parameters for `transform_character_scramble`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CharacterScrambleConfig {
    pub user_provided_regex: Option<String>,
}

/// Parameters for custom code transformers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JavascriptConfig {
    pub code: String,
}

/// Reference to a transformer definition stored outside the job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDefinedConfig {
    pub id: String,
}

/// Every transformer kind a column mapping can name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "config", rename_all = "snake_case")]
pub enum Transformer {
    /// No transformer chosen; the column is copied verbatim
    #[default]
    Unspecified,
    /// Copy the column verbatim
    Passthrough,
    /// Let the destination apply its column default
    GenerateDefault,
    /// Write NULL
    GenerateNull,

    GenerateEmail(GenerateEmailConfig),
    GenerateBool,
    GenerateCardNumber {
        #[serde(default)]
        valid_luhn: bool,
    },
    GenerateCity,
    GenerateE164PhoneNumber(RangeConfig),
    GenerateFirstName,
    GenerateFloat64(GenerateFloat64Config),
    GenerateFullAddress,
    GenerateFullName,
    GenerateGender {
        #[serde(default)]
        abbreviate: bool,
    },
    GenerateInt64PhoneNumber,
    GenerateInt64(GenerateInt64Config),
    GenerateLastName,
    GenerateSha256Hash,
    GenerateSsn,
    GenerateState(FullNameConfig),
    GenerateStreetAddress,
    GenerateStringPhoneNumber(RangeConfig),
    /// Random alphanumeric string with a length in `[min, max]`
    GenerateRandomString(RangeConfig),
    GenerateUnixTimestamp,
    GenerateUsername,
    GenerateUtcTimestamp,
    GenerateUuid {
        #[serde(default = "crate::serde_helpers::default_true")]
        include_hyphens: bool,
    },
    GenerateZipcode,
    GenerateCategorical(CategoricalConfig),
    GenerateCountry(FullNameConfig),

    TransformEmail(TransformEmailConfig),
    TransformE164PhoneNumber(PreserveLengthConfig),
    TransformFirstName(PreserveLengthConfig),
    TransformFloat64(TransformFloat64Config),
    TransformFullName(PreserveLengthConfig),
    TransformInt64PhoneNumber(PreserveLengthConfig),
    TransformInt64(TransformInt64Config),
    TransformLastName(PreserveLengthConfig),
    TransformPhoneNumber(PreserveLengthConfig),
    TransformString(PreserveLengthConfig),
    TransformCharacterScramble(CharacterScrambleConfig),

    /// Custom code receiving the column value and the whole row
    TransformJavascript(JavascriptConfig),
    /// Custom code producing a value from nothing but the row
    GenerateJavascript(JavascriptConfig),

    /// Look the definition up by id at compile time
    UserDefined(UserDefinedConfig),
}

impl Transformer {
    /// Whether the column needs any processing at all
    pub fn should_process(&self) -> bool {
        !matches!(self, Transformer::Unspecified | Transformer::Passthrough)
    }

    /// Custom code kinds compile to a separate code-block stage
    pub fn javascript_code(&self) -> Option<&str> {
        match self {
            Transformer::TransformJavascript(cfg) | Transformer::GenerateJavascript(cfg) => {
                Some(cfg.code.as_str())
            }
            _ => None,
        }
    }

    /// Snake-case kind name, as written in job files
    pub fn source_name(&self) -> &'static str {
        match self {
            Transformer::Unspecified => "unspecified",
            Transformer::Passthrough => "passthrough",
            Transformer::GenerateDefault => "generate_default",
            Transformer::GenerateNull => "generate_null",
            Transformer::GenerateEmail(_) => "generate_email",
            Transformer::GenerateBool => "generate_bool",
            Transformer::GenerateCardNumber { .. } => "generate_card_number",
            Transformer::GenerateCity => "generate_city",
            Transformer::GenerateE164PhoneNumber(_) => "generate_e164_phone_number",
            Transformer::GenerateFirstName => "generate_first_name",
            Transformer::GenerateFloat64(_) => "generate_float64",
            Transformer::GenerateFullAddress => "generate_full_address",
            Transformer::GenerateFullName => "generate_full_name",
            Transformer::GenerateGender { .. } => "generate_gender",
            Transformer::GenerateInt64PhoneNumber => "generate_int64_phone_number",
            Transformer::GenerateInt64(_) => "generate_int64",
            Transformer::GenerateLastName => "generate_last_name",
            Transformer::GenerateSha256Hash => "generate_sha256_hash",
            Transformer::GenerateSsn => "generate_ssn",
            Transformer::GenerateState(_) => "generate_state",
            Transformer::GenerateStreetAddress => "generate_street_address",
            Transformer::GenerateStringPhoneNumber(_) => "generate_string_phone_number",
            Transformer::GenerateRandomString(_) => "generate_random_string",
            Transformer::GenerateUnixTimestamp => "generate_unix_timestamp",
            Transformer::GenerateUsername => "generate_username",
            Transformer::GenerateUtcTimestamp => "generate_utc_timestamp",
            Transformer::GenerateUuid { .. } => "generate_uuid",
            Transformer::GenerateZipcode => "generate_zipcode",
            Transformer::GenerateCategorical(_) => "generate_categorical",
            Transformer::GenerateCountry(_) => "generate_country",
            Transformer::TransformEmail(_) => "transform_email",
            Transformer::TransformE164PhoneNumber(_) => "transform_e164_phone_number",
            Transformer::TransformFirstName(_) => "transform_first_name",
            Transformer::TransformFloat64(_) => "transform_float64",
            Transformer::TransformFullName(_) => "transform_full_name",
            Transformer::TransformInt64PhoneNumber(_) => "transform_int64_phone_number",
            Transformer::TransformInt64(_) => "transform_int64",
            Transformer::TransformLastName(_) => "transform_last_name",
            Transformer::TransformPhoneNumber(_) => "transform_phone_number",
            Transformer::TransformString(_) => "transform_string",
            Transformer::TransformCharacterScramble(_) => "transform_character_scramble",
            Transformer::TransformJavascript(_) => "transform_javascript",
            Transformer::GenerateJavascript(_) => "generate_javascript",
            Transformer::UserDefined(_) => "user_defined",
        }
    }
}

impl fmt::Display for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_name())
    }
}

#[cfg(test)]
#[path = "transformer_test.rs"]
mod tests;
