//! Compile a column's transformer into a mutation expression

use crate::error::{PlanError, PlanResult};
use crate::expr::{clamp_range, string_list, string_literal, this_column, FunctionCall};
use mf_core::transformer::{EmailType, RangeConfig};
use mf_core::{ColumnInfo, Transformer};

/// Expression assigned for `generate_null`
pub const NULL_EXPR: &str = "null";

/// Expression assigned for `generate_default`
pub const DEFAULT_EXPR: &str = "\"DEFAULT\"";

/// Compute the expression computing a column's new value.
///
/// Returns `None` for kinds that need no mutation: passthrough, unspecified
/// and the custom code kinds, which compile to their own processor.
/// User-defined transformers must be resolved first.
pub fn compute_mutation_function(
    column: &str,
    transformer: &Transformer,
    info: Option<&ColumnInfo>,
) -> PlanResult<Option<String>> {
    let max_length = info.and_then(ColumnInfo::positive_max_length);
    let value = this_column(column);

    let call = match transformer {
        Transformer::Unspecified
        | Transformer::Passthrough
        | Transformer::TransformJavascript(_)
        | Transformer::GenerateJavascript(_) => return Ok(None),

        Transformer::UserDefined(cfg) => {
            return Err(invalid(
                column,
                format!("user-defined transformer '{}' was not resolved", cfg.id),
            ))
        }

        Transformer::GenerateNull => return Ok(Some(NULL_EXPR.to_string())),
        Transformer::GenerateDefault => return Ok(Some(DEFAULT_EXPR.to_string())),

        Transformer::GenerateEmail(cfg) => FunctionCall::new("generate_email")
            .opt_arg("max_length", max_length)
            .arg("email_type", email_type(cfg.email_type)),
        Transformer::GenerateBool => FunctionCall::new("generate_bool"),
        Transformer::GenerateCardNumber { valid_luhn } => {
            FunctionCall::new("generate_card_number").arg("valid_luhn", valid_luhn)
        }
        Transformer::GenerateCity => {
            FunctionCall::new("generate_city").opt_arg("max_length", max_length)
        }
        Transformer::GenerateE164PhoneNumber(range) => {
            let range = checked_range(column, range)?;
            FunctionCall::new("generate_e164_phone_number")
                .arg("min", range.min)
                .arg("max", range.max)
        }
        Transformer::GenerateFirstName => {
            FunctionCall::new("generate_first_name").opt_arg("max_length", max_length)
        }
        Transformer::GenerateFloat64(cfg) => {
            FunctionCall::new("generate_float64")
                .arg("randomize_sign", cfg.randomize_sign)
                .arg("min", float_literal(column, cfg.min)?)
                .arg("max", float_literal(column, cfg.max)?)
                .arg("precision", cfg.precision)
        }
        Transformer::GenerateFullAddress => {
            FunctionCall::new("generate_full_address").opt_arg("max_length", max_length)
        }
        Transformer::GenerateFullName => {
            FunctionCall::new("generate_full_name").opt_arg("max_length", max_length)
        }
        Transformer::GenerateGender { abbreviate } => FunctionCall::new("generate_gender")
            .arg("abbreviate", abbreviate)
            .opt_arg("max_length", max_length),
        Transformer::GenerateInt64PhoneNumber => FunctionCall::new("generate_int64_phone_number"),
        Transformer::GenerateInt64(cfg) => {
            FunctionCall::new("generate_int64")
                .arg("randomize_sign", cfg.randomize_sign)
                .arg("min", cfg.min)
                .arg("max", cfg.max)
        }
        Transformer::GenerateLastName => {
            FunctionCall::new("generate_last_name").opt_arg("max_length", max_length)
        }
        Transformer::GenerateSha256Hash => FunctionCall::new("generate_sha256hash"),
        Transformer::GenerateSsn => FunctionCall::new("generate_ssn"),
        Transformer::GenerateState(cfg) => {
            FunctionCall::new("generate_state").arg("generate_full_name", cfg.generate_full_name)
        }
        Transformer::GenerateStreetAddress => {
            FunctionCall::new("generate_street_address").opt_arg("max_length", max_length)
        }
        Transformer::GenerateStringPhoneNumber(range) => {
            let range = checked_range(column, range)?;
            FunctionCall::new("generate_string_phone_number")
                .arg("min", range.min)
                .arg("max", range.max)
        }
        Transformer::GenerateRandomString(range) => {
            let range = checked_range(column, range)?;
            let (min, max) = clamp_range(range.min, range.max, max_length);
            FunctionCall::new("generate_string")
                .arg("min", min)
                .arg("max", max)
        }
        Transformer::GenerateUnixTimestamp => FunctionCall::new("generate_unix_timestamp"),
        Transformer::GenerateUsername => {
            FunctionCall::new("generate_username").opt_arg("max_length", max_length)
        }
        Transformer::GenerateUtcTimestamp => FunctionCall::new("generate_utc_timestamp"),
        Transformer::GenerateUuid { include_hyphens } => {
            FunctionCall::new("generate_uuid").arg("include_hyphens", include_hyphens)
        }
        Transformer::GenerateZipcode => FunctionCall::new("generate_zipcode"),
        Transformer::GenerateCategorical(cfg) => {
            if cfg.categories.split(',').all(|c| c.trim().is_empty()) {
                return Err(invalid(column, "categories cannot be empty"));
            }
            FunctionCall::new("generate_categorical")
                .arg("categories", string_literal(&cfg.categories))
        }
        Transformer::GenerateCountry(cfg) => FunctionCall::new("generate_country")
            .arg("generate_full_name", cfg.generate_full_name),

        Transformer::TransformEmail(cfg) => FunctionCall::new("transform_email")
            .arg("value", &value)
            .arg("preserve_domain", cfg.preserve_domain)
            .arg("preserve_length", cfg.preserve_length)
            .arg("excluded_domains", string_list(&cfg.excluded_domains))
            .opt_arg("max_length", max_length)
            .arg("email_type", email_type(cfg.email_type))
            .arg(
                "invalid_email_action",
                string_literal(&cfg.invalid_email_action.unwrap_or_default().to_string()),
            ),
        Transformer::TransformE164PhoneNumber(cfg) => {
            FunctionCall::new("transform_e164_phone_number")
                .arg("value", &value)
                .arg("preserve_length", cfg.preserve_length)
                .opt_arg("max_length", max_length)
        }
        Transformer::TransformFirstName(cfg) => FunctionCall::new("transform_first_name")
            .arg("value", &value)
            .arg("preserve_length", cfg.preserve_length)
            .opt_arg("max_length", max_length),
        Transformer::TransformFloat64(cfg) => {
            FunctionCall::new("transform_float64")
                .arg("value", &value)
                .arg(
                    "randomization_range_min",
                    float_literal(column, cfg.randomization_range_min)?,
                )
                .arg(
                    "randomization_range_max",
                    float_literal(column, cfg.randomization_range_max)?,
                )
        }
        Transformer::TransformFullName(cfg) => FunctionCall::new("transform_full_name")
            .arg("value", &value)
            .arg("preserve_length", cfg.preserve_length)
            .opt_arg("max_length", max_length),
        Transformer::TransformInt64PhoneNumber(cfg) => {
            FunctionCall::new("transform_int64_phone_number")
                .arg("value", &value)
                .arg("preserve_length", cfg.preserve_length)
        }
        Transformer::TransformInt64(cfg) => {
            FunctionCall::new("transform_int64")
                .arg("value", &value)
                .arg("randomization_range_min", cfg.randomization_range_min)
                .arg("randomization_range_max", cfg.randomization_range_max)
        }
        Transformer::TransformLastName(cfg) => FunctionCall::new("transform_last_name")
            .arg("value", &value)
            .arg("preserve_length", cfg.preserve_length)
            .opt_arg("max_length", max_length),
        Transformer::TransformPhoneNumber(cfg) => FunctionCall::new("transform_phone_number")
            .arg("value", &value)
            .arg("preserve_length", cfg.preserve_length)
            .opt_arg("max_length", max_length),
        Transformer::TransformString(cfg) => FunctionCall::new("transform_string")
            .arg("value", &value)
            .arg("preserve_length", cfg.preserve_length)
            .opt_arg("max_length", max_length),
        Transformer::TransformCharacterScramble(cfg) => {
            FunctionCall::new("transform_character_scramble")
                .arg("value", &value)
                .opt_arg(
                    "user_provided_regex",
                    cfg.user_provided_regex.as_deref().map(string_literal),
                )
        }
    };

    Ok(Some(call.to_string()))
}

fn invalid(column: &str, message: impl Into<String>) -> PlanError {
    PlanError::InvalidTransformerConfig {
        column: column.to_string(),
        message: message.into(),
    }
}

fn checked_range<'a>(column: &str, range: &'a RangeConfig) -> PlanResult<&'a RangeConfig> {
    if range.min > range.max {
        return Err(invalid(
            column,
            format!("min {} > max {}", range.min, range.max),
        ));
    }
    Ok(range)
}

fn email_type(configured: Option<EmailType>) -> String {
    string_literal(&configured.unwrap_or_default().to_string())
}

/// Shortest round-trip rendering; non-finite values are rejected.
fn float_literal(column: &str, value: f64) -> PlanResult<String> {
    if !value.is_finite() {
        return Err(invalid(column, format!("{value} is not a finite number")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
#[path = "mutation_test.rs"]
mod tests;
