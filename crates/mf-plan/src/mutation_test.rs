use super::*;
use mf_core::transformer::{
    CategoricalConfig, CharacterScrambleConfig, GenerateEmailConfig, GenerateFloat64Config,
    GenerateInt64Config, InvalidEmailAction, JavascriptConfig, PreserveLengthConfig,
    TransformEmailConfig, TransformFloat64Config, TransformInt64Config, UserDefinedConfig,
};

fn varchar(len: Option<i32>) -> ColumnInfo {
    ColumnInfo {
        data_type: "varchar".to_string(),
        character_maximum_length: len,
        is_nullable: true,
        ..Default::default()
    }
}

fn compile(transformer: &Transformer, info: Option<&ColumnInfo>) -> Option<String> {
    compute_mutation_function("email", transformer, info).unwrap()
}

#[test]
fn test_null_and_default() {
    assert_eq!(compile(&Transformer::GenerateNull, None).as_deref(), Some("null"));
    assert_eq!(
        compile(&Transformer::GenerateDefault, None).as_deref(),
        Some("\"DEFAULT\"")
    );
}

#[test]
fn test_no_mutation_kinds() {
    assert_eq!(compile(&Transformer::Passthrough, None), None);
    assert_eq!(compile(&Transformer::Unspecified, None), None);
    let js = Transformer::TransformJavascript(JavascriptConfig {
        code: "return value;".to_string(),
    });
    assert_eq!(compile(&js, None), None);
}

#[test]
fn test_transform_email_with_max_length() {
    let t = Transformer::TransformEmail(TransformEmailConfig {
        preserve_domain: true,
        ..Default::default()
    });
    assert_eq!(
        compile(&t, Some(&varchar(Some(40)))).as_deref(),
        Some(
            r#"transform_email(value:this."email",preserve_domain:true,preserve_length:false,excluded_domains:[],max_length:40,email_type:"uuidv4",invalid_email_action:"reject")"#
        )
    );
}

#[test]
fn test_transform_email_without_max_length() {
    let t = Transformer::TransformEmail(TransformEmailConfig {
        excluded_domains: vec!["gmail.com".to_string(), "yahoo.com".to_string()],
        invalid_email_action: Some(InvalidEmailAction::Passthrough),
        ..Default::default()
    });
    assert_eq!(
        compile(&t, Some(&varchar(None))).as_deref(),
        Some(
            r#"transform_email(value:this."email",preserve_domain:false,preserve_length:false,excluded_domains:["gmail.com","yahoo.com"],email_type:"uuidv4",invalid_email_action:"passthrough")"#
        )
    );
}

#[test]
fn test_generate_email() {
    let t = Transformer::GenerateEmail(GenerateEmailConfig::default());
    assert_eq!(
        compile(&t, Some(&varchar(Some(40)))).as_deref(),
        Some(r#"generate_email(max_length:40,email_type:"uuidv4")"#)
    );
}

#[test]
fn test_random_string_clamped_to_column_length() {
    let t = Transformer::GenerateRandomString(RangeConfig { min: 2, max: 7 });
    let cases = [
        (None, "generate_string(min:2,max:7)"),
        (Some(-1), "generate_string(min:2,max:7)"),
        (Some(0), "generate_string(min:2,max:7)"),
        (Some(10), "generate_string(min:2,max:7)"),
        (Some(3), "generate_string(min:2,max:3)"),
        (Some(1), "generate_string(min:1,max:1)"),
    ];
    for (len, expected) in cases {
        assert_eq!(
            compile(&t, Some(&varchar(len))).as_deref(),
            Some(expected),
            "max length {len:?}"
        );
    }
    assert_eq!(
        compile(&t, None).as_deref(),
        Some("generate_string(min:2,max:7)")
    );
}

#[test]
fn test_numeric_values_rendered_verbatim() {
    let t = Transformer::GenerateFloat64(GenerateFloat64Config {
        randomize_sign: true,
        min: 1.0,
        max: 100.5,
        precision: 6,
    });
    assert_eq!(
        compile(&t, None).as_deref(),
        Some("generate_float64(randomize_sign:true,min:1,max:100.5,precision:6)")
    );
}

#[test]
fn test_reversed_numeric_bounds_pass_through() {
    let cases = [
        (
            Transformer::GenerateInt64(GenerateInt64Config {
                randomize_sign: false,
                min: 10,
                max: 1,
            }),
            "generate_int64(randomize_sign:false,min:10,max:1)",
        ),
        (
            Transformer::GenerateFloat64(GenerateFloat64Config {
                randomize_sign: false,
                min: 5.0,
                max: 2.0,
                precision: 0,
            }),
            "generate_float64(randomize_sign:false,min:5,max:2,precision:0)",
        ),
        (
            Transformer::TransformInt64(TransformInt64Config {
                randomization_range_min: 20,
                randomization_range_max: -20,
            }),
            r#"transform_int64(value:this."email",randomization_range_min:20,randomization_range_max:-20)"#,
        ),
        (
            Transformer::TransformFloat64(TransformFloat64Config {
                randomization_range_min: 2.5,
                randomization_range_max: -2.5,
            }),
            r#"transform_float64(value:this."email",randomization_range_min:2.5,randomization_range_max:-2.5)"#,
        ),
    ];
    for (t, expected) in &cases {
        assert_eq!(compile(t, None).as_deref(), Some(*expected), "{t}");
    }
}

#[test]
fn test_name_transform_passes_max_length() {
    let t = Transformer::TransformFirstName(PreserveLengthConfig {
        preserve_length: true,
    });
    assert_eq!(
        compute_mutation_function("first_name", &t, Some(&varchar(Some(25))))
            .unwrap()
            .as_deref(),
        Some(r#"transform_first_name(value:this."first_name",preserve_length:true,max_length:25)"#)
    );
}

#[test]
fn test_categorical_and_scramble() {
    let t = Transformer::GenerateCategorical(CategoricalConfig {
        categories: "value1,value2".to_string(),
    });
    assert_eq!(
        compile(&t, None).as_deref(),
        Some(r#"generate_categorical(categories:"value1,value2")"#)
    );

    let t = Transformer::TransformCharacterScramble(CharacterScrambleConfig {
        user_provided_regex: Some("[a-z]+".to_string()),
    });
    assert_eq!(
        compile(&t, None).as_deref(),
        Some(r#"transform_character_scramble(value:this."email",user_provided_regex:"[a-z]+")"#)
    );
}

#[test]
fn test_column_name_is_escaped() {
    let t = Transformer::TransformString(PreserveLengthConfig::default());
    assert_eq!(
        compute_mutation_function("we\"ird", &t, None).unwrap().as_deref(),
        Some(r#"transform_string(value:this."we\"ird",preserve_length:false)"#)
    );
}

#[test]
fn test_invalid_configs_are_rejected() {
    let bad = [
        Transformer::GenerateRandomString(RangeConfig { min: 8, max: 2 }),
        Transformer::GenerateE164PhoneNumber(RangeConfig { min: 16, max: 9 }),
        Transformer::GenerateCategorical(CategoricalConfig {
            categories: " , ".to_string(),
        }),
        Transformer::GenerateFloat64(GenerateFloat64Config {
            randomize_sign: false,
            min: f64::NAN,
            max: 1.0,
            precision: 2,
        }),
    ];
    for t in &bad {
        let err = compute_mutation_function("c", t, None).unwrap_err();
        assert!(
            matches!(err, PlanError::InvalidTransformerConfig { ref column, .. } if column == "c"),
            "{t}: {err}"
        );
    }
}

#[test]
fn test_unresolved_user_defined_is_rejected() {
    let t = Transformer::UserDefined(UserDefinedConfig {
        id: "123".to_string(),
    });
    assert!(compute_mutation_function("c", &t, None).is_err());
}
