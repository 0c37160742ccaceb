//! Code-block stages for custom code transformers

use crate::expr::string_literal;

/// Wrap a column's custom code into a self-contained code block.
///
/// `transform` code receives `(value, input)`, `generate` code only `input`.
/// Blank code yields no block.
pub fn build_javascript_block(column: &str, code: &str, transform: bool) -> Option<String> {
    if code.trim().is_empty() {
        return None;
    }
    let function = function_name(column);
    let key = string_literal(column);
    let (params, call_args) = if transform {
        ("value, input", format!("output[{key}], output"))
    } else {
        ("input", "output".to_string())
    };

    Some(format!(
        "(() => {{\n\
         function {function}({params}) {{\n\
         {code}\n\
         }}\n\
         const output = benthos.v0_msg_as_structured();\n\
         output[{key}] = {function}({call_args});\n\
         benthos.v0_msg_set_structured(output);\n\
         }})();"
    ))
}

/// A JavaScript identifier derived from a column name
fn function_name(column: &str) -> String {
    let sanitized: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("fn_{sanitized}")
}
