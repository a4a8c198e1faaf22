//! Surface-format detection.

/// Which wire format a raw model response appears to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    SExpression,
}

/// Trim the response, strip an enclosing fenced code block if present,
/// and classify the remaining body as JSON or S-expression.
///
/// Returns the (possibly unwrapped) body alongside its detected format.
pub fn detect(raw: &str) -> (&str, Format) {
    let body = strip_code_fence(raw.trim());
    if body.starts_with('{') && body.ends_with('}') {
        (body, Format::Json)
    } else {
        (body, Format::SExpression)
    }
}

/// Strip a ` ```lang\n ... \n``` ` wrapper, if the whole trimmed input is
/// one fenced block.
fn strip_code_fence(trimmed: &str) -> &str {
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let Some(rest) = trimmed.strip_prefix("```") else { return trimmed };
    let after_lang = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return trimmed,
    };
    match after_lang.rfind("```") {
        Some(idx) => after_lang[..idx].trim(),
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bare_json() {
        let (body, fmt) = detect(r#"{"message":"","steps":[]}"#);
        assert_eq!(fmt, Format::Json);
        assert_eq!(body, r#"{"message":"","steps":[]}"#);
    }

    #[test]
    fn strips_fenced_json_block() {
        let raw = "```json\n{\"message\":\"hi\",\"steps\":[]}\n```";
        let (body, fmt) = detect(raw);
        assert_eq!(fmt, Format::Json);
        assert_eq!(body, r#"{"message":"hi","steps":[]}"#);
    }

    #[test]
    fn falls_back_to_sexpression() {
        let (body, fmt) = detect(r#"(P "hi" (PS runSqlQuery))"#);
        assert_eq!(fmt, Format::SExpression);
        assert_eq!(body, r#"(P "hi" (PS runSqlQuery))"#);
    }

    #[test]
    fn prose_is_treated_as_sexpression_and_will_fail_to_parse_there() {
        let (_, fmt) = detect("I'm sorry, I can't help with that.");
        assert_eq!(fmt, Format::SExpression);
    }
}
