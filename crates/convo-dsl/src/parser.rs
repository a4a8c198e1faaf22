//! The public entry point of the Plan Parser: detect the wire format,
//! parse, verify, and apply the "never throw to the turn boundary"
//! failure policy.

use convo_types::{CatalogLookup, Plan, PlanParseError};

use crate::format::{self, Format};
use crate::{json_parser, sexpr, verifier};

/// Parse and verify a raw model response against the catalog.
///
/// Any parse failure — malformed JSON, malformed S-expression, or an
/// unrecognized surface — is captured as a single `ErrorStep` Plan
/// rather than propagated as an `Err`, so a turn never aborts on a bad
/// model response.
pub fn parse_and_verify(raw_response: &str, catalog: &dyn CatalogLookup) -> Plan {
    let (body, format) = format::detect(raw_response);

    let parsed = match format {
        Format::Json => json_parser::parse(body, catalog),
        Format::SExpression => sexpr::parse(body, catalog),
    };

    match parsed {
        Ok(plan) => verifier::verify(plan, catalog),
        Err(diagnostic) => {
            let err = PlanParseError::new(diagnostic, raw_response);
            Plan::single_error(format!("{err} (excerpt: {})", err.excerpt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::{ParamDescriptor, PlanStatus, TypeTag};

    struct FakeCatalog;
    impl CatalogLookup for FakeCatalog {
        fn exists(&self, action_id: &str) -> bool {
            action_id == "runSqlQuery"
        }
        fn params(&self, action_id: &str) -> Option<Vec<ParamDescriptor>> {
            if action_id == "runSqlQuery" {
                Some(vec![ParamDescriptor::new("query", TypeTag::String)])
            } else {
                None
            }
        }
    }

    #[test]
    fn dispatches_to_json_parser() {
        let body = r#"{"message":"","steps":[{"actionId":"runSqlQuery","parameters":{"query":"SELECT 1"}}]}"#;
        let plan = parse_and_verify(body, &FakeCatalog);
        assert_eq!(plan.status(), PlanStatus::Ready);
    }

    #[test]
    fn dispatches_to_sexpr_parser() {
        let body = r#"(P "" (PS runSqlQuery (PA query "SELECT 1")))"#;
        let plan = parse_and_verify(body, &FakeCatalog);
        assert_eq!(plan.status(), PlanStatus::Ready);
    }

    #[test]
    fn malformed_json_becomes_single_error_step_not_a_thrown_error() {
        let plan = parse_and_verify("{not json", &FakeCatalog);
        assert_eq!(plan.status(), PlanStatus::Error);
        assert_eq!(plan.steps().len(), 1);
        assert!(plan.first_error_reason().unwrap().starts_with("Failed to parse plan:"));
    }

    #[test]
    fn unparsable_prose_becomes_single_error_step() {
        let plan = parse_and_verify("I'm sorry, I can't help with that.", &FakeCatalog);
        assert_eq!(plan.status(), PlanStatus::Error);
    }

    #[test]
    fn long_malformed_response_is_excerpted() {
        let raw = "x".repeat(2000);
        let plan = parse_and_verify(&raw, &FakeCatalog);
        let reason = plan.first_error_reason().unwrap();
        assert!(reason.len() < raw.len());
    }
}
