//! The S-expression fallback plan format, for legacy model responses
//! that don't speak the primary JSON wire format.
//!
//! Grammar:
//! ```text
//! (P "<message>" <step>*)
//! (PS <actionId> <item>*)
//! (PA <name> <literal>+)
//! (PENDING <name> "<prompt>")
//! (ERROR "<reason>")
//! (EMBED <sublanguage> <sub-tree>)
//! ```

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while1},
    character::complete::{char, multispace0, multispace1, none_of},
    combinator::{all_consuming, cut, map, opt, recognize, value},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use convo_types::{CatalogLookup, OrderedMap, PendingParam, Plan, Step, Value};

/// An item inside a `(PS ...)` form, before being folded into a `Step`.
enum RawItem {
    Provided { name: String, values: Vec<Value> },
    Pending { name: String, message: String },
}

/// A top-level step form, before catalog lookup.
enum RawStep {
    Action { action_id: String, items: Vec<RawItem> },
    Error { reason: String },
}

/// Parse an S-expression plan body and resolve each step against the
/// catalog, using the same "unknown action ⇒ ErrorStep" rule as the
/// JSON parser. Completion of any catalog parameter mentioned by
/// neither a `PA` nor a `PENDING` item is left to the verifier,
/// matching "same semantics, different surface".
pub fn parse(body: &str, catalog: &dyn CatalogLookup) -> Result<Plan, String> {
    let (_, (message, raw_steps)) =
        all_consuming(delimited(multispace0, plan_form, multispace0))(body)
            .map_err(|e| format!("invalid plan S-expression: {e}"))?;

    let steps = raw_steps.into_iter().map(|s| build_step(s, catalog)).collect();
    Ok(Plan::new(message, steps))
}

fn build_step(raw: RawStep, catalog: &dyn CatalogLookup) -> Step {
    match raw {
        RawStep::Error { reason } => Step::Error { reason },
        RawStep::Action { action_id, items } => {
            if !catalog.exists(&action_id) {
                return Step::Error { reason: format!("unknown action: {action_id}") };
            }

            let mut provided = OrderedMap::new();
            let mut pending = Vec::new();
            for item in items {
                match item {
                    RawItem::Provided { name, mut values } => {
                        let value = if values.len() == 1 {
                            values.pop().unwrap()
                        } else {
                            Value::List(values)
                        };
                        provided.insert(name, value);
                    }
                    RawItem::Pending { name, message } => pending.push(PendingParam { name, message }),
                }
            }

            if pending.is_empty() {
                Step::Action { description: String::new(), action_id, arguments_by_name: provided }
            } else {
                Step::Pending {
                    description: String::new(),
                    action_id,
                    provided_params: provided,
                    pending_params: pending,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------
// nom grammar
// ---------------------------------------------------------------------

type R<'a, T> = IResult<&'a str, T>;

fn plan_form(input: &str) -> R<'_, (String, Vec<RawStep>)> {
    delimited(
        char('('),
        preceded(
            tuple((tag("P"), multispace1)),
            tuple((string_literal, many0(preceded(multispace0, step_form)))),
        ),
        preceded(multispace0, cut(char(')'))),
    )(input)
}

fn step_form(input: &str) -> R<'_, RawStep> {
    alt((map(error_form, RawStep::Error), action_step_form))(input)
}

fn action_step_form(input: &str) -> R<'_, RawStep> {
    let (input, (action_id, items)) = delimited(
        char('('),
        preceded(
            tuple((tag("PS"), multispace1)),
            tuple((atom, many0(preceded(multispace0, item_form)))),
        ),
        preceded(multispace0, cut(char(')'))),
    )(input)?;
    Ok((input, RawStep::Action { action_id, items }))
}

fn item_form(input: &str) -> R<'_, RawItem> {
    alt((pending_item, provided_item))(input)
}

fn provided_item(input: &str) -> R<'_, RawItem> {
    let (input, (name, values)) = delimited(
        char('('),
        preceded(
            tuple((tag("PA"), multispace1)),
            tuple((atom, nom::multi::many1(preceded(multispace1, literal)))),
        ),
        preceded(multispace0, cut(char(')'))),
    )(input)?;
    Ok((input, RawItem::Provided { name, values }))
}

fn pending_item(input: &str) -> R<'_, RawItem> {
    let (input, (name, message)) = delimited(
        char('('),
        preceded(
            tuple((tag("PENDING"), multispace1)),
            tuple((atom, preceded(multispace1, string_literal))),
        ),
        preceded(multispace0, cut(char(')'))),
    )(input)?;
    Ok((input, RawItem::Pending { name, message }))
}

fn error_form(input: &str) -> R<'_, String> {
    delimited(
        char('('),
        preceded(tuple((tag("ERROR"), multispace1)), string_literal),
        preceded(multispace0, cut(char(')'))),
    )(input)
}

/// `literal` = string | number | embedded sub-tree | bare atom.
fn literal(input: &str) -> R<'_, Value> {
    alt((
        map(string_literal, Value::String),
        embed_form,
        map(recognize_float, |s: &str| {
            if let Ok(i) = s.parse::<i64>() {
                Value::Int(i)
            } else {
                Value::Float(s.parse::<f64>().unwrap_or_default())
            }
        }),
        map(atom, |s| match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        }),
    ))(input)
}

fn embed_form(input: &str) -> R<'_, Value> {
    let start = input;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = tag("EMBED")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, sublanguage) = atom(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _sub_tree) = balanced_tree(input)?;
    let (input, _) = preceded(multispace0, cut(char(')')))(input)?;
    let consumed_len = start.len() - input.len();
    let source = start[..consumed_len].to_string();
    Ok((input, Value::Embedded { sublanguage: Some(sublanguage), source }))
}

/// Consume one balanced parenthesized sub-tree without interpreting
/// it, per the `EMBED` rule — grammar validators for sub-DSLs are out
/// of scope here.
fn balanced_tree(input: &str) -> R<'_, &str> {
    recognize(delimited(
        char('('),
        many0(alt((
            recognize(balanced_tree),
            recognize(none_of("()")),
        ))),
        char(')'),
    ))(input)
}

fn atom(input: &str) -> R<'_, String> {
    map(
        take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_' || c == '.'),
        |s: &str| s.to_string(),
    )(input)
}

fn string_literal(input: &str) -> R<'_, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                none_of("\"\\"),
                '\\',
                alt((
                    value('\\', char('\\')),
                    value('"', char('"')),
                    value('\n', char('n')),
                )),
            )),
            |s: Option<String>| s.unwrap_or_default(),
        ),
        char('"'),
    )(input)
}
