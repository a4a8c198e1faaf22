//! A small in-memory action catalog for smoke-testing a conversation
//! session without a real backing service.

use convo_engine::Catalog;
use convo_types::{ActionDescriptor, ParamDescriptor, TypeTag};

pub fn build() -> Catalog {
    let mut catalog = Catalog::new();

    catalog
        .register(
            ActionDescriptor::builder("displayControlChart")
                .description("Render a control chart for a measurement concept over a bundle")
                .param(ParamDescriptor::new("measurementConcept", TypeTag::String))
                .param(ParamDescriptor::new("bundleId", TypeTag::String))
                .handler(|args, _ctx| {
                    let concept = arg_str(args, 0);
                    let bundle = arg_str(args, 1);
                    Ok(serde_json::json!({
                        "chart": format!("{concept} over {bundle}"),
                    }))
                }),
        )
        .expect("demo catalog ids are unique");

    catalog
        .register(
            ActionDescriptor::builder("exportControlChartToExcel")
                .description("Export a control chart to an Excel workbook")
                .param(ParamDescriptor::new("measurementConcept", TypeTag::String))
                .param(ParamDescriptor::new("bundleId", TypeTag::String))
                .context_key("lastExport")
                .handler(|args, _ctx| {
                    let concept = arg_str(args, 0);
                    let bundle = arg_str(args, 1);
                    Ok(serde_json::json!({
                        "file": format!("{concept}-{bundle}.xlsx"),
                    }))
                }),
        )
        .expect("demo catalog ids are unique");

    catalog
        .register(
            ActionDescriptor::builder("lookupBundle")
                .description("Fetch a one-line summary of a bundle, for working-context augmentation")
                .param(ParamDescriptor::new("bundleId", TypeTag::String))
                .context_key("bundleSummary")
                .handler(|args, _ctx| {
                    let bundle = arg_str(args, 0);
                    Ok(serde_json::json!(format!("bundle {bundle}: 42 active measurements")))
                }),
        )
        .expect("demo catalog ids are unique");

    catalog
}

fn arg_str(args: &[convo_types::TypedValue], index: usize) -> String {
    match args.get(index) {
        Some(convo_types::TypedValue::String(s)) => s.clone(),
        Some(other) => format!("{other:?}"),
        None => String::new(),
    }
}
