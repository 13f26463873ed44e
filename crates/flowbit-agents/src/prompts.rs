//! Fixed prompt templates for classification and extraction.

use flowbit_core::{Intent, INTENT_SCHEMAS};

/// Build the classification prompt around a document snippet.
pub fn classification_prompt(snippet: &str) -> String {
    format!(
        "You are an intelligent document classifier.\n\
         \n\
         Your task is to classify the INTENT of the given document content into one of the following categories:\n\
         - Invoice\n\
         - RFQ\n\
         - Complaint\n\
         - Regulation\n\
         \n\
         If the content matches none of the specific categories, classify it as 'Unknown'.\n\
         \n\
         Document content:\n\
         {snippet}\n\
         \n\
         Return ONLY the category name."
    )
}

/// Whether the extraction prompt lets the model reassign the intent.
///
/// The JSON entry point reassigns (the classifier never saw the content);
/// the text entry point keeps the intent it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentPolicy {
    Keep,
    Reassign,
}

/// Build the extraction prompt for an intent and document content.
pub fn extraction_prompt(intent: Intent, content: &str, policy: IntentPolicy) -> String {
    let intent_rule = match policy {
        IntentPolicy::Keep => "keep it the same as the intent given to you",
        IntentPolicy::Reassign => {
            "change it to whichever of the intents listed below suits the content best"
        }
    };

    format!(
        "You are an expert data extraction assistant.\n\
         \n\
         You will receive:\n\
         1. The **intent** of the document.\n\
         2. A list of **5 expected fields** for that intent.\n\
         3. The **input content**.\n\
         \n\
         Your task is to extract the values of those 5 expected fields **if they are present and clear** in the input. Otherwise, mark them as **missing**.\n\
         \n\
         You must return a JSON object in the following structure:\n\
         \n\
         {{\n\
           \"intent\": \"{intent_rule}\",\n\
           \"fields\": {{ \"<field1>\": \"<value1>\", ... }},\n\
           \"missing_fields\": [ \"<field3>\", ... ],\n\
           \"entities\": [ list of any named people, companies, or identifiers ],\n\
           \"comments\": \"Optional notes or extraction challenges\"\n\
         }}\n\
         \n\
         Do not invent or guess missing data. Just be precise and minimal.\n\
         \n\
         Now here are your field requirements:\n\
         \n\
         {table}\n\
         Use only this field list for matching.\n\
         Now process the following input:\n\
         \n\
         INTENT: {intent}\n\
         CONTENT:\n\
         {content}",
        table = schema_table(),
    )
}

/// The per-intent field table embedded in the extraction prompt.
fn schema_table() -> String {
    let mut table = String::new();
    for (intent, fields) in INTENT_SCHEMAS {
        table.push_str(&format!(
            "INTENT: {}\nFIELDS: [{}]\n\n",
            intent,
            fields
                .iter()
                .map(|f| format!("\"{f}\""))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    table
}
