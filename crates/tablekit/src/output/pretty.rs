//! Pretty output formatting.

use tablekit_core::{ConsumedCapacity, Document, QueryResponse, WriteResponse};

use crate::transaction::TransactionReceipt;

fn format_document(document: &Document) -> String {
    serde_json::to_string_pretty(document).unwrap_or_default()
}

/// Format consumed capacity for display.
pub fn format_capacity(capacity: &ConsumedCapacity) -> String {
    format!(
        "{}: {} units",
        capacity.table_name.as_deref().unwrap_or("<unknown table>"),
        capacity.capacity_units.unwrap_or_default()
    )
}

/// Format a fetched item for display.
pub fn format_item(item: Option<&Document>) -> String {
    match item {
        Some(item) => format_document(item),
        None => "Item not found.".to_string(),
    }
}

/// Format a query page for display.
pub fn format_query(response: &QueryResponse) -> String {
    if response.items.is_empty() {
        return "No items found.".to_string();
    }
    let mut output = format!("ITEMS ({})\n", response.count);
    output.push_str(&"-".repeat(40));
    for item in &response.items {
        output.push_str(&format!("\n{}", format_document(item)));
        output.push('\n');
    }
    if let Some(capacity) = &response.consumed_capacity {
        output.push_str(&format!("\nConsumed: {}", format_capacity(capacity)));
    }
    if let Some(key) = &response.last_evaluated_key {
        output.push_str(&format!(
            "\nLast evaluated key: {}",
            serde_json::to_string(key).unwrap_or_default()
        ));
    }
    output
}

/// Format a put/delete outcome for display.
pub fn format_write(action: &str, response: &WriteResponse) -> String {
    match &response.consumed_capacity {
        Some(capacity) => format!("{action}\n  Consumed: {}", format_capacity(capacity)),
        None => action.to_string(),
    }
}

/// Format a committed transaction for display.
pub fn format_receipt(receipt: &TransactionReceipt) -> String {
    let mut output = format!(
        "Committed {} write(s)\n  Started: {}",
        receipt.intent_count, receipt.start_timestamp
    );
    for capacity in &receipt.consumed_capacity {
        output.push_str(&format!("\n  Consumed: {}", format_capacity(capacity)));
    }
    output
}
