use colored::*;
use modeldeck::catalog::FlattenedModel;
use modeldeck::query::QueryResult;
use modeldeck::state::ViewState;

/// Format a per-million-token price the way the catalog UI does: free models
/// say so, tiny unit prices keep more precision.
pub fn format_cost(cost: f64) -> String {
    if cost == 0.0 {
        return "Free".to_string();
    }
    if cost < 0.001 {
        format!("${cost:.6}")
    } else if cost < 1.0 {
        format!("${cost:.4}")
    } else {
        format!("${cost:.2}")
    }
}

/// Compact token counts: 1.2M, 128K, plain below a thousand.
pub fn format_tokens(tokens: u64) -> String {
    if tokens == 0 {
        return "-".to_string();
    }
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.0}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

fn capability_tags(flat: &FlattenedModel) -> String {
    let mut tags = Vec::new();
    if flat.model.reasoning {
        tags.push("reasoning");
    }
    if flat.model.tool_call {
        tags.push("tools");
    }
    if flat.model.structured_output {
        tags.push("structured");
    }
    if flat.model.attachment {
        tags.push("attachments");
    }
    if flat.model.open_weights {
        tags.push("open-weights");
    }
    tags.join(", ")
}

pub fn print_page(result: &QueryResult<'_>, state: &ViewState) {
    if result.total_count == 0 {
        println!("{}", "No models match the current filters.".yellow());
        return;
    }

    for flat in &result.page {
        let date = flat.model.last_updated.as_deref().unwrap_or("-");
        let context = flat
            .model
            .context_limit()
            .map(format_tokens)
            .unwrap_or_else(|| "-".to_string());
        let input = flat
            .model
            .input_cost()
            .map(format_cost)
            .unwrap_or_else(|| "-".to_string());
        let output = flat
            .model
            .output_cost()
            .map(format_cost)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<40} {:<18} {:>10} {:>12} {:>12}  {}",
            flat.name().bold(),
            flat.provider_name.cyan(),
            context,
            input,
            output,
            date.dimmed()
        );
    }

    println!(
        "\n{} models, page {}/{}",
        result.total_count,
        state.page,
        result.total_pages
    );
}

pub fn print_detail(flat: &FlattenedModel) {
    println!("{}", flat.name().bold());
    println!("  id:        {}", flat.id());
    println!("  provider:  {} ({})", flat.provider_name, flat.provider_id);
    if let Some(family) = &flat.model.family {
        println!("  family:    {family}");
    }
    let caps = capability_tags(flat);
    if !caps.is_empty() {
        println!("  features:  {caps}");
    }
    let inputs = flat.model.input_modalities();
    if !inputs.is_empty() {
        println!("  input:     {}", inputs.join(", "));
    }
    let outputs = flat.model.output_modalities();
    if !outputs.is_empty() {
        println!("  output:    {}", outputs.join(", "));
    }
    if let Some(context) = flat.model.context_limit() {
        println!("  context:   {}", format_tokens(context));
    }
    if let Some(output) = flat.model.output_limit() {
        println!("  max out:   {}", format_tokens(output));
    }
    if let Some(cost) = flat.model.input_cost() {
        println!("  $/M in:    {}", format_cost(cost));
    }
    if let Some(cost) = flat.model.output_cost() {
        println!("  $/M out:   {}", format_cost(cost));
    }
    if let Some(date) = &flat.model.release_date {
        println!("  released:  {date}");
    }
    if let Some(date) = &flat.model.last_updated {
        println!("  updated:   {date}");
    }
    if let Some(doc) = &flat.provider_doc {
        println!("  docs:      {}", doc.underline());
    }
    if !flat.provider_env.is_empty() {
        println!("  env:       {}", flat.provider_env.join(", "));
    }
}
