use anyhow::Result;
use clap::Parser;
use colored::*;
use modeldeck::catalog::{self, Catalog, DirCache};
use modeldeck::error::CatalogError;
use modeldeck::query::{Capability, SortKey};
use modeldeck::state::{HistorySink, MemoryHistory, Session};

mod cli_args;
mod render;
mod tracing;

use cli_args::{CliArgs, Commands};
use render::{print_detail, print_page};
use tracing::setup_logging;

async fn load(args: &CliArgs) -> Result<Catalog, CatalogError> {
    if args.no_cache {
        catalog::fetch_catalog(&args.api_url).await
    } else {
        let mut cache = DirCache::new()?;
        catalog::load_catalog(&mut cache, &args.api_url).await
    }
}

fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_caps(csv: &str) -> Vec<Capability> {
    split_csv(csv)
        .iter()
        .filter_map(|token| {
            let cap = Capability::parse(token);
            if cap.is_none() {
                log::warn!("ignoring unknown capability {token}");
            }
            cap
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let args = CliArgs::parse();

    // A shared deep link seeds the session the same way a browser URL would.
    let initial_query = match &args.command {
        Some(Commands::List { query: Some(q), .. }) => q.clone(),
        _ => String::new(),
    };

    let mut session = Session::new(MemoryHistory::with_query(initial_query));
    match load(&args).await {
        Ok(catalog) => session.set_catalog(&catalog),
        Err(e) => session.set_error(e.to_string()),
    }
    if let Some(message) = session.load_state().error() {
        eprintln!("{} {}", "error:".red().bold(), message);
        std::process::exit(1);
    }

    let command = args.command.unwrap_or(Commands::List {
        search: None,
        provider: None,
        caps: None,
        input_modality: None,
        output_modality: None,
        sort: None,
        page: 1,
        query: None,
        json: false,
    });

    match command {
        Commands::List {
            search,
            provider,
            caps,
            input_modality,
            output_modality,
            sort,
            page,
            query,
            json,
        } => {
            if query.is_none() {
                if let Some(search) = search {
                    session.set_search(search);
                }
                if let Some(provider) = provider {
                    session.set_provider(provider);
                }
                if let Some(caps) = caps {
                    for cap in parse_caps(&caps) {
                        session.toggle_capability(cap);
                    }
                }
                if let Some(csv) = input_modality {
                    for modality in split_csv(&csv) {
                        session.toggle_input_modality(modality);
                    }
                }
                if let Some(csv) = output_modality {
                    for modality in split_csv(&csv) {
                        session.toggle_output_modality(modality);
                    }
                }
                if let Some(sort) = sort {
                    session.set_sort(SortKey::parse(&sort));
                }
                if page > 1 {
                    session.set_page(page);
                }
            }

            // First pass clamps the page against the live result count.
            let _ = session.current_view();
            let state = session.state().clone();
            let share = session.history().current_query();

            let view = session.current_view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view.page)?);
            } else {
                print_page(&view, &state);
                if !share.is_empty() {
                    println!("share: ?{share}");
                }
            }
        }
        Commands::Show { model_id, json } => {
            session.open_detail(&model_id);
            let share = session.history().current_query();
            match session.detail() {
                Some(flat) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(flat)?);
                    } else {
                        print_detail(flat);
                        println!("share: ?{share}");
                    }
                }
                None => {
                    eprintln!("{} no model with id {model_id}", "error:".red().bold());
                    std::process::exit(2);
                }
            }
        }
        Commands::Providers => {
            for provider in session.providers() {
                println!("{:<20} {}", provider.id, provider.name.bold());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_caps_drops_unknown_tokens() {
        let caps = parse_caps("reasoning, telepathy ,tool_call");
        assert_eq!(caps, vec![Capability::Reasoning, Capability::ToolCall]);
    }

    #[test]
    fn test_session_share_query_readable_through_sink() {
        // Mirrors the list/show flow: the share string is read back off the
        // session's history sink.
        let mut session = Session::new(MemoryHistory::with_query("q=claude"));
        assert_eq!(session.history().current_query(), "q=claude");
        session.set_search("gpt");
        assert_eq!(session.history().current_query(), "q=gpt");
    }
}
