use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use inquire::{Select, Text};
use quotation_maker::editor::{
    save_draft, ApiClient, ClientField, DraftEdit, QuotationDraft,
};
use quotation_maker::export::{Exporter, VectorRenderer};
use quotation_maker::models::Quotation;
use quotation_maker::EditorConfig;

const ACTION_CLIENT: &str = "Edit client details";
const ACTION_EDIT_ITEM: &str = "Edit item";
const ACTION_ADD_ITEM: &str = "Add item";
const ACTION_REMOVE_ITEM: &str = "Remove item";
const ACTION_PREVIEW: &str = "Preview";
const ACTION_SAVE: &str = "Save to database";
const ACTION_EXPORT: &str = "Export PDF";
const ACTION_QUIT: &str = "Quit";

#[derive(Parser)]
#[command(name = "quotation-editor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and edit a new quotation draft
    New,
    /// List all saved quotations
    List,
    /// Search saved quotations by client name
    Search { client_name: String },
    /// Show one saved quotation by its number
    Show { quotation_number: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = EditorConfig::from_env();

    let client = match ApiClient::new(&config.api_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {e}");
            return;
        }
    };

    match cli.command.unwrap_or(Commands::New) {
        Commands::New => run_editor(&client).await,
        Commands::List => match client.list_quotations().await {
            Ok(quotations) => print_quotation_table(&quotations),
            Err(e) => eprintln!("❌ {e}"),
        },
        Commands::Search { client_name } => match client.search_quotations(&client_name).await {
            Ok(quotations) => print_quotation_table(&quotations),
            Err(e) => eprintln!("❌ {e}"),
        },
        Commands::Show { quotation_number } => match client.get_by_number(&quotation_number).await
        {
            Ok(quotation) => print_preview(
                &quotation.quotation_number,
                &quotation.date,
                &quotation.client_info.name,
                &quotation.items,
                quotation.subtotal,
                quotation.grand_total,
            ),
            Err(e) => eprintln!("❌ {e}"),
        },
    }
}

async fn run_editor(client: &ApiClient) {
    let exporter = Exporter::new(VectorRenderer::new());
    let mut draft = QuotationDraft::new();
    println!("📝 New quotation draft: {} ({})", draft.quotation_number, draft.date);

    let actions = vec![
        ACTION_CLIENT,
        ACTION_EDIT_ITEM,
        ACTION_ADD_ITEM,
        ACTION_REMOVE_ITEM,
        ACTION_PREVIEW,
        ACTION_SAVE,
        ACTION_EXPORT,
        ACTION_QUIT,
    ];

    loop {
        let Ok(action) = Select::new("What next?", actions.clone()).prompt() else {
            break;
        };

        match action {
            ACTION_CLIENT => draft = edit_client(draft),
            ACTION_EDIT_ITEM => {
                if let Some(index) = pick_item(&draft) {
                    draft = edit_item(draft, index);
                }
            }
            ACTION_ADD_ITEM => {
                draft = draft.apply(DraftEdit::AddItem);
                let index = draft.items.len() - 1;
                draft = edit_item(draft, index);
            }
            ACTION_REMOVE_ITEM => {
                if draft.items.len() == 1 {
                    println!("⚠️  A quotation needs at least one item.");
                } else if let Some(index) = pick_item(&draft) {
                    draft = draft.apply(DraftEdit::RemoveItem { index });
                }
            }
            ACTION_PREVIEW => {
                let snapshot = draft.to_new_quotation();
                print_preview(
                    &snapshot.quotation_number,
                    &snapshot.date,
                    &snapshot.client_info.name,
                    &snapshot.items,
                    snapshot.subtotal,
                    snapshot.grand_total,
                );
            }
            ACTION_SAVE => match save_draft(client, &draft).await {
                Ok(saved) => {
                    println!("✅ Quotation {} saved to database!", saved.quotation_number);
                    draft = QuotationDraft::new();
                    println!(
                        "📝 Fresh draft ready: {} ({})",
                        draft.quotation_number, draft.date
                    );
                }
                Err(e) => println!("❌ {e}"),
            },
            ACTION_EXPORT => match exporter.export(&draft.to_new_quotation()) {
                Ok(pdf) => match std::fs::write(&pdf.filename, &pdf.bytes) {
                    Ok(()) => println!("📄 Exported {}", pdf.filename),
                    Err(e) => println!("❌ Failed to write {}: {e}", pdf.filename),
                },
                Err(e) => println!("❌ {e}"),
            },
            _ => break,
        }
    }
}

fn edit_client(mut draft: QuotationDraft) -> QuotationDraft {
    let prompts = [
        (ClientField::Name, "Client name:"),
        (ClientField::Address, "Client address:"),
        (ClientField::Phone, "Client phone:"),
        (ClientField::Email, "Client email:"),
    ];

    for (field, label) in prompts {
        let initial = match field {
            ClientField::Name => draft.client_info.name.clone(),
            ClientField::Address => draft.client_info.address.clone(),
            ClientField::Phone => draft.client_info.phone.clone(),
            ClientField::Email => draft.client_info.email.clone(),
        };
        if let Ok(value) = Text::new(label).with_initial_value(&initial).prompt() {
            draft = draft.apply(DraftEdit::Client { field, value });
        }
    }
    draft
}

fn edit_item(mut draft: QuotationDraft, index: usize) -> QuotationDraft {
    let item = draft.items[index].clone();

    if let Ok(value) = Text::new("Description:")
        .with_initial_value(&item.description)
        .prompt()
    {
        draft = draft.apply(DraftEdit::ItemDescription { index, value });
    }
    if let Some(value) = prompt_number("Quantity:", item.quantity) {
        draft = draft.apply(DraftEdit::ItemQuantity { index, value });
    }
    if let Some(value) = prompt_number("Unit price:", item.price) {
        draft = draft.apply(DraftEdit::ItemPrice { index, value });
    }
    draft
}

fn pick_item(draft: &QuotationDraft) -> Option<usize> {
    let options: Vec<String> = draft
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let label = if item.description.trim().is_empty() {
                "(blank)"
            } else {
                item.description.as_str()
            };
            format!("{}. {}", i + 1, label)
        })
        .collect();

    Select::new("Which item?", options)
        .raw_prompt()
        .ok()
        .map(|choice| choice.index)
}

fn prompt_number(label: &str, initial: f64) -> Option<f64> {
    loop {
        let input = Text::new(label)
            .with_initial_value(&initial.to_string())
            .prompt()
            .ok()?;
        match input.trim().parse::<f64>() {
            Ok(value) if value >= 0.0 => return Some(value),
            _ => println!("⚠️  Please enter a non-negative number."),
        }
    }
}

fn print_preview(
    quotation_number: &str,
    date: &str,
    client_name: &str,
    items: &[quotation_maker::models::LineItem],
    subtotal: f64,
    grand_total: f64,
) {
    println!("\nQuotation {quotation_number}  |  Date: {date}  |  Client: {client_name}");

    let mut table = Table::new();
    table.set_header(vec!["#", "Description", "Qty", "Price", "Total"]);
    for (i, item) in items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.description),
            Cell::new(item.quantity),
            Cell::new(format!("{:.2}", item.price)),
            Cell::new(format!("{:.2}", item.total)),
        ]);
    }
    println!("{table}");
    println!("Subtotal:    {subtotal:.2}");
    println!("Grand total: {grand_total:.2}\n");
}

fn print_quotation_table(quotations: &[Quotation]) {
    if quotations.is_empty() {
        println!("No quotations found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Quotation #", "Date", "Client", "Grand Total", "Created"]);
    for q in quotations {
        table.add_row(vec![
            Cell::new(&q.quotation_number),
            Cell::new(&q.date),
            Cell::new(&q.client_info.name),
            Cell::new(format!("{:.2}", q.grand_total)),
            Cell::new(q.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");
    println!("{} quotation(s)", quotations.len());
}
