//! Inventory management: listing stock and adding, editing or removing items.

use std::io::Write;

use chrono::Utc;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use solemate_core::breakdown::total_stock_value;
use solemate_core::{InventoryItem, InventoryItemId, ItemUpdate, Money, NewItem};

use super::{OutputFormat, format_size, plural, write_json};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::store::RecordSource;

#[derive(Debug, Clone, Subcommand)]
pub enum InventoryCommand {
    /// List items currently in stock
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Add an item to inventory
    Add(AddItemArgs),
    /// Edit an inventory item
    Update(UpdateItemArgs),
    /// Remove an item from inventory
    Delete {
        /// Inventory item ID
        id: InventoryItemId,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AddItemArgs {
    /// Product name
    #[arg(short, long)]
    pub name: String,

    /// Brand
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Shoe size (e.g. 9.5)
    #[arg(short, long)]
    pub size: Option<Decimal>,

    /// Units bought
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    /// Unit purchase price
    #[arg(short, long)]
    pub price: Decimal,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateItemArgs {
    /// Inventory item ID
    pub id: InventoryItemId,

    /// New product name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New brand
    #[arg(short, long)]
    pub brand: Option<String>,

    /// New shoe size
    #[arg(short, long)]
    pub size: Option<Decimal>,

    /// New unit count
    #[arg(short, long)]
    pub quantity: Option<u32>,

    /// New unit purchase price
    #[arg(short, long)]
    pub price: Option<Decimal>,

    /// New image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

impl From<AddItemArgs> for NewItem {
    fn from(args: AddItemArgs) -> Self {
        Self {
            product_name: args.name,
            brand: args.brand,
            size: args.size,
            quantity: args.quantity,
            price: args.price,
            image_url: args.image_url,
        }
    }
}

impl UpdateItemArgs {
    fn into_update(self) -> (InventoryItemId, ItemUpdate) {
        (
            self.id,
            ItemUpdate {
                product_name: self.name,
                brand: self.brand,
                size: self.size,
                quantity: self.quantity,
                price: self.price,
                image_url: self.image_url,
            },
        )
    }
}

#[derive(Debug, Serialize)]
struct StockReport<'a> {
    total_value: Money,
    total_units: u64,
    items: &'a [InventoryItem],
}

/// Run an inventory subcommand.
///
/// # Errors
///
/// Returns `CliError` if records cannot be loaded or saved, a ledger rule
/// rejects the change, or output fails.
pub async fn run<W: Write>(
    source: &RecordSource,
    config: &CliConfig,
    command: InventoryCommand,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        InventoryCommand::List { format } => {
            let inventory = source.fetch_inventory().await?;
            list(&inventory, format, &config.currency_symbol, out)
        }
        InventoryCommand::Add(args) => {
            let store = source.writable()?;
            let mut ledger = store.load_ledger().await?;
            let id = ledger.add_item(args.into(), Utc::now())?;
            store.save_ledger(&ledger).await?;

            info!(item_id = %id, "Added inventory item");
            writeln!(out, "Added item #{id}")?;
            Ok(())
        }
        InventoryCommand::Update(args) => {
            let (id, update) = args.into_update();
            if update.is_empty() {
                return Err(CliError::InvalidArgument(
                    "nothing to update; pass at least one field".to_string(),
                ));
            }

            let store = source.writable()?;
            let mut ledger = store.load_ledger().await?;
            ledger.update_item(id, update)?;
            store.save_ledger(&ledger).await?;

            info!(item_id = %id, "Updated inventory item");
            writeln!(out, "Updated item #{id}")?;
            Ok(())
        }
        InventoryCommand::Delete { id } => {
            let store = source.writable()?;
            let mut ledger = store.load_ledger().await?;
            ledger.delete_item(id, Utc::now())?;
            store.save_ledger(&ledger).await?;

            info!(item_id = %id, "Deleted inventory item");
            writeln!(out, "Deleted item #{id}")?;
            Ok(())
        }
    }
}

/// Render current stock with its total purchase value.
///
/// # Errors
///
/// Returns `CliError` if writing fails.
pub fn list<W: Write>(
    inventory: &[InventoryItem],
    format: OutputFormat,
    symbol: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let total_value = total_stock_value(inventory);
    let total_units: u64 = inventory.iter().map(|item| u64::from(item.quantity)).sum();

    if format == OutputFormat::Json {
        return write_json(
            out,
            &StockReport {
                total_value,
                total_units,
                items: inventory,
            },
        );
    }

    writeln!(out, "Inventory")?;
    if inventory.is_empty() {
        writeln!(out, "  No items in stock")?;
    }
    for item in inventory {
        writeln!(
            out,
            "  #{:<5} {:<28} {:<12} size {:<5} x{:<3} {:>10}",
            item.id,
            item.product_name,
            item.brand.as_deref().unwrap_or("-"),
            format_size(item.size),
            item.quantity,
            Money::from_decimal(item.price).display_with(symbol),
        )?;
    }
    writeln!(
        out,
        "Stock value: {} ({total_units} {})",
        total_value.display_with(symbol),
        plural(total_units, "unit", "units"),
    )?;
    Ok(())
}
