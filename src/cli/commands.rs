use crate::error::{StoresError, StoresResult};
use crate::excel::StoreExporter;
use crate::service::StoresService;
use crate::status::{color_for_status, Status};
use crate::types::{today, StoreEntry, StoreFilter, StoreRecord};
use colored::Colorize;
use std::path::PathBuf;

/// Store fields given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StoreArgs {
    /// Store name
    #[arg(long)]
    pub name: Option<String>,

    /// Employee responsible for the store
    #[arg(long)]
    pub employee: Option<String>,

    /// Store manager
    #[arg(long)]
    pub manager: Option<String>,

    /// Store phone number
    #[arg(long)]
    pub store_phone: Option<String>,

    /// Manager phone number
    #[arg(long)]
    pub manager_phone: Option<String>,

    /// Location (must be a known location)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Status label (see `stores statuses`)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Free-form status note
    #[arg(long)]
    pub note: Option<String>,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

impl StoreArgs {
    /// Overwrite the fields that were given
    pub fn apply_to(self, record: &mut StoreRecord) {
        let targets = [
            (self.name, &mut record.store_name),
            (self.employee, &mut record.employee_name),
            (self.manager, &mut record.manager_name),
            (self.store_phone, &mut record.store_phone),
            (self.manager_phone, &mut record.manager_phone),
            (self.location, &mut record.location),
            (self.address, &mut record.address),
            (self.status, &mut record.status),
            (self.note, &mut record.status_note),
            (self.date, &mut record.date),
        ];
        for (value, field) in targets {
            if let Some(value) = value {
                *field = value;
            }
        }
    }

    pub fn into_record(self) -> StoreRecord {
        let mut record = StoreRecord::default();
        self.apply_to(&mut record);
        record
    }
}

/// Display placeholder for empty optional fields (screen only, never files)
fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Status label coloured like its export fill
fn paint_status(status: &str) -> String {
    let argb = color_for_status(status);
    let rgb = u32::from_str_radix(&argb[2..], 16).unwrap_or(0xFFFFFF);
    let (r, g, b) = ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
    status.truecolor(r, g, b).bold().to_string()
}

fn print_entry(entry: &StoreEntry, verbose: bool) {
    let r = &entry.record;
    println!(
        "   {}  {}  {}  {}",
        r.store_name.bright_blue().bold(),
        r.location,
        paint_status(&r.status),
        r.date.dimmed()
    );
    if verbose {
        println!("      id:       {}", entry.id.dimmed());
        println!("      employee: {}", or_dash(&r.employee_name));
        println!("      manager:  {}", or_dash(&r.manager_name));
        println!(
            "      phones:   {} / {}",
            or_dash(&r.store_phone),
            or_dash(&r.manager_phone)
        );
        println!("      address:  {}", or_dash(&r.address));
        println!("      note:     {}", or_dash(&r.status_note));
    }
}

/// Execute the list command
pub async fn list(service: &StoresService, filter: StoreFilter, verbose: bool) -> StoresResult<()> {
    let entries = service.list(&filter).await?;

    println!(
        "{}",
        format!("🏪 Stores ({})", entries.len()).bold().green()
    );
    if entries.is_empty() {
        println!("   No stores found");
    }
    for entry in &entries {
        print_entry(entry, verbose);
    }
    println!();
    Ok(())
}

/// Execute the add command
pub async fn add(service: &StoresService, args: StoreArgs) -> StoresResult<()> {
    let entry = service.create(args.into_record()).await?;
    println!("{}", "✅ Store added".bold().green());
    print_entry(&entry, true);
    Ok(())
}

/// Execute the update command - only the given fields change
pub async fn update(service: &StoresService, id: String, args: StoreArgs) -> StoresResult<()> {
    let mut record = service.get(&id).await?.record;
    args.apply_to(&mut record);

    let entry = service.update(&id, record).await?;
    println!("{}", "✅ Store updated".bold().green());
    print_entry(&entry, true);
    Ok(())
}

/// Execute the delete command
pub async fn delete(service: &StoresService, id: String) -> StoresResult<()> {
    service.delete(&id).await?;
    println!("{} {}", "✅ Store deleted:".bold().green(), id);
    Ok(())
}

/// Execute the locations command
pub async fn locations(service: &StoresService) -> StoresResult<()> {
    let set = service.locations().await?;
    println!("{}", format!("📍 Locations ({})", set.len()).bold().green());
    for location in set.iter() {
        println!("   {}", location);
    }
    Ok(())
}

/// Execute the add-location command
pub async fn add_location(service: &StoresService, name: String) -> StoresResult<()> {
    let set = service.add_location(&name).await?;
    println!("{} {}", "✅ Location available:".bold().green(), name);
    println!("   {} known locations", set.len());
    Ok(())
}

/// Execute the statuses command
pub fn statuses() -> StoresResult<()> {
    println!("{}", "🎨 Statuses".bold().green());
    for status in Status::ALL {
        println!("   {}  {}", status.color(), paint_status(status.label()));
    }
    Ok(())
}

/// Execute the export command
pub async fn export(
    service: &StoresService,
    output: Option<PathBuf>,
    filter: StoreFilter,
    verbose: bool,
) -> StoresResult<()> {
    println!("{}", "📊 Stores - Excel Export".bold().green());

    let file = service.export(&filter).await?;
    let output = output.unwrap_or_else(|| PathBuf::from(StoreExporter::file_name(&today())));

    if verbose {
        println!("   Encoded {} bytes", file.bytes.len());
    }
    std::fs::write(&output, &file.bytes)
        .map_err(|e| StoresError::Export(format!("Failed to save Excel file: {}", e)))?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Execute the import command
pub async fn import(service: &StoresService, input: PathBuf, verbose: bool) -> StoresResult<()> {
    println!("{}", "📥 Stores - Excel Import".bold().green());
    println!("   Input: {}\n", input.display());

    let bytes = std::fs::read(&input)
        .map_err(|e| StoresError::Parse(format!("Failed to read Excel file: {}", e)))?;
    if verbose {
        println!("{}", "📖 Reading Excel file...".cyan());
    }

    let report = service.import(bytes).await?;

    println!(
        "{}",
        format!("✅ Imported {} stores", report.imported).bold().green()
    );
    if report.skipped > 0 {
        println!(
            "   {}",
            format!("Skipped {} rows without a store name", report.skipped).yellow()
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
