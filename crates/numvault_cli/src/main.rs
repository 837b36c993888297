//! Interactive vault shell.
//!
//! # Responsibility
//! - Collect field values from stdin, one operation at a time.
//! - Call into `numvault_core` and render results as messages.
//!
//! # Invariants
//! - Core errors are rendered and the loop continues; only startup
//!   failures (logging aside) terminate the process.

use numvault_core::{
    collect_stats, db::open_db, default_log_level, init_logging, write_export, BackupObserver,
    BackupWriter, Mutated, Record, RecordId, SortField, SortOrder, SqliteRecordRepository,
    VaultService,
};
use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::rc::Rc;

const EXPORT_PATH: &str = "export.txt";

const MENU: &str = "
===== NumVault =====
1. Add Record
2. List Records
3. Update Record
4. Delete Record
5. Search Records
6. Sort Records
7. Export Data
8. View Vault Statistics
9. Create Manual Backup
10. Exit
====================
";

fn main() -> ExitCode {
    if let Err(err) = init_cli_logging() {
        // Logging is diagnostics only; the vault still works without it.
        eprintln!("Warning: logging disabled: {err}");
    }

    let db_path = std::env::var("NUMVAULT_DB").unwrap_or_else(|_| "numvault.db".to_string());
    let backup_dir =
        std::env::var("NUMVAULT_BACKUP_DIR").unwrap_or_else(|_| "backups".to_string());

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("Fatal: cannot open vault database `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service_repo = match SqliteRecordRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("Fatal: vault storage is not usable: {err}");
            return ExitCode::FAILURE;
        }
    };
    // Second handle on the same connection; the observer re-reads the
    // store at backup time.
    let observer_repo = match SqliteRecordRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("Fatal: vault storage is not usable: {err}");
            return ExitCode::FAILURE;
        }
    };

    let writer = Rc::new(BackupWriter::new(backup_dir));
    let service = VaultService::with_observers(
        service_repo,
        vec![Box::new(BackupObserver::new(
            Rc::clone(&writer),
            observer_repo,
        ))],
    );

    run_menu(&service, &writer);
    ExitCode::SUCCESS
}

fn run_menu(service: &VaultService<'_, SqliteRecordRepository<'_>>, writer: &BackupWriter) {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("{MENU}");
        let Some(choice) = prompt(&mut input, "Choose option: ") else {
            return;
        };

        match choice.trim() {
            "1" => add_record(service, &mut input),
            "2" => list_records(service),
            "3" => update_record(service, &mut input),
            "4" => delete_record(service, &mut input),
            "5" => search_records(service, &mut input),
            "6" => sort_records(service, &mut input),
            "7" => export_data(service),
            "8" => show_stats(service),
            "9" => manual_backup(service, writer),
            "10" => {
                println!("Goodbye!");
                return;
            }
            other => println!("Unknown option: {other}"),
        }
    }
}

fn add_record(service: &VaultService<'_, SqliteRecordRepository<'_>>, input: &mut impl BufRead) {
    let Some(name) = prompt(input, "Enter name: ") else {
        return;
    };
    let Some(value) = prompt_value(input) else {
        return;
    };

    match service.add(name, value) {
        Ok(mutated) => {
            println!("Record added successfully!");
            print_record(&mutated.record);
            report_side_effects(&mutated);
        }
        Err(err) => println!("Error: {err}"),
    }
}

fn list_records(service: &VaultService<'_, SqliteRecordRepository<'_>>) {
    match service.list() {
        Ok(records) if records.is_empty() => println!("No records found."),
        Ok(records) => print_records(&records),
        Err(err) => println!("Error: {err}"),
    }
}

fn update_record(service: &VaultService<'_, SqliteRecordRepository<'_>>, input: &mut impl BufRead) {
    let Some(id) = prompt_id(input) else {
        return;
    };
    let Some(name) = prompt(input, "Enter new name: ") else {
        return;
    };
    let Some(value) = prompt_value(input) else {
        return;
    };

    match service.update(id, name, value) {
        Ok(Some(mutated)) => {
            println!("Record updated successfully!");
            print_record(&mutated.record);
            report_side_effects(&mutated);
        }
        Ok(None) => println!("Record not found."),
        Err(err) => println!("Error: {err}"),
    }
}

fn delete_record(service: &VaultService<'_, SqliteRecordRepository<'_>>, input: &mut impl BufRead) {
    let Some(id) = prompt_id(input) else {
        return;
    };

    match service.delete(id) {
        Ok(Some(mutated)) => {
            println!("Record deleted: {}", mutated.record.name);
            report_side_effects(&mutated);
        }
        Ok(None) => println!("Record not found."),
        Err(err) => println!("Error: {err}"),
    }
}

fn search_records(
    service: &VaultService<'_, SqliteRecordRepository<'_>>,
    input: &mut impl BufRead,
) {
    let Some(term) = prompt(input, "Enter search term: ") else {
        return;
    };

    match service.search(&term) {
        Ok(records) if records.is_empty() => println!("No matching records."),
        Ok(records) => print_records(&records),
        Err(err) => println!("Error: {err}"),
    }
}

fn sort_records(service: &VaultService<'_, SqliteRecordRepository<'_>>, input: &mut impl BufRead) {
    let Some(field) = prompt(input, "Sort by (Name/CreatedAt): ") else {
        return;
    };
    let Some(order) = prompt(input, "Order (Ascending/Descending): ") else {
        return;
    };

    match service.sorted(SortField::parse(&field), SortOrder::parse(&order)) {
        Ok(records) if records.is_empty() => println!("No records found."),
        Ok(records) => print_records(&records),
        Err(err) => println!("Error: {err}"),
    }
}

fn export_data(service: &VaultService<'_, SqliteRecordRepository<'_>>) {
    let result = service
        .list()
        .map_err(|err| err.to_string())
        .and_then(|records| {
            write_export(EXPORT_PATH, &records).map_err(|err| err.to_string())
        });

    match result {
        Ok(()) => println!("Data exported successfully to {EXPORT_PATH}"),
        Err(err) => println!("Error: {err}"),
    }
}

fn show_stats(service: &VaultService<'_, SqliteRecordRepository<'_>>) {
    let records = match service.list() {
        Ok(records) => records,
        Err(err) => {
            println!("Error: {err}");
            return;
        }
    };

    let Some(stats) = collect_stats(&records) else {
        println!("Vault is empty.");
        return;
    };

    println!("Vault Statistics:");
    println!("---");
    println!("Total Records: {}", stats.total);
    println!("Last Modified: {}", stats.last_modified.to_rfc3339());
    println!(
        "Longest Name: {} ({} characters)",
        stats.longest_name,
        stats.longest_name.chars().count()
    );
    println!(
        "Earliest Record: {}",
        stats.earliest_created.format("%Y-%m-%d")
    );
    println!("Latest Record: {}", stats.latest_created.format("%Y-%m-%d"));
}

fn manual_backup(service: &VaultService<'_, SqliteRecordRepository<'_>>, writer: &BackupWriter) {
    let result = service
        .list()
        .map_err(|err| err.to_string())
        .and_then(|records| {
            writer
                .write_snapshot(&records)
                .map_err(|err| err.to_string())
        });

    match result {
        Ok(path) => println!("Backup created: {}", path.display()),
        Err(err) => println!("Error: {err}"),
    }
}

fn report_side_effects(mutated: &Mutated) {
    for failure in &mutated.side_effects {
        println!("Warning: {failure} (the record change itself was saved)");
    }
}

fn print_records(records: &[Record]) {
    for record in records {
        print_record(record);
    }
}

fn print_record(record: &Record) {
    println!(
        "ID: {} | Name: {} | Value: {} | Created: {}",
        record.id,
        record.name,
        record.value,
        record.created_at.to_rfc3339()
    );
}

/// Prompts and reads one trimmed line; `None` on EOF.
fn prompt(input: &mut impl BufRead, message: &str) -> Option<String> {
    print!("{message}");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

fn prompt_value(input: &mut impl BufRead) -> Option<f64> {
    let raw = prompt(input, "Enter value: ")?;
    // Unparseable input flows through as NaN so the core validation
    // rejects it with the canonical message.
    Some(raw.parse::<f64>().unwrap_or(f64::NAN))
}

fn prompt_id(input: &mut impl BufRead) -> Option<RecordId> {
    let raw = prompt(input, "Enter record ID: ")?;
    match raw.parse::<RecordId>() {
        Ok(id) => Some(id),
        Err(_) => {
            println!("Invalid record ID: {raw}");
            None
        }
    }
}

fn init_cli_logging() -> Result<(), String> {
    let log_dir = std::env::current_dir()
        .map_err(|err| format!("cannot resolve working directory: {err}"))?
        .join("logs");
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| "log directory path is not valid UTF-8".to_string())?;
    init_logging(default_log_level(), log_dir)
}
