use std::{env, process, sync::Arc};

use seoo_booking::{
    cli::{output, BookingSession, DialoguerInteraction, PrintLinkOpener, SessionOutcome},
    config::{BookingConfig, ConfigManager},
    core::{message::quote_request_link, pricing::estimate_price, BookingWizard, SystemClock},
    currency::format_brl,
    domain::{snapshot, ServiceType, VehicleType},
    errors::BookingError,
    init,
    storage::{JsonSnapshotStore, SnapshotStore},
};

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn load_config() -> Result<BookingConfig, BookingError> {
    ConfigManager::new()?.load()
}

fn run() -> Result<(), BookingError> {
    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    });

    match command.as_str() {
        "book" => {
            let config = load_config()?;
            let store = JsonSnapshotStore::new(None)?;
            let mut wizard =
                BookingWizard::mount(Box::new(store), Arc::new(SystemClock), config);
            let mut interaction = DialoguerInteraction::new();
            let outcome =
                BookingSession::new(&mut wizard).run(&mut interaction, &PrintLinkOpener)?;
            match outcome {
                SessionOutcome::Submitted(_) => output::success("Obrigado por escolher a SEOO."),
                SessionOutcome::Saved => {
                    output::info("Rascunho salvo. Use `book` para continuar de onde parou.")
                }
            }
        }
        "quote" => {
            let (vehicle, service) = match (args.next(), args.next()) {
                (Some(vehicle), Some(service)) => (vehicle, service),
                _ => {
                    print_usage();
                    process::exit(1);
                }
            };
            let return_trip = args.any(|arg| arg == "--return");
            let vehicle: VehicleType = vehicle.parse().map_err(|err| BookingError::InvalidInput {
                field: "vehicleType",
                message: format!("{err}"),
            })?;
            let service: ServiceType = service.parse().map_err(|err| BookingError::InvalidInput {
                field: "serviceType",
                message: format!("{err}"),
            })?;
            let price = estimate_price(vehicle, service, return_trip);
            let leg = if return_trip { "ida e volta" } else { "somente ida" };
            println!(
                "{} / {} ({leg}): {}",
                service.label(),
                vehicle.label(),
                format_brl(price)
            );
        }
        "show" => {
            let config = load_config()?;
            let store = JsonSnapshotStore::new(None)?;
            match store.get(&config.storage_key)? {
                Some(raw) => {
                    let draft = snapshot::decode(&raw)?;
                    println!("{}", serde_json::to_string_pretty(&draft)?);
                }
                None => println!("Nenhum rascunho salvo."),
            }
        }
        "reset" => {
            let config = load_config()?;
            let store = JsonSnapshotStore::new(None)?;
            store.remove(&config.storage_key)?;
            println!("Rascunho removido.");
        }
        "link" => {
            let config = load_config()?;
            println!("{}", quote_request_link(&config.whatsapp_number));
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!(
        "Usage: seoo_booking_cli <command>\n\
         Commands:\n  \
         book                                  start or resume a booking\n  \
         quote <vehicle> <service> [--return]  print a price estimate\n  \
         show                                  print the saved draft\n  \
         reset                                 delete the saved draft\n  \
         link                                  print the quote request link"
    );
}
