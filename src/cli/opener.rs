use crate::cli::output;
use crate::core::message::LinkOpener;
use crate::errors::BookingError;

/// Prints the deep link for the user to open; the terminal has no browser handoff.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintLinkOpener;

impl LinkOpener for PrintLinkOpener {
    fn open(&self, url: &str) -> Result<(), BookingError> {
        if url.is_empty() {
            return Err(BookingError::LinkOpen("empty link".into()));
        }
        output::info("Abra o link abaixo para enviar a reserva pelo WhatsApp:");
        println!("{url}");
        Ok(())
    }
}
