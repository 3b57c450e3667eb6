//! The WhatsApp handoff: message body and deep links.

use chrono::NaiveDate;

use crate::currency::format_brl;
use crate::domain::BookingDraft;
use crate::errors::BookingError;

const WHATSAPP_BASE: &str = "https://wa.me";
const DATE_DISPLAY: &str = "%d/%m/%Y";
pub const QUOTE_REQUEST_MESSAGE: &str =
    "Olá! Gostaria de solicitar um orçamento para serviço de motorista executiva.";

/// Hands a URL to whatever opens deep links on this platform.
pub trait LinkOpener {
    fn open(&self, url: &str) -> Result<(), BookingError>;
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_DISPLAY).to_string())
        .unwrap_or_default()
}

fn display_time<T: ToString>(time: Option<T>) -> String {
    time.map(|t| t.to_string()).unwrap_or_default()
}

/// Renders the booking summary sent to the operations number.
///
/// Sections appear in a fixed order: header, client, service, trip,
/// additional info, payment, closing line.
pub fn render_booking_message(draft: &BookingDraft) -> String {
    let mut client = vec![
        "*DADOS DO CLIENTE*".to_string(),
        format!("Nome: {}", draft.full_name.trim()),
        format!("Email: {}", draft.email.trim()),
        format!("Telefone: {}", draft.phone.trim()),
    ];
    if draft.has_cpf() {
        client.push(format!("CPF: {}", draft.cpf.trim()));
    }
    if draft.is_company {
        client.push(format!("Empresa: {}", draft.company_name.trim()));
        client.push(format!("CNPJ: {}", draft.cnpj.trim()));
    }

    let service = vec![
        "*SERVIÇO SOLICITADO*".to_string(),
        format!("Tipo: {}", draft.service_type.label()),
        "Motorista: Feminina".to_string(),
    ];

    let mut trip = vec![
        "*DETALHES DA VIAGEM*".to_string(),
        format!("Embarque: {}", draft.pickup_address.trim()),
        format!("Destino: {}", draft.destination_address.trim()),
        format!("Data: {}", display_date(draft.trip_date)),
        format!("Horário: {}", display_time(draft.trip_time)),
    ];
    if draft.return_trip {
        trip.push(format!(
            "Volta: {} às {}",
            display_date(draft.return_date),
            display_time(draft.return_time)
        ));
    }

    let mut extra = vec![
        "*INFORMAÇÕES ADICIONAIS*".to_string(),
        format!("Passageiros: {}", draft.passengers),
        format!("Veículo: {}", draft.vehicle_type.label()),
    ];
    extra.extend(draft.special_needs.active().map(|need| need.label().to_string()));
    if draft.has_observations() {
        extra.push(format!("Observações: {}", draft.observations.trim()));
    }

    let price = draft
        .estimated_price
        .map(format_brl)
        .unwrap_or_else(|| "A calcular".to_string());
    let payment = vec![
        "*PAGAMENTO*".to_string(),
        format!("Forma: {}", draft.payment_method.label()),
        format!("Valor estimado: {price}"),
    ];

    let header = vec![
        "*NOVA RESERVA - SEOO MOBILIDADE EXECUTIVA*".to_string(),
        "Mobilidade do seu jeito, no seu tempo".to_string(),
    ];
    let closing = vec!["Reserva realizada pelo site SEOO".to_string()];

    [header, client, service, trip, extra, payment, closing]
        .iter()
        .map(|section| section.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `https://wa.me/<digits>?text=<percent-encoded message>`.
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!(
        "{WHATSAPP_BASE}/{digits}?text={}",
        urlencoding::encode(message)
    )
}

/// Generic "request a quote" link, independent of any draft.
pub fn quote_request_link(number: &str) -> String {
    whatsapp_link(number, QUOTE_REQUEST_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        PaymentMethod, ServiceType, SpecialNeed, SpecialNeeds, TimeOfDay, VehicleType,
    };

    fn sample() -> BookingDraft {
        BookingDraft {
            full_name: "Maria Silva".into(),
            email: "maria@x.com".into(),
            phone: "(11) 99999-9999".into(),
            service_type: ServiceType::Exclusive,
            pickup_address: "Av. Paulista, 1000".into(),
            destination_address: "Aeroporto de Guarulhos".into(),
            trip_date: NaiveDate::from_ymd_opt(2026, 11, 3),
            trip_time: TimeOfDay::new(14, 0),
            ..BookingDraft::default()
        }
    }

    #[test]
    fn renders_minimal_booking() {
        let mut draft = sample();
        draft.estimated_price = Some(280.8);
        insta::assert_snapshot!(render_booking_message(&draft), @r###"
        *NOVA RESERVA - SEOO MOBILIDADE EXECUTIVA*
        Mobilidade do seu jeito, no seu tempo

        *DADOS DO CLIENTE*
        Nome: Maria Silva
        Email: maria@x.com
        Telefone: (11) 99999-9999

        *SERVIÇO SOLICITADO*
        Tipo: SEOO Exclusive
        Motorista: Feminina

        *DETALHES DA VIAGEM*
        Embarque: Av. Paulista, 1000
        Destino: Aeroporto de Guarulhos
        Data: 03/11/2026
        Horário: 14:00

        *INFORMAÇÕES ADICIONAIS*
        Passageiros: 1
        Veículo: SUV Híbrido
        Motorista mulher

        *PAGAMENTO*
        Forma: PIX
        Valor estimado: R$ 280,80

        Reserva realizada pelo site SEOO
        "###);
    }

    #[test]
    fn renders_optional_blocks() {
        let draft = BookingDraft {
            cpf: "529.982.247-25".into(),
            is_company: true,
            company_name: "Acme".into(),
            cnpj: "11.222.333/0001-81".into(),
            return_trip: true,
            return_date: NaiveDate::from_ymd_opt(2026, 11, 5),
            return_time: TimeOfDay::new(18, 30),
            vehicle_type: VehicleType::Luxury,
            special_needs: SpecialNeeds::only(&[SpecialNeed::Wheelchair, SpecialNeed::ChildSeat]),
            observations: "Voo LA3040".into(),
            payment_method: PaymentMethod::Invoice,
            ..sample()
        };
        let message = render_booking_message(&draft);
        assert!(
            message.contains("CPF: 529.982.247-25\nEmpresa: Acme\nCNPJ: 11.222.333/0001-81")
        );
        assert!(message.contains("Volta: 05/11/2026 às 18:30"));
        assert!(message.contains(
            "Veículo: Luxo\nAcessível para cadeirante\nCadeirinha infantil\nObservações: Voo LA3040"
        ));
        assert!(!message.contains("Motorista mulher"));
        assert!(message.contains("Forma: Faturamento\nValor estimado: A calcular"));
    }

    #[test]
    fn link_keeps_digits_and_encodes_text() {
        let link = whatsapp_link("+55 (11) 94516-4043", "Olá mundo & cia\nok");
        assert_eq!(
            link,
            "https://wa.me/5511945164043?text=Ol%C3%A1%20mundo%20%26%20cia%0Aok"
        );
    }

    #[test]
    fn quote_link_uses_default_message() {
        let link = quote_request_link("5511945164043");
        assert!(link.starts_with("https://wa.me/5511945164043?text=Ol%C3%A1%21%20Gostaria"));
    }
}
